//! Application state.

use std::sync::Arc;
use texcite_core::{CitationAnalyzer, Project};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub project: Arc<Project>,
    pub analyzer: CitationAnalyzer,
}

impl AppState {
    pub fn new(project: Project, analyzer: CitationAnalyzer) -> Self {
        Self {
            project: Arc::new(project),
            analyzer,
        }
    }
}
