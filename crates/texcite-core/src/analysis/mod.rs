//! Project-wide citation analysis.
//!
//! Fetches each selected `.tex` file, analyzes it, and merges the results
//! into a [`ProjectCitationReport`]. A file that cannot be fetched is logged
//! and skipped; the report is always produced.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::Project;
use crate::config::AnalysisSettings;
use crate::fetch::{FetchError, FileFetcher};
use crate::latex::{analyze_document, DocumentAnalysis};
use crate::report::{ProjectCitationReport, ReportBuilder};

/// Runs project analyses against a file source.
#[derive(Clone)]
pub struct CitationAnalyzer {
    fetcher: Arc<dyn FileFetcher>,
    settings: AnalysisSettings,
}

impl CitationAnalyzer {
    pub fn new(fetcher: Arc<dyn FileFetcher>) -> Self {
        Self::with_settings(fetcher, AnalysisSettings::default())
    }

    pub fn with_settings(fetcher: Arc<dyn FileFetcher>, settings: AnalysisSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Settings this analyzer was built with.
    pub fn settings(&self) -> AnalysisSettings {
        self.settings
    }

    /// Analyze every selected `.tex` file of a project.
    ///
    /// Without a repository or selected files the report is zero-valued but
    /// still carries the catalog. Fetches may overlap up to the configured
    /// concurrency; results are merged in selection order.
    pub async fn analyze_project(&self, project: &Project) -> ProjectCitationReport {
        let Some(repository) = project.repository.as_ref() else {
            debug!(project = %project.id, "No repository configured");
            return ProjectCitationReport::empty(&project.catalog);
        };
        if project.repo_files_selected.is_empty() {
            debug!(project = %project.id, "No files selected");
            return ProjectCitationReport::empty(&project.catalog);
        }

        let files = project.tex_files();
        let skipped = project.repo_files_selected.len() - files.len();
        if skipped > 0 {
            debug!(skipped, "Ignoring selected files without a .tex extension");
        }

        // Owned paths and fetcher keep the stream future `Send`.
        let files: Vec<String> = files.into_iter().map(str::to_string).collect();
        let fetcher = Arc::clone(&self.fetcher);
        let git_ref = repository.git_ref.clone();
        let fetched: Vec<(String, Result<String, FetchError>)> = stream::iter(files)
            .map(move |path| {
                let fetcher = Arc::clone(&fetcher);
                let git_ref = git_ref.clone();
                async move {
                    let result = fetcher.fetch(&git_ref, &path).await;
                    (path, result)
                }
            })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let mut builder = ReportBuilder::new();
        for (path, result) in fetched {
            let path = path.as_str();
            match result {
                Ok(text) => {
                    let analysis = analyze_document(&text);
                    self.check_consistency(path, &analysis);
                    debug!(
                        path,
                        citations = analysis.citations.citations.len(),
                        sentences = analysis.sentence_count(),
                        headings = analysis.structure.len(),
                        "Analyzed file"
                    );
                    builder.add_file(path, analysis);
                }
                Err(e) => {
                    warn!(path, error = %e, "Skipping file that could not be fetched");
                    builder.add_failure(path, e.to_string());
                }
            }
        }

        let report = builder.finish(&project.catalog);
        info!(
            project = %project.id,
            repository = %repository.full_name(),
            files = report.files.len(),
            failed = report.failed_files.len(),
            citations = report.total_citations,
            sentences = report.total_sentences,
            "Citation report ready"
        );
        report
    }

    /// Warn when the shallowest headings account for noticeably fewer or
    /// more citations than the whole file. A file without headings has an
    /// outline total of zero. Never fails the analysis; returns whether a
    /// warning was emitted.
    fn check_consistency(&self, path: &str, analysis: &DocumentAnalysis) -> bool {
        let outline_total = analysis.top_level_citation_count();
        let file_total = analysis.citations.citations.len();
        let mismatch = outline_total.abs_diff(file_total) > self.settings.mismatch_tolerance;
        if mismatch {
            warn!(
                path,
                outline_total,
                file_total,
                "Top-level heading citations differ from file total"
            );
        }
        mismatch
    }
}
