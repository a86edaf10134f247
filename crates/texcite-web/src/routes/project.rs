//! Project route handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use texcite_core::{Catalog, ProjectCitationReport, RepoRef};

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub repository: Option<RepoRef>,
    pub repo_files_selected: Vec<String>,
    pub catalog: Catalog,
}

pub async fn get_project(State(state): State<AppState>) -> Json<ProjectSummary> {
    let project = &state.project;
    Json(ProjectSummary {
        id: project.id.clone(),
        name: project.name.clone(),
        repository: project.repository.clone(),
        repo_files_selected: project.repo_files_selected.clone(),
        catalog: project.catalog.clone(),
    })
}

/// Compute a fresh citation report. Per-file failures are reported inside
/// the body, so this always answers 200.
pub async fn get_report(State(state): State<AppState>) -> Json<ProjectCitationReport> {
    let report = state.analyzer.analyze_project(&state.project).await;
    Json(report)
}
