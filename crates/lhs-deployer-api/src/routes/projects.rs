//! Registered project listing.

use axum::Json;
use axum::extract::State;
use lhs_deployer_scheduler::ProjectSummary;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectSummary>,
}

pub async fn list_projects(State(state): State<AppState>) -> Json<ProjectsResponse> {
    Json(ProjectsResponse {
        projects: state.orchestrator.projects(),
    })
}
