//! API routes.

pub mod deploy;
pub mod health;
pub mod projects;

use crate::AppState;
use axum::Router;
use axum::routing::get;

/// Build the main API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health).post(deploy::deploy))
        .route("/projects", get(projects::list_projects))
        .with_state(state)
}
