//! Application state.

use lhs_deployer_scheduler::DeploymentOrchestrator;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<DeploymentOrchestrator>,
    /// Branch checked out when a request asks for checkout without naming one.
    pub default_branch: Option<String>,
}

impl AppState {
    pub fn new(orchestrator: DeploymentOrchestrator, default_branch: Option<String>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            default_branch,
        }
    }
}
