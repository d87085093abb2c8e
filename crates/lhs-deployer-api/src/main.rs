//! lhs-deployer server

use anyhow::Context;
use clap::Parser;
use lhs_deployer_api::{AppState, routes};
use lhs_deployer_config::ServerConfig;
use lhs_deployer_executor::LocalStepRunner;
use lhs_deployer_scheduler::DeploymentOrchestrator;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lhs-deployer-server")]
#[command(about = "Runs project deploy pipelines on HTTP request", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().config;
    let addr = config.socket_addr()?;

    // Discover projects once; later additions need a restart
    let runner = Arc::new(LocalStepRunner::with_timeout(config.step_timeout()));
    let orchestrator =
        DeploymentOrchestrator::discover(&config.projects_dir, &config.settings_filename, runner);
    if orchestrator.is_empty() {
        warn!(projects_dir = %config.projects_dir.display(), "No projects found");
    }

    let state = AppState::new(orchestrator, config.default_branch().map(String::from));

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
