//! Local pipeline execution command.

use anyhow::{Context, Result};
use lhs_deployer_executor::LocalStepRunner;
use lhs_deployer_scheduler::{CommandPipeline, DeployOptions, DeployOutcome, ProjectDeployer};
use std::path::Path;
use std::sync::Arc;

/// Run a project's pipeline in `project_dir` with local processes.
pub async fn run_local(
    project_dir: &Path,
    settings_filename: &str,
    pull: bool,
    branch: Option<String>,
) -> Result<()> {
    let project_dir = project_dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve project directory: {}", project_dir.display()))?;

    let name = project_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| project_dir.display().to_string());

    let deployer = ProjectDeployer::load(name.clone(), project_dir.clone(), settings_filename)
        .with_context(|| format!("Failed to load settings for {}", name))?;

    let options = DeployOptions {
        pull,
        checkout_branch: branch,
    };

    println!("Running pipeline: {}", name);
    println!("Working directory: {}", project_dir.display());
    for command in deployer.commands_for(&options) {
        let marker = if command.optional { " (optional)" } else { "" };
        println!("  - {}{}", command.name, marker);
    }
    println!("\n--- Starting pipeline execution ---\n");

    let pipeline = CommandPipeline::new(Arc::new(LocalStepRunner::new()));
    let outcome = DeployOutcome::from_result(deployer.deploy(&pipeline, &options).await);

    println!("\n{}", outcome.message);
    if outcome.status != 200 {
        anyhow::bail!("Pipeline failed for {}", name);
    }

    Ok(())
}
