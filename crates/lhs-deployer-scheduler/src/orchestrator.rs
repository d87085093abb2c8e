//! Deployment orchestrator - discovers projects and dispatches deploys.

use lhs_deployer_core::runner::StepRunner;
use lhs_deployer_core::{CommandResult, DeployId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::pipeline::CommandPipeline;
use crate::project::{DeployOptions, ProjectDeployer};

/// Message and HTTP status reported back to whoever asked for a deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployOutcome {
    pub message: String,
    #[serde(skip)]
    pub status: u16,
}

impl DeployOutcome {
    pub fn success() -> Self {
        Self {
            message: "Success".to_string(),
            status: 200,
        }
    }

    pub fn unknown_project(name: &str) -> Self {
        Self {
            message: format!("project '{}' doesn't exist", name),
            status: 404,
        }
    }

    pub fn from_result(result: CommandResult) -> Self {
        match result {
            CommandResult::Success => Self::success(),
            CommandResult::Failure(details) => Self {
                message: format!(
                    "Encountered an error while running. Details:\nCommand: {}, Step: '{}'\n{}: {}",
                    details.command, details.step, details.exit_code, details.stderr
                ),
                status: 500,
            },
        }
    }
}

/// A registered project as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub commands: Vec<String>,
}

/// Owns the project registry and the pipeline every deploy runs through.
pub struct DeploymentOrchestrator {
    projects: BTreeMap<String, Arc<ProjectDeployer>>,
    pipeline: CommandPipeline,
}

impl DeploymentOrchestrator {
    /// An orchestrator with no projects.
    pub fn new(runner: Arc<dyn StepRunner>) -> Self {
        Self {
            projects: BTreeMap::new(),
            pipeline: CommandPipeline::new(runner),
        }
    }

    /// Register every immediate subdirectory of `root_dir` that holds a
    /// readable `settings_filename`.
    ///
    /// Nothing here is fatal: a missing root leaves the registry empty and
    /// a project with broken settings is skipped.
    pub fn discover(root_dir: &Path, settings_filename: &str, runner: Arc<dyn StepRunner>) -> Self {
        let mut orchestrator = Self::new(runner);

        let entries = match std::fs::read_dir(root_dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!(root = %root_dir.display(), error = %e, "Couldn't read the projects directory");
                return orchestrator;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root_dir.display(), error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(String::from) else {
                warn!(path = %path.display(), "Skipping project with non UTF-8 name");
                continue;
            };

            if !path.join(settings_filename).is_file() {
                debug!(project = %name, "No settings file, skipping");
                continue;
            }

            match ProjectDeployer::load(name.clone(), path, settings_filename) {
                Ok(deployer) => orchestrator.register(deployer),
                Err(e) => warn!(project = %name, error = %e, "Skipping project with invalid settings"),
            }
        }

        info!(
            root = %root_dir.display(),
            runner = orchestrator.pipeline.runner_name(),
            projects = ?orchestrator.projects.keys().collect::<Vec<_>>(),
            "Project discovery finished"
        );

        orchestrator
    }

    /// Add a project, replacing any project registered under the same name.
    pub fn register(&mut self, deployer: ProjectDeployer) {
        debug!(project = %deployer.name(), commands = deployer.settings().commands.len(), "Registered project");
        self.projects
            .insert(deployer.name().to_string(), Arc::new(deployer));
    }

    pub fn get(&self, name: &str) -> Option<Arc<ProjectDeployer>> {
        self.projects.get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Registered projects, sorted by name.
    pub fn projects(&self) -> Vec<ProjectSummary> {
        self.projects
            .values()
            .map(|p| ProjectSummary {
                name: p.name().to_string(),
                commands: p.settings().command_names(),
            })
            .collect()
    }

    /// Deploy `project` and describe the result.
    pub async fn deploy(&self, project: &str, options: &DeployOptions) -> DeployOutcome {
        let Some(deployer) = self.get(project) else {
            info!(project = %project, "Deploy requested for unknown project");
            return DeployOutcome::unknown_project(project);
        };

        let span = info_span!("deploy", id = %DeployId::new(), project = %project);
        async move {
            info!(pull = options.pull, checkout = ?options.checkout_branch, "Deploy started");
            let result = deployer.deploy(&self.pipeline, options).await;
            if result.is_success() {
                info!("Deploy succeeded");
            } else {
                error!("Deploy failed");
            }
            DeployOutcome::from_result(result)
        }
        .instrument(span)
        .await
    }
}
