//! A single deployable project.

use lhs_deployer_config::{ConfigResult, ProjectSettings};
use lhs_deployer_core::{Command, CommandResult};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

use crate::pipeline::CommandPipeline;

pub const PULL_COMMAND: &str = "Pull new code";
pub const CHECKOUT_COMMAND: &str = "Checkout default branch";

/// What to run ahead of a project's declared commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    /// Run `git pull` first; a failing pull halts the deploy.
    pub pull: bool,
    /// Branch to check out after pulling; a failing checkout is ignored.
    pub checkout_branch: Option<String>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            pull: true,
            checkout_branch: None,
        }
    }
}

/// A project directory and the settings read from it at discovery.
///
/// Settings are never reloaded: edits to the settings file take effect on
/// the next server start.
pub struct ProjectDeployer {
    name: String,
    base_path: PathBuf,
    settings: ProjectSettings,
    /// Held for the whole of a deploy so one project never runs two at once.
    lock: Mutex<()>,
}

impl ProjectDeployer {
    pub fn new(name: impl Into<String>, base_path: impl Into<PathBuf>, settings: ProjectSettings) -> Self {
        Self {
            name: name.into(),
            base_path: base_path.into(),
            settings,
            lock: Mutex::new(()),
        }
    }

    /// Read `settings_filename` from `base_path`.
    pub fn load(
        name: impl Into<String>,
        base_path: impl Into<PathBuf>,
        settings_filename: &str,
    ) -> ConfigResult<Self> {
        let base_path = base_path.into();
        let settings = ProjectSettings::load(&base_path.join(settings_filename))?;
        Ok(Self::new(name, base_path, settings))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// The full run list for one deploy: pull, then checkout, then the
    /// declared commands.
    pub fn commands_for(&self, options: &DeployOptions) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.settings.commands.len() + 2);

        if options.pull {
            commands.push(Command::required(PULL_COMMAND, vec!["git pull".to_string()]));
        }

        if let Some(branch) = options
            .checkout_branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
        {
            commands.push(Command::optional(
                CHECKOUT_COMMAND,
                vec![format!("git checkout {}", branch)],
            ));
        }

        commands.extend(self.settings.commands.iter().cloned());
        commands
    }

    /// Run the project's pipeline, waiting for any deploy of this project
    /// already in progress.
    pub async fn deploy(&self, pipeline: &CommandPipeline, options: &DeployOptions) -> CommandResult {
        let _guard = match self.lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                info!(project = %self.name, "Waiting for running deploy to finish");
                self.lock.lock().await
            }
        };

        let commands = self.commands_for(options);
        pipeline.run(&self.base_path, &commands).await
    }
}

impl std::fmt::Debug for ProjectDeployer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectDeployer")
            .field("name", &self.name)
            .field("base_path", &self.base_path)
            .field("commands", &self.settings.commands.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingRunner, steps};
    use std::sync::Arc;
    use std::time::Duration;

    fn project(commands: Vec<Command>) -> ProjectDeployer {
        ProjectDeployer::new("web", "/srv/web", ProjectSettings { commands })
    }

    fn options(pull: bool, branch: Option<&str>) -> DeployOptions {
        DeployOptions {
            pull,
            checkout_branch: branch.map(String::from),
        }
    }

    #[test]
    fn test_synthetic_commands_come_first() {
        let deployer = project(vec![Command::required("Build", steps(&["make"]))]);

        let names: Vec<_> = deployer
            .commands_for(&options(true, Some("main")))
            .into_iter()
            .map(|c| (c.name, c.optional))
            .collect();

        assert_eq!(
            names,
            vec![
                (PULL_COMMAND.to_string(), false),
                (CHECKOUT_COMMAND.to_string(), true),
                ("Build".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_flags_are_honored_literally() {
        let deployer = project(vec![Command::required("Build", steps(&["make"]))]);

        let commands = deployer.commands_for(&options(false, None));
        assert_eq!(commands.len(), 1);

        let commands = deployer.commands_for(&options(false, Some("  ")));
        assert_eq!(commands.len(), 1);

        let commands = deployer.commands_for(&options(false, Some("release")));
        assert_eq!(commands[0].steps, vec!["git checkout release"]);
    }

    #[test]
    fn test_declared_commands_are_not_mutated() {
        let deployer = project(vec![Command::required("Build", steps(&["make"]))]);

        deployer.commands_for(&options(true, Some("main")));
        deployer.commands_for(&options(true, Some("main")));

        assert_eq!(deployer.settings().commands.len(), 1);
        assert_eq!(deployer.commands_for(&options(true, Some("main"))).len(), 3);
    }

    #[tokio::test]
    async fn test_pull_only_with_no_commands() {
        let runner = Arc::new(RecordingRunner::new());
        let pipeline = CommandPipeline::new(runner.clone());

        let result = project(vec![]).deploy(&pipeline, &options(true, None)).await;

        assert!(result.is_success());
        assert_eq!(runner.steps(), vec!["git pull"]);
    }

    #[tokio::test]
    async fn test_failing_checkout_does_not_halt() {
        let runner = Arc::new(RecordingRunner::new().failing(
            "git checkout main",
            1,
            "error: pathspec 'main' did not match",
        ));
        let pipeline = CommandPipeline::new(runner.clone());
        let deployer = project(vec![Command::required("Build", steps(&["make"]))]);

        let result = deployer.deploy(&pipeline, &options(true, Some("main"))).await;

        assert!(result.is_success());
        assert_eq!(runner.steps(), vec!["git pull", "git checkout main", "make"]);
    }

    #[tokio::test]
    async fn test_failing_pull_halts() {
        let runner = Arc::new(RecordingRunner::new().failing("git pull", 1, "no remote"));
        let pipeline = CommandPipeline::new(runner.clone());
        let deployer = project(vec![Command::required("Build", steps(&["make"]))]);

        let result = deployer.deploy(&pipeline, &options(true, Some("main"))).await;

        let details = result.details().unwrap();
        assert_eq!(details.command, PULL_COMMAND);
        assert_eq!(details.step, "git pull");
        assert_eq!(runner.steps(), vec!["git pull"]);
    }

    #[tokio::test]
    async fn test_same_project_deploys_do_not_overlap() {
        let runner = Arc::new(RecordingRunner::new().with_delay(Duration::from_millis(20)));
        let pipeline = CommandPipeline::new(runner.clone());
        let deployer = project(vec![Command::required("Build", steps(&["one", "two"]))]);

        let first = options(false, None);
        let second = options(false, None);
        let (a, b) = tokio::join!(
            deployer.deploy(&pipeline, &first),
            deployer.deploy(&pipeline, &second),
        );

        assert!(a.is_success() && b.is_success());
        assert_eq!(runner.steps(), vec!["one", "two", "one", "two"]);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"commands": [{"name": "Build", "steps": ["make"]}]}"#,
        )
        .unwrap();

        let deployer = ProjectDeployer::load("app", dir.path(), "settings.json").unwrap();
        assert_eq!(deployer.name(), "app");
        assert_eq!(deployer.base_path(), dir.path());
        assert_eq!(deployer.settings().command_names(), vec!["Build"]);

        assert!(ProjectDeployer::load("app", dir.path(), "other.json").is_err());
    }
}
