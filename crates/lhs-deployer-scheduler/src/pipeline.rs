//! Sequential command pipeline.

use lhs_deployer_core::runner::{StepOutput, StepRunner};
use lhs_deployer_core::{Command, CommandResult, ErrorDetails};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Runs commands one after another, stopping at the first failing step of
/// a required command.
#[derive(Clone)]
pub struct CommandPipeline {
    runner: Arc<dyn StepRunner>,
}

impl CommandPipeline {
    pub fn new(runner: Arc<dyn StepRunner>) -> Self {
        Self { runner }
    }

    pub fn runner_name(&self) -> &'static str {
        self.runner.name()
    }

    /// Run `commands` in order with `working_dir` as every step's directory.
    ///
    /// A step that cannot be started at all counts as a failure with exit
    /// code `-1` and the runner's error as stderr.
    pub async fn run(&self, working_dir: &Path, commands: &[Command]) -> CommandResult {
        for command in commands {
            info!(command = %command.name, optional = command.optional, "Running command");

            for step in &command.steps {
                let output = match self.runner.run(working_dir, step).await {
                    Ok(output) => output,
                    Err(e) => StepOutput {
                        exit_code: -1,
                        stderr: e.to_string(),
                    },
                };

                if output.is_success() {
                    info!(command = %command.name, step = %step, "Step succeeded");
                    continue;
                }

                if command.optional {
                    warn!(
                        command = %command.name,
                        step = %step,
                        exit_code = output.exit_code,
                        "Optional step failed, continuing"
                    );
                    continue;
                }

                error!(
                    command = %command.name,
                    step = %step,
                    exit_code = output.exit_code,
                    stderr = %output.stderr.trim_end(),
                    "Step failed"
                );
                return CommandResult::Failure(ErrorDetails {
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                    command: command.name.clone(),
                    step: step.clone(),
                });
            }
        }

        CommandResult::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingRunner, steps};
    use std::path::PathBuf;

    fn pipeline(runner: &Arc<RecordingRunner>) -> CommandPipeline {
        CommandPipeline::new(runner.clone())
    }

    #[tokio::test]
    async fn test_runs_every_step_once_in_order() {
        let runner = Arc::new(RecordingRunner::new());
        let commands = vec![
            Command::required("Install", steps(&["npm ci", "npm run build"])),
            Command::optional("Warm", steps(&["curl localhost"])),
            Command::required("Restart", steps(&["systemctl restart app"])),
        ];

        let result = pipeline(&runner).run(Path::new("/srv/app"), &commands).await;

        assert_eq!(result, CommandResult::Success);
        assert_eq!(
            runner.steps(),
            vec!["npm ci", "npm run build", "curl localhost", "systemctl restart app"]
        );
        assert!(
            runner
                .calls()
                .iter()
                .all(|(dir, _)| dir == &PathBuf::from("/srv/app"))
        );
    }

    #[tokio::test]
    async fn test_required_failure_stops_pipeline() {
        let runner = Arc::new(RecordingRunner::new().failing("make test", 2, "1 test failed\n"));
        let commands = vec![
            Command::required("Build", steps(&["make"])),
            Command::required("Test", steps(&["make test", "make lint"])),
            Command::required("Restart", steps(&["systemctl restart app"])),
        ];

        let result = pipeline(&runner).run(Path::new("/srv/app"), &commands).await;

        assert_eq!(
            result,
            CommandResult::Failure(ErrorDetails {
                exit_code: 2,
                stderr: "1 test failed\n".to_string(),
                command: "Test".to_string(),
                step: "make test".to_string(),
            })
        );
        assert_eq!(runner.steps(), vec!["make", "make test"]);
    }

    #[tokio::test]
    async fn test_first_required_failure_is_reported() {
        let runner = Arc::new(
            RecordingRunner::new()
                .failing("a-2", 1, "first")
                .failing("b-1", 3, "second"),
        );
        let commands = vec![
            Command::required("A", steps(&["a-1", "a-2"])),
            Command::required("B", steps(&["b-1"])),
        ];

        let result = pipeline(&runner).run(Path::new("/p"), &commands).await;

        let details = result.details().unwrap();
        assert_eq!(details.command, "A");
        assert_eq!(details.step, "a-2");
        assert_eq!(details.exit_code, 1);
        assert_eq!(runner.steps(), vec!["a-1", "a-2"]);
    }

    #[tokio::test]
    async fn test_optional_command_failing_every_step_still_succeeds() {
        let runner = Arc::new(
            RecordingRunner::new()
                .failing("o-1", 1, "nope")
                .failing("o-2", 1, "nope"),
        );
        let commands = vec![
            Command::optional("Optional", steps(&["o-1", "o-2"])),
            Command::required("After", steps(&["after"])),
        ];

        let result = pipeline(&runner).run(Path::new("/p"), &commands).await;

        assert!(result.is_success());
        assert_eq!(runner.steps(), vec!["o-1", "o-2", "after"]);
    }

    #[tokio::test]
    async fn test_spawn_error_is_a_failure() {
        let runner = Arc::new(RecordingRunner::new().unspawnable("missing-binary"));
        let commands = vec![
            Command::optional("Optional", steps(&["missing-binary"])),
            Command::required("Required", steps(&["missing-binary", "never"])),
        ];

        let result = pipeline(&runner).run(Path::new("/p"), &commands).await;

        let details = result.details().unwrap();
        assert_eq!(details.command, "Required");
        assert_eq!(details.exit_code, -1);
        assert!(details.stderr.contains("missing-binary"));
        assert_eq!(runner.steps(), vec!["missing-binary", "missing-binary"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let runner = Arc::new(RecordingRunner::new());
        let result = pipeline(&runner).run(Path::new("/p"), &[]).await;
        assert!(result.is_success());
        assert!(runner.calls().is_empty());
    }
}
