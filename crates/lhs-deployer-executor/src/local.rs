//! Runs steps as local child processes.

use async_trait::async_trait;
use lhs_deployer_core::runner::{StepOutput, StepRunner};
use lhs_deployer_core::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Step runner that spawns the step as a child process of the server.
///
/// The step line is split on whitespace into program and arguments; there
/// is no shell quoting, so an argument cannot contain a space.
#[derive(Debug, Clone, Default)]
pub struct LocalStepRunner {
    timeout: Option<Duration>,
}

impl LocalStepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill steps that run longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl StepRunner for LocalStepRunner {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn run(&self, working_dir: &Path, step: &str) -> Result<StepOutput> {
        let mut args = step.split_whitespace();
        let program = args
            .next()
            .ok_or_else(|| Error::InvalidInput("empty step".to_string()))?;

        debug!(program = %program, dir = %working_dir.display(), "Spawning step");

        let child = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::ExecutionFailed(format!("failed to spawn '{}': {}", program, e)))?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    // Dropping the wait future drops the child, which kills it
                    warn!(step = %step, ?limit, "Step timed out");
                    return Err(Error::Timeout(format!(
                        "step '{}' did not finish within {:?}",
                        step, limit
                    )));
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|e| Error::ExecutionFailed(format!("failed to wait for '{}': {}", program, e)))?;

        Ok(StepOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
