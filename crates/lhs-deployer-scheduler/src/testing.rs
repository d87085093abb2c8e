//! Step runner double shared by the tests in this crate.

use async_trait::async_trait;
use lhs_deployer_core::runner::{StepOutput, StepRunner};
use lhs_deployer_core::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Records every call and answers from a table of scripted failures.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<(PathBuf, String)>>,
    failures: HashMap<String, StepOutput>,
    spawn_errors: Vec<String>,
    delay: Option<Duration>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, step: &str, exit_code: i32, stderr: &str) -> Self {
        self.failures.insert(
            step.to_string(),
            StepOutput {
                exit_code,
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn unspawnable(mut self, step: &str) -> Self {
        self.spawn_errors.push(step.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, step)| step).collect()
    }
}

#[async_trait]
impl StepRunner for RecordingRunner {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn run(&self, working_dir: &Path, step: &str) -> Result<StepOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((working_dir.to_path_buf(), step.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.spawn_errors.iter().any(|s| s == step) {
            return Err(Error::ExecutionFailed(format!("failed to spawn '{}'", step)));
        }

        Ok(self
            .failures
            .get(step)
            .cloned()
            .unwrap_or_else(StepOutput::success))
    }
}

pub fn steps(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}
