//! Step runner trait.
//!
//! A step runner executes one step line inside a working directory and
//! reports how it exited. Implementations must take the working directory
//! per call and never change the process-wide current directory, so that
//! deploys of different projects can run side by side.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Exit status and captured stderr of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutput {
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stderr: String,
}

impl StepOutput {
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            stderr: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for step runners.
#[async_trait]
pub trait StepRunner: Send + Sync {
    /// Name of this runner.
    fn name(&self) -> &'static str;

    /// Run `step` with `working_dir` as the child's current directory and
    /// wait for it to finish.
    ///
    /// Returns `Err` only when the step could not be run at all (empty line,
    /// spawn failure, timeout). A step that ran and exited non-zero is an
    /// `Ok` output with that exit code.
    async fn run(&self, working_dir: &Path, step: &str) -> Result<StepOutput>;
}
