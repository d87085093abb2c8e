//! Commands and their results.
//!
//! A [`Command`] is a named group of shell steps that share one
//! optional/required policy. Running a list of commands yields a
//! [`CommandResult`].

use serde::{Deserialize, Serialize};

/// A named, ordered group of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Human readable name, reported back on failure.
    pub name: String,
    /// Step lines, executed in order.
    pub steps: Vec<String>,
    /// Failures of an optional command never halt the pipeline.
    #[serde(default)]
    pub optional: bool,
}

impl Command {
    /// A command whose failing step halts the pipeline.
    pub fn required(name: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            name: name.into(),
            steps,
            optional: false,
        }
    }

    /// A command whose failing steps are skipped over.
    pub fn optional(name: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            name: name.into(),
            steps,
            optional: true,
        }
    }
}

/// Describes the one step that halted a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub exit_code: i32,
    pub stderr: String,
    /// Name of the command owning the failing step.
    pub command: String,
    /// The failing step line, verbatim.
    pub step: String,
}

/// Terminal outcome of running a command or a whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandResult {
    Success,
    Failure(ErrorDetails),
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success)
    }

    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            CommandResult::Success => None,
            CommandResult::Failure(details) => Some(details),
        }
    }
}
