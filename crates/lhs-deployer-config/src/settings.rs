//! Per-project settings file parsing.

use crate::{ConfigError, ConfigResult};
use lhs_deployer_core::Command;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed contents of a project's settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Declared commands, in file order.
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl ProjectSettings {
    /// Read and parse the settings file at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        parse_settings(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Names of the declared commands, in order.
    pub fn command_names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name.clone()).collect()
    }
}

/// Parse settings from JSON text.
pub fn parse_settings(json: &str) -> ConfigResult<ProjectSettings> {
    let settings: ProjectSettings =
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: Default::default(),
            source,
        })?;

    // A blank step has no program to run
    for command in &settings.commands {
        if let Some(idx) = command.steps.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: format!("commands[{}].steps[{}]", command.name, idx),
                message: "step must not be empty".to_string(),
            });
        }
    }

    Ok(settings)
}
