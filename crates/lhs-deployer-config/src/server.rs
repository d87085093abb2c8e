//! Server configuration.
//!
//! Every option can be given as a flag or through the environment variable
//! named next to it.

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::{ConfigError, ConfigResult};

pub const DEFAULT_SETTINGS_FILENAME: &str = "lhs-deployer-settings.json";

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Directory whose subdirectories are the deployable projects
    #[arg(long, env = "PROJECTS_DIR")]
    pub projects_dir: PathBuf,

    /// Name of the settings file inside each project directory
    #[arg(long, env = "SETTINGS_FILENAME", default_value = DEFAULT_SETTINGS_FILENAME)]
    pub settings_filename: String,

    /// Branch checked out before the declared commands when checkout is requested
    #[arg(long, env = "BRANCH_NAME", default_value = "")]
    pub branch_name: String,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8069)]
    pub port: u16,

    /// Kill a step that runs longer than this many seconds (no limit when unset)
    #[arg(long, env = "STEP_TIMEOUT_SECS")]
    pub step_timeout_secs: Option<u64>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e| ConfigError::InvalidValue {
            field: "HOST".to_string(),
            message: format!("{}: {}", addr, e),
        })
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }

    /// The configured branch, or `None` when `BRANCH_NAME` is empty.
    pub fn default_branch(&self) -> Option<&str> {
        let branch = self.branch_name.trim();
        if branch.is_empty() { None } else { Some(branch) }
    }
}
