//! Configuration parsing for lhs-deployer.
//!
//! This crate handles parsing of:
//! - Per-project settings files (`lhs-deployer-settings.json`)
//! - Server configuration from flags and environment variables

pub mod error;
pub mod server;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use server::{DEFAULT_SETTINGS_FILENAME, ServerConfig};
pub use settings::ProjectSettings;
