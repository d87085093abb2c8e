//! Deploy identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a single deploy request in logs.
/// Uses UUIDv7 so ids sort by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct DeployId(Uuid);

impl DeployId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for DeployId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for DeployId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
