//! Core domain types and traits for lhs-deployer.
//!
//! This crate contains:
//! - Deploy identifiers
//! - Command, error detail and result types
//! - The step runner trait used to execute a single shell step

pub mod command;
pub mod error;
pub mod id;
pub mod runner;

pub use command::{Command, CommandResult, ErrorDetails};
pub use error::{Error, Result};
pub use id::DeployId;
pub use runner::{StepOutput, StepRunner};
