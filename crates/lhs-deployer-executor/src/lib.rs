//! Step execution backends for lhs-deployer.
//!
//! Provides runner implementations for executing deploy steps:
//! - Local processes (production)

pub mod local;

pub use lhs_deployer_core::runner::{StepOutput, StepRunner};
pub use local::LocalStepRunner;
