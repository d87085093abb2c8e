//! Project discovery and deploy pipelines for lhs-deployer.
//!
//! A [`DeploymentOrchestrator`] finds projects on disk and hands each deploy
//! request to the matching [`ProjectDeployer`], which runs its commands
//! through a [`CommandPipeline`].

pub mod orchestrator;
pub mod pipeline;
pub mod project;

#[cfg(test)]
mod testing;

pub use orchestrator::{DeployOutcome, DeploymentOrchestrator, ProjectSummary};
pub use pipeline::CommandPipeline;
pub use project::{DeployOptions, ProjectDeployer};
