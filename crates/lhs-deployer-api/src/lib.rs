//! HTTP deploy trigger for lhs-deployer.
//!
//! `POST /` deploys a project, `GET /` reports health and `GET /projects`
//! lists what was discovered at startup.

pub mod error;
pub mod routes;
pub mod state;

pub use state::AppState;
