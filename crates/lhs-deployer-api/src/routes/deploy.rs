//! Deploy trigger endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use lhs_deployer_scheduler::{DeployOptions, DeployOutcome};
use serde_json::{Map, Value};
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

/// A deploy request as sent by the caller.
///
/// The body is read leniently: anything that is not a JSON object counts as
/// an empty object, so defaults apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployRequest {
    pub project: Option<String>,
    pub pull: bool,
    pub checkout: Checkout,
}

/// What the `checkout` field asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Checkout {
    /// Check out the server's configured branch.
    #[default]
    Default,
    Branch(String),
    Skip,
}

impl DeployRequest {
    pub fn from_body(body: &[u8]) -> Self {
        let fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) | Err(_) => {
                debug!("Deploy body is not a JSON object, using defaults");
                Map::new()
            }
        };

        let project = match fields.get("project") {
            Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
            _ => None,
        };

        let pull = fields.get("pull").map(is_truthy).unwrap_or(true);

        let checkout = match fields.get("checkout") {
            None | Some(Value::Null) | Some(Value::Bool(true)) => Checkout::Default,
            Some(Value::Bool(false)) => Checkout::Skip,
            Some(Value::String(branch)) if branch.trim().is_empty() => Checkout::Skip,
            Some(Value::String(branch)) => Checkout::Branch(branch.trim().to_string()),
            Some(other) if is_truthy(other) => Checkout::Default,
            Some(_) => Checkout::Skip,
        };

        Self {
            project,
            pull,
            checkout,
        }
    }

    pub fn options(&self, default_branch: Option<&str>) -> DeployOptions {
        let checkout_branch = match &self.checkout {
            Checkout::Default => default_branch.map(String::from),
            Checkout::Branch(branch) => Some(branch.clone()),
            Checkout::Skip => None,
        };

        DeployOptions {
            pull: self.pull,
            checkout_branch,
        }
    }
}

/// A requested branch must reach `git checkout` as a single argument that
/// git cannot read as an option.
fn is_valid_branch(branch: &str) -> bool {
    !branch.is_empty() && !branch.starts_with('-') && !branch.contains(char::is_whitespace)
}

/// JSON truthiness: null, false, zero and empty values are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub async fn deploy(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<DeployOutcome>), ApiError> {
    let request = DeployRequest::from_body(&body);

    let Some(project) = request.project.clone() else {
        return Err(ApiError::BadRequest("Need to specify the project".to_string()));
    };

    if let Checkout::Branch(branch) = &request.checkout {
        if !is_valid_branch(branch) {
            return Err(ApiError::BadRequest(format!("Invalid branch name '{}'", branch)));
        }
    }

    let options = request.options(state.default_branch.as_deref());

    // Run detached so a dropped connection does not abort a deploy midway
    let orchestrator = state.orchestrator.clone();
    let outcome =
        tokio::spawn(async move { orchestrator.deploy(&project, &options).await }).await?;

    let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(outcome)))
}
