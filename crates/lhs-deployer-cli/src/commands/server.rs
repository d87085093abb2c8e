//! Commands that talk to a running server.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Value, json};

/// How the `checkout` field of a trigger request is filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutArg {
    ServerDefault,
    Branch(String),
    Skip,
}

impl CheckoutArg {
    pub fn from_flags(branch: Option<String>, skip: bool) -> Self {
        match (branch, skip) {
            (_, true) => CheckoutArg::Skip,
            (Some(branch), false) => CheckoutArg::Branch(branch),
            (None, false) => CheckoutArg::ServerDefault,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    projects: Vec<ProjectEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectEntry {
    name: String,
    commands: Vec<String>,
}

pub fn trigger_body(project: &str, pull: bool, checkout: &CheckoutArg) -> Value {
    let mut body = json!({ "project": project, "pull": pull });
    match checkout {
        CheckoutArg::ServerDefault => {}
        CheckoutArg::Branch(branch) => body["checkout"] = json!(branch),
        CheckoutArg::Skip => body["checkout"] = json!(false),
    }
    body
}

pub async fn trigger(server_url: &str, project: &str, pull: bool, checkout: CheckoutArg) -> Result<()> {
    let url = base_url(server_url);
    println!("Triggering deploy of {}", project);

    let response = reqwest::Client::new()
        .post(&url)
        .json(&trigger_body(project, pull, &checkout))
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    let body: MessageResponse = response
        .json()
        .await
        .context("Server returned an unexpected response")?;

    println!("{}", body.message);
    if !status.is_success() {
        anyhow::bail!("Deploy of {} failed with status {}", project, status);
    }
    Ok(())
}

pub async fn health(server_url: &str) -> Result<()> {
    let url = base_url(server_url);
    let body: Value = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach {}", url))?
        .error_for_status()?
        .json()
        .await?;

    println!("{}", body["health"].as_str().unwrap_or("unknown"));
    Ok(())
}

pub async fn list(server_url: &str) -> Result<()> {
    let url = format!("{}/projects", server_url.trim_end_matches('/'));
    let body: ProjectsResponse = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach {}", url))?
        .error_for_status()?
        .json()
        .await?;

    if body.projects.is_empty() {
        println!("No projects registered");
    }
    for project in body.projects {
        println!("{}: {}", project.name, project.commands.join(", "));
    }
    Ok(())
}

fn base_url(server_url: &str) -> String {
    format!("{}/", server_url.trim_end_matches('/'))
}
