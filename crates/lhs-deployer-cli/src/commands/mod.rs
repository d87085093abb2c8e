//! CLI command implementations.

pub mod run;
pub mod server;

use anyhow::{Context, Result};
use lhs_deployer_config::ProjectSettings;
use std::path::Path;

pub fn validate(path: &Path) -> Result<()> {
    let settings = ProjectSettings::load(path)
        .with_context(|| format!("Configuration error in {}", path.display()))?;

    println!("Configuration is valid");
    print_commands(&settings);
    Ok(())
}

fn print_commands(settings: &ProjectSettings) {
    if settings.commands.is_empty() {
        println!("No commands declared");
        return;
    }

    for (idx, command) in settings.commands.iter().enumerate() {
        let marker = if command.optional { " (optional)" } else { "" };
        println!("{}. {}{}", idx + 1, command.name, marker);
        for step in &command.steps {
            println!("     $ {}", step);
        }
    }
}
