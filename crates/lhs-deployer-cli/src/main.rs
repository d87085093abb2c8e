//! lhs-deployer CLI tool.

use clap::{Parser, Subcommand};
use lhs_deployer_config::DEFAULT_SETTINGS_FILENAME;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lhs-deployer")]
#[command(about = "Operate an lhs-deployer server and its projects", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "LHS_DEPLOYER_URL", default_value = "http://localhost:8069")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project settings file
    Validate {
        /// Path to the settings file
        #[arg(default_value = DEFAULT_SETTINGS_FILENAME)]
        path: PathBuf,
    },
    /// Run a project's pipeline on this machine
    Run {
        /// Project directory
        project_dir: PathBuf,
        /// Settings file name inside the project directory
        #[arg(long, env = "SETTINGS_FILENAME", default_value = DEFAULT_SETTINGS_FILENAME)]
        settings_filename: String,
        /// Skip `git pull`
        #[arg(long)]
        no_pull: bool,
        /// Branch to check out before the declared commands
        #[arg(long)]
        branch: Option<String>,
    },
    /// Ask the server to deploy a project
    Trigger {
        /// Project name
        project: String,
        /// Skip `git pull`
        #[arg(long)]
        no_pull: bool,
        /// Branch to check out instead of the server's default
        #[arg(long, conflicts_with = "no_checkout")]
        checkout: Option<String>,
        /// Skip the branch checkout
        #[arg(long)]
        no_checkout: bool,
    },
    /// Check that the server is up
    Health,
    /// List the projects the server knows about
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
        Commands::Run {
            project_dir,
            settings_filename,
            no_pull,
            branch,
        } => {
            commands::run::run_local(&project_dir, &settings_filename, !no_pull, branch).await?;
        }
        Commands::Trigger {
            project,
            no_pull,
            checkout,
            no_checkout,
        } => {
            let checkout = commands::server::CheckoutArg::from_flags(checkout, no_checkout);
            commands::server::trigger(&cli.server_url, &project, !no_pull, checkout).await?;
        }
        Commands::Health => {
            commands::server::health(&cli.server_url).await?;
        }
        Commands::List => {
            commands::server::list(&cli.server_url).await?;
        }
    }

    Ok(())
}
