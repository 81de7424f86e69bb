//! Berth - Deployment Inventory Reporting
//!
//! Usage:
//!   berth ls              # List deployments across every application
//!   berth ls <app>        # List deployments of one application
//!   berth ls <app> --all  # Expand every deployment and its instances

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use berth_core::api::HttpClient;
use berth_core::commands::{ListCommand, ListOptions};
use berth_core::config::Credentials;

#[derive(Parser)]
#[command(name = "berth")]
#[command(about = "Deployment inventory reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List deployments grouped by application
    #[command(alias = "list")]
    Ls {
        /// Application name, deployment id, URL, or alias to resolve
        app: Option<String>,

        /// List every deployment per application and its instances
        /// (requires an application name)
        #[arg(short, long)]
        all: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "berth=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_cli(command: Commands) -> Result<()> {
    match command {
        Commands::Ls { app, all } => run_ls(app, all),
    }
}

fn run_ls(app: Option<String>, all: bool) -> Result<()> {
    let credentials = Credentials::load()?;
    let api = HttpClient::new(&credentials)?;

    // Probed once; drives the width arithmetic in the renderer.
    let styled = console::Term::stdout().features().colors_supported();
    tracing::debug!(styled, "terminal styling probed");

    let mut options = ListOptions::new().with_all(all).with_styled(styled);
    if let Some(app) = app {
        options = options.with_app(app);
    }

    let command = ListCommand::new(Arc::new(api), credentials.scope_name());
    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(command.execute(&options))?;

    print!("{}", report.output);
    Ok(())
}
