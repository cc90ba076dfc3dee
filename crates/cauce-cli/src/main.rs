//! Cauce CLI - Command-line interface for cauce node graphs.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cauce")]
#[command(author, version, about = "Cauce dataflow engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a graph file
    Run(commands::run::RunArgs),

    /// List available node types
    Nodes(commands::nodes::NodesArgs),

    /// Validate a graph file without running it
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Nodes(args) => commands::nodes::run(args),
        Commands::Validate(args) => commands::validate::run(args),
    }
}
