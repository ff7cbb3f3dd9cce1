//! Fundtrace: synthetic grant-to-treatment citation networks.
//! Entry point for the `fundtrace` binary.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fundtrace_db::OutputFormat;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fundtrace", version, about = "Synthetic research-funding citation networks")]
struct Cli {
    /// Path to fundtrace.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a catalog of networks and write it to every configured sink
    Generate {
        /// Run seed; omit for a non-reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output format (sqlite, csv, json); repeatable
        #[arg(long = "format", value_parser = parse_format)]
        formats: Vec<OutputFormat>,

        /// Template catalog (YAML, JSON or TOML) replacing the configured networks
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Seed every network from (run seed, network id)
        #[arg(long)]
        independent: bool,

        /// Generate networks in parallel; implies --independent
        #[arg(long)]
        parallel: bool,
    },
    /// Check a stored dataset against the structural invariants
    Validate {
        /// SQLite store or JSON dataset
        #[arg(long)]
        db: PathBuf,

        /// Chains every network must realize
        #[arg(long, default_value_t = 1)]
        min_chains: usize,
    },
    /// Print the per-network summary of a stored dataset
    Summary {
        /// SQLite store or JSON dataset
        #[arg(long)]
        db: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Rewrite one stored network to a new disease/treatment template
    Retheme {
        /// SQLite store or JSON dataset, rewritten in place
        #[arg(long)]
        db: PathBuf,

        /// Network id to rewrite
        #[arg(long)]
        network: u32,

        /// Template file (YAML, JSON or TOML)
        #[arg(long)]
        template: PathBuf,
    },
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    value.parse().map_err(|e: fundtrace_db::DbError| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fundtrace=debug,info")),
        )
        .init();

    let cli = Cli::parse();
    info!("fundtrace {}", env!("CARGO_PKG_VERSION"));

    let (config, source) = config::Config::load(cli.config.as_deref())?;
    match &source {
        Some(path) => info!(path = %path.display(), networks = config.networks.len(), "Configuration loaded"),
        None => info!(networks = config.networks.len(), "No fundtrace.toml found, using built-in catalog"),
    }

    match cli.command {
        Commands::Generate { seed, out, formats, catalog, independent, parallel } => {
            let args = commands::GenerateArgs { seed, out, formats, catalog, independent, parallel };
            commands::generate(&config, args).await
        }
        Commands::Validate { db, min_chains } => commands::validate(&db, min_chains).await,
        Commands::Summary { db, json } => commands::summary(&db, json).await,
        Commands::Retheme { db, network, template } => {
            commands::retheme(&db, network, &template).await
        }
    }
}
