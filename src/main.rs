//! Scentdex command-line interface
//!
//! Fuzzy fragrance catalog search with cached page enrichment.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use scentdex::config::{Config, LogFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scentdex")]
#[command(about = "Fuzzy fragrance catalog search with cached page enrichment")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog for a fragrance
    Search {
        /// Search query (typos and diacritics are fine)
        query: String,

        /// Maximum number of matches
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Search, pick one match, and show its enriched profile
    Show {
        /// Search query
        query: String,

        /// Which match to show, 1-based
        #[arg(short, long, default_value = "1")]
        pick: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show cache statistics
    Stats,

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing config file means defaults; a present-but-broken one is an
    // error the user should see.
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Search {
            query,
            limit,
            format,
        } => commands::search::run(config, query, limit, format),
        Commands::Show {
            query,
            pick,
            format,
        } => commands::show::run(config, query, pick, format).await,
        Commands::Stats => commands::stats::run(config),
        Commands::Init { path } => commands::init::run(path),
    }
}

fn init_tracing(config: &Config, verbose: u8) {
    let level = match verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
