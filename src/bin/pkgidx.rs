//! CLI entry point for the `pkgidx` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use pkg_index::cli::commands;
use pkg_index::{IndexError, IndexerConfig};

#[derive(Parser)]
#[command(
    name = "pkgidx",
    about = "Segmented index builder for package search"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the newest done docdb segment, then collect stale index segments
    Index,
    /// Delete every index segment except the newest done one
    Clean,
    /// List docdb and index segments
    Segments,
    /// Import a JSON array of document records as a new docdb segment
    Import {
        /// Path to the JSON file
        json_file: PathBuf,
    },
    /// Print the leaderboards of the current index
    Stats {
        /// Rows per leaderboard (defaults to the config's top_n)
        #[arg(long)]
        top: Option<usize>,
    },
    /// Find packages containing every query term
    Search {
        /// Query terms
        #[arg(required = true)]
        terms: Vec<String>,
        /// Maximum results
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Write the effective configuration to a TOML file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => match IndexerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(5);
            }
        },
        None => IndexerConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let result = match cli.command {
        Commands::Index => commands::cmd_index(&config, json),
        Commands::Clean => commands::cmd_clean(&config, json),
        Commands::Segments => commands::cmd_segments(&config, json),
        Commands::Import { json_file } => commands::cmd_import(&config, &json_file, json),
        Commands::Stats { top } => {
            commands::cmd_stats(&config, top.unwrap_or(config.top_n), json)
        }
        Commands::Search { terms, limit } => {
            commands::cmd_search(&config, &terms.join(" "), limit, json)
        }
        Commands::InitConfig { path } => commands::cmd_init_config(&config, &path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            IndexError::Io(_) | IndexError::Allocation { .. } => 1,
            IndexError::InvalidMagic
            | IndexError::UnsupportedVersion(_)
            | IndexError::Truncated
            | IndexError::Corrupt(_)
            | IndexError::Compression(_) => 2,
            IndexError::NoIndex | IndexError::Locked(_) => 3,
            IndexError::Build(_)
            | IndexError::EmptyPackage { .. }
            | IndexError::DuplicatePackage(_)
            | IndexError::Json(_) => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
