use anyhow::Result;
use clap::{Parser, Subcommand};
use kiln::commands::{compile, packs, status};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Knowledge pack compiler CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the compilation freshness of a pack and its nested packs
    Status {
        /// Path to the pack root
        pack_root: PathBuf,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompile stale items and delete orphan mirrors
    Compile {
        /// Path to the pack root
        pack_root: PathBuf,

        /// Only reconcile this pack's own level, skip nested packs
        #[arg(long)]
        shallow: bool,

        /// Suppress per-item output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Discover packs under namespace directories
    Packs {
        /// Namespace roots to scan (defaults to kiln.toml namespaces)
        namespaces: Vec<PathBuf>,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status { pack_root, json } => status::status(&pack_root, json),
        Commands::Compile {
            pack_root,
            shallow,
            quiet,
        } => compile::compile(&pack_root, shallow, quiet),
        Commands::Packs { namespaces, json } => packs::packs(namespaces, json),
    }
}
