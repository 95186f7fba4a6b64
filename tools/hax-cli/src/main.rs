//! Hax CLI - developer tool for Super Haxagon level content
//!
//! # Commands
//!
//! - `hax inspect` - Parse a level pack and list its patterns and levels
//! - `hax scores` - Dump a score database blob
//! - `hax pack` - Build a level pack from a TOML manifest
//! - `hax load` - Run the load sequence headlessly
//! - `hax record` - Load, then commit a finished session's score
//!
//! # Usage
//!
//! ```bash
//! # Check a user pack before shipping it
//! hax inspect ~/.local/share/haxagon/levels/mine.haxagon
//!
//! # Show what the game will see on startup
//! hax load --config ./config.toml
//! ```

mod inspect;
mod pack;
mod scores;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Hax CLI - level pack and score database tool
#[derive(Parser)]
#[command(name = "hax")]
#[command(about = "Developer tool for Super Haxagon level packs and score databases")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a level pack and list its patterns and levels
    Inspect(inspect::InspectArgs),

    /// Decode a score database blob
    Scores(scores::ScoresArgs),

    /// Build a level pack from a TOML manifest
    Pack(pack::PackArgs),

    /// Run the load sequence and report the level collection
    Load(session::LoadArgs),

    /// Record a finished session and commit the score database
    Record(session::RecordArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(args) => inspect::execute(args),
        Commands::Scores(args) => scores::execute(args),
        Commands::Pack(args) => pack::execute(args),
        Commands::Load(args) => session::load(args),
        Commands::Record(args) => session::record(args),
    }
}
