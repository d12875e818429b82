//! Mistake Book CLI - Database migrations and inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (notebook tables and session store)
//! mb-cli migrate
//!
//! # Dump the five newest error items with their tags
//! mb-cli snapshot
//! mb-cli snapshot --output /tmp/items.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `snapshot` - Write recent error items to a JSON file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mb-cli")]
#[command(author, version, about = "Mistake Book CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Write the most recent error items (with tags) to a JSON file
    Snapshot {
        /// Output file, overwritten if it exists
        #[arg(short, long, default_value = commands::snapshot::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Snapshot { output } => commands::snapshot::run(&output).await?,
    }
    Ok(())
}
