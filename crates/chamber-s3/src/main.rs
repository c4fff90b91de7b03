//! chamber-s3 CLI - per-service secrets stored in versioned S3 objects
//!
//! This is the main entry point for the chamber-s3 command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use chamber_store::S3Store;
use clap::Parser;
use std::io;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let store = S3Store::from_config(&cli.store_config())
        .await
        .context("Failed to initialize the S3 secret store")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut stdin = io::stdin().lock();

    match cli.command {
        Commands::Read(args) => commands::read::run(args, &store, &mut out).await,
        Commands::Write(args) => commands::write::run(args, &store, &mut stdin, &mut out).await,
        Commands::Writeall(args) => {
            commands::writeall::run(args, &store, &mut stdin, &mut out).await
        }
        Commands::List(args) => commands::list::run(args, &store, &mut out).await,
        Commands::Import(args) => commands::import::run(args, &store, &mut stdin, &mut out).await,
    }
}

/// Initialize tracing on stderr so stdout stays clean for secret values
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
