//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app;
use crate::config::Config;
use crate::error::Result;

#[derive(Parser)]
#[command(
    name = "candor",
    about = "Anonymous feedback service with ranked storage fallback",
    version
)]
pub struct Cli {
    /// Path to the config file (defaults to candor.toml if present).
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (the default).
    Serve,
    /// Validate configuration and probe each configured store.
    Check,
}

/// Probe every store in the chain with a cheap list call and report
/// per-store health.
pub async fn check(config: &Config) -> Result<()> {
    let chain = app::build_chain(config)?;

    println!("storage chain ({} stores):", chain.kinds().len());
    let mut healthy = 0usize;
    for store in chain.stores() {
        match store.list(1).await {
            Ok(entries) => {
                healthy += 1;
                let state = if entries.is_empty() { "ok, empty" } else { "ok" };
                println!("  {:<10} {state}", store.kind());
            }
            Err(e) => println!("  {:<10} error: {e}", store.kind()),
        }
    }

    if healthy == 0 {
        return Err(crate::error::StoreError::AllStoresFailed.into());
    }
    Ok(())
}
