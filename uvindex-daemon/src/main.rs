//! Binary crate for the `uvindex` reference host.
//!
//! This crate focuses on:
//! - Loading configuration and installing logging
//! - Running the eager first refresh and the periodic refresh loop
//! - Publishing readings through a logging sink

use clap::Parser;

mod cli;
mod sink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
