use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

use uvindex_core::{
    Config, READINGS, UvIndexCoordinator,
    provider::provider_from_config,
    readings::{DeviceInfo, STATE_CLASS, UNIT},
};

use crate::sink::LogSink;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "uvindex", version, about = "UV index poller")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Refresh once, log the readings and exit.
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let provider = provider_from_config(&config)?;
        let coordinator = UvIndexCoordinator::from_config(provider, &config);

        let device = DeviceInfo::for_entry(coordinator.entry_id());
        tracing::info!(
            device = device.name,
            manufacturer = device.manufacturer,
            model = device.model,
            entry_id = %device.identifier,
            location = %coordinator.location(),
            "Registering {} UV index readings",
            READINGS.len()
        );
        for descriptor in READINGS.iter() {
            tracing::debug!(
                unique_id = %descriptor.unique_id(coordinator.entry_id()),
                key = %descriptor.kind,
                icon = descriptor.icon,
                unit = UNIT,
                state_class = STATE_CLASS,
                "Registered {}",
                descriptor.name
            );
        }

        let sink = LogSink;

        if let Err(err) = coordinator.first_refresh().await {
            if self.once {
                return Err(err).context("Initial UV index refresh failed");
            }
            tracing::warn!("Readings stay unavailable until the next refresh succeeds");
        }
        coordinator.publish(&sink, Utc::now());

        if self.once {
            return Ok(());
        }

        coordinator
            .run(&sink, async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for shutdown signal: {err}");
                    std::future::pending::<()>().await;
                }
            })
            .await;

        Ok(())
    }
}
