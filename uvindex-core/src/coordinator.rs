//! Refresh scheduling and the "last known good" payload.
//!
//! The coordinator owns the only mutable state in the crate: a reference to
//! the most recent successful payload. A refresh builds a new payload off to
//! the side and swaps the reference in, so readers always see one complete
//! snapshot. Failed refreshes leave the reference untouched.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::time::{Instant, MissedTickBehavior};

use crate::{
    config::Config,
    error::UvError,
    model::{Location, Payload},
    provider::UvProvider,
    readings::{READINGS, Reading, ReadingSink},
};

/// Shortest refresh period; shorter requests are raised to this.
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct RefreshStatus {
    last_update_success: bool,
    last_error: Option<String>,
    last_success_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct UvIndexCoordinator {
    provider: Box<dyn UvProvider>,
    location: Location,
    entry_id: String,
    update_interval: Duration,
    data: RwLock<Option<Arc<Payload>>>,
    status: Mutex<RefreshStatus>,
}

impl UvIndexCoordinator {
    pub fn new(
        provider: Box<dyn UvProvider>,
        location: Location,
        entry_id: impl Into<String>,
        update_interval: Duration,
    ) -> Self {
        if update_interval < MIN_UPDATE_INTERVAL {
            tracing::warn!(
                requested_secs = update_interval.as_secs(),
                "Update interval below one minute, using one minute"
            );
        }

        Self {
            provider,
            location,
            entry_id: entry_id.into(),
            update_interval: update_interval.max(MIN_UPDATE_INTERVAL),
            data: RwLock::new(None),
            status: Mutex::new(RefreshStatus::default()),
        }
    }

    pub fn from_config(provider: Box<dyn UvProvider>, config: &Config) -> Self {
        Self::new(
            provider,
            config.location(),
            config.entry_id(),
            config.update_interval(),
        )
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Eager refresh at startup. The error is returned so the host can decide
    /// whether setup is ready.
    pub async fn first_refresh(&self) -> Result<(), UvError> {
        tracing::info!(
            location = %self.location,
            interval_secs = self.update_interval.as_secs(),
            "Performing first UV index refresh"
        );
        self.refresh().await.map(|_| ())
    }

    /// One fetch. Success replaces the payload; failure keeps the previous one.
    pub async fn refresh(&self) -> Result<Arc<Payload>, UvError> {
        let result = self.provider.fetch(&self.location).await;

        match result {
            Ok(payload) => {
                let payload = Arc::new(payload);
                *self.data.write() = Some(Arc::clone(&payload));

                let mut status = self.status.lock();
                status.last_update_success = true;
                status.last_error = None;
                status.last_success_at = Some(Utc::now());

                tracing::info!(
                    entries = payload.forecast.len(),
                    now_uvi = ?payload.now.uvi,
                    "Installed new UV index payload"
                );
                Ok(payload)
            }
            Err(err) => {
                let mut status = self.status.lock();
                status.last_update_success = false;
                status.last_error = Some(err.detail().to_string());

                tracing::warn!(
                    location = %self.location,
                    has_previous = self.data.read().is_some(),
                    "UV index refresh failed: {}",
                    err
                );
                Err(err)
            }
        }
    }

    /// Current snapshot; cheap to clone and safe to hold across a refresh.
    pub fn snapshot(&self) -> Option<Arc<Payload>> {
        self.data.read().clone()
    }

    /// A payload has been fetched at least once.
    pub fn is_available(&self) -> bool {
        self.data.read().is_some()
    }

    pub fn last_update_success(&self) -> bool {
        self.status.lock().last_update_success
    }

    pub fn last_error(&self) -> Option<String> {
        self.status.lock().last_error.clone()
    }

    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.status.lock().last_success_at
    }

    /// Every reading evaluated at `now`, or nothing before the first success.
    pub fn readings(&self, now: DateTime<Utc>) -> Vec<Reading> {
        let Some(payload) = self.snapshot() else {
            return Vec::new();
        };

        READINGS
            .iter()
            .map(|descriptor| descriptor.evaluate(&self.entry_id, &payload, now))
            .collect()
    }

    pub fn publish<S>(&self, sink: &S, now: DateTime<Utc>)
    where
        S: ReadingSink + ?Sized,
    {
        let Some(payload) = self.snapshot() else {
            for descriptor in READINGS.iter() {
                sink.unavailable(descriptor, &descriptor.unique_id(&self.entry_id));
            }
            return;
        };

        for descriptor in READINGS.iter() {
            sink.publish(&descriptor.evaluate(&self.entry_id, &payload, now));
        }
    }

    /// Refresh on the configured period and publish after each attempt, until
    /// `shutdown` resolves. The first tick fires one period from now; the eager
    /// refresh belongs to [`Self::first_refresh`].
    pub async fn run<S, F>(&self, sink: &S, shutdown: F)
    where
        S: ReadingSink + ?Sized,
        F: Future<Output = ()>,
    {
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.update_interval, self.update_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("UV index refresh loop stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh().await.ok();
                    self.publish(sink, Utc::now());
                }
            }
        }
    }
}
