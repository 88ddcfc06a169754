//! Core library for UV index polling.
//!
//! This crate defines:
//! - Configuration of the polled location and refresh period
//! - The HTTP poller that fetches the forecast payload
//! - Pure derivations over the last good payload (current, today/tomorrow max/min)
//! - The reading-descriptor table and the sink interface a host publishes through
//! - The coordinator that schedules refreshes and keeps the last known good payload
//!
//! It is used by `uvindex-daemon`, but any host that can implement [`ReadingSink`]
//! can embed it.

pub mod config;
pub mod coordinator;
pub mod derive;
pub mod error;
pub mod model;
pub mod provider;
pub mod readings;

pub use config::{Config, EntryConfig, EntryOptions, HomeConfig};
pub use coordinator::UvIndexCoordinator;
pub use error::UvError;
pub use model::{DerivedReading, ForecastPoint, Location, NowPoint, Payload};
pub use provider::{CurrentUvIndexProvider, UvProvider};
pub use readings::{READINGS, Reading, ReadingDescriptor, ReadingKind, ReadingSink};
