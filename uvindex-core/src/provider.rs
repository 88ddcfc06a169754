use crate::{Config, Location, Payload, UvError};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod currentuvindex;

pub use currentuvindex::CurrentUvIndexProvider;

/// One fetch of the forecast payload for a location.
///
/// Implementations perform a single request with no retry. Every failure is
/// reported as [`UvError::FetchFailed`].
#[async_trait]
pub trait UvProvider: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Result<Payload, UvError>;
}

/// Construct the HTTP provider pointed at the configured API host.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn UvProvider>> {
    let provider = CurrentUvIndexProvider::new(&config.api_base)?;
    Ok(Box::new(provider))
}
