//! Canned stand-ins for the remote services the wizard talks to.

use super::{DescriptionSource, IntegrationProbe, PageSource};
use crate::error::Result;
use async_trait::async_trait;

/// Chunks reported for every scanned page
pub const SIMULATED_CHUNKS: [&str; 4] = [
    "Navigation menu content",
    "Main section content",
    "Product descriptions",
    "Contact information",
];

/// Description returned for every website
pub const SIMULATED_DESCRIPTION: &str = "This is an auto-fetched meta description for your website. It provides a brief overview of your company and its services.";

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPageSource;

#[async_trait]
impl PageSource for SimulatedPageSource {
    async fn scrape(&self, url: &str) -> Result<Vec<String>> {
        ::log::trace!("Simulated scrape of {}", url);
        Ok(SIMULATED_CHUNKS.iter().map(|chunk| chunk.to_string()).collect())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDescriptionSource;

#[async_trait]
impl DescriptionSource for SimulatedDescriptionSource {
    async fn describe(&self, url: &str) -> Result<String> {
        ::log::trace!("Simulated description lookup for {}", url);
        Ok(SIMULATED_DESCRIPTION.to_string())
    }
}

/// Probe that always finds the widget
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProbe;

#[async_trait]
impl IntegrationProbe for SimulatedProbe {
    async fn verify(&self) -> Result<bool> {
        Ok(true)
    }
}
