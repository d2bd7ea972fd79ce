pub mod simulated;

use crate::error::Result;
use async_trait::async_trait;

pub use simulated::{SimulatedDescriptionSource, SimulatedPageSource, SimulatedProbe};

/// Produces the content chunks of a single page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Scan one page and return its extracted chunks
    async fn scrape(&self, url: &str) -> Result<Vec<String>>;
}

/// Looks up the meta description of a website
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    async fn describe(&self, url: &str) -> Result<String>;
}

/// Checks whether the chatbot widget is installed
#[async_trait]
pub trait IntegrationProbe: Send + Sync {
    /// Ok(true) when the widget responded
    async fn verify(&self) -> Result<bool>;
}
