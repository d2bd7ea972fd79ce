pub mod chat;
pub mod config;
pub mod describe;
pub mod error;
pub mod filter;
pub mod integration;
pub mod pages;
pub mod render;
pub mod results;
pub mod sources;
pub mod tracker;
pub mod wizard;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use pages::{PageScan, PageStatus};
pub use results::{ScanSnapshot, ScanSummary};
pub use tracker::{ScanHandle, ScrapeStatusTracker};

use chat::DemoChat;
use config::OnboardingConfig;
use describe::MetaDescriptionFetcher;
use integration::IntegrationTester;
use sources::{
    DescriptionSource, IntegrationProbe, PageSource, SimulatedDescriptionSource, SimulatedPageSource,
    SimulatedProbe,
};
use std::path::Path;
use std::sync::Arc;
use wizard::Wizard;

/// Builder wiring every onboarding component from one configuration
pub struct Onboarding {
    config: OnboardingConfig,
    page_source: Arc<dyn PageSource>,
    description_source: Arc<dyn DescriptionSource>,
    probe: Arc<dyn IntegrationProbe>,
}

impl Onboarding {
    /// Create a builder with the simulated backends
    pub fn new(config: OnboardingConfig) -> Self {
        Self {
            config,
            page_source: Arc::new(SimulatedPageSource),
            description_source: Arc::new(SimulatedDescriptionSource),
            probe: Arc::new(SimulatedProbe),
        }
    }

    /// Load configuration from a JSON file, then apply environment overrides
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = OnboardingConfig::from_file(path)?.with_env_overrides()?;
        Ok(Self::new(config))
    }

    /// Set the per-page scan delay
    pub fn with_scan_delay_ms(mut self, ms: u64) -> Self {
        self.config.scan.scan_delay_ms = ms;
        self
    }

    /// Mark pages as scraping while they wait
    pub fn with_announce_scraping(mut self, announce: bool) -> Self {
        self.config.scan.announce_scraping = announce;
        self
    }

    pub fn with_page_source(mut self, source: Arc<dyn PageSource>) -> Self {
        self.page_source = source;
        self
    }

    pub fn with_description_source(mut self, source: Arc<dyn DescriptionSource>) -> Self {
        self.description_source = source;
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn IntegrationProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn config(&self) -> &OnboardingConfig {
        &self.config
    }

    /// Build the components of one wizard session
    pub fn build(self) -> Result<OnboardingSession> {
        let describer = MetaDescriptionFetcher::with_source(self.config.description.clone(), self.description_source)?;
        Ok(OnboardingSession {
            tracker: ScrapeStatusTracker::with_source(self.config.scan.clone(), self.page_source),
            describer,
            integration: IntegrationTester::with_probe(self.config.integration.clone(), self.probe),
            chat: DemoChat::new(),
            wizard: Wizard::new(),
        })
    }
}

/// Every stateful piece of the onboarding wizard
pub struct OnboardingSession {
    pub tracker: ScrapeStatusTracker,
    pub describer: MetaDescriptionFetcher,
    pub integration: IntegrationTester,
    pub chat: DemoChat,
    pub wizard: Wizard,
}
