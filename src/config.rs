use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides the per-page scan delay
pub const SCAN_DELAY_ENV: &str = "ONBOARD_SCAN_DELAY_MS";

/// Configuration for the website scan tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Delay before each page is reported, in milliseconds
    #[serde(default = "default_scan_delay_ms")]
    pub scan_delay_ms: u64,

    /// Whether to mark each page as scraping before its delay starts
    #[serde(default)]
    pub announce_scraping: bool,
}

/// Configuration for the meta description fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionConfig {
    /// Simulated fetch latency, in milliseconds
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// Regex patterns a URL must match (any) before a fetch is started
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// Regex patterns that veto a fetch (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Configuration for the integration tester
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Simulated verification latency, in milliseconds
    #[serde(default = "default_integration_delay_ms")]
    pub integration_delay_ms: u64,
}

/// Top-level configuration for every onboarding component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnboardingConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub description: DescriptionConfig,

    #[serde(default)]
    pub integration: IntegrationConfig,
}

fn default_scan_delay_ms() -> u64 {
    1500
}

fn default_fetch_delay_ms() -> u64 {
    1000
}

fn default_integration_delay_ms() -> u64 {
    2000
}

fn default_include_patterns() -> Vec<String> {
    vec!["^http".to_string()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_delay_ms: default_scan_delay_ms(),
            announce_scraping: false,
        }
    }
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: default_fetch_delay_ms(),
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            integration_delay_ms: default_integration_delay_ms(),
        }
    }
}

impl ScanConfig {
    pub fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }

    /// Set the per-page delay
    pub fn with_scan_delay_ms(mut self, ms: u64) -> Self {
        self.scan_delay_ms = ms;
        self
    }

    /// Mark pages as scraping while they wait
    pub fn with_announce_scraping(mut self, announce: bool) -> Self {
        self.announce_scraping = announce;
        self
    }
}

impl DescriptionConfig {
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn with_fetch_delay_ms(mut self, ms: u64) -> Self {
        self.fetch_delay_ms = ms;
        self
    }
}

impl IntegrationConfig {
    pub fn integration_delay(&self) -> Duration {
        Duration::from_millis(self.integration_delay_ms)
    }

    pub fn with_integration_delay_ms(mut self, ms: u64) -> Self {
        self.integration_delay_ms = ms;
        self
    }
}

impl OnboardingConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in production)
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(SCAN_DELAY_ENV) {
            if !raw.trim().is_empty() {
                self.scan.scan_delay_ms = raw.trim().parse().map_err(|_| {
                    Error::Config(format!("{SCAN_DELAY_ENV} must be a number of milliseconds, got {raw:?}"))
                })?;
                ::log::debug!("Scan delay overridden from environment: {}ms", self.scan.scan_delay_ms);
            }
        }
        Ok(self)
    }

    /// Zero every simulated delay (useful for tests and demos)
    pub fn instant() -> Self {
        Self {
            scan: ScanConfig::default().with_scan_delay_ms(0),
            description: DescriptionConfig::default().with_fetch_delay_ms(0),
            integration: IntegrationConfig::default().with_integration_delay_ms(0),
        }
    }
}
