use crate::config::DescriptionConfig;
use crate::error::Result;
use regex::Regex;

/// Decides whether a typed website URL is worth a description lookup.
///
/// Exclude patterns take precedence. A URL must then match at least one
/// include pattern; with no include patterns every URL passes.
#[derive(Debug)]
pub struct UrlGate {
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlGate {
    /// Compile the gate from include and exclude patterns
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Result<Self> {
        let mut include_regexes = Vec::with_capacity(include_patterns.len());
        for pattern in include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            include_regexes,
            exclude_regexes,
        })
    }

    pub fn from_config(config: &DescriptionConfig) -> Result<Self> {
        Self::new(&config.include_patterns, &config.exclude_patterns)
    }

    /// Whether a description fetch should start for this URL
    pub fn accepts(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }

        if self.exclude_regexes.iter().any(|regex| regex.is_match(url)) {
            ::log::trace!("URL gate excluded: {}", url);
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|regex| regex.is_match(url))
    }
}
