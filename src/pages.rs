use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Path suffixes scanned for every submitted base URL, in scan order
pub const PAGE_SUFFIXES: [&str; 4] = ["", "/about", "/products", "/contact"];

/// Flat status of a page, as shown next to its URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Pending,
    Scraping,
    Completed,
    Failed,
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Scraping => "scraping",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Scan progress of a single page. Chunks only exist once the page completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Pending,
    Scraping,
    Completed(Vec<String>),
    Failed(String),
}

/// One page derived from the submitted base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PageScanRepr", try_from = "PageScanRepr")]
pub struct PageScan {
    url: String,
    state: ScanState,
}

impl PageScan {
    /// Create a pending record for the given URL
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: ScanState::Pending,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn status(&self) -> PageStatus {
        match self.state {
            ScanState::Pending => PageStatus::Pending,
            ScanState::Scraping => PageStatus::Scraping,
            ScanState::Completed(_) => PageStatus::Completed,
            ScanState::Failed(_) => PageStatus::Failed,
        }
    }

    /// Extracted chunks; empty unless the page completed
    pub fn chunks(&self) -> &[String] {
        match &self.state {
            ScanState::Completed(chunks) => chunks,
            _ => &[],
        }
    }

    /// Failure reason, if the page failed
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ScanState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Completed and failed pages never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, ScanState::Completed(_) | ScanState::Failed(_))
    }

    /// pending -> scraping
    pub fn begin(self) -> Result<Self> {
        match self.state {
            ScanState::Pending => Ok(Self {
                url: self.url,
                state: ScanState::Scraping,
            }),
            _ => Err(Error::transition(self.status(), PageStatus::Scraping)),
        }
    }

    /// pending | scraping -> completed
    pub fn complete(self, chunks: Vec<String>) -> Result<Self> {
        if self.is_terminal() {
            return Err(Error::transition(self.status(), PageStatus::Completed));
        }
        if chunks.is_empty() {
            return Err(Error::EmptyChunks);
        }
        Ok(Self {
            url: self.url,
            state: ScanState::Completed(chunks),
        })
    }

    /// pending | scraping -> failed
    pub fn fail(self, reason: impl Into<String>) -> Result<Self> {
        if self.is_terminal() {
            return Err(Error::transition(self.status(), PageStatus::Failed));
        }
        Ok(Self {
            url: self.url,
            state: ScanState::Failed(reason.into()),
        })
    }
}

/// Derive the fixed set of page URLs for a base URL.
///
/// The base URL is used exactly as submitted; a trailing slash is not stripped.
pub fn page_urls(base_url: &str) -> Vec<String> {
    PAGE_SUFFIXES
        .iter()
        .map(|suffix| format!("{base_url}{suffix}"))
        .collect()
}

/// Build the pending records for a new submission
pub fn pending_pages(base_url: &str) -> Vec<PageScan> {
    page_urls(base_url).into_iter().map(PageScan::pending).collect()
}

// Wire shape handed to renderers: {url, status, chunks, error?}
#[derive(Serialize, Deserialize)]
struct PageScanRepr {
    url: String,
    status: PageStatus,
    #[serde(default)]
    chunks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<PageScan> for PageScanRepr {
    fn from(page: PageScan) -> Self {
        let status = page.status();
        let (chunks, error) = match page.state {
            ScanState::Completed(chunks) => (chunks, None),
            ScanState::Failed(reason) => (Vec::new(), Some(reason)),
            ScanState::Pending | ScanState::Scraping => (Vec::new(), None),
        };
        Self {
            url: page.url,
            status,
            chunks,
            error,
        }
    }
}

impl TryFrom<PageScanRepr> for PageScan {
    type Error = Error;

    fn try_from(repr: PageScanRepr) -> Result<Self> {
        if repr.status != PageStatus::Completed && !repr.chunks.is_empty() {
            return Err(Error::Config(format!(
                "page {} is {} but carries chunks",
                repr.url, repr.status
            )));
        }
        let page = PageScan::pending(repr.url);
        match repr.status {
            PageStatus::Pending => Ok(page),
            PageStatus::Scraping => page.begin(),
            PageStatus::Completed => page.complete(repr.chunks),
            PageStatus::Failed => page.fail(repr.error.unwrap_or_default()),
        }
    }
}
