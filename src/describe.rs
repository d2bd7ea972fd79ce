//! Meta description lookup for the organization form.
//!
//! Typing a website URL starts a lookup that pre-fills the company
//! description. Only the most recent lookup may write to the field.

use crate::config::DescriptionConfig;
use crate::error::{Error, FETCH_FAILED_MESSAGE, Result};
use crate::filter::UrlGate;
use crate::sources::{DescriptionSource, SimulatedDescriptionSource};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

/// State of the company description field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionField {
    pub loading: bool,
    pub description: Option<String>,
    pub error: Option<String>,
}

impl DescriptionField {
    fn loading() -> Self {
        Self {
            loading: true,
            description: None,
            error: None,
        }
    }

    /// Whether the view should show the "auto-fetched" hint
    pub fn is_auto_fetched(&self) -> bool {
        !self.loading && self.description.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Shared between the fetcher and its in-flight lookups
struct FieldSlot {
    latest_request: AtomicU64,
    state: watch::Sender<DescriptionField>,
}

impl FieldSlot {
    /// Write a lookup result unless a newer lookup started since
    fn settle(&self, request_id: u64, result: &Result<String>) -> bool {
        self.state.send_if_modified(|field| {
            if self.latest_request.load(Ordering::SeqCst) != request_id {
                ::log::debug!("Dropping stale description lookup {}", request_id);
                return false;
            }
            *field = match result {
                Ok(description) => DescriptionField {
                    loading: false,
                    description: Some(description.clone()),
                    error: None,
                },
                Err(_) => DescriptionField {
                    loading: false,
                    description: None,
                    error: Some(FETCH_FAILED_MESSAGE.to_string()),
                },
            };
            true
        })
    }
}

pub struct MetaDescriptionFetcher {
    config: DescriptionConfig,
    gate: UrlGate,
    source: Arc<dyn DescriptionSource>,
    slot: Arc<FieldSlot>,
    task: Mutex<Option<AbortHandle>>,
}

impl MetaDescriptionFetcher {
    /// Create a fetcher backed by the simulated description source
    pub fn new(config: DescriptionConfig) -> Result<Self> {
        Self::with_source(config, Arc::new(SimulatedDescriptionSource))
    }

    pub fn with_source(config: DescriptionConfig, source: Arc<dyn DescriptionSource>) -> Result<Self> {
        let gate = UrlGate::from_config(&config)?;
        let (tx, _rx) = watch::channel(DescriptionField::default());
        Ok(Self {
            config,
            gate,
            source,
            slot: Arc::new(FieldSlot {
                latest_request: AtomicU64::new(0),
                state: tx,
            }),
            task: Mutex::new(None),
        })
    }

    pub fn gate(&self) -> &UrlGate {
        &self.gate
    }

    pub fn field(&self) -> DescriptionField {
        self.slot.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DescriptionField> {
        self.slot.state.subscribe()
    }

    /// React to the website field changing; only gated URLs start a lookup
    pub fn on_url_changed(&self, url: &str) -> Option<DescriptionHandle> {
        if !self.gate.accepts(url) {
            ::log::trace!("Not fetching description for {:?}", url);
            return None;
        }
        Some(self.fetch_description(url))
    }

    /// Look up the description of `url`, superseding any lookup in flight.
    ///
    /// Callers gate the URL first (see [`MetaDescriptionFetcher::on_url_changed`]).
    pub fn fetch_description(&self, url: &str) -> DescriptionHandle {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        let request_id = self.slot.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = task.take() {
            previous.abort();
        }
        self.slot.state.send_replace(DescriptionField::loading());
        ::log::debug!("Fetching meta description {} for: {}", request_id, url);

        let url = url.to_string();
        let delay = self.config.fetch_delay();
        let source = Arc::clone(&self.source);
        let slot = Arc::clone(&self.slot);
        let join = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = source.describe(&url).await.map_err(|err| {
                ::log::warn!("Meta description lookup for {} failed: {}", url, err);
                Error::FetchFailed {
                    reason: err.to_string(),
                }
            });
            slot.settle(request_id, &result);
            result
        });
        *task = Some(join.abort_handle());

        DescriptionHandle { request_id, join }
    }

    /// Replace the description with text typed by the user
    pub fn edit(&self, text: impl Into<String>) {
        let text = text.into();
        self.slot.state.send_modify(|field| field.description = Some(text));
    }
}

impl Drop for MetaDescriptionFetcher {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = task.take() {
            task.abort();
        }
    }
}

/// Handle to one description lookup
pub struct DescriptionHandle {
    request_id: u64,
    join: JoinHandle<Result<String>>,
}

impl DescriptionHandle {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Wait for the lookup; a superseded lookup reports `Cancelled`
    pub async fn wait(self) -> Result<String> {
        match self.join.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(Error::Cancelled),
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::simulated::SIMULATED_DESCRIPTION;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingSource;

    #[async_trait]
    impl DescriptionSource for FailingSource {
        async fn describe(&self, url: &str) -> Result<String> {
            Err(Error::ScanFailed {
                url: url.to_string(),
                reason: "404".to_string(),
            })
        }
    }

    struct EchoSource;

    #[async_trait]
    impl DescriptionSource for EchoSource {
        async fn describe(&self, url: &str) -> Result<String> {
            Ok(format!("About {url}"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_canned_description() {
        let fetcher = MetaDescriptionFetcher::new(DescriptionConfig::default()).unwrap();
        let handle = fetcher.fetch_description("https://acme.com");

        assert_eq!(fetcher.field(), DescriptionField::loading());

        let text = handle.wait().await.unwrap();
        assert_eq!(
            text,
            "This is an auto-fetched meta description for your website. It provides a brief overview of your company and its services."
        );
        let field = fetcher.field();
        assert!(!field.loading);
        assert_eq!(field.description.as_deref(), Some(SIMULATED_DESCRIPTION));
        assert!(field.error.is_none());
        assert!(field.is_auto_fetched());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_waits_for_delay() {
        let fetcher = MetaDescriptionFetcher::new(DescriptionConfig::default()).unwrap();
        let _handle = fetcher.fetch_description("https://acme.com");

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(fetcher.field().loading);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!fetcher.field().loading);
    }

    #[tokio::test]
    async fn test_gate_blocks_non_http_input() {
        let fetcher = MetaDescriptionFetcher::new(DescriptionConfig::default()).unwrap();
        assert!(!fetcher.gate().accepts("not-a-url"));
        assert!(fetcher.on_url_changed("not-a-url").is_none());
        assert!(fetcher.on_url_changed("").is_none());
        assert_eq!(fetcher.field(), DescriptionField::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_url_changed_fetches_gated_url() {
        let fetcher = MetaDescriptionFetcher::new(DescriptionConfig::default()).unwrap();
        let handle = fetcher.on_url_changed("https://acme.com").unwrap();
        assert_eq!(handle.wait().await.unwrap(), SIMULATED_DESCRIPTION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_leaves_description_empty() {
        let fetcher =
            MetaDescriptionFetcher::with_source(DescriptionConfig::default(), Arc::new(FailingSource)).unwrap();
        let result = fetcher.fetch_description("https://acme.com").wait().await;
        assert!(matches!(result, Err(Error::FetchFailed { .. })));

        let field = fetcher.field();
        assert!(!field.loading);
        assert!(field.description.is_none());
        assert_eq!(field.error.as_deref(), Some("Failed to fetch meta description"));
        assert!(!field.is_auto_fetched());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_lookup_wins() {
        let fetcher =
            MetaDescriptionFetcher::with_source(DescriptionConfig::default(), Arc::new(EchoSource)).unwrap();

        let first = fetcher.fetch_description("https://a.com");
        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = fetcher.fetch_description("https://ab.com");
        assert!(second.request_id() > first.request_id());

        assert!(matches!(first.wait().await, Err(Error::Cancelled)));
        assert_eq!(second.wait().await.unwrap(), "About https://ab.com");
        assert_eq!(fetcher.field().description.as_deref(), Some("About https://ab.com"));
    }

    #[tokio::test]
    async fn test_stale_result_is_not_written() {
        let fetcher = MetaDescriptionFetcher::new(DescriptionConfig::default()).unwrap();
        fetcher.slot.latest_request.store(2, Ordering::SeqCst);

        assert!(!fetcher.slot.settle(1, &Ok("old".to_string())));
        assert_eq!(fetcher.field(), DescriptionField::default());
        assert!(fetcher.slot.settle(2, &Ok("new".to_string())));
        assert_eq!(fetcher.field().description.as_deref(), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_edit_replaces_description() {
        let fetcher = MetaDescriptionFetcher::new(DescriptionConfig::default()).unwrap();
        fetcher.fetch_description("https://acme.com").wait().await.unwrap();

        fetcher.edit("We build rockets.");
        let field = fetcher.field();
        assert_eq!(field.description.as_deref(), Some("We build rockets."));
        assert!(field.error.is_none());
    }
}
