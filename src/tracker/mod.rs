//! Website scan tracker.
//!
//! A submission derives four page records from the base URL and a driver task
//! reports them one at a time. Every change flows through [`store::reduce`]
//! inside the watch channel, tagged with the run id of the submission that
//! produced it. A newer submission bumps the run id, so anything an older
//! driver still sends is dropped and that driver stops.

pub mod store;

#[cfg(test)]
mod tests;

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::pages::{PageScan, page_urls};
use crate::results::{ScanSnapshot, ScanSummary};
use crate::sources::{PageSource, SimulatedPageSource};
use std::sync::{Arc, Mutex, PoisonError};
use store::{ScanMessage, reduce};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

type SharedSnapshot = Arc<watch::Sender<ScanSnapshot>>;

/// Id of the last run and the task driving it
#[derive(Default)]
struct RunSlot {
    last_run_id: u64,
    task: Option<AbortHandle>,
}

/// Tracks the progressive scan of a submitted website
pub struct ScrapeStatusTracker {
    config: ScanConfig,
    source: Arc<dyn PageSource>,
    state: SharedSnapshot,
    slot: Mutex<RunSlot>,
}

impl ScrapeStatusTracker {
    /// Create a tracker backed by the simulated page source
    pub fn new(config: ScanConfig) -> Self {
        Self::with_source(config, Arc::new(SimulatedPageSource))
    }

    /// Create a tracker that scans pages with the given source
    pub fn with_source(config: ScanConfig, source: Arc<dyn PageSource>) -> Self {
        let (tx, _rx) = watch::channel(ScanSnapshot::default());
        Self {
            config,
            source,
            state: Arc::new(tx),
            slot: Mutex::new(RunSlot::default()),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.state.subscribe()
    }

    /// Current state of the scan
    pub fn snapshot(&self) -> ScanSnapshot {
        self.state.borrow().clone()
    }

    /// Replace the tracked pages with the four pages of `base_url` and start scanning them.
    ///
    /// The pending records are published before this returns. Any run still in
    /// flight is aborted and can no longer change the snapshot. Must be called
    /// from within a tokio runtime.
    pub fn start_scan(&self, base_url: &str) -> Result<ScanHandle> {
        if base_url.is_empty() {
            return Err(Error::EmptyBaseUrl);
        }

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.last_run_id += 1;
        let run_id = slot.last_run_id;

        if let Some(previous) = slot.task.take() {
            ::log::debug!("Run {} supersedes the previous scan", run_id);
            previous.abort();
        }

        self.state.send_if_modified(|snapshot| {
            reduce(
                snapshot,
                ScanMessage::Started {
                    run_id,
                    base_url: base_url.to_string(),
                },
            )
        });
        ::log::info!("Starting scan {} for: {}", run_id, base_url);

        let driver = Driver {
            run_id,
            urls: page_urls(base_url),
            config: self.config.clone(),
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
        };
        let task = tokio::spawn(driver.run());
        slot.task = Some(task.abort_handle());

        Ok(ScanHandle {
            run_id,
            task,
            state: Arc::clone(&self.state),
        })
    }

    /// Stop the running scan. Records keep their current state.
    pub fn cancel(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        let run_id = slot.last_run_id;
        if self
            .state
            .send_if_modified(|snapshot| reduce(snapshot, ScanMessage::Cancelled { run_id }))
        {
            ::log::info!("Scan {} cancelled", run_id);
        }
    }
}

impl Drop for ScrapeStatusTracker {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = slot.task.take() {
            task.abort();
        }
    }
}

/// Handle to one scan run
pub struct ScanHandle {
    run_id: u64,
    task: JoinHandle<Result<ScanSummary>>,
    state: SharedSnapshot,
}

impl ScanHandle {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop this run if it is still the current one
    pub fn cancel(&self) {
        self.task.abort();
        let run_id = self.run_id;
        self.state
            .send_if_modified(|snapshot| reduce(snapshot, ScanMessage::Cancelled { run_id }));
    }

    /// Wait for the run to report its last page
    pub async fn wait(self) -> Result<ScanSummary> {
        match self.task.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => {
                if self.state.borrow().run_id != self.run_id {
                    Err(Error::Superseded { run_id: self.run_id })
                } else {
                    Err(Error::Cancelled)
                }
            }
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

/// Reports the pages of one run in order
struct Driver {
    run_id: u64,
    urls: Vec<String>,
    config: ScanConfig,
    source: Arc<dyn PageSource>,
    state: SharedSnapshot,
}

impl Driver {
    async fn run(self) -> Result<ScanSummary> {
        let started = tokio::time::Instant::now();

        for (index, url) in self.urls.iter().enumerate() {
            let mut record = PageScan::pending(url.as_str());
            if self.config.announce_scraping {
                record = record.begin()?;
                self.dispatch(ScanMessage::PageUpdated {
                    run_id: self.run_id,
                    index,
                    record: record.clone(),
                })?;
            }

            tokio::time::sleep(self.config.scan_delay()).await;

            let record = self.scan_page(url, record).await?;
            ::log::debug!("Run {} page {} is {}: {}", self.run_id, index, record.status(), url);
            self.dispatch(ScanMessage::PageUpdated {
                run_id: self.run_id,
                index,
                record,
            })?;
        }

        let summary = self.finish()?;
        ::log::info!(
            "Scan {} complete - {} pages completed, {} failed in {:.2} seconds",
            self.run_id,
            summary.completed,
            summary.failed,
            started.elapsed().as_secs_f64()
        );
        Ok(summary)
    }

    /// A failing page is recorded as failed and never aborts the run
    async fn scan_page(&self, url: &str, record: PageScan) -> Result<PageScan> {
        let reason = match self.source.scrape(url).await {
            Ok(chunks) if !chunks.is_empty() => return record.complete(chunks),
            Ok(_) => Error::ScanFailed {
                url: url.to_string(),
                reason: "no content extracted".to_string(),
            },
            Err(err) => err,
        };
        ::log::warn!("Run {} failed to scan {}: {}", self.run_id, url, reason);
        record.fail(reason.to_string())
    }

    fn dispatch(&self, message: ScanMessage) -> Result<()> {
        if self.state.send_if_modified(|snapshot| reduce(snapshot, message)) {
            return Ok(());
        }
        match self.stale() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Clear `in_progress` and summarize the snapshot under the same lock
    fn finish(&self) -> Result<ScanSummary> {
        let mut summary = None;
        let message = ScanMessage::Finished { run_id: self.run_id };
        self.state.send_if_modified(|snapshot| {
            let applied = reduce(snapshot, message);
            if applied {
                summary = Some(ScanSummary::from(&*snapshot));
            }
            applied
        });
        match summary {
            Some(summary) => Ok(summary),
            None => Err(self.stale().unwrap_or(Error::Cancelled)),
        }
    }

    /// Why this run may no longer write, if it may not
    fn stale(&self) -> Option<Error> {
        let snapshot = self.state.borrow();
        if snapshot.run_id != self.run_id {
            ::log::debug!("Run {} superseded by run {}, stopping", self.run_id, snapshot.run_id);
            Some(Error::Superseded { run_id: self.run_id })
        } else if !snapshot.in_progress {
            Some(Error::Cancelled)
        } else {
            None
        }
    }
}
