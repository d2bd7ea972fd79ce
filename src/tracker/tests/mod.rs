
use crate::error::{Error, Result};
use crate::results::ScanSnapshot;
use crate::sources::PageSource;
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Page source that records every scanned URL and fails the ones ending in `fail_suffix`
#[derive(Default)]
pub(super) struct RecordingSource {
    pub(super) scanned: Mutex<Vec<String>>,
    pub(super) fail_suffix: Option<&'static str>,
}

impl RecordingSource {
    pub(super) fn failing_on(suffix: &'static str) -> Self {
        Self {
            scanned: Mutex::new(Vec::new()),
            fail_suffix: Some(suffix),
        }
    }

    pub(super) fn scanned(&self) -> Vec<String> {
        self.scanned.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for RecordingSource {
    async fn scrape(&self, url: &str) -> Result<Vec<String>> {
        self.scanned.lock().unwrap().push(url.to_string());
        match self.fail_suffix {
            Some(suffix) if url.ends_with(suffix) => Err(Error::ScanFailed {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            }),
            _ => Ok(vec![format!("content of {url}")]),
        }
    }
}

/// Collect every snapshot an observer sees until `done` returns true
pub(super) fn observe<F>(mut rx: watch::Receiver<ScanSnapshot>, done: F) -> JoinHandle<Vec<ScanSnapshot>>
where
    F: Fn(&ScanSnapshot) -> bool + Send + 'static,
{
    tokio::spawn(async move {
        let mut seen = vec![rx.borrow_and_update().clone()];
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            let finished = done(&snapshot);
            seen.push(snapshot);
            if finished {
                break;
            }
        }
        seen
    })
}

/// Invariants every published snapshot must hold
pub(super) fn assert_well_formed(snapshot: &ScanSnapshot) {
    use crate::pages::PageStatus;

    for page in &snapshot.records {
        assert_eq!(
            !page.chunks().is_empty(),
            page.status() == PageStatus::Completed,
            "chunks must exist exactly when {} is completed",
            page.url()
        );
    }
    for pair in snapshot.records.windows(2) {
        if pair[1].is_terminal() {
            assert!(pair[0].is_terminal(), "{} finished before {}", pair[1].url(), pair[0].url());
        }
    }
}
