use crate::pages::{PageScan, pending_pages};
use crate::results::ScanSnapshot;

/// A change emitted by a scan run, tagged with the run that produced it
#[derive(Debug, Clone)]
pub enum ScanMessage {
    /// A new submission replaces every record
    Started { run_id: u64, base_url: String },
    /// A driver reports a new state for one record
    PageUpdated {
        run_id: u64,
        index: usize,
        record: PageScan,
    },
    /// The last page was reported
    Finished { run_id: u64 },
    /// The run was stopped before finishing
    Cancelled { run_id: u64 },
}

impl ScanMessage {
    pub fn run_id(&self) -> u64 {
        match self {
            Self::Started { run_id, .. }
            | Self::PageUpdated { run_id, .. }
            | Self::Finished { run_id }
            | Self::Cancelled { run_id } => *run_id,
        }
    }
}

/// Apply a message to the snapshot. Returns false when the message was ignored.
///
/// `Started` is accepted for any run id newer than the current one. Every other
/// message must carry the current run id. A page update must target the first
/// record that is not yet final, or re-report that same record.
pub fn reduce(snapshot: &mut ScanSnapshot, message: ScanMessage) -> bool {
    let run_id = message.run_id();
    let current = run_id == snapshot.run_id && snapshot.in_progress;

    match message {
        ScanMessage::Started { base_url, .. } => {
            if run_id <= snapshot.run_id {
                ::log::debug!("Ignoring start of stale run {} (current {})", run_id, snapshot.run_id);
                return false;
            }
            snapshot.run_id = run_id;
            snapshot.records = pending_pages(&base_url);
            snapshot.in_progress = true;
            true
        }
        _ if !current => {
            ::log::trace!("Dropping message from stale run {}", run_id);
            false
        }
        ScanMessage::PageUpdated { index, record, .. } => {
            let Some(existing) = snapshot.records.get(index) else {
                ::log::warn!("Run {} reported unknown page index {}", run_id, index);
                return false;
            };
            if existing.url() != record.url() || existing.is_terminal() {
                ::log::warn!("Run {} sent an invalid update for {}", run_id, record.url());
                return false;
            }
            if snapshot.records[..index].iter().any(|page| !page.is_terminal()) {
                ::log::warn!("Run {} reported page {} out of order", run_id, index);
                return false;
            }
            if *existing == record {
                return false;
            }
            snapshot.records[index] = record;
            true
        }
        ScanMessage::Finished { .. } | ScanMessage::Cancelled { .. } => {
            snapshot.in_progress = false;
            true
        }
    }
}
