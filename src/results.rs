use crate::pages::{PageScan, PageStatus};
use serde::{Deserialize, Serialize};

/// What a renderer sees: the tracked pages and whether a scan is running
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    /// Run that produced this snapshot (0 before the first submission)
    pub run_id: u64,

    /// Pages in scan order
    pub records: Vec<PageScan>,

    /// True from submission until the last page is reported
    pub in_progress: bool,
}

impl ScanSnapshot {
    pub fn completed_count(&self) -> usize {
        self.count(PageStatus::Completed)
    }

    pub fn failed_count(&self) -> usize {
        self.count(PageStatus::Failed)
    }

    /// Whether at least one page completed, which unlocks the integration step
    pub fn can_continue(&self) -> bool {
        self.completed_count() > 0
    }

    /// Whether the scan finished and every page reached a final state
    pub fn is_complete(&self) -> bool {
        !self.in_progress && !self.records.is_empty() && self.records.iter().all(PageScan::is_terminal)
    }

    fn count(&self, status: PageStatus) -> usize {
        self.records.iter().filter(|page| page.status() == status).count()
    }
}

/// Outcome of a finished scan run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub run_id: u64,
    pub completed: usize,
    pub failed: usize,
}

impl From<&ScanSnapshot> for ScanSummary {
    fn from(snapshot: &ScanSnapshot) -> Self {
        Self {
            run_id: snapshot.run_id,
            completed: snapshot.completed_count(),
            failed: snapshot.failed_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::pending_pages;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = ScanSnapshot::default();
        assert!(!snapshot.can_continue());
        assert!(!snapshot.is_complete());
        assert_eq!(snapshot.completed_count(), 0);
    }

    #[test]
    fn test_can_continue_after_one_page() {
        let mut records = pending_pages("https://acme.com");
        records[0] = records[0].clone().complete(vec!["chunk".to_string()]).unwrap();
        let snapshot = ScanSnapshot {
            run_id: 1,
            records,
            in_progress: true,
        };
        assert!(snapshot.can_continue());
        assert!(!snapshot.is_complete());
        assert_eq!(ScanSummary::from(&snapshot).completed, 1);
    }
}
