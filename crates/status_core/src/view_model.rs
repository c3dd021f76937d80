use crate::{PollerPhase, Seq, StatusEntry, StatusKind};

/// Per-status counts of the last applied snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSummary {
    pub total: usize,
    pub completed: usize,
    pub scraping: usize,
    pub failed: usize,
    pub other: usize,
}

impl StatusSummary {
    pub fn from_entries(entries: &[StatusEntry]) -> Self {
        let mut summary = Self {
            total: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            match entry.kind() {
                StatusKind::Completed => summary.completed += 1,
                StatusKind::Scraping => summary.scraping += 1,
                StatusKind::Failed => summary.failed += 1,
                StatusKind::Other(_) => summary.other += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollerViewModel {
    pub phase: PollerPhase,
    pub cycles_issued: u64,
    pub cycles_applied: u64,
    pub failures: u64,
    pub stale_discarded: u64,
    pub in_flight: usize,
    pub last_applied_seq: Option<Seq>,
    pub summary: StatusSummary,
    pub dirty: bool,
}
