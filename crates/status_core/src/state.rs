use crate::view_model::{PollerViewModel, StatusSummary};
use crate::StatusEntry;

/// Request sequence number; the first request of a poller is 1.
pub type Seq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerPhase {
    /// Not yet attached to a page.
    #[default]
    Idle,
    /// Attached, but the page has no status container.
    Inactive,
    Polling,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerState {
    phase: PollerPhase,
    discard_stale: bool,
    next_seq: Seq,
    accept_from: Seq,
    last_applied: Option<Seq>,
    in_flight: usize,
    cycles_issued: u64,
    cycles_applied: u64,
    failures: u64,
    stale_discarded: u64,
    summary: StatusSummary,
    dirty: bool,
}

impl Default for PollerState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PollerState {
    pub fn new(discard_stale: bool) -> Self {
        Self {
            phase: PollerPhase::Idle,
            discard_stale,
            next_seq: 1,
            accept_from: 1,
            last_applied: None,
            in_flight: 0,
            cycles_issued: 0,
            cycles_applied: 0,
            failures: 0,
            stale_discarded: 0,
            summary: StatusSummary::default(),
            dirty: false,
        }
    }

    pub fn phase(&self) -> PollerPhase {
        self.phase
    }

    pub fn last_applied(&self) -> Option<Seq> {
        self.last_applied
    }

    pub fn view(&self) -> PollerViewModel {
        PollerViewModel {
            phase: self.phase,
            cycles_issued: self.cycles_issued,
            cycles_applied: self.cycles_applied,
            failures: self.failures,
            stale_discarded: self.stale_discarded,
            in_flight: self.in_flight,
            last_applied_seq: self.last_applied,
            summary: self.summary.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Responses to requests issued before this call are treated as late.
    pub(crate) fn begin_session(&mut self) {
        self.accept_from = self.next_seq;
    }

    /// Whether `seq` was issued during the current polling session.
    pub(crate) fn is_current(&self, seq: Seq) -> bool {
        self.phase == PollerPhase::Polling && seq >= self.accept_from
    }

    pub(crate) fn set_phase(&mut self, phase: PollerPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
    }

    pub(crate) fn issue_request(&mut self) -> Seq {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight += 1;
        self.cycles_issued += 1;
        self.dirty = true;
        seq
    }

    fn settle_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dirty = true;
    }

    /// Whether a response to `seq` may still be applied.
    pub(crate) fn accepts(&self, seq: Seq) -> bool {
        match self.last_applied {
            Some(last) if self.discard_stale => seq > last,
            _ => true,
        }
    }

    pub(crate) fn apply_response(&mut self, seq: Seq, entries: &[StatusEntry]) {
        self.settle_request();
        self.last_applied = Some(self.last_applied.map_or(seq, |last| last.max(seq)));
        self.cycles_applied += 1;
        self.summary = StatusSummary::from_entries(entries);
    }

    pub(crate) fn discard_response(&mut self) {
        self.settle_request();
        self.stale_discarded += 1;
    }

    pub(crate) fn drop_late_response(&mut self) {
        self.settle_request();
    }

    pub(crate) fn record_failure(&mut self) {
        self.settle_request();
        self.failures += 1;
    }
}
