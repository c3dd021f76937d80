use crate::{BadgeUpdate, Seq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one request to the status endpoint, tagged with `seq`.
    FetchStatus { seq: Seq },
    /// Apply badge updates from the response to request `seq`.
    RenderBadges { seq: Seq, updates: Vec<BadgeUpdate> },
    /// Record a failed cycle in the diagnostic log.
    LogFailure { seq: Seq, message: String },
}
