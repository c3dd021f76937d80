use crate::{Seq, StatusEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Poller attached to a page; records whether the status container exists.
    Attached { container_present: bool },
    /// Timer fired, or a one-shot poll was requested.
    Tick,
    /// Response for request `seq` decoded successfully.
    PollSucceeded { seq: Seq, entries: Vec<StatusEntry> },
    /// Request `seq` failed (network, status or parse).
    PollFailed { seq: Seq, message: String },
    /// Poller torn down; late responses are ignored from now on.
    Stopped,
}
