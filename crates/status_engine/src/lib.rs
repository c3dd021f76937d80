//! Status engine: HTTP fetching, badge lookup and the timer-driven poller.
mod dom;
mod fetch;
mod poller;
mod types;
mod wire;

pub use dom::{BadgeDom, BadgeElement, InMemoryBadge, InMemoryDom};
pub use fetch::{FetchSettings, ReqwestStatusFetcher, StatusFetcher};
pub use poller::{render_badges, PollSettings, RenderReport, StatusPoller};
pub use types::{FailureKind, PollFailure};
pub use wire::parse_status_response;
