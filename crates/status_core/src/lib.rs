//! Status core: pure poll-cycle state machine and badge mapping helpers.
mod effect;
mod msg;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{PollerPhase, PollerState, Seq};
pub use status::{
    badge_for, badge_selector, BadgeClass, BadgeUpdate, BadgeView, StatusEntry, StatusKind,
    BADGE_SELECTOR_PREFIX, DEFAULT_CONTAINER_SELECTOR, STATUS_CLASSES,
};
pub use update::update;
pub use view_model::{PollerViewModel, StatusSummary};
