use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use status_core::{
    update, BadgeUpdate, Effect, Msg, PollerPhase, PollerState, PollerViewModel, Seq,
    DEFAULT_CONTAINER_SELECTOR, STATUS_CLASSES,
};
use status_logging::{status_debug, status_info, status_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{BadgeDom, StatusFetcher};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Time between the starts of two poll cycles.
    pub interval: Duration,
    /// Polling only starts on pages where this element exists.
    pub container_selector: String,
    /// Drop responses that are not newer than the last applied one.
    pub discard_stale: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            container_selector: DEFAULT_CONTAINER_SELECTOR.to_string(),
            discard_stale: true,
        }
    }
}

/// Outcome of rendering one response onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub applied: usize,
    pub missing: usize,
}

/// Replace each matching badge's status class and label. Badges that are not
/// on the page are skipped.
pub fn render_badges(dom: &dyn BadgeDom, updates: &[BadgeUpdate]) -> RenderReport {
    let mut report = RenderReport::default();
    for badge_update in updates {
        let view = &badge_update.view;
        let found = dom.update_badge(&badge_update.selector, &mut |badge| {
            for class in STATUS_CLASSES {
                badge.remove_class(class);
            }
            badge.add_class(view.class.css_class());
            badge.set_text(&view.label);
        });
        if found {
            report.applied += 1;
        } else {
            report.missing += 1;
            status_debug!("No badge for {} ({})", badge_update.id, badge_update.selector);
        }
    }
    report
}

struct Shared {
    fetcher: Arc<dyn StatusFetcher>,
    dom: Arc<dyn BadgeDom>,
    state: Mutex<PollerState>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, PollerState> {
        // `update` replaces the state wholesale, so a poisoned value is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self.lock_state();
        let state = std::mem::take(&mut *guard);
        let (state, effects) = update(state, msg);
        *guard = state;
        effects
    }

    /// Runs render and log effects now; returns the requests still to be issued.
    fn apply_effects(&self, effects: Vec<Effect>) -> Vec<Seq> {
        let mut pending = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchStatus { seq } => pending.push(seq),
                Effect::RenderBadges { seq, updates } => {
                    let report = render_badges(self.dom.as_ref(), &updates);
                    status_debug!(
                        "Applied status response {}: {} badges updated, {} not on page",
                        seq,
                        report.applied,
                        report.missing
                    );
                }
                Effect::LogFailure { seq, message } => {
                    status_warn!("Error fetching status (request {}): {}", seq, message);
                }
            }
        }
        pending
    }

    async fn run_cycle(&self, seq: Seq) {
        let msg = match self.fetcher.fetch_statuses().await {
            Ok(entries) => Msg::PollSucceeded { seq, entries },
            Err(failure) => Msg::PollFailed {
                seq,
                message: failure.to_string(),
            },
        };
        let pending = self.apply_effects(self.dispatch(msg));
        debug_assert!(pending.is_empty(), "completions never issue requests");
    }

    fn tick(self: &Arc<Self>) {
        for seq in self.apply_effects(self.dispatch(Msg::Tick)) {
            let shared = Arc::clone(self);
            tokio::spawn(async move { shared.run_cycle(seq).await });
        }
    }
}

/// Keeps on-page status badges in step with the status endpoint.
///
/// Each instance owns its own timer: `start` begins polling, `stop` (or
/// dropping the poller) cancels it. Cycles may overlap when the endpoint is
/// slower than the interval; the sequence guard in `PollSettings` decides
/// whether an out-of-order response is still rendered.
pub struct StatusPoller {
    shared: Arc<Shared>,
    settings: PollSettings,
    cancel: Mutex<Option<CancellationToken>>,
}

impl StatusPoller {
    pub fn new(
        fetcher: Arc<dyn StatusFetcher>,
        dom: Arc<dyn BadgeDom>,
        settings: PollSettings,
    ) -> Self {
        let shared = Arc::new(Shared {
            fetcher,
            dom,
            state: Mutex::new(PollerState::new(settings.discard_stale)),
        });
        Self {
            shared,
            settings,
            cancel: Mutex::new(None),
        }
    }

    /// Polls once immediately and then on every interval.
    ///
    /// Must be called from within a Tokio runtime. Returns `false`, without
    /// starting a timer, when the page has no status container.
    pub fn start(&self) -> bool {
        if !self.attach() {
            status_info!(
                "No status container {}; polling not started",
                self.settings.container_selector
            );
            return false;
        }

        let mut slot = self.lock_cancel();
        if slot.is_some() {
            return true;
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());

        let period = self.settings.interval.max(MIN_INTERVAL);
        status_info!("Status polling started, interval {:?}", period);
        tokio::spawn(run_timer(Arc::clone(&self.shared), period, token));
        true
    }

    /// Cancels the timer. Responses still in flight are not rendered.
    pub fn stop(&self) {
        if let Some(token) = self.lock_cancel().take() {
            token.cancel();
            status_info!("Status polling stopped");
        }
        self.shared.dispatch(Msg::Stopped);
    }

    pub fn is_running(&self) -> bool {
        self.lock_cancel().is_some()
    }

    /// Runs a single poll cycle to completion without starting the timer.
    pub async fn poll_once(&self) -> PollerViewModel {
        if self.attach() {
            for seq in self.shared.apply_effects(self.shared.dispatch(Msg::Tick)) {
                self.shared.run_cycle(seq).await;
            }
        }
        self.view()
    }

    pub fn view(&self) -> PollerViewModel {
        self.shared.lock_state().view()
    }

    /// Returns the current view if anything changed since the last call.
    pub fn take_view_if_dirty(&self) -> Option<PollerViewModel> {
        let mut state = self.shared.lock_state();
        let view = state.view();
        state.consume_dirty().then_some(view)
    }

    fn attach(&self) -> bool {
        let phase = self.shared.lock_state().phase();
        if phase == PollerPhase::Polling {
            return true;
        }
        let container_present = self
            .shared
            .dom
            .has_container(&self.settings.container_selector);
        self.shared.dispatch(Msg::Attached { container_present });
        container_present
    }

    fn lock_cancel(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.cancel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_timer(shared: Arc<Shared>, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => shared.tick(),
        }
    }
    status_debug!("Status poll timer exited");
}
