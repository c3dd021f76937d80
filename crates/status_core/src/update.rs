use crate::{BadgeUpdate, Effect, Msg, PollerPhase, PollerState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PollerState, msg: Msg) -> (PollerState, Vec<Effect>) {
    let effects = match msg {
        Msg::Attached { container_present } => {
            match state.phase() {
                PollerPhase::Idle | PollerPhase::Inactive | PollerPhase::Stopped => {
                    if container_present {
                        state.begin_session();
                        state.set_phase(PollerPhase::Polling);
                    } else {
                        state.set_phase(PollerPhase::Inactive);
                    }
                }
                PollerPhase::Polling => {}
            }
            Vec::new()
        }
        Msg::Tick => {
            if state.phase() == PollerPhase::Polling {
                let seq = state.issue_request();
                vec![Effect::FetchStatus { seq }]
            } else {
                Vec::new()
            }
        }
        Msg::PollSucceeded { seq, entries } => {
            if !state.is_current(seq) {
                state.drop_late_response();
                return (state, Vec::new());
            }
            if !state.accepts(seq) {
                state.discard_response();
                return (state, Vec::new());
            }
            state.apply_response(seq, &entries);
            let updates = entries.iter().map(BadgeUpdate::from_entry).collect();
            vec![Effect::RenderBadges { seq, updates }]
        }
        Msg::PollFailed { seq, message } => {
            if !state.is_current(seq) {
                state.drop_late_response();
                return (state, Vec::new());
            }
            state.record_failure();
            vec![Effect::LogFailure { seq, message }]
        }
        Msg::Stopped => {
            if state.phase() == PollerPhase::Polling {
                state.set_phase(PollerPhase::Stopped);
            }
            Vec::new()
        }
    };

    (state, effects)
}
