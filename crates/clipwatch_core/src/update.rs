use crate::{Effect, Msg, Phase, PollDelay, PublishState, StatusReport, WatchState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Poll-related messages arriving in a terminal phase are dropped without
/// effects; a watcher whose job already reached `Ready` or `Error` must never
/// be moved again by a stale response.
pub fn update(mut state: WatchState, msg: Msg) -> (WatchState, Vec<Effect>) {
    let effects = match msg {
        Msg::StatusArrived(report) => {
            if !matches!(state.phase(), Phase::Loading | Phase::Processing) {
                return (state, Vec::new());
            }
            match report {
                StatusReport::InProgress => {
                    state.mark_processing();
                    vec![Effect::SchedulePoll {
                        delay: PollDelay::Next,
                    }]
                }
                StatusReport::Completed => {
                    state.begin_generating();
                    vec![Effect::TriggerScheduleBuild]
                }
                StatusReport::Failed { detail } => {
                    state.fail(detail);
                    Vec::new()
                }
            }
        }
        Msg::StatusUnreachable { error: _ } => {
            // Transient by assumption: phase and items stay untouched, only
            // the next poll moves out to the backoff cadence.
            if matches!(state.phase(), Phase::Loading | Phase::Processing) {
                vec![Effect::SchedulePoll {
                    delay: PollDelay::Backoff,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::PollDue => {
            if matches!(state.phase(), Phase::Loading | Phase::Processing) {
                vec![Effect::QueryStatus]
            } else {
                Vec::new()
            }
        }
        Msg::ScheduleTriggered => {
            if state.phase() == Phase::GeneratingSchedule {
                vec![Effect::FetchPreview]
            } else {
                Vec::new()
            }
        }
        Msg::PreviewLoaded { items } => {
            if state.phase() == Phase::GeneratingSchedule {
                state.load_items(items);
            }
            Vec::new()
        }
        Msg::CompletionFailed { error } => {
            if state.phase() == Phase::GeneratingSchedule {
                state.fail(Some(error));
            }
            Vec::new()
        }
        Msg::InclusionToggled { item_id, included } => {
            if state.phase() == Phase::Ready {
                state.set_included(&item_id, included);
            }
            Vec::new()
        }
        Msg::PublishRequested => {
            let accepted = state.phase() == Phase::Ready
                && state.included_count() > 0
                && *state.publish_state() != PublishState::InFlight;
            if accepted {
                state.begin_publish();
                vec![Effect::RunPublish]
            } else {
                Vec::new()
            }
        }
        Msg::PublishFinished { result } => {
            if *state.publish_state() == PublishState::InFlight {
                state.finish_publish(result);
            }
            Vec::new()
        }
    };

    (state, effects)
}
