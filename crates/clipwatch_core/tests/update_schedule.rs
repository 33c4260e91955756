use std::sync::Once;

use clipwatch_core::{
    update, Effect, Msg, Phase, Platform, ScheduleItem, StatusReport, WatchState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

fn two_items() -> Vec<ScheduleItem> {
    vec![
        ScheduleItem::new(
            "item-a",
            Platform::Twitter,
            "First post",
            Some("2026-09-01".to_string()),
        ),
        ScheduleItem::new("item-b", Platform::LinkedIn, "Second post", None),
    ]
}

/// Runs a state through `in-progress, in-progress, completed` plus the
/// completion sequence, mirroring the happy-path scenario end to end.
fn reach_ready(job_id: &str) -> WatchState {
    let state = WatchState::new(job_id.to_string());
    let (state, _) = update(state, Msg::StatusArrived(StatusReport::InProgress));
    let (state, _) = update(state, Msg::PollDue);
    let (state, _) = update(state, Msg::StatusArrived(StatusReport::InProgress));
    let (state, _) = update(state, Msg::PollDue);
    let (state, effects) = update(state, Msg::StatusArrived(StatusReport::Completed));
    assert_eq!(effects, vec![Effect::TriggerScheduleBuild]);
    let (state, effects) = update(state, Msg::ScheduleTriggered);
    assert_eq!(effects, vec![Effect::FetchPreview]);
    let (state, effects) = update(state, Msg::PreviewLoaded { items: two_items() });
    assert!(effects.is_empty());
    state
}

#[test]
fn completion_sequence_reaches_ready_with_all_items_included() {
    init_logging();
    let state = reach_ready("job-1");
    let view = state.view();

    assert_eq!(view.phase, Phase::Ready);
    assert_eq!(view.items.len(), 2);
    assert!(view.items.iter().all(|item| item.included));
    assert_eq!(view.included_count, 2);
}

#[test]
fn completed_status_enters_generating_before_the_trigger_resolves() {
    init_logging();
    let state = WatchState::new("job-1".to_string());
    let (state, _) = update(state, Msg::StatusArrived(StatusReport::InProgress));

    let (state, effects) = update(state, Msg::StatusArrived(StatusReport::Completed));

    assert_eq!(state.phase(), Phase::GeneratingSchedule);
    assert_eq!(effects, vec![Effect::TriggerScheduleBuild]);
}

#[test]
fn trigger_failure_is_terminal() {
    init_logging();
    let state = WatchState::new("job-1".to_string());
    let (state, _) = update(state, Msg::StatusArrived(StatusReport::Completed));

    let (state, effects) = update(
        state,
        Msg::CompletionFailed {
            error: "schedule trigger rejected".to_string(),
        },
    );

    assert_eq!(state.phase(), Phase::Error);
    assert!(state.view().message.contains("schedule trigger rejected"));
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::PollDue);
    assert_eq!(state.phase(), Phase::Error);
    assert!(effects.is_empty());
}

#[test]
fn preview_fetch_failure_after_trigger_is_terminal() {
    init_logging();
    let state = WatchState::new("job-1".to_string());
    let (state, _) = update(state, Msg::StatusArrived(StatusReport::Completed));
    let (state, _) = update(state, Msg::ScheduleTriggered);

    let (state, _effects) = update(
        state,
        Msg::CompletionFailed {
            error: "preview unavailable".to_string(),
        },
    );

    assert_eq!(state.phase(), Phase::Error);
    assert!(state.view().items.is_empty());
}

#[test]
fn toggling_changes_flags_but_never_membership() {
    init_logging();
    let state = reach_ready("job-1");
    let ids_before: Vec<_> = state.view().items.iter().map(|i| i.id.clone()).collect();

    let (state, effects) = update(
        state,
        Msg::InclusionToggled {
            item_id: "item-a".to_string(),
            included: false,
        },
    );
    assert!(effects.is_empty());

    let view = state.view();
    let ids_after: Vec<_> = view.items.iter().map(|i| i.id.clone()).collect();
    assert_eq!(ids_before, ids_after);
    assert_eq!(view.included_count, 1);
    assert!(!view.items.iter().find(|i| i.id == "item-a").unwrap().included);
    assert!(view.items.iter().find(|i| i.id == "item-b").unwrap().included);

    // Toggling back restores the flag.
    let (state, _effects) = update(
        state,
        Msg::InclusionToggled {
            item_id: "item-a".to_string(),
            included: true,
        },
    );
    assert_eq!(state.view().included_count, 2);
}

#[test]
fn toggling_an_unknown_id_is_a_no_op() {
    init_logging();
    let state = reach_ready("job-1");
    let before = state.view();

    let (state, effects) = update(
        state,
        Msg::InclusionToggled {
            item_id: "no-such-item".to_string(),
            included: false,
        },
    );

    assert_eq!(state.view(), before);
    assert!(effects.is_empty());
}

#[test]
fn ready_is_terminal_for_poll_messages() {
    init_logging();
    let state = reach_ready("job-1");

    let (state, effects) = update(state, Msg::PollDue);
    assert_eq!(state.phase(), Phase::Ready);
    assert!(effects.is_empty());

    // A stale in-progress answer must not clear the reconciled items.
    let (state, effects) = update(state, Msg::StatusArrived(StatusReport::InProgress));
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.view().items.len(), 2);
    assert!(effects.is_empty());
}
