use std::sync::Once;

use clipwatch_core::{
    update, Effect, Msg, Phase, Platform, PublishState, ScheduleItem, StatusReport, WatchState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

fn ready_state(items: Vec<ScheduleItem>) -> WatchState {
    let state = WatchState::new("job-1".to_string());
    let (state, _) = update(state, Msg::StatusArrived(StatusReport::Completed));
    let (state, _) = update(state, Msg::ScheduleTriggered);
    let (state, _) = update(state, Msg::PreviewLoaded { items });
    assert_eq!(state.phase(), Phase::Ready);
    state
}

fn one_item(id: &str) -> ScheduleItem {
    ScheduleItem::new(id, Platform::Twitter, "post body", None)
}

#[test]
fn publish_request_in_ready_emits_run_publish() {
    init_logging();
    let state = ready_state(vec![one_item("item-a")]);

    let (state, effects) = update(state, Msg::PublishRequested);

    assert_eq!(effects, vec![Effect::RunPublish]);
    assert_eq!(state.view().publish, PublishState::InFlight);
    assert!(!state.view().can_publish());
}

#[test]
fn publish_request_is_rejected_before_ready() {
    init_logging();
    let state = WatchState::new("job-1".to_string());
    let (state, _) = update(state, Msg::StatusArrived(StatusReport::InProgress));

    let (state, effects) = update(state, Msg::PublishRequested);

    assert!(effects.is_empty());
    assert_eq!(state.view().publish, PublishState::Idle);
}

#[test]
fn publish_request_with_nothing_included_is_rejected() {
    init_logging();
    let state = ready_state(vec![one_item("item-a")]);
    let (state, _) = update(
        state,
        Msg::InclusionToggled {
            item_id: "item-a".to_string(),
            included: false,
        },
    );
    assert!(!state.view().can_publish());

    let (state, effects) = update(state, Msg::PublishRequested);

    assert!(effects.is_empty());
    assert_eq!(state.view().publish, PublishState::Idle);
}

#[test]
fn second_publish_request_while_in_flight_is_ignored() {
    init_logging();
    let state = ready_state(vec![one_item("item-a")]);
    let (state, _) = update(state, Msg::PublishRequested);

    let (state, effects) = update(state, Msg::PublishRequested);

    assert!(effects.is_empty());
    assert_eq!(state.view().publish, PublishState::InFlight);
}

#[test]
fn successful_publish_records_the_count() {
    init_logging();
    let state = ready_state(vec![one_item("item-a"), one_item("item-b")]);
    let (state, _) = update(state, Msg::PublishRequested);

    let (state, effects) = update(state, Msg::PublishFinished { result: Ok(2) });

    assert!(effects.is_empty());
    assert_eq!(state.view().publish, PublishState::Published(2));
    assert_eq!(state.phase(), Phase::Ready);
}

#[test]
fn publish_failure_is_action_level_and_leaves_items_intact() {
    init_logging();
    let state = ready_state(vec![one_item("item-a"), one_item("item-b")]);
    let items_before = state.view().items.clone();
    let (state, _) = update(state, Msg::PublishRequested);

    let (state, _effects) = update(
        state,
        Msg::PublishFinished {
            result: Err("publish endpoint unavailable".to_string()),
        },
    );

    let view = state.view();
    assert_eq!(
        view.publish,
        PublishState::Failed("publish endpoint unavailable".to_string())
    );
    assert_eq!(view.phase, Phase::Ready);
    assert_eq!(view.items, items_before);
    // The action may be retried manually.
    assert!(view.can_publish());
}

#[test]
fn inclusions_reflect_the_current_toggle_state_in_order() {
    init_logging();
    let state = ready_state(vec![one_item("item-a"), one_item("item-b")]);
    let (state, _) = update(
        state,
        Msg::InclusionToggled {
            item_id: "item-b".to_string(),
            included: false,
        },
    );

    assert_eq!(
        state.inclusions(),
        vec![
            ("item-a".to_string(), true),
            ("item-b".to_string(), false),
        ]
    );
}
