/// Which delay class to wait before the next status query. The runtime maps
/// these to concrete durations so tests can run on a virtual clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDelay {
    /// Normal cadence after an in-progress answer (2000 ms by contract).
    Next,
    /// Longer pause after a transport error (5000 ms by contract).
    Backoff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue a status query now.
    QueryStatus,
    /// Wait, then feed `Msg::PollDue` back in.
    SchedulePoll { delay: PollDelay },
    /// One-shot schedule-build trigger (not idempotent-safe; never retried).
    TriggerScheduleBuild,
    /// Fetch the schedule preview (only after the trigger was acknowledged).
    FetchPreview,
    /// Run the publish sequence for the current inclusion set.
    RunPublish,
}
