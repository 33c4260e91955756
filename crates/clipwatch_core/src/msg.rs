use crate::ScheduleItem;

/// Point-in-time answer from a successful status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// Queued or processing; keep polling.
    InProgress,
    /// Backend finished; the completion sequence may start.
    Completed,
    /// Backend reported a hard failure.
    Failed { detail: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A status query answered.
    StatusArrived(StatusReport),
    /// A status query failed at the transport level (retried, never terminal).
    StatusUnreachable { error: String },
    /// A scheduled poll delay elapsed.
    PollDue,
    /// The schedule-build trigger was acknowledged.
    ScheduleTriggered,
    /// The schedule preview was fetched.
    PreviewLoaded { items: Vec<ScheduleItem> },
    /// Trigger or preview fetch failed after the job reported completion.
    CompletionFailed { error: String },
    /// User flipped an item's inclusion flag.
    InclusionToggled { item_id: String, included: bool },
    /// User asked to publish the current schedule.
    PublishRequested,
    /// The publish action finished.
    PublishFinished { result: Result<u64, String> },
}
