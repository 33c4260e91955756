use crate::{Phase, Platform, PublishState};

/// Read-only snapshot handed to the UI layer after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobView {
    pub phase: Phase,
    pub message: String,
    pub error_detail: Option<String>,
    pub items: Vec<ItemRowView>,
    pub included_count: usize,
    pub publish: PublishState,
}

impl JobView {
    /// Whether the publish action would currently be accepted.
    pub fn can_publish(&self) -> bool {
        self.phase == Phase::Ready
            && self.included_count > 0
            && self.publish != PublishState::InFlight
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub id: String,
    pub platform: Platform,
    pub content: String,
    pub scheduled_date: Option<String>,
    pub included: bool,
}
