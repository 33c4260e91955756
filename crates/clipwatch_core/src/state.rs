use crate::view_model::{ItemRowView, JobView};

/// Opaque, externally assigned job identifier.
pub type JobId = String;

/// Client-side interpretation of job progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Before the first status response has arrived.
    #[default]
    Loading,
    /// The backend reported the job as still in progress.
    Processing,
    /// Status reported completion; schedule trigger/preview in flight.
    GeneratingSchedule,
    /// Schedule preview fetched; polling has stopped.
    Ready,
    /// Terminal failure; polling has stopped.
    Error,
}

impl Phase {
    /// True for `Ready` and `Error`, which no transition ever leaves.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Ready | Phase::Error)
    }
}

/// Target platform of a generated post. Closed set: extending it means
/// adding a variant here, never carrying a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Twitter,
    LinkedIn,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::LinkedIn => "linkedin",
        }
    }
}

/// One generated post candidate belonging to a job's schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleItem {
    pub id: String,
    pub platform: Platform,
    pub content: String,
    pub scheduled_date: Option<String>,
    /// Client-local inclusion flag; defaults to true on load.
    pub included: bool,
}

impl ScheduleItem {
    pub fn new(
        id: impl Into<String>,
        platform: Platform,
        content: impl Into<String>,
        scheduled_date: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            platform,
            content: content.into(),
            scheduled_date,
            included: true,
        }
    }
}

/// Progress of the one-shot publish action. Never feeds back into `Phase`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PublishState {
    #[default]
    Idle,
    InFlight,
    Published(u64),
    Failed(String),
}

const MSG_INITIALIZING: &str = "Contacting the content service...";
const MSG_PROCESSING: &str = "Generating content from the video...";
const MSG_GENERATING: &str = "Generating schedule...";
const MSG_READY: &str = "Schedule ready for review.";
const MSG_FAILED_DEFAULT: &str = "Content generation failed.";

/// Reconciled local state of one watched job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchState {
    job_id: JobId,
    phase: Phase,
    message: String,
    error_detail: Option<String>,
    items: Vec<ScheduleItem>,
    publish: PublishState,
}

impl Default for WatchState {
    fn default() -> Self {
        Self::new(JobId::new())
    }
}

impl WatchState {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            phase: Phase::Loading,
            message: MSG_INITIALIZING.to_string(),
            error_detail: None,
            items: Vec::new(),
            publish: PublishState::Idle,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn included_count(&self) -> usize {
        self.items.iter().filter(|item| item.included).count()
    }

    /// Current (item id, included) pairs, in preview order.
    pub fn inclusions(&self) -> Vec<(String, bool)> {
        self.items
            .iter()
            .map(|item| (item.id.clone(), item.included))
            .collect()
    }

    pub fn view(&self) -> JobView {
        JobView {
            phase: self.phase,
            message: self.message.clone(),
            error_detail: self.error_detail.clone(),
            items: self
                .items
                .iter()
                .map(|item| ItemRowView {
                    id: item.id.clone(),
                    platform: item.platform,
                    content: item.content.clone(),
                    scheduled_date: item.scheduled_date.clone(),
                    included: item.included,
                })
                .collect(),
            included_count: self.included_count(),
            publish: self.publish.clone(),
        }
    }

    pub fn publish_state(&self) -> &PublishState {
        &self.publish
    }

    pub(crate) fn mark_processing(&mut self) {
        self.phase = Phase::Processing;
        self.message = MSG_PROCESSING.to_string();
    }

    pub(crate) fn begin_generating(&mut self) {
        self.phase = Phase::GeneratingSchedule;
        self.message = MSG_GENERATING.to_string();
    }

    /// Replaces the reconciled list with the latest successful preview.
    /// Membership is only ever changed here.
    pub(crate) fn load_items(&mut self, items: Vec<ScheduleItem>) {
        self.items = items;
        self.phase = Phase::Ready;
        self.message = MSG_READY.to_string();
    }

    pub(crate) fn fail(&mut self, detail: Option<String>) {
        self.phase = Phase::Error;
        self.message = match &detail {
            Some(detail) => format!("Generation failed: {detail}"),
            None => MSG_FAILED_DEFAULT.to_string(),
        };
        self.error_detail = detail;
    }

    /// Flips the inclusion flag of the addressed item. Unknown ids are
    /// ignored. Returns whether anything changed.
    pub(crate) fn set_included(&mut self, item_id: &str, included: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) if item.included != included => {
                item.included = included;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn begin_publish(&mut self) {
        self.publish = PublishState::InFlight;
    }

    pub(crate) fn finish_publish(&mut self, result: Result<u64, String>) {
        self.publish = match result {
            Ok(count) => PublishState::Published(count),
            Err(message) => PublishState::Failed(message),
        };
    }
}
