use clipwatch_core::{Platform, ScheduleItem, StatusReport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Writing tone requested for generated posts. Wire values match the
/// backend's expected strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Professional,
    Casual,
    Bold,
}

/// How much emoji the generated posts may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmojiUsage {
    None,
    Light,
    Medium,
}

/// Request body for creating a new content-generation job.
#[derive(Debug, Clone, Serialize)]
pub struct NewJobRequest {
    pub url: String,
    pub tone: Tone,
    pub emoji_usage: EmojiUsage,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected client-side before any network call.
    #[error("invalid source url: {0}")]
    InvalidUrl(String),
    /// The video has no captions the backend can work with.
    #[error("captions unavailable: {0}")]
    CaptionsUnavailable(String),
    /// The video cannot be processed due to access restrictions.
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("http status {status}")]
    Http { status: u16 },
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Whether a failed status query should be retried on the backoff
    /// cadence. Transport-level and malformed-response failures are assumed
    /// transient; classified rejections are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ServiceError::Http { .. }
                | ServiceError::Timeout
                | ServiceError::Network(_)
                | ServiceError::Decode(_)
        )
    }
}

// Wire DTOs. The formats mirror what the backend actually sends; they stay
// private to this crate and convert into core types at the boundary.

#[derive(Debug, Deserialize)]
pub(crate) struct JobCreatedBody {
    pub id: String,
}

/// Classified error body returned by the backend on creation failures.
#[derive(Debug, Deserialize)]
pub(crate) struct CreationErrorBody {
    pub error: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CreationErrorBody {
    pub(crate) fn classify(self, status: u16) -> ServiceError {
        let reason = self.reason.unwrap_or_default();
        match self.error.as_str() {
            "TRANSCRIPT_NOT_AVAILABLE" => ServiceError::CaptionsUnavailable(reason),
            "TRANSCRIPT_ACCESS_DENIED" => ServiceError::AccessDenied(reason),
            _ => ServiceError::Http { status },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusBody {
    pub(crate) fn into_report(self) -> StatusReport {
        match self.status.as_str() {
            "completed" => StatusReport::Completed,
            "failed" => StatusReport::Failed { detail: self.error },
            // "queued", "processing" and anything newer the backend may add.
            _ => StatusReport::InProgress,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WirePlatform {
    Twitter,
    Linkedin,
}

impl From<WirePlatform> for Platform {
    fn from(wire: WirePlatform) -> Self {
        match wire {
            WirePlatform::Twitter => Platform::Twitter,
            WirePlatform::Linkedin => Platform::LinkedIn,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewItemBody {
    pub id: String,
    pub platform: WirePlatform,
    #[serde(default)]
    pub date: Option<String>,
    pub preview: String,
}

impl From<PreviewItemBody> for ScheduleItem {
    fn from(body: PreviewItemBody) -> Self {
        ScheduleItem::new(body.id, body.platform.into(), body.preview, body.date)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InclusionBody<'a> {
    pub items: Vec<InclusionEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct InclusionEntry<'a> {
    pub id: &'a str,
    pub included: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunScheduleBody {
    pub published_count: u64,
}
