//! Clipwatch client: remote job-service access and the watcher runtime.
mod api;
mod types;
mod watcher;

pub use api::{validate_source_url, ClientSettings, HttpJobService, JobService};
pub use types::{EmojiUsage, NewJobRequest, ServiceError, Tone};
pub use watcher::{JobWatcher, PollTiming, PublishError};
