//! Clipwatch core: pure job-watch state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, PollDelay};
pub use msg::{Msg, StatusReport};
pub use state::{JobId, Phase, Platform, PublishState, ScheduleItem, WatchState};
pub use update::update;
pub use view_model::{ItemRowView, JobView};
