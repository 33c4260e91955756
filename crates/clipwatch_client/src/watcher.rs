use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clipwatch_core::{
    update, Effect, JobId, JobView, Msg, Phase, PollDelay, PublishState, StatusReport, WatchState,
};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use watch_logging::{watch_debug, watch_info, watch_warn};

use crate::api::JobService;
use crate::types::ServiceError;

/// Concrete durations behind the core's abstract poll delays. Injectable so
/// tests run on tokio's paused clock instead of real timers.
#[derive(Debug, Clone, Copy)]
pub struct PollTiming {
    pub poll_interval: Duration,
    pub retry_interval: Duration,
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            retry_interval: Duration::from_millis(5000),
        }
    }
}

impl PollTiming {
    fn duration(&self, delay: PollDelay) -> Duration {
        match delay {
            PollDelay::Next => self.poll_interval,
            PollDelay::Backoff => self.retry_interval,
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    /// The job has not reached `Ready` (or a publish is already running).
    #[error("the schedule is not ready to publish")]
    NotReady,
    /// Every item is currently excluded; rejected before any network call.
    #[error("no items are selected for publishing")]
    NothingSelected,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Drives one job from unknown to a terminal phase against a remote service
/// that only answers point-in-time queries.
///
/// The UI layer holds this handle: it starts/stops watches, toggles item
/// inclusion, requests publishing, and observes the reconciled view model
/// through [`JobWatcher::subscribe`].
pub struct JobWatcher {
    service: Arc<dyn JobService>,
    timing: PollTiming,
    shared: Arc<Shared>,
    active: Mutex<Option<CancellationToken>>,
}

struct Shared {
    state: Mutex<WatchState>,
    view_tx: watch::Sender<JobView>,
}

impl Shared {
    /// Applies one message to the owned state and broadcasts the new view.
    fn apply(&self, msg: Msg) -> Vec<Effect> {
        let mut state = self.state.lock().expect("watch state lock");
        Self::apply_locked(&mut state, &self.view_tx, msg)
    }

    /// Watch-task variant: the liveness check happens under the state lock,
    /// so a token cancelled by `stop()` can never interleave between the
    /// check and the mutation. `stop()` takes the same lock as a barrier.
    fn apply_if_live(&self, token: &CancellationToken, msg: Msg) -> Vec<Effect> {
        let mut state = self.state.lock().expect("watch state lock");
        if token.is_cancelled() {
            return Vec::new();
        }
        Self::apply_locked(&mut state, &self.view_tx, msg)
    }

    fn apply_locked(
        state: &mut WatchState,
        view_tx: &watch::Sender<JobView>,
        msg: Msg,
    ) -> Vec<Effect> {
        let current = std::mem::take(state);
        let (next, effects) = update(current, msg);
        *state = next;
        let _ = view_tx.send(state.view());
        effects
    }
}

impl JobWatcher {
    pub fn new(service: Arc<dyn JobService>, timing: PollTiming) -> Self {
        let (view_tx, _view_rx) = watch::channel(JobView::default());
        Self {
            service,
            timing,
            shared: Arc::new(Shared {
                state: Mutex::new(WatchState::default()),
                view_tx,
            }),
            active: Mutex::new(None),
        }
    }

    /// Observes every reconciled view-model change, starting from the
    /// current one.
    pub fn subscribe(&self) -> watch::Receiver<JobView> {
        self.shared.view_tx.subscribe()
    }

    pub fn current_view(&self) -> JobView {
        self.shared.state.lock().expect("watch state lock").view()
    }

    /// Begins watching `job_id`. Any previous watch is cancelled first; its
    /// in-flight responses and pending timers are discarded without effect.
    pub fn start(&self, job_id: impl Into<JobId>) {
        self.stop();
        let job_id: JobId = job_id.into();
        watch_info!("watching job {}", job_id);

        {
            let mut state = self.shared.state.lock().expect("watch state lock");
            *state = WatchState::new(job_id);
            let _ = self.shared.view_tx.send(state.view());
        }

        let token = CancellationToken::new();
        *self.active.lock().expect("active watch lock") = Some(token.clone());
        tokio::spawn(run_watch(
            self.service.clone(),
            self.shared.clone(),
            token,
            self.timing,
        ));
    }

    /// Stops the current watch, if any. Idempotent. After this returns, no
    /// already-scheduled poll or in-flight response will mutate the state.
    pub fn stop(&self) {
        if let Some(token) = self.active.lock().expect("active watch lock").take() {
            token.cancel();
            // Barrier: an apply that already holds the state lock finishes
            // before stop returns; any later one observes the cancelled
            // token and becomes a no-op.
            drop(self.shared.state.lock().expect("watch state lock"));
        }
    }

    /// Flips one item's inclusion flag in the reconciled list. Purely local;
    /// never touches the network or the watcher phase.
    pub fn toggle_inclusion(&self, item_id: &str, included: bool) {
        self.shared.apply(Msg::InclusionToggled {
            item_id: item_id.to_string(),
            included,
        });
    }

    /// Publishes the currently included items: pushes the inclusion set to
    /// the server, then fires the run trigger. Only valid once the job is
    /// `Ready` with at least one item selected. Failure is action-level: the
    /// phase and the reconciled items stay intact and the user may retry.
    pub async fn publish(&self) -> Result<u64, PublishError> {
        let (job_id, inclusions) = {
            let state = self.shared.state.lock().expect("watch state lock");
            if state.phase() != Phase::Ready
                || *state.publish_state() == PublishState::InFlight
            {
                return Err(PublishError::NotReady);
            }
            if state.included_count() == 0 {
                return Err(PublishError::NothingSelected);
            }
            (state.job_id().to_string(), state.inclusions())
        };

        let effects = self.shared.apply(Msg::PublishRequested);
        if !effects.contains(&Effect::RunPublish) {
            return Err(PublishError::NotReady);
        }

        let outcome = async {
            self.service.sync_inclusions(&job_id, &inclusions).await?;
            self.service.run_schedule(&job_id).await
        }
        .await;

        match outcome {
            Ok(count) => {
                watch_info!("published {} items for job {}", count, job_id);
                self.shared.apply(Msg::PublishFinished { result: Ok(count) });
                Ok(count)
            }
            Err(err) => {
                watch_warn!("publish failed for job {}: {}", job_id, err);
                self.shared.apply(Msg::PublishFinished {
                    result: Err(err.to_string()),
                });
                Err(PublishError::Service(err))
            }
        }
    }
}

impl Drop for JobWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Single next-action scheduler: pops one effect at a time, checks liveness,
/// performs it, and feeds the outcome back through the pure update function.
/// Status queries and the completion sequence are strictly sequential; the
/// loop ends when no effects remain (terminal phase) or the token fires.
async fn run_watch(
    service: Arc<dyn JobService>,
    shared: Arc<Shared>,
    token: CancellationToken,
    timing: PollTiming,
) {
    let job_id = {
        let state = shared.state.lock().expect("watch state lock");
        state.job_id().to_string()
    };

    let mut queue: VecDeque<Effect> = VecDeque::from([Effect::QueryStatus]);

    while let Some(effect) = queue.pop_front() {
        if token.is_cancelled() {
            return;
        }

        let msg = match effect {
            Effect::QueryStatus => {
                let outcome = tokio::select! {
                    _ = token.cancelled() => return,
                    outcome = service.query_status(&job_id) => outcome,
                };
                match outcome {
                    Ok(report) => Msg::StatusArrived(report),
                    Err(err) if err.is_transient() => {
                        watch_debug!("status query for {} failed: {}", job_id, err);
                        Msg::StatusUnreachable {
                            error: err.to_string(),
                        }
                    }
                    Err(err) => {
                        watch_warn!("status query for {} rejected: {}", job_id, err);
                        Msg::StatusArrived(StatusReport::Failed {
                            detail: Some(err.to_string()),
                        })
                    }
                }
            }
            Effect::SchedulePoll { delay } => {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(timing.duration(delay)) => {}
                }
                Msg::PollDue
            }
            Effect::TriggerScheduleBuild => {
                let outcome = tokio::select! {
                    _ = token.cancelled() => return,
                    outcome = service.trigger_schedule(&job_id) => outcome,
                };
                match outcome {
                    Ok(()) => Msg::ScheduleTriggered,
                    Err(err) => Msg::CompletionFailed {
                        error: err.to_string(),
                    },
                }
            }
            Effect::FetchPreview => {
                let outcome = tokio::select! {
                    _ = token.cancelled() => return,
                    outcome = service.fetch_preview(&job_id) => outcome,
                };
                match outcome {
                    Ok(items) => Msg::PreviewLoaded { items },
                    Err(err) => Msg::CompletionFailed {
                        error: err.to_string(),
                    },
                }
            }
            // Publishing runs on the caller in `JobWatcher::publish`.
            Effect::RunPublish => continue,
        };

        // A response that arrived after cancellation is silently discarded
        // by the liveness check inside apply_if_live.
        queue.extend(shared.apply_if_live(&token, msg));
    }

    watch_debug!("watch for job {} reached a terminal phase", job_id);
}
