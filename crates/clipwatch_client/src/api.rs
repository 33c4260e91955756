use std::time::Duration;

use clipwatch_core::{JobId, ScheduleItem, StatusReport};
use watch_logging::watch_debug;

use crate::types::{
    CreationErrorBody, InclusionBody, InclusionEntry, JobCreatedBody, NewJobRequest,
    PreviewItemBody, RunScheduleBody, ServiceError, StatusBody,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The remote job service, reduced to the operations the watcher and the UI
/// layer actually consume.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    /// Submits a source video for content generation and returns the new
    /// job id. Creation failures come back classified (captions, access).
    async fn create_job(&self, request: &NewJobRequest) -> Result<JobId, ServiceError>;

    /// Point-in-time status query. Failures here are treated as transient
    /// by the watcher and retried.
    async fn query_status(&self, job_id: &str) -> Result<StatusReport, ServiceError>;

    /// One-shot schedule-build trigger. Not idempotent-safe; the watcher
    /// never retries it.
    async fn trigger_schedule(&self, job_id: &str) -> Result<(), ServiceError>;

    /// Fetches the generated schedule preview.
    async fn fetch_preview(&self, job_id: &str) -> Result<Vec<ScheduleItem>, ServiceError>;

    /// Pushes the current inclusion flags to the server so the run trigger
    /// publishes exactly the selected items.
    async fn sync_inclusions(
        &self,
        job_id: &str,
        inclusions: &[(String, bool)],
    ) -> Result<(), ServiceError>;

    /// Runs the schedule and returns the number of published items.
    async fn run_schedule(&self, job_id: &str) -> Result<u64, ServiceError>;
}

/// Rejects source URLs that cannot possibly be a supported video link,
/// before any job is created.
pub fn validate_source_url(raw: &str) -> Result<(), ServiceError> {
    let parsed = url::Url::parse(raw)
        .map_err(|err| ServiceError::InvalidUrl(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ServiceError::InvalidUrl(format!(
            "unsupported scheme {}",
            parsed.scheme()
        )));
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| ServiceError::InvalidUrl("missing host".to_string()))?;
    let supported = host == "youtu.be"
        || host == "youtube.com"
        || host.ends_with(".youtube.com");
    if !supported {
        return Err(ServiceError::InvalidUrl(format!(
            "unsupported video host {host}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct HttpJobService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJobService {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/content/{path}", self.base_url)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Http {
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| ServiceError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobService for HttpJobService {
    async fn create_job(&self, request: &NewJobRequest) -> Result<JobId, ServiceError> {
        validate_source_url(&request.url)?;

        let response = self
            .client
            .post(self.endpoint("create"))
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // Creation failures carry a classified body; fall back to the
            // bare status when it does not parse.
            let text = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<CreationErrorBody>(&text) {
                Ok(body) => body.classify(status.as_u16()),
                Err(_) => ServiceError::Http {
                    status: status.as_u16(),
                },
            });
        }

        let body: JobCreatedBody = response
            .json()
            .await
            .map_err(|err| ServiceError::Decode(err.to_string()))?;
        Ok(body.id)
    }

    async fn query_status(&self, job_id: &str) -> Result<StatusReport, ServiceError> {
        let response = self
            .client
            .get(self.endpoint(&format!("status/{job_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: StatusBody = Self::read_json(response).await?;
        Ok(body.into_report())
    }

    async fn trigger_schedule(&self, job_id: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.endpoint(&format!("schedule/{job_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Http {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn fetch_preview(&self, job_id: &str) -> Result<Vec<ScheduleItem>, ServiceError> {
        let response = self
            .client
            .get(self.endpoint(&format!("schedule/preview/{job_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let bodies: Vec<PreviewItemBody> = Self::read_json(response).await?;
        watch_debug!("preview for {} returned {} items", job_id, bodies.len());
        Ok(bodies.into_iter().map(ScheduleItem::from).collect())
    }

    async fn sync_inclusions(
        &self,
        job_id: &str,
        inclusions: &[(String, bool)],
    ) -> Result<(), ServiceError> {
        let body = InclusionBody {
            items: inclusions
                .iter()
                .map(|(id, included)| InclusionEntry {
                    id,
                    included: *included,
                })
                .collect(),
        };
        let response = self
            .client
            .put(self.endpoint(&format!("schedule/items/{job_id}")))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Http {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn run_schedule(&self, job_id: &str) -> Result<u64, ServiceError> {
        let response = self
            .client
            .post(self.endpoint(&format!("schedule/run/{job_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: RunScheduleBody = Self::read_json(response).await?;
        Ok(body.published_count)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Timeout;
    }
    ServiceError::Network(err.to_string())
}
