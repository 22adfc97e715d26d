//! reqwest-based [`LogTransport`].
//!
//! - `POST {base_url}/log/{project_id}` with `{"batched_log_events": [...]}`
//! - `POST {base_url}/tasks/{task_id}/flag` with the feedback payload
//!
//! Both calls authenticate with `Authorization: Bearer {api_key}`. Any 2xx
//! status is a success.

use super::error::HttpTransportError;
use async_trait::async_trait;
use phospho_application::{BatchBody, Credentials, LogTransport, TransportError};
use phospho_domain::{FeedbackPayload, LogRecord, TaskId};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Transport posting batches and feedback to the collector API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        credentials: &Credentials,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, HttpTransportError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&credentials.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpTransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl LogTransport for HttpTransport {
    async fn send_batch(
        &self,
        credentials: &Credentials,
        records: &[LogRecord],
    ) -> Result<(), TransportError> {
        let path = format!("log/{}", credentials.project_id);
        self.post(credentials, &path, &BatchBody::new(records)).await?;
        debug!(events = records.len(), "Batch accepted by collector");
        Ok(())
    }

    async fn send_feedback(
        &self,
        credentials: &Credentials,
        task_id: &TaskId,
        payload: &FeedbackPayload,
    ) -> Result<Value, TransportError> {
        let path = format!("tasks/{}/flag", task_id);
        let response = self.post(credentials, &path, payload).await?;
        let text = response.text().await.map_err(HttpTransportError::from)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let task = serde_json::from_str(&text).map_err(HttpTransportError::from)?;
        Ok(task)
    }
}
