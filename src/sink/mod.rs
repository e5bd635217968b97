//! Time-series sink collaborator.
//!
//! The cycle runner only sees the `TelemetrySink` trait; the shipped
//! implementation writes InfluxDB v2 line protocol over HTTP. Writes are
//! awaited to completion before the cycle moves to the next device, are
//! never retried here (the next scheduled cycle is the retry), and are
//! never deduplicated.

pub mod line_protocol;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::error::SinkError;
use crate::extract::MetricSample;
use self::line_protocol::sample_line;

/// HTTP timeout for sink requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Write operation consumed by the cycle runner. At-least-once semantics:
/// a reported success means the store acknowledged the point.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn write(&self, sample: &MetricSample) -> Result<(), SinkError>;

    /// Releases the sink connection. Called exactly once while draining.
    async fn close(self: Box<Self>) -> Result<(), SinkError>;
}

/// InfluxDB v2 sink writing one point per sample.
pub struct InfluxSink {
    client: reqwest::Client,
    base_url: String,
    write_url: String,
    auth_header: String,
}

impl InfluxSink {
    pub fn new(url: &str, token: &str, org: &str, bucket: &str) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = url.trim_end_matches('/').to_string();
        let write_url = format!(
            "{}/api/v2/write?org={}&bucket={}&precision=ns",
            base_url, org, bucket
        );
        Ok(Self {
            client,
            base_url,
            write_url,
            auth_header: format!("Token {}", token),
        })
    }

    /// Probes the InfluxDB health endpoint. Used by the `check` command.
    pub async fn health(&self) -> Result<(), SinkError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TelemetrySink for InfluxSink {
    async fn write(&self, sample: &MetricSample) -> Result<(), SinkError> {
        let Some(line) = sample_line(sample) else {
            // Nothing extractable this cycle; not worth an empty point.
            debug!(
                "No fields extracted for device {}, skipping write",
                sample.device_name
            );
            return Ok(());
        };

        let response = self
            .client
            .post(&self.write_url)
            .header(AUTHORIZATION, &self.auth_header)
            .body(line)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        debug!("Write successful for device {}", sample.device_name);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), SinkError> {
        // The HTTP client holds no server-side session; dropping it is
        // sufficient.
        debug!("Closing sink connection to {}", self.base_url);
        Ok(())
    }
}
