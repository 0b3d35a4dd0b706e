use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::{UpstreamDataClient, UpstreamError};
use crate::config::UpstreamConfig;
use crate::types::{Measure, Sensor};

/// reqwest-backed client for the data adapter HTTP API
///
/// One instance lives for the whole process and is shared through `AppState`;
/// the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct HttpDataClient {
    client: Client,
    base_url: Url,
    timeout_ms: u64,
}

impl HttpDataClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| UpstreamError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout_ms: config.timeout_ms,
        })
    }

    /// Append path segments to the base URL, encoding each one so an id
    /// can never step outside its own segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url, query: &[(&str, &str)]) -> Result<reqwest::Response, UpstreamError> {
        tracing::debug!(path = url.path(), "data adapter request");

        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        response.json::<T>().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout_ms)
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl UpstreamDataClient for HttpDataClient {
    async fn list_sensors_by_user(&self, user_email: &str) -> Result<Vec<Sensor>, UpstreamError> {
        let url = self.endpoint(&["sensors"])?;
        let response = self.get(url, &[("userEmail", user_email)]).await?;
        self.decode(response).await
    }

    async fn get_sensor_by_id(&self, sensor_id: &str) -> Result<Option<Sensor>, UpstreamError> {
        let url = self.endpoint(&["sensors", sensor_id])?;
        let response = self.get(url, &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.decode(response).await.map(Some)
    }

    async fn measures_by_sensor(&self, sensor_id: &str) -> Result<Vec<Measure>, UpstreamError> {
        let url = self.endpoint(&["measures", "sensor", sensor_id])?;
        let response = self.get(url, &[]).await?;
        self.decode(response).await
    }

    async fn measures_by_sensor_in_range(
        &self,
        sensor_id: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<Measure>, UpstreamError> {
        let url = self.endpoint(&["measures", "sensor", sensor_id, "range"])?;
        let response = self.get(url, &[("from", from), ("to", to)]).await?;
        self.decode(response).await
    }
}
