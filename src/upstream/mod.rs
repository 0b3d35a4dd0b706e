// upstream/mod.rs - Data adapter client
//
// The data adapter owns sensors and measures. The gateway talks to it through
// the UpstreamDataClient trait so services can be exercised against fakes.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Measure, Sensor};

pub use http::HttpDataClient;

/// Errors from calls to the data adapter
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Data adapter timed out after {0} ms")]
    Timeout(u64),

    #[error("Data adapter unavailable: {0}")]
    Unavailable(String),

    #[error("Data adapter returned unexpected status {0}")]
    Status(u16),

    #[error("Data adapter response did not match the expected shape: {0}")]
    Decode(String),

    #[error("Invalid data adapter URL: {0}")]
    InvalidUrl(String),
}

impl UpstreamError {
    /// True when the data adapter could not be reached at all
    pub fn is_unavailable(&self) -> bool {
        matches!(self, UpstreamError::Timeout(_) | UpstreamError::Unavailable(_))
    }
}

/// Read-only view of the data adapter
#[async_trait]
pub trait UpstreamDataClient: Send + Sync {
    /// All sensors whose owner is `user_email`, as reported upstream
    async fn list_sensors_by_user(&self, user_email: &str) -> Result<Vec<Sensor>, UpstreamError>;

    /// One sensor record, `None` when upstream does not know the id
    async fn get_sensor_by_id(&self, sensor_id: &str) -> Result<Option<Sensor>, UpstreamError>;

    /// Full measure history for a sensor in upstream order
    async fn measures_by_sensor(&self, sensor_id: &str) -> Result<Vec<Measure>, UpstreamError>;

    /// Measures with timestamps inside `[from, to]`. Bounds are passed through as given.
    async fn measures_by_sensor_in_range(
        &self,
        sensor_id: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<Measure>, UpstreamError>;
}
