use std::sync::Arc;

use super::{OwnershipGuard, ServiceError};
use crate::types::Measure;
use crate::upstream::UpstreamDataClient;

/// Which slice of a sensor's history the caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasuresRange {
    All,
    Between { from: String, to: String },
}

impl MeasuresRange {
    /// A range needs both bounds; with either missing the full history is used.
    /// Bound values are not checked here, the data adapter interprets them.
    pub fn from_bounds(from: Option<String>, to: Option<String>) -> Self {
        match (from, to) {
            (Some(from), Some(to)) => MeasuresRange::Between { from, to },
            _ => MeasuresRange::All,
        }
    }
}

/// Measures for a single sensor, released only to the sensor's owner
#[derive(Clone)]
pub struct SensorService {
    guard: OwnershipGuard,
    upstream: Arc<dyn UpstreamDataClient>,
}

impl SensorService {
    pub fn new(upstream: Arc<dyn UpstreamDataClient>) -> Self {
        Self {
            guard: OwnershipGuard::new(upstream.clone()),
            upstream,
        }
    }

    pub async fn get_measures(&self, user_email: &str, sensor_id: &str) -> Result<Vec<Measure>, ServiceError> {
        self.ensure_owner(user_email, sensor_id).await?;
        Ok(self.upstream.measures_by_sensor(sensor_id).await?)
    }

    pub async fn get_measures_in_range(
        &self,
        user_email: &str,
        sensor_id: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<Measure>, ServiceError> {
        self.ensure_owner(user_email, sensor_id).await?;
        Ok(self.upstream.measures_by_sensor_in_range(sensor_id, from, to).await?)
    }

    pub async fn measures(
        &self,
        user_email: &str,
        sensor_id: &str,
        range: &MeasuresRange,
    ) -> Result<Vec<Measure>, ServiceError> {
        match range {
            MeasuresRange::All => self.get_measures(user_email, sensor_id).await,
            MeasuresRange::Between { from, to } => {
                self.get_measures_in_range(user_email, sensor_id, from, to).await
            }
        }
    }

    async fn ensure_owner(&self, user_email: &str, sensor_id: &str) -> Result<(), ServiceError> {
        if self.guard.verify_ownership(user_email, sensor_id).await? {
            Ok(())
        } else {
            tracing::warn!(user = user_email, sensor_id, "sensor access denied");
            Err(ServiceError::Forbidden)
        }
    }
}
