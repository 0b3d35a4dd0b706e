use std::sync::Arc;

use crate::upstream::{UpstreamDataClient, UpstreamError};

/// Decides whether a user may read a sensor's data.
///
/// Ownership comes from the sensor record itself (`ownerEmail`), fetched fresh
/// on every check. A missing sensor and a sensor owned by someone else give
/// the same answer so callers cannot discover which sensor ids exist.
#[derive(Clone)]
pub struct OwnershipGuard {
    upstream: Arc<dyn UpstreamDataClient>,
}

impl OwnershipGuard {
    pub fn new(upstream: Arc<dyn UpstreamDataClient>) -> Self {
        Self { upstream }
    }

    pub async fn verify_ownership(&self, user_email: &str, sensor_id: &str) -> Result<bool, UpstreamError> {
        let owns = match self.upstream.get_sensor_by_id(sensor_id).await? {
            Some(sensor) => sensor.owner_email() == user_email,
            None => false,
        };

        tracing::debug!(user = user_email, sensor_id, owns, "ownership check");
        Ok(owns)
    }
}
