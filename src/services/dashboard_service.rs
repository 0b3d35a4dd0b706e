use std::sync::Arc;

use serde::Serialize;

use super::ServiceError;
use crate::middleware::Identity;
use crate::types::Sensor;
use crate::upstream::UpstreamDataClient;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardUser {
    pub email: String,
    pub name: String,
    pub surname: String,
}

/// Response body for GET /dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub user: DashboardUser,
    pub sensors: Vec<Sensor>,
}

#[derive(Clone)]
pub struct DashboardService {
    upstream: Arc<dyn UpstreamDataClient>,
}

impl DashboardService {
    pub fn new(upstream: Arc<dyn UpstreamDataClient>) -> Self {
        Self { upstream }
    }

    /// Profile fields from the token plus the user's sensors, as listed upstream.
    /// The email comes from a validated token, so no ownership check is needed.
    pub async fn get_dashboard(&self, identity: &Identity) -> Result<DashboardView, ServiceError> {
        let sensors = self.upstream.list_sensors_by_user(&identity.email).await?;

        Ok(DashboardView {
            user: DashboardUser {
                email: identity.email.clone(),
                name: identity.name.clone(),
                surname: identity.surname.clone(),
            },
            sensors,
        })
    }
}
