// services/mod.rs - Aggregation over the data adapter
//
// Every service holds the same injected Arc<dyn UpstreamDataClient>; nothing
// here keeps state between requests.

pub mod dashboard_service;
pub mod ownership;
pub mod sensor_service;

use thiserror::Error;

use crate::upstream::UpstreamError;

pub use dashboard_service::{DashboardService, DashboardUser, DashboardView};
pub use ownership::OwnershipGuard;
pub use sensor_service::{MeasuresRange, SensorService};

/// Outcome of a service call that did not produce data
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller does not own the sensor, or the sensor does not exist
    #[error("Access to sensor denied")]
    Forbidden,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
