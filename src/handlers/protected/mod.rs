// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs behind jwt_auth_middleware and reads the caller from
// the `Identity` request extension. Service errors become ApiError responses.

pub mod dashboard;
pub mod sensors;

pub use dashboard::get as dashboard_get;
pub use sensors::measures_get as sensor_measures_get;
