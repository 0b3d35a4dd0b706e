use axum::{
    extract::{Extension, State},
    response::Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::services::DashboardView;

/// GET /dashboard - caller's profile together with the sensors they own
///
/// ```json
/// {
///   "user": { "email": "ada@example.com", "name": "Ada", "surname": "Lovelace" },
///   "sensors": [ { "id": "42", "ownerEmail": "ada@example.com", "name": "Greenhouse" } ]
/// }
/// ```
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<DashboardView>, ApiError> {
    let view = state.dashboard.get_dashboard(&identity).await?;
    Ok(Json(view))
}
