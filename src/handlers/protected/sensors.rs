use axum::{
    extract::{Extension, Path, RawQuery, State},
    response::Json,
};
use url::form_urlencoded;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::services::MeasuresRange;
use crate::types::Measure;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MeasuresQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl MeasuresQuery {
    /// Read `from` and `to` from a raw query string. The first occurrence of
    /// each key wins and values are kept as given.
    pub fn parse(query: Option<&str>) -> Self {
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "from" => &mut parsed.from,
                "to" => &mut parsed.to,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        parsed
    }
}

/// GET /sensors/:id/measures[?from=..&to=..] - measures of a sensor the caller owns
///
/// Both `from` and `to` select the range endpoint upstream; otherwise the full
/// history is returned. Sensors the caller does not own, including unknown
/// ids, answer 403.
pub async fn measures_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(sensor_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Measure>>, ApiError> {
    let query = MeasuresQuery::parse(query.as_deref());
    let range = MeasuresRange::from_bounds(query.from, query.to);

    let measures = state
        .sensors
        .measures(&identity.email, &sensor_id, &range)
        .await?;

    Ok(Json(measures))
}
