#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use sensor_aggregator::app::{self, AppState};
use sensor_aggregator::auth::{Claims, JwtValidator};
use sensor_aggregator::config::AppConfig;
use sensor_aggregator::upstream::HttpDataClient;

pub const SECRET: &str = "integration-secret";
pub const ADA: &str = "ada@example.com";
pub const GRACE: &str = "grace@example.com";

/// Requests seen by the fake data adapter, as "path?query"
pub type Hits = Arc<Mutex<Vec<String>>>;

pub struct DataAdapter {
    pub base_url: String,
    hits: Hits,
}

impl DataAdapter {
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn measure_hits(&self) -> Vec<String> {
        self.hits().into_iter().filter(|h| h.starts_with("/measures")).collect()
    }
}

pub struct Gateway {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl Gateway {
    pub async fn get(&self, path: &str, email: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(email) = email {
            request = request.bearer_auth(token_for(email));
        }
        let res = request.send().await?;
        let status = StatusCode::from_u16(res.status().as_u16())?;
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }
}

/// Sensor records exactly as the data adapter serves them
pub fn sensors() -> Vec<Value> {
    vec![
        json!({
            "id": 42,
            "ownerEmail": ADA,
            "name": "Greenhouse",
            "type": "temperature",
            "location": { "lat": 51.5, "lng": -0.12 },
            "battery": 87
        }),
        json!({ "id": "7", "ownerEmail": GRACE, "name": "Cellar" }),
        json!({ "id": "slow", "ownerEmail": ADA, "name": null }),
        json!({ "id": "broken", "ownerEmail": ADA, "location": null }),
    ]
}

pub fn sensors_owned_by(email: &str) -> Vec<Value> {
    sensors().into_iter().filter(|s| s["ownerEmail"] == email).collect()
}

/// Numeric-looking ids come back as JSON numbers, the way the adapter stores them
fn raw_id(id: &str) -> Value {
    id.parse::<u64>().map(Value::from).unwrap_or_else(|_| Value::from(id))
}

/// Full measure history served for `id`
pub fn history(id: &str) -> Value {
    json!([
        { "sensorId": raw_id(id), "timestamp": "2024-01-01T08:00:00.000Z", "value": 19.5, "unit": "C" },
        { "sensorId": raw_id(id), "timestamp": "2024-01-02T10:00:00+02:00", "value": 21, "unit": "C", "quality": null }
    ])
}

/// Range endpoint answer for `id`, echoing the bounds it received
pub fn ranged(id: &str, from: &str, to: &str) -> Value {
    json!([
        {
            "sensorId": raw_id(id),
            "timestamp": "2024-01-15T08:00:00.000Z",
            "value": 18,
            "requestedFrom": from,
            "requestedTo": to
        }
    ])
}

fn record(hits: &Hits, path: String, query: &HashMap<String, String>) {
    let mut pairs: Vec<_> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    pairs.sort();
    let entry = if pairs.is_empty() { path } else { format!("{}?{}", path, pairs.join("&")) };
    hits.lock().unwrap().push(entry);
}

async fn list_sensors(State(hits): State<Hits>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    record(&hits, "/sensors".to_string(), &q);
    let email = q.get("userEmail").cloned().unwrap_or_default();
    Json(Value::Array(sensors_owned_by(&email)))
}

async fn get_sensor(State(hits): State<Hits>, Path(id): Path<String>) -> Response {
    record(&hits, format!("/sensors/{}", id), &HashMap::new());
    match sensors().into_iter().find(|s| match &s["id"] {
        Value::String(v) => *v == id,
        Value::Number(n) => n.to_string() == id,
        _ => false,
    }) {
        Some(sensor) => Json(sensor).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "sensor not found" }))).into_response(),
    }
}

async fn measures(State(hits): State<Hits>, Path(id): Path<String>) -> Response {
    record(&hits, format!("/measures/sensor/{}", id), &HashMap::new());
    match id.as_str() {
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!([])).into_response()
        }
        "broken" => Json(json!([{ "reading": "n/a" }])).into_response(),
        _ => Json(history(&id)).into_response(),
    }
}

async fn measures_in_range(
    State(hits): State<Hits>,
    Path(id): Path<String>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    record(&hits, format!("/measures/sensor/{}/range", id), &q);
    let (Some(from), Some(to)) = (q.get("from"), q.get("to")) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "from and to are required" }))).into_response();
    };
    if from.starts_with("not-a-date") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": format!("invalid date '{}'", from) }))).into_response();
    }
    Json(ranged(&id, from, to)).into_response()
}

async fn serve(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

pub async fn spawn_data_adapter() -> Result<DataAdapter> {
    let hits: Hits = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/sensors", get(list_sensors))
        .route("/sensors/:id", get(get_sensor))
        .route("/measures/sensor/:id", get(measures))
        .route("/measures/sensor/:id/range", get(measures_in_range))
        .with_state(hits.clone());

    let base_url = serve(router).await?;
    Ok(DataAdapter { base_url, hits })
}

pub async fn spawn_gateway(data_adapter_url: &str, timeout_ms: u64) -> Result<Gateway> {
    let mut config = AppConfig::default();
    config.security.jwt_secret = SECRET.to_string();
    config.upstream.base_url = data_adapter_url.to_string();
    config.upstream.timeout_ms = timeout_ms;
    config.validate()?;

    let upstream = Arc::new(HttpDataClient::new(&config.upstream)?);
    let jwt = JwtValidator::new(SECRET)?;
    let router = app::router(AppState::new(upstream, jwt), &config);

    let base_url = serve(router).await?;
    Ok(Gateway {
        base_url,
        client: reqwest::Client::new(),
    })
}

/// Data adapter plus a gateway pointed at it
pub async fn setup() -> Result<(DataAdapter, Gateway)> {
    let adapter = spawn_data_adapter().await?;
    let gateway = spawn_gateway(&adapter.base_url, 1000).await?;
    Ok((adapter, gateway))
}

pub fn token_for(email: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        email: email.to_string(),
        name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        exp: now + 3600,
        iat: Some(now),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).expect("token encoding")
}
