use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::JwtValidator;
use crate::config::{AppConfig, Environment, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{DashboardService, SensorService};
use crate::upstream::UpstreamDataClient;

/// Shared per-process state. Cloned into every request; holds no mutable data.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub sensors: SensorService,
    pub jwt: JwtValidator,
}

impl AppState {
    pub fn new(upstream: Arc<dyn UpstreamDataClient>, jwt: JwtValidator) -> Self {
        Self {
            dashboard: DashboardService::new(upstream.clone()),
            sensors: SensorService::new(upstream),
            jwt,
        }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(protected::dashboard_get))
        .route("/sensors/:id/measures", get(protected::sensor_measures_get))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let app = Router::new()
        // Public
        .route("/health", get(public::health_get))
        // Protected
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.security.enable_cors {
        app.layer(cors_layer(config.environment, &config.security))
    } else {
        app
    }
}

fn cors_layer(environment: Environment, security: &SecurityConfig) -> CorsLayer {
    if environment == Environment::Development || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = origin.as_str(), "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
