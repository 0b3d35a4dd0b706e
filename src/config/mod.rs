use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Secret used when JWT_SECRET is unset; only acceptable outside production
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATA_ADAPTER_URL is not a usable http(s) URL: {0}")]
    InvalidUpstreamUrl(String),

    #[error("UPSTREAM_TIMEOUT_MS must be greater than zero")]
    ZeroTimeout,

    #[error("JWT_SECRET must not be empty")]
    EmptyJwtSecret,

    #[error("JWT_SECRET must be set explicitly in production")]
    DefaultJwtSecret,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(v) = env::var("DATA_ADAPTER_URL") {
            self.upstream.base_url = v;
        }
        if let Ok(v) = env::var("UPSTREAM_TIMEOUT_MS") {
            self.upstream.timeout_ms = v.parse().unwrap_or(self.upstream.timeout_ms);
        }

        self
    }

    /// Reject settings the gateway cannot safely start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.upstream.base_url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            _ => return Err(ConfigError::InvalidUpstreamUrl(self.upstream.base_url.clone())),
        }

        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::EmptyJwtSecret);
        }
        if self.environment == Environment::Production && self.security.jwt_secret == DEV_JWT_SECRET {
            return Err(ConfigError::DefaultJwtSecret);
        }

        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3004 },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            upstream: UpstreamConfig {
                base_url: "http://localhost:3001".to_string(),
                timeout_ms: 5000,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3004 },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            upstream: UpstreamConfig {
                base_url: "http://localhost:3001".to_string(),
                timeout_ms: 5000,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3004 },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            upstream: UpstreamConfig {
                base_url: "http://localhost:3001".to_string(),
                timeout_ms: 3000,
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}
