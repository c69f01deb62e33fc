use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub portal: PortalConfig,
    pub session: SessionConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("PORTAL_BASE_URL")
            .unwrap_or_else(|_| "https://app.saincube.com/app1".to_string());
        let geocode_url = env::var("GEOCODE_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());
        let request_timeout_secs = env::var("PORTAL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let portal = PortalConfig {
            base_url: validate_url("PORTAL_BASE_URL", base_url)?,
            geocode_url: validate_url("GEOCODE_BASE_URL", geocode_url)?,
            request_timeout_secs,
        };

        let store_path = env::var("SESSION_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_path());

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            portal,
            session: SessionConfig { store_path },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn default_session_path() -> PathBuf {
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".bauportal").join("session.json"),
        Err(_) => PathBuf::from("session.json"),
    }
}

fn validate_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidUrl { key, value })
    }
}

/// Settings for reaching the portal backend and the geocoding service.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    pub geocode_url: String,
    pub request_timeout_secs: u64,
}

/// Location of the client-persisted session storage.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub store_path: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout,
    InvalidUrl { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout => write!(f, "PORTAL_TIMEOUT_SECS must be a valid u64"),
            ConfigError::InvalidUrl { key, value } => {
                write!(f, "{} must be an http(s) URL, got '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
