use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::workflows::screening::{ScreeningConfig, ScreeningConfigError};

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub screening: ScreeningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            screening: load_screening()?,
        })
    }
}

/// Reads the optional JSON document, applies env overrides, then validates.
fn load_screening() -> Result<ScreeningConfig, ConfigError> {
    let mut config = match env::var("SCREENING_CONFIG") {
        Ok(path) if !path.trim().is_empty() => {
            let raw = fs::read_to_string(&path).map_err(|source| ConfigError::ScreeningFile {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw)
                .map_err(|source| ConfigError::ScreeningParse { path, source })?
        }
        _ => ScreeningConfig::default(),
    };

    if let Some(value) = parse_var("SCREENING_SALARY_TOLERANCE_PERCENT")? {
        config.salary_tolerance_percent = value;
    }
    if let Some(value) = parse_var("SCREENING_MAX_EXPERIENCE_TOLERANCE_YEARS")? {
        config.max_experience_tolerance_years = value;
    }
    if let Some(value) = parse_var("SCREENING_VISA_EXPIRY_WARNING_DAYS")? {
        config.visa_expiry_warning_days = value;
    }

    config.validate().map_err(ConfigError::Screening)?;
    Ok(config)
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(None),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Output shape of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidNumber {
        key: &'static str,
    },
    ScreeningFile {
        path: String,
        source: std::io::Error,
    },
    ScreeningParse {
        path: String,
        source: serde_json::Error,
    },
    Screening(ScreeningConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => write!(f, "{key} must be a valid number"),
            ConfigError::ScreeningFile { path, .. } => {
                write!(f, "unable to read screening config '{path}'")
            }
            ConfigError::ScreeningParse { path, source } => {
                write!(f, "screening config '{path}' is malformed: {source}")
            }
            ConfigError::Screening(err) => write!(f, "invalid screening config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::ScreeningFile { source, .. } => Some(source),
            ConfigError::ScreeningParse { source, .. } => Some(source),
            ConfigError::Screening(err) => Some(err),
        }
    }
}
