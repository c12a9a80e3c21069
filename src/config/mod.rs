use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Portal server
    pub portal: PortalConfig,
    /// Session store
    pub storage: StorageConfig,
    /// Logging
    pub logging: LoggingConfig,
    /// HTTP requests
    pub request: RequestConfig,
    /// Behavior telemetry
    pub behavior: BehaviorConfig,
}

/// Portal backend configuration
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Origin serving the portal; the REST API lives under `<base_url>/api`.
    pub base_url: String,
}

/// Session store configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// SQLite file path
    pub path: PathBuf,
    /// Pool size
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable
    Pretty,
    /// One JSON object per line
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Per-request timeout
    pub timeout_ms: u64,
}

/// Behavior telemetry configuration
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Whether events are sent at all
    pub enabled: bool,
    /// Queue size; events beyond it are dropped
    pub queue_capacity: usize,
}

impl PortalConfig {
    /// Base URL of the REST API.
    pub fn api_base_url(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url =
            env::var("PORTAL_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config {
                message: format!("PORTAL_BASE_URL must be an http(s) URL, got '{}'", base_url),
            });
        }
        let portal = PortalConfig { base_url };

        let storage = StorageConfig {
            path: PathBuf::from(
                env::var("SESSION_DB_PATH").unwrap_or_else(|_| "./data/session.db".to_string()),
            ),
            max_connections: env::var("SESSION_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30000),
        };

        let behavior = BehaviorConfig {
            enabled: env::var("BEHAVIOR_ENABLED")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
            queue_capacity: env::var("BEHAVIOR_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(64),
        };

        Ok(Config {
            portal,
            storage,
            logging,
            request,
            behavior,
        })
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: 64,
        }
    }
}
