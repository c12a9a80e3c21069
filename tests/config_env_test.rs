//! Config environment variable tests
//!
//! These tests verify that Config::from_env() correctly reads and applies
//! environment variable overrides. Config::from_env() also loads a .env file
//! via dotenvy when present, so these tests set every variable they assert on.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use energy_portal_client::config::{Config, LogFormat};
use energy_portal_client::error::AppError;
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn test_config_from_env_custom_base_url() {
    env::set_var("PORTAL_BASE_URL", "https://portal.example.com/");

    let config = Config::from_env().unwrap();
    assert_eq!(config.portal.base_url, "https://portal.example.com/");
    assert_eq!(
        config.portal.api_base_url(),
        "https://portal.example.com/api"
    );

    env::remove_var("PORTAL_BASE_URL");
}

#[test]
#[serial]
fn test_config_from_env_rejects_non_http_base_url() {
    env::set_var("PORTAL_BASE_URL", "ftp://portal.example.com");

    let result = Config::from_env();
    assert!(matches!(result, Err(AppError::Config { .. })));

    env::remove_var("PORTAL_BASE_URL");
}

#[test]
#[serial]
fn test_config_from_env_custom_storage() {
    env::set_var("SESSION_DB_PATH", "/custom/session.db");
    env::set_var("SESSION_DB_MAX_CONNECTIONS", "4");

    let config = Config::from_env().unwrap();
    assert_eq!(config.storage.path.to_str().unwrap(), "/custom/session.db");
    assert_eq!(config.storage.max_connections, 4);

    env::remove_var("SESSION_DB_PATH");
    env::remove_var("SESSION_DB_MAX_CONNECTIONS");
}

#[test]
#[serial]
fn test_config_from_env_json_log_format() {
    env::set_var("LOG_FORMAT", "JSON");
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.level, "debug");

    env::remove_var("LOG_FORMAT");
    env::remove_var("LOG_LEVEL");
}

#[test]
#[serial]
fn test_config_from_env_custom_request_timeout() {
    env::set_var("REQUEST_TIMEOUT_MS", "5000");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 5000);

    env::remove_var("REQUEST_TIMEOUT_MS");
}

#[test]
#[serial]
fn test_config_invalid_number_uses_default() {
    env::set_var("REQUEST_TIMEOUT_MS", "soon");
    env::set_var("BEHAVIOR_QUEUE_CAPACITY", "0");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 30000);
    assert_eq!(config.behavior.queue_capacity, 64);

    env::remove_var("REQUEST_TIMEOUT_MS");
    env::remove_var("BEHAVIOR_QUEUE_CAPACITY");
}

#[test]
#[serial]
fn test_config_from_env_behavior_settings() {
    env::set_var("BEHAVIOR_ENABLED", "off");
    env::set_var("BEHAVIOR_QUEUE_CAPACITY", "16");

    let config = Config::from_env().unwrap();
    assert!(!config.behavior.enabled);
    assert_eq!(config.behavior.queue_capacity, 16);

    env::set_var("BEHAVIOR_ENABLED", "yes");
    let config = Config::from_env().unwrap();
    assert!(config.behavior.enabled);

    env::remove_var("BEHAVIOR_ENABLED");
    env::remove_var("BEHAVIOR_QUEUE_CAPACITY");
}
