//! Integration tests for config loading and validation
//!
//! These tests verify the full lifecycle of config operations through TOML
//! parsing from disk, rather than constructing Config structs directly.

use std::fs;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join("tickerd");
    fs::create_dir_all(&config_dir).expect("Failed to create config dir");
    let config_path = config_dir.join("config.toml");
    (temp_dir, config_path)
}

#[test]
fn test_full_config_loads_from_toml() {
    let (_temp, config_path) = setup_temp_config();

    let toml_content = r#"
[settings]
notify_daemon = false
notify_special = true
log_level = "debug"

[feed]
url = "https://baochinhphu.vn/rss.xml"
max_titles = 5
refresh_secs = 120

[weather]
refresh_secs = 900
rotate_secs = 7

[[weather.cities]]
name = "Huế"
latitude = 16.4637
longitude = 107.5909

[[weather.cities]]
name = "Cần Thơ"
latitude = 10.0452
longitude = 105.7469

[ai]
model = "gemini-2.5-flash"
api_key_env = "MY_GEMINI_KEY"
"#;

    fs::write(&config_path, toml_content).expect("Failed to write TOML");

    let loaded =
        tickerd::config::Config::load_from_path(&config_path).expect("Failed to load config");

    assert!(!loaded.settings.notify_daemon);
    assert!(loaded.settings.notify_special);
    assert_eq!(loaded.settings.log_level, "debug");

    assert_eq!(loaded.feed.url, "https://baochinhphu.vn/rss.xml");
    assert_eq!(loaded.feed.max_titles, 5);
    assert_eq!(loaded.feed.refresh_secs, 120);

    assert_eq!(loaded.weather.refresh_secs, 900);
    assert_eq!(loaded.weather.rotate_secs, 7);
    assert_eq!(loaded.weather.cities.len(), 2);
    assert_eq!(loaded.weather.cities[0].name, "Huế");
    assert_eq!(loaded.weather.cities[1].name, "Cần Thơ");

    assert_eq!(loaded.ai.api_key_env, "MY_GEMINI_KEY");
}

#[test]
fn test_minimal_config_fills_defaults() {
    let (_temp, config_path) = setup_temp_config();

    fs::write(&config_path, "[settings]\nlog_level = \"warn\"\n").expect("Failed to write TOML");

    let loaded =
        tickerd::config::Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(loaded.settings.log_level, "warn");
    // Everything else at documented defaults
    assert!(loaded.settings.notify_daemon);
    assert_eq!(loaded.feed.url, "https://vnexpress.net/rss/tin-moi-nhat.rss");
    assert_eq!(loaded.feed.max_titles, 10);
    assert_eq!(loaded.weather.cities.len(), 3);
    assert_eq!(loaded.weather.rotate_secs, 5);
    assert_eq!(loaded.ai.model, "gemini-2.5-flash");
    assert_eq!(loaded.ai.api_key_env, "GEMINI_API_KEY");
}

#[test]
fn test_config_rejects_invalid_log_level() {
    let (_temp, config_path) = setup_temp_config();

    fs::write(&config_path, "[settings]\nlog_level = \"chatty\"\n").expect("Failed to write TOML");

    let result = tickerd::config::Config::load_from_path(&config_path);
    assert!(result.is_err(), "Invalid log level should fail validation");
    let err_msg = format!("{:?}", result.unwrap_err());
    assert!(
        err_msg.contains("log_level"),
        "Error should mention log_level, got: {err_msg}"
    );
}

#[test]
fn test_config_rejects_empty_city_list() {
    let (_temp, config_path) = setup_temp_config();

    fs::write(&config_path, "[weather]\ncities = []\n").expect("Failed to write TOML");

    let result = tickerd::config::Config::load_from_path(&config_path);
    assert!(result.is_err(), "Empty city list should fail validation");
}

#[test]
fn test_config_rejects_too_fast_feed_refresh() {
    let (_temp, config_path) = setup_temp_config();

    fs::write(&config_path, "[feed]\nrefresh_secs = 5\n").expect("Failed to write TOML");

    let result = tickerd::config::Config::load_from_path(&config_path);
    assert!(
        result.is_err(),
        "Sub-30s feed refresh should fail validation"
    );
}

#[test]
fn test_config_rejects_malformed_toml() {
    let (_temp, config_path) = setup_temp_config();

    fs::write(&config_path, "[feed\nurl = broken").expect("Failed to write TOML");

    let result = tickerd::config::Config::load_from_path(&config_path);
    assert!(result.is_err(), "Malformed TOML should fail to parse");
}

#[test]
fn test_missing_config_file_errors() {
    let (_temp, config_path) = setup_temp_config();

    let result = tickerd::config::Config::load_from_path(&config_path);
    assert!(result.is_err(), "Missing file should error, not default");
}
