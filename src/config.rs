//! Configuration management
//!
//! Handles loading, parsing, and validating the TOML configuration file:
//! daemon settings, the live feed source, weather cities, and the AI
//! generation endpoint.

use color_eyre::eyre::{bail, Context, ContextCompat, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Public Configuration Types
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub feed: FeedConfig,
    pub weather: WeatherConfig,
    pub ai: AiConfig,
}

/// Global daemon settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Desktop notifications for daemon start/stop.
    pub notify_daemon: bool,
    /// Desktop notifications when a special mode is activated or cleared.
    pub notify_special: bool,
    pub log_level: String,
}

/// Live feed source
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// RSS feed URL for the default ticker content.
    pub url: String,
    /// Maximum number of titles kept per fetch.
    pub max_titles: usize,
    /// Seconds between automatic feed refreshes.
    pub refresh_secs: u64,
}

/// Weather strip data source
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Open-Meteo compatible forecast endpoint.
    pub endpoint: String,
    /// Seconds between refetching all cities.
    pub refresh_secs: u64,
    /// Seconds each city stays on the strip before rotating.
    pub rotate_secs: u64,
    pub cities: Vec<City>,
}

/// A city shown on the weather strip
#[derive(Debug, Clone)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// AI text-generation collaborator
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Gemini API base URL.
    pub endpoint: String,
    /// Model used for generation and spell checking.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

// ============================================================================
// Config File Deserialization (TOML)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    settings: SettingsFile,
    #[serde(default)]
    feed: FeedFile,
    #[serde(default)]
    weather: WeatherFile,
    #[serde(default)]
    ai: AiFile,
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default = "default_true")]
    notify_daemon: bool,
    #[serde(default = "default_true")]
    notify_special: bool,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct FeedFile {
    #[serde(default = "default_feed_url")]
    url: String,
    #[serde(default = "default_max_titles")]
    max_titles: usize,
    #[serde(default = "default_feed_refresh")]
    refresh_secs: u64,
}

#[derive(Debug, Deserialize)]
struct WeatherFile {
    #[serde(default = "default_weather_endpoint")]
    endpoint: String,
    #[serde(default = "default_weather_refresh")]
    refresh_secs: u64,
    #[serde(default = "default_rotate_secs")]
    rotate_secs: u64,
    #[serde(default = "default_cities")]
    cities: Vec<CityFile>,
}

#[derive(Debug, Deserialize)]
struct CityFile {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct AiFile {
    #[serde(default = "default_ai_endpoint")]
    endpoint: String,
    #[serde(default = "default_ai_model")]
    model: String,
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_feed_url() -> String {
    "https://vnexpress.net/rss/tin-moi-nhat.rss".to_string()
}

fn default_max_titles() -> usize {
    10
}

fn default_feed_refresh() -> u64 {
    300
}

fn default_weather_endpoint() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_weather_refresh() -> u64 {
    1800
}

fn default_rotate_secs() -> u64 {
    5
}

fn default_cities() -> Vec<CityFile> {
    vec![
        CityFile {
            name: "Hà Nội".to_string(),
            latitude: 21.0285,
            longitude: 105.8542,
        },
        CityFile {
            name: "Đà Nẵng".to_string(),
            latitude: 16.0544,
            longitude: 108.2022,
        },
        CityFile {
            name: "TP. Hồ Chí Minh".to_string(),
            latitude: 10.8231,
            longitude: 106.6297,
        },
    ]
}

fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            notify_daemon: true,
            notify_special: true,
            log_level: default_log_level(),
        }
    }
}

impl Default for FeedFile {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            max_titles: default_max_titles(),
            refresh_secs: default_feed_refresh(),
        }
    }
}

impl Default for WeatherFile {
    fn default() -> Self {
        Self {
            endpoint: default_weather_endpoint(),
            refresh_secs: default_weather_refresh(),
            rotate_secs: default_rotate_secs(),
            cities: default_cities(),
        }
    }
}

impl Default for AiFile {
    fn default() -> Self {
        Self {
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

// ============================================================================
// Config Implementation
// ============================================================================

impl Config {
    /// Load configuration from the default XDG config path
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Creating default config at {:?}", config_path);
            Self::create_default_config(&config_path)?;
        }

        Self::load_from_path(&config_path)
    }

    /// Load configuration from an explicit path
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {path:?}"))?;

        let config_file: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {path:?}"))?;

        Self::from_config_file(config_file)
    }

    fn from_config_file(config_file: ConfigFile) -> Result<Self> {
        let settings = Settings {
            notify_daemon: config_file.settings.notify_daemon,
            notify_special: config_file.settings.notify_special,
            log_level: config_file.settings.log_level,
        };

        let feed = FeedConfig {
            url: config_file.feed.url,
            max_titles: config_file.feed.max_titles,
            refresh_secs: config_file.feed.refresh_secs,
        };

        let weather = WeatherConfig {
            endpoint: config_file.weather.endpoint,
            refresh_secs: config_file.weather.refresh_secs,
            rotate_secs: config_file.weather.rotate_secs,
            cities: config_file
                .weather
                .cities
                .into_iter()
                .map(|c| City {
                    name: c.name,
                    latitude: c.latitude,
                    longitude: c.longitude,
                })
                .collect(),
        };

        let ai = AiConfig {
            endpoint: config_file.ai.endpoint,
            model: config_file.ai.model,
            api_key_env: config_file.ai.api_key_env,
        };

        let config = Self {
            settings,
            feed,
            weather,
            ai,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        // Validate log level
        match self.settings.log_level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            level => bail!(
                "Invalid log_level '{level}'. Must be: error, warn, info, debug, or trace"
            ),
        }

        if !self.feed.url.starts_with("http://") && !self.feed.url.starts_with("https://") {
            bail!("feed.url must be an http(s) URL, got '{}'", self.feed.url);
        }
        if self.feed.max_titles == 0 {
            bail!("feed.max_titles must be at least 1");
        }
        if self.feed.refresh_secs < 30 {
            bail!(
                "feed.refresh_secs must be at least 30 (got {})",
                self.feed.refresh_secs
            );
        }

        if self.weather.cities.is_empty() {
            bail!("No weather cities defined. Add at least one [[weather.cities]] section.");
        }
        if self.weather.rotate_secs == 0 {
            bail!("weather.rotate_secs must be at least 1");
        }

        let mut seen_names = HashSet::with_capacity(self.weather.cities.len());
        for city in &self.weather.cities {
            if city.name.trim().is_empty() {
                bail!("Weather city with empty name");
            }
            if !seen_names.insert(&city.name) {
                bail!("Duplicate weather city: '{}'", city.name);
            }
            if !(-90.0..=90.0).contains(&city.latitude) {
                bail!(
                    "City '{}' latitude {} out of range",
                    city.name,
                    city.latitude
                );
            }
            if !(-180.0..=180.0).contains(&city.longitude) {
                bail!(
                    "City '{}' longitude {} out of range",
                    city.name,
                    city.longitude
                );
            }
        }

        if self.ai.model.trim().is_empty() {
            bail!("ai.model must not be empty");
        }
        if self.ai.api_key_env.trim().is_empty() {
            bail!("ai.api_key_env must not be empty");
        }

        Ok(())
    }

    /// Get the XDG config path for tickerd
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined or created.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("tickerd");
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config dir: {config_dir:?}"))?;
        Ok(config_dir.join("config.toml"))
    }

    fn create_default_config(path: &PathBuf) -> Result<()> {
        let default_config = r#"# tickerd - Broadcast Overlay Daemon Configuration
#
# Drives an always-on news ticker and weather strip for a studio
# lower-third. Operator actions arrive over IPC (CLI or TUI); a renderer
# polls `tickerd frame --json` for the current overlay content.

[settings]
notify_daemon = true     # Notifications for daemon start/stop
notify_special = true    # Notifications when breaking news / disaster warnings go live
log_level = "info"       # error, warn, info, debug, trace

[feed]
# RSS feed providing the default ticker headlines
url = "https://vnexpress.net/rss/tin-moi-nhat.rss"
max_titles = 10          # Headlines kept per fetch
refresh_secs = 300       # Refetch interval

[weather]
endpoint = "https://api.open-meteo.com/v1/forecast"
refresh_secs = 1800      # Refetch all cities
rotate_secs = 5          # Seconds each city stays on the strip

[[weather.cities]]
name = "Hà Nội"
latitude = 21.0285
longitude = 105.8542

[[weather.cities]]
name = "Đà Nẵng"
latitude = 16.0544
longitude = 108.2022

[[weather.cities]]
name = "TP. Hồ Chí Minh"
latitude = 10.8231
longitude = 106.6297

[ai]
# Used by `tickerd breaking generate` and the TUI breaking-news screen.
# The API key is read from the environment, never from this file.
endpoint = "https://generativelanguage.googleapis.com/v1beta"
model = "gemini-2.5-flash"
api_key_env = "GEMINI_API_KEY"
"#;
        fs::write(path, default_config)
            .with_context(|| format!("Failed to write config: {path:?}"))?;

        // Inform user that we created the config
        eprintln!("Created default config at: {path:?}");
        eprintln!();
        eprintln!("Next steps:");
        eprintln!("  1. Edit the config file to set your feed and cities");
        eprintln!("  2. Run 'tickerd validate' to check your config");
        eprintln!("  3. Run 'tickerd daemon' to start");
        eprintln!("  4. Point your renderer at 'tickerd frame --json'");
        eprintln!();

        Ok(())
    }

    /// Print a human-readable summary of the configuration
    pub fn print_summary(&self) {
        println!("✓ Configuration valid\n");

        println!("Settings:");
        println!("  notify_daemon: {}", self.settings.notify_daemon);
        println!("  notify_special: {}", self.settings.notify_special);
        println!("  log_level: {}", self.settings.log_level);

        println!("\nFeed:");
        println!("  url: {}", self.feed.url);
        println!("  max_titles: {}", self.feed.max_titles);
        println!("  refresh_secs: {}", self.feed.refresh_secs);

        println!("\nWeather ({} cities):", self.weather.cities.len());
        println!("  endpoint: {}", self.weather.endpoint);
        println!(
            "  refresh_secs: {}, rotate_secs: {}",
            self.weather.refresh_secs, self.weather.rotate_secs
        );
        for (i, city) in self.weather.cities.iter().enumerate() {
            println!(
                "  {}. {} ({}, {})",
                i + 1,
                city.name,
                city.latitude,
                city.longitude
            );
        }

        println!("\nAI:");
        println!("  model: {}", self.ai.model);
        println!("  api_key_env: {}", self.ai.api_key_env);

        if let Ok(path) = Self::get_config_path() {
            println!("\nConfig: {path:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<Config> {
        let file: ConfigFile = toml::from_str(toml_str).expect("parse toml");
        Config::from_config_file(file)
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").expect("valid");
        assert_eq!(config.settings.log_level, "info");
        assert_eq!(config.feed.max_titles, 10);
        assert_eq!(config.weather.cities.len(), 3);
        assert_eq!(config.weather.cities[0].name, "Hà Nội");
        assert_eq!(config.ai.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = parse("[settings]\nlog_level = \"verbose\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_non_http_feed_url_rejected() {
        let result = parse("[feed]\nurl = \"ftp://feed.example\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_city_rejected() {
        let result = parse(
            r#"
[[weather.cities]]
name = "Huế"
latitude = 16.46
longitude = 107.59

[[weather.cities]]
name = "Huế"
latitude = 16.46
longitude = 107.59
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let result = parse(
            r#"
[[weather.cities]]
name = "Nowhere"
latitude = 123.0
longitude = 10.0
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = parse(
            r#"
[settings]
log_level = "debug"
notify_special = false

[feed]
url = "https://baochinhphu.vn/rss.xml"
refresh_secs = 120
"#,
        )
        .expect("valid");
        assert_eq!(config.settings.log_level, "debug");
        assert!(!config.settings.notify_special);
        assert_eq!(config.feed.url, "https://baochinhphu.vn/rss.xml");
        assert_eq!(config.feed.refresh_secs, 120);
    }
}
