//! Weather observations
//!
//! Fetches current conditions per configured city from the Open-Meteo
//! forecast API. The daemon prefetches every city on a refresh interval
//! and the weather strip rotates through the results.

use color_eyre::eyre::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::HTTP_CLIENT;
use crate::config::City;

/// One city's current conditions, as shown on the weather strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub weather_code: u8,
    pub temp_min: i32,
    pub temp_max: i32,
    pub humidity: u8,
    pub rain_chance: u8,
    /// Human summary of `weather_code` for renderers without an icon set.
    pub summary: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    current: CurrentBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    relative_humidity_2m: f64,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    weather_code: Vec<u8>,
    temperature_2m_min: Vec<f64>,
    temperature_2m_max: Vec<f64>,
    precipitation_probability_max: Vec<f64>,
}

/// Weather summary for an Open-Meteo/WMO weather code.
#[must_use]
pub fn describe_weather_code(code: u8) -> &'static str {
    match code {
        0 => "Trời quang đãng",
        1..=2 => "Ít mây",
        3 => "Nhiều mây",
        45..=48 => "Sương mù",
        51..=57 | 61..=67 => "Khả năng có mưa",
        71..=77 | 85..=86 => "Tuyết rơi",
        80..=82 => "Mưa rào",
        95..=99 => "Dông bão",
        _ => "Thời tiết hỗn hợp",
    }
}

/// Fetch today's conditions for one city.
///
/// # Errors
/// Returns an error on network failure, non-success status, or a response
/// missing today's entries.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub async fn fetch_city(endpoint: &str, city: &City) -> Result<WeatherReport> {
    let url = format!(
        "{endpoint}?latitude={lat}&longitude={lon}\
         &daily=weather_code,temperature_2m_min,temperature_2m_max,precipitation_probability_max\
         &current=relative_humidity_2m&timezone=auto&forecast_days=1",
        lat = city.latitude,
        lon = city.longitude,
    );

    let response = HTTP_CLIENT
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch weather for {}", city.name))?;
    if !response.status().is_success() {
        bail!(
            "Weather server answered {} for {}",
            response.status(),
            city.name
        );
    }
    let parsed: ApiResponse = response
        .json()
        .await
        .with_context(|| format!("Unexpected weather payload for {}", city.name))?;

    let (Some(&code), Some(&min), Some(&max), Some(&rain)) = (
        parsed.daily.weather_code.first(),
        parsed.daily.temperature_2m_min.first(),
        parsed.daily.temperature_2m_max.first(),
        parsed.daily.precipitation_probability_max.first(),
    ) else {
        bail!("Weather payload for {} has no daily entries", city.name);
    };

    debug!("Weather for {}: code={} {}..{}°C", city.name, code, min, max);
    Ok(WeatherReport {
        city: city.name.clone(),
        weather_code: code,
        temp_min: min.round() as i32,
        temp_max: max.round() as i32,
        humidity: parsed.current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
        rain_chance: rain.round().clamp(0.0, 100.0) as u8,
        summary: describe_weather_code(code).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "Trời quang đãng")]
    #[test_case(2, "Ít mây")]
    #[test_case(3, "Nhiều mây")]
    #[test_case(47, "Sương mù")]
    #[test_case(55, "Khả năng có mưa")]
    #[test_case(63, "Khả năng có mưa")]
    #[test_case(75, "Tuyết rơi")]
    #[test_case(81, "Mưa rào")]
    #[test_case(96, "Dông bão")]
    #[test_case(40, "Thời tiết hỗn hợp")]
    fn test_describe_weather_code(code: u8, expected: &str) {
        assert_eq!(describe_weather_code(code), expected);
    }

    #[test]
    fn test_api_response_deserializes() {
        let json = r#"{
            "current": {"relative_humidity_2m": 81.4},
            "daily": {
                "weather_code": [80],
                "temperature_2m_min": [24.3],
                "temperature_2m_max": [31.8],
                "precipitation_probability_max": [65.0]
            }
        }"#;
        let parsed: ApiResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.daily.weather_code, vec![80]);
        assert!((parsed.current.relative_humidity_2m - 81.4).abs() < f64::EPSILON);
    }
}
