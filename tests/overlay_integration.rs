//! Integration tests for the overlay state machine with real persistence
//!
//! Exercises operator flows end-to-end through `Overlay` + `Store` backed
//! by a file on disk, including daemon-restart round trips.

use std::time::Instant;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use tickerd::config::{AiConfig, City, Config, FeedConfig, Settings, WeatherConfig};
use tickerd::frame::WeatherSlot;
use tickerd::news::{DisplayLocation, NewsMode, SpecialMode};
use tickerd::presentation::{ClockDisplayMode, Theme};
use tickerd::state::Overlay;
use tickerd::store::Store;

fn test_config() -> Config {
    Config {
        settings: Settings {
            notify_daemon: false,
            notify_special: false,
            log_level: "info".to_string(),
        },
        feed: FeedConfig {
            url: "https://example.vn/rss".to_string(),
            max_titles: 10,
            refresh_secs: 300,
        },
        weather: WeatherConfig {
            endpoint: "https://api.open-meteo.com/v1/forecast".to_string(),
            refresh_secs: 1800,
            rotate_secs: 5,
            cities: vec![
                City {
                    name: "Hà Nội".to_string(),
                    latitude: 21.0285,
                    longitude: 105.8542,
                },
                City {
                    name: "Đà Nẵng".to_string(),
                    latitude: 16.0544,
                    longitude: 108.2022,
                },
                City {
                    name: "TP. Hồ Chí Minh".to_string(),
                    latitude: 10.8231,
                    longitude: 106.6297,
                },
            ],
        },
        ai: AiConfig {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        },
    }
}

fn open_overlay(dir: &TempDir) -> Overlay {
    let store = Store::open(dir.path().join("state.json")).expect("open store");
    Overlay::new(store, &test_config(), Instant::now())
}

#[test]
fn test_fresh_state_defaults_to_live_feed() {
    let dir = TempDir::new().expect("temp dir");
    let overlay = open_overlay(&dir);
    assert_eq!(overlay.mode(), NewsMode::Rss);
    assert_eq!(overlay.last_special(), None);
    assert_eq!(overlay.ui().theme(), Theme::Normal);
    assert!(overlay.ui().weather_bar_visible());
    assert_eq!(overlay.ui().clock_mode(), ClockDisplayMode::Clock);
}

#[test]
fn test_breaking_survives_daemon_restart() {
    let dir = TempDir::new().expect("temp dir");
    {
        let mut overlay = open_overlay(&dir);
        assert!(overlay.activate_breaking_items(
            vec!["Tóm tắt một".to_string(), "Tóm tắt hai".to_string()],
            "TRỰC TIẾP",
        ));
    }

    let overlay = open_overlay(&dir);
    assert_eq!(overlay.mode(), NewsMode::Breaking);
    assert_eq!(overlay.news().breaking_tag(), "TRỰC TIẾP");
    assert_eq!(
        overlay.news().breaking_items(),
        ["Tóm tắt một", "Tóm tắt hai"]
    );
    assert_eq!(overlay.last_special(), Some(SpecialMode::Breaking));
}

#[test]
fn test_pause_resume_survives_restart_with_identical_payload() {
    let dir = TempDir::new().expect("temp dir");
    {
        let mut overlay = open_overlay(&dir);
        assert!(overlay.activate_disaster("CẢNH BÁO", "Lũ lớn tại miền Trung", DisplayLocation::Ticker));
        overlay.pause_special();
    }

    // Restart while paused: payload and resume memory both intact
    let mut overlay = open_overlay(&dir);
    assert_eq!(overlay.mode(), NewsMode::Rss);
    assert_eq!(overlay.last_special(), Some(SpecialMode::Disaster));

    assert!(overlay.reactivate_special());
    assert_eq!(overlay.mode(), NewsMode::Disaster);
    let warning = overlay.news().disaster().expect("payload kept");
    assert_eq!(warning.tag, "CẢNH BÁO");
    assert_eq!(warning.content, "Lũ lớn tại miền Trung");
    assert_eq!(warning.display_location, DisplayLocation::Ticker);
}

#[test]
fn test_clear_special_wipes_the_store() {
    let dir = TempDir::new().expect("temp dir");
    {
        let mut overlay = open_overlay(&dir);
        overlay.activate_breaking_text("TIN KHẨN", "nội dung");
        overlay.activate_disaster("A", "B", DisplayLocation::Weather);
        overlay.clear_special();
    }

    let overlay = open_overlay(&dir);
    assert_eq!(overlay.mode(), NewsMode::Rss);
    assert_eq!(overlay.last_special(), None);
    assert!(overlay.news().breaking_items().is_empty());
    assert_eq!(overlay.news().disaster(), None);
}

#[test]
fn test_presentation_settings_survive_restart() {
    let dir = TempDir::new().expect("temp dir");
    {
        let mut overlay = open_overlay(&dir);
        overlay.set_weather_bar_visible(false);
        overlay.set_clock_mode(ClockDisplayMode::Alternate, Instant::now());
        overlay.set_clock_text("MỪNG XUÂN".to_string());
        overlay.set_clock_durations(2, 9, Instant::now());
        // Theme flags are session state and must NOT survive
        overlay.set_tet(true);
    }

    let overlay = open_overlay(&dir);
    assert!(!overlay.ui().weather_bar_visible());
    assert_eq!(overlay.ui().clock_mode(), ClockDisplayMode::Alternate);
    assert_eq!(overlay.ui().clock_text(), "MỪNG XUÂN");
    assert_eq!(overlay.ui().clock_secs(), 2);
    assert_eq!(overlay.ui().custom_text_secs(), 9);
    assert_eq!(overlay.ui().theme(), Theme::Normal);
}

#[test]
fn test_disaster_on_weather_routing_end_to_end() {
    let dir = TempDir::new().expect("temp dir");
    let mut overlay = open_overlay(&dir);

    overlay
        .feed_mut()
        .apply_titles(vec!["Tiêu đề A.".to_string(), "Tiêu đề B".to_string()]);
    assert!(overlay.activate_disaster("CẢNH BÁO", "Lũ lớn", DisplayLocation::Weather));

    let frame = overlay.frame("09:00:00".to_string());
    assert_eq!(frame.mode, NewsMode::Disaster);
    // Ticker falls back to the live feed
    assert!(frame.ticker.text.starts_with("Tiêu đề A"));
    assert!(frame.ticker.text.ends_with("Tiêu đề B"));
    assert_eq!(frame.ticker.tag, None);
    // The strip carries the warning instead of weather data
    match frame.weather {
        WeatherSlot::Disaster { ref tag, ref content } => {
            assert_eq!(tag, "CẢNH BÁO");
            assert_eq!(content, "Lũ lớn");
        }
        ref other => panic!("expected disaster on the strip, got {other:?}"),
    }
}

#[test]
fn test_formatter_separator_in_live_frame() {
    let dir = TempDir::new().expect("temp dir");
    let mut overlay = open_overlay(&dir);

    overlay
        .feed_mut()
        .apply_titles(vec!["Tiêu đề A.".to_string(), "Tiêu đề B".to_string()]);

    let frame = overlay.frame("09:00:00".to_string());
    let nbsp12 = "\u{00A0}".repeat(12);
    let expected = format!("Tiêu đề A{nbsp12}•{nbsp12}Tiêu đề B");
    assert_eq!(frame.ticker.text, expected);
}

#[test]
fn test_alternate_clock_floor_and_toggle_sequence() {
    let dir = TempDir::new().expect("temp dir");
    let mut overlay = open_overlay(&dir);

    let start = Instant::now();
    overlay.set_clock_durations(1, 10, start);
    overlay.set_clock_mode(ClockDisplayMode::Alternate, start);

    // Starts on the clock view with a 1s deadline (floor applies)
    let frame = overlay.frame("09:00:00".to_string());
    assert_eq!(format!("{:?}", frame.clock.view), "Clock");

    assert!(!overlay.poll_clock(start + std::time::Duration::from_millis(900)));
    assert!(overlay.poll_clock(start + std::time::Duration::from_millis(1000)));
    let frame = overlay.frame("09:00:01".to_string());
    assert_eq!(format!("{:?}", frame.clock.view), "Custom");

    // Custom view holds its full 10 seconds
    let toggled_at = start + std::time::Duration::from_millis(1000);
    assert!(!overlay.poll_clock(toggled_at + std::time::Duration::from_secs(9)));
    assert!(overlay.poll_clock(toggled_at + std::time::Duration::from_secs(10)));
}

#[test]
fn test_custom_list_is_session_scoped() {
    let dir = TempDir::new().expect("temp dir");
    {
        let mut overlay = open_overlay(&dir);
        overlay.add_custom("Thông báo trường quay".to_string());
        assert!(overlay.select_custom());
        assert_eq!(overlay.mode(), NewsMode::Custom);
    }

    // Restart: list gone, mode repaired to the live feed
    let overlay = open_overlay(&dir);
    assert_eq!(overlay.mode(), NewsMode::Rss);
    assert!(overlay.news().custom_items().is_empty());
}

#[test]
fn test_weather_rotation_cycles_all_cities() {
    let dir = TempDir::new().expect("temp dir");
    let mut overlay = open_overlay(&dir);

    let seen: Vec<usize> = (0..6)
        .map(|_| {
            let index = overlay.city_index();
            overlay.advance_city();
            index
        })
        .collect();
    assert_eq!(seen, vec![0, 1, 2, 0, 1, 2]);
}
