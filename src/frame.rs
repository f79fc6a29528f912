//! Overlay frame resolution
//!
//! Collapses the news mode, presentation flags, clock scheduler, and the
//! latest collaborator snapshots into the single render model a renderer
//! polls for. Pure construction - no I/O, no timers.

use serde::{Deserialize, Serialize};

use crate::clock::{ClockAlternator, ClockView};
use crate::format::format_ticker;
use crate::news::{DisplayLocation, NewsMode, NewsState};
use crate::presentation::{PresentationState, Theme};
use crate::sources::feed::FeedSnapshot;
use crate::sources::weather::WeatherReport;

/// Everything the renderer needs for one draw of the lower-third.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayFrame {
    pub mode: NewsMode,
    pub theme: Theme,
    pub ticker: TickerSlot,
    pub weather: WeatherSlot,
    pub clock: ClockSlot,
    /// Whether the renderer should show the settings panel surface.
    pub panel_open: bool,
}

/// The scrolling text band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerSlot {
    /// Label shown before the scroller (breaking tag or disaster tag).
    pub tag: Option<String>,
    /// Formatted scroller text.
    pub text: String,
}

/// The strip under the ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WeatherSlot {
    /// Operator hid the strip.
    Hidden,
    /// Visible but no observation has arrived yet.
    Loading,
    /// Rotating city weather.
    Report(WeatherReport),
    /// A disaster warning routed onto the strip.
    Disaster { tag: String, content: String },
}

/// The clock area at the head of the ticker band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockSlot {
    pub view: ClockView,
    /// Wall-clock text for renderers that do not draw their own clock.
    pub time: String,
    pub custom_text: String,
    /// Changes on every view transition; keys the renderer's one-shot
    /// transition effect.
    pub token: u64,
}

/// Resolve the current overlay frame.
#[must_use]
pub fn build_frame(
    news: &NewsState,
    ui: &PresentationState,
    clock: &ClockAlternator,
    feed: &FeedSnapshot,
    weather: Option<&WeatherReport>,
    time: String,
) -> OverlayFrame {
    let disaster_on_ticker = news.mode() == NewsMode::Disaster
        && news.disaster().map(|d| d.display_location) == Some(DisplayLocation::Ticker);
    let disaster_on_weather = news.mode() == NewsMode::Disaster
        && news.disaster().map(|d| d.display_location) == Some(DisplayLocation::Weather);

    let ticker = match news.mode() {
        NewsMode::Custom => TickerSlot {
            tag: None,
            text: format_ticker(news.custom_items(), None),
        },
        NewsMode::Breaking => TickerSlot {
            tag: Some(news.breaking_tag().to_string()),
            text: format_ticker(news.breaking_items(), None),
        },
        NewsMode::Disaster if disaster_on_ticker => {
            // Guarded by the mode invariant: disaster mode implies a payload
            let warning = news.disaster().cloned().unwrap_or_else(|| {
                crate::news::DisasterWarning {
                    tag: String::new(),
                    content: String::new(),
                    display_location: DisplayLocation::Ticker,
                }
            });
            TickerSlot {
                tag: Some(warning.tag),
                text: format_ticker(&[warning.content], None),
            }
        }
        // rss, and disaster routed to the weather strip, show the live feed
        NewsMode::Rss | NewsMode::Disaster => TickerSlot {
            tag: None,
            text: format_ticker(&feed.titles, feed.display_error()),
        },
    };

    let weather_slot = if !ui.weather_bar_visible() {
        WeatherSlot::Hidden
    } else if disaster_on_weather {
        let warning = news.disaster().cloned();
        WeatherSlot::Disaster {
            tag: warning.as_ref().map(|d| d.tag.clone()).unwrap_or_default(),
            content: warning.map(|d| d.content).unwrap_or_default(),
        }
    } else {
        weather.map_or(WeatherSlot::Loading, |report| {
            WeatherSlot::Report(report.clone())
        })
    };

    OverlayFrame {
        mode: news.mode(),
        theme: ui.theme(),
        ticker,
        weather: weather_slot,
        clock: ClockSlot {
            view: clock.view(),
            time,
            custom_text: ui.clock_text().to_string(),
            token: clock.token(),
        },
        panel_open: ui.panel_open(),
    }
}
