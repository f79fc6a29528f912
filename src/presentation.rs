//! Overlay presentation state
//!
//! Theme flags, weather-strip visibility, clock display settings, and the
//! control-panel surface flags. Persistent preferences go through the
//! store; theme flags and surface visibility are session state.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{keys, Store};

/// Default seconds per sub-view in alternate clock mode.
const DEFAULT_ALTERNATE_SECS: u64 = 5;

/// What the clock area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockDisplayMode {
    /// Live clock only.
    Clock,
    /// Operator text only.
    Custom,
    /// Timed toggle between the live clock and the operator text.
    Alternate,
}

impl ClockDisplayMode {
    /// Stable lowercase name, as persisted and shown in CLI output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Custom => "custom",
            Self::Alternate => "alternate",
        }
    }
}

/// Color theme applied to the whole overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Normal,
    /// Black-and-white national mourning palette.
    Mourning,
    /// Lunar new year festive palette.
    Tet,
}

/// Presentation flags and clock settings.
#[derive(Debug)]
pub struct PresentationState {
    mourning: bool,
    tet: bool,
    weather_bar_visible: bool,
    panel_open: bool,
    selection_open: bool,
    clock_mode: ClockDisplayMode,
    clock_text: String,
    clock_secs: u64,
    custom_text_secs: u64,
}

impl PresentationState {
    /// Restore persisted preferences; theme flags and surfaces start cleared.
    pub fn load(store: &Store) -> Self {
        Self {
            mourning: false,
            tet: false,
            weather_bar_visible: store.get(keys::WEATHER_BAR_VISIBLE, true),
            panel_open: false,
            selection_open: false,
            clock_mode: store.get(keys::CLOCK_DISPLAY_MODE, ClockDisplayMode::Clock),
            clock_text: store.get(keys::CLOCK_CUSTOM_TEXT, String::new()),
            clock_secs: store.get(keys::CLOCK_SECS, DEFAULT_ALTERNATE_SECS),
            custom_text_secs: store.get(keys::CUSTOM_TEXT_SECS, DEFAULT_ALTERNATE_SECS),
        }
    }

    /// Active theme derived from the (mutually exclusive) flags.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        if self.mourning {
            Theme::Mourning
        } else if self.tet {
            Theme::Tet
        } else {
            Theme::Normal
        }
    }

    #[must_use]
    pub const fn is_mourning(&self) -> bool {
        self.mourning
    }

    #[must_use]
    pub const fn is_tet(&self) -> bool {
        self.tet
    }

    #[must_use]
    pub const fn weather_bar_visible(&self) -> bool {
        self.weather_bar_visible
    }

    #[must_use]
    pub const fn panel_open(&self) -> bool {
        self.panel_open
    }

    #[must_use]
    pub const fn selection_open(&self) -> bool {
        self.selection_open
    }

    #[must_use]
    pub const fn clock_mode(&self) -> ClockDisplayMode {
        self.clock_mode
    }

    #[must_use]
    pub fn clock_text(&self) -> &str {
        &self.clock_text
    }

    #[must_use]
    pub const fn clock_secs(&self) -> u64 {
        self.clock_secs
    }

    #[must_use]
    pub const fn custom_text_secs(&self) -> u64 {
        self.custom_text_secs
    }

    /// Activate or clear the mourning palette. Activating it switches the
    /// Tet palette off (last write wins).
    pub fn set_mourning(&mut self, active: bool) {
        self.mourning = active;
        if active {
            self.tet = false;
        }
    }

    /// Activate or clear the Tet palette; switches mourning off when set.
    pub fn set_tet(&mut self, active: bool) {
        self.tet = active;
        if active {
            self.mourning = false;
        }
    }

    /// Clear both theme flags. The weather-strip preference is a persistent
    /// operator setting and stays as it is.
    pub fn reset_ui_mode(&mut self) {
        self.mourning = false;
        self.tet = false;
    }

    /// Show or hide the weather strip.
    pub fn set_weather_bar_visible(&mut self, store: &mut Store, visible: bool) {
        self.weather_bar_visible = visible;
        let _ = store
            .set(keys::WEATHER_BAR_VISIBLE, &visible)
            .map_err(|e| warn!("Failed to persist weather bar visibility: {e:#}"));
    }

    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    /// Close the panel. The nested headline-selection surface cannot outlive
    /// the panel, so it is force-closed as well.
    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.selection_open = false;
    }

    pub fn open_selection(&mut self) {
        self.selection_open = true;
    }

    pub fn close_selection(&mut self) {
        self.selection_open = false;
    }

    pub fn set_clock_mode(&mut self, store: &mut Store, mode: ClockDisplayMode) {
        self.clock_mode = mode;
        let _ = store
            .set(keys::CLOCK_DISPLAY_MODE, &mode)
            .map_err(|e| warn!("Failed to persist clock display mode: {e:#}"));
    }

    pub fn set_clock_text(&mut self, store: &mut Store, text: String) {
        self.clock_text = text;
        let _ = store
            .set(keys::CLOCK_CUSTOM_TEXT, &self.clock_text)
            .map_err(|e| warn!("Failed to persist clock text: {e:#}"));
    }

    pub fn set_clock_secs(&mut self, store: &mut Store, secs: u64) {
        self.clock_secs = secs;
        let _ = store
            .set(keys::CLOCK_SECS, &secs)
            .map_err(|e| warn!("Failed to persist clock duration: {e:#}"));
    }

    pub fn set_custom_text_secs(&mut self, store: &mut Store, secs: u64) {
        self.custom_text_secs = secs;
        let _ = store
            .set(keys::CUSTOM_TEXT_SECS, &secs)
            .map_err(|e| warn!("Failed to persist custom text duration: {e:#}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fresh() -> (TempDir, Store, PresentationState) {
        let dir = TempDir::new().expect("temp dir");
        let store = Store::open(dir.path().join("state.json")).expect("open store");
        let ui = PresentationState::load(&store);
        (dir, store, ui)
    }

    #[test]
    fn test_defaults() {
        let (_dir, _store, ui) = fresh();
        assert_eq!(ui.theme(), Theme::Normal);
        assert!(ui.weather_bar_visible());
        assert!(!ui.panel_open());
        assert_eq!(ui.clock_mode(), ClockDisplayMode::Clock);
        assert_eq!(ui.clock_secs(), 5);
        assert_eq!(ui.custom_text_secs(), 5);
    }

    #[test]
    fn test_mourning_and_tet_are_mutually_exclusive() {
        let (_dir, _store, mut ui) = fresh();
        ui.set_tet(true);
        assert!(ui.is_tet());
        ui.set_mourning(true);
        assert!(ui.is_mourning());
        assert!(!ui.is_tet());
        ui.set_tet(true);
        assert!(!ui.is_mourning());
        assert_eq!(ui.theme(), Theme::Tet);
    }

    #[test]
    fn test_reset_clears_themes_but_not_weather_bar() {
        let (_dir, mut store, mut ui) = fresh();
        ui.set_weather_bar_visible(&mut store, false);
        ui.set_mourning(true);
        ui.reset_ui_mode();
        assert_eq!(ui.theme(), Theme::Normal);
        assert!(!ui.weather_bar_visible());
    }

    #[test]
    fn test_close_panel_closes_nested_selection() {
        let (_dir, _store, mut ui) = fresh();
        ui.open_panel();
        ui.open_selection();
        ui.close_panel();
        assert!(!ui.panel_open());
        assert!(!ui.selection_open());
    }

    #[test]
    fn test_clock_settings_persist_across_reload() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        {
            let mut store = Store::open(&path).expect("open");
            let mut ui = PresentationState::load(&store);
            ui.set_clock_mode(&mut store, ClockDisplayMode::Alternate);
            ui.set_clock_text(&mut store, "QUỐC KHÁNH 2/9".to_string());
            ui.set_clock_secs(&mut store, 3);
            ui.set_custom_text_secs(&mut store, 12);
            ui.set_weather_bar_visible(&mut store, false);
        }
        let store = Store::open(&path).expect("reopen");
        let ui = PresentationState::load(&store);
        assert_eq!(ui.clock_mode(), ClockDisplayMode::Alternate);
        assert_eq!(ui.clock_text(), "QUỐC KHÁNH 2/9");
        assert_eq!(ui.clock_secs(), 3);
        assert_eq!(ui.custom_text_secs(), 12);
        assert!(!ui.weather_bar_visible());
    }

    #[test]
    fn test_theme_flags_are_session_only() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        {
            let mut store = Store::open(&path).expect("open");
            let mut ui = PresentationState::load(&store);
            ui.set_mourning(true);
            // Unrelated persisted write, flags must not ride along
            ui.set_clock_secs(&mut store, 9);
        }
        let store = Store::open(&path).expect("reopen");
        let ui = PresentationState::load(&store);
        assert_eq!(ui.theme(), Theme::Normal);
    }
}
