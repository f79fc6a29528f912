//! Daemon overlay state
//!
//! Composes the news-mode machine, presentation flags, clock scheduler,
//! and the latest collaborator snapshots into the single authoritative
//! state the daemon event loop mutates. Operations that touch more than
//! one sub-state (mode selection closing the panel, full reset clearing
//! the theme) live here.

use std::time::Instant;

use crate::clock::ClockAlternator;
use crate::config::Config;
use crate::frame::{build_frame, OverlayFrame};
use crate::news::{DisplayLocation, NewsMode, NewsState, SpecialMode};
use crate::presentation::{ClockDisplayMode, PresentationState};
use crate::sources::feed::FeedSnapshot;
use crate::sources::weather::WeatherReport;
use crate::store::Store;

/// The daemon's in-memory overlay state.
pub struct Overlay {
    store: Store,
    news: NewsState,
    ui: PresentationState,
    clock: ClockAlternator,
    feed: FeedSnapshot,
    /// One slot per configured city, filled as observations arrive.
    weather_reports: Vec<Option<WeatherReport>>,
    city_index: usize,
}

impl Overlay {
    /// Restore the overlay from the store and arm the clock scheduler.
    #[must_use]
    pub fn new(mut store: Store, config: &Config, now: Instant) -> Self {
        let news = NewsState::load(&mut store);
        let ui = PresentationState::load(&store);
        let clock = ClockAlternator::new(
            ui.clock_mode(),
            ui.clock_secs(),
            ui.custom_text_secs(),
            now,
        );
        let city_count = config.weather.cities.len();
        Self {
            store,
            news,
            ui,
            clock,
            feed: FeedSnapshot::default(),
            weather_reports: vec![None; city_count],
            city_index: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn news(&self) -> &NewsState {
        &self.news
    }

    #[must_use]
    pub const fn ui(&self) -> &PresentationState {
        &self.ui
    }

    #[must_use]
    pub const fn clock(&self) -> &ClockAlternator {
        &self.clock
    }

    #[must_use]
    pub const fn feed(&self) -> &FeedSnapshot {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut FeedSnapshot {
        &mut self.feed
    }

    /// City currently on the weather strip.
    #[must_use]
    pub const fn city_index(&self) -> usize {
        self.city_index
    }

    /// Observation for the city currently on the strip, if fetched.
    #[must_use]
    pub fn current_weather(&self) -> Option<&WeatherReport> {
        self.weather_reports.get(self.city_index)?.as_ref()
    }

    /// Resolve the frame the renderer should draw right now.
    #[must_use]
    pub fn frame(&self, time: String) -> OverlayFrame {
        build_frame(
            &self.news,
            &self.ui,
            &self.clock,
            &self.feed,
            self.current_weather(),
            time,
        )
    }

    // ------------------------------------------------------------------
    // News mode actions
    // ------------------------------------------------------------------

    /// Operator's "back to normal broadcast": live feed, default theme,
    /// panel closed.
    pub fn select_rss(&mut self) {
        self.news.select_rss(&mut self.store);
        self.ui.reset_ui_mode();
        self.ui.close_panel();
    }

    /// Pause the active special mode. Nothing but the mode changes.
    pub fn pause_special(&mut self) {
        self.news.switch_to_rss(&mut self.store);
    }

    /// Switch the ticker to the operator session list.
    pub fn select_custom(&mut self) -> bool {
        let accepted = self.news.select_custom(&mut self.store);
        if accepted {
            self.ui.close_panel();
        }
        accepted
    }

    pub fn add_custom(&mut self, text: String) {
        self.news.add_custom(text);
    }

    pub fn remove_custom(&mut self, index: usize) {
        self.news.remove_custom(index);
    }

    pub fn clear_custom(&mut self) {
        self.news.clear_custom();
    }

    /// Go live with breaking news built from confirmed summaries.
    pub fn activate_breaking_items(&mut self, items: Vec<String>, tag: &str) -> bool {
        let accepted = self.news.activate_breaking_items(&mut self.store, items, tag);
        if accepted {
            self.ui.close_panel();
        }
        accepted
    }

    /// Go live with a single manually entered breaking item.
    pub fn activate_breaking_text(&mut self, tag: &str, content: &str) -> bool {
        let accepted = self.news.activate_breaking_text(&mut self.store, tag, content);
        if accepted {
            self.ui.close_panel();
        }
        accepted
    }

    /// Go live with a disaster warning on the chosen surface.
    pub fn activate_disaster(
        &mut self,
        tag: &str,
        content: &str,
        location: DisplayLocation,
    ) -> bool {
        let accepted = self
            .news
            .activate_disaster(&mut self.store, tag, content, location);
        if accepted {
            self.ui.close_panel();
        }
        accepted
    }

    /// Resume the paused special mode.
    pub fn reactivate_special(&mut self) -> bool {
        self.news.reactivate_special(&mut self.store)
    }

    /// Wipe both special payloads and return to the live feed.
    pub fn clear_special(&mut self) {
        self.news.clear_special(&mut self.store);
    }

    /// Special mode that would resume, for status output.
    #[must_use]
    pub const fn last_special(&self) -> Option<SpecialMode> {
        self.news.last_special()
    }

    #[must_use]
    pub const fn mode(&self) -> NewsMode {
        self.news.mode()
    }

    // ------------------------------------------------------------------
    // Presentation actions
    // ------------------------------------------------------------------

    pub fn set_mourning(&mut self, active: bool) {
        self.ui.set_mourning(active);
    }

    pub fn set_tet(&mut self, active: bool) {
        self.ui.set_tet(active);
    }

    pub fn set_weather_bar_visible(&mut self, visible: bool) {
        self.ui.set_weather_bar_visible(&mut self.store, visible);
    }

    pub fn open_panel(&mut self) {
        self.ui.open_panel();
    }

    pub fn close_panel(&mut self) {
        self.ui.close_panel();
    }

    /// Change what the clock area shows. The scheduler is re-armed (or
    /// cancelled) in the same step so no stale toggle can fire.
    pub fn set_clock_mode(&mut self, mode: ClockDisplayMode, now: Instant) {
        self.ui.set_clock_mode(&mut self.store, mode);
        self.clock.set_mode(mode, now);
    }

    pub fn set_clock_text(&mut self, text: String) {
        self.ui.set_clock_text(&mut self.store, text);
    }

    /// Update the alternate-mode durations and supersede the pending timer.
    pub fn set_clock_durations(&mut self, clock_secs: u64, custom_secs: u64, now: Instant) {
        self.ui.set_clock_secs(&mut self.store, clock_secs);
        self.ui.set_custom_text_secs(&mut self.store, custom_secs);
        self.clock.set_durations(clock_secs, custom_secs, now);
    }

    /// Advance the clock scheduler; returns `true` when the view toggled.
    pub fn poll_clock(&mut self, now: Instant) -> bool {
        self.clock.poll(now)
    }

    // ------------------------------------------------------------------
    // Collaborator snapshots
    // ------------------------------------------------------------------

    /// Store a fresh observation for a city slot.
    pub fn set_weather_report(&mut self, index: usize, report: WeatherReport) {
        if let Some(slot) = self.weather_reports.get_mut(index) {
            *slot = Some(report);
        }
    }

    /// Rotate the strip to the next configured city.
    pub fn advance_city(&mut self) {
        if !self.weather_reports.is_empty() {
            self.city_index = (self.city_index + 1) % self.weather_reports.len();
        }
    }
}
