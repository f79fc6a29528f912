//! News-mode state machine
//!
//! Tracks which content source feeds the ticker (live feed, operator text,
//! breaking news, disaster warning), the pause/resume bookkeeping for the
//! special modes, and the special-news payloads themselves. Every mutating
//! action persists the fields it touched before returning.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::{keys, Store};

/// Default label shown before the breaking news scroller.
pub const DEFAULT_BREAKING_TAG: &str = "TIN KHẨN";

/// Content source currently feeding the ticker. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsMode {
    /// Live feed headlines (the default).
    Rss,
    /// Operator-entered session list.
    Custom,
    /// Breaking news summaries under a tag label.
    Breaking,
    /// Single tagged disaster warning.
    Disaster,
}

impl NewsMode {
    /// Stable lowercase name, as persisted and shown in CLI output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rss => "rss",
            Self::Custom => "custom",
            Self::Breaking => "breaking",
            Self::Disaster => "disaster",
        }
    }
}

/// Which special mode was last activated, independent of the current mode.
/// Lets a paused special broadcast resume without re-entering its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialMode {
    Breaking,
    Disaster,
}

impl From<SpecialMode> for NewsMode {
    fn from(special: SpecialMode) -> Self {
        match special {
            SpecialMode::Breaking => Self::Breaking,
            SpecialMode::Disaster => Self::Disaster,
        }
    }
}

/// Surface a disaster warning is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayLocation {
    /// The warning replaces the ticker content.
    Ticker,
    /// The warning replaces the weather strip; the ticker keeps the live feed.
    Weather,
}

/// Disaster warning payload. Replaced wholesale, never partially edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasterWarning {
    pub tag: String,
    pub content: String,
    pub display_location: DisplayLocation,
}

/// Breaking-news and disaster payloads, owned independently of whether
/// either is currently live. All mutations validate and persist immediately.
#[derive(Debug, Clone)]
pub struct SpecialNews {
    breaking_items: Vec<String>,
    breaking_tag: String,
    disaster: Option<DisasterWarning>,
}

impl SpecialNews {
    fn load(store: &Store) -> Self {
        Self {
            breaking_items: store.get(keys::BREAKING_ITEMS, Vec::new()),
            breaking_tag: store.get(keys::BREAKING_TAG, DEFAULT_BREAKING_TAG.to_string()),
            disaster: store.get_opt(keys::DISASTER_WARNING),
        }
    }

    /// Replace the breaking payload with the given summaries. Rejects
    /// (no-op, returns `false`) when `items` is empty or the tag is blank.
    fn set_breaking(&mut self, store: &mut Store, items: Vec<String>, tag: &str) -> bool {
        let tag = tag.trim();
        if items.is_empty() || tag.is_empty() {
            return false;
        }
        self.breaking_items = items;
        self.breaking_tag = tag.to_string();
        let _ = store
            .set(keys::BREAKING_ITEMS, &self.breaking_items)
            .and_then(|()| store.set(keys::BREAKING_TAG, &self.breaking_tag))
            .map_err(|e| warn!("Failed to persist breaking news: {e:#}"));
        true
    }

    /// Replace the disaster payload. Rejects when tag or content is blank.
    fn set_disaster(
        &mut self,
        store: &mut Store,
        tag: &str,
        content: &str,
        location: DisplayLocation,
    ) -> bool {
        let tag = tag.trim();
        let content = content.trim();
        if tag.is_empty() || content.is_empty() {
            return false;
        }
        self.disaster = Some(DisasterWarning {
            tag: tag.to_string(),
            content: content.to_string(),
            display_location: location,
        });
        let _ = store
            .set(keys::DISASTER_WARNING, &self.disaster)
            .map_err(|e| warn!("Failed to persist disaster warning: {e:#}"));
        true
    }

    /// Reset both payloads and remove their persisted keys.
    fn clear(&mut self, store: &mut Store) {
        self.breaking_items.clear();
        self.breaking_tag = DEFAULT_BREAKING_TAG.to_string();
        self.disaster = None;
        for key in [
            keys::BREAKING_ITEMS,
            keys::BREAKING_TAG,
            keys::DISASTER_WARNING,
        ] {
            let _ = store
                .remove(key)
                .map_err(|e| warn!("Failed to remove '{key}': {e:#}"));
        }
    }
}

/// The presentation-mode state machine.
///
/// Owns the active [`NewsMode`], the pause/resume memory, the special-news
/// payloads, and the session-scoped custom list (deliberately not
/// persisted). Rejected preconditions are silent no-ops; the operator
/// surface is responsible for disabling unavailable actions.
#[derive(Debug)]
pub struct NewsState {
    mode: NewsMode,
    last_special: Option<SpecialMode>,
    special: SpecialNews,
    custom_items: Vec<String>,
}

impl NewsState {
    /// Restore from the store, repairing states the payload no longer backs:
    /// a persisted `disaster` mode without a warning (or `breaking` without
    /// items) falls back to `rss`.
    pub fn load(store: &mut Store) -> Self {
        let special = SpecialNews::load(store);
        let mut mode = store.get(keys::NEWS_MODE, NewsMode::Rss);
        let last_special = store.get_opt(keys::LAST_SPECIAL_MODE);

        let payload_missing = match mode {
            NewsMode::Disaster => special.disaster.is_none(),
            NewsMode::Breaking => {
                special.breaking_items.is_empty() || special.breaking_tag.trim().is_empty()
            }
            // Custom lists do not survive a restart
            NewsMode::Custom => true,
            NewsMode::Rss => false,
        };
        if payload_missing && mode != NewsMode::Rss {
            warn!("Restored mode '{}' has no payload, reverting to rss", mode.name());
            mode = NewsMode::Rss;
            let _ = store
                .set(keys::NEWS_MODE, &mode)
                .map_err(|e| warn!("Failed to persist mode repair: {e:#}"));
        }

        Self {
            mode,
            last_special,
            special,
            custom_items: Vec::new(),
        }
    }

    /// Currently active mode.
    #[must_use]
    pub const fn mode(&self) -> NewsMode {
        self.mode
    }

    /// Special mode available for [`Self::reactivate_special`].
    #[must_use]
    pub const fn last_special(&self) -> Option<SpecialMode> {
        self.last_special
    }

    /// Breaking news summaries.
    #[must_use]
    pub fn breaking_items(&self) -> &[String] {
        &self.special.breaking_items
    }

    /// Breaking news tag label.
    #[must_use]
    pub fn breaking_tag(&self) -> &str {
        &self.special.breaking_tag
    }

    /// Current disaster warning, if one is set.
    #[must_use]
    pub const fn disaster(&self) -> Option<&DisasterWarning> {
        self.special.disaster.as_ref()
    }

    /// Operator-entered session list.
    #[must_use]
    pub fn custom_items(&self) -> &[String] {
        &self.custom_items
    }

    fn set_mode(&mut self, store: &mut Store, mode: NewsMode) {
        if self.mode != mode {
            info!("News mode: {} → {}", self.mode.name(), mode.name());
        }
        self.mode = mode;
        let _ = store
            .set(keys::NEWS_MODE, &self.mode)
            .map_err(|e| warn!("Failed to persist news mode: {e:#}"));
    }

    fn set_last_special(&mut self, store: &mut Store, special: SpecialMode) {
        self.last_special = Some(special);
        let _ = store
            .set(keys::LAST_SPECIAL_MODE, &special)
            .map_err(|e| warn!("Failed to persist last special mode: {e:#}"));
    }

    /// Return to the live feed. The caller additionally resets the theme
    /// flags and closes the control panel (the operator's "back to normal"
    /// action, as opposed to [`Self::switch_to_rss`]).
    pub fn select_rss(&mut self, store: &mut Store) {
        self.set_mode(store, NewsMode::Rss);
    }

    /// Pause a special broadcast: back to the live feed without touching
    /// the pause/resume memory, theme flags, or any surface state.
    pub fn switch_to_rss(&mut self, store: &mut Store) {
        self.set_mode(store, NewsMode::Rss);
    }

    /// Switch the ticker to the operator session list. Rejected while the
    /// list is empty.
    pub fn select_custom(&mut self, store: &mut Store) -> bool {
        if self.custom_items.is_empty() {
            return false;
        }
        self.set_mode(store, NewsMode::Custom);
        true
    }

    /// Activate breaking news from a list of summaries (AI-assisted flow).
    pub fn activate_breaking_items(
        &mut self,
        store: &mut Store,
        items: Vec<String>,
        tag: &str,
    ) -> bool {
        if !self.special.set_breaking(store, items, tag) {
            return false;
        }
        self.set_mode(store, NewsMode::Breaking);
        self.set_last_special(store, SpecialMode::Breaking);
        true
    }

    /// Activate breaking news from a single manually entered text.
    pub fn activate_breaking_text(&mut self, store: &mut Store, tag: &str, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return false;
        }
        self.activate_breaking_items(store, vec![content.to_string()], tag)
    }

    /// Activate a disaster warning on the chosen surface.
    pub fn activate_disaster(
        &mut self,
        store: &mut Store,
        tag: &str,
        content: &str,
        location: DisplayLocation,
    ) -> bool {
        if !self.special.set_disaster(store, tag, content, location) {
            return false;
        }
        self.set_mode(store, NewsMode::Disaster);
        self.set_last_special(store, SpecialMode::Disaster);
        true
    }

    /// Resume the paused special mode. The payload is not re-validated:
    /// it can only have been cleared through [`Self::clear_special`], which
    /// also clears the resume memory.
    pub fn reactivate_special(&mut self, store: &mut Store) -> bool {
        let Some(special) = self.last_special else {
            return false;
        };
        self.set_mode(store, special.into());
        true
    }

    /// Drop both special payloads, forget the resume memory, and return to
    /// the live feed. Removes every associated persisted key.
    pub fn clear_special(&mut self, store: &mut Store) {
        self.mode = NewsMode::Rss;
        self.last_special = None;
        self.special.clear(store);
        for key in [keys::NEWS_MODE, keys::LAST_SPECIAL_MODE] {
            let _ = store
                .remove(key)
                .map_err(|e| warn!("Failed to remove '{key}': {e:#}"));
        }
        info!("Special news data cleared");
    }

    /// Append an operator line to the session list.
    pub fn add_custom(&mut self, text: String) {
        self.custom_items.push(text);
    }

    /// Remove one line by index. Out-of-range indices are ignored.
    pub fn remove_custom(&mut self, index: usize) {
        if index < self.custom_items.len() {
            self.custom_items.remove(index);
        }
    }

    /// Drop the whole session list. The ticker keeps its current mode; a
    /// now-empty custom mode simply scrolls the loading placeholder until
    /// the operator picks another source.
    pub fn clear_custom(&mut self) {
        self.custom_items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fresh() -> (TempDir, Store, NewsState) {
        let dir = TempDir::new().expect("temp dir");
        let mut store = Store::open(dir.path().join("state.json")).expect("open store");
        let state = NewsState::load(&mut store);
        (dir, store, state)
    }

    #[test]
    fn test_defaults_with_empty_store() {
        let (_dir, _store, state) = fresh();
        assert_eq!(state.mode(), NewsMode::Rss);
        assert_eq!(state.last_special(), None);
        assert!(state.breaking_items().is_empty());
        assert_eq!(state.breaking_tag(), DEFAULT_BREAKING_TAG);
        assert_eq!(state.disaster(), None);
    }

    #[test]
    fn test_activate_breaking_rejects_empty_items() {
        let (_dir, mut store, mut state) = fresh();
        assert!(!state.activate_breaking_items(&mut store, vec![], "TAG"));
        assert_eq!(state.mode(), NewsMode::Rss);
        assert!(state.breaking_items().is_empty());
    }

    #[test]
    fn test_activate_breaking_rejects_blank_tag() {
        let (_dir, mut store, mut state) = fresh();
        let items = vec!["Tin khẩn".to_string()];
        assert!(!state.activate_breaking_items(&mut store, items, "   "));
        assert_eq!(state.mode(), NewsMode::Rss);
        assert_eq!(state.last_special(), None);
    }

    #[test]
    fn test_activate_breaking_text_sets_single_item() {
        let (_dir, mut store, mut state) = fresh();
        assert!(state.activate_breaking_text(&mut store, " TRỰC TIẾP ", " Nội dung tin. "));
        assert_eq!(state.mode(), NewsMode::Breaking);
        assert_eq!(state.breaking_tag(), "TRỰC TIẾP");
        assert_eq!(state.breaking_items(), ["Nội dung tin."]);
        assert_eq!(state.last_special(), Some(SpecialMode::Breaking));
    }

    #[test]
    fn test_activate_disaster_rejects_blank_content() {
        let (_dir, mut store, mut state) = fresh();
        assert!(!state.activate_disaster(&mut store, "CẢNH BÁO", "  ", DisplayLocation::Ticker));
        assert_eq!(state.mode(), NewsMode::Rss);
        assert_eq!(state.disaster(), None);
    }

    #[test]
    fn test_pause_and_resume_round_trip() {
        let (_dir, mut store, mut state) = fresh();
        assert!(state.activate_disaster(&mut store, "A", "B", DisplayLocation::Ticker));
        state.switch_to_rss(&mut store);
        assert_eq!(state.mode(), NewsMode::Rss);
        // Pausing keeps both the payload and the resume memory
        assert_eq!(state.last_special(), Some(SpecialMode::Disaster));

        assert!(state.reactivate_special(&mut store));
        assert_eq!(state.mode(), NewsMode::Disaster);
        assert_eq!(
            state.disaster(),
            Some(&DisasterWarning {
                tag: "A".to_string(),
                content: "B".to_string(),
                display_location: DisplayLocation::Ticker,
            })
        );
    }

    #[test]
    fn test_reactivate_without_memory_is_noop() {
        let (_dir, mut store, mut state) = fresh();
        assert!(!state.reactivate_special(&mut store));
        assert_eq!(state.mode(), NewsMode::Rss);
    }

    #[test]
    fn test_clear_special_resets_everything() {
        let (_dir, mut store, mut state) = fresh();
        state.activate_breaking_text(&mut store, "TAG", "content");
        state.activate_disaster(&mut store, "A", "B", DisplayLocation::Weather);
        state.clear_special(&mut store);

        assert_eq!(state.mode(), NewsMode::Rss);
        assert_eq!(state.last_special(), None);
        assert!(state.breaking_items().is_empty());
        assert_eq!(state.breaking_tag(), DEFAULT_BREAKING_TAG);
        assert_eq!(state.disaster(), None);
        assert_eq!(store.get_opt::<NewsMode>(keys::NEWS_MODE), None);
        assert_eq!(store.get_opt::<SpecialMode>(keys::LAST_SPECIAL_MODE), None);
        assert_eq!(store.get_opt::<Vec<String>>(keys::BREAKING_ITEMS), None);
    }

    #[test]
    fn test_select_custom_requires_items() {
        let (_dir, mut store, mut state) = fresh();
        assert!(!state.select_custom(&mut store));
        state.add_custom("Dòng tin".to_string());
        assert!(state.select_custom(&mut store));
        assert_eq!(state.mode(), NewsMode::Custom);
    }

    #[test]
    fn test_custom_list_remove_and_clear() {
        let (_dir, _store, mut state) = fresh();
        state.add_custom("a".to_string());
        state.add_custom("b".to_string());
        state.remove_custom(0);
        assert_eq!(state.custom_items(), ["b"]);
        state.remove_custom(99);
        assert_eq!(state.custom_items(), ["b"]);
        state.clear_custom();
        assert!(state.custom_items().is_empty());
    }

    #[test]
    fn test_special_payload_survives_reload() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        {
            let mut store = Store::open(&path).expect("open");
            let mut state = NewsState::load(&mut store);
            state.activate_disaster(&mut store, "CẢNH BÁO", "Lũ lớn", DisplayLocation::Weather);
        }
        let mut store = Store::open(&path).expect("reopen");
        let state = NewsState::load(&mut store);
        assert_eq!(state.mode(), NewsMode::Disaster);
        assert_eq!(state.disaster().map(|d| d.content.as_str()), Some("Lũ lớn"));
    }

    #[test]
    fn test_custom_mode_does_not_survive_restart() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        {
            let mut store = Store::open(&path).expect("open");
            let mut state = NewsState::load(&mut store);
            state.add_custom("phiên".to_string());
            assert!(state.select_custom(&mut store));
        }
        let mut store = Store::open(&path).expect("reopen");
        let state = NewsState::load(&mut store);
        // The session list is gone, so the mode falls back to the live feed
        assert_eq!(state.mode(), NewsMode::Rss);
        assert!(state.custom_items().is_empty());
    }

    #[test]
    fn test_disaster_mode_without_payload_reverts_on_load() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"news_mode": "disaster"}"#).expect("write");
        let mut store = Store::open(&path).expect("open");
        let state = NewsState::load(&mut store);
        assert_eq!(state.mode(), NewsMode::Rss);
    }

    #[test]
    fn test_pause_does_not_persistently_forget_payload() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        {
            let mut store = Store::open(&path).expect("open");
            let mut state = NewsState::load(&mut store);
            state.activate_breaking_text(&mut store, "TAG", "tin");
            state.switch_to_rss(&mut store);
        }
        let mut store = Store::open(&path).expect("reopen");
        let state = NewsState::load(&mut store);
        assert_eq!(state.mode(), NewsMode::Rss);
        assert_eq!(state.last_special(), Some(SpecialMode::Breaking));
        assert_eq!(state.breaking_items(), ["tin"]);
    }
}
