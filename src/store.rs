//! Persisted overlay state
//!
//! A small synchronous key/value store backed by a single JSON document in
//! the XDG data directory. The in-memory map is the authoritative copy;
//! every mutation rewrites the whole document atomically (tempfile +
//! rename). A malformed document or value never errors - it degrades to
//! the caller-supplied default.

use color_eyre::eyre::{Context, ContextCompat, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persisted key names, one key per overlay field.
pub mod keys {
    /// Active news mode (`rss`, `custom`, `breaking`, `disaster`).
    pub const NEWS_MODE: &str = "news_mode";
    /// Last activated special mode (`breaking` or `disaster`).
    pub const LAST_SPECIAL_MODE: &str = "last_special_mode";
    /// Breaking news summaries shown on the ticker.
    pub const BREAKING_ITEMS: &str = "breaking_items";
    /// Label shown before the breaking news scroller.
    pub const BREAKING_TAG: &str = "breaking_tag";
    /// Disaster warning payload (tag, content, display location).
    pub const DISASTER_WARNING: &str = "disaster_warning";
    /// Whether the weather strip is shown under the ticker.
    pub const WEATHER_BAR_VISIBLE: &str = "weather_bar_visible";
    /// Clock area display mode (`clock`, `custom`, `alternate`).
    pub const CLOCK_DISPLAY_MODE: &str = "clock_display_mode";
    /// Operator text shown in the clock area.
    pub const CLOCK_CUSTOM_TEXT: &str = "clock_custom_text";
    /// Seconds the live clock stays visible in alternate mode.
    pub const CLOCK_SECS: &str = "clock_secs";
    /// Seconds the operator text stays visible in alternate mode.
    pub const CUSTOM_TEXT_SECS: &str = "custom_text_secs";
}

/// JSON-document key/value store with typed accessors.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    entries: serde_json::Map<String, Value>,
}

impl Store {
    /// Open the store at the default XDG data path, creating parents as needed.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be determined or created.
    pub fn open_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("Could not determine data directory")?
            .join("tickerd");
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data dir: {data_dir:?}"))?;
        Self::open(data_dir.join("state.json"))
    }

    /// Open the store at an explicit path. A missing or malformed document
    /// starts the store empty (all keys at their defaults).
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read state file: {path:?}"))?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(map)) => map,
                Ok(_) | Err(_) => {
                    warn!("State file {:?} is malformed, starting fresh", path);
                    serde_json::Map::new()
                }
            }
        } else {
            serde_json::Map::new()
        };

        Ok(Self { path, entries })
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a typed value, falling back to `default` when the key is absent
    /// or the stored value does not deserialize to the expected shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }

    /// Read a typed value, `None` when absent or malformed.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Stored value for '{}' has unexpected shape: {}", key, e);
                None
            }
        }
    }

    /// Write a value and flush the document. Writes are skipped when the
    /// serialized value is unchanged.
    ///
    /// # Errors
    /// Returns an error if serialization or the document write fails.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let serialized =
            serde_json::to_value(value).with_context(|| format!("Failed to serialize '{key}'"))?;
        if self.entries.get(key) == Some(&serialized) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), serialized);
        self.flush()
    }

    /// Delete a key and flush the document. A no-op if the key is absent.
    ///
    /// # Errors
    /// Returns an error if the document write fails.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush()
    }

    /// Rewrite the whole document atomically: write to a tempfile in the
    /// same directory, then rename over the target (0o600 on Unix).
    fn flush(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .context("State file path has no parent directory")?;
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state dir: {parent:?}"))?;

        let json = serde_json::to_string_pretty(&Value::Object(self.entries.clone()))
            .context("Failed to serialize state document")?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .context("Failed to create temporary state file")?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write temporary state file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            tmp.as_file()
                .set_permissions(perms)
                .context("Failed to set state file permissions")?;
        }

        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to persist state file: {:?}", self.path))?;
        debug!("State flushed to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().expect("temp dir");
        let store = Store::open(dir.path().join("state.json")).expect("open store");
        (dir, store)
    }

    #[test]
    fn test_absent_key_returns_default() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get(keys::BREAKING_TAG, "TIN KHẨN".to_string()), "TIN KHẨN");
        assert!(store.get(keys::WEATHER_BAR_VISIBLE, true));
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let (_dir, mut store) = temp_store();
        store
            .set(keys::BREAKING_ITEMS, &vec!["a".to_string(), "b".to_string()])
            .expect("set");
        let items: Vec<String> = store.get(keys::BREAKING_ITEMS, Vec::new());
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        {
            let mut store = Store::open(&path).expect("open");
            store.set(keys::CLOCK_SECS, &7u64).expect("set");
        }
        let store = Store::open(&path).expect("reopen");
        assert_eq!(store.get(keys::CLOCK_SECS, 5u64), 7);
    }

    #[test]
    fn test_remove_deletes_key() {
        let (_dir, mut store) = temp_store();
        store.set(keys::NEWS_MODE, &"breaking").expect("set");
        store.remove(keys::NEWS_MODE).expect("remove");
        assert_eq!(store.get_opt::<String>(keys::NEWS_MODE), None);
    }

    #[test]
    fn test_malformed_document_degrades_to_empty() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json at all").expect("write garbage");
        let store = Store::open(&path).expect("open");
        assert_eq!(store.get(keys::CLOCK_CUSTOM_TEXT, String::new()), "");
    }

    #[test]
    fn test_wrong_shape_value_degrades_to_default() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"clock_secs": "not-a-number"}"#).expect("write");
        let store = Store::open(&path).expect("open");
        assert_eq!(store.get(keys::CLOCK_SECS, 5u64), 5);
    }

    #[test]
    fn test_non_object_document_degrades_to_empty() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2, 3]").expect("write");
        let store = Store::open(&path).expect("open");
        assert_eq!(store.get_opt::<String>(keys::NEWS_MODE), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_flush_sets_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let (dir, mut store) = temp_store();
        store.set(keys::NEWS_MODE, &"rss").expect("set");
        let mode = std::fs::metadata(dir.path().join("state.json"))
            .expect("metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600);
    }
}
