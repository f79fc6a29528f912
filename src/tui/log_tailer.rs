//! Log file tailer for the dashboard's log viewer
//!
//! Reads the tail of the daemon log file on each background poll. The
//! daemon's appender rotates past 1MB, so a full tail read stays cheap and
//! rotation needs no special bookkeeping.

use std::fs;
use std::path::PathBuf;

use crate::logging::log_dir;

/// Log lines kept for display.
const MAX_LOG_LINES: usize = 200;

/// Path of the active daemon log file, if the log directory resolves.
pub(crate) fn daemon_log_path() -> Option<PathBuf> {
    log_dir().ok().map(|dir| dir.join("daemon.log"))
}

/// Read the last [`MAX_LOG_LINES`] lines of the daemon log. Missing or
/// unreadable files yield an empty tail; the viewer just shows nothing.
pub(crate) fn read_tail() -> Vec<String> {
    let Some(path) = daemon_log_path() else {
        return Vec::new();
    };
    let Ok(contents) = fs::read_to_string(&path) else {
        return Vec::new();
    };
    let lines: Vec<&str> = contents.lines().collect();
    let start = lines.len().saturating_sub(MAX_LOG_LINES);
    lines[start..].iter().map(ToString::to_string).collect()
}
