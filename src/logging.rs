//! Daemon log file handling
//!
//! Size-rotating log appender used when the daemon runs detached. Keeps
//! the active file plus one `.old` backup, re-creates the file if it is
//! deleted externally, and restricts permissions to the owner.

use color_eyre::eyre::{Context, ContextCompat, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Maximum size of the active log file before rotation.
pub const MAX_LOG_SIZE_BYTES: u64 = 1_000_000;

/// Directory holding the daemon log files.
///
/// # Errors
/// Returns an error if the XDG data directory cannot be determined or created.
pub fn log_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Could not determine data directory")?
        .join("tickerd")
        .join("logs");
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create log dir: {dir:?}"))?;
    Ok(dir)
}

/// A file appender that rotates the log once it exceeds a size limit,
/// keeping exactly one backup (`<name>.old`).
pub struct RotatingFileAppender {
    path: PathBuf,
    backup_path: PathBuf,
    max_size_bytes: u64,
    file: Mutex<Option<File>>,
}

impl RotatingFileAppender {
    /// Create an appender for `dir/filename`, rotating past `max_size_bytes`.
    pub fn new(dir: impl Into<PathBuf>, filename: &str, max_size_bytes: u64) -> Self {
        let dir = dir.into();
        let path = dir.join(filename);
        let backup_path = dir.join(format!("{filename}.old"));

        Self {
            path,
            backup_path,
            max_size_bytes,
            file: Mutex::new(None),
        }
    }

    fn open_secure(path: &Path, append: bool) -> io::Result<File> {
        let mut options = fs::OpenOptions::new();
        options.create(true).write(true);

        if append {
            options.append(true);
        } else {
            options.truncate(true);
        }

        #[cfg(unix)]
        {
            options.mode(0o600);
        }

        options.open(path)
    }

    /// Open the file if not open, or re-open if it was deleted externally.
    fn get_file<'a>(&self, guard: &'a mut Option<File>) -> io::Result<&'a mut File> {
        if !self.path.exists() {
            *guard = None;
        }

        if guard.is_none() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            *guard = Some(Self::open_secure(&self.path, true)?);
        }

        guard
            .as_mut()
            .ok_or_else(|| io::Error::other("log file handle missing after open"))
    }

    /// Rotate: current becomes the backup, a fresh current is created.
    fn rotate(&self, guard: &mut Option<File>) -> io::Result<()> {
        *guard = None;

        if self.path.exists() {
            fs::rename(&self.path, &self.backup_path)?;
        }

        *guard = Some(Self::open_secure(&self.path, false)?);
        Ok(())
    }
}

impl Write for RotatingFileAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("Log mutex poisoned: {e}")))?;

        let current_size = match self.get_file(&mut guard) {
            Ok(f) => f.metadata()?.len(),
            Err(_) => 0,
        };

        if current_size >= self.max_size_bytes {
            if let Err(e) = self.rotate(&mut guard) {
                // Keep writing to the old file rather than dropping the line
                eprintln!("Failed to rotate log file: {e}");
            }
        }

        let file = self.get_file(&mut guard)?;
        file.write_all(buf)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("Log mutex poisoned: {e}")))?;

        if let Some(file) = guard.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_create_the_file() {
        let dir = TempDir::new().expect("temp dir");
        let mut appender = RotatingFileAppender::new(dir.path(), "daemon.log", 1000);
        appender.write_all(b"hello\n").expect("write");
        appender.flush().expect("flush");
        let contents = fs::read_to_string(dir.path().join("daemon.log")).expect("read");
        assert_eq!(contents, "hello\n");
    }

    #[test]
    fn test_rotation_keeps_one_backup() {
        let dir = TempDir::new().expect("temp dir");
        let mut appender = RotatingFileAppender::new(dir.path(), "daemon.log", 10);
        appender.write_all(b"0123456789ab\n").expect("first write");
        // Second write exceeds the limit and triggers rotation
        appender.write_all(b"fresh\n").expect("second write");
        appender.flush().expect("flush");

        let backup = fs::read_to_string(dir.path().join("daemon.log.old")).expect("backup");
        assert_eq!(backup, "0123456789ab\n");
        let current = fs::read_to_string(dir.path().join("daemon.log")).expect("current");
        assert_eq!(current, "fresh\n");
    }

    #[test]
    fn test_recreates_file_deleted_externally() {
        let dir = TempDir::new().expect("temp dir");
        let mut appender = RotatingFileAppender::new(dir.path(), "daemon.log", 1000);
        appender.write_all(b"one\n").expect("write");
        fs::remove_file(dir.path().join("daemon.log")).expect("delete");
        appender.write_all(b"two\n").expect("write after delete");
        appender.flush().expect("flush");
        let contents = fs::read_to_string(dir.path().join("daemon.log")).expect("read");
        assert_eq!(contents, "two\n");
    }
}
