//! IPC infrastructure for daemon communication
//!
//! Unix socket transport between the operator surfaces (CLI, TUI) and the
//! daemon, carrying length-prefixed JSON messages. Every operator action
//! on the overlay is one request/response pair.

use color_eyre::eyre::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, warn};

use crate::frame::OverlayFrame;
use crate::news::{DisplayLocation, NewsMode, SpecialMode};
use crate::presentation::{ClockDisplayMode, Theme};

// ============================================================================
// Message Types
// ============================================================================

/// Requests sent from an operator surface to the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Query daemon status
    Status,
    /// Fetch the current overlay frame (what the renderer polls)
    Frame,
    /// Back to the live feed; resets theme flags and closes the panel
    SelectRss,
    /// Pause the active special mode, keeping its payload and resume memory
    Pause,
    /// Resume the last paused special mode
    Resume,
    /// Switch the ticker to the operator session list
    SelectCustom,
    /// Append a line to the session list
    CustomAdd { text: String },
    /// Remove a session line by zero-based index
    CustomRemove { index: usize },
    /// Drop the whole session list
    CustomClear,
    /// List the session lines
    CustomList,
    /// Go live with a manually entered breaking item
    BreakingText { tag: String, content: String },
    /// Go live with confirmed breaking summaries (AI-assisted flow)
    BreakingItems { tag: String, items: Vec<String> },
    /// Go live with a disaster warning on the chosen surface
    Disaster {
        tag: String,
        content: String,
        location: DisplayLocation,
    },
    /// Wipe special payloads, forget resume memory, back to the live feed
    ClearSpecial,
    /// Toggle the mourning palette (switches Tet off when set)
    SetMourning { active: bool },
    /// Toggle the Tet palette (switches mourning off when set)
    SetTet { active: bool },
    /// Show or hide the weather strip
    SetWeatherBar { visible: bool },
    /// Change the clock area display mode
    SetClockMode { mode: ClockDisplayMode },
    /// Change the operator text in the clock area
    SetClockText { text: String },
    /// Change the alternate-mode durations (seconds per sub-view)
    SetClockDurations { clock_secs: u64, custom_secs: u64 },
    /// Open the renderer-side settings panel
    PanelOpen,
    /// Close the panel (and any nested selection surface)
    PanelClose,
    /// Refetch the live feed now
    RefreshFeed,
    /// Tell daemon to reload the config file
    Reload,
    /// Gracefully shutdown the daemon
    Shutdown,
}

/// Responses sent from daemon to the operator surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Status information
    Status(Box<StatusInfo>),
    /// The current overlay frame
    Frame { frame: Box<OverlayFrame> },
    /// Generic success response
    Ok { message: String },
    /// The action was a validation no-op (blank tag, empty list, ...)
    Rejected { message: String },
    /// Error response
    Error { message: String },
    /// The operator session list
    CustomList { items: Vec<String> },
}

/// Daemon status snapshot for `tickerd status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub version: String,
    pub uptime_secs: u64,
    pub mode: NewsMode,
    pub last_special: Option<SpecialMode>,
    pub theme: Theme,
    pub weather_bar_visible: bool,
    pub clock_mode: ClockDisplayMode,
    pub clock_text: String,
    pub clock_secs: u64,
    pub custom_text_secs: u64,
    pub panel_open: bool,
    pub feed_title_count: usize,
    pub feed_error: Option<String>,
    pub breaking_item_count: usize,
    pub disaster_active: bool,
}

// ============================================================================
// Socket Path Management
// ============================================================================

/// Get the IPC socket path.
/// Prefers `$XDG_RUNTIME_DIR/tickerd.sock`, falls back to /tmp/tickerd.sock
pub fn get_socket_path() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR").map_or_else(
        |_| PathBuf::from("/tmp/tickerd.sock"),
        |dir| PathBuf::from(dir).join("tickerd.sock"),
    )
}

/// Remove a socket file left behind by a dead daemon. A connectable socket
/// is left alone.
pub async fn cleanup_stale_socket() -> Result<()> {
    let socket_path = get_socket_path();

    if !socket_path.exists() {
        return Ok(());
    }

    match tokio::time::timeout(
        Duration::from_millis(100),
        UnixStream::connect(&socket_path),
    )
    .await
    {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(_)) | Err(_) => {
            debug!("Removing stale socket: {:?}", socket_path);
            std::fs::remove_file(&socket_path)
                .with_context(|| format!("Failed to remove stale socket: {socket_path:?}"))?;
            Ok(())
        }
    }
}

// ============================================================================
// Protocol Helpers
// ============================================================================

const MAX_MESSAGE_SIZE: usize = 1024 * 1024; // 1MB max message size
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Read a length-prefixed JSON message from a stream
async fn read_message<T: for<'de> Deserialize<'de>>(stream: &mut UnixStream) -> Result<T> {
    let mut len_buf = [0u8; 4];
    tokio::time::timeout(READ_TIMEOUT, stream.read_exact(&mut len_buf))
        .await
        .context("Timeout reading message length")?
        .context("Failed to read message length")?;

    let msg_len = u32::from_be_bytes(len_buf) as usize;
    if msg_len > MAX_MESSAGE_SIZE {
        bail!("Message too large: {msg_len} bytes (max: {MAX_MESSAGE_SIZE})");
    }

    let mut msg_buf = vec![0u8; msg_len];
    tokio::time::timeout(READ_TIMEOUT, stream.read_exact(&mut msg_buf))
        .await
        .context("Timeout reading message payload")?
        .context("Failed to read message payload")?;

    serde_json::from_slice(&msg_buf).context("Failed to deserialize message")
}

/// Write a length-prefixed JSON message to a stream
async fn write_message<T: Serialize>(stream: &mut UnixStream, message: &T) -> Result<()> {
    let json = serde_json::to_vec(message).context("Failed to serialize message")?;
    if json.len() > MAX_MESSAGE_SIZE {
        bail!("Message too large: {} bytes (max: {MAX_MESSAGE_SIZE})", json.len());
    }

    let len = (json.len() as u32).to_be_bytes();
    stream
        .write_all(&len)
        .await
        .context("Failed to write message length")?;
    stream
        .write_all(&json)
        .await
        .context("Failed to write message payload")?;
    stream.flush().await.context("Failed to flush stream")?;

    Ok(())
}

// ============================================================================
// IPC Client (for operator surfaces)
// ============================================================================

/// Send a request to the daemon and wait for the response
///
/// # Errors
/// Returns an error if the daemon is unreachable or the exchange fails.
pub async fn send_request(request: Request) -> Result<Response> {
    let socket_path = get_socket_path();

    let mut stream = tokio::time::timeout(Duration::from_secs(5), UnixStream::connect(&socket_path))
        .await
        .context("Timeout connecting to daemon")?
        .with_context(|| {
            format!("Failed to connect to daemon. Is the daemon running?\nSocket: {socket_path:?}")
        })?;

    debug!("Connected to daemon at {:?}", socket_path);

    write_message(&mut stream, &request).await?;
    let response: Response = read_message(&mut stream).await?;

    Ok(response)
}

// ============================================================================
// IPC Server (for daemon)
// ============================================================================

/// Handle for the IPC server running in the daemon
pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl IpcServer {
    /// Create and bind a new IPC server
    ///
    /// # Errors
    /// Returns an error if the socket cannot be bound.
    pub async fn bind() -> Result<Self> {
        let socket_path = get_socket_path();

        cleanup_stale_socket().await?;

        let listener = UnixListener::bind(&socket_path)
            .with_context(|| format!("Failed to bind IPC socket: {socket_path:?}"))?;

        debug!("IPC server listening on {:?}", socket_path);

        Ok(Self {
            listener,
            socket_path,
        })
    }

    /// Accept the next incoming connection.
    /// Returns None if accept fails (non-fatal)
    pub async fn accept(&self) -> Option<UnixStream> {
        match self.listener.accept().await {
            Ok((stream, _addr)) => Some(stream),
            Err(e) => {
                error!("Failed to accept IPC connection: {}", e);
                None
            }
        }
    }

    /// Get the socket path
    #[must_use]
    pub fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.socket_path) {
            warn!("Failed to remove IPC socket on shutdown: {}", e);
        } else {
            debug!("Removed IPC socket: {:?}", self.socket_path);
        }
    }
}

/// Read a request from a client connection
///
/// # Errors
/// Returns an error on malformed or oversized messages.
pub async fn read_request(stream: &mut UnixStream) -> Result<Request> {
    read_message(stream).await
}

/// Write a response to a client connection
///
/// # Errors
/// Returns an error if the stream write fails.
pub async fn write_response(stream: &mut UnixStream, response: &Response) -> Result<()> {
    write_message(stream, response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_round_trips_through_json() {
        let request = Request::Disaster {
            tag: "CẢNH BÁO".to_string(),
            content: "Lũ lớn".to_string(),
            location: DisplayLocation::Weather,
        };
        let json = serde_json::to_string(&request).expect("serialize");
        let back: Request = serde_json::from_str(&json).expect("deserialize");
        match back {
            Request::Disaster { tag, location, .. } => {
                assert_eq!(tag, "CẢNH BÁO");
                assert_eq!(location, DisplayLocation::Weather);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_request_json_is_tagged() {
        let json = serde_json::to_value(Request::Pause).expect("serialize");
        assert_eq!(json["type"], "Pause");
    }

    #[test]
    fn test_status_response_round_trips() {
        let status = StatusInfo {
            version: "0.2.0".to_string(),
            uptime_secs: 42,
            mode: NewsMode::Breaking,
            last_special: Some(SpecialMode::Breaking),
            theme: Theme::Normal,
            weather_bar_visible: true,
            clock_mode: ClockDisplayMode::Alternate,
            clock_text: String::new(),
            clock_secs: 5,
            custom_text_secs: 5,
            panel_open: false,
            feed_title_count: 7,
            feed_error: None,
            breaking_item_count: 3,
            disaster_active: false,
        };
        let json = serde_json::to_string(&Response::Status(Box::new(status))).expect("serialize");
        let back: Response = serde_json::from_str(&json).expect("deserialize");
        match back {
            Response::Status(info) => {
                assert_eq!(info.uptime_secs, 42);
                assert_eq!(info.mode, NewsMode::Breaking);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
