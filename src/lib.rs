//! `tickerd` - Broadcast Overlay Daemon
//!
//! Drives an always-on broadcast overlay: a scrolling news ticker plus a
//! weather strip for an unattended studio lower-third. The daemon owns the
//! presentation-mode state machine; operators steer it over IPC (CLI or
//! the terminal control panel) and a renderer polls it for overlay frames.
//!
//! # Features
//! - Live feed, operator text, breaking news, or disaster warning on the
//!   ticker, with pause/resume for the special modes
//! - Disaster warnings routable to the ticker or the weather strip
//! - Mourning/Tet theme flags and a clock area that can alternate between
//!   the live clock and operator text
//! - Operator overrides persisted across restarts in a local JSON store
//! - AI-assisted breaking news drafting with operator confirmation

pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod daemon;
pub mod format;
pub mod frame;
pub mod ipc;
pub mod logging;
pub mod news;
pub mod notification;
pub mod presentation;
pub mod sources;
pub mod state;
pub mod store;
pub mod style;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types for convenience
pub use cli::Args;
pub use config::Config;
pub use state::Overlay;
