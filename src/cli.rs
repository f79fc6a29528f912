//! Command-line interface definitions
//!
//! Uses clap for argument parsing with derive macros.

use clap::{Parser, Subcommand, ValueEnum};

/// tickerd - Broadcast Overlay Daemon
///
/// Drives an always-on news ticker and weather strip.
#[derive(Parser)]
#[command(name = "tickerd")]
#[command(version)]
#[command(about = "Broadcast overlay daemon - news ticker and weather strip for unattended display")]
#[command(after_help = "\
BEHAVIOR:
  - The daemon keeps the overlay state machine: live feed, custom text,
    breaking news, or a disaster warning feeds the ticker
  - Operator commands talk to the daemon over a Unix socket
  - Breaking news and disaster warnings survive a restart; pausing them
    keeps their payload for later resume
  - A renderer polls 'tickerd frame --json' for the current overlay content

DAEMON MANAGEMENT:
  tickerd daemon              Run the daemon (logs to file)
  tickerd daemon --foreground Run in foreground with logs to stderr
  tickerd status              Query daemon status (or just: tickerd)
  tickerd reload              Tell daemon to reload config
  tickerd shutdown            Gracefully stop the daemon

BROADCAST CONTROL:
  tickerd rss                 Back to the live feed (resets theme, closes panel)
  tickerd pause               Pause breaking/disaster, keep it for resume
  tickerd resume              Resume the paused special broadcast
  tickerd breaking set        Manual breaking news (tag + content)
  tickerd breaking generate   AI-drafted breaking news with confirmation
  tickerd disaster            Disaster warning on the ticker or weather strip
  tickerd clear               Wipe breaking/disaster data, back to the feed

IPC SOCKET:
  $XDG_RUNTIME_DIR/tickerd.sock (or /tmp/tickerd.sock)")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run the daemon (drives the overlay state machine)
    Daemon {
        /// Run in foreground with logs to stderr
        #[arg(short, long)]
        foreground: bool,
    },

    /// Query daemon status via IPC
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the current overlay frame (what a renderer draws)
    Frame {
        /// Output in JSON format (for renderer consumption)
        #[arg(long)]
        json: bool,
    },

    /// Back to the live feed; resets theme flags and closes the panel
    Rss,

    /// Pause the active special broadcast, keeping it for resume
    Pause,

    /// Resume the paused special broadcast
    Resume,

    /// Manage the operator session list shown in custom mode
    Custom {
        #[command(subcommand)]
        action: CustomAction,
    },

    /// Breaking news control
    Breaking {
        #[command(subcommand)]
        action: BreakingAction,
    },

    /// Activate a disaster warning
    Disaster {
        /// Label shown before the warning (e.g. "CẢNH BÁO BÃO")
        tag: String,

        /// Warning text
        content: String,

        /// Surface the warning is shown on
        #[arg(long, value_enum, default_value = "ticker")]
        location: LocationArg,
    },

    /// Clear breaking news and disaster data, back to the live feed
    Clear,

    /// Set the overlay color theme
    Theme {
        /// Theme to apply
        #[arg(value_enum)]
        theme: ThemeArg,
    },

    /// Show or hide the weather strip
    WeatherBar {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Clock area settings
    Clock {
        #[command(subcommand)]
        action: ClockAction,
    },

    /// Open or close the renderer-side settings panel
    Panel {
        #[arg(value_enum)]
        state: PanelState,
    },

    /// Refetch the live feed now
    Refresh,

    /// Tell daemon to reload the config file
    Reload,

    /// Gracefully shutdown the daemon
    Shutdown,

    /// Validate config file (local, no daemon needed)
    Validate,

    /// Terminal control panel
    #[cfg(feature = "tui")]
    Tui,
}

/// Session custom-list subcommands
#[derive(Subcommand)]
pub enum CustomAction {
    /// Append a line to the session list
    Add {
        /// The line to append
        text: String,
    },

    /// Remove a line by its number (as shown by 'custom list')
    Remove {
        /// 1-based line number
        index: usize,
    },

    /// Drop the whole session list
    Clear,

    /// Show the session list
    List,

    /// Switch the ticker to the session list
    Use,
}

/// Breaking news subcommands
#[derive(Subcommand)]
pub enum BreakingAction {
    /// Go live with a manually entered breaking item
    Set {
        /// Label shown before the scroller (e.g. "TIN KHẨN")
        tag: String,

        /// Breaking news text
        content: String,
    },

    /// Draft summaries with the AI collaborator, then confirm selection
    Generate {
        /// Topic to search for
        topic: String,

        /// Label shown before the scroller
        #[arg(long, default_value = "TIN KHẨN")]
        tag: String,

        /// Desired number of summaries (model decides when omitted)
        #[arg(long)]
        count: Option<u32>,

        /// Only use news published within this many hours
        #[arg(long, default_value_t = 3)]
        hours: u32,

        /// Comma-separated 1-based item numbers to activate (skips the prompt)
        #[arg(long)]
        pick: Option<String>,

        /// Activate every generated item without asking
        #[arg(long)]
        all: bool,
    },
}

/// Clock area subcommands
#[derive(Subcommand)]
pub enum ClockAction {
    /// Set what the clock area shows
    Mode {
        #[arg(value_enum)]
        mode: ClockModeArg,
    },

    /// Set the operator text shown in the clock area
    Text {
        /// The text (uppercase is conventional, e.g. "QUỐC TANG")
        text: String,
    },

    /// Set alternate-mode durations in seconds
    Durations {
        /// Seconds the live clock stays visible
        clock_secs: u64,

        /// Seconds the operator text stays visible
        custom_secs: u64,
    },
}

/// Overlay theme choices
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    /// Default palette (clears mourning/Tet)
    Normal,
    /// Black-and-white mourning palette
    Mourning,
    /// Festive lunar new year palette
    Tet,
}

/// Disaster warning surfaces
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LocationArg {
    /// Replace the ticker content
    Ticker,
    /// Replace the weather strip, ticker keeps the feed
    Weather,
}

/// Clock display modes
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClockModeArg {
    /// Live clock only
    Clock,
    /// Operator text only
    Custom,
    /// Timed toggle between both
    Alternate,
}

/// On/off switch argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    /// The boolean this switch selects.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Panel open/close argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PanelState {
    Open,
    Close,
}
