//! TUI application state machine
//!
//! Manages screen navigation, pending operator actions, and the cached
//! daemon snapshots the screens render from.

use crate::frame::OverlayFrame;
use crate::ipc::{Request, StatusInfo};
use crate::sources::ai::GeneratedNews;

use super::screens::{BreakingScreen, DashboardScreen, InterfaceScreen};

/// Active screen in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Breaking,
    Interface,
}

impl Screen {
    /// Get all available screens in display order
    pub fn all() -> &'static [Self] {
        &[Self::Dashboard, Self::Breaking, Self::Interface]
    }

    /// Get the display name for this screen
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Breaking => "Breaking",
            Self::Interface => "Interface",
        }
    }

    /// Get the keyboard shortcut key for this screen
    pub const fn key(self) -> char {
        match self {
            Self::Dashboard => 'd',
            Self::Breaking => 'b',
            Self::Interface => 'i',
        }
    }

    /// Get the next screen in the cycle
    pub const fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Breaking,
            Self::Breaking => Self::Interface,
            Self::Interface => Self::Dashboard,
        }
    }

    /// Get the previous screen in the cycle
    pub const fn prev(self) -> Self {
        match self {
            Self::Dashboard => Self::Interface,
            Self::Breaking => Self::Dashboard,
            Self::Interface => Self::Breaking,
        }
    }
}

/// Messages sent from background workers to the UI
pub(crate) enum AppUpdate {
    /// Fresh daemon snapshots (None when the daemon is unreachable)
    Snapshot {
        status: Option<Box<StatusInfo>>,
        frame: Option<Box<OverlayFrame>>,
    },
    /// Outcome message of an executed operator action
    ActionResult(String),
    /// Fresh tail of the daemon log file
    Logs(Vec<String>),
    /// AI generation finished (error already rendered as a message)
    GenerationDone(Box<Result<GeneratedNews, String>>),
    /// Spell check finished; stale generations are discarded
    SpellResult {
        generation: u64,
        suggestion: Option<String>,
    },
}

/// Parameters for one AI generation run
#[derive(Debug, Clone)]
pub(crate) struct GenerateParams {
    pub topic: String,
    pub tag: String,
    pub count: Option<u32>,
    pub hours: u32,
}

/// Application state
pub(crate) struct App {
    /// Currently active screen
    pub current_screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Latest daemon status snapshot
    pub status: Option<StatusInfo>,
    /// Latest overlay frame snapshot
    pub frame: Option<OverlayFrame>,
    /// Whether the daemon answered the last poll
    pub daemon_running: bool,
    /// Status message to display (errors, confirmations)
    pub status_message: Option<String>,
    /// Whether to show help overlay
    pub show_help: bool,
    /// Tail of the daemon log for the dashboard viewer
    pub logs: Vec<String>,

    /// Dashboard screen state
    pub dashboard: DashboardScreen,
    /// Breaking news screen state
    pub breaking: BreakingScreen,
    /// Interface settings screen state
    pub interface: InterfaceScreen,

    /// Operator actions queued by input handlers, executed by the run loop
    pub pending_requests: Vec<Request>,
    /// AI generation queued by the breaking screen
    pub pending_generate: Option<GenerateParams>,
    /// Whether the UI needs to be redrawn
    pub dirty: bool,
}

impl App {
    /// Create a new application instance
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_screen: Screen::Dashboard,
            should_quit: false,
            status: None,
            frame: None,
            daemon_running: false,
            status_message: None,
            show_help: false,
            logs: Vec::new(),
            dashboard: DashboardScreen::new(),
            breaking: BreakingScreen::new(),
            interface: InterfaceScreen::new(),
            pending_requests: Vec::new(),
            pending_generate: None,
            dirty: true,
        }
    }

    /// Navigate to a specific screen
    pub fn goto_screen(&mut self, screen: Screen) {
        self.current_screen = screen;
        self.clear_status();
    }

    /// Navigate to the next screen
    pub fn next_screen(&mut self) {
        self.goto_screen(self.current_screen.next());
    }

    /// Navigate to the previous screen
    pub fn prev_screen(&mut self) {
        self.goto_screen(self.current_screen.prev());
    }

    /// Set a status message to display to the user
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.dirty = true;
    }

    /// Clear the current status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.dirty = true;
    }

    /// Request application quit
    pub fn quit(&mut self) {
        self.should_quit = true;
        self.dirty = true;
    }

    /// Queue an operator action for the run loop to execute
    pub fn push_request(&mut self, request: Request) {
        self.pending_requests.push(request);
        self.dirty = true;
    }

    /// Apply a background update to the cached snapshots
    pub fn apply_update(&mut self, update: AppUpdate) {
        match update {
            AppUpdate::Snapshot { status, frame } => {
                self.daemon_running = status.is_some();
                if let Some(status) = status {
                    self.interface.sync_from_status(&status);
                    self.status = Some(*status);
                }
                self.frame = frame.map(|f| *f);
            }
            AppUpdate::ActionResult(message) => self.set_status(message),
            AppUpdate::Logs(lines) => self.logs = lines,
            AppUpdate::GenerationDone(result) => {
                self.breaking.finish_generation(*result);
            }
            AppUpdate::SpellResult {
                generation,
                suggestion,
            } => {
                // Only the last-scheduled check may update visible state
                if generation == self.breaking.spell_generation {
                    self.breaking.spell_suggestion = suggestion;
                }
            }
        }
        self.dirty = true;
    }
}
