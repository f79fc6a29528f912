//! Clock area alternation
//!
//! In `alternate` mode the clock area toggles between the live clock and
//! the operator text on per-view timers. The daemon polls the scheduler
//! from its event loop; the deadline accessor tells the loop when to wake.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::presentation::ClockDisplayMode;

/// Floor for a single view's on-screen time. Keeps a near-zero configured
/// duration from flickering the clock area.
pub const MIN_VIEW_DURATION: Duration = Duration::from_millis(1000);

/// Sub-view currently occupying the clock area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockView {
    Clock,
    Custom,
}

impl ClockView {
    const fn other(self) -> Self {
        match self {
            Self::Clock => Self::Custom,
            Self::Custom => Self::Clock,
        }
    }
}

/// Timer-driven toggle between the two clock sub-views.
#[derive(Debug)]
pub struct ClockAlternator {
    mode: ClockDisplayMode,
    view: ClockView,
    /// Bumped on every view transition so a renderer can key a one-shot
    /// transition effect. The value itself carries no meaning.
    token: u64,
    deadline: Option<Instant>,
    clock_secs: u64,
    custom_secs: u64,
}

impl ClockAlternator {
    /// Build from the persisted clock settings. The starting view matches
    /// the display mode (`custom` starts on the operator text, everything
    /// else on the live clock).
    #[must_use]
    pub fn new(mode: ClockDisplayMode, clock_secs: u64, custom_secs: u64, now: Instant) -> Self {
        let view = match mode {
            ClockDisplayMode::Custom => ClockView::Custom,
            ClockDisplayMode::Clock | ClockDisplayMode::Alternate => ClockView::Clock,
        };
        let mut alternator = Self {
            mode,
            view,
            token: 0,
            deadline: None,
            clock_secs,
            custom_secs,
        };
        alternator.arm(now);
        alternator
    }

    /// Visible sub-view.
    #[must_use]
    pub const fn view(&self) -> ClockView {
        self.view
    }

    /// Animation token for the current view. Changes exactly when the view
    /// changes.
    #[must_use]
    pub const fn token(&self) -> u64 {
        self.token
    }

    /// When the next toggle is due, if a timer is pending.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn view_duration(&self, view: ClockView) -> Duration {
        let secs = match view {
            ClockView::Clock => self.clock_secs,
            ClockView::Custom => self.custom_secs,
        };
        Duration::from_secs(secs).max(MIN_VIEW_DURATION)
    }

    fn arm(&mut self, now: Instant) {
        self.deadline = match self.mode {
            ClockDisplayMode::Alternate => Some(now + self.view_duration(self.view)),
            ClockDisplayMode::Clock | ClockDisplayMode::Custom => None,
        };
    }

    fn transition_to(&mut self, view: ClockView) {
        if self.view != view {
            self.view = view;
            self.token = self.token.wrapping_add(1);
        }
    }

    /// Switch display modes. A static mode immediately forces the matching
    /// sub-view and cancels the pending timer; entering `alternate` starts
    /// the timer for whichever view is showing.
    pub fn set_mode(&mut self, mode: ClockDisplayMode, now: Instant) {
        self.mode = mode;
        match mode {
            ClockDisplayMode::Clock => self.transition_to(ClockView::Clock),
            ClockDisplayMode::Custom => self.transition_to(ClockView::Custom),
            ClockDisplayMode::Alternate => {}
        }
        self.arm(now);
    }

    /// Apply new per-view durations. A pending timer is superseded and
    /// restarted for the current view with its new duration.
    pub fn set_durations(&mut self, clock_secs: u64, custom_secs: u64, now: Instant) {
        self.clock_secs = clock_secs;
        self.custom_secs = custom_secs;
        self.arm(now);
    }

    /// Advance the scheduler. Returns `true` when the deadline elapsed and
    /// the view toggled (the timer restarts for the new view's duration).
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.transition_to(self.view.other());
                self.arm(now);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(start: Instant, secs_millis: u64) -> Instant {
        start + Duration::from_millis(secs_millis)
    }

    #[test]
    fn test_static_modes_have_no_timer() {
        let now = Instant::now();
        let clock = ClockAlternator::new(ClockDisplayMode::Clock, 5, 5, now);
        assert_eq!(clock.view(), ClockView::Clock);
        assert_eq!(clock.deadline(), None);

        let custom = ClockAlternator::new(ClockDisplayMode::Custom, 5, 5, now);
        assert_eq!(custom.view(), ClockView::Custom);
        assert_eq!(custom.deadline(), None);
    }

    #[test]
    fn test_alternate_starts_on_clock_with_timer() {
        let now = Instant::now();
        let alt = ClockAlternator::new(ClockDisplayMode::Alternate, 1, 10, now);
        assert_eq!(alt.view(), ClockView::Clock);
        assert_eq!(alt.deadline(), Some(at(now, 1000)));
    }

    #[test]
    fn test_alternate_toggle_uses_each_views_duration() {
        let now = Instant::now();
        let mut alt = ClockAlternator::new(ClockDisplayMode::Alternate, 1, 10, now);

        // Not due yet
        assert!(!alt.poll(at(now, 500)));
        assert_eq!(alt.view(), ClockView::Clock);

        // Clock view expires after its 1s duration
        let t1 = at(now, 1000);
        assert!(alt.poll(t1));
        assert_eq!(alt.view(), ClockView::Custom);
        assert_eq!(alt.deadline(), Some(t1 + Duration::from_secs(10)));

        // Custom view holds for its full 10s
        assert!(!alt.poll(at(now, 6000)));
        assert!(alt.poll(t1 + Duration::from_secs(10)));
        assert_eq!(alt.view(), ClockView::Clock);
    }

    #[test]
    fn test_duration_floor_prevents_flicker() {
        let now = Instant::now();
        let alt = ClockAlternator::new(ClockDisplayMode::Alternate, 0, 0, now);
        assert_eq!(alt.deadline(), Some(now + MIN_VIEW_DURATION));
    }

    #[test]
    fn test_token_changes_only_on_view_transition() {
        let now = Instant::now();
        let mut alt = ClockAlternator::new(ClockDisplayMode::Alternate, 1, 1, now);
        let t0 = alt.token();

        assert!(!alt.poll(at(now, 10)));
        assert_eq!(alt.token(), t0);

        assert!(alt.poll(at(now, 1000)));
        assert_eq!(alt.token(), t0 + 1);

        // Re-selecting alternate keeps the current view and token
        alt.set_mode(ClockDisplayMode::Alternate, at(now, 1100));
        assert_eq!(alt.token(), t0 + 1);
    }

    #[test]
    fn test_leaving_alternate_forces_view_and_cancels_timer() {
        let now = Instant::now();
        let mut alt = ClockAlternator::new(ClockDisplayMode::Alternate, 1, 1, now);
        assert!(alt.poll(at(now, 1000)));
        assert_eq!(alt.view(), ClockView::Custom);

        alt.set_mode(ClockDisplayMode::Clock, at(now, 1500));
        assert_eq!(alt.view(), ClockView::Clock);
        assert_eq!(alt.deadline(), None);

        // A stale poll after cancellation must not toggle anything
        let token = alt.token();
        assert!(!alt.poll(at(now, 10_000)));
        assert_eq!(alt.token(), token);
    }

    #[test]
    fn test_new_durations_supersede_pending_timer() {
        let now = Instant::now();
        let mut alt = ClockAlternator::new(ClockDisplayMode::Alternate, 10, 10, now);
        let mid = at(now, 2000);
        alt.set_durations(3, 10, mid);
        assert_eq!(alt.deadline(), Some(mid + Duration::from_secs(3)));
    }
}
