//! Full-screen viewer state machine.
//!
//! The viewer is either `Closed` or `Showing` one index of the collection. It
//! never holds stories itself; every transition takes the current collection
//! length. Entering `Showing` arms a single-shot auto-advance identified by an
//! [`AdvanceToken`], so a timer armed for an earlier story can be told apart
//! from the current one and dropped.

use crate::types::deadline_after;
use std::time::{Duration, SystemTime};
use tracing::debug;

pub mod gesture;

pub use gesture::{Gestures, Navigation, ViewerKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Closed,
    Showing { index: usize },
}

/// Identity of one armed auto-advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAdvance {
    pub token: AdvanceToken,
    pub deadline: SystemTime,
}

/// Visibility of the prev/next controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub show_prev: bool,
    pub show_next: bool,
}

pub struct Viewer {
    state: ViewerState,
    dwell: Duration,
    issued: u64,
    armed: Option<AutoAdvance>,
    shown_at: Option<SystemTime>,
}

impl Viewer {
    pub fn new(dwell: Duration) -> Self {
        Self {
            state: ViewerState::Closed,
            dwell,
            issued: 0,
            armed: None,
            shown_at: None,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Showing { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            ViewerState::Showing { index } => Some(index),
            ViewerState::Closed => None,
        }
    }

    /// The pending auto-advance, if any.
    pub fn armed(&self) -> Option<AutoAdvance> {
        self.armed
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// When the current story was shown; the progress indicator restarts here.
    pub fn shown_at(&self) -> Option<SystemTime> {
        self.shown_at
    }
}

/// Transitions.
impl Viewer {
    /// Opens at `index`. An empty collection or an out-of-range index closes.
    pub fn open(&mut self, index: usize, len: usize, now: SystemTime) -> ViewerState {
        if len == 0 {
            return self.close();
        }
        debug!(index, len, "viewer opened");
        self.show(index, len, now)
    }

    /// Moves forward; past the last story closes.
    pub fn next(&mut self, len: usize, now: SystemTime) -> ViewerState {
        match self.state {
            ViewerState::Closed => ViewerState::Closed,
            ViewerState::Showing { index } => self.show(index.saturating_add(1), len, now),
        }
    }

    /// Moves back; before the first story closes.
    pub fn prev(&mut self, len: usize, now: SystemTime) -> ViewerState {
        match self.state {
            ViewerState::Closed => ViewerState::Closed,
            ViewerState::Showing { index: 0 } => self.close(),
            ViewerState::Showing { index } => self.show(index - 1, len, now),
        }
    }

    pub fn navigate(&mut self, navigation: Navigation, len: usize, now: SystemTime) -> ViewerState {
        match navigation {
            Navigation::Prev => self.prev(len, now),
            Navigation::Next => self.next(len, now),
        }
    }

    /// Closes unconditionally and cancels any pending auto-advance.
    pub fn close(&mut self) -> ViewerState {
        if self.is_open() {
            debug!("viewer closed");
        }
        self.state = ViewerState::Closed;
        self.armed = None;
        self.shown_at = None;
        self.state
    }

    /// Delivers a fired auto-advance. Returns `None` if `token` is not the
    /// currently armed one.
    pub fn fire(&mut self, token: AdvanceToken, len: usize, now: SystemTime) -> Option<ViewerState> {
        match self.armed {
            Some(armed) if armed.token == token => Some(self.next(len, now)),
            _ => {
                debug!(?token, "stale auto-advance ignored");
                None
            }
        }
    }

    /// Fires the armed auto-advance if its deadline has passed.
    pub fn tick(&mut self, len: usize, now: SystemTime) -> Option<ViewerState> {
        let armed = self.armed?;
        if armed.deadline > now {
            return None;
        }
        self.fire(armed.token, len, now)
    }

    /// Points the viewer at the new position of the story it was showing after
    /// the collection changed underneath it. `None` (the story is gone) closes.
    ///
    /// The auto-advance and progress are left running.
    pub fn reindex(&mut self, index: Option<usize>, len: usize) -> ViewerState {
        if !self.is_open() {
            return self.state;
        }
        match index {
            Some(index) if index < len => {
                self.state = ViewerState::Showing { index };
                self.state
            }
            _ => self.close(),
        }
    }

    fn show(&mut self, index: usize, len: usize, now: SystemTime) -> ViewerState {
        if index >= len {
            return self.close();
        }

        self.state = ViewerState::Showing { index };
        self.shown_at = Some(now);
        self.issued += 1;
        self.armed = Some(AutoAdvance {
            token: AdvanceToken(self.issued),
            deadline: deadline_after(now, self.dwell),
        });
        self.state
    }
}

/// Presentation helpers.
impl Viewer {
    /// Prev is hidden on the first story, next on the last.
    pub fn affordances(&self, len: usize) -> Option<Affordances> {
        let index = self.index()?;
        Some(Affordances {
            show_prev: index > 0,
            show_next: index + 1 < len,
        })
    }

    /// Fraction of the dwell time elapsed for the current story, `0.0..=1.0`.
    pub fn progress(&self, now: SystemTime) -> f32 {
        let Some(shown_at) = self.shown_at else {
            return 0.0;
        };
        if self.dwell.is_zero() {
            return 1.0;
        }

        let elapsed = now.duration_since(shown_at).unwrap_or_default();
        (elapsed.as_secs_f32() / self.dwell.as_secs_f32()).min(1.0)
    }
}

#[cfg(test)]
mod tests;
