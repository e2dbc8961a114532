//! Click vs. double-click disambiguation by release timing.
//!
//! A lone click can only be confirmed once the double-click window has
//! passed without a second release, so `Click` always lags its release by
//! the window length.

use tracing::{debug, trace};

/// A confirmed click classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Click,
    DoubleClick,
}

/// Release timestamps (ms) awaiting classification.
#[derive(Debug, Clone)]
pub struct ClickTimestampBuffer {
    window_ms: u64,
    min_gap_ms: u64,
    releases: Vec<u64>,
}

impl ClickTimestampBuffer {
    pub fn new(window_ms: u64, min_gap_ms: u64) -> Self {
        Self {
            window_ms,
            min_gap_ms,
            releases: Vec::new(),
        }
    }

    pub fn set_timing(&mut self, window_ms: u64, min_gap_ms: u64) {
        self.window_ms = window_ms;
        self.min_gap_ms = min_gap_ms;
    }

    /// Record a pinch release.
    pub fn record_release(&mut self, t_ms: u64) {
        trace!("release recorded at {}ms", t_ms);
        self.releases.push(t_ms);
    }

    /// Classify pending releases at `now_ms`. Call only while idle.
    ///
    /// Releases closer than the minimum gap collapse into the earlier one.
    /// Two releases inside the window make a double click; a single
    /// release older than the window makes a click.
    pub fn evaluate(&mut self, now_ms: u64) -> Option<ClickOutcome> {
        while let &[.., prev, last] = self.releases.as_slice() {
            if last.saturating_sub(prev) > self.min_gap_ms {
                break;
            }
            debug!("release at {}ms within {}ms of previous, merged", last, self.min_gap_ms);
            self.releases.pop();
        }

        match *self.releases.as_slice() {
            [.., prev, last] if last.saturating_sub(prev) < self.window_ms => {
                self.releases.clear();
                Some(ClickOutcome::DoubleClick)
            }
            [only] if now_ms.saturating_sub(only) > self.window_ms => {
                self.releases.clear();
                Some(ClickOutcome::Click)
            }
            _ => None,
        }
    }

    /// Drop releases older than the window.
    pub fn prune(&mut self, now_ms: u64) {
        let window = self.window_ms;
        let before = self.releases.len();
        self.releases.retain(|&t| now_ms.saturating_sub(t) <= window);
        if self.releases.len() < before {
            debug!(
                "{} release(s) expired unclassified",
                before - self.releases.len()
            );
        }
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Oldest pending release, if any.
    pub fn oldest(&self) -> Option<u64> {
        self.releases.first().copied()
    }

    pub fn clear(&mut self) {
        self.releases.clear();
    }
}
