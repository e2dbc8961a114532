//! Pinch gesture recognition: one authoritative state machine turning
//! per-frame hand detections into click, double-click and drag pulses.
//!
//! `GestureRecognizer::step` runs once per frame and returns exactly one
//! `GestureResult`. The drag mode is fixed when a drag starts and the
//! `DragContext` moves into the `DragEnd` result.

pub mod click;
pub mod cursor;
pub mod drag;
pub mod pinch;

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::sexp::{bool_sexp, format_event, string_list};
use crate::tracking::{HandTrackingConfig, TrackingFrame};

pub use click::{ClickOutcome, ClickTimestampBuffer};
pub use cursor::{CursorMapper, CursorPosition};
pub use drag::{classify_drag, DragContext, DragMode, HitTest, ItemId};
pub use pinch::{PinchDetector, PinchEdge};

// ── State ──────────────────────────────────────────────────

/// Interaction state. `Click`, `DoubleClick` and `DragEnd` are one-frame
/// pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureState {
    Idle,
    Click,
    DoubleClick,
    DragStart,
    Dragging,
    DragEnd,
}

impl GestureState {
    /// String representation for status and event output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Click => "click",
            Self::DoubleClick => "double-click",
            Self::DragStart => "drag-start",
            Self::Dragging => "dragging",
            Self::DragEnd => "drag-end",
        }
    }

    /// Whether this state lasts exactly one frame.
    pub fn is_pulse(&self) -> bool {
        matches!(self, Self::Click | Self::DoubleClick | Self::DragEnd)
    }

    /// Whether a drag context is live in this state.
    pub fn in_drag(&self) -> bool {
        matches!(self, Self::DragStart | Self::Dragging)
    }
}

// ── Config ─────────────────────────────────────────────────

/// Configuration for gesture recognition thresholds.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Enable gesture recognition.
    pub enabled: bool,
    /// Maximum thumb-index distance (normalized units) for a pinch.
    pub pinch_threshold: f32,
    /// Window (ms) in which a second release makes a double click.
    pub double_click_window_ms: u64,
    /// Releases closer than this (ms) are sensor jitter.
    pub min_click_gap_ms: u64,
    /// Cursor travel (px) that promotes a drag start to dragging.
    pub drag_threshold_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pinch_threshold: 0.05,
            double_click_window_ms: 400,
            min_click_gap_ms: 50,
            drag_threshold_px: 15.0,
        }
    }
}

// ── Result ─────────────────────────────────────────────────

/// The one value produced per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureResult {
    /// Monotonic frame sequence number, starting at 1.
    pub frame: u64,
    pub cursor: CursorPosition,
    pub click_state: GestureState,
    /// Whether `click_state` was entered this frame.
    pub changed: bool,
    pub drag_start: Option<CursorPosition>,
    pub drag_mode: Option<DragMode>,
    /// Drag snapshot on `DragStart`; the consumed context on `DragEnd`.
    pub drag: Option<DragContext>,
    pub timestamp_ms: u64,
}

impl GestureResult {
    /// Event s-expression for a frame that entered a non-idle state.
    pub fn event_sexp(&self) -> Option<String> {
        if !self.changed || self.click_state == GestureState::Idle {
            return None;
        }
        let frame = self.frame.to_string();
        let t = self.timestamp_ms.to_string();
        let x = format!("{:.1}", self.cursor.x);
        let y = format!("{:.1}", self.cursor.y);
        let mode = self
            .drag_mode
            .map(|m| format!(":{}", m.as_str()))
            .unwrap_or_else(|| "nil".to_string());
        let items = self
            .drag
            .as_ref()
            .map(|d| string_list(d.moved_items.iter().map(String::as_str)))
            .unwrap_or_else(|| "nil".to_string());
        Some(format_event(
            self.click_state.as_str(),
            &[
                ("frame", &frame),
                ("t", &t),
                ("x", &x),
                ("y", &y),
                ("mode", &mode),
                ("items", &items),
            ],
        ))
    }
}

// ── Recognizer ─────────────────────────────────────────────

/// Running totals for status output.
#[derive(Debug, Clone, Default)]
pub struct GestureStats {
    pub clicks: u64,
    pub double_clicks: u64,
    pub drags: u64,
    pub hidden_frames: u64,
}

/// Central gesture recognition state for one tracking session.
pub struct GestureRecognizer {
    /// Configuration.
    pub config: GestureConfig,
    /// Tracked-hand selection.
    pub tracking: HandTrackingConfig,
    state: GestureState,
    cursor: CursorMapper,
    pinch: PinchDetector,
    clicks: ClickTimestampBuffer,
    drag: Option<DragContext>,
    /// Cursor at the rising edge of the current pinch.
    press_at: Option<CursorPosition>,
    frame: u64,
    stats: GestureStats,
}

impl GestureRecognizer {
    /// Create a recognizer for a screen of the given size.
    pub fn new(
        config: GestureConfig,
        tracking: HandTrackingConfig,
        screen_width: f32,
        screen_height: f32,
    ) -> Self {
        Self {
            pinch: PinchDetector::new(config.pinch_threshold),
            clicks: ClickTimestampBuffer::new(
                config.double_click_window_ms,
                config.min_click_gap_ms,
            ),
            cursor: CursorMapper::new(screen_width, screen_height),
            config,
            tracking,
            state: GestureState::Idle,
            drag: None,
            press_at: None,
            frame: 0,
            stats: GestureStats::default(),
        }
    }

    /// Re-apply `config` thresholds to the detectors.
    pub fn apply_config(&mut self) {
        self.pinch.set_threshold(self.config.pinch_threshold);
        self.clicks.set_timing(
            self.config.double_click_window_ms,
            self.config.min_click_gap_ms,
        );
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn drag(&self) -> Option<&DragContext> {
        self.drag.as_ref()
    }

    pub fn stats(&self) -> &GestureStats {
        &self.stats
    }

    /// Advance one frame.
    ///
    /// `hit` and `selection` are consulted only at the instant a drag
    /// starts, to classify it.
    pub fn step(
        &mut self,
        frame: &TrackingFrame,
        hit: &dyn HitTest,
        selection: &BTreeSet<ItemId>,
    ) -> GestureResult {
        self.frame += 1;
        let now = frame.timestamp_ms;
        let previous = self.state;

        if !self.config.enabled {
            self.reset();
            return self.result(self.cursor.last(), now, previous);
        }

        let hand = self.tracking.select(frame);
        let cursor = self.cursor.map(hand);

        if !cursor.is_visible {
            // Drags survive lost tracking; pulses still decay.
            self.stats.hidden_frames += 1;
            if previous.is_pulse() {
                self.state = GestureState::Idle;
            }
            self.clicks.prune(now);
            trace!("frame {}: no tracked hand", self.frame);
            return self.result(cursor, now, previous);
        }

        let edge = self.pinch.update(hand);
        match edge {
            PinchEdge::Rising => self.press_at = Some(cursor),
            PinchEdge::Falling => {
                self.press_at = None;
                self.clicks.record_release(now);
            }
            PinchEdge::Open => self.press_at = None,
            PinchEdge::Held => {}
        }

        self.state = match previous {
            GestureState::Click | GestureState::DoubleClick | GestureState::DragEnd => {
                GestureState::Idle
            }
            GestureState::Idle => {
                match self.clicks.evaluate(now) {
                    Some(ClickOutcome::Click) => {
                        self.stats.clicks += 1;
                        GestureState::Click
                    }
                    Some(ClickOutcome::DoubleClick) => {
                        self.stats.double_clicks += 1;
                        GestureState::DoubleClick
                    }
                    None if self.pinch.is_held() => {
                        // The pinch may have begun on a pulse or click frame.
                        let start = self.press_at.take().unwrap_or(cursor);
                        self.drag = Some(classify_drag(start, hit, selection));
                        self.stats.drags += 1;
                        GestureState::DragStart
                    }
                    None => GestureState::Idle,
                }
            }
            GestureState::DragStart => {
                if edge == PinchEdge::Falling {
                    GestureState::DragEnd
                } else if self.drag_travel(&cursor) > self.config.drag_threshold_px {
                    GestureState::Dragging
                } else {
                    GestureState::DragStart
                }
            }
            GestureState::Dragging => {
                if edge == PinchEdge::Falling {
                    GestureState::DragEnd
                } else {
                    GestureState::Dragging
                }
            }
        };

        self.clicks.prune(now);
        self.result(cursor, now, previous)
    }

    /// Pixel distance from the drag start to `cursor`.
    fn drag_travel(&self, cursor: &CursorPosition) -> f32 {
        self.drag
            .as_ref()
            .map_or(0.0, |d| d.start_position.distance_to(cursor))
    }

    fn result(
        &mut self,
        cursor: CursorPosition,
        timestamp_ms: u64,
        previous: GestureState,
    ) -> GestureResult {
        let changed = self.state != previous;
        if changed {
            debug!(
                "gesture {} -> {} at {}ms ({:.0}, {:.0})",
                previous.as_str(),
                self.state.as_str(),
                timestamp_ms,
                cursor.x,
                cursor.y
            );
        }
        let drag = match self.state {
            GestureState::DragEnd => self.drag.take(),
            GestureState::DragStart if changed => self.drag.clone(),
            _ => None,
        };
        let context = drag.as_ref().or(self.drag.as_ref());
        GestureResult {
            frame: self.frame,
            cursor,
            click_state: self.state,
            changed,
            drag_start: context.map(|d| d.start_position),
            drag_mode: context.map(|d| d.mode),
            drag,
            timestamp_ms,
        }
    }

    /// Return to Idle and forget all per-session history.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.pinch.reset();
        self.clicks.clear();
        self.cursor.reset();
        self.drag = None;
        self.press_at = None;
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:enabled {} :state :{} :frame {} :pinch {} :pending-releases {} :drag-mode {} :clicks {} :double-clicks {} :drags {} :hidden-frames {})",
            bool_sexp(self.config.enabled),
            self.state.as_str(),
            self.frame,
            bool_sexp(self.pinch.is_held()),
            self.clicks.len(),
            self.drag
                .as_ref()
                .map(|d| format!(":{}", d.mode.as_str()))
                .unwrap_or_else(|| "nil".to_string()),
            self.stats.clicks,
            self.stats.double_clicks,
            self.stats.drags,
            self.stats.hidden_frames,
        )
    }

    /// Generate s-expression for config output.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:enabled {} :pinch-threshold {:.3} :double-click-ms {} :min-click-gap-ms {} :drag-threshold-px {:.1} :tracking {})",
            bool_sexp(self.config.enabled),
            self.config.pinch_threshold,
            self.config.double_click_window_ms,
            self.config.min_click_gap_ms,
            self.config.drag_threshold_px,
            self.tracking.status_sexp(),
        )
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Screen used by the recognizer tests: 1000x1000 so normalized 0.001
/// is one pixel (mirrored on x).
#[cfg(test)]
fn make_recognizer() -> GestureRecognizer {
    GestureRecognizer::new(
        GestureConfig::default(),
        HandTrackingConfig::default(),
        1000.0,
        1000.0,
    )
}

/// A frame with the right hand's index tip at screen pixel `(px, py)`.
#[cfg(test)]
fn hand_frame(t: u64, px: f32, py: f32, pinch: bool) -> TrackingFrame {
    use crate::tracking::hand_tracking::make_hand;
    use crate::tracking::Hand;

    let gap = if pinch { 0.01 } else { 0.2 };
    TrackingFrame {
        timestamp_ms: t,
        hands: vec![make_hand(
            Hand::Right,
            [1.0 - px / 1000.0, py / 1000.0],
            gap,
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::drag::test_support::FixedHits;
    use super::*;

    /// Feed frames every 20ms and collect the states entered.
    fn run(
        rec: &mut GestureRecognizer,
        hits: &FixedHits,
        frames: &[TrackingFrame],
    ) -> Vec<GestureResult> {
        let selection = BTreeSet::new();
        frames.iter().map(|f| rec.step(f, hits, &selection)).collect()
    }

    fn entered(results: &[GestureResult]) -> Vec<GestureState> {
        results
            .iter()
            .filter(|r| r.changed)
            .map(|r| r.click_state)
            .collect()
    }

    /// A tap at (x, y): pinch at `t`, release at `t + hold`.
    fn tap(t: u64, hold: u64, x: f32, y: f32) -> Vec<TrackingFrame> {
        let mut frames = vec![hand_frame(t, x, y, true)];
        let mut s = t + 20;
        while s < t + hold {
            frames.push(hand_frame(s, x, y, true));
            s += 20;
        }
        frames.push(hand_frame(t + hold, x, y, false));
        frames
    }

    fn idle_until(from: u64, to: u64, x: f32, y: f32) -> Vec<TrackingFrame> {
        (from..to)
            .step_by(20)
            .map(|t| hand_frame(t, x, y, false))
            .collect()
    }

    fn count(states: &[GestureState], s: GestureState) -> usize {
        states.iter().filter(|&&x| x == s).count()
    }

    #[test]
    fn test_starts_idle() {
        let rec = make_recognizer();
        assert_eq!(rec.state(), GestureState::Idle);
        assert!(rec.drag().is_none());
    }

    #[test]
    fn test_separated_releases_each_click_once() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let mut frames = idle_until(0, 100, 500.0, 500.0);
        frames.extend(tap(100, 60, 500.0, 500.0));
        frames.extend(idle_until(180, 700, 500.0, 500.0));
        frames.extend(tap(700, 60, 500.0, 500.0));
        frames.extend(idle_until(780, 1400, 500.0, 500.0));
        let states = entered(&run(&mut rec, &hits, &frames));
        assert_eq!(count(&states, GestureState::Click), 2, "got {:?}", states);
        assert_eq!(count(&states, GestureState::DoubleClick), 0);
    }

    #[test]
    fn test_two_quick_releases_double_click() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let mut frames = idle_until(0, 100, 500.0, 500.0);
        frames.extend(tap(100, 60, 500.0, 500.0));
        frames.extend(idle_until(180, 260, 500.0, 500.0));
        frames.extend(tap(260, 60, 500.0, 500.0));
        frames.extend(idle_until(340, 1200, 500.0, 500.0));
        let states = entered(&run(&mut rec, &hits, &frames));
        assert_eq!(count(&states, GestureState::DoubleClick), 1, "got {:?}", states);
        assert_eq!(count(&states, GestureState::Click), 0, "got {:?}", states);
    }

    #[test]
    fn test_jitter_release_is_single_click() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let mut frames = idle_until(0, 100, 500.0, 500.0);
        frames.extend(tap(100, 40, 500.0, 500.0));
        // Re-pinch for one frame and release 30ms after the first release.
        frames.push(hand_frame(150, 500.0, 500.0, true));
        frames.push(hand_frame(170, 500.0, 500.0, false));
        frames.extend(idle_until(190, 1000, 500.0, 500.0));
        let states = entered(&run(&mut rec, &hits, &frames));
        assert_eq!(count(&states, GestureState::DoubleClick), 0, "got {:?}", states);
        assert_eq!(count(&states, GestureState::Click), 1, "got {:?}", states);
    }

    #[test]
    fn test_click_lags_by_window() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let mut frames = tap(0, 40, 500.0, 500.0);
        frames.extend(idle_until(60, 1000, 500.0, 500.0));
        let results = run(&mut rec, &hits, &frames);
        let click = results
            .iter()
            .find(|r| r.click_state == GestureState::Click)
            .unwrap();
        assert!(click.timestamp_ms > 440, "click at {}", click.timestamp_ms);
        assert!(click.timestamp_ms <= 460, "click at {}", click.timestamp_ms);
    }

    #[test]
    fn test_small_move_skips_dragging() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let frames = vec![
            hand_frame(0, 500.0, 500.0, false),
            hand_frame(20, 500.0, 500.0, true),
            hand_frame(40, 510.0, 505.0, true),
            hand_frame(60, 509.0, 509.0, true),
            hand_frame(80, 509.0, 509.0, false),
            hand_frame(100, 509.0, 509.0, false),
        ];
        let states = entered(&run(&mut rec, &hits, &frames));
        assert_eq!(
            states,
            vec![GestureState::DragStart, GestureState::DragEnd, GestureState::Idle]
        );
    }

    #[test]
    fn test_large_move_visits_dragging() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let frames = vec![
            hand_frame(0, 500.0, 500.0, true),
            hand_frame(20, 510.0, 500.0, true),
            hand_frame(40, 520.0, 500.0, true),
            hand_frame(60, 540.0, 500.0, true),
            hand_frame(80, 540.0, 500.0, false),
            hand_frame(100, 540.0, 500.0, false),
        ];
        let results = run(&mut rec, &hits, &frames);
        let states = entered(&results);
        assert_eq!(
            states,
            vec![
                GestureState::DragStart,
                GestureState::Dragging,
                GestureState::DragEnd,
                GestureState::Idle
            ]
        );
        // Dragging began on the first frame past 15px.
        assert_eq!(results[2].click_state, GestureState::Dragging);
        assert_eq!(results[1].click_state, GestureState::DragStart);
    }

    #[test]
    fn test_drag_release_clicks_after_window() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let mut frames = vec![
            hand_frame(0, 500.0, 500.0, true),
            hand_frame(20, 600.0, 600.0, true),
            hand_frame(40, 600.0, 600.0, false),
        ];
        frames.extend(idle_until(60, 1000, 600.0, 600.0));
        let results = run(&mut rec, &hits, &frames);
        let states = entered(&results);
        assert_eq!(
            states,
            vec![
                GestureState::DragStart,
                GestureState::Dragging,
                GestureState::DragEnd,
                GestureState::Idle,
                GestureState::Click,
                GestureState::Idle
            ],
            "Expected the drop release to click once, got {:?}",
            states
        );
        let click = results
            .iter()
            .find(|r| r.click_state == GestureState::Click)
            .unwrap();
        assert!(click.timestamp_ms > 440, "click at {}", click.timestamp_ms);
        assert_eq!((click.cursor.x.round(), click.cursor.y.round()), (600.0, 600.0));
    }

    #[test]
    fn test_quick_drags_make_double_click() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let mut frames = vec![
            hand_frame(0, 500.0, 500.0, true),
            hand_frame(20, 560.0, 500.0, true),
            hand_frame(40, 560.0, 500.0, false),
        ];
        frames.extend(idle_until(60, 200, 560.0, 500.0));
        frames.push(hand_frame(200, 560.0, 500.0, true));
        frames.push(hand_frame(220, 620.0, 500.0, true));
        frames.push(hand_frame(240, 620.0, 500.0, false));
        frames.extend(idle_until(260, 1000, 620.0, 500.0));
        let states = entered(&run(&mut rec, &hits, &frames));
        assert_eq!(count(&states, GestureState::DoubleClick), 1, "got {:?}", states);
        assert_eq!(count(&states, GestureState::Click), 0, "got {:?}", states);
    }

    #[test]
    fn test_pinch_during_pulse_starts_drag_where_it_began() {
        let mut rec = make_recognizer();
        let hits = FixedHits {
            items: vec![(80.0, 80.0, 120.0, 120.0, "a.txt")],
            clipboard: Vec::new(),
        };
        let frames = vec![
            hand_frame(0, 500.0, 500.0, true),
            hand_frame(20, 500.0, 500.0, false),
            // Rising edge on the DragEnd -> Idle frame.
            hand_frame(40, 100.0, 100.0, true),
            hand_frame(60, 300.0, 300.0, true),
        ];
        let results = run(&mut rec, &hits, &frames);
        assert_eq!(results[1].click_state, GestureState::DragEnd);
        assert_eq!(results[2].click_state, GestureState::Idle);
        let start = &results[3];
        assert_eq!(start.click_state, GestureState::DragStart);
        assert_eq!(start.drag_mode, Some(DragMode::ItemMove), "got {:?}", start);
        let origin = start.drag_start.unwrap();
        assert!(
            (origin.x - 100.0).abs() < 0.5 && (origin.y - 100.0).abs() < 0.5,
            "Expected drag to start at the rising edge, got {:?}",
            origin
        );
        let ctx = start.drag.as_ref().unwrap();
        assert!(ctx.moved_items.contains("a.txt"));
    }

    #[test]
    fn test_drag_mode_fixed_for_whole_drag() {
        let mut rec = make_recognizer();
        let hits = FixedHits {
            items: vec![(450.0, 450.0, 550.0, 550.0, "patient-001.json")],
            clipboard: vec![(700.0, 450.0, 900.0, 550.0, "cpu-v2.cad")],
        };
        let frames = vec![
            hand_frame(0, 500.0, 500.0, true),
            hand_frame(20, 600.0, 500.0, true),
            hand_frame(40, 800.0, 500.0, true),
            hand_frame(60, 800.0, 500.0, false),
        ];
        let results = run(&mut rec, &hits, &frames);
        for r in &results {
            assert_eq!(r.drag_mode, Some(DragMode::ItemMove), "frame {:?}", r);
        }
        let end = &results[3];
        assert_eq!(end.click_state, GestureState::DragEnd);
        let ctx = end.drag.as_ref().unwrap();
        assert!(ctx.moved_items.contains("patient-001.json"));
        assert!(rec.drag().is_none(), "context moved into the result");
    }

    #[test]
    fn test_drag_mode_absent_outside_drag() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let frames = vec![
            hand_frame(0, 500.0, 500.0, false),
            hand_frame(20, 500.0, 500.0, true),
            hand_frame(40, 500.0, 500.0, false),
            hand_frame(60, 500.0, 500.0, false),
        ];
        let results = run(&mut rec, &hits, &frames);
        assert_eq!(results[0].drag_mode, None);
        assert_eq!(results[1].drag_mode, Some(DragMode::AreaSelection));
        assert_eq!(results[2].drag_mode, Some(DragMode::AreaSelection));
        assert_eq!(results[3].drag_mode, None);
    }

    #[test]
    fn test_lost_hand_preserves_drag() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let frames = vec![
            hand_frame(0, 500.0, 500.0, true),
            hand_frame(20, 560.0, 500.0, true),
            TrackingFrame::empty(40),
            TrackingFrame::empty(60),
            hand_frame(80, 580.0, 500.0, true),
            hand_frame(100, 580.0, 500.0, false),
        ];
        let results = run(&mut rec, &hits, &frames);
        assert_eq!(results[2].click_state, GestureState::Dragging);
        assert!(!results[2].cursor.is_visible);
        assert_eq!(results[3].click_state, GestureState::Dragging);
        assert_eq!(results[4].click_state, GestureState::Dragging);
        assert_eq!(results[5].click_state, GestureState::DragEnd);
    }

    #[test]
    fn test_pulse_decays_while_hidden() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let frames = vec![
            hand_frame(0, 500.0, 500.0, true),
            hand_frame(20, 500.0, 500.0, false),
            TrackingFrame::empty(40),
        ];
        let results = run(&mut rec, &hits, &frames);
        assert_eq!(results[1].click_state, GestureState::DragEnd);
        assert_eq!(results[2].click_state, GestureState::Idle);
    }

    #[test]
    fn test_pulses_last_one_frame() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let mut frames = tap(0, 40, 500.0, 500.0);
        frames.extend(idle_until(60, 1000, 500.0, 500.0));
        let results = run(&mut rec, &hits, &frames);
        for pair in results.windows(2) {
            if pair[0].click_state.is_pulse() {
                assert_eq!(pair[1].click_state, GestureState::Idle, "{:?}", pair);
            }
        }
    }

    #[test]
    fn test_other_hand_ignored() {
        use crate::tracking::hand_tracking::make_hand;
        use crate::tracking::Hand;

        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let frame = TrackingFrame {
            timestamp_ms: 0,
            hands: vec![make_hand(Hand::Left, [0.5, 0.5], 0.0)],
        };
        let r = rec.step(&frame, &hits, &BTreeSet::new());
        assert!(!r.cursor.is_visible);
        assert_eq!(r.click_state, GestureState::Idle);
    }

    #[test]
    fn test_frame_numbers_increase() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let frames = idle_until(0, 100, 500.0, 500.0);
        let results = run(&mut rec, &hits, &frames);
        let numbers: Vec<u64> = results.iter().map(|r| r.frame).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_reset() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        rec.step(&hand_frame(0, 500.0, 500.0, true), &hits, &BTreeSet::new());
        assert_eq!(rec.state(), GestureState::DragStart);
        rec.reset();
        assert_eq!(rec.state(), GestureState::Idle);
        assert!(rec.drag().is_none());
        // The pinch history is gone: an open hand is not a release.
        let r = rec.step(&hand_frame(20, 500.0, 500.0, false), &hits, &BTreeSet::new());
        assert_eq!(r.click_state, GestureState::Idle);
        assert!(rec.status_sexp().contains(":pending-releases 0"));
    }

    #[test]
    fn test_disabled_stays_idle() {
        let mut rec = make_recognizer();
        rec.config.enabled = false;
        let hits = FixedHits::default();
        let r = rec.step(&hand_frame(0, 500.0, 500.0, true), &hits, &BTreeSet::new());
        assert_eq!(r.click_state, GestureState::Idle);
    }

    #[test]
    fn test_apply_config_widens_pinch() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        rec.config.pinch_threshold = 0.3;
        rec.apply_config();
        // A 0.2 thumb gap is open by default but pinched at 0.3.
        let r = rec.step(&hand_frame(0, 500.0, 500.0, false), &hits, &BTreeSet::new());
        assert_eq!(r.click_state, GestureState::DragStart);
        assert!(rec.config_sexp().contains(":pinch-threshold 0.300"));
    }

    #[test]
    fn test_event_sexp() {
        let mut rec = make_recognizer();
        let hits = FixedHits::default();
        let r = rec.step(&hand_frame(0, 500.0, 500.0, true), &hits, &BTreeSet::new());
        let e = r.event_sexp().unwrap();
        assert!(e.starts_with("(:type :event :event :drag-start"), "{}", e);
        assert!(e.contains(":mode :area-selection"));
        let r = rec.step(&hand_frame(20, 500.0, 500.0, true), &hits, &BTreeSet::new());
        assert!(r.event_sexp().is_none(), "sustained state emits nothing");
    }

    #[test]
    fn test_status_sexp() {
        let rec = make_recognizer();
        let sexp = rec.status_sexp();
        assert!(sexp.contains(":enabled t"));
        assert!(sexp.contains(":state :idle"));
        assert!(sexp.contains(":drag-mode nil"));
    }

    #[test]
    fn test_config_sexp() {
        let rec = make_recognizer();
        let sexp = rec.config_sexp();
        assert!(sexp.contains(":pinch-threshold 0.050"));
        assert!(sexp.contains(":double-click-ms 400"));
        assert!(sexp.contains(":min-click-gap-ms 50"));
        assert!(sexp.contains(":drag-threshold-px 15.0"));
    }

    #[test]
    fn test_gesture_state_as_str() {
        assert_eq!(GestureState::Idle.as_str(), "idle");
        assert_eq!(GestureState::DoubleClick.as_str(), "double-click");
        assert_eq!(GestureState::DragStart.as_str(), "drag-start");
        assert_eq!(GestureState::DragEnd.as_str(), "drag-end");
    }
}
