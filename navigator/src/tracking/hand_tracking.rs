//! Hand landmark data structures and tracked-hand selection.
//!
//! Models the 21 landmarks per hand reported by camera-based hand
//! trackers (wrist, four joints per finger). Coordinates are normalized
//! to [0,1] per axis, `z` is relative depth.

use tracing::{debug, trace};

use crate::error::TrackingError;
use crate::sexp::bool_sexp;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks, in provider order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }
}

// ── Hand enum ──────────────────────────────────────────────

/// Handedness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse "left"/"right", case-insensitive.
    pub fn parse(s: &str) -> Option<Hand> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Hand::Left),
            "right" => Some(Hand::Right),
            _ => None,
        }
    }
}

// ── Detected hand ──────────────────────────────────────────

/// One hand reported by the provider for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedHand {
    /// Handedness label.
    pub handedness: Hand,
    /// Handedness confidence (0.0-1.0).
    pub score: f32,
    /// Landmark positions indexed by `HandLandmark`.
    pub landmarks: Vec<[f32; 3]>,
}

impl DetectedHand {
    /// Position of a landmark, or None when the landmark set is short.
    pub fn landmark(&self, lm: HandLandmark) -> Option<[f32; 3]> {
        self.landmarks.get(lm.index()).copied()
    }

    /// 3-D distance between two landmarks.
    pub fn landmark_distance(&self, a: HandLandmark, b: HandLandmark) -> Option<f32> {
        Some(landmark_distance(&self.landmark(a)?, &self.landmark(b)?))
    }
}

/// Everything the provider reports for one video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingFrame {
    /// Frame time in milliseconds since session start.
    pub timestamp_ms: u64,
    /// Detected hands, possibly empty.
    pub hands: Vec<DetectedHand>,
}

impl TrackingFrame {
    /// A frame with no hands in view.
    pub fn empty(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            hands: Vec::new(),
        }
    }
}

// ── Provider seam ──────────────────────────────────────────

/// Source of per-frame hand detections.
pub trait HandTrackingProvider {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Prepare the provider. Called once before the first `detect`.
    fn initialize(&mut self) -> Result<(), TrackingError>;

    /// Detections for the next frame, or None when the stream has ended.
    fn detect(&mut self) -> Option<TrackingFrame>;
}

// ── Config ─────────────────────────────────────────────────

/// Configuration for tracked-hand selection.
#[derive(Debug, Clone)]
pub struct HandTrackingConfig {
    /// Enable hand tracking processing.
    pub enabled: bool,
    /// The only hand that drives the cursor; others are ignored.
    pub tracked_hand: Hand,
    /// Minimum handedness confidence (0.0-1.0) to accept a detection.
    pub min_confidence: f32,
}

impl Default for HandTrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tracked_hand: Hand::Right,
            min_confidence: 0.5,
        }
    }
}

impl HandTrackingConfig {
    /// The qualifying hand in `frame`, if any.
    ///
    /// A hand qualifies when it carries the tracked handedness label,
    /// meets the confidence floor and has a full landmark set. The
    /// highest-scoring qualifying hand wins.
    pub fn select<'a>(&self, frame: &'a TrackingFrame) -> Option<&'a DetectedHand> {
        if !self.enabled {
            return None;
        }
        let mut best: Option<&DetectedHand> = None;
        for hand in &frame.hands {
            if hand.handedness != self.tracked_hand {
                trace!("ignoring {} hand", hand.handedness.as_str());
                continue;
            }
            if hand.score < self.min_confidence {
                debug!(
                    "ignoring {} hand: score {:.2} below {:.2}",
                    hand.handedness.as_str(),
                    hand.score,
                    self.min_confidence
                );
                continue;
            }
            if hand.landmarks.len() != LANDMARK_COUNT {
                debug!(
                    "ignoring {} hand: {} landmarks",
                    hand.handedness.as_str(),
                    hand.landmarks.len()
                );
                continue;
            }
            if best.map_or(true, |b| hand.score > b.score) {
                best = Some(hand);
            }
        }
        best
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:enabled {} :tracked-hand :{} :min-confidence {:.2})",
            bool_sexp(self.enabled),
            self.tracked_hand.as_str(),
            self.min_confidence,
        )
    }
}

/// Euclidean distance between two 3D points.
pub fn landmark_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

// ── Test helpers ───────────────────────────────────────────

/// A full hand with every landmark at `(x, y, 0)` except the index tip
/// at `index_tip` and the thumb tip offset from it by `thumb_gap`.
#[cfg(test)]
pub(crate) fn make_hand(hand: Hand, index_tip: [f32; 2], thumb_gap: f32) -> DetectedHand {
    let mut landmarks = vec![[0.5, 0.8, 0.0]; LANDMARK_COUNT];
    landmarks[HandLandmark::IndexTip.index()] = [index_tip[0], index_tip[1], 0.0];
    landmarks[HandLandmark::ThumbTip.index()] = [index_tip[0] + thumb_gap, index_tip[1], 0.0];
    DetectedHand {
        handedness: hand,
        score: 0.9,
        landmarks,
    }
}

// ── Tests ──────────────────────────────────────────────────
