//! Recorded-session hand tracking provider.
//!
//! Plays back hand detections from a session file, one s-expression per
//! line. Lines starting with `;` are comments.
//!
//! ```text
//! (:t 0)                                                   ; no hand
//! (:t 33 :hand :right :cursor (0.40 0.30) :pinch nil)      ; synthetic hand
//! (:t 66 :hand :right :score 0.8 :landmarks ((x y z) ...)) ; 21 explicit points
//! (:t 99 :hands ((:hand :left :cursor (0.2 0.2)) (:hand :right :cursor (0.5 0.5))))
//! ```

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use lexpr::Value;
use tracing::{debug, info};

use super::hand_tracking::{
    DetectedHand, Hand, HandLandmark, HandTrackingProvider, TrackingFrame, LANDMARK_COUNT,
};
use crate::error::TrackingError;
use crate::sexp::{get_bool, get_float, get_int, get_keyword, get_value, list_items, number_list};

/// Thumb-to-index gap of a synthetic pinching hand.
const SYNTHETIC_PINCH_GAP: f32 = 0.01;
/// Thumb-to-index gap of a synthetic open hand.
const SYNTHETIC_OPEN_GAP: f32 = 0.12;
/// Score given to synthetic hands without an explicit `:score`.
const DEFAULT_SCORE: f32 = 0.95;

enum ReplaySource {
    File(PathBuf),
    Frames(Vec<TrackingFrame>),
}

/// Provider that replays a recorded session.
pub struct ReplayProvider {
    source: Option<ReplaySource>,
    label: String,
    frames: VecDeque<TrackingFrame>,
    delivered: u64,
}

impl ReplayProvider {
    /// Replay the session file at `path`. The file is read by `initialize`.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            label: format!("replay:{}", path.display()),
            source: Some(ReplaySource::File(path)),
            frames: VecDeque::new(),
            delivered: 0,
        }
    }

    /// Replay frames already in memory.
    pub fn from_frames(frames: Vec<TrackingFrame>) -> Self {
        Self {
            label: "replay:memory".to_string(),
            source: Some(ReplaySource::Frames(frames)),
            frames: VecDeque::new(),
            delivered: 0,
        }
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Frames delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl HandTrackingProvider for ReplayProvider {
    fn name(&self) -> &str {
        &self.label
    }

    fn initialize(&mut self) -> Result<(), TrackingError> {
        let frames = match self.source.take() {
            Some(ReplaySource::File(path)) => {
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        TrackingError::Unavailable(format!(
                            "session file {} not found",
                            path.display()
                        ))
                    } else {
                        TrackingError::Io { path: path.clone(), source: e }
                    }
                })?;
                parse_session(&text)?
            }
            Some(ReplaySource::Frames(frames)) => frames,
            None => {
                return Err(TrackingError::Unavailable(
                    "replay provider already initialized".to_string(),
                ))
            }
        };
        if frames.is_empty() {
            return Err(TrackingError::Unavailable(format!(
                "{} contains no frames",
                self.label
            )));
        }
        info!("{}: loaded {} frame(s)", self.label, frames.len());
        self.frames = frames.into();
        Ok(())
    }

    fn detect(&mut self) -> Option<TrackingFrame> {
        let frame = self.frames.pop_front()?;
        self.delivered += 1;
        Some(frame)
    }
}

// ── Parsing ────────────────────────────────────────────────

/// Parse a whole session file. Timestamps must not go backwards.
pub fn parse_session(text: &str) -> Result<Vec<TrackingFrame>, TrackingError> {
    let mut frames: Vec<TrackingFrame> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        let line_no = i + 1;
        let malformed = |reason: String| TrackingError::Malformed {
            line: line_no,
            reason,
        };
        let value = lexpr::from_str(line).map_err(|e| malformed(e.to_string()))?;
        let frame = parse_frame(&value).map_err(malformed)?;
        if let Some(prev) = frames.last() {
            if frame.timestamp_ms < prev.timestamp_ms {
                return Err(malformed(format!(
                    "timestamp {} precedes {}",
                    frame.timestamp_ms, prev.timestamp_ms
                )));
            }
        }
        frames.push(frame);
    }
    debug!("parsed {} session frame(s)", frames.len());
    Ok(frames)
}

/// Parse one frame plist.
pub fn parse_frame(value: &Value) -> Result<TrackingFrame, String> {
    let timestamp_ms = match get_int(value, "t") {
        Some(t) if t >= 0 => t as u64,
        Some(t) => return Err(format!("negative timestamp {}", t)),
        None => return Err("missing :t".to_string()),
    };

    let mut hands = Vec::new();
    if let Some(list) = get_value(value, "hands") {
        for entry in list_items(list) {
            hands.push(parse_hand(entry)?);
        }
    } else if get_value(value, "hand").is_some() {
        hands.push(parse_hand(value)?);
    }

    Ok(TrackingFrame { timestamp_ms, hands })
}

fn parse_hand(value: &Value) -> Result<DetectedHand, String> {
    let label = get_keyword(value, "hand").ok_or("missing :hand")?;
    let handedness = Hand::parse(&label).ok_or_else(|| format!("unknown hand {:?}", label))?;
    let score = get_float(value, "score").map_or(DEFAULT_SCORE, |s| s as f32);

    let landmarks = if let Some(points) = get_value(value, "landmarks") {
        parse_landmarks(points)?
    } else if let Some(cursor) = get_value(value, "cursor") {
        let xy = number_list(cursor).ok_or("non-numeric :cursor")?;
        if xy.len() != 2 {
            return Err(format!(":cursor needs 2 numbers, got {}", xy.len()));
        }
        let pinch = get_bool(value, "pinch").unwrap_or(false);
        synthetic_landmarks(xy[0] as f32, xy[1] as f32, pinch)
    } else {
        return Err("hand needs :cursor or :landmarks".to_string());
    };

    Ok(DetectedHand {
        handedness,
        score,
        landmarks,
    })
}

fn parse_landmarks(value: &Value) -> Result<Vec<[f32; 3]>, String> {
    let points = list_items(value);
    if points.len() != LANDMARK_COUNT {
        return Err(format!(
            ":landmarks needs {} points, got {}",
            LANDMARK_COUNT,
            points.len()
        ));
    }
    points
        .into_iter()
        .enumerate()
        .map(|(i, p)| match number_list(p).as_deref() {
            Some([x, y, z]) => Ok([*x as f32, *y as f32, *z as f32]),
            Some([x, y]) => Ok([*x as f32, *y as f32, 0.0]),
            _ => Err(format!("landmark {} is not (x y z)", i)),
        })
        .collect()
}

/// A plausible upright hand whose index fingertip sits at `(x, y)`.
///
/// The thumb tip is placed inside the pinch threshold when `pinch` is set
/// and well outside it otherwise.
pub fn synthetic_landmarks(x: f32, y: f32, pinch: bool) -> Vec<[f32; 3]> {
    let mut landmarks = vec![[0.0f32; 3]; LANDMARK_COUNT];
    let wrist = [x, y + 0.25, 0.0];
    landmarks[HandLandmark::Wrist.index()] = wrist;

    // Fingers fan out from the wrist; each column is base..tip.
    let fingers: [([HandLandmark; 4], f32); 4] = [
        (
            [
                HandLandmark::IndexMcp,
                HandLandmark::IndexPip,
                HandLandmark::IndexDip,
                HandLandmark::IndexTip,
            ],
            0.0,
        ),
        (
            [
                HandLandmark::MiddleMcp,
                HandLandmark::MiddlePip,
                HandLandmark::MiddleDip,
                HandLandmark::MiddleTip,
            ],
            -0.03,
        ),
        (
            [
                HandLandmark::RingMcp,
                HandLandmark::RingPip,
                HandLandmark::RingDip,
                HandLandmark::RingTip,
            ],
            -0.06,
        ),
        (
            [
                HandLandmark::PinkyMcp,
                HandLandmark::PinkyPip,
                HandLandmark::PinkyDip,
                HandLandmark::PinkyTip,
            ],
            -0.09,
        ),
    ];
    for (joints, dx) in fingers {
        for (k, joint) in joints.iter().enumerate() {
            let t = (k + 1) as f32 / 4.0;
            landmarks[joint.index()] = [x + dx, wrist[1] - 0.25 * t, 0.0];
        }
    }

    let gap = if pinch {
        SYNTHETIC_PINCH_GAP
    } else {
        SYNTHETIC_OPEN_GAP
    };
    let thumb_tip = [x + gap, y, 0.0];
    let thumb = [
        HandLandmark::ThumbCmc,
        HandLandmark::ThumbMcp,
        HandLandmark::ThumbIp,
    ];
    for (k, joint) in thumb.iter().enumerate() {
        let t = (k + 1) as f32 / 4.0;
        landmarks[joint.index()] = [
            wrist[0] + (thumb_tip[0] - wrist[0]) * t,
            wrist[1] + (thumb_tip[1] - wrist[1]) * t,
            0.0,
        ];
    }
    landmarks[HandLandmark::ThumbTip.index()] = thumb_tip;
    landmarks
}
