//! Runtime configuration: recognizer thresholds, tracked hand and screen
//! size, loaded from an optional s-expression plist.
//!
//! ```text
//! (:pinch-threshold 0.05 :double-click-ms 400 :min-click-gap-ms 50
//!  :drag-threshold-px 15 :tracked-hand :right :min-confidence 0.5
//!  :screen-width 1920 :screen-height 1080)
//! ```
//!
//! Keys absent from the file keep their defaults. CLI flags are applied
//! on top by the caller.

use std::path::Path;

use anyhow::{bail, Context};
use lexpr::Value;
use tracing::{debug, warn};

use crate::gesture::GestureConfig;
use crate::sexp::{get_bool, get_float, get_int, get_string};
use crate::tracking::{Hand, HandTrackingConfig};

/// Screen the cursor is projected onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl ScreenConfig {
    /// Parse a "WxH" resolution string. Returns None unless both sides are
    /// positive integers.
    pub fn parse_resolution(s: &str) -> Option<Self> {
        let (w, h) = s.split_once('x')?;
        let width = w.trim().parse::<u32>().ok()?;
        let height = h.trim().parse::<u32>().ok()?;
        if width > 0 && height > 0 {
            Some(Self { width, height })
        } else {
            None
        }
    }
}

/// Everything a session needs to build its recognizer and layout.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub gesture: GestureConfig,
    pub tracking: HandTrackingConfig,
    pub screen: ScreenConfig,
}

impl AppConfig {
    /// Defaults overridden by the plist in `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config = Self::default();
        config
            .apply_sexp(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply every recognized key of a plist source.
    pub fn apply_sexp(&mut self, text: &str) -> anyhow::Result<()> {
        let value = lexpr::from_str(text).context("invalid s-expression")?;
        self.apply(&value)
    }

    /// Apply every recognized key of a parsed plist. Out-of-range values
    /// are skipped with a warning; an unknown hand is an error.
    pub fn apply(&mut self, value: &Value) -> anyhow::Result<()> {
        if !matches!(value, Value::Cons(_) | Value::Null) {
            bail!("config must be a plist, got {}", value);
        }

        let g = &mut self.gesture;
        if let Some(enabled) = get_bool(value, "enabled") {
            g.enabled = enabled;
        }
        if let Some(pinch) = get_float(value, "pinch-threshold") {
            if pinch > 0.0 {
                g.pinch_threshold = pinch as f32;
            } else {
                warn!("ignoring non-positive :pinch-threshold {}", pinch);
            }
        }
        if let Some(window) = get_int(value, "double-click-ms") {
            match u64::try_from(window) {
                Ok(ms) if ms > 0 => g.double_click_window_ms = ms,
                _ => warn!("ignoring :double-click-ms {}", window),
            }
        }
        if let Some(gap) = get_int(value, "min-click-gap-ms") {
            match u64::try_from(gap) {
                Ok(ms) => g.min_click_gap_ms = ms,
                Err(_) => warn!("ignoring negative :min-click-gap-ms {}", gap),
            }
        }
        if let Some(drag) = get_float(value, "drag-threshold-px") {
            if drag >= 0.0 {
                g.drag_threshold_px = drag as f32;
            } else {
                warn!("ignoring negative :drag-threshold-px {}", drag);
            }
        }

        if let Some(hand) = get_string(value, "tracked-hand") {
            match Hand::parse(&hand) {
                Some(h) => self.tracking.tracked_hand = h,
                None => bail!("unknown :tracked-hand {} (expected left or right)", hand),
            }
        }
        if let Some(conf) = get_float(value, "min-confidence") {
            if (0.0..=1.0).contains(&conf) {
                self.tracking.min_confidence = conf as f32;
            } else {
                warn!("ignoring :min-confidence {} outside [0, 1]", conf);
            }
        }

        if let Some(width) = get_int(value, "screen-width") {
            match u32::try_from(width) {
                Ok(w) if w > 0 => self.screen.width = w,
                _ => warn!("ignoring :screen-width {}", width),
            }
        }
        if let Some(height) = get_int(value, "screen-height") {
            match u32::try_from(height) {
                Ok(h) if h > 0 => self.screen.height = h,
                _ => warn!("ignoring :screen-height {}", height),
            }
        }

        if self.gesture.min_click_gap_ms >= self.gesture.double_click_window_ms {
            warn!(
                "min-click-gap-ms {} >= double-click-ms {}: double clicks can never fire",
                self.gesture.min_click_gap_ms, self.gesture.double_click_window_ms
            );
        }
        Ok(())
    }
}
