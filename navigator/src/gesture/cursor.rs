//! Index-fingertip to screen-pixel cursor mapping.

use crate::tracking::{DetectedHand, HandLandmark};

/// Cursor in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPosition {
    pub x: f32,
    pub y: f32,
    /// False when no qualifying hand was seen this frame; x/y then hold
    /// the last known position.
    pub is_visible: bool,
}

impl CursorPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            is_visible: true,
        }
    }

    /// Pixel distance to another cursor position.
    pub fn distance_to(&self, other: &CursorPosition) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            is_visible: false,
        }
    }
}

/// Projects the index fingertip into screen space, mirrored horizontally
/// to match a mirrored camera preview.
#[derive(Debug, Clone)]
pub struct CursorMapper {
    width: f32,
    height: f32,
    last: CursorPosition,
}

impl CursorMapper {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            last: CursorPosition::default(),
        }
    }

    /// Map this frame's hand, or mark the cursor hidden when there is none.
    pub fn map(&mut self, hand: Option<&DetectedHand>) -> CursorPosition {
        match hand.and_then(|h| h.landmark(HandLandmark::IndexTip)) {
            Some([x, y, _]) => {
                self.last = CursorPosition::new((1.0 - x) * self.width, y * self.height);
            }
            None => self.last.is_visible = false,
        }
        self.last
    }

    /// Most recent output of `map`.
    pub fn last(&self) -> CursorPosition {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = CursorPosition::default();
    }
}
