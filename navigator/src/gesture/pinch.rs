//! Thumb-index pinch detection with edge tracking.

use crate::tracking::{DetectedHand, HandLandmark};

/// Pinch signal relative to the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchEdge {
    /// Not pinching, was not pinching.
    Open,
    /// Pinch began this frame.
    Rising,
    /// Still pinching.
    Held,
    /// Pinch released this frame.
    Falling,
}

impl PinchEdge {
    pub fn is_pinching(&self) -> bool {
        matches!(self, Self::Rising | Self::Held)
    }
}

/// Whether the thumb tip and index tip are closer than `threshold`.
pub fn is_pinching(hand: &DetectedHand, threshold: f32) -> bool {
    hand.landmark_distance(HandLandmark::ThumbTip, HandLandmark::IndexTip)
        .map_or(false, |d| d < threshold)
}

#[derive(Debug, Clone)]
pub struct PinchDetector {
    threshold: f32,
    previous: bool,
}

impl PinchDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            previous: false,
        }
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Evaluate this frame's hand. Without a hand the stored value is
    /// kept; losing the hand is not a release.
    pub fn update(&mut self, hand: Option<&DetectedHand>) -> PinchEdge {
        let Some(hand) = hand else {
            return if self.previous {
                PinchEdge::Held
            } else {
                PinchEdge::Open
            };
        };
        let now = is_pinching(hand, self.threshold);
        let edge = match (self.previous, now) {
            (false, false) => PinchEdge::Open,
            (false, true) => PinchEdge::Rising,
            (true, true) => PinchEdge::Held,
            (true, false) => PinchEdge::Falling,
        };
        self.previous = now;
        edge
    }

    pub fn is_held(&self) -> bool {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::hand_tracking::make_hand;
    use crate::tracking::Hand;

    #[test]
    fn test_threshold_is_strict() {
        let near = make_hand(Hand::Right, [0.5, 0.5], 0.049);
        let far = make_hand(Hand::Right, [0.5, 0.5], 0.051);
        assert!(is_pinching(&near, 0.05));
        assert!(!is_pinching(&far, 0.05));
    }

    #[test]
    fn test_edge_sequence() {
        let mut det = PinchDetector::new(0.05);
        let open = make_hand(Hand::Right, [0.5, 0.5], 0.2);
        let closed = make_hand(Hand::Right, [0.5, 0.5], 0.01);
        assert_eq!(det.update(Some(&open)), PinchEdge::Open);
        assert_eq!(det.update(Some(&closed)), PinchEdge::Rising);
        assert_eq!(det.update(Some(&closed)), PinchEdge::Held);
        assert_eq!(det.update(Some(&open)), PinchEdge::Falling);
        assert_eq!(det.update(Some(&open)), PinchEdge::Open);
    }

    #[test]
    fn test_lost_hand_is_not_release() {
        let mut det = PinchDetector::new(0.05);
        let closed = make_hand(Hand::Right, [0.5, 0.5], 0.01);
        det.update(Some(&closed));
        assert_eq!(det.update(None), PinchEdge::Held);
        assert!(det.is_held());
        assert_eq!(det.update(Some(&closed)), PinchEdge::Held);
    }

    #[test]
    fn test_depth_counts() {
        let mut hand = make_hand(Hand::Right, [0.5, 0.5], 0.0);
        hand.landmarks[HandLandmark::ThumbTip.index()][2] = 0.08;
        assert!(!is_pinching(&hand, 0.05));
    }
}
