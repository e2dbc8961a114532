//! Hand tracking input: landmark model, provider seam, session replay.

pub mod hand_tracking;
pub mod replay;

pub use hand_tracking::{
    DetectedHand, Hand, HandLandmark, HandTrackingConfig, HandTrackingProvider, TrackingFrame,
    LANDMARK_COUNT,
};
pub use replay::ReplayProvider;
