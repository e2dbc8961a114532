//! Pinch Navigator: hand-landmark input to file-browser effects.
//!
//! Per-frame hand detections flow through the gesture recognizer, which
//! emits one `GestureResult` per frame. The explorer applies those results
//! to selection, clipboard and folder state.

pub mod config;
pub mod error;
pub mod explorer;
pub mod gesture;
pub mod session;
pub mod sexp;
pub mod tracking;
