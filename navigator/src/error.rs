//! Session-level error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the hand-tracking provider. Reported once per session,
/// never per frame.
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("hand tracking unavailable: {0}")]
    Unavailable(String),
    #[error("cannot read session {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed frame on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
