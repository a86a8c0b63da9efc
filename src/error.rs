//! Error taxonomy for the rendering engine
//!
//! Every error here is recoverable within one engine cycle. Shutdown is not
//! an error and is signalled separately.

use std::path::PathBuf;

use thiserror::Error;

/// Weather snapshot or roster input could not be used.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse weather snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The display push failed.
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("failed to open LED strip: {0}")]
    Open(String),
    #[error("failed to write frame: {0}")]
    Write(String),
    #[error("frame has {actual} pixels, strip expects {expected}")]
    FrameSize { expected: usize, actual: usize },
}

/// Configuration could not be loaded as written.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid color {0:?}, expected #RRGGBB")]
    Color(String),
    #[error("invalid time {0:?}, expected HH:MM")]
    Time(String),
}
