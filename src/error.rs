//! Error types shared by the sampler, timer and config layers.

use std::path::PathBuf;

/// Result alias for widget-bar operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Counter file could not be read.
    #[error("cannot read counter {}: {source}", .path.display())]
    CounterRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Counter file did not hold a decimal integer.
    #[error("cannot parse counter {}: {source}", .path.display())]
    CounterParse {
        path: PathBuf,
        source: std::num::ParseIntError,
    },

    /// Timer state exists but could not be read or decoded.
    #[error("cannot load timer state {}: {reason}", .path.display())]
    TimerLoad { path: PathBuf, reason: String },

    /// Timer state could not be encoded or written.
    #[error("cannot save timer state {}: {reason}", .path.display())]
    TimerSave { path: PathBuf, reason: String },

    /// The persisted mode has no `get` rendering (Paused or an unknown integer).
    #[error("invalid timer state")]
    InvalidTimerState,

    /// Config file could not be written.
    #[error("cannot save config: {0}")]
    ConfigSave(String),
}
