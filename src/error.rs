//! Error types for the edges of the game (tuning, storage)
//!
//! The simulation tick itself never fails; these only surface when loading
//! configuration or touching persisted data.

use thiserror::Error;

/// Crate-wide error
#[derive(Debug, Error)]
pub enum Error {
    /// A tuning value is outside its accepted range
    #[error("tuning value `{name}` = {value} is invalid (expected {expected})")]
    InvalidTuning {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// Reading or writing a persisted file failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Browser storage is unavailable or rejected the write
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
