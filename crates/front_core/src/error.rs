//! Error types for the simulation core API surface.
//!
//! Executions themselves never return errors: every failure inside an
//! execution is logged and resolved by deactivating it, so the scheduler can
//! treat executions as infallible. [`GameError`] covers the parts of the API
//! that do fail loudly, such as configuration loading and validation.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the simulation core API.
#[derive(Debug, Error)]
pub enum GameError {
    /// A configuration field holds an out-of-range or nonsensical value.
    #[error("Invalid config field '{field}': {message}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// Configuration file parsing error.
    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    /// Desync detected between simulation runs that should be identical.
    #[error("Desync detected at tick {tick}: hash {left_hash} != {right_hash}")]
    DesyncDetected {
        /// Tick where the hashes diverged.
        tick: u64,
        /// Hash of the first run.
        left_hash: u64,
        /// Hash of the second run.
        right_hash: u64,
    },
}
