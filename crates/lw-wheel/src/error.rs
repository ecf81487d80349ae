//! Error types for the wheel engine

use thiserror::Error;

/// Wheel engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WheelError {
    /// Degenerate catalog: too few segments, duplicate ids, bad or all-zero weights
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Out-of-range random draw, forced index or angle
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A spin is already animating on this controller
    #[error("Spin already in progress")]
    AlreadySpinning,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Config document could not be parsed or written
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for WheelError {
    fn from(e: serde_json::Error) -> Self {
        WheelError::Config(e.to_string())
    }
}

impl From<serde_yml::Error> for WheelError {
    fn from(e: serde_yml::Error) -> Self {
        WheelError::Config(e.to_string())
    }
}

/// Result type alias
pub type WheelResult<T> = Result<T, WheelError>;
