//! Error types for the battery estimation engine
//!
//! The estimation pipeline itself never fails: unknown battery types fall
//! back to a default profile and malformed readings are dropped for the
//! cycle. These errors cover API misuse and invalid configuration only.

use thiserror::Error;

/// Engine-level error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// No monitoring session exists for the device
    #[error("no monitoring session for device {0}")]
    SessionNotFound(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration validation error
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Smoothing factor outside the usable range
    #[error("smoothing factor {0} outside (0, 1]")]
    SmoothingFactor(f64),

    /// Low threshold must stay above the critical threshold
    #[error("low threshold {low}% must be above critical threshold {critical}%")]
    ThresholdOrder { low: u8, critical: u8 },

    /// Threshold is not a valid percentage
    #[error("threshold {0}% above 100%")]
    ThresholdRange(u8),

    /// A zero step limit would freeze the filter
    #[error("max step per update must be at least 1")]
    ZeroStepLimit,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;
