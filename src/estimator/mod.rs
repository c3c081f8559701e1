//! Per-device estimation pipeline
//!
//! The stages run in a fixed order on every accepted raw reading:
//! normalization, smoothing, health tracking. All state lives in an
//! explicit [`EstimatorState`] owned by the device's monitoring session,
//! so every stage is testable as a pure function over that state.

mod health;
mod inference;
mod normalizer;
mod smoothing;

pub use health::{HealthSample, HealthTracker, HISTORY_CAPACITY};
pub use inference::{infer_battery_type, infer_poll_interval};
pub use normalizer::{normalize, ReadingSource, REFERENCE_TEMP_C};
pub use smoothing::SmoothingFilter;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Mutable estimation state for one device's monitoring session
///
/// Created when the session starts, mutated only through the pipeline,
/// and dropped when the session ends. Never shared between devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorState {
    /// Battery profile key, resolved once at session start
    pub battery_type: String,
    /// Smoothing filter, carries the last emitted percentage
    pub filter: SmoothingFilter,
    /// Drain history and derived health metrics
    pub health: HealthTracker,
    /// Last raw voltage observed; only assists type auto-detection
    pub last_voltage: Option<f64>,
}

impl EstimatorState {
    /// Create state for a resolved battery type
    pub fn new(battery_type: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            battery_type: battery_type.into(),
            filter: SmoothingFilter::from_config(config),
            health: HealthTracker::new(),
            last_voltage: None,
        }
    }

    /// Last smoothed percentage emitted for this device
    pub fn last_percentage(&self) -> Option<u8> {
        self.filter.last()
    }

    /// Serialize the state to JSON for diagnostics export
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
