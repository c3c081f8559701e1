//! Engine configuration

use std::time::Duration;

use crate::error::ConfigError;
use crate::profile::DEFAULT_BATTERY_TYPE;

/// Default exponential moving average factor
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;

/// Default limit on percentage movement per update
pub const DEFAULT_MAX_STEP_PER_UPDATE: u8 = 5;

/// Default upward jump treated as a battery replacement
pub const DEFAULT_REPLACEMENT_JUMP: u8 = 20;

/// Default low battery threshold (percentage)
pub const DEFAULT_LOW_THRESHOLD: u8 = 20;

/// Default critical battery threshold (percentage)
pub const DEFAULT_CRITICAL_THRESHOLD: u8 = 10;

/// Configuration for the estimation engine
///
/// The jump and step limits are empirical tuning values, so they are kept
/// configurable rather than hard-coded.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Exponential moving average factor, in (0, 1]
    pub smoothing_factor: f64,

    /// Maximum percentage movement allowed per update
    pub max_step_per_update: u8,

    /// Upward jump beyond which a reading is treated as a battery swap
    pub replacement_jump: u8,

    /// Low battery threshold (percentage)
    pub low_threshold: u8,

    /// Critical battery threshold (percentage)
    pub critical_threshold: u8,

    /// Battery type used when inference finds nothing better
    pub default_battery_type: String,

    /// Poll interval for devices with no cadence match
    pub default_poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            max_step_per_update: DEFAULT_MAX_STEP_PER_UPDATE,
            replacement_jump: DEFAULT_REPLACEMENT_JUMP,
            low_threshold: DEFAULT_LOW_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
            default_battery_type: DEFAULT_BATTERY_TYPE.to_string(),
            default_poll_interval: Duration::from_secs(4 * 60 * 60),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the smoothing factor
    pub fn with_smoothing_factor(mut self, factor: f64) -> Self {
        self.smoothing_factor = factor;
        self
    }

    /// Set the per-update step limit
    pub fn with_max_step_per_update(mut self, step: u8) -> Self {
        self.max_step_per_update = step;
        self
    }

    /// Set the replacement jump threshold
    pub fn with_replacement_jump(mut self, jump: u8) -> Self {
        self.replacement_jump = jump;
        self
    }

    /// Set the low/critical alert thresholds
    pub fn with_thresholds(mut self, low: u8, critical: u8) -> Self {
        self.low_threshold = low;
        self.critical_threshold = critical;
        self
    }

    /// Set the fallback battery type
    pub fn with_default_battery_type(mut self, type_id: impl Into<String>) -> Self {
        self.default_battery_type = type_id.into();
        self
    }

    /// Set the fallback poll interval
    pub fn with_default_poll_interval(mut self, interval: Duration) -> Self {
        self.default_poll_interval = interval;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.smoothing_factor.is_finite()
            || self.smoothing_factor <= 0.0
            || self.smoothing_factor > 1.0
        {
            return Err(ConfigError::SmoothingFactor(self.smoothing_factor));
        }
        if self.max_step_per_update == 0 {
            return Err(ConfigError::ZeroStepLimit);
        }
        if self.low_threshold > 100 {
            return Err(ConfigError::ThresholdRange(self.low_threshold));
        }
        if self.critical_threshold > 100 {
            return Err(ConfigError::ThresholdRange(self.critical_threshold));
        }
        if self.low_threshold <= self.critical_threshold {
            return Err(ConfigError::ThresholdOrder {
                low: self.low_threshold,
                critical: self.critical_threshold,
            });
        }
        Ok(())
    }
}
