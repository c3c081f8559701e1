//! cellgauge: battery state estimation for low-power wireless devices
//!
//! Translates noisy raw battery telemetry (ADC-scaled voltages, vendor
//! percentage encodings, protocol-native fields) into a stable
//! state-of-charge percentage and a battery-health forecast, for devices
//! whose only power indicator is a coin cell, alkaline pack or
//! rechargeable cell. The pipeline is pure computation; the host runtime
//! feeds readings in and receives updates through [`engine::EngineHost`].

pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod monitor;
pub mod profile;

// Re-export common items for convenience
pub use config::EngineConfig;
pub use engine::{BatteryEngine, BatteryStatus, BatteryUpdate, EngineHost, RawReading};
pub use error::{ConfigError, EngineError};
pub use estimator::{EstimatorState, HealthTracker, ReadingSource, SmoothingFilter};
pub use monitor::DeviceMonitor;
pub use profile::{BatteryProfile, Chemistry};
