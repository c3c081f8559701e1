//! Engine facade
//!
//! Orchestrates the pipeline per update cycle: normalization, smoothing,
//! health tracking, then threshold comparison and the outbound update to
//! the host. The facade holds the per-device session map and nothing else.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::estimator::{
    infer_battery_type, infer_poll_interval, normalize, EstimatorState, ReadingSource,
    REFERENCE_TEMP_C,
};

/// Battery status tag emitted alongside the percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryStatus {
    /// Comfortably charged
    Good,
    /// Below 80%, no action needed
    Medium,
    /// At or below the low threshold
    Low,
    /// At or below the critical threshold
    Critical,
    /// Exhausted
    Dead,
}

/// One decoded telemetry report from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Raw numeric battery field
    pub value: f64,
    /// Declared encoding of the value
    pub source: ReadingSource,
    /// Ambient temperature in °C, if the device reports one
    pub ambient_temp_c: Option<f64>,
}

impl RawReading {
    /// Convenience constructor for a reading at the reference temperature
    pub fn new(value: f64, source: ReadingSource) -> Self {
        Self {
            value,
            source,
            ambient_temp_c: None,
        }
    }

    /// Attach an ambient temperature
    pub fn at_temperature(mut self, temp_c: f64) -> Self {
        self.ambient_temp_c = Some(temp_c);
        self
    }
}

/// Canonical output of one accepted pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryUpdate {
    /// Smoothed percentage, 0-100
    pub percentage: u8,
    /// Status tag against the configured thresholds
    pub status: BatteryStatus,
    /// Drain rate in %/day, once enough history exists
    pub drain_rate_pct_per_day: Option<f64>,
    /// Forecast days until exhaustion, once enough history exists
    pub estimated_days_remaining: Option<u32>,
}

/// Host runtime boundary
///
/// The engine treats the category hint as untrusted free text and the
/// configured battery type as the highest-priority inference input. The
/// host persists and displays updates; the engine never blocks on it.
pub trait EngineHost: Send + Sync {
    /// Declared category/model hint for a device, if the host has one
    fn device_category_hint(&self, device_id: &str) -> Option<String>;

    /// User-configured battery type override, if any
    fn configured_battery_type(&self, device_id: &str) -> Option<String>;

    /// Fetch a fresh raw reading during a periodic poll
    fn fetch_reading(&self, device_id: &str) -> Option<RawReading>;

    /// Receive the canonical result of one accepted pipeline run
    fn on_battery_update(&self, device_id: &str, update: &BatteryUpdate);
}

/// Battery state estimation engine
///
/// One [`EstimatorState`] per monitored device, keyed by device id. All
/// work is pure computation over in-memory state; no call blocks.
pub struct BatteryEngine<H: EngineHost> {
    host: Arc<H>,
    config: EngineConfig,
    sessions: HashMap<String, EstimatorState>,
}

impl<H: EngineHost> BatteryEngine<H> {
    /// Create an engine after validating the configuration
    pub fn new(host: Arc<H>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            host,
            config,
            sessions: HashMap::new(),
        })
    }

    /// The host this engine reports to
    pub fn host(&self) -> Arc<H> {
        Arc::clone(&self.host)
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a monitoring session for a device
    ///
    /// Resolves the battery type once via the inference chain and caches
    /// it for the session. Restarting an existing session re-runs
    /// inference, seeded with the last observed voltage.
    pub fn start_session(&mut self, device_id: &str) {
        let last_voltage = self.sessions.get(device_id).and_then(|s| s.last_voltage);
        let state = self.new_session_state(device_id, last_voltage);
        info!(
            "session for {} using battery type {}",
            device_id, state.battery_type
        );
        self.sessions.insert(device_id.to_string(), state);
    }

    /// End a device's monitoring session, dropping its state
    pub fn end_session(&mut self, device_id: &str) -> bool {
        self.sessions.remove(device_id).is_some()
    }

    /// Whether a session exists for the device
    pub fn has_session(&self, device_id: &str) -> bool {
        self.sessions.contains_key(device_id)
    }

    /// Number of active sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Feed one raw telemetry report through the pipeline
    ///
    /// A session is created on first contact. A malformed reading yields
    /// `None` and leaves all state untouched; the next successful reading
    /// resumes the pipeline unaffected.
    pub fn handle_reading(&mut self, device_id: &str, reading: RawReading) -> Option<BatteryUpdate> {
        if !self.sessions.contains_key(device_id) {
            // First contact: a voltage reading can seed the type heuristic
            let seed_voltage = match reading.source {
                ReadingSource::Voltage if reading.value.is_finite() && reading.value > 0.0 => {
                    Some(reading.value)
                }
                _ => None,
            };
            let state = self.new_session_state(device_id, seed_voltage);
            info!(
                "session for {} using battery type {}",
                device_id, state.battery_type
            );
            self.sessions.insert(device_id.to_string(), state);
        }

        let temp_c = reading.ambient_temp_c.unwrap_or(REFERENCE_TEMP_C);
        let (low, critical) = (self.config.low_threshold, self.config.critical_threshold);

        let state = match self.sessions.get_mut(device_id) {
            Some(state) => state,
            None => return None,
        };

        let candidate = match normalize(reading.value, reading.source, &state.battery_type, temp_c)
        {
            Some(pct) => pct,
            None => {
                debug!(
                    "dropping malformed reading {:?} for {}",
                    reading.value, device_id
                );
                return None;
            }
        };

        if reading.source == ReadingSource::Voltage {
            state.last_voltage = Some(reading.value);
        }

        let smoothed = state.filter.apply(candidate);
        state.health.record(SystemTime::now(), smoothed);

        let update = BatteryUpdate {
            percentage: smoothed,
            status: status_for(smoothed, low, critical),
            drain_rate_pct_per_day: state.health.drain_rate_pct_per_day(),
            estimated_days_remaining: state.health.estimated_days_remaining(),
        };

        self.host.on_battery_update(device_id, &update);
        Some(update)
    }

    /// How often the host should re-poll this device
    pub fn poll_interval(&self, device_id: &str) -> Duration {
        infer_poll_interval(
            self.host.device_category_hint(device_id).as_deref(),
            self.config.default_poll_interval,
        )
    }

    /// Read-only copy of a device's estimator state, for diagnostics
    pub fn snapshot(&self, device_id: &str) -> Result<EstimatorState> {
        self.sessions
            .get(device_id)
            .cloned()
            .ok_or_else(|| EngineError::SessionNotFound(device_id.to_string()))
    }

    fn new_session_state(&self, device_id: &str, last_voltage: Option<f64>) -> EstimatorState {
        let override_type = self.host.configured_battery_type(device_id);
        let hint = self.host.device_category_hint(device_id);
        let battery_type = infer_battery_type(
            override_type.as_deref(),
            hint.as_deref(),
            last_voltage,
            &self.config.default_battery_type,
        );
        let mut state = EstimatorState::new(battery_type, &self.config);
        state.last_voltage = last_voltage;
        state
    }
}

/// Map a percentage onto a status tag
fn status_for(percentage: u8, low: u8, critical: u8) -> BatteryStatus {
    if percentage == 0 {
        BatteryStatus::Dead
    } else if percentage <= critical {
        BatteryStatus::Critical
    } else if percentage <= low {
        BatteryStatus::Low
    } else if percentage <= 80 {
        BatteryStatus::Medium
    } else {
        BatteryStatus::Good
    }
}
