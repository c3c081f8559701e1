//! Percentage smoothing and battery replacement detection
//!
//! Raw reports jitter between polls. A plain exponential moving average
//! either masks a genuine battery swap or lets single-sample noise
//! through, so the filter is two-tier: large upward jumps bypass the EMA
//! entirely, and everything else is damped and step-limited.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Stateful per-device smoothing filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingFilter {
    previous: Option<u8>,
    smoothing_factor: f64,
    max_step: u8,
    replacement_jump: u8,
}

impl SmoothingFilter {
    /// Create a filter with explicit parameters
    pub fn new(smoothing_factor: f64, max_step: u8, replacement_jump: u8) -> Self {
        Self {
            previous: None,
            smoothing_factor,
            max_step,
            replacement_jump,
        }
    }

    /// Create a filter from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.smoothing_factor,
            config.max_step_per_update,
            config.replacement_jump,
        )
    }

    /// The last emitted value, if any
    pub fn last(&self) -> Option<u8> {
        self.previous
    }

    /// Forget the filter state
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Feed a normalized candidate through the filter
    pub fn apply(&mut self, candidate: u8) -> u8 {
        let previous = match self.previous {
            None => {
                // Cold start: nothing to smooth against
                self.previous = Some(candidate);
                return candidate;
            }
            Some(p) => p,
        };

        // A jump far larger than discharge noise means the battery was
        // swapped; adopt the new level unfiltered
        if candidate > previous.saturating_add(self.replacement_jump) {
            self.previous = Some(candidate);
            return candidate;
        }

        let blended =
            previous as f64 + self.smoothing_factor * (candidate as f64 - previous as f64);
        let mut next = blended.round() as i16;

        // Rounding can stall one point short of the target; nudge so a
        // repeated identical reading settles on it exactly
        if next == previous as i16 && candidate != previous {
            next += if candidate > previous { 1 } else { -1 };
        }

        // A single noisy sample must not produce a visible jump
        let step = next - previous as i16;
        if step.abs() > self.max_step as i16 {
            next = previous as i16 + self.max_step as i16 * step.signum();
        }

        let result = next.clamp(0, 100) as u8;
        self.previous = Some(result);
        result
    }
}
