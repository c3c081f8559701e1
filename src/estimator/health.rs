//! Battery health tracking
//!
//! Keeps a bounded history of smoothed percentages per device and derives
//! a drain rate in percent per day plus an estimate of the days remaining.

use std::collections::VecDeque;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Maximum number of samples kept per device
pub const HISTORY_CAPACITY: usize = 30;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One timestamped percentage sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// When the sample was recorded
    pub timestamp: SystemTime,
    /// Smoothed percentage at that time
    pub percentage: u8,
}

/// Bounded drain history and derived health metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthTracker {
    history: VecDeque<HealthSample>,
    drain_rate_pct_per_day: Option<f64>,
    estimated_days_remaining: Option<u32>,
}

impl HealthTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            drain_rate_pct_per_day: None,
            estimated_days_remaining: None,
        }
    }

    /// Append a sample and recompute the drain metrics
    ///
    /// If the percentage has not decreased over the window, or the window
    /// spans no time, the previous metrics are left untouched rather than
    /// producing a negative or infinite value.
    pub fn record(&mut self, timestamp: SystemTime, percentage: u8) {
        self.history.push_back(HealthSample { timestamp, percentage });
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }

        if self.history.len() < 2 {
            return;
        }

        // Bounds are guaranteed present after the length check
        let oldest = self.history.front().copied();
        let newest = self.history.back().copied();
        let (oldest, newest) = match (oldest, newest) {
            (Some(o), Some(n)) => (o, n),
            _ => return,
        };

        let days_span = match newest.timestamp.duration_since(oldest.timestamp) {
            Ok(span) => span.as_secs_f64() / SECONDS_PER_DAY,
            Err(_) => return,
        };

        if days_span > 0.0 && oldest.percentage > newest.percentage {
            let rate = (oldest.percentage - newest.percentage) as f64 / days_span;
            self.drain_rate_pct_per_day = Some(rate);
            self.estimated_days_remaining = Some((percentage as f64 / rate).round() as u32);
        }
    }

    /// Derived drain rate, %/day
    pub fn drain_rate_pct_per_day(&self) -> Option<f64> {
        self.drain_rate_pct_per_day
    }

    /// Estimated days until the battery is exhausted
    pub fn estimated_days_remaining(&self) -> Option<u32> {
        self.estimated_days_remaining
    }

    /// Number of stored samples
    pub fn sample_count(&self) -> usize {
        self.history.len()
    }

    /// Iterate over the stored samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &HealthSample> {
        self.history.iter()
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}
