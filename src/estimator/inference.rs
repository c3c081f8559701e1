//! Battery type and poll cadence inference
//!
//! Best-effort classification of a device into a battery profile and a
//! re-poll interval. The category hint is untrusted free text, so matching
//! is an explicit ordered rule list evaluated first-match-wins rather than
//! scattered conditionals; the fallback order stays auditable.

use std::time::Duration;

use log::debug;

/// Keyword rules mapping a category/model hint to a battery type.
/// Evaluated in order; the first keyword contained in the hint wins.
const BATTERY_TYPE_RULES: &[(&str, &str)] = &[
    // Buttons and remotes
    ("button", "CR2032"),
    ("remote", "CR2032"),
    ("scene", "CR2032"),
    ("knob", "CR2032"),
    // Motion and presence
    ("motion", "CR2450"),
    ("pir", "CR2450"),
    ("radar", "Li-ion"),
    ("presence", "Li-ion"),
    // Environmental
    ("climate", "2xAAA"),
    ("soil", "2xAAA"),
    ("air_quality", "Li-ion"),
    ("temperature", "CR2032"),
    ("humidity", "CR2032"),
    // Security
    ("contact", "CR2032"),
    ("door", "CR2032"),
    ("window", "CR1632"),
    ("vibration", "CR2032"),
    ("water", "CR2032"),
    ("leak", "CR2032"),
    ("smoke", "CR123A"),
    ("gas", "Li-ion"),
    // Actuators and sirens
    ("trv", "2xAA"),
    ("thermostat", "2xAA"),
    ("lock", "4xAAA"),
    ("siren", "2xAA"),
    ("sos", "CR2032"),
];

/// Keyword rules mapping a category hint to a poll interval in seconds.
/// Event-driven devices report rarely; climate and soil sensors need
/// frequent updates.
const POLL_CADENCE_RULES: &[(&str, u64)] = &[
    ("button", 12 * 3600),
    ("remote", 12 * 3600),
    ("contact", 6 * 3600),
    ("siren", 6 * 3600),
    ("motion", 4 * 3600),
    ("water", 4 * 3600),
    ("lock", 3 * 3600),
    ("climate", 2 * 3600),
    ("trv", 2 * 3600),
    ("thermostat", 2 * 3600),
    ("soil", 3600),
];

/// Resolve a device's battery type
///
/// Ordered fallback chain, each step short-circuiting on a match:
/// explicit override, keyword match on the category hint, heuristic from
/// the most recent raw voltage, then the supplied default type.
pub fn infer_battery_type(
    override_type: Option<&str>,
    category_hint: Option<&str>,
    last_voltage: Option<f64>,
    default: &str,
) -> String {
    if let Some(configured) = override_type {
        let trimmed = configured.trim();
        if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("auto") {
            return trimmed.to_string();
        }
    }

    if let Some(hint) = category_hint {
        let hint = hint.to_lowercase();
        for (keyword, battery_type) in BATTERY_TYPE_RULES {
            if hint.contains(keyword) {
                return (*battery_type).to_string();
            }
        }
        debug!("no battery type rule matched hint '{}'", hint);
    }

    if let Some(volts) = last_voltage.filter(|v| v.is_finite()) {
        if volts > 3.8 {
            return "Li-ion".to_string();
        }
        if volts > 3.2 {
            return "CR2032".to_string();
        }
        if volts > 2.8 {
            return "2xAAA".to_string();
        }
        if (1.3..1.7).contains(&volts) {
            return "AAA".to_string();
        }
    }

    default.to_string()
}

/// Resolve how often the host should re-poll a device
///
/// Devices with no cadence match use the supplied default (4 hours in the
/// default engine configuration).
pub fn infer_poll_interval(category_hint: Option<&str>, default: Duration) -> Duration {
    if let Some(hint) = category_hint {
        let hint = hint.to_lowercase();
        for (keyword, seconds) in POLL_CADENCE_RULES {
            if hint.contains(keyword) {
                return Duration::from_secs(*seconds);
            }
        }
    }
    default
}
