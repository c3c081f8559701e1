//! Raw reading normalization
//!
//! Devices report battery level in several encodings: a plain 0-100
//! percentage, the protocol-native 0-200 half-percent scale, a coarse
//! low/medium/high band, or a raw pack voltage. This module turns any of
//! them into an integer percentage, using the profile registry and
//! temperature compensation for voltage sources.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::profile;

/// Reference temperature for voltage compensation (°C)
pub const REFERENCE_TEMP_C: f64 = 20.0;

/// Declared encoding of a raw battery value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingSource {
    /// Vendor datapoint already on a 0-100 scale
    VendorPercent,
    /// Protocol-native 0-200 scale (half percents)
    ProtocolPercent0to200,
    /// Coarse three-level report: 0 = low, 1 = medium, 2 = high
    ChargeBand,
    /// Raw pack voltage in volts
    Voltage,
}

/// Convert a raw reading into a percentage
///
/// Returns `None` for non-finite input, an unrecognized charge band, or a
/// physically implausible voltage. The result is always an integer in
/// [0, 100]; it is never NaN.
pub fn normalize(
    raw: f64,
    source: ReadingSource,
    battery_type: &str,
    ambient_temp_c: f64,
) -> Option<u8> {
    if !raw.is_finite() {
        debug!("dropping non-finite raw battery value {:?}", raw);
        return None;
    }

    match source {
        ReadingSource::VendorPercent => Some(clamp_percent(raw)),
        ReadingSource::ProtocolPercent0to200 => Some(clamp_percent(raw / 2.0)),
        ReadingSource::ChargeBand => charge_band_percent(raw),
        ReadingSource::Voltage => voltage_percent(raw, battery_type, ambient_temp_c),
    }
}

/// Map a low/medium/high band report onto a representative percentage
fn charge_band_percent(raw: f64) -> Option<u8> {
    match raw.round() as i64 {
        0 => Some(10),
        1 => Some(50),
        2 => Some(100),
        other => {
            debug!("unrecognized charge band value {}", other);
            None
        }
    }
}

fn voltage_percent(volts: f64, battery_type: &str, ambient_temp_c: f64) -> Option<u8> {
    let entry = profile::lookup_or_default(battery_type);

    // Reject readings no real pack of this type could produce
    if volts <= 0.0 || volts > entry.fresh_volts * 2.0 {
        debug!(
            "implausible voltage {:.2}V for battery type {}",
            volts, entry.type_id
        );
        return None;
    }

    // Cold packs sag below their true voltage; lift the reading back to
    // the 20°C reference so cold devices do not report falsely low
    let compensated = if ambient_temp_c < REFERENCE_TEMP_C {
        volts - entry.temp_coefficient_volts_per_degree * (REFERENCE_TEMP_C - ambient_temp_c)
    } else {
        volts
    };

    if compensated >= entry.fresh_volts {
        return Some(100);
    }
    if compensated <= entry.dead_volts {
        return Some(0);
    }

    // Piecewise-linear interpolation between the bracketing control points
    for pair in entry.discharge_curve.windows(2) {
        let (high, low) = (pair[0], pair[1]);
        if compensated >= low.volts && compensated <= high.volts {
            let ratio = (compensated - low.volts) / (high.volts - low.volts);
            let percent = low.percent as f64 + ratio * (high.percent - low.percent) as f64;
            return Some(clamp_percent(percent));
        }
    }

    // Curves span fresh to dead, so the bounds checks above should have
    // caught everything; clamp against the top point just in case
    Some(if compensated > entry.discharge_curve[0].volts { 100 } else { 0 })
}

fn clamp_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vendor_percent_clamps() {
        assert_eq!(normalize(42.0, ReadingSource::VendorPercent, "CR2032", 20.0), Some(42));
        assert_eq!(normalize(120.0, ReadingSource::VendorPercent, "CR2032", 20.0), Some(100));
        assert_eq!(normalize(-3.0, ReadingSource::VendorPercent, "CR2032", 20.0), Some(0));
    }

    #[test]
    fn test_protocol_half_percent_scale() {
        assert_eq!(normalize(200.0, ReadingSource::ProtocolPercent0to200, "CR2032", 20.0), Some(100));
        assert_eq!(normalize(150.0, ReadingSource::ProtocolPercent0to200, "CR2032", 20.0), Some(75));
        assert_eq!(normalize(0.0, ReadingSource::ProtocolPercent0to200, "CR2032", 20.0), Some(0));
        assert_eq!(normalize(255.0, ReadingSource::ProtocolPercent0to200, "CR2032", 20.0), Some(100));
    }

    #[test]
    fn test_charge_band_mapping() {
        assert_eq!(normalize(0.0, ReadingSource::ChargeBand, "CR2032", 20.0), Some(10));
        assert_eq!(normalize(1.0, ReadingSource::ChargeBand, "CR2032", 20.0), Some(50));
        assert_eq!(normalize(2.0, ReadingSource::ChargeBand, "CR2032", 20.0), Some(100));
        assert_eq!(normalize(3.0, ReadingSource::ChargeBand, "CR2032", 20.0), None);
    }

    #[test]
    fn test_non_finite_input_is_dropped() {
        for source in [
            ReadingSource::VendorPercent,
            ReadingSource::ProtocolPercent0to200,
            ReadingSource::ChargeBand,
            ReadingSource::Voltage,
        ] {
            assert_eq!(normalize(f64::NAN, source, "CR2032", 20.0), None);
            assert_eq!(normalize(f64::INFINITY, source, "CR2032", 20.0), None);
        }
    }

    #[test]
    fn test_voltage_endpoints_per_profile() {
        for type_id in profile::registered_types() {
            let entry = profile::lookup(type_id).unwrap();
            assert_eq!(
                normalize(entry.fresh_volts, ReadingSource::Voltage, type_id, 20.0),
                Some(100),
                "fresh voltage of {} should read 100%",
                type_id
            );
            assert_eq!(
                normalize(entry.dead_volts, ReadingSource::Voltage, type_id, 20.0),
                Some(0),
                "dead voltage of {} should read 0%",
                type_id
            );
        }
    }

    #[test]
    fn test_voltage_monotone_non_increasing() {
        for type_id in profile::registered_types() {
            let entry = profile::lookup(type_id).unwrap();
            let mut previous = 101i16;
            let steps = 200;
            let span = entry.fresh_volts - entry.dead_volts;
            for i in 0..=steps {
                let volts = entry.fresh_volts - span * i as f64 / steps as f64;
                let pct = normalize(volts, ReadingSource::Voltage, type_id, 20.0).unwrap() as i16;
                assert!(
                    pct <= previous,
                    "{}: {}% at {:.3}V rose above {}%",
                    type_id,
                    pct,
                    volts,
                    previous
                );
                previous = pct;
            }
        }
    }

    #[test]
    fn test_curve_interpolation_midpoint() {
        // CR2032 control points: (2.80, 65) and (2.75, 50)
        assert_eq!(normalize(2.775, ReadingSource::Voltage, "CR2032", 20.0), Some(58));
    }

    #[test]
    fn test_cold_reading_compensated_upward() {
        for type_id in profile::registered_types() {
            let entry = profile::lookup(type_id).unwrap();
            let volts = (entry.full_volts + entry.low_volts) / 2.0;
            let warm = normalize(volts, ReadingSource::Voltage, type_id, 20.0).unwrap();
            let cold = normalize(volts, ReadingSource::Voltage, type_id, 0.0).unwrap();
            assert!(
                cold >= warm,
                "{}: cold estimate {}% below warm estimate {}%",
                type_id,
                cold,
                warm
            );
        }
    }

    #[test]
    fn test_warm_reading_not_compensated() {
        let at_ref = normalize(2.8, ReadingSource::Voltage, "CR2032", 20.0);
        let above_ref = normalize(2.8, ReadingSource::Voltage, "CR2032", 35.0);
        assert_eq!(at_ref, above_ref);
    }

    #[test]
    fn test_implausible_voltage_is_dropped() {
        assert_eq!(normalize(0.0, ReadingSource::Voltage, "CR2032", 20.0), None);
        assert_eq!(normalize(-1.0, ReadingSource::Voltage, "CR2032", 20.0), None);
        assert_eq!(normalize(12.0, ReadingSource::Voltage, "CR2032", 20.0), None);
    }

    #[test]
    fn test_unknown_type_uses_default_profile() {
        let unknown = normalize(2.90, ReadingSource::Voltage, "PotatoCell", 20.0);
        let default = normalize(2.90, ReadingSource::Voltage, "CR2032", 20.0);
        assert_eq!(unknown, default);
        assert_eq!(default, Some(85));
    }
}
