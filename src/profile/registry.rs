//! Static registry of battery profiles
//!
//! Curve control points and voltage bounds are taken from manufacturer
//! datasheets. Everything is embedded; no external data is consulted.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::warn;

use super::{BatteryProfile, Chemistry, CurvePoint};

/// Fallback battery type when nothing better is known
pub const DEFAULT_BATTERY_TYPE: &str = "CR2032";

lazy_static! {
    static ref PROFILES: HashMap<&'static str, BatteryProfile> = build_registry();
}

/// Look up a profile by its type id
pub fn lookup(type_id: &str) -> Option<&'static BatteryProfile> {
    PROFILES.get(type_id)
}

/// Look up a profile, falling back to the default on a miss
///
/// A miss is recoverable: the caller gets a usable coin-cell profile and a
/// warning is logged, so the pipeline never fails on an unknown type.
pub fn lookup_or_default(type_id: &str) -> &'static BatteryProfile {
    match PROFILES.get(type_id) {
        Some(profile) => profile,
        None => {
            warn!(
                "unknown battery type '{}', falling back to {}",
                type_id, DEFAULT_BATTERY_TYPE
            );
            default_profile()
        }
    }
}

/// The designated default profile
pub fn default_profile() -> &'static BatteryProfile {
    &PROFILES[DEFAULT_BATTERY_TYPE]
}

/// Iterate over all registered type ids
pub fn registered_types() -> impl Iterator<Item = &'static str> {
    PROFILES.keys().copied()
}

fn curve(points: &[(f64, u8)]) -> Vec<CurvePoint> {
    points
        .iter()
        .map(|&(volts, percent)| CurvePoint { volts, percent })
        .collect()
}

fn build_registry() -> HashMap<&'static str, BatteryProfile> {
    let profiles = vec![
        // Lithium coin and photo cells, 3V nominal
        BatteryProfile {
            type_id: "CR2032",
            chemistry: Chemistry::LithiumCoin,
            cell_count: 1,
            nominal_volts: 3.0,
            fresh_volts: 3.3,
            full_volts: 3.0,
            low_volts: 2.5,
            dead_volts: 2.0,
            capacity_mah: 220,
            self_discharge_pct_per_year: 1.0,
            temp_coefficient_volts_per_degree: -0.003,
            discharge_curve: curve(&[
                (3.30, 100), (3.10, 98), (3.00, 95), (2.95, 90), (2.90, 85),
                (2.85, 75), (2.80, 65), (2.75, 50), (2.70, 40), (2.60, 25),
                (2.50, 15), (2.40, 8), (2.30, 4), (2.20, 2), (2.00, 0),
            ]),
        },
        BatteryProfile {
            type_id: "CR2450",
            chemistry: Chemistry::LithiumCoin,
            cell_count: 1,
            nominal_volts: 3.0,
            fresh_volts: 3.3,
            full_volts: 3.0,
            low_volts: 2.5,
            dead_volts: 2.0,
            capacity_mah: 620,
            self_discharge_pct_per_year: 1.0,
            temp_coefficient_volts_per_degree: -0.003,
            discharge_curve: curve(&[
                (3.30, 100), (3.10, 98), (3.00, 95), (2.95, 90), (2.90, 85),
                (2.85, 75), (2.80, 65), (2.75, 50), (2.70, 40), (2.60, 25),
                (2.50, 15), (2.40, 8), (2.30, 4), (2.00, 0),
            ]),
        },
        BatteryProfile {
            type_id: "CR2477",
            chemistry: Chemistry::LithiumCoin,
            cell_count: 1,
            nominal_volts: 3.0,
            fresh_volts: 3.3,
            full_volts: 3.0,
            low_volts: 2.5,
            dead_volts: 2.0,
            capacity_mah: 1000,
            self_discharge_pct_per_year: 1.0,
            temp_coefficient_volts_per_degree: -0.003,
            discharge_curve: curve(&[
                (3.30, 100), (3.00, 95), (2.90, 85), (2.80, 70), (2.70, 50),
                (2.60, 30), (2.50, 15), (2.40, 8), (2.00, 0),
            ]),
        },
        BatteryProfile {
            type_id: "CR123A",
            chemistry: Chemistry::LithiumCoin,
            cell_count: 1,
            nominal_volts: 3.0,
            fresh_volts: 3.3,
            full_volts: 3.0,
            low_volts: 2.5,
            dead_volts: 2.0,
            capacity_mah: 1500,
            self_discharge_pct_per_year: 1.0,
            temp_coefficient_volts_per_degree: -0.003,
            discharge_curve: curve(&[
                (3.30, 100), (3.15, 95), (3.00, 90), (2.90, 80), (2.80, 65),
                (2.70, 45), (2.60, 25), (2.50, 12), (2.40, 5), (2.00, 0),
            ]),
        },
        BatteryProfile {
            type_id: "CR1632",
            chemistry: Chemistry::LithiumCoin,
            cell_count: 1,
            nominal_volts: 3.0,
            fresh_volts: 3.3,
            full_volts: 3.0,
            low_volts: 2.5,
            dead_volts: 2.0,
            capacity_mah: 140,
            self_discharge_pct_per_year: 1.0,
            temp_coefficient_volts_per_degree: -0.003,
            discharge_curve: curve(&[
                (3.30, 100), (3.00, 95), (2.90, 85), (2.80, 70), (2.70, 50),
                (2.60, 30), (2.50, 15), (2.00, 0),
            ]),
        },
        // Single alkaline cells, 1.5V nominal
        BatteryProfile {
            type_id: "AAA",
            chemistry: Chemistry::Alkaline,
            cell_count: 1,
            nominal_volts: 1.5,
            fresh_volts: 1.65,
            full_volts: 1.55,
            low_volts: 1.1,
            dead_volts: 0.9,
            capacity_mah: 1200,
            self_discharge_pct_per_year: 3.0,
            temp_coefficient_volts_per_degree: -0.004,
            discharge_curve: curve(&[
                (1.65, 100), (1.55, 95), (1.50, 90), (1.45, 80), (1.40, 70),
                (1.35, 60), (1.30, 50), (1.25, 40), (1.20, 30), (1.15, 20),
                (1.10, 12), (1.05, 6), (1.00, 3), (0.90, 0),
            ]),
        },
        BatteryProfile {
            type_id: "AA",
            chemistry: Chemistry::Alkaline,
            cell_count: 1,
            nominal_volts: 1.5,
            fresh_volts: 1.65,
            full_volts: 1.55,
            low_volts: 1.1,
            dead_volts: 0.9,
            capacity_mah: 2850,
            self_discharge_pct_per_year: 3.0,
            temp_coefficient_volts_per_degree: -0.004,
            discharge_curve: curve(&[
                (1.65, 100), (1.55, 95), (1.50, 90), (1.45, 80), (1.40, 70),
                (1.35, 60), (1.30, 50), (1.25, 40), (1.20, 30), (1.15, 20),
                (1.10, 12), (1.05, 6), (1.00, 3), (0.90, 0),
            ]),
        },
        BatteryProfile {
            type_id: "9V",
            chemistry: Chemistry::AlkalineMultiCell,
            cell_count: 6,
            nominal_volts: 9.0,
            fresh_volts: 9.6,
            full_volts: 9.0,
            low_volts: 7.2,
            dead_volts: 5.4,
            capacity_mah: 565,
            self_discharge_pct_per_year: 3.0,
            temp_coefficient_volts_per_degree: -0.024,
            discharge_curve: curve(&[
                (9.60, 100), (9.30, 95), (9.00, 88), (8.70, 78), (8.40, 65),
                (8.10, 50), (7.80, 35), (7.50, 22), (7.20, 12), (6.60, 5),
                (5.40, 0),
            ]),
        },
        // Series packs common in wireless sensors
        BatteryProfile {
            type_id: "2xAAA",
            chemistry: Chemistry::AlkalineMultiCell,
            cell_count: 2,
            nominal_volts: 3.0,
            fresh_volts: 3.3,
            full_volts: 3.1,
            low_volts: 2.2,
            dead_volts: 1.8,
            capacity_mah: 1200,
            self_discharge_pct_per_year: 3.0,
            temp_coefficient_volts_per_degree: -0.008,
            discharge_curve: curve(&[
                (3.30, 100), (3.10, 95), (3.00, 90), (2.90, 80), (2.80, 70),
                (2.70, 60), (2.60, 50), (2.50, 40), (2.40, 30), (2.30, 20),
                (2.20, 12), (2.00, 5), (1.80, 0),
            ]),
        },
        BatteryProfile {
            type_id: "2xAA",
            chemistry: Chemistry::AlkalineMultiCell,
            cell_count: 2,
            nominal_volts: 3.0,
            fresh_volts: 3.3,
            full_volts: 3.1,
            low_volts: 2.2,
            dead_volts: 1.8,
            capacity_mah: 2850,
            self_discharge_pct_per_year: 3.0,
            temp_coefficient_volts_per_degree: -0.008,
            discharge_curve: curve(&[
                (3.30, 100), (3.10, 95), (3.00, 90), (2.90, 80), (2.80, 70),
                (2.70, 60), (2.60, 50), (2.50, 40), (2.40, 30), (2.30, 20),
                (2.20, 12), (2.00, 5), (1.80, 0),
            ]),
        },
        BatteryProfile {
            type_id: "4xAAA",
            chemistry: Chemistry::AlkalineMultiCell,
            cell_count: 4,
            nominal_volts: 6.0,
            fresh_volts: 6.6,
            full_volts: 6.2,
            low_volts: 4.4,
            dead_volts: 3.6,
            capacity_mah: 1200,
            self_discharge_pct_per_year: 3.0,
            temp_coefficient_volts_per_degree: -0.016,
            discharge_curve: curve(&[
                (6.60, 100), (6.20, 95), (6.00, 90), (5.80, 80), (5.60, 70),
                (5.40, 60), (5.20, 50), (5.00, 40), (4.80, 30), (4.60, 20),
                (4.40, 12), (4.00, 5), (3.60, 0),
            ]),
        },
        // Rechargeable lithium, 3.7V nominal
        BatteryProfile {
            type_id: "Li-ion",
            chemistry: Chemistry::LithiumIon,
            cell_count: 1,
            nominal_volts: 3.7,
            fresh_volts: 4.2,
            full_volts: 4.1,
            low_volts: 3.3,
            dead_volts: 2.8,
            capacity_mah: 2600,
            self_discharge_pct_per_year: 2.0,
            temp_coefficient_volts_per_degree: -0.002,
            discharge_curve: curve(&[
                (4.20, 100), (4.15, 98), (4.10, 95), (4.00, 88), (3.90, 78),
                (3.80, 65), (3.70, 50), (3.60, 35), (3.50, 22), (3.40, 12),
                (3.30, 5), (3.00, 2), (2.80, 0),
            ]),
        },
        BatteryProfile {
            type_id: "Li-polymer",
            chemistry: Chemistry::LithiumPolymer,
            cell_count: 1,
            nominal_volts: 3.7,
            fresh_volts: 4.2,
            full_volts: 4.1,
            low_volts: 3.3,
            dead_volts: 3.0,
            capacity_mah: 1200,
            self_discharge_pct_per_year: 2.0,
            temp_coefficient_volts_per_degree: -0.002,
            discharge_curve: curve(&[
                (4.20, 100), (4.15, 97), (4.10, 93), (4.00, 85), (3.90, 73),
                (3.80, 58), (3.70, 42), (3.60, 28), (3.50, 16), (3.40, 8),
                (3.30, 3), (3.00, 0),
            ]),
        },
        BatteryProfile {
            type_id: "18650",
            chemistry: Chemistry::LithiumIon,
            cell_count: 1,
            nominal_volts: 3.7,
            fresh_volts: 4.2,
            full_volts: 4.1,
            low_volts: 3.3,
            dead_volts: 2.5,
            capacity_mah: 3400,
            self_discharge_pct_per_year: 2.0,
            temp_coefficient_volts_per_degree: -0.002,
            discharge_curve: curve(&[
                (4.20, 100), (4.10, 95), (4.00, 88), (3.90, 78), (3.80, 65),
                (3.70, 50), (3.60, 35), (3.50, 22), (3.40, 12), (3.30, 5),
                (3.00, 2), (2.50, 0),
            ]),
        },
    ];

    let mut table = HashMap::with_capacity(profiles.len());
    for profile in profiles {
        debug_assert!(profile.is_well_formed(), "bad profile {}", profile.type_id);
        table.insert(profile.type_id, profile);
    }
    table
}
