//! Battery chemistry profiles
//!
//! Immutable specifications for the battery types found in low-power
//! wireless devices: voltage thresholds, discharge curves and temperature
//! coefficients, compiled from chemistry datasheets. The registry is built
//! once at first access and never mutated, so it is safe to read from any
//! number of device tasks without locking.

mod registry;

pub use registry::{default_profile, lookup, lookup_or_default, registered_types, DEFAULT_BATTERY_TYPE};

use serde::{Deserialize, Serialize};

/// Battery chemistry families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chemistry {
    /// Lithium manganese dioxide coin and photo cells (CR2032, CR123A, ...)
    LithiumCoin,
    /// Single alkaline cell (AA, AAA)
    Alkaline,
    /// Series packs of alkaline cells (2xAAA, 9V, ...)
    AlkalineMultiCell,
    /// Rechargeable lithium-ion
    LithiumIon,
    /// Rechargeable lithium-polymer
    LithiumPolymer,
}

/// One control point on a discharge curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Terminal voltage
    pub volts: f64,
    /// Remaining charge at that voltage
    pub percent: u8,
}

/// Immutable specification for one battery type
///
/// Voltage fields scale linearly with `cell_count` for series packs.
/// `capacity_mah` and `self_discharge_pct_per_year` are informational and
/// take no part in the estimation math.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryProfile {
    /// Registry key, e.g. `"CR2032"` or `"2xAAA"`
    pub type_id: &'static str,
    /// Chemistry family
    pub chemistry: Chemistry,
    /// Series cells in the pack
    pub cell_count: u8,
    /// Nominal pack voltage
    pub nominal_volts: f64,
    /// Voltage of a brand-new pack
    pub fresh_volts: f64,
    /// Voltage considered 100% in service
    pub full_volts: f64,
    /// Voltage at the low battery knee
    pub low_volts: f64,
    /// Voltage below which the pack is exhausted
    pub dead_volts: f64,
    /// Rated capacity in milliamp hours
    pub capacity_mah: u32,
    /// Shelf loss per year
    pub self_discharge_pct_per_year: f64,
    /// Volts lost per degree below the 20°C reference; negative
    pub temp_coefficient_volts_per_degree: f64,
    /// Discharge curve, strictly descending in voltage and percentage
    pub discharge_curve: Vec<CurvePoint>,
}

impl BatteryProfile {
    /// Check the structural invariants of this profile
    ///
    /// Thresholds must satisfy `fresh >= full > low > dead` and the curve
    /// must descend strictly in both voltage and percentage, starting at
    /// 100% and ending at 0%.
    pub fn is_well_formed(&self) -> bool {
        if self.cell_count == 0 {
            return false;
        }
        if !(self.fresh_volts >= self.full_volts
            && self.full_volts > self.low_volts
            && self.low_volts > self.dead_volts)
        {
            return false;
        }
        let curve = &self.discharge_curve;
        if curve.len() < 2 {
            return false;
        }
        if curve[0].percent != 100 || curve[curve.len() - 1].percent != 0 {
            return false;
        }
        curve
            .windows(2)
            .all(|pair| pair[0].volts > pair[1].volts && pair[0].percent > pair[1].percent)
    }
}
