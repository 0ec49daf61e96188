//! Excess CO2 from excess fuel.

use crate::catalog::VehicleClass;

/// Kilograms of CO2 attributable to `excess_fuel_liters` for this class.
///
/// Pure: negative excess fuel is a programming error upstream, not a runtime
/// condition this function recovers from.
pub fn excess_co2(excess_fuel_liters: f64, class: &VehicleClass) -> f64 {
    excess_fuel_liters * class.co2_factor
}
