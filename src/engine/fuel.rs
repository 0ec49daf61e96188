//! Fixed-multiplier excess fuel model.
//!
//! Congestion level is proxied entirely by the per-class multiplier, not by
//! the observed delay of a sample: delay at per-sample granularity is noisy,
//! so the model only uses it to decide whether a sample is congested at all
//! (see [`DelayGating`](crate::engine::types::DelayGating)), never to scale
//! the penalty. An earlier delay-duration-scaled variant of this model was
//! retired; the two must not be blended.

use crate::catalog::VehicleClass;
use tracing::debug;

/// Liters of fuel burned beyond free-flow consumption, always >= 0.
///
/// free-flow = (base_fc / 100) * distance * volume; congested = free-flow *
/// multiplier; excess is the difference, clamped at zero.
pub fn excess_fuel(class: &VehicleClass, distance_km: f64, volume: u32) -> f64 {
    let free_flow = (class.base_fuel_consumption / 100.0) * distance_km * volume as f64;
    let congested = free_flow * class.congestion_multiplier;
    let excess = (congested - free_flow).max(0.0);

    debug!(
        class = %class.name,
        distance_km,
        volume,
        free_flow_liters = free_flow,
        congested_liters = congested,
        excess_liters = excess,
        "Excess fuel computed"
    );

    excess
}
