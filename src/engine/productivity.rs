//! Productivity loss from congestion delay.
//!
//! Vehicle-hours of delay become person-hours via occupancy, monetized at the
//! configured value-of-time rate.

use crate::catalog::VehicleClass;

/// Delay in hours, from travel times in minutes. Negative raw delay (actual
/// below free-flow, i.e. measurement noise) clamps to zero.
pub fn delay_hours(actual_travel_time: f64, free_flow_travel_time: f64) -> f64 {
    (actual_travel_time - free_flow_travel_time).max(0.0) / 60.0
}

/// Monetary productivity loss:
/// delay_hours * volume * occupancy * value_of_time.
pub fn loss(delay_hours: f64, volume: u32, class: &VehicleClass, value_of_time: f64) -> f64 {
    let vehicle_hours = delay_hours * volume as f64;
    let person_hours = vehicle_hours * class.occupancy;
    person_hours * value_of_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FuelType, VehicleClass};

    fn class_with_occupancy(occupancy: f64) -> VehicleClass {
        VehicleClass {
            id: 1,
            name: "Test".to_string(),
            fuel_type: FuelType::Petrol,
            base_fuel_consumption: 8.0,
            occupancy,
            co2_factor: 2.31,
            congestion_multiplier: 1.5,
        }
    }

    #[test]
    fn test_worked_example() {
        // 30 min delay, 100 vehicles, occupancy 1.5, value of time 50:
        // 0.5h * 100 * 1.5 * 50 = 3750.
        let hours = delay_hours(45.0, 15.0);
        assert_eq!(hours, 0.5);

        let loss = loss(hours, 100, &class_with_occupancy(1.5), 50.0);
        assert!((loss - 3750.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_delay_clamps_to_zero() {
        assert_eq!(delay_hours(10.0, 15.0), 0.0);
        let loss = loss(delay_hours(10.0, 15.0), 100, &class_with_occupancy(1.5), 50.0);
        assert_eq!(loss, 0.0);
    }

    #[test]
    fn test_monotone_in_each_factor() {
        let class = class_with_occupancy(1.5);
        let base = loss(0.5, 100, &class, 50.0);

        assert!(loss(0.6, 100, &class, 50.0) >= base);
        assert!(loss(0.5, 120, &class, 50.0) >= base);
        assert!(loss(0.5, 100, &class_with_occupancy(2.0), 50.0) >= base);
        assert!(loss(0.5, 100, &class, 60.0) >= base);
    }
}
