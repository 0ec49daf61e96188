//! Aggregation over a filtered traffic sample set.

use crate::catalog::{FuelType, VehicleCatalog};
use crate::engine::types::{AnalysisOutcome, AnalysisParams, AnalysisResult, DelayGating};
use crate::engine::{emission, fuel, productivity};
use crate::sample::{TrafficSample, timestamp_id};
use chrono::Utc;
use tracing::{debug, warn};

/// Runs one aggregation over `samples` and packages the totals into an
/// [`AnalysisResult`].
///
/// Filters to samples matching the location exactly whose date falls inside
/// the inclusive range (lexicographic comparison over ISO-8601 date strings),
/// feeds each one through the fuel, emission, and productivity models, and
/// derives cost totals from the unit prices. An empty filtered set yields
/// [`AnalysisOutcome::NoData`]; a sample with an unresolvable vehicle class id
/// is skipped, never an error.
pub fn run(
    samples: &[TrafficSample],
    catalog: &VehicleCatalog,
    params: &AnalysisParams,
) -> AnalysisOutcome {
    let filtered: Vec<&TrafficSample> = samples
        .iter()
        .filter(|s| {
            s.location == params.location
                && params.date_range_start <= s.date
                && s.date <= params.date_range_end
        })
        .collect();

    if filtered.is_empty() {
        debug!(
            location = %params.location,
            start = %params.date_range_start,
            end = %params.date_range_end,
            "No samples matched the filter"
        );
        return AnalysisOutcome::NoData;
    }

    let mut total_excess_fuel = 0.0;
    let mut excess_fuel_petrol = 0.0;
    let mut excess_fuel_diesel = 0.0;
    let mut total_co2 = 0.0;
    let mut co2_petrol = 0.0;
    let mut co2_diesel = 0.0;
    let mut total_productivity_loss = 0.0;
    let mut total_vehicles = 0u64;
    let mut skipped = 0usize;

    for sample in &filtered {
        let Some(class) = catalog.lookup(sample.vehicle_class_id) else {
            warn!(
                sample_id = %sample.id,
                vehicle_class_id = sample.vehicle_class_id,
                "Unknown vehicle class, skipping sample"
            );
            skipped += 1;
            continue;
        };

        let delay_minutes = sample.delay_minutes();
        let delay_hours = productivity::delay_hours(
            sample.actual_travel_time,
            sample.free_flow_travel_time,
        );

        let excess = match params.delay_gating {
            DelayGating::CongestedOnly if delay_minutes <= 0.0 => 0.0,
            _ => fuel::excess_fuel(class, sample.distance_km, sample.volume),
        };
        let co2 = emission::excess_co2(excess, class);
        let loss = productivity::loss(delay_hours, sample.volume, class, params.value_of_time);

        total_excess_fuel += excess;
        total_co2 += co2;
        match class.fuel_type {
            FuelType::Petrol => {
                excess_fuel_petrol += excess;
                co2_petrol += co2;
            }
            FuelType::Diesel => {
                excess_fuel_diesel += excess;
                co2_diesel += co2;
            }
        }
        total_productivity_loss += loss;
        total_vehicles += sample.volume as u64;

        debug!(
            sample_id = %sample.id,
            delay_minutes,
            excess_liters = excess,
            co2_kg = co2,
            productivity_loss = loss,
            "Sample processed"
        );
    }

    if skipped > 0 {
        warn!(skipped, total = filtered.len(), "Samples skipped during aggregation");
    }

    let fuel_cost_petrol = excess_fuel_petrol * params.petrol_price;
    let fuel_cost_diesel = excess_fuel_diesel * params.diesel_price;
    let total_excess_fuel_cost = fuel_cost_petrol + fuel_cost_diesel;
    let total_economic_cost = total_excess_fuel_cost + total_productivity_loss;

    AnalysisOutcome::Completed(AnalysisResult {
        id: timestamp_id(),
        analysis_timestamp: Utc::now(),
        location: params.location.clone(),
        date_range_start: params.date_range_start.clone(),
        date_range_end: params.date_range_end.clone(),
        total_excess_fuel,
        excess_fuel_petrol,
        excess_fuel_diesel,
        total_excess_fuel_cost,
        fuel_cost_petrol,
        fuel_cost_diesel,
        total_co2_emissions: total_co2,
        co2_emissions_petrol: co2_petrol,
        co2_emissions_diesel: co2_diesel,
        total_productivity_loss,
        total_economic_cost,
        total_vehicles,
        value_of_time: params.value_of_time,
        petrol_price: params.petrol_price,
        diesel_price: params.diesel_price,
        free_flow_speed: params.free_flow_speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VehicleCatalog;

    fn params(location: &str, start: &str, end: &str) -> AnalysisParams {
        AnalysisParams {
            location: location.to_string(),
            date_range_start: start.to_string(),
            date_range_end: end.to_string(),
            value_of_time: 50.0,
            petrol_price: 150.0,
            diesel_price: 200.0,
            free_flow_speed: 80.0,
            delay_gating: DelayGating::Always,
        }
    }

    fn sample(
        id: &str,
        location: &str,
        date: &str,
        class_id: u32,
        volume: u32,
        actual: f64,
        free_flow: f64,
        distance: f64,
    ) -> TrafficSample {
        TrafficSample {
            id: id.to_string(),
            location: location.to_string(),
            date: date.to_string(),
            time: "08:00".to_string(),
            vehicle_class_id: class_id,
            volume,
            actual_travel_time: actual,
            free_flow_travel_time: free_flow,
            distance_km: distance,
        }
    }

    #[test]
    fn test_empty_filter_yields_no_data() {
        let catalog = VehicleCatalog::default_catalog();
        let samples = vec![sample("1", "Abuja", "2026-03-01", 1, 100, 45.0, 15.0, 10.0)];

        let outcome = run(&samples, &catalog, &params("Lagos", "2026-03-01", "2026-03-31"));
        assert!(matches!(outcome, AnalysisOutcome::NoData));
    }

    #[test]
    fn test_single_petrol_car_sample() {
        let catalog = VehicleCatalog::default_catalog();
        // Class 1: base 8 L/100km, multiplier 1.5, occupancy 1.5, co2 2.31.
        let samples = vec![sample("1", "Lagos", "2026-03-05", 1, 100, 45.0, 15.0, 10.0)];

        let outcome = run(&samples, &catalog, &params("Lagos", "2026-03-01", "2026-03-31"));
        let result = outcome.as_result().unwrap();

        assert!((result.total_excess_fuel - 40.0).abs() < 1e-9);
        assert!((result.excess_fuel_petrol - 40.0).abs() < 1e-9);
        assert_eq!(result.excess_fuel_diesel, 0.0);
        assert!((result.total_co2_emissions - 92.4).abs() < 1e-9);
        assert!((result.total_productivity_loss - 3750.0).abs() < 1e-9);
        assert!((result.fuel_cost_petrol - 6000.0).abs() < 1e-9);
        assert!((result.total_economic_cost - 9750.0).abs() < 1e-9);
        assert_eq!(result.total_vehicles, 100);
    }

    #[test]
    fn test_per_fuel_cost_split() {
        let catalog = VehicleCatalog::default_catalog();
        // Petrol car: 40L excess. Bus (base 25, mult 1.4):
        // (25/100) * 20km * 10 vehicles * 0.4 = 20L excess.
        let samples = vec![
            sample("1", "Lagos", "2026-03-05", 1, 100, 45.0, 15.0, 10.0),
            sample("2", "Lagos", "2026-03-06", 3, 10, 50.0, 30.0, 20.0),
        ];

        let outcome = run(&samples, &catalog, &params("Lagos", "2026-03-01", "2026-03-31"));
        let result = outcome.as_result().unwrap();

        assert!((result.excess_fuel_petrol - 40.0).abs() < 1e-9);
        assert!((result.excess_fuel_diesel - 20.0).abs() < 1e-9);
        assert!((result.fuel_cost_petrol - 6000.0).abs() < 1e-9);
        assert!((result.fuel_cost_diesel - 4000.0).abs() < 1e-9);
        assert!((result.total_excess_fuel_cost - 10000.0).abs() < 1e-9);
        assert!(
            (result.total_economic_cost
                - (result.total_excess_fuel_cost + result.total_productivity_loss))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_order_independence() {
        let catalog = VehicleCatalog::default_catalog();
        let mut samples = vec![
            sample("1", "Lagos", "2026-03-05", 1, 100, 45.0, 15.0, 10.0),
            sample("2", "Lagos", "2026-03-06", 3, 10, 50.0, 30.0, 20.0),
            sample("3", "Lagos", "2026-03-07", 4, 25, 40.0, 35.0, 8.0),
        ];

        let p = params("Lagos", "2026-03-01", "2026-03-31");
        let a = run(&samples, &catalog, &p);
        samples.reverse();
        let b = run(&samples, &catalog, &p);

        let a = a.as_result().unwrap();
        let b = b.as_result().unwrap();
        assert_eq!(a.total_excess_fuel, b.total_excess_fuel);
        assert_eq!(a.total_co2_emissions, b.total_co2_emissions);
        assert_eq!(a.total_productivity_loss, b.total_productivity_loss);
        assert_eq!(a.total_vehicles, b.total_vehicles);
    }

    #[test]
    fn test_date_range_boundaries_inclusive() {
        let catalog = VehicleCatalog::default_catalog();
        let samples = vec![
            sample("1", "Lagos", "2026-02-28", 1, 10, 45.0, 15.0, 10.0),
            sample("2", "Lagos", "2026-03-01", 1, 20, 45.0, 15.0, 10.0),
            sample("3", "Lagos", "2026-03-31", 1, 30, 45.0, 15.0, 10.0),
            sample("4", "Lagos", "2026-04-01", 1, 40, 45.0, 15.0, 10.0),
        ];

        let outcome = run(&samples, &catalog, &params("Lagos", "2026-03-01", "2026-03-31"));
        let result = outcome.as_result().unwrap();

        // Only the two boundary-date samples are inside the range.
        assert_eq!(result.total_vehicles, 50);
    }

    #[test]
    fn test_unknown_vehicle_class_contributes_nothing() {
        let catalog = VehicleCatalog::default_catalog();
        let samples = vec![
            sample("1", "Lagos", "2026-03-05", 1, 100, 45.0, 15.0, 10.0),
            sample("2", "Lagos", "2026-03-05", 99, 500, 45.0, 15.0, 10.0),
        ];

        let outcome = run(&samples, &catalog, &params("Lagos", "2026-03-01", "2026-03-31"));
        let result = outcome.as_result().unwrap();

        assert_eq!(result.total_vehicles, 100);
        assert!((result.total_excess_fuel - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_delay_still_charged_by_default() {
        let catalog = VehicleCatalog::default_catalog();
        let samples = vec![sample("1", "Lagos", "2026-03-05", 1, 100, 15.0, 15.0, 10.0)];

        let outcome = run(&samples, &catalog, &params("Lagos", "2026-03-01", "2026-03-31"));
        let result = outcome.as_result().unwrap();

        // DelayGating::Always: the multiplier excess applies regardless of
        // delay, but productivity loss is zero.
        assert!((result.total_excess_fuel - 40.0).abs() < 1e-9);
        assert_eq!(result.total_productivity_loss, 0.0);
    }

    #[test]
    fn test_congested_only_gating_zeroes_free_flowing_samples() {
        let catalog = VehicleCatalog::default_catalog();
        let samples = vec![
            sample("1", "Lagos", "2026-03-05", 1, 100, 15.0, 15.0, 10.0),
            sample("2", "Lagos", "2026-03-05", 1, 100, 45.0, 15.0, 10.0),
        ];

        let mut p = params("Lagos", "2026-03-01", "2026-03-31");
        p.delay_gating = DelayGating::CongestedOnly;

        let outcome = run(&samples, &catalog, &p);
        let result = outcome.as_result().unwrap();

        // Only the delayed sample pays the fuel penalty; both count vehicles.
        assert!((result.total_excess_fuel - 40.0).abs() < 1e-9);
        assert!((result.total_co2_emissions - 92.4).abs() < 1e-9);
        assert_eq!(result.total_vehicles, 200);
    }

    #[test]
    fn test_params_echoed_into_result() {
        let catalog = VehicleCatalog::default_catalog();
        let samples = vec![sample("1", "Lagos", "2026-03-05", 1, 100, 45.0, 15.0, 10.0)];

        let outcome = run(&samples, &catalog, &params("Lagos", "2026-03-01", "2026-03-31"));
        let result = outcome.as_result().unwrap();

        assert_eq!(result.value_of_time, 50.0);
        assert_eq!(result.petrol_price, 150.0);
        assert_eq!(result.diesel_price, 200.0);
        assert_eq!(result.free_flow_speed, 80.0);
        assert_eq!(result.location, "Lagos");
    }
}
