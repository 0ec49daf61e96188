//! Presentation seams for an analysis result.
//!
//! Chart and document rendering are opaque collaborators behind narrow
//! traits; the only logic that lives here is extracting the (label, value)
//! series the chart renderer consumes and a plain-text report document used
//! by the CLI. A renderer failure never touches the already-persisted result.

use crate::catalog::FuelType;
use crate::engine::types::AnalysisResult;
use anyhow::Result;
use std::fmt::Write as _;

/// Cost-distribution series: fuel cost vs. productivity loss.
pub fn cost_distribution_series(result: &AnalysisResult) -> Vec<(String, f64)> {
    vec![
        ("Fuel Cost".to_string(), result.total_excess_fuel_cost),
        (
            "Productivity Loss".to_string(),
            result.total_productivity_loss,
        ),
    ]
}

/// Emissions series: total excess CO2.
pub fn emissions_series(result: &AnalysisResult) -> Vec<(String, f64)> {
    vec![("CO2 Emissions".to_string(), result.total_co2_emissions)]
}

/// Renders a (label, value) series into an image. Implementations live
/// outside the core.
pub trait ChartRenderer {
    fn render(&self, series: &[(String, f64)], title: &str) -> Result<Vec<u8>>;
}

/// Renders a full analysis result into a downloadable document.
pub trait ReportRenderer {
    fn render(&self, result: &AnalysisResult) -> Result<Vec<u8>>;
}

/// Plain-text report: the full record plus a per-fuel-type breakdown table.
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render(&self, result: &AnalysisResult) -> Result<Vec<u8>> {
        let mut out = String::new();

        writeln!(out, "Traffic Congestion Cost Report - {}", result.location)?;
        writeln!(
            out,
            "Date range: {} to {}",
            result.date_range_start, result.date_range_end
        )?;
        writeln!(out, "Generated: {}", result.analysis_timestamp.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(out, "Result id: {}", result.id)?;
        writeln!(out)?;

        writeln!(out, "Totals")?;
        writeln!(out, "  Vehicles counted:      {}", result.total_vehicles)?;
        writeln!(out, "  Excess fuel:           {:.2} L", result.total_excess_fuel)?;
        writeln!(out, "  Excess fuel cost:      {:.2}", result.total_excess_fuel_cost)?;
        writeln!(out, "  CO2 emissions:         {:.2} kg", result.total_co2_emissions)?;
        writeln!(out, "  Productivity loss:     {:.2}", result.total_productivity_loss)?;
        writeln!(out, "  Total economic cost:   {:.2}", result.total_economic_cost)?;
        writeln!(out)?;

        writeln!(out, "Breakdown by fuel type")?;
        writeln!(out, "  {:<8} {:>14} {:>14} {:>14}", "fuel", "excess (L)", "cost", "CO2 (kg)")?;
        for (fuel, liters, cost, co2) in [
            (
                FuelType::Petrol,
                result.excess_fuel_petrol,
                result.fuel_cost_petrol,
                result.co2_emissions_petrol,
            ),
            (
                FuelType::Diesel,
                result.excess_fuel_diesel,
                result.fuel_cost_diesel,
                result.co2_emissions_diesel,
            ),
        ] {
            writeln!(out, "  {:<8} {:>14.2} {:>14.2} {:>14.2}", fuel, liters, cost, co2)?;
        }
        writeln!(out)?;

        writeln!(out, "Parameters")?;
        writeln!(out, "  Value of time:         {:.2} per person-hour", result.value_of_time)?;
        writeln!(out, "  Petrol price:          {:.2} per liter", result.petrol_price)?;
        writeln!(out, "  Diesel price:          {:.2} per liter", result.diesel_price)?;
        writeln!(out, "  Free-flow speed:       {:.1} km/h", result.free_flow_speed)?;

        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_result() -> AnalysisResult {
        AnalysisResult {
            id: "20260305120000".to_string(),
            analysis_timestamp: Utc::now(),
            location: "Lagos".to_string(),
            date_range_start: "2026-03-01".to_string(),
            date_range_end: "2026-03-31".to_string(),
            total_excess_fuel: 60.0,
            excess_fuel_petrol: 40.0,
            excess_fuel_diesel: 20.0,
            total_excess_fuel_cost: 10000.0,
            fuel_cost_petrol: 6000.0,
            fuel_cost_diesel: 4000.0,
            total_co2_emissions: 146.0,
            co2_emissions_petrol: 92.4,
            co2_emissions_diesel: 53.6,
            total_productivity_loss: 3750.0,
            total_economic_cost: 13750.0,
            total_vehicles: 110,
            value_of_time: 50.0,
            petrol_price: 150.0,
            diesel_price: 200.0,
            free_flow_speed: 80.0,
        }
    }

    #[test]
    fn test_cost_distribution_series_shape() {
        let series = cost_distribution_series(&test_result());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], ("Fuel Cost".to_string(), 10000.0));
        assert_eq!(series[1], ("Productivity Loss".to_string(), 3750.0));
    }

    #[test]
    fn test_emissions_series_shape() {
        let series = emissions_series(&test_result());
        assert_eq!(series, vec![("CO2 Emissions".to_string(), 146.0)]);
    }

    #[test]
    fn test_text_report_contains_breakdown() {
        let bytes = TextReport.render(&test_result()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("Lagos"));
        assert!(text.contains("petrol"));
        assert!(text.contains("diesel"));
        assert!(text.contains("13750.00"));
        assert!(text.contains("2026-03-01 to 2026-03-31"));
    }
}
