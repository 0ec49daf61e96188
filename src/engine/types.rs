//! Data types produced and consumed by the aggregation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a sample with zero computed delay still pays the fixed-multiplier
/// fuel penalty.
///
/// The multiplier model charges excess fuel from distance, volume, and the
/// class multiplier alone; observed delay only says whether a sample was
/// congested at all. Which samples should pay is a policy choice, so it is an
/// explicit parameter rather than a hard-coded branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DelayGating {
    /// Charge the multiplier excess for every matched sample, congested or
    /// not. Matches the historical behavior of the system.
    #[default]
    Always,
    /// Samples with zero delay contribute no excess fuel or CO2. They still
    /// count toward the vehicle total.
    CongestedOnly,
}

impl std::fmt::Display for DelayGating {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DelayGating::Always => write!(f, "always"),
            DelayGating::CongestedOnly => write!(f, "congested-only"),
        }
    }
}

/// Inputs to one aggregation run, echoed back into the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub location: String,
    /// Inclusive, ISO-8601 (`YYYY-MM-DD`).
    pub date_range_start: String,
    /// Inclusive.
    pub date_range_end: String,
    /// Monetary rate per person-hour of delay.
    pub value_of_time: f64,
    /// Price per liter.
    pub petrol_price: f64,
    /// Price per liter.
    pub diesel_price: f64,
    /// km/h, recorded for the report; the multiplier model does not use it.
    pub free_flow_speed: f64,
    pub delay_gating: DelayGating,
}

/// One aggregation run's output. Appended to the results log and immutable
/// thereafter; retrieved later by id for report regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub location: String,
    pub date_range_start: String,
    pub date_range_end: String,

    // liters
    pub total_excess_fuel: f64,
    pub excess_fuel_petrol: f64,
    pub excess_fuel_diesel: f64,

    // monetary
    pub total_excess_fuel_cost: f64,
    pub fuel_cost_petrol: f64,
    pub fuel_cost_diesel: f64,

    // kilograms
    pub total_co2_emissions: f64,
    pub co2_emissions_petrol: f64,
    pub co2_emissions_diesel: f64,

    pub total_productivity_loss: f64,
    /// Fuel cost plus productivity loss.
    pub total_economic_cost: f64,
    pub total_vehicles: u64,

    // echoed parameters
    pub value_of_time: f64,
    pub petrol_price: f64,
    pub diesel_price: f64,
    pub free_flow_speed: f64,
}

/// Outcome of a run. An empty filtered sample set is a distinct shape, not a
/// zero-filled result; presentation collaborators must branch on it.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    NoData,
    Completed(AnalysisResult),
}

impl AnalysisOutcome {
    pub fn as_result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Completed(result) => Some(result),
            AnalysisOutcome::NoData => None,
        }
    }
}
