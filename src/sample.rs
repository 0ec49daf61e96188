//! Traffic sample records and the data-entry boundary.
//!
//! Validation happens here, before a sample reaches the store: a rejected
//! submission is never appended. The aggregation engine itself only ever sees
//! already-validated records and handles the one remaining failure mode (an
//! unresolvable vehicle class id) by skipping.

use anyhow::{Result, ensure};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// One observed traffic record. Append-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSample {
    /// Creation-timestamp-derived, unique within a store.
    pub id: String,
    pub location: String,
    /// ISO-8601 date (`YYYY-MM-DD`), sortable as a string.
    pub date: String,
    pub time: String,
    pub vehicle_class_id: u32,
    /// Vehicle count.
    pub volume: u32,
    /// Minutes. May be below the free-flow time (measurement noise).
    pub actual_travel_time: f64,
    /// Minutes.
    pub free_flow_travel_time: f64,
    pub distance_km: f64,
}

impl TrafficSample {
    /// Validates a submission and stamps it with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        location: &str,
        date: &str,
        time: &str,
        vehicle_class_id: u32,
        volume: u32,
        actual_travel_time: f64,
        free_flow_travel_time: f64,
        distance_km: f64,
    ) -> Result<Self> {
        ensure!(!location.trim().is_empty(), "location is required");
        ensure!(!date.trim().is_empty(), "date is required");
        ensure!(!time.trim().is_empty(), "time is required");
        ensure!(
            actual_travel_time.is_finite() && actual_travel_time >= 0.0,
            "actual travel time must be a non-negative number"
        );
        ensure!(
            free_flow_travel_time.is_finite() && free_flow_travel_time >= 0.0,
            "free-flow travel time must be a non-negative number"
        );
        ensure!(
            distance_km.is_finite() && distance_km > 0.0,
            "distance must be positive"
        );

        Ok(Self {
            id: timestamp_id(),
            location: location.trim().to_string(),
            date: date.trim().to_string(),
            time: time.trim().to_string(),
            vehicle_class_id,
            volume,
            actual_travel_time,
            free_flow_travel_time,
            distance_km,
        })
    }

    /// Observed delay in minutes, floored at zero. Negative raw delay is
    /// measurement noise, never a credit.
    pub fn delay_minutes(&self) -> f64 {
        (self.actual_travel_time - self.free_flow_travel_time).max(0.0)
    }
}

/// Generates a creation-timestamp id with nanosecond precision.
pub fn timestamp_id() -> String {
    Utc::now().format("%Y%m%d%H%M%S%f").to_string()
}

/// One row of a bulk-import CSV, before validation.
#[derive(Debug, Deserialize)]
struct SampleRow {
    location: String,
    date: String,
    time: String,
    vehicle_class_id: u32,
    volume: u32,
    actual_travel_time: f64,
    free_flow_travel_time: f64,
    distance_km: f64,
}

/// Reads traffic samples from a CSV file.
///
/// A malformed row is logged and skipped; the remaining rows still import.
/// Returns the validated samples together with the number of rows skipped.
pub fn import_csv(path: &Path) -> Result<(Vec<TrafficSample>, usize)> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for (line, result) in rdr.deserialize::<SampleRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(line = line + 2, error = %e, "Skipping unparseable CSV row");
                skipped += 1;
                continue;
            }
        };

        match TrafficSample::new(
            &row.location,
            &row.date,
            &row.time,
            row.vehicle_class_id,
            row.volume,
            row.actual_travel_time,
            row.free_flow_travel_time,
            row.distance_km,
        ) {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                warn!(line = line + 2, error = %e, "Skipping invalid CSV row");
                skipped += 1;
            }
        }
    }

    debug!(imported = samples.len(), skipped, "CSV import finished");
    Ok((samples, skipped))
}
