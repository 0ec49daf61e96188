//! Vehicle class registry.
//!
//! Each class carries the physical and economic parameters the cost models
//! need. The catalog is built once at startup and injected read-only into the
//! aggregation engine; nothing mutates it afterwards.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Fuel burned by a vehicle class. Costs and emissions are bucketed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FuelType::Petrol => write!(f, "petrol"),
            FuelType::Diesel => write!(f, "diesel"),
        }
    }
}

/// A vehicle class and its fixed parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleClass {
    /// Stable identifier, referenced by traffic samples.
    pub id: u32,
    pub name: String,
    pub fuel_type: FuelType,
    /// Liters per 100 km at free-flow speed.
    pub base_fuel_consumption: f64,
    /// Average persons per vehicle. Fractional; a bus is well above 1.
    pub occupancy: f64,
    /// Kilograms of CO2 per liter of this class's fuel.
    pub co2_factor: f64,
    /// Factor by which consumption increases under congestion, >= 1.
    pub congestion_multiplier: f64,
}

/// Read-only registry of vehicle classes, keyed by id.
#[derive(Debug, Clone)]
pub struct VehicleCatalog {
    classes: Vec<VehicleClass>,
}

impl VehicleCatalog {
    /// Builds a catalog, validating per-class invariants and id uniqueness.
    pub fn new(classes: Vec<VehicleClass>) -> Result<Self> {
        for class in &classes {
            ensure!(class.id > 0, "vehicle class id must be positive");
            ensure!(
                class.base_fuel_consumption > 0.0,
                "base fuel consumption must be positive for class {}",
                class.id
            );
            ensure!(
                class.occupancy > 0.0,
                "occupancy must be positive for class {}",
                class.id
            );
            ensure!(
                class.co2_factor > 0.0,
                "co2 factor must be positive for class {}",
                class.id
            );
            ensure!(
                class.congestion_multiplier >= 1.0,
                "congestion multiplier must be >= 1 for class {}",
                class.id
            );
            ensure!(
                classes.iter().filter(|c| c.id == class.id).count() == 1,
                "duplicate vehicle class id {}",
                class.id
            );
        }
        Ok(Self { classes })
    }

    /// The built-in vehicle mix used by the application.
    pub fn default_catalog() -> Self {
        let classes = vec![
            VehicleClass {
                id: 1,
                name: "Car (Petrol)".to_string(),
                fuel_type: FuelType::Petrol,
                base_fuel_consumption: 8.0,
                occupancy: 1.5,
                co2_factor: 2.31,
                congestion_multiplier: 1.5,
            },
            VehicleClass {
                id: 2,
                name: "SUV (Petrol)".to_string(),
                fuel_type: FuelType::Petrol,
                base_fuel_consumption: 12.0,
                occupancy: 1.8,
                co2_factor: 2.31,
                congestion_multiplier: 1.6,
            },
            VehicleClass {
                id: 3,
                name: "Bus (Diesel)".to_string(),
                fuel_type: FuelType::Diesel,
                base_fuel_consumption: 25.0,
                occupancy: 25.0,
                co2_factor: 2.68,
                congestion_multiplier: 1.4,
            },
            VehicleClass {
                id: 4,
                name: "Truck (Diesel)".to_string(),
                fuel_type: FuelType::Diesel,
                base_fuel_consumption: 35.0,
                occupancy: 1.2,
                co2_factor: 2.68,
                congestion_multiplier: 1.4,
            },
            VehicleClass {
                id: 5,
                name: "Motorcycle (Petrol)".to_string(),
                fuel_type: FuelType::Petrol,
                base_fuel_consumption: 3.0,
                occupancy: 1.2,
                co2_factor: 2.31,
                congestion_multiplier: 1.3,
            },
        ];

        // The built-in table satisfies every invariant.
        Self::new(classes).unwrap()
    }

    /// Looks up a class by id. Not-found is not fatal; callers skip the
    /// offending sample and continue.
    pub fn lookup(&self, id: u32) -> Option<&VehicleClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
