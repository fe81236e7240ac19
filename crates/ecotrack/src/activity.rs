//! Core emission-activity types for ecotrack.
//!
//! This module defines the fundamental data structures for representing
//! emission-producing activities and the records they produce.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Top-level grouping of emission-producing activities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Travel by road, rail, or air.
    Transportation,
    /// Household energy consumption.
    Energy,
    /// Food production emissions.
    Food,
    /// Everything else. Accepts the legacy `lifestyle` name on input.
    #[serde(alias = "lifestyle")]
    Other,
}

impl Category {
    /// All categories, in display order.
    #[must_use]
    pub fn all() -> [Self; 4] {
        [Self::Transportation, Self::Energy, Self::Food, Self::Other]
    }

    /// Parse a category from its lowercase name.
    ///
    /// `lifestyle` is accepted as an alias for `other`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "transportation" => Some(Self::Transportation),
            "energy" => Some(Self::Energy),
            "food" => Some(Self::Food),
            "other" | "lifestyle" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transportation => write!(f, "transportation"),
            Self::Energy => write!(f, "energy"),
            Self::Food => write!(f, "food"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Fuel powering a car journey. Selects the per-km factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    /// Petrol engine (the default when unspecified).
    #[default]
    Petrol,
    /// Diesel engine.
    Diesel,
    /// Petrol-electric hybrid.
    Hybrid,
    /// Battery electric (grid-charged).
    Electric,
}

impl FuelType {
    /// The lowercase name used in the factor table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "petrol",
            Self::Diesel => "diesel",
            Self::Hybrid => "hybrid",
            Self::Electric => "electric",
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flight distance class. Selects the per-km factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightType {
    /// Short-haul domestic flight (the default when unspecified).
    #[default]
    Domestic,
    /// Long-haul international flight.
    International,
}

impl FlightType {
    /// The lowercase name used in the factor table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domestic => "domestic",
            Self::International => "international",
        }
    }
}

impl std::fmt::Display for FlightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured measurements behind an emission record, one variant per
/// activity shape.
///
/// Numeric fields default to zero when absent from serialized input; the
/// calculator treats a variant that does not match the activity kind as a
/// zero quantity rather than raising an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "activity", rename_all = "snake_case")]
pub enum ActivityDetails {
    /// A car journey.
    Car {
        /// Distance driven, in km.
        #[serde(default)]
        distance_km: f64,
        /// Fuel powering the car.
        #[serde(default)]
        fuel_type: FuelType,
    },
    /// A flight.
    Flight {
        /// Distance flown, in km.
        #[serde(default)]
        distance_km: f64,
        /// Domestic or international.
        #[serde(default)]
        flight_type: FlightType,
    },
    /// Train, bus, or motorcycle travel.
    Transit {
        /// Distance travelled, in km.
        #[serde(default)]
        distance_km: f64,
    },
    /// Household energy consumption.
    Energy {
        /// Amount consumed, in the unit of the energy kind
        /// (kWh for electricity, m³ for gas, kg for coal and LPG).
        #[serde(default)]
        usage: f64,
    },
    /// Food consumption.
    Food {
        /// Quantity consumed, in kg.
        #[serde(default)]
        quantity_kg: f64,
    },
    /// Manual entry with no structured measurements.
    #[default]
    None,
}

impl ActivityDetails {
    /// Check whether this entry carries no structured measurements.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A single logged emission.
///
/// Immutable once stored; records are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// Unique identifier, monotonically increasing across the full
    /// collection (assigned by the store).
    pub id: i64,

    /// The user who logged this emission.
    pub user_id: i64,

    /// Top-level activity grouping.
    pub category: Category,

    /// Specific activity within the category (key into the factor table).
    pub kind: String,

    /// Emission amount in kg CO2e, rounded to 2 decimal places.
    pub amount: f64,

    /// Calendar day the activity took place.
    pub date: NaiveDate,

    /// Free-text description.
    pub description: String,

    /// Structured measurements, when the entry came through the calculator.
    #[serde(default)]
    pub details: ActivityDetails,
}

impl EmissionRecord {
    /// Composite `category-kind` key used by the source breakdown.
    #[must_use]
    pub fn source_key(&self) -> String {
        format!("{}-{}", self.category, self.kind)
    }

    /// Calendar month of this record as a sortable `YYYY-MM` key.
    #[must_use]
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Input form for a new emission entry, before validation and id
/// assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// Top-level activity grouping.
    pub category: Category,
    /// Specific activity within the category.
    pub kind: String,
    /// Emission amount in kg CO2e. When `None` the amount is computed
    /// from `details` via the factor table.
    pub amount: Option<f64>,
    /// Calendar day of the activity; today when unspecified.
    pub date: Option<NaiveDate>,
    /// Free-text description.
    pub description: String,
    /// Structured measurements for the calculator.
    pub details: ActivityDetails,
}

/// Validate a resolved manual entry.
///
/// Returns one [`FieldError`] per offending field so callers can surface
/// every message next to its input. An empty result means the entry may be
/// stored.
#[must_use]
pub fn validate_entry(amount: f64, description: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !amount.is_finite() || amount <= 0.0 {
        errors.push(FieldError {
            field: "amount",
            message: "Please enter a valid emission amount".to_string(),
        });
    }
    errors.extend(validate_description(description));
    errors
}

/// Validate just the description field.
///
/// Calculated entries skip the amount check (a zero result is stored as
/// is) but still need a description.
#[must_use]
pub fn validate_description(description: &str) -> Vec<FieldError> {
    if description.trim().is_empty() {
        vec![FieldError {
            field: "description",
            message: "Please enter a description".to_string(),
        }]
    } else {
        Vec::new()
    }
}
