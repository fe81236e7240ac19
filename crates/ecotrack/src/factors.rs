//! Built-in emission factors and the emission calculator.
//!
//! This module provides the static factor table converting activity
//! quantities (km, kWh, kg) into kg CO2e, and the pure calculation over
//! it.

use serde::Serialize;

use crate::activity::{ActivityDetails, Category};
use crate::error::{Error, Result};

/// A single emission factor: kg CO2e per unit of activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionFactor {
    /// Category this factor belongs to.
    pub category: Category,

    /// Activity kind within the category.
    pub kind: &'static str,

    /// Variant within the kind (fuel for car, flight class for flight),
    /// when the kind carries more than one factor.
    pub variant: Option<&'static str>,

    /// kg CO2e emitted per unit of quantity.
    pub factor: f64,

    /// Unit the activity quantity is measured in.
    pub unit: &'static str,
}

impl EmissionFactor {
    /// Create a new emission factor.
    #[must_use]
    pub fn new(
        category: Category,
        kind: &'static str,
        variant: Option<&'static str>,
        factor: f64,
        unit: &'static str,
    ) -> Self {
        Self {
            category,
            kind,
            variant,
            factor,
            unit,
        }
    }
}

/// Get all built-in emission factors.
///
/// For kinds with variants, the default variant (petrol, domestic) is
/// listed first; [`FactorTable::default_for`] relies on that order.
#[must_use]
pub fn builtin_factors() -> Vec<EmissionFactor> {
    use Category::{Energy, Food, Transportation};
    vec![
        // Transportation (per km)
        EmissionFactor::new(Transportation, "car", Some("petrol"), 2.31, "km"),
        EmissionFactor::new(Transportation, "car", Some("diesel"), 2.68, "km"),
        EmissionFactor::new(Transportation, "car", Some("hybrid"), 1.28, "km"),
        EmissionFactor::new(Transportation, "car", Some("electric"), 0.45, "km"),
        EmissionFactor::new(Transportation, "flight", Some("domestic"), 0.255, "km"),
        EmissionFactor::new(Transportation, "flight", Some("international"), 0.195, "km"),
        EmissionFactor::new(Transportation, "train", None, 0.041, "km"),
        EmissionFactor::new(Transportation, "bus", None, 0.089, "km"),
        EmissionFactor::new(Transportation, "motorcycle", None, 1.15, "km"),
        // Energy
        EmissionFactor::new(Energy, "electricity", None, 0.448, "kWh"),
        EmissionFactor::new(Energy, "gas", None, 1.85, "m³"),
        EmissionFactor::new(Energy, "coal", None, 2.42, "kg"),
        EmissionFactor::new(Energy, "lpg", None, 2.98, "kg"),
        // Food (per kg)
        EmissionFactor::new(Food, "beef", None, 60.0, "kg"),
        EmissionFactor::new(Food, "chicken", None, 6.9, "kg"),
        EmissionFactor::new(Food, "pork", None, 7.6, "kg"),
        EmissionFactor::new(Food, "fish", None, 6.1, "kg"),
        EmissionFactor::new(Food, "dairy", None, 3.2, "kg"),
        EmissionFactor::new(Food, "vegetables", None, 0.4, "kg"),
        EmissionFactor::new(Food, "grains", None, 1.9, "kg"),
    ]
}

/// The static factor table, loaded once at process start and never
/// mutated.
#[derive(Debug, Clone)]
pub struct FactorTable {
    entries: Vec<EmissionFactor>,
}

impl FactorTable {
    /// Build the table from the built-in factors.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: builtin_factors(),
        }
    }

    /// Look up the factor matching category, kind, and variant exactly.
    #[must_use]
    pub fn find(
        &self,
        category: Category,
        kind: &str,
        variant: Option<&str>,
    ) -> Option<&EmissionFactor> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.kind == kind && e.variant == variant)
    }

    /// Look up the default factor for a kind: its first table entry.
    #[must_use]
    pub fn default_for(&self, category: Category, kind: &str) -> Option<&EmissionFactor> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.kind == kind)
    }

    /// Check whether any factor exists for the given kind.
    #[must_use]
    pub fn contains(&self, category: Category, kind: &str) -> bool {
        self.default_for(category, kind).is_some()
    }

    /// All kinds under a category, in table order.
    #[must_use]
    pub fn kinds(&self, category: Category) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        for entry in &self.entries {
            if entry.category == category && !kinds.contains(&entry.kind) {
                kinds.push(entry.kind);
            }
        }
        kinds
    }

    /// Iterate over every factor in the table.
    pub fn iter(&self) -> impl Iterator<Item = &EmissionFactor> {
        self.entries.iter()
    }

    /// Number of factors in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FactorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Round a kg CO2e amount to 2 decimal places, the precision amounts are
/// stored and displayed at.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the emission amount for an activity.
///
/// The quantity is read from the detail variant matching the category
/// (distance for transportation, usage for energy, quantity for food);
/// a missing or mismatched variant counts as zero quantity rather than an
/// error. The variant factor (fuel, flight class) falls back to the
/// kind's default when the details carry none. The result is rounded to
/// 2 decimal places.
///
/// # Errors
///
/// Returns [`Error::UnknownActivity`] when the table has no factor for
/// `(category, kind)`.
pub fn calculate(
    table: &FactorTable,
    category: Category,
    kind: &str,
    details: &ActivityDetails,
) -> Result<f64> {
    let factor = table
        .find(category, kind, variant_name(details))
        .or_else(|| table.default_for(category, kind))
        .ok_or_else(|| Error::unknown_activity(category.to_string(), kind))?;
    Ok(round2(quantity_for(category, details) * factor.factor))
}

fn variant_name(details: &ActivityDetails) -> Option<&'static str> {
    match details {
        ActivityDetails::Car { fuel_type, .. } => Some(fuel_type.as_str()),
        ActivityDetails::Flight { flight_type, .. } => Some(flight_type.as_str()),
        _ => None,
    }
}

fn quantity_for(category: Category, details: &ActivityDetails) -> f64 {
    match category {
        Category::Transportation => match details {
            ActivityDetails::Car { distance_km, .. }
            | ActivityDetails::Flight { distance_km, .. }
            | ActivityDetails::Transit { distance_km } => *distance_km,
            _ => 0.0,
        },
        Category::Energy => match details {
            ActivityDetails::Energy { usage } => *usage,
            _ => 0.0,
        },
        Category::Food | Category::Other => match details {
            ActivityDetails::Food { quantity_kg } => *quantity_kg,
            _ => 0.0,
        },
    }
}
