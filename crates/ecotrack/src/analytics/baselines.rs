//! Baseline constants and comparison arithmetic.
//!
//! Totals are judged against fixed per-person annual averages and a
//! climate target, all in kg CO2e. These are constants of the product,
//! not configuration.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::activity::Category;
use crate::factors::round2;

/// National average annual footprint, kg CO2e per person.
pub const NATIONAL_AVERAGE_KG: f64 = 2800.0;

/// Global average annual footprint, kg CO2e per person.
pub const GLOBAL_AVERAGE_KG: f64 = 4800.0;

/// Climate target annual footprint, kg CO2e per person.
pub const TARGET_KG: f64 = 2000.0;

/// Baseline averages for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryBaseline {
    /// The category the averages describe.
    pub category: Category,

    /// National average for the category, kg CO2e.
    pub national: f64,

    /// Global average for the category, kg CO2e.
    pub global: f64,
}

/// Look up the baseline averages for a category.
#[must_use]
pub fn baseline_for(category: Category) -> CategoryBaseline {
    let (national, global) = match category {
        Category::Transportation => (1050.0, 1850.0),
        Category::Energy => (1150.0, 1950.0),
        Category::Food => (450.0, 750.0),
        Category::Other => (150.0, 250.0),
    };
    CategoryBaseline {
        category,
        national,
        global,
    }
}

/// The per-category baseline table, in category display order.
#[must_use]
pub fn category_baselines() -> [CategoryBaseline; 4] {
    Category::all().map(baseline_for)
}

/// Percentage above (positive) or below (negative) a baseline, rounded
/// to two decimal places. A zero baseline yields 0 rather than a
/// division error.
#[must_use]
pub fn percent_vs(total: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    round2((total - baseline) / baseline * 100.0)
}

/// Standing of an aggregate total against the fixed baselines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparisons {
    /// Percentage above or below the national average.
    pub vs_national_percent: f64,

    /// Percentage above or below the global average.
    pub vs_global_percent: f64,

    /// Progress toward the climate target as target / total x 100.
    pub target_progress_percent: f64,
}

impl Comparisons {
    /// Compute the comparisons for an aggregate total.
    ///
    /// A zero total reports zero target progress rather than a division
    /// error.
    #[must_use]
    pub fn for_total(total: f64) -> Self {
        let target_progress_percent = if total == 0.0 {
            0.0
        } else {
            round2(TARGET_KG / total * 100.0)
        };
        Self {
            vs_national_percent: percent_vs(total, NATIONAL_AVERAGE_KG),
            vs_global_percent: percent_vs(total, GLOBAL_AVERAGE_KG),
            target_progress_percent,
        }
    }
}

/// One category's standing against its own baselines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryComparison {
    /// The category.
    pub category: Category,

    /// Total for the category, kg CO2e.
    pub total: f64,

    /// Share of the combined total, percent.
    pub share_percent: f64,

    /// Percentage above or below the category's national average.
    pub vs_national_percent: f64,

    /// Percentage above or below the category's global average.
    pub vs_global_percent: f64,
}

/// Compare each category's total against its baselines.
///
/// Every category gets a row; categories absent from the map report a
/// zero total. Shares are of the combined total, zero when the combined
/// total is zero.
#[must_use]
pub fn category_comparisons(category_totals: &BTreeMap<Category, f64>) -> Vec<CategoryComparison> {
    let combined: f64 = category_totals.values().sum();

    Category::all()
        .iter()
        .map(|&category| {
            let total = category_totals.get(&category).copied().unwrap_or(0.0);
            let baseline = baseline_for(category);
            let share_percent = if combined == 0.0 {
                0.0
            } else {
                round2(total / combined * 100.0)
            };
            CategoryComparison {
                category,
                total,
                share_percent,
                vs_national_percent: percent_vs(total, baseline.national),
                vs_global_percent: percent_vs(total, baseline.global),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_percent_vs_national_average() {
        assert_close(percent_vs(3000.0, NATIONAL_AVERAGE_KG), 7.14);
    }

    #[test]
    fn test_percent_vs_below_baseline_is_negative() {
        assert_close(percent_vs(2100.0, NATIONAL_AVERAGE_KG), -25.0);
    }

    #[test]
    fn test_percent_vs_zero_baseline() {
        assert_close(percent_vs(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_comparisons_for_total() {
        let comparisons = Comparisons::for_total(3000.0);
        assert_close(comparisons.vs_national_percent, 7.14);
        assert_close(comparisons.vs_global_percent, -37.5);
        assert_close(comparisons.target_progress_percent, 66.67);
    }

    #[test]
    fn test_comparisons_zero_total() {
        let comparisons = Comparisons::for_total(0.0);
        assert_close(comparisons.vs_national_percent, -100.0);
        assert_close(comparisons.vs_global_percent, -100.0);
        assert_close(comparisons.target_progress_percent, 0.0);
    }

    #[test]
    fn test_category_baselines_cover_every_category() {
        let baselines = category_baselines();
        let categories: Vec<Category> = baselines.iter().map(|b| b.category).collect();
        assert_eq!(categories, Category::all().to_vec());
    }

    #[test]
    fn test_baseline_for() {
        let energy = baseline_for(Category::Energy);
        assert_close(energy.national, 1150.0);
        assert_close(energy.global, 1950.0);
    }

    #[test]
    fn test_category_comparisons_shares() {
        let mut totals = BTreeMap::new();
        totals.insert(Category::Transportation, 500.0);
        totals.insert(Category::Energy, 500.0);

        let rows = category_comparisons(&totals);
        assert_eq!(rows.len(), 4);
        assert_close(rows[0].share_percent, 50.0);
        assert_close(rows[1].share_percent, 50.0);
        assert_close(rows[2].total, 0.0);
        assert_close(rows[2].share_percent, 0.0);
        assert_close(rows[2].vs_national_percent, -100.0);
    }

    #[test]
    fn test_category_comparisons_empty() {
        let rows = category_comparisons(&BTreeMap::new());
        assert_eq!(rows.len(), 4);
        for row in rows {
            assert_close(row.total, 0.0);
            assert_close(row.share_percent, 0.0);
        }
    }

    #[test]
    fn test_category_comparison_against_own_baseline() {
        let mut totals = BTreeMap::new();
        totals.insert(Category::Food, 450.0);

        let rows = category_comparisons(&totals);
        let food = rows.iter().find(|r| r.category == Category::Food).unwrap();
        assert_close(food.vs_national_percent, 0.0);
        assert_close(food.vs_global_percent, -40.0);
    }
}
