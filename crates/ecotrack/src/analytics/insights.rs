//! Derived findings and personal metrics for the analytics view.

use std::fmt;

use serde::Serialize;

use crate::activity::Category;
use crate::analytics::baselines::TARGET_KG;
use crate::analytics::EmissionReport;
use crate::factors::round2;

/// Direction of the month-over-month movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// The latest month is above the one before it.
    Rising,

    /// The latest month is at or below the one before it, or there is
    /// not enough history to tell.
    Easing,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rising => f.write_str("rising"),
            Self::Easing => f.write_str("easing"),
        }
    }
}

/// A category's total and its share of the report total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    /// The category.
    pub category: Category,

    /// Total for the category, kg CO2e.
    pub total: f64,

    /// Share of the report total, percent.
    pub share_percent: f64,
}

/// Headline findings derived from a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// Highest-emitting category, absent when nothing matched.
    pub highest: Option<CategoryShare>,

    /// Kilograms to shed to reach the climate target, negative when
    /// already under it.
    pub reduction_needed_kg: f64,

    /// Month-over-month direction.
    pub trend: Trend,
}

impl Insights {
    /// Derive the findings from an aggregated report.
    #[must_use]
    pub fn from_report(report: &EmissionReport) -> Self {
        let highest = report
            .category_totals
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&category, &total)| CategoryShare {
                category,
                total,
                share_percent: if report.total == 0.0 {
                    0.0
                } else {
                    round2(total / report.total * 100.0)
                },
            });

        let trend = match report.monthly.as_slice() {
            [.., previous, latest] if latest.total > previous.total => Trend::Rising,
            _ => Trend::Easing,
        };

        Self {
            highest,
            reduction_needed_kg: round2(report.total - TARGET_KG),
            trend,
        }
    }
}

/// The report total spread across display timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersonalMetrics {
    /// Average per day over a 30-day month, kg CO2e.
    pub daily_average_kg: f64,

    /// Average per week over a 4-week month, kg CO2e.
    pub weekly_average_kg: f64,

    /// Twelve-month projection of the total, kg CO2e.
    pub annual_projection_kg: f64,
}

impl PersonalMetrics {
    /// Compute the metrics for an aggregate total.
    #[must_use]
    pub fn from_total(total: f64) -> Self {
        Self {
            daily_average_kg: round2(total / 30.0),
            weekly_average_kg: round2(total / 4.0),
            annual_projection_kg: round2(total * 12.0),
        }
    }
}
