//! Aggregation engine for emission analytics.
//!
//! Every report is a pure derivation over the in-memory record list:
//! filter by category and time window, then reduce into per-category,
//! per-month, and per-source totals with baseline comparisons. Nothing
//! is cached; at the data sizes involved (tens of records),
//! recomputation is cheaper than bookkeeping.

pub mod baselines;
pub mod insights;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activity::{Category, EmissionRecord};

/// Time window selecting which records a report covers.
///
/// Windows are counted back from today at day granularity, so `Week`
/// means today and the six days before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportRange {
    /// The last 7 days.
    Week,

    /// The last 30 days.
    #[default]
    Month,

    /// The last 90 days.
    Quarter,

    /// The last 365 days.
    Year,

    /// No time filter.
    All,
}

impl ReportRange {
    /// All ranges, in menu order.
    #[must_use]
    pub fn all() -> [Self; 5] {
        [Self::Week, Self::Month, Self::Quarter, Self::Year, Self::All]
    }

    /// Length of the window in days, `None` for [`ReportRange::All`].
    #[must_use]
    pub fn days(self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Quarter => Some(90),
            Self::Year => Some(365),
            Self::All => None,
        }
    }

    /// Parse a range from its lowercase name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "quarter" => Some(Self::Quarter),
            "year" => Some(Self::Year),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Name as it appears in configuration and export filenames.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selection for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,

    /// A single category.
    Only(Category),
}

impl CategoryFilter {
    /// Parse a filter from its lowercase name.
    ///
    /// `all` selects every category; anything else must name a category.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name == "all" {
            return Some(Self::All);
        }
        Category::parse(name).map(Self::Only)
    }

    /// Check whether a record category passes the filter.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Combined range and category selection for a report or export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Time window.
    pub range: ReportRange,

    /// Category selection.
    pub category: CategoryFilter,
}

impl ReportFilter {
    /// Create a filter from a range and a category selection.
    #[must_use]
    pub fn new(range: ReportRange, category: CategoryFilter) -> Self {
        Self { range, category }
    }
}

/// Outcome of the record filter pipeline.
#[derive(Debug, Clone)]
pub struct FilteredRecords {
    /// Records that passed the filter, in insertion order.
    pub records: Vec<EmissionRecord>,

    /// Whether the time window matched nothing and the unwindowed
    /// category-filtered set was used instead.
    pub window_fallback: bool,
}

/// Filter records by category and time window.
///
/// The window is `[today - (N - 1), today]` inclusive at day
/// granularity. When no record falls inside the window, the
/// category-filtered set is returned unwindowed instead, so a narrow
/// window never empties a report while older records exist;
/// `window_fallback` reports when that happened.
#[must_use]
pub fn filter_records(
    records: &[EmissionRecord],
    today: NaiveDate,
    filter: &ReportFilter,
) -> FilteredRecords {
    let by_category: Vec<EmissionRecord> = records
        .iter()
        .filter(|record| filter.category.matches(record.category))
        .cloned()
        .collect();

    let Some(days) = filter.range.days() else {
        return FilteredRecords {
            records: by_category,
            window_fallback: false,
        };
    };

    let start = today - Duration::days(days - 1);
    let windowed: Vec<EmissionRecord> = by_category
        .iter()
        .filter(|record| record.date >= start && record.date <= today)
        .cloned()
        .collect();

    if windowed.is_empty() && !by_category.is_empty() {
        debug!(
            "No records between {} and {}; showing {} unwindowed",
            start,
            today,
            by_category.len()
        );
        return FilteredRecords {
            records: by_category,
            window_fallback: true,
        };
    }

    FilteredRecords {
        records: windowed,
        window_fallback: false,
    }
}

/// Emissions for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// Month key in `YYYY-MM` form.
    pub month: String,

    /// Total for the month.
    pub total: f64,

    /// Per-category breakdown of the month.
    pub by_category: BTreeMap<Category, f64>,
}

/// Emissions for one `category-kind` source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTotal {
    /// Composite source key, e.g. `transportation-car`.
    pub source: String,

    /// Total for the source.
    pub total: f64,
}

/// Aggregated analytics over a filtered record set.
#[derive(Debug, Clone, Serialize)]
pub struct EmissionReport {
    /// Sum of all matching amounts.
    pub total: f64,

    /// Number of records that matched.
    pub record_count: usize,

    /// Whether the time window matched nothing and older records were
    /// shown instead.
    pub window_fallback: bool,

    /// Totals grouped by category.
    pub category_totals: BTreeMap<Category, f64>,

    /// Totals grouped by calendar month, ascending by month key.
    pub monthly: Vec<MonthlyTotal>,

    /// Totals grouped by source key, descending by total.
    pub sources: Vec<SourceTotal>,

    /// Standing against the fixed baselines.
    pub comparisons: baselines::Comparisons,

    /// Each category's share of the total and standing against its own
    /// baselines.
    pub category_comparisons: Vec<baselines::CategoryComparison>,
}

impl EmissionReport {
    /// The top `n` sources by total.
    #[must_use]
    pub fn top_sources(&self, n: usize) -> &[SourceTotal] {
        &self.sources[..self.sources.len().min(n)]
    }
}

/// Aggregate the records matching a filter into a report.
///
/// Pure derivation over the input; call again after every change rather
/// than updating a cached report.
#[must_use]
pub fn aggregate(
    records: &[EmissionRecord],
    today: NaiveDate,
    filter: &ReportFilter,
) -> EmissionReport {
    let filtered = filter_records(records, today, filter);

    let mut total = 0.0;
    let mut category_totals: BTreeMap<Category, f64> = BTreeMap::new();
    let mut monthly_map: BTreeMap<String, (f64, BTreeMap<Category, f64>)> = BTreeMap::new();
    let mut source_map: BTreeMap<String, f64> = BTreeMap::new();

    for record in &filtered.records {
        total += record.amount;
        *category_totals.entry(record.category).or_insert(0.0) += record.amount;

        let month = monthly_map.entry(record.month_key()).or_default();
        month.0 += record.amount;
        *month.1.entry(record.category).or_insert(0.0) += record.amount;

        *source_map.entry(record.source_key()).or_insert(0.0) += record.amount;
    }

    let monthly = monthly_map
        .into_iter()
        .map(|(month, (month_total, by_category))| MonthlyTotal {
            month,
            total: month_total,
            by_category,
        })
        .collect();

    // Stable sort over key-ascending input keeps equal totals in key order.
    let mut sources: Vec<SourceTotal> = source_map
        .into_iter()
        .map(|(source, source_total)| SourceTotal {
            source,
            total: source_total,
        })
        .collect();
    sources.sort_by(|a, b| b.total.total_cmp(&a.total));

    let category_comparisons = baselines::category_comparisons(&category_totals);

    EmissionReport {
        total,
        record_count: filtered.records.len(),
        window_fallback: filtered.window_fallback,
        category_totals,
        monthly,
        sources,
        comparisons: baselines::Comparisons::for_total(total),
        category_comparisons,
    }
}
