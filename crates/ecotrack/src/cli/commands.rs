//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::activity::{ActivityDetails, Category, FlightType, FuelType, NewEntry};
use crate::analytics::{CategoryFilter, ReportFilter, ReportRange};
use crate::catalog::Difficulty;

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account email address
    pub email: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,
}

/// Register command arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Display name for the new account
    #[arg(short, long)]
    pub name: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Password (at least 6 characters)
    #[arg(short, long)]
    pub password: String,
}

/// Log command arguments.
#[derive(Debug, Args)]
pub struct LogCommand {
    /// Activity category
    #[arg(long, value_enum)]
    pub category: CategoryArg,

    /// Activity type within the category (e.g. car, electricity, beef)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub kind: String,

    /// Emission amount in kg CO2e; computed from the detail flags when omitted
    #[arg(short, long)]
    pub amount: Option<f64>,

    /// Day of the activity (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// What this entry covers
    #[arg(long)]
    pub description: String,

    /// Distance travelled in km (car, flight, train, bus, motorcycle)
    #[arg(long, value_name = "KM")]
    pub distance: Option<f64>,

    /// Car fuel type
    #[arg(long, value_enum)]
    pub fuel: Option<FuelArg>,

    /// Flight type
    #[arg(long, value_enum)]
    pub flight: Option<FlightArg>,

    /// Energy used (kWh for electricity, m3 for gas, kg otherwise)
    #[arg(long, value_name = "AMOUNT")]
    pub usage: Option<f64>,

    /// Food quantity in kg
    #[arg(long, value_name = "KG")]
    pub quantity: Option<f64>,
}

impl LogCommand {
    /// Assemble a library-level entry from the parsed flags.
    #[must_use]
    pub fn to_entry(&self) -> NewEntry {
        NewEntry {
            category: self.category.into(),
            kind: self.kind.clone(),
            amount: self.amount,
            date: self.date,
            description: self.description.clone(),
            details: self.details(),
        }
    }

    /// Build structured details from the detail flags.
    ///
    /// A manual entry with no detail flags carries no details. Otherwise
    /// the variant follows the category and type, with absent numeric
    /// flags defaulting to zero.
    fn details(&self) -> ActivityDetails {
        if self.amount.is_some() && !self.has_detail_flags() {
            return ActivityDetails::None;
        }
        match Category::from(self.category) {
            Category::Transportation => match self.kind.as_str() {
                "car" => ActivityDetails::Car {
                    distance_km: self.distance.unwrap_or_default(),
                    fuel_type: self.fuel.map_or_else(FuelType::default, Into::into),
                },
                "flight" => ActivityDetails::Flight {
                    distance_km: self.distance.unwrap_or_default(),
                    flight_type: self.flight.map_or_else(FlightType::default, Into::into),
                },
                _ => ActivityDetails::Transit {
                    distance_km: self.distance.unwrap_or_default(),
                },
            },
            Category::Energy => ActivityDetails::Energy {
                usage: self.usage.unwrap_or_default(),
            },
            Category::Food | Category::Other => ActivityDetails::Food {
                quantity_kg: self.quantity.unwrap_or_default(),
            },
        }
    }

    fn has_detail_flags(&self) -> bool {
        self.distance.is_some()
            || self.fuel.is_some()
            || self.flight.is_some()
            || self.usage.is_some()
            || self.quantity.is_some()
    }
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Time range to report over
    #[arg(short, long, value_enum)]
    pub range: Option<RangeArg>,

    /// Category to report on
    #[arg(long, value_enum)]
    pub category: Option<CategoryFilterArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl ReportCommand {
    /// The report filter, falling back to the configured defaults.
    #[must_use]
    pub fn filter(&self, defaults: ReportFilter) -> ReportFilter {
        ReportFilter::new(
            self.range.map_or(defaults.range, Into::into),
            self.category.map_or(defaults.category, Into::into),
        )
    }
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Time range to export
    #[arg(short, long, value_enum)]
    pub range: Option<RangeArg>,

    /// Category to export
    #[arg(long, value_enum)]
    pub category: Option<CategoryFilterArg>,

    /// Write to this file instead of the generated name
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    /// The export filter, falling back to the configured defaults.
    #[must_use]
    pub fn filter(&self, defaults: ReportFilter) -> ReportFilter {
        ReportFilter::new(
            self.range.map_or(defaults.range, Into::into),
            self.category.map_or(defaults.category, Into::into),
        )
    }
}

/// Recommend command arguments.
#[derive(Debug, Args)]
pub struct RecommendCommand {
    /// Only recommendations for this category
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Only recommendations at this difficulty
    #[arg(short, long, value_enum)]
    pub difficulty: Option<DifficultyArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Achievements command arguments.
#[derive(Debug, Args)]
pub struct AchievementsCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Profile command arguments.
#[derive(Debug, Args)]
pub struct ProfileCommand {
    /// Set a new display name
    #[arg(long)]
    pub name: Option<String>,

    /// Set a new email address
    #[arg(long)]
    pub email: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl ProfileCommand {
    /// Whether this invocation updates the profile rather than showing it.
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.name.is_some() || self.email.is_some()
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Category argument for logging and recommendation filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Travel by road, rail, or air
    Transportation,
    /// Household energy consumption
    Energy,
    /// Food production emissions
    Food,
    /// Everything else
    Other,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Transportation => Self::Transportation,
            CategoryArg::Energy => Self::Energy,
            CategoryArg::Food => Self::Food,
            CategoryArg::Other => Self::Other,
        }
    }
}

/// Category filter argument for reports and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryFilterArg {
    /// Every category
    All,
    /// Travel by road, rail, or air
    Transportation,
    /// Household energy consumption
    Energy,
    /// Food production emissions
    Food,
    /// Everything else
    Other,
}

impl From<CategoryFilterArg> for CategoryFilter {
    fn from(arg: CategoryFilterArg) -> Self {
        match arg {
            CategoryFilterArg::All => Self::All,
            CategoryFilterArg::Transportation => Self::Only(Category::Transportation),
            CategoryFilterArg::Energy => Self::Only(Category::Energy),
            CategoryFilterArg::Food => Self::Only(Category::Food),
            CategoryFilterArg::Other => Self::Only(Category::Other),
        }
    }
}

/// Time range argument for reports and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangeArg {
    /// The last 7 days
    Week,
    /// The last 30 days
    Month,
    /// The last 90 days
    Quarter,
    /// The last 365 days
    Year,
    /// Every record
    All,
}

impl From<RangeArg> for ReportRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::Week => Self::Week,
            RangeArg::Month => Self::Month,
            RangeArg::Quarter => Self::Quarter,
            RangeArg::Year => Self::Year,
            RangeArg::All => Self::All,
        }
    }
}

/// Fuel type argument for car entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FuelArg {
    /// Petrol engine
    Petrol,
    /// Diesel engine
    Diesel,
    /// Petrol-electric hybrid
    Hybrid,
    /// Battery electric
    Electric,
}

impl From<FuelArg> for FuelType {
    fn from(arg: FuelArg) -> Self {
        match arg {
            FuelArg::Petrol => Self::Petrol,
            FuelArg::Diesel => Self::Diesel,
            FuelArg::Hybrid => Self::Hybrid,
            FuelArg::Electric => Self::Electric,
        }
    }
}

/// Flight type argument for flight entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlightArg {
    /// Short-haul domestic flight
    Domestic,
    /// Long-haul international flight
    International,
}

impl From<FlightArg> for FlightType {
    fn from(arg: FlightArg) -> Self {
        match arg {
            FlightArg::Domestic => Self::Domestic,
            FlightArg::International => Self::International,
        }
    }
}

/// Difficulty argument for recommendation filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    /// Quick wins
    Easy,
    /// Some planning required
    Medium,
    /// Larger commitments
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
