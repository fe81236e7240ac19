//! Static catalogs: demo users, seed emission records, recommendations,
//! and achievement definitions.
//!
//! Catalogs are configuration data, not code paths: the core reads them
//! and never writes them back. Built-in defaults carry the demo data; an
//! operator-supplied TOML file can replace any top-level list wholesale.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::activity::{ActivityDetails, Category, EmissionRecord, FlightType, FuelType};
use crate::error::{Error, Result};
use crate::factors::round2;
use crate::user::UserProfile;

/// Effort grade of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Doable this week without planning.
    Easy,

    /// Needs a habit change or modest spending.
    Medium,

    /// Needs planning, spending, or both.
    Hard,
}

impl Difficulty {
    /// Parse a difficulty from its lowercase name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Name as it appears in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One actionable suggestion from the static catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Catalog id.
    pub id: i64,

    /// Short imperative title.
    pub title: String,

    /// What the change is and why it helps.
    pub description: String,

    /// Category the saving applies to.
    pub category: Category,

    /// Effort grade.
    pub difficulty: Difficulty,

    /// Estimated annual saving, kg CO2e.
    pub potential_savings: f64,

    /// Expected time before the saving shows up.
    pub timeframe: String,

    /// Ordered steps to act on the suggestion.
    #[serde(default)]
    pub action_steps: Vec<String>,

    /// Short supporting notes.
    #[serde(default)]
    pub tips: Vec<String>,
}

/// A named badge users can earn.
///
/// Unlock state is evaluated on demand by the achievement engine; the
/// definition itself is static display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    /// Catalog id, keyed by the achievement engine's predicate table.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// What earns the badge.
    pub description: String,

    /// Emoji shown next to the name.
    pub icon: String,

    /// XP granted when unlocked.
    pub xp_reward: u32,
}

/// The full static catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Demo users known to the login scan.
    pub users: Vec<UserProfile>,

    /// Emission records the log is seeded with.
    pub records: Vec<EmissionRecord>,

    /// Static recommendation list.
    pub recommendations: Vec<Recommendation>,

    /// Achievement definitions.
    pub achievements: Vec<AchievementDef>,
}

impl Catalog {
    /// The built-in demo catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            users: builtin_users(),
            records: builtin_records(),
            recommendations: builtin_recommendations(),
            achievements: builtin_achievements(),
        }
    }

    /// Load the catalog: built-in defaults, optionally overridden by a
    /// TOML file.
    ///
    /// Each top-level list in the file replaces the corresponding
    /// built-in list wholesale. A configured path that does not exist
    /// falls back to the built-in catalog with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the merged
    /// catalog fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::builtin()));

        if let Some(path) = path {
            if path.exists() {
                debug!("Merging catalog overrides from {}", path.display());
                figment = figment.merge(Toml::file(path));
            } else {
                warn!(
                    "Catalog file {} not found; using the built-in catalog",
                    path.display()
                );
            }
        }

        let catalog: Self = figment
            .extract()
            .map_err(|source| Error::CatalogLoad(Box::new(source)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate the catalog's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error when user or record ids are non-positive or
    /// duplicated, a seed record references an unknown user, an amount
    /// is negative or non-finite, or recommendation/achievement ids
    /// collide.
    pub fn validate(&self) -> Result<()> {
        let mut user_ids = HashSet::new();
        let mut emails = HashSet::new();
        for user in &self.users {
            if user.id <= 0 {
                return Err(Error::catalog_validation(format!(
                    "user id {} is not positive",
                    user.id
                )));
            }
            if !user_ids.insert(user.id) {
                return Err(Error::catalog_validation(format!(
                    "duplicate user id {}",
                    user.id
                )));
            }
            if !emails.insert(user.email.as_str()) {
                return Err(Error::catalog_validation(format!(
                    "duplicate user email {}",
                    user.email
                )));
            }
        }

        let mut record_ids = HashSet::new();
        for record in &self.records {
            if record.id <= 0 {
                return Err(Error::catalog_validation(format!(
                    "record id {} is not positive",
                    record.id
                )));
            }
            if !record_ids.insert(record.id) {
                return Err(Error::catalog_validation(format!(
                    "duplicate record id {}",
                    record.id
                )));
            }
            if !user_ids.contains(&record.user_id) {
                return Err(Error::catalog_validation(format!(
                    "record {} references unknown user {}",
                    record.id, record.user_id
                )));
            }
            if !record.amount.is_finite() || record.amount < 0.0 {
                return Err(Error::catalog_validation(format!(
                    "record {} has invalid amount {}",
                    record.id, record.amount
                )));
            }
        }

        let mut recommendation_ids = HashSet::new();
        for recommendation in &self.recommendations {
            if !recommendation_ids.insert(recommendation.id) {
                return Err(Error::catalog_validation(format!(
                    "duplicate recommendation id {}",
                    recommendation.id
                )));
            }
        }

        let mut achievement_ids = HashSet::new();
        for achievement in &self.achievements {
            if !achievement_ids.insert(achievement.id) {
                return Err(Error::catalog_validation(format!(
                    "duplicate achievement id {}",
                    achievement.id
                )));
            }
        }

        Ok(())
    }

    /// Recommendations matching the given filters, in catalog order.
    ///
    /// `None` filters match everything.
    #[must_use]
    pub fn recommendations_for(
        &self,
        category: Option<Category>,
        difficulty: Option<Difficulty>,
    ) -> Vec<&Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| category.map_or(true, |c| r.category == c))
            .filter(|r| difficulty.map_or(true, |d| r.difficulty == d))
            .collect()
    }

    /// Look up an achievement definition by id.
    #[must_use]
    pub fn achievement_by_id(&self, id: i64) -> Option<&AchievementDef> {
        self.achievements.iter().find(|a| a.id == id)
    }
}

/// Sum of estimated annual savings across a recommendation set.
#[must_use]
pub fn total_potential_savings(recommendations: &[&Recommendation]) -> f64 {
    round2(recommendations.iter().map(|r| r.potential_savings).sum())
}

/// Demo dates are fixed literals; a typo shows up in the catalog tests.
fn demo_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// The demo user list.
fn builtin_users() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: 1,
            name: "Alexander Johnson".to_string(),
            email: "alexander.j@carbontrac.com".to_string(),
            password: "demo2024".to_string(),
            total_emissions: 930.5,
            achievements: vec![
                "First Step".to_string(),
                "Week Warrior".to_string(),
                "Energy Saver".to_string(),
            ],
            level: 4,
            xp: 275,
            streak: 12,
            joined_date: demo_date(2024, 11, 15),
        },
        UserProfile {
            id: 2,
            name: "Dr. Sarah Chen".to_string(),
            email: "sarah.chen@greenfuture.org".to_string(),
            password: "demo2024".to_string(),
            total_emissions: 213.78,
            achievements: vec![
                "First Step".to_string(),
                "Week Warrior".to_string(),
                "Carbon Reducer".to_string(),
                "Eco Champion".to_string(),
            ],
            level: 6,
            xp: 420,
            streak: 24,
            joined_date: demo_date(2024, 10, 8),
        },
    ]
}

/// The seed emission records. Amounts agree with the calculator applied
/// to each record's details.
fn builtin_records() -> Vec<EmissionRecord> {
    vec![
        EmissionRecord {
            id: 1,
            user_id: 1,
            category: Category::Transportation,
            kind: "car".to_string(),
            amount: 115.5,
            date: demo_date(2025, 1, 5),
            description: "Commute to work".to_string(),
            details: ActivityDetails::Car {
                distance_km: 50.0,
                fuel_type: FuelType::Petrol,
            },
        },
        EmissionRecord {
            id: 2,
            user_id: 1,
            category: Category::Energy,
            kind: "electricity".to_string(),
            amount: 156.8,
            date: demo_date(2025, 1, 8),
            description: "Monthly electricity bill".to_string(),
            details: ActivityDetails::Energy { usage: 350.0 },
        },
        EmissionRecord {
            id: 3,
            user_id: 1,
            category: Category::Transportation,
            kind: "flight".to_string(),
            amount: 357.0,
            date: demo_date(2025, 1, 15),
            description: "Flight to conference".to_string(),
            details: ActivityDetails::Flight {
                distance_km: 1400.0,
                flight_type: FlightType::Domestic,
            },
        },
        EmissionRecord {
            id: 4,
            user_id: 1,
            category: Category::Food,
            kind: "beef".to_string(),
            amount: 120.0,
            date: demo_date(2025, 1, 18),
            description: "Weekly groceries".to_string(),
            details: ActivityDetails::Food { quantity_kg: 2.0 },
        },
        EmissionRecord {
            id: 5,
            user_id: 1,
            category: Category::Energy,
            kind: "gas".to_string(),
            amount: 88.8,
            date: demo_date(2025, 2, 2),
            description: "Monthly gas bill".to_string(),
            details: ActivityDetails::Energy { usage: 48.0 },
        },
        EmissionRecord {
            id: 6,
            user_id: 1,
            category: Category::Transportation,
            kind: "car".to_string(),
            amount: 92.4,
            date: demo_date(2025, 2, 10),
            description: "Weekend trip".to_string(),
            details: ActivityDetails::Car {
                distance_km: 40.0,
                fuel_type: FuelType::Petrol,
            },
        },
        EmissionRecord {
            id: 7,
            user_id: 2,
            category: Category::Energy,
            kind: "electricity".to_string(),
            amount: 188.16,
            date: demo_date(2025, 1, 10),
            description: "Home office electricity".to_string(),
            details: ActivityDetails::Energy { usage: 420.0 },
        },
        EmissionRecord {
            id: 8,
            user_id: 2,
            category: Category::Food,
            kind: "chicken".to_string(),
            amount: 20.7,
            date: demo_date(2025, 1, 20),
            description: "Groceries".to_string(),
            details: ActivityDetails::Food { quantity_kg: 3.0 },
        },
        EmissionRecord {
            id: 9,
            user_id: 2,
            category: Category::Transportation,
            kind: "train".to_string(),
            amount: 4.92,
            date: demo_date(2025, 2, 5),
            description: "Train to client visit".to_string(),
            details: ActivityDetails::Transit { distance_km: 120.0 },
        },
    ]
}

/// The static recommendation list.
fn builtin_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            id: 1,
            title: "Switch to LED lighting".to_string(),
            description: "Replace incandescent and halogen bulbs with LEDs, \
                          which draw a fraction of the power for the same light."
                .to_string(),
            category: Category::Energy,
            difficulty: Difficulty::Easy,
            potential_savings: 75.0,
            timeframe: "1-2 weeks".to_string(),
            action_steps: vec![
                "Replace the five most-used bulbs first".to_string(),
                "Choose warm white (2700K) for living spaces".to_string(),
                "Drop old bulbs at a recycling point".to_string(),
            ],
            tips: vec!["LEDs use about 85% less energy than incandescents".to_string()],
        },
        Recommendation {
            id: 2,
            title: "Cycle short trips".to_string(),
            description: "Swap the car for a bicycle on trips under five \
                          kilometres."
                .to_string(),
            category: Category::Transportation,
            difficulty: Difficulty::Easy,
            potential_savings: 240.0,
            timeframe: "Immediate".to_string(),
            action_steps: vec![
                "List the trips under 5 km you drive every week".to_string(),
                "Get the bike serviced".to_string(),
                "Start with two car-free days per week".to_string(),
            ],
            tips: vec!["A third of car trips cover less than 3 km".to_string()],
        },
        Recommendation {
            id: 3,
            title: "Meat-free weekdays".to_string(),
            description: "Cook plant-based dinners Monday through Friday and \
                          keep meat for the weekend."
                .to_string(),
            category: Category::Food,
            difficulty: Difficulty::Medium,
            potential_savings: 310.0,
            timeframe: "1 month".to_string(),
            action_steps: vec![
                "Plan five plant-based dinners for the week".to_string(),
                "Batch-cook legumes on Sunday".to_string(),
                "Keep two quick vegetarian recipes as backup".to_string(),
            ],
            tips: vec!["Beef carries roughly ten times the footprint of chicken".to_string()],
        },
        Recommendation {
            id: 4,
            title: "Lower the thermostat by two degrees".to_string(),
            description: "Heat living spaces to 19°C instead of 21°C and wear \
                          a warmer layer indoors."
                .to_string(),
            category: Category::Energy,
            difficulty: Difficulty::Easy,
            potential_savings: 160.0,
            timeframe: "Immediate".to_string(),
            action_steps: vec![
                "Set the daytime target to 19°C".to_string(),
                "Schedule a night setback to 16°C".to_string(),
            ],
            tips: vec!["Each degree of heating costs roughly 6% of the bill".to_string()],
        },
        Recommendation {
            id: 5,
            title: "Take the train for regional trips".to_string(),
            description: "Choose rail over driving or flying for trips in the \
                          200-800 km band."
                .to_string(),
            category: Category::Transportation,
            difficulty: Difficulty::Medium,
            potential_savings: 420.0,
            timeframe: "3 months".to_string(),
            action_steps: vec![
                "Compare rail connections for your next regional trip".to_string(),
                "Book ahead for the cheaper off-peak fares".to_string(),
            ],
            tips: vec!["Rail emits about a fiftieth of a car per passenger-km".to_string()],
        },
        Recommendation {
            id: 6,
            title: "Install a smart meter".to_string(),
            description: "Meter electricity per circuit to find the loads \
                          worth fixing."
                .to_string(),
            category: Category::Energy,
            difficulty: Difficulty::Hard,
            potential_savings: 200.0,
            timeframe: "2-3 months".to_string(),
            action_steps: vec![
                "Ask your utility about a smart meter upgrade".to_string(),
                "Review the per-circuit readings after two weeks".to_string(),
                "Replace or reschedule the two biggest loads".to_string(),
            ],
            tips: vec!["Standby devices alone average 5-10% of household usage".to_string()],
        },
    ]
}

/// The achievement definitions. Ids key the achievement engine's
/// predicate table.
fn builtin_achievements() -> Vec<AchievementDef> {
    vec![
        AchievementDef {
            id: 1,
            name: "First Step".to_string(),
            description: "Log your first emission record".to_string(),
            icon: "🌱".to_string(),
            xp_reward: 10,
        },
        AchievementDef {
            id: 2,
            name: "Data Collector".to_string(),
            description: "Log ten emission records".to_string(),
            icon: "📊".to_string(),
            xp_reward: 25,
        },
        AchievementDef {
            id: 3,
            name: "Week Warrior".to_string(),
            description: "Keep a seven-day logging streak".to_string(),
            icon: "⚡".to_string(),
            xp_reward: 50,
        },
        AchievementDef {
            id: 4,
            name: "Carbon Reducer".to_string(),
            description: "Stay 20% under the national average".to_string(),
            icon: "📉".to_string(),
            xp_reward: 100,
        },
        AchievementDef {
            id: 5,
            name: "Eco Champion".to_string(),
            description: "Stay 50% under the national average".to_string(),
            icon: "🏆".to_string(),
            xp_reward: 200,
        },
        AchievementDef {
            id: 6,
            name: "Green Guru".to_string(),
            description: "Keep a thirty-day logging streak".to_string(),
            icon: "🌿".to_string(),
            xp_reward: 150,
        },
        AchievementDef {
            id: 7,
            name: "Energy Saver".to_string(),
            description: "Keep energy emissions 30% under the energy baseline".to_string(),
            icon: "💡".to_string(),
            xp_reward: 75,
        },
        AchievementDef {
            id: 8,
            name: "Transport Hero".to_string(),
            description: "Use public transport on twenty different days".to_string(),
            icon: "🚌".to_string(),
            xp_reward: 80,
        },
    ]
}
