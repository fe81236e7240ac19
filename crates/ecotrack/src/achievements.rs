//! Achievement engine: unlock predicates over a user and their records.
//!
//! Unlock state is never stored; each evaluation derives it from the
//! current profile and record list. The predicate table is keyed by
//! catalog id, so an operator catalog can reword or re-icon a badge
//! without touching the rules. Definitions whose id has no predicate
//! evaluate as locked with zero progress.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::activity::{Category, EmissionRecord};
use crate::analytics::baselines::{baseline_for, NATIONAL_AVERAGE_KG};
use crate::catalog::AchievementDef;
use crate::user::UserProfile;

/// Evaluated unlock state of one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AchievementStatus {
    /// Catalog id of the definition this was evaluated for.
    pub id: i64,

    /// Whether the badge is earned.
    pub unlocked: bool,

    /// Fraction of the way to earning it, in `[0, 1]`. Unlocked badges
    /// report 1.
    pub progress: f64,
}

/// Evaluate one achievement definition against a user and their records.
#[must_use]
pub fn evaluate(
    def: &AchievementDef,
    user: &UserProfile,
    records: &[EmissionRecord],
) -> AchievementStatus {
    let record_count = u32::try_from(records.len()).unwrap_or(u32::MAX);

    let (unlocked, progress) = match def.id {
        // First Step: log one record.
        1 => at_least(record_count, 1),
        // Data Collector: log ten records.
        2 => at_least(record_count, 10),
        // Week Warrior: seven-day streak.
        3 => at_least(user.streak, 7),
        // Carbon Reducer: 20% under the national average.
        4 => under_threshold(user.total_emissions, NATIONAL_AVERAGE_KG * 0.8),
        // Eco Champion: 50% under the national average.
        5 => under_threshold(user.total_emissions, NATIONAL_AVERAGE_KG * 0.5),
        // Green Guru: thirty-day streak.
        6 => at_least(user.streak, 30),
        // Energy Saver: energy emissions 30% under the energy baseline.
        7 => {
            let energy: f64 = records
                .iter()
                .filter(|r| r.category == Category::Energy)
                .map(|r| r.amount)
                .sum();
            under_threshold(energy, baseline_for(Category::Energy).national * 0.7)
        }
        // Transport Hero: train or bus entries on twenty distinct days.
        8 => {
            let days: HashSet<NaiveDate> = records
                .iter()
                .filter(|r| {
                    r.category == Category::Transportation
                        && matches!(r.kind.as_str(), "train" | "bus")
                })
                .map(|r| r.date)
                .collect();
            at_least(u32::try_from(days.len()).unwrap_or(u32::MAX), 20)
        }
        _ => (false, 0.0),
    };

    AchievementStatus {
        id: def.id,
        unlocked,
        progress,
    }
}

/// Evaluate every definition, in catalog order.
#[must_use]
pub fn evaluate_all(
    defs: &[AchievementDef],
    user: &UserProfile,
    records: &[EmissionRecord],
) -> Vec<AchievementStatus> {
    defs.iter().map(|def| evaluate(def, user, records)).collect()
}

/// Count-up rule: unlocked at `needed`, progress is the capped fraction.
fn at_least(count: u32, needed: u32) -> (bool, f64) {
    (
        count >= needed,
        (f64::from(count) / f64::from(needed)).min(1.0),
    )
}

/// Stay-under rule: unlocked at or below the threshold. Locked progress
/// is how close the threshold is to the current total, so it grows as
/// the total shrinks.
fn under_threshold(total: f64, threshold: f64) -> (bool, f64) {
    if total <= threshold {
        (true, 1.0)
    } else {
        (false, threshold / total)
    }
}
