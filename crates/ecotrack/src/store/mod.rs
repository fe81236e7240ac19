//! Record storage for ecotrack.
//!
//! This module provides the in-memory emission log, seeded from the
//! catalog and appended to during a session, plus the on-disk session
//! snapshot in [`snapshot`].

pub mod snapshot;

pub use snapshot::SessionStore;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::activity::{ActivityDetails, Category, EmissionRecord};

/// In-memory store of emission records.
///
/// Records are kept in insertion order and are never updated or deleted.
/// Ids increase monotonically across the full collection, so
/// catalog-seeded ids and session-assigned ids never collide.
#[derive(Debug, Clone, Default)]
pub struct EmissionLog {
    records: Vec<EmissionRecord>,
}

/// Input for appending a record, before id and date assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// The user who logged this emission.
    pub user_id: i64,
    /// Top-level activity grouping.
    pub category: Category,
    /// Specific activity within the category.
    pub kind: String,
    /// Emission amount in kg CO2e.
    pub amount: f64,
    /// Calendar day of the activity; today when unspecified.
    pub date: Option<NaiveDate>,
    /// Free-text description.
    pub description: String,
    /// Structured measurements behind the amount.
    pub details: ActivityDetails,
}

impl EmissionLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log seeded with existing records, keeping their ids and
    /// order.
    #[must_use]
    pub fn seeded(records: Vec<EmissionRecord>) -> Self {
        Self { records }
    }

    /// Append a record, assigning the next id in the collection and
    /// today's date when the entry does not carry one.
    pub fn append(&mut self, record: NewRecord) -> &EmissionRecord {
        let id = self.next_id();
        let date = record.date.unwrap_or_else(|| Local::now().date_naive());
        debug!("Appending record {} for user {}", id, record.user_id);

        self.records.push(EmissionRecord {
            id,
            user_id: record.user_id,
            category: record.category,
            kind: record.kind,
            amount: record.amount,
            date,
            description: record.description,
            details: record.details,
        });
        // Just pushed, so the last element exists.
        &self.records[self.records.len() - 1]
    }

    /// Get a record by id.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&EmissionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All records belonging to a user, in insertion order.
    #[must_use]
    pub fn for_user(&self, user_id: i64) -> Vec<EmissionRecord> {
        self.records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Sum of a user's emission amounts, in kg CO2e.
    ///
    /// This is the derived value behind `UserProfile::total_emissions`;
    /// callers recompute it after every append rather than incrementing
    /// a counter.
    #[must_use]
    pub fn total_for(&self, user_id: i64) -> f64 {
        self.records
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.amount)
            .sum()
    }

    /// Number of records belonging to a user.
    #[must_use]
    pub fn count_for(&self, user_id: i64) -> usize {
        self.records.iter().filter(|r| r.user_id == user_id).count()
    }

    /// Every record in the log, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[EmissionRecord] {
        &self.records
    }

    /// Total number of records in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn next_id(&self) -> i64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }
}
