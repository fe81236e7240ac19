//! User profile types for ecotrack.
//!
//! Profiles carry identity, the demo credential, and the gamification
//! fields shown on the dashboard and profile screens.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// A tracked user.
///
/// `total_emissions` is a derived value: it is recomputed from the record
/// store on login and after every appended emission, never incremented
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Login email.
    pub email: String,

    /// Plaintext demo credential. This tracker has no real
    /// authentication; see the non-goals in the project docs.
    pub password: String,

    /// Lifetime emissions in kg CO2e, derived from the record store.
    pub total_emissions: f64,

    /// Names of earned achievements, oldest first.
    pub achievements: Vec<String>,

    /// Gamification level.
    pub level: u32,

    /// Experience points.
    pub xp: u32,

    /// Consecutive days with logged activity.
    pub streak: u32,

    /// Day the account was created.
    pub joined_date: NaiveDate,
}

impl UserProfile {
    /// Progress through the current level as a percentage (0 to 99).
    ///
    /// Levels span 100 XP each, so this is the XP remainder.
    #[must_use]
    pub fn level_progress_percent(&self) -> u32 {
        self.xp % 100
    }

    /// XP total at which the next level is reached.
    #[must_use]
    pub fn next_level_xp(&self) -> u32 {
        self.xp.div_ceil(100) * 100
    }

    /// The most recently earned achievement names, oldest first, at most
    /// `n` of them.
    #[must_use]
    pub fn recent_achievements(&self, n: usize) -> &[String] {
        let start = self.achievements.len().saturating_sub(n);
        &self.achievements[start..]
    }
}

/// Input form for registration, before id assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext demo credential.
    pub password: String,
}

impl NewUser {
    /// Build a fresh profile from this form.
    ///
    /// New users start at level 1 with no XP, no streak, no achievements,
    /// and zero emissions.
    #[must_use]
    pub fn into_profile(self, id: i64, joined_date: NaiveDate) -> UserProfile {
        UserProfile {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            total_emissions: 0.0,
            achievements: Vec::new(),
            level: 1,
            xp: 0,
            streak: 0,
            joined_date,
        }
    }
}

/// Check that an email has the loose `local@domain.tld` shape used by the
/// registration form.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    // Compile on use; registration is rare enough that caching would be
    // noise.
    regex::Regex::new(r"^\S+@\S+\.\S+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

/// Validate a registration form.
///
/// Returns one [`FieldError`] per offending field. An empty result means
/// the form may be submitted.
#[must_use]
pub fn validate_registration(name: &str, email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Please enter your name".to_string(),
        });
    }
    if !is_valid_email(email) {
        errors.push(FieldError {
            field: "email",
            message: "Please enter a valid email address".to_string(),
        });
    }
    if password.len() < 6 {
        errors.push(FieldError {
            field: "password",
            message: "Password must be at least 6 characters".to_string(),
        });
    }
    errors
}
