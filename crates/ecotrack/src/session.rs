//! Session state: the current user, the emission log, and persistence.
//!
//! A [`Session`] is the explicit context object behind every
//! user-facing operation. It owns the known user list and the emission
//! log (both seeded from the catalog), tracks the logged-in profile,
//! and funnels all snapshot writes through one [`SessionStore`], so no
//! other code path touches persistence.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::activity::{validate_description, validate_entry, EmissionRecord, NewEntry};
use crate::catalog::Catalog;
use crate::error::{Error, FieldError, Result};
use crate::factors::{calculate, round2, FactorTable};
use crate::store::{EmissionLog, NewRecord, SessionStore};
use crate::user::{is_valid_email, validate_registration, NewUser, UserProfile};

/// The active session: users, records, and the current login.
#[derive(Debug)]
pub struct Session {
    /// Users the login scan knows about: catalog users plus anyone
    /// registered this session.
    users: Vec<UserProfile>,
    /// The emission log, seeded from the catalog.
    log: EmissionLog,
    /// Persistence boundary for the session snapshot.
    store: SessionStore,
    /// Factor table used when an entry needs its amount calculated.
    factors: FactorTable,
    /// The logged-in profile, if any.
    current: Option<UserProfile>,
}

impl Session {
    /// Create a session seeded from the catalog, with nobody logged in.
    #[must_use]
    pub fn new(catalog: &Catalog, store: SessionStore) -> Self {
        Self {
            users: catalog.users.clone(),
            log: EmissionLog::seeded(catalog.records.clone()),
            store,
            factors: FactorTable::builtin(),
            current: None,
        }
    }

    /// Restore the persisted session user, if a snapshot exists.
    ///
    /// The profile is restored exactly as stored; the total is not
    /// recomputed until the next login.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or is
    /// from a newer version.
    pub fn resume(&mut self) -> Result<Option<&UserProfile>> {
        if let Some(profile) = self.store.load()? {
            info!("Resumed session for user {}", profile.id);
            self.current = Some(profile);
        }
        Ok(self.current.as_ref())
    }

    /// Log a user in by credential scan.
    ///
    /// The restored profile's total is recomputed from the record log,
    /// and the snapshot is written.
    ///
    /// # Errors
    ///
    /// Returns the generic [`Error::InvalidCredentials`] on any
    /// mismatch; an unknown email and a wrong password are deliberately
    /// indistinguishable.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&UserProfile> {
        let mut profile = self
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
            .ok_or(Error::InvalidCredentials)?;

        profile.total_emissions = self.log.total_for(profile.id);
        info!("User {} logged in", profile.id);
        self.current = Some(profile);
        self.persist()?;
        self.current_user()
    }

    /// Register a new user and log them in.
    ///
    /// The new profile starts fresh (no records, level 1, zero XP) and
    /// joins the in-process user list, so logging in again this session
    /// works. Ids are assigned as user count + 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegistration`] when the form fields fail
    /// validation.
    pub fn register(&mut self, new_user: NewUser) -> Result<&UserProfile> {
        let errors =
            validate_registration(&new_user.name, &new_user.email, &new_user.password);
        if !errors.is_empty() {
            return Err(Error::invalid_registration(errors));
        }

        let id = i64::try_from(self.users.len()).unwrap_or(0) + 1;
        let profile = new_user.into_profile(id, Local::now().date_naive());
        info!("Registered user {} ({})", profile.id, profile.email);

        self.users.push(profile.clone());
        self.current = Some(profile);
        self.persist()?;
        self.current_user()
    }

    /// Log the current user out and remove the snapshot.
    ///
    /// Logging out with nobody logged in is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot file cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        if let Some(user) = self.current.take() {
            info!("User {} logged out", user.id);
        }
        self.store.clear()
    }

    /// Add an emission entry for the current user.
    ///
    /// The amount is taken from the entry when given (after validation),
    /// otherwise calculated from the details; a calculated zero is
    /// stored without complaint. The user's total is recomputed from the
    /// log and the snapshot is written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] without a session user,
    /// [`Error::InvalidEntry`] when validation fails, and
    /// [`Error::UnknownActivity`] when no factor covers the activity.
    pub fn add_entry(&mut self, entry: NewEntry) -> Result<EmissionRecord> {
        let user_id = self.current_user()?.id;

        let amount = match entry.amount {
            Some(amount) => {
                let errors = validate_entry(amount, &entry.description);
                if !errors.is_empty() {
                    return Err(Error::invalid_entry(errors));
                }
                round2(amount)
            }
            None => {
                let errors = validate_description(&entry.description);
                if !errors.is_empty() {
                    return Err(Error::invalid_entry(errors));
                }
                calculate(&self.factors, entry.category, &entry.kind, &entry.details)?
            }
        };

        let record = self
            .log
            .append(NewRecord {
                user_id,
                category: entry.category,
                kind: entry.kind,
                amount,
                date: entry.date,
                description: entry.description,
                details: entry.details,
            })
            .clone();

        self.refresh_total(user_id);
        self.persist()?;
        Ok(record)
    }

    /// Update the current user's name and/or email.
    ///
    /// The change also lands in the user list, so logging in again with
    /// the new email works. The snapshot is written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] without a session user and
    /// [`Error::InvalidProfile`] when a given field fails validation.
    pub fn update_profile(
        &mut self,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<&UserProfile> {
        self.current_user()?;

        let mut errors = Vec::new();
        if let Some(name) = &name {
            if name.trim().is_empty() {
                errors.push(FieldError {
                    field: "name",
                    message: "Please enter your name".to_string(),
                });
            }
        }
        if let Some(email) = &email {
            if !is_valid_email(email) {
                errors.push(FieldError {
                    field: "email",
                    message: "Please enter a valid email address".to_string(),
                });
            }
        }
        if !errors.is_empty() {
            return Err(Error::invalid_profile(errors));
        }

        let user = self.current.as_mut().ok_or(Error::NotLoggedIn)?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        let (id, name, email) = (user.id, user.name.clone(), user.email.clone());
        info!("Updated profile for user {id}");

        if let Some(entry) = self.users.iter_mut().find(|u| u.id == id) {
            entry.name = name;
            entry.email = email;
        }
        self.persist()?;
        self.current_user()
    }

    /// The logged-in profile, if any.
    #[must_use]
    pub fn current(&self) -> Option<&UserProfile> {
        self.current.as_ref()
    }

    /// The logged-in profile, or [`Error::NotLoggedIn`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] when nobody is logged in.
    pub fn current_user(&self) -> Result<&UserProfile> {
        self.current.as_ref().ok_or(Error::NotLoggedIn)
    }

    /// The current user's records, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] when nobody is logged in.
    pub fn records(&self) -> Result<Vec<EmissionRecord>> {
        Ok(self.log.for_user(self.current_user()?.id))
    }

    /// Build the dashboard summary for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] when nobody is logged in.
    pub fn dashboard(&self, today: NaiveDate) -> Result<DashboardSummary> {
        let user = self.current_user()?;
        let mut records = self.log.for_user(user.id);

        let month_key = today.format("%Y-%m").to_string();
        let month_to_date = records
            .iter()
            .filter(|r| r.month_key() == month_key)
            .map(|r| r.amount)
            .sum();

        // Most recently logged, not most recently dated: a backdated
        // entry still shows up at the top.
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records.truncate(5);

        Ok(DashboardSummary {
            total_emissions: user.total_emissions,
            month_to_date,
            recent_records: records,
            streak: user.streak,
            level: user.level,
            xp: user.xp,
            level_progress_percent: user.level_progress_percent(),
            next_level_xp: user.next_level_xp(),
            recent_achievements: user.recent_achievements(3).to_vec(),
        })
    }

    /// Recompute the current user's total from the log.
    fn refresh_total(&mut self, user_id: i64) {
        let total = self.log.total_for(user_id);
        if let Some(user) = self.current.as_mut() {
            user.total_emissions = total;
        }
    }

    /// Write the snapshot for the current user, if any.
    fn persist(&self) -> Result<()> {
        match &self.current {
            Some(user) => self.store.save(user),
            None => Ok(()),
        }
    }
}

/// Snapshot of the session user's standing for the dashboard view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Lifetime total, kg CO2e.
    pub total_emissions: f64,

    /// Total for the current calendar month, kg CO2e.
    pub month_to_date: f64,

    /// Up to five most recently logged records, latest first.
    pub recent_records: Vec<EmissionRecord>,

    /// Consecutive-day logging streak.
    pub streak: u32,

    /// Current level.
    pub level: u32,

    /// Accumulated experience points.
    pub xp: u32,

    /// Progress through the current level, percent.
    pub level_progress_percent: u32,

    /// XP needed to reach the next level.
    pub next_level_xp: u32,

    /// Most recently earned achievement names, up to three.
    pub recent_achievements: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityDetails, Category, FuelType};

    const ALEX_EMAIL: &str = "alexander.j@carbontrac.com";
    const ALEX_PASSWORD: &str = "demo2024";

    fn create_test_session(name: &str) -> Session {
        let path = std::env::temp_dir().join(format!(
            "ecotrack_session_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Session::new(&Catalog::builtin(), SessionStore::new(path))
    }

    fn manual_entry(amount: f64) -> NewEntry {
        NewEntry {
            category: Category::Food,
            kind: "beef".to_string(),
            amount: Some(amount),
            date: NaiveDate::from_ymd_opt(2025, 3, 1),
            description: "Butcher run".to_string(),
            details: ActivityDetails::None,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_login_success() {
        let mut session = create_test_session("login");

        let user = session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();
        assert_eq!(user.id, 1);
        assert_close(user.total_emissions, 930.5);
        assert!(session.current().is_some());

        session.logout().unwrap();
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let mut session = create_test_session("login_fail");

        let wrong_password = session.login(ALEX_EMAIL, "nope").unwrap_err();
        let unknown_email = session.login("ghost@example.com", "demo2024").unwrap_err();

        assert!(wrong_password.is_invalid_credentials());
        assert!(unknown_email.is_invalid_credentials());
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_login_recomputes_total_from_records() {
        let mut catalog = Catalog::builtin();
        // A drifted profile total must not survive login.
        catalog.users[0].total_emissions = 1.0;

        let path = std::env::temp_dir().join(format!(
            "ecotrack_session_recompute_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let mut session = Session::new(&catalog, SessionStore::new(path));

        let user = session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();
        assert_close(user.total_emissions, 930.5);

        session.logout().unwrap();
    }

    #[test]
    fn test_register_assigns_next_id_and_logs_in() {
        let mut session = create_test_session("register");

        let user = session
            .register(NewUser {
                name: "Robin Mars".to_string(),
                email: "robin@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .unwrap();

        assert_eq!(user.id, 3);
        assert_eq!(user.level, 1);
        assert_eq!(user.xp, 0);
        assert_close(user.total_emissions, 0.0);
        assert_eq!(user.joined_date, Local::now().date_naive());

        // The new user is part of the in-process list.
        session.logout().unwrap();
        let user = session.login("robin@example.com", "hunter22").unwrap();
        assert_eq!(user.id, 3);

        session.logout().unwrap();
    }

    #[test]
    fn test_register_rejects_bad_form() {
        let mut session = create_test_session("register_invalid");

        let err = session
            .register(NewUser {
                name: String::new(),
                email: "not-an-email".to_string(),
                password: "ok".to_string(),
            })
            .unwrap_err();

        let fields: Vec<&str> = err
            .field_errors()
            .unwrap()
            .iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_logout_clears_session_and_snapshot() {
        let mut session = create_test_session("logout");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        session.logout().unwrap();
        assert!(session.current().is_none());
        assert!(session.store.load().unwrap().is_none());

        // Logging out twice is fine.
        session.logout().unwrap();
    }

    #[test]
    fn test_add_entry_requires_login() {
        let mut session = create_test_session("entry_no_login");
        let err = session.add_entry(manual_entry(10.0)).unwrap_err();
        assert!(matches!(err, Error::NotLoggedIn));
    }

    #[test]
    fn test_add_entry_manual_amount() {
        let mut session = create_test_session("entry_manual");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        let record = session.add_entry(manual_entry(10.0)).unwrap();
        assert_eq!(record.id, 10);
        assert_close(record.amount, 10.0);

        let user = session.current_user().unwrap();
        assert_close(user.total_emissions, 940.5);

        // The snapshot already reflects the new total.
        let saved = session.store.load().unwrap().unwrap();
        assert_close(saved.total_emissions, 940.5);

        session.logout().unwrap();
    }

    #[test]
    fn test_add_entry_calculates_missing_amount() {
        let mut session = create_test_session("entry_calculated");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        let record = session
            .add_entry(NewEntry {
                category: Category::Transportation,
                kind: "car".to_string(),
                amount: None,
                date: NaiveDate::from_ymd_opt(2025, 3, 2),
                description: "Airport run".to_string(),
                details: ActivityDetails::Car {
                    distance_km: 50.0,
                    fuel_type: FuelType::Petrol,
                },
            })
            .unwrap();

        assert_close(record.amount, 115.5);
        assert_close(session.current_user().unwrap().total_emissions, 1046.0);

        session.logout().unwrap();
    }

    #[test]
    fn test_add_entry_rejects_bad_manual_amount() {
        let mut session = create_test_session("entry_invalid");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        let err = session.add_entry(manual_entry(-5.0)).unwrap_err();
        assert!(err.is_invalid_entry());
        assert_eq!(err.field_errors().unwrap()[0].field, "amount");
        assert_eq!(session.records().unwrap().len(), 6);

        session.logout().unwrap();
    }

    #[test]
    fn test_add_entry_rejects_empty_description() {
        let mut session = create_test_session("entry_no_description");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        let err = session
            .add_entry(NewEntry {
                category: Category::Energy,
                kind: "electricity".to_string(),
                amount: None,
                date: None,
                description: "   ".to_string(),
                details: ActivityDetails::Energy { usage: 100.0 },
            })
            .unwrap_err();

        assert!(err.is_invalid_entry());
        assert_eq!(err.field_errors().unwrap()[0].field, "description");

        session.logout().unwrap();
    }

    #[test]
    fn test_add_entry_stores_calculated_zero() {
        let mut session = create_test_session("entry_zero");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        // Details that do not match the kind quantify as zero.
        let record = session
            .add_entry(NewEntry {
                category: Category::Energy,
                kind: "electricity".to_string(),
                amount: None,
                date: None,
                description: "Bill with no reading".to_string(),
                details: ActivityDetails::None,
            })
            .unwrap();

        assert_close(record.amount, 0.0);
        assert_eq!(session.records().unwrap().len(), 7);

        session.logout().unwrap();
    }

    #[test]
    fn test_update_profile() {
        let mut session = create_test_session("profile");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        let user = session
            .update_profile(
                Some("Alex Johnson".to_string()),
                Some("alex@carbontrac.com".to_string()),
            )
            .unwrap();
        assert_eq!(user.name, "Alex Johnson");
        assert_eq!(user.email, "alex@carbontrac.com");

        // The user list follows, so the new email logs in.
        session.logout().unwrap();
        let user = session.login("alex@carbontrac.com", ALEX_PASSWORD).unwrap();
        assert_eq!(user.id, 1);

        session.logout().unwrap();
    }

    #[test]
    fn test_update_profile_rejects_invalid_email() {
        let mut session = create_test_session("profile_invalid");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        let err = session
            .update_profile(None, Some("not-an-email".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidProfile { .. }));
        assert_eq!(session.current_user().unwrap().email, ALEX_EMAIL);

        session.logout().unwrap();
    }

    #[test]
    fn test_update_profile_requires_login() {
        let mut session = create_test_session("profile_no_login");
        let err = session.update_profile(Some("X".to_string()), None).unwrap_err();
        assert!(matches!(err, Error::NotLoggedIn));
    }

    #[test]
    fn test_resume_restores_saved_profile() {
        let path = std::env::temp_dir().join(format!(
            "ecotrack_session_resume_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let catalog = Catalog::builtin();

        let mut first = Session::new(&catalog, SessionStore::new(&path));
        first.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();
        drop(first);

        let mut second = Session::new(&catalog, SessionStore::new(&path));
        let resumed = second.resume().unwrap().unwrap();
        assert_eq!(resumed.id, 1);
        assert_close(resumed.total_emissions, 930.5);

        second.logout().unwrap();
    }

    #[test]
    fn test_resume_without_snapshot() {
        let mut session = create_test_session("resume_empty");
        assert!(session.resume().unwrap().is_none());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_records_scoped_to_current_user() {
        let mut session = create_test_session("records");
        session
            .login("sarah.chen@greenfuture.org", "demo2024")
            .unwrap();

        let records = session.records().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.user_id == 2));

        session.logout().unwrap();
    }

    #[test]
    fn test_dashboard_summary() {
        let mut session = create_test_session("dashboard");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        let dashboard = session.dashboard(today).unwrap();

        assert_close(dashboard.total_emissions, 930.5);
        assert_close(dashboard.month_to_date, 181.2);
        assert_eq!(dashboard.recent_records.len(), 5);
        let ids: Vec<i64> = dashboard.recent_records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![6, 5, 4, 3, 2]);
        assert_eq!(dashboard.streak, 12);
        assert_eq!(dashboard.level, 4);
        assert_eq!(dashboard.level_progress_percent, 75);
        assert_eq!(dashboard.next_level_xp, 300);
        assert_eq!(dashboard.recent_achievements.len(), 3);

        session.logout().unwrap();
    }

    #[test]
    fn test_dashboard_recent_records_follow_insertion_order() {
        let mut session = create_test_session("dashboard_backdated");
        session.login(ALEX_EMAIL, ALEX_PASSWORD).unwrap();

        let mut entry = manual_entry(10.0);
        entry.date = NaiveDate::from_ymd_opt(2024, 12, 1);
        let backdated = session.add_entry(entry).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        let dashboard = session.dashboard(today).unwrap();
        assert_eq!(dashboard.recent_records[0].id, backdated.id);

        session.logout().unwrap();
    }

    #[test]
    fn test_dashboard_requires_login() {
        let session = create_test_session("dashboard_no_login");
        let today = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        assert!(session.dashboard(today).is_err());
    }
}
