//! `ecotrack` - A personal carbon footprint tracker
//!
//! This library provides the core functionality for logging emission
//! activities, calculating amounts from per-activity emission factors,
//! and reporting totals against national and global baselines.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod achievements;
pub mod activity;
pub mod analytics;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod factors;
pub mod logging;
pub mod session;
pub mod store;
pub mod user;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use session::{DashboardSummary, Session};
pub use store::{EmissionLog, SessionStore};
pub use user::UserProfile;
