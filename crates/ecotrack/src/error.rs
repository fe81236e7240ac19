//! Error types for ecotrack.
//!
//! This module defines all error types used throughout the ecotrack crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// A single failed validation check on a manual emission entry.
///
/// Entries are validated field by field and every offending field is
/// reported, so callers can surface each message next to its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending input field.
    pub field: &'static str,
    /// Human-readable message for that field.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The main error type for ecotrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Catalog Errors ===
    /// Failed to load the static catalog.
    #[error("failed to load catalog: {0}")]
    CatalogLoad(Box<figment::Error>),

    /// The catalog violates a data-model invariant.
    #[error("invalid catalog: {message}")]
    CatalogValidation {
        /// Description of the violated invariant.
        message: String,
    },

    // === Session Errors ===
    /// Login failed. Deliberately does not distinguish an unknown email
    /// from a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The operation requires a logged-in user.
    #[error("no user is logged in")]
    NotLoggedIn,

    /// A manual emission entry failed validation.
    #[error("invalid entry: {}", summarize(.errors))]
    InvalidEntry {
        /// One entry per offending field.
        errors: Vec<FieldError>,
    },

    /// A registration form failed validation.
    #[error("invalid registration: {}", summarize(.errors))]
    InvalidRegistration {
        /// One entry per offending field.
        errors: Vec<FieldError>,
    },

    /// A profile edit failed validation.
    #[error("invalid profile: {}", summarize(.errors))]
    InvalidProfile {
        /// One entry per offending field.
        errors: Vec<FieldError>,
    },

    // === Calculator Errors ===
    /// No emission factor exists for the requested activity.
    #[error("no emission factor for {category}/{kind}")]
    UnknownActivity {
        /// Category the lookup was scoped to.
        category: String,
        /// Activity kind that has no factor.
        kind: String,
    },

    // === Snapshot Errors ===
    /// Failed to read the session snapshot file.
    #[error("failed to read session snapshot at {path}: {source}")]
    SnapshotRead {
        /// Path to the snapshot file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot was written by a newer version of this program.
    #[error("session snapshot version {found} is newer than supported version {supported}")]
    SnapshotVersion {
        /// Version found in the snapshot.
        found: u32,
        /// Highest version this build understands.
        supported: u32,
    },

    // === Export Errors ===
    /// Export was requested but no records matched the filters.
    #[error("no emission records match the selected filters")]
    ExportEmpty,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for ecotrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a catalog validation error.
    #[must_use]
    pub fn catalog_validation(message: impl Into<String>) -> Self {
        Self::CatalogValidation {
            message: message.into(),
        }
    }

    /// Create an unknown-activity error.
    #[must_use]
    pub fn unknown_activity(category: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnknownActivity {
            category: category.into(),
            kind: kind.into(),
        }
    }

    /// Create an invalid-entry error from per-field failures.
    #[must_use]
    pub fn invalid_entry(errors: Vec<FieldError>) -> Self {
        Self::InvalidEntry { errors }
    }

    /// Create an invalid-registration error from per-field failures.
    #[must_use]
    pub fn invalid_registration(errors: Vec<FieldError>) -> Self {
        Self::InvalidRegistration { errors }
    }

    /// Create an invalid-profile error from per-field failures.
    #[must_use]
    pub fn invalid_profile(errors: Vec<FieldError>) -> Self {
        Self::InvalidProfile { errors }
    }

    /// Check if this error is the generic authentication failure.
    #[must_use]
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    /// Check if this error is a manual-entry validation failure.
    #[must_use]
    pub fn is_invalid_entry(&self) -> bool {
        matches!(self, Self::InvalidEntry { .. })
    }

    /// Check if this error is the empty-export notice.
    #[must_use]
    pub fn is_export_empty(&self) -> bool {
        matches!(self, Self::ExportEmpty)
    }

    /// Per-field failures carried by a form-validation error, if any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::InvalidEntry { errors }
            | Self::InvalidRegistration { errors }
            | Self::InvalidProfile { errors } => Some(errors),
            _ => None,
        }
    }
}
