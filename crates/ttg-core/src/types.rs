//! Core error types and project name rules.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Name accepted for any entry, whether or not it is registered.
pub const CATCH_ALL_PROJECT: &str = "other";

/// Validation errors for user-supplied values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The project is neither registered nor the catch-all.
    #[error("project '{name}' is not in the project list")]
    UnknownProject { name: String },

    /// The name cannot be used as a project (and file) name.
    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: &'static str },

    /// The project is already registered.
    #[error("project '{name}' already exists")]
    ProjectExists { name: String },

    /// The project is not registered.
    #[error("project '{name}' does not exist")]
    ProjectMissing { name: String },

    /// A date argument could not be parsed.
    #[error(
        "invalid date: {value}. Use YYYY-MM-DD (e.g., 2024-06-01) or relative (e.g., 'yesterday', '3 days ago')"
    )]
    InvalidDate { value: String },

    /// The report window ends before it starts.
    #[error("invalid report window: {from} is after {to}")]
    InvalidWindow { from: NaiveDate, to: NaiveDate },
}

/// Errors raised by session state transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Stop was requested for a project with no pending entry.
    #[error("no ongoing session for project '{project}'")]
    NoOngoingSession { project: String },

    /// The entry already carries an end time.
    #[error("session for project '{project}' is already stopped")]
    AlreadyStopped { project: String },

    /// The stop time lies before the start time.
    #[error("session for project '{project}' would end at {end} before its start at {start}")]
    ClockSkew {
        project: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Checks that `name` can be used as a project name.
///
/// Pending entries are stored as `<name>.json`, so the name must be a plain
/// file stem.
pub fn validate_project_name(name: &str) -> Result<(), ValidationError> {
    let reason = if name.trim().is_empty() {
        Some("name cannot be empty")
    } else if name.contains(['/', '\\', '\0']) {
        Some("name cannot contain path separators")
    } else if name.starts_with('.') {
        Some("name cannot start with '.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationError::InvalidProjectName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
