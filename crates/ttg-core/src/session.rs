//! Session lifecycle for a tracked project.
//!
//! A project moves from [`SessionState::Idle`] to [`SessionState::Running`]
//! when started. Stopping either archives the entry to history (back to
//! `Idle`) or discards it. The transitions here are pure; persistence and the
//! archive-before-delete ordering live in the store.

use chrono::{DateTime, Duration, Utc};

use crate::entry::TimeEntry;
use crate::types::SessionError;

/// Observable state of a project's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No pending entry.
    Idle,
    /// A pending entry exists and has no end time.
    Running,
    /// The pending entry was deleted without being archived.
    Discarded,
}

impl SessionState {
    /// State implied by an optional pending entry.
    pub const fn of(pending: Option<&TimeEntry>) -> Self {
        match pending {
            Some(entry) if entry.is_running() => Self::Running,
            _ => Self::Idle,
        }
    }
}

/// What to do with a pending entry when it is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopMode {
    /// Append to history, then delete the pending entry.
    #[default]
    Archive,
    /// Delete the pending entry without recording it.
    Discard,
}

impl StopMode {
    pub const fn from_discard_flag(discard: bool) -> Self {
        if discard { Self::Discard } else { Self::Archive }
    }

    /// State the project ends up in after stopping with this mode.
    pub const fn final_state(self) -> SessionState {
        match self {
            Self::Archive => SessionState::Idle,
            Self::Discard => SessionState::Discarded,
        }
    }
}

/// Opens a new running entry for `project` at `now`.
pub fn begin(project: &str, now: DateTime<Utc>) -> TimeEntry {
    TimeEntry::new(project, now)
}

/// Closes a running entry at `now`.
pub fn finish(entry: TimeEntry, now: DateTime<Utc>) -> Result<TimeEntry, SessionError> {
    if !entry.is_running() {
        return Err(SessionError::AlreadyStopped {
            project: entry.project,
        });
    }
    if now < entry.start_time {
        return Err(SessionError::ClockSkew {
            project: entry.project,
            start: entry.start_time,
            end: now,
        });
    }

    Ok(TimeEntry {
        end_time: Some(now),
        ..entry
    })
}

/// A pending entry as shown by `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OngoingSession {
    pub project: String,
    pub start_time: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Builds the status view of pending entries, sorted by project name.
///
/// Elapsed time is computed against `now` on every call and never stored.
pub fn ongoing_sessions(pending: &[TimeEntry], now: DateTime<Utc>) -> Vec<OngoingSession> {
    let mut sessions: Vec<OngoingSession> = pending
        .iter()
        .map(|entry| OngoingSession {
            project: entry.project.clone(),
            start_time: entry.start_time,
            elapsed: entry.elapsed(now),
        })
        .collect();
    sessions.sort_by(|a, b| a.project.cmp(&b.project));
    sessions
}
