//! Unified project listing across history, pending entries and the registry.

use std::collections::BTreeMap;
use std::fmt;

use crate::entry::TimeEntry;
use crate::registry::ProjectRegistry;

/// Where a project currently stands.
///
/// Ordered by precedence: a pending session outranks history, and history
/// outranks a bare registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProjectStatus {
    /// Registered, but never tracked.
    NoEntry,
    /// Tracked before, nothing running now.
    NoSession,
    /// A session is running.
    Session,
}

impl ProjectStatus {
    pub const fn glyph(self) -> char {
        match self {
            Self::Session => '▶',
            Self::NoSession => '■',
            Self::NoEntry => '○',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::NoSession => "no session",
            Self::NoEntry => "no entry",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the project listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListing {
    pub project: String,
    pub status: ProjectStatus,
}

/// Builds the listing, sorted by project name.
///
/// `pending` names the projects that have a pending entry on disk.
pub fn build_listing(
    history: &[TimeEntry],
    pending: &[String],
    registry: &ProjectRegistry,
) -> Vec<ProjectListing> {
    let mut statuses: BTreeMap<&str, ProjectStatus> = BTreeMap::new();

    let sources = registry
        .names()
        .iter()
        .map(|name| (name.as_str(), ProjectStatus::NoEntry))
        .chain(history.iter().map(|e| (e.project.as_str(), ProjectStatus::NoSession)))
        .chain(pending.iter().map(|name| (name.as_str(), ProjectStatus::Session)));

    for (project, status) in sources {
        statuses
            .entry(project)
            .and_modify(|current| *current = (*current).max(status))
            .or_insert(status);
    }

    statuses
        .into_iter()
        .map(|(project, status)| ProjectListing {
            project: project.to_string(),
            status,
        })
        .collect()
}
