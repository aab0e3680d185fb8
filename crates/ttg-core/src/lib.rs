//! Core domain logic for the ttg time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: tracked intervals and their JSON shape
//! - Sessions: start/stop transitions and the status view
//! - Registry: known project names and the catch-all
//! - Reports: date windows, project filters and per-project totals
//! - Listing: the merged project overview

pub mod entry;
pub mod listing;
pub mod registry;
pub mod report;
pub mod session;
mod types;

pub use entry::TimeEntry;
pub use listing::{ProjectListing, ProjectStatus, build_listing};
pub use registry::ProjectRegistry;
pub use report::{ProjectFilter, ProjectReport, Report, ReportWindow, aggregate, format_duration};
pub use session::{OngoingSession, SessionState, StopMode};
pub use types::{CATCH_ALL_PROJECT, SessionError, ValidationError, validate_project_name};
