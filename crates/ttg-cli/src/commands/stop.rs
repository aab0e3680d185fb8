//! Stop command for closing or discarding a session.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use ttg_core::{StopMode, format_duration};
use ttg_store::Store;

/// Runs the stop command.
pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    project: &str,
    mode: StopMode,
    now: DateTime<Utc>,
) -> Result<()> {
    let _lock = store.lock()?;
    let entry = store
        .stop(project, mode, now)
        .with_context(|| format!("couldn't stop tracking project '{project}'"))?;

    match mode {
        StopMode::Discard => {
            writeln!(writer, "Deleted tracking session for project: {project}")?;
        }
        StopMode::Archive => {
            let duration = entry.duration().unwrap_or_else(Duration::zero);
            writeln!(
                writer,
                "Stopped tracking time for project: {} ({})",
                entry.project,
                format_duration(duration)
            )?;
        }
    }
    Ok(())
}
