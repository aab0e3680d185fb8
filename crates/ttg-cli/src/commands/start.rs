//! Start command for opening a session.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ttg_store::Store;

use super::util::{SECOND_FORMAT, format_local};

/// Runs the start command.
pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    project: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let _lock = store.lock()?;
    let outcome = store
        .start(project, now)
        .with_context(|| format!("couldn't start tracking project '{project}'"))?;

    if let Some(replaced) = &outcome.replaced {
        writeln!(
            writer,
            "Replaced running session for project '{}' started at {}",
            replaced.project,
            format_local(replaced.start_time, SECOND_FORMAT)
        )?;
    }
    writeln!(writer, "Started tracking time for project: {project}")?;
    Ok(())
}
