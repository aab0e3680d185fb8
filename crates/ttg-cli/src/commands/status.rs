//! Status command for showing ongoing sessions.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use ttg_core::{OngoingSession, format_duration};
use ttg_store::Store;

use super::util::{SECOND_FORMAT, format_local};

/// Formats ongoing sessions for display.
pub fn format_status(sessions: &[OngoingSession]) -> String {
    let mut output = String::new();

    if sessions.is_empty() {
        writeln!(output, "No ongoing sessions.").unwrap();
        return output;
    }

    writeln!(output, "Ongoing sessions:").unwrap();
    for session in sessions {
        writeln!(output, "  Project: {}", session.project).unwrap();
        writeln!(
            output,
            "    Started: {}",
            format_local(session.start_time, SECOND_FORMAT)
        )
        .unwrap();
        writeln!(output, "    Elapsed: {}", format_duration(session.elapsed)).unwrap();
        writeln!(output).unwrap();
    }

    output
}

/// Runs the status command.
pub fn run<W: Write>(writer: &mut W, store: &Store, now: DateTime<Utc>) -> Result<()> {
    let sessions = store.status(now)?;
    write!(writer, "{}", format_status(&sessions))?;
    Ok(())
}
