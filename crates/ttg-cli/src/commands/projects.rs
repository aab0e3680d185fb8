//! Projects command for listing and editing the project registry.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use ttg_core::ProjectListing;
use ttg_store::Store;

use crate::cli::ProjectsArgs;

/// Formats the project listing, one project per line with its status glyph.
pub fn format_listing(listing: &[ProjectListing]) -> String {
    let mut output = String::new();

    if listing.is_empty() {
        writeln!(output, "No projects yet.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'ttg projects --add <name>' to register one.").unwrap();
        return output;
    }

    let width = listing.iter().map(|row| row.project.chars().count()).max().unwrap_or(0);
    for row in listing {
        writeln!(
            output,
            "{} {:<width$}  {}",
            row.status.glyph(),
            row.project,
            row.status
        )
        .unwrap();
    }

    output
}

/// Runs the projects command.
pub fn run<W: Write>(writer: &mut W, store: &Store, args: &ProjectsArgs) -> Result<()> {
    if let Some(name) = &args.add {
        let _lock = store.lock()?;
        store
            .add_project(name)
            .with_context(|| format!("couldn't add project '{name}'"))?;
        writeln!(writer, "Added project: {name}")?;
        return Ok(());
    }

    if let Some(name) = &args.delete {
        let _lock = store.lock()?;
        store
            .remove_project(name)
            .with_context(|| format!("couldn't delete project '{name}'"))?;
        writeln!(writer, "Deleted project: {name}")?;
        return Ok(());
    }

    let listing = store.listing()?;
    write!(writer, "{}", format_listing(&listing))?;
    Ok(())
}
