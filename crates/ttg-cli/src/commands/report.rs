//! Report command for summarizing tracked time.
//!
//! This module implements `ttg report` over a date window with optional
//! project include/ignore lists, and renders the result as text, JSON or CSV.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use ttg_core::{ProjectFilter, Report, ReportWindow, TimeEntry, aggregate, format_duration};
use ttg_store::Store;

use super::util::{MINUTE_FORMAT, format_local, parse_date};
use crate::cli::ReportArgs;

/// Header date format, e.g. "Mon 03 June 2024".
const HEADER_DATE_FORMAT: &str = "%a %d %B %Y";

/// Output format of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub const fn from_flags(json: bool, csv: bool) -> Self {
        if json {
            Self::Json
        } else if csv {
            Self::Csv
        } else {
            Self::Text
        }
    }
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub timezone: String,
    pub report: Report,
}

// ========== Report Generation ==========

/// Generates report data from the store.
///
/// Dates are resolved against `today`. Every project named in the include or
/// ignore list must be known to the registry.
pub fn generate_report_data(
    store: &Store,
    args: &ReportArgs,
    today: NaiveDate,
) -> Result<ReportData> {
    let from = args
        .from
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?;
    let to = args
        .to
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?;
    let window = ReportWindow::resolve(from, to, today)?;

    let filter = ProjectFilter::new(args.projects.clone(), args.ignore_projects.clone());
    let registry = store.registry()?;
    for project in filter.named_projects() {
        registry.validate(project)?;
    }

    let history = store.history().context("couldn't read history")?;
    let report = aggregate(&history, window, &filter);

    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());

    Ok(ReportData { timezone, report })
}

// ========== Text Output ==========

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();
    let report = &data.report;

    writeln!(
        output,
        "{} -> {} ({})",
        report.window.from.format(HEADER_DATE_FORMAT),
        report.window.to.format(HEADER_DATE_FORMAT),
        data.timezone
    )
    .unwrap();
    writeln!(output).unwrap();

    if report.is_empty() {
        writeln!(output, "No entries recorded in this period.").unwrap();
        return output;
    }

    for (project, summary) in &report.projects {
        writeln!(output, "{project} - {}", format_duration(summary.total)).unwrap();
        for entry in &summary.entries {
            writeln!(output, "    {}", format_entry_line(entry)).unwrap();
        }
        writeln!(output).unwrap();
    }

    writeln!(output, "Total - {}", format_duration(report.total())).unwrap();
    output
}

fn format_entry_line(entry: &TimeEntry) -> String {
    let end = entry.end_time.map_or_else(String::new, |t| format_local(t, MINUTE_FORMAT));
    let duration = entry.duration().map_or_else(String::new, format_duration);
    format!(
        "{} to {end} ({duration})",
        format_local(entry.start_time, MINUTE_FORMAT)
    )
}

// ========== JSON Output ==========

/// Formats the report as JSON keyed by project, indented with four spaces.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let by_project: BTreeMap<&str, &[TimeEntry]> = data
        .report
        .projects
        .iter()
        .map(|(project, summary)| (project.as_str(), summary.entries.as_slice()))
        .collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    by_project
        .serialize(&mut serializer)
        .context("couldn't encode report as JSON")?;

    Ok(String::from_utf8(buf)?)
}

// ========== CSV Output ==========

/// Formats the report as flat CSV rows.
pub fn format_report_csv(data: &ReportData) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(["Project", "Start Time", "End Time", "Duration"])?;
    for (project, summary) in &data.report.projects {
        for entry in &summary.entries {
            let start = format_local(entry.start_time, MINUTE_FORMAT);
            let end = entry.end_time.map_or_else(String::new, |t| format_local(t, MINUTE_FORMAT));
            let duration = entry.duration().map_or_else(String::new, format_duration);
            writer.write_record([
                project.as_str(),
                start.as_str(),
                end.as_str(),
                duration.as_str(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context("couldn't flush CSV output")?;
    Ok(String::from_utf8(bytes)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    args: &ReportArgs,
    today: NaiveDate,
) -> Result<()> {
    let data = generate_report_data(store, args, today)?;

    match OutputFormat::from_flags(args.json, args.csv) {
        OutputFormat::Text => write!(writer, "{}", format_report(&data))?,
        OutputFormat::Json => writeln!(writer, "{}", format_report_json(&data)?)?,
        OutputFormat::Csv => write!(writer, "{}", format_report_csv(&data)?)?,
    }

    Ok(())
}
