//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ttg_core::CATCH_ALL_PROJECT;

/// Time to go: track time spent on your projects.
///
/// Start and stop timers against named projects and get a report of where
/// the time went.
#[derive(Debug, Parser)]
#[command(name = "ttg", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start tracking time for a project.
    Start {
        /// Project name.
        #[arg(default_value = CATCH_ALL_PROJECT)]
        project: String,
    },

    /// Stop tracking time for a project.
    Stop {
        /// Project name.
        #[arg(default_value = CATCH_ALL_PROJECT)]
        project: String,

        /// Delete the current session without saving it to the history.
        #[arg(short, long)]
        delete: bool,
    },

    /// List ongoing sessions with their start and elapsed time.
    Status,

    /// List, add or delete projects.
    Projects(ProjectsArgs),

    /// Generate a report for a time frame.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct ProjectsArgs {
    /// Register a new project.
    #[arg(long, value_name = "NAME")]
    pub add: Option<String>,

    /// Remove a registered project.
    #[arg(long, value_name = "NAME")]
    pub delete: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// First day of the report (YYYY-MM-DD, 'yesterday', '3 days ago').
    #[arg(short, long, value_name = "DATE")]
    pub from: Option<String>,

    /// Last day of the report, inclusive.
    #[arg(short, long, value_name = "DATE")]
    pub to: Option<String>,

    /// Only include these projects.
    #[arg(short = 'p', long = "project", value_name = "NAME", value_delimiter = ',')]
    pub projects: Vec<String>,

    /// Leave these projects out.
    #[arg(short = 'i', long = "ignore-project", value_name = "NAME", value_delimiter = ',')]
    pub ignore_projects: Vec<String>,

    /// Output report as JSON.
    #[arg(short, long, conflicts_with = "csv")]
    pub json: bool,

    /// Output report as CSV.
    #[arg(short, long)]
    pub csv: bool,
}
