//! Time tracker CLI library.
//!
//! This crate provides the `ttg` command-line interface on top of the
//! JSON file store.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ProjectsArgs, ReportArgs};
pub use config::Config;
