//! CLI subcommand implementations.

pub mod projects;
pub mod report;
pub mod start;
pub mod status;
pub mod stop;
mod util;
