//! CLI command handlers
//!
//! Each subcommand is implemented in its own module.

pub mod adapt;
pub mod config;
pub mod helpers;
pub mod init;
pub mod params;
pub mod record;
pub mod report;
pub mod score;
