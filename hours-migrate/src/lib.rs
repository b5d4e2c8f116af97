//! Moves monthly hour allocations between two Smartsheet sheets.
//!
//! The source sheet holds one row per project and person with twelve monthly
//! hours-per-week columns. Each non-empty month becomes its own row on the
//! destination sheet.

pub mod api;
pub mod cli;
pub mod config;
pub mod migrate;
pub mod transform;

pub use config::{ApiConfig, ConfigOverrides, MigrationConfig};
pub use migrate::{MigrationOutcome, run};
