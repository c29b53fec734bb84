//! dltidy - sort a downloads folder into category subfolders
//!
//! This library classifies files by extension, moves them into
//! `Organized/<Category>/` without overwriting existing entries, and reports
//! per-category totals. Filtering of platform metadata files is configurable
//! via TOML.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use file_category::{Category, CategoryTable, classify};
pub use file_organizer::{Clock, FileOrganizer, FixedClock, MoveOutcome, OrganizeError, SystemClock};

pub use cli::{OrganizeCommand, OrganizeReport, Organizer, RunError, RunOutcome, run_cli};
