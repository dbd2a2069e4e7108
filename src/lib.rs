//! # datascrub - batch cleaning for tabular research data
//!
//! datascrub loads a CSV, Excel or JSON file into a table, runs a fixed
//! cleaning sequence over it and writes the result back out as CSV, Excel or
//! JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use datascrub::cleaner::{OutputFormat, clean_data, export_data, load_data};
//! use datascrub::config::CleaningConfig;
//! use std::path::Path;
//!
//! let table = load_data(Path::new("survey.csv"))?;
//! let cleaned = clean_data(table, &CleaningConfig::default())?;
//!
//! let mut df = cleaned.into_df();
//! export_data(&mut df, Path::new("cleaned_data.csv"), OutputFormat::Csv)?;
//! # Ok::<(), datascrub::error::CleanerError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`cleaner`]: Loading, the cleaning stages and exporting
//!   - [`cleaner::text`]: Unicode and whitespace normalization
//!   - [`cleaner::dedup`]: Exact duplicate row removal
//!   - [`cleaner::impute`]: Missing value filling per column kind
//!   - [`cleaner::outliers`]: IQR outlier detection and treatment
//!   - [`cleaner::dates`]: Free-form date parsing to ISO `YYYY-MM-DD`
//!   - [`cleaner::io`]: File loaders and exporters
//! - [`config`]: Run settings, optionally read from a JSON file
//! - [`error`]: Error types and handling utilities
//! - [`logging`]: Per-run append-only log file
//!
//! ## Pipeline Order
//!
//! [`cleaner::clean_data`] always runs the stages in the same order:
//!
//! 1. text normalization (NFKC, collapsed whitespace, empty to missing)
//! 2. exact duplicate removal, keeping the first occurrence
//! 3. imputation (median, current date/time, mode, or empty string)
//! 4. outlier handling on every numeric column
//! 5. date standardization on columns whose name contains "date"
//!
//! Column kinds are classified once at load time and stay fixed for the run.

#![warn(clippy::all, rust_2018_idioms)]

pub mod cleaner;
pub mod config;
pub mod error;
pub mod logging;
