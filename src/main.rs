//! # datascrub command-line entry point
//!
//! ```bash
//! datascrub survey_export.xlsx -o cleaned.json -f json
//! ```
//!
//! Exits 0 after printing where the cleaned data went. Any failure is logged,
//! reported on stderr, and turned into exit status 1.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout, clippy::print_stderr)] // CLI reports to the terminal

mod cli;

use clap::Parser as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    match cli::run(&cli) {
        Ok(output) => {
            println!("\nSUCCESS: Cleaned data saved to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("\nERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
