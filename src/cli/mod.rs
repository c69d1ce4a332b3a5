//! CLI module for aerosearch
//!
//! Provides command-line interface for:
//! - query: one search over a JSON data file
//! - collections: list collections in a data file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{collections, parse_params, query, run, run_command, Dataset};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response, write_to};
