//! CLI module
//!
//! Provides the command-line interface:
//! - deploy: compile a source file and store it as a named function
//! - invoke: run a stored function and print its result
//! - logs: print the audit trail recorded for a function

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::run;
pub use errors::{CliError, CliResult};
