//! CLI argument definitions using clap
//!
//! Commands:
//! - cirrus deploy --config <path> --name <name> --file <source>
//! - cirrus invoke --config <path> --name <name> [--query <json>] [--body <json>]
//! - cirrus logs --config <path> --name <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cirrus - a capability-scoped cloud function invocation engine
#[derive(Parser, Debug)]
#[command(name = "cirrus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a source file and store it as a named function
    Deploy {
        /// Path to configuration file
        #[arg(long, default_value = "./cirrus.json")]
        config: PathBuf,

        /// Function name
        #[arg(long)]
        name: String,

        /// Path to the function source file
        #[arg(long)]
        file: PathBuf,
    },

    /// Invoke a stored function and print its result
    Invoke {
        /// Path to configuration file
        #[arg(long, default_value = "./cirrus.json")]
        config: PathBuf,

        /// Function name
        #[arg(long)]
        name: String,

        /// Query parameters as JSON
        #[arg(long)]
        query: Option<String>,

        /// Request body as JSON
        #[arg(long)]
        body: Option<String>,
    },

    /// Print the audit trail recorded for a function
    Logs {
        /// Path to configuration file
        #[arg(long, default_value = "./cirrus.json")]
        config: PathBuf,

        /// Function name
        #[arg(long)]
        name: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
