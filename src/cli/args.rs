//! CLI argument definitions using clap
//!
//! Commands:
//! - tabledef check --config <path>
//! - tabledef describe --config <path> --table <name>
//! - tabledef plan --config <path> --table <name>
//! - tabledef declare --config <path> --table <name> --attributes a,b

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tabledef - table declarations and lifecycle for storage engines
#[derive(Parser, Debug)]
#[command(name = "tabledef")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every declaration file
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./tabledef.json")]
        config: PathBuf,
    },

    /// Print the descriptor of one declared table
    Describe {
        /// Path to configuration file
        #[arg(long, default_value = "./tabledef.json")]
        config: PathBuf,

        /// Table identity
        #[arg(long)]
        table: String,
    },

    /// Print the options a create call would send to the engine
    Plan {
        /// Path to configuration file
        #[arg(long, default_value = "./tabledef.json")]
        config: PathBuf,

        /// Table identity
        #[arg(long)]
        table: String,
    },

    /// Validate and save a new declaration file
    Declare {
        /// Path to configuration file
        #[arg(long, default_value = "./tabledef.json")]
        config: PathBuf,

        /// Table identity
        #[arg(long)]
        table: String,

        /// Attribute names, primary key first
        #[arg(long, value_delimiter = ',', required = true)]
        attributes: Vec<String>,

        /// Table type: set, ordered_set or bag
        #[arg(long = "type")]
        table_type: Option<String>,

        /// Secondary index attributes
        #[arg(long, value_delimiter = ',')]
        index: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
