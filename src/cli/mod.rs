//! CLI module for tabledef
//!
//! Provides command-line interface for:
//! - check: validate all declaration files
//! - describe: print a table descriptor
//! - plan: print the options a create call would send
//! - declare: write a new declaration file

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, declaration_from_args, declare, describe, plan, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{response, write_response};
