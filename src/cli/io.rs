//! JSON output for the CLI
//!
//! - One JSON object per command on stdout
//! - Logs go to stderr, never stdout

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Wraps command output in the success envelope
pub fn response(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response(data))?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
