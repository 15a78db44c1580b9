//! Configuration file
//!
//! ```json
//! {
//!   "schema_dir": "./schemas",
//!   "log_level": "info",
//!   "default_table_options": { "disc_copies": ["node@host"] }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding declaration files (required).
    /// Relative paths are resolved against the config file's directory.
    pub schema_dir: String,

    /// Log filter used when `RUST_LOG` is unset (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Options applied as overrides on every create (optional, default empty)
    #[serde(default)]
    pub default_table_options: Map<String, Value>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::config_error("schema_dir must not be empty"));
        }

        if EnvFilter::try_new(&self.log_level).is_err() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'",
                self.log_level
            )));
        }

        if self.default_table_options.contains_key(crate::schema::ATTRIBUTES_KEY) {
            return Err(CliError::config_error(
                "default_table_options must not set attributes",
            ));
        }

        Ok(())
    }

    /// Resolved schema directory
    pub fn schema_path(&self) -> PathBuf {
        let dir = Path::new(&self.schema_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.base_dir.join(dir)
        }
    }
}
