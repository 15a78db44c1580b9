//! CLI command implementations
//!
//! Commands only read and write declaration files. None of them contacts a
//! storage engine; `plan` shows what a create call would send.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::observability::{self, Event, Logger};
use crate::schema::{DeclaredTable, SchemaError, SchemaLoader, INDEX_KEY, TYPE_KEY};
use crate::table::create_options;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let output = match cmd {
        Command::Check { config } => {
            let (_, loader) = boot(&config)?;
            check(&loader)
        }
        Command::Describe { config, table } => {
            let (_, loader) = boot(&config)?;
            describe(&loader, &table)?
        }
        Command::Plan { config, table } => {
            let (config, loader) = boot(&config)?;
            plan(&config, &loader, &table)?
        }
        Command::Declare {
            config,
            table,
            attributes,
            table_type,
            index,
        } => {
            let (_, loader) = boot(&config)?;
            let declaration = declaration_from_args(&attributes, table_type.as_deref(), &index);
            declare(&loader, &table, &declaration)?
        }
    };

    write_response(output)
}

/// Loads config, installs logging and loads every declaration.
fn boot(config_path: &Path) -> CliResult<(Config, SchemaLoader)> {
    let config = Config::load(config_path)?;
    observability::init(&config.log_level)?;

    let path = config_path.display().to_string();
    Logger::info(Event::ConfigLoaded.as_str(), &[("path", path.as_str())]);

    let mut loader = SchemaLoader::new(&config.schema_path());
    loader.load_all()?;

    Ok((config, loader))
}

/// Summarizes every declared table
pub fn check(loader: &SchemaLoader) -> Value {
    let tables: Vec<Value> = loader
        .all_tables()
        .map(|t| {
            let d = t.descriptor();
            json!({
                "table": d.identity(),
                "size": d.size(),
                "table_type": d.table_type(),
            })
        })
        .collect();

    json!({ "tables": tables })
}

/// Returns the introspection map of one declared table
pub fn describe(loader: &SchemaLoader, table: &str) -> CliResult<Value> {
    let declared = loader.get(table).ok_or_else(|| CliError::unknown_table(table))?;
    Ok(json!({
        "table": table,
        "descriptor": declared.descriptor().introspect(),
    }))
}

/// Returns the options a create call would pass to the engine
pub fn plan(config: &Config, loader: &SchemaLoader, table: &str) -> CliResult<Value> {
    let declared = loader.get(table).ok_or_else(|| CliError::unknown_table(table))?;
    let options = create_options(declared.descriptor(), &config.default_table_options);
    Ok(json!({
        "table": table,
        "create_options": options,
    }))
}

/// Validates a declaration and writes it to the schema directory
pub fn declare(loader: &SchemaLoader, table: &str, declaration: &Value) -> CliResult<Value> {
    if loader.exists(table) {
        return Err(SchemaError::duplicate_identity(table).into());
    }

    let declared = DeclaredTable::declare(table, declaration)?;
    let path = loader.save_declaration(&declared)?;
    Ok(json!({
        "table": table,
        "path": path.display().to_string(),
        "size": declared.descriptor().size(),
    }))
}

/// Builds a declaration from command-line values
pub fn declaration_from_args(attributes: &[String], table_type: Option<&str>, index: &[String]) -> Value {
    let mut fields = Map::new();
    fields.insert(crate::schema::ATTRIBUTES_KEY.to_string(), json!(attributes));
    if let Some(table_type) = table_type {
        fields.insert(TYPE_KEY.to_string(), json!(table_type));
    }
    if !index.is_empty() {
        fields.insert(INDEX_KEY.to_string(), json!(index));
    }
    Value::Object(fields)
}
