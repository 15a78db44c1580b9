//! Declaration file loader
//!
//! Declarations live at `<schema_dir>/<name>.json`, one table per file:
//!
//! ```json
//! { "table": "movies", "attributes": ["id", "title"], "type": "set" }
//! ```
//!
//! The `table` key names the schema identity and is not part of the
//! declaration handed to the validator. Identities double as file names, so
//! they must be a single path component. Any unreadable or invalid file
//! aborts the whole load.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::observability::{Event, Logger};

use super::errors::{SchemaError, SchemaResult};
use super::identity::{DeclaredTable, Table};
use super::types::{is_symbolic_name, ATTRIBUTES_KEY};

/// Key naming the schema identity in a declaration file
pub const TABLE_KEY: &str = "table";

/// Loads declaration files and keeps the resulting declared tables.
pub struct SchemaLoader {
    schema_dir: PathBuf,
    tables: BTreeMap<String, DeclaredTable>,
}

impl SchemaLoader {
    /// Creates a loader reading from `schema_dir`.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            tables: BTreeMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory loads nothing.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Deterministic order, so duplicate errors always name the same file.
        paths.sort();

        for path in &paths {
            self.load_schema_file(path)?;
        }

        let count = self.tables.len().to_string();
        let dir = self.schema_dir.display().to_string();
        Logger::info(
            Event::SchemasLoaded.as_str(),
            &[("count", count.as_str()), ("dir", dir.as_str())],
        );

        Ok(())
    }

    /// Loads a single declaration file.
    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let mut declaration: Value = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        let identity = declaration
            .as_object_mut()
            .and_then(|fields| fields.remove(TABLE_KEY))
            .and_then(|name| name.as_str().map(str::to_string))
            .ok_or_else(|| {
                SchemaError::malformed_schema(
                    path.display().to_string(),
                    format!("missing string '{}' key", TABLE_KEY),
                )
            })?;
        check_file_identity(&identity)?;

        let table = DeclaredTable::declare(identity, &declaration)?;
        self.register(table)
    }

    /// Registers a declared table.
    pub fn register(&mut self, table: DeclaredTable) -> SchemaResult<()> {
        let identity = table.identity().to_string();
        if self.tables.contains_key(&identity) {
            return Err(SchemaError::duplicate_identity(identity));
        }

        self.tables.insert(identity, table);
        Ok(())
    }

    /// Gets a declared table by identity.
    pub fn get(&self, identity: &str) -> Option<&DeclaredTable> {
        self.tables.get(identity)
    }

    /// Checks if a table is declared.
    pub fn exists(&self, identity: &str) -> bool {
        self.tables.contains_key(identity)
    }

    /// Returns all declared tables in identity order.
    pub fn all_tables(&self) -> impl Iterator<Item = &DeclaredTable> {
        self.tables.values()
    }

    /// Returns the number of declared tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Writes the declaration of `table` to `<schema_dir>/<identity>.json`.
    ///
    /// An existing file is never overwritten.
    pub fn save_declaration(&self, table: &DeclaredTable) -> SchemaResult<PathBuf> {
        let identity = table.identity();
        check_file_identity(identity)?;

        let path = self.schema_dir.join(format!("{}.json", identity));
        if path.exists() {
            return Err(SchemaError::duplicate_identity(identity));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let descriptor = table.descriptor();
        let mut fields: Map<String, Value> = descriptor.table_options().clone();
        fields.insert(ATTRIBUTES_KEY.to_string(), Value::from(descriptor.attributes().to_vec()));
        fields.insert(TABLE_KEY.to_string(), Value::String(identity.to_string()));
        let file_body = Value::Object(fields);

        let content = serde_json::to_string_pretty(&file_body).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to serialize declaration: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })?;

        Ok(path)
    }
}

/// Rejects identities that would not land directly inside the schema directory.
fn check_file_identity(identity: &str) -> SchemaResult<()> {
    let plain = is_symbolic_name(identity)
        && !identity.contains(['/', '\\'])
        && Path::new(identity).file_name() == Some(OsStr::new(identity));
    if plain {
        Ok(())
    } else {
        Err(SchemaError::invalid_identity(identity))
    }
}
