//! Storage engine boundary
//!
//! The engine owns live tables. This crate only issues the four calls on
//! [`StorageEngine`] and interprets their native results.

use serde_json::{Map, Value};
use thiserror::Error;

/// Recoverable refusal reported by an engine table operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineAbort {
    #[error("already_exists: {0}")]
    AlreadyExists(String),

    #[error("no_exists: {0}")]
    NoExists(String),

    #[error("{0}")]
    Other(String),
}

/// Native result of create, delete and clear
pub type EngineReply = Result<(), EngineAbort>;

/// Engine failure while answering an info query.
///
/// Not recoverable: it means the caller asked for something that cannot be
/// answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFault {
    #[error("bad info key '{key}' for table '{table}'")]
    BadKey { table: String, key: String },

    #[error("no_exists: {0}")]
    NoExists(String),

    #[error("engine fault: {0}")]
    Other(String),
}

/// Key of a table info query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InfoKey {
    /// Every field the engine knows
    All,
    /// A single named field
    Named(String),
}

impl InfoKey {
    pub fn named(key: impl Into<String>) -> Self {
        InfoKey::Named(key.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            InfoKey::All => "all",
            InfoKey::Named(key) => key,
        }
    }
}

impl Default for InfoKey {
    fn default() -> Self {
        InfoKey::All
    }
}

impl From<&str> for InfoKey {
    fn from(key: &str) -> Self {
        if key == "all" {
            InfoKey::All
        } else {
            InfoKey::named(key)
        }
    }
}

/// Table operations a storage engine must provide.
pub trait StorageEngine {
    /// Creates `table`. `options` always includes `attributes`.
    fn create_table(&self, table: &str, options: &Map<String, Value>) -> EngineReply;

    /// Drops `table` and its contents.
    fn delete_table(&self, table: &str) -> EngineReply;

    /// Answers a metadata query.
    fn table_info(&self, table: &str, key: &InfoKey) -> Result<Value, EngineFault>;

    /// Removes every record of `table`, keeping its definition.
    fn clear_table(&self, table: &str) -> EngineReply;
}

impl<E: StorageEngine + ?Sized> StorageEngine for &E {
    fn create_table(&self, table: &str, options: &Map<String, Value>) -> EngineReply {
        (**self).create_table(table, options)
    }

    fn delete_table(&self, table: &str) -> EngineReply {
        (**self).delete_table(table)
    }

    fn table_info(&self, table: &str, key: &InfoKey) -> Result<Value, EngineFault> {
        (**self).table_info(table, key)
    }

    fn clear_table(&self, table: &str) -> EngineReply {
        (**self).clear_table(table)
    }
}
