//! Observable events
//!
//! Every log line carries one of these as its `event` field.

use std::fmt;

/// Observable events in tabledef
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Declaration files loaded
    SchemasLoaded,

    // Declaration
    /// Declaration validated and descriptor built
    TableDeclared,

    // Lifecycle
    /// Create requested
    TableCreate,
    /// Engine table created
    TableCreated,
    /// Engine refused create
    TableCreateFailed,
    /// Engine table deleted
    TableDeleted,
    /// Engine refused delete
    TableDeleteFailed,
    /// Engine table emptied
    TableCleared,
    /// Engine refused clear
    TableClearFailed,
    /// Table info queried
    TableInfo,
    /// Engine faulted while answering an info query
    TableInfoFault,

    /// Lifecycle call with an identity that has no descriptor
    NotATable,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",

            Event::TableDeclared => "TABLE_DECLARED",

            Event::TableCreate => "TABLE_CREATE_BEGIN",
            Event::TableCreated => "TABLE_CREATE_COMPLETE",
            Event::TableCreateFailed => "TABLE_CREATE_FAILED",
            Event::TableDeleted => "TABLE_DELETE_COMPLETE",
            Event::TableDeleteFailed => "TABLE_DELETE_FAILED",
            Event::TableCleared => "TABLE_CLEAR_COMPLETE",
            Event::TableClearFailed => "TABLE_CLEAR_FAILED",
            Event::TableInfo => "TABLE_INFO",
            Event::TableInfoFault => "TABLE_INFO_FAULT",

            Event::NotATable => "NOT_A_TABLE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::TableInfoFault)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
