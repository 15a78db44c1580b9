//! Lifecycle errors

use thiserror::Error;

use super::engine::{EngineAbort, EngineFault};

/// Result type for lifecycle operations
pub type TableResult<T> = Result<T, TableError>;

/// Lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    // Caller errors
    #[error("'{identity}' is not a declared table")]
    NotATable { identity: String },

    // Recoverable engine conditions
    #[error("table '{identity}' already exists")]
    AlreadyExists { identity: String },

    #[error("table '{identity}' does not exist")]
    NoExists { identity: String },

    #[error("engine rejected operation on '{identity}': {reason}")]
    Engine { identity: String, reason: String },

    // Unrecoverable
    #[error(transparent)]
    Fault(#[from] EngineFault),
}

impl TableError {
    pub(crate) fn not_a_table(identity: &str) -> Self {
        TableError::NotATable {
            identity: identity.to_string(),
        }
    }

    /// Translates an engine refusal for `identity`
    pub(crate) fn from_abort(identity: &str, abort: EngineAbort) -> Self {
        let identity = identity.to_string();
        match abort {
            EngineAbort::AlreadyExists(_) => TableError::AlreadyExists { identity },
            EngineAbort::NoExists(_) => TableError::NoExists { identity },
            EngineAbort::Other(reason) => TableError::Engine { identity, reason },
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TableError::NotATable { .. } => "TABLEDEF_NOT_A_TABLE",
            TableError::AlreadyExists { .. } => "TABLEDEF_ALREADY_EXISTS",
            TableError::NoExists { .. } => "TABLEDEF_NO_EXISTS",
            TableError::Engine { .. } => "TABLEDEF_ENGINE_ERROR",
            TableError::Fault(_) => "TABLEDEF_ENGINE_FAULT",
        }
    }

    /// Short reason callers branch on
    pub fn reason(&self) -> &str {
        match self {
            TableError::NotATable { .. } => "not_a_table",
            TableError::AlreadyExists { .. } => "already_exists",
            TableError::NoExists { .. } => "no_exists",
            TableError::Engine { reason, .. } => reason,
            TableError::Fault(_) => "engine_fault",
        }
    }

    /// Identity the error refers to, if any
    pub fn identity(&self) -> Option<&str> {
        match self {
            TableError::NotATable { identity }
            | TableError::AlreadyExists { identity }
            | TableError::NoExists { identity }
            | TableError::Engine { identity, .. } => Some(identity.as_str()),
            TableError::Fault(_) => None,
        }
    }

    /// Engine-reported condition the caller may act on
    pub fn is_engine_error(&self) -> bool {
        matches!(
            self,
            TableError::AlreadyExists { .. } | TableError::NoExists { .. } | TableError::Engine { .. }
        )
    }

    /// Engine fault that must terminate the caller's operation
    pub fn is_fatal(&self) -> bool {
        matches!(self, TableError::Fault(_))
    }
}
