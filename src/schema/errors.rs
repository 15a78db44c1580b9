//! Schema error types
//!
//! Error codes:
//! - TABLEDEF_INVALID_OPTIONS (REJECT)
//! - TABLEDEF_ATTRIBUTES_NOT_SPECIFIED (REJECT)
//! - TABLEDEF_INVALID_ATTRIBUTES (REJECT)
//! - TABLEDEF_INVALID_INDEX_LIST (REJECT)
//! - TABLEDEF_INVALID_TABLE_TYPE (REJECT)
//! - TABLEDEF_DUPLICATE_IDENTITY (REJECT)
//! - TABLEDEF_INVALID_IDENTITY (REJECT)
//! - TABLEDEF_MALFORMED_SCHEMA_FILE (FATAL)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSeverity {
    /// Declaration rejected
    Reject,
    /// Schema inventory cannot be loaded, the process must not continue
    Fatal,
}

impl fmt::Display for SchemaSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSeverity::Reject => write!(f, "REJECT"),
            SchemaSeverity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Declaration is not a keyed mapping
    InvalidOptions,
    /// `attributes` key missing
    AttributesNotSpecified,
    /// `attributes` is not a non-empty sequence of names
    InvalidAttributes,
    /// `index` is not a sequence of names
    InvalidIndexList,
    /// `type` outside {set, ordered_set, bag}
    InvalidTableType,
    /// Identity already carries a descriptor
    DuplicateIdentity,
    /// Identity is not usable as a declaration file name
    InvalidIdentity,
    /// Declaration file unreadable or not JSON
    MalformedSchemaFile,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidOptions => "TABLEDEF_INVALID_OPTIONS",
            SchemaErrorCode::AttributesNotSpecified => "TABLEDEF_ATTRIBUTES_NOT_SPECIFIED",
            SchemaErrorCode::InvalidAttributes => "TABLEDEF_INVALID_ATTRIBUTES",
            SchemaErrorCode::InvalidIndexList => "TABLEDEF_INVALID_INDEX_LIST",
            SchemaErrorCode::InvalidTableType => "TABLEDEF_INVALID_TABLE_TYPE",
            SchemaErrorCode::DuplicateIdentity => "TABLEDEF_DUPLICATE_IDENTITY",
            SchemaErrorCode::InvalidIdentity => "TABLEDEF_INVALID_IDENTITY",
            SchemaErrorCode::MalformedSchemaFile => "TABLEDEF_MALFORMED_SCHEMA_FILE",
        }
    }

    /// Returns the short reason reported for a rejected declaration
    pub fn reason(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidOptions => "invalid options",
            SchemaErrorCode::AttributesNotSpecified => "attributes not specified",
            SchemaErrorCode::InvalidAttributes => "invalid attributes",
            SchemaErrorCode::InvalidIndexList => "invalid index list",
            SchemaErrorCode::InvalidTableType => "invalid table type",
            SchemaErrorCode::DuplicateIdentity => "duplicate identity",
            SchemaErrorCode::InvalidIdentity => "invalid identity",
            SchemaErrorCode::MalformedSchemaFile => "malformed schema file",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> SchemaSeverity {
        match self {
            SchemaErrorCode::MalformedSchemaFile => SchemaSeverity::Fatal,
            _ => SchemaSeverity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    identity: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, identity: Option<String>) -> Self {
        Self {
            code,
            message,
            identity,
        }
    }

    /// Declaration is not a keyed mapping
    pub fn invalid_options() -> Self {
        Self::new(
            SchemaErrorCode::InvalidOptions,
            "Invalid options specified".into(),
            None,
        )
    }

    /// Declaration has no `attributes` key
    pub fn attributes_not_specified() -> Self {
        Self::new(
            SchemaErrorCode::AttributesNotSpecified,
            "Table attributes not specified".into(),
            None,
        )
    }

    /// `attributes` is malformed
    pub fn invalid_attributes(detail: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::InvalidAttributes,
            format!("Invalid attributes specified: {}", detail.into()),
            None,
        )
    }

    /// `index` is malformed
    pub fn invalid_index_list(detail: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::InvalidIndexList,
            format!("Invalid index list specified: {}", detail.into()),
            None,
        )
    }

    /// `type` is not one of the supported table types
    pub fn invalid_table_type(found: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::InvalidTableType,
            format!("Invalid table type specified: {}", found.into()),
            None,
        )
    }

    /// A second declaration for an identity that already has one
    pub fn duplicate_identity(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self::new(
            SchemaErrorCode::DuplicateIdentity,
            format!("Table '{}' is already declared", identity),
            Some(identity),
        )
    }

    /// Identity cannot name a file inside the schema directory
    pub fn invalid_identity(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self::new(
            SchemaErrorCode::InvalidIdentity,
            format!("Table name '{}' is not a plain file name", identity),
            Some(identity),
        )
    }

    /// Declaration file could not be read or parsed
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::MalformedSchemaFile,
            format!("Malformed schema file '{}': {}", path.into(), reason.into()),
            None,
        )
    }

    /// Attaches the identity being declared
    pub fn for_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the short rejection reason
    pub fn reason(&self) -> &'static str {
        self.code.reason()
    }

    /// Returns the severity level
    pub fn severity(&self) -> SchemaSeverity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the identity being declared, if known
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == SchemaSeverity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(identity) = &self.identity {
            write!(f, " (table '{}')", identity)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
