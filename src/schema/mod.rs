//! Schema subsystem for tabledef
//!
//! Turns a loosely typed table declaration into an immutable
//! [`TableDescriptor`] attached to a schema identity.
//!
//! # Design Principles
//!
//! - Declarations are validated before any engine table exists
//! - Validation never rewrites the declaration
//! - A descriptor is built once per identity and never mutated
//! - Identities without a genuine descriptor are not tables

mod descriptor;
mod errors;
mod identity;
mod loader;
mod types;
mod validator;

pub use descriptor::{TableDescriptor, OWNER_MARKER};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, SchemaSeverity};
pub use identity::{descriptor_of, DeclaredTable, Table};
pub use loader::{SchemaLoader, TABLE_KEY};
pub use types::{is_symbolic_name, TableType, ATTRIBUTES_KEY, INDEX_KEY, TYPE_KEY};
pub use validator::{validate, Declaration};
