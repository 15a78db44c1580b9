//! Schema identities
//!
//! Anything that can be handed to a lifecycle operation implements [`Table`].
//! The usual implementor is [`DeclaredTable`], produced once at start-up by
//! [`DeclaredTable::declare`]. Applications with a fixed set of tables can
//! implement the trait on their own marker types and keep the descriptor in
//! a `OnceLock`.

use serde_json::Value;

use crate::observability::{Event, Logger};

use super::descriptor::{TableDescriptor, OWNER_MARKER};
use super::errors::SchemaResult;
use super::validator::validate;

/// Capability exposed by a schema identity.
pub trait Table {
    /// Name the table is known by in the storage engine
    fn identity(&self) -> &str;

    /// Descriptor attached to this identity, if any
    fn descriptor(&self) -> Option<&TableDescriptor>;
}

impl<T: Table + ?Sized> Table for &T {
    fn identity(&self) -> &str {
        (**self).identity()
    }

    fn descriptor(&self) -> Option<&TableDescriptor> {
        (**self).descriptor()
    }
}

/// Returns the descriptor of `table` if it is a genuine declared table.
///
/// A descriptor only counts when it carries [`OWNER_MARKER`] and was built
/// for the same identity that exposes it.
pub fn descriptor_of<T: Table + ?Sized>(table: &T) -> Option<&TableDescriptor> {
    table
        .descriptor()
        .filter(|d| d.meta() == OWNER_MARKER && d.identity() == table.identity())
}

/// An identity paired with the descriptor built from its declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredTable {
    descriptor: TableDescriptor,
}

impl DeclaredTable {
    /// Validates `declaration` and builds the descriptor for `identity`.
    ///
    /// # Errors
    ///
    /// Returns the validation error, tagged with `identity`.
    pub fn declare(identity: impl Into<String>, declaration: &Value) -> SchemaResult<Self> {
        let identity = identity.into();
        let validated = validate(declaration).map_err(|e| e.for_identity(&identity))?;
        let descriptor = TableDescriptor::build(identity, validated);

        let size = descriptor.size().to_string();
        Logger::info(
            Event::TableDeclared.as_str(),
            &[
                ("table", descriptor.identity()),
                ("type", descriptor.table_type().as_str()),
                ("size", size.as_str()),
            ],
        );

        Ok(Self { descriptor })
    }

    /// Wraps a descriptor reconstructed elsewhere
    pub fn from_descriptor(descriptor: TableDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }
}

impl Table for DeclaredTable {
    fn identity(&self) -> &str {
        self.descriptor.identity()
    }

    fn descriptor(&self) -> Option<&TableDescriptor> {
        Some(&self.descriptor)
    }
}
