//! Table descriptors
//!
//! A [`TableDescriptor`] is the frozen, validated form of a declaration. It
//! is built once per schema identity and never mutated afterwards.
//!
//! Records are laid out positionally with the identity in slot 0 and the
//! attributes following in declared order, so `field_positions` starts at 1.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use super::types::{TableType, ATTRIBUTES_KEY};
use super::validator::Declaration;

/// Sentinel carried by every descriptor built in this crate
pub const OWNER_MARKER: &str = "tabledef.table";

/// Immutable metadata for one declared table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    identity: String,
    meta: &'static str,
    attributes: Vec<String>,
    table_type: TableType,
    table_options: Map<String, Value>,
    field_positions: BTreeMap<String, usize>,
}

impl TableDescriptor {
    /// Builds the descriptor for `identity` from a validated declaration.
    pub fn build(identity: impl Into<String>, declaration: Declaration) -> Self {
        let attributes = declaration.attributes();
        let table_type = declaration.table_type();

        let mut table_options = declaration.into_map();
        table_options.remove(ATTRIBUTES_KEY);

        Self::from_parts(identity.into(), attributes, table_type, table_options)
    }

    fn from_parts(
        identity: String,
        attributes: Vec<String>,
        table_type: TableType,
        table_options: Map<String, Value>,
    ) -> Self {
        let field_positions = attributes
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i + 1))
            .collect();

        Self {
            identity,
            meta: OWNER_MARKER,
            attributes,
            table_type,
            table_options,
            field_positions,
        }
    }

    /// Schema identity that owns this descriptor
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Owner sentinel
    pub fn meta(&self) -> &str {
        self.meta
    }

    /// Attribute names in declared order
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Primary-key attribute
    pub fn key_attribute(&self) -> &str {
        // Validation guarantees at least one attribute.
        self.attributes.first().map(String::as_str).unwrap_or_default()
    }

    pub fn table_type(&self) -> TableType {
        self.table_type
    }

    /// Declaration minus `attributes`
    pub fn table_options(&self) -> &Map<String, Value> {
        &self.table_options
    }

    /// Attribute name to 1-based record position
    pub fn field_positions(&self) -> &BTreeMap<String, usize> {
        &self.field_positions
    }

    pub fn position_of(&self, attribute: &str) -> Option<usize> {
        self.field_positions.get(attribute).copied()
    }

    /// Number of attributes
    pub fn size(&self) -> usize {
        self.attributes.len()
    }

    /// Returns the introspection map exposed by a declared table.
    ///
    /// Keys: `meta`, `attributes`, `table_type`, `table_opts`,
    /// `field_positions`, `size`.
    pub fn introspect(&self) -> Value {
        json!({
            "meta": self.meta,
            "attributes": self.attributes,
            "table_type": self.table_type,
            "table_opts": self.table_options,
            "field_positions": self.field_positions,
            "size": self.size(),
        })
    }

    /// Reconstructs a descriptor from an introspection map.
    ///
    /// Returns `None` unless `meta` carries [`OWNER_MARKER`] and the map is
    /// internally consistent.
    pub fn from_introspection(identity: impl Into<String>, info: &Value) -> Option<Self> {
        let info = info.as_object()?;
        if info.get("meta")?.as_str()? != OWNER_MARKER {
            return None;
        }

        let attributes: Vec<String> = serde_json::from_value(info.get("attributes")?.clone()).ok()?;
        let table_type: TableType = serde_json::from_value(info.get("table_type")?.clone()).ok()?;
        let table_options = info.get("table_opts")?.as_object()?.clone();
        let positions: BTreeMap<String, usize> =
            serde_json::from_value(info.get("field_positions")?.clone()).ok()?;
        let size = info.get("size")?.as_u64()?;

        let descriptor = Self::from_parts(identity.into(), attributes, table_type, table_options);
        if descriptor.field_positions != positions || descriptor.size() as u64 != size {
            return None;
        }
        Some(descriptor)
    }

    /// Lays a keyed record out positionally: `[identity, attr1, attr2, ...]`.
    ///
    /// Attributes missing from `values` become `null`; extra keys are ignored.
    pub fn to_record(&self, values: &Map<String, Value>) -> Vec<Value> {
        let mut record = Vec::with_capacity(self.size() + 1);
        record.push(Value::String(self.identity.clone()));
        for attribute in &self.attributes {
            record.push(values.get(attribute).cloned().unwrap_or(Value::Null));
        }
        record
    }

    /// Turns a positional record back into a keyed map.
    ///
    /// Returns `None` if slot 0 is not this table's identity or the arity
    /// does not match.
    pub fn from_record(&self, record: &[Value]) -> Option<Map<String, Value>> {
        let (tag, values) = record.split_first()?;
        if tag.as_str()? != self.identity || values.len() != self.size() {
            return None;
        }
        Some(
            self.attributes
                .iter()
                .cloned()
                .zip(values.iter().cloned())
                .collect(),
        )
    }
}
