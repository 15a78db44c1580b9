//! Declaration validator
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. declaration is a JSON object
//! 2. `attributes` is present
//! 3. `attributes` is an array
//! 4. `attributes` is non-empty and every element is a name
//! 5. `index` (default `[]`) is an array of names
//! 6. `type` (default `"set"`) is one of set, ordered_set, bag
//!
//! Validation never rewrites the declaration and never talks to a storage
//! engine, so it can run before any table exists.
//!
//! Index entries are not checked for membership in `attributes`; the
//! storage engine decides whether an index over an unknown attribute is
//! acceptable.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{is_symbolic_name, TableType, ATTRIBUTES_KEY, INDEX_KEY, TYPE_KEY};

/// A declaration that passed validation.
///
/// Only [`validate`] constructs this, so holding one proves the shape checks
/// ran. The wrapped object is exactly what the caller supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    fields: Map<String, Value>,
}

impl Declaration {
    /// Declared attribute names, primary key first
    pub fn attributes(&self) -> Vec<String> {
        names(self.fields.get(ATTRIBUTES_KEY))
    }

    /// Declared index names
    pub fn index(&self) -> Vec<String> {
        names(self.fields.get(INDEX_KEY))
    }

    /// Declared table type, `set` when absent
    pub fn table_type(&self) -> TableType {
        self.fields
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(TableType::parse)
            .unwrap_or_default()
    }

    /// Borrow the raw declaration
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume into the raw declaration
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

fn names(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Validates a raw table declaration.
///
/// # Errors
///
/// Returns `SchemaError` with one of the reasons `invalid options`,
/// `attributes not specified`, `invalid attributes`, `invalid index list`
/// or `invalid table type`.
pub fn validate(declaration: &Value) -> SchemaResult<Declaration> {
    let fields = declaration
        .as_object()
        .ok_or_else(SchemaError::invalid_options)?;

    let attributes = fields
        .get(ATTRIBUTES_KEY)
        .ok_or_else(SchemaError::attributes_not_specified)?;

    let attributes = attributes.as_array().ok_or_else(|| {
        SchemaError::invalid_attributes(format!("expected array, got {}", json_type_name(attributes)))
    })?;

    if attributes.is_empty() {
        return Err(SchemaError::invalid_attributes("attribute list is empty"));
    }

    if let Some((i, bad)) = first_non_name(attributes) {
        return Err(SchemaError::invalid_attributes(format!(
            "element {} is {}",
            i,
            describe(bad)
        )));
    }

    match fields.get(INDEX_KEY) {
        None => {}
        Some(Value::Array(index)) => {
            if let Some((i, bad)) = first_non_name(index) {
                return Err(SchemaError::invalid_index_list(format!(
                    "element {} is {}",
                    i,
                    describe(bad)
                )));
            }
        }
        Some(other) => {
            return Err(SchemaError::invalid_index_list(format!(
                "expected array, got {}",
                json_type_name(other)
            )));
        }
    }

    if let Some(table_type) = fields.get(TYPE_KEY) {
        let known = table_type.as_str().and_then(TableType::parse).is_some();
        if !known {
            return Err(SchemaError::invalid_table_type(table_type.to_string()));
        }
    }

    Ok(Declaration {
        fields: fields.clone(),
    })
}

fn first_non_name(items: &[Value]) -> Option<(usize, &Value)> {
    items.iter().enumerate().find(|(_, v)| match v {
        Value::String(s) => !is_symbolic_name(s),
        _ => true,
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("not a valid name: {:?}", s),
        other => format!("a {}", json_type_name(other)),
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
