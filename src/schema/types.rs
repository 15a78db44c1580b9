//! Declaration-level types
//!
//! A table declaration arrives as a JSON object:
//!
//! ```json
//! { "attributes": ["id", "title", "year"], "type": "ordered_set", "index": ["year"] }
//! ```
//!
//! Any key other than `attributes`, `type` and `index` is passed through to
//! the storage engine untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration key holding the attribute list
pub const ATTRIBUTES_KEY: &str = "attributes";
/// Declaration key holding the table type
pub const TYPE_KEY: &str = "type";
/// Declaration key holding the secondary index list
pub const INDEX_KEY: &str = "index";

/// Storage semantics of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// One record per key
    #[default]
    Set,
    /// One record per key, iterated in key order
    OrderedSet,
    /// Many records per key
    Bag,
}

impl TableType {
    /// All accepted table types
    pub const ALL: [TableType; 3] = [TableType::Set, TableType::OrderedSet, TableType::Bag];

    /// Returns the declaration spelling of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Set => "set",
            TableType::OrderedSet => "ordered_set",
            TableType::Bag => "bag",
        }
    }

    /// Parses the declaration spelling
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `name` is usable as an attribute or index name.
///
/// Names are plain identifiers: non-empty, no whitespace.
pub fn is_symbolic_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_type_parse() {
        assert_eq!(TableType::parse("set"), Some(TableType::Set));
        assert_eq!(TableType::parse("ordered_set"), Some(TableType::OrderedSet));
        assert_eq!(TableType::parse("bag"), Some(TableType::Bag));
        assert_eq!(TableType::parse("duplicate_bag"), None);
        assert_eq!(TableType::parse("Set"), None);
    }

    #[test]
    fn test_table_type_default_is_set() {
        assert_eq!(TableType::default(), TableType::Set);
    }

    #[test]
    fn test_table_type_serde_spelling() {
        let json = serde_json::to_string(&TableType::OrderedSet).unwrap();
        assert_eq!(json, "\"ordered_set\"");
    }

    #[test]
    fn test_symbolic_names() {
        assert!(is_symbolic_name("id"));
        assert!(is_symbolic_name("created_at"));
        assert!(!is_symbolic_name(""));
        assert!(!is_symbolic_name("first name"));
    }
}
