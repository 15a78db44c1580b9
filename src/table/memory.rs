//! In-process storage engine
//!
//! Keeps tables in memory with set, ordered_set and bag semantics. It performs
//! the checks a real engine performs at create time (arity, distinct
//! attributes, index membership) so the lifecycle layer can stay lenient.
//!
//! Records are positional: slot 0 holds the table name, slot 1 the key.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde_json::{json, Map, Value};

use crate::schema::{TableType, ATTRIBUTES_KEY, INDEX_KEY, TYPE_KEY};

use super::engine::{EngineAbort, EngineFault, EngineReply, InfoKey, StorageEngine};

#[derive(Debug, Clone)]
struct MemTable {
    attributes: Vec<String>,
    table_type: TableType,
    index: Vec<String>,
    options: Map<String, Value>,
    records: Vec<Vec<Value>>,
}

impl MemTable {
    fn from_options(options: &Map<String, Value>) -> Result<Self, EngineAbort> {
        let attributes = string_list(options.get(ATTRIBUTES_KEY))
            .ok_or_else(|| EngineAbort::Other("bad_type: attributes".into()))?;
        if attributes.len() < 2 {
            return Err(EngineAbort::Other("bad_type: at least two attributes required".into()));
        }
        for (i, name) in attributes.iter().enumerate() {
            if attributes[..i].contains(name) {
                return Err(EngineAbort::Other(format!("bad_type: duplicate attribute '{}'", name)));
            }
        }

        let table_type = match options.get(TYPE_KEY) {
            None => TableType::default(),
            Some(value) => value
                .as_str()
                .and_then(TableType::parse)
                .ok_or_else(|| EngineAbort::Other(format!("bad_type: type {}", value)))?,
        };

        let index = match options.get(INDEX_KEY) {
            None => Vec::new(),
            Some(value) => string_list(Some(value))
                .ok_or_else(|| EngineAbort::Other("bad_index".into()))?,
        };
        for name in &index {
            let position = attributes.iter().position(|a| a == name);
            match position {
                Some(p) if p > 0 => {}
                Some(_) => return Err(EngineAbort::Other(format!("bad_index: '{}' is the key", name))),
                None => return Err(EngineAbort::Other(format!("bad_index: unknown attribute '{}'", name))),
            }
        }

        let options = options
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), ATTRIBUTES_KEY | TYPE_KEY | INDEX_KEY))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            attributes,
            table_type,
            index,
            options,
            records: Vec::new(),
        })
    }

    fn info(&self, name: &str, key: &str) -> Option<Value> {
        let value = match key {
            "attributes" => json!(self.attributes),
            "arity" => json!(self.attributes.len() + 1),
            "index" => json!(self.index),
            "record_name" => json!(name),
            "size" => json!(self.records.len()),
            "type" => json!(self.table_type),
            "options" => Value::Object(self.options.clone()),
            _ => return None,
        };
        Some(value)
    }

    fn insert(&mut self, record: Vec<Value>) {
        match self.table_type {
            TableType::Set => {
                match self.records.iter_mut().find(|r| r[1] == record[1]) {
                    Some(existing) => *existing = record,
                    None => self.records.push(record),
                }
            }
            TableType::OrderedSet => {
                match self.records.binary_search_by(|r| cmp_keys(&r[1], &record[1])) {
                    Ok(i) => self.records[i] = record,
                    Err(i) => self.records.insert(i, record),
                }
            }
            TableType::Bag => {
                if !self.records.contains(&record) {
                    self.records.push(record);
                }
            }
        }
    }
}

const INFO_KEYS: [&str; 7] = ["arity", "attributes", "index", "options", "record_name", "size", "type"];

/// Memory-resident [`StorageEngine`]
#[derive(Debug, Default)]
pub struct MemoryEngine {
    tables: RwLock<BTreeMap<String, MemTable>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `table` currently exists
    pub fn exists(&self, table: &str) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(table)
    }

    /// Names of all live tables
    pub fn tables(&self) -> Vec<String> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Writes a positional record `[table, key, ...]`.
    ///
    /// Set tables replace any record with the same key, bags keep one copy
    /// of each distinct record.
    pub fn write(&self, table: &str, record: Vec<Value>) -> EngineReply {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let mem = tables
            .get_mut(table)
            .ok_or_else(|| EngineAbort::NoExists(table.to_string()))?;

        if record.len() != mem.attributes.len() + 1 || record[0].as_str() != Some(table) {
            return Err(EngineAbort::Other(format!("bad_type: record for '{}'", table)));
        }

        mem.insert(record);
        Ok(())
    }

    /// Reads every record stored under `key`
    pub fn read(&self, table: &str, key: &Value) -> Result<Vec<Vec<Value>>, EngineAbort> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mem = tables
            .get(table)
            .ok_or_else(|| EngineAbort::NoExists(table.to_string()))?;

        Ok(mem.records.iter().filter(|r| &r[1] == key).cloned().collect())
    }

    /// Number of records in `table`
    pub fn count(&self, table: &str) -> Result<usize, EngineAbort> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables
            .get(table)
            .map(|mem| mem.records.len())
            .ok_or_else(|| EngineAbort::NoExists(table.to_string()))
    }
}

impl StorageEngine for MemoryEngine {
    fn create_table(&self, table: &str, options: &Map<String, Value>) -> EngineReply {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if tables.contains_key(table) {
            return Err(EngineAbort::AlreadyExists(table.to_string()));
        }

        let mem = MemTable::from_options(options)?;
        tables.insert(table.to_string(), mem);
        Ok(())
    }

    fn delete_table(&self, table: &str) -> EngineReply {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| EngineAbort::NoExists(table.to_string()))
    }

    fn table_info(&self, table: &str, key: &InfoKey) -> Result<Value, EngineFault> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mem = tables
            .get(table)
            .ok_or_else(|| EngineFault::NoExists(table.to_string()))?;

        match key {
            InfoKey::All => {
                let all = INFO_KEYS
                    .iter()
                    .filter_map(|k| mem.info(table, k).map(|v| (k.to_string(), v)))
                    .collect();
                Ok(Value::Object(all))
            }
            InfoKey::Named(name) => mem.info(table, name).ok_or_else(|| EngineFault::BadKey {
                table: table.to_string(),
                key: name.clone(),
            }),
        }
    }

    fn clear_table(&self, table: &str) -> EngineReply {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let mem = tables
            .get_mut(table)
            .ok_or_else(|| EngineAbort::NoExists(table.to_string()))?;
        mem.records.clear();
        Ok(())
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Total order over keys: null < bool < number < string < array < object.
fn cmp_keys(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ if rank(a) == rank(b) => a.to_string().cmp(&b.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn engine_with(table: &str, opts: Value) -> MemoryEngine {
        let engine = MemoryEngine::new();
        engine.create_table(table, &options(opts)).unwrap();
        engine
    }

    #[test]
    fn test_create_requires_two_distinct_attributes() {
        let engine = MemoryEngine::new();
        let err = engine
            .create_table("t", &options(json!({ "attributes": ["id"] })))
            .unwrap_err();
        assert!(matches!(err, EngineAbort::Other(r) if r.starts_with("bad_type")));

        let err = engine
            .create_table("t", &options(json!({ "attributes": ["id", "id"] })))
            .unwrap_err();
        assert!(matches!(err, EngineAbort::Other(r) if r.contains("duplicate")));
        assert!(!engine.exists("t"));
    }

    #[test]
    fn test_create_rejects_unknown_index() {
        let engine = MemoryEngine::new();
        let err = engine
            .create_table("t", &options(json!({ "attributes": ["id", "a"], "index": ["b"] })))
            .unwrap_err();
        assert!(matches!(err, EngineAbort::Other(r) if r.starts_with("bad_index")));

        let err = engine
            .create_table("t", &options(json!({ "attributes": ["id", "a"], "index": ["id"] })))
            .unwrap_err();
        assert!(matches!(err, EngineAbort::Other(r) if r.contains("key")));
    }

    #[test]
    fn test_create_twice() {
        let engine = engine_with("t", json!({ "attributes": ["id", "a"] }));
        assert_eq!(
            engine.create_table("t", &options(json!({ "attributes": ["id", "a"] }))),
            Err(EngineAbort::AlreadyExists("t".into()))
        );
    }

    #[test]
    fn test_set_replaces_by_key() {
        let engine = engine_with("t", json!({ "attributes": ["id", "a"] }));
        engine.write("t", vec![json!("t"), json!(1), json!("x")]).unwrap();
        engine.write("t", vec![json!("t"), json!(1), json!("y")]).unwrap();

        assert_eq!(engine.count("t").unwrap(), 1);
        assert_eq!(engine.read("t", &json!(1)).unwrap()[0][2], "y");
    }

    #[test]
    fn test_bag_keeps_distinct_records() {
        let engine = engine_with("t", json!({ "attributes": ["id", "a"], "type": "bag" }));
        engine.write("t", vec![json!("t"), json!(1), json!("x")]).unwrap();
        engine.write("t", vec![json!("t"), json!(1), json!("y")]).unwrap();
        engine.write("t", vec![json!("t"), json!(1), json!("y")]).unwrap();

        assert_eq!(engine.read("t", &json!(1)).unwrap().len(), 2);
    }

    #[test]
    fn test_ordered_set_sorted_by_key() {
        let engine = engine_with("t", json!({ "attributes": ["id", "a"], "type": "ordered_set" }));
        for key in [3, 1, 2, 1] {
            engine.write("t", vec![json!("t"), json!(key), json!("v")]).unwrap();
        }

        let tables = engine.tables.read().unwrap();
        let keys: Vec<_> = tables["t"].records.iter().map(|r| r[1].clone()).collect();
        assert_eq!(keys, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_write_rejects_wrong_shape() {
        let engine = engine_with("t", json!({ "attributes": ["id", "a"] }));
        assert!(engine.write("t", vec![json!("t"), json!(1)]).is_err());
        assert!(engine.write("t", vec![json!("u"), json!(1), json!(2)]).is_err());
        assert_eq!(
            engine.write("u", vec![json!("u"), json!(1), json!(2)]),
            Err(EngineAbort::NoExists("u".into()))
        );
    }

    #[test]
    fn test_info_keys() {
        let engine = engine_with(
            "t",
            json!({ "attributes": ["id", "a"], "type": "bag", "index": ["a"], "ram_copies": true }),
        );

        assert_eq!(engine.table_info("t", &InfoKey::named("type")).unwrap(), "bag");
        assert_eq!(engine.table_info("t", &InfoKey::named("arity")).unwrap(), 3);
        assert_eq!(
            engine.table_info("t", &InfoKey::named("options")).unwrap(),
            json!({ "ram_copies": true })
        );

        let all = engine.table_info("t", &InfoKey::All).unwrap();
        assert_eq!(all.as_object().unwrap().len(), INFO_KEYS.len());
        assert_eq!(all["index"], json!(["a"]));
    }

    #[test]
    fn test_info_faults() {
        let engine = engine_with("t", json!({ "attributes": ["id", "a"] }));
        assert!(matches!(
            engine.table_info("t", &InfoKey::named("bogus")),
            Err(EngineFault::BadKey { .. })
        ));
        assert_eq!(
            engine.table_info("u", &InfoKey::All),
            Err(EngineFault::NoExists("u".into()))
        );
    }

    #[test]
    fn test_cmp_keys_mixed() {
        assert_eq!(cmp_keys(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(cmp_keys(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(cmp_keys(&json!(99), &json!("a")), Ordering::Less);
    }
}
