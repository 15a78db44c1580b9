//! Table Lifecycle Tests
//!
//! Lifecycle operations against the in-memory engine:
//! - create / delete / clear translate engine results
//! - info returns the engine's own values
//! - the identity guard never reaches the engine

use std::cell::Cell;

use serde_json::{json, Map, Value};
use tabledef::schema::{DeclaredTable, Table, TableDescriptor};
use tabledef::table::{
    EngineFault, EngineReply, InfoKey, MemoryEngine, StorageEngine, TableError, TableManager,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn movies() -> DeclaredTable {
    DeclaredTable::declare(
        "movies",
        &json!({
            "attributes": ["id", "title", "year"],
            "type": "set",
            "index": ["year"]
        }),
    )
    .unwrap()
}

fn record(id: i64, title: &str, year: i64) -> Vec<Value> {
    vec![json!("movies"), json!(id), json!(title), json!(year)]
}

/// Engine wrapper counting every call that reaches the engine.
#[derive(Default)]
struct CountingEngine {
    inner: MemoryEngine,
    calls: Cell<usize>,
}

impl CountingEngine {
    fn bump(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl StorageEngine for CountingEngine {
    fn create_table(&self, table: &str, options: &Map<String, Value>) -> EngineReply {
        self.bump();
        self.inner.create_table(table, options)
    }

    fn delete_table(&self, table: &str) -> EngineReply {
        self.bump();
        self.inner.delete_table(table)
    }

    fn table_info(&self, table: &str, key: &InfoKey) -> Result<Value, EngineFault> {
        self.bump();
        self.inner.table_info(table, key)
    }

    fn clear_table(&self, table: &str) -> EngineReply {
        self.bump();
        self.inner.clear_table(table)
    }
}

struct NeverDeclared;

impl Table for NeverDeclared {
    fn identity(&self) -> &str {
        "never_declared"
    }

    fn descriptor(&self) -> Option<&TableDescriptor> {
        None
    }
}

/// Exposes another table's descriptor under its own name.
struct Borrowed(DeclaredTable);

impl Table for Borrowed {
    fn identity(&self) -> &str {
        "borrowed"
    }

    fn descriptor(&self) -> Option<&TableDescriptor> {
        Some(self.0.descriptor())
    }
}

// =============================================================================
// Create / Delete
// =============================================================================

#[test]
fn test_create_then_create_again() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = movies();

    assert_eq!(manager.create(&table), Ok(()));
    assert_eq!(
        manager.create(&table),
        Err(TableError::AlreadyExists {
            identity: "movies".into()
        })
    );
}

#[test]
fn test_create_after_delete() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = movies();

    manager.create(&table).unwrap();
    manager.delete(&table).unwrap();
    assert_eq!(manager.create(&table), Ok(()));
}

#[test]
fn test_delete_missing_table() {
    let manager = TableManager::new(MemoryEngine::new());
    assert_eq!(
        manager.delete(&movies()),
        Err(TableError::NoExists {
            identity: "movies".into()
        })
    );
}

#[test]
fn test_deleted_table_no_longer_queryable() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = movies();

    manager.create(&table).unwrap();
    assert_eq!(manager.delete(&table), Ok(()));
    assert!(!manager.engine().exists("movies"));

    let err = manager.info(&table).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err, TableError::Fault(EngineFault::NoExists("movies".into())));
}

#[test]
fn test_create_overrides() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = movies();

    let overrides = json!({ "type": "bag", "attributes": ["x", "y"], "ram_copies": ["n@h"] });
    manager
        .create_with(&table, overrides.as_object().unwrap())
        .unwrap();

    let key = InfoKey::named("type");
    assert_eq!(manager.info_key(&table, &key).unwrap(), "bag");
    assert_eq!(
        manager.info_key(&table, &InfoKey::named("attributes")).unwrap(),
        json!(["id", "title", "year"])
    );
    assert_eq!(
        manager.info_key(&table, &InfoKey::named("options")).unwrap(),
        json!({ "ram_copies": ["n@h"] })
    );
}

#[test]
fn test_engine_rejection_passes_reason_through() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = DeclaredTable::declare(
        "loose",
        &json!({ "attributes": ["id", "a"], "index": ["not_an_attribute"] }),
    )
    .unwrap();

    let err = manager.create(&table).unwrap_err();
    assert!(err.is_engine_error());
    assert!(err.reason().starts_with("bad_index"));
    assert_eq!(err.identity(), Some("loose"));
}

#[test]
fn test_single_attribute_rejected_by_engine() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = DeclaredTable::declare("tiny", &json!({ "attributes": ["id"] })).unwrap();

    let err = manager.create(&table).unwrap_err();
    assert!(matches!(err, TableError::Engine { .. }));
}

// =============================================================================
// Clear
// =============================================================================

#[test]
fn test_clear_is_idempotent() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = movies();
    manager.create(&table).unwrap();

    manager.engine().write("movies", record(1, "Alien", 1979)).unwrap();
    manager.engine().write("movies", record(2, "Heat", 1995)).unwrap();
    assert_eq!(manager.engine().count("movies").unwrap(), 2);

    assert_eq!(manager.clear(&table), Ok(()));
    assert_eq!(manager.clear(&table), Ok(()));
    assert_eq!(manager.engine().count("movies").unwrap(), 0);

    // definition survives
    assert_eq!(manager.info_key(&table, &InfoKey::named("size")).unwrap(), 0);
    manager.engine().write("movies", record(3, "Ran", 1985)).unwrap();
}

#[test]
fn test_clear_missing_table() {
    let manager = TableManager::new(MemoryEngine::new());
    assert_eq!(
        manager.clear(&movies()),
        Err(TableError::NoExists {
            identity: "movies".into()
        })
    );
}

// =============================================================================
// Info
// =============================================================================

#[test]
fn test_info_matches_engine() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = movies();
    manager.create(&table).unwrap();
    manager.engine().write("movies", record(1, "Alien", 1979)).unwrap();

    assert_eq!(
        manager.info(&table).unwrap(),
        manager.engine().table_info("movies", &InfoKey::All).unwrap()
    );

    for key in ["attributes", "arity", "index", "size", "type", "record_name"] {
        let key = InfoKey::named(key);
        assert_eq!(
            manager.info_key(&table, &key).unwrap(),
            manager.engine().table_info("movies", &key).unwrap()
        );
    }
}

#[test]
fn test_info_unknown_key_is_fatal() {
    let manager = TableManager::new(MemoryEngine::new());
    let table = movies();
    manager.create(&table).unwrap();

    let err = manager
        .info_key(&table, &InfoKey::named("no_such_key"))
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, TableError::Fault(EngineFault::BadKey { .. })));
}

// =============================================================================
// Identity Guard
// =============================================================================

#[test]
fn test_guard_blocks_every_operation() {
    let manager = TableManager::new(CountingEngine::default());
    let not_a_table = TableError::NotATable {
        identity: "never_declared".into(),
    };

    assert_eq!(manager.create(&NeverDeclared), Err(not_a_table.clone()));
    assert_eq!(manager.delete(&NeverDeclared), Err(not_a_table.clone()));
    assert_eq!(manager.info(&NeverDeclared), Err(not_a_table.clone()));
    assert_eq!(
        manager.info_key(&NeverDeclared, &InfoKey::named("size")),
        Err(not_a_table.clone())
    );
    assert_eq!(manager.clear(&NeverDeclared), Err(not_a_table));

    assert_eq!(manager.engine().calls.get(), 0);
    assert!(manager.engine().inner.tables().is_empty());
}

#[test]
fn test_guard_rejects_borrowed_descriptor() {
    let manager = TableManager::new(CountingEngine::default());
    let impostor = Borrowed(movies());

    let err = manager.create(&impostor).unwrap_err();
    assert_eq!(
        err,
        TableError::NotATable {
            identity: "borrowed".into()
        }
    );
    assert_eq!(manager.engine().calls.get(), 0);
}

#[test]
fn test_dyn_tables_share_one_manager() {
    let manager = TableManager::new(MemoryEngine::new());
    let users = DeclaredTable::declare("users", &json!({ "attributes": ["id", "email"] })).unwrap();
    let table = movies();
    let tables: Vec<&dyn Table> = vec![&table, &users, &NeverDeclared];

    let results: Vec<_> = tables.iter().map(|t| manager.create(*t)).collect();
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(TableError::NotATable { .. })));
    assert_eq!(manager.engine().tables(), vec!["movies", "users"]);
}
