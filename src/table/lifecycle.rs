//! Table lifecycle operations
//!
//! Every operation starts with the identity guard: the target must expose a
//! genuine descriptor, otherwise the call fails with `NotATable` before the
//! engine is contacted. No operation retries.

use serde_json::{Map, Value};

use crate::observability::{Event, Logger};
use crate::schema::{descriptor_of, Table, TableDescriptor, ATTRIBUTES_KEY};

use super::engine::{InfoKey, StorageEngine};
use super::errors::{TableError, TableResult};

/// Builds the options passed to the engine's create call.
///
/// Declared options are overlaid with `overrides` (overrides win), then
/// `attributes` is forced to the declared list.
pub fn create_options(descriptor: &TableDescriptor, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut options = descriptor.table_options().clone();
    options.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    options.insert(
        ATTRIBUTES_KEY.to_string(),
        Value::from(descriptor.attributes().to_vec()),
    );
    options
}

/// Lifecycle manager bound to one storage engine
pub struct TableManager<E> {
    engine: E,
}

impl<E: StorageEngine> TableManager<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Borrow the underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Creates the engine table with the declared options.
    pub fn create<T: Table + ?Sized>(&self, table: &T) -> TableResult<()> {
        self.create_with(table, &Map::new())
    }

    /// Creates the engine table, overriding declared options.
    ///
    /// `attributes` in `overrides` is ignored.
    pub fn create_with<T: Table + ?Sized>(
        &self,
        table: &T,
        overrides: &Map<String, Value>,
    ) -> TableResult<()> {
        let descriptor = guard(table)?;
        let identity = descriptor.identity();
        let options = create_options(descriptor, overrides);

        let override_count = overrides.len().to_string();
        Logger::trace(
            Event::TableCreate.as_str(),
            &[("table", identity), ("overrides", override_count.as_str())],
        );

        match self.engine.create_table(identity, &options) {
            Ok(()) => {
                Logger::info(Event::TableCreated.as_str(), &[("table", identity)]);
                Ok(())
            }
            Err(abort) => {
                let err = TableError::from_abort(identity, abort);
                Logger::warn(
                    Event::TableCreateFailed.as_str(),
                    &[("table", identity), ("reason", err.reason())],
                );
                Err(err)
            }
        }
    }

    /// Deletes the engine table.
    pub fn delete<T: Table + ?Sized>(&self, table: &T) -> TableResult<()> {
        let identity = guard(table)?.identity();

        match self.engine.delete_table(identity) {
            Ok(()) => {
                Logger::info(Event::TableDeleted.as_str(), &[("table", identity)]);
                Ok(())
            }
            Err(abort) => {
                let err = TableError::from_abort(identity, abort);
                Logger::warn(
                    Event::TableDeleteFailed.as_str(),
                    &[("table", identity), ("reason", err.reason())],
                );
                Err(err)
            }
        }
    }

    /// Returns every engine metadata field for the table.
    pub fn info<T: Table + ?Sized>(&self, table: &T) -> TableResult<Value> {
        self.info_key(table, &InfoKey::All)
    }

    /// Returns one engine metadata field, exactly as the engine reports it.
    ///
    /// # Errors
    ///
    /// An engine fault (unknown key, missing table) comes back as
    /// [`TableError::Fault`], which callers should treat as fatal.
    pub fn info_key<T: Table + ?Sized>(&self, table: &T, key: &InfoKey) -> TableResult<Value> {
        let identity = guard(table)?.identity();

        Logger::trace(
            Event::TableInfo.as_str(),
            &[("table", identity), ("key", key.as_str())],
        );

        self.engine.table_info(identity, key).map_err(|fault| {
            let detail = fault.to_string();
            Logger::fatal(
                Event::TableInfoFault.as_str(),
                &[("table", identity), ("fault", detail.as_str())],
            );
            TableError::Fault(fault)
        })
    }

    /// Removes every record from the table, keeping its definition.
    ///
    /// Clearing an empty table succeeds.
    pub fn clear<T: Table + ?Sized>(&self, table: &T) -> TableResult<()> {
        let identity = guard(table)?.identity();

        match self.engine.clear_table(identity) {
            Ok(()) => {
                Logger::info(Event::TableCleared.as_str(), &[("table", identity)]);
                Ok(())
            }
            Err(abort) => {
                let err = TableError::from_abort(identity, abort);
                Logger::warn(
                    Event::TableClearFailed.as_str(),
                    &[("table", identity), ("reason", err.reason())],
                );
                Err(err)
            }
        }
    }
}

fn guard<T: Table + ?Sized>(table: &T) -> TableResult<&TableDescriptor> {
    descriptor_of(table).ok_or_else(|| {
        Logger::warn(Event::NotATable.as_str(), &[("table", table.identity())]);
        TableError::not_a_table(table.identity())
    })
}
