//! Table lifecycle subsystem for tabledef
//!
//! Bridges declared tables to a storage engine: create, delete, info and
//! clear. Engine refusals come back as [`TableError`] values the caller
//! branches on; info faults are surfaced as fatal.

mod engine;
mod errors;
mod lifecycle;
mod memory;

pub use engine::{EngineAbort, EngineFault, EngineReply, InfoKey, StorageEngine};
pub use errors::{TableError, TableResult};
pub use lifecycle::{create_options, TableManager};
pub use memory::MemoryEngine;
