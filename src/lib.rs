//! tabledef - table declarations and lifecycle over a storage engine
//!
//! A table is declared once as a JSON declaration, validated, and frozen
//! into a descriptor. Lifecycle operations (create, delete, info, clear)
//! check the descriptor and then delegate to a [`table::StorageEngine`].

pub mod cli;
pub mod observability;
pub mod schema;
pub mod table;
