//! # Storage Backends
//!
//! The two `CatalogStore` implementations: volatile `MemoryStore` and
//! disk-backed `RedbStore`.

pub mod memory;
pub mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;
