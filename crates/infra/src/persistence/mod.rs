//! Persistence adapters implementing [`cmdb_model::PersistenceClient`].

pub mod in_memory;

pub use in_memory::{CODE_DUPLICATE, CODE_INVALID_DATA, CODE_NOT_FOUND, InMemoryPersistence};
