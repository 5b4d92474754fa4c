//! Infrastructure layer: persistence adapters, delete coordination, config.

pub mod config;
pub mod delete;
pub mod persistence;


pub use config::{ConfigError, ModelConfig};
pub use delete::CascadingDeleteCoordinator;
pub use persistence::InMemoryPersistence;
