//! `cmdb-cli`: apply declarative model definitions to the object model.

pub mod args;
pub mod definition;

pub use args::CliArgs;
pub use definition::{ApplySummary, ModelDefinition, ObjectDefinition, apply, export};
