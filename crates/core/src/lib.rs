//! `cmdb-core`: building blocks of the object-model layer.
//!
//! Contains the error model, the request context, and the generic dynamic map
//! codec. No persistence concerns live here.

pub mod codec;
pub mod condition;
pub mod context;
pub mod error;
pub mod field;

pub use condition::Condition;
pub use context::{Headers, RequestContext};
pub use error::{CC_SUCCESS, ModelError, ModelResult};
pub use field::{FieldDescriptor, FieldValue, Fields, MapStr};

#[doc(hidden)]
pub use serde_json;
