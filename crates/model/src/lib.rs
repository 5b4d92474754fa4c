//! `cmdb-model`: the object model of the configuration-management system.
//!
//! Five entity kinds (classification, object, attribute, group, association)
//! share one lifecycle ([`ModelEntity`]): parse from a dynamic map, validate,
//! then save (create or update) or delete through the collaborator ports in
//! [`client`]. Kind-specific navigation lives next to each kind.

pub mod association;
pub mod attribute;
pub mod classification;
pub mod client;
pub mod entity;
pub mod factory;
pub mod group;
pub mod keys;
pub mod metadata;
pub mod object;
pub mod record;

#[cfg(test)]
mod testing;

pub use association::Association;
pub use attribute::Attribute;
pub use classification::Classification;
pub use client::{
    ApiResponse, ClientResult, DeleteCoordinator, PersistenceClient, TransportError,
    into_model_result,
};
pub use entity::{ModelEntity, ModelServices};
pub use factory::ModelFactory;
pub use group::Group;
pub use metadata::{AssociationDes, AttributeDes, ClassificationDes, GroupDes, ObjectDes};
pub use object::Object;
pub use record::{MetaKind, Record};
