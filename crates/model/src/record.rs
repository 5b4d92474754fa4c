//! Per-kind glue between a canonical record and its collaborator calls.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use cmdb_core::{Condition, Fields, Headers, MapStr, ModelResult, RequestContext};

use crate::client::{ClientResult, DeleteCoordinator, PersistenceClient};
use crate::entity::ModelServices;
use crate::keys::{
    BK_ASST_OBJ_ID, BK_CLASSIFICATION_ID, BK_GROUP_ID, BK_OBJ_ID, BK_OBJECT_ATT_ID, BK_OWNER_ID,
    BK_PROPERTY_ID,
};
use crate::metadata::{AssociationDes, AttributeDes, ClassificationDes, GroupDes, ObjectDes};

/// The five entity kinds of the object model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaKind {
    Classification,
    Object,
    Attribute,
    Group,
    Association,
}

impl MetaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetaKind::Classification => "classification",
            MetaKind::Object => "object",
            MetaKind::Attribute => "attribute",
            MetaKind::Group => "group",
            MetaKind::Association => "association",
        }
    }
}

impl core::fmt::Display for MetaKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical record the generic lifecycle can drive.
///
/// Implementations only route to the right collaborator method and state
/// their identity; everything else is shared.
pub trait Record: Fields + Default + Clone + core::fmt::Debug + Send + Sync {
    const KIND: MetaKind;

    fn owner_id(&self) -> &str;

    fn set_owner_id(&mut self, owner_id: &str);

    /// Key the collaborator uses for partial updates.
    fn update_key(&self) -> String;

    /// Condition matching this record under `owner_id` (existence, delete).
    fn identity(&self, owner_id: &str) -> Condition;

    fn select(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<Self>>;

    fn create(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        record: Self,
    ) -> ClientResult<Self>;

    fn update(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()>;

    fn delete(
        coordinator: &dyn DeleteCoordinator,
        ctx: &RequestContext,
        cond: &Condition,
    ) -> ModelResult<()>;

    /// Starting point `parse` merges the mapping onto.
    fn parse_base(&self) -> Self {
        self.clone()
    }

    /// Runs after a successful decode, before required fields are checked.
    fn after_decode(&mut self, _ctx: &RequestContext) {}

    /// Runs before any create or update is sent.
    fn before_write(&self, _services: &ModelServices, _ctx: &RequestContext) -> ModelResult<()> {
        Ok(())
    }
}

impl Record for ClassificationDes {
    const KIND: MetaKind = MetaKind::Classification;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn set_owner_id(&mut self, owner_id: &str) {
        self.owner_id = owner_id.to_string();
    }

    fn update_key(&self) -> String {
        self.classification_id.clone()
    }

    fn identity(&self, owner_id: &str) -> Condition {
        Condition::new()
            .equal(BK_OWNER_ID, owner_id)
            .equal(BK_CLASSIFICATION_ID, self.classification_id.as_str())
    }

    fn select(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<Self>> {
        client.select_classifications(cancel, headers, cond)
    }

    fn create(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        record: Self,
    ) -> ClientResult<Self> {
        client.create_classification(cancel, headers, record)
    }

    fn update(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        client.update_classification(cancel, headers, key, data)
    }

    fn delete(
        coordinator: &dyn DeleteCoordinator,
        ctx: &RequestContext,
        cond: &Condition,
    ) -> ModelResult<()> {
        coordinator.delete_classification(ctx, cond)
    }
}

impl Record for ObjectDes {
    const KIND: MetaKind = MetaKind::Object;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn set_owner_id(&mut self, owner_id: &str) {
        self.owner_id = owner_id.to_string();
    }

    fn update_key(&self) -> String {
        self.object_id.clone()
    }

    fn identity(&self, owner_id: &str) -> Condition {
        Condition::new()
            .equal(BK_OWNER_ID, owner_id)
            .equal(BK_OBJ_ID, self.object_id.as_str())
    }

    fn select(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<Self>> {
        client.select_objects(cancel, headers, cond)
    }

    fn create(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        record: Self,
    ) -> ClientResult<Self> {
        client.create_object(cancel, headers, record)
    }

    fn update(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        client.update_object(cancel, headers, key, data)
    }

    fn delete(
        coordinator: &dyn DeleteCoordinator,
        ctx: &RequestContext,
        cond: &Condition,
    ) -> ModelResult<()> {
        coordinator.delete_object(ctx, cond)
    }

    /// An object's id and classification always come from the mapping.
    fn parse_base(&self) -> Self {
        Self {
            object_id: String::new(),
            classification_id: String::new(),
            ..self.clone()
        }
    }
}

impl Record for AttributeDes {
    const KIND: MetaKind = MetaKind::Attribute;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn set_owner_id(&mut self, owner_id: &str) {
        self.owner_id = owner_id.to_string();
    }

    fn update_key(&self) -> String {
        self.id.to_string()
    }

    fn identity(&self, owner_id: &str) -> Condition {
        Condition::new()
            .equal(BK_OWNER_ID, owner_id)
            .equal(BK_OBJ_ID, self.object_id.as_str())
            .equal(BK_PROPERTY_ID, self.property_id.as_str())
    }

    fn select(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<Self>> {
        client.select_object_attributes(cancel, headers, cond)
    }

    fn create(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        record: Self,
    ) -> ClientResult<Self> {
        client.create_object_attribute(cancel, headers, record)
    }

    fn update(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        client.update_object_attribute(cancel, headers, key, data)
    }

    fn delete(
        coordinator: &dyn DeleteCoordinator,
        ctx: &RequestContext,
        cond: &Condition,
    ) -> ModelResult<()> {
        coordinator.delete_object_attribute(ctx, cond)
    }

    fn after_decode(&mut self, ctx: &RequestContext) {
        if self.owner_id.is_empty() {
            self.owner_id = ctx.owner_id().to_string();
        }
    }
}

impl Record for GroupDes {
    const KIND: MetaKind = MetaKind::Group;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn set_owner_id(&mut self, owner_id: &str) {
        self.owner_id = owner_id.to_string();
    }

    fn update_key(&self) -> String {
        self.id.to_string()
    }

    fn identity(&self, owner_id: &str) -> Condition {
        Condition::new()
            .equal(BK_OWNER_ID, owner_id)
            .equal(BK_OBJ_ID, self.object_id.as_str())
            .equal(BK_GROUP_ID, self.group_id.as_str())
    }

    fn select(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<Self>> {
        client.select_groups(cancel, headers, cond)
    }

    fn create(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        record: Self,
    ) -> ClientResult<Self> {
        client.create_group(cancel, headers, record)
    }

    fn update(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        client.update_group(cancel, headers, key, data)
    }

    fn delete(
        coordinator: &dyn DeleteCoordinator,
        ctx: &RequestContext,
        cond: &Condition,
    ) -> ModelResult<()> {
        coordinator.delete_object_group(ctx, cond)
    }

    fn after_decode(&mut self, ctx: &RequestContext) {
        if self.owner_id.is_empty() {
            self.owner_id = ctx.owner_id().to_string();
        }
    }
}

impl Record for AssociationDes {
    const KIND: MetaKind = MetaKind::Association;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn set_owner_id(&mut self, owner_id: &str) {
        self.owner_id = owner_id.to_string();
    }

    fn update_key(&self) -> String {
        self.id.to_string()
    }

    fn identity(&self, owner_id: &str) -> Condition {
        Condition::new()
            .equal(BK_OWNER_ID, owner_id)
            .equal(BK_OBJ_ID, self.object_id.as_str())
            .equal(BK_ASST_OBJ_ID, self.asst_object_id.as_str())
            .equal(BK_OBJECT_ATT_ID, self.object_att_id.as_str())
    }

    fn select(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<Self>> {
        client.select_associations(cancel, headers, cond)
    }

    fn create(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        record: Self,
    ) -> ClientResult<Self> {
        client.create_association(cancel, headers, record)
    }

    fn update(
        client: &dyn PersistenceClient,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        client.update_association(cancel, headers, key, data)
    }

    fn delete(
        coordinator: &dyn DeleteCoordinator,
        ctx: &RequestContext,
        cond: &Condition,
    ) -> ModelResult<()> {
        coordinator.delete_association(ctx, cond)
    }

    /// Both endpoints must name objects that exist under the caller's owner.
    fn before_write(&self, services: &ModelServices, ctx: &RequestContext) -> ModelResult<()> {
        for (field, object_id) in [
            (BK_OBJ_ID, &self.object_id),
            (BK_ASST_OBJ_ID, &self.asst_object_id),
        ] {
            let cond = Condition::new()
                .equal(BK_OWNER_ID, ctx.owner_id())
                .equal(BK_OBJ_ID, object_id.as_str());
            if services.select::<ObjectDes>(ctx, &cond)?.is_empty() {
                return Err(cmdb_core::ModelError::invalid_reference(field, object_id.as_str()));
            }
        }
        Ok(())
    }
}
