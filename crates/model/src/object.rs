//! Object: a user-definable object type and its relationship navigation.

use cmdb_core::{Condition, ModelResult, RequestContext};

use crate::association::Association;
use crate::attribute::Attribute;
use crate::classification::Classification;
use crate::entity::ModelEntity;
use crate::group::Group;
use crate::keys::{BK_CLASSIFICATION_ID, BK_OBJ_ID, BK_OWNER_ID};
use crate::metadata::{AssociationDes, AttributeDes, ClassificationDes, GroupDes, ObjectDes};

pub type Object = ModelEntity<ObjectDes>;

impl ModelEntity<ObjectDes> {
    /// Condition selecting this object's children under the caller's owner.
    fn children(&self, ctx: &RequestContext) -> Condition {
        Condition::new()
            .equal(BK_OWNER_ID, ctx.owner_id())
            .equal(BK_OBJ_ID, self.id())
    }

    /// A new, unsaved group belonging to this object.
    pub fn create_group(&self) -> Group {
        Group::new(
            self.services().clone(),
            GroupDes {
                owner_id: self.supplier_account().to_string(),
                object_id: self.id().to_string(),
                ..GroupDes::default()
            },
        )
    }

    /// A new, unsaved attribute belonging to this object.
    pub fn create_attribute(&self) -> Attribute {
        Attribute::new(
            self.services().clone(),
            AttributeDes {
                owner_id: self.supplier_account().to_string(),
                object_id: self.id().to_string(),
                ..AttributeDes::default()
            },
        )
    }

    /// A new, unsaved association from this object to `target`.
    pub fn create_association(&self, target: &Object) -> Association {
        Association::new(
            self.services().clone(),
            AssociationDes {
                owner_id: self.supplier_account().to_string(),
                object_id: self.id().to_string(),
                asst_object_id: target.id().to_string(),
                ..AssociationDes::default()
            },
        )
    }

    pub fn get_attributes(&self, ctx: &RequestContext) -> ModelResult<Vec<Attribute>> {
        self.services().find::<AttributeDes>(ctx, &self.children(ctx))
    }

    pub fn get_groups(&self, ctx: &RequestContext) -> ModelResult<Vec<Group>> {
        self.services().find::<GroupDes>(ctx, &self.children(ctx))
    }

    /// Associations where this object is the source.
    pub fn get_associations(&self, ctx: &RequestContext) -> ModelResult<Vec<Association>> {
        self.services().find::<AssociationDes>(ctx, &self.children(ctx))
    }

    pub fn set_classification(&mut self, classification: &Classification) {
        self.record_mut().classification_id = classification.id().to_string();
    }

    /// Resolve the parent classification by id. `None` when unset or unknown.
    pub fn get_classification(&self, ctx: &RequestContext) -> ModelResult<Option<Classification>> {
        if self.classification_id().is_empty() {
            return Ok(None);
        }
        let cond = Condition::new()
            .equal(BK_OWNER_ID, ctx.owner_id())
            .equal(BK_CLASSIFICATION_ID, self.classification_id());
        Ok(self
            .services()
            .find::<ClassificationDes>(ctx, &cond)?
            .into_iter()
            .next())
    }

    pub fn classification_id(&self) -> &str {
        &self.record().classification_id
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) {
        self.record_mut().obj_icon = icon.into();
    }

    pub fn icon(&self) -> &str {
        &self.record().obj_icon
    }

    pub fn set_id(&mut self, object_id: impl Into<String>) {
        self.record_mut().object_id = object_id.into();
    }

    pub fn id(&self) -> &str {
        &self.record().object_id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record_mut().object_name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.record().object_name
    }

    pub fn set_is_pre(&mut self, is_pre: bool) {
        self.record_mut().is_pre = is_pre;
    }

    pub fn is_pre(&self) -> bool {
        self.record().is_pre
    }

    pub fn set_is_paused(&mut self, is_paused: bool) {
        self.record_mut().is_paused = is_paused;
    }

    pub fn is_paused(&self) -> bool {
        self.record().is_paused
    }

    pub fn set_position(&mut self, position: impl Into<String>) {
        self.record_mut().position = position.into();
    }

    pub fn position(&self) -> &str {
        &self.record().position
    }

    pub fn set_supplier_account(&mut self, owner_id: impl Into<String>) {
        self.record_mut().owner_id = owner_id.into();
    }

    pub fn supplier_account(&self) -> &str {
        &self.record().owner_id
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.record_mut().description = description.into();
    }

    pub fn description(&self) -> &str {
        &self.record().description
    }

    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.record_mut().creator = creator.into();
    }

    pub fn creator(&self) -> &str {
        &self.record().creator
    }

    pub fn set_modifier(&mut self, modifier: impl Into<String>) {
        self.record_mut().modifier = modifier.into();
    }

    pub fn modifier(&self) -> &str {
        &self.record().modifier
    }
}
