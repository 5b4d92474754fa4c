//! Classification: groups object types.

use cmdb_core::{Condition, ModelResult, RequestContext};

use crate::entity::ModelEntity;
use crate::keys::{BK_CLASSIFICATION_ID, BK_OWNER_ID};
use crate::metadata::{ClassificationDes, ObjectDes};
use crate::object::Object;

pub type Classification = ModelEntity<ClassificationDes>;

impl ModelEntity<ClassificationDes> {
    /// A new, unsaved object filed under this classification.
    pub fn create_object(&self) -> Object {
        Object::new(
            self.services().clone(),
            ObjectDes {
                owner_id: self.supplier_account().to_string(),
                classification_id: self.id().to_string(),
                ..ObjectDes::default()
            },
        )
    }

    pub fn get_objects(&self, ctx: &RequestContext) -> ModelResult<Vec<Object>> {
        let cond = Condition::new()
            .equal(BK_OWNER_ID, ctx.owner_id())
            .equal(BK_CLASSIFICATION_ID, self.id());
        self.services().find::<ObjectDes>(ctx, &cond)
    }

    pub fn set_id(&mut self, classification_id: impl Into<String>) {
        self.record_mut().classification_id = classification_id.into();
    }

    pub fn id(&self) -> &str {
        &self.record().classification_id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record_mut().classification_name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.record().classification_name
    }

    pub fn set_type(&mut self, classification_type: impl Into<String>) {
        self.record_mut().classification_type = classification_type.into();
    }

    pub fn classification_type(&self) -> &str {
        &self.record().classification_type
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) {
        self.record_mut().classification_icon = icon.into();
    }

    pub fn icon(&self) -> &str {
        &self.record().classification_icon
    }

    pub fn set_supplier_account(&mut self, owner_id: impl Into<String>) {
        self.record_mut().owner_id = owner_id.into();
    }

    pub fn supplier_account(&self) -> &str {
        &self.record().owner_id
    }
}
