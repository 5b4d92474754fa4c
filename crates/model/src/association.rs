//! Association: a directed link between two object types.

use cmdb_core::{Condition, ModelResult, RequestContext};

use crate::entity::ModelEntity;
use crate::keys::{BK_OBJ_ID, BK_OWNER_ID};
use crate::metadata::{AssociationDes, ObjectDes};
use crate::object::Object;

pub type Association = ModelEntity<AssociationDes>;

impl ModelEntity<AssociationDes> {
    fn resolve(&self, ctx: &RequestContext, object_id: &str) -> ModelResult<Option<Object>> {
        if object_id.is_empty() {
            return Ok(None);
        }
        let cond = Condition::new()
            .equal(BK_OWNER_ID, ctx.owner_id())
            .equal(BK_OBJ_ID, object_id);
        Ok(self.services().find::<ObjectDes>(ctx, &cond)?.into_iter().next())
    }

    /// The source object.
    pub fn get_object(&self, ctx: &RequestContext) -> ModelResult<Option<Object>> {
        self.resolve(ctx, self.object_id())
    }

    /// The target object.
    pub fn get_asst_object(&self, ctx: &RequestContext) -> ModelResult<Option<Object>> {
        self.resolve(ctx, self.asst_object_id())
    }

    pub fn object_id(&self) -> &str {
        &self.record().object_id
    }

    pub fn asst_object_id(&self) -> &str {
        &self.record().asst_object_id
    }

    pub fn set_object_att_id(&mut self, attribute_id: impl Into<String>) {
        self.record_mut().object_att_id = attribute_id.into();
    }

    pub fn object_att_id(&self) -> &str {
        &self.record().object_att_id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record_mut().asst_name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.record().asst_name
    }

    pub fn set_forward(&mut self, forward: impl Into<String>) {
        self.record_mut().asst_forward = forward.into();
    }

    pub fn forward(&self) -> &str {
        &self.record().asst_forward
    }
}
