//! Group: a display grouping of attributes within one object type.

use cmdb_core::{Condition, ModelResult, RequestContext};

use crate::attribute::Attribute;
use crate::entity::ModelEntity;
use crate::keys::{BK_OBJ_ID, BK_OWNER_ID, BK_PROPERTY_GROUP};
use crate::metadata::{AttributeDes, GroupDes};

pub type Group = ModelEntity<GroupDes>;

impl ModelEntity<GroupDes> {
    /// Attributes of the same object assigned to this group.
    pub fn get_attributes(&self, ctx: &RequestContext) -> ModelResult<Vec<Attribute>> {
        let cond = Condition::new()
            .equal(BK_OWNER_ID, ctx.owner_id())
            .equal(BK_OBJ_ID, self.object_id())
            .equal(BK_PROPERTY_GROUP, self.id());
        self.services().find::<AttributeDes>(ctx, &cond)
    }

    pub fn object_id(&self) -> &str {
        &self.record().object_id
    }

    pub fn supplier_account(&self) -> &str {
        &self.record().owner_id
    }

    pub fn set_id(&mut self, group_id: impl Into<String>) {
        self.record_mut().group_id = group_id.into();
    }

    pub fn id(&self) -> &str {
        &self.record().group_id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record_mut().group_name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.record().group_name
    }

    pub fn set_index(&mut self, index: i64) {
        self.record_mut().group_index = index;
    }

    pub fn index(&self) -> i64 {
        self.record().group_index
    }

    pub fn set_is_default(&mut self, is_default: bool) {
        self.record_mut().is_default = is_default;
    }

    pub fn is_default(&self) -> bool {
        self.record().is_default
    }
}
