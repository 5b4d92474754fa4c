//! Attribute: one field of an object type.

use serde_json::Value;

use cmdb_core::{Condition, ModelResult, RequestContext};

use crate::entity::ModelEntity;
use crate::group::Group;
use crate::keys::{BK_GROUP_ID, BK_OBJ_ID, BK_OWNER_ID};
use crate::metadata::{AttributeDes, GroupDes};

pub type Attribute = ModelEntity<AttributeDes>;

impl ModelEntity<AttributeDes> {
    /// Put this attribute into `group` (by group id).
    pub fn set_group(&mut self, group: &Group) {
        self.record_mut().property_group = group.id().to_string();
    }

    /// Resolve the group this attribute belongs to. `None` when unset or unknown.
    pub fn get_group(&self, ctx: &RequestContext) -> ModelResult<Option<Group>> {
        if self.group_id().is_empty() {
            return Ok(None);
        }
        let cond = Condition::new()
            .equal(BK_OWNER_ID, ctx.owner_id())
            .equal(BK_OBJ_ID, self.object_id())
            .equal(BK_GROUP_ID, self.group_id());
        Ok(self.services().find::<GroupDes>(ctx, &cond)?.into_iter().next())
    }

    pub fn group_id(&self) -> &str {
        &self.record().property_group
    }

    pub fn object_id(&self) -> &str {
        &self.record().object_id
    }

    pub fn supplier_account(&self) -> &str {
        &self.record().owner_id
    }

    pub fn set_id(&mut self, property_id: impl Into<String>) {
        self.record_mut().property_id = property_id.into();
    }

    pub fn id(&self) -> &str {
        &self.record().property_id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record_mut().property_name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.record().property_name
    }

    pub fn set_type(&mut self, property_type: impl Into<String>) {
        self.record_mut().property_type = property_type.into();
    }

    pub fn property_type(&self) -> &str {
        &self.record().property_type
    }

    pub fn set_index(&mut self, index: i64) {
        self.record_mut().property_index = index;
    }

    pub fn index(&self) -> i64 {
        self.record().property_index
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.record_mut().unit = unit.into();
    }

    pub fn unit(&self) -> &str {
        &self.record().unit
    }

    pub fn set_is_required(&mut self, is_required: bool) {
        self.record_mut().is_required = is_required;
    }

    pub fn is_required(&self) -> bool {
        self.record().is_required
    }

    pub fn set_is_only(&mut self, is_only: bool) {
        self.record_mut().is_only = is_only;
    }

    pub fn is_only(&self) -> bool {
        self.record().is_only
    }

    pub fn set_option(&mut self, option: Value) {
        self.record_mut().option = option;
    }

    pub fn option(&self) -> &Value {
        &self.record().option
    }
}
