//! Delete coordination with cascade semantics.
//!
//! - object: its attributes, groups, instances and every association naming it
//!   as either endpoint go first, then the object.
//! - classification: refused while any object is still filed under it.
//! - group: member attributes fall back to the object's `default` group, then
//!   the group is removed. Refused for a default group (by id or by
//!   `bk_isdefault`) and for an object that has no `default` group to receive
//!   the members.
//! - attribute, instance, association: direct deletes.

use std::sync::Arc;

use serde_json::json;

use cmdb_core::{Condition, MapStr, ModelError, ModelResult, RequestContext};
use cmdb_model::keys::{
    BK_ASST_OBJ_ID, BK_CLASSIFICATION_ID, BK_GROUP_ID, BK_OBJ_ID, BK_OWNER_ID,
    BK_PROPERTY_GROUP, DEFAULT_GROUP_ID,
};
use cmdb_model::{DeleteCoordinator, PersistenceClient, into_model_result};

pub struct CascadingDeleteCoordinator {
    client: Arc<dyn PersistenceClient>,
}

impl CascadingDeleteCoordinator {
    pub fn new(client: Arc<dyn PersistenceClient>) -> Self {
        Self { client }
    }

    fn owned(ctx: &RequestContext) -> Condition {
        Condition::new().equal(BK_OWNER_ID, ctx.owner_id())
    }

    fn remove_object_children(&self, ctx: &RequestContext, object_id: &str) -> ModelResult<()> {
        let cancel = ctx.cancellation();
        let headers = ctx.headers();
        let children = Self::owned(ctx).equal(BK_OBJ_ID, object_id);

        into_model_result(
            "attribute",
            "delete",
            self.client.delete_object_attributes(cancel, &headers, &children),
        )?;
        into_model_result(
            "group",
            "delete",
            self.client.delete_groups(cancel, &headers, &children),
        )?;
        into_model_result(
            "instance",
            "delete",
            self.client
                .delete_instances(cancel, &headers, &Condition::new().equal(BK_OBJ_ID, object_id)),
        )?;
        into_model_result(
            "association",
            "delete",
            self.client.delete_associations(cancel, &headers, &children),
        )?;
        let inbound = Self::owned(ctx).equal(BK_ASST_OBJ_ID, object_id);
        into_model_result(
            "association",
            "delete",
            self.client.delete_associations(cancel, &headers, &inbound),
        )
    }
}

impl core::fmt::Debug for CascadingDeleteCoordinator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CascadingDeleteCoordinator").finish_non_exhaustive()
    }
}

impl DeleteCoordinator for CascadingDeleteCoordinator {
    fn delete_classification(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()> {
        let cancel = ctx.cancellation();
        let headers = ctx.headers();
        let classifications = into_model_result(
            "classification",
            "select",
            self.client.select_classifications(cancel, &headers, cond),
        )?;

        for classification in &classifications {
            let filed = Self::owned(ctx)
                .equal(BK_CLASSIFICATION_ID, classification.classification_id.as_str());
            let objects = into_model_result(
                "object",
                "select",
                self.client.select_objects(cancel, &headers, &filed),
            )?;
            if !objects.is_empty() {
                return Err(ModelError::conflict(format!(
                    "classification '{}' still has {} object(s)",
                    classification.classification_id,
                    objects.len()
                )));
            }
        }

        into_model_result(
            "classification",
            "delete",
            self.client.delete_classifications(cancel, &headers, cond),
        )
    }

    fn delete_object(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()> {
        let cancel = ctx.cancellation();
        let headers = ctx.headers();
        let objects = into_model_result(
            "object",
            "select",
            self.client.select_objects(cancel, &headers, cond),
        )?;

        for object in &objects {
            self.remove_object_children(ctx, &object.object_id)?;
            tracing::info!(
                object = %object.object_id,
                owner = %ctx.owner_id(),
                "object children removed"
            );
        }

        into_model_result(
            "object",
            "delete",
            self.client.delete_objects(cancel, &headers, cond),
        )
    }

    fn delete_object_attribute(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()> {
        into_model_result(
            "attribute",
            "delete",
            self.client
                .delete_object_attributes(ctx.cancellation(), &ctx.headers(), cond),
        )
    }

    fn delete_object_group(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()> {
        let cancel = ctx.cancellation();
        let headers = ctx.headers();
        let groups = into_model_result(
            "group",
            "select",
            self.client.select_groups(cancel, &headers, cond),
        )?;

        if groups
            .iter()
            .any(|g| g.is_default || g.group_id == DEFAULT_GROUP_ID)
        {
            return Err(ModelError::conflict("the default group cannot be deleted"));
        }
        for group in &groups {
            let fallback = Self::owned(ctx)
                .equal(BK_OBJ_ID, group.object_id.as_str())
                .equal(BK_GROUP_ID, DEFAULT_GROUP_ID);
            let found = into_model_result(
                "group",
                "select",
                self.client.select_groups(cancel, &headers, &fallback),
            )?;
            if found.is_empty() {
                return Err(ModelError::conflict(format!(
                    "object '{}' has no default group to receive the members of '{}'",
                    group.object_id, group.group_id
                )));
            }
        }

        for group in &groups {
            let members = Self::owned(ctx)
                .equal(BK_OBJ_ID, group.object_id.as_str())
                .equal(BK_PROPERTY_GROUP, group.group_id.as_str());
            let attributes = into_model_result(
                "attribute",
                "select",
                self.client.select_object_attributes(cancel, &headers, &members),
            )?;
            for attribute in &attributes {
                let mut patch = MapStr::new();
                patch.insert(BK_PROPERTY_GROUP.to_string(), json!(DEFAULT_GROUP_ID));
                into_model_result(
                    "attribute",
                    "update",
                    self.client.update_object_attribute(
                        cancel,
                        &headers,
                        &attribute.id.to_string(),
                        patch,
                    ),
                )?;
            }
            tracing::info!(
                group = %group.group_id,
                object = %group.object_id,
                moved = attributes.len(),
                "group members moved to the default group"
            );
        }

        into_model_result(
            "group",
            "delete",
            self.client.delete_groups(cancel, &headers, cond),
        )
    }

    fn delete_inst(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()> {
        into_model_result(
            "instance",
            "delete",
            self.client.delete_instances(ctx.cancellation(), &ctx.headers(), cond),
        )
    }

    fn delete_association(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()> {
        into_model_result(
            "association",
            "delete",
            self.client
                .delete_associations(ctx.cancellation(), &ctx.headers(), cond),
        )
    }
}
