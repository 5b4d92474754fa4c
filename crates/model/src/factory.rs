//! Entry point for constructing and looking up entities.

use std::sync::Arc;

use cmdb_core::{Condition, ModelResult, RequestContext};

use crate::association::Association;
use crate::classification::Classification;
use crate::client::{DeleteCoordinator, PersistenceClient};
use crate::entity::{ModelEntity, ModelServices};
use crate::keys::BK_OWNER_ID;
use crate::metadata::{AssociationDes, ClassificationDes, ObjectDes};
use crate::object::Object;
use crate::record::Record;

/// Builds entities bound to one pair of collaborators.
///
/// New entities come out with the caller's owner pre-filled and `is_new` set.
/// Lookups are always scoped to the caller's owner.
#[derive(Debug, Clone)]
pub struct ModelFactory {
    services: ModelServices,
}

impl ModelFactory {
    pub fn new(
        client: Arc<dyn PersistenceClient>,
        coordinator: Arc<dyn DeleteCoordinator>,
    ) -> Self {
        Self {
            services: ModelServices::new(client, coordinator),
        }
    }

    pub fn from_services(services: ModelServices) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &ModelServices {
        &self.services
    }

    fn fresh<R: Record>(&self, ctx: &RequestContext) -> ModelEntity<R> {
        let mut record = R::default();
        record.set_owner_id(ctx.owner_id());
        ModelEntity::new(self.services.clone(), record)
    }

    pub fn create_classification(&self, ctx: &RequestContext) -> Classification {
        self.fresh::<ClassificationDes>(ctx)
    }

    pub fn create_object(&self, ctx: &RequestContext) -> Object {
        self.fresh::<ObjectDes>(ctx)
    }

    pub fn create_association(&self, ctx: &RequestContext) -> Association {
        self.fresh::<AssociationDes>(ctx)
    }

    /// Entities of kind `R` matching `cond` under the caller's owner.
    pub fn find<R: Record>(
        &self,
        ctx: &RequestContext,
        cond: Condition,
    ) -> ModelResult<Vec<ModelEntity<R>>> {
        let cond = cond.equal(BK_OWNER_ID, ctx.owner_id());
        self.services.find::<R>(ctx, &cond)
    }

    pub fn find_classifications(
        &self,
        ctx: &RequestContext,
        cond: Condition,
    ) -> ModelResult<Vec<Classification>> {
        self.find::<ClassificationDes>(ctx, cond)
    }

    pub fn find_objects(&self, ctx: &RequestContext, cond: Condition) -> ModelResult<Vec<Object>> {
        self.find::<ObjectDes>(ctx, cond)
    }

    pub fn find_associations(
        &self,
        ctx: &RequestContext,
        cond: Condition,
    ) -> ModelResult<Vec<Association>> {
        self.find::<AssociationDes>(ctx, cond)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    #[test]
    fn new_entities_carry_the_callers_owner() {
        let backend = MockBackend::new();
        let factory = ModelFactory::from_services(backend.services());
        let ctx = RequestContext::new("0");

        let object = factory.create_object(&ctx);
        assert!(object.is_new());
        assert_eq!(object.supplier_account(), "0");
        assert_eq!(factory.create_classification(&ctx).supplier_account(), "0");
        assert_eq!(factory.create_association(&ctx).record().owner_id, "0");
    }

    #[test]
    fn lookups_are_owner_scoped() {
        let backend = MockBackend::new();
        backend.seed_object("host", "bk_host_manage");
        let factory = ModelFactory::from_services(backend.services());

        let own = factory
            .find_objects(&RequestContext::new("0"), Condition::new())
            .unwrap();
        assert_eq!(own.len(), 1);
        assert!(!own[0].is_new());

        // A caller-supplied owner predicate cannot widen the scope.
        let foreign = factory
            .find_objects(
                &RequestContext::new("1"),
                Condition::new().equal(BK_OWNER_ID, "0"),
            )
            .unwrap();
        assert!(foreign.is_empty());
    }
}
