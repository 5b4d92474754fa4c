//! Generic entity lifecycle shared by every entity kind.
//!
//! A [`ModelEntity`] wraps one canonical record plus an `is_new` flag. The flag
//! selects create vs. update in [`ModelEntity::save`]. The request context is
//! passed into each operation and never stored.
//!
//! ```text
//! construct (factory / parent) -> parse -> save -> create | update
//!                                        -> delete (via DeleteCoordinator)
//! ```

use std::sync::Arc;

use cmdb_core::{Condition, MapStr, ModelResult, RequestContext, codec};

use crate::client::{DeleteCoordinator, PersistenceClient, into_model_result};
use crate::keys::{BK_ID, BK_OWNER_ID};
use crate::record::{MetaKind, Record};

/// Collaborators every entity talks to.
#[derive(Clone)]
pub struct ModelServices {
    client: Arc<dyn PersistenceClient>,
    coordinator: Arc<dyn DeleteCoordinator>,
}

impl ModelServices {
    pub fn new(
        client: Arc<dyn PersistenceClient>,
        coordinator: Arc<dyn DeleteCoordinator>,
    ) -> Self {
        Self {
            client,
            coordinator,
        }
    }

    pub fn client(&self) -> &dyn PersistenceClient {
        self.client.as_ref()
    }

    pub fn coordinator(&self) -> &dyn DeleteCoordinator {
        self.coordinator.as_ref()
    }

    /// Select records of kind `R` matching `cond` as-is (no owner scoping added).
    pub fn select<R: Record>(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<Vec<R>> {
        into_model_result(
            R::KIND.as_str(),
            "select",
            R::select(self.client(), ctx.cancellation(), &ctx.headers(), cond),
        )
    }

    /// Select and wrap as persisted entities (`is_new == false`).
    pub fn find<R: Record>(
        &self,
        ctx: &RequestContext,
        cond: &Condition,
    ) -> ModelResult<Vec<ModelEntity<R>>> {
        Ok(self
            .select::<R>(ctx, cond)?
            .into_iter()
            .map(|record| ModelEntity::existing(self.clone(), record))
            .collect())
    }
}

impl core::fmt::Debug for ModelServices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelServices").finish_non_exhaustive()
    }
}

/// One entity of kind `R`: a canonical record plus lifecycle state.
#[derive(Clone)]
pub struct ModelEntity<R: Record> {
    record: R,
    is_new: bool,
    services: ModelServices,
}

impl<R: Record> ModelEntity<R> {
    /// A not-yet-persisted entity.
    pub fn new(services: ModelServices, record: R) -> Self {
        Self {
            record,
            is_new: true,
            services,
        }
    }

    /// An entity known to exist in the persistence collaborator.
    pub fn existing(services: ModelServices, record: R) -> Self {
        Self {
            record,
            is_new: false,
            services,
        }
    }

    pub fn kind(&self) -> MetaKind {
        R::KIND
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn into_record(self) -> R {
        self.record
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Mark the entity as new or persisted. `save` does this itself after a
    /// successful create; callers driving `create` directly use this.
    pub fn set_is_new(&mut self, is_new: bool) {
        self.is_new = is_new;
    }

    pub fn services(&self) -> &ModelServices {
        &self.services
    }

    pub(crate) fn record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    /// Hydrate from a dynamic mapping, then enforce required fields.
    ///
    /// Keys present in `data` are merged over [`Record::parse_base`]; values
    /// the mapping does not name (ids, parent keys set by a factory) survive.
    /// The entity is only changed when decoding and validation both succeed.
    pub fn parse(&mut self, ctx: &RequestContext, data: &MapStr) -> ModelResult<()> {
        let mut parsed = self.record.parse_base();
        codec::merge(data, &mut parsed)?;
        parsed.after_decode(ctx);
        codec::check_required(&parsed)?;
        self.record = parsed;
        Ok(())
    }

    pub fn to_map_str(&self) -> ModelResult<MapStr> {
        Ok(codec::encode(&self.record))
    }

    /// Whether a record with this identity exists under the caller's owner.
    pub fn is_exists(&self, ctx: &RequestContext) -> ModelResult<bool> {
        let cond = self.record.identity(ctx.owner_id());
        let found = self.services.select::<R>(ctx, &cond)?;
        Ok(!found.is_empty())
    }

    /// Send the record (owner injected from `ctx`) to the collaborator and
    /// absorb the created record it returns. Leaves `is_new` untouched.
    pub fn create(&mut self, ctx: &RequestContext) -> ModelResult<()> {
        self.record.before_write(&self.services, ctx)?;

        let mut record = self.record.clone();
        record.set_owner_id(ctx.owner_id());

        let created = into_model_result(
            R::KIND.as_str(),
            "create",
            R::create(
                self.services.client(),
                ctx.cancellation(),
                &ctx.headers(),
                record,
            ),
        )?;

        tracing::debug!(kind = %R::KIND, id = %created.update_key(), "record created");
        self.record = created;
        Ok(())
    }

    /// Send the current field values as a partial update keyed by the
    /// record's update key.
    pub fn update(&self, ctx: &RequestContext) -> ModelResult<()> {
        self.record.before_write(&self.services, ctx)?;

        let mut data = codec::encode(&self.record);
        data.remove(BK_ID);
        data.insert(BK_OWNER_ID.to_string(), ctx.owner_id().into());

        let key = self.record.update_key();
        into_model_result(
            R::KIND.as_str(),
            "update",
            R::update(
                self.services.client(),
                ctx.cancellation(),
                &ctx.headers(),
                &key,
                data,
            ),
        )
    }

    /// Remove through the delete coordinator, which owns cascade semantics.
    pub fn delete(&self, ctx: &RequestContext) -> ModelResult<()> {
        let cond = self.record.identity(ctx.owner_id());
        R::delete(self.services.coordinator(), ctx, &cond)
    }

    /// `create` when new, `update` otherwise. Errors propagate; a successful
    /// create clears `is_new`.
    pub fn save(&mut self, ctx: &RequestContext) -> ModelResult<()> {
        if self.is_new {
            tracing::debug!(kind = %R::KIND, "save dispatches to create");
            self.create(ctx)?;
            self.is_new = false;
            Ok(())
        } else {
            tracing::debug!(kind = %R::KIND, "save dispatches to update");
            self.update(ctx)
        }
    }
}

impl<R: Record> core::fmt::Debug for ModelEntity<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelEntity")
            .field("kind", &R::KIND)
            .field("record", &self.record)
            .field("is_new", &self.is_new)
            .finish()
    }
}
