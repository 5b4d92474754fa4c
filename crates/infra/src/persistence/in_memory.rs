use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, RwLock};

use chrono::Utc;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use cmdb_core::{Condition, Headers, MapStr, codec};
use cmdb_model::{
    ApiResponse, AssociationDes, AttributeDes, ClassificationDes, ClientResult, GroupDes,
    ObjectDes, PersistenceClient, Record, TransportError,
};

/// A record with the same identity already exists under the owner.
pub const CODE_DUPLICATE: i64 = 1101;
/// No record carries the update key under the owner.
pub const CODE_NOT_FOUND: i64 = 1102;
/// The partial update does not fit the record's field types.
pub const CODE_INVALID_DATA: i64 = 1103;

/// Rows per owner (`bk_supplier_account`).
type Table<R> = RwLock<HashMap<String, Vec<R>>>;

/// In-memory, owner-isolated metadata store.
///
/// Intended for tests/dev and the CLI. Every call is scoped to the owner in the
/// request headers; rows of other owners are never visible. A cancelled token
/// fails the call as a transport error before any state is touched.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    classifications: Table<ClassificationDes>,
    objects: Table<ObjectDes>,
    attributes: Table<AttributeDes>,
    groups: Table<GroupDes>,
    associations: Table<AssociationDes>,
    instances: Table<MapStr>,
    next_id: AtomicI64,
    injected: Mutex<Option<(i64, String)>>,
}

fn poisoned() -> TransportError {
    TransportError::new("lock poisoned")
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call answer with a non-success `code`.
    pub fn fail_next(&self, code: i64, message: impl Into<String>) -> Result<(), TransportError> {
        let mut slot = self.injected.lock().map_err(|_| poisoned())?;
        *slot = Some((code, message.into()));
        Ok(())
    }

    /// Store an instance row of some object type (`bk_obj_id` set by the caller).
    pub fn insert_instance(&self, owner_id: &str, data: MapStr) -> Result<(), TransportError> {
        let mut table = self.instances.write().map_err(|_| poisoned())?;
        table.entry(owner_id.to_string()).or_default().push(data);
        Ok(())
    }

    pub fn instances(&self, owner_id: &str) -> Result<Vec<MapStr>, TransportError> {
        let table = self.instances.read().map_err(|_| poisoned())?;
        Ok(table.get(owner_id).cloned().unwrap_or_default())
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Cancellation and injected failures short-circuit every call.
    fn begin<T: Default>(&self, cancel: &CancellationToken) -> Option<ClientResult<T>> {
        if cancel.is_cancelled() {
            return Some(Err(TransportError::new("request cancelled")));
        }
        let (code, message) = match self.injected.lock() {
            Ok(mut slot) => slot.take()?,
            Err(_) => return Some(Err(poisoned())),
        };
        Some(Ok(ApiResponse::failure(code, message)))
    }

    fn select_in<R: Record>(
        &self,
        table: &Table<R>,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<R>> {
        if let Some(early) = self.begin(cancel) {
            return early;
        }
        let table = table.read().map_err(|_| poisoned())?;
        let rows = table
            .get(&headers.owner_id)
            .map(|rows| {
                rows.iter()
                    .filter(|row| cond.matches(&codec::encode(*row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(ApiResponse::success(rows))
    }

    fn create_in<R: Record>(
        &self,
        table: &Table<R>,
        cancel: &CancellationToken,
        headers: &Headers,
        mut record: R,
    ) -> ClientResult<R> {
        if let Some(early) = self.begin(cancel) {
            return early;
        }
        let mut table = table.write().map_err(|_| poisoned())?;
        let rows = table.entry(headers.owner_id.clone()).or_default();

        let identity = record.identity(&headers.owner_id);
        if rows.iter().any(|row| identity.matches(&codec::encode(row))) {
            return Ok(ApiResponse::failure(
                CODE_DUPLICATE,
                format!("{} already exists", R::KIND),
            ));
        }

        record.set_owner_id(&headers.owner_id);
        if let Some(id) = R::field("id") {
            (id.set)(&mut record, &json!(self.next_id()));
        }
        let now = json!(Utc::now().to_rfc3339());
        for name in ["create_time", "last_time"] {
            if let Some(field) = R::field(name) {
                (field.set)(&mut record, &now);
            }
        }

        tracing::debug!(kind = %R::KIND, owner = %headers.owner_id, "row inserted");
        rows.push(record.clone());
        Ok(ApiResponse::success(record))
    }

    fn update_in<R: Record>(
        &self,
        table: &Table<R>,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        if let Some(early) = self.begin(cancel) {
            return early;
        }
        let mut table = table.write().map_err(|_| poisoned())?;
        let Some(row) = table
            .get_mut(&headers.owner_id)
            .and_then(|rows| rows.iter_mut().find(|row| row.update_key() == key))
        else {
            return Ok(ApiResponse::failure(
                CODE_NOT_FOUND,
                format!("{} '{key}' not found", R::KIND),
            ));
        };

        if let Err(err) = codec::merge(&data, row) {
            return Ok(ApiResponse::failure(CODE_INVALID_DATA, err.to_string()));
        }
        if let Some(field) = R::field("last_time") {
            (field.set)(row, &json!(Utc::now().to_rfc3339()));
        }
        Ok(ApiResponse::success(()))
    }

    fn delete_in<R: Record>(
        &self,
        table: &Table<R>,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        if let Some(early) = self.begin(cancel) {
            return early;
        }
        let mut table = table.write().map_err(|_| poisoned())?;
        if let Some(rows) = table.get_mut(&headers.owner_id) {
            let before = rows.len();
            rows.retain(|row| !cond.matches(&codec::encode(row)));
            tracing::debug!(kind = %R::KIND, removed = before - rows.len(), "rows deleted");
        }
        Ok(ApiResponse::success(()))
    }
}

impl PersistenceClient for InMemoryPersistence {
    fn select_classifications(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<ClassificationDes>> {
        self.select_in(&self.classifications, cancel, headers, cond)
    }

    fn create_classification(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: ClassificationDes,
    ) -> ClientResult<ClassificationDes> {
        self.create_in(&self.classifications, cancel, headers, record)
    }

    fn update_classification(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.classifications, cancel, headers, key, data)
    }

    fn delete_classifications(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.classifications, cancel, headers, cond)
    }

    fn select_objects(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<ObjectDes>> {
        self.select_in(&self.objects, cancel, headers, cond)
    }

    fn create_object(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: ObjectDes,
    ) -> ClientResult<ObjectDes> {
        self.create_in(&self.objects, cancel, headers, record)
    }

    fn update_object(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.objects, cancel, headers, key, data)
    }

    fn delete_objects(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.objects, cancel, headers, cond)
    }

    fn select_object_attributes(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<AttributeDes>> {
        self.select_in(&self.attributes, cancel, headers, cond)
    }

    fn create_object_attribute(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: AttributeDes,
    ) -> ClientResult<AttributeDes> {
        self.create_in(&self.attributes, cancel, headers, record)
    }

    fn update_object_attribute(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.attributes, cancel, headers, key, data)
    }

    fn delete_object_attributes(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.attributes, cancel, headers, cond)
    }

    fn select_groups(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<GroupDes>> {
        self.select_in(&self.groups, cancel, headers, cond)
    }

    fn create_group(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: GroupDes,
    ) -> ClientResult<GroupDes> {
        self.create_in(&self.groups, cancel, headers, record)
    }

    fn update_group(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.groups, cancel, headers, key, data)
    }

    fn delete_groups(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.groups, cancel, headers, cond)
    }

    fn select_associations(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<AssociationDes>> {
        self.select_in(&self.associations, cancel, headers, cond)
    }

    fn create_association(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: AssociationDes,
    ) -> ClientResult<AssociationDes> {
        self.create_in(&self.associations, cancel, headers, record)
    }

    fn update_association(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.associations, cancel, headers, key, data)
    }

    fn delete_associations(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.associations, cancel, headers, cond)
    }

    fn delete_instances(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        if let Some(early) = self.begin(cancel) {
            return early;
        }
        let mut table = self.instances.write().map_err(|_| poisoned())?;
        if let Some(rows) = table.get_mut(&headers.owner_id) {
            rows.retain(|row| !cond.matches(row));
        }
        Ok(ApiResponse::success(()))
    }
}
