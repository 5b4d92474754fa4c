//! In-crate test double for both collaborator ports.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use cmdb_core::{Condition, Headers, MapStr, ModelResult, RequestContext, codec};

use crate::client::{
    ApiResponse, ClientResult, DeleteCoordinator, PersistenceClient, TransportError,
};
use crate::entity::ModelServices;
use crate::keys::{BK_CLASSIFICATION_ID, BK_OBJ_ID, BK_OWNER_ID};
use crate::metadata::{AssociationDes, AttributeDes, ClassificationDes, GroupDes, ObjectDes};
use crate::record::Record;

enum Failure {
    Transport(String),
    Remote(i64, String),
}

/// Records every write, serves selects from memory, and can fail the next call.
#[derive(Default)]
pub(crate) struct MockState {
    classifications: Mutex<Vec<ClassificationDes>>,
    objects: Mutex<Vec<ObjectDes>>,
    attributes: Mutex<Vec<AttributeDes>>,
    groups: Mutex<Vec<GroupDes>>,
    associations: Mutex<Vec<AssociationDes>>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<Failure>>,
    last_update: Mutex<Option<MapStr>>,
    next_id: AtomicI64,
}

pub(crate) struct MockBackend {
    state: Arc<MockState>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(MockState::default()),
        }
    }

    pub(crate) fn services(&self) -> ModelServices {
        ModelServices::new(self.state.clone(), self.state.clone())
    }

    /// Writes issued so far (selects are not recorded).
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    pub(crate) fn last_update(&self) -> Option<MapStr> {
        self.state.last_update.lock().unwrap().clone()
    }

    pub(crate) fn fail_with_code(&self, code: i64, message: &str) {
        *self.state.failure.lock().unwrap() = Some(Failure::Remote(code, message.to_string()));
    }

    pub(crate) fn fail_transport(&self, message: &str) {
        *self.state.failure.lock().unwrap() = Some(Failure::Transport(message.to_string()));
    }

    pub(crate) fn seed_object(&self, object_id: &str, classification_id: &str) {
        self.state.objects.lock().unwrap().push(ObjectDes {
            id: self.state.next_id(),
            object_id: object_id.into(),
            classification_id: classification_id.into(),
            owner_id: "0".into(),
            ..ObjectDes::default()
        });
    }

    pub(crate) fn seed_classification(&self, classification_id: &str) {
        self.state.classifications.lock().unwrap().push(ClassificationDes {
            id: self.state.next_id(),
            classification_id: classification_id.into(),
            owner_id: "0".into(),
            ..ClassificationDes::default()
        });
    }

    pub(crate) fn seed_attribute(&self, object_id: &str, property_id: &str, group_id: &str) {
        self.state.attributes.lock().unwrap().push(AttributeDes {
            id: self.state.next_id(),
            object_id: object_id.into(),
            property_id: property_id.into(),
            property_group: group_id.into(),
            owner_id: "0".into(),
            ..AttributeDes::default()
        });
    }

    pub(crate) fn seed_group(&self, object_id: &str, group_id: &str) {
        self.state.groups.lock().unwrap().push(GroupDes {
            id: self.state.next_id(),
            object_id: object_id.into(),
            group_id: group_id.into(),
            owner_id: "0".into(),
            ..GroupDes::default()
        });
    }
}

pub(crate) fn map(value: Value) -> MapStr {
    match value {
        Value::Object(m) => m,
        other => panic!("expected an object, got {other}"),
    }
}

pub(crate) fn object_map(object_id: &str, classification_id: &str) -> MapStr {
    map(json!({
        "bk_obj_id": object_id,
        "bk_classification_id": classification_id,
    }))
}

impl MockState {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn take_failure<T: Default>(&self) -> Option<ClientResult<T>> {
        self.failure.lock().unwrap().take().map(|f| match f {
            Failure::Transport(msg) => Err(TransportError::new(msg)),
            Failure::Remote(code, msg) => Ok(ApiResponse::failure(code, msg)),
        })
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn select_in<R: Record>(
        &self,
        store: &Mutex<Vec<R>>,
        cond: &Condition,
    ) -> ClientResult<Vec<R>> {
        if let Some(failed) = self.take_failure() {
            return failed;
        }
        let rows = store.lock().unwrap();
        Ok(ApiResponse::success(
            rows.iter()
                .filter(|r| cond.matches(&codec::encode(*r)))
                .cloned()
                .collect(),
        ))
    }

    fn create_in<R: Record>(
        &self,
        store: &Mutex<Vec<R>>,
        call: &str,
        mut record: R,
    ) -> ClientResult<R> {
        self.record_call(call.to_string());
        if let Some(failed) = self.take_failure() {
            return failed;
        }
        if let Some(id) = R::field("id") {
            (id.set)(&mut record, &json!(self.next_id()));
        }
        store.lock().unwrap().push(record.clone());
        Ok(ApiResponse::success(record))
    }

    fn update_in<R: Record>(
        &self,
        store: &Mutex<Vec<R>>,
        call: &str,
        key: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.record_call(format!("{call}:{key}"));
        *self.last_update.lock().unwrap() = Some(data.clone());
        if let Some(failed) = self.take_failure() {
            return failed;
        }
        let mut rows = store.lock().unwrap();
        match rows.iter_mut().find(|r| r.update_key() == key) {
            Some(row) => match codec::merge(&data, row) {
                Ok(()) => Ok(ApiResponse::success(())),
                Err(err) => Ok(ApiResponse::failure(1199, err.to_string())),
            },
            None => Ok(ApiResponse::failure(1102, "record not found")),
        }
    }

    fn delete_in<R: Record>(
        &self,
        store: &Mutex<Vec<R>>,
        call: &str,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.record_call(call.to_string());
        if let Some(failed) = self.take_failure() {
            return failed;
        }
        store
            .lock()
            .unwrap()
            .retain(|r| !cond.matches(&codec::encode(r)));
        Ok(ApiResponse::success(()))
    }

    fn log_delete(&self, op: &str, cond: &Condition) -> ModelResult<()> {
        let key = cond
            .predicates()
            .filter(|(field, _)| *field != BK_OWNER_ID)
            .filter_map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(":");
        self.record_call(format!("coordinator.{op}:{key}"));
        Ok(())
    }
}

impl PersistenceClient for MockState {
    fn select_classifications(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<ClassificationDes>> {
        self.select_in(&self.classifications, cond)
    }
    fn create_classification(
        &self,
        _: &CancellationToken,
        _: &Headers,
        record: ClassificationDes,
    ) -> ClientResult<ClassificationDes> {
        self.create_in(&self.classifications, "create_classification", record)
    }
    fn update_classification(
        &self,
        _: &CancellationToken,
        _: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.classifications, "update_classification", id, data)
    }
    fn delete_classifications(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.classifications, "delete_classifications", cond)
    }

    fn select_objects(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<ObjectDes>> {
        self.select_in(&self.objects, cond)
    }
    fn create_object(
        &self,
        _: &CancellationToken,
        _: &Headers,
        record: ObjectDes,
    ) -> ClientResult<ObjectDes> {
        self.create_in(&self.objects, "create_object", record)
    }
    fn update_object(
        &self,
        _: &CancellationToken,
        _: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.objects, "update_object", id, data)
    }
    fn delete_objects(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.objects, "delete_objects", cond)
    }

    fn select_object_attributes(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<AttributeDes>> {
        self.select_in(&self.attributes, cond)
    }
    fn create_object_attribute(
        &self,
        _: &CancellationToken,
        _: &Headers,
        record: AttributeDes,
    ) -> ClientResult<AttributeDes> {
        self.create_in(&self.attributes, "create_object_attribute", record)
    }
    fn update_object_attribute(
        &self,
        _: &CancellationToken,
        _: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.attributes, "update_object_attribute", id, data)
    }
    fn delete_object_attributes(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.attributes, "delete_object_attributes", cond)
    }

    fn select_groups(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<GroupDes>> {
        self.select_in(&self.groups, cond)
    }
    fn create_group(
        &self,
        _: &CancellationToken,
        _: &Headers,
        record: GroupDes,
    ) -> ClientResult<GroupDes> {
        self.create_in(&self.groups, "create_group", record)
    }
    fn update_group(
        &self,
        _: &CancellationToken,
        _: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.groups, "update_group", id, data)
    }
    fn delete_groups(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.groups, "delete_groups", cond)
    }

    fn select_associations(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<AssociationDes>> {
        self.select_in(&self.associations, cond)
    }
    fn create_association(
        &self,
        _: &CancellationToken,
        _: &Headers,
        record: AssociationDes,
    ) -> ClientResult<AssociationDes> {
        self.create_in(&self.associations, "create_association", record)
    }
    fn update_association(
        &self,
        _: &CancellationToken,
        _: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()> {
        self.update_in(&self.associations, "update_association", id, data)
    }
    fn delete_associations(
        &self,
        _: &CancellationToken,
        _: &Headers,
        cond: &Condition,
    ) -> ClientResult<()> {
        self.delete_in(&self.associations, "delete_associations", cond)
    }

    fn delete_instances(
        &self,
        _: &CancellationToken,
        _: &Headers,
        _: &Condition,
    ) -> ClientResult<()> {
        self.record_call("delete_instances".to_string());
        Ok(ApiResponse::success(()))
    }
}

impl DeleteCoordinator for MockState {
    fn delete_classification(&self, _: &RequestContext, cond: &Condition) -> ModelResult<()> {
        self.log_delete("delete_classification", cond)
    }
    fn delete_object(&self, _: &RequestContext, cond: &Condition) -> ModelResult<()> {
        self.log_delete("delete_object", cond)
    }
    fn delete_object_attribute(&self, _: &RequestContext, cond: &Condition) -> ModelResult<()> {
        self.log_delete("delete_object_attribute", cond)
    }
    fn delete_object_group(&self, _: &RequestContext, cond: &Condition) -> ModelResult<()> {
        self.log_delete("delete_object_group", cond)
    }
    fn delete_inst(&self, _: &RequestContext, cond: &Condition) -> ModelResult<()> {
        self.log_delete("delete_inst", cond)
    }
    fn delete_association(&self, _: &RequestContext, cond: &Condition) -> ModelResult<()> {
        self.log_delete("delete_association", cond)
    }
}

#[test]
fn seeded_rows_are_owner_scoped() {
    let backend = MockBackend::new();
    backend.seed_object("host", "bk_host_manage");
    let cond = Condition::new()
        .equal(BK_OWNER_ID, "0")
        .equal(BK_OBJ_ID, "host");
    let rows = backend
        .state
        .select_objects(&CancellationToken::new(), &RequestContext::new("0").headers(), &cond)
        .unwrap()
        .data;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].classification_id, "bk_host_manage");

    let other = Condition::new().equal(BK_CLASSIFICATION_ID, "bk_network");
    let rows = backend
        .state
        .select_objects(&CancellationToken::new(), &RequestContext::new("0").headers(), &other)
        .unwrap()
        .data;
    assert!(rows.is_empty());
}
