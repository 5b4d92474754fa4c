//! Collaborator ports consumed by the entity lifecycle.
//!
//! - [`PersistenceClient`]: the remote metadata service (select/create/update/delete
//!   per entity kind).
//! - [`DeleteCoordinator`]: owns deletion, including cascade semantics.
//!
//! Both are synchronous; adapters decide how to honour the cancellation token
//! they are handed.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use cmdb_core::{CC_SUCCESS, Condition, Headers, MapStr, ModelError, ModelResult, RequestContext};

use crate::metadata::{AssociationDes, AttributeDes, ClassificationDes, GroupDes, ObjectDes};

/// Envelope returned by the persistence collaborator for a completed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: CC_SUCCESS,
            message: "success".to_string(),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CC_SUCCESS
    }
}

impl<T: Default> ApiResponse<T> {
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: T::default(),
        }
    }
}

/// The call did not complete (unreachable service, broken connection,
/// cancelled request).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<TransportError> for ModelError {
    fn from(value: TransportError) -> Self {
        ModelError::Transport(value.0)
    }
}

/// Result of one collaborator call.
pub type ClientResult<T> = Result<ApiResponse<T>, TransportError>;

/// Remote metadata service.
///
/// Every method receives the caller's cancellation token (pass-through) and the
/// request headers. `update_*` methods take the record key and a partial record.
pub trait PersistenceClient: Send + Sync {
    fn select_classifications(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<ClassificationDes>>;
    fn create_classification(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: ClassificationDes,
    ) -> ClientResult<ClassificationDes>;
    fn update_classification(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()>;
    fn delete_classifications(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()>;

    fn select_objects(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<ObjectDes>>;
    fn create_object(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: ObjectDes,
    ) -> ClientResult<ObjectDes>;
    fn update_object(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()>;
    fn delete_objects(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()>;

    fn select_object_attributes(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<AttributeDes>>;
    fn create_object_attribute(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: AttributeDes,
    ) -> ClientResult<AttributeDes>;
    fn update_object_attribute(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()>;
    fn delete_object_attributes(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()>;

    fn select_groups(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<GroupDes>>;
    fn create_group(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: GroupDes,
    ) -> ClientResult<GroupDes>;
    fn update_group(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()>;
    fn delete_groups(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()>;

    fn select_associations(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<Vec<AssociationDes>>;
    fn create_association(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        record: AssociationDes,
    ) -> ClientResult<AssociationDes>;
    fn update_association(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        id: &str,
        data: MapStr,
    ) -> ClientResult<()>;
    fn delete_associations(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()>;

    /// Instances are not modelled here; they are only removed when their
    /// object type goes away.
    fn delete_instances(
        &self,
        cancel: &CancellationToken,
        headers: &Headers,
        cond: &Condition,
    ) -> ClientResult<()>;
}

/// Deletion entry point for every entity kind.
///
/// Implementations own cascade semantics; entity-level `delete` only builds the
/// condition identifying itself and calls in here.
pub trait DeleteCoordinator: Send + Sync {
    fn delete_classification(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()>;
    fn delete_object(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()>;
    fn delete_object_attribute(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()>;
    fn delete_object_group(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()>;
    fn delete_inst(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()>;
    fn delete_association(&self, ctx: &RequestContext, cond: &Condition) -> ModelResult<()>;
}

/// Map a collaborator call outcome into the model error taxonomy.
///
/// `kind`/`op` only feed the diagnostics.
pub fn into_model_result<T>(kind: &str, op: &str, result: ClientResult<T>) -> ModelResult<T> {
    let rsp = result.map_err(|err| {
        tracing::warn!(kind, op, error = %err, "failed to request the persistence collaborator");
        ModelError::from(err)
    })?;

    if !rsp.is_success() {
        tracing::warn!(
            kind,
            op,
            code = rsp.code,
            message = %rsp.message,
            "persistence collaborator rejected the request"
        );
        return Err(ModelError::remote(rsp.code, rsp.message));
    }

    Ok(rsp.data)
}
