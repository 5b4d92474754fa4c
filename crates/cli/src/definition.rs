//! Declarative model definitions: apply a JSON document to the object model
//! and export what is stored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cmdb_core::{Condition, MapStr, ModelResult, RequestContext};
use cmdb_model::keys::BK_ID;
use cmdb_model::{ModelEntity, ModelFactory, Record};

/// Document shape accepted by the CLI.
///
/// ```json
/// {
///   "classifications": [{"bk_classification_id": "bk_host_manage"}],
///   "objects": [{
///     "bk_obj_id": "host",
///     "bk_classification_id": "bk_host_manage",
///     "groups": [{"bk_group_id": "default"}],
///     "attributes": [{"bk_property_id": "bk_host_innerip"}]
///   }],
///   "associations": [{"bk_obj_id": "host", "bk_asst_obj_id": "switch"}]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDefinition {
    pub classifications: Vec<MapStr>,
    pub objects: Vec<ObjectDefinition>,
    pub associations: Vec<MapStr>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectDefinition {
    #[serde(flatten)]
    pub object: MapStr,
    #[serde(default)]
    pub groups: Vec<MapStr>,
    #[serde(default)]
    pub attributes: Vec<MapStr>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    pub created: usize,
    pub updated: usize,
}

/// Parse `data` into `entity`, then create it or update the stored record with
/// the same identity.
fn upsert<R: Record>(
    entity: &mut ModelEntity<R>,
    ctx: &RequestContext,
    data: &MapStr,
    summary: &mut ApplySummary,
) -> ModelResult<()> {
    entity.parse(ctx, data)?;

    let stored = entity
        .services()
        .select::<R>(ctx, &entity.record().identity(ctx.owner_id()))?;
    match (stored.first(), R::field(BK_ID)) {
        (Some(stored), Some(id)) => {
            let mut data = data.clone();
            data.insert(BK_ID.to_string(), (id.get)(stored));
            entity.parse(ctx, &data)?;
            entity.set_is_new(false);
            summary.updated += 1;
        }
        (Some(_), None) => {
            entity.set_is_new(false);
            summary.updated += 1;
        }
        (None, _) => summary.created += 1,
    }

    entity.save(ctx)
}

/// Apply every entry of `definition`, parents before children.
pub fn apply(
    factory: &ModelFactory,
    ctx: &RequestContext,
    definition: &ModelDefinition,
) -> ModelResult<ApplySummary> {
    let mut summary = ApplySummary::default();

    for data in &definition.classifications {
        let mut classification = factory.create_classification(ctx);
        upsert(&mut classification, ctx, data, &mut summary)?;
    }

    for entry in &definition.objects {
        let mut object = factory.create_object(ctx);
        upsert(&mut object, ctx, &entry.object, &mut summary)?;
        tracing::info!(object = %object.id(), "object applied");

        // Children start from the parent's factory, so they inherit its id.
        for data in &entry.groups {
            let mut group = object.create_group();
            upsert(&mut group, ctx, data, &mut summary)?;
        }
        for data in &entry.attributes {
            let mut attribute = object.create_attribute();
            upsert(&mut attribute, ctx, data, &mut summary)?;
        }
    }

    for data in &definition.associations {
        let mut association = factory.create_association(ctx);
        upsert(&mut association, ctx, data, &mut summary)?;
    }

    Ok(summary)
}

fn maps<R: Record>(entities: &[ModelEntity<R>]) -> ModelResult<Value> {
    entities
        .iter()
        .map(|e| e.to_map_str().map(Value::Object))
        .collect::<ModelResult<Vec<_>>>()
        .map(Value::Array)
}

/// Everything stored for the caller, nested classification → object → children.
pub fn export(factory: &ModelFactory, ctx: &RequestContext) -> ModelResult<Value> {
    let mut classifications = Vec::new();
    for classification in factory.find_classifications(ctx, Condition::new())? {
        let mut objects = Vec::new();
        for object in classification.get_objects(ctx)? {
            let mut entry = object.to_map_str()?;
            entry.insert("groups".into(), maps(&object.get_groups(ctx)?)?);
            entry.insert("attributes".into(), maps(&object.get_attributes(ctx)?)?);
            entry.insert("associations".into(), maps(&object.get_associations(ctx)?)?);
            objects.push(Value::Object(entry));
        }
        let mut entry = classification.to_map_str()?;
        entry.insert("objects".into(), Value::Array(objects));
        classifications.push(Value::Object(entry));
    }
    Ok(Value::Array(classifications))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cmdb_core::ModelError;
    use cmdb_infra::{CascadingDeleteCoordinator, InMemoryPersistence};
    use cmdb_model::keys::BK_OBJ_ID;
    use serde_json::json;

    fn factory() -> ModelFactory {
        let store = Arc::new(InMemoryPersistence::new());
        ModelFactory::new(store.clone(), Arc::new(CascadingDeleteCoordinator::new(store)))
    }

    fn definition() -> ModelDefinition {
        serde_json::from_value(json!({
            "classifications": [
                {"bk_classification_id": "bk_host_manage", "bk_classification_name": "Host"}
            ],
            "objects": [
                {
                    "bk_obj_id": "host",
                    "bk_classification_id": "bk_host_manage",
                    "groups": [{"bk_group_id": "network", "bk_group_name": "Network"}],
                    "attributes": [
                        {"bk_property_id": "bk_host_innerip", "bk_property_group": "network"}
                    ]
                },
                {"bk_obj_id": "switch", "bk_classification_id": "bk_host_manage"}
            ],
            "associations": [
                {"bk_obj_id": "host", "bk_asst_obj_id": "switch", "bk_object_att_id": "bk_switch"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn first_apply_creates_and_second_updates() {
        let factory = factory();
        let ctx = RequestContext::new("0");

        let first = apply(&factory, &ctx, &definition()).unwrap();
        assert_eq!(first, ApplySummary { created: 6, updated: 0 });

        let second = apply(&factory, &ctx, &definition()).unwrap();
        assert_eq!(second, ApplySummary { created: 0, updated: 6 });
    }

    #[test]
    fn export_nests_children_under_their_parents() {
        let factory = factory();
        let ctx = RequestContext::new("0");
        apply(&factory, &ctx, &definition()).unwrap();

        let exported = export(&factory, &ctx).unwrap();
        let objects = exported[0]["objects"].as_array().unwrap();
        assert_eq!(objects.len(), 2);

        let host = objects.iter().find(|o| o[BK_OBJ_ID] == json!("host")).unwrap();
        assert_eq!(host["attributes"][0]["bk_property_group"], json!("network"));
        assert_eq!(host["groups"][0]["bk_group_id"], json!("network"));
        assert_eq!(host["associations"][0]["bk_asst_obj_id"], json!("switch"));
    }

    #[test]
    fn association_to_an_unknown_object_is_rejected() {
        let factory = factory();
        let ctx = RequestContext::new("0");
        let mut definition = definition();
        definition.associations[0].insert("bk_asst_obj_id".into(), json!("router"));

        let err = apply(&factory, &ctx, &definition).unwrap_err();
        assert_eq!(err, ModelError::invalid_reference("bk_asst_obj_id", "router"));
    }
}
