//! Canonical metadata records, as understood by the persistence collaborator.
//!
//! Each record declares its field table once; the dynamic map codec in
//! `cmdb-core` does the rest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cmdb_core::field_table;

/// Groups objects (e.g. "host management", "network").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationDes {
    pub id: i64,
    #[serde(rename = "bk_classification_id")]
    pub classification_id: String,
    #[serde(rename = "bk_classification_name")]
    pub classification_name: String,
    #[serde(rename = "bk_classification_type")]
    pub classification_type: String,
    #[serde(rename = "bk_classification_icon")]
    pub classification_icon: String,
    #[serde(rename = "bk_supplier_account")]
    pub owner_id: String,
}

field_table! {
    ClassificationDes {
        "id" => id: i64;
        "bk_classification_id" => classification_id: String, required;
        "bk_classification_name" => classification_name: String;
        "bk_classification_type" => classification_type: String;
        "bk_classification_icon" => classification_icon: String;
        "bk_supplier_account" => owner_id: String;
    }
}

/// A user-definable object type (e.g. "host", "switch").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDes {
    pub id: i64,
    #[serde(rename = "bk_obj_id")]
    pub object_id: String,
    #[serde(rename = "bk_obj_name")]
    pub object_name: String,
    #[serde(rename = "bk_obj_icon")]
    pub obj_icon: String,
    #[serde(rename = "bk_classification_id")]
    pub classification_id: String,
    pub creator: String,
    pub modifier: String,
    pub description: String,
    #[serde(rename = "ispre")]
    pub is_pre: bool,
    #[serde(rename = "bk_ispaused")]
    pub is_paused: bool,
    pub position: String,
    #[serde(rename = "bk_supplier_account")]
    pub owner_id: String,
    #[serde(rename = "create_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "last_time")]
    pub modified_at: Option<DateTime<Utc>>,
}

field_table! {
    ObjectDes {
        "id" => id: i64;
        "bk_obj_id" => object_id: String, required;
        "bk_obj_name" => object_name: String;
        "bk_obj_icon" => obj_icon: String;
        "bk_classification_id" => classification_id: String, required;
        "creator" => creator: String;
        "modifier" => modifier: String;
        "description" => description: String;
        "ispre" => is_pre: bool;
        "bk_ispaused" => is_paused: bool;
        "position" => position: String;
        "bk_supplier_account" => owner_id: String;
        "create_time" => created_at: Option<DateTime<Utc>>;
        "last_time" => modified_at: Option<DateTime<Utc>>;
    }
}

/// A field of an object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDes {
    pub id: i64,
    #[serde(rename = "bk_obj_id")]
    pub object_id: String,
    #[serde(rename = "bk_supplier_account")]
    pub owner_id: String,
    #[serde(rename = "bk_property_id")]
    pub property_id: String,
    #[serde(rename = "bk_property_name")]
    pub property_name: String,
    #[serde(rename = "bk_property_group")]
    pub property_group: String,
    #[serde(rename = "bk_property_index")]
    pub property_index: i64,
    #[serde(rename = "bk_property_type")]
    pub property_type: String,
    pub unit: String,
    pub placeholder: String,
    pub editable: bool,
    #[serde(rename = "isrequired")]
    pub is_required: bool,
    #[serde(rename = "isreadonly")]
    pub is_readonly: bool,
    #[serde(rename = "isonly")]
    pub is_only: bool,
    #[serde(rename = "ispre")]
    pub is_pre: bool,
    #[serde(rename = "bk_issystem")]
    pub is_system: bool,
    #[serde(rename = "bk_isapi")]
    pub is_api: bool,
    pub option: Value,
    pub description: String,
    pub creator: String,
}

field_table! {
    AttributeDes {
        "id" => id: i64;
        "bk_obj_id" => object_id: String, required;
        "bk_supplier_account" => owner_id: String, required;
        "bk_property_id" => property_id: String;
        "bk_property_name" => property_name: String;
        "bk_property_group" => property_group: String;
        "bk_property_index" => property_index: i64;
        "bk_property_type" => property_type: String;
        "unit" => unit: String;
        "placeholder" => placeholder: String;
        "editable" => editable: bool;
        "isrequired" => is_required: bool;
        "isreadonly" => is_readonly: bool;
        "isonly" => is_only: bool;
        "ispre" => is_pre: bool;
        "bk_issystem" => is_system: bool;
        "bk_isapi" => is_api: bool;
        "option" => option: Value;
        "description" => description: String;
        "creator" => creator: String;
    }
}

/// A display grouping of attributes within one object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDes {
    pub id: i64,
    #[serde(rename = "bk_group_id")]
    pub group_id: String,
    #[serde(rename = "bk_group_name")]
    pub group_name: String,
    #[serde(rename = "bk_group_index")]
    pub group_index: i64,
    #[serde(rename = "bk_obj_id")]
    pub object_id: String,
    #[serde(rename = "bk_supplier_account")]
    pub owner_id: String,
    #[serde(rename = "bk_isdefault")]
    pub is_default: bool,
    #[serde(rename = "ispre")]
    pub is_pre: bool,
}

field_table! {
    GroupDes {
        "id" => id: i64;
        "bk_group_id" => group_id: String;
        "bk_group_name" => group_name: String;
        "bk_group_index" => group_index: i64;
        "bk_obj_id" => object_id: String, required;
        "bk_supplier_account" => owner_id: String, required;
        "bk_isdefault" => is_default: bool;
        "ispre" => is_pre: bool;
    }
}

/// A directed link between two object types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDes {
    pub id: i64,
    #[serde(rename = "bk_obj_id")]
    pub object_id: String,
    #[serde(rename = "bk_asst_obj_id")]
    pub asst_object_id: String,
    #[serde(rename = "bk_object_att_id")]
    pub object_att_id: String,
    #[serde(rename = "bk_asst_forward")]
    pub asst_forward: String,
    #[serde(rename = "bk_asst_name")]
    pub asst_name: String,
    #[serde(rename = "bk_supplier_account")]
    pub owner_id: String,
}

field_table! {
    AssociationDes {
        "id" => id: i64;
        "bk_obj_id" => object_id: String, required;
        "bk_asst_obj_id" => asst_object_id: String, required;
        "bk_object_att_id" => object_att_id: String;
        "bk_asst_forward" => asst_forward: String;
        "bk_asst_name" => asst_name: String;
        "bk_supplier_account" => owner_id: String;
    }
}
