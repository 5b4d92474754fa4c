//! External field names shared by conditions and records.

pub const BK_ID: &str = "id";
pub const BK_OWNER_ID: &str = "bk_supplier_account";
pub const BK_OBJ_ID: &str = "bk_obj_id";
pub const BK_CLASSIFICATION_ID: &str = "bk_classification_id";
pub const BK_PROPERTY_ID: &str = "bk_property_id";
pub const BK_PROPERTY_GROUP: &str = "bk_property_group";
pub const BK_GROUP_ID: &str = "bk_group_id";
pub const BK_ASST_OBJ_ID: &str = "bk_asst_obj_id";
pub const BK_OBJECT_ATT_ID: &str = "bk_object_att_id";

/// Group id attributes fall back to when their group is removed.
pub const DEFAULT_GROUP_ID: &str = "default";
