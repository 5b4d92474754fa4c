//! Minimal filter condition handed to the persistence collaborator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::MapStr;

/// Conjunction of field equality predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    predicates: Vec<(String, Value)>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`. A repeated field replaces the earlier predicate.
    pub fn equal(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.predicates.iter_mut().find(|(f, _)| *f == field) {
            Some(existing) => existing.1 = value,
            None => self.predicates.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.predicates
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.predicates.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn to_map_str(&self) -> MapStr {
        self.predicates.iter().cloned().collect()
    }

    /// True when every predicate holds. A field missing from `data` never matches.
    pub fn matches(&self, data: &MapStr) -> bool {
        self.predicates
            .iter()
            .all(|(field, expected)| data.get(field) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> MapStr {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_condition_matches_everything() {
        assert!(Condition::new().matches(&data(json!({"a": 1}))));
    }

    #[test]
    fn all_predicates_must_hold() {
        let cond = Condition::new()
            .equal("bk_supplier_account", "0")
            .equal("bk_obj_id", "host");
        assert!(cond.matches(&data(json!({
            "bk_supplier_account": "0",
            "bk_obj_id": "host",
            "x": 1,
        }))));
        assert!(!cond.matches(&data(json!({"bk_supplier_account": "0", "bk_obj_id": "switch"}))));
        assert!(!cond.matches(&data(json!({"bk_obj_id": "host"}))));
    }

    #[test]
    fn repeated_field_replaces_the_predicate() {
        let cond = Condition::new().equal("bk_obj_id", "host").equal("bk_obj_id", "switch");
        assert_eq!(cond.predicates().count(), 1);
        assert_eq!(cond.get("bk_obj_id"), Some(&json!("switch")));
        assert_eq!(cond.to_map_str()["bk_obj_id"], json!("switch"));
    }
}
