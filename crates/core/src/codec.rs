//! Dynamic map codec: typed record <-> [`MapStr`].
//!
//! The single generic mapping every entity kind goes through. Records only
//! declare their field table (see [`field_table!`](crate::field_table)).

use serde_json::Value;

use crate::error::{ModelError, ModelResult};
use crate::field::{Fields, MapStr};

/// Emit every declared field keyed by its external name.
pub fn encode<T: Fields>(record: &T) -> MapStr {
    T::fields()
        .iter()
        .map(|f| (f.name.to_string(), (f.get)(record)))
        .collect()
}

/// Emit only the named fields (unknown names are skipped).
pub fn encode_only<T: Fields>(record: &T, names: &[&str]) -> MapStr {
    T::fields()
        .iter()
        .filter(|f| names.contains(&f.name))
        .map(|f| (f.name.to_string(), (f.get)(record)))
        .collect()
}

/// Decode `data` into `record`.
///
/// Declared fields missing from `data` (or `null`) end up at their zero value.
/// On a conversion failure `record` is left untouched.
pub fn decode<T: Fields + Default>(data: &MapStr, record: &mut T) -> ModelResult<()> {
    let mut decoded = T::default();
    assign_present(data, &mut decoded)?;
    *record = decoded;
    Ok(())
}

/// Apply the declared fields present in `data` on top of `record`; absent
/// fields keep their current value. Used for partial updates.
pub fn merge<T: Fields + Clone>(data: &MapStr, record: &mut T) -> ModelResult<()> {
    let mut merged = record.clone();
    assign_present(data, &mut merged)?;
    *record = merged;
    Ok(())
}

fn assign_present<T: Fields>(data: &MapStr, target: &mut T) -> ModelResult<()> {
    for field in T::fields() {
        let value = match data.get(field.name) {
            None | Some(Value::Null) => continue,
            Some(value) => value,
        };
        if !(field.set)(target, value) {
            tracing::debug!(field = field.name, %value, "field type mismatch while decoding");
            return Err(ModelError::decode(field.name, value.clone()));
        }
    }
    Ok(())
}

/// Fail with [`ModelError::MissingRequiredField`] on the first required field
/// (in declaration order) that holds its zero value.
pub fn check_required<T: Fields>(record: &T) -> ModelResult<()> {
    match T::fields()
        .iter()
        .find(|f| f.required && (f.is_zero)(record))
    {
        Some(field) => Err(ModelError::missing(field.name)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Sample {
        id: i64,
        code: String,
        label: String,
        enabled: bool,
        changed_at: Option<DateTime<Utc>>,
    }

    crate::field_table! {
        Sample {
            "id" => id: i64;
            "bk_code" => code: String, required;
            "bk_label" => label: String, required;
            "enabled" => enabled: bool;
            "last_time" => changed_at: Option<DateTime<Utc>>;
        }
    }

    fn map(value: Value) -> MapStr {
        match value {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn encode_emits_every_declared_field() {
        let sample = Sample {
            id: 3,
            code: "host".into(),
            label: "Host".into(),
            enabled: true,
            changed_at: None,
        };
        let data = encode(&sample);
        assert_eq!(data.len(), 5);
        assert_eq!(data["bk_code"], json!("host"));
        assert_eq!(data["enabled"], json!(true));
        assert_eq!(data["last_time"], Value::Null);
    }

    #[test]
    fn decode_resets_absent_fields_to_zero() {
        let mut sample = Sample {
            id: 9,
            code: "old".into(),
            label: "Old".into(),
            enabled: true,
            changed_at: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
        };
        decode(&map(json!({"bk_code": "switch", "unknown": 1})), &mut sample).unwrap();
        assert_eq!(
            sample,
            Sample {
                code: "switch".into(),
                ..Sample::default()
            }
        );
    }

    #[test]
    fn decode_failure_names_the_field_and_keeps_the_record() {
        let mut sample = Sample {
            code: "keep".into(),
            ..Sample::default()
        };
        let err = decode(&map(json!({"bk_code": "x", "enabled": "yes"})), &mut sample).unwrap_err();
        assert_eq!(err, ModelError::decode("enabled", json!("yes")));
        assert_eq!(sample.code, "keep");
    }

    #[test]
    fn merge_keeps_fields_missing_from_the_patch() {
        let mut sample = Sample {
            id: 4,
            code: "host".into(),
            label: "Host".into(),
            ..Sample::default()
        };
        merge(&map(json!({"bk_label": "Server", "enabled": true})), &mut sample).unwrap();
        assert_eq!(sample.id, 4);
        assert_eq!(sample.code, "host");
        assert_eq!(sample.label, "Server");
        assert!(sample.enabled);
    }

    #[test]
    fn required_fields_are_checked_in_declaration_order() {
        let mut sample = Sample::default();
        assert_eq!(check_required(&sample), Err(ModelError::missing("bk_code")));
        sample.code = "host".into();
        assert_eq!(check_required(&sample), Err(ModelError::missing("bk_label")));
        sample.label = "Host".into();
        assert_eq!(check_required(&sample), Ok(()));
    }

    #[test]
    fn encode_only_filters_by_name() {
        let sample = Sample {
            code: "host".into(),
            ..Sample::default()
        };
        let data = encode_only(&sample, &["bk_code", "missing"]);
        assert_eq!(data.len(), 1);
        assert_eq!(data["bk_code"], json!("host"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: decode(encode(x)) == x.
            #[test]
            fn codec_round_trips(
                id in any::<i64>(),
                code in "[a-z_]{1,16}",
                label in "\\PC{0,32}",
                enabled in any::<bool>(),
                secs in proptest::option::of(0i64..4_000_000_000i64),
            ) {
                let sample = Sample {
                    id,
                    code,
                    label,
                    enabled,
                    changed_at: secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
                };
                let mut decoded = Sample::default();
                decode(&encode(&sample), &mut decoded).unwrap();
                prop_assert_eq!(decoded, sample);
            }
        }
    }
}
