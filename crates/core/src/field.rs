//! Field descriptors: the declarative table the dynamic map codec works from.
//!
//! Each record type lists its encodable fields once, as
//! `(external name, required?, getter, setter, zero test)` tuples of plain
//! function pointers. The [`field_table!`](crate::field_table) macro generates
//! that table from a compact declaration so records never hand-roll their own
//! serialization.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Schema-less key/value representation used at the transport boundary.
pub type MapStr = serde_json::Map<String, Value>;

/// Conversion between a typed record field and a dynamic value.
pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    /// Convert a dynamic value into the field type. `None` on type mismatch.
    fn from_value(value: &Value) -> Option<Self>;

    /// Whether this is the zero value (the value a missing key decodes to).
    fn is_zero(&self) -> bool;
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl FieldValue for i64 {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

/// Free-form values (e.g. enum options) pass through unchanged.
impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

/// Timestamps travel as RFC 3339 strings.
impl FieldValue for Option<DateTime<Utc>> {
    fn to_value(&self) -> Value {
        match self {
            Some(ts) => Value::String(ts.to_rfc3339()),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let raw = value.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| Some(ts.with_timezone(&Utc)))
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

/// One encodable field of record type `T`.
pub struct FieldDescriptor<T> {
    /// Stable external name (the key in a [`MapStr`]).
    pub name: &'static str,
    pub required: bool,
    pub get: fn(&T) -> Value,
    /// Assign from a dynamic value; returns `false` on type mismatch and
    /// leaves the field untouched.
    pub set: fn(&mut T, &Value) -> bool,
    pub is_zero: fn(&T) -> bool,
}

impl<T> core::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish()
    }
}

/// A record type with a declared field table.
pub trait Fields: Sized + 'static {
    fn fields() -> &'static [FieldDescriptor<Self>];

    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::fields().iter().find(|f| f.name == name)
    }
}

/// Declare the field table of a record.
///
/// ```ignore
/// field_table! {
///     ObjectDes {
///         "bk_obj_id" => object_id: String, required;
///         "ispre" => is_pre: bool;
///     }
/// }
/// ```
#[macro_export]
macro_rules! field_table {
    ($record:ty { $( $name:literal => $field:ident : $fty:ty $(, $req:ident)? ; )* }) => {
        impl $crate::field::Fields for $record {
            fn fields() -> &'static [$crate::field::FieldDescriptor<Self>] {
                static FIELDS: ::std::sync::OnceLock<
                    ::std::vec::Vec<$crate::field::FieldDescriptor<$record>>,
                > = ::std::sync::OnceLock::new();

                FIELDS
                    .get_or_init(|| {
                        ::std::vec![
                            $(
                                $crate::field::FieldDescriptor {
                                    name: $name,
                                    required: $crate::field_table!(@required $($req)?),
                                    get: |r: &$record| {
                                        <$fty as $crate::field::FieldValue>::to_value(&r.$field)
                                    },
                                    set: |r: &mut $record, v: &$crate::serde_json::Value| {
                                        match <$fty as $crate::field::FieldValue>::from_value(v) {
                                            Some(x) => {
                                                r.$field = x;
                                                true
                                            }
                                            None => false,
                                        }
                                    },
                                    is_zero: |r: &$record| {
                                        <$fty as $crate::field::FieldValue>::is_zero(&r.$field)
                                    },
                                }
                            ),*
                        ]
                    })
                    .as_slice()
            }
        }
    };
    (@required required) => {
        true
    };
    (@required) => {
        false
    };
}
