//! Schema-driven DTO codec.
//!
//! Converts between loosely-typed decoded JSON and strongly-typed DTOs. Each
//! DTO declares a static [`Schema`] naming its wire fields and their
//! [`FieldKind`]s; the generic decode path walks the raw mapping, coerces
//! declared fields via [`coerce`], and applies the unknown-field policy:
//!
//! - **tolerant** (`strict = false`): unrecognized keys are kept and land in
//!   the DTO's `extra` bag, retrievable via [`Dto::extra_value`];
//! - **strict** (`strict = true`): the first unrecognized key fails with
//!   [`ApiError::UnknownField`].
//!
//! Enum and date/time validity is independent of the mode: an out-of-domain
//! value fails either way. Declared fields absent from the input, or present
//! as an explicit `null`, keep their type's default.
//!
//! Encoding is symmetric: [`Dto::to_value`] serializes the DTO (enums as
//! their underlying values, date/times as RFC 3339 text, nested DTOs and
//! containers element-wise) and optionally strips undeclared keys. For every
//! declared field, `decode(encode(x)) == x`.
//!
//! # Declaring a DTO
//!
//! A DTO derives serde's traits, carries a flattened `extra` map, and wires
//! its schema through the [`Dto`] trait:
//!
//! ```
//! use sellerlink::codec::{Dto, Field, FieldKind, Schema};
//! use serde::{Deserialize, Serialize};
//! use serde_json::{Map, Value, json};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Product {
//!     id: i64,
//!     name: String,
//!     #[serde(flatten)]
//!     extra: Map<String, Value>,
//! }
//!
//! static PRODUCT_FIELDS: [Field; 2] = [
//!     Field { name: "id", kind: FieldKind::Integer },
//!     Field { name: "name", kind: FieldKind::String },
//! ];
//! static PRODUCT_SCHEMA: Schema = Schema { name: "Product", fields: &PRODUCT_FIELDS };
//!
//! impl Dto for Product {
//!     fn schema() -> &'static Schema {
//!         &PRODUCT_SCHEMA
//!     }
//!     fn extra(&self) -> &Map<String, Value> {
//!         &self.extra
//!     }
//!     fn extra_mut(&mut self) -> &mut Map<String, Value> {
//!         &mut self.extra
//!     }
//! }
//!
//! let product = Product::from_value(&json!({"id": "7", "name": "Desk", "color": "oak"}), false)?;
//! assert_eq!(product.id, 7);
//! assert_eq!(product.extra_value("color"), Some(&json!("oak")));
//! # Ok::<(), sellerlink::ApiError>(())
//! ```

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    error::{ApiError, Result},
    gateway::ResponseOutcome,
};

pub mod coerce;
pub mod schema;

pub use coerce::coerce;
pub use schema::{EnumValues, Field, FieldKind, Schema};

use coerce::{decode_fields, strip_extra};

/// A typed record mirroring one of the seller API's payload shapes.
///
/// Implementors supply the static schema and access to the flattened `extra`
/// map; every codec operation is provided. DTO structs are expected to carry
/// `#[serde(default)]` so declared-but-absent fields take their defaults,
/// and a `#[serde(flatten)]` map field backing [`extra`](Self::extra).
pub trait Dto: Default + Serialize + DeserializeOwned {
    /// Static field table for this DTO type.
    fn schema() -> &'static Schema;

    /// Fields captured outside the schema during a tolerant decode.
    fn extra(&self) -> &Map<String, Value>;

    /// Mutable access to the extra bag.
    fn extra_mut(&mut self) -> &mut Map<String, Value>;

    /// Looks up a single extra field by key.
    fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra().get(key)
    }

    /// Decodes a raw JSON mapping into a typed instance.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MalformedPayload`] if `raw` is not a mapping or a
    ///   coerced field does not fit its declared Rust type.
    /// - [`ApiError::UnknownField`] in strict mode for undeclared keys.
    /// - [`ApiError::InvalidEnumValue`] / [`ApiError::InvalidDateTime`] for
    ///   out-of-domain values, regardless of mode.
    fn from_value(raw: &Value, strict: bool) -> Result<Self> {
        let normalized = decode_fields(Self::schema(), raw, strict)?;
        serde_json::from_value(normalized).map_err(|e| {
            ApiError::MalformedPayload(format!("cannot decode {}: {e}", Self::schema().name))
        })
    }

    /// Decodes any serializable object graph by first canonicalizing it to
    /// JSON, then running the single [`from_value`](Self::from_value) path.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`from_value`](Self::from_value);
    /// [`ApiError::MalformedPayload`] if `object` does not serialize.
    fn from_object<S: Serialize>(object: &S, strict: bool) -> Result<Self> {
        let raw = serde_json::to_value(object)
            .map_err(|e| ApiError::MalformedPayload(format!("cannot canonicalize input: {e}")))?;
        Self::from_value(&raw, strict)
    }

    /// Decodes from response body text.
    ///
    /// # Errors
    ///
    /// [`ApiError::MalformedPayload`] if `text` is not valid JSON;
    /// otherwise propagates errors from [`from_value`](Self::from_value).
    fn from_json_str(text: &str, strict: bool) -> Result<Self> {
        let raw: Value = serde_json::from_str(text).map_err(|e| {
            ApiError::MalformedPayload(format!("body is not valid JSON: {e}"))
        })?;
        Self::from_value(&raw, strict)
    }

    /// Decodes the body of a gateway call.
    ///
    /// A body the gateway left as raw text is JSON-decoded first; an
    /// already-decoded body goes straight to
    /// [`from_value`](Self::from_value).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`from_json_str`](Self::from_json_str) and
    /// [`from_value`](Self::from_value).
    fn from_response(outcome: &ResponseOutcome, strict: bool) -> Result<Self> {
        match &outcome.body {
            Value::String(text) => Self::from_json_str(text, strict),
            decoded => Self::from_value(decoded, strict),
        }
    }

    /// Encodes this instance back to a raw JSON mapping.
    ///
    /// With `include_extra` the extra bag rides along at the top level of
    /// each DTO (the flattened representation); without it, only declared
    /// fields survive, recursively.
    ///
    /// # Errors
    ///
    /// [`ApiError::MalformedPayload`] if serialization fails.
    fn to_value(&self, include_extra: bool) -> Result<Value> {
        let mut value = serde_json::to_value(self).map_err(|e| {
            ApiError::MalformedPayload(format!("cannot encode {}: {e}", Self::schema().name))
        })?;
        if !include_extra {
            strip_extra(Self::schema(), &mut value);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Sku {
        code: String,
        stock: i64,
        active: bool,
        #[serde(flatten)]
        extra: Map<String, Value>,
    }

    static SKU_FIELDS: [Field; 3] = [
        Field { name: "code", kind: FieldKind::String },
        Field { name: "stock", kind: FieldKind::Integer },
        Field { name: "active", kind: FieldKind::Boolean },
    ];
    static SKU_SCHEMA: Schema = Schema { name: "Sku", fields: &SKU_FIELDS };

    impl Dto for Sku {
        fn schema() -> &'static Schema {
            &SKU_SCHEMA
        }
        fn extra(&self) -> &Map<String, Value> {
            &self.extra
        }
        fn extra_mut(&mut self) -> &mut Map<String, Value> {
            &mut self.extra
        }
    }

    #[test]
    fn test_tolerant_decode_with_coercion() {
        let sku =
            Sku::from_value(&json!({"code": 123, "stock": "8", "active": "yes"}), false).unwrap();
        assert_eq!(sku.code, "123");
        assert_eq!(sku.stock, 8);
        assert!(sku.active);
        assert!(sku.extra.is_empty());
    }

    #[test]
    fn test_tolerant_decode_buckets_unknown_fields() {
        let sku = Sku::from_value(&json!({"code": "A1", "warehouse": "berlin"}), false).unwrap();
        assert_eq!(sku.code, "A1");
        assert_eq!(sku.extra_value("warehouse"), Some(&json!("berlin")));
        assert_eq!(sku.extra_value("missing"), None);
    }

    #[test]
    fn test_strict_decode_rejects_unknown_fields() {
        let error = Sku::from_value(&json!({"code": "A1", "warehouse": "berlin"}), true)
            .unwrap_err();
        match error {
            ApiError::UnknownField { field, dto } => {
                assert_eq!(field, "warehouse");
                assert_eq!(dto, "Sku");
            }
            other => panic!("expected UnknownField, got {other:?}"),
        }
    }

    #[test]
    fn test_absent_fields_take_defaults() {
        let sku = Sku::from_value(&json!({"code": "A1"}), true).unwrap();
        assert_eq!(sku.stock, 0);
        assert!(!sku.active);
    }

    #[test]
    fn test_from_object_canonicalizes() {
        #[derive(Serialize)]
        struct Loose {
            code: u32,
            stock: &'static str,
        }

        let sku = Sku::from_object(&Loose { code: 9, stock: "4" }, false).unwrap();
        assert_eq!(sku.code, "9");
        assert_eq!(sku.stock, 4);
    }

    #[test]
    fn test_from_json_str_rejects_invalid_json() {
        let error = Sku::from_json_str("not json", false).unwrap_err();
        assert!(matches!(error, ApiError::MalformedPayload(_)));
    }

    #[test]
    fn test_from_json_str_rejects_non_object() {
        let error = Sku::from_json_str("[1,2,3]", false).unwrap_err();
        assert!(matches!(error, ApiError::MalformedPayload(_)));
    }

    #[test]
    fn test_round_trip_declared_fields() {
        let original =
            Sku::from_value(&json!({"code": "A1", "stock": 3, "active": true}), false).unwrap();
        let encoded = original.to_value(true).unwrap();
        let decoded = Sku::from_value(&encoded, false).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_extra_round_trips_only_when_included() {
        let sku = Sku::from_value(&json!({"code": "A1", "warehouse": "berlin"}), false).unwrap();

        let with_extra = sku.to_value(true).unwrap();
        assert_eq!(with_extra["warehouse"], json!("berlin"));

        let without_extra = sku.to_value(false).unwrap();
        assert!(without_extra.get("warehouse").is_none());
        assert_eq!(without_extra["code"], json!("A1"));
    }

    #[test]
    fn test_extra_mut_allows_staging_fields() {
        let mut sku = Sku::default();
        sku.extra_mut().insert("note".to_owned(), json!("manual"));
        assert_eq!(sku.extra_value("note"), Some(&json!("manual")));
        assert_eq!(sku.to_value(true).unwrap()["note"], json!("manual"));
    }
}
