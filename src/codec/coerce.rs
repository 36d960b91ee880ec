//! Type coercion between raw JSON values and declared field types.
//!
//! [`coerce`] applies one fixed rule per [`FieldKind`]; `null` passes through
//! unchanged regardless of the declared type. Coercion is tolerant for
//! numeric and textual casts but strict for closed domains: enum values
//! outside the declared set and unparsable date/times are rejected no matter
//! which decode mode is active.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};

use crate::{
    codec::schema::{EnumValues, FieldKind, Schema},
    error::{ApiError, Result},
};

/// Textual forms accepted as `true` for boolean fields.
const TRUTHY: [&str; 5] = ["1", "true", "yes", "y", "on"];
/// Textual forms accepted as `false` for boolean fields.
const FALSY: [&str; 6] = ["0", "false", "no", "n", "off", ""];

/// Date/time formats tried in order after RFC 3339.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Coerces a raw value to its declared field type.
///
/// `strict` only affects nested DTO fields, where it propagates into the
/// nested decode's unknown-field handling.
///
/// # Errors
///
/// - [`ApiError::InvalidEnumValue`] when an enum field's value is outside
///   the declared set.
/// - [`ApiError::InvalidDateTime`] when a date/time field's value cannot be
///   parsed.
/// - [`ApiError::UnknownField`] from a strict nested decode.
///
/// # Examples
///
/// ```
/// use sellerlink::codec::{coerce, FieldKind};
/// use serde_json::json;
///
/// assert_eq!(coerce(&FieldKind::Boolean, &json!("yes"), false)?, json!(true));
/// assert_eq!(coerce(&FieldKind::Integer, &json!("42"), false)?, json!(42));
/// assert_eq!(coerce(&FieldKind::List, &json!("one"), false)?, json!(["one"]));
/// # Ok::<(), sellerlink::ApiError>(())
/// ```
pub fn coerce(kind: &FieldKind, value: &Value, strict: bool) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match kind {
        FieldKind::Integer => Ok(Value::from(cast_integer(value))),
        FieldKind::Float => Ok(Value::from(cast_float(value))),
        FieldKind::Boolean => Ok(Value::Bool(cast_boolean(value))),
        FieldKind::String => Ok(Value::String(cast_string(value))),
        FieldKind::List => match value {
            Value::Array(_) => Ok(value.clone()),
            scalar => Ok(Value::Array(vec![scalar.clone()])),
        },
        FieldKind::Enum(spec) => coerce_enum(spec, value),
        FieldKind::DateTime => coerce_datetime(value),
        FieldKind::Nested(schema) => match value {
            Value::Object(_) => decode_fields(schema, value, strict),
            other => Ok(other.clone()),
        },
        FieldKind::Raw => Ok(value.clone()),
    }
}

/// Walks a raw mapping against a schema, coercing declared fields and
/// applying the unknown-field policy.
///
/// Unknown keys are kept in place in tolerant mode (they end up in the DTO's
/// `extra` bag) and rejected in strict mode. Declared fields absent from the
/// input are simply not emitted, and an explicit `null` reads as absent, so
/// the DTO's defaults apply in both cases.
pub(crate) fn decode_fields(schema: &Schema, raw: &Value, strict: bool) -> Result<Value> {
    let Value::Object(map) = raw else {
        return Err(ApiError::MalformedPayload(format!(
            "expected a JSON object for {}, got {}",
            schema.name,
            type_name(raw)
        )));
    };

    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        match schema.field(key) {
            Some(field) => {
                let coerced = coerce(&field.kind, value, strict)?;
                // A null declared field reads as absent; the default applies.
                if !coerced.is_null() {
                    out.insert(key.clone(), coerced);
                }
            }
            None if strict => {
                return Err(ApiError::UnknownField { field: key.clone(), dto: schema.name });
            }
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(Value::Object(out))
}

/// Removes keys not declared in the schema, recursing into nested DTO
/// fields. Used by `to_value(include_extra = false)`.
pub(crate) fn strip_extra(schema: &Schema, value: &mut Value) {
    if let Value::Object(map) = value {
        map.retain(|key, _| schema.has_field(key));
        for field in schema.fields {
            if let FieldKind::Nested(nested) = field.kind {
                if let Some(child) = map.get_mut(field.name) {
                    strip_extra(nested, child);
                }
            }
        }
    }
}

fn cast_integer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .unwrap_or_else(|_| trimmed.parse::<f64>().map_or(0, |f| f as i64))
        }
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(_) => 1,
        Value::Null => 0,
    }
}

fn cast_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(_) => 1.0,
        Value::Null => 0.0,
    }
}

fn cast_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let lowered = s.to_ascii_lowercase();
            if TRUTHY.contains(&lowered.as_str()) {
                true
            } else if FALSY.contains(&lowered.as_str()) {
                false
            } else {
                // Generic truthiness: any other non-empty string is true.
                !s.is_empty()
            }
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
        Value::Null => false,
    }
}

fn cast_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // Numbers, booleans, and containers take their compact JSON form.
        other => other.to_string(),
    }
}

fn coerce_enum(spec: &EnumValues, value: &Value) -> Result<Value> {
    let repr = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    if spec.contains(&repr) {
        Ok(Value::String(repr))
    } else {
        Err(ApiError::InvalidEnumValue { value: repr, name: spec.name })
    }
}

fn coerce_datetime(value: &Value) -> Result<Value> {
    match value {
        Value::String(s) => parse_datetime(s)
            .map(|dt| Value::String(dt.to_rfc3339()))
            .ok_or_else(|| ApiError::InvalidDateTime(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| Value::String(dt.to_rfc3339()))
            .ok_or_else(|| ApiError::InvalidDateTime(n.to_string())),
        other => Err(ApiError::InvalidDateTime(other.to_string())),
    }
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    None
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
