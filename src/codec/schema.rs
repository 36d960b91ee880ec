//! Compile-time schema descriptors for DTO types.
//!
//! Instead of inspecting types at runtime, every DTO declares a static
//! [`Schema`]: a table of field name to [`FieldKind`] consumed by the generic
//! decode and encode routines. Schemas are built once, never mutated, and may
//! reference each other for nested DTO fields.
//!
//! # Examples
//!
//! ```
//! use sellerlink::codec::{EnumValues, Field, FieldKind, Schema};
//!
//! static STATUS_VALUES: EnumValues =
//!     EnumValues { name: "OrderStatus", values: &["OPEN", "SHIPPED", "CANCELLED"] };
//!
//! static ORDER_FIELDS: [Field; 3] = [
//!     Field { name: "id", kind: FieldKind::Integer },
//!     Field { name: "status", kind: FieldKind::Enum(&STATUS_VALUES) },
//!     Field { name: "created_at", kind: FieldKind::DateTime },
//! ];
//!
//! static ORDER_SCHEMA: Schema = Schema { name: "Order", fields: &ORDER_FIELDS };
//!
//! assert!(ORDER_SCHEMA.field("status").is_some());
//! assert!(ORDER_SCHEMA.field("color").is_none());
//! ```

/// Declared type of a single DTO field, driving its coercion rule.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Whole number; non-integer raw values are numerically cast.
    Integer,
    /// Floating-point number; non-float raw values are numerically cast.
    Float,
    /// Boolean; accepts numeric truthiness and common textual forms.
    Boolean,
    /// Text; non-string raw values are stringified.
    String,
    /// JSON array; a scalar raw value is wrapped as a single-element list.
    /// Elements are not coerced.
    List,
    /// Closed set of named values; anything outside the set is rejected.
    Enum(&'static EnumValues),
    /// Date/time normalized to RFC 3339; unparsable input is rejected.
    DateTime,
    /// Nested DTO decoded against its own schema when the raw value is a
    /// mapping.
    Nested(&'static Schema),
    /// Unresolvable or union type; passed through unchanged.
    Raw,
}

/// Declared values of a closed enum type.
#[derive(Debug)]
pub struct EnumValues {
    /// Enum type name, used in error messages.
    pub name: &'static str,
    /// Accepted underlying values.
    pub values: &'static [&'static str],
}

impl EnumValues {
    /// Checks whether `value` is among the declared values.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&value)
    }
}

/// One declared field of a DTO schema.
#[derive(Debug)]
pub struct Field {
    /// Wire name of the field.
    pub name: &'static str,
    /// Declared type.
    pub kind: FieldKind,
}

/// Static field table for one DTO type.
#[derive(Debug)]
pub struct Schema {
    /// DTO type name, used in error messages.
    pub name: &'static str,
    /// Declared fields.
    pub fields: &'static [Field],
}

impl Schema {
    /// Looks up a declared field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Checks whether `name` is a declared field.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TAG_VALUES: EnumValues = EnumValues { name: "Tag", values: &["NEW", "SALE"] };

    static ITEM_FIELDS: [Field; 3] = [
        Field { name: "id", kind: FieldKind::Integer },
        Field { name: "tag", kind: FieldKind::Enum(&TAG_VALUES) },
        Field { name: "notes", kind: FieldKind::List },
    ];

    static ITEM_SCHEMA: Schema = Schema { name: "Item", fields: &ITEM_FIELDS };

    #[test]
    fn test_field_lookup() {
        assert!(ITEM_SCHEMA.has_field("id"));
        assert!(ITEM_SCHEMA.has_field("tag"));
        assert!(!ITEM_SCHEMA.has_field("ID"));
        assert!(!ITEM_SCHEMA.has_field("color"));
    }

    #[test]
    fn test_enum_values_contains() {
        assert!(TAG_VALUES.contains("NEW"));
        assert!(!TAG_VALUES.contains("new"));
        assert!(!TAG_VALUES.contains("UNKNOWN_TAG"));
    }

    #[test]
    fn test_nested_schema_reference() {
        static PARENT_FIELDS: [Field; 1] =
            [Field { name: "item", kind: FieldKind::Nested(&ITEM_SCHEMA) }];
        static PARENT_SCHEMA: Schema = Schema { name: "Parent", fields: &PARENT_FIELDS };

        match PARENT_SCHEMA.field("item").unwrap().kind {
            FieldKind::Nested(schema) => assert_eq!(schema.name, "Item"),
            _ => panic!("expected nested field"),
        }
    }
}
