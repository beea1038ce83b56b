//! Structural equality over nested values.
//!
//! Object field order carries no meaning, so equality cannot compare values
//! verbatim. This module canonicalizes values into a deterministic string
//! form with object keys sorted recursively, then compares those forms.
//! Array element order is meaningful and is preserved. `enum` membership and
//! `uniqueItems` both build on this.

use std::collections::HashSet;
use std::fmt::Write;

use crate::value::{format_number, write_quoted, Value};

/// Returns true if two values are equal ignoring object field order.
///
/// # Example
///
/// ```rust
/// use muster::{structurally_equal, Value};
/// use serde_json::json;
///
/// let a = Value::from(json!({"x": 1, "y": [{"b": 2, "a": 1}]}));
/// let b = Value::from(json!({"y": [{"a": 1, "b": 2}], "x": 1}));
/// assert!(structurally_equal(&a, &b));
///
/// let c = Value::from(json!([1, 2]));
/// let d = Value::from(json!([2, 1]));
/// assert!(!structurally_equal(&c, &d));
/// ```
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    canonical_form(a) == canonical_form(b)
}

/// Returns true if no two elements share a canonical form.
pub(crate) fn all_unique(items: &[Value]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(canonical_form(item)))
}

/// Serializes a value deterministically: object keys sorted at every depth,
/// array order kept, numbers with negative zero normalized to `0`.
pub(crate) fn canonical_form(value: &Value) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_canonical(&mut out, value);
    out
}

fn write_canonical(out: &mut String, value: &Value) -> std::fmt::Result {
    match value {
        Value::Null => out.write_str("null"),
        Value::Bool(b) => write!(out, "{}", b),
        Value::Number(n) => out.write_str(&format_number(*n)),
        Value::String(s) => write_quoted(out, s),
        Value::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_canonical(out, item)?;
            }
            out.write_char(']')
        }
        Value::Object(fields) => {
            let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
            entries.sort_unstable_by_key(|(key, _)| *key);
            out.write_char('{')?;
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_quoted(out, key)?;
                out.write_char(':')?;
                write_canonical(out, value)?;
            }
            out.write_char('}')
        }
        Value::Blob(bytes) => {
            out.write_str("<buffer ")?;
            for byte in bytes {
                write!(out, "{:02x}", byte)?;
            }
            out.write_char('>')
        }
        Value::Temporal(when) => write!(out, "<date {}>", when.timestamp_millis()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn val(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn test_canonical_sorts_object_keys() {
        let a = val(json!({"b": 1, "a": 2}));
        assert_eq!(canonical_form(&a), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn test_canonical_recurses_into_arrays() {
        let a = val(json!([{"b": 1, "a": 2}]));
        let b = val(json!([{"a": 2, "b": 1}]));
        assert_eq!(canonical_form(&a), canonical_form(&b));
    }

    #[test]
    fn test_canonical_preserves_array_order() {
        assert_ne!(
            canonical_form(&val(json!([1, 2]))),
            canonical_form(&val(json!([2, 1])))
        );
    }

    #[test]
    fn test_equal_objects_different_key_order() {
        let a = val(json!({"x": {"p": 1, "q": 2}, "y": 3}));
        let b = val(json!({"y": 3, "x": {"q": 2, "p": 1}}));
        assert!(structurally_equal(&a, &b));
    }

    #[test]
    fn test_unequal_values() {
        assert!(!structurally_equal(&val(json!({"a": 1})), &val(json!({"a": 2}))));
        assert!(!structurally_equal(&val(json!(1)), &val(json!("1"))));
        assert!(!structurally_equal(&val(json!(null)), &val(json!(0))));
    }

    #[test]
    fn test_string_and_number_forms_do_not_collide() {
        // "1" quotes in canonical form, 1 does not.
        assert_ne!(canonical_form(&val(json!("1"))), canonical_form(&val(json!(1))));
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        assert!(structurally_equal(&Value::Number(-0.0), &Value::Number(0.0)));
    }

    #[test]
    fn test_integral_float_equals_integer() {
        assert!(structurally_equal(&Value::Number(2.0), &val(json!(2))));
    }

    #[test]
    fn test_all_unique() {
        let items = [val(json!(1)), val(json!(2)), val(json!("1"))];
        assert!(all_unique(&items));

        let dupes = [val(json!({"a": 1, "b": 2})), val(json!({"b": 2, "a": 1}))];
        assert!(!all_unique(&dupes));
    }

    #[test]
    fn test_all_unique_empty() {
        assert!(all_unique(&[]));
    }

    #[test]
    fn test_blob_and_temporal_forms() {
        let blob = Value::Blob(vec![0xde, 0xad]);
        assert_eq!(canonical_form(&blob), "<buffer dead>");
        assert!(!structurally_equal(&blob, &Value::Blob(vec![0xde])));
    }
}
