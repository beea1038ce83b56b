//! Runtime value model for validation input.
//!
//! This module provides [`Value`], the closed sum type every validation run
//! operates on, and [`Kind`], the concrete classification used by type
//! constraints and error reporting.

use std::fmt::{self, Display, Write};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// A JSON-like value.
///
/// `Value` covers the six JSON kinds plus two opaque leaf kinds that schemas
/// can constrain directly: raw byte blobs and timestamps. Numbers are `f64`
/// throughout; object fields preserve insertion order.
///
/// # Example
///
/// ```rust
/// use muster::Value;
/// use serde_json::json;
///
/// let value = Value::from(json!({"name": "Ada", "tags": ["admin"]}));
/// assert!(value.matches_type("object"));
/// assert_eq!(value.kind().name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null/absence sentinel.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. Integral values are still numbers; see [`Value::matches_type`].
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// An ordered mapping from field name to value.
    Object(IndexMap<String, Value>),
    /// An opaque byte blob, distinct from arrays and objects.
    Blob(Vec<u8>),
    /// An opaque timestamp, distinct from strings and numbers.
    Temporal(DateTime<Utc>),
}

/// The concrete kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Buffer,
    Date,
}

impl Kind {
    /// Returns the kind's name as written in schema `type` constraints.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Buffer => "buffer",
            Kind::Date => "date",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the concrete kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
            Value::Blob(_) => Kind::Buffer,
            Value::Temporal(_) => Kind::Date,
        }
    }

    /// Returns true if this value belongs to the named semantic type.
    ///
    /// Recognized names are the eight kind names plus `integer` (numbers with
    /// no fractional part) and `any` (matches everything). Names outside that
    /// set match nothing and so always fail a `type` constraint.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::Value;
    ///
    /// let n = Value::Number(3.0);
    /// assert!(n.matches_type("number"));
    /// assert!(n.matches_type("integer"));
    /// assert!(!n.matches_type("string"));
    /// assert!(!Value::Number(3.5).matches_type("integer"));
    /// ```
    pub fn matches_type(&self, name: &str) -> bool {
        match name {
            "any" => true,
            "integer" => matches!(self, Value::Number(n) if n.is_finite() && n.fract() == 0.0),
            _ => self.kind().name() == name,
        }
    }

    /// Returns every concrete type name this value matches, excluding `any`.
    ///
    /// Most values match exactly one name; integral numbers match both
    /// `number` and `integer`.
    pub fn classify(&self) -> Vec<&'static str> {
        let mut names = vec![self.kind().name()];
        if self.matches_type("integer") {
            names.push("integer");
        }
        names
    }

    /// Returns true if this value is the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean if this value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if this value is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this value is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the fields if this value is an object.
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Writes this value in literal JSON form, fields in insertion order.
    fn write_json(&self, f: &mut (impl Write + ?Sized)) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write_quoted(f, s),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    item.write_json(f)?;
                }
                f.write_char(']')
            }
            Value::Object(fields) => {
                f.write_char('{')?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write_quoted(f, key)?;
                    f.write_char(':')?;
                    value.write_json(f)?;
                }
                f.write_char('}')
            }
            Value::Blob(bytes) => {
                f.write_str("<buffer ")?;
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                f.write_char('>')
            }
            Value::Temporal(when) => write!(f, "<date {}>", when.timestamp_millis()),
        }
    }
}

/// Renders scalars in their native form and composites as literal JSON.
///
/// Strings print unquoted at the top level but JSON-quoted inside arrays
/// and objects. This is the form error messages use for received values.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            other => other.write_json(f),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(when: DateTime<Utc>) -> Self {
        Value::Temporal(when)
    }
}

/// Formats a number for display: integral values print without a trailing
/// fraction and negative zero prints as `0`.
pub(crate) fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Writes a string JSON-quoted, escaping quotes, backslashes, and controls.
pub(crate) fn write_quoted(out: &mut (impl Write + ?Sized), s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}
