//! Schema definitions for validation.
//!
//! This module provides [`SchemaNode`], the normalized form of one schema
//! node. A node is a bag of optional, independent constraints; any
//! combination may apply to the same value. Nodes are built either through
//! the builder methods here or parsed from a JSON document with
//! [`SchemaNode::from_json`].
//!
//! # Example
//!
//! ```rust
//! use muster::{SchemaNode, Validator, Value};
//! use serde_json::json;
//!
//! let schema = SchemaNode::new()
//!     .property("name", SchemaNode::new().with_type("string").required(true))
//!     .property(
//!         "port",
//!         SchemaNode::new().with_type("integer").minimum(1.0).maximum(65535.0),
//!     );
//!
//! let report = Validator::new(schema).validate(&Value::from(json!({
//!     "name": "web",
//!     "port": 8080
//! })));
//! assert!(report.valid());
//! ```

mod parse;
mod render;

pub use parse::SchemaParseError;

use indexmap::IndexMap;
use regex::Regex;

use crate::value::Value;

/// A type constraint: one name, a set of names, or a nested schema.
///
/// Names are expected lowercase; the `From` conversions and the parser
/// normalize them. A set matches if any of its names matches. A nested
/// schema matches if the value validates against it with zero violations.
#[derive(Debug, Clone)]
pub enum TypeConstraint {
    /// A single type name, e.g. `"string"`.
    Name(String),
    /// A set of type names; matching any one suffices.
    AnyOf(Vec<String>),
    /// A nested schema the value must fully satisfy.
    Schema(Box<SchemaNode>),
}

impl From<&str> for TypeConstraint {
    fn from(name: &str) -> Self {
        TypeConstraint::Name(name.to_ascii_lowercase())
    }
}

impl From<Vec<&str>> for TypeConstraint {
    fn from(names: Vec<&str>) -> Self {
        TypeConstraint::AnyOf(names.iter().map(|n| n.to_ascii_lowercase()).collect())
    }
}

impl From<SchemaNode> for TypeConstraint {
    fn from(node: SchemaNode) -> Self {
        TypeConstraint::Schema(Box::new(node))
    }
}

/// A compiled regular expression that remembers its source.
///
/// Matching uses search semantics: the pattern may match anywhere in the
/// string unless it anchors itself.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern, keeping the original source for messages.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
            source: source.to_string(),
        })
    }

    /// Returns the original pattern source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern matches anywhere in the string.
    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

/// How to handle object keys covered by neither `properties` nor
/// `patternProperties`.
#[derive(Debug, Clone)]
pub(crate) enum AdditionalProperties {
    /// Reject unknown keys.
    Deny,
    /// Validate unknown keys against a schema.
    Schema(Box<SchemaNode>),
}

/// Conversion target for [`SchemaNode::additional_properties`].
///
/// Allows both `additional_properties(false)` and
/// `additional_properties(schema)`. Passing `true` restores the default
/// (unknown keys allowed).
pub struct AdditionalPropertiesSetting(pub(crate) Option<AdditionalProperties>);

impl From<bool> for AdditionalPropertiesSetting {
    fn from(allow: bool) -> Self {
        if allow {
            AdditionalPropertiesSetting(None)
        } else {
            AdditionalPropertiesSetting(Some(AdditionalProperties::Deny))
        }
    }
}

impl From<SchemaNode> for AdditionalPropertiesSetting {
    fn from(node: SchemaNode) -> Self {
        AdditionalPropertiesSetting(Some(AdditionalProperties::Schema(Box::new(node))))
    }
}

/// One schema node: a bag of optional constraints over one value.
///
/// Every constraint is independent. A node may combine, say, a type
/// constraint, an enum, and numeric bounds; all of them are evaluated and
/// every violation is reported. Absent constraints are simply skipped.
///
/// # Example
///
/// ```rust
/// use muster::{SchemaNode, Validator, Value};
/// use serde_json::json;
///
/// let schema = SchemaNode::new().with_type(vec!["string", "number"]).min_length(2);
///
/// let report = Validator::new(schema).validate(&Value::from(json!("a")));
/// assert_eq!(
///     report.messages(),
///     vec!["minimum string length exceeded, expected: 2, received: 1"]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    pub(crate) type_constraint: Option<TypeConstraint>,
    pub(crate) disallow: Option<TypeConstraint>,
    pub(crate) enum_values: Option<Vec<Value>>,
    pub(crate) properties: Option<IndexMap<String, SchemaNode>>,
    pub(crate) pattern_properties: Option<Vec<(Pattern, SchemaNode)>>,
    pub(crate) additional_properties: Option<AdditionalProperties>,
    pub(crate) dependencies: Option<IndexMap<String, Vec<String>>>,
    pub(crate) required: bool,
    pub(crate) items: Option<Box<SchemaNode>>,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) unique_items: bool,
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
    pub(crate) exclusive_minimum: bool,
    pub(crate) exclusive_maximum: bool,
    pub(crate) divisible_by: Option<f64>,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) pattern: Option<Pattern>,
}

impl SchemaNode {
    /// Creates a schema node with no constraints. It accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrains the value's type: a name, a set of names, or a nested schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::{SchemaNode, Validator, Value};
    /// use serde_json::json;
    ///
    /// let schema = SchemaNode::new().with_type("integer");
    /// assert!(Validator::new(schema).validate(&Value::from(json!(3))).valid());
    ///
    /// let either = SchemaNode::new().with_type(vec!["string", "number"]);
    /// assert!(Validator::new(either).validate(&Value::from(json!(2.5))).valid());
    /// ```
    pub fn with_type(mut self, constraint: impl Into<TypeConstraint>) -> Self {
        self.type_constraint = Some(constraint.into());
        self
    }

    /// Rejects values matching the constraint; the logical negation of `with_type`.
    pub fn disallow(mut self, constraint: impl Into<TypeConstraint>) -> Self {
        self.disallow = Some(constraint.into());
        self
    }

    /// Restricts the value to one of the listed literals.
    ///
    /// Membership uses structural equality, so object literals match
    /// regardless of field order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::{SchemaNode, Validator, Value};
    /// use serde_json::json;
    ///
    /// let schema = SchemaNode::new().enum_values(["staging", "production"]);
    ///
    /// assert!(Validator::new(schema.clone())
    ///     .validate(&Value::from(json!("staging")))
    ///     .valid());
    /// assert!(!Validator::new(schema)
    ///     .validate(&Value::from(json!("dev")))
    ///     .valid());
    /// ```
    pub fn enum_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Declares a named property with its own schema.
    ///
    /// Declared properties are validated in declaration order. An absent
    /// property is validated as null, which triggers the child's `required`
    /// constraint if it has one.
    pub fn property(mut self, name: impl Into<String>, child: SchemaNode) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), child);
        self
    }

    /// Applies a schema to every object key the pattern matches.
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn pattern_property(
        mut self,
        pattern: &str,
        child: SchemaNode,
    ) -> Result<Self, regex::Error> {
        let pattern = Pattern::new(pattern)?;
        self.pattern_properties
            .get_or_insert_with(Vec::new)
            .push((pattern, child));
        Ok(self)
    }

    /// Configures handling of keys covered by neither `properties` nor
    /// `patternProperties`.
    ///
    /// Only consulted when the node also declares `properties`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::{SchemaNode, Validator, Value};
    /// use serde_json::json;
    ///
    /// let schema = SchemaNode::new()
    ///     .property("name", SchemaNode::new().with_type("string"))
    ///     .additional_properties(false);
    ///
    /// let report = Validator::new(schema).validate(&Value::from(json!({
    ///     "name": "ok",
    ///     "stray": 1
    /// })));
    /// assert_eq!(report.messages(), vec!["invalid extra properties present"]);
    /// ```
    pub fn additional_properties(mut self, setting: impl Into<AdditionalPropertiesSetting>) -> Self {
        self.additional_properties = setting.into().0;
        self
    }

    /// Declares that a property, when present, needs another property present.
    ///
    /// Call repeatedly to give one property several dependencies.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::{SchemaNode, Validator, Value};
    /// use serde_json::json;
    ///
    /// let schema = SchemaNode::new().dependency("card", "cvc");
    ///
    /// let report = Validator::new(schema).validate(&Value::from(json!({"card": "4111"})));
    /// assert_eq!(
    ///     report.messages(),
    ///     vec!["missing dependency of card, expected: cvc"]
    /// );
    /// ```
    pub fn dependency(mut self, property: impl Into<String>, needs: impl Into<String>) -> Self {
        self.dependencies
            .get_or_insert_with(IndexMap::new)
            .entry(property.into())
            .or_default()
            .push(needs.into());
        self
    }

    /// Requires the value to be present (not null) at its position.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Applies per-value constraints from the given schema to every array element.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::{SchemaNode, Validator, Value};
    /// use serde_json::json;
    ///
    /// let schema = SchemaNode::new()
    ///     .with_type("array")
    ///     .items(SchemaNode::new().with_type("string"));
    ///
    /// assert!(Validator::new(schema.clone())
    ///     .validate(&Value::from(json!(["a", "b"])))
    ///     .valid());
    /// assert!(!Validator::new(schema)
    ///     .validate(&Value::from(json!(["a", 1])))
    ///     .valid());
    /// ```
    pub fn items(mut self, items: SchemaNode) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    /// Sets the minimum number of array elements.
    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    /// Sets the maximum number of array elements.
    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Requires array elements to be pairwise structurally distinct.
    pub fn unique_items(mut self, unique: bool) -> Self {
        self.unique_items = unique;
        self
    }

    /// Sets the minimum numeric value (inclusive unless `exclusive_minimum`).
    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Sets the maximum numeric value (inclusive unless `exclusive_maximum`).
    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Makes the minimum bound exclusive.
    pub fn exclusive_minimum(mut self, exclusive: bool) -> Self {
        self.exclusive_minimum = exclusive;
        self
    }

    /// Makes the maximum bound exclusive.
    pub fn exclusive_maximum(mut self, exclusive: bool) -> Self {
        self.exclusive_maximum = exclusive;
        self
    }

    /// Requires the number to be divisible by the given divisor.
    ///
    /// A divisor of zero disables the check.
    pub fn divisible_by(mut self, divisor: f64) -> Self {
        self.divisible_by = Some(divisor);
        self
    }

    /// Sets the minimum string length in characters (Unicode scalar values).
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum string length in characters (Unicode scalar values).
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Requires the string to match the pattern.
    ///
    /// Returns an error if the pattern fails to compile.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::{SchemaNode, Validator, Value};
    /// use serde_json::json;
    ///
    /// let schema = SchemaNode::new().pattern(r"^[a-z]+$").unwrap();
    ///
    /// assert!(Validator::new(schema.clone())
    ///     .validate(&Value::from(json!("abc")))
    ///     .valid());
    /// assert!(!Validator::new(schema)
    ///     .validate(&Value::from(json!("ABC")))
    ///     .valid());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    /// Resolves a sub-schema by a dotted path of declared property names.
    ///
    /// The empty path resolves to this node. Returns `None` as soon as a
    /// segment is not a declared property. Only `properties` participate;
    /// pattern and additional properties are not navigable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::SchemaNode;
    ///
    /// let schema = SchemaNode::new().property(
    ///     "server",
    ///     SchemaNode::new().property("host", SchemaNode::new().with_type("string")),
    /// );
    ///
    /// assert!(schema.resolve("server.host").is_some());
    /// assert!(schema.resolve("server.port").is_none());
    /// ```
    pub fn resolve(&self, path: &str) -> Option<&SchemaNode> {
        if path.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for segment in path.split('.') {
            node = node.properties.as_ref()?.get(segment)?;
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_constraints() {
        let schema = SchemaNode::new()
            .with_type("string")
            .min_length(2)
            .max_length(8)
            .pattern("^a")
            .unwrap();

        assert!(matches!(
            schema.type_constraint,
            Some(TypeConstraint::Name(ref n)) if n == "string"
        ));
        assert_eq!(schema.min_length, Some(2));
        assert_eq!(schema.max_length, Some(8));
        assert!(schema.pattern.is_some());
    }

    #[test]
    fn test_type_names_are_lowercased() {
        let single = TypeConstraint::from("Integer");
        assert!(matches!(single, TypeConstraint::Name(ref n) if n == "integer"));

        let many = TypeConstraint::from(vec!["String", "NUMBER"]);
        match many {
            TypeConstraint::AnyOf(names) => assert_eq!(names, vec!["string", "number"]),
            other => panic!("expected AnyOf, got {:?}", other),
        }
    }

    #[test]
    fn test_dependency_accumulates_per_property() {
        let schema = SchemaNode::new()
            .dependency("a", "b")
            .dependency("a", "c")
            .dependency("x", "y");

        let deps = schema.dependencies.unwrap();
        assert_eq!(deps["a"], vec!["b", "c"]);
        assert_eq!(deps["x"], vec!["y"]);
    }

    #[test]
    fn test_additional_properties_true_is_allow() {
        let schema = SchemaNode::new().additional_properties(true);
        assert!(schema.additional_properties.is_none());

        let schema = SchemaNode::new().additional_properties(false);
        assert!(matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Deny)
        ));
    }

    #[test]
    fn test_property_order_is_declaration_order() {
        let schema = SchemaNode::new()
            .property("z", SchemaNode::new())
            .property("a", SchemaNode::new())
            .property("m", SchemaNode::new());

        let keys: Vec<_> = schema.properties.unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(SchemaNode::new().pattern("[unclosed").is_err());
        assert!(SchemaNode::new()
            .pattern_property("[unclosed", SchemaNode::new())
            .is_err());
    }

    #[test]
    fn test_resolve_root_and_nested() {
        let schema = SchemaNode::new().property(
            "outer",
            SchemaNode::new().property("inner", SchemaNode::new().with_type("number")),
        );

        assert!(schema.resolve("").is_some());
        assert!(schema.resolve("outer").is_some());
        let inner = schema.resolve("outer.inner").unwrap();
        assert!(matches!(
            inner.type_constraint,
            Some(TypeConstraint::Name(ref n)) if n == "number"
        ));
    }

    #[test]
    fn test_resolve_missing_segment() {
        let schema = SchemaNode::new().property("a", SchemaNode::new());
        assert!(schema.resolve("b").is_none());
        assert!(schema.resolve("a.b").is_none());
    }

    #[test]
    fn test_resolve_without_properties() {
        let schema = SchemaNode::new().with_type("string");
        assert!(schema.resolve("anything").is_none());
    }
}
