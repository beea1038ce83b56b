//! Recursive validation engine.
//!
//! [`Validator`] binds one schema and walks input values against it. For
//! each schema node the engine evaluates every applicable constraint
//! category, records violations into the run's [`Report`], and recurses
//! into pattern-matched keys, additional keys, and declared properties.
//! Nothing short-circuits: a run always describes the whole input.

use indexmap::IndexMap;

use crate::equality::{all_unique, structurally_equal};
use crate::error::ValidationError;
use crate::path::ValuePath;
use crate::report::Report;
use crate::schema::{AdditionalProperties, SchemaNode, TypeConstraint};
use crate::value::{format_number, Value};
use crate::Outcome;

/// A reusable validation handle binding one schema.
///
/// Each call to [`Validator::validate`] allocates a fresh [`Report`], so a
/// handle carries no state between runs and can be shared freely across
/// threads.
///
/// # Example
///
/// ```rust
/// use muster::{SchemaNode, Validator, Value};
/// use serde_json::json;
///
/// let schema = SchemaNode::from_json(&json!({
///     "type": "object",
///     "properties": {
///         "name": {"type": "string", "required": true},
///         "port": {"type": "integer", "minimum": 1}
///     }
/// })).unwrap();
///
/// let validator = Validator::new(schema);
///
/// let good = validator.validate(&Value::from(json!({"name": "web", "port": 80})));
/// assert!(good.valid());
///
/// let bad = validator.validate(&Value::from(json!({"port": 0})));
/// assert_eq!(bad.messages(), vec![
///     "missing required value at name",
///     "minimum value exceeded at port, expected: 1, received: 0",
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    schema: SchemaNode,
}

impl Validator {
    /// Creates a validator for the given schema.
    pub fn new(schema: SchemaNode) -> Self {
        Self { schema }
    }

    /// Returns the bound schema.
    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Resolves a sub-schema of the bound schema by dotted path.
    ///
    /// See [`SchemaNode::resolve`].
    pub fn schema_at(&self, path: &str) -> Option<&SchemaNode> {
        self.schema.resolve(path)
    }

    /// Validates a value, returning the full report for this run.
    ///
    /// Violations appear in evaluation order; the report is independent of
    /// any previous run.
    pub fn validate(&self, value: &Value) -> Report {
        let mut report = Report::new();
        validate_node(value, &ValuePath::root(), &self.schema, &mut report);
        report
    }

    /// Validates a value, returning an applicative outcome.
    ///
    /// Outcomes from several validators combine through `Semigroup`, which
    /// suits callers assembling one overall verdict from many checks.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::{SchemaNode, Validator, Value};
    /// use serde_json::json;
    ///
    /// let validator = Validator::new(SchemaNode::new().with_type("string"));
    /// assert!(validator.check(&Value::from(json!("ok"))).is_success());
    /// assert!(validator.check(&Value::from(json!(1))).is_failure());
    /// ```
    pub fn check(&self, value: &Value) -> Outcome {
        self.validate(value).into_outcome()
    }
}

/// Validates one value against one schema node, recursing into children.
fn validate_node(value: &Value, path: &ValuePath, schema: &SchemaNode, report: &mut Report) {
    if let Some(fields) = value.as_object() {
        check_dependencies(fields, path, schema, report);
        check_pattern_properties(fields, path, schema, report);
        check_additional_properties(fields, path, schema, report);
    }

    if value.is_null() {
        if schema.required {
            report.push(
                ValidationError::new(path.clone(), "missing required value").with_code("required"),
            );
        }
    } else if value.as_array().is_some() {
        check_array(value, path, schema, report);
    } else {
        check_value(value, path, schema, report);
    }

    // Declared properties are walked for every value. Absent or
    // inapplicable keys validate as null so a child's required constraint
    // still fires.
    if let Some(ref properties) = schema.properties {
        for (name, child) in properties {
            let child_path = path.extend(name);
            match value.as_object().and_then(|fields| fields.get(name)) {
                Some(child_value) => validate_node(child_value, &child_path, child, report),
                None => validate_node(&Value::Null, &child_path, child, report),
            }
        }
    }
}

fn check_dependencies(
    fields: &IndexMap<String, Value>,
    path: &ValuePath,
    schema: &SchemaNode,
    report: &mut Report,
) {
    let dependencies = match schema.dependencies {
        Some(ref dependencies) => dependencies,
        None => return,
    };
    for (property, needs) in dependencies {
        if !fields.contains_key(property) {
            continue;
        }
        for needed in needs {
            if !fields.contains_key(needed) {
                report.push(
                    ValidationError::new(
                        path.clone(),
                        format!("missing dependency of {}", property),
                    )
                    .with_code("dependency")
                    .with_expected(needed.clone()),
                );
            }
        }
    }
}

fn check_pattern_properties(
    fields: &IndexMap<String, Value>,
    path: &ValuePath,
    schema: &SchemaNode,
    report: &mut Report,
) {
    let patterns = match schema.pattern_properties {
        Some(ref patterns) => patterns,
        None => return,
    };
    for (name, value) in fields {
        for (pattern, child) in patterns {
            if pattern.is_match(name) {
                validate_node(value, &path.extend(name), child, report);
            }
        }
    }
}

fn check_additional_properties(
    fields: &IndexMap<String, Value>,
    path: &ValuePath,
    schema: &SchemaNode,
    report: &mut Report,
) {
    let setting = match schema.additional_properties {
        Some(ref setting) => setting,
        None => return,
    };
    // Only meaningful next to declared properties; without them every key
    // would count as additional.
    let properties = match schema.properties {
        Some(ref properties) => properties,
        None => return,
    };
    for (name, value) in fields {
        if properties.contains_key(name) || matches_any_pattern(schema, name) {
            continue;
        }
        match setting {
            AdditionalProperties::Deny => {
                report.push(
                    ValidationError::new(path.clone(), "invalid extra properties present")
                        .with_code("additional_properties"),
                );
            }
            AdditionalProperties::Schema(child) => {
                validate_node(value, &path.extend(name), child, report);
            }
        }
    }
}

fn matches_any_pattern(schema: &SchemaNode, name: &str) -> bool {
    schema
        .pattern_properties
        .as_ref()
        .map_or(false, |patterns| {
            patterns.iter().any(|(pattern, _)| pattern.is_match(name))
        })
}

fn check_array(value: &Value, path: &ValuePath, schema: &SchemaNode, report: &mut Report) {
    let items = match value.as_array() {
        Some(items) => items,
        None => return,
    };

    if let Some(ref constraint) = schema.type_constraint {
        check_type(value, path, constraint, report);
    }
    if let Some(ref constraint) = schema.disallow {
        check_disallow(value, path, constraint, report);
    }

    if let Some(min) = schema.min_items {
        if items.len() < min {
            report.push(
                ValidationError::new(path.clone(), "minimum items exceeded")
                    .with_code("min_items")
                    .with_expected(min.to_string())
                    .with_received(items.len().to_string()),
            );
        }
    }
    if let Some(max) = schema.max_items {
        if items.len() > max {
            report.push(
                ValidationError::new(path.clone(), "maximum items exceeded")
                    .with_code("max_items")
                    .with_expected(max.to_string())
                    .with_received(items.len().to_string()),
            );
        }
    }
    if schema.unique_items && !all_unique(items) {
        report.push(
            ValidationError::new(path.clone(), "duplicate array items found")
                .with_code("unique_items"),
        );
    }

    // Element constraints apply only when items is declared. Each element
    // receives the per-value battery with the items schema, reported at the
    // array's own path.
    if let Some(ref item_schema) = schema.items {
        for item in items {
            check_value(item, path, item_schema, report);
        }
    }
}

/// The per-value check battery: disallow, type, enum, then kind-specific
/// numeric or string constraints.
fn check_value(value: &Value, path: &ValuePath, schema: &SchemaNode, report: &mut Report) {
    if let Some(ref constraint) = schema.disallow {
        check_disallow(value, path, constraint, report);
    }
    if let Some(ref constraint) = schema.type_constraint {
        check_type(value, path, constraint, report);
    }
    if let Some(ref allowed) = schema.enum_values {
        if !allowed
            .iter()
            .any(|candidate| structurally_equal(value, candidate))
        {
            report.push(
                ValidationError::new(path.clone(), "value not in enum")
                    .with_code("not_in_enum")
                    .with_expected(Value::Array(allowed.clone()).to_string())
                    .with_received(value.to_string()),
            );
        }
    }
    match value {
        Value::Number(n) => check_number(*n, path, schema, report),
        Value::String(s) => check_string(s, path, schema, report),
        _ => {}
    }
}

/// Returns true if the value matches the type constraint.
///
/// Nested schemas are probed against a scratch report; the probe's findings
/// never reach the caller.
fn type_matches(value: &Value, constraint: &TypeConstraint) -> bool {
    match constraint {
        TypeConstraint::Name(name) => value.matches_type(name),
        TypeConstraint::AnyOf(names) => names.iter().any(|name| value.matches_type(name)),
        TypeConstraint::Schema(node) => {
            let mut probe = Report::new();
            validate_node(value, &ValuePath::root(), node, &mut probe);
            probe.valid()
        }
    }
}

fn check_type(value: &Value, path: &ValuePath, constraint: &TypeConstraint, report: &mut Report) {
    if !type_matches(value, constraint) {
        report.push(type_violation(value, path, constraint, false));
    }
}

fn check_disallow(
    value: &Value,
    path: &ValuePath,
    constraint: &TypeConstraint,
    report: &mut Report,
) {
    if type_matches(value, constraint) {
        report.push(type_violation(value, path, constraint, true));
    }
}

fn type_violation(
    value: &Value,
    path: &ValuePath,
    constraint: &TypeConstraint,
    disallowed: bool,
) -> ValidationError {
    match constraint {
        TypeConstraint::Name(name) => {
            let (message, code) = if disallowed {
                ("disallowed type", "disallowed_type")
            } else {
                ("invalid type", "invalid_type")
            };
            ValidationError::new(path.clone(), message)
                .with_code(code)
                .with_expected(name.clone())
                .with_received(value.kind().name())
        }
        TypeConstraint::AnyOf(names) => {
            let (message, code) = if disallowed {
                ("disallowed type", "disallowed_type")
            } else {
                ("invalid type", "invalid_type")
            };
            ValidationError::new(path.clone(), message)
                .with_code(code)
                .with_expected(serde_json::json!(names).to_string())
                .with_received(value.kind().name())
        }
        TypeConstraint::Schema(node) => {
            let (message, code) = if disallowed {
                ("disallowed schema type", "disallowed_schema_type")
            } else {
                ("invalid schema type", "invalid_schema_type")
            };
            ValidationError::new(path.clone(), message)
                .with_code(code)
                .with_expected(node.to_json().to_string())
                .with_received(value.to_string())
        }
    }
}

fn check_number(n: f64, path: &ValuePath, schema: &SchemaNode, report: &mut Report) {
    if let Some(minimum) = schema.minimum {
        if schema.exclusive_minimum {
            if n <= minimum {
                report.push(
                    ValidationError::new(path.clone(), "exclusive minimum value exceeded")
                        .with_code("exclusive_minimum")
                        .with_expected(format_number(minimum + 1.0))
                        .with_received(format_number(n)),
                );
            }
        } else if n < minimum {
            report.push(
                ValidationError::new(path.clone(), "minimum value exceeded")
                    .with_code("minimum")
                    .with_expected(format_number(minimum))
                    .with_received(format_number(n)),
            );
        }
    }
    if let Some(maximum) = schema.maximum {
        if schema.exclusive_maximum {
            if n >= maximum {
                report.push(
                    ValidationError::new(path.clone(), "exclusive maximum value exceeded")
                        .with_code("exclusive_maximum")
                        .with_expected(format_number(maximum - 1.0))
                        .with_received(format_number(n)),
                );
            }
        } else if n > maximum {
            report.push(
                ValidationError::new(path.clone(), "maximum value exceeded")
                    .with_code("maximum")
                    .with_expected(format_number(maximum))
                    .with_received(format_number(n)),
            );
        }
    }
    if let Some(divisor) = schema.divisible_by {
        // A zero divisor disables the check.
        if divisor != 0.0 && n % divisor != 0.0 {
            report.push(
                ValidationError::new(path.clone(), "value does not match divisibleBy")
                    .with_code("divisible_by")
                    .with_expected(format_number(divisor))
                    .with_received(format_number(n)),
            );
        }
    }
}

fn check_string(s: &str, path: &ValuePath, schema: &SchemaNode, report: &mut Report) {
    if schema.min_length.is_some() || schema.max_length.is_some() {
        let length = s.chars().count();
        if let Some(min) = schema.min_length {
            if length < min {
                report.push(
                    ValidationError::new(path.clone(), "minimum string length exceeded")
                        .with_code("min_length")
                        .with_expected(min.to_string())
                        .with_received(length.to_string()),
                );
            }
        }
        if let Some(max) = schema.max_length {
            if length > max {
                report.push(
                    ValidationError::new(path.clone(), "maximum string length exceeded")
                        .with_code("max_length")
                        .with_expected(max.to_string())
                        .with_received(length.to_string()),
                );
            }
        }
    }
    if let Some(ref pattern) = schema.pattern {
        if !pattern.is_match(s) {
            report.push(
                ValidationError::new(path.clone(), "string does not match pattern")
                    .with_code("pattern")
                    .with_expected(pattern.source())
                    .with_received(s),
            );
        }
    }
}
