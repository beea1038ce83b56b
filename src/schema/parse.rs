//! Parsing schema nodes from JSON documents.
//!
//! Parsing is where one-or-many fields are normalized into explicit
//! containers, type names are lowercased, and every regex is compiled once.
//! Malformed documents are rejected with [`SchemaParseError`]; the engine
//! itself never sees an ill-formed node.

use indexmap::IndexMap;
use serde_json::Value as Json;

use super::{AdditionalProperties, Pattern, SchemaNode, TypeConstraint};
use crate::value::Value;

/// Errors produced while parsing a schema document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaParseError {
    /// The schema document (or a nested schema) is not a JSON object.
    #[error("schema must be an object, found {found}")]
    NotAnObject {
        /// The JSON type name of the offending value.
        found: &'static str,
    },

    /// A regex in `pattern` or `patternProperties` failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern source that failed to compile.
        pattern: String,
        /// The underlying regex error.
        source: regex::Error,
    },

    /// A recognized constraint key holds a value of the wrong shape.
    #[error("invalid '{key}' constraint, expected {expected}")]
    InvalidConstraint {
        /// The constraint key.
        key: &'static str,
        /// A short description of the accepted shape.
        expected: &'static str,
    },

    /// Tuple-typed `items` (an array of schemas) is not supported.
    #[error("tuple-typed 'items' is not supported")]
    TupleItems,
}

impl SchemaNode {
    /// Parses a schema node from a JSON document.
    ///
    /// Unrecognized keys (`title`, `description`, and anything else) are
    /// ignored. Recognized keys with the wrong shape are errors.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::SchemaNode;
    /// use serde_json::json;
    ///
    /// let schema = SchemaNode::from_json(&json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "id": {"type": "integer", "required": true},
    ///         "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true}
    ///     },
    ///     "additionalProperties": false
    /// })).unwrap();
    ///
    /// assert!(schema.resolve("id").is_some());
    /// ```
    pub fn from_json(doc: &Json) -> Result<Self, SchemaParseError> {
        let fields = doc.as_object().ok_or(SchemaParseError::NotAnObject {
            found: json_type_name(doc),
        })?;

        let mut node = SchemaNode::new();
        for (key, value) in fields {
            match key.as_str() {
                "type" => node.type_constraint = Some(parse_type_constraint(value, "type")?),
                "disallow" => node.disallow = Some(parse_type_constraint(value, "disallow")?),
                "enum" => node.enum_values = Some(parse_enum(value)?),
                "properties" => node.properties = Some(parse_properties(value)?),
                "patternProperties" => {
                    node.pattern_properties = Some(parse_pattern_properties(value)?)
                }
                "additionalProperties" => {
                    node.additional_properties = parse_additional_properties(value)?
                }
                "dependencies" => node.dependencies = Some(parse_dependencies(value)?),
                "required" => node.required = parse_bool(value, "required")?,
                "items" => node.items = Some(Box::new(parse_items(value)?)),
                "minItems" => node.min_items = Some(parse_count(value, "minItems")?),
                "maxItems" => node.max_items = Some(parse_count(value, "maxItems")?),
                "uniqueItems" => node.unique_items = parse_bool(value, "uniqueItems")?,
                "minimum" => node.minimum = Some(parse_number(value, "minimum")?),
                "maximum" => node.maximum = Some(parse_number(value, "maximum")?),
                "exclusiveMinimum" => node.exclusive_minimum = parse_bool(value, "exclusiveMinimum")?,
                "exclusiveMaximum" => node.exclusive_maximum = parse_bool(value, "exclusiveMaximum")?,
                "divisibleBy" => node.divisible_by = Some(parse_number(value, "divisibleBy")?),
                "minLength" => node.min_length = Some(parse_count(value, "minLength")?),
                "maxLength" => node.max_length = Some(parse_count(value, "maxLength")?),
                "pattern" => node.pattern = Some(parse_pattern(value)?),
                // Annotations like title and description stay inert.
                _ => {}
            }
        }
        Ok(node)
    }
}

fn parse_type_constraint(value: &Json, key: &'static str) -> Result<TypeConstraint, SchemaParseError> {
    match value {
        Json::String(name) => Ok(TypeConstraint::Name(name.to_ascii_lowercase())),
        Json::Array(names) => {
            let names = names
                .iter()
                .map(|name| {
                    name.as_str()
                        .map(str::to_ascii_lowercase)
                        .ok_or(SchemaParseError::InvalidConstraint {
                            key,
                            expected: "a type name, a list of type names, or a schema",
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeConstraint::AnyOf(names))
        }
        Json::Object(_) => Ok(TypeConstraint::Schema(Box::new(SchemaNode::from_json(
            value,
        )?))),
        _ => Err(SchemaParseError::InvalidConstraint {
            key,
            expected: "a type name, a list of type names, or a schema",
        }),
    }
}

fn parse_enum(value: &Json) -> Result<Vec<Value>, SchemaParseError> {
    let allowed = value.as_array().ok_or(SchemaParseError::InvalidConstraint {
        key: "enum",
        expected: "a list of allowed values",
    })?;
    Ok(allowed.iter().cloned().map(Value::from).collect())
}

fn parse_properties(value: &Json) -> Result<IndexMap<String, SchemaNode>, SchemaParseError> {
    let fields = value.as_object().ok_or(SchemaParseError::InvalidConstraint {
        key: "properties",
        expected: "an object of schemas",
    })?;
    fields
        .iter()
        .map(|(name, child)| Ok((name.clone(), SchemaNode::from_json(child)?)))
        .collect()
}

fn parse_pattern_properties(value: &Json) -> Result<Vec<(Pattern, SchemaNode)>, SchemaParseError> {
    let fields = value.as_object().ok_or(SchemaParseError::InvalidConstraint {
        key: "patternProperties",
        expected: "an object of schemas",
    })?;
    fields
        .iter()
        .map(|(source, child)| {
            let pattern = Pattern::new(source).map_err(|e| SchemaParseError::InvalidPattern {
                pattern: source.clone(),
                source: e,
            })?;
            Ok((pattern, SchemaNode::from_json(child)?))
        })
        .collect()
}

fn parse_additional_properties(
    value: &Json,
) -> Result<Option<AdditionalProperties>, SchemaParseError> {
    match value {
        Json::Bool(true) => Ok(None),
        Json::Bool(false) => Ok(Some(AdditionalProperties::Deny)),
        Json::Object(_) => Ok(Some(AdditionalProperties::Schema(Box::new(
            SchemaNode::from_json(value)?,
        )))),
        _ => Err(SchemaParseError::InvalidConstraint {
            key: "additionalProperties",
            expected: "a boolean or a schema",
        }),
    }
}

fn parse_dependencies(value: &Json) -> Result<IndexMap<String, Vec<String>>, SchemaParseError> {
    let fields = value.as_object().ok_or(SchemaParseError::InvalidConstraint {
        key: "dependencies",
        expected: "an object of property names",
    })?;
    fields
        .iter()
        .map(|(property, needs)| {
            let needs = match needs {
                Json::String(one) => vec![one.clone()],
                Json::Array(many) => many
                    .iter()
                    .map(|name| {
                        name.as_str().map(str::to_string).ok_or(
                            SchemaParseError::InvalidConstraint {
                                key: "dependencies",
                                expected: "a property name or a list of property names",
                            },
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                _ => {
                    return Err(SchemaParseError::InvalidConstraint {
                        key: "dependencies",
                        expected: "a property name or a list of property names",
                    })
                }
            };
            Ok((property.clone(), needs))
        })
        .collect()
}

fn parse_items(value: &Json) -> Result<SchemaNode, SchemaParseError> {
    if value.is_array() {
        return Err(SchemaParseError::TupleItems);
    }
    SchemaNode::from_json(value)
}

fn parse_pattern(value: &Json) -> Result<Pattern, SchemaParseError> {
    let source = value.as_str().ok_or(SchemaParseError::InvalidConstraint {
        key: "pattern",
        expected: "a string",
    })?;
    Pattern::new(source).map_err(|e| SchemaParseError::InvalidPattern {
        pattern: source.to_string(),
        source: e,
    })
}

fn parse_bool(value: &Json, key: &'static str) -> Result<bool, SchemaParseError> {
    value.as_bool().ok_or(SchemaParseError::InvalidConstraint {
        key,
        expected: "a boolean",
    })
}

fn parse_count(value: &Json, key: &'static str) -> Result<usize, SchemaParseError> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or(SchemaParseError::InvalidConstraint {
            key,
            expected: "a non-negative integer",
        })
}

fn parse_number(value: &Json, key: &'static str) -> Result<f64, SchemaParseError> {
    value.as_f64().ok_or(SchemaParseError::InvalidConstraint {
        key,
        expected: "a number",
    })
}

/// Returns the JSON type name for a value.
fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
