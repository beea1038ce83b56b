//! Rendering schema nodes back to JSON documents.
//!
//! The inverse of parsing, used for diagnostics (nested-schema violations
//! embed the schema's literal JSON form) and for exporting programmatically
//! built schemas.

use serde_json::{Map, Value as Json};

use super::{AdditionalProperties, SchemaNode, TypeConstraint};
use crate::value::Value;

impl SchemaNode {
    /// Renders this node as a JSON schema document.
    ///
    /// Only declared constraints appear. A dependency list with a single
    /// entry collapses back to the bare property-name form.
    ///
    /// # Example
    ///
    /// ```rust
    /// use muster::SchemaNode;
    /// use serde_json::json;
    ///
    /// let doc = json!({"type": "integer", "minimum": 1, "required": true});
    /// let schema = SchemaNode::from_json(&doc).unwrap();
    /// assert_eq!(schema.to_json(), doc);
    /// ```
    pub fn to_json(&self) -> Json {
        let mut doc = Map::new();
        if let Some(ref constraint) = self.type_constraint {
            doc.insert("type".to_string(), constraint.to_json());
        }
        if let Some(ref constraint) = self.disallow {
            doc.insert("disallow".to_string(), constraint.to_json());
        }
        if let Some(ref allowed) = self.enum_values {
            doc.insert(
                "enum".to_string(),
                Json::Array(allowed.iter().map(value_to_json).collect()),
            );
        }
        if let Some(ref properties) = self.properties {
            let rendered: Map<String, Json> = properties
                .iter()
                .map(|(name, child)| (name.clone(), child.to_json()))
                .collect();
            doc.insert("properties".to_string(), Json::Object(rendered));
        }
        if let Some(ref patterns) = self.pattern_properties {
            let rendered: Map<String, Json> = patterns
                .iter()
                .map(|(pattern, child)| (pattern.source().to_string(), child.to_json()))
                .collect();
            doc.insert("patternProperties".to_string(), Json::Object(rendered));
        }
        match self.additional_properties {
            Some(AdditionalProperties::Deny) => {
                doc.insert("additionalProperties".to_string(), Json::Bool(false));
            }
            Some(AdditionalProperties::Schema(ref child)) => {
                doc.insert("additionalProperties".to_string(), child.to_json());
            }
            None => {}
        }
        if let Some(ref dependencies) = self.dependencies {
            let rendered: Map<String, Json> = dependencies
                .iter()
                .map(|(property, needs)| {
                    let needs = match needs.as_slice() {
                        [single] => Json::String(single.clone()),
                        many => Json::Array(many.iter().cloned().map(Json::String).collect()),
                    };
                    (property.clone(), needs)
                })
                .collect();
            doc.insert("dependencies".to_string(), Json::Object(rendered));
        }
        if self.required {
            doc.insert("required".to_string(), Json::Bool(true));
        }
        if let Some(ref items) = self.items {
            doc.insert("items".to_string(), items.to_json());
        }
        if let Some(min) = self.min_items {
            doc.insert("minItems".to_string(), Json::from(min));
        }
        if let Some(max) = self.max_items {
            doc.insert("maxItems".to_string(), Json::from(max));
        }
        if self.unique_items {
            doc.insert("uniqueItems".to_string(), Json::Bool(true));
        }
        if let Some(minimum) = self.minimum {
            doc.insert("minimum".to_string(), number_to_json(minimum));
        }
        if let Some(maximum) = self.maximum {
            doc.insert("maximum".to_string(), number_to_json(maximum));
        }
        if self.exclusive_minimum {
            doc.insert("exclusiveMinimum".to_string(), Json::Bool(true));
        }
        if self.exclusive_maximum {
            doc.insert("exclusiveMaximum".to_string(), Json::Bool(true));
        }
        if let Some(divisor) = self.divisible_by {
            doc.insert("divisibleBy".to_string(), number_to_json(divisor));
        }
        if let Some(min) = self.min_length {
            doc.insert("minLength".to_string(), Json::from(min));
        }
        if let Some(max) = self.max_length {
            doc.insert("maxLength".to_string(), Json::from(max));
        }
        if let Some(ref pattern) = self.pattern {
            doc.insert(
                "pattern".to_string(),
                Json::String(pattern.source().to_string()),
            );
        }
        Json::Object(doc)
    }
}

impl TypeConstraint {
    /// Renders this constraint in its JSON form.
    pub fn to_json(&self) -> Json {
        match self {
            TypeConstraint::Name(name) => Json::String(name.clone()),
            TypeConstraint::AnyOf(names) => {
                Json::Array(names.iter().cloned().map(Json::String).collect())
            }
            TypeConstraint::Schema(node) => node.to_json(),
        }
    }
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => Json::String(s.clone()),
        Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Object(fields) => Json::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), value_to_json(value)))
                .collect(),
        ),
        // The opaque kinds have no JSON form; fall back to their display tags.
        other => Json::String(other.to_string()),
    }
}

fn number_to_json(n: f64) -> Json {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Json::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Json::Null, Json::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_preserves_constraints() {
        let doc = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "required": true, "minLength": 1},
                "tags": {
                    "type": "array",
                    "items": {"type": "string"},
                    "uniqueItems": true,
                    "maxItems": 8
                }
            },
            "patternProperties": {"^x-": {"type": "string"}},
            "additionalProperties": false,
            "dependencies": {"a": "b", "c": ["d", "e"]}
        });

        let schema = SchemaNode::from_json(&doc).unwrap();
        assert_eq!(schema.to_json(), doc);
    }

    #[test]
    fn test_integral_bounds_render_without_fraction() {
        let schema = SchemaNode::new().minimum(10.0).maximum(20.5);
        assert_eq!(schema.to_json(), json!({"minimum": 10, "maximum": 20.5}));
    }

    #[test]
    fn test_unset_flags_are_omitted() {
        let schema = SchemaNode::new().required(false).unique_items(false);
        assert_eq!(schema.to_json(), json!({}));
    }

    #[test]
    fn test_singleton_dependency_collapses() {
        let schema = SchemaNode::new().dependency("a", "b");
        assert_eq!(schema.to_json(), json!({"dependencies": {"a": "b"}}));
    }

    #[test]
    fn test_union_and_nested_type_render() {
        let union = SchemaNode::new().with_type(vec!["number", "string"]);
        assert_eq!(union.to_json(), json!({"type": ["number", "string"]}));

        let nested = SchemaNode::new().with_type(SchemaNode::new().with_type("number").minimum(1.0));
        assert_eq!(
            nested.to_json(),
            json!({"type": {"type": "number", "minimum": 1}})
        );
    }

    #[test]
    fn test_enum_renders_literals() {
        let doc = json!({"enum": ["a", 1, {"k": true}, null]});
        let schema = SchemaNode::from_json(&doc).unwrap();
        assert_eq!(schema.to_json(), doc);
    }

    #[test]
    fn test_additional_properties_schema_renders() {
        let doc = json!({
            "properties": {"x": {}},
            "additionalProperties": {"type": "string"}
        });
        let schema = SchemaNode::from_json(&doc).unwrap();
        assert_eq!(schema.to_json(), doc);
    }
}
