//! # Muster
//!
//! A structural validator for JSON-like values that reports every violation
//! in one pass rather than stopping at the first.
//!
//! ## Overview
//!
//! A schema describes the shape, types, and constraints of acceptable input:
//! type names (or whole nested schemas) per position, numeric bounds, string
//! lengths and patterns, array cardinality and uniqueness, object property
//! rules, enumerations, and inter-property dependencies. The engine walks an
//! input value recursively, accumulates a human-readable finding for every
//! point of non-conformance with its position in the tree, and returns the
//! whole list. Input is never mutated or coerced.
//!
//! ## Core Types
//!
//! - [`Value`]: the closed input model (JSON kinds plus blobs and timestamps)
//! - [`SchemaNode`]: one parsed schema node, built or read from JSON
//! - [`Validator`]: binds a schema; one call validates one value
//! - [`Report`]: ordered violations plus the pass/fail summary for one run
//! - [`ValuePath`]: dotted position labels like `server.host`
//! - [`Violations`]: non-empty error collection for applicative pipelines
//!
//! ## Example
//!
//! ```rust
//! use muster::{SchemaNode, Validator, Value};
//! use serde_json::json;
//!
//! let schema = SchemaNode::from_json(&json!({
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string", "required": true, "minLength": 1},
//!         "age": {"type": "integer", "minimum": 0}
//!     }
//! })).unwrap();
//!
//! let validator = Validator::new(schema);
//! let report = validator.validate(&Value::from(json!({"age": -3})));
//!
//! assert!(!report.valid());
//! assert_eq!(report.messages(), vec![
//!     "missing required value at name",
//!     "minimum value exceeded at age, expected: 0, received: -3",
//! ]);
//! ```

pub mod engine;
pub mod equality;
pub mod error;
pub mod path;
pub mod report;
pub mod schema;
pub mod value;

pub use engine::Validator;
pub use equality::structurally_equal;
pub use error::{ValidationError, Violations};
pub use path::ValuePath;
pub use report::Report;
pub use schema::{
    AdditionalPropertiesSetting, Pattern, SchemaNode, SchemaParseError, TypeConstraint,
};
pub use value::{Kind, Value};

/// Type alias for validation outcomes using Violations
pub type Outcome = stillwater::Validation<(), Violations>;
