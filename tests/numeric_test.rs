//! Integration tests for numeric range and divisibility constraints.

use muster::{SchemaNode, Validator, Value};
use serde_json::json;

fn run(schema: SchemaNode, value: serde_json::Value) -> muster::Report {
    Validator::new(schema).validate(&Value::from(value))
}

#[test]
fn test_minimum_is_inclusive() {
    let schema = SchemaNode::new().minimum(5.0);

    assert!(run(schema.clone(), json!(5)).valid());
    assert!(run(schema.clone(), json!(5.1)).valid());

    let report = run(schema, json!(4));
    assert_eq!(
        report.messages(),
        vec!["minimum value exceeded, expected: 5, received: 4"]
    );
    assert_eq!(report.errors()[0].code, "minimum");
}

#[test]
fn test_maximum_is_inclusive() {
    let schema = SchemaNode::new().maximum(10.0);

    assert!(run(schema.clone(), json!(10)).valid());
    assert!(run(schema.clone(), json!(-3)).valid());

    let report = run(schema, json!(10.5));
    assert_eq!(
        report.messages(),
        vec!["maximum value exceeded, expected: 10, received: 10.5"]
    );
    assert_eq!(report.errors()[0].code, "maximum");
}

#[test]
fn test_exclusive_minimum_rejects_the_boundary() {
    let schema = SchemaNode::new().minimum(5.0).exclusive_minimum(true);

    assert!(run(schema.clone(), json!(6)).valid());

    // The reported boundary shifts by one for the exclusive variants.
    let report = run(schema.clone(), json!(5));
    assert_eq!(
        report.messages(),
        vec!["exclusive minimum value exceeded, expected: 6, received: 5"]
    );
    assert_eq!(report.errors()[0].code, "exclusive_minimum");

    assert_eq!(run(schema, json!(4)).error_count(), 1);
}

#[test]
fn test_exclusive_maximum_rejects_the_boundary() {
    let schema = SchemaNode::new().maximum(5.0).exclusive_maximum(true);

    assert!(run(schema.clone(), json!(4)).valid());

    let report = run(schema.clone(), json!(5));
    assert_eq!(
        report.messages(),
        vec!["exclusive maximum value exceeded, expected: 4, received: 5"]
    );
    assert_eq!(report.errors()[0].code, "exclusive_maximum");

    assert_eq!(run(schema, json!(7)).error_count(), 1);
}

#[test]
fn test_divisible_by() {
    let schema = SchemaNode::new().divisible_by(2.0);

    assert!(run(schema.clone(), json!(8)).valid());
    assert!(run(schema.clone(), json!(0)).valid());
    assert!(run(schema.clone(), json!(-4)).valid());

    let report = run(schema, json!(7));
    assert_eq!(
        report.messages(),
        vec!["value does not match divisibleBy, expected: 2, received: 7"]
    );
    assert_eq!(report.errors()[0].code, "divisible_by");
}

#[test]
fn test_divisible_by_fractional_divisor() {
    let schema = SchemaNode::new().divisible_by(0.5);

    assert!(run(schema.clone(), json!(1.5)).valid());
    assert!(run(schema.clone(), json!(2)).valid());

    let report = run(schema, json!(1.25));
    assert_eq!(report.with_code("divisible_by").len(), 1);
}

#[test]
fn test_divisible_by_zero_disables_the_check() {
    let schema = SchemaNode::new().divisible_by(0.0);
    assert!(run(schema.clone(), json!(7)).valid());
    assert!(run(schema, json!(0.3)).valid());
}

#[test]
fn test_impossible_bounds_report_both_violations() {
    let schema = SchemaNode::new().minimum(5.0).maximum(2.0);

    let report = run(schema, json!(3));
    assert_eq!(
        report.messages(),
        vec![
            "minimum value exceeded, expected: 5, received: 3",
            "maximum value exceeded, expected: 2, received: 3",
        ]
    );
}

#[test]
fn test_type_and_range_violations_accumulate() {
    let schema = SchemaNode::new().with_type("integer").minimum(0.0);

    let report = run(schema, json!(-1.5));
    assert_eq!(
        report.messages(),
        vec![
            "invalid type, expected: integer, received: number",
            "minimum value exceeded, expected: 0, received: -1.5",
        ]
    );
}

#[test]
fn test_numeric_checks_skip_non_numbers() {
    let schema = SchemaNode::new().minimum(5.0).divisible_by(2.0);

    assert!(run(schema.clone(), json!("three")).valid());
    assert!(run(schema.clone(), json!(true)).valid());
    assert!(run(schema, json!({"n": 1})).valid());
}

#[test]
fn test_fractional_received_values_keep_their_form() {
    let schema = SchemaNode::new().minimum(1.0);

    let report = run(schema, json!(0.25));
    assert_eq!(
        report.messages(),
        vec!["minimum value exceeded, expected: 1, received: 0.25"]
    );
}

#[test]
fn test_bounds_at_property_paths() {
    let schema =
        SchemaNode::new().property("retries", SchemaNode::new().minimum(0.0).maximum(5.0));

    let report = Validator::new(schema).validate(&Value::from(json!({"retries": 9})));
    assert_eq!(
        report.messages(),
        vec!["maximum value exceeded at retries, expected: 5, received: 9"]
    );
}
