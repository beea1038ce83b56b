//! Per-run violation sink and summary.
//!
//! This module provides [`Report`], the ordered log a validation run appends
//! to and ultimately returns. A report is created fresh for every run, so
//! validator handles stay stateless and findings never leak across runs.

use std::fmt::{self, Display};

use stillwater::prelude::*;
use stillwater::Validation;

use crate::error::{ValidationError, Violations};
use crate::Outcome;

/// The outcome of one validation run.
///
/// Violations appear in the order they were recorded during the walk of the
/// input tree; nothing is sorted or deduplicated. Overall validity is simply
/// the absence of recorded violations.
///
/// # Example
///
/// ```rust
/// use muster::{SchemaNode, Validator, Value};
/// use serde_json::json;
///
/// let schema = SchemaNode::from_json(&json!({"type": "string"})).unwrap();
/// let report = Validator::new(schema).validate(&Value::from(json!(42)));
///
/// assert!(!report.valid());
/// assert_eq!(report.error_count(), 1);
/// assert_eq!(
///     report.messages(),
///     vec!["invalid type, expected: string, received: number"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    errors: Vec<ValidationError>,
}

impl Report {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if the run recorded no violations.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of violations recorded.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the recorded violations in emission order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns every violation rendered through the message template.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Returns an iterator over the recorded violations.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Returns all violations in the specified category.
    pub fn with_code(&self, code: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.code == code).collect()
    }

    /// Converts this report into an applicative validation outcome.
    ///
    /// A clean report becomes `Success(())`; anything else becomes a
    /// `Failure` carrying the violations, which combine with other outcomes
    /// through `Semigroup`.
    pub fn into_outcome(self) -> Outcome {
        match NonEmptyVec::from_vec(self.errors) {
            Some(errors) => Validation::Failure(Violations::from_non_empty(errors)),
            None => Validation::Success(()),
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "valid");
        }
        writeln!(f, "invalid with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl IntoIterator for Report {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
