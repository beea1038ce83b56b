//! Violation records for validation findings.
//!
//! This module provides [`ValidationError`] for single violations and
//! [`Violations`] for non-empty collections of them.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::ValuePath;

/// A single validation violation with full context.
///
/// `ValidationError` captures everything known about one finding:
/// - **path**: where in the input tree the violation occurred
/// - **message**: short human-readable description of the violation
/// - **expected**: what the schema demanded (optional)
/// - **received**: what the input actually held (optional)
/// - **code**: machine-readable violation category for programmatic handling
///
/// Rendering follows a fixed template so findings read uniformly:
/// `<message>[ at <path>][, expected: <expected>][, received: <received>]`.
/// The path clause is omitted at the root.
///
/// # Example
///
/// ```rust
/// use muster::{ValidationError, ValuePath};
///
/// let error = ValidationError::new(ValuePath::root().extend("age"), "invalid type")
///     .with_code("invalid_type")
///     .with_expected("number")
///     .with_received("string");
///
/// assert_eq!(
///     error.to_string(),
///     "invalid type at age, expected: number, received: string"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The path to the value that failed validation.
    pub path: ValuePath,
    /// Human-readable violation message.
    pub message: String,
    /// What the schema demanded (formatted as string).
    pub expected: Option<String>,
    /// What the input actually held (formatted as string).
    pub received: Option<String>,
    /// Machine-readable violation category (e.g., `min_items`).
    pub code: String,
}

impl ValidationError {
    /// Creates a new violation with the given path and message.
    ///
    /// The code defaults to "violation". Use `with_code` to set a more
    /// specific category.
    pub fn new(path: ValuePath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            expected: None,
            received: None,
            code: "violation".to_string(),
        }
    }

    /// Sets the violation category and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the expected field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Sets the received field and returns self for chaining.
    pub fn with_received(mut self, received: impl Into<String>) -> Self {
        self.received = Some(received.into());
        self
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.path.is_root() {
            write!(f, " at {}", self.path)?;
        }
        if let Some(ref expected) = self.expected {
            write!(f, ", expected: {}", expected)?;
        }
        if let Some(ref received) = self.received {
            write!(f, ", received: {}", received)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ValidationError stays Send + Sync as long as every field is an owned type.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

/// A non-empty collection of validation violations.
///
/// `Violations` wraps a `NonEmptyVec<ValidationError>` to guarantee that at
/// least one violation is present, which makes it usable as the failure side
/// of `Validation<T, Violations>`.
///
/// # Combining
///
/// `Violations` implements `Semigroup`, so findings from several runs can be
/// merged:
///
/// ```rust
/// use muster::{ValidationError, Violations, ValuePath};
/// use stillwater::prelude::*;
///
/// let a = Violations::single(ValidationError::new(
///     ValuePath::root().extend("name"),
///     "missing required value",
/// ));
/// let b = Violations::single(ValidationError::new(
///     ValuePath::root().extend("age"),
///     "invalid type",
/// ));
///
/// let combined = a.combine(b);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(NonEmptyVec<ValidationError>);

impl Violations {
    /// Creates a `Violations` containing a single violation.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `Violations` from a `NonEmptyVec` of violations.
    pub fn from_non_empty(errors: NonEmptyVec<ValidationError>) -> Self {
        Self(errors)
    }

    /// Creates a `Violations` from a `Vec<ValidationError>`.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Self {
        Self(NonEmptyVec::from_vec(errors).expect("Violations requires at least one error"))
    }

    /// Returns the number of violations in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns false since this collection is guaranteed non-empty.
    ///
    /// This method exists for API consistency but always returns false.
    pub fn is_empty(&self) -> bool {
        false // NonEmptyVec is never empty
    }

    /// Returns an iterator over the contained violations.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns all violations at the specified path.
    pub fn at_path(&self, path: &ValuePath) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all violations in the specified category.
    pub fn with_code(&self, code: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Returns the first violation in the collection.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }
}

impl Semigroup for Violations {
    fn combine(self, other: Self) -> Self {
        Violations(self.0.combine(other.0))
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl IntoIterator for Violations {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a ValidationError;
    type IntoIter = Box<dyn Iterator<Item = &'a ValidationError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violations>();
    assert_sync::<Violations>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ValidationError::new(ValuePath::root().extend("name"), "missing required value");

        assert_eq!(error.path, ValuePath::root().extend("name"));
        assert_eq!(error.message, "missing required value");
        assert_eq!(error.code, "violation");
        assert!(error.expected.is_none());
        assert!(error.received.is_none());
    }

    #[test]
    fn test_error_builder() {
        let error = ValidationError::new(ValuePath::root().extend("age"), "minimum value exceeded")
            .with_code("minimum")
            .with_expected("0")
            .with_received("-5");

        assert_eq!(error.code, "minimum");
        assert_eq!(error.expected, Some("0".to_string()));
        assert_eq!(error.received, Some("-5".to_string()));
    }

    #[test]
    fn test_display_full_template() {
        let error = ValidationError::new(ValuePath::root().extend("a").extend("b"), "invalid type")
            .with_expected("number")
            .with_received("string");

        assert_eq!(
            error.to_string(),
            "invalid type at a.b, expected: number, received: string"
        );
    }

    #[test]
    fn test_display_omits_path_at_root() {
        let error = ValidationError::new(ValuePath::root(), "invalid type")
            .with_expected("string")
            .with_received("number");

        assert_eq!(
            error.to_string(),
            "invalid type, expected: string, received: number"
        );
    }

    #[test]
    fn test_display_message_only() {
        let error = ValidationError::new(ValuePath::root(), "invalid extra properties present");
        assert_eq!(error.to_string(), "invalid extra properties present");
    }

    #[test]
    fn test_display_expected_without_received() {
        let error = ValidationError::new(ValuePath::root().extend("a"), "missing dependency of a")
            .with_expected("b");
        assert_eq!(error.to_string(), "missing dependency of a at a, expected: b");
    }

    #[test]
    fn test_violations_single() {
        let error = ValidationError::new(ValuePath::root(), "test");
        let violations = Violations::single(error.clone());

        assert_eq!(violations.len(), 1);
        assert!(!violations.is_empty());
        assert_eq!(violations.first(), &error);
    }

    #[test]
    fn test_violations_combine_preserves_order() {
        let first = ValidationError::new(ValuePath::root().extend("a"), "first");
        let second = ValidationError::new(ValuePath::root().extend("b"), "second");

        let combined =
            Violations::single(first.clone()).combine(Violations::single(second.clone()));

        assert_eq!(combined.len(), 2);
        let messages: Vec<_> = combined.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_violations_at_path() {
        let path_a = ValuePath::root().extend("a");
        let path_b = ValuePath::root().extend("b");

        let violations = Violations::from_vec(vec![
            ValidationError::new(path_a.clone(), "one"),
            ValidationError::new(path_a.clone(), "two"),
            ValidationError::new(path_b.clone(), "three"),
        ]);

        assert_eq!(violations.at_path(&path_a).len(), 2);
        assert_eq!(violations.at_path(&path_b).len(), 1);
    }

    #[test]
    fn test_violations_with_code() {
        let violations = Violations::from_vec(vec![
            ValidationError::new(ValuePath::root(), "one").with_code("required"),
            ValidationError::new(ValuePath::root(), "two").with_code("invalid_type"),
            ValidationError::new(ValuePath::root(), "three").with_code("required"),
        ]);

        assert_eq!(violations.with_code("required").len(), 2);
        assert_eq!(violations.with_code("invalid_type").len(), 1);
        assert!(violations.with_code("pattern").is_empty());
    }

    #[test]
    fn test_violations_display() {
        let violations = Violations::from_vec(vec![
            ValidationError::new(ValuePath::root().extend("name"), "missing required value"),
            ValidationError::new(ValuePath::root().extend("age"), "invalid type"),
        ]);

        let display = violations.to_string();
        assert!(display.contains("2 error(s)"));
        assert!(display.contains("missing required value at name"));
        assert!(display.contains("invalid type at age"));
    }

    #[test]
    fn test_violations_into_iter() {
        let violations = Violations::from_vec(vec![
            ValidationError::new(ValuePath::root(), "one"),
            ValidationError::new(ValuePath::root(), "two"),
        ]);

        let collected: Vec<ValidationError> = violations.into_iter().collect();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn test_semigroup_associativity() {
        let e1 = Violations::single(ValidationError::new(ValuePath::root(), "1"));
        let e2 = Violations::single(ValidationError::new(ValuePath::root(), "2"));
        let e3 = Violations::single(ValidationError::new(ValuePath::root(), "3"));

        let left = e1.clone().combine(e2.clone()).combine(e3.clone());
        let right = e1.combine(e2.combine(e3));

        let left_msgs: Vec<_> = left.iter().map(|e| &e.message).collect();
        let right_msgs: Vec<_> = right.iter().map(|e| &e.message).collect();
        assert_eq!(left_msgs, right_msgs);
    }
}
