//! Positional paths for locating values in nested structures.
//!
//! This module provides [`ValuePath`], the dotted path attached to every
//! violation so callers can tell where in the input tree it occurred.

use std::fmt::{self, Display};

/// A dotted path to a value in a nested structure.
///
/// `ValuePath` represents locations like `user.address.city` and provides
/// methods for building paths incrementally. Paths grow through declared
/// property names only; array elements are reported at the array's own path.
///
/// Segments are joined verbatim. A field name that itself contains `.` is
/// indistinguishable from two nested segments in the rendered form.
///
/// # Example
///
/// ```rust
/// use muster::ValuePath;
///
/// let path = ValuePath::root().extend("user").extend("email");
/// assert_eq!(path.to_string(), "user.email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<String>,
}

impl ValuePath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single segment.
    pub fn from_segment(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Returns a new path with a segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the parent path (all segments except the last), or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
