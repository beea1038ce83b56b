//! Error types for validation findings.
//!
//! This module provides types for representing violations with rich context
//! including paths, messages, and expected/received values.

mod violation;

pub use violation::{ValidationError, Violations};
