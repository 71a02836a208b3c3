//! Error types for identifier parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier string is empty.
    #[error("identifier cannot be empty")]
    Empty,

    /// The identifier does not start with `/`.
    #[error("identifier must start with '/'")]
    NotRooted,

    /// A fixed path segment was missing or misspelled.
    #[error("invalid identifier segment: expected '{expected}', got '{actual}'")]
    UnexpectedSegment {
        expected: &'static str,
        actual: String,
    },

    /// The value following a fixed segment was missing or empty.
    #[error("identifier missing a value for '{segment}'")]
    MissingValue { segment: &'static str },

    /// A segment value would break the path form.
    #[error("invalid {segment} value '{value}': must be non-empty and must not contain '/'")]
    InvalidValue {
        segment: &'static str,
        value: String,
    },

    /// The identifier continues past its expected end.
    #[error("unexpected trailing segments: '{rest}'")]
    TrailingSegments { rest: String },

    /// The pool name does not satisfy the pool naming rule.
    #[error(
        "invalid pool name '{name}': must start with a lowercase letter, \
         contain only lowercase letters and digits, and be at most 12 characters"
    )]
    InvalidPoolName { name: String },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }

    /// Returns true if this error indicates a malformed path shape, as
    /// opposed to an invalid name inside a well-formed path.
    pub fn is_shape_error(&self) -> bool {
        !matches!(self, IdError::InvalidPoolName { .. })
    }
}
