//! # Error reporting for specification construction
//!
//! Malformed or contradictory specifications fail fast with a descriptive
//! error; data is never silently dropped or coerced.
use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// An `InvalidSpecificationError` is created when a problem specification is
/// structurally malformed or contradictory.
///
/// Examples are a non finite cost value, a relative target outside `[0, 1]`
/// or a planning unit that is locked both in and out. Presolve findings are
/// deliberately *not* represented with this error: those are advisory
/// warnings, collected in a report.
#[derive(Debug, Eq, PartialEq)]
pub struct InvalidSpecificationError {
    description: String,
}

impl InvalidSpecificationError {
    /// Wrap a text in an `InvalidSpecificationError`.
    ///
    /// # Arguments
    ///
    /// * `description`: A human-readable text meant for the end user.
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into() }
    }

    /// The human-readable description of what is wrong.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Display for InvalidSpecificationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidSpecificationError: {}", self.description)
    }
}

impl Error for InvalidSpecificationError {}
