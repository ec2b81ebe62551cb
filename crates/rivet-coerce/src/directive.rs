//! Per-site value directives.

use rivet_common::constants::DEFAULT_DELIMITER;

/// Instruction attached to a parameter or field: an expression that is
/// either a value-store key or a literal, and the delimiter used to split
/// it into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDirective {
    expression: String,
    delimiter: String,
}

impl ValueDirective {
    /// Creates a directive with the default `","` delimiter.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            delimiter: DEFAULT_DELIMITER.to_owned(),
        }
    }

    /// Replaces the delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Returns the key-or-literal expression.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the token delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}
