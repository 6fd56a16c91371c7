//! Recoverable parse errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors. The error handling for parse errors
//! is well-defined."
//!
//! A parse error never stops the parser. The tokenizer and tree builder apply
//! the defined recovery and carry on; the error is only recorded here, and only
//! when the caller asked for tracking.

use std::fmt;

/// A single recoverable parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}: {message}")]
pub struct ParseError {
    /// Character offset into the input where the error was noticed.
    pub position: usize,
    /// Human readable description.
    pub message: String,
}

impl ParseError {
    /// Create a new error at `position`.
    #[must_use]
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// A capacity-bounded list of parse errors.
///
/// Capacity 0 (the default) disables tracking entirely, which keeps the hot
/// parsing path free of string formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseErrorList {
    capacity: usize,
    errors: Vec<ParseError>,
}

impl ParseErrorList {
    /// A list that records nothing.
    #[must_use]
    pub const fn no_tracking() -> Self {
        Self {
            capacity: 0,
            errors: Vec::new(),
        }
    }

    /// A list that records up to `capacity` errors.
    #[must_use]
    pub const fn tracking(capacity: usize) -> Self {
        Self {
            capacity,
            errors: Vec::new(),
        }
    }

    /// True while another error would still be recorded.
    #[must_use]
    pub fn can_add_error(&self) -> bool {
        self.errors.len() < self.capacity
    }

    /// Maximum number of errors kept.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.capacity
    }

    /// Record an error if there is room. Returns whether it was kept.
    pub fn push(&mut self, error: ParseError) -> bool {
        if self.can_add_error() {
            self.errors.push(error);
            true
        } else {
            false
        }
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate recorded errors in the order they were found.
    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    /// Drop every recorded error, keeping the capacity.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl<'a> IntoIterator for &'a ParseErrorList {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ParseErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_tracks_nothing() {
        let mut errors = ParseErrorList::default();
        assert!(!errors.push(ParseError::new(0, "unexpected")));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_capacity_is_respected() {
        let mut errors = ParseErrorList::tracking(2);
        assert!(errors.push(ParseError::new(1, "a")));
        assert!(errors.push(ParseError::new(2, "b")));
        assert!(!errors.push(ParseError::new(3, "c")));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.iter().next().map(|e| e.position), Some(1));
    }

    #[test]
    fn test_display_includes_position() {
        let error = ParseError::new(7, "Unexpected token");
        assert_eq!(error.to_string(), "7: Unexpected token");
    }
}
