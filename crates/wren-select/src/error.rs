//! Errors raised while parsing a selector query.

use thiserror::Error;

/// A selector query that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorParseError {
    /// The query, or the part of it after a combinator, was blank.
    #[error("selector query must not be empty")]
    Empty,

    /// No simple selector or pseudo-class starts at `remainder`.
    #[error("could not parse query '{query}': unexpected token at '{remainder}'")]
    UnexpectedToken {
        /// The query being parsed.
        query: String,
        /// Unconsumed input at the point of failure.
        remainder: String,
    },

    /// A `(`, `[` or quote was never closed.
    #[error("did not find balanced marker at '{0}'")]
    Unbalanced(String),

    /// An identifier, argument or attribute key that must be non-empty was blank.
    #[error("{0} must not be empty")]
    EmptyArgument(&'static str),

    /// An attribute selector with an unknown operator.
    #[error("could not parse attribute query '{query}': unexpected token at '{remainder}'")]
    InvalidAttribute {
        /// The query being parsed.
        query: String,
        /// Text following the attribute key.
        remainder: String,
    },

    /// `:lt()`, `:gt()` and `:eq()` take a non-negative integer.
    #[error("index must be numeric, got '{0}'")]
    InvalidIndex(String),

    /// `:nth-*()` arguments take the form `odd`, `even`, `an+b` or `b`.
    #[error("could not parse nth-index '{0}': unexpected format")]
    InvalidNth(String),

    /// A `:matches()` or `[attr~=regex]` pattern that does not compile.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidRegex {
        /// The pattern as written.
        pattern: String,
        /// The regex compiler's message.
        message: String,
    },

    /// `consume_seq` was asked for text that is not next in the queue.
    #[error("expected '{expected}' at '{remainder}'")]
    Expected {
        /// The sequence that should have followed.
        expected: String,
        /// Unconsumed input.
        remainder: String,
    },
}
