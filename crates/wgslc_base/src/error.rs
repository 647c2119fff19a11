//! The diagnostic type shared by every stage of the front end.
//!
//! A failed compilation produces exactly one [`SpannedError`]: the lexer's
//! error tokens, the parser's expected/actual mismatches, and the gather
//! pass's semantic failures all end up here. The span points at the
//! offending source range; callers render `line:column: message` using the
//! position stored in the span.
//!
//! ```
//! use wgslc_base::{SpannedError, SourcePosition, SourceSpan};
//!
//! let at = SourceSpan::at(SourcePosition::new(14, 2, 3));
//! let err = SpannedError::new("Expected identifier, got '{'", at);
//! assert_eq!(err.to_string(), "2:3: Expected identifier, got '{'");
//! ```

use crate::span::SourceSpan;
use std::fmt;

/// An error annotated with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Where in the source it went wrong.
    pub span: SourceSpan,
}

impl SpannedError {
    /// Creates an error with the given message and location.
    pub fn new(message: impl Into<String>, span: SourceSpan) -> Self {
        Self { message: message.into(), span }
    }
}

impl fmt::Display for SpannedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.span.start.line, self.span.start.column, self.message)
    }
}

impl std::error::Error for SpannedError {}

/// Alias for `std::result::Result<T, SpannedError>`.
///
/// The return type of every fallible operation in the front end.
pub type Result<T> = std::result::Result<T, SpannedError>;
