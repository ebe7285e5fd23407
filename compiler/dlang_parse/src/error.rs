//! Parse error types.

use dlang_syntax::{Span, TokenKind};
use smallvec::SmallVec;
use std::fmt;

/// A syntax error: what the parser expected and what it found.
///
/// Errors never abort the parse; the offending tokens end up inside an
/// `Error` node and parsing resumes at the next synchronization point.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxError {
    pub span: Span,
    pub found: TokenKind,
    /// Descriptions of what would have been accepted here. Kept short;
    /// one entry per alternative the grammar allows.
    pub expected: SmallVec<[&'static str; 4]>,
    /// Rule the parser was inside when the error surfaced.
    pub while_parsing: &'static str,
}

impl SyntaxError {
    pub fn new(
        span: Span,
        found: TokenKind,
        expected: impl IntoIterator<Item = &'static str>,
        while_parsing: &'static str,
    ) -> Self {
        SyntaxError {
            span,
            found,
            expected: expected.into_iter().collect(),
            while_parsing,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected ")?;
        match self.expected.as_slice() {
            [] => write!(f, "something else")?,
            [one] => write!(f, "{one}")?,
            [init @ .., last] => {
                for e in init {
                    write!(f, "{e}, ")?;
                }
                write!(f, "or {last}")?;
            }
        }
        write!(
            f,
            ", found {} while parsing {} at {}",
            self.found.describe(),
            self.while_parsing,
            self.span
        )
    }
}

impl std::error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_alternatives() {
        let err = SyntaxError::new(
            Span::new(4, 5),
            TokenKind::Semicolon,
            ["an expression", "a type"],
            "an if condition",
        );
        assert_eq!(
            err.to_string(),
            "expected an expression, or a type, found ; while parsing an if condition at 4..5"
        );
    }
}
