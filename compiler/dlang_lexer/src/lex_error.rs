//! Lexer error records.
//!
//! The scanner never fails: every lexical problem becomes a token (marked
//! with `TokenFlags::LEX_ERROR` or `TokenKind::ErrorToken`) plus one of
//! these records. The parser keeps going; diagnostics render later.

use dlang_syntax::Span;
use std::fmt;

/// A lexical error with its source location.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

impl LexError {
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }
}

/// What kind of lexical error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    // === Unterminated forms ===
    /// Missing closing quote for a string literal (any form).
    UnterminatedString,
    /// Missing closing `'` for a character literal.
    UnterminatedChar,
    /// `/*` comment reaching end of file.
    UnterminatedBlockComment,
    /// `/+` comment reaching end of file (at any nesting depth).
    UnterminatedNestingComment,
    /// `q{` token string reaching end of file.
    UnterminatedTokenString,

    // === Content errors ===
    /// Unknown escape sequence in a double-quoted string or char literal.
    InvalidEscape { escape_char: char },
    /// `\x`, `\u` or `\U` with too few hex digits.
    TruncatedHexEscape,
    /// `&name;` named entity that is not recognized.
    UnknownNamedEntity,
    /// Empty character literal `''`.
    EmptyCharLiteral,
    /// More than one character in a character literal.
    MultiCharLiteral,
    /// Non-hex character inside `x"..."`.
    InvalidHexStringChar { found: char },
    /// Odd number of hex digits inside `x"..."`.
    OddHexStringLength,
    /// Radix prefix with no digits after it (`0x`, `0b`).
    MissingDigits { radix: u8 },
    /// Hex float without the mandatory `p` exponent.
    MissingHexExponent,
    /// Exponent whose digits do not start with a decimal digit
    /// (`1e_5`, `1.2e_`).
    MalformedExponent,

    // === Byte-level errors ===
    /// Byte that can start no token.
    InvalidByte { byte: u8 },
    /// Interior NUL byte.
    InteriorNull,
    /// Source is not valid UTF-8 at this offset.
    InvalidUtf8,
    /// UTF-16 byte order mark; only UTF-8 input is supported.
    UnsupportedEncoding,

    // === Directive errors ===
    /// `#` that begins neither a shebang nor a `#line` directive.
    StrayHash,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnterminatedChar => write!(f, "unterminated character literal"),
            LexErrorKind::UnterminatedBlockComment => write!(f, "unterminated /* comment"),
            LexErrorKind::UnterminatedNestingComment => write!(f, "unterminated /+ comment"),
            LexErrorKind::UnterminatedTokenString => write!(f, "unterminated q{{ token string"),
            LexErrorKind::InvalidEscape { escape_char } => {
                write!(f, "invalid escape sequence `\\{escape_char}`")
            }
            LexErrorKind::TruncatedHexEscape => write!(f, "truncated hex escape sequence"),
            LexErrorKind::UnknownNamedEntity => write!(f, "unknown named character entity"),
            LexErrorKind::EmptyCharLiteral => write!(f, "empty character literal"),
            LexErrorKind::MultiCharLiteral => {
                write!(f, "character literal contains more than one character")
            }
            LexErrorKind::InvalidHexStringChar { found } => {
                write!(f, "invalid character `{found}` in hex string")
            }
            LexErrorKind::OddHexStringLength => {
                write!(f, "hex string must contain an even number of hex digits")
            }
            LexErrorKind::MissingDigits { radix } => {
                write!(f, "radix-{radix} literal has no digits")
            }
            LexErrorKind::MissingHexExponent => {
                write!(f, "hex float requires a `p` exponent")
            }
            LexErrorKind::MalformedExponent => {
                write!(f, "exponent must start with a digit")
            }
            LexErrorKind::InvalidByte { byte } => write!(f, "invalid byte 0x{byte:02x}"),
            LexErrorKind::InteriorNull => write!(f, "interior null byte"),
            LexErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8"),
            LexErrorKind::UnsupportedEncoding => {
                write!(f, "UTF-16 input is not supported; re-encode as UTF-8")
            }
            LexErrorKind::StrayHash => write!(f, "`#` does not begin a directive here"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}
