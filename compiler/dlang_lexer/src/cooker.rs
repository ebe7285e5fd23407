//! Token cooking layer.
//!
//! Transforms `(RawTag, len)` pairs from the raw scanner into the parser's
//! `TokenKind` values with keyword resolution and literal validation:
//!
//! ```text
//! source → RawScanner → (RawTag, len) → TokenCooker → TokenKind
//! ```
//!
//! Each `RawTag` category has a dedicated cooking path:
//! - **Operators/delimiters**: direct 1:1 mapping
//! - **Identifiers**: keyword lookup, keywords always win
//! - **Numerics**: radix digit presence, hex float exponent
//! - **Strings/chars**: escape validation, hex-string content checks
//! - **Errors**: push a `LexError`; unterminated literals and comments
//!   keep the kind they were headed for so the parser still sees a
//!   literal (or trivia), while invalid bytes become `ErrorToken`
//!
//! Cooking never rejects a token: the kind that comes back always tiles
//! the same bytes the raw token did.

use dlang_lexer_core::RawTag;
use dlang_syntax::{Span, TokenKind};

use crate::keywords;
use crate::lex_error::{LexError, LexErrorKind};

/// Cooks raw tokens into parser-ready `TokenKind` values.
///
/// Stateless per token; accumulates errors for the whole file.
pub(crate) struct TokenCooker {
    errors: Vec<LexError>,
    errors_before_cook: usize,
}

impl TokenCooker {
    pub(crate) fn new() -> Self {
        TokenCooker {
            errors: Vec::new(),
            errors_before_cook: 0,
        }
    }

    pub(crate) fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    /// Whether the most recent `cook()` call pushed an error. The driver
    /// loop uses this to set `TokenFlags::LEX_ERROR`.
    pub(crate) fn last_cook_had_error(&self) -> bool {
        self.errors.len() > self.errors_before_cook
    }

    /// Cook one raw token. `slice` is the token's source text, `offset`
    /// its byte position.
    pub(crate) fn cook(&mut self, tag: RawTag, offset: u32, slice: &str) -> TokenKind {
        self.errors_before_cook = self.errors.len();
        match tag {
            RawTag::Ident => keywords::lookup(slice).unwrap_or(TokenKind::Identifier),

            // Numerics
            RawTag::DecInt => TokenKind::IntLiteral,
            RawTag::BinInt => {
                if !slice[2..].bytes().any(|b| b == b'0' || b == b'1') {
                    self.error(offset, slice, LexErrorKind::MissingDigits { radix: 2 });
                }
                TokenKind::IntLiteral
            }
            RawTag::HexInt => {
                if !slice[2..].bytes().any(|b| b.is_ascii_hexdigit()) {
                    self.error(offset, slice, LexErrorKind::MissingDigits { radix: 16 });
                }
                TokenKind::IntLiteral
            }
            RawTag::Float => {
                self.validate_exponent(offset, slice, b'e', b'E');
                TokenKind::FloatLiteral
            }
            RawTag::HexFloat => {
                if slice.bytes().any(|b| b == b'p' || b == b'P') {
                    self.validate_exponent(offset, slice, b'p', b'P');
                } else {
                    self.error(offset, slice, LexErrorKind::MissingHexExponent);
                }
                TokenKind::FloatLiteral
            }

            // Strings and chars
            RawTag::Char => self.cook_char(offset, slice),
            RawTag::DqString => {
                let content = string_content(slice, b'"');
                self.validate_escapes(offset + 1, content);
                TokenKind::DqStringLiteral
            }
            RawTag::WysiwygString => TokenKind::WysiwygStringLiteral,
            RawTag::BacktickString => TokenKind::BacktickStringLiteral,
            RawTag::HexString => {
                self.validate_hex_string(offset, slice);
                TokenKind::HexStringLiteral
            }
            RawTag::DelimitedString => TokenKind::DelimitedStringLiteral,
            RawTag::TokenString => TokenKind::TokenStringLiteral,

            // Operators and delimiters
            RawTag::Slash => TokenKind::Slash,
            RawTag::DivAssign => TokenKind::DivAssign,
            RawTag::Dot => TokenKind::Dot,
            RawTag::DotDot => TokenKind::DotDot,
            RawTag::Ellipsis => TokenKind::Ellipsis,
            RawTag::Amp => TokenKind::Amp,
            RawTag::AmpAssign => TokenKind::AmpAssign,
            RawTag::AmpAmp => TokenKind::AmpAmp,
            RawTag::Pipe => TokenKind::Pipe,
            RawTag::PipeAssign => TokenKind::PipeAssign,
            RawTag::PipePipe => TokenKind::PipePipe,
            RawTag::Minus => TokenKind::Minus,
            RawTag::MinusAssign => TokenKind::MinusAssign,
            RawTag::MinusMinus => TokenKind::MinusMinus,
            RawTag::Plus => TokenKind::Plus,
            RawTag::PlusAssign => TokenKind::PlusAssign,
            RawTag::PlusPlus => TokenKind::PlusPlus,
            RawTag::Less => TokenKind::Less,
            RawTag::LessEq => TokenKind::LessEq,
            RawTag::Shl => TokenKind::Shl,
            RawTag::ShlAssign => TokenKind::ShlAssign,
            RawTag::Greater => TokenKind::Greater,
            RawTag::GreaterEq => TokenKind::GreaterEq,
            RawTag::Shr => TokenKind::Shr,
            RawTag::ShrAssign => TokenKind::ShrAssign,
            RawTag::Ushr => TokenKind::Ushr,
            RawTag::UshrAssign => TokenKind::UshrAssign,
            RawTag::Bang => TokenKind::Bang,
            RawTag::BangEq => TokenKind::BangEq,
            RawTag::LeftParen => TokenKind::LeftParen,
            RawTag::RightParen => TokenKind::RightParen,
            RawTag::LeftBracket => TokenKind::LeftBracket,
            RawTag::RightBracket => TokenKind::RightBracket,
            RawTag::LeftBrace => TokenKind::LeftBrace,
            RawTag::RightBrace => TokenKind::RightBrace,
            RawTag::Question => TokenKind::Question,
            RawTag::Comma => TokenKind::Comma,
            RawTag::Semicolon => TokenKind::Semicolon,
            RawTag::Colon => TokenKind::Colon,
            RawTag::Dollar => TokenKind::Dollar,
            RawTag::Assign => TokenKind::Assign,
            RawTag::EqEq => TokenKind::EqEq,
            RawTag::FatArrow => TokenKind::FatArrow,
            RawTag::Star => TokenKind::Star,
            RawTag::StarAssign => TokenKind::StarAssign,
            RawTag::Percent => TokenKind::Percent,
            RawTag::PercentAssign => TokenKind::PercentAssign,
            RawTag::Caret => TokenKind::Caret,
            RawTag::CaretAssign => TokenKind::CaretAssign,
            RawTag::Pow => TokenKind::Pow,
            RawTag::PowAssign => TokenKind::PowAssign,
            RawTag::Tilde => TokenKind::Tilde,
            RawTag::TildeAssign => TokenKind::TildeAssign,
            RawTag::At => TokenKind::At,

            RawTag::Hash => {
                self.error(offset, slice, LexErrorKind::StrayHash);
                TokenKind::ErrorToken
            }

            // Trivia
            RawTag::Whitespace => TokenKind::Whitespace,
            RawTag::Newline => TokenKind::Newline,
            RawTag::LineComment => TokenKind::LineComment,
            RawTag::BlockComment => TokenKind::BlockComment,
            RawTag::NestingBlockComment => TokenKind::NestingBlockComment,
            RawTag::LineDirective => TokenKind::LineDirective,
            RawTag::Shebang => TokenKind::Shebang,
            RawTag::Bom => TokenKind::Bom,

            // Scanner-detected errors
            RawTag::InvalidByte => {
                let byte = slice.as_bytes().first().copied().unwrap_or(0);
                self.error(offset, slice, LexErrorKind::InvalidByte { byte });
                TokenKind::ErrorToken
            }
            // Unterminated forms keep the kind they were headed for:
            // a run-on string is still a string to the parser, and a
            // run-on comment is still trivia.
            RawTag::UnterminatedString => {
                self.error(offset, slice, LexErrorKind::UnterminatedString);
                unterminated_string_kind(slice)
            }
            RawTag::UnterminatedChar => {
                self.error(offset, slice, LexErrorKind::UnterminatedChar);
                TokenKind::CharLiteral
            }
            RawTag::UnterminatedBlockComment => {
                self.error(offset, slice, LexErrorKind::UnterminatedBlockComment);
                TokenKind::BlockComment
            }
            RawTag::UnterminatedNestingComment => {
                self.error(offset, slice, LexErrorKind::UnterminatedNestingComment);
                TokenKind::NestingBlockComment
            }
            RawTag::UnterminatedTokenString => {
                self.error(offset, slice, LexErrorKind::UnterminatedTokenString);
                TokenKind::TokenStringLiteral
            }
            RawTag::InteriorNull => {
                self.error(offset, slice, LexErrorKind::InteriorNull);
                TokenKind::ErrorToken
            }

            RawTag::Eof => TokenKind::Eof,
        }
    }

    fn error(&mut self, offset: u32, slice: &str, kind: LexErrorKind) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "token slices come from a u32-indexed buffer"
        )]
        let span = Span::new(offset, offset + slice.len() as u32);
        self.errors.push(LexError::new(span, kind));
    }

    /// Exponent digits must start with a decimal digit: the scanner
    /// accepts `1e_5` and `1e+_5` as one token, but D rejects them.
    fn validate_exponent(&mut self, offset: u32, slice: &str, lo: u8, hi: u8) {
        let bytes = slice.as_bytes();
        let Some(pos) = bytes.iter().position(|&b| b == lo || b == hi) else {
            return;
        };
        let mut after = pos + 1;
        if matches!(bytes.get(after), Some(b'+' | b'-')) {
            after += 1;
        }
        if !matches!(bytes.get(after), Some(b) if b.is_ascii_digit()) {
            self.error(offset, slice, LexErrorKind::MalformedExponent);
        }
    }

    fn cook_char(&mut self, offset: u32, slice: &str) -> TokenKind {
        // Terminated char literal: at least the two quotes.
        let content = &slice[1..slice.len() - 1];
        if content.is_empty() {
            self.error(offset, slice, LexErrorKind::EmptyCharLiteral);
        } else {
            let chars = self.validate_escapes(offset + 1, content);
            if chars > 1 {
                self.error(offset, slice, LexErrorKind::MultiCharLiteral);
            }
        }
        TokenKind::CharLiteral
    }

    fn validate_hex_string(&mut self, offset: u32, slice: &str) {
        let content = string_content(slice, b'"');
        let mut digits = 0usize;
        for c in content.chars() {
            if c.is_ascii_hexdigit() {
                digits += 1;
            } else if !matches!(c, ' ' | '\t' | '\r' | '\n') {
                self.error(offset, slice, LexErrorKind::InvalidHexStringChar { found: c });
                return;
            }
        }
        if digits % 2 != 0 {
            self.error(offset, slice, LexErrorKind::OddHexStringLength);
        }
    }

    /// Walk the content of a double-quoted string or char literal,
    /// validating every escape sequence. Returns the number of logical
    /// characters (each escape counts as one).
    fn validate_escapes(&mut self, base: u32, content: &str) -> usize {
        let mut chars = content.char_indices().peekable();
        let mut logical = 0usize;
        while let Some((i, c)) = chars.next() {
            logical += 1;
            if c != '\\' {
                continue;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "content offsets fit in u32 alongside the buffer"
            )]
            let at = base + i as u32;
            let Some(&(_, esc)) = chars.peek() else {
                // Trailing backslash with nothing to escape.
                self.errors.push(LexError::new(
                    Span::new(at, at + 1),
                    LexErrorKind::InvalidEscape { escape_char: '\\' },
                ));
                continue;
            };
            chars.next();
            match esc {
                '\'' | '"' | '?' | '\\' | 'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' => {}
                '0'..='7' => {
                    // Up to three octal digits total.
                    for _ in 0..2 {
                        if matches!(chars.peek(), Some(&(_, d)) if ('0'..='7').contains(&d)) {
                            chars.next();
                        }
                    }
                }
                'x' => self.eat_hex_digits(&mut chars, at, 2),
                'u' => self.eat_hex_digits(&mut chars, at, 4),
                'U' => self.eat_hex_digits(&mut chars, at, 8),
                '&' => {
                    // Named entity: `\&name;`.
                    let mut closed = false;
                    while let Some(&(_, d)) = chars.peek() {
                        if d == ';' {
                            chars.next();
                            closed = true;
                            break;
                        }
                        if !d.is_ascii_alphanumeric() {
                            break;
                        }
                        chars.next();
                    }
                    if !closed {
                        self.errors.push(LexError::new(
                            Span::new(at, at + 2),
                            LexErrorKind::UnknownNamedEntity,
                        ));
                    }
                }
                other => {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "char utf8 length is at most 4"
                    )]
                    let len = 1 + other.len_utf8() as u32;
                    self.errors.push(LexError::new(
                        Span::new(at, at + len),
                        LexErrorKind::InvalidEscape { escape_char: other },
                    ));
                }
            }
        }
        logical
    }

    fn eat_hex_digits(
        &mut self,
        chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
        at: u32,
        want: usize,
    ) {
        let mut got = 0;
        while got < want {
            match chars.peek() {
                Some(&(_, d)) if d.is_ascii_hexdigit() => {
                    chars.next();
                    got += 1;
                }
                _ => break,
            }
        }
        if got < want {
            self.errors.push(LexError::new(
                Span::new(at, at + 2),
                LexErrorKind::TruncatedHexEscape,
            ));
        }
    }
}

/// The literal kind an unterminated string form was headed for, keyed
/// by its opening byte.
fn unterminated_string_kind(slice: &str) -> TokenKind {
    match slice.as_bytes().first() {
        Some(b'r') => TokenKind::WysiwygStringLiteral,
        Some(b'`') => TokenKind::BacktickStringLiteral,
        Some(b'x') => TokenKind::HexStringLiteral,
        Some(b'q') => TokenKind::DelimitedStringLiteral,
        _ => TokenKind::DqStringLiteral,
    }
}

/// Content between the quotes of a string form, with any `c`/`w`/`d`
/// postfix stripped. `quote` is the closing delimiter byte.
fn string_content(slice: &str, quote: u8) -> &str {
    let bytes = slice.as_bytes();
    let mut end = bytes.len();
    if end >= 2 && matches!(bytes[end - 1], b'c' | b'w' | b'd') && bytes[end - 2] == quote {
        end -= 1;
    }
    // Skip the opening prefix up to and including the first quote.
    let open = bytes
        .iter()
        .position(|&b| b == quote)
        .map_or(0, |p| p + 1);
    let close = end.saturating_sub(1).max(open);
    &slice[open..close]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cook_one(tag: RawTag, slice: &str) -> (TokenKind, Vec<LexError>) {
        let mut cooker = TokenCooker::new();
        let kind = cooker.cook(tag, 0, slice);
        (kind, cooker.into_errors())
    }

    #[test]
    fn keywords_dominate_identifiers() {
        assert_eq!(cook_one(RawTag::Ident, "while").0, TokenKind::While);
        assert_eq!(cook_one(RawTag::Ident, "whileX").0, TokenKind::Identifier);
        assert_eq!(cook_one(RawTag::Ident, "__traits").0, TokenKind::Traits);
    }

    #[test]
    fn valid_escapes_pass() {
        let (kind, errors) = cook_one(RawTag::DqString, r#""a\n\t\\\"\x41\u0041\U00000041\&amp;b""#);
        assert_eq!(kind, TokenKind::DqStringLiteral);
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn invalid_escape_is_reported() {
        let (kind, errors) = cook_one(RawTag::DqString, r#""bad\q""#);
        assert_eq!(kind, TokenKind::DqStringLiteral);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            LexErrorKind::InvalidEscape { escape_char: 'q' }
        );
        assert_eq!(errors[0].span, Span::new(4, 6));
    }

    #[test]
    fn truncated_hex_escape() {
        let (_, errors) = cook_one(RawTag::DqString, r#""\x4""#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::TruncatedHexEscape);
    }

    #[test]
    fn wysiwyg_backslashes_are_literal() {
        let (kind, errors) = cook_one(RawTag::WysiwygString, r#"r"c:\n\path""#);
        assert_eq!(kind, TokenKind::WysiwygStringLiteral);
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn string_postfix_is_stripped_before_validation() {
        let (_, errors) = cook_one(RawTag::DqString, r#""ok\n"c"#);
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn char_literals() {
        assert_eq!(cook_one(RawTag::Char, "'a'").1, vec![]);
        assert_eq!(cook_one(RawTag::Char, r"'\n'").1, vec![]);
        assert_eq!(cook_one(RawTag::Char, r"'\u0041'").1, vec![]);
        assert_eq!(
            cook_one(RawTag::Char, "''").1[0].kind,
            LexErrorKind::EmptyCharLiteral
        );
        assert_eq!(
            cook_one(RawTag::Char, "'ab'").1[0].kind,
            LexErrorKind::MultiCharLiteral
        );
    }

    #[test]
    fn hex_string_validation() {
        assert_eq!(cook_one(RawTag::HexString, "x\"DE AD be ef\"").1, vec![]);
        assert_eq!(
            cook_one(RawTag::HexString, "x\"ABC\"").1[0].kind,
            LexErrorKind::OddHexStringLength
        );
        assert_eq!(
            cook_one(RawTag::HexString, "x\"zz\"").1[0].kind,
            LexErrorKind::InvalidHexStringChar { found: 'z' }
        );
    }

    #[test]
    fn radix_literals_need_digits() {
        assert_eq!(cook_one(RawTag::HexInt, "0xFF").1, vec![]);
        assert_eq!(cook_one(RawTag::BinInt, "0b1010").1, vec![]);
        assert_eq!(
            cook_one(RawTag::BinInt, "0b_").1[0].kind,
            LexErrorKind::MissingDigits { radix: 2 }
        );
    }

    #[test]
    fn exponent_digits_must_start_with_a_digit() {
        assert_eq!(cook_one(RawTag::Float, "1e5").1, vec![]);
        assert_eq!(cook_one(RawTag::Float, "1_000.5e+3_0").1, vec![]);
        assert_eq!(cook_one(RawTag::Float, "1.5").1, vec![]);
        assert_eq!(
            cook_one(RawTag::Float, "1e_1_").1[0].kind,
            LexErrorKind::MalformedExponent
        );
        assert_eq!(
            cook_one(RawTag::Float, "1.2e_").1[0].kind,
            LexErrorKind::MalformedExponent
        );
        assert_eq!(cook_one(RawTag::HexFloat, "0x1.8p3").1, vec![]);
        assert_eq!(
            cook_one(RawTag::HexFloat, "0x1p_3").1[0].kind,
            LexErrorKind::MalformedExponent
        );
    }

    #[test]
    fn unterminated_forms_keep_their_literal_kind() {
        let (kind, errors) = cook_one(RawTag::UnterminatedString, "\"abc");
        assert_eq!(kind, TokenKind::DqStringLiteral);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(
            cook_one(RawTag::UnterminatedString, "`raw").0,
            TokenKind::BacktickStringLiteral
        );
        assert_eq!(
            cook_one(RawTag::UnterminatedChar, "'a").0,
            TokenKind::CharLiteral
        );
        assert_eq!(
            cook_one(RawTag::UnterminatedBlockComment, "/* open").0,
            TokenKind::BlockComment
        );
        assert_eq!(cook_one(RawTag::InvalidByte, "\u{1}").0, TokenKind::ErrorToken);
    }
}
