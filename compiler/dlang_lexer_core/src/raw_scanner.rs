//! Hand-written raw scanner producing `(RawTag, len)` pairs.
//!
//! The scanner operates on a sentinel-terminated [`Cursor`] and produces
//! [`RawToken`] values with zero heap allocation. It does not resolve
//! keywords, validate escapes, or parse numeric values — those are deferred
//! to the cooking layer.
//!
//! # Design
//!
//! Main dispatch covers all 256 byte values with maximal munch: each arm
//! consumes the longest match for its lead byte (`>>>=` before `>>>` before
//! `>>` before `>`). Error conditions (unterminated literals, invalid
//! bytes) are encoded as `RawTag` variants, not as `Result::Err`, so the
//! scanner always makes progress and always terminates.
//!
//! The one place lexing re-enters itself is the token string `q{...}`:
//! its body is scanned with the full token grammar, tracking brace depth,
//! so an unterminated nested `{` cannot falsely terminate the literal.

use crate::cursor::Cursor;
use crate::tag::{RawTag, RawToken};

/// Pure, allocation-free scanner.
///
/// Produces one token at a time as a `(tag, length)` pair.
pub struct RawScanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> RawScanner<'a> {
    /// Create a new scanner from a cursor.
    pub fn new(cursor: Cursor<'a>) -> Self {
        Self { cursor }
    }

    /// Produce the next raw token.
    ///
    /// Returns `RawTag::Eof` with `len == 0` when the source is exhausted.
    /// Subsequent calls after EOF continue to return `Eof`.
    pub fn next_token(&mut self) -> RawToken {
        let start = self.cursor.pos();

        // UTF-8 BOM is only recognized at offset 0; elsewhere 0xEF starts
        // an ordinary (non-ASCII) identifier character.
        if start == 0
            && self.cursor.current() == 0xEF
            && self.cursor.peek() == 0xBB
            && self.cursor.peek2() == 0xBF
        {
            self.cursor.advance_n(3);
            return self.token(start, RawTag::Bom);
        }

        match self.cursor.current() {
            0 => self.eof(),
            b' ' | b'\t' | 0x0B | 0x0C => self.whitespace(start),
            b'\r' => self.carriage_return(start),
            b'\n' => self.newline(start),
            b'r' if self.cursor.peek() == b'"' => self.wysiwyg_string(start),
            b'x' if self.cursor.peek() == b'"' => self.hex_string(start),
            b'q' if self.cursor.peek() == b'"' => self.delimited_string(start),
            b'q' if self.cursor.peek() == b'{' => self.token_string(start),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
            b'0'..=b'9' => self.number(start),
            b'"' => self.dq_string(start),
            b'`' => self.backtick_string(start),
            b'\'' => self.char_literal(start),
            b'/' => self.slash(start),
            b'.' => self.dot(start),
            b'&' => self.ampersand(start),
            b'|' => self.pipe(start),
            b'-' => self.minus(start),
            b'+' => self.plus(start),
            b'<' => self.less(start),
            b'>' => self.greater(start),
            b'!' => self.bang(start),
            b'=' => self.equal(start),
            b'*' => self.with_assign(start, RawTag::Star, RawTag::StarAssign),
            b'%' => self.with_assign(start, RawTag::Percent, RawTag::PercentAssign),
            b'^' => self.caret(start),
            b'~' => self.with_assign(start, RawTag::Tilde, RawTag::TildeAssign),
            b'(' => self.single(start, RawTag::LeftParen),
            b')' => self.single(start, RawTag::RightParen),
            b'[' => self.single(start, RawTag::LeftBracket),
            b']' => self.single(start, RawTag::RightBracket),
            b'{' => self.single(start, RawTag::LeftBrace),
            b'}' => self.single(start, RawTag::RightBrace),
            b'?' => self.single(start, RawTag::Question),
            b',' => self.single(start, RawTag::Comma),
            b';' => self.single(start, RawTag::Semicolon),
            b':' => self.single(start, RawTag::Colon),
            b'$' => self.single(start, RawTag::Dollar),
            b'@' => self.single(start, RawTag::At),
            b'#' => self.hash(start),
            // `\` begins no D token; backslashes only occur inside the
            // string and char literal arms as escape introducers.
            b'\\' => self.invalid_byte(start),
            // Multi-byte UTF-8 lead bytes: identifier-start candidates.
            // The cooking layer validates the Unicode letter classes.
            0xC0..=0xF7 => self.identifier(start),
            // Control chars (minus handled whitespace), DEL, stray
            // continuation bytes, invalid lead bytes.
            1..=8 | 14..=31 | 127..=191 | 0xF8..=0xFF => self.invalid_byte(start),
        }
    }

    #[inline]
    fn token(&self, start: u32, tag: RawTag) -> RawToken {
        RawToken {
            tag,
            len: self.cursor.pos() - start,
        }
    }

    // ─── EOF ─────────────────────────────────────────────────────────────

    fn eof(&mut self) -> RawToken {
        if self.cursor.is_eof() {
            RawToken {
                tag: RawTag::Eof,
                len: 0,
            }
        } else {
            // Interior null byte — advance past it. SourceBuffer already
            // reported these via encoding_issues().
            let start = self.cursor.pos();
            self.cursor.advance();
            self.token(start, RawTag::InteriorNull)
        }
    }

    // ─── Whitespace & newlines ───────────────────────────────────────────

    #[inline]
    fn whitespace(&mut self, start: u32) -> RawToken {
        self.cursor.eat_whitespace();
        self.token(start, RawTag::Whitespace)
    }

    fn carriage_return(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        if self.cursor.current() == b'\n' {
            self.cursor.advance();
        }
        // \r\n and lone \r are both one end-of-line
        self.token(start, RawTag::Newline)
    }

    fn newline(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        self.token(start, RawTag::Newline)
    }

    // ─── Comments ────────────────────────────────────────────────────────

    fn slash(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'/' => {
                self.cursor.eat_until_newline_or_eof();
                self.token(start, RawTag::LineComment)
            }
            b'*' => self.block_comment(start),
            b'+' => self.nesting_comment(start),
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::DivAssign)
            }
            _ => self.token(start, RawTag::Slash),
        }
    }

    fn block_comment(&mut self, start: u32) -> RawToken {
        self.cursor.advance(); // consume '*'
        loop {
            match self.cursor.skip_to_byte(b'*') {
                b'*' => {
                    if self.cursor.peek() == b'/' {
                        self.cursor.advance_n(2);
                        return self.token(start, RawTag::BlockComment);
                    }
                    self.cursor.advance();
                }
                _ => return self.token(start, RawTag::UnterminatedBlockComment),
            }
        }
    }

    /// `/+ ... +/` — depth counter, terminates only at depth 0.
    fn nesting_comment(&mut self, start: u32) -> RawToken {
        self.cursor.advance(); // consume '+'
        let mut depth: u32 = 1;
        loop {
            match self.cursor.skip_to_byte2(b'+', b'/') {
                b'/' => {
                    if self.cursor.peek() == b'+' {
                        depth += 1;
                        self.cursor.advance_n(2);
                    } else {
                        self.cursor.advance();
                    }
                }
                b'+' => {
                    if self.cursor.peek() == b'/' {
                        depth -= 1;
                        self.cursor.advance_n(2);
                        if depth == 0 {
                            return self.token(start, RawTag::NestingBlockComment);
                        }
                    } else {
                        self.cursor.advance();
                    }
                }
                _ => return self.token(start, RawTag::UnterminatedNestingComment),
            }
        }
    }

    // ─── Identifiers ─────────────────────────────────────────────────────

    fn identifier(&mut self, start: u32) -> RawToken {
        self.cursor.advance_char();
        self.cursor.eat_while(is_ident_continue);
        self.token(start, RawTag::Ident)
    }

    // ─── Operators ───────────────────────────────────────────────────────

    fn single(&mut self, start: u32, tag: RawTag) -> RawToken {
        self.cursor.advance();
        self.token(start, tag)
    }

    /// `X` or `X=` pattern shared by `*`, `%`, `~`.
    fn with_assign(&mut self, start: u32, bare: RawTag, assign: RawTag) -> RawToken {
        self.cursor.advance();
        if self.cursor.current() == b'=' {
            self.cursor.advance();
            self.token(start, assign)
        } else {
            self.token(start, bare)
        }
    }

    fn dot(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        if self.cursor.current() == b'.' {
            self.cursor.advance();
            if self.cursor.current() == b'.' {
                self.cursor.advance();
                self.token(start, RawTag::Ellipsis)
            } else {
                self.token(start, RawTag::DotDot)
            }
        } else {
            self.token(start, RawTag::Dot)
        }
    }

    fn ampersand(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'&' => {
                self.cursor.advance();
                self.token(start, RawTag::AmpAmp)
            }
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::AmpAssign)
            }
            _ => self.token(start, RawTag::Amp),
        }
    }

    fn pipe(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'|' => {
                self.cursor.advance();
                self.token(start, RawTag::PipePipe)
            }
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::PipeAssign)
            }
            _ => self.token(start, RawTag::Pipe),
        }
    }

    fn minus(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'-' => {
                self.cursor.advance();
                self.token(start, RawTag::MinusMinus)
            }
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::MinusAssign)
            }
            _ => self.token(start, RawTag::Minus),
        }
    }

    fn plus(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'+' => {
                self.cursor.advance();
                self.token(start, RawTag::PlusPlus)
            }
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::PlusAssign)
            }
            _ => self.token(start, RawTag::Plus),
        }
    }

    fn less(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::LessEq)
            }
            b'<' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    self.token(start, RawTag::ShlAssign)
                } else {
                    self.token(start, RawTag::Shl)
                }
            }
            _ => self.token(start, RawTag::Less),
        }
    }

    fn greater(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::GreaterEq)
            }
            b'>' => {
                self.cursor.advance();
                match self.cursor.current() {
                    b'=' => {
                        self.cursor.advance();
                        self.token(start, RawTag::ShrAssign)
                    }
                    b'>' => {
                        self.cursor.advance();
                        if self.cursor.current() == b'=' {
                            self.cursor.advance();
                            self.token(start, RawTag::UshrAssign)
                        } else {
                            self.token(start, RawTag::Ushr)
                        }
                    }
                    _ => self.token(start, RawTag::Shr),
                }
            }
            _ => self.token(start, RawTag::Greater),
        }
    }

    fn bang(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        if self.cursor.current() == b'=' {
            self.cursor.advance();
            self.token(start, RawTag::BangEq)
        } else {
            self.token(start, RawTag::Bang)
        }
    }

    fn equal(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::EqEq)
            }
            b'>' => {
                self.cursor.advance();
                self.token(start, RawTag::FatArrow)
            }
            _ => self.token(start, RawTag::Assign),
        }
    }

    fn caret(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'^' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    self.token(start, RawTag::PowAssign)
                } else {
                    self.token(start, RawTag::Pow)
                }
            }
            b'=' => {
                self.cursor.advance();
                self.token(start, RawTag::CaretAssign)
            }
            _ => self.token(start, RawTag::Caret),
        }
    }

    /// `#` — shebang at file start, `#line` directive anywhere a token
    /// could appear, bare `#` otherwise (error token for the cook layer).
    fn hash(&mut self, start: u32) -> RawToken {
        let at_file_start =
            start == 0 || (start == 3 && self.cursor.source_len() >= 3 && self.bom_at_zero());
        if self.cursor.peek() == b'!' && at_file_start {
            self.cursor.eat_until_newline_or_eof();
            return self.token(start, RawTag::Shebang);
        }
        if self.cursor.peek() == b'l'
            && self.cursor.peek2() == b'i'
            && self.cursor.peek_at(3) == b'n'
            && self.cursor.peek_at(4) == b'e'
            && !is_ident_continue(self.cursor.peek_at(5))
        {
            self.cursor.eat_until_newline_or_eof();
            return self.token(start, RawTag::LineDirective);
        }
        self.cursor.advance();
        self.token(start, RawTag::Hash)
    }

    fn bom_at_zero(&self) -> bool {
        self.cursor.slice(0, 3).as_bytes() == [0xEF, 0xBB, 0xBF]
    }

    // ─── Numeric literals ────────────────────────────────────────────────

    fn number(&mut self, start: u32) -> RawToken {
        let first = self.cursor.current();
        self.cursor.advance();

        if first == b'0' && matches!(self.cursor.current(), b'x' | b'X') {
            return self.hex_number(start);
        }
        if first == b'0'
            && matches!(self.cursor.current(), b'b' | b'B')
            && matches!(self.cursor.peek(), b'0' | b'1' | b'_')
        {
            self.cursor.advance();
            self.cursor
                .eat_while(|b| b == b'0' || b == b'1' || b == b'_');
            self.eat_int_suffix();
            return self.token(start, RawTag::BinInt);
        }

        self.eat_decimal_digits();

        // Fraction: dot followed by a digit. `1..2` is a range and
        // `1.foo` is member access, so only a digit commits to a float.
        let mut is_float = false;
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.eat_decimal_digits();
            is_float = true;
        }
        if matches!(self.cursor.current(), b'e' | b'E') && self.exponent_follows() {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            self.eat_decimal_digits();
            is_float = true;
        }

        // Suffix decides between int and float for suffix-only floats: 1f
        match self.cursor.current() {
            b'f' | b'F' => {
                self.cursor.advance();
                self.eat_imaginary_suffix();
                self.token(start, RawTag::Float)
            }
            b'i' if !is_ident_continue(self.cursor.peek()) => {
                self.cursor.advance();
                self.token(start, RawTag::Float)
            }
            b'L' if is_float => {
                self.cursor.advance();
                self.eat_imaginary_suffix();
                self.token(start, RawTag::Float)
            }
            _ if is_float => self.token(start, RawTag::Float),
            _ => {
                self.eat_int_suffix();
                self.token(start, RawTag::DecInt)
            }
        }
    }

    fn hex_number(&mut self, start: u32) -> RawToken {
        self.cursor.advance(); // consume 'x' or 'X'
        self.cursor
            .eat_while(|b| b.is_ascii_hexdigit() || b == b'_');

        let mut is_float = false;
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_hexdigit() {
            self.cursor.advance();
            self.cursor
                .eat_while(|b| b.is_ascii_hexdigit() || b == b'_');
            is_float = true;
        }
        // Hex floats require a binary exponent; the cooking layer reports
        // a fraction without one.
        if matches!(self.cursor.current(), b'p' | b'P') {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            self.eat_decimal_digits();
            is_float = true;
        }

        if is_float {
            if matches!(self.cursor.current(), b'f' | b'F' | b'L') {
                self.cursor.advance();
            }
            self.eat_imaginary_suffix();
            self.token(start, RawTag::HexFloat)
        } else {
            self.eat_int_suffix();
            self.token(start, RawTag::HexInt)
        }
    }

    #[inline]
    fn eat_decimal_digits(&mut self) {
        self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
    }

    /// `1e5` yes, `1echo` no: the exponent must start with a digit or a
    /// sign followed by a digit.
    fn exponent_follows(&self) -> bool {
        match self.cursor.peek() {
            b'0'..=b'9' | b'_' => true,
            b'+' | b'-' => self.cursor.peek2().is_ascii_digit(),
            _ => false,
        }
    }

    /// Integer suffix: `L`, `u`, `U`, `Lu`, `LU`, `uL`, `UL`.
    fn eat_int_suffix(&mut self) {
        match self.cursor.current() {
            b'L' => {
                self.cursor.advance();
                if matches!(self.cursor.current(), b'u' | b'U') {
                    self.cursor.advance();
                }
            }
            b'u' | b'U' => {
                self.cursor.advance();
                if self.cursor.current() == b'L' {
                    self.cursor.advance();
                }
            }
            _ => {}
        }
    }

    /// Imaginary suffix `i` (only when not continuing into an identifier).
    fn eat_imaginary_suffix(&mut self) {
        if self.cursor.current() == b'i' && !is_ident_continue(self.cursor.peek()) {
            self.cursor.advance();
        }
    }

    // ─── String literals ─────────────────────────────────────────────────

    /// `"..."` with escape sequences. May span lines.
    fn dq_string(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        loop {
            match self.cursor.skip_to_string_delim() {
                b'"' => {
                    self.cursor.advance();
                    self.eat_string_postfix();
                    return self.token(start, RawTag::DqString);
                }
                b'\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() {
                        self.cursor.advance();
                    }
                }
                _ => return self.token(start, RawTag::UnterminatedString),
            }
        }
    }

    /// `r"..."` — wysiwyg, no escapes, terminated only by `"`.
    fn wysiwyg_string(&mut self, start: u32) -> RawToken {
        self.cursor.advance_n(2); // consume r"
        if self.cursor.skip_to_byte(b'"') == b'"' {
            self.cursor.advance();
            self.eat_string_postfix();
            self.token(start, RawTag::WysiwygString)
        } else {
            self.token(start, RawTag::UnterminatedString)
        }
    }

    /// `` `...` `` — alternate wysiwyg form.
    fn backtick_string(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        if self.cursor.skip_to_byte(b'`') == b'`' {
            self.cursor.advance();
            self.eat_string_postfix();
            self.token(start, RawTag::BacktickString)
        } else {
            self.token(start, RawTag::UnterminatedString)
        }
    }

    /// `x"AB CD"` — hex pairs; content validated by the cooking layer.
    fn hex_string(&mut self, start: u32) -> RawToken {
        self.cursor.advance_n(2); // consume x"
        if self.cursor.skip_to_byte(b'"') == b'"' {
            self.cursor.advance();
            self.eat_string_postfix();
            self.token(start, RawTag::HexString)
        } else {
            self.token(start, RawTag::UnterminatedString)
        }
    }

    /// `q"(...)"`, `q"[...]"`, `q"{...}"`, `q"<...>"` with bracket nesting,
    /// `q"ident ... ident"` heredocs, and `q"/.../"` single-char delimiters.
    fn delimited_string(&mut self, start: u32) -> RawToken {
        self.cursor.advance_n(2); // consume q"
        let open = self.cursor.current();
        match open {
            b'(' => self.nesting_delimited(start, b'(', b')'),
            b'[' => self.nesting_delimited(start, b'[', b']'),
            b'{' => self.nesting_delimited(start, b'{', b'}'),
            b'<' => self.nesting_delimited(start, b'<', b'>'),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.heredoc_delimited(start),
            0 => self.token(start, RawTag::UnterminatedString),
            _ => self.char_delimited(start, open),
        }
    }

    fn nesting_delimited(&mut self, start: u32, open: u8, close: u8) -> RawToken {
        self.cursor.advance(); // consume the opening delimiter
        let mut depth: u32 = 1;
        loop {
            let b = self.cursor.skip_to_byte2(open, close);
            if b == open {
                depth += 1;
                self.cursor.advance();
            } else if b == close {
                self.cursor.advance();
                depth -= 1;
                if depth == 0 {
                    if self.cursor.current() == b'"' {
                        self.cursor.advance();
                        self.eat_string_postfix();
                        return self.token(start, RawTag::DelimitedString);
                    }
                    // Close delimiter not followed by `"` is content;
                    // keep scanning for the real terminator.
                    depth = 1;
                }
            } else {
                return self.token(start, RawTag::UnterminatedString);
            }
        }
    }

    /// `q"EOS\n ... \nEOS"` — terminated by the identifier at the start of
    /// a line, immediately followed by `"`.
    fn heredoc_delimited(&mut self, start: u32) -> RawToken {
        let id_start = self.cursor.pos();
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let id_end = self.cursor.pos();
        loop {
            if self.cursor.skip_to_byte(b'\n') != b'\n' {
                return self.token(start, RawTag::UnterminatedString);
            }
            self.cursor.advance(); // consume '\n'
            let id_len = id_end - id_start;
            let mut matched = true;
            for i in 0..id_len {
                if self.cursor.peek_at(i) != self.byte_at(id_start + i) {
                    matched = false;
                    break;
                }
            }
            if matched && self.cursor.peek_at(id_len) == b'"' {
                self.cursor.advance_n(id_len + 1);
                self.eat_string_postfix();
                return self.token(start, RawTag::DelimitedString);
            }
        }
    }

    fn char_delimited(&mut self, start: u32, delim: u8) -> RawToken {
        self.cursor.advance(); // consume the delimiter character
        loop {
            if self.cursor.skip_to_byte(delim) != delim {
                return self.token(start, RawTag::UnterminatedString);
            }
            self.cursor.advance();
            if self.cursor.current() == b'"' {
                self.cursor.advance();
                self.eat_string_postfix();
                return self.token(start, RawTag::DelimitedString);
            }
        }
    }

    /// `q{ ... }` — the body is lexed with the full token grammar.
    /// Brace depth counts `{`/`}` *tokens*, so braces inside nested
    /// strings or comments cannot terminate the literal early.
    fn token_string(&mut self, start: u32) -> RawToken {
        self.cursor.advance_n(2); // consume q{
        let mut depth: u32 = 1;
        loop {
            let tok = self.next_token();
            match tok.tag {
                RawTag::LeftBrace => depth += 1,
                RawTag::RightBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.eat_string_postfix();
                        return self.token(start, RawTag::TokenString);
                    }
                }
                RawTag::Eof => return self.token(start, RawTag::UnterminatedTokenString),
                _ => {}
            }
        }
    }

    /// Optional string postfix `c`, `w`, or `d` directly after the closing
    /// quote (and not continuing into an identifier).
    fn eat_string_postfix(&mut self) {
        if matches!(self.cursor.current(), b'c' | b'w' | b'd')
            && !is_ident_continue(self.cursor.peek())
        {
            self.cursor.advance();
        }
    }

    // ─── Character literals ──────────────────────────────────────────────

    fn char_literal(&mut self, start: u32) -> RawToken {
        self.cursor.advance(); // consume opening '\''
        match self.cursor.current() {
            b'\\' => {
                self.cursor.advance();
                if !self.cursor.is_eof() {
                    self.cursor.advance(); // escape designator, always ASCII
                }
            }
            b'\'' | b'\n' | b'\r' => {
                // Empty or unterminated
                return self.token(start, RawTag::UnterminatedChar);
            }
            0 => {
                if self.cursor.is_eof() {
                    return self.token(start, RawTag::UnterminatedChar);
                }
                self.cursor.advance();
            }
            _ => self.cursor.advance_char(),
        }
        // Multi-character escapes (\x41, \u03BB) and over-long literals:
        // scan to the closing quote on this line; cook validates content.
        self.cursor
            .eat_while(|b| b != b'\'' && b != b'\n' && b != b'\r' && b != 0);
        if self.cursor.current() == b'\'' {
            self.cursor.advance();
            self.token(start, RawTag::Char)
        } else {
            self.token(start, RawTag::UnterminatedChar)
        }
    }

    // ─── Error tokens ────────────────────────────────────────────────────

    fn invalid_byte(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        self.token(start, RawTag::InvalidByte)
    }

    fn byte_at(&self, pos: u32) -> u8 {
        self.cursor.slice(pos, pos + 1).as_bytes()[0]
    }
}

impl Iterator for RawScanner<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        let tok = self.next_token();
        if tok.tag == RawTag::Eof {
            None
        } else {
            Some(tok)
        }
    }
}

/// 256-byte lookup table for identifier continuation bytes.
/// `true` for a-z, A-Z, 0-9, underscore, and all non-ASCII bytes (Unicode
/// identifier characters are validated by the cooking layer). The sentinel
/// byte (0x00) maps to `false`, naturally terminating loops.
static IS_IDENT_CONTINUE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0usize;
    while i < 256 {
        table[i] = matches!(
            i as u8,
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | 0x80..=0xFF
        );
        i += 1;
    }
    table
};

/// Returns `true` if `b` can continue an identifier.
#[inline]
fn is_ident_continue(b: u8) -> bool {
    IS_IDENT_CONTINUE_TABLE[b as usize]
}

/// Convenience function: tokenize a source string and collect all raw
/// tokens (excluding the final `Eof`).
pub fn tokenize(source: &str) -> Vec<RawToken> {
    let buf = crate::SourceBuffer::new(source);
    let mut scanner = RawScanner::new(buf.cursor());
    let mut tokens = Vec::new();
    loop {
        let tok = scanner.next_token();
        if tok.tag == RawTag::Eof {
            break;
        }
        tokens.push(tok);
    }
    tokens
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn scan_tags(source: &str) -> Vec<RawTag> {
        tokenize(source).iter().map(|t| t.tag).collect()
    }

    fn single_tag(source: &str) -> RawTag {
        let tokens = tokenize(source);
        assert_eq!(tokens.len(), 1, "expected one token for {source:?}: {tokens:?}");
        assert_eq!(
            tokens[0].len as usize,
            source.len(),
            "token should cover all of {source:?}"
        );
        tokens[0].tag
    }

    // ─── Properties ──────────────────────────────────────────────────────

    #[test]
    fn tokens_tile_the_source() {
        let sources = [
            "",
            "module foo.bar; import std.stdio;",
            "int x = 1_000_0;",
            "/+ /+ nested +/ still in comment +/ int x;",
            "auto s = q{ if (x) { y(); } };",
            "q\"(nested (parens))\" r\"wys\" `alt` x\"DE AD\"",
            ">>>= ^^= !<> ... ..",
            "\u{FEFF}#!/usr/bin/env rdmd\nvoid main() {}",
        ];
        for source in sources {
            let total: u32 = tokenize(source).iter().map(|t| t.len).sum();
            assert_eq!(total as usize, source.len(), "tiling failed for {source:?}");
        }
    }

    proptest! {
        #[test]
        fn arbitrary_input_tiles_and_terminates(source in "\\PC*") {
            let total: u32 = tokenize(&source).iter().map(|t| t.len).sum();
            prop_assert_eq!(total as usize, source.len());
        }

        #[test]
        fn every_token_has_positive_length(source in "\\PC{1,60}") {
            for tok in tokenize(&source) {
                prop_assert!(tok.len > 0, "zero-length token {:?}", tok);
            }
        }
    }

    // ─── Trivia ──────────────────────────────────────────────────────────

    #[test]
    fn bom_only_at_start() {
        assert_eq!(scan_tags("\u{FEFF}x"), vec![RawTag::Bom, RawTag::Ident]);
        // Elsewhere it is an identifier character candidate
        let tags = scan_tags("a \u{FEFF}");
        assert_eq!(tags[0], RawTag::Ident);
    }

    #[test]
    fn shebang_at_start_only() {
        assert_eq!(
            scan_tags("#!/usr/bin/rdmd\nx"),
            vec![RawTag::Shebang, RawTag::Newline, RawTag::Ident]
        );
        // After a BOM is still "the start of the file"
        assert_eq!(
            scan_tags("\u{FEFF}#!x\n"),
            vec![RawTag::Bom, RawTag::Shebang, RawTag::Newline]
        );
        // Elsewhere `#!` is not a shebang
        let tags = scan_tags("x\n#!y");
        assert!(!tags.contains(&RawTag::Shebang));
    }

    #[test]
    fn line_directive() {
        assert_eq!(
            scan_tags("#line 42 \"foo.d\"\nx"),
            vec![RawTag::LineDirective, RawTag::Newline, RawTag::Ident]
        );
        // `#lines` is not a directive
        let tags = scan_tags("#lines");
        assert_eq!(tags, vec![RawTag::Hash, RawTag::Ident]);
    }

    #[test]
    fn line_comment() {
        assert_eq!(
            scan_tags("// hi\nx"),
            vec![RawTag::LineComment, RawTag::Newline, RawTag::Ident]
        );
    }

    #[test]
    fn block_comment_does_not_nest() {
        assert_eq!(
            scan_tags("/* a /* b */ x"),
            vec![RawTag::BlockComment, RawTag::Whitespace, RawTag::Ident]
        );
    }

    #[test]
    fn nesting_comment_counts_depth() {
        // The whole nested span is one trivia token
        let src = "/+ /+ nested +/ still in comment +/ int";
        assert_eq!(
            scan_tags(src),
            vec![
                RawTag::NestingBlockComment,
                RawTag::Whitespace,
                RawTag::Ident
            ]
        );
    }

    #[test]
    fn unterminated_comments() {
        assert_eq!(single_tag("/* open"), RawTag::UnterminatedBlockComment);
        assert_eq!(single_tag("/+ /+ +/"), RawTag::UnterminatedNestingComment);
    }

    // ─── Operators ───────────────────────────────────────────────────────

    #[test]
    fn maximal_munch_shift_family() {
        assert_eq!(single_tag(">>>="), RawTag::UshrAssign);
        assert_eq!(single_tag(">>>"), RawTag::Ushr);
        assert_eq!(single_tag(">>="), RawTag::ShrAssign);
        assert_eq!(single_tag(">>"), RawTag::Shr);
        assert_eq!(single_tag(">="), RawTag::GreaterEq);
        assert_eq!(single_tag(">"), RawTag::Greater);
        assert_eq!(single_tag("<<="), RawTag::ShlAssign);
    }

    #[test]
    fn maximal_munch_misc() {
        assert_eq!(single_tag("^^="), RawTag::PowAssign);
        assert_eq!(single_tag("^^"), RawTag::Pow);
        assert_eq!(single_tag("..."), RawTag::Ellipsis);
        assert_eq!(single_tag(".."), RawTag::DotDot);
        assert_eq!(single_tag("~="), RawTag::TildeAssign);
        assert_eq!(single_tag("=>"), RawTag::FatArrow);
        assert_eq!(single_tag("--"), RawTag::MinusMinus);
        assert_eq!(single_tag("++"), RawTag::PlusPlus);
    }

    // ─── Numbers ─────────────────────────────────────────────────────────

    #[test]
    fn integer_literals() {
        assert_eq!(single_tag("42"), RawTag::DecInt);
        assert_eq!(single_tag("1_000_0"), RawTag::DecInt);
        assert_eq!(single_tag("0xDEAD_BEEF"), RawTag::HexInt);
        assert_eq!(single_tag("0b1010_1010"), RawTag::BinInt);
        assert_eq!(single_tag("42uL"), RawTag::DecInt);
        assert_eq!(single_tag("42LU"), RawTag::DecInt);
        assert_eq!(single_tag("0xFFu"), RawTag::HexInt);
    }

    #[test]
    fn float_literals() {
        assert_eq!(single_tag("3.14"), RawTag::Float);
        assert_eq!(single_tag("1e10"), RawTag::Float);
        assert_eq!(single_tag("1.0E-5"), RawTag::Float);
        assert_eq!(single_tag("1f"), RawTag::Float);
        assert_eq!(single_tag("1.5L"), RawTag::Float);
        assert_eq!(single_tag("2.5fi"), RawTag::Float);
        assert_eq!(single_tag("0x1.8p3"), RawTag::HexFloat);
        assert_eq!(single_tag("0x1p-2"), RawTag::HexFloat);
    }

    #[test]
    fn dot_after_int_is_not_fraction() {
        assert_eq!(scan_tags("1..2"), vec![RawTag::DecInt, RawTag::DotDot, RawTag::DecInt]);
        assert_eq!(
            scan_tags("1.foo"),
            vec![RawTag::DecInt, RawTag::Dot, RawTag::Ident]
        );
    }

    #[test]
    fn exponent_needs_digits() {
        // `1echo` is int + identifier, not a malformed float
        assert_eq!(scan_tags("1echo"), vec![RawTag::DecInt, RawTag::Ident]);
        assert_eq!(single_tag("1e5"), RawTag::Float);
    }

    #[test]
    fn underscore_leading_is_identifier() {
        assert_eq!(single_tag("_1"), RawTag::Ident);
    }

    // ─── Strings ─────────────────────────────────────────────────────────

    #[test]
    fn six_string_forms() {
        assert_eq!(single_tag("\"hi\\n\""), RawTag::DqString);
        assert_eq!(single_tag("r\"c:\\no\\escape\""), RawTag::WysiwygString);
        assert_eq!(single_tag("`alt wysiwyg`"), RawTag::BacktickString);
        assert_eq!(single_tag("x\"DE AD BE EF\""), RawTag::HexString);
        assert_eq!(single_tag("q\"(paren (nested))\""), RawTag::DelimitedString);
        assert_eq!(single_tag("q{ tokens here }"), RawTag::TokenString);
    }

    #[test]
    fn dq_string_spans_lines() {
        assert_eq!(single_tag("\"line1\nline2\""), RawTag::DqString);
    }

    #[test]
    fn string_postfix() {
        assert_eq!(single_tag("\"s\"c"), RawTag::DqString);
        assert_eq!(single_tag("\"s\"w"), RawTag::DqString);
        assert_eq!(single_tag("\"s\"d"), RawTag::DqString);
        // Postfix must not continue into an identifier
        assert_eq!(
            scan_tags("\"s\"data"),
            vec![RawTag::DqString, RawTag::Ident]
        );
    }

    #[test]
    fn delimited_heredoc() {
        assert_eq!(single_tag("q\"EOS\nmulti\nline\nEOS\""), RawTag::DelimitedString);
    }

    #[test]
    fn delimited_char_form() {
        assert_eq!(single_tag("q\"/slash delimited/\""), RawTag::DelimitedString);
    }

    #[test]
    fn delimited_angle_nesting() {
        assert_eq!(single_tag("q\"<outer <inner> done>\""), RawTag::DelimitedString);
    }

    #[test]
    fn token_string_tracks_brace_tokens() {
        // Inner braces in nested tokens don't terminate early
        assert_eq!(single_tag("q{ if (a) { b(); } }"), RawTag::TokenString);
        // A brace inside a string literal inside the token string is content
        assert_eq!(single_tag("q{ \"}\" }"), RawTag::TokenString);
        // Same for a brace inside a comment
        assert_eq!(single_tag("q{ /* } */ }"), RawTag::TokenString);
        // Nested token strings
        assert_eq!(single_tag("q{ q{ inner } }"), RawTag::TokenString);
    }

    #[test]
    fn unterminated_strings() {
        assert_eq!(single_tag("\"abc"), RawTag::UnterminatedString);
        assert_eq!(single_tag("\"abc;"), RawTag::UnterminatedString);
        assert_eq!(single_tag("`abc"), RawTag::UnterminatedString);
        assert_eq!(single_tag("q{ {"), RawTag::UnterminatedTokenString);
        assert_eq!(single_tag("q\"(open"), RawTag::UnterminatedString);
    }

    // ─── Chars ───────────────────────────────────────────────────────────

    #[test]
    fn char_literals() {
        assert_eq!(single_tag("'a'"), RawTag::Char);
        assert_eq!(single_tag("'\\n'"), RawTag::Char);
        assert_eq!(single_tag("'\\''"), RawTag::Char);
        assert_eq!(single_tag("'\\u03BB'"), RawTag::Char);
        assert_eq!(single_tag("'λ'"), RawTag::Char);
    }

    #[test]
    fn unterminated_char() {
        assert_eq!(single_tag("'a"), RawTag::UnterminatedChar);
        assert_eq!(scan_tags("''")[0], RawTag::UnterminatedChar);
    }

    #[test]
    fn stray_backslash_is_an_invalid_byte() {
        assert_eq!(single_tag("\\"), RawTag::InvalidByte);
        assert_eq!(
            scan_tags("a\\b"),
            vec![RawTag::Ident, RawTag::InvalidByte, RawTag::Ident]
        );
    }

    // ─── Identifiers ─────────────────────────────────────────────────────

    #[test]
    fn keywords_lex_as_ident() {
        // Raw scanner does not resolve keywords
        assert_eq!(single_tag("class"), RawTag::Ident);
        assert_eq!(single_tag("foreach_reverse"), RawTag::Ident);
        assert_eq!(single_tag("__traits"), RawTag::Ident);
    }

    #[test]
    fn unicode_identifiers() {
        assert_eq!(single_tag("größe"), RawTag::Ident);
        assert_eq!(single_tag("λx"), RawTag::Ident);
    }

    #[test]
    fn r_x_q_only_special_before_quote() {
        assert_eq!(single_tag("r"), RawTag::Ident);
        assert_eq!(single_tag("radius"), RawTag::Ident);
        assert_eq!(single_tag("x"), RawTag::Ident);
        assert_eq!(single_tag("query"), RawTag::Ident);
    }
}
