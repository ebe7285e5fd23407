//! Zero-cost cursor over a sentinel-terminated buffer.
//!
//! The cursor advances through the buffer byte-by-byte. EOF is detected
//! when the current byte equals the sentinel (`0x00`) and the position has
//! reached or exceeded the source length. No explicit bounds checking is
//! performed in the common case — the sentinel guarantees safe termination.
//!
//! # Interior Null Bytes
//!
//! A null at `pos < source_len` is an interior null (error token);
//! a null at `pos >= source_len` is the sentinel (EOF).

/// Returns the earliest (minimum) of two optional positions.
///
/// Combines results from separate memchr calls when more needles are
/// needed than `memchr3` supports.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Byte cursor over source text.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`], enabling cheap state snapshots for backtracking.
///
/// # Invariant
///
/// `buf` must be sentinel-terminated: `buf[source_len] == 0x00`, and all
/// bytes after `source_len` are `0x00` (cache-line padding). This is
/// guaranteed by [`SourceBuffer`](crate::SourceBuffer) construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// Current read position (byte index into `buf`).
    pos: u32,
    /// Length of actual source content (excludes sentinel and padding).
    source_len: u32,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at position 0 over a sentinel-terminated buffer.
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            (source_len as usize) < buf.len(),
            "sentinel must be within buffer bounds"
        );
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Returns the byte at the current position.
    ///
    /// Returns `0x00` when at EOF (the sentinel byte). Interior null bytes
    /// also return `0x00`; use [`is_eof()`](Self::is_eof) to distinguish.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// Returns the byte one position ahead of current.
    ///
    /// Safe at any position: the sentinel and padding guarantee valid reads.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    /// Returns the byte two positions ahead of current.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.buf[self.pos as usize + 2]
    }

    /// Returns the byte at `offset` positions ahead of current.
    ///
    /// `offset` must stay within the sentinel-padded buffer; the 64-byte
    /// padding makes small constant offsets always safe. Returns the
    /// sentinel when peeking past end-of-source.
    #[inline]
    pub fn peek_at(&self, offset: u32) -> u8 {
        let idx = self.pos as usize + offset as usize;
        if idx < self.buf.len() {
            self.buf[idx]
        } else {
            0
        }
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advance the cursor by `n` bytes.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Returns `true` if the cursor has reached EOF.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current() == 0 && self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Length of the source content (excludes sentinel and padding).
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Extract a source substring as `&str`.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source content and on valid UTF-8
    /// character boundaries, which holds when the offsets come from the
    /// scanner's token boundary tracking (the source was originally `&str`).
    #[allow(
        unsafe_code,
        reason = "from_utf8_unchecked on source originally validated as &str"
    )]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(
            end <= self.source_len,
            "slice end {end} exceeds source length {}",
            self.source_len
        );
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        // SAFETY: The buffer was constructed from `&str` (valid UTF-8) and
        // the scanner only produces offsets on character boundaries.
        unsafe { std::str::from_utf8_unchecked(&self.buf[start as usize..end as usize]) }
    }

    /// Extract a source substring from `start` to the current position.
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// # Contract
    ///
    /// `pred(0)` must return `false` so the sentinel terminates the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Returns the number of bytes in the UTF-8 character starting with `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance past one full UTF-8 character (1-4 bytes).
    #[inline]
    pub fn advance_char(&mut self) {
        self.pos += Self::utf8_char_width(self.current());
    }

    /// Advance to the next `\n`, `\r`, or EOF. The newline is not consumed.
    ///
    /// memchr-accelerated; used for line comments, `#line`, and shebangs.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        match memchr::memchr2(b'\n', b'\r', remaining) {
            Some(off) => self.pos += off as u32,
            None => self.pos = self.source_len,
        }
    }

    /// Advance past ordinary double-quoted string content to the next
    /// interesting byte (`"`, `\`, or null). Returns the byte found, or 0
    /// for EOF. Unlike many languages, D strings may span lines, so
    /// newlines are ordinary content here.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_string_delim(&mut self) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        match memchr::memchr2(b'"', b'\\', remaining) {
            Some(off) => {
                self.pos += off as u32;
                self.buf[self.pos as usize]
            }
            None => {
                self.pos = self.source_len;
                0
            }
        }
    }

    /// Advance to the next occurrence of `byte` or EOF. Returns the byte
    /// found (which equals `byte`), or 0 for EOF.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_byte(&mut self, byte: u8) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        match memchr::memchr(byte, remaining) {
            Some(off) => {
                self.pos += off as u32;
                byte
            }
            None => {
                self.pos = self.source_len;
                0
            }
        }
    }

    /// Advance to the next of two bytes or EOF. Returns the byte found,
    /// or 0 for EOF.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_byte2(&mut self, a: u8, b: u8) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        let hit = earliest_of(
            memchr::memchr(a, remaining),
            memchr::memchr(b, remaining),
        );
        match hit {
            Some(off) => {
                self.pos += off as u32;
                self.buf[self.pos as usize]
            }
            None => {
                self.pos = self.source_len;
                0
            }
        }
    }

    /// Advance past horizontal whitespace (spaces and tabs, plus vertical
    /// tab and form feed which D also treats as whitespace).
    #[inline]
    pub fn eat_whitespace(&mut self) {
        loop {
            let b = self.buf[self.pos as usize];
            if b == b' ' || b == b'\t' || b == 0x0B || b == 0x0C {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceBuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn basic_navigation() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
        assert_eq!(cursor.peek(), b'b');
        assert_eq!(cursor.peek2(), b'c');
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
        cursor.advance_n(2);
        assert!(cursor.is_eof());
    }

    #[test]
    fn peek_at_bounds() {
        let buf = SourceBuffer::new("ab");
        let cursor = buf.cursor();
        assert_eq!(cursor.peek_at(0), b'a');
        assert_eq!(cursor.peek_at(1), b'b');
        assert_eq!(cursor.peek_at(2), 0);
        assert_eq!(cursor.peek_at(500), 0);
    }

    #[test]
    fn eat_while_stops_at_sentinel() {
        let buf = SourceBuffer::new("aaa");
        let mut cursor = buf.cursor();
        cursor.eat_while(|b| b == b'a');
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.is_eof());
    }

    #[test]
    fn slice_roundtrip() {
        let buf = SourceBuffer::new("hello world");
        let mut cursor = buf.cursor();
        cursor.advance_n(6);
        assert_eq!(cursor.slice(0, 5), "hello");
        cursor.advance_n(5);
        assert_eq!(cursor.slice_from(6), "world");
    }

    #[test]
    fn eat_until_newline() {
        let buf = SourceBuffer::new("abc\ndef");
        let mut cursor = buf.cursor();
        cursor.eat_until_newline_or_eof();
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_until_newline_hits_eof() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        cursor.eat_until_newline_or_eof();
        assert!(cursor.is_eof());
    }

    #[test]
    fn skip_to_string_delim_spans_lines() {
        // D strings may contain raw newlines.
        let buf = SourceBuffer::new("ab\ncd\"rest");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.skip_to_string_delim(), b'"');
        assert_eq!(cursor.pos(), 5);
    }

    #[test]
    fn skip_to_byte2_earliest() {
        let buf = SourceBuffer::new("xxBxxAxx");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.skip_to_byte2(b'A', b'B'), b'B');
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn whitespace_includes_vtab_formfeed() {
        let buf = SourceBuffer::new(" \t\x0B\x0Cx");
        let mut cursor = buf.cursor();
        cursor.eat_whitespace();
        assert_eq!(cursor.current(), b'x');
    }

    #[test]
    fn utf8_char_widths() {
        assert_eq!(Cursor::utf8_char_width(b'a'), 1);
        assert_eq!(Cursor::utf8_char_width(0xCE), 2); // λ lead byte
        assert_eq!(Cursor::utf8_char_width(0xE4), 3);
        assert_eq!(Cursor::utf8_char_width(0xF0), 4);
    }
}
