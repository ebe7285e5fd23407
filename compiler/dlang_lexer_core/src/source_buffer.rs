//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! allowing the scanner to detect EOF without explicit bounds checking.
//! The total buffer size is rounded up to the next 64-byte boundary, which
//! also provides safe padding for `peek()`/`peek2()` near the end.
//!
//! # Encoding Detection
//!
//! A UTF-8 BOM is *legal* in D source and is surfaced by the scanner as a
//! trivia token, so it is not an encoding issue here. The buffer does scan
//! for genuinely broken input:
//! - UTF-16 BOMs (wrong encoding — the front-end only accepts UTF-8)
//! - Interior null bytes (excluded from D's source character set)
//!
//! Issues are recorded as [`EncodingIssue`] values; the cooking layer
//! (`dlang_lexer`) converts them to diagnostics with spans.

use crate::Cursor;

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated source buffer.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to 64-byte boundary
///              source_len (sentinel)
/// ```
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Owned buffer: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
    /// Encoding issues detected during construction.
    encoding_issues: Vec<EncodingIssue>,
}

/// Encoding issue detected during source buffer construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingIssue {
    pub kind: EncodingIssueKind,
    /// Byte position in the source where the issue was found.
    pub pos: u32,
    /// Byte length of the problematic sequence.
    pub len: u32,
}

/// Kind of encoding issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingIssueKind {
    /// UTF-16 Little-Endian BOM (`0xFF 0xFE`) at start. Wrong encoding.
    Utf16LeBom,
    /// UTF-16 Big-Endian BOM (`0xFE 0xFF`) at start. Wrong encoding.
    Utf16BeBom,
    /// Null byte (U+0000) in source content.
    InteriorNull,
}

impl SourceBuffer {
    /// Create a new sentinel-terminated buffer from source code.
    ///
    /// Copies the source bytes into a padded buffer with a `0x00` sentinel
    /// appended and scans for encoding issues.
    pub fn new(source: &str) -> Self {
        let source_bytes = source.as_bytes();
        let source_len = source_bytes.len();

        // Round up to next 64-byte boundary (minimum: source + 1 sentinel byte).
        let padded_len = (source_len + 1 + CACHE_LINE - 1) & !(CACHE_LINE - 1);

        // Allocate zero-filled buffer, then copy source bytes.
        // The sentinel (buf[source_len]) and padding are already 0x00.
        let mut buf = vec![0u8; padded_len];
        buf[..source_len].copy_from_slice(source_bytes);

        let mut encoding_issues = Vec::new();
        detect_encoding_issues(source_bytes, &mut encoding_issues);

        // Saturate source_len for files > 4 GiB; callers reject those upstream.
        let source_len_u32 = u32::try_from(source_len).unwrap_or(u32::MAX);

        Self {
            buf,
            source_len: source_len_u32,
            encoding_issues,
        }
    }

    /// Returns the source bytes (without sentinel or padding).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Length of the source content in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the source content is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Encoding issues detected during construction.
    pub fn encoding_issues(&self) -> &[EncodingIssue] {
        &self.encoding_issues
    }
}

/// Detect UTF-16 BOM and interior null byte issues in source bytes.
fn detect_encoding_issues(source: &[u8], issues: &mut Vec<EncodingIssue>) {
    match source {
        [0xFF, 0xFE, ..] => issues.push(EncodingIssue {
            kind: EncodingIssueKind::Utf16LeBom,
            pos: 0,
            len: 2,
        }),
        [0xFE, 0xFF, ..] => issues.push(EncodingIssue {
            kind: EncodingIssueKind::Utf16BeBom,
            pos: 0,
            len: 2,
        }),
        _ => {}
    }

    let mut search_from = 0;
    while let Some(off) = memchr::memchr(0, &source[search_from..]) {
        let pos = search_from + off;
        issues.push(EncodingIssue {
            kind: EncodingIssueKind::InteriorNull,
            pos: u32::try_from(pos).unwrap_or(u32::MAX),
            len: 1,
        });
        search_from = pos + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sentinel_follows_content() {
        let buf = SourceBuffer::new("abc");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_bytes(), b"abc");
        let cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
    }

    #[test]
    fn empty_source() {
        let buf = SourceBuffer::new("");
        assert!(buf.is_empty());
        assert!(buf.cursor().is_eof());
    }

    #[test]
    fn utf8_bom_is_not_an_issue() {
        // The D grammar admits a BOM; the scanner emits it as trivia.
        let buf = SourceBuffer::new("\u{FEFF}module a;");
        assert!(buf.encoding_issues().is_empty());
    }

    #[test]
    fn interior_null_reported() {
        let buf = SourceBuffer::new("a\0b");
        let issues = buf.encoding_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, EncodingIssueKind::InteriorNull);
        assert_eq!(issues[0].pos, 1);
    }

    #[test]
    fn multiple_interior_nulls_reported() {
        let buf = SourceBuffer::new("\0x\0");
        assert_eq!(buf.encoding_issues().len(), 2);
    }

    #[test]
    fn padding_is_zero() {
        let buf = SourceBuffer::new("x");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.peek(), 0);
        assert_eq!(cursor.peek2(), 0);
    }
}
