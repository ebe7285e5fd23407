//! Byte offset to line/column mapping.

/// Pre-computed line starts for one source text. Built once per file,
/// then every lookup is a binary search.
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    /// Byte offset of each line start; `starts[0]` is always 0.
    starts: Vec<u32>,
}

impl LineIndex {
    pub fn build(source: &str) -> Self {
        let mut starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                starts.push((i + 1) as u32);
            }
        }
        LineIndex { starts }
    }

    /// One-based line number containing `offset`.
    pub fn line(&self, offset: u32) -> u32 {
        let idx = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        (idx as u32) + 1
    }

    /// One-based line and column. The column counts characters, not
    /// bytes, from the line start.
    pub fn line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line(offset);
        let start = self.starts.get((line - 1) as usize).copied().unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col = u32::try_from(source[start..end].chars().count()).unwrap_or(u32::MAX - 1) + 1;
        (line, col)
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
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

    #[test]
    fn lines_and_columns_are_one_based() {
        let source = "int x;\nint y;\n";
        let index = LineIndex::build(source);
        assert_eq!(index.line_col(source, 0), (1, 1));
        assert_eq!(index.line_col(source, 4), (1, 5));
        assert_eq!(index.line_col(source, 7), (2, 1));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let source = "// héllo\nint x;\n";
        let index = LineIndex::build(source);
        let at = source.find("int").unwrap() as u32;
        assert_eq!(index.line_col(source, at), (2, 1));
        let o = source.find('o').unwrap() as u32;
        // é is two bytes but one column.
        assert_eq!(index.line_col(source, o), (1, 8));
    }

    #[test]
    fn offset_past_the_end_clamps() {
        let source = "x";
        let index = LineIndex::build(source);
        assert_eq!(index.line_col(source, 99), (1, 2));
    }
}
