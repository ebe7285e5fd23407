//! Lexed token storage.
//!
//! The full token stream (trivia included) tiles the source exactly; the
//! parser walks a precomputed index of non-trivia positions so grammar
//! code never skips trivia by hand.

use crate::{Token, TokenKind};

/// The complete output of lexing one source text.
///
/// `tokens` holds every token in source order, trivia included, ending
/// with an `Eof` token whose span is empty. `significant` maps dense
/// parser positions to indices into `tokens`.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
    significant: Vec<u32>,
}

impl TokenList {
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(
            matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof),
            "token list must end with Eof"
        );
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i as u32)
            .collect();
        TokenList {
            tokens,
            significant,
        }
    }

    /// All tokens in source order, trivia included.
    #[inline]
    pub fn raw(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of non-trivia tokens, including the trailing Eof.
    #[inline]
    pub fn significant_len(&self) -> usize {
        self.significant.len()
    }

    /// The `pos`-th non-trivia token. Out-of-range positions saturate to
    /// the trailing Eof token.
    #[inline]
    pub fn significant(&self, pos: usize) -> Token {
        let idx = self
            .significant
            .get(pos)
            .copied()
            .unwrap_or_else(|| (self.tokens.len() - 1) as u32);
        self.tokens[idx as usize]
    }

    /// Raw index (into `raw()`) of the `pos`-th non-trivia token.
    #[inline]
    pub fn significant_raw_index(&self, pos: usize) -> usize {
        self.significant
            .get(pos)
            .copied()
            .unwrap_or_else(|| (self.tokens.len() - 1) as u32) as usize
    }

    /// Trivia tokens lying between the `pos-1`-th and `pos`-th non-trivia
    /// tokens. For `pos == 0` this is the leading trivia of the file.
    pub fn trivia_before(&self, pos: usize) -> &[Token] {
        let end = self.significant_raw_index(pos);
        let start = if pos == 0 {
            0
        } else {
            self.significant_raw_index(pos - 1) + 1
        };
        &self.tokens[start..end]
    }

    /// Position of the first non-trivia token at or after byte `offset`.
    pub fn significant_pos_at(&self, offset: u32) -> usize {
        self.significant
            .partition_point(|&i| self.tokens[i as usize].span.end <= offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;
    use pretty_assertions::assert_eq;

    fn tok(kind: TokenKind, start: u32, end: u32) -> Token {
        Token::new(kind, Span::new(start, end))
    }

    fn sample() -> TokenList {
        // "int  x;" with whitespace trivia
        TokenList::new(vec![
            tok(TokenKind::Int, 0, 3),
            tok(TokenKind::Whitespace, 3, 5),
            tok(TokenKind::Identifier, 5, 6),
            tok(TokenKind::Semicolon, 6, 7),
            tok(TokenKind::Eof, 7, 7),
        ])
    }

    #[test]
    fn significant_skips_trivia() {
        let list = sample();
        assert_eq!(list.significant_len(), 4);
        assert_eq!(list.significant(0).kind, TokenKind::Int);
        assert_eq!(list.significant(1).kind, TokenKind::Identifier);
        assert_eq!(list.significant(2).kind, TokenKind::Semicolon);
        assert_eq!(list.significant(3).kind, TokenKind::Eof);
    }

    #[test]
    fn out_of_range_saturates_to_eof() {
        let list = sample();
        assert_eq!(list.significant(99).kind, TokenKind::Eof);
    }

    #[test]
    fn trivia_before_positions() {
        let list = sample();
        assert!(list.trivia_before(0).is_empty());
        assert_eq!(list.trivia_before(1).len(), 1);
        assert_eq!(list.trivia_before(1)[0].kind, TokenKind::Whitespace);
        assert!(list.trivia_before(2).is_empty());
    }

    #[test]
    fn position_lookup_by_offset() {
        let list = sample();
        assert_eq!(list.significant_pos_at(0), 0);
        assert_eq!(list.significant_pos_at(3), 1);
        assert_eq!(list.significant_pos_at(5), 1);
        assert_eq!(list.significant_pos_at(6), 2);
        assert_eq!(list.significant_pos_at(7), 3);
    }
}
