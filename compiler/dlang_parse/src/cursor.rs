//! Token cursor for navigating the lexed stream.
//!
//! The cursor walks non-trivia positions of the [`TokenList`]; trivia is
//! attached to the tree by the parser when a token is shifted, never seen
//! by grammar code.

use crate::recovery::TokenSet;
use dlang_syntax::{Span, Token, TokenKind, TokenList};

/// Cursor over the significant tokens of a [`TokenList`].
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, source: &'a str) -> Self {
        Cursor {
            tokens,
            source,
            pos: 0,
        }
    }

    #[inline]
    pub fn tokens(&self) -> &'a TokenList {
        self.tokens
    }

    /// Current significant position. Compared before/after a rule to
    /// detect progress, and restored when a trial parse backtracks.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Restore a position saved by [`pos`](Cursor::pos).
    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.significant_len());
        self.pos = pos;
    }

    /// Current significant token. Saturates to Eof at the end.
    #[inline]
    pub fn current(&self) -> Token {
        self.tokens.significant(self.pos)
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.current().span
    }

    /// Kind of the `n`-th significant token after the current one.
    #[inline]
    pub fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens.significant(self.pos + n).kind
    }

    #[inline]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    #[inline]
    pub fn at_any(&self, set: TokenSet) -> bool {
        set.contains(self.kind())
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind() == TokenKind::Eof
    }

    /// Advance one significant position. Never moves past Eof.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos + 1 < self.tokens.significant_len() {
            self.pos += 1;
        }
    }

    /// Source text of a token.
    #[inline]
    pub fn text(&self, token: Token) -> &'a str {
        &self.source[token.span.start as usize..token.span.end as usize]
    }

    /// End offset of the last significant token before the current one;
    /// start of file when there is none. Error spans anchor here so a
    /// missing-token diagnostic points at the gap, not the next line.
    pub fn prev_end(&self) -> u32 {
        if self.pos == 0 {
            0
        } else {
            self.tokens.significant(self.pos - 1).span.end
        }
    }

    /// Trivia between the previous significant token and the current one.
    #[inline]
    pub fn leading_trivia(&self) -> &'a [Token] {
        self.tokens.trivia_before(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlang_lexer::lex;
    use pretty_assertions::assert_eq;

    #[test]
    fn walks_significant_tokens_only() {
        let source = "int /* gap */ x ;";
        let lexed = lex(source);
        let mut cursor = Cursor::new(&lexed.tokens, source);
        assert_eq!(cursor.kind(), TokenKind::Int);
        cursor.advance();
        assert_eq!(cursor.kind(), TokenKind::Identifier);
        assert_eq!(cursor.text(cursor.current()), "x");
        assert_eq!(cursor.leading_trivia().len(), 3);
        cursor.advance();
        assert_eq!(cursor.kind(), TokenKind::Semicolon);
        cursor.advance();
        assert!(cursor.is_eof());
        cursor.advance();
        assert!(cursor.is_eof());
    }

    #[test]
    fn lookahead_and_rollback() {
        let source = "a = b;";
        let lexed = lex(source);
        let mut cursor = Cursor::new(&lexed.tokens, source);
        assert_eq!(cursor.nth_kind(1), TokenKind::Assign);
        assert_eq!(cursor.nth_kind(3), TokenKind::Semicolon);
        let saved = cursor.pos();
        cursor.advance();
        cursor.advance();
        cursor.set_pos(saved);
        assert_eq!(cursor.kind(), TokenKind::Identifier);
    }
}
