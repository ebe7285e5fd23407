//! Error-tolerant recursive descent parser for D.
//!
//! [`parse`] turns source text into a lossless green tree: every byte of
//! the input, trivia included, appears in the tree exactly once, and
//! concatenating the tree's tokens reproduces the input. Syntax errors
//! never abort the parse; tokens that fit no production are wrapped in
//! `Error` nodes and parsing resumes at the next synchronization point,
//! so the same input always yields the same tree.
//!
//! [`reparse`] is the incremental entry point: given the previous parse
//! and a text edit, it reuses unchanged top-level declaration subtrees
//! from the old tree instead of rebuilding them.

mod cursor;
mod d_rules;
mod error;
mod grammar;
mod incremental;
mod precedence;
mod probe;
mod recovery;
mod rules;

pub use cursor::Cursor;
pub use d_rules::d_grammar;
pub use error::SyntaxError;
pub use incremental::{reparse, ReuseStats};
pub use recovery::{TokenSet, DECL_START, EXPR_START, STMT_RECOVERY, STMT_START};
pub use rules::{Grammar, GrammarError, RuleExpr, RuleId};

use dlang_lexer::{lex, LexError};
use dlang_syntax::{
    Checkpoint, GreenNode, Span, SyntaxKind, SyntaxNode, TokenKind, TreeBuilder,
};
use std::sync::Arc;

/// Result of parsing one source text.
#[derive(Debug)]
pub struct Parse {
    green: Arc<GreenNode>,
    errors: Vec<SyntaxError>,
    lex_errors: Vec<LexError>,
    reuse: ReuseStats,
}

impl Parse {
    /// The position-independent root. Shareable across trees.
    #[inline]
    pub fn green(&self) -> &Arc<GreenNode> {
        &self.green
    }

    /// The root positioned at offset zero.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(Arc::clone(&self.green))
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || !self.lex_errors.is_empty()
    }

    /// Subtree reuse counters; all zero for a from-scratch parse.
    pub fn reuse_stats(&self) -> ReuseStats {
        self.reuse
    }
}

/// Parse a source file from scratch.
pub fn parse(source: &str) -> Parse {
    let lexed = lex(source);
    let mut parser = Parser::new(&lexed.tokens, source);
    parser.source_file();
    let (green, errors) = parser.finish();
    tracing::debug!(
        bytes = source.len(),
        errors = errors.len(),
        lex_errors = lexed.errors.len(),
        "parsed source file"
    );
    Parse {
        green,
        errors,
        lex_errors: lexed.errors,
        reuse: ReuseStats::default(),
    }
}

/// Parser state: a cursor over significant tokens, the tree under
/// construction, and the errors collected so far.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    builder: TreeBuilder,
    errors: Vec<SyntaxError>,
    // Cursor position whose leading trivia is already in the tree.
    trivia_emitted: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a dlang_syntax::TokenList, source: &'a str) -> Self {
        Parser {
            cursor: Cursor::new(tokens, source),
            builder: TreeBuilder::new(),
            errors: Vec::new(),
            trivia_emitted: usize::MAX,
        }
    }

    pub(crate) fn finish(self) -> (Arc<GreenNode>, Vec<SyntaxError>) {
        (self.builder.finish(), self.errors)
    }

    // ── Token access ────────────────────────────────────────────────────

    #[inline]
    fn at(&self, kind: TokenKind) -> bool {
        self.cursor.at(kind)
    }

    #[inline]
    fn at_any(&self, set: TokenSet) -> bool {
        self.cursor.at_any(set)
    }

    #[inline]
    fn kind(&self) -> TokenKind {
        self.cursor.kind()
    }

    #[inline]
    fn nth(&self, n: usize) -> TokenKind {
        self.cursor.nth_kind(n)
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    #[inline]
    fn current_text(&self) -> &'a str {
        self.cursor.text(self.cursor.current())
    }

    // ── Tree construction ───────────────────────────────────────────────

    /// Open a node. The pending trivia run attaches to the parent first,
    /// so a node's text starts at its first significant token. The root
    /// keeps its leading trivia inside itself.
    fn start(&mut self, kind: SyntaxKind) {
        if self.builder.depth() > 0 {
            self.flush_trivia();
        }
        self.builder.start_node(kind);
    }

    #[inline]
    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Mark the builder position for retroactive wrapping. Pending
    /// trivia attaches to the enclosing node first, so a wrapped node's
    /// text starts at its first significant token.
    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    #[inline]
    fn wrap(&mut self, cp: Checkpoint, kind: SyntaxKind) {
        self.builder.wrap_node_at(cp, kind);
    }

    /// Attach the trivia run preceding the current token. Guarded per
    /// cursor position: opening a node and then shifting its first token
    /// both flush, but the run must land in the tree exactly once.
    fn flush_trivia(&mut self) {
        if self.trivia_emitted == self.cursor.pos() {
            return;
        }
        self.trivia_emitted = self.cursor.pos();
        for t in self.cursor.leading_trivia() {
            self.builder.token(t.kind, self.cursor.text(*t), t.flags);
        }
    }

    /// Shift the current token into the innermost open node.
    fn bump(&mut self) {
        debug_assert!(!self.is_eof(), "bump at end of file");
        self.flush_trivia();
        let token = self.cursor.current();
        self.builder
            .token(token.kind, self.cursor.text(token), token.flags);
        self.cursor.advance();
    }

    /// Shift the current token if it is `kind`.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Shift `kind` or record a missing-token error at the gap before the
    /// current token. Never consumes on failure.
    fn expect(&mut self, kind: TokenKind, while_parsing: &'static str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_missing([kind.describe()], while_parsing);
        false
    }

    /// Record that something was missing at the gap after the previous
    /// token. The span is empty so diagnostics point at the gap, not at
    /// whatever unrelated token comes next.
    fn error_missing(
        &mut self,
        expected: impl IntoIterator<Item = &'static str>,
        while_parsing: &'static str,
    ) {
        let at = self.cursor.prev_end();
        self.errors.push(SyntaxError::new(
            Span::new(at, at),
            self.kind(),
            expected,
            while_parsing,
        ));
    }

    /// Record the current token as unexpected and wrap it in an `Error`
    /// node so the tree still carries it.
    fn error_and_bump(
        &mut self,
        expected: impl IntoIterator<Item = &'static str>,
        while_parsing: &'static str,
    ) {
        self.errors.push(SyntaxError::new(
            self.cursor.span(),
            self.kind(),
            expected,
            while_parsing,
        ));
        if self.is_eof() {
            return;
        }
        self.start(SyntaxKind::Error);
        self.bump();
        self.finish_node();
    }

    /// Consume tokens into a single `Error` node until the cursor reaches
    /// `recovery` (or end of file). Skips nothing when already there. The
    /// error itself must have been recorded by the caller.
    fn recover_until(&mut self, recovery: TokenSet) {
        if self.is_eof() || self.at_any(recovery) {
            return;
        }
        self.start(SyntaxKind::Error);
        // Balanced braces swallow whole: a `{}` body inside a broken
        // declaration must not leak its statements as siblings.
        let mut depth = 0u32;
        while !self.is_eof() {
            match self.kind() {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace if depth > 0 => depth -= 1,
                _ if depth == 0 && self.at_any(recovery) => break,
                _ => {}
            }
            self.bump();
        }
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_source_parses_to_empty_root() {
        let parse = parse("");
        assert!(!parse.has_errors());
        assert_eq!(parse.syntax().kind(), SyntaxKind::SourceFile);
        assert_eq!(parse.syntax().text(), "");
    }

    #[test]
    fn tree_text_round_trips() {
        let source = "module a.b;\n\nint x = 1; // trailing\n";
        let parse = parse(source);
        assert!(!parse.has_errors(), "{:?}", parse.errors());
        assert_eq!(parse.syntax().text(), source);
    }

    #[test]
    fn round_trips_even_with_errors() {
        let source = "int x = ; struct ) y;";
        let parse = parse(source);
        assert!(parse.has_errors());
        assert_eq!(parse.syntax().text(), source);
    }

    #[test]
    fn trivia_lands_in_the_tree_exactly_once() {
        // A node opens right after the comment; the run before `int`
        // must appear once, attached to the file, not the declaration.
        let source = "/* doc */ int x = 1; // tail\n";
        let parse = parse(source);
        assert!(!parse.has_errors(), "{:?}", parse.errors());
        assert_eq!(parse.syntax().text(), source);
        let starts: Vec<u32> = parse.syntax().child_nodes().map(|n| n.span().start).collect();
        assert_eq!(starts, vec![10]);
    }

    #[test]
    fn parse_is_deterministic() {
        let source = "void f(int a) { return a + 1; }";
        let a = parse(source);
        let b = parse(source);
        assert_eq!(a.syntax().debug_dump(), b.syntax().debug_dump());
        assert_eq!(a.errors(), b.errors());
    }
}
