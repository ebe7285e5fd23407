//! Lossless green/red syntax tree.
//!
//! Green nodes are immutable, position-independent, and shared via `Arc`:
//! a node records its kind, total width in bytes, and its children, but
//! never an absolute offset. That is what lets an incremental reparse
//! splice whole subtrees from the previous tree into the new one without
//! copying them. The red layer ([`SyntaxNode`]/[`SyntaxToken`]) is a thin
//! cursor that pairs a green node with the absolute offset it occupies in
//! one particular tree.
//!
//! The tree is lossless: every token, trivia included, appears exactly
//! once, so concatenating token text in order reproduces the input.

use crate::{Span, SyntaxKind, Token, TokenFlags, TokenKind};
use std::fmt;
use std::sync::Arc;

/// A terminal in the green tree. Carries its own text so subtree reuse
/// never needs the old source buffer.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct GreenToken {
    pub kind: TokenKind,
    pub text: Arc<str>,
    pub flags: TokenFlags,
}

impl GreenToken {
    pub fn new(kind: TokenKind, text: impl Into<Arc<str>>) -> Self {
        GreenToken {
            kind,
            text: text.into(),
            flags: TokenFlags::empty(),
        }
    }

    pub fn with_flags(kind: TokenKind, text: impl Into<Arc<str>>, flags: TokenFlags) -> Self {
        GreenToken {
            kind,
            text: text.into(),
            flags,
        }
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "token text comes from a u32-indexed source buffer"
    )]
    pub fn width(&self) -> u32 {
        self.text.len() as u32
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.kind, &*self.text)
    }
}

/// An interior node in the green tree.
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct GreenNode {
    pub kind: SyntaxKind,
    width: u32,
    children: Box<[GreenChild]>,
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, children: Vec<GreenChild>) -> Arc<Self> {
        let width = children.iter().map(GreenChild::width).sum();
        Arc::new(GreenNode {
            kind,
            width,
            children: children.into_boxed_slice(),
        })
    }

    /// Total width in bytes of all tokens under this node.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn children(&self) -> &[GreenChild] {
        &self.children
    }

    /// Concatenated token text of the subtree.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.width as usize);
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        for child in self.children.iter() {
            match child {
                GreenChild::Node(n) => n.write_text(out),
                GreenChild::Token(t) => out.push_str(&t.text),
            }
        }
    }
}

/// A child slot of a green node.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum GreenChild {
    Node(Arc<GreenNode>),
    Token(GreenToken),
}

impl GreenChild {
    #[inline]
    pub fn width(&self) -> u32 {
        match self {
            GreenChild::Node(n) => n.width(),
            GreenChild::Token(t) => t.width(),
        }
    }
}

/// A green node positioned in a particular tree.
#[derive(Clone)]
pub struct SyntaxNode {
    green: Arc<GreenNode>,
    offset: u32,
}

impl SyntaxNode {
    pub fn new_root(green: Arc<GreenNode>) -> Self {
        SyntaxNode { green, offset: 0 }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind
    }

    #[inline]
    pub fn green(&self) -> &Arc<GreenNode> {
        &self.green
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.green.width())
    }

    /// Child elements with their absolute offsets.
    pub fn children(&self) -> impl Iterator<Item = SyntaxElement> + '_ {
        let mut offset = self.offset;
        self.green.children().iter().map(move |child| {
            let at = offset;
            offset += child.width();
            match child {
                GreenChild::Node(n) => SyntaxElement::Node(SyntaxNode {
                    green: Arc::clone(n),
                    offset: at,
                }),
                GreenChild::Token(t) => SyntaxElement::Token(SyntaxToken {
                    green: t.clone(),
                    offset: at,
                }),
            }
        })
    }

    /// Child nodes only.
    pub fn child_nodes(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.children().filter_map(|el| match el {
            SyntaxElement::Node(n) => Some(n),
            SyntaxElement::Token(_) => None,
        })
    }

    /// The smallest node whose span contains `span`. Returns `self` when
    /// no child covers it.
    pub fn covering_node(&self, span: Span) -> SyntaxNode {
        let mut node = self.clone();
        loop {
            // The iterator borrows `node`, so pick the descend target
            // first and reassign after it is dropped.
            let next = node.children().find_map(|child| match child {
                SyntaxElement::Node(n)
                    if n.span().contains_span(span) && !n.span().is_empty() =>
                {
                    Some(n)
                }
                _ => None,
            });
            match next {
                Some(n) => node = n,
                None => return node,
            }
        }
    }

    /// The token whose span contains byte `offset`, if any.
    pub fn token_at_offset(&self, offset: u32) -> Option<SyntaxToken> {
        if !self.span().contains(offset) {
            return None;
        }
        let mut node = self.clone();
        loop {
            let mut next = None;
            for child in node.children() {
                match child {
                    SyntaxElement::Node(n) => {
                        if n.span().contains(offset) {
                            next = Some(n);
                            break;
                        }
                    }
                    SyntaxElement::Token(t) => {
                        if t.span().contains(offset) {
                            return Some(t);
                        }
                    }
                }
            }
            node = next?;
        }
    }

    /// Preorder traversal of this node and all descendant nodes.
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode> {
        let mut stack = vec![self.clone()];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            let children: Vec<_> = node.child_nodes().collect();
            stack.extend(children.into_iter().rev());
            Some(node)
        })
    }

    /// Concatenated token text of the subtree.
    pub fn text(&self) -> String {
        self.green.text()
    }

    /// Render the tree with kinds and spans, one element per line.
    pub fn debug_dump(&self) -> String {
        fn go(el: &SyntaxElement, depth: usize, out: &mut String) {
            for _ in 0..depth {
                out.push_str("  ");
            }
            match el {
                SyntaxElement::Node(n) => {
                    out.push_str(&format!("{:?} @ {}\n", n.kind(), n.span()));
                    for child in n.children() {
                        go(&child, depth + 1, out);
                    }
                }
                SyntaxElement::Token(t) => {
                    out.push_str(&format!("{:?} @ {} {:?}\n", t.kind(), t.span(), t.text()));
                }
            }
        }
        let mut out = String::new();
        go(&SyntaxElement::Node(self.clone()), 0, &mut out);
        out
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind(), self.span())
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && Arc::ptr_eq(&self.green, &other.green)
    }
}

impl Eq for SyntaxNode {}

/// A green token positioned in a particular tree.
#[derive(Clone)]
pub struct SyntaxToken {
    green: GreenToken,
    offset: u32,
}

impl SyntaxToken {
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.green.kind
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.green.width())
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.green.text
    }

    #[inline]
    pub fn flags(&self) -> TokenFlags {
        self.green.flags
    }

    /// View as a plain lexer token.
    pub fn to_token(&self) -> Token {
        Token::with_flags(self.kind(), self.span(), self.flags())
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {} {:?}", self.kind(), self.span(), self.text())
    }
}

/// Either a positioned node or a positioned token.
#[derive(Clone, Debug)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxElement {
    #[inline]
    pub fn span(&self) -> Span {
        match self {
            SyntaxElement::Node(n) => n.span(),
            SyntaxElement::Token(t) => t.span(),
        }
    }
}

/// A builder position saved by [`TreeBuilder::checkpoint`].
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint(usize);

/// Bottom-up green tree construction.
///
/// Nodes open with [`start_node`](TreeBuilder::start_node) and close with
/// [`finish_node`](TreeBuilder::finish_node); tokens and already-built
/// green subtrees attach to the innermost open node. The incremental
/// controller uses [`push_green`](TreeBuilder::push_green) to splice
/// reused subtrees in without rebuilding them.
#[derive(Default)]
pub struct TreeBuilder {
    // (kind, index into `children` where this node's children start)
    stack: Vec<(SyntaxKind, usize)>,
    children: Vec<GreenChild>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.stack.push((kind, self.children.len()));
    }

    pub fn token(&mut self, kind: TokenKind, text: &str, flags: TokenFlags) {
        self.children
            .push(GreenChild::Token(GreenToken::with_flags(kind, text, flags)));
    }

    /// Attach a prebuilt green subtree.
    pub fn push_green(&mut self, node: Arc<GreenNode>) {
        self.children.push(GreenChild::Node(node));
    }

    pub fn finish_node(&mut self) {
        let (kind, first_child) = self
            .stack
            .pop()
            .unwrap_or_else(|| unreachable!("finish_node without start_node"));
        let children = self.children.split_off(first_child);
        let node = GreenNode::new(kind, children);
        self.children.push(GreenChild::Node(node));
    }

    /// Number of open nodes; used by checkpoint/rollback in the parser.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Mark the current position so children emitted after it can later be
    /// wrapped into a node (operator expressions wrap their left operand
    /// retroactively).
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    /// Wrap every child emitted since `cp` into a new `kind` node.
    ///
    /// The checkpoint must not cross a `start_node`/`finish_node` boundary
    /// that is still open.
    pub fn wrap_node_at(&mut self, cp: Checkpoint, kind: SyntaxKind) {
        debug_assert!(
            self.stack.last().is_none_or(|&(_, first)| first <= cp.0),
            "checkpoint crosses an open node boundary"
        );
        let children = self.children.split_off(cp.0);
        let node = GreenNode::new(kind, children);
        self.children.push(GreenChild::Node(node));
    }

    pub fn finish(mut self) -> Arc<GreenNode> {
        debug_assert!(self.stack.is_empty(), "unbalanced start_node");
        debug_assert_eq!(self.children.len(), 1, "finish requires a single root");
        match self.children.pop() {
            Some(GreenChild::Node(node)) => node,
            _ => unreachable!("root must be a node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Arc<GreenNode> {
        // int x;
        let mut b = TreeBuilder::new();
        b.start_node(SyntaxKind::SourceFile);
        b.start_node(SyntaxKind::VarDeclarations);
        b.start_node(SyntaxKind::BasicType);
        b.token(TokenKind::Int, "int", TokenFlags::empty());
        b.finish_node();
        b.token(TokenKind::Whitespace, " ", TokenFlags::empty());
        b.start_node(SyntaxKind::Declarator);
        b.token(TokenKind::Identifier, "x", TokenFlags::empty());
        b.finish_node();
        b.token(TokenKind::Semicolon, ";", TokenFlags::empty());
        b.finish_node();
        b.finish_node();
        b.finish()
    }

    #[test]
    fn text_round_trips() {
        assert_eq!(sample_tree().text(), "int x;");
    }

    #[test]
    fn widths_are_relative() {
        let green = sample_tree();
        assert_eq!(green.width(), 6);
        let root = SyntaxNode::new_root(green);
        let decls = root.child_nodes().next().unwrap();
        assert_eq!(decls.span(), Span::new(0, 6));
        let ty = decls.child_nodes().next().unwrap();
        assert_eq!(ty.span(), Span::new(0, 3));
    }

    #[test]
    fn shared_green_has_independent_offsets() {
        // The same green subtree mounted at two offsets reads back with
        // the right absolute spans in each tree.
        let inner = {
            let mut b = TreeBuilder::new();
            b.start_node(SyntaxKind::Declarator);
            b.token(TokenKind::Identifier, "x", TokenFlags::empty());
            b.finish_node();
            b.finish()
        };
        let mut b = TreeBuilder::new();
        b.start_node(SyntaxKind::SourceFile);
        b.token(TokenKind::Whitespace, "    ", TokenFlags::empty());
        b.push_green(Arc::clone(&inner));
        b.finish_node();
        let root = SyntaxNode::new_root(b.finish());
        let mounted = root.child_nodes().next().unwrap();
        assert_eq!(mounted.span(), Span::new(4, 5));
        assert!(Arc::ptr_eq(mounted.green(), &inner));
    }

    #[test]
    fn covering_node_descends() {
        let root = SyntaxNode::new_root(sample_tree());
        let covering = root.covering_node(Span::new(4, 5));
        assert_eq!(covering.kind(), SyntaxKind::Declarator);
        let covering = root.covering_node(Span::new(2, 5));
        assert_eq!(covering.kind(), SyntaxKind::VarDeclarations);
    }

    #[test]
    fn token_at_offset() {
        let root = SyntaxNode::new_root(sample_tree());
        assert_eq!(root.token_at_offset(0).unwrap().kind(), TokenKind::Int);
        assert_eq!(root.token_at_offset(4).unwrap().kind(), TokenKind::Identifier);
        assert_eq!(root.token_at_offset(5).unwrap().kind(), TokenKind::Semicolon);
        assert!(root.token_at_offset(6).is_none());
    }

    #[test]
    fn checkpoint_wraps_left_operand() {
        // a + b parsed left-to-right: the BinaryExpression node wraps
        // children emitted before the operator was known.
        let mut b = TreeBuilder::new();
        b.start_node(SyntaxKind::SourceFile);
        let cp = b.checkpoint();
        b.token(TokenKind::Identifier, "a", TokenFlags::empty());
        b.token(TokenKind::Plus, "+", TokenFlags::empty());
        b.token(TokenKind::Identifier, "b", TokenFlags::empty());
        b.wrap_node_at(cp, SyntaxKind::BinaryExpression);
        b.finish_node();
        let root = SyntaxNode::new_root(b.finish());
        let bin = root.child_nodes().next().unwrap();
        assert_eq!(bin.kind(), SyntaxKind::BinaryExpression);
        assert_eq!(bin.text(), "a+b");
    }

    #[test]
    fn descendants_preorder() {
        let root = SyntaxNode::new_root(sample_tree());
        let kinds: Vec<_> = root.descendants().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::SourceFile,
                SyntaxKind::VarDeclarations,
                SyntaxKind::BasicType,
                SyntaxKind::Declarator,
            ]
        );
    }
}
