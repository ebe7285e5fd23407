//! Shared syntax vocabulary for the D front-end.
//!
//! Everything downstream crates agree on lives here: byte spans, the
//! terminal token kinds, the node-kind vocabulary, the lossless green/red
//! syntax tree, and the text-edit types consumed by the incremental
//! reparse controller.

mod edit;
mod kind;
mod span;
mod token;
mod token_list;
mod tree;

pub use edit::{ChangeMarker, TextChange};
pub use kind::SyntaxKind;
pub use span::Span;
pub use token::{Token, TokenFlags, TokenKind};
pub use token_list::TokenList;
pub use tree::{
    Checkpoint, GreenChild, GreenNode, GreenToken, SyntaxElement, SyntaxNode, SyntaxToken,
    TreeBuilder,
};
