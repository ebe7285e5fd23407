//! Low-level raw scanner for D source text.
//!
//! This crate is the bottom layer of the front-end: it turns a byte buffer
//! into `(RawTag, len)` pairs with maximal-munch tokenization and no heap
//! allocation beyond the token-string nesting bookkeeping. It does not
//! resolve keywords, validate escape sequences, or parse numeric values —
//! those belong to the cooking layer (`dlang_lexer`).
//!
//! The crate is standalone on purpose: external tools (highlighters,
//! formatters) can tokenize D source without pulling in the parser.

mod cursor;
mod raw_scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use raw_scanner::{tokenize, RawScanner};
pub use source_buffer::{EncodingIssue, EncodingIssueKind, SourceBuffer};
pub use tag::{RawTag, RawToken};
