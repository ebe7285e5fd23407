//! Diagnostic records and terminal rendering for the D front-end.
//!
//! Lexical and syntax errors travel through the front-end as plain data;
//! this crate turns them into renderable [`Diagnostic`] records with
//! stable error codes, labeled spans, and notes, and prints them with
//! `file:line:col` positions through [`TerminalEmitter`].

mod diagnostic;
mod emitter;
mod line_index;

pub use diagnostic::{
    missing_token, unexpected_token, Diagnostic, ErrorCode, Label, Severity,
};
pub use emitter::{ColorMode, TerminalEmitter};
pub use line_index::LineIndex;
