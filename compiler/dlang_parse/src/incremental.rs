//! Incremental reparsing.
//!
//! [`reparse`] takes the previous [`Parse`], the edited source, and the
//! [`TextChange`] describing the edit, and rebuilds only the damaged part
//! of the file. Top-level declarations are the reuse granularity: a
//! declaration subtree from the old tree is spliced into the new one when
//! its text is untouched and the new token stream still starts and ends a
//! token exactly at its boundaries. Everything else is reparsed from the
//! freshly lexed stream, so the result is the tree a from-scratch parse
//! of the new text would produce.
//!
//! The whole file is relexed on every edit. Lexing is a single linear
//! pass and D's nestable block comments and delimited strings make cut
//! points expensive to prove safe; reusing whole declaration subtrees is
//! where the parse time actually goes.

use crate::{Parse, Parser};
use dlang_lexer::lex;
use dlang_syntax::{
    ChangeMarker, GreenNode, SyntaxKind, SyntaxNode, TextChange, TokenList,
};
use std::sync::Arc;

/// Tokens the damaged region is extended backwards over, so a decision
/// the parser made by lookahead before the edit point is reconsidered.
const LOOKBEHIND_TOKENS: usize = 4;

/// Counters describing how much of the previous tree a [`reparse`] call
/// carried over.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReuseStats {
    /// Top-level subtrees spliced from the old tree.
    pub reused_nodes: u32,
    /// Total width in bytes of the spliced subtrees.
    pub reused_bytes: u32,
}

impl ReuseStats {
    /// True when at least one subtree was spliced from the old tree.
    pub fn reused_any(&self) -> bool {
        self.reused_nodes > 0
    }
}

/// Reparse after a single text edit.
///
/// `new_source` must be the old source with `change` applied. The
/// returned tree is identical to `parse(new_source)`; only the work done
/// to produce it differs, which [`Parse::reuse_stats`] reports.
pub fn reparse(old: &Parse, new_source: &str, change: TextChange) -> Parse {
    let lexed = lex(new_source);
    let old_root = old.syntax();
    let marker = widen_to_tokens(&old_root, &change);
    let candidates = reusable_roots(old, &marker, new_source, &lexed.tokens);

    let mut parser = Parser::new(&lexed.tokens, new_source);
    let mut stats = ReuseStats::default();
    parser.start(SyntaxKind::SourceFile);
    let mut next = 0usize;
    let mut at_file_start = true;
    while !parser.is_eof() {
        let offset = parser.cursor.span().start;
        // Candidates the parse has already consumed past cannot be
        // spliced any more; recovery may legitimately run over them.
        while next < candidates.len() && candidates[next].0 < offset {
            next += 1;
        }
        // A module declaration only parses at the head of the file; a
        // spliced one anywhere else would not match a scratch parse.
        if next < candidates.len()
            && candidates[next].0 == offset
            && (at_file_start || candidates[next].1.kind != SyntaxKind::ModuleDeclaration)
        {
            let node = Arc::clone(&candidates[next].1);
            next += 1;
            let width = node.width();
            parser.flush_trivia();
            parser.builder.push_green(node);
            parser
                .cursor
                .set_pos(lexed.tokens.significant_pos_at(offset + width));
            stats.reused_nodes += 1;
            stats.reused_bytes += width;
        } else if at_file_start && parser.at_module_declaration() {
            parser.module_declaration();
        } else {
            parser.decl_def();
        }
        at_file_start = false;
    }
    parser.flush_trivia();
    parser.finish_node();
    let (green, errors) = parser.finish();
    tracing::debug!(
        bytes = new_source.len(),
        reused_nodes = stats.reused_nodes,
        reused_bytes = stats.reused_bytes,
        errors = errors.len(),
        "reparsed source file"
    );
    Parse {
        green,
        errors,
        lex_errors: lexed.errors,
        reuse: stats,
    }
}

/// Widen the edit to token boundaries of the old tree plus lookbehind.
///
/// Extending to the enclosing tokens handles maximal munch at the edit
/// edges (typing `=` after `+` must damage the `+`); the lookbehind
/// covers decisions made by peeking at tokens the edit then rewrote.
fn widen_to_tokens(old_root: &SyntaxNode, change: &TextChange) -> ChangeMarker {
    let mut widen_start = change.start;
    for _ in 0..=LOOKBEHIND_TOKENS {
        if widen_start == 0 {
            break;
        }
        match old_root.token_at_offset(widen_start - 1) {
            Some(t) => widen_start = t.span().start,
            None => break,
        }
    }
    let widen_end = old_root
        .token_at_offset(change.old_end)
        .map_or(change.old_end, |t| t.span().end);
    ChangeMarker::from_change(change, widen_start, widen_end)
}

/// Top-level subtrees of the old tree that can be spliced verbatim,
/// paired with their start offset in the new text, in source order.
fn reusable_roots(
    old: &Parse,
    marker: &ChangeMarker,
    new_source: &str,
    tokens: &TokenList,
) -> Vec<(u32, Arc<GreenNode>)> {
    let root = old.syntax();
    let mut out = Vec::new();
    for child in root.child_nodes() {
        let span = child.span();
        if marker.intersects(span) {
            continue;
        }
        // A subtree that parsed with errors is rebuilt so its
        // diagnostics are regenerated. Missing-token errors sit on the
        // gap at a node's edge, hence the inclusive comparison.
        let touched_by_error = old
            .errors
            .iter()
            .any(|e| e.span.start >= span.start && e.span.start <= span.end);
        if touched_by_error || child.descendants().any(|n| n.kind().is_error()) {
            continue;
        }
        let new_start = marker.adjust_position(span.start);
        let width = child.green().width();
        let new_end = new_start + width;
        if new_end as usize > new_source.len() {
            continue;
        }
        // The new stream must start a significant token exactly at the
        // node's start and any token exactly at its end, or the edit
        // merged tokens across the old boundary.
        if !starts_significant(tokens, new_start) || !is_token_boundary(tokens, new_end) {
            continue;
        }
        if child.green().text() != new_source[new_start as usize..new_end as usize] {
            continue;
        }
        out.push((new_start, Arc::clone(child.green())));
    }
    out
}

fn starts_significant(tokens: &TokenList, offset: u32) -> bool {
    let pos = tokens.significant_pos_at(offset);
    tokens.significant(pos).span.start == offset
}

fn is_token_boundary(tokens: &TokenList, offset: u32) -> bool {
    let raw = tokens.raw();
    let idx = raw.partition_point(|t| t.span.start < offset);
    idx < raw.len() && raw[idx].span.start == offset
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    fn apply(source: &str, change: TextChange, replacement: &str) -> String {
        assert_eq!(replacement.len() as u32, change.new_len);
        let mut edited = String::with_capacity(source.len());
        edited.push_str(&source[..change.start as usize]);
        edited.push_str(replacement);
        edited.push_str(&source[change.old_end as usize..]);
        edited
    }

    /// Reparse incrementally and insist the result matches a parse from
    /// scratch, tree and diagnostics both.
    fn check(source: &str, change: TextChange, replacement: &str) -> Parse {
        let old = parse(source);
        let new_source = apply(source, change, replacement);
        let incremental = reparse(&old, &new_source, change);
        let scratch = parse(&new_source);
        assert_eq!(
            incremental.syntax().debug_dump(),
            scratch.syntax().debug_dump(),
            "incremental tree diverged for edit {change:?} on\n{source}"
        );
        assert_eq!(incremental.syntax().text(), new_source);
        assert_eq!(incremental.errors(), scratch.errors());
        incremental
    }

    const THREE_DECLS: &str = "int a = 1;\n\nvoid f() {\n    g(1);\n}\n\nlong tail = 2;\n";

    #[test]
    fn edit_inside_one_function_reuses_the_neighbors() {
        let at = THREE_DECLS.find("g(1").unwrap() as u32 + 2;
        let parse = check(THREE_DECLS, TextChange::replace(at, 1, 2), "42");
        assert_eq!(parse.reuse_stats().reused_nodes, 2);
        assert!(parse.reuse_stats().reused_any());
    }

    #[test]
    fn insertion_at_the_end_reuses_everything_before() {
        let added = "\nbool z;\n";
        let at = THREE_DECLS.len() as u32;
        let parse = check(
            THREE_DECLS,
            TextChange::insert(at, added.len() as u32),
            added,
        );
        // The tail declaration sits inside the lookbehind window of the
        // insertion point, so only the first two survive.
        assert_eq!(parse.reuse_stats().reused_nodes, 2);
    }

    #[test]
    fn comment_edit_shifts_later_declarations() {
        let source = "int a;\n// note\nint b;\nint c;\n";
        let at = source.find("note").unwrap() as u32;
        let parse = check(source, TextChange::replace(at, 4, 11), "longer note");
        // The decls after the comment are reused at shifted offsets; the
        // one before it falls inside the lookbehind window.
        assert_eq!(parse.reuse_stats().reused_nodes, 2);
    }

    #[test]
    fn deleting_a_brace_falls_back_gracefully() {
        let source = "void f() {\n    g();\n}\nint after;\n";
        let at = source.find('}').unwrap() as u32;
        check(source, TextChange::delete(at, 1), "");
    }

    #[test]
    fn edit_that_merges_tokens_rebuilds_the_region() {
        // Deleting the space turns `a b` into one identifier.
        let source = "int a ;\nint other;\n";
        let at = source.find(" ;").unwrap() as u32;
        check(source, TextChange::delete(at, 1), "");
    }

    #[test]
    fn splitting_an_identifier_matches_scratch_parse() {
        let source = "int abcdef = 1;\nint keep;\n";
        let at = source.find("abcdef").unwrap() as u32 + 3;
        check(source, TextChange::insert(at, 1), " ");
    }

    #[test]
    fn edit_inside_an_erroneous_declaration_regenerates_its_errors() {
        let source = "int x = ;\nint y = 2;\n";
        let at = source.find('x').unwrap() as u32;
        let parse = check(source, TextChange::replace(at, 1, 1), "w");
        assert!(parse.has_errors());
        // The clean neighbor is still reused.
        assert_eq!(parse.reuse_stats().reused_nodes, 1);
    }

    #[test]
    fn module_declaration_edit_reparses_the_header_only() {
        let source = "module a.b;\nint x;\nint y;\n";
        let at = source.find('b').unwrap() as u32;
        let parse = check(source, TextChange::replace(at, 1, 1), "c");
        assert_eq!(parse.reuse_stats().reused_nodes, 2);
    }

    #[test]
    fn from_scratch_parse_reports_zero_reuse() {
        let parse = parse("int x;");
        assert_eq!(parse.reuse_stats(), ReuseStats::default());
        assert!(!parse.reuse_stats().reused_any());
    }

    #[test]
    fn whole_file_replacement_reuses_nothing() {
        let source = "int a;\n";
        let new = "struct S { int m; }\n";
        let parse = check(
            source,
            TextChange::replace(0, source.len() as u32, new.len() as u32),
            new,
        );
        assert_eq!(parse.reuse_stats().reused_nodes, 0);
    }
}
