//! The incremental contract: for any single edit, `reparse` produces the
//! tree and diagnostics a from-scratch parse of the edited text would.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

use dlang_parse::{parse, reparse};
use dlang_syntax::TextChange;
use proptest::prelude::*;

const CORPUS: &[&str] = &[
    "module app;\nimport std.stdio;\n\nvoid main() {\n    writeln(1 + 2);\n}\n\nint helper(int x) { return x * 2; }\n",
    "struct S {\n    int a;\n    long b = 4;\n}\n\nenum E { one, two }\n\nS make() { return S(1, 2); }\n",
    "int a = 1;\n// comment between\nint b = 2;\n\nversion (X) {\n    int c;\n}\n",
    "alias Fn = int delegate(int);\n\nclass C {\n    this() {}\n    void m() { if (x) y(); else z(); }\n}\n",
];

fn apply(source: &str, change: TextChange, replacement: &str) -> String {
    let mut edited = String::with_capacity(source.len() + replacement.len());
    edited.push_str(&source[..change.start as usize]);
    edited.push_str(replacement);
    edited.push_str(&source[change.old_end as usize..]);
    edited
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn reparse_matches_scratch_parse(
        idx in 0usize..CORPUS.len(),
        start_seed in 0usize..10_000,
        deleted in 0usize..12,
        replacement in "[ a-z0-9;{}()=+*!./\"\\n]{0,10}",
    ) {
        let source = CORPUS[idx];
        // The corpus is ASCII, so any offset is a char boundary.
        let start = start_seed % (source.len() + 1);
        let old_end = (start + deleted).min(source.len());
        let change = TextChange::new(
            start as u32,
            old_end as u32,
            replacement.len() as u32,
        );
        let new_source = apply(source, change, &replacement);

        let old = parse(source);
        let incremental = reparse(&old, &new_source, change);
        let scratch = parse(&new_source);

        prop_assert_eq!(incremental.syntax().text(), new_source);
        prop_assert_eq!(
            incremental.syntax().debug_dump(),
            scratch.syntax().debug_dump()
        );
        prop_assert_eq!(incremental.errors(), scratch.errors());
        prop_assert_eq!(incremental.lex_errors(), scratch.lex_errors());
    }
}

#[test]
fn repeated_edits_stay_equivalent() {
    let mut source = CORPUS[0].to_string();
    let mut parsed = parse(&source);
    let edits: &[(usize, usize, &str)] = &[
        (0, 0, "// header\n"),
        (30, 0, "int early;\n"),
        (12, 6, "static import"),
        (5, 3, "pkg"),
    ];
    for &(start, deleted, replacement) in edits {
        let start = start.min(source.len());
        let old_end = (start + deleted).min(source.len());
        let change = TextChange::new(start as u32, old_end as u32, replacement.len() as u32);
        let new_source = apply(&source, change, replacement);
        let incremental = reparse(&parsed, &new_source, change);
        let scratch = parse(&new_source);
        assert_eq!(
            incremental.syntax().debug_dump(),
            scratch.syntax().debug_dump()
        );
        assert_eq!(incremental.errors(), scratch.errors());
        source = new_source;
        parsed = incremental;
    }
}

#[test]
fn untouched_declarations_are_shared_not_copied() {
    let source = CORPUS[0];
    let at = source.find("1 + 2").unwrap() as u32;
    let change = TextChange::replace(at, 5, 5);
    let new_source = apply(source, change, "9 - 3");
    let old = parse(source);
    let incremental = reparse(&old, &new_source, change);
    assert!(incremental.reuse_stats().reused_any());
    // Spliced subtrees are the same allocations as in the old tree.
    let old_last = old.syntax().child_nodes().last().unwrap();
    let new_last = incremental.syntax().child_nodes().last().unwrap();
    assert!(std::sync::Arc::ptr_eq(old_last.green(), new_last.green()));
}
