//! End-to-end properties of the parser: lossless trees, determinism, and
//! error containment, exercised over whole files rather than single
//! productions.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

use dlang_parse::parse;
use dlang_syntax::{SyntaxKind, TokenKind};
use pretty_assertions::assert_eq;

const CORPUS: &[&str] = &[
    "",
    "module app;\nimport std.stdio : writeln;\n\nvoid main() {\n    writeln(\"hi\");\n}\n",
    "struct Pair(T) {\n    T first;\n    T second;\n    T sum() const { return first + second; }\n}\n",
    "enum Color { red, green = 2, blue }\nenum size_t width = 640;\n",
    "class Base {\n    this(int n) { value = n; }\n    ~this() {}\n    invariant { assert(value >= 0); }\n    private int value;\n}\n",
    "template Tuple(T...) {\n    alias Tuple = T;\n}\nmixin Tuple!(int, long) pair;\n",
    "version (Posix) {\n    extern (C) int open(const char* path, int flags);\n} else {\n    static assert(0, \"unsupported\");\n}\n",
    "void algo(alias pred, R)(R range)\nif (is(typeof(pred(range.front))))\nin (range.length > 0)\ndo {\n    foreach (i, ref e; range) { e = pred(e); }\n}\n",
    "int f(int x) {\n    switch (x) {\n        case 1: .. case 9: return x * 2;\n        default: break;\n    }\n    return x !is 0 ? -x ^^ 2 : x in table ? 1 : 0;\n}\n",
    "unittest {\n    auto s = q{ tokens \"inside\" };\n    auto w = r\"C:\\no\\escapes\";\n    assert(s.length && w.length);\n}\n",
    // Broken inputs still round-trip.
    "int x = ;\nstruct { int\nvoid f( {}\n",
    "module broken\nclass C : { void m() { if (x) } }\n",
];

#[test]
fn every_corpus_file_round_trips() {
    for source in CORPUS {
        let parse = parse(source);
        assert_eq!(
            parse.syntax().text(),
            *source,
            "tree text diverged for\n{source}"
        );
    }
}

#[test]
fn spans_tile_the_file_exactly() {
    for source in CORPUS {
        let parse = parse(source);
        let root = parse.syntax();
        let mut offset = 0u32;
        let mut stack = vec![root.clone()];
        // Walk tokens in order; each must start where the previous ended.
        let mut tokens = Vec::new();
        while let Some(node) = stack.pop() {
            for element in node.children() {
                match element {
                    dlang_syntax::SyntaxElement::Node(n) => stack.push(n),
                    dlang_syntax::SyntaxElement::Token(t) => tokens.push(t.span()),
                }
            }
        }
        tokens.sort_by_key(|s| s.start);
        for span in tokens {
            assert_eq!(span.start, offset, "gap or overlap in\n{source}");
            offset = span.end;
        }
        assert_eq!(offset as usize, source.len());
    }
}

#[test]
fn parsing_is_deterministic() {
    for source in CORPUS {
        let a = parse(source);
        let b = parse(source);
        assert_eq!(a.syntax().debug_dump(), b.syntax().debug_dump());
        assert_eq!(a.errors(), b.errors());
    }
}

#[test]
fn module_and_import_tree_shape() {
    let parse = parse("module a.b;\nimport c.d : e;\n");
    assert!(!parse.has_errors(), "{:?}", parse.errors());
    let root = parse.syntax();
    assert_eq!(root.kind(), SyntaxKind::SourceFile);
    let kinds: Vec<SyntaxKind> = root.child_nodes().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::ModuleDeclaration, SyntaxKind::ImportDeclaration]
    );
    let import = root.child_nodes().nth(1).unwrap();
    assert!(import
        .descendants()
        .any(|n| n.kind() == SyntaxKind::ImportBindings));
}

#[test]
fn trailing_underscore_digit_groups_lex_as_one_literal() {
    let source = "int x = 1_000_0;";
    let parse = parse(source);
    assert!(!parse.has_errors(), "{:?}", parse.errors());
    let at = source.find('1').unwrap() as u32;
    let token = parse.syntax().token_at_offset(at).unwrap();
    assert_eq!(token.kind(), TokenKind::IntLiteral);
    assert_eq!(token.text(), "1_000_0");
}

#[test]
fn nested_comment_is_one_trivia_token() {
    let source = "/+ outer /+ inner +/ still outer +/ int x;";
    let parse = parse(source);
    assert!(!parse.has_errors(), "{:?}", parse.errors());
    let token = parse.syntax().token_at_offset(0).unwrap();
    assert_eq!(token.kind(), TokenKind::NestingBlockComment);
    assert_eq!(token.text(), "/+ outer /+ inner +/ still outer +/");
}

#[test]
fn dangling_else_attaches_to_the_nearest_if() {
    let source = "void f() { if (a) if (b) x(); else y(); }";
    let parse = parse(source);
    assert!(!parse.has_errors(), "{:?}", parse.errors());
    let root = parse.syntax();
    let ifs: Vec<_> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::IfStatement)
        .collect();
    assert_eq!(ifs.len(), 2);
    // The inner if owns the else branch, so the outer if's span equals
    // the inner's extent and the else call is inside the inner if.
    let inner = ifs
        .iter()
        .max_by_key(|n| n.span().start)
        .unwrap();
    let else_at = source.find("y()").unwrap() as u32;
    assert!(inner.span().contains(else_at));
}

#[test]
fn unterminated_string_runs_to_end_of_file_without_looping() {
    let source = "auto s = \"abc;";
    let parse = parse(source);
    assert!(parse.has_errors());
    assert_eq!(parse.lex_errors().len(), 1);
    assert_eq!(parse.syntax().text(), source);
    // The string token covers everything from the opening quote to the
    // end of the file; the declaration around it still forms.
    let at = source.find('"').unwrap() as u32;
    let token = parse.syntax().token_at_offset(at).unwrap();
    assert_eq!(token.span().end as usize, source.len());
    assert!(parse
        .syntax()
        .child_nodes()
        .any(|n| n.kind() == SyntaxKind::VarDeclarations));
    // The run-on string still lexes as a string literal, so the
    // initializer holds it rather than an empty placeholder.
    let init = parse
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::Initializer)
        .unwrap();
    assert_eq!(init.text(), "\"abc;");
}

#[test]
fn broken_inputs_keep_errors_inside_error_nodes() {
    let source = "int ) bad;\nint good = 1;\n";
    let parse = parse(source);
    assert!(parse.has_errors());
    let root = parse.syntax();
    assert!(root.descendants().any(|n| n.kind() == SyntaxKind::Error));
    let last = root.child_nodes().last().unwrap();
    assert_eq!(last.kind(), SyntaxKind::VarDeclarations);
    assert_eq!(last.text(), "int good = 1;");
}

#[test]
fn operator_precedence_shapes_whole_expressions() {
    let source = "int r = a + b * c == d << e ? f : g;";
    let parse = parse(source);
    assert!(!parse.has_errors(), "{:?}", parse.errors());
    let root = parse.syntax();
    let ternary = root
        .descendants()
        .find(|n| n.kind() == SyntaxKind::TernaryExpression)
        .expect("ternary at the top of the initializer");
    // `==` compares `a + b * c` against `d << e`; both sides sit under
    // the condition of the ternary.
    let cond = ternary
        .child_nodes()
        .find(|n| n.kind() == SyntaxKind::BinaryExpression)
        .expect("comparison as the ternary condition");
    assert!(cond.text().contains("a + b * c"));
    assert!(cond.text().contains("d << e"));
}
