//! Command handlers for the D front-end CLI.
//!
//! Each command reads one file, runs the front-end, and renders lexical
//! and syntax errors through `dlang_diagnostic`. Every command exits with
//! code 1 when the file has errors.

use std::io::IsTerminal;

use dlang_diagnostic::{ColorMode, Diagnostic, ErrorCode, TerminalEmitter};
use dlang_lexer::{lex, LexError, LexErrorKind};
use dlang_parse::{parse, Parse, SyntaxError};
use dlang_syntax::TokenKind;

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {path}: {err}");
            std::process::exit(1);
        }
    }
}

/// Tokenize and print the whole stream, trivia included.
pub fn lex_file(path: &str) {
    let source = read_file(path);
    let lexed = lex(&source);
    for token in lexed.tokens.raw() {
        if token.kind == TokenKind::Eof {
            break;
        }
        let text = &source[token.span.start as usize..token.span.end as usize];
        println!("{:?} @ {} {:?}", token.kind, token.span, text);
    }
    if lexed.has_errors() {
        let diagnostics: Vec<Diagnostic> = lexed.errors.iter().map(lex_diagnostic).collect();
        report(path, &source, &diagnostics);
        std::process::exit(1);
    }
}

/// Parse and print the top-level declarations.
pub fn parse_file(path: &str) {
    let source = read_file(path);
    let parse = parse(&source);
    for node in parse.syntax().child_nodes() {
        println!("{:?} @ {}", node.kind(), node.span());
    }
    finish(path, &source, &parse);
}

/// Parse and print the full tree, one node or token per line.
pub fn tree_file(path: &str) {
    let source = read_file(path);
    let parse = parse(&source);
    print!("{}", parse.syntax().debug_dump());
    finish(path, &source, &parse);
}

/// Parse and report diagnostics only.
pub fn check_file(path: &str) {
    let source = read_file(path);
    let parse = parse(&source);
    finish(path, &source, &parse);
    let decls = parse.syntax().child_nodes().count();
    println!("OK: {path} ({decls} top-level declarations)");
}

/// Report any errors the parse produced and exit 1 when there are some.
fn finish(path: &str, source: &str, parse: &Parse) {
    if !parse.has_errors() {
        return;
    }
    let diagnostics = collect_diagnostics(parse);
    report(path, source, &diagnostics);
    std::process::exit(1);
}

/// Lexical and syntax errors merged into source order.
fn collect_diagnostics(parse: &Parse) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<(u32, Diagnostic)> = parse
        .lex_errors()
        .iter()
        .map(|e| (e.span.start, lex_diagnostic(e)))
        .chain(
            parse
                .errors()
                .iter()
                .map(|e| (e.span.start, syntax_diagnostic(e))),
        )
        .collect();
    diagnostics.sort_by_key(|(at, _)| *at);
    diagnostics.into_iter().map(|(_, d)| d).collect()
}

fn report(path: &str, source: &str, diagnostics: &[Diagnostic]) {
    let is_tty = std::io::stderr().is_terminal();
    let mut emitter =
        TerminalEmitter::new(std::io::stderr(), ColorMode::Auto, is_tty, path, source);
    emitter.emit_all(diagnostics);
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    emitter.emit_summary(errors, diagnostics.len() - errors);
    emitter.flush();
}

fn lex_diagnostic(err: &LexError) -> Diagnostic {
    Diagnostic::error(lex_error_code(&err.kind))
        .with_message(err.kind.to_string())
        .with_label(err.span, "here")
}

fn lex_error_code(kind: &LexErrorKind) -> ErrorCode {
    match kind {
        LexErrorKind::UnterminatedString
        | LexErrorKind::UnterminatedChar
        | LexErrorKind::UnterminatedBlockComment
        | LexErrorKind::UnterminatedNestingComment
        | LexErrorKind::UnterminatedTokenString => ErrorCode::E0001,
        LexErrorKind::InvalidEscape { .. }
        | LexErrorKind::TruncatedHexEscape
        | LexErrorKind::UnknownNamedEntity
        | LexErrorKind::EmptyCharLiteral
        | LexErrorKind::MultiCharLiteral
        | LexErrorKind::InvalidHexStringChar { .. }
        | LexErrorKind::OddHexStringLength => ErrorCode::E0002,
        LexErrorKind::MissingDigits { .. }
        | LexErrorKind::MissingHexExponent
        | LexErrorKind::MalformedExponent => ErrorCode::E0003,
        LexErrorKind::InvalidByte { .. }
        | LexErrorKind::InteriorNull
        | LexErrorKind::InvalidUtf8
        | LexErrorKind::UnsupportedEncoding
        | LexErrorKind::StrayHash => ErrorCode::E0004,
    }
}

fn syntax_diagnostic(err: &SyntaxError) -> Diagnostic {
    let expected = expected_list(err);
    if err.span.start == err.span.end {
        dlang_diagnostic::missing_token(err.span.start, &expected, err.while_parsing)
    } else {
        dlang_diagnostic::unexpected_token(
            err.span,
            &expected,
            err.found.describe(),
            err.while_parsing,
        )
    }
}

fn expected_list(err: &SyntaxError) -> String {
    match err.expected.as_slice() {
        [] => "something else".to_string(),
        [one] => (*one).to_string(),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;
    use dlang_syntax::Span;

    #[test]
    fn lex_errors_map_to_stable_codes() {
        assert_eq!(
            lex_error_code(&LexErrorKind::UnterminatedString),
            ErrorCode::E0001
        );
        assert_eq!(
            lex_error_code(&LexErrorKind::InvalidEscape { escape_char: 'q' }),
            ErrorCode::E0002
        );
        assert_eq!(
            lex_error_code(&LexErrorKind::MissingDigits { radix: 16 }),
            ErrorCode::E0003
        );
        assert_eq!(
            lex_error_code(&LexErrorKind::InvalidByte { byte: 0x01 }),
            ErrorCode::E0004
        );
    }

    #[test]
    fn gap_errors_become_missing_token_diagnostics() {
        let parse = parse("module a\nint x;");
        let diagnostics = collect_diagnostics(&parse);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E1002);
        assert_eq!(diagnostics[0].primary_span(), Some(Span::new(8, 8)));
    }

    #[test]
    fn merged_diagnostics_are_in_source_order() {
        let parse = parse("int x = ;\nstring s = \"open\n");
        let diagnostics = collect_diagnostics(&parse);
        assert!(diagnostics.len() >= 2);
        let starts: Vec<u32> = diagnostics
            .iter()
            .map(|d| d.primary_span().unwrap().start)
            .collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }
}
