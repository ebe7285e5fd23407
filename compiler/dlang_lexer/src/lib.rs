//! Lexer for D source text.
//!
//! Drives the raw scanner (`dlang_lexer_core`) and cooks its `(RawTag,
//! len)` output into the parser's `TokenKind` stream: keyword resolution,
//! escape validation, numeric literal checks. Lexing never fails; broken
//! input becomes error tokens plus [`LexError`] records and the stream
//! still tiles the source exactly.

mod cooker;
mod keywords;
mod lex_error;

pub use lex_error::{LexError, LexErrorKind};

use cooker::TokenCooker;
use dlang_lexer_core::{EncodingIssueKind, RawScanner, RawTag, SourceBuffer};
use dlang_syntax::{Span, Token, TokenFlags, TokenKind, TokenList};

/// Everything lexing one source text produces.
#[derive(Clone, Debug, Default)]
pub struct LexedSource {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexedSource {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex source text into a [`LexedSource`].
///
/// The token stream always ends with an `Eof` token whose span is empty
/// and positioned at the end of the source.
pub fn lex(source: &str) -> LexedSource {
    let buffer = SourceBuffer::new(source);
    let mut errors = Vec::new();
    for issue in buffer.encoding_issues() {
        let span = Span::new(issue.pos, issue.pos + issue.len);
        let kind = match issue.kind {
            EncodingIssueKind::Utf16LeBom | EncodingIssueKind::Utf16BeBom => {
                LexErrorKind::UnsupportedEncoding
            }
            EncodingIssueKind::InteriorNull => LexErrorKind::InteriorNull,
        };
        errors.push(LexError::new(span, kind));
    }

    let mut scanner = RawScanner::new(buffer.cursor());
    let mut cooker = TokenCooker::new();
    let mut tokens = Vec::new();
    let mut offset: u32 = 0;

    loop {
        let raw = scanner.next_token();
        if raw.tag == RawTag::Eof {
            break;
        }
        let span = Span::new(offset, offset + raw.len);
        let slice = &source[span.start as usize..span.end as usize];
        let kind = cooker.cook(raw.tag, offset, slice);
        let flags = if cooker.last_cook_had_error() || raw.tag.is_error() {
            TokenFlags::LEX_ERROR
        } else {
            TokenFlags::empty()
        };
        tokens.push(Token::with_flags(kind, span, flags));
        offset = span.end;
    }

    tokens.push(Token::new(TokenKind::Eof, Span::new(offset, offset)));
    errors.extend(cooker.into_errors());
    errors.sort_by_key(|e| (e.span.start, e.span.end));

    LexedSource {
        tokens: TokenList::new(tokens),
        errors,
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
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .tokens
            .raw()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokens_tile_the_source() {
        let source = "module demo;\nint x = 0x1F + 1_000;\n";
        let lexed = lex(source);
        let mut pos = 0;
        for token in lexed.tokens.raw() {
            assert_eq!(token.span.start, pos);
            pos = token.span.end;
        }
        assert_eq!(pos, source.len() as u32);
        assert!(!lexed.has_errors());
    }

    #[test]
    fn keyword_resolution() {
        assert_eq!(
            kinds("while"),
            vec![TokenKind::While, TokenKind::Eof]
        );
        assert_eq!(
            kinds("whilex"),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn maximal_munch_shift_operators() {
        assert_eq!(
            kinds("a >>>= b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::UshrAssign,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn nested_comment_is_one_trivia_token() {
        assert_eq!(
            kinds("/+ a /+ b +/ c +/"),
            vec![TokenKind::NestingBlockComment, TokenKind::Eof]
        );
    }

    #[test]
    fn token_string_with_nested_braces() {
        let source = r#"q{ foo({ "}" }); }"#;
        assert_eq!(
            kinds(source),
            vec![TokenKind::TokenStringLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn six_string_forms() {
        let source = "\"a\" r\"b\" `c` x\"00\" q\"(d)\" q{e}";
        let significant: Vec<_> = lex(source)
            .tokens
            .raw()
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            significant,
            vec![
                TokenKind::DqStringLiteral,
                TokenKind::WysiwygStringLiteral,
                TokenKind::BacktickStringLiteral,
                TokenKind::HexStringLiteral,
                TokenKind::DelimitedStringLiteral,
                TokenKind::TokenStringLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_reaches_eof_with_error() {
        let lexed = lex("\"abc");
        let kinds: Vec<_> = lexed.tokens.raw().iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::DqStringLiteral, TokenKind::Eof]);
        assert!(lexed.tokens.raw()[0].flags.contains(TokenFlags::LEX_ERROR));
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn unterminated_block_comment_stays_trivia() {
        let lexed = lex("int x; /* open");
        let comment = lexed.tokens.raw().iter().find(|t| t.kind.is_trivia()
            && t.flags.contains(TokenFlags::LEX_ERROR));
        assert_eq!(comment.map(|t| t.kind), Some(TokenKind::BlockComment));
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedBlockComment);
    }

    #[test]
    fn bad_escape_keeps_token_kind() {
        let lexed = lex(r#"auto s = "a\qb";"#);
        let string = lexed
            .tokens
            .raw()
            .iter()
            .find(|t| t.kind == TokenKind::DqStringLiteral)
            .unwrap();
        assert!(string.flags.contains(TokenFlags::LEX_ERROR));
        assert_eq!(lexed.errors.len(), 1);
    }

    #[test]
    fn shebang_only_at_file_start() {
        assert_eq!(
            kinds("#!/usr/bin/rdmd\n"),
            vec![TokenKind::Shebang, TokenKind::Newline, TokenKind::Eof]
        );
        let later = lex("x\n#!/usr/bin/rdmd\n");
        assert!(later
            .tokens
            .raw()
            .iter()
            .all(|t| t.kind != TokenKind::Shebang));
    }

    #[test]
    fn line_directive_is_trivia() {
        assert_eq!(
            kinds("#line 42\n"),
            vec![TokenKind::LineDirective, TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn float_versus_range_punctuation() {
        assert_eq!(
            kinds("1..2"),
            vec![
                TokenKind::IntLiteral,
                TokenKind::DotDot,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("1.5e3f"),
            vec![TokenKind::FloatLiteral, TokenKind::Eof]
        );
        assert_eq!(
            kinds("0x1.8p3"),
            vec![TokenKind::FloatLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn integer_suffixes_stay_attached() {
        for source in ["10L", "10u", "10UL", "10Lu", "0xFFu", "1_000"] {
            assert_eq!(
                kinds(source),
                vec![TokenKind::IntLiteral, TokenKind::Eof],
                "for {source}"
            );
        }
    }

    proptest! {
        #[test]
        fn lexing_never_panics_and_tiles(source in "\\PC*") {
            let lexed = lex(&source);
            let mut pos = 0u32;
            for token in lexed.tokens.raw() {
                prop_assert_eq!(token.span.start, pos);
                pos = token.span.end;
            }
            prop_assert_eq!(pos as usize, source.len());
        }
    }
}
