//! Pure-lookahead probes for ambiguous positions.
//!
//! D cannot be parsed with fixed lookahead: `a * b;` is a declaration,
//! `a * b,` inside an expression is multiplication, and a template
//! function head needs the parser to see two adjacent parenthesized
//! groups. The probes here scan the significant token stream without
//! touching the tree builder, so a failed trial costs nothing and never
//! emits errors. Whatever the probe decides, the committed parse runs
//! over the same tokens again and produces the diagnostics.

use crate::Parser;
use dlang_syntax::TokenKind;

impl Parser<'_> {
    #[inline]
    fn peek(&self, pos: usize) -> TokenKind {
        self.cursor.tokens().significant(pos).kind
    }

    /// Scan a balanced `open`..`close` group starting at `pos` (which must
    /// hold `open`). Returns the position after the closing token. Other
    /// bracket kinds inside the group are not tracked; only the probed
    /// pair nests.
    pub(crate) fn probe_balanced(
        &self,
        pos: usize,
        open: TokenKind,
        close: TokenKind,
    ) -> Option<usize> {
        if self.peek(pos) != open {
            return None;
        }
        let mut depth = 0usize;
        let mut pos = pos;
        loop {
            let kind = self.peek(pos);
            if kind == TokenKind::Eof {
                return None;
            }
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return Some(pos + 1);
                }
            }
            pos += 1;
        }
    }

    /// Scan a `!` template argument suffix at `pos`. Returns the position
    /// after it.
    pub(crate) fn probe_template_suffix(&self, pos: usize) -> Option<usize> {
        if self.peek(pos) != TokenKind::Bang {
            return None;
        }
        let arg = pos + 1;
        if self.peek(arg) == TokenKind::LeftParen {
            return self.probe_balanced(arg, TokenKind::LeftParen, TokenKind::RightParen);
        }
        let kind = self.peek(arg);
        let single = kind == TokenKind::Identifier
            || kind == TokenKind::This
            || kind.is_basic_type_keyword()
            || kind.is_literal();
        single.then_some(arg + 1)
    }

    /// Scan a dotted identifier path with optional template suffixes.
    /// Returns the position after the last path segment.
    pub(crate) fn probe_qualified_identifier(&self, pos: usize) -> Option<usize> {
        if self.peek(pos) != TokenKind::Identifier {
            return None;
        }
        let mut pos = pos + 1;
        if let Some(after) = self.probe_template_suffix(pos) {
            pos = after;
        }
        while self.peek(pos) == TokenKind::Dot && self.peek(pos + 1) == TokenKind::Identifier {
            pos += 2;
            if let Some(after) = self.probe_template_suffix(pos) {
                pos = after;
            }
        }
        Some(pos)
    }

    /// Scan a type starting at `pos`. Returns the position just after the
    /// type, or `None` when the tokens cannot begin one.
    pub(crate) fn probe_type(&self, pos: usize) -> Option<usize> {
        let mut pos = pos;

        // Leading qualifier keywords. `const(T)` is part of the basic
        // type and handled below, so only bare qualifiers skip here.
        while self.peek(pos).is_type_ctor() && self.peek(pos + 1) != TokenKind::LeftParen {
            pos += 1;
        }

        let kind = self.peek(pos);
        pos = if kind.is_basic_type_keyword() {
            pos + 1
        } else if kind.is_type_ctor() {
            // const(T)
            self.probe_balanced(pos + 1, TokenKind::LeftParen, TokenKind::RightParen)?
        } else if kind == TokenKind::Typeof || kind == TokenKind::Vector {
            let after = self.probe_balanced(pos + 1, TokenKind::LeftParen, TokenKind::RightParen)?;
            if self.peek(after) == TokenKind::Dot {
                self.probe_qualified_identifier(after + 1)?
            } else {
                after
            }
        } else if kind == TokenKind::Dot {
            self.probe_qualified_identifier(pos + 1)?
        } else if kind == TokenKind::Identifier {
            self.probe_qualified_identifier(pos)?
        } else {
            return None;
        };

        // Suffixes: pointer, array, delegate/function.
        loop {
            match self.peek(pos) {
                TokenKind::Star => pos += 1,
                TokenKind::LeftBracket => {
                    pos = self.probe_balanced(
                        pos,
                        TokenKind::LeftBracket,
                        TokenKind::RightBracket,
                    )?;
                }
                TokenKind::Delegate | TokenKind::Function => {
                    pos = self.probe_balanced(
                        pos + 1,
                        TokenKind::LeftParen,
                        TokenKind::RightParen,
                    )?;
                    while self.peek(pos).is_type_ctor()
                        || matches!(
                            self.peek(pos),
                            TokenKind::Pure
                                | TokenKind::Nothrow
                                | TokenKind::Return
                                | TokenKind::Scope
                        )
                    {
                        pos += 1;
                    }
                }
                _ => return Some(pos),
            }
        }
    }

    /// Does the statement at the cursor begin a declaration rather than an
    /// expression?
    ///
    /// Unambiguous starters (keywords, basic types, attributes) answer
    /// immediately. An identifier head is a declaration exactly when a
    /// whole type can be scanned and a declarator identifier follows it:
    /// `a * b;` declares, `a * b,` multiplies.
    pub(crate) fn at_declaration_start(&self) -> bool {
        match self.kind() {
            // These keywords open declarations and expressions both;
            // probe instead of assuming.
            TokenKind::Typeof | TokenKind::Identifier | TokenKind::Dot => {}
            TokenKind::Mixin => {
                // `mixin(...)` is an expression statement; `mixin Name;`
                // instantiates a mixin template.
                return self.nth(1) != TokenKind::LeftParen;
            }
            TokenKind::This | TokenKind::Tilde | TokenKind::Delete | TokenKind::Cast => {
                return false;
            }
            TokenKind::Const | TokenKind::Immutable | TokenKind::Shared | TokenKind::Inout => {
                // `const(T)x` or `const x`: a cast-free qualifier always
                // opens a declaration in statement position.
                return true;
            }
            kind if kind.is_basic_type_keyword() => return true,
            kind if crate::recovery::DECL_START.contains(kind) => return true,
            _ => return false,
        }

        let Some(after_type) = self.probe_type(self.cursor.pos()) else {
            return false;
        };
        if self.peek(after_type) != TokenKind::Identifier {
            return false;
        }
        match self.peek(after_type + 1) {
            TokenKind::Semicolon | TokenKind::Assign | TokenKind::Comma => true,
            // C-style array declarator: `Foo x[10];` declares.
            TokenKind::LeftBracket => true,
            TokenKind::LeftParen => self.at_function_head(after_type),
            _ => false,
        }
    }

    /// Is the identifier at `pos` the name of a function declaration? The
    /// head is one or two adjacent paren groups (template parameters then
    /// runtime parameters) followed by a body, contract, constraint, or
    /// member attribute.
    pub(crate) fn at_function_head(&self, pos: usize) -> bool {
        debug_assert_eq!(self.peek(pos), TokenKind::Identifier);
        let Some(mut after) =
            self.probe_balanced(pos + 1, TokenKind::LeftParen, TokenKind::RightParen)
        else {
            return false;
        };
        if self.peek(after) == TokenKind::LeftParen {
            match self.probe_balanced(after, TokenKind::LeftParen, TokenKind::RightParen) {
                Some(a) => after = a,
                None => return false,
            }
        }
        matches!(
            self.peek(after),
            TokenKind::LeftBrace
                | TokenKind::Semicolon
                | TokenKind::In
                | TokenKind::Out
                | TokenKind::Do
                | TokenKind::If
                | TokenKind::Pure
                | TokenKind::Nothrow
                | TokenKind::Const
                | TokenKind::Immutable
                | TokenKind::Inout
                | TokenKind::Shared
                | TokenKind::Return
                | TokenKind::Scope
                | TokenKind::At
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlang_lexer::lex;

    fn probe_parser(source: &str, f: impl FnOnce(&Parser)) {
        let lexed = lex(source);
        let parser = Parser::new(&lexed.tokens, source);
        f(&parser);
    }

    #[test]
    fn type_probe_scans_suffixes() {
        probe_parser("const(int)[] delegate(int) pure x", |p| {
            let end = p.probe_type(0).unwrap();
            assert_eq!(p.peek(end), TokenKind::Identifier);
        });
    }

    #[test]
    fn type_probe_rejects_non_types() {
        probe_parser("return 1;", |p| {
            assert!(p.probe_type(0).is_none());
        });
    }

    #[test]
    fn star_disambiguation_follows_the_semicolon_rule() {
        probe_parser("a * b;", |p| assert!(p.at_declaration_start()));
        probe_parser("a * b()", |p| assert!(!p.at_declaration_start()));
        probe_parser("a.b!(int)* c;", |p| assert!(p.at_declaration_start()));
    }

    #[test]
    fn template_function_head_needs_two_paren_groups() {
        probe_parser("max(T)(T a, T b) { }", |p| {
            assert!(p.at_function_head(0));
        });
        probe_parser("max(1, 2) + 3", |p| {
            assert!(!p.at_function_head(0));
        });
    }

    #[test]
    fn mixin_statement_versus_template_mixin() {
        probe_parser("mixin(\"int x;\");", |p| assert!(!p.at_declaration_start()));
        probe_parser("mixin Foo;", |p| assert!(p.at_declaration_start()));
    }
}
