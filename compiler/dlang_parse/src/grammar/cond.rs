//! Conditional compilation: `version`, `debug`, `static if`,
//! `static assert`, and `static foreach`.
//!
//! Both branches of a condition are parsed and kept in the tree; which
//! branch is live is a semantic question the parser does not answer.

use crate::Parser;
use dlang_syntax::{SyntaxKind, TokenKind};

impl Parser<'_> {
    /// The condition head: `version(...)`, `debug`, `debug(...)`, or
    /// `static if (...)`.
    fn condition(&mut self) {
        match self.kind() {
            TokenKind::Version => {
                self.start(SyntaxKind::VersionCondition);
                self.bump();
                self.expect(TokenKind::LeftParen, "a version condition");
                match self.kind() {
                    TokenKind::IntLiteral
                    | TokenKind::Identifier
                    | TokenKind::Unittest
                    | TokenKind::Assert => self.bump(),
                    _ => self.error_missing(["a version identifier"], "a version condition"),
                }
                self.expect(TokenKind::RightParen, "a version condition");
                self.finish_node();
            }
            TokenKind::Debug => {
                self.start(SyntaxKind::DebugCondition);
                self.bump();
                if self.eat(TokenKind::LeftParen) {
                    match self.kind() {
                        TokenKind::IntLiteral | TokenKind::Identifier => self.bump(),
                        _ => self.error_missing(["a debug identifier"], "a debug condition"),
                    }
                    self.expect(TokenKind::RightParen, "a debug condition");
                }
                self.finish_node();
            }
            TokenKind::Static => {
                self.start(SyntaxKind::StaticIfCondition);
                self.bump();
                self.expect(TokenKind::If, "a static if condition");
                self.expect(TokenKind::LeftParen, "a static if condition");
                self.assign_expr();
                self.expect(TokenKind::RightParen, "a static if condition");
                self.finish_node();
            }
            _ => unreachable!("condition called off a condition keyword"),
        }
    }

    /// A condition at declaration level with declaration arms.
    pub(crate) fn conditional_declaration(&mut self) {
        self.start(SyntaxKind::ConditionalDeclaration);
        self.condition();
        if self.eat(TokenKind::Colon) {
            // The condition applies to the rest of the scope; the
            // following declarations stay siblings.
            self.finish_node();
            return;
        }
        if self.at(TokenKind::LeftBrace) {
            self.declaration_block();
        } else {
            self.decl_def();
        }
        if self.eat(TokenKind::Else) {
            if self.at(TokenKind::LeftBrace) {
                self.declaration_block();
            } else {
                self.decl_def();
            }
        }
        self.finish_node();
    }

    /// A condition at statement level with statement arms.
    pub(crate) fn conditional_statement(&mut self) {
        self.start(SyntaxKind::ConditionalStatement);
        self.condition();
        self.statement();
        if self.eat(TokenKind::Else) {
            self.statement();
        }
        self.finish_node();
    }

    pub(crate) fn version_specification(&mut self) {
        self.start(SyntaxKind::VersionSpecification);
        self.bump();
        self.expect(TokenKind::Assign, "a version specification");
        match self.kind() {
            TokenKind::IntLiteral | TokenKind::Identifier => self.bump(),
            _ => self.error_missing(["a version identifier"], "a version specification"),
        }
        self.expect(TokenKind::Semicolon, "a version specification");
        self.finish_node();
    }

    pub(crate) fn debug_specification(&mut self) {
        self.start(SyntaxKind::DebugSpecification);
        self.bump();
        self.expect(TokenKind::Assign, "a debug specification");
        match self.kind() {
            TokenKind::IntLiteral | TokenKind::Identifier => self.bump(),
            _ => self.error_missing(["a debug identifier"], "a debug specification"),
        }
        self.expect(TokenKind::Semicolon, "a debug specification");
        self.finish_node();
    }

    pub(crate) fn static_assert(&mut self) {
        self.start(SyntaxKind::StaticAssert);
        self.bump();
        self.expect(TokenKind::Assert, "a static assert");
        self.expect(TokenKind::LeftParen, "a static assert");
        self.assign_expr();
        if self.eat(TokenKind::Comma) {
            self.assign_expr();
        }
        self.expect(TokenKind::RightParen, "a static assert");
        self.expect(TokenKind::Semicolon, "a static assert");
        self.finish_node();
    }

    pub(crate) fn static_foreach_declaration(&mut self) {
        self.start(SyntaxKind::StaticForeachDeclaration);
        self.static_foreach_header();
        if self.at(TokenKind::LeftBrace) {
            self.declaration_block();
        } else {
            self.decl_def();
        }
        self.finish_node();
    }

    pub(crate) fn static_foreach_statement(&mut self) {
        self.start(SyntaxKind::StaticForeachStatement);
        self.static_foreach_header();
        self.statement();
        self.finish_node();
    }

    fn static_foreach_header(&mut self) {
        self.bump(); // static
        if !self.at(TokenKind::Foreach) && !self.at(TokenKind::ForeachReverse) {
            self.error_missing(["foreach"], "a static foreach");
        } else {
            self.bump();
        }
        self.expect(TokenKind::LeftParen, "a static foreach");
        self.foreach_type();
        while self.eat(TokenKind::Comma) {
            self.foreach_type();
        }
        self.expect(TokenKind::Semicolon, "a static foreach");
        self.expression();
        if self.eat(TokenKind::DotDot) {
            self.expression();
        }
        self.expect(TokenKind::RightParen, "a static foreach");
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use dlang_syntax::SyntaxKind;

    fn has(source: &str, kind: SyntaxKind) {
        let p = parse(source);
        assert!(!p.has_errors(), "{source}: {:?}", p.errors());
        assert!(
            p.syntax().descendants().any(|n| n.kind() == kind),
            "missing {kind:?} in\n{}",
            p.syntax().debug_dump()
        );
    }

    #[test]
    fn version_blocks_keep_both_branches() {
        let source = "version (Windows) { int w; } else { int p; }";
        has(source, SyntaxKind::ConditionalDeclaration);
        let p = parse(source);
        let decls: Vec<_> = p
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::VarDeclarations)
            .collect();
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn version_colon_form() {
        has("version (unittest):\nint x;\n", SyntaxKind::VersionCondition);
    }

    #[test]
    fn static_if_else_chain() {
        has(
            "static if (is(T == int)) { alias U = long; } else static if (true) { alias U = T; }",
            SyntaxKind::StaticIfCondition,
        );
    }

    #[test]
    fn specifications() {
        has("version = FeatureX;", SyntaxKind::VersionSpecification);
        has("debug = 3;", SyntaxKind::DebugSpecification);
    }

    #[test]
    fn static_assert_with_message() {
        has(
            "static assert(T.sizeof == 4, \"need 32 bits\");",
            SyntaxKind::StaticAssert,
        );
    }

    #[test]
    fn static_foreach_both_levels() {
        has(
            "static foreach (i; 0 .. 3) { mixin(\"int x\" ~ i.stringof ~ \";\"); }",
            SyntaxKind::StaticForeachDeclaration,
        );
        has(
            "void f() { static foreach (m; members) { use(m); } }",
            SyntaxKind::StaticForeachStatement,
        );
    }

    #[test]
    fn debug_without_parens() {
        has("debug int traceLevel;", SyntaxKind::DebugCondition);
    }
}
