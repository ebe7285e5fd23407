//! Statement grammar.

use crate::recovery::{EXPR_START, STMT_RECOVERY};
use crate::Parser;
use dlang_syntax::{SyntaxKind, TokenKind};

impl Parser<'_> {
    /// One statement. Always makes progress.
    pub(crate) fn statement(&mut self) {
        match self.kind() {
            TokenKind::Semicolon => {
                self.start(SyntaxKind::EmptyStatement);
                self.bump();
                self.finish_node();
            }
            TokenKind::LeftBrace => self.block_statement(),
            TokenKind::Identifier if self.nth(1) == TokenKind::Colon => self.labeled_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Do => self.do_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Foreach | TokenKind::ForeachReverse => self.foreach_statement(),
            TokenKind::Switch => self.switch_statement(),
            TokenKind::Final if self.nth(1) == TokenKind::Switch => self.switch_statement(),
            TokenKind::Case => self.case_statement(),
            TokenKind::Default => self.default_statement(),
            TokenKind::Continue => self.jump_statement(SyntaxKind::ContinueStatement),
            TokenKind::Break => self.jump_statement(SyntaxKind::BreakStatement),
            TokenKind::Return => self.return_statement(),
            TokenKind::Goto => self.goto_statement(),
            TokenKind::With => self.with_statement(),
            TokenKind::Synchronized => self.synchronized_statement(),
            TokenKind::Try => self.try_statement(),
            TokenKind::Throw => self.throw_statement(),
            TokenKind::Scope if self.nth(1) == TokenKind::LeftParen => {
                self.scope_guard_statement()
            }
            TokenKind::Asm => self.asm_statement(),
            TokenKind::Pragma => self.pragma_statement(),
            TokenKind::Import => self.declaration_statement(),
            TokenKind::Static => match self.nth(1) {
                TokenKind::If => self.conditional_statement(),
                TokenKind::Foreach | TokenKind::ForeachReverse => {
                    self.static_foreach_statement()
                }
                TokenKind::Assert => self.declaration_statement(),
                _ => self.declaration_statement(),
            },
            TokenKind::Version | TokenKind::Debug => self.conditional_statement(),
            TokenKind::Mixin => self.mixin_or_expression_statement(),
            _ if self.at_declaration_start() => self.declaration_statement(),
            _ if self.at_any(EXPR_START) => self.expression_statement(),
            _ => {
                self.error_and_bump(["a statement"], "a statement");
                self.recover_until(STMT_RECOVERY);
            }
        }
    }

    pub(crate) fn block_statement(&mut self) {
        self.start(SyntaxKind::BlockStatement);
        self.expect(TokenKind::LeftBrace, "a block statement");
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            self.statement();
        }
        self.expect(TokenKind::RightBrace, "a block statement");
        self.finish_node();
    }

    fn declaration_statement(&mut self) {
        self.start(SyntaxKind::DeclarationStatement);
        self.decl_def();
        self.finish_node();
    }

    fn expression_statement(&mut self) {
        self.start(SyntaxKind::ExpressionStatement);
        self.expression();
        if !self.expect(TokenKind::Semicolon, "an expression statement") {
            self.recover_until(STMT_RECOVERY);
            self.eat(TokenKind::Semicolon);
        }
        self.finish_node();
    }

    fn labeled_statement(&mut self) {
        self.start(SyntaxKind::LabeledStatement);
        self.bump();
        self.bump();
        if !matches!(
            self.kind(),
            TokenKind::RightBrace | TokenKind::Case | TokenKind::Default | TokenKind::Eof
        ) {
            self.statement();
        }
        self.finish_node();
    }

    /// `auto x = expr` or a plain expression in `if`/`while` heads.
    fn condition_expression(&mut self) {
        if self.at(TokenKind::Auto)
            && self.nth(1) == TokenKind::Identifier
            && self.nth(2) == TokenKind::Assign
        {
            self.bump();
            self.bump();
            self.bump();
        }
        self.expression();
    }

    fn if_statement(&mut self) {
        self.start(SyntaxKind::IfStatement);
        self.bump();
        self.expect(TokenKind::LeftParen, "an if statement");
        self.condition_expression();
        self.expect(TokenKind::RightParen, "an if statement");
        self.statement();
        // Always shift: else binds to the nearest unmatched if.
        if self.eat(TokenKind::Else) {
            self.statement();
        }
        self.finish_node();
    }

    fn while_statement(&mut self) {
        self.start(SyntaxKind::WhileStatement);
        self.bump();
        self.expect(TokenKind::LeftParen, "a while statement");
        self.condition_expression();
        self.expect(TokenKind::RightParen, "a while statement");
        self.statement();
        self.finish_node();
    }

    fn do_statement(&mut self) {
        self.start(SyntaxKind::DoStatement);
        self.bump();
        self.statement();
        self.expect(TokenKind::While, "a do statement");
        self.expect(TokenKind::LeftParen, "a do statement");
        self.expression();
        self.expect(TokenKind::RightParen, "a do statement");
        self.expect(TokenKind::Semicolon, "a do statement");
        self.finish_node();
    }

    fn for_statement(&mut self) {
        self.start(SyntaxKind::ForStatement);
        self.bump();
        self.expect(TokenKind::LeftParen, "a for statement");
        // The initializer is a full statement and owns its semicolon.
        self.statement();
        if !self.at(TokenKind::Semicolon) {
            self.expression();
        }
        self.expect(TokenKind::Semicolon, "a for statement");
        if !self.at(TokenKind::RightParen) {
            self.expression();
        }
        self.expect(TokenKind::RightParen, "a for statement");
        self.statement();
        self.finish_node();
    }

    fn foreach_statement(&mut self) {
        self.start(SyntaxKind::ForeachStatement);
        self.bump();
        self.expect(TokenKind::LeftParen, "a foreach statement");
        self.foreach_type();
        while self.eat(TokenKind::Comma) {
            self.foreach_type();
        }
        self.expect(TokenKind::Semicolon, "a foreach statement");
        self.expression();
        if self.eat(TokenKind::DotDot) {
            self.expression();
        }
        self.expect(TokenKind::RightParen, "a foreach statement");
        self.statement();
        self.finish_node();
    }

    /// A loop variable: optional `ref`/qualifiers, optional type, name.
    pub(crate) fn foreach_type(&mut self) {
        self.start(SyntaxKind::ForeachType);
        loop {
            let is_attr = match self.kind() {
                TokenKind::Ref | TokenKind::Alias | TokenKind::Scope => true,
                kind if kind.is_type_ctor() => self.nth(1) != TokenKind::LeftParen,
                _ => false,
            };
            if !is_attr {
                break;
            }
            self.start(SyntaxKind::ParameterAttribute);
            self.bump();
            self.finish_node();
        }
        // `foreach (x; r)` has no type; `foreach (int x; r)` does.
        let has_type = match self.probe_type(self.cursor.pos()) {
            Some(after) => {
                self.cursor.tokens().significant(after).kind == TokenKind::Identifier
            }
            None => false,
        };
        if has_type {
            self.type_();
        }
        self.expect(TokenKind::Identifier, "a foreach variable");
        self.finish_node();
    }

    fn switch_statement(&mut self) {
        self.start(SyntaxKind::SwitchStatement);
        self.eat(TokenKind::Final);
        self.expect(TokenKind::Switch, "a switch statement");
        self.expect(TokenKind::LeftParen, "a switch statement");
        self.expression();
        self.expect(TokenKind::RightParen, "a switch statement");
        self.statement();
        self.finish_node();
    }

    /// `case a, b:` statements, or a `case a: .. case b:` range. The node
    /// kind is only known after the first colon, hence the checkpoint.
    fn case_statement(&mut self) {
        self.flush_trivia();
        let cp = self.checkpoint();
        self.bump();
        self.assign_expr();
        while self.eat(TokenKind::Comma) {
            self.assign_expr();
        }
        self.expect(TokenKind::Colon, "a case statement");
        let kind = if self.at(TokenKind::DotDot) {
            self.bump();
            self.expect(TokenKind::Case, "a case range");
            self.assign_expr();
            self.expect(TokenKind::Colon, "a case range");
            SyntaxKind::CaseRangeStatement
        } else {
            SyntaxKind::CaseStatement
        };
        self.case_body();
        self.wrap(cp, kind);
    }

    fn default_statement(&mut self) {
        self.start(SyntaxKind::DefaultStatement);
        self.bump();
        self.expect(TokenKind::Colon, "a default statement");
        self.case_body();
        self.finish_node();
    }

    fn case_body(&mut self) {
        while !matches!(
            self.kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::RightBrace | TokenKind::Eof
        ) {
            self.statement();
        }
    }

    fn jump_statement(&mut self, kind: SyntaxKind) {
        self.start(kind);
        self.bump();
        self.eat(TokenKind::Identifier);
        self.expect(TokenKind::Semicolon, "a jump statement");
        self.finish_node();
    }

    fn return_statement(&mut self) {
        self.start(SyntaxKind::ReturnStatement);
        self.bump();
        if !self.at(TokenKind::Semicolon) {
            self.expression();
        }
        self.expect(TokenKind::Semicolon, "a return statement");
        self.finish_node();
    }

    fn goto_statement(&mut self) {
        self.start(SyntaxKind::GotoStatement);
        self.bump();
        match self.kind() {
            TokenKind::Default => self.bump(),
            TokenKind::Case => {
                self.bump();
                if !self.at(TokenKind::Semicolon) {
                    self.expression();
                }
            }
            _ => {
                self.expect(TokenKind::Identifier, "a goto statement");
            }
        }
        self.expect(TokenKind::Semicolon, "a goto statement");
        self.finish_node();
    }

    fn with_statement(&mut self) {
        self.start(SyntaxKind::WithStatement);
        self.bump();
        self.expect(TokenKind::LeftParen, "a with statement");
        self.expression();
        self.expect(TokenKind::RightParen, "a with statement");
        self.statement();
        self.finish_node();
    }

    fn synchronized_statement(&mut self) {
        self.start(SyntaxKind::SynchronizedStatement);
        self.bump();
        if self.eat(TokenKind::LeftParen) {
            self.expression();
            self.expect(TokenKind::RightParen, "a synchronized statement");
        }
        self.statement();
        self.finish_node();
    }

    fn try_statement(&mut self) {
        self.start(SyntaxKind::TryStatement);
        self.bump();
        self.statement();
        while self.at(TokenKind::Catch) {
            self.catch_clause();
        }
        if self.at(TokenKind::Finally) {
            self.start(SyntaxKind::Finally);
            self.bump();
            self.statement();
            self.finish_node();
        }
        self.finish_node();
    }

    fn catch_clause(&mut self) {
        self.start(SyntaxKind::Catch);
        self.bump();
        if self.eat(TokenKind::LeftParen) {
            self.type_();
            self.eat(TokenKind::Identifier);
            self.expect(TokenKind::RightParen, "a catch clause");
        }
        self.statement();
        self.finish_node();
    }

    fn throw_statement(&mut self) {
        self.start(SyntaxKind::ThrowStatement);
        self.bump();
        self.expression();
        self.expect(TokenKind::Semicolon, "a throw statement");
        self.finish_node();
    }

    fn scope_guard_statement(&mut self) {
        self.start(SyntaxKind::ScopeGuardStatement);
        self.bump();
        self.expect(TokenKind::LeftParen, "a scope guard");
        // exit, success, or failure; resolved past the parse.
        self.expect(TokenKind::Identifier, "a scope guard kind");
        self.expect(TokenKind::RightParen, "a scope guard");
        self.statement();
        self.finish_node();
    }

    /// `asm { ... }`: instruction content is opaque to the parser; each
    /// instruction is the token run up to its semicolon, with nested
    /// brackets kept balanced.
    fn asm_statement(&mut self) {
        self.start(SyntaxKind::AsmStatement);
        self.bump();
        self.member_function_attributes();
        self.expect(TokenKind::LeftBrace, "an asm statement");
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            self.asm_instruction();
        }
        self.expect(TokenKind::RightBrace, "an asm statement");
        self.finish_node();
    }

    fn asm_instruction(&mut self) {
        self.start(SyntaxKind::AsmInstruction);
        let mut depth = 0u32;
        while !self.is_eof() {
            match self.kind() {
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    break;
                }
                TokenKind::RightBrace if depth == 0 => break,
                TokenKind::LeftBracket | TokenKind::LeftParen => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RightBracket | TokenKind::RightParen => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                _ => self.bump(),
            }
        }
        self.finish_node();
    }

    fn pragma_statement(&mut self) {
        self.start(SyntaxKind::PragmaStatement);
        self.pragma_attribute();
        if !self.eat(TokenKind::Semicolon) {
            self.statement();
        }
        self.finish_node();
    }

    /// `mixin(...)` in statement position is a mixin statement when the
    /// paren group runs straight to `;`, an expression statement when
    /// operators follow, and a mixin instantiation otherwise.
    fn mixin_or_expression_statement(&mut self) {
        if self.nth(1) == TokenKind::Template {
            self.declaration_statement();
            return;
        }
        if self.nth(1) == TokenKind::LeftParen {
            let after = self.probe_balanced(
                self.cursor.pos() + 1,
                TokenKind::LeftParen,
                TokenKind::RightParen,
            );
            if after.is_some_and(|a| {
                self.cursor.tokens().significant(a).kind == TokenKind::Semicolon
            }) {
                self.start(SyntaxKind::MixinStatement);
                self.mixin_expression();
                self.expect(TokenKind::Semicolon, "a mixin statement");
                self.finish_node();
            } else {
                self.expression_statement();
            }
            return;
        }
        self.declaration_statement();
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use dlang_syntax::SyntaxKind;

    fn body_has(body: &str, kind: SyntaxKind) {
        let source = format!("void f() {{ {body} }}");
        let p = parse(&source);
        assert!(!p.has_errors(), "{body}: {:?}", p.errors());
        assert!(
            p.syntax().descendants().any(|n| n.kind() == kind),
            "missing {kind:?} in\n{}",
            p.syntax().debug_dump()
        );
    }

    #[test]
    fn control_flow_statements() {
        body_has("if (x) y(); else z();", SyntaxKind::IfStatement);
        body_has("while (auto v = next()) use(v);", SyntaxKind::WhileStatement);
        body_has("do { step(); } while (cond);", SyntaxKind::DoStatement);
        body_has("for (int i = 0; i < n; i++) sum += i;", SyntaxKind::ForStatement);
        body_has("foreach (i, ref v; arr) v = i;", SyntaxKind::ForeachStatement);
        body_has("foreach_reverse (v; 0 .. 10) use(v);", SyntaxKind::ForeachStatement);
    }

    #[test]
    fn switch_with_case_ranges() {
        body_has(
            "final switch (x) { case 1, 2: a(); break; case 3: .. case 9: b(); break; default: c(); }",
            SyntaxKind::CaseRangeStatement,
        );
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let p = parse("void f() { if (a) if (b) x(); else y(); }");
        assert!(!p.has_errors(), "{:?}", p.errors());
        let inner_if = p
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::IfStatement)
            .nth(1)
            .unwrap();
        assert!(inner_if.text().contains("else"));
    }

    #[test]
    fn exception_handling() {
        body_has(
            "try { risky(); } catch (Exception e) { log(e); } finally { done(); }",
            SyntaxKind::Catch,
        );
        body_has("throw new Exception(\"boom\");", SyntaxKind::ThrowStatement);
        body_has("scope(exit) cleanup();", SyntaxKind::ScopeGuardStatement);
    }

    #[test]
    fn declarations_in_statement_position() {
        body_has("int x = 1;", SyntaxKind::DeclarationStatement);
        body_has("MyType* p;", SyntaxKind::DeclarationStatement);
        body_has("auto r = f();", SyntaxKind::DeclarationStatement);
        body_has("struct Local { int v; }", SyntaxKind::DeclarationStatement);
    }

    #[test]
    fn pointer_versus_multiplication() {
        body_has("a * b;", SyntaxKind::VarDeclarations);
        body_has("r = a * b;", SyntaxKind::BinaryExpression);
    }

    #[test]
    fn labels_and_jumps() {
        body_has("loop: while (x) { continue loop; }", SyntaxKind::LabeledStatement);
        body_has("goto done; done: return;", SyntaxKind::GotoStatement);
        body_has("goto case 5;", SyntaxKind::GotoStatement);
    }

    #[test]
    fn inline_asm_is_opaque() {
        body_has("asm { mov EAX, 1; ret; }", SyntaxKind::AsmInstruction);
    }

    #[test]
    fn mixin_statement_forms() {
        body_has("mixin(\"int x;\");", SyntaxKind::MixinStatement);
        body_has("auto s = mixin(\"1 + 2\") * 3;", SyntaxKind::MixinExpression);
    }

    #[test]
    fn unclosed_brace_consumes_to_eof_without_panic() {
        let p = parse("void f() { if (x { y(); ");
        assert!(p.has_errors());
        assert_eq!(p.syntax().text(), "void f() { if (x { y(); ");
    }
}
