//! Type grammar: qualifiers, basic types, and suffixes.

use crate::Parser;
use dlang_syntax::{SyntaxKind, TokenKind};

impl Parser<'_> {
    /// A full type: leading qualifiers, a basic type, then any number of
    /// pointer, array, and delegate suffixes.
    pub(crate) fn type_(&mut self) {
        self.start(SyntaxKind::Type);
        // A qualifier directly followed by `(` is part of the basic type
        // (`const(int)`), not a freestanding qualifier.
        while self.kind().is_type_ctor() && self.nth(1) != TokenKind::LeftParen {
            self.start(SyntaxKind::TypeCtor);
            self.bump();
            self.finish_node();
        }
        self.basic_type();
        loop {
            match self.kind() {
                TokenKind::Star => self.type_suffix(),
                TokenKind::LeftBracket => self.type_suffix(),
                TokenKind::Delegate | TokenKind::Function => self.type_suffix(),
                _ => break,
            }
        }
        self.finish_node();
    }

    fn basic_type(&mut self) {
        self.start(SyntaxKind::BasicType);
        match self.kind() {
            kind if kind.is_basic_type_keyword() => self.bump(),
            kind if kind.is_type_ctor() => {
                // const(T)
                self.bump();
                self.expect(TokenKind::LeftParen, "a qualified type");
                self.type_();
                self.expect(TokenKind::RightParen, "a qualified type");
            }
            TokenKind::Typeof => {
                self.typeof_expression();
                if self.at(TokenKind::Dot) {
                    self.bump();
                    self.qualified_identifier();
                }
            }
            TokenKind::Vector => self.vector_type(),
            TokenKind::Dot => {
                self.bump();
                self.qualified_identifier();
            }
            TokenKind::Identifier => self.qualified_identifier(),
            _ => self.error_missing(["a type"], "a type"),
        }
        self.finish_node();
    }

    /// `a.b!(T).c`: identifier segments with optional template arguments,
    /// joined by dots.
    pub(crate) fn qualified_identifier(&mut self) {
        self.start(SyntaxKind::QualifiedIdentifier);
        self.type_identifier_part();
        while self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Identifier {
            self.bump();
            self.type_identifier_part();
        }
        self.finish_node();
    }

    fn type_identifier_part(&mut self) {
        self.start(SyntaxKind::TypeIdentifierPart);
        if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::Bang {
            self.template_instance();
        } else {
            self.expect(TokenKind::Identifier, "a qualified name");
        }
        self.finish_node();
    }

    /// `name!(args)` or `name!arg`.
    pub(crate) fn template_instance(&mut self) {
        self.start(SyntaxKind::TemplateInstance);
        self.expect(TokenKind::Identifier, "a template instance");
        self.expect(TokenKind::Bang, "a template instance");
        if self.at(TokenKind::LeftParen) {
            self.template_arguments();
        } else {
            self.template_single_argument();
        }
        self.finish_node();
    }

    fn template_arguments(&mut self) {
        self.start(SyntaxKind::TemplateArguments);
        self.bump();
        if !self.at(TokenKind::RightParen) {
            self.type_or_expr();
            while self.eat(TokenKind::Comma) {
                self.type_or_expr();
            }
        }
        self.expect(TokenKind::RightParen, "template arguments");
        self.finish_node();
    }

    /// The `!ident` shorthand takes exactly one token. `foo!bar.baz`
    /// binds as `(foo!bar).baz`.
    fn template_single_argument(&mut self) {
        self.start(SyntaxKind::TemplateSingleArgument);
        let kind = self.kind();
        if kind == TokenKind::Identifier
            || kind == TokenKind::This
            || kind.is_basic_type_keyword()
            || kind.is_literal()
        {
            self.bump();
        } else {
            self.error_missing(["a template argument"], "a template instance");
        }
        self.finish_node();
    }

    /// Argument positions where a type and an expression are both legal.
    /// A complete type ending at an argument boundary wins; anything else
    /// parses as an expression.
    pub(crate) fn type_or_expr(&mut self) {
        if let Some(after) = self.probe_type(self.cursor.pos()) {
            let next = self.cursor.tokens().significant(after).kind;
            if matches!(next, TokenKind::Comma | TokenKind::RightParen) {
                self.type_();
                return;
            }
        }
        self.assign_expr();
    }

    fn type_suffix(&mut self) {
        self.start(SyntaxKind::TypeSuffix);
        match self.kind() {
            TokenKind::Star => self.bump(),
            TokenKind::LeftBracket => {
                self.bump();
                if !self.at(TokenKind::RightBracket) {
                    // T[4], T[a .. b], or an associative key type T[K].
                    if let Some(after) = self.probe_type(self.cursor.pos()) {
                        if self.cursor.tokens().significant(after).kind
                            == TokenKind::RightBracket
                        {
                            self.type_();
                        } else {
                            self.array_bound();
                        }
                    } else {
                        self.array_bound();
                    }
                }
                self.expect(TokenKind::RightBracket, "an array type suffix");
            }
            TokenKind::Delegate | TokenKind::Function => {
                self.bump();
                self.parameters();
                self.member_function_attributes();
            }
            _ => unreachable!("type_suffix called off a suffix token"),
        }
        self.finish_node();
    }

    fn array_bound(&mut self) {
        self.assign_expr();
        if self.eat(TokenKind::DotDot) {
            self.assign_expr();
        }
    }

    /// `typeof(expr)` or `typeof(return)`.
    pub(crate) fn typeof_expression(&mut self) {
        self.start(SyntaxKind::TypeofExpression);
        self.expect(TokenKind::Typeof, "a typeof expression");
        self.expect(TokenKind::LeftParen, "a typeof expression");
        if self.at(TokenKind::Return) {
            self.bump();
        } else {
            self.expression();
        }
        self.expect(TokenKind::RightParen, "a typeof expression");
        self.finish_node();
    }

    fn vector_type(&mut self) {
        self.start(SyntaxKind::VectorType);
        self.bump();
        self.expect(TokenKind::LeftParen, "a vector type");
        self.type_();
        self.expect(TokenKind::RightParen, "a vector type");
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use dlang_syntax::SyntaxKind;

    fn first_kind_of(source: &str, kind: SyntaxKind) -> bool {
        parse(source).syntax().descendants().any(|n| n.kind() == kind)
    }

    #[test]
    fn qualified_type_with_suffixes() {
        let p = parse("const(int)[] delegate(int) pure f;");
        assert!(!p.has_errors(), "{:?}", p.errors());
        assert!(p.syntax().descendants().any(|n| n.kind() == SyntaxKind::TypeSuffix));
    }

    #[test]
    fn template_instance_in_type_path() {
        let p = parse("std.container.Array!(int).Range r;");
        assert!(!p.has_errors(), "{:?}", p.errors());
        assert!(first_kind_of(
            "std.container.Array!(int).Range r;",
            SyntaxKind::TemplateInstance
        ));
    }

    #[test]
    fn typeof_as_basic_type() {
        let p = parse("typeof(1 + 2) x = 3;");
        assert!(!p.has_errors(), "{:?}", p.errors());
        assert!(first_kind_of("typeof(1 + 2) x = 3;", SyntaxKind::TypeofExpression));
    }

    #[test]
    fn associative_array_of_types() {
        let p = parse("int[string] counts;");
        assert!(!p.has_errors(), "{:?}", p.errors());
    }
}
