//! Attributes, storage classes, and attribute-prefixed declarations.

use crate::Parser;
use dlang_syntax::{SyntaxKind, TokenKind};

impl Parser<'_> {
    /// Does the current token open an attribute that may prefix a
    /// declaration? Qualifier keywords directly followed by `(` belong to
    /// a type (`const(int)`), not to the attribute list.
    pub(crate) fn at_attribute_start(&self) -> bool {
        match self.kind() {
            TokenKind::At
            | TokenKind::Align
            | TokenKind::Deprecated
            | TokenKind::Extern
            | TokenKind::Pragma
            | TokenKind::Private
            | TokenKind::Package
            | TokenKind::Protected
            | TokenKind::Public
            | TokenKind::Export
            | TokenKind::Abstract
            | TokenKind::Auto
            | TokenKind::Final
            | TokenKind::Gshared
            | TokenKind::Nothrow
            | TokenKind::Override
            | TokenKind::Pure
            | TokenKind::Ref
            | TokenKind::Static
            | TokenKind::Synchronized => true,
            TokenKind::Scope => self.nth(1) != TokenKind::LeftParen,
            kind if kind.is_type_ctor() => self.nth(1) != TokenKind::LeftParen,
            _ => false,
        }
    }

    /// One attribute, wrapped in its specific node kind.
    pub(crate) fn attribute(&mut self) {
        match self.kind() {
            TokenKind::At => self.at_attribute(),
            TokenKind::Align => self.align_attribute(),
            TokenKind::Deprecated => self.deprecated_attribute(),
            TokenKind::Extern => self.linkage_attribute(),
            TokenKind::Pragma => self.pragma_attribute(),
            TokenKind::Private
            | TokenKind::Protected
            | TokenKind::Public
            | TokenKind::Export => {
                self.start(SyntaxKind::VisibilityAttribute);
                self.bump();
                self.finish_node();
            }
            TokenKind::Package => {
                // package(a.b) narrows visibility to a package subtree.
                self.start(SyntaxKind::VisibilityAttribute);
                self.bump();
                if self.eat(TokenKind::LeftParen) {
                    self.module_fqn();
                    self.expect(TokenKind::RightParen, "a package visibility attribute");
                }
                self.finish_node();
            }
            _ => {
                self.start(SyntaxKind::StorageClass);
                self.bump();
                self.finish_node();
            }
        }
    }

    /// `@name` or `@name(args)`.
    pub(crate) fn at_attribute(&mut self) {
        self.start(SyntaxKind::AtAttribute);
        self.expect(TokenKind::At, "an attribute");
        if self.at(TokenKind::Identifier) {
            self.bump();
            if self.at(TokenKind::LeftParen) {
                self.argument_list();
            }
        } else if self.at(TokenKind::LeftParen) {
            // @(expr) without a name.
            self.argument_list();
        } else {
            self.error_missing(["an attribute name"], "an attribute");
        }
        self.finish_node();
    }

    pub(crate) fn deprecated_attribute(&mut self) {
        self.start(SyntaxKind::DeprecatedAttribute);
        self.expect(TokenKind::Deprecated, "a deprecated attribute");
        if self.eat(TokenKind::LeftParen) {
            self.assign_expr();
            self.expect(TokenKind::RightParen, "a deprecated attribute");
        }
        self.finish_node();
    }

    fn align_attribute(&mut self) {
        self.start(SyntaxKind::AlignAttribute);
        self.bump();
        if self.eat(TokenKind::LeftParen) {
            self.assign_expr();
            self.expect(TokenKind::RightParen, "an align attribute");
        }
        self.finish_node();
    }

    /// `extern` or `extern (C)`, `extern (C++, ns.sub)`.
    fn linkage_attribute(&mut self) {
        self.start(SyntaxKind::LinkageAttribute);
        self.bump();
        if self.eat(TokenKind::LeftParen) {
            self.expect(TokenKind::Identifier, "a linkage name");
            self.eat(TokenKind::PlusPlus);
            if self.eat(TokenKind::Comma) {
                match self.kind() {
                    TokenKind::Struct | TokenKind::Class => self.bump(),
                    _ => self.module_fqn(),
                }
            }
            self.expect(TokenKind::RightParen, "a linkage attribute");
        }
        self.finish_node();
    }

    pub(crate) fn pragma_attribute(&mut self) {
        self.start(SyntaxKind::PragmaAttribute);
        self.expect(TokenKind::Pragma, "a pragma");
        self.expect(TokenKind::LeftParen, "a pragma");
        self.expect(TokenKind::Identifier, "a pragma name");
        while self.eat(TokenKind::Comma) {
            self.assign_expr();
        }
        self.expect(TokenKind::RightParen, "a pragma");
        self.finish_node();
    }

    /// One or more attributes followed by `:`, a `{ }` block, a bare `;`,
    /// or a single declaration.
    pub(crate) fn attribute_specifier(&mut self) {
        self.start(SyntaxKind::AttributeSpecifier);
        debug_assert!(self.at_attribute_start());
        while self.at_attribute_start() {
            self.attribute();
        }
        if self.eat(TokenKind::Colon) {
            // The attributes apply to everything that follows in this
            // scope; the following declarations stay siblings.
        } else if self.at(TokenKind::LeftBrace) {
            self.declaration_block();
        } else if self.at(TokenKind::Semicolon) {
            // pragma(lib, "m"); and extern(C); forms.
            self.bump();
        } else if self.at(TokenKind::Identifier)
            && matches!(self.nth(1), TokenKind::Assign | TokenKind::Comma | TokenKind::Semicolon)
        {
            self.auto_declaration();
        } else if !self.is_eof() {
            self.decl_def();
        } else {
            self.error_missing(["a declaration"], "an attribute specifier");
        }
        self.finish_node();
    }

    pub(crate) fn declaration_block(&mut self) {
        self.start(SyntaxKind::DeclarationBlock);
        self.expect(TokenKind::LeftBrace, "a declaration block");
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            self.decl_def();
        }
        self.expect(TokenKind::RightBrace, "a declaration block");
        self.finish_node();
    }

    /// Declarators without a type: `auto x = 1, y = 2;`. The storage
    /// class that licenses this form was consumed by the caller.
    pub(crate) fn auto_declaration(&mut self) {
        self.start(SyntaxKind::AutoDeclaration);
        self.declarator_initializer();
        while self.eat(TokenKind::Comma) {
            self.declarator_initializer();
        }
        self.expect(TokenKind::Semicolon, "a variable declaration");
        self.finish_node();
    }

    /// `pure`, `nothrow`, qualifiers, `return`, `scope`, and `@attr`
    /// after a parameter list.
    pub(crate) fn member_function_attributes(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Pure
                | TokenKind::Nothrow
                | TokenKind::Return
                | TokenKind::Scope => {
                    self.start(SyntaxKind::MemberFunctionAttribute);
                    self.bump();
                    self.finish_node();
                }
                TokenKind::At => {
                    self.start(SyntaxKind::MemberFunctionAttribute);
                    self.at_attribute();
                    self.finish_node();
                }
                kind if kind.is_type_ctor() => {
                    self.start(SyntaxKind::MemberFunctionAttribute);
                    self.bump();
                    self.finish_node();
                }
                _ => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use dlang_syntax::SyntaxKind;

    fn kinds_present(source: &str, kinds: &[SyntaxKind]) {
        let p = parse(source);
        assert!(!p.has_errors(), "{source}: {:?}", p.errors());
        for kind in kinds {
            assert!(
                p.syntax().descendants().any(|n| n.kind() == *kind),
                "missing {kind:?} in\n{}",
                p.syntax().debug_dump()
            );
        }
    }

    #[test]
    fn visibility_colon_applies_to_siblings() {
        kinds_present(
            "private: int x; int y;",
            &[SyntaxKind::AttributeSpecifier, SyntaxKind::VisibilityAttribute],
        );
        // The declarations after `:` are top-level siblings.
        let p = parse("private: int x; int y;");
        assert_eq!(p.syntax().child_nodes().count(), 3);
    }

    #[test]
    fn attribute_block_groups_declarations() {
        kinds_present(
            "extern (C) { void f(); void g(); }",
            &[SyntaxKind::LinkageAttribute, SyntaxKind::DeclarationBlock],
        );
    }

    #[test]
    fn at_attribute_with_arguments() {
        kinds_present(
            "@safe @nogc @(\"custom\") void f() { }",
            &[SyntaxKind::AtAttribute],
        );
    }

    #[test]
    fn auto_declaration_after_storage_class() {
        kinds_present("auto x = 1, y = 2;", &[SyntaxKind::AutoDeclaration]);
        kinds_present("const c = 10;", &[SyntaxKind::AutoDeclaration]);
    }

    #[test]
    fn package_visibility_with_path() {
        kinds_present("package(a.b) void f() { }", &[SyntaxKind::VisibilityAttribute]);
    }

    #[test]
    fn cpp_namespace_linkage() {
        kinds_present("extern (C++, ns.inner) void f();", &[SyntaxKind::LinkageAttribute]);
    }
}
