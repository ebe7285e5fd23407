//! Grammar productions as `Parser` methods, one module per grammar area.
//!
//! Every production opens a node, shifts the tokens it owns, and closes
//! the node before returning, so a panic-free walk of any rule leaves the
//! builder balanced. Rules never return errors; they record them and
//! leave an `Error` node behind.

mod attr;
mod cond;
mod expr;
mod item;
mod stmt;
mod ty;

use crate::Parser;
use dlang_syntax::{SyntaxKind, TokenKind};

impl Parser<'_> {
    /// Entry point: the whole compilation unit.
    pub(crate) fn source_file(&mut self) {
        self.start(SyntaxKind::SourceFile);
        if self.at_module_declaration() {
            self.module_declaration();
        }
        while !self.is_eof() {
            self.decl_def();
        }
        // Trailing trivia would otherwise be lost.
        self.flush_trivia();
        self.finish_node();
    }

    /// `module a.b.c;`, optionally preceded by `deprecated(...)` and
    /// `@attribute` module attributes.
    pub(crate) fn at_module_declaration(&self) -> bool {
        let mut pos = self.cursor.pos();
        loop {
            match self.cursor.tokens().significant(pos).kind {
                TokenKind::Module => return true,
                TokenKind::Deprecated => {
                    pos += 1;
                    if self.cursor.tokens().significant(pos).kind == TokenKind::LeftParen {
                        match self.probe_balanced(pos, TokenKind::LeftParen, TokenKind::RightParen)
                        {
                            Some(after) => pos = after,
                            None => return false,
                        }
                    }
                }
                TokenKind::At => {
                    pos += 1;
                    if self.cursor.tokens().significant(pos).kind != TokenKind::Identifier {
                        return false;
                    }
                    pos += 1;
                    if self.cursor.tokens().significant(pos).kind == TokenKind::LeftParen {
                        match self.probe_balanced(pos, TokenKind::LeftParen, TokenKind::RightParen)
                        {
                            Some(after) => pos = after,
                            None => return false,
                        }
                    }
                }
                _ => return false,
            }
        }
    }

    pub(crate) fn module_declaration(&mut self) {
        self.start(SyntaxKind::ModuleDeclaration);
        while !self.at(TokenKind::Module) && !self.is_eof() {
            self.start(SyntaxKind::ModuleAttribute);
            if self.at(TokenKind::Deprecated) {
                self.deprecated_attribute();
            } else {
                self.at_attribute();
            }
            self.finish_node();
        }
        self.expect(TokenKind::Module, "a module declaration");
        self.module_fqn();
        self.expect(TokenKind::Semicolon, "a module declaration");
        self.finish_node();
    }

    pub(crate) fn module_fqn(&mut self) {
        self.start(SyntaxKind::ModuleFullyQualifiedName);
        self.expect(TokenKind::Identifier, "a module name");
        while self.eat(TokenKind::Dot) {
            self.expect(TokenKind::Identifier, "a module name");
        }
        self.finish_node();
    }

    /// `import a.b, c = d.e : f, g = h;` with an optional leading
    /// `static`. The leading `import` (and `static`) are consumed here.
    pub(crate) fn import_declaration(&mut self) {
        self.start(SyntaxKind::ImportDeclaration);
        self.eat(TokenKind::Static);
        self.expect(TokenKind::Import, "an import declaration");
        self.start(SyntaxKind::ImportList);
        self.import_entry();
        while self.eat(TokenKind::Comma) {
            self.import_entry();
        }
        self.finish_node();
        self.expect(TokenKind::Semicolon, "an import declaration");
        self.finish_node();
    }

    fn import_entry(&mut self) {
        self.start(SyntaxKind::Import);
        if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::Assign {
            self.start(SyntaxKind::ImportAlias);
            self.bump();
            self.bump();
            self.finish_node();
        }
        self.module_fqn();
        if self.eat(TokenKind::Colon) {
            self.start(SyntaxKind::ImportBindings);
            self.import_bind();
            while self.eat(TokenKind::Comma) {
                self.import_bind();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    fn import_bind(&mut self) {
        self.start(SyntaxKind::ImportBind);
        if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::Assign {
            self.bump();
            self.bump();
        }
        self.expect(TokenKind::Identifier, "an import binding");
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use dlang_syntax::SyntaxKind;
    use pretty_assertions::assert_eq;

    fn top_kinds(source: &str) -> Vec<SyntaxKind> {
        parse(source).syntax().child_nodes().map(|n| n.kind()).collect()
    }

    #[test]
    fn module_declaration_with_attributes() {
        let parse = parse("deprecated(\"old\") @safe module a.b.c;");
        assert!(!parse.has_errors(), "{:?}", parse.errors());
        let root = parse.syntax();
        let module = root.child_nodes().next().unwrap();
        assert_eq!(module.kind(), SyntaxKind::ModuleDeclaration);
        assert_eq!(
            module.child_nodes().map(|n| n.kind()).collect::<Vec<_>>(),
            vec![
                SyntaxKind::ModuleAttribute,
                SyntaxKind::ModuleAttribute,
                SyntaxKind::ModuleFullyQualifiedName,
            ]
        );
    }

    #[test]
    fn selective_and_renamed_imports() {
        let parse = parse("import std.stdio : writeln, w = write;\nimport io = std.io;\n");
        assert!(!parse.has_errors(), "{:?}", parse.errors());
        assert_eq!(
            top_kinds("import std.stdio : writeln, w = write;\nimport io = std.io;\n"),
            vec![SyntaxKind::ImportDeclaration, SyntaxKind::ImportDeclaration]
        );
    }

    #[test]
    fn missing_semicolon_is_reported_at_the_gap() {
        let parse = parse("module a\nint x;");
        assert!(parse.has_errors());
        let err = &parse.errors()[0];
        // The gap right after `a`, not the next line.
        assert_eq!(err.span.start, 8);
        assert_eq!(err.span.end, 8);
    }
}
