//! Declarations: variables, functions, aggregates, enums, aliases,
//! templates, and the declaration dispatcher.

use crate::recovery::{self, TokenSet};
use crate::Parser;
use dlang_syntax::{SyntaxKind, TokenKind};

/// Where a broken declaration resynchronizes: the next declaration
/// starter or a scope boundary.
const DECL_RECOVERY: TokenSet = recovery::DECL_START
    .with(TokenKind::Semicolon)
    .with(TokenKind::RightBrace);

impl Parser<'_> {
    /// One declaration in any declaration scope. Always makes progress.
    pub(crate) fn decl_def(&mut self) {
        match self.kind() {
            TokenKind::Semicolon => self.bump(),
            TokenKind::Import => self.import_declaration(),
            TokenKind::Module => {
                // A module declaration anywhere but the top of the file.
                self.error_missing(["a declaration"], "a declaration");
                self.module_declaration();
            }
            TokenKind::Static => match self.nth(1) {
                TokenKind::Import => self.import_declaration(),
                TokenKind::If => self.conditional_declaration(),
                TokenKind::Foreach | TokenKind::ForeachReverse => {
                    self.static_foreach_declaration()
                }
                TokenKind::Assert => self.static_assert(),
                TokenKind::This => self.static_constructor(SyntaxKind::StaticConstructor),
                TokenKind::Tilde => self.static_destructor(SyntaxKind::StaticDestructor),
                _ => self.attribute_specifier(),
            },
            TokenKind::Shared => match (self.nth(1), self.nth(2)) {
                (TokenKind::Static, TokenKind::This) => {
                    self.static_constructor(SyntaxKind::SharedStaticConstructor)
                }
                (TokenKind::Static, TokenKind::Tilde) => {
                    self.static_destructor(SyntaxKind::SharedStaticDestructor)
                }
                _ if self.at_attribute_start() => self.attribute_specifier(),
                _ => self.var_or_func_declaration(),
            },
            TokenKind::Version if self.nth(1) == TokenKind::Assign => {
                self.version_specification()
            }
            TokenKind::Version => self.conditional_declaration(),
            TokenKind::Debug if self.nth(1) == TokenKind::Assign => self.debug_specification(),
            TokenKind::Debug => self.conditional_declaration(),
            TokenKind::Unittest => self.unittest_block(),
            TokenKind::Invariant => self.invariant_declaration(),
            TokenKind::Mixin => match self.nth(1) {
                TokenKind::Template => self.template_mixin_declaration(),
                TokenKind::LeftParen => self.mixin_declaration(),
                _ => self.template_mixin(),
            },
            TokenKind::Template => self.template_declaration(),
            TokenKind::Struct | TokenKind::Union => self.struct_or_union_declaration(),
            TokenKind::Class | TokenKind::Interface => self.class_or_interface_declaration(),
            TokenKind::Enum => self.enum_or_manifest_declaration(),
            TokenKind::This => self.constructor_or_postblit(),
            TokenKind::Tilde if self.nth(1) == TokenKind::This => self.destructor(),
            TokenKind::Alias => self.alias_declaration(),
            kind if kind.is_basic_type_keyword() => self.var_or_func_declaration(),
            TokenKind::Typeof | TokenKind::Vector | TokenKind::Dot => {
                self.var_or_func_declaration()
            }
            kind if kind.is_type_ctor() && self.nth(1) == TokenKind::LeftParen => {
                self.var_or_func_declaration()
            }
            _ if self.at_attribute_start() => self.attribute_specifier(),
            TokenKind::Identifier => self.var_or_func_declaration(),
            _ => {
                self.error_and_bump(["a declaration"], "a declaration");
                self.recover_until(DECL_RECOVERY);
            }
        }
    }

    // ── Variables and functions ─────────────────────────────────────────

    /// A declaration that begins with a type: disambiguated into a
    /// function or a variable by scanning past the type.
    pub(crate) fn var_or_func_declaration(&mut self) {
        let Some(after_type) = self.probe_type(self.cursor.pos()) else {
            self.error_and_bump(["a type"], "a declaration");
            self.recover_until(DECL_RECOVERY);
            return;
        };
        let named = self.cursor.tokens().significant(after_type).kind == TokenKind::Identifier;
        if named && self.at_function_head(after_type) {
            self.function_declaration();
        } else {
            self.var_declarations();
        }
    }

    fn var_declarations(&mut self) {
        self.start(SyntaxKind::VarDeclarations);
        self.type_();
        self.declarator_initializer();
        while self.eat(TokenKind::Comma) {
            self.declarator_initializer();
        }
        if !self.expect(TokenKind::Semicolon, "a variable declaration") {
            self.recover_until(DECL_RECOVERY);
            self.eat(TokenKind::Semicolon);
        }
        self.finish_node();
    }

    pub(crate) fn declarator_initializer(&mut self) {
        self.start(SyntaxKind::DeclaratorInitializer);
        self.declarator();
        if self.eat(TokenKind::Assign) {
            self.initializer();
        }
        self.finish_node();
    }

    /// A declarator is normally a bare identifier. The C-style fallback
    /// is tried second: `int x[10];` and `int (*fp)(int);` put array and
    /// function-pointer suffixes on the name instead of the type.
    fn declarator(&mut self) {
        self.start(SyntaxKind::Declarator);
        if self.at(TokenKind::LeftParen) {
            // Function pointer form: the name sits inside the group.
            self.bump();
            while self.eat(TokenKind::Star) {}
            self.expect(TokenKind::Identifier, "a declarator");
            self.expect(TokenKind::RightParen, "a declarator");
        } else {
            self.expect(TokenKind::Identifier, "a declarator");
        }
        loop {
            match self.kind() {
                TokenKind::LeftBracket => self.declarator_array_suffix(),
                TokenKind::LeftParen => self.parameters(),
                _ => break,
            }
        }
        self.finish_node();
    }

    /// `[ ]`, `[ expr ]`, or `[ Type ]` after a declarator name.
    fn declarator_array_suffix(&mut self) {
        self.start(SyntaxKind::TypeSuffix);
        self.bump();
        if !self.at(TokenKind::RightBracket) {
            if self.kind().is_basic_type_keyword() && self.nth(1) == TokenKind::RightBracket {
                self.type_();
            } else {
                self.assign_expr();
            }
        }
        self.expect(TokenKind::RightBracket, "a declarator suffix");
        self.finish_node();
    }

    fn initializer(&mut self) {
        self.start(SyntaxKind::Initializer);
        match self.kind() {
            TokenKind::Void
                if matches!(self.nth(1), TokenKind::Semicolon | TokenKind::Comma) =>
            {
                self.bump();
            }
            TokenKind::LeftBracket => self.array_initializer(),
            TokenKind::LeftBrace if self.looks_like_struct_initializer() => {
                self.struct_initializer();
            }
            _ => self.assign_expr(),
        }
        self.finish_node();
    }

    /// `{` opens a struct initializer only for `{}`, `{ ident : ...`, or
    /// a nested brace; otherwise it is a function literal expression.
    fn looks_like_struct_initializer(&self) -> bool {
        matches!(self.nth(1), TokenKind::RightBrace | TokenKind::LeftBrace)
            || (self.nth(1) == TokenKind::Identifier && self.nth(2) == TokenKind::Colon)
    }

    fn struct_initializer(&mut self) {
        self.start(SyntaxKind::StructInitializer);
        self.bump();
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            self.start(SyntaxKind::StructMemberInitializer);
            if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::Colon {
                self.bump();
                self.bump();
            }
            self.initializer();
            self.finish_node();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightBrace, "a struct initializer");
        self.finish_node();
    }

    fn array_initializer(&mut self) {
        self.start(SyntaxKind::ArrayInitializer);
        self.bump();
        while !self.at(TokenKind::RightBracket) && !self.is_eof() {
            self.start(SyntaxKind::ArrayMemberInitialization);
            self.assign_expr();
            if self.eat(TokenKind::Colon) {
                self.initializer();
            }
            self.finish_node();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightBracket, "an array initializer");
        self.finish_node();
    }

    fn function_declaration(&mut self) {
        self.start(SyntaxKind::FunctionDeclaration);
        self.type_();
        self.expect(TokenKind::Identifier, "a function name");
        // Two adjacent paren groups mean template parameters come first.
        if self.at(TokenKind::LeftParen) {
            let second_group = self
                .probe_balanced(self.cursor.pos(), TokenKind::LeftParen, TokenKind::RightParen)
                .is_some_and(|after| {
                    self.cursor.tokens().significant(after).kind == TokenKind::LeftParen
                });
            if second_group {
                self.template_parameters();
            }
        }
        self.parameters();
        self.member_function_attributes();
        if self.at(TokenKind::If) {
            self.constraint();
        }
        self.function_body();
        self.finish_node();
    }

    pub(crate) fn parameters(&mut self) {
        self.start(SyntaxKind::Parameters);
        self.expect(TokenKind::LeftParen, "a parameter list");
        while !self.at(TokenKind::RightParen) && !self.is_eof() {
            self.parameter();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightParen, "a parameter list");
        self.finish_node();
    }

    fn parameter(&mut self) {
        self.start(SyntaxKind::Parameter);
        if self.at(TokenKind::Ellipsis) {
            self.start(SyntaxKind::VariadicParameter);
            self.bump();
            self.finish_node();
            self.finish_node();
            return;
        }
        loop {
            let is_attr = match self.kind() {
                TokenKind::In
                | TokenKind::Out
                | TokenKind::Ref
                | TokenKind::Lazy
                | TokenKind::Return
                | TokenKind::Auto => true,
                TokenKind::Scope => self.nth(1) != TokenKind::LeftParen,
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
        self.type_();
        if self.at(TokenKind::Identifier) {
            self.start(SyntaxKind::Declarator);
            self.bump();
            self.finish_node();
        }
        if self.eat(TokenKind::Assign) {
            self.assign_expr();
        }
        if self.at(TokenKind::Ellipsis) {
            self.start(SyntaxKind::VariadicParameter);
            self.bump();
            self.finish_node();
        }
        self.finish_node();
    }

    /// Contracts, then a block body, a `do` body, or `;`.
    pub(crate) fn function_body(&mut self) {
        self.start(SyntaxKind::FunctionBody);
        if self.eat(TokenKind::Semicolon) {
            self.finish_node();
            return;
        }
        let mut had_contract = false;
        while self.at(TokenKind::In) || self.at(TokenKind::Out) {
            had_contract = true;
            if self.at(TokenKind::In) {
                self.in_contract();
            } else {
                self.out_contract();
            }
        }
        self.eat(TokenKind::Do);
        if self.at(TokenKind::LeftBrace) {
            self.block_statement();
        } else if had_contract {
            // Contracts without a body: an interface method prototype.
            self.start(SyntaxKind::MissingFunctionBody);
            self.eat(TokenKind::Semicolon);
            self.finish_node();
        } else {
            self.error_missing(["a function body"], "a function declaration");
        }
        self.finish_node();
    }

    fn in_contract(&mut self) {
        self.start(SyntaxKind::InContract);
        self.bump();
        if self.at(TokenKind::LeftBrace) {
            self.block_statement();
        } else {
            // in (expr) shorthand asserts the expression.
            self.expect(TokenKind::LeftParen, "an in contract");
            self.assign_expr();
            if self.eat(TokenKind::Comma) {
                self.assign_expr();
            }
            self.expect(TokenKind::RightParen, "an in contract");
        }
        self.finish_node();
    }

    fn out_contract(&mut self) {
        self.start(SyntaxKind::OutContract);
        self.bump();
        if self.at(TokenKind::LeftBrace) {
            self.block_statement();
            self.finish_node();
            return;
        }
        self.expect(TokenKind::LeftParen, "an out contract");
        if self.eat(TokenKind::Semicolon) {
            // out (; expr) shorthand.
            self.assign_expr();
            self.expect(TokenKind::RightParen, "an out contract");
        } else {
            self.eat(TokenKind::Identifier);
            if self.eat(TokenKind::Semicolon) {
                self.assign_expr();
                self.expect(TokenKind::RightParen, "an out contract");
            } else {
                self.expect(TokenKind::RightParen, "an out contract");
                if self.at(TokenKind::LeftBrace) {
                    self.block_statement();
                }
            }
        }
        self.finish_node();
    }

    // ── Constructors and friends ────────────────────────────────────────

    fn constructor_or_postblit(&mut self) {
        if self.nth(1) == TokenKind::LeftParen
            && self.nth(2) == TokenKind::This
            && self.nth(3) == TokenKind::RightParen
        {
            self.start(SyntaxKind::Postblit);
            self.bump();
            self.bump();
            self.bump();
            self.bump();
            self.member_function_attributes();
            self.function_body();
            self.finish_node();
            return;
        }
        self.start(SyntaxKind::Constructor);
        self.bump();
        if self.at(TokenKind::LeftParen) {
            let second_group = self
                .probe_balanced(self.cursor.pos(), TokenKind::LeftParen, TokenKind::RightParen)
                .is_some_and(|after| {
                    self.cursor.tokens().significant(after).kind == TokenKind::LeftParen
                });
            if second_group {
                self.template_parameters();
            }
        }
        self.parameters();
        self.member_function_attributes();
        if self.at(TokenKind::If) {
            self.constraint();
        }
        self.function_body();
        self.finish_node();
    }

    fn destructor(&mut self) {
        self.start(SyntaxKind::Destructor);
        self.bump();
        self.bump();
        self.expect(TokenKind::LeftParen, "a destructor");
        self.expect(TokenKind::RightParen, "a destructor");
        self.member_function_attributes();
        self.function_body();
        self.finish_node();
    }

    fn static_constructor(&mut self, kind: SyntaxKind) {
        self.start(kind);
        if kind == SyntaxKind::SharedStaticConstructor {
            self.bump(); // shared
        }
        self.bump(); // static
        self.bump(); // this
        self.expect(TokenKind::LeftParen, "a static constructor");
        self.expect(TokenKind::RightParen, "a static constructor");
        self.member_function_attributes();
        self.function_body();
        self.finish_node();
    }

    fn static_destructor(&mut self, kind: SyntaxKind) {
        self.start(kind);
        if kind == SyntaxKind::SharedStaticDestructor {
            self.bump(); // shared
        }
        self.bump(); // static
        self.bump(); // ~
        self.expect(TokenKind::This, "a static destructor");
        self.expect(TokenKind::LeftParen, "a static destructor");
        self.expect(TokenKind::RightParen, "a static destructor");
        self.member_function_attributes();
        self.function_body();
        self.finish_node();
    }

    fn invariant_declaration(&mut self) {
        self.start(SyntaxKind::Invariant);
        self.bump();
        if self.eat(TokenKind::LeftParen) {
            if !self.at(TokenKind::RightParen) {
                self.assign_expr();
                if self.eat(TokenKind::Comma) {
                    self.assign_expr();
                }
            }
            self.expect(TokenKind::RightParen, "an invariant");
            if self.at(TokenKind::LeftBrace) {
                self.block_statement();
            } else {
                self.expect(TokenKind::Semicolon, "an invariant");
            }
        } else {
            self.block_statement();
        }
        self.finish_node();
    }

    pub(crate) fn unittest_block(&mut self) {
        self.start(SyntaxKind::UnittestBlock);
        self.expect(TokenKind::Unittest, "a unittest block");
        self.block_statement();
        self.finish_node();
    }

    // ── Aggregates ──────────────────────────────────────────────────────

    fn struct_or_union_declaration(&mut self) {
        let kind = if self.at(TokenKind::Struct) {
            SyntaxKind::StructDeclaration
        } else {
            SyntaxKind::UnionDeclaration
        };
        // Nameless, bodied aggregates inside another aggregate.
        if self.nth(1) == TokenKind::LeftBrace {
            self.start(SyntaxKind::AnonymousStructOrUnion);
            self.bump();
            self.aggregate_body();
            self.finish_node();
            return;
        }
        self.start(kind);
        self.bump();
        self.eat(TokenKind::Identifier);
        if self.at(TokenKind::LeftParen) {
            self.template_parameters();
        }
        if self.at(TokenKind::If) {
            self.constraint();
        }
        if !self.eat(TokenKind::Semicolon) {
            self.aggregate_body();
        }
        self.finish_node();
    }

    fn class_or_interface_declaration(&mut self) {
        let kind = if self.at(TokenKind::Class) {
            SyntaxKind::ClassDeclaration
        } else {
            SyntaxKind::InterfaceDeclaration
        };
        self.start(kind);
        self.bump();
        self.expect(TokenKind::Identifier, "an aggregate name");
        if self.at(TokenKind::LeftParen) {
            self.template_parameters();
        }
        if self.at(TokenKind::If) {
            self.constraint();
        }
        if self.at(TokenKind::Colon) {
            self.base_class_list();
        }
        if self.at(TokenKind::If) {
            self.constraint();
        }
        if !self.eat(TokenKind::Semicolon) {
            self.aggregate_body();
        }
        self.finish_node();
    }

    fn base_class_list(&mut self) {
        self.start(SyntaxKind::BaseClassList);
        self.bump();
        self.base_class();
        while self.eat(TokenKind::Comma) {
            self.base_class();
        }
        self.finish_node();
    }

    fn base_class(&mut self) {
        self.start(SyntaxKind::BaseClass);
        self.type_();
        self.finish_node();
    }

    pub(crate) fn aggregate_body(&mut self) {
        self.start(SyntaxKind::AggregateBody);
        self.expect(TokenKind::LeftBrace, "an aggregate body");
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            self.decl_def();
        }
        self.expect(TokenKind::RightBrace, "an aggregate body");
        self.finish_node();
    }

    // ── Enums ───────────────────────────────────────────────────────────

    /// `enum` opens a proper enum declaration, an anonymous enum, or a
    /// manifest constant (`enum x = 5;`, `enum int x = 5;`).
    fn enum_or_manifest_declaration(&mut self) {
        match self.nth(1) {
            TokenKind::Identifier
                if matches!(
                    self.nth(2),
                    TokenKind::LeftBrace | TokenKind::Colon | TokenKind::Semicolon
                ) =>
            {
                self.enum_declaration();
            }
            TokenKind::LeftBrace | TokenKind::Colon => {
                self.start(SyntaxKind::AnonymousEnumDeclaration);
                self.bump();
                if self.eat(TokenKind::Colon) {
                    self.type_();
                }
                self.enum_body();
                self.finish_node();
            }
            _ => {
                // Manifest constant: enum as a storage class.
                self.start(SyntaxKind::AttributeSpecifier);
                self.start(SyntaxKind::StorageClass);
                self.bump();
                self.finish_node();
                if self.at(TokenKind::Identifier)
                    && matches!(self.nth(1), TokenKind::Assign | TokenKind::Comma)
                {
                    self.auto_declaration();
                } else {
                    self.decl_def();
                }
                self.finish_node();
            }
        }
    }

    fn enum_declaration(&mut self) {
        self.start(SyntaxKind::EnumDeclaration);
        self.bump();
        self.expect(TokenKind::Identifier, "an enum name");
        if self.eat(TokenKind::Colon) {
            self.type_();
        }
        if !self.eat(TokenKind::Semicolon) {
            self.enum_body();
        }
        self.finish_node();
    }

    fn enum_body(&mut self) {
        self.start(SyntaxKind::EnumBody);
        self.expect(TokenKind::LeftBrace, "an enum body");
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            self.enum_member();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightBrace, "an enum body");
        self.finish_node();
    }

    fn enum_member(&mut self) {
        self.start(SyntaxKind::EnumMember);
        while self.at(TokenKind::At) || self.at(TokenKind::Deprecated) {
            self.attribute();
        }
        self.expect(TokenKind::Identifier, "an enum member");
        if self.eat(TokenKind::Assign) {
            self.assign_expr();
        }
        self.finish_node();
    }

    // ── Aliases ─────────────────────────────────────────────────────────

    fn alias_declaration(&mut self) {
        if self.nth(1) == TokenKind::Identifier && self.nth(2) == TokenKind::This {
            self.start(SyntaxKind::AliasThisDeclaration);
            self.bump();
            self.bump();
            self.bump();
            self.expect(TokenKind::Semicolon, "an alias this declaration");
            self.finish_node();
            return;
        }
        self.start(SyntaxKind::AliasDeclaration);
        self.bump();
        if self.at(TokenKind::Identifier)
            && matches!(self.nth(1), TokenKind::Assign | TokenKind::LeftParen)
        {
            self.alias_initializer();
            while self.eat(TokenKind::Comma) {
                self.alias_initializer();
            }
        } else {
            // Old style: alias Type Name;
            self.type_();
            self.expect(TokenKind::Identifier, "an alias name");
            while self.eat(TokenKind::Comma) {
                self.expect(TokenKind::Identifier, "an alias name");
            }
        }
        self.expect(TokenKind::Semicolon, "an alias declaration");
        self.finish_node();
    }

    fn alias_initializer(&mut self) {
        self.start(SyntaxKind::AliasInitializer);
        self.expect(TokenKind::Identifier, "an alias name");
        if self.at(TokenKind::LeftParen) {
            self.template_parameters();
        }
        self.expect(TokenKind::Assign, "an alias initializer");
        // The right side is a type for `alias I = int;` and an
        // expression for `alias f = x => x`.
        if let Some(after) = self.probe_type(self.cursor.pos()) {
            if matches!(
                self.cursor.tokens().significant(after).kind,
                TokenKind::Semicolon | TokenKind::Comma
            ) {
                self.type_();
                self.finish_node();
                return;
            }
        }
        self.assign_expr();
        self.finish_node();
    }

    // ── Templates ───────────────────────────────────────────────────────

    fn template_declaration(&mut self) {
        self.start(SyntaxKind::TemplateDeclaration);
        self.bump();
        self.expect(TokenKind::Identifier, "a template name");
        self.template_parameters();
        if self.at(TokenKind::If) {
            self.constraint();
        }
        self.expect(TokenKind::LeftBrace, "a template body");
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            self.decl_def();
        }
        self.expect(TokenKind::RightBrace, "a template body");
        self.finish_node();
    }

    pub(crate) fn template_parameters(&mut self) {
        self.start(SyntaxKind::TemplateParameters);
        self.expect(TokenKind::LeftParen, "template parameters");
        while !self.at(TokenKind::RightParen) && !self.is_eof() {
            self.template_parameter();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightParen, "template parameters");
        self.finish_node();
    }

    pub(crate) fn template_parameter(&mut self) {
        match self.kind() {
            TokenKind::This => {
                self.start(SyntaxKind::TemplateThisParameter);
                self.bump();
                self.expect(TokenKind::Identifier, "a template this parameter");
                self.finish_node();
            }
            TokenKind::Alias => {
                self.start(SyntaxKind::TemplateAliasParameter);
                self.bump();
                self.expect(TokenKind::Identifier, "a template alias parameter");
                if self.eat(TokenKind::Colon) {
                    self.type_or_expr();
                }
                if self.eat(TokenKind::Assign) {
                    self.type_or_expr();
                }
                self.finish_node();
            }
            TokenKind::Identifier if self.nth(1) == TokenKind::Ellipsis => {
                self.start(SyntaxKind::TemplateTupleParameter);
                self.bump();
                self.bump();
                self.finish_node();
            }
            TokenKind::Identifier
                if matches!(
                    self.nth(1),
                    TokenKind::Comma
                        | TokenKind::RightParen
                        | TokenKind::Colon
                        | TokenKind::Assign
                ) =>
            {
                self.start(SyntaxKind::TemplateTypeParameter);
                self.bump();
                if self.eat(TokenKind::Colon) {
                    self.type_or_expr();
                }
                if self.eat(TokenKind::Assign) {
                    self.type_or_expr();
                }
                self.finish_node();
            }
            _ => {
                self.start(SyntaxKind::TemplateValueParameter);
                self.type_();
                self.expect(TokenKind::Identifier, "a template value parameter");
                if self.eat(TokenKind::Colon) {
                    self.assign_expr();
                }
                if self.eat(TokenKind::Assign) {
                    if self.at(TokenKind::SpecialFile)
                        || self.at(TokenKind::SpecialLine)
                        || self.at(TokenKind::SpecialModule)
                    {
                        self.bump();
                    } else {
                        self.assign_expr();
                    }
                }
                self.finish_node();
            }
        }
    }

    pub(crate) fn constraint(&mut self) {
        self.start(SyntaxKind::Constraint);
        self.expect(TokenKind::If, "a template constraint");
        self.expect(TokenKind::LeftParen, "a template constraint");
        self.expression();
        self.expect(TokenKind::RightParen, "a template constraint");
        self.finish_node();
    }

    fn template_mixin_declaration(&mut self) {
        self.start(SyntaxKind::TemplateMixinDeclaration);
        self.bump();
        self.bump();
        self.expect(TokenKind::Identifier, "a mixin template name");
        self.template_parameters();
        if self.at(TokenKind::If) {
            self.constraint();
        }
        self.expect(TokenKind::LeftBrace, "a mixin template body");
        while !self.at(TokenKind::RightBrace) && !self.is_eof() {
            self.decl_def();
        }
        self.expect(TokenKind::RightBrace, "a mixin template body");
        self.finish_node();
    }

    /// `mixin Name!(args) alias;`
    pub(crate) fn template_mixin(&mut self) {
        self.start(SyntaxKind::TemplateMixin);
        self.expect(TokenKind::Mixin, "a mixin instantiation");
        self.qualified_identifier();
        self.eat(TokenKind::Identifier);
        self.expect(TokenKind::Semicolon, "a mixin instantiation");
        self.finish_node();
    }

    pub(crate) fn mixin_declaration(&mut self) {
        self.start(SyntaxKind::MixinDeclaration);
        self.mixin_expression();
        self.expect(TokenKind::Semicolon, "a mixin declaration");
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use dlang_syntax::SyntaxKind;

    fn assert_clean(source: &str) -> dlang_syntax::SyntaxNode {
        let p = parse(source);
        assert!(!p.has_errors(), "{source}: {:?}", p.errors());
        p.syntax()
    }

    fn has(source: &str, kind: SyntaxKind) {
        let root = assert_clean(source);
        assert!(
            root.descendants().any(|n| n.kind() == kind),
            "missing {kind:?} in\n{}",
            root.debug_dump()
        );
    }

    #[test]
    fn variable_with_initializers() {
        has("int x = 1, y, z = 3;", SyntaxKind::VarDeclarations);
        has("int[3] a = [1, 2, 3];", SyntaxKind::ArrayInitializer);
        has("S s = { x: 1, y: 2 };", SyntaxKind::StructInitializer);
        has("int x = void;", SyntaxKind::Initializer);
    }

    #[test]
    fn c_style_array_declarator() {
        has("int x[10];", SyntaxKind::TypeSuffix);
        has("int m[2][3];", SyntaxKind::VarDeclarations);
        has("int buf[];", SyntaxKind::TypeSuffix);
        has("int aa[string];", SyntaxKind::TypeSuffix);
        has("Foo x[10];", SyntaxKind::VarDeclarations);
        // Statement position goes through the declaration probe.
        has("void f() { Foo x[10]; }", SyntaxKind::TypeSuffix);
    }

    #[test]
    fn c_style_function_pointer_declarator() {
        let root = assert_clean("int (*fp)(int, int);");
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::Declarator));
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::Parameters));
    }

    #[test]
    fn function_with_contracts() {
        has(
            "int f(int a)\nin { assert(a > 0); }\nout (r) { assert(r > a); }\ndo { return a + 1; }",
            SyntaxKind::InContract,
        );
        has("int g(int a) in (a > 0) { return a; }", SyntaxKind::InContract);
    }

    #[test]
    fn template_function_two_paren_groups() {
        let root = assert_clean("T max(T)(T a, T b) { return a > b ? a : b; }");
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::TemplateParameters));
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::Parameters));
    }

    #[test]
    fn constructors_and_special_members() {
        has("struct S { this(int x) { } }", SyntaxKind::Constructor);
        has("struct S { this(this) { } }", SyntaxKind::Postblit);
        has("class C { ~this() { } }", SyntaxKind::Destructor);
        has("static this() { }", SyntaxKind::StaticConstructor);
        has("shared static ~this() { }", SyntaxKind::SharedStaticDestructor);
        has("class C { invariant(x > 0); }", SyntaxKind::Invariant);
        has("unittest { assert(true); }", SyntaxKind::UnittestBlock);
    }

    #[test]
    fn aggregates() {
        has("struct Point { int x; int y; }", SyntaxKind::StructDeclaration);
        has("class D : Base, I!(int) { }", SyntaxKind::BaseClassList);
        has("interface I { void f(); }", SyntaxKind::InterfaceDeclaration);
        has("union U { struct { int a; int b; } }", SyntaxKind::AnonymousStructOrUnion);
        has("struct Fwd;", SyntaxKind::StructDeclaration);
    }

    #[test]
    fn enums() {
        has("enum Color { Red, Green = 2, Blue }", SyntaxKind::EnumDeclaration);
        has("enum : int { A, B }", SyntaxKind::AnonymousEnumDeclaration);
        has("enum x = 42;", SyntaxKind::AutoDeclaration);
        has("enum int y = 1;", SyntaxKind::VarDeclarations);
        has("enum Color c = Color.Red;", SyntaxKind::VarDeclarations);
    }

    #[test]
    fn aliases() {
        has("alias Int = int;", SyntaxKind::AliasInitializer);
        has("alias f = x => x * 2;", SyntaxKind::AliasInitializer);
        has("alias int MyInt;", SyntaxKind::AliasDeclaration);
        has("struct S { int v; alias v this; }", SyntaxKind::AliasThisDeclaration);
    }

    #[test]
    fn templates_and_mixins() {
        has(
            "template Pair(T, U = int) if (is(T == struct)) { T first; U second; }",
            SyntaxKind::TemplateDeclaration,
        );
        has("mixin template M(alias f) { void call() { f(); } }", SyntaxKind::TemplateMixinDeclaration);
        has("mixin M!(foo) m;", SyntaxKind::TemplateMixin);
        has("mixin(\"int x;\");", SyntaxKind::MixinDeclaration);
    }

    #[test]
    fn broken_declaration_stays_contained() {
        let p = parse("int x = ;\nint y = 2;");
        assert!(p.has_errors());
        let root = p.syntax();
        // The second declaration still parses cleanly.
        let decls: Vec<_> = root
            .child_nodes()
            .filter(|n| n.kind() == SyntaxKind::VarDeclarations)
            .collect();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].text(), "int y = 2;");
    }
}
