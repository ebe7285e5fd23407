//! Expression grammar.
//!
//! One operator-matching loop drives every binary level using the binding
//! powers in [`crate::precedence`]; precedence and associativity fall out
//! of the `(left, right)` pairs instead of one function per level. The
//! left operand is wrapped retroactively through a builder checkpoint
//! once the operator is known.

use crate::precedence::{infix_binding_power, ASSIGN_BP, TERNARY_BP};
use crate::Parser;
use dlang_syntax::{SyntaxKind, TokenKind};

impl Parser<'_> {
    /// Full expression including the comma operator.
    pub(crate) fn expression(&mut self) {
        let cp = self.checkpoint();
        self.assign_expr();
        if self.at(TokenKind::Comma) {
            while self.eat(TokenKind::Comma) {
                self.assign_expr();
            }
            self.wrap(cp, SyntaxKind::CommaExpression);
        }
    }

    /// Expression without the comma operator; the element grammar of
    /// argument lists and initializers.
    pub(crate) fn assign_expr(&mut self) {
        self.expr_bp(0);
    }

    fn expr_bp(&mut self, min_bp: u8) {
        let cp = self.checkpoint();
        self.unary_expr();
        loop {
            // Assignment and `?:` sit below the table; both are
            // right-associative.
            if self.kind().is_assign_op() {
                if ASSIGN_BP.0 < min_bp {
                    break;
                }
                self.bump();
                self.expr_bp(ASSIGN_BP.1);
                self.wrap(cp, SyntaxKind::AssignExpression);
                continue;
            }
            if self.at(TokenKind::Question) {
                if TERNARY_BP.0 < min_bp {
                    break;
                }
                self.bump();
                self.expression();
                self.expect(TokenKind::Colon, "a conditional expression");
                self.expr_bp(TERNARY_BP.1);
                self.wrap(cp, SyntaxKind::TernaryExpression);
                continue;
            }

            // `!is` and `!in` are two tokens fused into one operator.
            let (op, fused) = match self.kind() {
                TokenKind::Bang if self.nth(1) == TokenKind::Is => (TokenKind::Is, true),
                TokenKind::Bang if self.nth(1) == TokenKind::In => (TokenKind::In, true),
                kind => (kind, false),
            };
            let Some((l_bp, r_bp)) = infix_binding_power(op) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.bump();
            if fused {
                self.bump();
            }
            self.expr_bp(r_bp);
            let kind = if op == TokenKind::In {
                SyntaxKind::InExpression
            } else {
                SyntaxKind::BinaryExpression
            };
            self.wrap(cp, kind);
        }
    }

    fn unary_expr(&mut self) {
        match self.kind() {
            TokenKind::Amp
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Star
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Bang
            | TokenKind::Tilde => {
                let cp = self.checkpoint();
                self.bump();
                self.unary_expr();
                self.wrap(cp, SyntaxKind::PrefixExpression);
            }
            TokenKind::Cast => self.cast_expression(),
            TokenKind::New => self.new_expression(),
            TokenKind::Delete => {
                let cp = self.checkpoint();
                self.bump();
                self.unary_expr();
                self.wrap(cp, SyntaxKind::DeleteExpression);
            }
            _ => {
                // `^^` takes a postfix base and a unary exponent, so
                // `-x ^^ y` is `-(x ^^ y)`.
                let cp = self.checkpoint();
                self.postfix_expr();
                if self.at(TokenKind::Pow) {
                    self.bump();
                    self.unary_expr();
                    self.wrap(cp, SyntaxKind::BinaryExpression);
                }
            }
        }
    }

    fn postfix_expr(&mut self) {
        let cp = self.checkpoint();
        self.primary_expr();
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.bump();
                    if self.at(TokenKind::New) {
                        self.new_expression();
                    } else if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::Bang {
                        self.template_instance();
                    } else {
                        self.expect(TokenKind::Identifier, "a member access");
                    }
                    self.wrap(cp, SyntaxKind::FieldExpression);
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    self.bump();
                    self.wrap(cp, SyntaxKind::PostfixExpression);
                }
                TokenKind::LeftParen => {
                    self.argument_list();
                    self.wrap(cp, SyntaxKind::CallExpression);
                }
                TokenKind::LeftBracket => self.index_or_slice(cp),
                _ => return,
            }
        }
    }

    fn index_or_slice(&mut self, cp: dlang_syntax::Checkpoint) {
        self.bump();
        if self.at(TokenKind::RightBracket) {
            self.bump();
            self.wrap(cp, SyntaxKind::SliceExpression);
            return;
        }
        self.assign_expr();
        if self.eat(TokenKind::DotDot) {
            self.assign_expr();
            self.expect(TokenKind::RightBracket, "a slice expression");
            self.wrap(cp, SyntaxKind::SliceExpression);
            return;
        }
        while self.eat(TokenKind::Comma) {
            self.assign_expr();
        }
        self.expect(TokenKind::RightBracket, "an index expression");
        self.wrap(cp, SyntaxKind::IndexExpression);
    }

    /// `( args? )` as a node, parens included.
    pub(crate) fn argument_list(&mut self) {
        self.start(SyntaxKind::ArgumentList);
        self.expect(TokenKind::LeftParen, "an argument list");
        if !self.at(TokenKind::RightParen) && !self.is_eof() {
            self.assign_expr();
            while self.eat(TokenKind::Comma) {
                self.assign_expr();
            }
        }
        self.expect(TokenKind::RightParen, "an argument list");
        self.finish_node();
    }

    fn primary_expr(&mut self) {
        match self.kind() {
            TokenKind::Identifier => {
                if self.nth(1) == TokenKind::FatArrow {
                    self.start(SyntaxKind::LambdaExpression);
                    self.bump();
                    self.bump();
                    self.assign_expr();
                    self.finish_node();
                } else if self.nth(1) == TokenKind::Bang
                    && self.probe_template_suffix(self.cursor.pos() + 1).is_some()
                {
                    self.template_instance();
                } else {
                    self.start(SyntaxKind::IdentifierExpression);
                    self.bump();
                    self.finish_node();
                }
            }
            TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::CharLiteral
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => {
                self.start(SyntaxKind::LiteralExpression);
                self.bump();
                self.finish_node();
            }
            kind if kind.is_string_literal() => {
                // Adjacent string literals concatenate into one node.
                self.start(SyntaxKind::StringLiteralExpression);
                while self.kind().is_string_literal() {
                    self.bump();
                }
                self.finish_node();
            }
            TokenKind::This | TokenKind::Super => {
                self.start(SyntaxKind::IdentifierExpression);
                self.bump();
                self.finish_node();
            }
            TokenKind::Dollar => {
                self.start(SyntaxKind::DollarExpression);
                self.bump();
                self.finish_node();
            }
            TokenKind::SpecialFile
            | TokenKind::SpecialFileFullPath
            | TokenKind::SpecialModule
            | TokenKind::SpecialLine
            | TokenKind::SpecialFunction
            | TokenKind::SpecialPrettyFunction => {
                self.start(SyntaxKind::SpecialKeywordExpression);
                self.bump();
                self.finish_node();
            }
            TokenKind::LeftParen => self.paren_or_function_literal(),
            TokenKind::LeftBracket => self.array_literal(),
            TokenKind::LeftBrace => {
                self.start(SyntaxKind::FunctionLiteral);
                self.block_statement();
                self.finish_node();
            }
            TokenKind::Function | TokenKind::Delegate => self.function_literal(),
            TokenKind::Assert => self.assert_expression(),
            TokenKind::Mixin => self.mixin_expression(),
            TokenKind::Import => self.import_expression(),
            TokenKind::Typeid => self.typeid_expression(),
            TokenKind::Is => self.is_expression(),
            TokenKind::Traits => self.traits_expression(),
            TokenKind::Typeof => self.typeof_expression(),
            kind if kind.is_basic_type_keyword() => {
                // int.max, ubyte(255)
                self.start(SyntaxKind::BasicType);
                self.bump();
                self.finish_node();
            }
            _ => self.error_missing(["an expression"], "an expression"),
        }
    }

    /// `(` opens a parenthesized expression, a lambda `(a, b) => e`, or a
    /// parameterized function literal `(int x) { }`. A scan over the
    /// balanced group decides before anything is committed.
    fn paren_or_function_literal(&mut self) {
        if let Some(after) = self.probe_balanced(
            self.cursor.pos(),
            TokenKind::LeftParen,
            TokenKind::RightParen,
        ) {
            let mut pos = after;
            while matches!(
                self.cursor.tokens().significant(pos).kind,
                TokenKind::Pure
                    | TokenKind::Nothrow
                    | TokenKind::Const
                    | TokenKind::Immutable
                    | TokenKind::Inout
                    | TokenKind::Shared
                    | TokenKind::Return
                    | TokenKind::Scope
                    | TokenKind::At
            ) {
                pos += 1;
            }
            match self.cursor.tokens().significant(pos).kind {
                TokenKind::FatArrow => {
                    self.start(SyntaxKind::LambdaExpression);
                    self.parameters();
                    self.member_function_attributes();
                    self.bump();
                    self.assign_expr();
                    self.finish_node();
                    return;
                }
                TokenKind::LeftBrace => {
                    self.start(SyntaxKind::FunctionLiteral);
                    self.parameters();
                    self.member_function_attributes();
                    self.block_statement();
                    self.finish_node();
                    return;
                }
                _ => {}
            }
        }
        self.start(SyntaxKind::ParenExpression);
        self.bump();
        self.expression();
        self.expect(TokenKind::RightParen, "a parenthesized expression");
        self.finish_node();
    }

    /// `[1, 2]` or `["a": 1]`; the first element decides which.
    fn array_literal(&mut self) {
        let cp = self.checkpoint();
        self.bump();
        let mut assoc = false;
        if !self.at(TokenKind::RightBracket) && !self.is_eof() {
            assoc = self.array_element();
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RightBracket) {
                    break;
                }
                self.array_element();
            }
        }
        self.expect(TokenKind::RightBracket, "an array literal");
        let kind = if assoc {
            SyntaxKind::AssocArrayLiteral
        } else {
            SyntaxKind::ArrayLiteral
        };
        self.wrap(cp, kind);
    }

    fn array_element(&mut self) -> bool {
        let cp = self.checkpoint();
        self.assign_expr();
        if self.at(TokenKind::Colon) {
            self.bump();
            self.assign_expr();
            self.wrap(cp, SyntaxKind::KeyValuePair);
            true
        } else {
            false
        }
    }

    /// `function`/`delegate` literal with optional return type and
    /// parameters.
    fn function_literal(&mut self) {
        self.start(SyntaxKind::FunctionLiteral);
        self.bump();
        if !self.at(TokenKind::LeftParen) && !self.at(TokenKind::LeftBrace) {
            self.type_();
        }
        if self.at(TokenKind::LeftParen) {
            self.parameters();
        }
        self.member_function_attributes();
        if self.at(TokenKind::FatArrow) {
            self.bump();
            self.assign_expr();
        } else {
            self.block_statement();
        }
        self.finish_node();
    }

    fn assert_expression(&mut self) {
        self.start(SyntaxKind::AssertExpression);
        self.bump();
        self.expect(TokenKind::LeftParen, "an assert expression");
        self.assign_expr();
        if self.eat(TokenKind::Comma) {
            self.assign_expr();
        }
        self.expect(TokenKind::RightParen, "an assert expression");
        self.finish_node();
    }

    pub(crate) fn mixin_expression(&mut self) {
        self.start(SyntaxKind::MixinExpression);
        self.expect(TokenKind::Mixin, "a mixin expression");
        self.expect(TokenKind::LeftParen, "a mixin expression");
        self.assign_expr();
        while self.eat(TokenKind::Comma) {
            self.assign_expr();
        }
        self.expect(TokenKind::RightParen, "a mixin expression");
        self.finish_node();
    }

    fn import_expression(&mut self) {
        self.start(SyntaxKind::ImportExpression);
        self.bump();
        self.expect(TokenKind::LeftParen, "an import expression");
        self.assign_expr();
        self.expect(TokenKind::RightParen, "an import expression");
        self.finish_node();
    }

    fn typeid_expression(&mut self) {
        self.start(SyntaxKind::TypeidExpression);
        self.bump();
        self.expect(TokenKind::LeftParen, "a typeid expression");
        self.type_or_expr();
        self.expect(TokenKind::RightParen, "a typeid expression");
        self.finish_node();
    }

    /// `is ( Type identifier? ( : | == ) TypeSpecialization , ... )`.
    fn is_expression(&mut self) {
        self.start(SyntaxKind::IsExpression);
        self.bump();
        self.expect(TokenKind::LeftParen, "an is expression");
        self.type_();
        self.eat(TokenKind::Identifier);
        if self.at(TokenKind::Colon) || self.at(TokenKind::EqEq) {
            self.bump();
            self.type_specialization();
        }
        while self.eat(TokenKind::Comma) {
            self.template_parameter();
        }
        self.expect(TokenKind::RightParen, "an is expression");
        self.finish_node();
    }

    fn type_specialization(&mut self) {
        match self.kind() {
            TokenKind::Struct
            | TokenKind::Union
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Enum
            | TokenKind::Super
            | TokenKind::Return
            | TokenKind::Parameters
            | TokenKind::Module
            | TokenKind::Package => self.bump(),
            // `function` and `delegate` are also type suffixes; a bare
            // keyword right before `,` or `)` is the specialization form.
            TokenKind::Function | TokenKind::Delegate
                if matches!(self.nth(1), TokenKind::Comma | TokenKind::RightParen) =>
            {
                self.bump();
            }
            kind if kind.is_type_ctor()
                && matches!(self.nth(1), TokenKind::Comma | TokenKind::RightParen) =>
            {
                self.bump();
            }
            _ => self.type_(),
        }
    }

    fn traits_expression(&mut self) {
        self.start(SyntaxKind::TraitsExpression);
        self.bump();
        self.expect(TokenKind::LeftParen, "a traits expression");
        self.expect(TokenKind::Identifier, "a traits keyword");
        while self.eat(TokenKind::Comma) {
            self.type_or_expr();
        }
        self.expect(TokenKind::RightParen, "a traits expression");
        self.finish_node();
    }

    fn cast_expression(&mut self) {
        self.start(SyntaxKind::CastExpression);
        self.bump();
        self.expect(TokenKind::LeftParen, "a cast expression");
        if !self.at(TokenKind::RightParen) {
            // cast(const) strips qualifiers without naming a type.
            if self.kind().is_type_ctor()
                && matches!(self.nth(1), TokenKind::RightParen | TokenKind::Comma)
            {
                while self.kind().is_type_ctor() {
                    self.bump();
                    self.eat(TokenKind::Comma);
                }
            } else {
                self.type_();
            }
        }
        self.expect(TokenKind::RightParen, "a cast expression");
        self.unary_expr();
        self.finish_node();
    }

    fn new_expression(&mut self) {
        if self.nth(1) == TokenKind::Class {
            self.start(SyntaxKind::NewAnonClassExpression);
            self.bump();
            self.bump();
            if self.at(TokenKind::LeftParen) {
                self.argument_list();
            }
            if !self.at(TokenKind::LeftBrace) && !self.is_eof() {
                self.type_();
                while self.eat(TokenKind::Comma) {
                    self.type_();
                }
            }
            self.aggregate_body();
            self.finish_node();
            return;
        }
        self.start(SyntaxKind::NewExpression);
        self.expect(TokenKind::New, "a new expression");
        self.type_();
        if self.at(TokenKind::LeftParen) {
            self.argument_list();
        }
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use dlang_syntax::{SyntaxKind, SyntaxNode};

    fn expr_tree(expr: &str) -> SyntaxNode {
        let source = format!("auto v = {expr};");
        let parse = parse(&source);
        assert!(!parse.has_errors(), "{expr}: {:?}", parse.errors());
        parse.syntax()
    }

    fn find(node: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
        node.descendants()
            .find(|n| n.kind() == kind)
            .unwrap_or_else(|| panic!("no {kind:?} in\n{}", node.debug_dump()))
    }

    #[test]
    fn precedence_shapes_the_tree() {
        let root = expr_tree("1 + 2 * 3");
        let add = find(&root, SyntaxKind::BinaryExpression);
        assert_eq!(add.text(), "1 + 2 * 3");
        let mul = find(&add, SyntaxKind::BinaryExpression);
        // The outer node is the addition, so the first nested binary
        // expression must be the multiplication.
        let inner = mul
            .descendants()
            .skip(1)
            .find(|n| n.kind() == SyntaxKind::BinaryExpression)
            .unwrap();
        assert_eq!(inner.text(), "2 * 3");
    }

    #[test]
    fn assignment_is_right_associative() {
        let root = expr_tree("a = b = c");
        let outer = find(&root, SyntaxKind::AssignExpression);
        assert_eq!(outer.text(), "a = b = c");
        let inner = outer
            .descendants()
            .skip(1)
            .find(|n| n.kind() == SyntaxKind::AssignExpression)
            .unwrap();
        assert_eq!(inner.text(), "b = c");
    }

    #[test]
    fn wrapped_nodes_exclude_their_leading_whitespace() {
        // Checkpoint wrapping must not capture the trivia run before
        // the first operand token.
        let root = expr_tree("a = b + c");
        let assign = find(&root, SyntaxKind::AssignExpression);
        assert_eq!(assign.text(), "a = b + c");
        let sum = find(&assign, SyntaxKind::BinaryExpression);
        assert_eq!(sum.text(), "b + c");
    }

    #[test]
    fn pow_exponent_takes_the_unary_minus() {
        let root = expr_tree("-x ^^ 2");
        let prefix = find(&root, SyntaxKind::PrefixExpression);
        assert_eq!(prefix.text(), "-x ^^ 2");
    }

    #[test]
    fn fused_not_is_and_not_in() {
        let root = expr_tree("a !is null && b !in c");
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::InExpression));
    }

    #[test]
    fn ternary_middle_allows_comma() {
        expr_tree("p ? a : b");
        expr_tree("p ? (a, b) : c");
    }

    #[test]
    fn postfix_chain() {
        let root = expr_tree("obj.field[1 .. 2].map!(x => x)(r)");
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::SliceExpression));
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::CallExpression));
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::LambdaExpression));
    }

    #[test]
    fn string_concatenation_is_one_node() {
        let root = expr_tree("\"a\" `b` q{c}");
        let lit = find(&root, SyntaxKind::StringLiteralExpression);
        assert_eq!(lit.text(), "\"a\" `b` q{c}");
    }

    #[test]
    fn is_expression_with_specialization() {
        let root = expr_tree("is(T : U!int, U)");
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::IsExpression));
    }

    #[test]
    fn anonymous_class_allocation() {
        let root = expr_tree("new class Base { }");
        assert!(root
            .descendants()
            .any(|n| n.kind() == SyntaxKind::NewAnonClassExpression));
    }
}
