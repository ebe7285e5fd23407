//! The D surface grammar as a rule table.
//!
//! This is the checked, declarative description of what the handwritten
//! grammar modules implement. It exists to be validated (no left
//! recursion, all references bound) and queried (FIRST sets, nullability);
//! dispatch sets in the parser are pinned against it by tests.
//!
//! The table is deliberately permissive where the language is ambiguous
//! (type vs. expression positions); the conflict policies that pick one
//! reading live in the parser, not here.

use crate::rules::{alt, opt, plus, r, seq, sep_by, star, tok, Grammar, RuleExpr};
use dlang_syntax::TokenKind as K;

fn builtin_type() -> RuleExpr {
    alt(vec![
        tok(K::Bool),
        tok(K::Byte),
        tok(K::Ubyte),
        tok(K::Short),
        tok(K::Ushort),
        tok(K::Int),
        tok(K::Uint),
        tok(K::Long),
        tok(K::Ulong),
        tok(K::Cent),
        tok(K::Ucent),
        tok(K::Char),
        tok(K::Wchar),
        tok(K::Dchar),
        tok(K::Float),
        tok(K::Double),
        tok(K::Real),
        tok(K::Ifloat),
        tok(K::Idouble),
        tok(K::Ireal),
        tok(K::Cfloat),
        tok(K::Cdouble),
        tok(K::Creal),
        tok(K::Void),
    ])
}

fn string_literal() -> RuleExpr {
    alt(vec![
        tok(K::DqStringLiteral),
        tok(K::WysiwygStringLiteral),
        tok(K::BacktickStringLiteral),
        tok(K::HexStringLiteral),
        tok(K::DelimitedStringLiteral),
        tok(K::TokenStringLiteral),
    ])
}

fn type_ctor() -> RuleExpr {
    alt(vec![
        tok(K::Const),
        tok(K::Immutable),
        tok(K::Shared),
        tok(K::Inout),
    ])
}

/// Build the validated D grammar table.
///
/// Construction cannot fail for the table below; the `Result` surfaces
/// mistakes when the table is edited.
pub fn d_grammar() -> Result<Grammar, crate::rules::GrammarError> {
    let defs: Vec<(&'static str, RuleExpr)> = vec![
        // ─── Top level ───────────────────────────────────────────────────
        (
            "source_file",
            seq(vec![opt(r("module_declaration")), star(r("decl_def"))]),
        ),
        (
            "module_declaration",
            seq(vec![
                star(r("module_attribute")),
                tok(K::Module),
                r("module_fqn"),
                tok(K::Semicolon),
            ]),
        ),
        (
            "module_attribute",
            alt(vec![r("deprecated_attribute"), r("at_attribute")]),
        ),
        ("module_fqn", sep_by(tok(K::Identifier), K::Dot)),
        (
            "import_declaration",
            seq(vec![
                opt(tok(K::Static)),
                tok(K::Import),
                sep_by(r("import"), K::Comma),
                tok(K::Semicolon),
            ]),
        ),
        (
            "import",
            seq(vec![
                opt(seq(vec![tok(K::Identifier), tok(K::Assign)])),
                r("module_fqn"),
                opt(seq(vec![tok(K::Colon), sep_by(r("import_bind"), K::Comma)])),
            ]),
        ),
        (
            "import_bind",
            seq(vec![
                opt(seq(vec![tok(K::Identifier), tok(K::Assign)])),
                tok(K::Identifier),
            ]),
        ),
        // ─── Declarations ────────────────────────────────────────────────
        (
            "decl_def",
            alt(vec![
                r("import_declaration"),
                r("attribute_specifier"),
                r("enum_declaration"),
                r("struct_declaration"),
                r("union_declaration"),
                r("class_declaration"),
                r("interface_declaration"),
                r("template_declaration"),
                r("template_mixin_declaration"),
                r("template_mixin"),
                r("mixin_declaration"),
                r("unittest_block"),
                r("invariant_decl"),
                r("constructor"),
                r("destructor"),
                r("alias_declaration"),
                r("conditional_declaration"),
                r("version_specification"),
                r("debug_specification"),
                r("static_assert"),
                r("static_foreach_declaration"),
                r("var_declarations"),
                r("func_declaration"),
                tok(K::Semicolon),
            ]),
        ),
        (
            "attribute_specifier",
            seq(vec![
                plus(r("attribute")),
                alt(vec![tok(K::Colon), r("decl_block"), r("decl_def")]),
            ]),
        ),
        (
            "decl_block",
            seq(vec![tok(K::LeftBrace), star(r("decl_def")), tok(K::RightBrace)]),
        ),
        (
            "attribute",
            alt(vec![
                r("at_attribute"),
                r("align_attribute"),
                r("deprecated_attribute"),
                r("linkage_attribute"),
                r("pragma_attribute"),
                tok(K::Private),
                tok(K::Package),
                tok(K::Protected),
                tok(K::Public),
                tok(K::Export),
                tok(K::Abstract),
                tok(K::Auto),
                tok(K::Final),
                tok(K::Gshared),
                tok(K::Nothrow),
                tok(K::Override),
                tok(K::Pure),
                tok(K::Ref),
                tok(K::Scope),
                tok(K::Static),
                tok(K::Synchronized),
                type_ctor(),
            ]),
        ),
        (
            "at_attribute",
            seq(vec![
                tok(K::At),
                tok(K::Identifier),
                opt(r("arguments")),
            ]),
        ),
        (
            "align_attribute",
            seq(vec![
                tok(K::Align),
                opt(seq(vec![tok(K::LeftParen), r("assign_expr"), tok(K::RightParen)])),
            ]),
        ),
        (
            "deprecated_attribute",
            seq(vec![
                tok(K::Deprecated),
                opt(seq(vec![tok(K::LeftParen), r("assign_expr"), tok(K::RightParen)])),
            ]),
        ),
        (
            "linkage_attribute",
            seq(vec![
                tok(K::Extern),
                opt(seq(vec![
                    tok(K::LeftParen),
                    tok(K::Identifier),
                    star(alt(vec![
                        tok(K::PlusPlus),
                        tok(K::Comma),
                        tok(K::Identifier),
                        tok(K::Dot),
                        tok(K::Struct),
                        tok(K::Class),
                    ])),
                    tok(K::RightParen),
                ])),
            ]),
        ),
        (
            "pragma_attribute",
            seq(vec![
                tok(K::Pragma),
                tok(K::LeftParen),
                tok(K::Identifier),
                star(seq(vec![tok(K::Comma), r("assign_expr")])),
                tok(K::RightParen),
            ]),
        ),
        (
            "var_declarations",
            seq(vec![
                r("type"),
                sep_by(r("declarator_init"), K::Comma),
                tok(K::Semicolon),
            ]),
        ),
        (
            "declarator_init",
            seq(vec![
                r("declarator"),
                opt(seq(vec![tok(K::Assign), r("initializer")])),
            ]),
        ),
        (
            "declarator",
            seq(vec![
                alt(vec![
                    tok(K::Identifier),
                    seq(vec![
                        tok(K::LeftParen),
                        star(tok(K::Star)),
                        tok(K::Identifier),
                        tok(K::RightParen),
                    ]),
                ]),
                star(r("declarator_suffix")),
            ]),
        ),
        (
            "declarator_suffix",
            alt(vec![
                seq(vec![
                    tok(K::LeftBracket),
                    opt(alt(vec![r("type"), r("assign_expr")])),
                    tok(K::RightBracket),
                ]),
                r("parameters"),
            ]),
        ),
        (
            "initializer",
            alt(vec![
                tok(K::Void),
                r("array_initializer"),
                r("assign_expr"),
            ]),
        ),
        (
            "array_initializer",
            seq(vec![
                tok(K::LeftBracket),
                opt(sep_by(
                    seq(vec![
                        opt(seq(vec![r("assign_expr"), tok(K::Colon)])),
                        r("initializer"),
                    ]),
                    K::Comma,
                )),
                tok(K::RightBracket),
            ]),
        ),
        (
            "func_declaration",
            seq(vec![
                r("type"),
                tok(K::Identifier),
                opt(r("template_parameters")),
                r("parameters"),
                star(r("member_function_attribute")),
                opt(r("constraint")),
                r("function_body"),
            ]),
        ),
        (
            "parameters",
            seq(vec![
                tok(K::LeftParen),
                opt(sep_by(r("parameter"), K::Comma)),
                tok(K::RightParen),
            ]),
        ),
        (
            "parameter",
            alt(vec![
                tok(K::Ellipsis),
                seq(vec![
                    star(r("parameter_attribute")),
                    r("type"),
                    opt(tok(K::Identifier)),
                    opt(seq(vec![tok(K::Assign), r("assign_expr")])),
                    opt(tok(K::Ellipsis)),
                ]),
            ]),
        ),
        // Repetition, not a fused single modifier: `in ref scope` stacks.
        (
            "parameter_attribute",
            alt(vec![
                tok(K::In),
                tok(K::Out),
                tok(K::Ref),
                tok(K::Lazy),
                tok(K::Scope),
                tok(K::Return),
                tok(K::Auto),
                type_ctor(),
            ]),
        ),
        (
            "member_function_attribute",
            alt(vec![
                type_ctor(),
                tok(K::Return),
                tok(K::Scope),
                tok(K::Pure),
                tok(K::Nothrow),
                r("at_attribute"),
            ]),
        ),
        (
            "function_body",
            alt(vec![
                seq(vec![star(r("function_contract")), r("block_statement")]),
                seq(vec![
                    plus(r("function_contract")),
                    opt(seq(vec![tok(K::Do), r("block_statement")])),
                ]),
                tok(K::Semicolon),
            ]),
        ),
        (
            "function_contract",
            alt(vec![r("in_contract"), r("out_contract")]),
        ),
        (
            "in_contract",
            seq(vec![
                tok(K::In),
                alt(vec![
                    r("block_statement"),
                    seq(vec![
                        tok(K::LeftParen),
                        r("assign_expr"),
                        opt(seq(vec![tok(K::Comma), r("assign_expr")])),
                        tok(K::RightParen),
                    ]),
                ]),
            ]),
        ),
        (
            "out_contract",
            seq(vec![
                tok(K::Out),
                alt(vec![
                    r("block_statement"),
                    seq(vec![
                        tok(K::LeftParen),
                        opt(tok(K::Identifier)),
                        alt(vec![
                            seq(vec![tok(K::RightParen), r("block_statement")]),
                            seq(vec![
                                tok(K::Semicolon),
                                r("assign_expr"),
                                tok(K::RightParen),
                            ]),
                        ]),
                    ]),
                ]),
            ]),
        ),
        (
            "constructor",
            seq(vec![
                tok(K::This),
                opt(r("template_parameters")),
                r("parameters"),
                star(r("member_function_attribute")),
                opt(r("constraint")),
                r("function_body"),
            ]),
        ),
        (
            "destructor",
            seq(vec![
                tok(K::Tilde),
                tok(K::This),
                tok(K::LeftParen),
                tok(K::RightParen),
                star(r("member_function_attribute")),
                r("function_body"),
            ]),
        ),
        (
            "invariant_decl",
            seq(vec![
                tok(K::Invariant),
                alt(vec![
                    seq(vec![
                        tok(K::LeftParen),
                        opt(r("assign_expr")),
                        tok(K::RightParen),
                        alt(vec![r("block_statement"), tok(K::Semicolon)]),
                    ]),
                    r("block_statement"),
                ]),
            ]),
        ),
        (
            "unittest_block",
            seq(vec![tok(K::Unittest), r("block_statement")]),
        ),
        (
            "mixin_declaration",
            seq(vec![
                tok(K::Mixin),
                tok(K::LeftParen),
                sep_by(r("assign_expr"), K::Comma),
                tok(K::RightParen),
                tok(K::Semicolon),
            ]),
        ),
        (
            "alias_declaration",
            seq(vec![
                tok(K::Alias),
                alt(vec![
                    seq(vec![
                        sep_by(r("alias_initializer"), K::Comma),
                        tok(K::Semicolon),
                    ]),
                    seq(vec![tok(K::Identifier), tok(K::This), tok(K::Semicolon)]),
                    seq(vec![
                        r("type"),
                        sep_by(tok(K::Identifier), K::Comma),
                        tok(K::Semicolon),
                    ]),
                ]),
            ]),
        ),
        (
            "alias_initializer",
            seq(vec![
                tok(K::Identifier),
                opt(r("template_parameters")),
                tok(K::Assign),
                alt(vec![r("type"), r("function_literal")]),
            ]),
        ),
        // ─── Enums ───────────────────────────────────────────────────────
        (
            "enum_declaration",
            seq(vec![
                tok(K::Enum),
                alt(vec![
                    seq(vec![
                        tok(K::Identifier),
                        opt(seq(vec![tok(K::Colon), r("type")])),
                        alt(vec![r("enum_body"), tok(K::Semicolon)]),
                    ]),
                    seq(vec![
                        opt(seq(vec![tok(K::Colon), r("type")])),
                        r("enum_body"),
                    ]),
                    // Manifest constant: enum x = 5; / enum int x = 5;
                    seq(vec![
                        opt(r("type")),
                        tok(K::Identifier),
                        tok(K::Assign),
                        r("assign_expr"),
                        tok(K::Semicolon),
                    ]),
                ]),
            ]),
        ),
        (
            "enum_body",
            seq(vec![
                tok(K::LeftBrace),
                opt(sep_by(r("enum_member"), K::Comma)),
                opt(tok(K::Comma)),
                tok(K::RightBrace),
            ]),
        ),
        (
            "enum_member",
            seq(vec![
                star(r("at_attribute")),
                tok(K::Identifier),
                opt(seq(vec![tok(K::Assign), r("assign_expr")])),
            ]),
        ),
        // ─── Aggregates ──────────────────────────────────────────────────
        (
            "struct_declaration",
            seq(vec![
                tok(K::Struct),
                opt(tok(K::Identifier)),
                opt(r("template_parameters")),
                opt(r("constraint")),
                alt(vec![r("aggregate_body"), tok(K::Semicolon)]),
            ]),
        ),
        (
            "union_declaration",
            seq(vec![
                tok(K::Union),
                opt(tok(K::Identifier)),
                opt(r("template_parameters")),
                opt(r("constraint")),
                alt(vec![r("aggregate_body"), tok(K::Semicolon)]),
            ]),
        ),
        (
            "class_declaration",
            seq(vec![
                tok(K::Class),
                tok(K::Identifier),
                opt(r("template_parameters")),
                opt(r("constraint")),
                opt(r("base_class_list")),
                alt(vec![r("aggregate_body"), tok(K::Semicolon)]),
            ]),
        ),
        (
            "interface_declaration",
            seq(vec![
                tok(K::Interface),
                tok(K::Identifier),
                opt(r("template_parameters")),
                opt(r("constraint")),
                opt(r("base_class_list")),
                alt(vec![r("aggregate_body"), tok(K::Semicolon)]),
            ]),
        ),
        (
            "base_class_list",
            seq(vec![tok(K::Colon), sep_by(r("type"), K::Comma)]),
        ),
        (
            "aggregate_body",
            seq(vec![tok(K::LeftBrace), star(r("decl_def")), tok(K::RightBrace)]),
        ),
        // ─── Templates ───────────────────────────────────────────────────
        (
            "template_declaration",
            seq(vec![
                tok(K::Template),
                tok(K::Identifier),
                r("template_parameters"),
                opt(r("constraint")),
                tok(K::LeftBrace),
                star(r("decl_def")),
                tok(K::RightBrace),
            ]),
        ),
        (
            "template_parameters",
            seq(vec![
                tok(K::LeftParen),
                opt(sep_by(r("template_parameter"), K::Comma)),
                tok(K::RightParen),
            ]),
        ),
        (
            "template_parameter",
            alt(vec![
                seq(vec![tok(K::This), tok(K::Identifier)]),
                seq(vec![
                    tok(K::Alias),
                    tok(K::Identifier),
                    opt(seq(vec![
                        tok(K::Colon),
                        alt(vec![r("type"), r("assign_expr")]),
                    ])),
                    opt(seq(vec![
                        tok(K::Assign),
                        alt(vec![r("type"), r("assign_expr")]),
                    ])),
                ]),
                seq(vec![tok(K::Identifier), tok(K::Ellipsis)]),
                seq(vec![
                    tok(K::Identifier),
                    opt(seq(vec![tok(K::Colon), r("type")])),
                    opt(seq(vec![tok(K::Assign), r("type")])),
                ]),
                // Value parameter: type then name.
                seq(vec![
                    r("type"),
                    tok(K::Identifier),
                    opt(seq(vec![tok(K::Colon), r("assign_expr")])),
                    opt(seq(vec![tok(K::Assign), r("assign_expr")])),
                ]),
            ]),
        ),
        (
            "constraint",
            seq(vec![
                tok(K::If),
                tok(K::LeftParen),
                r("expression"),
                tok(K::RightParen),
            ]),
        ),
        (
            "template_mixin_declaration",
            seq(vec![
                tok(K::Mixin),
                tok(K::Template),
                tok(K::Identifier),
                r("template_parameters"),
                opt(r("constraint")),
                tok(K::LeftBrace),
                star(r("decl_def")),
                tok(K::RightBrace),
            ]),
        ),
        (
            "template_mixin",
            seq(vec![
                tok(K::Mixin),
                r("qualified_identifier"),
                opt(tok(K::Identifier)),
                tok(K::Semicolon),
            ]),
        ),
        // ─── Conditional compilation ─────────────────────────────────────
        (
            "condition",
            alt(vec![
                seq(vec![
                    tok(K::Version),
                    tok(K::LeftParen),
                    alt(vec![
                        tok(K::IntLiteral),
                        tok(K::Identifier),
                        tok(K::Unittest),
                        tok(K::Assert),
                    ]),
                    tok(K::RightParen),
                ]),
                seq(vec![
                    tok(K::Debug),
                    opt(seq(vec![
                        tok(K::LeftParen),
                        alt(vec![tok(K::IntLiteral), tok(K::Identifier)]),
                        tok(K::RightParen),
                    ])),
                ]),
                seq(vec![
                    tok(K::Static),
                    tok(K::If),
                    tok(K::LeftParen),
                    r("assign_expr"),
                    tok(K::RightParen),
                ]),
            ]),
        ),
        (
            "conditional_declaration",
            seq(vec![
                r("condition"),
                alt(vec![
                    r("decl_block"),
                    seq(vec![tok(K::Colon), star(r("decl_def"))]),
                    r("decl_def"),
                ]),
                opt(seq(vec![
                    tok(K::Else),
                    alt(vec![r("decl_block"), r("decl_def")]),
                ])),
            ]),
        ),
        (
            "version_specification",
            seq(vec![
                tok(K::Version),
                tok(K::Assign),
                alt(vec![tok(K::IntLiteral), tok(K::Identifier)]),
                tok(K::Semicolon),
            ]),
        ),
        (
            "debug_specification",
            seq(vec![
                tok(K::Debug),
                tok(K::Assign),
                alt(vec![tok(K::IntLiteral), tok(K::Identifier)]),
                tok(K::Semicolon),
            ]),
        ),
        (
            "static_assert",
            seq(vec![
                tok(K::Static),
                tok(K::Assert),
                tok(K::LeftParen),
                r("assign_expr"),
                opt(seq(vec![tok(K::Comma), r("assign_expr")])),
                tok(K::RightParen),
                tok(K::Semicolon),
            ]),
        ),
        (
            "static_foreach_declaration",
            seq(vec![
                tok(K::Static),
                alt(vec![tok(K::Foreach), tok(K::ForeachReverse)]),
                tok(K::LeftParen),
                sep_by(r("foreach_type"), K::Comma),
                tok(K::Semicolon),
                r("expression"),
                opt(seq(vec![tok(K::DotDot), r("expression")])),
                tok(K::RightParen),
                alt(vec![
                    r("decl_block"),
                    r("decl_def"),
                ]),
            ]),
        ),
        // ─── Types ───────────────────────────────────────────────────────
        (
            "type",
            seq(vec![star(type_ctor()), r("basic_type"), star(r("type_suffix"))]),
        ),
        (
            "basic_type",
            alt(vec![
                builtin_type(),
                seq(vec![r("typeof_expression"), opt(seq(vec![tok(K::Dot), r("qualified_identifier")]))]),
                r("vector_type"),
                seq(vec![type_ctor(), tok(K::LeftParen), r("type"), tok(K::RightParen)]),
                seq(vec![tok(K::Dot), r("qualified_identifier")]),
                r("qualified_identifier"),
            ]),
        ),
        (
            "typeof_expression",
            seq(vec![
                tok(K::Typeof),
                tok(K::LeftParen),
                alt(vec![tok(K::Return), r("expression")]),
                tok(K::RightParen),
            ]),
        ),
        (
            "vector_type",
            seq(vec![
                tok(K::Vector),
                tok(K::LeftParen),
                r("type"),
                tok(K::RightParen),
            ]),
        ),
        (
            "qualified_identifier",
            sep_by(
                seq(vec![tok(K::Identifier), opt(r("template_suffix"))]),
                K::Dot,
            ),
        ),
        (
            "template_suffix",
            seq(vec![
                tok(K::Bang),
                alt(vec![
                    seq(vec![
                        tok(K::LeftParen),
                        opt(sep_by(
                            alt(vec![r("type"), r("assign_expr")]),
                            K::Comma,
                        )),
                        tok(K::RightParen),
                    ]),
                    // Lexically bound single argument: ident, literal, or
                    // basic type keyword. `foo!bar.baz` binds as
                    // (foo!bar).baz.
                    tok(K::Identifier),
                    builtin_type(),
                    tok(K::IntLiteral),
                    tok(K::FloatLiteral),
                    tok(K::CharLiteral),
                    string_literal(),
                    tok(K::This),
                ]),
            ]),
        ),
        (
            "type_suffix",
            alt(vec![
                tok(K::Star),
                seq(vec![
                    tok(K::LeftBracket),
                    opt(alt(vec![
                        seq(vec![
                            r("assign_expr"),
                            opt(seq(vec![tok(K::DotDot), r("assign_expr")])),
                        ]),
                        r("type"),
                    ])),
                    tok(K::RightBracket),
                ]),
                seq(vec![
                    alt(vec![tok(K::Delegate), tok(K::Function)]),
                    r("parameters"),
                    star(r("member_function_attribute")),
                ]),
            ]),
        ),
        // ─── Statements ──────────────────────────────────────────────────
        (
            "statement",
            alt(vec![
                tok(K::Semicolon),
                r("block_statement"),
                r("labeled_statement"),
                r("if_statement"),
                r("while_statement"),
                r("do_statement"),
                r("for_statement"),
                r("foreach_statement"),
                r("switch_statement"),
                r("case_statement"),
                r("default_statement"),
                r("continue_statement"),
                r("break_statement"),
                r("return_statement"),
                r("goto_statement"),
                r("with_statement"),
                r("synchronized_statement"),
                r("try_statement"),
                r("throw_statement"),
                r("scope_guard_statement"),
                r("asm_statement"),
                r("mixin_statement"),
                r("conditional_statement"),
                r("static_assert"),
                r("static_foreach_statement"),
                r("declaration_statement"),
                r("expression_statement"),
            ]),
        ),
        (
            "block_statement",
            seq(vec![tok(K::LeftBrace), star(r("statement")), tok(K::RightBrace)]),
        ),
        (
            "labeled_statement",
            seq(vec![tok(K::Identifier), tok(K::Colon), opt(r("statement"))]),
        ),
        ("expression_statement", seq(vec![r("expression"), tok(K::Semicolon)])),
        (
            "declaration_statement",
            alt(vec![
                r("var_declarations"),
                r("func_declaration"),
                r("alias_declaration"),
                r("enum_declaration"),
                r("struct_declaration"),
                r("class_declaration"),
                r("interface_declaration"),
                r("union_declaration"),
                r("template_mixin"),
                r("attribute_specifier"),
            ]),
        ),
        (
            "if_statement",
            seq(vec![
                tok(K::If),
                tok(K::LeftParen),
                r("if_condition"),
                tok(K::RightParen),
                r("statement"),
                // Greedy: else binds to the nearest unmatched if.
                opt(seq(vec![tok(K::Else), r("statement")])),
            ]),
        ),
        (
            "if_condition",
            alt(vec![
                seq(vec![
                    tok(K::Auto),
                    tok(K::Identifier),
                    tok(K::Assign),
                    r("expression"),
                ]),
                r("expression"),
            ]),
        ),
        (
            "while_statement",
            seq(vec![
                tok(K::While),
                tok(K::LeftParen),
                r("if_condition"),
                tok(K::RightParen),
                r("statement"),
            ]),
        ),
        (
            "do_statement",
            seq(vec![
                tok(K::Do),
                r("statement"),
                tok(K::While),
                tok(K::LeftParen),
                r("expression"),
                tok(K::RightParen),
                tok(K::Semicolon),
            ]),
        ),
        (
            "for_statement",
            seq(vec![
                tok(K::For),
                tok(K::LeftParen),
                r("statement"),
                opt(r("expression")),
                tok(K::Semicolon),
                opt(r("expression")),
                tok(K::RightParen),
                r("statement"),
            ]),
        ),
        (
            "foreach_statement",
            seq(vec![
                alt(vec![tok(K::Foreach), tok(K::ForeachReverse)]),
                tok(K::LeftParen),
                sep_by(r("foreach_type"), K::Comma),
                tok(K::Semicolon),
                r("expression"),
                opt(seq(vec![tok(K::DotDot), r("expression")])),
                tok(K::RightParen),
                r("statement"),
            ]),
        ),
        (
            "foreach_type",
            seq(vec![
                star(r("parameter_attribute")),
                alt(vec![
                    seq(vec![r("type"), tok(K::Identifier)]),
                    tok(K::Identifier),
                ]),
            ]),
        ),
        (
            "switch_statement",
            seq(vec![
                opt(tok(K::Final)),
                tok(K::Switch),
                tok(K::LeftParen),
                r("expression"),
                tok(K::RightParen),
                r("statement"),
            ]),
        ),
        (
            "case_statement",
            seq(vec![
                tok(K::Case),
                sep_by(r("assign_expr"), K::Comma),
                alt(vec![
                    seq(vec![
                        tok(K::Colon),
                        opt(seq(vec![
                            tok(K::DotDot),
                            tok(K::Case),
                            r("assign_expr"),
                            tok(K::Colon),
                        ])),
                    ]),
                ]),
                star(r("statement")),
            ]),
        ),
        (
            "default_statement",
            seq(vec![tok(K::Default), tok(K::Colon), star(r("statement"))]),
        ),
        (
            "continue_statement",
            seq(vec![
                tok(K::Continue),
                opt(tok(K::Identifier)),
                tok(K::Semicolon),
            ]),
        ),
        (
            "break_statement",
            seq(vec![tok(K::Break), opt(tok(K::Identifier)), tok(K::Semicolon)]),
        ),
        (
            "return_statement",
            seq(vec![tok(K::Return), opt(r("expression")), tok(K::Semicolon)]),
        ),
        (
            "goto_statement",
            seq(vec![
                tok(K::Goto),
                alt(vec![
                    tok(K::Default),
                    seq(vec![tok(K::Case), opt(r("expression"))]),
                    tok(K::Identifier),
                ]),
                tok(K::Semicolon),
            ]),
        ),
        (
            "with_statement",
            seq(vec![
                tok(K::With),
                tok(K::LeftParen),
                r("expression"),
                tok(K::RightParen),
                r("statement"),
            ]),
        ),
        (
            "synchronized_statement",
            seq(vec![
                tok(K::Synchronized),
                opt(seq(vec![
                    tok(K::LeftParen),
                    r("expression"),
                    tok(K::RightParen),
                ])),
                r("statement"),
            ]),
        ),
        (
            "try_statement",
            seq(vec![
                tok(K::Try),
                r("statement"),
                star(r("catch_clause")),
                opt(seq(vec![tok(K::Finally), r("statement")])),
            ]),
        ),
        (
            "catch_clause",
            seq(vec![
                tok(K::Catch),
                opt(seq(vec![
                    tok(K::LeftParen),
                    r("type"),
                    opt(tok(K::Identifier)),
                    tok(K::RightParen),
                ])),
                r("statement"),
            ]),
        ),
        (
            "throw_statement",
            seq(vec![tok(K::Throw), r("expression"), tok(K::Semicolon)]),
        ),
        (
            "scope_guard_statement",
            seq(vec![
                tok(K::Scope),
                tok(K::LeftParen),
                tok(K::Identifier),
                tok(K::RightParen),
                r("statement"),
            ]),
        ),
        (
            "asm_statement",
            seq(vec![
                tok(K::Asm),
                star(r("member_function_attribute")),
                tok(K::LeftBrace),
                star(r("asm_instruction")),
                tok(K::RightBrace),
            ]),
        ),
        // Opaque: instruction content is not parsed, only bracket-balanced
        // and split at semicolons.
        (
            "asm_instruction",
            seq(vec![
                star(alt(vec![
                    tok(K::Identifier),
                    tok(K::IntLiteral),
                    tok(K::FloatLiteral),
                    tok(K::Comma),
                    tok(K::LeftBracket),
                    tok(K::RightBracket),
                    tok(K::Plus),
                    tok(K::Minus),
                    tok(K::Star),
                    tok(K::Colon),
                    tok(K::Dollar),
                ])),
                tok(K::Semicolon),
            ]),
        ),
        (
            "mixin_statement",
            seq(vec![
                tok(K::Mixin),
                tok(K::LeftParen),
                sep_by(r("assign_expr"), K::Comma),
                tok(K::RightParen),
                tok(K::Semicolon),
            ]),
        ),
        (
            "conditional_statement",
            seq(vec![
                r("condition"),
                r("statement"),
                opt(seq(vec![tok(K::Else), r("statement")])),
            ]),
        ),
        (
            "static_foreach_statement",
            seq(vec![
                tok(K::Static),
                alt(vec![tok(K::Foreach), tok(K::ForeachReverse)]),
                tok(K::LeftParen),
                sep_by(r("foreach_type"), K::Comma),
                tok(K::Semicolon),
                r("expression"),
                opt(seq(vec![tok(K::DotDot), r("expression")])),
                tok(K::RightParen),
                r("statement"),
            ]),
        ),
        // ─── Expressions ─────────────────────────────────────────────────
        ("expression", sep_by(r("assign_expr"), K::Comma)),
        (
            "assign_expr",
            seq(vec![
                r("ternary_expr"),
                opt(seq(vec![r("assign_op"), r("assign_expr")])),
            ]),
        ),
        (
            "assign_op",
            alt(vec![
                tok(K::Assign),
                tok(K::PlusAssign),
                tok(K::MinusAssign),
                tok(K::StarAssign),
                tok(K::DivAssign),
                tok(K::PercentAssign),
                tok(K::AmpAssign),
                tok(K::PipeAssign),
                tok(K::CaretAssign),
                tok(K::TildeAssign),
                tok(K::ShlAssign),
                tok(K::ShrAssign),
                tok(K::UshrAssign),
                tok(K::PowAssign),
            ]),
        ),
        (
            "ternary_expr",
            seq(vec![
                r("oror_expr"),
                opt(seq(vec![
                    tok(K::Question),
                    r("expression"),
                    tok(K::Colon),
                    r("ternary_expr"),
                ])),
            ]),
        ),
        (
            "oror_expr",
            sep_by(r("andand_expr"), K::PipePipe),
        ),
        (
            "andand_expr",
            sep_by(r("or_expr"), K::AmpAmp),
        ),
        ("or_expr", sep_by(r("xor_expr"), K::Pipe)),
        ("xor_expr", sep_by(r("and_expr"), K::Caret)),
        ("and_expr", sep_by(r("cmp_expr"), K::Amp)),
        (
            "cmp_expr",
            seq(vec![
                r("shift_expr"),
                opt(seq(vec![r("cmp_op"), r("shift_expr")])),
            ]),
        ),
        (
            "cmp_op",
            alt(vec![
                tok(K::EqEq),
                tok(K::BangEq),
                tok(K::Less),
                tok(K::LessEq),
                tok(K::Greater),
                tok(K::GreaterEq),
                tok(K::Is),
                tok(K::In),
                seq(vec![tok(K::Bang), tok(K::Is)]),
                seq(vec![tok(K::Bang), tok(K::In)]),
            ]),
        ),
        (
            "shift_expr",
            seq(vec![
                r("add_expr"),
                star(seq(vec![
                    alt(vec![tok(K::Shl), tok(K::Shr), tok(K::Ushr)]),
                    r("add_expr"),
                ])),
            ]),
        ),
        (
            "add_expr",
            seq(vec![
                r("mul_expr"),
                star(seq(vec![
                    alt(vec![tok(K::Plus), tok(K::Minus), tok(K::Tilde)]),
                    r("mul_expr"),
                ])),
            ]),
        ),
        (
            "mul_expr",
            seq(vec![
                r("pow_expr"),
                star(seq(vec![
                    alt(vec![tok(K::Star), tok(K::Slash), tok(K::Percent)]),
                    r("pow_expr"),
                ])),
            ]),
        ),
        (
            "pow_expr",
            seq(vec![
                r("unary_expr"),
                opt(seq(vec![tok(K::Pow), r("pow_expr")])),
            ]),
        ),
        (
            "unary_expr",
            alt(vec![
                seq(vec![
                    alt(vec![
                        tok(K::Amp),
                        tok(K::PlusPlus),
                        tok(K::MinusMinus),
                        tok(K::Star),
                        tok(K::Minus),
                        tok(K::Plus),
                        tok(K::Bang),
                        tok(K::Tilde),
                    ]),
                    r("unary_expr"),
                ]),
                r("cast_expr"),
                r("new_expr"),
                r("delete_expr"),
                r("postfix_expr"),
            ]),
        ),
        (
            "cast_expr",
            seq(vec![
                tok(K::Cast),
                tok(K::LeftParen),
                opt(alt(vec![r("type"), plus(type_ctor())])),
                tok(K::RightParen),
                r("unary_expr"),
            ]),
        ),
        (
            "new_expr",
            seq(vec![
                tok(K::New),
                alt(vec![
                    seq(vec![
                        tok(K::Class),
                        opt(r("arguments")),
                        opt(sep_by(r("type"), K::Comma)),
                        r("aggregate_body"),
                    ]),
                    seq(vec![r("type"), opt(r("arguments"))]),
                ]),
            ]),
        ),
        ("delete_expr", seq(vec![tok(K::Delete), r("unary_expr")])),
        (
            "postfix_expr",
            seq(vec![r("primary_expr"), star(r("postfix"))]),
        ),
        (
            "postfix",
            alt(vec![
                seq(vec![
                    tok(K::Dot),
                    alt(vec![
                        seq(vec![tok(K::Identifier), opt(r("template_suffix"))]),
                        r("new_expr"),
                    ]),
                ]),
                tok(K::PlusPlus),
                tok(K::MinusMinus),
                r("arguments"),
                r("index_or_slice"),
            ]),
        ),
        (
            "arguments",
            seq(vec![
                tok(K::LeftParen),
                opt(sep_by(r("assign_expr"), K::Comma)),
                tok(K::RightParen),
            ]),
        ),
        (
            "index_or_slice",
            seq(vec![
                tok(K::LeftBracket),
                opt(seq(vec![
                    r("assign_expr"),
                    opt(alt(vec![
                        seq(vec![tok(K::DotDot), r("assign_expr")]),
                        plus(seq(vec![tok(K::Comma), r("assign_expr")])),
                    ])),
                ])),
                tok(K::RightBracket),
            ]),
        ),
        (
            "primary_expr",
            alt(vec![
                seq(vec![tok(K::Identifier), opt(r("template_suffix"))]),
                tok(K::IntLiteral),
                tok(K::FloatLiteral),
                tok(K::CharLiteral),
                plus(string_literal()),
                tok(K::This),
                tok(K::Super),
                tok(K::Null),
                tok(K::True),
                tok(K::False),
                tok(K::Dollar),
                tok(K::SpecialFile),
                tok(K::SpecialFileFullPath),
                tok(K::SpecialModule),
                tok(K::SpecialLine),
                tok(K::SpecialFunction),
                tok(K::SpecialPrettyFunction),
                r("array_literal"),
                r("function_literal"),
                r("assert_expression"),
                r("mixin_expression"),
                r("import_expression"),
                r("typeid_expression"),
                r("is_expression"),
                r("traits_expression"),
                seq(vec![
                    r("typeof_expression"),
                    opt(seq(vec![tok(K::Dot), r("qualified_identifier")])),
                ]),
                seq(vec![builtin_type(), tok(K::Dot), tok(K::Identifier)]),
                seq(vec![tok(K::Dot), r("qualified_identifier")]),
                seq(vec![tok(K::LeftParen), r("expression"), tok(K::RightParen)]),
            ]),
        ),
        (
            "array_literal",
            seq(vec![
                tok(K::LeftBracket),
                opt(sep_by(
                    seq(vec![
                        r("assign_expr"),
                        opt(seq(vec![tok(K::Colon), r("assign_expr")])),
                    ]),
                    K::Comma,
                )),
                tok(K::RightBracket),
            ]),
        ),
        (
            "function_literal",
            alt(vec![
                seq(vec![
                    alt(vec![tok(K::Function), tok(K::Delegate)]),
                    opt(r("type")),
                    opt(r("parameters")),
                    star(r("member_function_attribute")),
                    r("block_statement"),
                ]),
                seq(vec![
                    r("parameters"),
                    star(r("member_function_attribute")),
                    alt(vec![
                        r("block_statement"),
                        seq(vec![tok(K::FatArrow), r("assign_expr")]),
                    ]),
                ]),
                seq(vec![tok(K::Identifier), tok(K::FatArrow), r("assign_expr")]),
            ]),
        ),
        (
            "assert_expression",
            seq(vec![
                tok(K::Assert),
                tok(K::LeftParen),
                r("assign_expr"),
                opt(seq(vec![tok(K::Comma), r("assign_expr")])),
                tok(K::RightParen),
            ]),
        ),
        (
            "mixin_expression",
            seq(vec![
                tok(K::Mixin),
                tok(K::LeftParen),
                sep_by(r("assign_expr"), K::Comma),
                tok(K::RightParen),
            ]),
        ),
        (
            "import_expression",
            seq(vec![
                tok(K::Import),
                tok(K::LeftParen),
                r("assign_expr"),
                tok(K::RightParen),
            ]),
        ),
        (
            "typeid_expression",
            seq(vec![
                tok(K::Typeid),
                tok(K::LeftParen),
                alt(vec![r("type"), r("expression")]),
                tok(K::RightParen),
            ]),
        ),
        (
            "is_expression",
            seq(vec![
                tok(K::Is),
                tok(K::LeftParen),
                r("type"),
                opt(tok(K::Identifier)),
                opt(seq(vec![
                    alt(vec![tok(K::Colon), tok(K::EqEq)]),
                    r("type_specialization"),
                ])),
                star(seq(vec![tok(K::Comma), r("template_parameter")])),
                tok(K::RightParen),
            ]),
        ),
        (
            "type_specialization",
            alt(vec![
                r("type"),
                tok(K::Struct),
                tok(K::Union),
                tok(K::Class),
                tok(K::Interface),
                tok(K::Enum),
                tok(K::Function),
                tok(K::Delegate),
                tok(K::Super),
                tok(K::Return),
                tok(K::Parameters),
                tok(K::Module),
                tok(K::Package),
                type_ctor(),
            ]),
        ),
        (
            "traits_expression",
            seq(vec![
                tok(K::Traits),
                tok(K::LeftParen),
                tok(K::Identifier),
                star(seq(vec![
                    tok(K::Comma),
                    alt(vec![r("type"), r("assign_expr")]),
                ])),
                tok(K::RightParen),
            ]),
        ),
    ];

    Grammar::build(defs, "source_file")
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;
    use crate::recovery;

    #[test]
    fn table_validates() {
        let g = d_grammar().expect("the D rule table must bind cleanly");
        assert!(g.rule_count() > 90);
        assert_eq!(g.name(g.start()), "source_file");
    }

    #[test]
    fn source_file_is_nullable() {
        // An empty file is a valid source file.
        let g = d_grammar().unwrap();
        assert!(g.nullable(g.start()));
    }

    #[test]
    fn expression_first_set_matches_parser_dispatch() {
        // The handwritten parser dispatches on EXPR_START; the table's
        // FIRST(assign_expr) must agree on every token the parser accepts.
        let g = d_grammar().unwrap();
        let first = g.first(g.id("assign_expr").unwrap());
        for kind in [
            K::Identifier,
            K::IntLiteral,
            K::DqStringLiteral,
            K::TokenStringLiteral,
            K::This,
            K::Super,
            K::Null,
            K::Cast,
            K::New,
            K::Delete,
            K::Assert,
            K::Mixin,
            K::Typeid,
            K::Is,
            K::Traits,
            K::Typeof,
            K::Bang,
            K::Minus,
            K::Tilde,
            K::Amp,
            K::LeftParen,
            K::LeftBracket,
            K::Dollar,
            K::SpecialLine,
        ] {
            assert!(first.contains(kind), "FIRST(assign_expr) must hold {kind:?}");
            assert!(
                recovery::EXPR_START.contains(kind),
                "parser dispatch must hold {kind:?}"
            );
        }
    }

    #[test]
    fn statement_first_covers_declarations() {
        let g = d_grammar().unwrap();
        let first = g.first(g.id("statement").unwrap());
        for kind in [
            K::If,
            K::While,
            K::Foreach,
            K::ForeachReverse,
            K::Switch,
            K::Return,
            K::Scope,
            K::Asm,
            K::LeftBrace,
            K::Semicolon,
            K::Int,
            K::Auto,
            K::Static,
        ] {
            assert!(first.contains(kind), "FIRST(statement) must hold {kind:?}");
            assert!(recovery::STMT_START.contains(kind));
        }
    }

    #[test]
    fn type_first_matches_decl_dispatch() {
        let g = d_grammar().unwrap();
        let first = g.first(g.id("type").unwrap());
        for kind in [K::Int, K::Void, K::Const, K::Typeof, K::Identifier, K::Vector] {
            assert!(first.contains(kind), "FIRST(type) must hold {kind:?}");
        }
    }
}
