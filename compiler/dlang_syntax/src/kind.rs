//! Nonterminal node kinds of the syntax tree.

use std::fmt;

/// Kind of an interior (green) node.
///
/// One variant per grammar production that materializes a node. `Error`
/// wraps token runs the parser could not fit into any production; it may
/// appear anywhere a node may.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum SyntaxKind {
    // ─── Top level ───────────────────────────────────────────────────────
    SourceFile,
    ModuleDeclaration,
    ModuleAttribute,
    ModuleFullyQualifiedName,
    ImportDeclaration,
    ImportList,
    Import,
    ImportBindings,
    ImportBind,
    ImportAlias,

    // ─── Attributes & storage classes ────────────────────────────────────
    AttributeSpecifier,
    Attribute,
    AtAttribute,
    AlignAttribute,
    DeprecatedAttribute,
    PragmaAttribute,
    LinkageAttribute,
    VisibilityAttribute,
    StorageClass,
    DeclarationBlock,

    // ─── Declarations ────────────────────────────────────────────────────
    VarDeclarations,
    Declarator,
    DeclaratorInitializer,
    Initializer,
    ArrayInitializer,
    ArrayMemberInitialization,
    StructInitializer,
    StructMemberInitializer,
    AutoDeclaration,
    AliasDeclaration,
    AliasInitializer,
    AliasThisDeclaration,
    FunctionDeclaration,
    FunctionBody,
    FunctionContract,
    InContract,
    OutContract,
    MissingFunctionBody,
    Parameters,
    Parameter,
    ParameterAttribute,
    VariadicParameter,
    MemberFunctionAttribute,
    Constructor,
    Destructor,
    Postblit,
    StaticConstructor,
    StaticDestructor,
    SharedStaticConstructor,
    SharedStaticDestructor,
    Invariant,
    UnittestBlock,
    MixinDeclaration,
    EnumDeclaration,
    EnumBody,
    EnumMember,
    AnonymousEnumDeclaration,

    // ─── Aggregates ──────────────────────────────────────────────────────
    StructDeclaration,
    UnionDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    BaseClassList,
    BaseClass,
    AggregateBody,
    AnonymousStructOrUnion,

    // ─── Templates ───────────────────────────────────────────────────────
    TemplateDeclaration,
    TemplateParameters,
    TemplateTypeParameter,
    TemplateValueParameter,
    TemplateAliasParameter,
    TemplateTupleParameter,
    TemplateThisParameter,
    Constraint,
    TemplateInstance,
    TemplateArguments,
    TemplateSingleArgument,
    TemplateMixinDeclaration,
    TemplateMixin,

    // ─── Conditional compilation ─────────────────────────────────────────
    VersionCondition,
    VersionSpecification,
    DebugCondition,
    DebugSpecification,
    StaticIfCondition,
    ConditionalDeclaration,
    ConditionalStatement,
    StaticAssert,
    StaticForeachDeclaration,
    StaticForeachStatement,

    // ─── Types ───────────────────────────────────────────────────────────
    Type,
    BasicType,
    TypeCtor,
    TypeSuffix,
    TypeofExpression,
    VectorType,
    QualifiedIdentifier,
    FunctionLiteralType,
    TypeIdentifierPart,

    // ─── Statements ──────────────────────────────────────────────────────
    BlockStatement,
    ExpressionStatement,
    DeclarationStatement,
    EmptyStatement,
    LabeledStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForeachStatement,
    ForeachType,
    SwitchStatement,
    CaseStatement,
    CaseRangeStatement,
    DefaultStatement,
    ContinueStatement,
    BreakStatement,
    ReturnStatement,
    GotoStatement,
    WithStatement,
    SynchronizedStatement,
    TryStatement,
    Catch,
    Finally,
    ThrowStatement,
    ScopeGuardStatement,
    AsmStatement,
    AsmInstruction,
    PragmaStatement,
    MixinStatement,

    // ─── Expressions ─────────────────────────────────────────────────────
    CommaExpression,
    AssignExpression,
    TernaryExpression,
    BinaryExpression,
    IsExpression,
    InExpression,
    PrefixExpression,
    CastExpression,
    PostfixExpression,
    IndexExpression,
    SliceExpression,
    CallExpression,
    ArgumentList,
    FieldExpression,
    NewExpression,
    NewAnonClassExpression,
    DeleteExpression,
    AssertExpression,
    MixinExpression,
    ImportExpression,
    TypeidExpression,
    TraitsExpression,
    FunctionLiteral,
    LambdaExpression,
    ParenExpression,
    ArrayLiteral,
    AssocArrayLiteral,
    KeyValuePair,
    StringLiteralExpression,
    IdentifierExpression,
    LiteralExpression,
    SpecialKeywordExpression,
    DollarExpression,

    // ─── Error ───────────────────────────────────────────────────────────
    /// Contains the tokens the parser could not place. Its children are
    /// real tokens so the tree still round-trips to the source.
    Error,
}

impl SyntaxKind {
    pub const COUNT: usize = SyntaxKind::Error as usize + 1;

    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self, SyntaxKind::Error)
    }

    /// Kinds that may directly contain declarations, which is what makes
    /// them candidates for incremental reuse and reparse anchoring.
    #[inline]
    pub const fn is_declaration_scope(self) -> bool {
        matches!(
            self,
            SyntaxKind::SourceFile
                | SyntaxKind::AggregateBody
                | SyntaxKind::EnumBody
                | SyntaxKind::DeclarationBlock
                | SyntaxKind::BlockStatement
        )
    }

    /// Kinds produced by the expression cascade.
    #[inline]
    pub const fn is_expression(self) -> bool {
        (self as u8) >= (SyntaxKind::CommaExpression as u8)
            && (self as u8) <= (SyntaxKind::DollarExpression as u8)
    }

    /// Kinds produced by statement rules.
    #[inline]
    pub const fn is_statement(self) -> bool {
        (self as u8) >= (SyntaxKind::BlockStatement as u8)
            && (self as u8) <= (SyntaxKind::MixinStatement as u8)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_ranges() {
        assert!(SyntaxKind::BinaryExpression.is_expression());
        assert!(SyntaxKind::DollarExpression.is_expression());
        assert!(!SyntaxKind::IfStatement.is_expression());
        assert!(SyntaxKind::IfStatement.is_statement());
        assert!(SyntaxKind::MixinStatement.is_statement());
        assert!(!SyntaxKind::CommaExpression.is_statement());
        assert!(SyntaxKind::Error.is_error());
    }

    #[test]
    fn declaration_scopes() {
        assert!(SyntaxKind::SourceFile.is_declaration_scope());
        assert!(SyntaxKind::AggregateBody.is_declaration_scope());
        assert!(!SyntaxKind::IfStatement.is_declaration_scope());
    }
}
