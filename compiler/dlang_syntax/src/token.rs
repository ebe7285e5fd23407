//! Terminal token kinds for D.
//!
//! `TokenKind` is fieldless: a token's text is always recoverable from its
//! span, so the kind carries classification only. Keywords are distinct
//! kinds — the lexer's cooking layer resolves them from identifiers, which
//! is what makes keyword lookup dominate the generic identifier rule.

use crate::Span;
use std::fmt;

/// A token with its span in the source. Immutable once produced; tokens
/// tile the source exactly (trivia included).
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            span,
            flags: TokenFlags::empty(),
        }
    }

    #[inline]
    pub fn with_flags(kind: TokenKind, span: Span, flags: TokenFlags) -> Self {
        Token { kind, span, flags }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Per-token flag bits.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct TokenFlags(u8);

impl TokenFlags {
    /// Token carries at least one lexical error (bad escape, bad digit
    /// separator placement, invalid hex-string content).
    pub const LEX_ERROR: TokenFlags = TokenFlags(1);

    #[inline]
    pub const fn empty() -> Self {
        TokenFlags(0)
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        TokenFlags(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl fmt::Debug for TokenFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(TokenFlags::LEX_ERROR) {
            write!(f, "LEX_ERROR")
        } else {
            write!(f, "-")
        }
    }
}

/// Token kinds for D: identifier, literals, ~100 keywords, ~60 operators,
/// trivia, and error/control kinds.
///
/// Variant order is load-bearing: the ranges behind `is_keyword`,
/// `is_trivia`, and friends rely on it, and `discriminant_index` feeds the
/// parser's 256-bit token sets.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum TokenKind {
    // ─── Identifier & literals ───────────────────────────────────────────
    Identifier,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    DqStringLiteral,
    WysiwygStringLiteral,
    BacktickStringLiteral,
    HexStringLiteral,
    DelimitedStringLiteral,
    TokenStringLiteral,

    // ─── Keywords (alphabetical; range checked by is_keyword) ────────────
    Abstract,
    Alias,
    Align,
    Asm,
    Assert,
    Auto,
    Body,
    Bool,
    Break,
    Byte,
    Case,
    Cast,
    Catch,
    Cdouble,
    Cent,
    Cfloat,
    Char,
    Class,
    Const,
    Continue,
    Creal,
    Dchar,
    Debug,
    Default,
    Delegate,
    Delete,
    Deprecated,
    Do,
    Double,
    Else,
    Enum,
    Export,
    Extern,
    False,
    Final,
    Finally,
    Float,
    For,
    Foreach,
    ForeachReverse,
    Function,
    Goto,
    Idouble,
    If,
    Ifloat,
    Immutable,
    Import,
    In,
    Inout,
    Int,
    Interface,
    Invariant,
    Ireal,
    Is,
    Lazy,
    Long,
    Macro,
    Mixin,
    Module,
    New,
    Nothrow,
    Null,
    Out,
    Override,
    Package,
    Pragma,
    Private,
    Protected,
    Public,
    Pure,
    Real,
    Ref,
    Return,
    Scope,
    Shared,
    Short,
    Static,
    Struct,
    Super,
    Switch,
    Synchronized,
    Template,
    This,
    Throw,
    True,
    Try,
    Typeid,
    Typeof,
    Ubyte,
    Ucent,
    Uint,
    Ulong,
    Union,
    Unittest,
    Ushort,
    Version,
    Void,
    Wchar,
    While,
    With,
    /// `__FILE__`
    SpecialFile,
    /// `__FILE_FULL_PATH__`
    SpecialFileFullPath,
    /// `__MODULE__`
    SpecialModule,
    /// `__LINE__`
    SpecialLine,
    /// `__FUNCTION__`
    SpecialFunction,
    /// `__PRETTY_FUNCTION__`
    SpecialPrettyFunction,
    /// `__gshared`
    Gshared,
    /// `__traits`
    Traits,
    /// `__vector`
    Vector,
    /// `__parameters`
    Parameters,

    // ─── Operators & delimiters ──────────────────────────────────────────
    Slash,         // /
    DivAssign,     // /=
    Dot,           // .
    DotDot,        // ..
    Ellipsis,      // ...
    Amp,           // &
    AmpAssign,     // &=
    AmpAmp,        // &&
    Pipe,          // |
    PipeAssign,    // |=
    PipePipe,      // ||
    Minus,         // -
    MinusAssign,   // -=
    MinusMinus,    // --
    Plus,          // +
    PlusAssign,    // +=
    PlusPlus,      // ++
    Less,          // <
    LessEq,        // <=
    Shl,           // <<
    ShlAssign,     // <<=
    Greater,       // >
    GreaterEq,     // >=
    Shr,           // >>
    ShrAssign,     // >>=
    Ushr,          // >>>
    UshrAssign,    // >>>=
    Bang,          // !
    BangEq,        // !=
    LeftParen,     // (
    RightParen,    // )
    LeftBracket,   // [
    RightBracket,  // ]
    LeftBrace,     // {
    RightBrace,    // }
    Question,      // ?
    Comma,         // ,
    Semicolon,     // ;
    Colon,         // :
    Dollar,        // $
    Assign,        // =
    EqEq,          // ==
    FatArrow,      // =>
    Star,          // *
    StarAssign,    // *=
    Percent,       // %
    PercentAssign, // %=
    Caret,         // ^
    CaretAssign,   // ^=
    Pow,           // ^^
    PowAssign,     // ^^=
    Tilde,         // ~
    TildeAssign,   // ~=
    At,            // @

    // ─── Trivia ──────────────────────────────────────────────────────────
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
    NestingBlockComment,
    LineDirective,
    Shebang,
    Bom,

    // ─── Error & control ─────────────────────────────────────────────────
    /// Lexically broken token (invalid byte, unterminated literal, bare
    /// `#`). The corresponding `LexError` record carries the detail.
    ErrorToken,
    Eof,
}

impl TokenKind {
    /// Number of token kinds. Relies on `Eof` being the last variant.
    pub const COUNT: usize = TokenKind::Eof as usize + 1;

    /// Index for bitset membership in the parser's token sets.
    #[inline]
    pub const fn discriminant_index(self) -> usize {
        self as usize
    }

    /// Trivia: whitespace, comments, `#line`, shebang, BOM. Preserved in
    /// the token stream and the tree, invisible to grammar matching.
    #[inline]
    pub const fn is_trivia(self) -> bool {
        (self as u8) >= (TokenKind::Whitespace as u8) && (self as u8) <= (TokenKind::Bom as u8)
    }

    /// Any keyword, including the `__`-specials.
    #[inline]
    pub const fn is_keyword(self) -> bool {
        (self as u8) >= (TokenKind::Abstract as u8)
            && (self as u8) <= (TokenKind::Parameters as u8)
    }

    /// Any of the six string literal forms.
    #[inline]
    pub const fn is_string_literal(self) -> bool {
        (self as u8) >= (TokenKind::DqStringLiteral as u8)
            && (self as u8) <= (TokenKind::TokenStringLiteral as u8)
    }

    /// Any literal (numeric, char, string).
    #[inline]
    pub const fn is_literal(self) -> bool {
        (self as u8) >= (TokenKind::IntLiteral as u8)
            && (self as u8) <= (TokenKind::TokenStringLiteral as u8)
    }

    /// Built-in scalar type keywords (`int`, `void`, `dchar`, ...), which
    /// can begin a `BasicType`.
    #[inline]
    pub const fn is_basic_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Bool
                | TokenKind::Byte
                | TokenKind::Ubyte
                | TokenKind::Short
                | TokenKind::Ushort
                | TokenKind::Int
                | TokenKind::Uint
                | TokenKind::Long
                | TokenKind::Ulong
                | TokenKind::Cent
                | TokenKind::Ucent
                | TokenKind::Char
                | TokenKind::Wchar
                | TokenKind::Dchar
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Real
                | TokenKind::Ifloat
                | TokenKind::Idouble
                | TokenKind::Ireal
                | TokenKind::Cfloat
                | TokenKind::Cdouble
                | TokenKind::Creal
                | TokenKind::Void
        )
    }

    /// Type constructor keywords: `const`, `immutable`, `shared`, `inout`.
    #[inline]
    pub const fn is_type_ctor(self) -> bool {
        matches!(
            self,
            TokenKind::Const | TokenKind::Immutable | TokenKind::Shared | TokenKind::Inout
        )
    }

    /// Assignment operators (right-associative level of the cascade).
    #[inline]
    pub const fn is_assign_op(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::DivAssign
                | TokenKind::PercentAssign
                | TokenKind::AmpAssign
                | TokenKind::PipeAssign
                | TokenKind::CaretAssign
                | TokenKind::TildeAssign
                | TokenKind::ShlAssign
                | TokenKind::ShrAssign
                | TokenKind::UshrAssign
                | TokenKind::PowAssign
        )
    }

    /// Fixed source text for kinds whose lexeme never varies.
    pub const fn lexeme(self) -> Option<&'static str> {
        match self {
            TokenKind::Abstract => Some("abstract"),
            TokenKind::Alias => Some("alias"),
            TokenKind::Align => Some("align"),
            TokenKind::Asm => Some("asm"),
            TokenKind::Assert => Some("assert"),
            TokenKind::Auto => Some("auto"),
            TokenKind::Body => Some("body"),
            TokenKind::Bool => Some("bool"),
            TokenKind::Break => Some("break"),
            TokenKind::Byte => Some("byte"),
            TokenKind::Case => Some("case"),
            TokenKind::Cast => Some("cast"),
            TokenKind::Catch => Some("catch"),
            TokenKind::Cdouble => Some("cdouble"),
            TokenKind::Cent => Some("cent"),
            TokenKind::Cfloat => Some("cfloat"),
            TokenKind::Char => Some("char"),
            TokenKind::Class => Some("class"),
            TokenKind::Const => Some("const"),
            TokenKind::Continue => Some("continue"),
            TokenKind::Creal => Some("creal"),
            TokenKind::Dchar => Some("dchar"),
            TokenKind::Debug => Some("debug"),
            TokenKind::Default => Some("default"),
            TokenKind::Delegate => Some("delegate"),
            TokenKind::Delete => Some("delete"),
            TokenKind::Deprecated => Some("deprecated"),
            TokenKind::Do => Some("do"),
            TokenKind::Double => Some("double"),
            TokenKind::Else => Some("else"),
            TokenKind::Enum => Some("enum"),
            TokenKind::Export => Some("export"),
            TokenKind::Extern => Some("extern"),
            TokenKind::False => Some("false"),
            TokenKind::Final => Some("final"),
            TokenKind::Finally => Some("finally"),
            TokenKind::Float => Some("float"),
            TokenKind::For => Some("for"),
            TokenKind::Foreach => Some("foreach"),
            TokenKind::ForeachReverse => Some("foreach_reverse"),
            TokenKind::Function => Some("function"),
            TokenKind::Goto => Some("goto"),
            TokenKind::Idouble => Some("idouble"),
            TokenKind::If => Some("if"),
            TokenKind::Ifloat => Some("ifloat"),
            TokenKind::Immutable => Some("immutable"),
            TokenKind::Import => Some("import"),
            TokenKind::In => Some("in"),
            TokenKind::Inout => Some("inout"),
            TokenKind::Int => Some("int"),
            TokenKind::Interface => Some("interface"),
            TokenKind::Invariant => Some("invariant"),
            TokenKind::Ireal => Some("ireal"),
            TokenKind::Is => Some("is"),
            TokenKind::Lazy => Some("lazy"),
            TokenKind::Long => Some("long"),
            TokenKind::Macro => Some("macro"),
            TokenKind::Mixin => Some("mixin"),
            TokenKind::Module => Some("module"),
            TokenKind::New => Some("new"),
            TokenKind::Nothrow => Some("nothrow"),
            TokenKind::Null => Some("null"),
            TokenKind::Out => Some("out"),
            TokenKind::Override => Some("override"),
            TokenKind::Package => Some("package"),
            TokenKind::Pragma => Some("pragma"),
            TokenKind::Private => Some("private"),
            TokenKind::Protected => Some("protected"),
            TokenKind::Public => Some("public"),
            TokenKind::Pure => Some("pure"),
            TokenKind::Real => Some("real"),
            TokenKind::Ref => Some("ref"),
            TokenKind::Return => Some("return"),
            TokenKind::Scope => Some("scope"),
            TokenKind::Shared => Some("shared"),
            TokenKind::Short => Some("short"),
            TokenKind::Static => Some("static"),
            TokenKind::Struct => Some("struct"),
            TokenKind::Super => Some("super"),
            TokenKind::Switch => Some("switch"),
            TokenKind::Synchronized => Some("synchronized"),
            TokenKind::Template => Some("template"),
            TokenKind::This => Some("this"),
            TokenKind::Throw => Some("throw"),
            TokenKind::True => Some("true"),
            TokenKind::Try => Some("try"),
            TokenKind::Typeid => Some("typeid"),
            TokenKind::Typeof => Some("typeof"),
            TokenKind::Ubyte => Some("ubyte"),
            TokenKind::Ucent => Some("ucent"),
            TokenKind::Uint => Some("uint"),
            TokenKind::Ulong => Some("ulong"),
            TokenKind::Union => Some("union"),
            TokenKind::Unittest => Some("unittest"),
            TokenKind::Ushort => Some("ushort"),
            TokenKind::Version => Some("version"),
            TokenKind::Void => Some("void"),
            TokenKind::Wchar => Some("wchar"),
            TokenKind::While => Some("while"),
            TokenKind::With => Some("with"),
            TokenKind::SpecialFile => Some("__FILE__"),
            TokenKind::SpecialFileFullPath => Some("__FILE_FULL_PATH__"),
            TokenKind::SpecialModule => Some("__MODULE__"),
            TokenKind::SpecialLine => Some("__LINE__"),
            TokenKind::SpecialFunction => Some("__FUNCTION__"),
            TokenKind::SpecialPrettyFunction => Some("__PRETTY_FUNCTION__"),
            TokenKind::Gshared => Some("__gshared"),
            TokenKind::Traits => Some("__traits"),
            TokenKind::Vector => Some("__vector"),
            TokenKind::Parameters => Some("__parameters"),
            TokenKind::Slash => Some("/"),
            TokenKind::DivAssign => Some("/="),
            TokenKind::Dot => Some("."),
            TokenKind::DotDot => Some(".."),
            TokenKind::Ellipsis => Some("..."),
            TokenKind::Amp => Some("&"),
            TokenKind::AmpAssign => Some("&="),
            TokenKind::AmpAmp => Some("&&"),
            TokenKind::Pipe => Some("|"),
            TokenKind::PipeAssign => Some("|="),
            TokenKind::PipePipe => Some("||"),
            TokenKind::Minus => Some("-"),
            TokenKind::MinusAssign => Some("-="),
            TokenKind::MinusMinus => Some("--"),
            TokenKind::Plus => Some("+"),
            TokenKind::PlusAssign => Some("+="),
            TokenKind::PlusPlus => Some("++"),
            TokenKind::Less => Some("<"),
            TokenKind::LessEq => Some("<="),
            TokenKind::Shl => Some("<<"),
            TokenKind::ShlAssign => Some("<<="),
            TokenKind::Greater => Some(">"),
            TokenKind::GreaterEq => Some(">="),
            TokenKind::Shr => Some(">>"),
            TokenKind::ShrAssign => Some(">>="),
            TokenKind::Ushr => Some(">>>"),
            TokenKind::UshrAssign => Some(">>>="),
            TokenKind::Bang => Some("!"),
            TokenKind::BangEq => Some("!="),
            TokenKind::LeftParen => Some("("),
            TokenKind::RightParen => Some(")"),
            TokenKind::LeftBracket => Some("["),
            TokenKind::RightBracket => Some("]"),
            TokenKind::LeftBrace => Some("{"),
            TokenKind::RightBrace => Some("}"),
            TokenKind::Question => Some("?"),
            TokenKind::Comma => Some(","),
            TokenKind::Semicolon => Some(";"),
            TokenKind::Colon => Some(":"),
            TokenKind::Dollar => Some("$"),
            TokenKind::Assign => Some("="),
            TokenKind::EqEq => Some("=="),
            TokenKind::FatArrow => Some("=>"),
            TokenKind::Star => Some("*"),
            TokenKind::StarAssign => Some("*="),
            TokenKind::Percent => Some("%"),
            TokenKind::PercentAssign => Some("%="),
            TokenKind::Caret => Some("^"),
            TokenKind::CaretAssign => Some("^="),
            TokenKind::Pow => Some("^^"),
            TokenKind::PowAssign => Some("^^="),
            TokenKind::Tilde => Some("~"),
            TokenKind::TildeAssign => Some("~="),
            TokenKind::At => Some("@"),
            _ => None,
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(self) -> &'static str {
        if let Some(lexeme) = self.lexeme() {
            return lexeme;
        }
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::CharLiteral => "character literal",
            TokenKind::DqStringLiteral
            | TokenKind::WysiwygStringLiteral
            | TokenKind::BacktickStringLiteral
            | TokenKind::HexStringLiteral
            | TokenKind::DelimitedStringLiteral
            | TokenKind::TokenStringLiteral => "string literal",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::LineComment
            | TokenKind::BlockComment
            | TokenKind::NestingBlockComment => "comment",
            TokenKind::LineDirective => "#line directive",
            TokenKind::Shebang => "shebang",
            TokenKind::Bom => "byte order mark",
            TokenKind::ErrorToken => "invalid token",
            TokenKind::Eof => "end of file",
            _ => "token",
        }
    }
}

// The parser's token sets are 256-bit; every discriminant must fit.
const _: () = assert!(TokenKind::COUNT <= 256);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_fits_bitset() {
        assert!(TokenKind::COUNT <= 256);
        assert_eq!(TokenKind::Eof.discriminant_index(), TokenKind::COUNT - 1);
    }

    #[test]
    fn keyword_range() {
        assert!(TokenKind::Abstract.is_keyword());
        assert!(TokenKind::With.is_keyword());
        assert!(TokenKind::Parameters.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::Slash.is_keyword());
    }

    #[test]
    fn trivia_range() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Bom.is_trivia());
        assert!(!TokenKind::ErrorToken.is_trivia());
        assert!(!TokenKind::At.is_trivia());
    }

    #[test]
    fn literal_ranges() {
        assert!(TokenKind::TokenStringLiteral.is_string_literal());
        assert!(TokenKind::IntLiteral.is_literal());
        assert!(!TokenKind::IntLiteral.is_string_literal());
        assert!(!TokenKind::Identifier.is_literal());
    }

    #[test]
    fn keyword_lexemes_match_names() {
        assert_eq!(TokenKind::ForeachReverse.lexeme(), Some("foreach_reverse"));
        assert_eq!(TokenKind::Gshared.lexeme(), Some("__gshared"));
        assert_eq!(TokenKind::UshrAssign.lexeme(), Some(">>>="));
        assert_eq!(TokenKind::Identifier.lexeme(), None);
    }

    #[test]
    fn flags() {
        let f = TokenFlags::empty().union(TokenFlags::LEX_ERROR);
        assert!(f.contains(TokenFlags::LEX_ERROR));
        assert!(!TokenFlags::empty().contains(TokenFlags::LEX_ERROR));
    }
}
