//! Raw token tags produced by the scanner.
//!
//! Tags are one byte, grouped into semantic ranges so the cooking layer can
//! classify a tag with a range check instead of a match over every variant.
//! Keywords are not distinguished here — every word lexes as `Ident` and the
//! cooking layer resolves keywords (exact-match lookup dominates the generic
//! identifier rule).

/// Raw token tag. One byte, grouped by semantic range:
///
/// - `0..=15`: identifiers and literals
/// - `16..=23`: string literal forms
/// - `32..=95`: operators and delimiters
/// - `112..=127`: trivia (whitespace, comments, directives)
/// - `240..=254`: error tokens
/// - `255`: EOF
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RawTag {
    // ─── Identifiers & numeric/char literals: 0-15 ───────────────────────
    Ident = 0,
    DecInt = 1,
    BinInt = 2,
    HexInt = 3,
    Float = 4,
    HexFloat = 5,
    Char = 6,

    // ─── String literal forms: 16-23 ─────────────────────────────────────
    /// `"..."` with escape sequences.
    DqString = 16,
    /// `r"..."` — no escapes.
    WysiwygString = 17,
    /// `` `...` `` — alternate wysiwyg form.
    BacktickString = 18,
    /// `x"AB CD"` — hex pairs, whitespace tolerated.
    HexString = 19,
    /// `q"(...)"` / `q"ident ... ident"` — delimited form.
    DelimitedString = 20,
    /// `q{...}` — token string; body re-lexed with the full token grammar.
    TokenString = 21,

    // ─── Operators & delimiters: 32-95 ───────────────────────────────────
    Slash = 32,         // /
    DivAssign = 33,     // /=
    Dot = 34,           // .
    DotDot = 35,        // ..
    Ellipsis = 36,      // ...
    Amp = 37,           // &
    AmpAssign = 38,     // &=
    AmpAmp = 39,        // &&
    Pipe = 40,          // |
    PipeAssign = 41,    // |=
    PipePipe = 42,      // ||
    Minus = 43,         // -
    MinusAssign = 44,   // -=
    MinusMinus = 45,    // --
    Plus = 46,          // +
    PlusAssign = 47,    // +=
    PlusPlus = 48,      // ++
    Less = 49,          // <
    LessEq = 50,        // <=
    Shl = 51,           // <<
    ShlAssign = 52,     // <<=
    Greater = 53,       // >
    GreaterEq = 54,     // >=
    Shr = 55,           // >>
    ShrAssign = 56,     // >>=
    Ushr = 57,          // >>>
    UshrAssign = 58,    // >>>=
    Bang = 59,          // !
    BangEq = 60,        // !=
    LeftParen = 61,     // (
    RightParen = 62,    // )
    LeftBracket = 63,   // [
    RightBracket = 64,  // ]
    LeftBrace = 65,     // {
    RightBrace = 66,    // }
    Question = 67,      // ?
    Comma = 68,         // ,
    Semicolon = 69,     // ;
    Colon = 70,         // :
    Dollar = 71,        // $
    Assign = 72,        // =
    EqEq = 73,          // ==
    FatArrow = 74,      // =>
    Star = 75,          // *
    StarAssign = 76,    // *=
    Percent = 77,       // %
    PercentAssign = 78, // %=
    Caret = 79,         // ^
    CaretAssign = 80,   // ^=
    Pow = 81,           // ^^
    PowAssign = 82,     // ^^=
    Tilde = 83,         // ~
    TildeAssign = 84,   // ~=
    At = 85,            // @
    /// Bare `#` outside a recognized directive position.
    Hash = 86,

    // ─── Trivia: 112-127 ─────────────────────────────────────────────────
    Whitespace = 112,
    Newline = 113,
    LineComment = 114,
    /// `/* ... */` — does not nest.
    BlockComment = 115,
    /// `/+ ... +/` — nests; scanned with a depth counter.
    NestingBlockComment = 116,
    /// `#line 42 "file"` special token sequence, through end of line.
    LineDirective = 117,
    /// `#!...` at the very start of the file.
    Shebang = 118,
    /// UTF-8 byte order mark at offset 0.
    Bom = 119,

    // ─── Error tokens: 240-254 ───────────────────────────────────────────
    InvalidByte = 240,
    UnterminatedString = 241,
    UnterminatedChar = 242,
    UnterminatedBlockComment = 243,
    UnterminatedNestingComment = 244,
    UnterminatedTokenString = 245,
    InteriorNull = 246,

    // ─── Control: 255 ────────────────────────────────────────────────────
    Eof = 255,
}

impl RawTag {
    /// Returns `true` for trivia tags (whitespace, comments, directives).
    ///
    /// Trivia never participates in grammar matching but is preserved in
    /// the token stream for round-trip fidelity.
    #[inline]
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            RawTag::Whitespace
                | RawTag::Newline
                | RawTag::LineComment
                | RawTag::BlockComment
                | RawTag::NestingBlockComment
                | RawTag::LineDirective
                | RawTag::Shebang
                | RawTag::Bom
        )
    }

    /// Returns `true` for error tags.
    #[inline]
    pub const fn is_error(self) -> bool {
        (self as u8) >= 240 && (self as u8) < 255
    }

    /// Returns `true` for any of the six string literal forms.
    #[inline]
    pub const fn is_string(self) -> bool {
        (self as u8) >= 16 && (self as u8) <= 21
    }

    /// Fixed source text for tags whose lexeme is always the same
    /// (operators and delimiters). `None` for variable-content tags.
    pub const fn lexeme(self) -> Option<&'static str> {
        match self {
            RawTag::Slash => Some("/"),
            RawTag::DivAssign => Some("/="),
            RawTag::Dot => Some("."),
            RawTag::DotDot => Some(".."),
            RawTag::Ellipsis => Some("..."),
            RawTag::Amp => Some("&"),
            RawTag::AmpAssign => Some("&="),
            RawTag::AmpAmp => Some("&&"),
            RawTag::Pipe => Some("|"),
            RawTag::PipeAssign => Some("|="),
            RawTag::PipePipe => Some("||"),
            RawTag::Minus => Some("-"),
            RawTag::MinusAssign => Some("-="),
            RawTag::MinusMinus => Some("--"),
            RawTag::Plus => Some("+"),
            RawTag::PlusAssign => Some("+="),
            RawTag::PlusPlus => Some("++"),
            RawTag::Less => Some("<"),
            RawTag::LessEq => Some("<="),
            RawTag::Shl => Some("<<"),
            RawTag::ShlAssign => Some("<<="),
            RawTag::Greater => Some(">"),
            RawTag::GreaterEq => Some(">="),
            RawTag::Shr => Some(">>"),
            RawTag::ShrAssign => Some(">>="),
            RawTag::Ushr => Some(">>>"),
            RawTag::UshrAssign => Some(">>>="),
            RawTag::Bang => Some("!"),
            RawTag::BangEq => Some("!="),
            RawTag::LeftParen => Some("("),
            RawTag::RightParen => Some(")"),
            RawTag::LeftBracket => Some("["),
            RawTag::RightBracket => Some("]"),
            RawTag::LeftBrace => Some("{"),
            RawTag::RightBrace => Some("}"),
            RawTag::Question => Some("?"),
            RawTag::Comma => Some(","),
            RawTag::Semicolon => Some(";"),
            RawTag::Colon => Some(":"),
            RawTag::Dollar => Some("$"),
            RawTag::Assign => Some("="),
            RawTag::EqEq => Some("=="),
            RawTag::FatArrow => Some("=>"),
            RawTag::Star => Some("*"),
            RawTag::StarAssign => Some("*="),
            RawTag::Percent => Some("%"),
            RawTag::PercentAssign => Some("%="),
            RawTag::Caret => Some("^"),
            RawTag::CaretAssign => Some("^="),
            RawTag::Pow => Some("^^"),
            RawTag::PowAssign => Some("^^="),
            RawTag::Tilde => Some("~"),
            RawTag::TildeAssign => Some("~="),
            RawTag::At => Some("@"),
            RawTag::Hash => Some("#"),
            _ => None,
        }
    }
}

/// Raw token: tag plus byte length. Position is implicit — the consumer
/// accumulates lengths, so tokens tile the source exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_one_byte() {
        assert_eq!(std::mem::size_of::<RawTag>(), 1);
    }

    #[test]
    fn semantic_ranges() {
        assert_eq!(RawTag::Ident as u8, 0);
        assert_eq!(RawTag::DqString as u8, 16);
        assert_eq!(RawTag::TokenString as u8, 21);
        assert_eq!(RawTag::Slash as u8, 32);
        assert_eq!(RawTag::Whitespace as u8, 112);
        assert_eq!(RawTag::InvalidByte as u8, 240);
        assert_eq!(RawTag::Eof as u8, 255);
    }

    #[test]
    fn trivia_classification() {
        assert!(RawTag::Whitespace.is_trivia());
        assert!(RawTag::NestingBlockComment.is_trivia());
        assert!(RawTag::LineDirective.is_trivia());
        assert!(RawTag::Shebang.is_trivia());
        assert!(!RawTag::Ident.is_trivia());
        assert!(!RawTag::UnterminatedString.is_trivia());
    }

    #[test]
    fn error_classification() {
        assert!(RawTag::InvalidByte.is_error());
        assert!(RawTag::UnterminatedNestingComment.is_error());
        assert!(!RawTag::Eof.is_error());
        assert!(!RawTag::DqString.is_error());
    }

    #[test]
    fn string_classification() {
        for tag in [
            RawTag::DqString,
            RawTag::WysiwygString,
            RawTag::BacktickString,
            RawTag::HexString,
            RawTag::DelimitedString,
            RawTag::TokenString,
        ] {
            assert!(tag.is_string(), "{tag:?} should classify as string");
        }
        assert!(!RawTag::Char.is_string());
    }

    #[test]
    fn fixed_lexemes() {
        assert_eq!(RawTag::UshrAssign.lexeme(), Some(">>>="));
        assert_eq!(RawTag::PowAssign.lexeme(), Some("^^="));
        assert_eq!(RawTag::Ellipsis.lexeme(), Some("..."));
        assert_eq!(RawTag::Ident.lexeme(), None);
        assert_eq!(RawTag::DqString.lexeme(), None);
    }
}
