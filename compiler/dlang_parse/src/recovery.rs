//! Error recovery for the parser.
//!
//! Provides token sets and synchronization for continuing parsing after
//! errors. Bitset-based O(1) membership testing.

use dlang_syntax::TokenKind;

// TokenSet is a 256-bit bitset; every discriminant index must fit.
const _: () = assert!(
    TokenKind::COUNT <= 256,
    "TokenSet uses a [u64; 4] bitset; all discriminant indices must be < 256"
);

/// A set of token kinds with O(1) membership testing.
///
/// Each bit corresponds to a `TokenKind` discriminant index. D has more
/// than 128 token kinds, so the backing store is four 64-bit words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet([u64; 4]);

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub const fn new() -> Self {
        Self([0; 4])
    }

    /// Create a token set containing a single token kind.
    #[inline]
    pub const fn single(kind: TokenKind) -> Self {
        Self::new().with(kind)
    }

    /// Add a token kind (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        let idx = kind.discriminant_index();
        let mut words = self.0;
        words[idx / 64] |= 1u64 << (idx % 64);
        Self(words)
    }

    /// Union of two token sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self([
            self.0[0] | other.0[0],
            self.0[1] | other.0[1],
            self.0[2] | other.0[2],
            self.0[3] | other.0[3],
        ])
    }

    /// Intersection of two token sets.
    #[inline]
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self([
            self.0[0] & other.0[0],
            self.0[1] & other.0[1],
            self.0[2] & other.0[2],
            self.0[3] & other.0[3],
        ])
    }

    /// Check membership.
    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        let idx = kind.discriminant_index();
        (self.0[idx / 64] & (1u64 << (idx % 64))) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
    }

    #[inline]
    pub const fn count(&self) -> u32 {
        self.0[0].count_ones()
            + self.0[1].count_ones()
            + self.0[2].count_ones()
            + self.0[3].count_ones()
    }

    /// Non-const insertion.
    #[inline]
    pub fn insert(&mut self, kind: TokenKind) {
        let idx = kind.discriminant_index();
        self.0[idx / 64] |= 1u64 << (idx % 64);
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens that can begin a declaration. Synchronizing here lets one broken
/// declaration stay contained in its own error node.
pub const DECL_START: TokenSet = TokenSet::new()
    .with(TokenKind::Module)
    .with(TokenKind::Import)
    .with(TokenKind::Alias)
    .with(TokenKind::Enum)
    .with(TokenKind::Struct)
    .with(TokenKind::Union)
    .with(TokenKind::Class)
    .with(TokenKind::Interface)
    .with(TokenKind::Template)
    .with(TokenKind::Mixin)
    .with(TokenKind::Unittest)
    .with(TokenKind::Invariant)
    .with(TokenKind::This)
    .with(TokenKind::Tilde)
    .with(TokenKind::Static)
    .with(TokenKind::Extern)
    .with(TokenKind::Align)
    .with(TokenKind::Pragma)
    .with(TokenKind::Deprecated)
    .with(TokenKind::Private)
    .with(TokenKind::Package)
    .with(TokenKind::Protected)
    .with(TokenKind::Public)
    .with(TokenKind::Export)
    .with(TokenKind::Abstract)
    .with(TokenKind::Final)
    .with(TokenKind::Override)
    .with(TokenKind::Synchronized)
    .with(TokenKind::Auto)
    .with(TokenKind::Scope)
    .with(TokenKind::Const)
    .with(TokenKind::Immutable)
    .with(TokenKind::Inout)
    .with(TokenKind::Shared)
    .with(TokenKind::Gshared)
    .with(TokenKind::Nothrow)
    .with(TokenKind::Pure)
    .with(TokenKind::Ref)
    .with(TokenKind::At)
    .with(TokenKind::Debug)
    .with(TokenKind::Version)
    .with(TokenKind::Bool)
    .with(TokenKind::Byte)
    .with(TokenKind::Ubyte)
    .with(TokenKind::Short)
    .with(TokenKind::Ushort)
    .with(TokenKind::Int)
    .with(TokenKind::Uint)
    .with(TokenKind::Long)
    .with(TokenKind::Ulong)
    .with(TokenKind::Cent)
    .with(TokenKind::Ucent)
    .with(TokenKind::Char)
    .with(TokenKind::Wchar)
    .with(TokenKind::Dchar)
    .with(TokenKind::Float)
    .with(TokenKind::Double)
    .with(TokenKind::Real)
    .with(TokenKind::Ifloat)
    .with(TokenKind::Idouble)
    .with(TokenKind::Ireal)
    .with(TokenKind::Cfloat)
    .with(TokenKind::Cdouble)
    .with(TokenKind::Creal)
    .with(TokenKind::Void)
    .with(TokenKind::Typeof)
    .with(TokenKind::Vector);

/// Tokens that can begin a statement (beyond `DECL_START`).
pub const STMT_START: TokenSet = DECL_START
    .with(TokenKind::If)
    .with(TokenKind::While)
    .with(TokenKind::Do)
    .with(TokenKind::For)
    .with(TokenKind::Foreach)
    .with(TokenKind::ForeachReverse)
    .with(TokenKind::Switch)
    .with(TokenKind::Case)
    .with(TokenKind::Default)
    .with(TokenKind::Continue)
    .with(TokenKind::Break)
    .with(TokenKind::Return)
    .with(TokenKind::Goto)
    .with(TokenKind::With)
    .with(TokenKind::Try)
    .with(TokenKind::Throw)
    .with(TokenKind::Asm)
    .with(TokenKind::LeftBrace)
    .with(TokenKind::Semicolon);

/// Tokens that can begin an expression.
pub const EXPR_START: TokenSet = TokenSet::new()
    .with(TokenKind::Identifier)
    .with(TokenKind::IntLiteral)
    .with(TokenKind::FloatLiteral)
    .with(TokenKind::CharLiteral)
    .with(TokenKind::DqStringLiteral)
    .with(TokenKind::WysiwygStringLiteral)
    .with(TokenKind::BacktickStringLiteral)
    .with(TokenKind::HexStringLiteral)
    .with(TokenKind::DelimitedStringLiteral)
    .with(TokenKind::TokenStringLiteral)
    .with(TokenKind::This)
    .with(TokenKind::Super)
    .with(TokenKind::Null)
    .with(TokenKind::True)
    .with(TokenKind::False)
    .with(TokenKind::Dollar)
    .with(TokenKind::SpecialFile)
    .with(TokenKind::SpecialFileFullPath)
    .with(TokenKind::SpecialModule)
    .with(TokenKind::SpecialLine)
    .with(TokenKind::SpecialFunction)
    .with(TokenKind::SpecialPrettyFunction)
    .with(TokenKind::LeftParen)
    .with(TokenKind::LeftBracket)
    .with(TokenKind::Amp)
    .with(TokenKind::PlusPlus)
    .with(TokenKind::MinusMinus)
    .with(TokenKind::Star)
    .with(TokenKind::Minus)
    .with(TokenKind::Plus)
    .with(TokenKind::Bang)
    .with(TokenKind::Tilde)
    .with(TokenKind::Cast)
    .with(TokenKind::New)
    .with(TokenKind::Delete)
    .with(TokenKind::Assert)
    .with(TokenKind::Mixin)
    .with(TokenKind::Import)
    .with(TokenKind::Typeid)
    .with(TokenKind::Typeof)
    .with(TokenKind::Is)
    .with(TokenKind::Traits)
    .with(TokenKind::Function)
    .with(TokenKind::Delegate)
    .with(TokenKind::LeftBrace);

/// Statement-terminating tokens used to keep recovery local.
pub const STMT_RECOVERY: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::RightBrace)
    .with(TokenKind::Eof);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_discriminants_fit() {
        // ErrorToken and Eof sit at the top of the discriminant space.
        let set = TokenSet::new()
            .with(TokenKind::Eof)
            .with(TokenKind::ErrorToken)
            .with(TokenKind::Identifier);
        assert!(set.contains(TokenKind::Eof));
        assert!(set.contains(TokenKind::ErrorToken));
        assert!(set.contains(TokenKind::Identifier));
        assert!(!set.contains(TokenKind::Bom));
        assert_eq!(set.count(), 3);
    }

    #[test]
    fn union_and_intersection() {
        let a = TokenSet::single(TokenKind::If).with(TokenKind::While);
        let b = TokenSet::single(TokenKind::While).with(TokenKind::For);
        assert_eq!(a.union(b).count(), 3);
        assert_eq!(a.intersection(b), TokenSet::single(TokenKind::While));
    }

    #[test]
    fn start_sets_are_disjoint_from_terminators() {
        assert!(DECL_START.intersection(STMT_RECOVERY).is_empty());
        assert!(STMT_START.contains(TokenKind::Semicolon));
        assert!(EXPR_START.contains(TokenKind::Cast));
        assert!(!EXPR_START.contains(TokenKind::Semicolon));
    }
}
