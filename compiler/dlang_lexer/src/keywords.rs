//! Keyword resolution.
//!
//! Keyword matching dominates the generic identifier rule: any identifier
//! whose text is a keyword becomes that keyword token, unconditionally.
//! D has no context-sensitive keywords.
//!
//! Lookup is length-bucketed: keywords run from 2 (`do`) to 19
//! (`__PRETTY_FUNCTION__`) bytes, so anything outside that range is
//! rejected without a comparison.

use dlang_syntax::TokenKind;

/// Look up a keyword by text. `None` means a plain identifier.
#[inline]
pub(crate) fn lookup(text: &str) -> Option<TokenKind> {
    let len = text.len();
    if !(2..=19).contains(&len) {
        return None;
    }
    let first = text.as_bytes()[0];
    if !first.is_ascii_alphabetic() && first != b'_' {
        return None;
    }

    match len {
        2 => match text {
            "do" => Some(TokenKind::Do),
            "if" => Some(TokenKind::If),
            "in" => Some(TokenKind::In),
            "is" => Some(TokenKind::Is),
            _ => None,
        },
        3 => match text {
            "asm" => Some(TokenKind::Asm),
            "for" => Some(TokenKind::For),
            "int" => Some(TokenKind::Int),
            "new" => Some(TokenKind::New),
            "out" => Some(TokenKind::Out),
            "ref" => Some(TokenKind::Ref),
            "try" => Some(TokenKind::Try),
            _ => None,
        },
        4 => match text {
            "auto" => Some(TokenKind::Auto),
            "body" => Some(TokenKind::Body),
            "bool" => Some(TokenKind::Bool),
            "byte" => Some(TokenKind::Byte),
            "case" => Some(TokenKind::Case),
            "cast" => Some(TokenKind::Cast),
            "cent" => Some(TokenKind::Cent),
            "char" => Some(TokenKind::Char),
            "else" => Some(TokenKind::Else),
            "enum" => Some(TokenKind::Enum),
            "goto" => Some(TokenKind::Goto),
            "lazy" => Some(TokenKind::Lazy),
            "long" => Some(TokenKind::Long),
            "null" => Some(TokenKind::Null),
            "pure" => Some(TokenKind::Pure),
            "real" => Some(TokenKind::Real),
            "this" => Some(TokenKind::This),
            "true" => Some(TokenKind::True),
            "uint" => Some(TokenKind::Uint),
            "void" => Some(TokenKind::Void),
            "with" => Some(TokenKind::With),
            _ => None,
        },
        5 => match text {
            "alias" => Some(TokenKind::Alias),
            "align" => Some(TokenKind::Align),
            "break" => Some(TokenKind::Break),
            "catch" => Some(TokenKind::Catch),
            "class" => Some(TokenKind::Class),
            "const" => Some(TokenKind::Const),
            "creal" => Some(TokenKind::Creal),
            "dchar" => Some(TokenKind::Dchar),
            "debug" => Some(TokenKind::Debug),
            "false" => Some(TokenKind::False),
            "final" => Some(TokenKind::Final),
            "float" => Some(TokenKind::Float),
            "inout" => Some(TokenKind::Inout),
            "ireal" => Some(TokenKind::Ireal),
            "macro" => Some(TokenKind::Macro),
            "mixin" => Some(TokenKind::Mixin),
            "scope" => Some(TokenKind::Scope),
            "short" => Some(TokenKind::Short),
            "super" => Some(TokenKind::Super),
            "throw" => Some(TokenKind::Throw),
            "ubyte" => Some(TokenKind::Ubyte),
            "ucent" => Some(TokenKind::Ucent),
            "ulong" => Some(TokenKind::Ulong),
            "union" => Some(TokenKind::Union),
            "wchar" => Some(TokenKind::Wchar),
            "while" => Some(TokenKind::While),
            _ => None,
        },
        6 => match text {
            "assert" => Some(TokenKind::Assert),
            "cfloat" => Some(TokenKind::Cfloat),
            "delete" => Some(TokenKind::Delete),
            "double" => Some(TokenKind::Double),
            "export" => Some(TokenKind::Export),
            "extern" => Some(TokenKind::Extern),
            "ifloat" => Some(TokenKind::Ifloat),
            "import" => Some(TokenKind::Import),
            "module" => Some(TokenKind::Module),
            "pragma" => Some(TokenKind::Pragma),
            "public" => Some(TokenKind::Public),
            "return" => Some(TokenKind::Return),
            "shared" => Some(TokenKind::Shared),
            "static" => Some(TokenKind::Static),
            "struct" => Some(TokenKind::Struct),
            "switch" => Some(TokenKind::Switch),
            "typeid" => Some(TokenKind::Typeid),
            "typeof" => Some(TokenKind::Typeof),
            "ushort" => Some(TokenKind::Ushort),
            _ => None,
        },
        7 => match text {
            "cdouble" => Some(TokenKind::Cdouble),
            "default" => Some(TokenKind::Default),
            "finally" => Some(TokenKind::Finally),
            "foreach" => Some(TokenKind::Foreach),
            "idouble" => Some(TokenKind::Idouble),
            "nothrow" => Some(TokenKind::Nothrow),
            "package" => Some(TokenKind::Package),
            "private" => Some(TokenKind::Private),
            "version" => Some(TokenKind::Version),
            _ => None,
        },
        8 => match text {
            "abstract" => Some(TokenKind::Abstract),
            "continue" => Some(TokenKind::Continue),
            "delegate" => Some(TokenKind::Delegate),
            "function" => Some(TokenKind::Function),
            "override" => Some(TokenKind::Override),
            "template" => Some(TokenKind::Template),
            "unittest" => Some(TokenKind::Unittest),
            "__FILE__" => Some(TokenKind::SpecialFile),
            "__LINE__" => Some(TokenKind::SpecialLine),
            "__traits" => Some(TokenKind::Traits),
            "__vector" => Some(TokenKind::Vector),
            _ => None,
        },
        9 => match text {
            "immutable" => Some(TokenKind::Immutable),
            "interface" => Some(TokenKind::Interface),
            "invariant" => Some(TokenKind::Invariant),
            "protected" => Some(TokenKind::Protected),
            "__gshared" => Some(TokenKind::Gshared),
            _ => None,
        },
        10 => match text {
            "deprecated" => Some(TokenKind::Deprecated),
            "__MODULE__" => Some(TokenKind::SpecialModule),
            _ => None,
        },
        12 => match text {
            "synchronized" => Some(TokenKind::Synchronized),
            "__FUNCTION__" => Some(TokenKind::SpecialFunction),
            "__parameters" => Some(TokenKind::Parameters),
            _ => None,
        },
        15 => match text {
            "foreach_reverse" => Some(TokenKind::ForeachReverse),
            _ => None,
        },
        18 => match text {
            "__FILE_FULL_PATH__" => Some(TokenKind::SpecialFileFullPath),
            _ => None,
        },
        19 => match text {
            "__PRETTY_FUNCTION__" => Some(TokenKind::SpecialPrettyFunction),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_resolve() {
        assert_eq!(lookup("if"), Some(TokenKind::If));
        assert_eq!(lookup("foreach_reverse"), Some(TokenKind::ForeachReverse));
        assert_eq!(lookup("__PRETTY_FUNCTION__"), Some(TokenKind::SpecialPrettyFunction));
        assert_eq!(lookup("__gshared"), Some(TokenKind::Gshared));
    }

    #[test]
    fn identifiers_pass_through() {
        assert_eq!(lookup("iff"), None);
        assert_eq!(lookup("x"), None);
        assert_eq!(lookup("Int"), None);
        assert_eq!(lookup("foreach_"), None);
        assert_eq!(lookup("_"), None);
    }

    #[test]
    fn lexeme_and_lookup_agree() {
        // One probe per length bucket.
        for kind in [
            TokenKind::Do,
            TokenKind::Asm,
            TokenKind::Cast,
            TokenKind::Mixin,
            TokenKind::Typeof,
            TokenKind::Version,
            TokenKind::Delegate,
            TokenKind::Invariant,
            TokenKind::Deprecated,
            TokenKind::Synchronized,
            TokenKind::ForeachReverse,
            TokenKind::SpecialFileFullPath,
            TokenKind::SpecialPrettyFunction,
        ] {
            let text = kind.lexeme().unwrap();
            assert_eq!(lookup(text), Some(kind), "bucket miss for {text}");
        }
    }
}
