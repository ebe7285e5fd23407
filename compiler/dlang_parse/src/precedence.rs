//! Operator precedence table.
//!
//! The expression grammar is a precedence cascade; this table is the
//! single source of truth for how the operator-matching loop resolves
//! shift-vs-reduce choices between adjacent binary operators. Higher
//! binding power binds tighter. Left-associative operators get
//! `(n, n + 1)`, right-associative ones `(n + 1, n)`.
//!
//! Dangling `else` is not decided here: the statement grammar always
//! shifts, attaching an `else` to the nearest unmatched `if`.

use dlang_syntax::TokenKind;

/// Binding powers of an infix operator: what it takes to capture the
/// left operand, and the minimum power of its right subexpression.
pub type BindingPower = (u8, u8);

/// Binding power of prefix operators. Binds tighter than every binary
/// operator, looser than postfix.
pub const PREFIX_BP: u8 = 31;

/// Binding power for `?:`. Right-associative, just above assignment.
pub const TERNARY_BP: BindingPower = (8, 7);

/// Binding power for assignment operators. Right-associative, lowest
/// after the comma operator.
pub const ASSIGN_BP: BindingPower = (4, 3);

/// Look up the binding power of a binary operator token.
///
/// `is`/`in` (and their `!`-negated forms, which the parser fuses from
/// two tokens) sit on the comparison level. Assignment and `?:` are not
/// listed here; the operator loop special-cases them for associativity
/// and the ternary middle operand.
pub fn infix_binding_power(op: TokenKind) -> Option<BindingPower> {
    let bp = match op {
        TokenKind::PipePipe => (11, 12),
        TokenKind::AmpAmp => (13, 14),
        TokenKind::Pipe => (15, 16),
        TokenKind::Caret => (17, 18),
        TokenKind::Amp => (19, 20),
        TokenKind::EqEq
        | TokenKind::BangEq
        | TokenKind::Less
        | TokenKind::LessEq
        | TokenKind::Greater
        | TokenKind::GreaterEq
        | TokenKind::Is
        | TokenKind::In => (21, 22),
        TokenKind::Shl | TokenKind::Shr | TokenKind::Ushr => (23, 24),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Tilde => (25, 26),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => (27, 28),
        // ^^ is right-associative: 2 ^^ 3 ^^ 2 == 2 ^^ (3 ^^ 2)
        TokenKind::Pow => (30, 29),
        _ => return None,
    };
    Some(bp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (add_l, _) = infix_binding_power(TokenKind::Plus).unwrap();
        let (mul_l, _) = infix_binding_power(TokenKind::Star).unwrap();
        assert!(mul_l > add_l);
    }

    #[test]
    fn shift_binds_tighter_than_comparison() {
        let (cmp_l, _) = infix_binding_power(TokenKind::Less).unwrap();
        let (shl_l, _) = infix_binding_power(TokenKind::Shl).unwrap();
        assert!(shl_l > cmp_l);
    }

    #[test]
    fn pow_is_right_associative() {
        let (l, r) = infix_binding_power(TokenKind::Pow).unwrap();
        assert!(l > r);
    }

    #[test]
    fn logical_or_is_loosest_binary() {
        let (or_l, _) = infix_binding_power(TokenKind::PipePipe).unwrap();
        for op in [
            TokenKind::AmpAmp,
            TokenKind::Pipe,
            TokenKind::EqEq,
            TokenKind::Shl,
            TokenKind::Plus,
            TokenKind::Star,
            TokenKind::Pow,
        ] {
            let (l, _) = infix_binding_power(op).unwrap();
            assert!(l > or_l, "{op:?} must bind tighter than ||");
        }
        assert!(or_l > ASSIGN_BP.0);
        assert!(or_l > TERNARY_BP.0);
    }
}
