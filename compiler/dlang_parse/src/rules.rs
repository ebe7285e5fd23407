//! Declarative grammar rule table.
//!
//! The rule table is the checked description of the surface grammar the
//! recursive descent code implements. Rules are defined by name in one
//! pass and bound in a second, so definition order never matters and
//! mutual recursion needs no forward declarations. Construction computes
//! nullability and FIRST sets by fixpoint and rejects grammars a descent
//! parser cannot run: unknown references, duplicate definitions, and
//! left recursion (including recursion hidden behind nullable prefixes).
//!
//! Tests pin the handwritten parser's dispatch sets against the FIRST
//! sets computed here, so drift between the table and the implementation
//! fails loudly.

use crate::recovery::TokenSet;
use dlang_syntax::TokenKind;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Index of a rule in the grammar table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RuleId(pub u16);

/// Right-hand side of a grammar rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuleExpr {
    /// A terminal.
    Tok(TokenKind),
    /// A reference to another rule by name; resolved during binding.
    Ref(&'static str),
    /// All parts in order.
    Seq(Vec<RuleExpr>),
    /// Exactly one of the alternatives.
    Alt(Vec<RuleExpr>),
    /// Zero or one.
    Opt(Box<RuleExpr>),
    /// Zero or more.
    Star(Box<RuleExpr>),
}

pub fn tok(kind: TokenKind) -> RuleExpr {
    RuleExpr::Tok(kind)
}

pub fn r(name: &'static str) -> RuleExpr {
    RuleExpr::Ref(name)
}

pub fn seq(parts: Vec<RuleExpr>) -> RuleExpr {
    RuleExpr::Seq(parts)
}

pub fn alt(parts: Vec<RuleExpr>) -> RuleExpr {
    RuleExpr::Alt(parts)
}

pub fn opt(part: RuleExpr) -> RuleExpr {
    RuleExpr::Opt(Box::new(part))
}

pub fn star(part: RuleExpr) -> RuleExpr {
    RuleExpr::Star(Box::new(part))
}

/// One or more: `x x*`.
pub fn plus(part: RuleExpr) -> RuleExpr {
    seq(vec![part.clone(), star(part)])
}

/// `x (sep x)*`, the comma-list shape used throughout the grammar.
pub fn sep_by(part: RuleExpr, sep: TokenKind) -> RuleExpr {
    seq(vec![part.clone(), star(seq(vec![tok(sep), part]))])
}

/// Grammar construction failure.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GrammarError {
    #[error("rule `{in_rule}` references unknown rule `{referenced}`")]
    UnknownRule {
        referenced: &'static str,
        in_rule: &'static str,
    },
    #[error("rule `{name}` is defined more than once")]
    DuplicateRule { name: &'static str },
    #[error("start rule `{name}` is not defined")]
    UnknownStart { name: &'static str },
    #[error("rule `{rule}` is left-recursive (possibly through nullable prefixes)")]
    LeftRecursive { rule: &'static str },
}

/// A validated, immutable grammar table.
#[derive(Debug)]
pub struct Grammar {
    names: Vec<&'static str>,
    bodies: Vec<RuleExpr>,
    index: FxHashMap<&'static str, RuleId>,
    nullable: Vec<bool>,
    first: Vec<TokenSet>,
    start: RuleId,
}

impl Grammar {
    /// Bind and validate a rule set. `start` names the entry rule.
    pub fn build(
        defs: Vec<(&'static str, RuleExpr)>,
        start: &'static str,
    ) -> Result<Self, GrammarError> {
        // Pass 1: register names.
        let mut index = FxHashMap::default();
        let mut names = Vec::with_capacity(defs.len());
        let mut bodies = Vec::with_capacity(defs.len());
        for (i, (name, body)) in defs.into_iter().enumerate() {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "rule tables are far smaller than u16::MAX"
            )]
            let id = RuleId(i as u16);
            if index.insert(name, id).is_some() {
                return Err(GrammarError::DuplicateRule { name });
            }
            names.push(name);
            bodies.push(body);
        }

        // Pass 2: every reference must resolve.
        for (i, body) in bodies.iter().enumerate() {
            check_refs(body, names[i], &index)?;
        }

        let start = *index
            .get(start)
            .ok_or(GrammarError::UnknownStart { name: start })?;

        let nullable = compute_nullable(&bodies, &index);
        detect_left_recursion(&bodies, &names, &index, &nullable)?;
        let first = compute_first(&bodies, &index, &nullable);

        Ok(Grammar {
            names,
            bodies,
            index,
            nullable,
            first,
            start,
        })
    }

    pub fn rule_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn start(&self) -> RuleId {
        self.start
    }

    pub fn id(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: RuleId) -> &'static str {
        self.names[id.0 as usize]
    }

    pub fn body(&self, id: RuleId) -> &RuleExpr {
        &self.bodies[id.0 as usize]
    }

    pub fn nullable(&self, id: RuleId) -> bool {
        self.nullable[id.0 as usize]
    }

    /// FIRST set of a rule: tokens that can begin it.
    pub fn first(&self, id: RuleId) -> TokenSet {
        self.first[id.0 as usize]
    }
}

fn check_refs(
    expr: &RuleExpr,
    in_rule: &'static str,
    index: &FxHashMap<&'static str, RuleId>,
) -> Result<(), GrammarError> {
    match expr {
        RuleExpr::Tok(_) => Ok(()),
        RuleExpr::Ref(name) => {
            if index.contains_key(name) {
                Ok(())
            } else {
                Err(GrammarError::UnknownRule {
                    referenced: name,
                    in_rule,
                })
            }
        }
        RuleExpr::Seq(parts) | RuleExpr::Alt(parts) => {
            for p in parts {
                check_refs(p, in_rule, index)?;
            }
            Ok(())
        }
        RuleExpr::Opt(inner) | RuleExpr::Star(inner) => check_refs(inner, in_rule, index),
    }
}

fn compute_nullable(bodies: &[RuleExpr], index: &FxHashMap<&'static str, RuleId>) -> Vec<bool> {
    let mut nullable = vec![false; bodies.len()];
    loop {
        let mut changed = false;
        for (i, body) in bodies.iter().enumerate() {
            if !nullable[i] && expr_nullable(body, index, &nullable) {
                nullable[i] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

fn expr_nullable(
    expr: &RuleExpr,
    index: &FxHashMap<&'static str, RuleId>,
    nullable: &[bool],
) -> bool {
    match expr {
        RuleExpr::Tok(_) => false,
        RuleExpr::Ref(name) => nullable[index[name].0 as usize],
        RuleExpr::Seq(parts) => parts.iter().all(|p| expr_nullable(p, index, nullable)),
        RuleExpr::Alt(parts) => parts.iter().any(|p| expr_nullable(p, index, nullable)),
        RuleExpr::Opt(_) | RuleExpr::Star(_) => true,
    }
}

fn compute_first(
    bodies: &[RuleExpr],
    index: &FxHashMap<&'static str, RuleId>,
    nullable: &[bool],
) -> Vec<TokenSet> {
    let mut first = vec![TokenSet::new(); bodies.len()];
    loop {
        let mut changed = false;
        for (i, body) in bodies.iter().enumerate() {
            let computed = expr_first(body, index, nullable, &first);
            let merged = first[i].union(computed);
            if merged != first[i] {
                first[i] = merged;
                changed = true;
            }
        }
        if !changed {
            return first;
        }
    }
}

fn expr_first(
    expr: &RuleExpr,
    index: &FxHashMap<&'static str, RuleId>,
    nullable: &[bool],
    first: &[TokenSet],
) -> TokenSet {
    match expr {
        RuleExpr::Tok(kind) => TokenSet::single(*kind),
        RuleExpr::Ref(name) => first[index[name].0 as usize],
        RuleExpr::Seq(parts) => {
            let mut out = TokenSet::new();
            for p in parts {
                out = out.union(expr_first(p, index, nullable, first));
                if !expr_nullable(p, index, nullable) {
                    break;
                }
            }
            out
        }
        RuleExpr::Alt(parts) => parts
            .iter()
            .fold(TokenSet::new(), |acc, p| {
                acc.union(expr_first(p, index, nullable, first))
            }),
        RuleExpr::Opt(inner) | RuleExpr::Star(inner) => expr_first(inner, index, nullable, first),
    }
}

/// Rules reachable at the leftmost position (through nullable prefixes).
fn left_edges(
    expr: &RuleExpr,
    index: &FxHashMap<&'static str, RuleId>,
    nullable: &[bool],
    out: &mut Vec<RuleId>,
) {
    match expr {
        RuleExpr::Tok(_) => {}
        RuleExpr::Ref(name) => out.push(index[name]),
        RuleExpr::Seq(parts) => {
            for p in parts {
                left_edges(p, index, nullable, out);
                if !expr_nullable(p, index, nullable) {
                    break;
                }
            }
        }
        RuleExpr::Alt(parts) => {
            for p in parts {
                left_edges(p, index, nullable, out);
            }
        }
        RuleExpr::Opt(inner) | RuleExpr::Star(inner) => left_edges(inner, index, nullable, out),
    }
}

fn detect_left_recursion(
    bodies: &[RuleExpr],
    names: &[&'static str],
    index: &FxHashMap<&'static str, RuleId>,
    nullable: &[bool],
) -> Result<(), GrammarError> {
    let edges: Vec<Vec<RuleId>> = bodies
        .iter()
        .map(|b| {
            let mut out = Vec::new();
            left_edges(b, index, nullable, &mut out);
            out
        })
        .collect();

    for start in 0..bodies.len() {
        // DFS from each rule along left edges; reaching itself is left
        // recursion a descent parser would loop on.
        let mut seen = vec![false; bodies.len()];
        let mut stack: Vec<usize> = edges[start].iter().map(|id| id.0 as usize).collect();
        while let Some(node) = stack.pop() {
            if node == start {
                return Err(GrammarError::LeftRecursive { rule: names[start] });
            }
            if seen[node] {
                continue;
            }
            seen[node] = true;
            stack.extend(edges[node].iter().map(|id| id.0 as usize));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn binding_is_order_independent() {
        let g = Grammar::build(
            vec![
                ("a", seq(vec![tok(TokenKind::If), r("b")])),
                ("b", tok(TokenKind::Identifier)),
            ],
            "a",
        )
        .unwrap();
        assert_eq!(g.rule_count(), 2);
        assert!(g.first(g.id("a").unwrap()).contains(TokenKind::If));
    }

    #[test]
    fn unknown_reference_is_rejected() {
        let err = Grammar::build(vec![("a", r("missing"))], "a").unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnknownRule {
                referenced: "missing",
                in_rule: "a"
            }
        );
    }

    #[test]
    fn duplicate_rule_is_rejected() {
        let err = Grammar::build(
            vec![
                ("a", tok(TokenKind::If)),
                ("a", tok(TokenKind::While)),
            ],
            "a",
        )
        .unwrap_err();
        assert_eq!(err, GrammarError::DuplicateRule { name: "a" });
    }

    #[test]
    fn direct_left_recursion_is_rejected() {
        let err = Grammar::build(
            vec![("e", alt(vec![
                seq(vec![r("e"), tok(TokenKind::Plus), tok(TokenKind::Identifier)]),
                tok(TokenKind::Identifier),
            ]))],
            "e",
        )
        .unwrap_err();
        assert_eq!(err, GrammarError::LeftRecursive { rule: "e" });
    }

    #[test]
    fn left_recursion_through_nullable_prefix_is_rejected() {
        // a = b? a If — the nullable b hides the self-reference.
        let err = Grammar::build(
            vec![
                ("a", seq(vec![opt(r("b")), r("a"), tok(TokenKind::If)])),
                ("b", tok(TokenKind::Static)),
            ],
            "a",
        )
        .unwrap_err();
        assert_eq!(err, GrammarError::LeftRecursive { rule: "a" });
    }

    #[test]
    fn nullable_and_first_through_references() {
        let g = Grammar::build(
            vec![
                ("list", star(r("item"))),
                ("item", alt(vec![tok(TokenKind::Import), tok(TokenKind::Module)])),
                ("file", seq(vec![r("list"), tok(TokenKind::Eof)])),
            ],
            "file",
        )
        .unwrap();
        assert!(g.nullable(g.id("list").unwrap()));
        assert!(!g.nullable(g.id("item").unwrap()));
        let file_first = g.first(g.id("file").unwrap());
        // list is nullable, so Eof leaks into file's FIRST set.
        assert!(file_first.contains(TokenKind::Import));
        assert!(file_first.contains(TokenKind::Module));
        assert!(file_first.contains(TokenKind::Eof));
    }
}
