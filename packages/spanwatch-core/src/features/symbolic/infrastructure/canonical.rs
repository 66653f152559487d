//! Canonical forms
//!
//! Canonicalization is purely structural: it never depends on integer
//! semantics, so a canonical formula means the same thing under every
//! `IntSemantics`. Applying it twice yields the same tree.

use crate::features::symbolic::domain::{CompareOp, ConcreteValue, Guard, SymbolicValue};

/// Canonical form of a value
///
/// Nested `Concat`s are flattened left-to-right, adjacent string literals
/// merged and empty ones dropped. `Ite` over a constant condition collapses.
pub fn canonicalize_value(value: &SymbolicValue) -> SymbolicValue {
    match value {
        SymbolicValue::Literal(_) | SymbolicValue::FreeVar { .. } => value.clone(),
        SymbolicValue::Concat(parts) => {
            let mut flat = Vec::with_capacity(parts.len());
            for part in parts {
                push_concat_part(&mut flat, canonicalize_value(part));
            }
            rebuild_concat(flat)
        }
        SymbolicValue::Arith { op, left, right } => SymbolicValue::Arith {
            op: *op,
            left: Box::new(canonicalize_value(left)),
            right: Box::new(canonicalize_value(right)),
        },
        SymbolicValue::Ite {
            cond,
            then,
            otherwise,
        } => {
            let cond = canonicalize_guard(cond);
            let then = canonicalize_value(then);
            let otherwise = canonicalize_value(otherwise);
            match cond {
                Guard::BoolLiteral(true) => then,
                Guard::BoolLiteral(false) => otherwise,
                _ if then == otherwise => then,
                cond => SymbolicValue::Ite {
                    cond: Box::new(cond),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                },
            }
        }
    }
}

/// Top-level parts of a canonical string value, in order
pub fn concat_parts(value: &SymbolicValue) -> Vec<SymbolicValue> {
    match canonicalize_value(value) {
        SymbolicValue::Concat(parts) => parts,
        SymbolicValue::Literal(ConcreteValue::Str(s)) if s.is_empty() => Vec::new(),
        other => vec![other],
    }
}

fn push_concat_part(flat: &mut Vec<SymbolicValue>, part: SymbolicValue) {
    match part {
        SymbolicValue::Concat(inner) => {
            for p in inner {
                push_concat_part(flat, p);
            }
        }
        SymbolicValue::Literal(ConcreteValue::Str(s)) => {
            if s.is_empty() {
                return;
            }
            if let Some(SymbolicValue::Literal(ConcreteValue::Str(prev))) = flat.last_mut() {
                prev.push_str(&s);
            } else {
                flat.push(SymbolicValue::str(s));
            }
        }
        other => flat.push(other),
    }
}

fn rebuild_concat(mut flat: Vec<SymbolicValue>) -> SymbolicValue {
    match flat.len() {
        0 => SymbolicValue::str(""),
        1 => flat.remove(0),
        _ => SymbolicValue::Concat(flat),
    }
}

/// Canonical form of a guard
///
/// `And`/`Or` are flattened, constant-folded, sorted by structural order and
/// deduplicated. Negations of comparisons flip the operator; double
/// negations cancel.
pub fn canonicalize_guard(guard: &Guard) -> Guard {
    match guard {
        Guard::BoolLiteral(_) => guard.clone(),
        Guard::Compare { op, left, right } => {
            let left = canonicalize_value(left);
            let right = canonicalize_value(right);
            fold_compare(*op, left, right)
        }
        Guard::Not(inner) => match canonicalize_guard(inner) {
            Guard::BoolLiteral(b) => Guard::BoolLiteral(!b),
            Guard::Not(g) => *g,
            Guard::Compare { op, left, right } => Guard::Compare {
                op: op.negate(),
                left,
                right,
            },
            other => Guard::Not(Box::new(other)),
        },
        Guard::And(parts) => fold_junction(parts, true),
        Guard::Or(parts) => fold_junction(parts, false),
        Guard::PrefixOf { prefix, value } => {
            let prefix = canonicalize_value(prefix);
            let value = canonicalize_value(value);
            match (&prefix, &value) {
                (
                    SymbolicValue::Literal(ConcreteValue::Str(p)),
                    SymbolicValue::Literal(ConcreteValue::Str(v)),
                ) => Guard::BoolLiteral(v.starts_with(p.as_str())),
                _ if prefix == value => Guard::BoolLiteral(true),
                _ => Guard::PrefixOf { prefix, value },
            }
        }
        Guard::SuffixOf { suffix, value } => {
            let suffix = canonicalize_value(suffix);
            let value = canonicalize_value(value);
            match (&suffix, &value) {
                (
                    SymbolicValue::Literal(ConcreteValue::Str(p)),
                    SymbolicValue::Literal(ConcreteValue::Str(v)),
                ) => Guard::BoolLiteral(v.ends_with(p.as_str())),
                _ if suffix == value => Guard::BoolLiteral(true),
                _ => Guard::SuffixOf { suffix, value },
            }
        }
    }
}

fn fold_compare(op: CompareOp, left: SymbolicValue, right: SymbolicValue) -> Guard {
    if left == right {
        return Guard::BoolLiteral(matches!(op, CompareOp::Eq | CompareOp::Le | CompareOp::Ge));
    }

    // Int literals are left alone: their meaning depends on the integer width
    match (&left, &right) {
        (
            SymbolicValue::Literal(ConcreteValue::Str(_)),
            SymbolicValue::Literal(ConcreteValue::Str(_)),
        ) => Guard::BoolLiteral(op == CompareOp::Ne),
        (
            SymbolicValue::Literal(ConcreteValue::Bool(a)),
            SymbolicValue::Literal(ConcreteValue::Bool(b)),
        ) => Guard::BoolLiteral(compare_ord(op, a, b)),
        _ => Guard::Compare { op, left, right },
    }
}

pub(crate) fn compare_ord<T: Ord>(op: CompareOp, a: &T, b: &T) -> bool {
    match op {
        CompareOp::Lt => a < b,
        CompareOp::Gt => a > b,
        CompareOp::Eq => a == b,
        CompareOp::Ne => a != b,
        CompareOp::Le => a <= b,
        CompareOp::Ge => a >= b,
    }
}

fn fold_junction(parts: &[Guard], is_and: bool) -> Guard {
    // `absorbing` decides the whole junction, `neutral` drops out
    let absorbing = !is_and;
    let mut flat = Vec::with_capacity(parts.len());

    for part in parts {
        match canonicalize_guard(part) {
            Guard::BoolLiteral(b) if b == absorbing => return Guard::BoolLiteral(absorbing),
            Guard::BoolLiteral(_) => {}
            Guard::And(inner) if is_and => flat.extend(inner),
            Guard::Or(inner) if !is_and => flat.extend(inner),
            other => flat.push(other),
        }
    }

    flat.sort();
    flat.dedup();

    match flat.len() {
        0 => Guard::BoolLiteral(is_and),
        1 => flat.remove(0),
        _ if is_and => Guard::And(flat),
        _ => Guard::Or(flat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(name: &str) -> SymbolicValue {
        SymbolicValue::int_var(name)
    }

    #[test]
    fn test_concat_flatten_and_merge() {
        let value = SymbolicValue::Concat(vec![
            SymbolicValue::str("/proc"),
            SymbolicValue::Concat(vec![SymbolicValue::str("/"), SymbolicValue::string_var("pid")]),
            SymbolicValue::str(""),
            SymbolicValue::str("/mem"),
        ]);
        assert_eq!(
            canonicalize_value(&value),
            SymbolicValue::Concat(vec![
                SymbolicValue::str("/proc/"),
                SymbolicValue::string_var("pid"),
                SymbolicValue::str("/mem"),
            ])
        );
    }

    #[test]
    fn test_literal_only_concat_collapses() {
        let value = SymbolicValue::Concat(vec![
            SymbolicValue::str("/proc/self"),
            SymbolicValue::str("/mem"),
        ]);
        assert_eq!(canonicalize_value(&value), SymbolicValue::str("/proc/self/mem"));
        assert_eq!(
            canonicalize_value(&SymbolicValue::Concat(vec![])),
            SymbolicValue::str("")
        );
    }

    #[test]
    fn test_concat_parts() {
        let value = SymbolicValue::Concat(vec![
            SymbolicValue::string_var("f0"),
            SymbolicValue::str("/mem"),
        ]);
        assert_eq!(concat_parts(&value).len(), 2);
        assert!(concat_parts(&SymbolicValue::str("")).is_empty());
        assert_eq!(concat_parts(&SymbolicValue::string_var("x")).len(), 1);
    }

    #[test]
    fn test_and_absorbs_false() {
        let guard = Guard::and(vec![
            Guard::not(Guard::gt(n("n1"), SymbolicValue::int(0)).unwrap()),
            Guard::falsity(),
        ]);
        assert_eq!(canonicalize_guard(&guard), Guard::falsity());
    }

    #[test]
    fn test_empty_junctions() {
        assert_eq!(canonicalize_guard(&Guard::and(vec![])), Guard::truth());
        assert_eq!(canonicalize_guard(&Guard::or(vec![])), Guard::falsity());
        assert_eq!(
            canonicalize_guard(&Guard::and(vec![Guard::truth(), Guard::truth()])),
            Guard::truth()
        );
    }

    #[test]
    fn test_and_sorted_and_deduplicated() {
        let a = Guard::gt(n("a"), SymbolicValue::int(0)).unwrap();
        let b = Guard::gt(n("b"), SymbolicValue::int(0)).unwrap();
        let left = Guard::and(vec![b.clone(), Guard::and(vec![a.clone(), b.clone()])]);
        let right = Guard::and(vec![a.clone(), b.clone(), Guard::truth()]);
        assert_eq!(canonicalize_guard(&left), canonicalize_guard(&right));
        assert_eq!(canonicalize_guard(&left), Guard::And(vec![a, b]));
    }

    #[test]
    fn test_not_compare_flips_operator() {
        let guard = Guard::not(Guard::gt(n("n2"), SymbolicValue::int(0)).unwrap());
        assert_eq!(
            canonicalize_guard(&guard),
            Guard::le(n("n2"), SymbolicValue::int(0)).unwrap()
        );
    }

    #[test]
    fn test_double_negation() {
        let inner = Guard::or(vec![
            Guard::gt(n("a"), SymbolicValue::int(0)).unwrap(),
            Guard::gt(n("b"), SymbolicValue::int(0)).unwrap(),
        ]);
        let guard = Guard::not(Guard::not(inner.clone()));
        assert_eq!(canonicalize_guard(&guard), canonicalize_guard(&inner));
    }

    #[test]
    fn test_string_literal_compare_folds() {
        let eq = Guard::eq(
            SymbolicValue::Concat(vec![SymbolicValue::str("/proc/"), SymbolicValue::str("self")]),
            SymbolicValue::str("/proc/self"),
        )
        .unwrap();
        assert_eq!(canonicalize_guard(&eq), Guard::truth());

        let ne = Guard::eq(SymbolicValue::str("/tmp/x"), SymbolicValue::str("/proc/self/mem")).unwrap();
        assert_eq!(canonicalize_guard(&ne), Guard::falsity());
    }

    #[test]
    fn test_int_literal_compare_left_alone() {
        let guard = Guard::gt(SymbolicValue::int(300), SymbolicValue::int(10)).unwrap();
        assert_eq!(canonicalize_guard(&guard), guard);
    }

    #[test]
    fn test_ite_with_constant_condition() {
        let value = SymbolicValue::path_join(SymbolicValue::str(""), SymbolicValue::string_var("c")).unwrap();
        assert_eq!(canonicalize_value(&value), SymbolicValue::string_var("c"));
    }

    #[test]
    fn test_idempotent() {
        let value = SymbolicValue::path_join(SymbolicValue::str("/srv"), SymbolicValue::string_var("c")).unwrap();
        let guard = Guard::and(vec![
            Guard::eq(value, SymbolicValue::str("/proc/self/mem")).unwrap(),
            Guard::not(Guard::and(vec![
                Guard::gt(n("a"), SymbolicValue::int(1)).unwrap(),
                Guard::not(Guard::lt(n("b"), n("a")).unwrap()),
            ])),
        ]);
        let once = canonicalize_guard(&guard);
        assert_eq!(canonicalize_guard(&once), once);
    }
}
