//! Concrete evaluation
//!
//! Evaluates values and guards under an assignment. `None` means the result
//! is not decidable here (unbound variable, division by zero, or an
//! unbounded result outside `i64`) and must be left to the solver.

use super::canonical::compare_ord;
use crate::features::symbolic::domain::{
    ArithOp, Assignment, CompareOp, ConcreteValue, Guard, IntSemantics, SymbolicValue,
};

pub struct ConcreteEvaluator<'a> {
    semantics: IntSemantics,
    env: &'a Assignment,
}

impl<'a> ConcreteEvaluator<'a> {
    pub fn new(semantics: IntSemantics, env: &'a Assignment) -> Self {
        Self { semantics, env }
    }

    pub fn eval_value(&self, value: &SymbolicValue) -> Option<ConcreteValue> {
        match value {
            SymbolicValue::Literal(ConcreteValue::Int(v)) => {
                Some(ConcreteValue::Int(self.semantics.normalize(*v as i128)?))
            }
            SymbolicValue::Literal(v) => Some(v.clone()),
            SymbolicValue::FreeVar { name, sort } => {
                let bound = self.env.get(name)?;
                (bound.sort() == *sort).then(|| bound.clone())
            }
            SymbolicValue::Concat(parts) => {
                let mut out = String::new();
                for part in parts {
                    match self.eval_value(part)? {
                        ConcreteValue::Str(s) => out.push_str(&s),
                        _ => return None,
                    }
                }
                Some(ConcreteValue::Str(out))
            }
            SymbolicValue::Arith { op, left, right } => {
                let l = self.eval_value(left)?.as_int()?;
                let r = self.eval_value(right)?.as_int()?;
                self.eval_arith(*op, l, r).map(ConcreteValue::Int)
            }
            SymbolicValue::Ite {
                cond,
                then,
                otherwise,
            } => {
                if self.eval_guard(cond)? {
                    self.eval_value(then)
                } else {
                    self.eval_value(otherwise)
                }
            }
        }
    }

    fn eval_arith(&self, op: ArithOp, l: i64, r: i64) -> Option<i64> {
        let (l, r) = (l as i128, r as i128);
        let exact = match (op, self.semantics) {
            (ArithOp::Add, _) => l + r,
            (ArithOp::Sub, _) => l - r,
            (ArithOp::Mul, _) => l * r,
            (ArithOp::Div | ArithOp::Rem, _) if r == 0 => return None,
            (ArithOp::Div, IntSemantics::Unbounded) => l.div_euclid(r),
            (ArithOp::Rem, IntSemantics::Unbounded) => l.rem_euclid(r),
            (ArithOp::Div, IntSemantics::Wrapping { .. }) => l / r,
            (ArithOp::Rem, IntSemantics::Wrapping { .. }) => l % r,
        };
        self.semantics.normalize(exact)
    }

    pub fn eval_guard(&self, guard: &Guard) -> Option<bool> {
        match guard {
            Guard::BoolLiteral(b) => Some(*b),
            Guard::Compare { op, left, right } => {
                let l = self.eval_value(left)?;
                let r = self.eval_value(right)?;
                eval_compare(*op, &l, &r)
            }
            Guard::Not(inner) => self.eval_guard(inner).map(|b| !b),
            // Short-circuit only on a decided absorbing operand
            Guard::And(parts) => {
                let mut undecided = false;
                for part in parts {
                    match self.eval_guard(part) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => undecided = true,
                    }
                }
                (!undecided).then_some(true)
            }
            Guard::Or(parts) => {
                let mut undecided = false;
                for part in parts {
                    match self.eval_guard(part) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => undecided = true,
                    }
                }
                (!undecided).then_some(false)
            }
            Guard::PrefixOf { prefix, value } => {
                let p = self.eval_value(prefix)?;
                let v = self.eval_value(value)?;
                Some(v.as_str()?.starts_with(p.as_str()?))
            }
            Guard::SuffixOf { suffix, value } => {
                let s = self.eval_value(suffix)?;
                let v = self.eval_value(value)?;
                Some(v.as_str()?.ends_with(s.as_str()?))
            }
        }
    }
}

fn eval_compare(op: CompareOp, l: &ConcreteValue, r: &ConcreteValue) -> Option<bool> {
    match (l, r) {
        (ConcreteValue::Int(a), ConcreteValue::Int(b)) => Some(compare_ord(op, a, b)),
        (ConcreteValue::Bool(a), ConcreteValue::Bool(b)) => Some(compare_ord(op, a, b)),
        (ConcreteValue::Str(a), ConcreteValue::Str(b)) if op.is_equality() => {
            Some(compare_ord(op, a, b))
        }
        _ => None,
    }
}
