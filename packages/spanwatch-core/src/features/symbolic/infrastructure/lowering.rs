//! Lowering to Z3 ASTs
//!
//! Pure translation of (canonical) guards and values into Z3 terms bound to
//! one `Context`. Free variables are named constants, so lowering the same
//! variable twice yields the same Z3 constant.
//!
//! Only available when compiled with `--features z3`.

#![cfg(feature = "z3")]

use crate::errors::{AnalysisError, Result};
use crate::features::symbolic::domain::{
    ArithOp, CompareOp, ConcreteValue, Guard, IntSemantics, Sort, SymbolicValue,
};
use z3::ast::{self, Ast};
use z3::Context;

/// A lowered value
#[derive(Debug, Clone)]
pub enum Term<'ctx> {
    Str(ast::String<'ctx>),
    Int(ast::Int<'ctx>),
    Bv(ast::BV<'ctx>),
    Bool(ast::Bool<'ctx>),
}

impl<'ctx> Term<'ctx> {
    fn kind(&self) -> &'static str {
        match self {
            Term::Str(_) => "String",
            Term::Int(_) | Term::Bv(_) => "Int",
            Term::Bool(_) => "Bool",
        }
    }
}

impl std::fmt::Display for Term<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Str(t) => write!(f, "{}", t),
            Term::Int(t) => write!(f, "{}", t),
            Term::Bv(t) => write!(f, "{}", t),
            Term::Bool(t) => write!(f, "{}", t),
        }
    }
}

pub struct Z3Lowering<'ctx> {
    ctx: &'ctx Context,
    semantics: IntSemantics,
}

impl<'ctx> Z3Lowering<'ctx> {
    pub fn new(ctx: &'ctx Context, semantics: IntSemantics) -> Self {
        Self { ctx, semantics }
    }

    /// The Z3 constant standing for a free variable
    pub fn var(&self, name: &str, sort: Sort) -> Term<'ctx> {
        match (sort, self.semantics) {
            (Sort::String, _) => Term::Str(ast::String::new_const(self.ctx, name)),
            (Sort::Bool, _) => Term::Bool(ast::Bool::new_const(self.ctx, name)),
            (Sort::Int, IntSemantics::Unbounded) => Term::Int(ast::Int::new_const(self.ctx, name)),
            (Sort::Int, IntSemantics::Wrapping { bits }) => {
                Term::Bv(ast::BV::new_const(self.ctx, name, bits))
            }
        }
    }

    fn int_literal(&self, value: i64) -> Term<'ctx> {
        match self.semantics {
            IntSemantics::Unbounded => Term::Int(ast::Int::from_i64(self.ctx, value)),
            IntSemantics::Wrapping { bits } => Term::Bv(ast::BV::from_i64(self.ctx, value, bits)),
        }
    }

    fn str_literal(&self, value: &str) -> Result<ast::String<'ctx>> {
        ast::String::from_str(self.ctx, value).map_err(|_| {
            AnalysisError::type_mismatch(format!("string literal {:?} contains a NUL byte", value))
        })
    }

    pub fn lower_value(&self, value: &SymbolicValue) -> Result<Term<'ctx>> {
        match value {
            SymbolicValue::Literal(ConcreteValue::Str(s)) => Ok(Term::Str(self.str_literal(s)?)),
            SymbolicValue::Literal(ConcreteValue::Int(v)) => Ok(self.int_literal(*v)),
            SymbolicValue::Literal(ConcreteValue::Bool(b)) => {
                Ok(Term::Bool(ast::Bool::from_bool(self.ctx, *b)))
            }
            SymbolicValue::FreeVar { name, sort } => Ok(self.var(name, *sort)),
            SymbolicValue::Concat(parts) => {
                let mut lowered = Vec::with_capacity(parts.len());
                self.lower_concat_leaves(parts, &mut lowered)?;
                match lowered.len() {
                    0 => Ok(Term::Str(self.str_literal("")?)),
                    1 => Ok(Term::Str(lowered.remove(0))),
                    _ => {
                        let refs: Vec<&ast::String<'ctx>> = lowered.iter().collect();
                        Ok(Term::Str(ast::String::concat(self.ctx, &refs)))
                    }
                }
            }
            SymbolicValue::Arith { op, left, right } => {
                let l = self.lower_value(left)?;
                let r = self.lower_value(right)?;
                self.lower_arith(*op, l, r)
            }
            SymbolicValue::Ite {
                cond,
                then,
                otherwise,
            } => {
                let c = self.lower_guard(cond)?;
                match (self.lower_value(then)?, self.lower_value(otherwise)?) {
                    (Term::Str(a), Term::Str(b)) => Ok(Term::Str(c.ite(&a, &b))),
                    (Term::Int(a), Term::Int(b)) => Ok(Term::Int(c.ite(&a, &b))),
                    (Term::Bv(a), Term::Bv(b)) => Ok(Term::Bv(c.ite(&a, &b))),
                    (Term::Bool(a), Term::Bool(b)) => Ok(Term::Bool(c.ite(&a, &b))),
                    (a, b) => Err(AnalysisError::type_mismatch(format!(
                        "Ite branches are {} and {}",
                        a.kind(),
                        b.kind()
                    ))),
                }
            }
        }
    }

    // Nested concatenations are flattened left-to-right
    fn lower_concat_leaves(
        &self,
        parts: &[SymbolicValue],
        out: &mut Vec<ast::String<'ctx>>,
    ) -> Result<()> {
        for part in parts {
            match part {
                SymbolicValue::Concat(inner) => self.lower_concat_leaves(inner, out)?,
                other => match self.lower_value(other)? {
                    Term::Str(s) => out.push(s),
                    t => {
                        return Err(AnalysisError::type_mismatch(format!(
                            "Concat operand is {}, expected String",
                            t.kind()
                        )))
                    }
                },
            }
        }
        Ok(())
    }

    fn lower_arith(&self, op: ArithOp, l: Term<'ctx>, r: Term<'ctx>) -> Result<Term<'ctx>> {
        match (l, r) {
            (Term::Int(a), Term::Int(b)) => Ok(Term::Int(match op {
                ArithOp::Add => ast::Int::add(self.ctx, &[&a, &b]),
                ArithOp::Sub => ast::Int::sub(self.ctx, &[&a, &b]),
                ArithOp::Mul => ast::Int::mul(self.ctx, &[&a, &b]),
                ArithOp::Div => a.div(&b),
                ArithOp::Rem => a.modulo(&b),
            })),
            (Term::Bv(a), Term::Bv(b)) => Ok(Term::Bv(match op {
                ArithOp::Add => a.bvadd(&b),
                ArithOp::Sub => a.bvsub(&b),
                ArithOp::Mul => a.bvmul(&b),
                ArithOp::Div => a.bvsdiv(&b),
                ArithOp::Rem => a.bvsrem(&b),
            })),
            (a, b) => Err(AnalysisError::type_mismatch(format!(
                "Arith '{}' operands are {} and {}, expected Int",
                op,
                a.kind(),
                b.kind()
            ))),
        }
    }

    pub fn lower_guard(&self, guard: &Guard) -> Result<ast::Bool<'ctx>> {
        match guard {
            Guard::BoolLiteral(b) => Ok(ast::Bool::from_bool(self.ctx, *b)),
            Guard::Compare { op, left, right } => {
                let l = self.lower_value(left)?;
                let r = self.lower_value(right)?;
                self.lower_compare(*op, l, r)
            }
            Guard::Not(inner) => Ok(self.lower_guard(inner)?.not()),
            Guard::And(parts) => {
                let lowered = self.lower_all(parts)?;
                let refs: Vec<&ast::Bool<'ctx>> = lowered.iter().collect();
                Ok(ast::Bool::and(self.ctx, &refs))
            }
            Guard::Or(parts) => {
                let lowered = self.lower_all(parts)?;
                let refs: Vec<&ast::Bool<'ctx>> = lowered.iter().collect();
                Ok(ast::Bool::or(self.ctx, &refs))
            }
            Guard::PrefixOf { prefix, value } => {
                let (p, v) = self.lower_string_pair(prefix, value)?;
                Ok(p.prefix(&v))
            }
            Guard::SuffixOf { suffix, value } => {
                let (s, v) = self.lower_string_pair(suffix, value)?;
                Ok(s.suffix(&v))
            }
        }
    }

    fn lower_all(&self, parts: &[Guard]) -> Result<Vec<ast::Bool<'ctx>>> {
        parts.iter().map(|g| self.lower_guard(g)).collect()
    }

    fn lower_string_pair(
        &self,
        a: &SymbolicValue,
        b: &SymbolicValue,
    ) -> Result<(ast::String<'ctx>, ast::String<'ctx>)> {
        match (self.lower_value(a)?, self.lower_value(b)?) {
            (Term::Str(a), Term::Str(b)) => Ok((a, b)),
            (a, b) => Err(AnalysisError::type_mismatch(format!(
                "prefix/suffix test over {} and {}, expected String",
                a.kind(),
                b.kind()
            ))),
        }
    }

    fn lower_compare(&self, op: CompareOp, l: Term<'ctx>, r: Term<'ctx>) -> Result<ast::Bool<'ctx>> {
        let formula = match (l, r) {
            (Term::Int(a), Term::Int(b)) => match op {
                CompareOp::Lt => a.lt(&b),
                CompareOp::Gt => a.gt(&b),
                CompareOp::Le => a.le(&b),
                CompareOp::Ge => a.ge(&b),
                CompareOp::Eq => a._eq(&b),
                CompareOp::Ne => a._eq(&b).not(),
            },
            (Term::Bv(a), Term::Bv(b)) => match op {
                CompareOp::Lt => a.bvslt(&b),
                CompareOp::Gt => a.bvsgt(&b),
                CompareOp::Le => a.bvsle(&b),
                CompareOp::Ge => a.bvsge(&b),
                CompareOp::Eq => a._eq(&b),
                CompareOp::Ne => a._eq(&b).not(),
            },
            // false < true
            (Term::Bool(a), Term::Bool(b)) => match op {
                CompareOp::Lt => ast::Bool::and(self.ctx, &[&a.not(), &b]),
                CompareOp::Gt => ast::Bool::and(self.ctx, &[&a, &b.not()]),
                CompareOp::Le => ast::Bool::or(self.ctx, &[&a.not(), &b]),
                CompareOp::Ge => ast::Bool::or(self.ctx, &[&a, &b.not()]),
                CompareOp::Eq => a._eq(&b),
                CompareOp::Ne => a._eq(&b).not(),
            },
            (Term::Str(a), Term::Str(b)) => match op {
                CompareOp::Eq => a._eq(&b),
                CompareOp::Ne => a._eq(&b).not(),
                _ => {
                    return Err(AnalysisError::type_mismatch(format!(
                        "String operands only support == and != (got {})",
                        op
                    )))
                }
            },
            (a, b) => {
                return Err(AnalysisError::type_mismatch(format!(
                    "cannot compare {} with {}",
                    a.kind(),
                    b.kind()
                )))
            }
        };
        Ok(formula)
    }
}
