//! Guard Domain Models
//!
//! Boolean predicates over symbolic values. Guards appear both as branch
//! conditions on a path and as the alternatives produced by pattern matching.

use super::value::{Sort, SymbolicValue, VarId};
use crate::errors::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Lt,
    Gt,
    Eq,
    Ne,
    Le,
    Ge,
}

impl CompareOp {
    /// Operator with swapped truth value
    pub fn negate(&self) -> Self {
        match self {
            Self::Lt => Self::Ge,
            Self::Gt => Self::Le,
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Le => Self::Gt,
            Self::Ge => Self::Lt,
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Eq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Le => write!(f, "<="),
            Self::Ge => write!(f, ">="),
        }
    }
}

/// Boolean predicate tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    /// Constant truth value
    BoolLiteral(bool),

    /// `left op right`; operands share a sort
    Compare {
        op: CompareOp,
        left: SymbolicValue,
        right: SymbolicValue,
    },

    Not(Box<Guard>),

    /// Conjunction; empty is `true`
    And(Vec<Guard>),

    /// Disjunction; empty is `false`
    Or(Vec<Guard>),

    /// `value` starts with `prefix`
    PrefixOf {
        prefix: SymbolicValue,
        value: SymbolicValue,
    },

    /// `value` ends with `suffix`
    SuffixOf {
        suffix: SymbolicValue,
        value: SymbolicValue,
    },
}

impl Guard {
    pub fn truth() -> Self {
        Self::BoolLiteral(true)
    }

    pub fn falsity() -> Self {
        Self::BoolLiteral(false)
    }

    /// Checked comparison
    pub fn compare(op: CompareOp, left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        let guard = Self::Compare { op, left, right };
        guard.validate()?;
        Ok(guard)
    }

    pub fn eq(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::compare(CompareOp::Eq, left, right)
    }

    pub fn ne(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::compare(CompareOp::Ne, left, right)
    }

    pub fn lt(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::compare(CompareOp::Lt, left, right)
    }

    pub fn gt(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::compare(CompareOp::Gt, left, right)
    }

    pub fn le(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::compare(CompareOp::Le, left, right)
    }

    pub fn ge(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::compare(CompareOp::Ge, left, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Guard) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn and(parts: Vec<Guard>) -> Self {
        Self::And(parts)
    }

    pub fn or(parts: Vec<Guard>) -> Self {
        Self::Or(parts)
    }

    pub fn prefix_of(prefix: SymbolicValue, value: SymbolicValue) -> Result<Self> {
        let guard = Self::PrefixOf { prefix, value };
        guard.validate()?;
        Ok(guard)
    }

    pub fn suffix_of(suffix: SymbolicValue, value: SymbolicValue) -> Result<Self> {
        let guard = Self::SuffixOf { suffix, value };
        guard.validate()?;
        Ok(guard)
    }

    /// Check operand sorts throughout the tree
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::BoolLiteral(_) => Ok(()),
            Self::Compare { op, left, right } => {
                let (ls, rs) = (left.sort()?, right.sort()?);
                if ls != rs {
                    return Err(AnalysisError::type_mismatch(format!(
                        "cannot compare {} with {} ({} {} {})",
                        ls, rs, left, op, right
                    )));
                }
                if ls == Sort::String && !op.is_equality() {
                    return Err(AnalysisError::type_mismatch(format!(
                        "String operands only support == and != (got {})",
                        op
                    )));
                }
                Ok(())
            }
            Self::Not(inner) => inner.validate(),
            Self::And(parts) | Self::Or(parts) => parts.iter().try_for_each(|g| g.validate()),
            Self::PrefixOf { prefix: a, value: b } | Self::SuffixOf { suffix: a, value: b } => {
                let (as_, bs) = (a.sort()?, b.sort()?);
                if as_ != Sort::String || bs != Sort::String {
                    return Err(AnalysisError::type_mismatch(format!(
                        "prefix/suffix test over {} and {}, expected String",
                        as_, bs
                    )));
                }
                Ok(())
            }
        }
    }

    /// Collect free variables, rejecting a name declared with two sorts
    pub fn collect_vars(&self, vars: &mut BTreeMap<VarId, Sort>) -> Result<()> {
        match self {
            Self::BoolLiteral(_) => Ok(()),
            Self::Compare { left, right, .. } => {
                left.collect_vars(vars)?;
                right.collect_vars(vars)
            }
            Self::Not(inner) => inner.collect_vars(vars),
            Self::And(parts) | Self::Or(parts) => {
                parts.iter().try_for_each(|g| g.collect_vars(vars))
            }
            Self::PrefixOf { prefix: a, value: b } | Self::SuffixOf { suffix: a, value: b } => {
                a.collect_vars(vars)?;
                b.collect_vars(vars)
            }
        }
    }

    pub fn is_concrete(&self) -> bool {
        match self {
            Self::BoolLiteral(_) => true,
            Self::Compare { left, right, .. } => left.is_concrete() && right.is_concrete(),
            Self::Not(inner) => inner.is_concrete(),
            Self::And(parts) | Self::Or(parts) => parts.iter().all(|g| g.is_concrete()),
            Self::PrefixOf { prefix: a, value: b } | Self::SuffixOf { suffix: a, value: b } => {
                a.is_concrete() && b.is_concrete()
            }
        }
    }

    /// Number of nodes, operand values included
    pub fn size(&self) -> usize {
        match self {
            Self::BoolLiteral(_) => 1,
            Self::Compare { left, right, .. } => 1 + left.size() + right.size(),
            Self::PrefixOf { prefix: a, value: b } | Self::SuffixOf { suffix: a, value: b } => {
                1 + a.size() + b.size()
            }
            Self::Not(inner) => 1 + inner.size(),
            Self::And(parts) | Self::Or(parts) => 1 + parts.iter().map(Guard::size).sum::<usize>(),
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoolLiteral(b) => write!(f, "{}", b),
            Self::Compare { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Self::Not(inner) => write!(f, "!{}", inner),
            Self::And(parts) | Self::Or(parts) => {
                let (joiner, empty) = if matches!(self, Self::And(_)) {
                    (" && ", "true")
                } else {
                    (" || ", "false")
                };
                if parts.is_empty() {
                    return write!(f, "{}", empty);
                }
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", joiner)?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
            Self::PrefixOf { prefix, value } => write!(f, "prefixof({}, {})", prefix, value),
            Self::SuffixOf { suffix, value } => write!(f, "suffixof({}, {})", suffix, value),
        }
    }
}
