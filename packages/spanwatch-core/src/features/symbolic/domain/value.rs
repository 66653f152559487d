//! Symbolic Value Domain Models
//!
//! A symbolic value is an owned expression tree describing how a string,
//! integer or boolean is assembled at a candidate site. Trees are immutable
//! once built; the checked constructors reject ill-sorted compositions up front.

use super::guard::Guard;
use crate::errors::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free variable identifier
pub type VarId = String;

/// Concrete values bound to free variables
pub type Assignment = BTreeMap<VarId, ConcreteValue>;

/// Declared domain of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    String,
    Int,
    Bool,
}

impl Sort {
    /// Value used for a variable the formula does not constrain
    pub fn default_value(&self) -> ConcreteValue {
        match self {
            Self::String => ConcreteValue::Str(String::new()),
            Self::Int => ConcreteValue::Int(0),
            Self::Bool => ConcreteValue::Bool(false),
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "String"),
            Self::Int => write!(f, "Int"),
            Self::Bool => write!(f, "Bool"),
        }
    }
}

/// Concrete value (literal content, model assignment)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConcreteValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ConcreteValue {
    pub fn sort(&self) -> Sort {
        match self {
            Self::Bool(_) => Sort::Bool,
            Self::Int(_) => Sort::Int,
            Self::Str(_) => Sort::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ConcreteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "{:?}", v),
        }
    }
}

/// Integer arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Rem => write!(f, "%"),
        }
    }
}

/// Symbolic value tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicValue {
    /// Concrete value
    Literal(ConcreteValue),

    /// Attacker-controlled variable
    FreeVar { name: VarId, sort: Sort },

    /// Ordered concatenation of String-typed values
    Concat(Vec<SymbolicValue>),

    /// Integer arithmetic over Int-typed values
    Arith {
        op: ArithOp,
        left: Box<SymbolicValue>,
        right: Box<SymbolicValue>,
    },

    /// Guarded choice between two values of the same sort
    Ite {
        cond: Box<Guard>,
        then: Box<SymbolicValue>,
        otherwise: Box<SymbolicValue>,
    },
}

impl SymbolicValue {
    pub fn str(value: impl Into<String>) -> Self {
        Self::Literal(ConcreteValue::Str(value.into()))
    }

    pub fn int(value: i64) -> Self {
        Self::Literal(ConcreteValue::Int(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::Literal(ConcreteValue::Bool(value))
    }

    pub fn var(name: impl Into<VarId>, sort: Sort) -> Self {
        Self::FreeVar {
            name: name.into(),
            sort,
        }
    }

    pub fn string_var(name: impl Into<VarId>) -> Self {
        Self::var(name, Sort::String)
    }

    pub fn int_var(name: impl Into<VarId>) -> Self {
        Self::var(name, Sort::Int)
    }

    pub fn bool_var(name: impl Into<VarId>) -> Self {
        Self::var(name, Sort::Bool)
    }

    /// Concatenation; every part must be String-typed
    pub fn concat(parts: Vec<SymbolicValue>) -> Result<Self> {
        for (i, part) in parts.iter().enumerate() {
            let sort = part.sort()?;
            if sort != Sort::String {
                return Err(AnalysisError::type_mismatch(format!(
                    "Concat operand {} is {}, expected String (convert explicitly first)",
                    i, sort
                )));
            }
        }
        Ok(Self::Concat(parts))
    }

    /// Arithmetic; both operands must be Int-typed
    pub fn arith(op: ArithOp, left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        let (ls, rs) = (left.sort()?, right.sort()?);
        if ls != Sort::Int || rs != Sort::Int {
            return Err(AnalysisError::type_mismatch(format!(
                "Arith '{}' operands are {} and {}, expected Int",
                op, ls, rs
            )));
        }
        Ok(Self::Arith {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn add(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::arith(ArithOp::Add, left, right)
    }

    pub fn sub(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::arith(ArithOp::Sub, left, right)
    }

    pub fn mul(left: SymbolicValue, right: SymbolicValue) -> Result<Self> {
        Self::arith(ArithOp::Mul, left, right)
    }

    /// Guarded choice; both branches must share a sort
    pub fn ite(cond: Guard, then: SymbolicValue, otherwise: SymbolicValue) -> Result<Self> {
        cond.validate()?;
        let (ts, es) = (then.sort()?, otherwise.sort()?);
        if ts != es {
            return Err(AnalysisError::type_mismatch(format!(
                "Ite branches are {} and {}",
                ts, es
            )));
        }
        Ok(Self::Ite {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    /// `Path::join` / `PathBuf::push` semantics over symbolic strings:
    /// an empty side yields the other, an absolute component replaces the
    /// base, and a separator is inserted unless the base already ends in one.
    ///
    /// `base` occurs twice in the result, so a chain of `d` nested joins
    /// repeats the innermost base `2^d` times; chains deeper than about 16
    /// should be cut by the integration layer (e.g. as a fresh variable).
    pub fn path_join(base: SymbolicValue, component: SymbolicValue) -> Result<Self> {
        let sep = Self::str("/");
        let empty = Self::str("");

        // "/" ++ base ends in a separator iff base is empty or already ends in one
        let no_sep = Guard::or(vec![
            Guard::eq(component.clone(), empty.clone())?,
            Guard::suffix_of(sep.clone(), Self::concat(vec![sep.clone(), base.clone()])?)?,
        ]);
        let separator = Self::ite(no_sep, empty, sep.clone())?;
        let relative = Self::concat(vec![base, separator, component.clone()])?;

        Self::ite(Guard::prefix_of(sep, component.clone())?, component, relative)
    }

    /// Number of nodes in the tree, guards included
    pub fn size(&self) -> usize {
        match self {
            Self::Literal(_) | Self::FreeVar { .. } => 1,
            Self::Concat(parts) => 1 + parts.iter().map(SymbolicValue::size).sum::<usize>(),
            Self::Arith { left, right, .. } => 1 + left.size() + right.size(),
            Self::Ite {
                cond,
                then,
                otherwise,
            } => 1 + cond.size() + then.size() + otherwise.size(),
        }
    }

    /// Infer the sort, validating the whole tree
    pub fn sort(&self) -> Result<Sort> {
        match self {
            Self::Literal(v) => Ok(v.sort()),
            Self::FreeVar { sort, .. } => Ok(*sort),
            Self::Concat(parts) => {
                for part in parts {
                    if part.sort()? != Sort::String {
                        return Err(AnalysisError::type_mismatch(format!(
                            "Concat operand {} is not String-typed",
                            part
                        )));
                    }
                }
                Ok(Sort::String)
            }
            Self::Arith { op, left, right } => {
                let (ls, rs) = (left.sort()?, right.sort()?);
                if ls != Sort::Int || rs != Sort::Int {
                    return Err(AnalysisError::type_mismatch(format!(
                        "Arith '{}' operands are {} and {}, expected Int",
                        op, ls, rs
                    )));
                }
                Ok(Sort::Int)
            }
            Self::Ite {
                cond,
                then,
                otherwise,
            } => {
                cond.validate()?;
                let (ts, es) = (then.sort()?, otherwise.sort()?);
                if ts != es {
                    return Err(AnalysisError::type_mismatch(format!(
                        "Ite branches are {} and {}",
                        ts, es
                    )));
                }
                Ok(ts)
            }
        }
    }

    /// Collect free variables, rejecting a name declared with two sorts
    pub fn collect_vars(&self, vars: &mut BTreeMap<VarId, Sort>) -> Result<()> {
        match self {
            Self::Literal(_) => Ok(()),
            Self::FreeVar { name, sort } => declare_var(vars, name, *sort),
            Self::Concat(parts) => parts.iter().try_for_each(|p| p.collect_vars(vars)),
            Self::Arith { left, right, .. } => {
                left.collect_vars(vars)?;
                right.collect_vars(vars)
            }
            Self::Ite {
                cond,
                then,
                otherwise,
            } => {
                cond.collect_vars(vars)?;
                then.collect_vars(vars)?;
                otherwise.collect_vars(vars)
            }
        }
    }

    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Literal(_) => true,
            Self::FreeVar { .. } => false,
            Self::Concat(parts) => parts.iter().all(|p| p.is_concrete()),
            Self::Arith { left, right, .. } => left.is_concrete() && right.is_concrete(),
            Self::Ite {
                cond,
                then,
                otherwise,
            } => cond.is_concrete() && then.is_concrete() && otherwise.is_concrete(),
        }
    }
}

pub(crate) fn declare_var(vars: &mut BTreeMap<VarId, Sort>, name: &str, sort: Sort) -> Result<()> {
    match vars.get(name) {
        Some(existing) if *existing != sort => Err(AnalysisError::type_mismatch(format!(
            "variable '{}' used as both {} and {}",
            name, existing, sort
        ))),
        Some(_) => Ok(()),
        None => {
            vars.insert(name.to_string(), sort);
            Ok(())
        }
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "{}", v),
            Self::FreeVar { name, .. } => write!(f, "{}", name),
            Self::Concat(parts) => {
                write!(f, "concat(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
            Self::Arith { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Self::Ite {
                cond,
                then,
                otherwise,
            } => write!(f, "ite({}, {}, {})", cond, then, otherwise),
        }
    }
}
