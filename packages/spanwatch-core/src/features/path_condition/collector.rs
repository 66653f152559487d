//! Path Condition Collector
//!
//! Accumulates the branch guards that must hold for a candidate site to
//! execute, in the order the integration layer reports them.

use crate::errors::Result;
use crate::features::symbolic::Guard;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathConditionCollector {
    guards: Vec<Guard>,
}

impl PathConditionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect a guard sequence, validating each guard
    pub fn from_guards(guards: impl IntoIterator<Item = Guard>) -> Result<Self> {
        let mut collector = Self::new();
        for guard in guards {
            collector.push(guard)?;
        }
        Ok(collector)
    }

    /// Append a guard; ill-sorted guards are rejected
    pub fn push(&mut self, guard: Guard) -> Result<()> {
        guard.validate()?;
        self.guards.push(guard);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Conjunction of every collected guard; `true` when empty
    pub fn fold(&self) -> Guard {
        match self.guards.len() {
            0 => Guard::truth(),
            1 => self.guards[0].clone(),
            _ => Guard::and(self.guards.clone()),
        }
    }
}

impl fmt::Display for PathConditionCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AnalysisError;
    use crate::features::symbolic::SymbolicValue;

    fn gt(name: &str, v: i64) -> Guard {
        Guard::gt(SymbolicValue::int_var(name), SymbolicValue::int(v)).unwrap()
    }

    #[test]
    fn test_empty_folds_to_true() {
        assert_eq!(PathConditionCollector::new().fold(), Guard::truth());
    }

    #[test]
    fn test_fold_keeps_order() {
        let collector = PathConditionCollector::from_guards(vec![gt("b", 0), gt("a", 0)]).unwrap();
        assert_eq!(collector.fold(), Guard::And(vec![gt("b", 0), gt("a", 0)]));
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_single_guard_folds_to_itself() {
        let collector = PathConditionCollector::from_guards(vec![gt("n0", 0)]).unwrap();
        assert_eq!(collector.fold(), gt("n0", 0));
    }

    #[test]
    fn test_ill_sorted_guard_rejected() {
        let mut collector = PathConditionCollector::new();
        let bad = Guard::Compare {
            op: crate::features::symbolic::CompareOp::Gt,
            left: SymbolicValue::int_var("n"),
            right: SymbolicValue::boolean(true),
        };
        assert!(matches!(collector.push(bad), Err(AnalysisError::TypeMismatch(_))));
        assert!(collector.is_empty());
    }
}
