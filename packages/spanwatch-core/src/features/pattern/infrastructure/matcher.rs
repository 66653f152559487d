//! Pattern Matcher
//!
//! Turns a pattern and a symbolic string into guard alternatives. The value
//! matches the pattern iff at least one alternative is satisfiable.
//!
//! Fresh variables are named `<pattern>#<role><k>`; `#` never occurs in
//! names handed over by the integration layer, and a collision is reported
//! as a type mismatch.

use crate::errors::{AnalysisError, Result};
use crate::features::pattern::domain::{DangerousPattern, MatchMode, Segment};
use crate::features::symbolic::{concat_parts, Guard, Sort, SymbolicValue};
use std::collections::BTreeMap;
use tracing::trace;

/// Deterministic fresh-variable names for one pattern
struct FreshNames<'a> {
    pattern: &'a str,
    taken: BTreeMap<String, Sort>,
}

impl<'a> FreshNames<'a> {
    fn var(&self, role: &str, k: usize) -> Result<SymbolicValue> {
        let name = format!("{}#{}{}", self.pattern, role, k);
        if self.taken.contains_key(&name) {
            return Err(AnalysisError::type_mismatch(format!(
                "variable '{}' collides with a pattern variable",
                name
            )));
        }
        Ok(SymbolicValue::string_var(name))
    }
}

pub struct PatternMatcher;

impl PatternMatcher {
    /// Guard alternatives for `value` matching `pattern`, in boundary order.
    /// `path` is the site's folded path condition; its variables are reserved too.
    pub fn alternatives(
        pattern: &DangerousPattern,
        value: &SymbolicValue,
        path: &Guard,
    ) -> Result<Vec<Guard>> {
        let sort = value.sort()?;
        if sort != Sort::String {
            return Err(AnalysisError::type_mismatch(format!(
                "pattern '{}' matched against a {} value",
                pattern.name, sort
            )));
        }

        let mut taken = BTreeMap::new();
        value.collect_vars(&mut taken)?;
        path.collect_vars(&mut taken)?;
        let names = FreshNames {
            pattern: &pattern.name,
            taken,
        };

        let template = Self::template_value(pattern, &names)?;
        let alternatives = match pattern.mode {
            MatchMode::Exact => vec![Guard::eq(value.clone(), template)?],
            MatchMode::Contains => Self::contains_alternatives(value, template, &names)?,
        };

        trace!(
            pattern = %pattern.name,
            mode = %pattern.mode,
            alternatives = alternatives.len(),
            "Encoded pattern"
        );
        Ok(alternatives)
    }

    /// Segments as a String value, wildcard `i` bound to `<pattern>#w<i>`
    fn template_value(pattern: &DangerousPattern, names: &FreshNames<'_>) -> Result<SymbolicValue> {
        let mut parts = Vec::with_capacity(pattern.segments.len());
        let mut wildcard = 0;
        for segment in &pattern.segments {
            match segment {
                Segment::Literal(s) => parts.push(SymbolicValue::str(s.clone())),
                Segment::Wildcard => {
                    parts.push(names.var("w", wildcard)?);
                    wildcard += 1;
                }
            }
        }
        SymbolicValue::concat(parts)
    }

    /// One alternative per top-level part `k`: the match starts inside `p_k`.
    ///
    /// `p_k == pre_k ++ rest_k` and `rest_k ++ p_{k+1..} == template ++ post_k`
    fn contains_alternatives(
        value: &SymbolicValue,
        template: SymbolicValue,
        names: &FreshNames<'_>,
    ) -> Result<Vec<Guard>> {
        let mut parts = concat_parts(value);
        if parts.is_empty() {
            parts.push(SymbolicValue::str(""));
        }

        let mut alternatives = Vec::with_capacity(parts.len());
        for k in 0..parts.len() {
            let pre = names.var("pre", k)?;
            let rest = names.var("rest", k)?;
            let post = names.var("post", k)?;

            let split = Guard::eq(parts[k].clone(), SymbolicValue::concat(vec![pre, rest.clone()])?)?;

            let mut tail = Vec::with_capacity(parts.len() - k);
            tail.push(rest);
            tail.extend(parts[k + 1..].iter().cloned());
            let anchored = Guard::eq(
                SymbolicValue::concat(tail)?,
                SymbolicValue::concat(vec![template.clone(), post])?,
            )?;

            alternatives.push(Guard::and(vec![split, anchored]));
        }
        Ok(alternatives)
    }
}
