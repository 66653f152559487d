//! Verdict Domain Models

use crate::features::smt::{Model, SatOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a candidate site
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId {
    /// Sink function path, e.g. `std::fs::write`
    pub function: String,

    /// Sink argument position
    #[serde(default)]
    pub arg_index: usize,

    /// Rendered source span (`file:line:col: line:col`)
    pub span: String,
}

impl SiteId {
    pub fn new(function: impl Into<String>, arg_index: usize, span: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            arg_index,
            span: span.into(),
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] @ {}", self.function, self.arg_index, self.span)
    }
}

/// Which pattern alternative decided the verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: String,
    pub template: String,
    /// Index of the alignment alternative, in boundary order
    pub alternative: usize,
}

/// Decision for one candidate site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub site: SiteId,

    /// Rendered symbolic value of the sink argument
    pub value: String,

    #[serde(flatten)]
    pub outcome: SatOutcome,

    /// Satisfied alternative for SAT, undecided one for UNKNOWN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<PatternMatch>,
}

impl Verdict {
    pub fn new(site: SiteId, value: impl Into<String>, outcome: SatOutcome) -> Self {
        Self {
            site,
            value: value.into(),
            outcome,
            matched: None,
        }
    }

    pub fn with_match(mut self, matched: PatternMatch) -> Self {
        self.matched = Some(matched);
        self
    }

    /// SAT and UNKNOWN are both reported
    pub fn is_dangerous(&self) -> bool {
        !self.outcome.is_unsat()
    }

    pub fn model(&self) -> Option<&Model> {
        self.outcome.model()
    }

    pub fn result_label(&self) -> &'static str {
        self.outcome.label()
    }

    /// The dangerous value this verdict is about: the matched template, or
    /// the rendered site value when no pattern was involved
    pub fn dangerous_value(&self) -> &str {
        self.matched
            .as_ref()
            .map(|m| m.template.as_str())
            .unwrap_or(&self.value)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.site, self.outcome)?;
        if let Some(m) = &self.matched {
            write!(f, " [pattern {} #{}]", m.pattern, m.alternative)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::smt::UnknownReason;

    fn site() -> SiteId {
        SiteId::new("std::fs::write", 0, "src/main.rs:10:5: 10:40")
    }

    #[test]
    fn test_dangerous_classification() {
        assert!(Verdict::new(site(), "x", SatOutcome::sat(Model::new())).is_dangerous());
        assert!(Verdict::new(site(), "x", SatOutcome::unknown(UnknownReason::Timeout)).is_dangerous());
        assert!(!Verdict::new(site(), "x", SatOutcome::Unsat).is_dangerous());
    }

    #[test]
    fn test_dangerous_value_prefers_template() {
        let verdict = Verdict::new(site(), "concat(f0, \"/mem\")", SatOutcome::sat(Model::new()))
            .with_match(PatternMatch {
                pattern: "proc_self_mem".into(),
                template: "/proc/self/mem".into(),
                alternative: 0,
            });
        assert_eq!(verdict.dangerous_value(), "/proc/self/mem");
        assert_eq!(
            verdict.to_string(),
            "std::fs::write[0] @ src/main.rs:10:5: 10:40: SAT [pattern proc_self_mem #0]"
        );
    }

    #[test]
    fn test_json_flattens_outcome() {
        let verdict = Verdict::new(site(), "x", SatOutcome::Unsat);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["result"], "UNSAT");
        assert_eq!(json["site"]["function"], "std::fs::write");
        let back: Verdict = serde_json::from_value(json).unwrap();
        assert_eq!(back, verdict);
    }
}
