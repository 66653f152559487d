//! Dangerous Pattern Domain Models
//!
//! A dangerous pattern is a named path template. Templates are written as
//! plain strings: `*` is a wildcard matching any (possibly empty) string,
//! `\` escapes the next character (`\*` is a literal star).

use crate::config::PatternConfig;
use crate::errors::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Template segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Literal(String),
    Wildcard,
}

/// How a template is matched against a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The whole value equals the template
    #[default]
    Exact,
    /// The template occurs somewhere in the value
    Contains,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

/// Compiled dangerous pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DangerousPattern {
    pub name: String,
    pub segments: Vec<Segment>,
    pub mode: MatchMode,
    /// Sink functions this pattern applies to (empty = all)
    pub sinks: Vec<String>,
    /// Sink argument this pattern applies to (None = all)
    pub arg_index: Option<usize>,
}

impl DangerousPattern {
    /// Parse a template string into a pattern
    pub fn parse(name: impl Into<String>, template: &str, mode: MatchMode) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AnalysisError::malformed_pattern(name, "empty pattern name"));
        }
        let segments = parse_segments(&name, template)?;
        Ok(Self {
            name,
            segments,
            mode,
            sinks: Vec::new(),
            arg_index: None,
        })
    }

    pub fn from_config(config: &PatternConfig) -> Result<Self> {
        let mut pattern = Self::parse(config.name.clone(), &config.template, config.mode)?;
        pattern.sinks = config.sinks.clone();
        pattern.arg_index = config.arg_index;
        Ok(pattern)
    }

    pub fn wildcard_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Wildcard))
            .count()
    }

    pub fn is_wildcard_free(&self) -> bool {
        self.wildcard_count() == 0
    }

    /// Whether a site with this sink function and argument is in scope
    pub fn applies_to(&self, function: &str, arg_index: usize) -> bool {
        let sink_ok = self.sinks.is_empty() || self.sinks.iter().any(|s| s == function);
        let arg_ok = self.arg_index.map_or(true, |i| i == arg_index);
        sink_ok && arg_ok
    }
}

fn parse_segments(name: &str, template: &str) -> Result<Vec<Segment>> {
    if template.is_empty() {
        return Err(AnalysisError::malformed_pattern(name, "empty template"));
    }

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => literal.push(escaped),
                None => {
                    return Err(AnalysisError::malformed_pattern(
                        name,
                        "trailing escape character",
                    ))
                }
            },
            '*' => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                if matches!(segments.last(), Some(Segment::Wildcard)) {
                    return Err(AnalysisError::malformed_pattern(name, "adjacent wildcards"));
                }
                segments.push(Segment::Wildcard);
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    if segments.iter().all(|s| matches!(s, Segment::Wildcard)) {
        return Err(AnalysisError::malformed_pattern(
            name,
            "template has no literal segment and would match every value",
        ));
    }

    Ok(segments)
}

impl fmt::Display for DangerousPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Wildcard => write!(f, "*")?,
                Segment::Literal(s) => write!(f, "{}", s.replace('\\', "\\\\").replace('*', "\\*"))?,
            }
        }
        Ok(())
    }
}

/// Ordered, name-unique pattern set
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<DangerousPattern>,
}

impl PatternSet {
    /// Compile configured patterns, keeping configuration order
    pub fn compile(configs: &[PatternConfig]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(configs.len());
        for config in configs {
            if !seen.insert(config.name.as_str()) {
                return Err(AnalysisError::malformed_pattern(
                    config.name.clone(),
                    "duplicate pattern name",
                ));
            }
            patterns.push(DangerousPattern::from_config(config)?);
        }
        Ok(Self { patterns })
    }

    pub fn from_patterns(patterns: Vec<DangerousPattern>) -> Result<Self> {
        let mut seen = HashSet::new();
        for p in &patterns {
            if !seen.insert(p.name.as_str()) {
                return Err(AnalysisError::malformed_pattern(
                    p.name.clone(),
                    "duplicate pattern name",
                ));
            }
        }
        Ok(Self { patterns })
    }

    pub fn applicable<'a>(
        &'a self,
        function: &'a str,
        arg_index: usize,
    ) -> impl Iterator<Item = &'a DangerousPattern> + 'a {
        self.patterns
            .iter()
            .filter(move |p| p.applies_to(function, arg_index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DangerousPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_patterns;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    #[test]
    fn test_parse_wildcard_free() {
        let p = DangerousPattern::parse("mem", "/proc/self/mem", MatchMode::Exact).unwrap();
        assert_eq!(p.segments, vec![lit("/proc/self/mem")]);
        assert!(p.is_wildcard_free());
    }

    #[test]
    fn test_parse_wildcards() {
        let p = DangerousPattern::parse("pid_mem", "/proc/*/mem", MatchMode::Exact).unwrap();
        assert_eq!(p.segments, vec![lit("/proc/"), Segment::Wildcard, lit("/mem")]);
        assert_eq!(p.wildcard_count(), 1);
    }

    #[test]
    fn test_escaped_star_is_literal() {
        let p = DangerousPattern::parse("star", r"rm -rf \*", MatchMode::Exact).unwrap();
        assert_eq!(p.segments, vec![lit("rm -rf *")]);
        assert_eq!(p.to_string(), r"rm -rf \*");
    }

    #[test]
    fn test_malformed_templates() {
        for (template, reason) in [
            ("", "empty template"),
            ("/proc/**", "adjacent wildcards"),
            ("*", "no literal segment"),
            (r"/proc\", "trailing escape"),
        ] {
            match DangerousPattern::parse("p", template, MatchMode::Exact) {
                Err(AnalysisError::MalformedPattern { reason: r, .. }) => {
                    assert!(r.contains(reason), "{:?}: {}", template, r)
                }
                other => panic!("{:?} should be malformed, got {:?}", template, other),
            }
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(DangerousPattern::parse(" ", "/proc", MatchMode::Exact).is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let configs = vec![
            PatternConfig::new("p", "/a"),
            PatternConfig::new("p", "/b"),
        ];
        assert!(matches!(
            PatternSet::compile(&configs),
            Err(AnalysisError::MalformedPattern { .. })
        ));
    }

    #[test]
    fn test_default_set_applicability() {
        let set = PatternSet::compile(&default_patterns()).unwrap();
        let names: Vec<_> = set
            .applicable("std::fs::write", 0)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["proc_self_mem", "proc_any"]);
        assert_eq!(set.applicable("std::fs::write", 1).count(), 0);
        assert_eq!(set.applicable("std::env::set_var", 0).count(), 1);
    }

    #[test]
    fn test_unscoped_pattern_applies_everywhere() {
        let p = DangerousPattern::parse("any", "/etc/shadow", MatchMode::Contains).unwrap();
        assert!(p.applies_to("my::write", 3));
    }
}
