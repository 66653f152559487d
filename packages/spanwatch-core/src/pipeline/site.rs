//! Candidate sites and the integration layer's hand-off format

use crate::errors::{AnalysisError, Result};
use crate::features::symbolic::{Guard, Sort, SymbolicValue};
use crate::features::verdict::SiteId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Supported site batch versions
pub const SITE_BATCH_VERSION: u32 = 1;

/// One sink argument to decide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSite {
    pub id: SiteId,

    /// How the sink argument is assembled
    pub value: SymbolicValue,

    /// Branch guards on the path to the sink, outermost first
    #[serde(default)]
    pub path_conditions: Vec<Guard>,
}

impl CandidateSite {
    pub fn new(id: SiteId, value: SymbolicValue) -> Self {
        Self {
            id,
            value,
            path_conditions: Vec::new(),
        }
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.path_conditions.push(guard);
        self
    }

    pub fn with_guards(mut self, guards: impl IntoIterator<Item = Guard>) -> Self {
        self.path_conditions.extend(guards);
        self
    }

    /// Re-validate a site that arrived deserialized
    ///
    /// The value must be String-typed and every free variable must keep a
    /// single sort across the value and all guards.
    pub fn validate(&self) -> Result<()> {
        let sort = self.value.sort()?;
        if sort != Sort::String {
            return Err(AnalysisError::type_mismatch(format!(
                "sink argument is {}, expected String",
                sort
            )));
        }

        let mut vars = BTreeMap::new();
        self.value.collect_vars(&mut vars)?;
        for guard in &self.path_conditions {
            guard.validate()?;
            guard.collect_vars(&mut vars)?;
        }
        Ok(())
    }
}

/// Versioned batch of candidate sites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteBatch {
    pub version: u32,
    pub sites: Vec<CandidateSite>,
}

impl SiteBatch {
    pub fn new(sites: Vec<CandidateSite>) -> Self {
        Self {
            version: SITE_BATCH_VERSION,
            sites,
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let batch: SiteBatch = serde_json::from_str(content)
            .map_err(|e| AnalysisError::input(format!("invalid site batch: {}", e)))?;
        if batch.version != SITE_BATCH_VERSION {
            return Err(AnalysisError::input(format!(
                "unsupported site batch version {} (supported: {})",
                batch.version, SITE_BATCH_VERSION
            )));
        }
        Ok(batch)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::input(format!("cannot encode site batch: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(value: SymbolicValue) -> CandidateSite {
        CandidateSite::new(SiteId::new("std::fs::write", 0, "src/main.rs:3:5: 3:30"), value)
    }

    #[test]
    fn test_non_string_value_rejected() {
        let err = site(SymbolicValue::int_var("n")).validate().unwrap_err();
        assert!(matches!(err, AnalysisError::TypeMismatch(_)));
    }

    #[test]
    fn test_sort_clash_between_value_and_guard() {
        let candidate = site(SymbolicValue::string_var("x")).with_guard(
            Guard::gt(SymbolicValue::int_var("x"), SymbolicValue::int(0)).unwrap(),
        );
        assert!(matches!(
            candidate.validate(),
            Err(AnalysisError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_batch_json_roundtrip() {
        let batch = SiteBatch::new(vec![site(SymbolicValue::str("/tmp/out"))
            .with_guard(Guard::truth())]);
        let json = batch.to_json().unwrap();
        assert_eq!(SiteBatch::from_json_str(&json).unwrap(), batch);
    }

    #[test]
    fn test_batch_version_checked() {
        let err = SiteBatch::from_json_str(r#"{"version": 2, "sites": []}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Input(_)));
        assert!(err.is_fatal_to_run());
    }

    #[test]
    fn test_guards_default_to_empty() {
        let json = r#"{"version": 1, "sites": [{
            "id": {"function": "std::fs::write", "span": "a.rs:1:1: 1:2"},
            "value": {"literal": "/tmp"}
        }]}"#;
        let batch = SiteBatch::from_json_str(json).unwrap();
        assert!(batch.sites[0].path_conditions.is_empty());
        assert_eq!(batch.sites[0].id.arg_index, 0);
    }
}
