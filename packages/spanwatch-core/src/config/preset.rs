//! Preset configurations
//!
//! Presets fix the solver budget; everything else starts from the same defaults.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI/CD: short solver budget, more UNKNOWN verdicts
    Fast,

    /// Development builds
    #[default]
    Balanced,

    /// Security audit: long solver budget
    Thorough,
}

impl Preset {
    /// Per-call solver timeout for this preset
    pub fn timeout_ms(&self) -> u64 {
        match self {
            Self::Fast => 1_000,
            Self::Balanced => 5_000,
            Self::Thorough => 30_000,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
