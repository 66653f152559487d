//! Oracle outcome domain models

use crate::features::symbolic::Assignment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Satisfying assignment; covers every free variable of the formula
pub type Model = Assignment;

/// Why a formula was not decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UnknownReason {
    /// The per-call timeout elapsed
    Timeout,
    /// The solver gave up (incomplete theory, resource limit, ...)
    SolverDeclined(String),
    /// The site's value or guards are ill-sorted
    TypeMismatch(String),
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::SolverDeclined(reason) => write!(f, "solver declined: {}", reason),
            Self::TypeMismatch(detail) => write!(f, "type mismatch: {}", detail),
        }
    }
}

/// Oracle answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "UPPERCASE")]
pub enum SatOutcome {
    Sat { model: Model },
    Unsat,
    Unknown { reason: UnknownReason },
}

impl SatOutcome {
    pub fn sat(model: Model) -> Self {
        Self::Sat { model }
    }

    pub fn unknown(reason: UnknownReason) -> Self {
        Self::Unknown { reason }
    }

    pub fn is_sat(&self) -> bool {
        matches!(self, Self::Sat { .. })
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Self::Unsat)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            Self::Sat { model } => Some(model),
            _ => None,
        }
    }

    /// `SAT`, `UNSAT` or `UNKNOWN`
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sat { .. } => "SAT",
            Self::Unsat => "UNSAT",
            Self::Unknown { .. } => "UNKNOWN",
        }
    }
}

impl fmt::Display for SatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { reason } => write!(f, "UNKNOWN ({})", reason),
            other => write!(f, "{}", other.label()),
        }
    }
}
