pub mod pattern;

pub use pattern::{DangerousPattern, MatchMode, PatternSet, Segment};
