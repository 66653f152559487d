//! Path Condition Collector

pub mod collector;

pub use collector::PathConditionCollector;
