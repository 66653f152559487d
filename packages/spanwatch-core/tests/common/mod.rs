//! Common test utilities for spanwatch-core
//!
//! Shared site builders and mock solver backends for integration tests.

#![allow(dead_code)]

mod builders;

pub use builders::*;
