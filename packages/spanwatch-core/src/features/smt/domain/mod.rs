pub mod outcome;

pub use outcome::{Model, SatOutcome, UnknownReason};
