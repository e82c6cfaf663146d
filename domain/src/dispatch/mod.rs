//! Dispatch records: what was asked of each resolver and what came back.

pub mod outcome;

pub use outcome::{DispatchOutcome, DispatchRequest, RoundReport};
