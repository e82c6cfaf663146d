//! Application-level configuration.
//!
//! - [`DispatchParams`] - per-resolver, per-round and overall timeouts

pub mod dispatch_params;

pub use dispatch_params::{DispatchParams, RoundBudget};
