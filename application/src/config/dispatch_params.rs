//! Dispatch parameters: timeout layering for rounds.
//!
//! Every round has a per-resolver timeout and a round timeout; COMPLEX
//! queries add one overall timeout across all their rounds. The coordinator
//! turns these into absolute deadlines so an inner wait never outlives an
//! outer one.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBudget {
    /// How long a single resolver may take to reply
    pub resolver_timeout: Duration,
    /// How long the round waits for all of its resolvers
    pub round_timeout: Duration,
}

impl RoundBudget {
    pub fn new(resolver_timeout: Duration, round_timeout: Duration) -> Self {
        Self {
            resolver_timeout,
            round_timeout,
        }
    }

    pub fn from_secs(resolver_secs: u64, round_secs: u64) -> Self {
        Self::new(
            Duration::from_secs(resolver_secs),
            Duration::from_secs(round_secs),
        )
    }
}

/// Timeout parameters for both query paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchParams {
    pub simple: RoundBudget,
    /// Applies to each sub-query round
    pub complex: RoundBudget,
    /// Bounds all sub-query rounds of one COMPLEX query together
    pub overall_timeout: Duration,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            simple: RoundBudget::from_secs(15, 20),
            complex: RoundBudget::from_secs(20, 25),
            overall_timeout: Duration::from_secs(60),
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_simple(mut self, budget: RoundBudget) -> Self {
        self.simple = budget;
        self
    }

    pub fn with_complex(mut self, budget: RoundBudget) -> Self {
        self.complex = budget;
        self
    }

    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = timeout;
        self
    }
}
