//! Per-resolver outcomes and per-round reports.

use crate::resolver::ResolverName;
use serde::{Deserialize, Serialize};

/// What one resolver produced for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Reply text as received (not yet validated)
    Success(String),
    /// No reply before the worker's deadline
    Timeout,
    /// Transport failure with its message
    Error(String),
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DispatchOutcome::Timeout)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Success(text) => Some(text),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Short label for logs and progress lines
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Success(_) => "success",
            DispatchOutcome::Timeout => "timeout",
            DispatchOutcome::Error(_) => "error",
        }
    }
}

/// One request to one resolver, built at dispatch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// The (sub-)query this request answers, before preprocessing
    pub item: String,
    pub resolver: ResolverName,
    /// Text actually sent to the resolver
    pub text: String,
}

impl DispatchRequest {
    pub fn new(item: impl Into<String>, resolver: ResolverName, text: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            resolver,
            text: text.into(),
        }
    }
}

/// Outcomes of one round, in resolver selection order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub item: String,
    pub outcomes: Vec<(ResolverName, DispatchOutcome)>,
}

impl RoundReport {
    pub fn new(item: impl Into<String>, outcomes: Vec<(ResolverName, DispatchOutcome)>) -> Self {
        Self {
            item: item.into(),
            outcomes,
        }
    }

    /// A round that never reported: every resolver timed out
    pub fn abandoned(item: impl Into<String>, resolvers: &[ResolverName]) -> Self {
        let outcomes = resolvers
            .iter()
            .map(|r| (r.clone(), DispatchOutcome::Timeout))
            .collect();
        Self::new(item, outcomes)
    }

    pub fn outcome(&self, resolver: &ResolverName) -> Option<&DispatchOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == resolver)
            .map(|(_, outcome)| outcome)
    }

    pub fn successes(&self) -> impl Iterator<Item = (&ResolverName, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| outcome.text().map(|t| (name, t)))
    }

    pub fn timeouts(&self) -> impl Iterator<Item = &ResolverName> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_timeout())
            .map(|(name, _)| name)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&ResolverName, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| outcome.error_message().map(|m| (name, m)))
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RoundReport {
        RoundReport::new(
            "What is Rust?",
            vec![
                ("A".into(), DispatchOutcome::Success("a systems language".into())),
                ("B".into(), DispatchOutcome::Timeout),
                ("C".into(), DispatchOutcome::Error("connection refused".into())),
                ("D".into(), DispatchOutcome::Success("another reply".into())),
            ],
        )
    }

    #[test]
    fn test_partitions_keep_selection_order() {
        let r = report();
        let successes: Vec<_> = r.successes().map(|(n, _)| n.as_str()).collect();
        assert_eq!(successes, vec!["A", "D"]);
        assert_eq!(r.timeouts().map(ResolverName::as_str).collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(
            r.errors().collect::<Vec<_>>(),
            vec![(&ResolverName::new("C"), "connection refused")]
        );
        assert_eq!(r.success_count(), 2);
    }

    #[test]
    fn test_outcome_lookup() {
        let r = report();
        assert_eq!(r.outcome(&"B".into()), Some(&DispatchOutcome::Timeout));
        assert!(r.outcome(&"Z".into()).is_none());
    }

    #[test]
    fn test_abandoned_round_is_all_timeouts() {
        let names: Vec<ResolverName> = vec!["X".into(), "Y".into()];
        let r = RoundReport::abandoned("late", &names);
        assert_eq!(r.item, "late");
        assert_eq!(r.timeouts().count(), 2);
        assert_eq!(r.success_count(), 0);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(DispatchOutcome::Error("boom".into())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "error", "detail": "boom"}));
        let json = serde_json::to_value(DispatchOutcome::Timeout).unwrap();
        assert_eq!(json, serde_json::json!({"status": "timeout"}));
    }
}
