//! The answer handed back for one query.

use crate::analysis::{QueryKind, SubQuery};
use crate::dispatch::RoundReport;
use serde::Serialize;

/// Final result of handling one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerAnswer {
    pub kind: QueryKind,
    /// Query text after pronoun resolution; also the cache key
    pub resolved: String,
    pub text: String,
    pub cached: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subqueries: Vec<SubQuery>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundReport>,
}

impl BrokerAnswer {
    /// Cache hits skip dispatch entirely, so there are no rounds to report
    pub fn from_cache(kind: QueryKind, resolved: impl Into<String>, stored: &str) -> Self {
        Self {
            kind,
            resolved: resolved.into(),
            text: format!("Cached Result:\n{}", stored),
            cached: true,
            subqueries: Vec::new(),
            rounds: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_answer_prefix() {
        let answer = BrokerAnswer::from_cache(QueryKind::Simple, "q", "stored");
        assert_eq!(answer.text, "Cached Result:\nstored");
        assert!(answer.cached);
        assert!(answer.rounds.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let answer = BrokerAnswer::from_cache(QueryKind::Complex, "q", "x");
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["kind"], "complex");
        assert_eq!(json["cached"], true);
        assert!(json.get("rounds").is_none());
    }
}
