//! Query value object

use std::time::SystemTime;

/// A question received by the broker (Value Object)
///
/// Created once at intake and never mutated. Pronoun resolution and
/// decomposition produce new text rather than changing the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    content: String,
    received_at: SystemTime,
}

impl Query {
    /// Create a new query
    ///
    /// # Panics
    /// Panics if the content is empty or only whitespace
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        assert!(!content.trim().is_empty(), "Query cannot be empty");
        Self {
            content,
            received_at: SystemTime::now(),
        }
    }

    /// Try to create a new query, returning None if blank
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self {
                content,
                received_at: SystemTime::now(),
            })
        }
    }

    /// Get the query text as received
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the broker received this query
    pub fn received_at(&self) -> SystemTime {
        self.received_at
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::new(s)
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::new(s)
    }
}

impl std::str::FromStr for Query {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::try_new(s).ok_or(crate::DomainError::EmptyQuery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_creation() {
        let q = Query::new("What is the capital of France?");
        assert_eq!(q.content(), "What is the capital of France?");
        assert!(q.received_at() <= SystemTime::now());
    }

    #[test]
    #[should_panic]
    fn test_empty_query_panics() {
        Query::new("  ");
    }

    #[test]
    fn test_try_new() {
        assert!(Query::try_new("").is_none());
        assert!(Query::try_new("\n\t").is_none());
        assert!(Query::try_new("Who is Elon Musk?").is_some());
    }

    #[test]
    fn test_from_str_rejects_blank() {
        let err = "   ".parse::<Query>().unwrap_err();
        assert_eq!(err, crate::DomainError::EmptyQuery);
    }
}
