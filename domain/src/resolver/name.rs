//! Resolver identity value object

use serde::{Deserialize, Serialize};

/// Name of an external resolver (Value Object)
///
/// The transport addresses resolvers by this name and matches replies by
/// sender name, so two names are the same resolver iff the strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolverName(String);

impl ResolverName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display name used in aggregated answers (`WikipediaAgent` → `Wikipedia`)
    pub fn short_name(&self) -> &str {
        match self.0.strip_suffix("Agent") {
            Some(stem) if !stem.is_empty() => stem,
            _ => &self.0,
        }
    }
}

impl std::fmt::Display for ResolverName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResolverName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ResolverName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ResolverName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_agent_suffix() {
        assert_eq!(ResolverName::from("WikipediaAgent").short_name(), "Wikipedia");
        assert_eq!(ResolverName::from("DuckDuckGoAgent").short_name(), "DuckDuckGo");
    }

    #[test]
    fn test_short_name_without_suffix() {
        assert_eq!(ResolverName::from("wolfram").short_name(), "wolfram");
        assert_eq!(ResolverName::from("Agent").short_name(), "Agent");
    }

    #[test]
    fn test_ordering_is_by_name() {
        let mut names = vec![
            ResolverName::from("WikipediaAgent"),
            ResolverName::from("BookSearchAgent"),
            ResolverName::from("DeepInfraAgent"),
        ];
        names.sort();
        assert_eq!(names[0].as_str(), "BookSearchAgent");
        assert_eq!(names[2].as_str(), "WikipediaAgent");
    }

    #[test]
    fn test_serde_transparent() {
        let name = ResolverName::from("TogetherAgent");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"TogetherAgent\"");
    }
}
