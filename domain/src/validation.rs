//! Response validation: resolver-specific acceptance predicates.
//!
//! Each resolver class has a profile. A profile is a small table of phrases
//! and whole words that mark a reply as noise, plus a minimum size. Rejection
//! is not an error: the reply is simply left out of aggregation.

use crate::resolver::{ResolverName, ResolverRegistry};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

static STRICT_LLM_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\berror\b|\bno (?:result|response)\b").expect("strict pattern is valid")
});

static APOLOGY_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:sorry|unable)\b").expect("apology pattern is valid"));

/// Acceptance profile of a resolver class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationProfile {
    /// Completion service that reports failures inline
    LlmStrict,
    /// Web search returning a title line followed by results
    WebSearch,
    /// Chatty completion service that apologises instead of failing
    LlmConversational,
    /// Knowledge lookups and anything unclassified
    #[default]
    General,
}

struct AcceptanceRule {
    reject_phrases: &'static [&'static str],
    reject_words: Option<&'static Regex>,
    /// Reply must be strictly longer than this many characters
    min_chars: usize,
    min_lines: usize,
}

impl ValidationProfile {
    fn rule(&self) -> AcceptanceRule {
        match self {
            ValidationProfile::LlmStrict => AcceptanceRule {
                reject_phrases: &["api error", "connection error"],
                reject_words: Some(&*STRICT_LLM_WORDS),
                min_chars: 30,
                min_lines: 0,
            },
            ValidationProfile::WebSearch => AcceptanceRule {
                reject_phrases: &["no results found", "error fetching", "api error"],
                reject_words: None,
                min_chars: 50,
                min_lines: 2,
            },
            ValidationProfile::LlmConversational => AcceptanceRule {
                reject_phrases: &[
                    "i cannot answer",
                    "i don't know",
                    "no response content",
                    "api error",
                    "connection error",
                ],
                reject_words: Some(&*APOLOGY_WORDS),
                min_chars: 50,
                min_lines: 0,
            },
            ValidationProfile::General => AcceptanceRule {
                reject_phrases: &[
                    "error",
                    "no result",
                    "not found",
                    "page not found",
                    "unknown source",
                ],
                reject_words: None,
                min_chars: 20,
                min_lines: 0,
            },
        }
    }

    /// Pure acceptance check; blank text is always rejected
    pub fn accepts(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let rule = self.rule();
        let lower = text.to_lowercase();

        if rule.reject_phrases.iter().any(|p| lower.contains(p)) {
            return false;
        }
        if rule.reject_words.is_some_and(|w| w.is_match(text)) {
            return false;
        }
        if text.chars().count() <= rule.min_chars {
            return false;
        }
        // trailing newlines do not count as extra lines
        rule.min_lines == 0 || text.trim_end_matches('\n').split('\n').count() >= rule.min_lines
    }
}

/// Judges resolver replies by the profile the registry assigns them
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    registry: Arc<ResolverRegistry>,
}

impl ResponseValidator {
    pub fn new(registry: Arc<ResolverRegistry>) -> Self {
        Self { registry }
    }

    pub fn is_valid(&self, resolver: &ResolverName, text: &str) -> bool {
        self.registry.profile_of(resolver).accepts(text)
    }
}
