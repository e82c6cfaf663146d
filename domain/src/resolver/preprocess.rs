//! Resolver-specific request text preprocessing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LEADING_INTERROGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:who|what|when|where|why|how|is|are|was|were|does|do|did)\s+(?:is\s+)?")
        .expect("interrogative pattern is valid")
});

/// How a resolver wants its request text shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preprocessing {
    /// Send the text exactly as the broker has it
    #[default]
    Verbatim,
    /// Keyword-style lookups: drop the leading interrogative and trailing `?`
    KeywordOnly,
}

impl Preprocessing {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Preprocessing::Verbatim => text.to_string(),
            Preprocessing::KeywordOnly => {
                let text = text.trim();
                let stripped = LEADING_INTERROGATIVE.replace(text, "");
                let stripped = stripped.strip_suffix('?').unwrap_or(&stripped);
                stripped.trim().to_string()
            }
        }
    }
}
