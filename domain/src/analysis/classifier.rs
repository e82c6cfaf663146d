//! SIMPLE / COMPLEX query classification.

use crate::context::ConversationContext;
use crate::context::conversation::PRONOUN;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CONJUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:and|or|but|then|also|as well as|before|after|while|meanwhile)\b")
        .expect("conjunction pattern is valid")
});

static COMPARISON_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:list|compare|difference|between|advantages|disadvantages|pros|cons)\b")
        .expect("comparison pattern is valid")
});

/// How the broker will handle a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// One dispatch round across the selected resolvers
    Simple,
    /// Decomposed into sub-queries, one round each
    Complex,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Simple => "SIMPLE",
            QueryKind::Complex => "COMPLEX",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first rule that made a query COMPLEX
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityCue {
    Conjunction,
    Separator,
    MultipleQuestions,
    Comparison,
    PronounWithSubject,
}

/// Lexical SIMPLE/COMPLEX classifier. Pure: reads the context, never writes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, query: &str, context: &ConversationContext) -> QueryKind {
        match self.complexity_cue(query, context.has_subject()) {
            Some(_) => QueryKind::Complex,
            None => QueryKind::Simple,
        }
    }

    /// Which rule, if any, marks `query` as COMPLEX
    pub fn complexity_cue(&self, query: &str, has_subject: bool) -> Option<ComplexityCue> {
        if CONJUNCTION.is_match(query) {
            return Some(ComplexityCue::Conjunction);
        }
        if query.contains(',') || query.contains(';') {
            return Some(ComplexityCue::Separator);
        }
        // a trailing question mark ends the only question; any earlier one starts another
        if query.trim_end().trim_end_matches('?').contains('?') {
            return Some(ComplexityCue::MultipleQuestions);
        }
        if COMPARISON_CUE.is_match(query) {
            return Some(ComplexityCue::Comparison);
        }
        if has_subject && PRONOUN.is_match(query) {
            return Some(ComplexityCue::PronounWithSubject);
        }
        None
    }
}
