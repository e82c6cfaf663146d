//! Decomposition of COMPLEX queries into independently answerable sub-queries.
//!
//! The query is first cut into clauses at `,` `;` and `?`, and conjunctions
//! left dangling at either end of a clause are dropped. A clause that fits a
//! two-sided comparison (`compare A and B`, `A vs B`, `difference between A
//! and B`) is expanded as a whole so its operands stay together; every other
//! clause is split on conjunctions. Emission order is the order things appear
//! in the query.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^,;?]+\??").expect("clause pattern is valid"));

static SPLIT_CONJUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:and|or|but|then|also|versus|vs)\b\.?")
        .expect("split pattern is valid")
});

static EDGE_CONJUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:and|or|but|then|also)\b\s*)+|(?:\s*\b(?:and|or|but|then|also))+$")
        .expect("edge conjunction pattern is valid")
});

static COMPARE_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^compare\s+(.+?)\s+(?:and|with|to|vs\.?|versus)\s+(.+?)\s*\??$")
        .expect("compare pattern is valid")
});

static VERSUS_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:vs\.?|versus)\s+(.+?)\s*\??$").expect("versus form is valid")
});

static DIFFERENCE_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)difference\s+between\s+(.+?)\s+and\s+(.+?)\s*\??$")
        .expect("difference pattern is valid")
});

/// One self-contained piece of a decomposed query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubQuery(String);

impl SubQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Heuristic decomposer. Total: never fails and never returns an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryDecomposer;

impl QueryDecomposer {
    pub fn new() -> Self {
        Self
    }

    pub fn decompose(&self, query: &str) -> Vec<SubQuery> {
        let mut out = Vec::new();

        for clause in CLAUSE.find_iter(query) {
            let clause = EDGE_CONJUNCTION.replace_all(clause.as_str().trim(), "");
            let clause = clause.trim();
            if clause.trim_end_matches('?').trim().is_empty() {
                continue;
            }

            if let Some(parts) = comparative_parts(clause) {
                out.extend(parts);
                continue;
            }

            for part in SPLIT_CONJUNCTION.split(clause) {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                if part.contains('?') {
                    out.extend(
                        part.split('?')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| SubQuery::new(format!("{}?", s))),
                    );
                } else {
                    out.push(SubQuery::new(part));
                }
            }
        }

        // nothing structural found: hand back the query untouched
        if out.is_empty() || (out.len() == 1 && out[0].text() == query.trim()) {
            return vec![SubQuery::new(query)];
        }
        out
    }

    /// Expand a comparison into describe-each-side plus the comparison itself.
    /// Text that fits no comparison form comes back as a single sub-query.
    pub fn split_comparative(&self, text: &str) -> Vec<SubQuery> {
        let text = text.trim();
        comparative_parts(text).unwrap_or_else(|| vec![SubQuery::new(text)])
    }
}

/// Sub-queries for a two-sided comparison, or `None` when `text` is not one.
/// A side that still holds a conjunction or `vs` means more than two
/// operands, so the clause is left to conjunction splitting.
fn comparative_parts(text: &str) -> Option<Vec<SubQuery>> {
    let sides = |c: regex::Captures<'_>| {
        let (a, b) = (c[1].trim().to_string(), c[2].trim().to_string());
        let single = |side: &str| !side.is_empty() && !SPLIT_CONJUNCTION.is_match(side);
        (single(&a) && single(&b)).then_some((a, b))
    };

    if let Some((a, b)) = COMPARE_FORM
        .captures(text)
        .and_then(sides)
        .or_else(|| VERSUS_FORM.captures(text).and_then(sides))
    {
        return Some(vec![
            SubQuery::new(format!("What are the characteristics of {}?", a)),
            SubQuery::new(format!("What are the characteristics of {}?", b)),
            SubQuery::new(format!("Compare {} and {}", a, b)),
        ]);
    }

    let (a, b) = DIFFERENCE_FORM.captures(text).and_then(sides)?;
    Some(vec![
        SubQuery::new(format!("Describe {}", a)),
        SubQuery::new(format!("Describe {}", b)),
        SubQuery::new(format!("What is the difference between {} and {}?", a, b)),
    ])
}
