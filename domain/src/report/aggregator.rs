//! Result aggregation for SIMPLE and COMPLEX answers.
//!
//! Both paths render replies as `"<Short> Result\n<text>"` blocks in resolver
//! selection order; only replies accepted by the [`ResponseValidator`] are
//! rendered.

use crate::dispatch::RoundReport;
use crate::resolver::ResolverName;
use crate::validation::ResponseValidator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write;

const SIMPLE_HEADER: &str = "=== Context-Aware Combined Results ===\n\n";
const COMPLEX_HEADER: &str = "=== Decomposed Query Results ===\n\n";

/// Aggregated answer to a SIMPLE query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleAnswer {
    /// Text returned to the caller. Never empty.
    pub text: String,
    /// Validated blocks only; `None` when nothing passed validation
    pub cacheable: Option<String>,
    /// Resolvers whose reply passed validation, in selection order
    pub accepted: Vec<ResolverName>,
}

/// Counts and failure lists closing a COMPLEX report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub processed: usize,
    pub successful: usize,
    /// `<resolver> (subquery: '<text>')`
    pub timeouts: Vec<String>,
    /// `<resolver> (subquery: '<text>'): <message>`
    pub errors: Vec<String>,
}

impl ExecutionSummary {
    fn from_rounds(rounds: &[RoundReport]) -> Self {
        let mut summary = ExecutionSummary {
            processed: rounds.len(),
            ..Default::default()
        };
        for round in rounds {
            summary.successful += round.success_count();
            summary.timeouts.extend(
                round
                    .timeouts()
                    .map(|r| format!("{} (subquery: '{}')", r, round.item)),
            );
            summary.errors.extend(
                round
                    .errors()
                    .map(|(r, msg)| format!("{} (subquery: '{}'): {}", r, round.item, msg)),
            );
        }
        summary
    }

    fn render(&self, out: &mut String) {
        out.push_str("\n=== Execution Summary ===\n");
        let _ = writeln!(out, "Processed {} subqueries", self.processed);
        let _ = writeln!(out, "Successful responses: {}", self.successful);
        if !self.timeouts.is_empty() {
            out.push_str("Timeouts:\n");
            for t in &self.timeouts {
                let _ = writeln!(out, "- {}", t);
            }
        }
        if !self.errors.is_empty() {
            out.push_str("Errors:\n");
            for e in &self.errors {
                let _ = writeln!(out, "- {}", e);
            }
        }
    }
}

/// Aggregated answer to a COMPLEX query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexAnswer {
    /// Full report, sections plus summary. Also the cached text.
    pub text: String,
    pub summary: ExecutionSummary,
}

#[derive(Debug, Clone)]
pub struct ResultAggregator {
    validator: ResponseValidator,
}

impl ResultAggregator {
    pub fn new(validator: ResponseValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &ResponseValidator {
        &self.validator
    }

    /// Replies from `round` that pass validation, in selection order
    pub fn accepted<'a>(&self, round: &'a RoundReport) -> Vec<(&'a ResolverName, &'a str)> {
        round
            .successes()
            .filter(|(name, text)| self.validator.is_valid(name, text))
            .collect()
    }

    /// `active` lists resolvers that gave a valid reply earlier in the
    /// broker's lifetime; it only shows up in the diagnostic.
    pub fn simple(&self, round: &RoundReport, active: &BTreeSet<ResolverName>) -> SimpleAnswer {
        let accepted = self.accepted(round);

        if accepted.is_empty() {
            return SimpleAnswer {
                text: diagnostic(round, active),
                cacheable: None,
                accepted: Vec::new(),
            };
        }

        let mut blocks = String::new();
        for (name, text) in &accepted {
            push_block(&mut blocks, name, text);
        }

        SimpleAnswer {
            text: format!("{}{}", SIMPLE_HEADER, blocks),
            cacheable: Some(blocks),
            accepted: accepted.into_iter().map(|(n, _)| n.clone()).collect(),
        }
    }

    /// `rounds` must be in decomposition order; sections follow it
    pub fn complex(&self, rounds: &[RoundReport]) -> ComplexAnswer {
        let mut out = String::from(COMPLEX_HEADER);

        for round in rounds {
            let _ = writeln!(out, "\n──── Subquery: \"{}\" ────", round.item);
            let accepted = self.accepted(round);
            if accepted.is_empty() {
                out.push_str("No valid results for this subquery\n");
            }
            for (name, text) in accepted {
                push_block(&mut out, name, text);
            }
        }

        let summary = ExecutionSummary::from_rounds(rounds);
        summary.render(&mut out);

        ComplexAnswer { text: out, summary }
    }
}

fn push_block(out: &mut String, name: &ResolverName, text: &str) {
    let _ = write!(out, "{} Result\n{}\n\n", name.short_name(), text);
}

fn bracketed<'a>(names: impl Iterator<Item = &'a ResolverName>) -> String {
    let names: Vec<&str> = names.map(ResolverName::as_str).collect();
    format!("[{}]", names.join(", "))
}

fn diagnostic(round: &RoundReport, active: &BTreeSet<ResolverName>) -> String {
    let mut msg = String::from("No valid results found. ");
    if round.timeouts().next().is_some() {
        let _ = write!(msg, "Timeouts from: {}. ", bracketed(round.timeouts()));
    }
    if round.errors().next().is_some() {
        let _ = write!(
            msg,
            "Errors from: {}. ",
            bracketed(round.errors().map(|(n, _)| n))
        );
    }
    let _ = write!(msg, "Active resolvers: {}", bracketed(active.iter()));
    msg
}
