//! Console output formatter for broker answers

use broker_domain::{BrokerAnswer, ResolverName};
use colored::Colorize;
use std::collections::BTreeSet;

/// Formats broker answers and REPL listings for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete answer.
    ///
    /// The answer text is printed as-is; only its structural lines
    /// (headers, per-resolver titles, sub-query rules) are colored.
    pub fn format(answer: &BrokerAnswer) -> String {
        let mut output = String::new();

        let mut tag = format!("[{}]", answer.kind);
        if answer.cached {
            tag.push_str(" [cached]");
        }
        output.push_str(&format!("{} {}\n\n", tag.dimmed(), answer.resolved.dimmed()));

        for line in answer.text.lines() {
            output.push_str(&Self::highlight(line));
            output.push('\n');
        }

        output
    }

    /// Format as JSON
    pub fn format_json(answer: &BrokerAnswer) -> String {
        serde_json::to_string_pretty(answer).unwrap_or_else(|_| "{}".to_string())
    }

    /// Listing for the REPL `/context` command
    pub fn format_context(entries: &[(String, String)]) -> String {
        if entries.is_empty() {
            return format!("{}\n", "Context is empty".dimmed());
        }

        let mut output = format!("{}\n", "Conversation context:".cyan().bold());
        for (key, value) in entries {
            output.push_str(&format!("  {} = {}\n", key.bold(), value));
        }
        output
    }

    /// Listing for the REPL `/resolvers` command
    pub fn format_resolvers<'a>(
        known: impl IntoIterator<Item = &'a ResolverName>,
        active: &BTreeSet<ResolverName>,
    ) -> String {
        let mut output = format!("{}\n", "Resolvers:".cyan().bold());
        for name in known {
            let mark = if active.contains(name) {
                "active".green()
            } else {
                "-".dimmed()
            };
            output.push_str(&format!("  {:<28} {}\n", name.as_str(), mark));
        }
        output
    }

    fn highlight(line: &str) -> String {
        if line.starts_with("===") {
            line.cyan().bold().to_string()
        } else if line.starts_with("────") {
            line.yellow().bold().to_string()
        } else if line.ends_with(" Result") && line.split(' ').count() == 2 {
            line.green().bold().to_string()
        } else if line.starts_with("No valid results") {
            line.red().to_string()
        } else if line == "Cached Result:" {
            line.bold().to_string()
        } else {
            line.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_domain::{DispatchOutcome, QueryKind, RoundReport};

    fn plain() {
        colored::control::set_override(false);
    }

    fn answer(text: &str) -> BrokerAnswer {
        BrokerAnswer {
            kind: QueryKind::Simple,
            resolved: "What is Rust?".to_string(),
            text: text.to_string(),
            cached: false,
            subqueries: Vec::new(),
            rounds: Vec::new(),
        }
    }

    #[test]
    fn test_format_keeps_answer_text() {
        plain();
        let text = "=== Context-Aware Combined Results ===\n\nWikipedia Result\nRust is a language.";
        let output = ConsoleFormatter::format(&answer(text));

        assert!(output.starts_with("[SIMPLE] What is Rust?\n\n"));
        assert!(output.contains(text));
    }

    #[test]
    fn test_format_marks_cached_answers() {
        plain();
        let cached = BrokerAnswer::from_cache(QueryKind::Simple, "What is Rust?", "stored");
        let output = ConsoleFormatter::format(&cached);
        assert!(output.starts_with("[SIMPLE] [cached]"));
        assert!(output.contains("Cached Result:\nstored"));
    }

    #[test]
    fn test_format_json_includes_rounds() {
        let mut a = answer("x");
        a.rounds.push(RoundReport::new(
            "What is Rust?",
            vec![(
                ResolverName::new("WikipediaAgent"),
                DispatchOutcome::Timeout,
            )],
        ));
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&a)).unwrap();
        assert_eq!(json["kind"], "simple");
        assert_eq!(json["rounds"][0]["item"], "What is Rust?");
    }

    #[test]
    fn test_format_context_listing() {
        plain();
        assert!(ConsoleFormatter::format_context(&[]).contains("empty"));

        let entries = vec![("current_subject".to_string(), "Albert Einstein".to_string())];
        let output = ConsoleFormatter::format_context(&entries);
        assert!(output.contains("current_subject = Albert Einstein"));
    }

    #[test]
    fn test_format_resolvers_marks_active() {
        plain();
        let wiki = ResolverName::new("WikipediaAgent");
        let math = ResolverName::new("MathAgent");
        let active = BTreeSet::from([wiki.clone()]);

        let output = ConsoleFormatter::format_resolvers([&wiki, &math], &active);
        let wiki_line = output.lines().find(|l| l.contains("Wikipedia")).unwrap();
        let math_line = output.lines().find(|l| l.contains("Math")).unwrap();
        assert!(wiki_line.ends_with("active"));
        assert!(math_line.ends_with('-'));
    }
}
