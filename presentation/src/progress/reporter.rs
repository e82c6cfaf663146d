//! Progress reporting for query dispatch

use broker_application::BrokerProgressNotifier;
use broker_domain::{DispatchOutcome, QueryKind, ResolverName, RoundReport};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};

/// Reports progress with one bar per dispatch round
pub struct ProgressReporter {
    multi: MultiProgress,
    /// Open bars keyed by round item; sub-queries may repeat, so this is a list
    bars: Mutex<Vec<(String, ProgressBar)>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(Vec::new()),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, item: &str, f: impl FnOnce(&ProgressBar)) {
        let bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, pb)) = bars.iter().find(|(key, _)| key == item) {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerProgressNotifier for ProgressReporter {
    fn on_query_classified(&self, kind: QueryKind, rounds: usize) {
        let _ = self
            .multi
            .println(format!("{} {} query, {} round(s)", "->".cyan(), kind, rounds));
    }

    fn on_round_start(&self, item: &str, resolvers: &[ResolverName]) {
        let pb = self.multi.add(ProgressBar::new(resolvers.len() as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(broker_domain::preview(item, 40));
        pb.set_message("Dispatching...");

        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((item.to_string(), pb));
    }

    fn on_resolver_complete(&self, item: &str, resolver: &ResolverName, outcome: &DispatchOutcome) {
        self.with_bar(item, |pb| {
            let status = match outcome {
                DispatchOutcome::Success(_) => format!("{} {}", "v".green(), resolver.short_name()),
                DispatchOutcome::Timeout => format!("{} {}", "~".yellow(), resolver.short_name()),
                DispatchOutcome::Error(_) => format!("{} {}", "x".red(), resolver.short_name()),
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_round_complete(&self, report: &RoundReport) {
        let mut bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = bars.iter().position(|(key, _)| *key == report.item) {
            let (_, pb) = bars.remove(index);
            pb.finish_with_message(format!(
                "{} ({} of {} replied)",
                "done".green(),
                report.success_count(),
                report.outcomes.len()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wiki() -> ResolverName {
        ResolverName::new("WikipediaAgent")
    }

    #[test]
    fn test_bar_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.on_round_start("Paris", &[wiki()]);
        reporter.on_round_start("Paris", &[wiki()]);
        assert_eq!(reporter.bars.lock().unwrap().len(), 2);

        reporter.on_resolver_complete("Paris", &wiki(), &DispatchOutcome::Success("x".into()));
        assert_eq!(reporter.bars.lock().unwrap()[0].1.position(), 1);

        let report = RoundReport::new("Paris", vec![(wiki(), DispatchOutcome::Timeout)]);
        reporter.on_round_complete(&report);
        assert_eq!(reporter.bars.lock().unwrap().len(), 1);
        reporter.on_round_complete(&report);
        assert!(reporter.bars.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_round_is_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_resolver_complete("nope", &wiki(), &DispatchOutcome::Timeout);
        reporter.on_round_complete(&RoundReport::abandoned("nope", &[wiki()]));
        assert!(reporter.bars.lock().unwrap().is_empty());
    }
}
