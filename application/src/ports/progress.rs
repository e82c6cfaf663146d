//! Progress notification port
//!
//! Defines the interface for reporting progress while a query is dispatched.

use broker_domain::{DispatchOutcome, QueryKind, ResolverName, RoundReport};

/// Callback for progress updates during dispatch
///
/// Implementations live in the presentation layer. Callbacks are invoked from
/// the round's collector loop, never from resolver workers.
pub trait BrokerProgressNotifier: Send + Sync {
    /// Called once per query, after classification
    fn on_query_classified(&self, _kind: QueryKind, _rounds: usize) {}

    /// Called when a round starts
    fn on_round_start(&self, item: &str, resolvers: &[ResolverName]);

    /// Called when a resolver reports within a round
    fn on_resolver_complete(&self, item: &str, resolver: &ResolverName, outcome: &DispatchOutcome);

    /// Called when a round completes (including by timeout)
    fn on_round_complete(&self, report: &RoundReport);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl BrokerProgressNotifier for NoProgress {
    fn on_round_start(&self, _item: &str, _resolvers: &[ResolverName]) {}
    fn on_resolver_complete(&self, _item: &str, _resolver: &ResolverName, _outcome: &DispatchOutcome) {}
    fn on_round_complete(&self, _report: &RoundReport) {}
}
