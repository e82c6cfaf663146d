//! Handle Query use case
//!
//! Intake → classification → dispatch → aggregation for one query.

use crate::config::DispatchParams;
use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
use crate::ports::knowledge_cache::KnowledgeCache;
use crate::ports::progress::{BrokerProgressNotifier, NoProgress};
use crate::ports::resolver_gateway::ResolverGateway;
use crate::use_cases::dispatch::DispatchCoordinator;
use broker_domain::{
    BrokerAnswer, ConversationContext, Query, QueryClassifier, QueryDecomposer, QueryKind,
    ResolverName, ResolverRegistry, ResolverSelector, ResponseValidator, ResultAggregator,
    RoundReport, preview,
};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Use case answering one query at a time against shared broker state
///
/// The conversation context, the cache and the set of resolvers that have
/// ever answered validly live as long as this value.
pub struct HandleQueryUseCase<G: ResolverGateway + ?Sized + 'static> {
    coordinator: DispatchCoordinator<G>,
    context: Arc<ConversationContext>,
    cache: Arc<dyn KnowledgeCache>,
    selector: ResolverSelector,
    classifier: QueryClassifier,
    decomposer: QueryDecomposer,
    aggregator: ResultAggregator,
    params: DispatchParams,
    exchange_log: Arc<dyn ExchangeLogger>,
    active: Mutex<BTreeSet<ResolverName>>,
}

impl<G: ResolverGateway + ?Sized + 'static> HandleQueryUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        registry: Arc<ResolverRegistry>,
        context: Arc<ConversationContext>,
        cache: Arc<dyn KnowledgeCache>,
    ) -> Self {
        Self {
            coordinator: DispatchCoordinator::new(gateway, Arc::clone(&registry)),
            context,
            cache,
            selector: ResolverSelector::default(),
            classifier: QueryClassifier::new(),
            decomposer: QueryDecomposer::new(),
            aggregator: ResultAggregator::new(ResponseValidator::new(registry)),
            params: DispatchParams::default(),
            exchange_log: Arc::new(NoExchangeLogger),
            active: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn with_selector(mut self, selector: ResolverSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_params(mut self, params: DispatchParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_exchange_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.exchange_log = logger;
        self
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn selector(&self) -> &ResolverSelector {
        &self.selector
    }

    pub fn registry(&self) -> &ResolverRegistry {
        self.coordinator.registry()
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    /// Resolvers that produced a valid reply at least once
    pub fn active_resolvers(&self) -> BTreeSet<ResolverName> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, query: &Query) -> BrokerAnswer {
        self.execute_with_progress(query, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    ///
    /// Never fails: timeouts, transport errors and rejected replies all end
    /// up in the answer text.
    pub async fn execute_with_progress(
        &self,
        query: &Query,
        progress: &dyn BrokerProgressNotifier,
    ) -> BrokerAnswer {
        let text = query.content();
        info!("Query received: {}", preview(text, 80));
        self.exchange_log.log(ExchangeEvent::new(
            "query_received",
            json!({ "query": text }),
        ));

        if let Some(subject) = self.context.update_from_query(text) {
            debug!("Current subject is now {}", subject);
        }

        // classify before substitution so a pronoun is still visible
        let kind = self.classifier.classify(text, &self.context);
        let resolved = self.context.resolve_pronouns(text);
        if resolved != text {
            debug!("Resolved pronouns: {}", resolved);
        }
        info!("Query classified as {}", kind);

        let answer = match kind {
            QueryKind::Simple => self.handle_simple(resolved, progress).await,
            QueryKind::Complex => self.handle_complex(resolved, progress).await,
        };

        self.exchange_log.log(ExchangeEvent::new(
            "answer_ready",
            json!({
                "kind": answer.kind,
                "resolved": answer.resolved,
                "cached": answer.cached,
                "answer": answer.text,
            }),
        ));
        answer
    }

    async fn handle_simple(
        &self,
        resolved: String,
        progress: &dyn BrokerProgressNotifier,
    ) -> BrokerAnswer {
        if let Some(stored) = self.cache.get(&resolved) {
            info!("Cache hit for '{}'", preview(&resolved, 60));
            return BrokerAnswer::from_cache(QueryKind::Simple, resolved, &stored);
        }

        let resolvers = self.selector.select(&resolved);
        progress.on_query_classified(QueryKind::Simple, 1);

        let report = self
            .coordinator
            .run_round(&resolved, &resolvers, &self.params.simple, None, progress)
            .await;
        self.log_round(&report);

        let active = self.active_resolvers();
        let simple = self.aggregator.simple(&report, &active);
        self.ingest(&report);

        match &simple.cacheable {
            Some(blocks) => self.cache.put(&resolved, blocks),
            None => info!("No valid results for '{}'", preview(&resolved, 60)),
        }

        BrokerAnswer {
            kind: QueryKind::Simple,
            resolved,
            text: simple.text,
            cached: false,
            subqueries: Vec::new(),
            rounds: vec![report],
        }
    }

    async fn handle_complex(
        &self,
        resolved: String,
        progress: &dyn BrokerProgressNotifier,
    ) -> BrokerAnswer {
        let subqueries = self.decomposer.decompose(&resolved);
        info!("Decomposed into {} subqueries", subqueries.len());
        for (i, sub) in subqueries.iter().enumerate() {
            debug!("Subquery {}: {}", i + 1, sub);
        }
        progress.on_query_classified(QueryKind::Complex, subqueries.len());

        let rounds = self
            .coordinator
            .run_rounds(
                &subqueries,
                self.selector.complex_resolvers(),
                &self.params.complex,
                self.params.overall_timeout,
                progress,
            )
            .await;
        for round in &rounds {
            self.log_round(round);
            self.ingest(round);
        }

        let complex = self.aggregator.complex(&rounds);
        info!(
            "Processed {} subqueries, {} successful responses",
            complex.summary.processed, complex.summary.successful
        );
        self.cache.put(&resolved, &complex.text);

        BrokerAnswer {
            kind: QueryKind::Complex,
            resolved,
            text: complex.text,
            cached: false,
            subqueries,
            rounds,
        }
    }

    /// Feed accepted replies to the context and remember who gave them
    fn ingest(&self, report: &RoundReport) {
        let accepted = self.aggregator.accepted(report);
        for (name, reply) in &accepted {
            if let Some((key, value)) = self.context.update_from_response(reply) {
                debug!("Context {} = {} (from {})", key, value, name);
            }
        }
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(accepted.into_iter().map(|(name, _)| name.clone()));
    }

    fn log_round(&self, report: &RoundReport) {
        self.exchange_log.log(ExchangeEvent::new(
            "round_complete",
            json!({
                "item": report.item,
                "outcomes": report
                    .outcomes
                    .iter()
                    .map(|(name, outcome)| json!({ "resolver": name, "outcome": outcome }))
                    .collect::<Vec<_>>(),
            }),
        ));
    }
}
