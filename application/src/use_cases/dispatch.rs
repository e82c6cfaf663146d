//! Dispatch coordinator
//!
//! Fans a query out to a set of resolvers and collects one outcome per
//! resolver. A round waits for its workers up to the round deadline; a worker
//! waits for its resolver up to the worker deadline, which never lies past
//! the round deadline. COMPLEX queries run all their rounds concurrently
//! under one overall deadline that caps every round deadline in turn.

use crate::config::RoundBudget;
use crate::ports::progress::BrokerProgressNotifier;
use crate::ports::resolver_gateway::{GatewayError, ResolverGateway};
use broker_domain::{
    DispatchOutcome, DispatchRequest, ResolverName, ResolverRegistry, RoundReport, SubQuery,
    preview,
};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

/// Runs dispatch rounds against a resolver gateway
pub struct DispatchCoordinator<G: ResolverGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    registry: Arc<ResolverRegistry>,
}

impl<G: ResolverGateway + ?Sized + 'static> DispatchCoordinator<G> {
    pub fn new(gateway: Arc<G>, registry: Arc<ResolverRegistry>) -> Self {
        Self { gateway, registry }
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    /// One round: every resolver gets `item` (after its preprocessing) once.
    ///
    /// `outer` caps the round deadline. The returned outcomes follow the
    /// order of `resolvers`; a resolver that did not report by the round
    /// deadline is recorded as [`DispatchOutcome::Timeout`].
    pub async fn run_round(
        &self,
        item: &str,
        resolvers: &[ResolverName],
        budget: &RoundBudget,
        outer: Option<Instant>,
        progress: &dyn BrokerProgressNotifier,
    ) -> RoundReport {
        let start = Instant::now();
        let round_deadline = match outer {
            Some(outer) => (start + budget.round_timeout).min(outer),
            None => start + budget.round_timeout,
        };
        let worker_deadline = (start + budget.resolver_timeout).min(round_deadline);

        debug!(
            "Round for '{}' across {} resolvers",
            preview(item, 60),
            resolvers.len()
        );
        progress.on_round_start(item, resolvers);

        let mut join_set = JoinSet::new();

        for resolver in resolvers {
            let request = DispatchRequest::new(
                item,
                resolver.clone(),
                self.registry.preprocess(resolver, item),
            );
            if request.text != request.item {
                debug!("Preprocessed for {}: {}", resolver, request.text);
            }
            let gateway = Arc::clone(&self.gateway);

            join_set.spawn(async move {
                let outcome = Self::dispatch_one(gateway.as_ref(), &request, worker_deadline).await;
                (request.resolver, outcome)
            });
        }

        let mut reported: HashMap<ResolverName, DispatchOutcome> = HashMap::new();
        let mut expired = false;

        loop {
            match timeout_at(round_deadline, join_set.join_next()).await {
                Ok(Some(Ok((resolver, outcome)))) => {
                    match &outcome {
                        DispatchOutcome::Success(_) => debug!("{} replied", resolver),
                        DispatchOutcome::Timeout => warn!("{} timed out", resolver),
                        DispatchOutcome::Error(e) => warn!("{} failed: {}", resolver, e),
                    }
                    progress.on_resolver_complete(item, &resolver, &outcome);
                    reported.insert(resolver, outcome);
                }
                Ok(Some(Err(e))) => {
                    warn!("Task join error: {}", e);
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Round timeout for '{}': {} of {} resolvers reported",
                        preview(item, 60),
                        reported.len(),
                        resolvers.len()
                    );
                    expired = true;
                    break;
                }
            }
        }

        // dropping the set aborts stragglers; their replies are never collected
        drop(join_set);

        let outcomes = resolvers
            .iter()
            .map(|resolver| {
                let outcome = reported.remove(resolver).unwrap_or_else(|| {
                    if expired {
                        DispatchOutcome::Timeout
                    } else {
                        DispatchOutcome::Error("resolver task aborted".to_string())
                    }
                });
                (resolver.clone(), outcome)
            })
            .collect();

        let report = RoundReport::new(item, outcomes);
        progress.on_round_complete(&report);
        report
    }

    /// Concurrent rounds, one per sub-query, bounded by `overall_timeout`.
    ///
    /// Reports come back in sub-query order. A round still running at the
    /// overall deadline is reported with every resolver timed out.
    pub async fn run_rounds(
        &self,
        items: &[SubQuery],
        resolvers: &[ResolverName],
        budget: &RoundBudget,
        overall_timeout: Duration,
        progress: &dyn BrokerProgressNotifier,
    ) -> Vec<RoundReport> {
        let overall_deadline = Instant::now() + overall_timeout;

        let mut pending: FuturesUnordered<_> = items
            .iter()
            .enumerate()
            .map(|(index, item)| async move {
                let report = self
                    .run_round(item.text(), resolvers, budget, Some(overall_deadline), progress)
                    .await;
                (index, report)
            })
            .collect();

        let mut slots: Vec<Option<RoundReport>> = vec![None; items.len()];

        loop {
            match timeout_at(overall_deadline, pending.next()).await {
                Ok(Some((index, report))) => slots[index] = Some(report),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Overall timeout: {} of {} subqueries reported",
                        slots.iter().filter(|s| s.is_some()).count(),
                        items.len()
                    );
                    break;
                }
            }
        }
        drop(pending);

        info!("Completed {} subquery rounds", items.len());

        slots
            .into_iter()
            .zip(items)
            .map(|(slot, item)| {
                slot.unwrap_or_else(|| {
                    let report = RoundReport::abandoned(item.text(), resolvers);
                    progress.on_round_complete(&report);
                    report
                })
            })
            .collect()
    }

    async fn dispatch_one(
        gateway: &G,
        request: &DispatchRequest,
        deadline: Instant,
    ) -> DispatchOutcome {
        match timeout_at(deadline, gateway.request(&request.resolver, &request.text)).await {
            Ok(Ok(text)) => DispatchOutcome::Success(text),
            Ok(Err(GatewayError::Timeout)) | Err(_) => DispatchOutcome::Timeout,
            Ok(Err(e)) => DispatchOutcome::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// How a fake resolver behaves
    #[derive(Clone)]
    pub(crate) enum Script {
        Reply(&'static str),
        /// Reply with the text that was sent
        Echo,
        ReplyAfter(Duration, &'static str),
        Fail(GatewayError),
        Hang,
    }

    /// Gateway whose resolvers follow fixed scripts; unknown resolvers hang
    pub(crate) struct FakeGateway {
        scripts: HashMap<String, Script>,
        pub(crate) requests: Mutex<Vec<(String, String)>>,
    }

    impl FakeGateway {
        pub(crate) fn new<'a>(scripts: impl IntoIterator<Item = (&'a str, Script)>) -> Self {
            Self {
                scripts: scripts
                    .into_iter()
                    .map(|(name, script)| (name.to_string(), script))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn sent(&self) -> Vec<(String, String)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResolverGateway for FakeGateway {
        async fn request(
            &self,
            resolver: &ResolverName,
            text: &str,
        ) -> Result<String, GatewayError> {
            self.requests
                .lock()
                .unwrap()
                .push((resolver.to_string(), text.to_string()));
            let script = self
                .scripts
                .get(resolver.as_str())
                .cloned()
                .unwrap_or(Script::Hang);
            match script {
                Script::Reply(text) => Ok(text.to_string()),
                Script::Echo => Ok(text.to_string()),
                Script::ReplyAfter(delay, text) => {
                    tokio::time::sleep(delay).await;
                    Ok(text.to_string())
                }
                Script::Fail(e) => Err(e),
                Script::Hang => std::future::pending().await,
            }
        }
    }

    fn coordinator(gateway: FakeGateway) -> DispatchCoordinator<FakeGateway> {
        DispatchCoordinator::new(Arc::new(gateway), Arc::new(ResolverRegistry::standard()))
    }

    fn names(list: &[&str]) -> Vec<ResolverName> {
        list.iter().map(|n| ResolverName::new(*n)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_outcomes_in_selection_order() {
        let c = coordinator(FakeGateway::new([
            ("A", Script::ReplyAfter(Duration::from_secs(3), "late but fine")),
            ("B", Script::Reply("quick")),
            ("C", Script::Fail(GatewayError::ConnectionError("refused".into()))),
            ("D", Script::Fail(GatewayError::Timeout)),
        ]));
        let report = c
            .run_round(
                "q",
                &names(&["A", "B", "C", "D"]),
                &RoundBudget::from_secs(15, 20),
                None,
                &NoProgress,
            )
            .await;

        assert_eq!(
            report.outcomes,
            vec![
                ("A".into(), DispatchOutcome::Success("late but fine".into())),
                ("B".into(), DispatchOutcome::Success("quick".into())),
                (
                    "C".into(),
                    DispatchOutcome::Error("Connection error: refused".into())
                ),
                ("D".into(), DispatchOutcome::Timeout),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_resolver_times_out_within_round() {
        let c = coordinator(FakeGateway::new([("A", Script::Reply("answer"))]));
        let start = Instant::now();
        let report = c
            .run_round(
                "q",
                &names(&["A", "Silent"]),
                &RoundBudget::from_secs(15, 20),
                None,
                &NoProgress,
            )
            .await;

        assert!(start.elapsed() <= Duration::from_secs(20));
        assert_eq!(report.outcome(&"A".into()), Some(&DispatchOutcome::Success("answer".into())));
        assert_eq!(report.outcome(&"Silent".into()), Some(&DispatchOutcome::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_after_resolver_timeout_is_discarded() {
        let c = coordinator(FakeGateway::new([(
            "Slow",
            Script::ReplyAfter(Duration::from_secs(16), "too late"),
        )]));
        let report = c
            .run_round(
                "q",
                &names(&["Slow"]),
                &RoundBudget::from_secs(15, 20),
                None,
                &NoProgress,
            )
            .await;
        assert_eq!(report.outcome(&"Slow".into()), Some(&DispatchOutcome::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_outer_deadline_caps_round() {
        let c = coordinator(FakeGateway::new([(
            "Slow",
            Script::ReplyAfter(Duration::from_secs(5), "would be fine"),
        )]));
        let start = Instant::now();
        let report = c
            .run_round(
                "q",
                &names(&["Slow"]),
                &RoundBudget::from_secs(15, 20),
                Some(start + Duration::from_secs(2)),
                &NoProgress,
            )
            .await;
        assert!(start.elapsed() <= Duration::from_secs(2));
        assert_eq!(report.outcome(&"Slow".into()), Some(&DispatchOutcome::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_preprocessing_applies_per_resolver() {
        use broker_domain::well_known::{OPENROUTER, WIKIPEDIA};

        let gateway = Arc::new(FakeGateway::new([
            (WIKIPEDIA, Script::Reply("x")),
            (OPENROUTER, Script::Reply("y")),
        ]));
        let c = DispatchCoordinator::new(
            Arc::clone(&gateway),
            Arc::new(ResolverRegistry::standard()),
        );
        c.run_round(
            "Who is Albert Einstein?",
            &names(&[WIKIPEDIA, OPENROUTER]),
            &RoundBudget::from_secs(15, 20),
            None,
            &NoProgress,
        )
        .await;

        let mut sent = gateway.sent();
        sent.sort();
        assert_eq!(
            sent,
            vec![
                (OPENROUTER.to_string(), "Who is Albert Einstein?".to_string()),
                (WIKIPEDIA.to_string(), "Albert Einstein".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rounds_keep_subquery_order() {
        let c = coordinator(FakeGateway::new([("A", Script::Reply("fine"))]));
        let items = vec![SubQuery::new("first"), SubQuery::new("second"), SubQuery::new("first")];
        let reports = c
            .run_rounds(
                &items,
                &names(&["A"]),
                &RoundBudget::from_secs(20, 25),
                Duration::from_secs(60),
                &NoProgress,
            )
            .await;

        let order: Vec<&str> = reports.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "first"]);
        assert!(reports.iter().all(|r| r.success_count() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overall_timeout_bounds_all_rounds() {
        let c = coordinator(FakeGateway::new([
            ("Fast", Script::Reply("fine")),
            ("Slow", Script::ReplyAfter(Duration::from_secs(8), "late")),
        ]));
        let items = vec![SubQuery::new("one"), SubQuery::new("two")];
        let start = Instant::now();
        let reports = c
            .run_rounds(
                &items,
                &names(&["Fast", "Slow"]),
                &RoundBudget::from_secs(20, 25),
                Duration::from_secs(5),
                &NoProgress,
            )
            .await;

        assert!(start.elapsed() <= Duration::from_secs(5));
        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert_eq!(report.outcome(&"Fast".into()), Some(&DispatchOutcome::Success("fine".into())));
            assert_eq!(report.outcome(&"Slow".into()), Some(&DispatchOutcome::Timeout));
        }
    }
}
