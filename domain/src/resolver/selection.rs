//! Resolver selection for the SIMPLE path and the fixed COMPLEX-path set.

use super::name::ResolverName;
use super::registry::{ResolverRegistry, well_known};
use crate::core::error::DomainError;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

static BOOK_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:book|books|author|authors|novel|novels|publish|published|publication|title|isbn|chapter|pages)\b",
    )
    .expect("book pattern is valid")
});

static ARITHMETIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\s*[+\-*/%^=]\s*\d+").expect("arithmetic pattern is valid")
});

static MATH_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:calculate|compute|solve|equation|math|sum of|product of|derivative|integral|algebra|geometry|trigonometry|calculus|formula|theorem)\b",
    )
    .expect("math vocabulary pattern is valid")
});

static MATH_FUNCTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:sin|cos|tan|log|ln|sqrt|root|square|cube|factorial|permutation|combination)\b",
    )
    .expect("math function pattern is valid")
});

/// Decides whether the gated LLM resolver should see a query.
///
/// Any `Fn(&str) -> bool` closure is a policy, so callers can swap the rule
/// without a new type.
pub trait SuitabilityPolicy: Send + Sync {
    fn is_suitable(&self, query: &str) -> bool;
}

impl<F> SuitabilityPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_suitable(&self, query: &str) -> bool {
        self(query)
    }
}

/// Baseline policy: the gated resolver is kept out of every SIMPLE round.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSuitable;

impl SuitabilityPolicy for NeverSuitable {
    fn is_suitable(&self, _query: &str) -> bool {
        false
    }
}

/// Query domains that pull in specialist resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specialty {
    Books,
    Math,
}

impl Specialty {
    pub fn matches(&self, query: &str) -> bool {
        match self {
            Specialty::Books => BOOK_VOCABULARY.is_match(query),
            Specialty::Math => {
                ARITHMETIC.is_match(query)
                    || MATH_VOCABULARY.is_match(query)
                    || MATH_FUNCTIONS.is_match(query)
            }
        }
    }
}

/// Specialists added when a query falls in their domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRule {
    pub specialty: Specialty,
    pub resolvers: Vec<ResolverName>,
}

impl DomainRule {
    pub fn new(specialty: Specialty, resolvers: impl IntoIterator<Item = ResolverName>) -> Self {
        Self {
            specialty,
            resolvers: resolvers.into_iter().collect(),
        }
    }
}

/// Declarative routing policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    /// Every SIMPLE round starts from this set
    pub general: Vec<ResolverName>,
    /// Resolver removed unless the suitability policy accepts the query
    pub gated: Option<ResolverName>,
    pub specialists: Vec<DomainRule>,
    /// General-purpose resolvers that a domain rule may never add
    pub never_specialized: BTreeSet<ResolverName>,
    /// Fixed set for every COMPLEX sub-query, in report order
    pub complex: Vec<ResolverName>,
}

impl RoutingTable {
    pub fn standard() -> Self {
        use well_known::*;

        Self {
            general: [
                WIKIPEDIA, DUCKDUCKGO, WIKIDATA, OPENROUTER, LANGSEARCH, TOGETHER, DEEPINFRA,
            ]
            .into_iter()
            .map(ResolverName::from)
            .collect(),
            gated: Some(TOGETHER.into()),
            specialists: vec![
                DomainRule::new(Specialty::Books, [BOOK_SEARCH.into()]),
                DomainRule::new(Specialty::Math, [WOLFRAM_ALPHA.into()]),
            ],
            never_specialized: [WIKIPEDIA, DUCKDUCKGO, WIKIDATA]
                .into_iter()
                .map(ResolverName::from)
                .collect(),
            complex: [OPENROUTER, TOGETHER, DEEPINFRA, LANGSEARCH]
                .into_iter()
                .map(ResolverName::from)
                .collect(),
        }
    }

    /// Check that every name the table routes to is registered
    pub fn validate(&self, registry: &ResolverRegistry) -> Result<(), DomainError> {
        let routed = self
            .general
            .iter()
            .chain(self.gated.iter())
            .chain(self.specialists.iter().flat_map(|r| r.resolvers.iter()))
            .chain(self.complex.iter());

        for name in routed {
            registry.require(name)?;
        }
        Ok(())
    }
}

/// Picks the resolvers for a SIMPLE-path query
#[derive(Clone)]
pub struct ResolverSelector {
    table: RoutingTable,
    suitability: Arc<dyn SuitabilityPolicy>,
}

impl ResolverSelector {
    pub fn new(table: RoutingTable) -> Self {
        Self {
            table,
            suitability: Arc::new(NeverSuitable),
        }
    }

    pub fn with_suitability(mut self, policy: impl SuitabilityPolicy + 'static) -> Self {
        self.suitability = Arc::new(policy);
        self
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Resolvers for one SIMPLE round, deduplicated and sorted by name
    pub fn select(&self, query: &str) -> Vec<ResolverName> {
        let mut selected: BTreeSet<ResolverName> = self.table.general.iter().cloned().collect();

        if let Some(gated) = &self.table.gated
            && !self.suitability.is_suitable(query)
        {
            selected.remove(gated);
        }

        for rule in &self.table.specialists {
            if !rule.specialty.matches(query) {
                continue;
            }
            selected.extend(
                rule.resolvers
                    .iter()
                    .filter(|r| !self.table.never_specialized.contains(*r))
                    .cloned(),
            );
        }

        selected.into_iter().collect()
    }

    /// The fixed resolver set every COMPLEX sub-query is sent to
    pub fn complex_resolvers(&self) -> &[ResolverName] {
        &self.table.complex
    }
}

impl Default for ResolverSelector {
    fn default() -> Self {
        Self::new(RoutingTable::standard())
    }
}

impl std::fmt::Debug for ResolverSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverSelector")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
