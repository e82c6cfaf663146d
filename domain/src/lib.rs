//! Domain layer for query-broker
//!
//! This crate contains the broker's decision logic: how a query is
//! classified and decomposed, which resolvers it is routed to, which replies
//! are accepted and how accepted replies become an answer. It performs no
//! I/O and has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Query kinds
//!
//! - **SIMPLE**: one dispatch round across the resolvers picked by the
//!   [`ResolverSelector`]
//! - **COMPLEX**: decomposed into [`SubQuery`] items, one round each against
//!   a fixed set of completion resolvers
//!
//! ## Conversation context
//!
//! A single [`ConversationContext`] lives as long as the broker. It resolves
//! pronouns to the last named subject and records facts picked out of
//! accepted replies.

pub mod analysis;
pub mod context;
pub mod core;
pub mod dispatch;
pub mod report;
pub mod resolver;
pub mod validation;

pub use analysis::{ComplexityCue, QueryClassifier, QueryDecomposer, QueryKind, SubQuery};
pub use context::{CURRENT_SUBJECT, ConversationContext, SubjectCatalog};
pub use core::{error::DomainError, query::Query, string::preview};
pub use dispatch::{DispatchOutcome, DispatchRequest, RoundReport};
pub use report::{BrokerAnswer, ComplexAnswer, ExecutionSummary, ResultAggregator, SimpleAnswer};
pub use resolver::{
    DomainRule, NeverSuitable, Preprocessing, ResolverName, ResolverRegistry, ResolverSelector,
    ResolverSpec, RoutingTable, Specialty, SuitabilityPolicy, well_known,
};
pub use validation::{ResponseValidator, ValidationProfile};
