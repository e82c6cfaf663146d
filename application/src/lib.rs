//! Application layer for query-broker
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DispatchParams, RoundBudget};
pub use ports::{
    exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger},
    knowledge_cache::{KnowledgeCache, NoCache},
    progress::{BrokerProgressNotifier, NoProgress},
    resolver_gateway::{GatewayError, ResolverGateway},
};
pub use use_cases::dispatch::DispatchCoordinator;
pub use use_cases::handle_query::HandleQueryUseCase;
