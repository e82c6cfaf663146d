//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod exchange_logger;
pub mod knowledge_cache;
pub mod progress;
pub mod resolver_gateway;
