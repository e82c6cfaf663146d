//! Resolver gateway port
//!
//! Defines the interface for sending a query to one external resolver and
//! receiving its reply.

use async_trait::async_trait;
use broker_domain::ResolverName;
use thiserror::Error;

/// Errors that can occur while talking to a resolver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("resolver not available")]
    ResolverNotAvailable,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for resolver communication
///
/// Implementations (adapters) live in the infrastructure layer. A call must
/// not retry on its own; the dispatcher bounds it with a deadline and drops
/// the future once that passes.
#[async_trait]
pub trait ResolverGateway: Send + Sync {
    /// Send `text` to `resolver` and wait for its reply
    async fn request(&self, resolver: &ResolverName, text: &str) -> Result<String, GatewayError>;
}
