//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Unknown resolver: {0}")]
    UnknownResolver(String),

    #[error("Resolver registered twice: {0}")]
    DuplicateResolver(String),

    #[error("Resolver name cannot be empty")]
    EmptyResolverName,
}

impl DomainError {
    /// Check if this error was caused by an unregistered resolver name
    pub fn is_unknown_resolver(&self) -> bool {
        matches!(self, DomainError::UnknownResolver(_))
    }
}
