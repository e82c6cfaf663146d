//! Infrastructure layer for query-broker
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod cache;
pub mod config;
pub mod logging;
pub mod resolvers;

// Re-export commonly used types
pub use cache::InMemoryKnowledgeCache;
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileContextConfig, FileLoggingConfig,
    FileReplConfig, FileResolversConfig, FileTimeoutsConfig,
};
pub use logging::JsonlExchangeLogger;
#[cfg(feature = "http")]
pub use resolvers::HttpResolverGateway;
pub use resolvers::OfflineResolverGateway;
