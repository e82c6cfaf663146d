//! Resolver gateway adapters.
//!
//! | Adapter | Transport | Feature |
//! |---------|-----------|---------|
//! | [`HttpResolverGateway`] | `POST` JSON to a per-resolver endpoint | `http` |
//! | [`OfflineResolverGateway`] | none; every resolver is unavailable | always |

#[cfg(feature = "http")]
mod http;
mod offline;

#[cfg(feature = "http")]
pub use http::HttpResolverGateway;
pub use offline::OfflineResolverGateway;
