//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`] - a validated question received by the broker
//! - [`error::DomainError`] - domain-level errors
//! - [`string::preview`] - single-line previews for logs

pub mod error;
pub mod query;
pub mod string;
