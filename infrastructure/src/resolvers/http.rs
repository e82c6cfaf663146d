//! HTTP resolver gateway.
//!
//! Each resolver is reached at its own endpoint URL. A request is a `POST`
//! with body `{"resolver": <name>, "query": <text>}`; a 2xx response body,
//! read as plain text, is the reply.

use async_trait::async_trait;
use broker_application::ports::resolver_gateway::{GatewayError, ResolverGateway};
use broker_domain::ResolverName;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct ResolveRequest<'a> {
    resolver: &'a str,
    query: &'a str,
}

/// Gateway posting queries to per-resolver HTTP endpoints
pub struct HttpResolverGateway {
    client: reqwest::Client,
    endpoints: BTreeMap<ResolverName, String>,
}

impl HttpResolverGateway {
    /// `timeout` is the client-side limit for one exchange; hitting it
    /// reports [`GatewayError::Timeout`]
    pub fn new<I, K, V>(endpoints: I, timeout: Duration) -> Result<Self, reqwest::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ResolverName>,
        V: Into<String>,
    {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("query-broker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoints: endpoints
                .into_iter()
                .map(|(name, url)| (name.into(), url.into()))
                .collect(),
        })
    }

    pub fn endpoint(&self, resolver: &ResolverName) -> Option<&str> {
        self.endpoints.get(resolver).map(String::as_str)
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl ResolverGateway for HttpResolverGateway {
    async fn request(&self, resolver: &ResolverName, text: &str) -> Result<String, GatewayError> {
        let url = self
            .endpoint(resolver)
            .ok_or(GatewayError::ResolverNotAvailable)?;

        debug!("POST {} for {}", url, resolver);
        let response = self
            .client
            .post(url)
            .json(&ResolveRequest {
                resolver: resolver.as_str(),
                query: text,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response.text().await.map_err(transport_error)
    }
}
