//! Gateway used when no transport is compiled in.

use async_trait::async_trait;
use broker_application::ports::resolver_gateway::{GatewayError, ResolverGateway};
use broker_domain::ResolverName;

/// Reports every resolver as unavailable; answers degrade to diagnostics.
pub struct OfflineResolverGateway;

#[async_trait]
impl ResolverGateway for OfflineResolverGateway {
    async fn request(&self, _resolver: &ResolverName, _text: &str) -> Result<String, GatewayError> {
        Err(GatewayError::ResolverNotAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_resolver_unavailable() {
        let err = OfflineResolverGateway
            .request(&"WikipediaAgent".into(), "Paris")
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::ResolverNotAvailable);
        assert_eq!(err.to_string(), "resolver not available");
    }
}
