//! Backend HTTP client management
//!
//! One shared, pooled client for all backend calls: connections to the same
//! backend are reused across requests instead of being re-established per
//! forward.

use crate::config::HttpClientConfig;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Request};
use hyper_rustls::HttpsConnector;
use std::time::Duration;
use tracing::info;

/// Pooled HTTP(S) client for the backend leg
pub struct BackendClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl BackendClient {
    /// Build the client from configuration. The connector serves both http
    /// and https backends, so a single pool covers the whole route table.
    pub fn from_config(config: &HttpClientConfig) -> Self {
        info!(
            "Initializing backend client (max idle per host: {}, idle timeout: {}s, connect timeout: {}s)",
            config.max_idle_per_host, config.idle_timeout_secs, config.connect_timeout_secs
        );

        let mut http_connector = HttpConnector::new();
        http_connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
        http_connector.set_nodelay(true);
        if config.tcp_keepalive {
            http_connector
                .set_keepalive(Some(Duration::from_secs(config.tcp_keepalive_interval_secs)));
        }
        http_connector.enforce_http(false);

        let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http_connector);

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host as usize)
            .build(https_connector);

        Self { client }
    }

    /// Issue a backend request. The request and response bodies are hyper
    /// streams; nothing is buffered here.
    pub fn request(&self, req: Request<Body>) -> hyper::client::ResponseFuture {
        self.client.request(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpClientConfig;

    #[test]
    fn builds_from_default_config() {
        let config = HttpClientConfig::default();
        let _client = BackendClient::from_config(&config);
    }
}
