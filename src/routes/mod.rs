//! Route table: logical service name to backend base URI
//!
//! Built once at startup from configuration and immutable afterwards, so
//! concurrent request flows can share it behind an `Arc` without locking.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use url::Url;

/// Immutable mapping of service name to backend base URI
#[derive(Debug)]
pub struct RouteTable {
    routes: HashMap<String, Url>,
}

impl RouteTable {
    /// Build and validate the table from the configured mapping.
    /// Every backend must be an absolute http(s) URI.
    pub fn from_config(routes: &BTreeMap<String, String>) -> Result<Self> {
        let mut table = HashMap::with_capacity(routes.len());

        for (name, uri) in routes {
            if name.is_empty() || name.contains('/') {
                return Err(Error::Config(format!(
                    "invalid service name '{}' (must be a single non-empty path segment)",
                    name
                )));
            }

            let url = Url::parse(uri)?;
            match url.scheme() {
                "http" | "https" => {}
                other => {
                    return Err(Error::Config(format!(
                        "backend for '{}' must use http or https, got '{}'",
                        name, other
                    )))
                }
            }

            table.insert(name.clone(), url);
        }

        Ok(Self { routes: table })
    }

    /// Pure lookup; an unknown service is the caller's 404.
    pub fn resolve(&self, service: &str) -> Option<&Url> {
        self.routes.get(service)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Configured service names, for startup logging
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_routes() -> BTreeMap<String, String> {
        let mut routes = BTreeMap::new();
        routes.insert("service1".to_string(), "http://localhost:9081".to_string());
        routes.insert("service2".to_string(), "https://internal:9082".to_string());
        routes
    }

    #[test]
    fn resolves_configured_service() {
        let table = RouteTable::from_config(&sample_routes()).unwrap();
        let url = table.resolve("service1").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(9081));
    }

    #[test]
    fn unknown_service_is_none() {
        let table = RouteTable::from_config(&sample_routes()).unwrap();
        assert!(table.resolve("billing").is_none());
    }

    #[test]
    fn rejects_non_http_scheme() {
        let mut routes = BTreeMap::new();
        routes.insert("files".to_string(), "ftp://fileserver:21".to_string());
        assert!(RouteTable::from_config(&routes).is_err());
    }

    #[test]
    fn rejects_relative_uri() {
        let mut routes = BTreeMap::new();
        routes.insert("svc".to_string(), "/just/a/path".to_string());
        assert!(RouteTable::from_config(&routes).is_err());
    }

    #[test]
    fn rejects_service_name_with_slash() {
        let mut routes = BTreeMap::new();
        routes.insert("a/b".to_string(), "http://localhost:9081".to_string());
        assert!(RouteTable::from_config(&routes).is_err());
    }
}
