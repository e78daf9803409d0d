//! Configuration management for the gateway

pub mod settings;

pub use settings::{AuthConfig, CredentialPolicy, GatewayConfig, HttpClientConfig};
