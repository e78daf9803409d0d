//! Forwarding engine and its collaborators

pub mod augment;
pub mod headers;
pub mod http_client;
pub mod rewrite;
pub mod server;

pub use http_client::BackendClient;
pub use server::{Gateway, GatewayServer};
