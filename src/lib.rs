//! Session Gateway - a session-authenticated streaming reverse proxy
//!
//! Browser clients authenticate once against an identity provider; the
//! gateway forwards their API calls to the configured backend for each
//! service, relaying the stored access token as a bearer credential on the
//! backend leg while keeping session cookies out of the backends and
//! backend cookies out of the browser.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod proxy;
pub mod routes;
pub mod utils;

// Re-export commonly used items
pub use auth::{
    AccessToken, AuthorizedClient, AuthorizedClientStore, CookieSessionAuthenticator,
    InMemoryClientStore, Session, SessionAuthenticator,
};
pub use config::{CredentialPolicy, GatewayConfig};
pub use error::{Error, Result};
pub use logging::{init_logger_with_config, init_logger_with_env};
pub use models::ForwardRecord;
pub use proxy::{Gateway, GatewayServer};
pub use routes::RouteTable;
