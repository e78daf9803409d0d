//! Session authentication and per-session credential storage
//!
//! The login flow itself (identity-provider redirects, code exchange) lives
//! outside this crate; these are the seams the forwarding engine consumes.

pub mod session;
pub mod store;

pub use session::{CookieSessionAuthenticator, Session, SessionAuthenticator};
pub use store::{AccessToken, AuthorizedClient, AuthorizedClientStore, InMemoryClientStore};
