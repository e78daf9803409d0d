//! Session resolution from inbound requests

use crate::utils::parse_cookies;
use async_trait::async_trait;
use hyper::HeaderMap;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// An authenticated caller, resolved from the browser session.
/// Anonymous callers never get a `Session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Stable principal identifier established at login
    pub principal: String,
}

/// Resolves the inbound request to an authenticated session, if any.
/// Implemented by whatever session machinery fronts the gateway.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Session>;
}

/// Cookie-backed session authenticator.
///
/// Sessions are created by the login flow (out of scope here) via `insert`
/// and destroyed on logout or expiry via `remove`.
pub struct CookieSessionAuthenticator {
    cookie_name: String,
    sessions: RwLock<HashMap<String, String>>,
}

impl CookieSessionAuthenticator {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a live session for `principal`
    pub async fn insert(&self, session_id: impl Into<String>, principal: impl Into<String>) {
        self.sessions
            .write()
            .await
            .insert(session_id.into(), principal.into());
    }

    /// Destroy a session (logout or expiry)
    pub async fn remove(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }
}

#[async_trait]
impl SessionAuthenticator for CookieSessionAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Session> {
        let cookie_header = headers.get(hyper::header::COOKIE)?.to_str().ok()?;
        let cookies = parse_cookies(cookie_header);
        let session_id = cookies.get(&self.cookie_name)?;

        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            Some(principal) => Some(Session {
                principal: principal.clone(),
            }),
            None => {
                debug!("No live session for presented '{}' cookie", self.cookie_name);
                None
            }
        }
    }
}
