//! Per-session access-token storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A bearer access token issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Association between an authenticated principal and the token issued for
/// one identity-provider registration. At most one live entry exists per
/// (principal, registration) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedClient {
    pub principal: String,
    pub registration_id: String,
    pub access_token: AccessToken,
}

/// Read side of the credential store. Refresh-on-expiry is the login
/// machinery's responsibility, not part of this seam.
#[async_trait]
pub trait AuthorizedClientStore: Send + Sync {
    /// Load the stored client for an already-authenticated principal.
    /// Callers must verify authentication before invoking this.
    async fn load(&self, registration_id: &str, principal: &str) -> Option<AuthorizedClient>;
}

/// In-memory credential store. Writes happen on login and token refresh;
/// the `RwLock` guarantees readers observe a whole token, never a partial
/// update.
#[derive(Default)]
pub struct InMemoryClientStore {
    clients: RwLock<HashMap<(String, String), AuthorizedClient>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the client for its (principal, registration) pair
    pub async fn save(&self, client: AuthorizedClient) {
        let key = (client.registration_id.clone(), client.principal.clone());
        self.clients.write().await.insert(key, client);
    }

    /// Drop the stored client, typically on session destruction
    pub async fn remove(&self, registration_id: &str, principal: &str) {
        self.clients
            .write()
            .await
            .remove(&(registration_id.to_string(), principal.to_string()));
    }
}

#[async_trait]
impl AuthorizedClientStore for InMemoryClientStore {
    async fn load(&self, registration_id: &str, principal: &str) -> Option<AuthorizedClient> {
        self.clients
            .read()
            .await
            .get(&(registration_id.to_string(), principal.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(value: &str, ttl_secs: i64) -> AccessToken {
        AccessToken {
            value: value.to_string(),
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
        }
    }

    fn client(principal: &str, registration_id: &str, token_value: &str) -> AuthorizedClient {
        AuthorizedClient {
            principal: principal.to_string(),
            registration_id: registration_id.to_string(),
            access_token: token(token_value, 3600),
        }
    }

    #[tokio::test]
    async fn load_returns_saved_client() {
        let store = InMemoryClientStore::new();
        store.save(client("alice", "idp", "tok-1")).await;

        let loaded = store.load("idp", "alice").await.unwrap();
        assert_eq!(loaded.access_token.value, "tok-1");
    }

    #[tokio::test]
    async fn load_is_empty_for_unknown_principal() {
        let store = InMemoryClientStore::new();
        assert!(store.load("idp", "mallory").await.is_none());
    }

    #[tokio::test]
    async fn save_replaces_existing_entry() {
        let store = InMemoryClientStore::new();
        store.save(client("alice", "idp", "tok-1")).await;
        store.save(client("alice", "idp", "tok-2")).await;

        let loaded = store.load("idp", "alice").await.unwrap();
        assert_eq!(loaded.access_token.value, "tok-2");
    }

    #[tokio::test]
    async fn remove_destroys_entry() {
        let store = InMemoryClientStore::new();
        store.save(client("alice", "idp", "tok-1")).await;
        store.remove("idp", "alice").await;

        assert!(store.load("idp", "alice").await.is_none());
    }

    #[test]
    fn expiry_check() {
        assert!(token("t", -1).is_expired());
        assert!(!token("t", 60).is_expired());
    }
}
