//! Bearer-token attachment for outbound backend calls

use crate::auth::{AuthorizedClientStore, Session};
use crate::config::CredentialPolicy;
use crate::error::{Error, Result};
use hyper::header::{HeaderValue, AUTHORIZATION};
use hyper::http::request::Builder;
use tracing::{debug, warn};

/// Attach the caller's stored access token to the outbound request builder.
///
/// When no usable token exists the behavior follows the configured policy:
/// `Forward` returns the builder unmodified (degraded unauthenticated
/// forward, logged), `Require` rejects the call before any backend I/O.
/// Expired tokens count as unavailable; refresh is the login machinery's
/// concern.
pub async fn augment(
    mut builder: Builder,
    session: &Session,
    store: &dyn AuthorizedClientStore,
    registration_id: &str,
    policy: CredentialPolicy,
) -> Result<Builder> {
    let client = store.load(registration_id, &session.principal).await;

    let token = match client {
        Some(client) if !client.access_token.is_expired() => Some(client.access_token),
        Some(_) => {
            debug!(
                principal = %session.principal,
                "Stored access token is expired, treating as unavailable"
            );
            None
        }
        None => None,
    };

    match token {
        Some(token) => {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.value))
                .map_err(|e| Error::Config(format!("stored token is not a valid header: {}", e)))?;
            if let Some(headers) = builder.headers_mut() {
                // insert, not append: the relayed token replaces anything the
                // browser client tried to send itself
                headers.insert(AUTHORIZATION, value);
            }
            Ok(builder)
        }
        None => match policy {
            CredentialPolicy::Forward => {
                warn!(
                    principal = %session.principal,
                    registration_id,
                    "No access token stored, forwarding unauthenticated"
                );
                Ok(builder)
            }
            CredentialPolicy::Require => Err(Error::CredentialUnavailable {
                principal: session.principal.clone(),
                registration_id: registration_id.to_string(),
            }),
        },
    }
}
