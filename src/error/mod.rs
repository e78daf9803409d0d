//! Error handling module for the gateway

use hyper::StatusCode;
use thiserror::Error;

/// Custom error type for the gateway
#[derive(Error, Debug)]
pub enum Error {
    #[error("no route configured for service '{0}'")]
    UnknownService(String),

    #[error("request is not authenticated")]
    Unauthenticated,

    #[error("no access token for principal '{principal}' and registration '{registration_id}'")]
    CredentialUnavailable {
        principal: String,
        registration_id: String,
    },

    #[error("backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("backend timed out after {0}s")]
    BackendTimeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid outbound request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for the gateway
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Status to report to the caller, valid only while no response bytes
    /// have been flushed. Once streaming has started the connection is torn
    /// down instead of mapping the error to a status.
    pub fn response_status(&self) -> StatusCode {
        match self {
            Error::UnknownService(_) => StatusCode::NOT_FOUND,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::CredentialUnavailable { .. } => StatusCode::UNAUTHORIZED,
            Error::BackendTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::BackendUnreachable(_) | Error::Http(_) | Error::Io(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_errors_map_to_not_found() {
        let err = Error::UnknownService("billing".into());
        assert_eq!(err.response_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn backend_errors_map_to_bad_gateway() {
        let err = Error::BackendUnreachable("connection refused".into());
        assert_eq!(err.response_status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn timeouts_map_to_gateway_timeout() {
        let err = Error::BackendTimeout(30);
        assert_eq!(err.response_status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
