//! # Riskform Client
//!
//! The reqwest-based implementation of the engine's backend port.
//!
//! This crate owns everything HTTP: the resolved-once [`ClientConfig`], the
//! injected [`AccessToken`] credential (no ambient storage — the credential
//! is constructed by the host and passed in), and the [`ApiClient`] gateway
//! that talks to the remote API's `/api` surface.
//!
//! A 401 response revokes the credential; every later call with the revoked
//! credential fails fast with [`ApiError::Unauthorized`] without touching
//! the network. There are no retries and no cancellation: a failure is
//! surfaced once, as a message.

pub mod config;
pub mod gateway;
pub mod token;

pub use config::ClientConfig;
pub use gateway::ApiClient;
pub use token::AccessToken;

use riskform_engine::BackendError;

/// Fallback shown when the server fails without a usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "The server could not complete the request.";

/// Errors returned by the API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The access token was rejected (or already revoked).
    #[error("session expired")]
    Unauthorized,

    #[error("resource not found")]
    NotFound,

    /// Non-success response with the server-provided message when present.
    #[error("server error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Type alias for Results that can fail with an [`ApiError`].
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<ApiError> for BackendError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => BackendError::Unauthorized,
            ApiError::NotFound => BackendError::NotFound,
            ApiError::Http { message, .. } => BackendError::Remote(message),
            ApiError::InvalidConfig(message) => BackendError::Transport(message),
            ApiError::Transport(source) => BackendError::Transport(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_onto_the_backend_taxonomy() {
        assert_eq!(
            BackendError::from(ApiError::NotFound),
            BackendError::NotFound
        );
        assert_eq!(
            BackendError::from(ApiError::Unauthorized),
            BackendError::Unauthorized
        );
        assert_eq!(
            BackendError::from(ApiError::Http {
                status: 500,
                message: "disk full".into()
            }),
            BackendError::Remote("disk full".into())
        );
    }
}
