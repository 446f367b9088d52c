//! The injected bearer credential.
//!
//! The host application obtains the token from its token-issuing service and
//! constructs an [`AccessToken`] explicitly; the client never reads ambient
//! storage. A 401 from the server revokes the credential for good, and every
//! later use fails fast without a network round trip.

use crate::{ApiError, ApiResult};
use std::sync::atomic::{AtomicBool, Ordering};

/// A bearer access token with a one-way revocation latch.
#[derive(Debug)]
pub struct AccessToken {
    secret: String,
    revoked: AtomicBool,
}

impl AccessToken {
    /// Wrap a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] for an empty token.
    pub fn new(secret: impl Into<String>) -> ApiResult<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ApiError::InvalidConfig("access token cannot be empty".into()));
        }
        Ok(Self {
            secret,
            revoked: AtomicBool::new(false),
        })
    }

    /// The bearer secret, if the credential is still valid.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] once the credential is revoked.
    pub fn bearer(&self) -> ApiResult<&str> {
        if self.is_revoked() {
            return Err(ApiError::Unauthorized);
        }
        Ok(&self.secret)
    }

    /// Permanently invalidate the credential. Called on a 401 response.
    pub fn revoke(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tokens_yield_their_secret() {
        let token = AccessToken::new("abc123").expect("valid token");
        assert_eq!(token.bearer().expect("not revoked"), "abc123");
        assert!(!token.is_revoked());
    }

    #[test]
    fn empty_tokens_are_rejected() {
        assert!(matches!(
            AccessToken::new("   "),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn revocation_is_permanent() {
        let token = AccessToken::new("abc123").expect("valid token");
        token.revoke();
        assert!(token.is_revoked());
        assert!(matches!(token.bearer(), Err(ApiError::Unauthorized)));
    }
}
