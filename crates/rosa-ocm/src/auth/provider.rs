//! Authentication provider trait
//!
//! A provider knows how to obtain a fresh token set from the SSO token
//! endpoint. The [`TokenManager`](super::TokenManager) decides when to ask.

use super::types::{AuthResult, TokenSet};
use async_trait::async_trait;

/// Source of new tokens
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Obtain a token set without any previous state
    ///
    /// Providers that need an existing refresh token return an error here.
    async fn authenticate(&self) -> AuthResult<TokenSet>;

    /// Exchange a refresh token for a new token set
    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenSet>;

    /// Check if this provider can use a refresh token
    fn supports_refresh(&self) -> bool {
        true
    }

    /// Provider name for logging
    fn name(&self) -> &str;
}
