//! `refresh_token` grant

use super::request_tokens;
use crate::auth::{
    provider::AuthProvider,
    types::{AuthError, AuthResult, TokenSet},
};
use async_trait::async_trait;
use tracing::debug;

/// Provider that renews tokens with the refresh token saved at login
pub struct RefreshTokenProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
}

impl RefreshTokenProvider {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for RefreshTokenProvider {
    fn name(&self) -> &str {
        "refresh-token"
    }

    async fn authenticate(&self) -> AuthResult<TokenSet> {
        Err(AuthError::UserNotLoggedIn)
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenSet> {
        debug!("Refreshing access token");
        let mut tokens = request_tokens(
            &self.http,
            &self.token_url,
            &[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("refresh_token", refresh_token),
            ],
        )
        .await?;

        // Keep the old refresh token when the server does not rotate it
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token.to_string());
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_refresh_keeps_old_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=old-refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": "new-access"})),
            )
            .mount(&server)
            .await;

        let provider = RefreshTokenProvider::new(
            reqwest::Client::new(),
            format!("{}/token", server.uri()),
            "cloud-services",
        );
        let tokens = provider.refresh("old-refresh").await.unwrap();
        assert_eq!(tokens.access_token, "new-access");
        assert_eq!(tokens.refresh_token.as_deref(), Some("old-refresh"));
    }

    #[tokio::test]
    async fn test_rejected_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Token is not active"
            })))
            .mount(&server)
            .await;

        let provider = RefreshTokenProvider::new(
            reqwest::Client::new(),
            format!("{}/token", server.uri()),
            "cloud-services",
        );
        let err = provider.refresh("stale").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(ref m) if m == "invalid_grant: Token is not active"));
    }
}
