//! `client_credentials` grant for service accounts

use super::request_tokens;
use crate::auth::{
    provider::AuthProvider,
    types::{AuthError, AuthResult, TokenSet},
};
use async_trait::async_trait;

/// Provider that requests tokens with a client id and secret
pub struct ClientCredentialsProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl ClientCredentialsProvider {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scopes: &[String],
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: scopes.join(" "),
        }
    }
}

#[async_trait]
impl AuthProvider for ClientCredentialsProvider {
    fn name(&self) -> &str {
        "client-credentials"
    }

    fn supports_refresh(&self) -> bool {
        false
    }

    async fn authenticate(&self) -> AuthResult<TokenSet> {
        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        if !self.scope.is_empty() {
            form.push(("scope", self.scope.as_str()));
        }
        request_tokens(&self.http, &self.token_url, &form).await
    }

    async fn refresh(&self, _refresh_token: &str) -> AuthResult<TokenSet> {
        Err(AuthError::RefreshUnsupported(self.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_credentials_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_secret=s3cret"))
            .and(body_string_contains("scope=openid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "service-token",
                "token_type": "Bearer",
                "expires_in": 900
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = ClientCredentialsProvider::new(
            reqwest::Client::new(),
            server.uri(),
            "svc",
            "s3cret",
            &["openid".to_string()],
        );
        assert!(!provider.supports_refresh());

        let tokens = provider.authenticate().await.unwrap();
        assert_eq!(tokens.access_token, "service-token");
        assert!(tokens.refresh_token.is_none());
    }
}
