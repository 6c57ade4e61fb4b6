//! Token endpoint grants

mod client_credentials;
mod refresh_token;

pub use client_credentials::ClientCredentialsProvider;
pub use refresh_token::RefreshTokenProvider;

use super::types::{AuthError, AuthResult, TokenSet};
use serde::Deserialize;
use tracing::debug;

/// Successful answer of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Error answer of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// POST a form to the token endpoint and decode the resulting tokens
async fn request_tokens(
    http: &reqwest::Client,
    token_url: &str,
    form: &[(&str, &str)],
) -> AuthResult<TokenSet> {
    debug!("Requesting tokens from {}", token_url);

    let response = http
        .post(token_url)
        .form(form)
        .send()
        .await
        .map_err(|e| AuthError::NetworkError(format!("Token request failed: {e}")))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(err) => match err.error_description {
                Some(description) => format!("{}: {}", err.error, description),
                None => err.error,
            },
            Err(_) => format!("status {status}: {body}"),
        };
        return Err(AuthError::Rejected(message));
    }

    let tokens: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| AuthError::InvalidResponse(format!("Failed to parse token response: {e}")))?;

    Ok(TokenSet::new(tokens.access_token, tokens.refresh_token))
}
