//! Token data and authentication errors

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No config file, or a config file without any credentials
    #[error("Not logged in, run the 'rosa login' command")]
    UserNotLoggedIn,

    /// No token valid for the required window could be obtained
    #[error("Error creating connection. Not able to get authentication token")]
    ConnectionFailed,

    /// The token endpoint could not be reached
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The token endpoint answered with something unexpected
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// The token endpoint rejected the grant
    #[error("Token request rejected: {0}")]
    Rejected(String),

    /// A token could not be decoded
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The provider cannot refresh tokens
    #[error("Provider '{0}' does not support token refresh")]
    RefreshUnsupported(String),

    /// Writing refreshed tokens failed
    #[error("Token storage error: {0}")]
    StorageError(String),
}

/// Claims the CLI cares about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub typ: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl TokenClaims {
    /// Decode the payload of a JWT without verifying the signature
    pub fn decode(token: &str) -> AuthResult<Self> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(AuthError::InvalidToken(
                    "expected three dot separated segments".to_string(),
                ))
            }
        };

        let decoded = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::InvalidToken(format!("payload is not base64: {e}")))?;

        serde_json::from_slice(&decoded)
            .map_err(|e| AuthError::InvalidToken(format!("payload is not JSON: {e}")))
    }

    /// Name of the user the token was issued to, if present
    pub fn user_name(&self) -> Option<&str> {
        self.username
            .as_deref()
            .or(self.preferred_username.as_deref())
            .or(self.email.as_deref())
    }
}

/// Kind of token pasted into `rosa login --token`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Tell access tokens from refresh/offline tokens using the `typ` claim
pub fn classify_token(token: &str) -> AuthResult<TokenKind> {
    let claims = TokenClaims::decode(token)?;
    match claims.typ.as_deref() {
        Some("Bearer") => Ok(TokenKind::Access),
        Some("Refresh") | Some("Offline") => Ok(TokenKind::Refresh),
        Some(other) => Err(AuthError::InvalidToken(format!(
            "Don't know how to handle token type '{other}' in token"
        ))),
        None => Err(AuthError::InvalidToken(
            "Expected type of token to be a string".to_string(),
        )),
    }
}

/// Access token plus optional refresh token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl TokenSet {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.filter(|t| !t.is_empty()),
        }
    }

    /// Expiration of the access token as a Unix timestamp
    ///
    /// Opaque tokens and tokens without an `exp` claim have none.
    pub fn expires_at(&self) -> Option<u64> {
        TokenClaims::decode(&self.access_token).ok()?.exp
    }

    /// Check that the access token is present and stays valid for `window`
    pub fn valid_for(&self, window: Duration) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at() {
            Some(exp) => exp > now_secs() + window.as_secs(),
            None => true,
        }
    }

    /// Check if the access token is already expired
    pub fn is_expired(&self) -> bool {
        !self.valid_for(Duration::ZERO)
    }

    /// Time left until the access token expires
    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_at()
            .map(|exp| Duration::from_secs(exp.saturating_sub(now_secs())))
    }
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Build an unsigned JWT for tests
#[cfg(test)]
pub(crate) fn test_jwt(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_token() {
        let access = test_jwt(json!({"typ": "Bearer"}));
        let refresh = test_jwt(json!({"typ": "Refresh"}));
        let offline = test_jwt(json!({"typ": "Offline"}));
        let odd = test_jwt(json!({"typ": "ID"}));
        let untyped = test_jwt(json!({"sub": "me"}));

        assert_eq!(classify_token(&access).unwrap(), TokenKind::Access);
        assert_eq!(classify_token(&refresh).unwrap(), TokenKind::Refresh);
        assert_eq!(classify_token(&offline).unwrap(), TokenKind::Refresh);
        assert!(classify_token(&odd)
            .unwrap_err()
            .to_string()
            .contains("token type 'ID'"));
        assert!(classify_token(&untyped).is_err());
        assert!(classify_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_validity_window() {
        let soon = TokenSet::new(test_jwt(json!({"exp": now_secs() + 60})), None);
        assert!(soon.valid_for(Duration::ZERO));
        assert!(!soon.valid_for(Duration::from_secs(600)));

        let later = TokenSet::new(test_jwt(json!({"exp": now_secs() + 3600})), None);
        assert!(later.valid_for(Duration::from_secs(600)));
        assert!(later.time_until_expiry().unwrap() > Duration::from_secs(3000));

        let expired = TokenSet::new(test_jwt(json!({"exp": now_secs() - 10})), None);
        assert!(expired.is_expired());
    }

    #[test]
    fn test_opaque_and_empty_tokens() {
        assert!(TokenSet::new("opaque", None).valid_for(Duration::from_secs(600)));
        assert!(!TokenSet::default().valid_for(Duration::ZERO));
        assert_eq!(TokenSet::new("a", Some(String::new())).refresh_token, None);
    }

    #[test]
    fn test_user_name_claim_fallback() {
        let claims =
            TokenClaims::decode(&test_jwt(json!({"preferred_username": "jdoe"}))).unwrap();
        assert_eq!(claims.user_name(), Some("jdoe"));
    }
}
