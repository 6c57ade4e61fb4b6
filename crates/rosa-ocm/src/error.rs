//! Error types for the OCM client

use crate::auth::AuthError;
use crate::config::ConfigError;
use serde::Deserialize;
use thiserror::Error;

/// Error body returned by the OCM API
///
/// ```json
/// {"kind": "Error", "id": "404", "code": "CLUSTERS-MGMT-404", "reason": "..."}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub operation_id: Option<String>,
}

/// Errors produced while talking to OCM
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Missing or rejected credentials
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Authenticated but not allowed
    #[error("Authorization error: {message}")]
    Authorization { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Resource not found
    #[error("{message}")]
    NotFound { message: String },

    /// More than one resource matched a lookup that expects exactly one
    #[error("{message}")]
    Ambiguous { message: String },

    /// Bad request with message
    #[error("{message}")]
    BadRequest { message: String },

    /// Conflicting resource state
    #[error("{message}")]
    Conflict { message: String },

    /// Service unavailable
    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    /// Internal server error
    #[error("Internal server error: {message}")]
    Internal { message: String },

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token handling error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Local configuration file error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Reason text suitable for a one line report
    ///
    /// For errors returned by the server this is the `reason` field of the
    /// OCM error body.
    pub fn reason(&self) -> String {
        match self {
            ApiError::Authentication { message }
            | ApiError::Authorization { message }
            | ApiError::NotFound { message }
            | ApiError::Ambiguous { message }
            | ApiError::BadRequest { message }
            | ApiError::Conflict { message }
            | ApiError::Internal { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Check if the error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Check if the error is caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApiError::Authentication { .. }
                | ApiError::Authorization { .. }
                | ApiError::NotFound { .. }
                | ApiError::Ambiguous { .. }
                | ApiError::BadRequest { .. }
                | ApiError::Conflict { .. }
                | ApiError::RateLimitExceeded
        )
    }

    /// Build an error from a non-success status and the raw response body
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        use reqwest::StatusCode;

        let reason = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .map(|e| e.reason)
            .filter(|r| !r.is_empty());

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Authentication {
                message: reason.unwrap_or_else(|| "Authentication failed".into()),
            },
            StatusCode::FORBIDDEN => ApiError::Authorization {
                message: reason.unwrap_or_else(|| "Access forbidden".into()),
            },
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimitExceeded,
            StatusCode::NOT_FOUND => ApiError::NotFound {
                message: reason.unwrap_or_else(|| "Resource not found".into()),
            },
            StatusCode::BAD_REQUEST => ApiError::BadRequest {
                message: reason.unwrap_or_else(|| body.to_string()),
            },
            StatusCode::CONFLICT => ApiError::Conflict {
                message: reason.unwrap_or_else(|| body.to_string()),
            },
            StatusCode::SERVICE_UNAVAILABLE => ApiError::ServiceUnavailable,
            _ => ApiError::Internal {
                message: reason
                    .unwrap_or_else(|| format!("Request failed with status {status}: {body}")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_reason_is_taken_from_error_body() {
        let body = r#"{
            "kind": "Error",
            "id": "404",
            "href": "/api/clusters_mgmt/v1/errors/404",
            "code": "CLUSTERS-MGMT-404",
            "reason": "Identity provider 'abc' not found"
        }"#;

        let err = ApiError::from_status(StatusCode::NOT_FOUND, body);
        assert!(err.is_not_found());
        assert_eq!(err.reason(), "Identity provider 'abc' not found");
        assert_eq!(err.to_string(), "Identity provider 'abc' not found");
    }

    #[test]
    fn test_fallback_without_error_body() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, "");
        assert!(matches!(err, ApiError::Authorization { .. }));
        assert_eq!(err.reason(), "Access forbidden");

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream");
        assert!(matches!(err, ApiError::Internal { .. }));
        assert!(!err.is_client_error());
        assert!(err.reason().contains("502"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(ApiError::RateLimitExceeded.is_client_error());
        assert!(ApiError::from_status(StatusCode::CONFLICT, "{}").is_client_error());
        assert!(!ApiError::ServiceUnavailable.is_client_error());
    }
}
