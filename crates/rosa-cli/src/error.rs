//! Error types for the ROSA CLI

use rosa_ocm::auth::AuthError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// OCM API errors
    #[error(transparent)]
    Api(#[from] rosa_ocm::ApiError),

    /// Token and login errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Login file errors
    #[error(transparent)]
    Config(#[from] rosa_ocm::config::ConfigError),

    /// Invalid identifiers or flag values
    #[error(transparent)]
    Validation(#[from] rosa_common::ValidationError),

    /// AWS credential or STS failures
    #[error("{message}")]
    Aws { message: String },

    /// A command failed; the message is what the user sees
    #[error("{message}")]
    Command {
        message: String,
        suggestion: Option<String>,
    },

    /// Prompt failures
    #[error("{0}")]
    Interactive(String),

    /// Output encoding failures
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// A failed command with a user facing message
    pub fn command(message: impl Into<String>) -> Self {
        CliError::Command {
            message: message.into(),
            suggestion: None,
        }
    }

    /// A failed command with a hint on how to fix it
    pub fn with_suggestion(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        CliError::Command {
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    pub fn aws(message: impl Into<String>) -> Self {
        CliError::Aws {
            message: message.into(),
        }
    }

    pub fn interactive(message: impl Into<String>) -> Self {
        CliError::Interactive(message.into())
    }

    /// Hint printed below the error, if any
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            CliError::Command { suggestion, .. } => suggestion.as_deref(),
            CliError::Auth(AuthError::ConnectionFailed)
            | CliError::Api(rosa_ocm::ApiError::Auth(AuthError::ConnectionFailed)) => {
                Some(crate::cli::handlers::common::LOGIN_HINT)
            }
            _ => None,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion() {
        let err = CliError::with_suggestion("Cluster 'x' is not yet ready", "Wait for it");
        assert_eq!(err.to_string(), "Cluster 'x' is not yet ready");
        assert_eq!(err.suggestion(), Some("Wait for it"));
        assert_eq!(CliError::command("plain").suggestion(), None);
    }

    #[test]
    fn test_expired_tokens_suggest_login() {
        let err = CliError::from(rosa_ocm::ApiError::Auth(AuthError::ConnectionFailed));
        assert_eq!(
            err.to_string(),
            "Error creating connection. Not able to get authentication token"
        );
        assert_eq!(err.suggestion(), Some("Run 'rosa login' to get a new token"));
    }
}
