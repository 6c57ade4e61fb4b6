//! Authentication for OCM requests
//!
//! - token decoding and classification
//! - `refresh_token` and `client_credentials` grants against the SSO server
//! - a token manager that renews tokens close to expiry and saves them

pub mod manager;
pub mod provider;
pub mod providers;
pub mod types;

pub use manager::{ConfigTokenSink, TokenManager, TokenSink};
pub use provider::AuthProvider;
pub use providers::{ClientCredentialsProvider, RefreshTokenProvider};
pub use types::{classify_token, AuthError, AuthResult, TokenClaims, TokenKind, TokenSet};
