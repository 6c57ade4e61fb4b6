//! Token caching, renewal and persistence
//!
//! The TokenManager keeps the current token set in memory, renews it through
//! its [`AuthProvider`] when it would expire too soon, and hands renewed
//! tokens to a [`TokenSink`] so the next invocation starts from them.

use super::provider::AuthProvider;
use super::types::{AuthError, AuthResult, TokenSet};
use crate::config::Config;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Destination for renewed tokens
#[async_trait]
pub trait TokenSink: Send + Sync {
    async fn store(&self, tokens: &TokenSet) -> AuthResult<()>;
}

/// Writes renewed tokens back into the login file
pub struct ConfigTokenSink {
    path: PathBuf,
    config: Mutex<Config>,
}

impl ConfigTokenSink {
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config: Mutex::new(config),
        }
    }
}

#[async_trait]
impl TokenSink for ConfigTokenSink {
    async fn store(&self, tokens: &TokenSet) -> AuthResult<()> {
        let mut config = self.config.lock().await;
        config.access_token = tokens.access_token.clone();
        if let Some(refresh_token) = &tokens.refresh_token {
            config.refresh_token = refresh_token.clone();
        }
        config
            .save_to_path(&self.path)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))
    }
}

/// Manages the access token used for OCM requests
pub struct TokenManager {
    provider: Box<dyn AuthProvider>,
    sink: Option<Arc<dyn TokenSink>>,
    cache: RwLock<TokenSet>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Minimum time a token handed out must stay valid
    pub const MIN_VALIDITY: Duration = Duration::from_secs(10 * 60);

    pub fn new(provider: Box<dyn AuthProvider>, tokens: TokenSet) -> Self {
        Self {
            provider,
            sink: None,
            cache: RwLock::new(tokens),
        }
    }

    /// Persist renewed tokens through `sink`
    pub fn with_sink(mut self, sink: Arc<dyn TokenSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Get an access token valid for at least [`Self::MIN_VALIDITY`]
    pub async fn get_access_token(&self) -> AuthResult<String> {
        self.get_access_token_for(Self::MIN_VALIDITY).await
    }

    /// Get an access token valid for at least `window`
    ///
    /// Any failure to renew is reported as [`AuthError::ConnectionFailed`];
    /// the underlying cause goes to the debug log.
    pub async fn get_access_token_for(&self, window: Duration) -> AuthResult<String> {
        {
            let cache = self.cache.read().await;
            if cache.valid_for(window) {
                debug!("Using cached access token");
                return Ok(cache.access_token.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have renewed while we waited for the lock
        if cache.valid_for(window) {
            return Ok(cache.access_token.clone());
        }

        let renewed = match self.renew(&cache).await {
            Ok(tokens) => tokens,
            Err(e) => {
                debug!("Token renewal with {} failed: {}", self.provider.name(), e);
                return Err(AuthError::ConnectionFailed);
            }
        };

        if !renewed.valid_for(window) {
            debug!("Renewed access token does not cover the required window");
            return Err(AuthError::ConnectionFailed);
        }

        if let Some(sink) = &self.sink {
            sink.store(&renewed).await?;
        }

        info!("Access token renewed with {}", self.provider.name());
        let token = renewed.access_token.clone();
        *cache = renewed;
        Ok(token)
    }

    async fn renew(&self, current: &TokenSet) -> AuthResult<TokenSet> {
        match &current.refresh_token {
            Some(refresh_token) if self.provider.supports_refresh() => {
                self.provider.refresh(refresh_token).await
            }
            _ => self.provider.authenticate().await,
        }
    }

    /// Current token set, without renewing it
    pub async fn tokens(&self) -> TokenSet {
        self.cache.read().await.clone()
    }
}
