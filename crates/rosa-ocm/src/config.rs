//! Local login configuration
//!
//! The file keeps the connection URL and the OAuth tokens between
//! invocations. It uses the same JSON layout as the other OCM tools so a
//! login made with one of them is usable by the others.

use figment::providers::{Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable that overrides the location of the config file
pub const CONFIG_ENV_VAR: &str = "OCM_CONFIG";

/// Default name of the config file inside the home directory
pub const CONFIG_FILE_NAME: &str = ".ocm.json";

pub const PRODUCTION_URL: &str = "https://api.openshift.com";
pub const STAGING_URL: &str = "https://api.stage.openshift.com";
pub const INTEGRATION_URL: &str = "https://api.integration.openshift.com";

pub const DEFAULT_URL: &str = PRODUCTION_URL;
pub const DEFAULT_TOKEN_URL: &str =
    "https://sso.redhat.com/auth/realms/redhat-external/protocol/openid-connect/token";
pub const DEFAULT_CLIENT_ID: &str = "cloud-services";
pub const DEFAULT_SCOPE: &str = "openid";

/// Resolve an environment alias (`production`, `staging`, `integration`)
/// to its API URL.
pub fn url_for_env(env: &str) -> Option<&'static str> {
    match env {
        "production" | "prod" => Some(PRODUCTION_URL),
        "staging" | "stage" => Some(STAGING_URL),
        "integration" | "int" => Some(INTEGRATION_URL),
        _ => None,
    }
}

/// Errors reading or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine home directory: {0}")]
    HomeDir(String),

    #[error("Failed to load config file '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Contents of the login file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub access_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub insecure: bool,
    pub refresh_token: String,
    pub scopes: Vec<String>,
    pub token_url: String,
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: String::new(),
            insecure: false,
            refresh_token: String::new(),
            scopes: vec![DEFAULT_SCOPE.to_string()],
            token_url: DEFAULT_TOKEN_URL.to_string(),
            url: DEFAULT_URL.to_string(),
        }
    }
}

impl Config {
    /// Location of the config file: `$OCM_CONFIG` or `~/.ocm.json`
    pub fn location() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let home = etcetera::home_dir().map_err(|e| ConfigError::HomeDir(e.to_string()))?;
        Ok(home.join(CONFIG_FILE_NAME))
    }

    /// Load the config from a specific path
    ///
    /// Returns `Ok(None)` when the file does not exist, meaning the user never
    /// logged in or logged out.
    pub async fn load_from_path(path: &Path) -> Result<Option<Self>, ConfigError> {
        debug!("Loading configuration from: {}", path.display());

        let exists = tokio::fs::try_exists(path).await.unwrap_or(false);
        if !exists {
            debug!("Configuration file not found: {}", path.display());
            return Ok(None);
        }

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(path))
            .extract()
            .map_err(|e| ConfigError::Load {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;

        Ok(Some(config))
    }

    /// Save the config to a specific path, readable only by the owner
    pub async fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        debug!("Saving configuration to: {}", path.display());

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await.map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(write_err)?;
        }

        Ok(())
    }

    /// Remove the config file from the default location
    pub async fn remove() -> Result<(), ConfigError> {
        let path = Self::location()?;
        Self::remove_path(&path).await
    }

    /// Remove a config file; a missing file is not an error
    pub async fn remove_path(path: &Path) -> Result<(), ConfigError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ConfigError::Write {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Check if the config holds anything that can produce an access token
    pub fn is_armed(&self) -> bool {
        !self.access_token.is_empty()
            || !self.refresh_token.is_empty()
            || (!self.client_id.is_empty() && !self.client_secret.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    async fn test_missing_file_means_not_logged_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocm.json");
        assert!(Config::load_from_path(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ocm.json");

        let config = Config {
            refresh_token: "refresh".to_string(),
            url: STAGING_URL.to_string(),
            insecure: true,
            ..Default::default()
        };
        config.save_to_path(&path).await.unwrap();

        let loaded = Config::load_from_path(&path).await.unwrap().unwrap();
        assert_eq!(loaded, config);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocm.json");
        tokio::fs::write(&path, r#"{"access_token": "abc"}"#)
            .await
            .unwrap();

        let loaded = Config::load_from_path(&path).await.unwrap().unwrap();
        assert_eq!(loaded.access_token, "abc");
        assert_eq!(loaded.url, DEFAULT_URL);
        assert_eq!(loaded.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(loaded.client_id, DEFAULT_CLIENT_ID);
        assert_eq!(loaded.scopes, vec![DEFAULT_SCOPE.to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocm.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = Config::load_from_path(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocm.json");
        Config::default().save_to_path(&path).await.unwrap();

        Config::remove_path(&path).await.unwrap();
        assert!(!path.exists());
        Config::remove_path(&path).await.unwrap();
    }

    #[test]
    #[serial]
    fn test_location_honours_env_var() {
        std::env::set_var(CONFIG_ENV_VAR, "/tmp/custom-ocm.json");
        let location = Config::location().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        assert_eq!(location, PathBuf::from("/tmp/custom-ocm.json"));
    }

    #[test]
    fn test_armed() {
        assert!(!Config::default().is_armed());
        let with_secret = Config {
            client_secret: "secret".to_string(),
            ..Default::default()
        };
        assert!(with_secret.is_armed());
    }

    #[test]
    fn test_env_aliases() {
        assert_eq!(url_for_env("staging"), Some(STAGING_URL));
        assert_eq!(url_for_env("production"), Some(PRODUCTION_URL));
        assert_eq!(url_for_env("integration"), Some(INTEGRATION_URL));
        assert_eq!(url_for_env("moon"), None);
    }
}
