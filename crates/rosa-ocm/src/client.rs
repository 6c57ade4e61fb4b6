//! HTTP client for the OCM API
//!
//! The client is built from the login file written by `rosa login`. Building
//! it makes sure an access token valid for at least ten minutes is available,
//! renewing it and saving the renewed tokens when needed.
//!
//! ```rust,no_run
//! use rosa_ocm::{ClientBuilder, Config};
//!
//! # async fn example() -> rosa_ocm::Result<()> {
//! // Login file from $OCM_CONFIG or ~/.ocm.json
//! let client = ClientBuilder::new().build().await?;
//!
//! // Explicit configuration, as done right after `rosa login`
//! let config = Config {
//!     refresh_token: "...".into(),
//!     ..Default::default()
//! };
//! let client = ClientBuilder::new().config(config).build().await?;
//! # Ok(())
//! # }
//! ```

use crate::auth::{
    AuthError, AuthProvider, ClientCredentialsProvider, ConfigTokenSink, RefreshTokenProvider,
    TokenManager, TokenSet,
};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::types::ListResponse;
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default timeout in seconds for API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Number of items requested per page when listing collections
pub const PAGE_SIZE: u32 = 100;

/// HTTP client for the clusters and accounts management APIs
#[derive(Debug)]
pub struct OcmClient {
    http_client: reqwest::Client,
    base_url: String,
    token_manager: Arc<TokenManager>,
}

impl OcmClient {
    /// Base URL of the API, e.g. `https://api.openshift.com`
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Current access and refresh tokens
    pub async fn tokens(&self) -> TokenSet {
        self.token_manager.tokens().await
    }

    // ===== Private Helper Methods =====

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.http_client.request(method, url)
    }

    /// Apply authentication to request
    async fn apply_auth(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token_manager.get_access_token().await?;
        Ok(request.bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = self.apply_auth(request).await?;
        request.send().await.map_err(ApiError::HttpClient)
    }

    /// Generic GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        self.handle_response(response).await
    }

    /// GET request with query parameters
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        self.handle_response(response).await
    }

    /// Generic POST request
    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        self.handle_response(response).await
    }

    /// Generic PATCH request
    pub(crate) async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::PATCH, path).json(body))
            .await?;
        self.handle_response(response).await
    }

    /// Generic DELETE request
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let response = self.send(self.request(Method::DELETE, path)).await?;
        self.handle_empty_response(response).await
    }

    /// Fetch every page of a collection
    pub(crate) async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        search: Option<&str>,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut query = vec![
                ("page", page.to_string()),
                ("size", PAGE_SIZE.to_string()),
            ];
            if let Some(search) = search {
                query.push(("search", search.to_string()));
            }

            let response: ListResponse<T> = self.get_with_query(path, &query).await?;
            let received = response.items.len();
            items.extend(response.items);

            let exhausted = response.total > 0 && items.len() >= response.total as usize;
            if received < PAGE_SIZE as usize || exhausted {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Handle successful response
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        if response.status().is_success() {
            let body = response.text().await.map_err(ApiError::HttpClient)?;
            serde_json::from_str(&body).map_err(ApiError::Serialization)
        } else {
            Err(self.handle_error_response(response).await)
        }
    }

    /// Handle a response whose body is not needed
    async fn handle_empty_response(&self, response: Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.handle_error_response(response).await)
        }
    }

    /// Handle error response
    async fn handle_error_response(&self, response: Response) -> ApiError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        debug!("Request failed with status {}: {}", status, error_text);
        ApiError::from_status(status, &error_text)
    }
}

/// Builder for constructing an [`OcmClient`]
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<Config>,
    config_path: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this configuration instead of loading the login file
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Read and update the login file at this path
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client and make sure a usable access token is available
    pub async fn build(self) -> Result<OcmClient> {
        let path = match self.config_path {
            Some(path) => path,
            None => Config::location()?,
        };

        let config = match self.config {
            Some(config) => config,
            None => Config::load_from_path(&path)
                .await?
                .ok_or(AuthError::UserNotLoggedIn)?,
        };

        if !config.is_armed() {
            return Err(AuthError::UserNotLoggedIn.into());
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(ApiError::HttpClient)?;

        let provider: Box<dyn AuthProvider> =
            if config.refresh_token.is_empty() && !config.client_secret.is_empty() {
                Box::new(ClientCredentialsProvider::new(
                    http_client.clone(),
                    &config.token_url,
                    &config.client_id,
                    &config.client_secret,
                    &config.scopes,
                ))
            } else {
                Box::new(RefreshTokenProvider::new(
                    http_client.clone(),
                    &config.token_url,
                    &config.client_id,
                ))
            };
        debug!("Using {} token provider", provider.name());

        let tokens = TokenSet::new(
            config.access_token.clone(),
            Some(config.refresh_token.clone()),
        );
        let base_url = config.url.trim_end_matches('/').to_string();
        let sink = Arc::new(ConfigTokenSink::new(path, config));
        let token_manager = TokenManager::new(provider, tokens).with_sink(sink);

        token_manager.get_access_token().await?;

        Ok(OcmClient {
            http_client,
            base_url,
            token_manager: Arc::new(token_manager),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer, dir: &tempfile::TempDir) -> OcmClient {
        let config = Config {
            access_token: "test-token".into(),
            url: format!("{}/", server.uri()),
            ..Default::default()
        };
        ClientBuilder::new()
            .config(config)
            .config_path(dir.path().join("ocm.json"))
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/api/accounts_mgmt/v1/current_account"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "jdoe"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &dir).await;
        assert_eq!(client.url(), server.uri());

        let account: serde_json::Value = client
            .get("/api/accounts_mgmt/v1/current_account")
            .await
            .unwrap();
        assert_eq!(account["username"], "jdoe");
    }

    #[tokio::test]
    async fn test_list_all_follows_pages() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let first: Vec<_> = (0..PAGE_SIZE).map(|i| json!({"id": format!("v{i}")})).collect();
        Mock::given(method("GET"))
            .and(path("/things"))
            .and(query_param("page", "1"))
            .and(query_param("size", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "ThingList", "page": 1, "size": 100, "total": 101, "items": first
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/things"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "ThingList", "page": 2, "size": 1, "total": 101, "items": [{"id": "last"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, &dir).await;
        let items: Vec<serde_json::Value> = client.list_all("/things", None).await.unwrap();
        assert_eq!(items.len(), 101);
        assert_eq!(items[100]["id"], "last");
    }

    #[tokio::test]
    async fn test_error_body_reason_is_surfaced() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("DELETE"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "kind": "Error",
                "id": "404",
                "code": "CLUSTERS-MGMT-404",
                "reason": "Cluster 'abc' not found"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, &dir).await;
        let err = client.delete("/gone").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.reason(), "Cluster 'abc' not found");
    }

    #[tokio::test]
    async fn test_missing_login_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientBuilder::new()
            .config_path(dir.path().join("absent.json"))
            .build()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not logged in, run the 'rosa login' command");
    }
}
