//! Integration tests for the OCM client against a mock API server

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rosa_ocm::resources::UserGroup;
use rosa_ocm::types::{AddOnParam, ClusterState};
use rosa_ocm::{ApiError, ClientBuilder, Config, OcmClient};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREATOR: &str = "arn:aws:iam::123456789012:user/dev";

fn jwt(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

fn expiring_in(secs: i64) -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
    jwt(json!({"typ": "Bearer", "exp": now + secs}))
}

async fn logged_in_client(server: &MockServer, dir: &tempfile::TempDir) -> OcmClient {
    let config = Config {
        access_token: expiring_in(3600),
        url: server.uri(),
        ..Default::default()
    };
    ClientBuilder::new()
        .config(config)
        .config_path(dir.path().join("ocm.json"))
        .build()
        .await
        .unwrap()
}

fn cluster_list(total: u32, items: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "kind": "ClusterList",
        "page": 1,
        "size": items.as_array().map(|a| a.len()).unwrap_or(0),
        "total": total,
        "items": items
    }))
}

#[tokio::test]
async fn test_cluster_lookup_search_expression() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/clusters_mgmt/v1/clusters"))
        .and(query_param(
            "search",
            format!(
                "(id = 'mycluster' or name = 'mycluster' or external_id = 'mycluster') \
                 and properties.rosa_creator_arn = '{CREATOR}'"
            ),
        ))
        .respond_with(cluster_list(
            1,
            json!([{"id": "1a2b", "name": "mycluster", "state": "ready"}]),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &dir).await;
    let cluster = client.get_cluster("mycluster", CREATOR).await.unwrap();
    assert_eq!(cluster.id, "1a2b");
    assert_eq!(cluster.state, ClusterState::Ready);
}

#[tokio::test]
async fn test_cluster_lookup_not_found_and_ambiguous() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/clusters_mgmt/v1/clusters"))
        .and(query_param_contains("search", "'missing'"))
        .respond_with(cluster_list(0, json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clusters_mgmt/v1/clusters"))
        .and(query_param_contains("search", "'twin'"))
        .respond_with(cluster_list(2, json!([{"id": "a", "name": "twin"}])))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &dir).await;

    let err = client.get_cluster("missing", CREATOR).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "There is no cluster with identifier or name 'missing'"
    );
    assert!(client.find_cluster("missing", CREATOR).await.unwrap().is_none());

    let err = client.get_cluster("twin", CREATOR).await.unwrap_err();
    assert!(matches!(err, ApiError::Ambiguous { .. }));
    assert_eq!(
        err.to_string(),
        "There are 2 clusters with identifier or name 'twin'"
    );
}

fn query_param_contains(key: &'static str, needle: &'static str) -> impl wiremock::Match {
    move |request: &wiremock::Request| {
        request
            .url
            .query_pairs()
            .any(|(k, v)| k == key && v.contains(needle))
    }
}

#[tokio::test]
async fn test_expiring_token_is_refreshed_and_saved() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("ocm.json");
    let fresh = expiring_in(3600);

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=my-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": fresh,
            "refresh_token": "rotated-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/accounts_mgmt/v1/current_account"))
        .and(header("Authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "acc-1",
            "username": "jdoe",
            "organization": {"id": "org-1", "name": "Acme"}
        })))
        .mount(&server)
        .await;

    let config = Config {
        access_token: expiring_in(60),
        refresh_token: "my-refresh".into(),
        token_url: format!("{}/token", server.uri()),
        url: server.uri(),
        ..Default::default()
    };
    config.save_to_path(&config_path).await.unwrap();

    let client = ClientBuilder::new()
        .config_path(&config_path)
        .build()
        .await
        .unwrap();

    let account = client.get_current_account().await.unwrap();
    assert_eq!(account.username, "jdoe");
    assert_eq!(account.organization.unwrap().name, "Acme");

    let saved = Config::load_from_path(&config_path).await.unwrap().unwrap();
    assert_eq!(saved.access_token, fresh);
    assert_eq!(saved.refresh_token, "rotated-refresh");
    assert_eq!(client.tokens().await.access_token, fresh);
}

#[tokio::test]
async fn test_failed_refresh_reports_connection_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let config = Config {
        refresh_token: "stale".into(),
        token_url: format!("{}/token", server.uri()),
        url: server.uri(),
        ..Default::default()
    };
    let err = ClientBuilder::new()
        .config(config)
        .config_path(dir.path().join("ocm.json"))
        .build()
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error creating connection. Not able to get authentication token"
    );
}

#[tokio::test]
async fn test_install_addon_body() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/clusters_mgmt/v1/clusters/1a2b/addons"))
        .and(body_json(json!({
            "addon": {"id": "codeready-workspaces"},
            "parameters": {"items": [{"id": "namespace", "value": "crw"}]}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "codeready-workspaces",
            "addon": {"id": "codeready-workspaces"},
            "state": "installing"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &dir).await;
    let params = vec![AddOnParam {
        id: "namespace".into(),
        value: "crw".into(),
    }];
    let installation = client
        .install_addon("1a2b", "codeready-workspaces", &params)
        .await
        .unwrap();
    assert_eq!(installation.state, "installing");
}

#[tokio::test]
async fn test_user_group_paths() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/clusters_mgmt/v1/clusters/1a2b/groups/dedicated-admins/users"))
        .and(body_json(json!({"id": "alice"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "alice"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/clusters_mgmt/v1/clusters/1a2b/groups/cluster-admins/users/bob"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &dir).await;
    let user = client
        .add_user("1a2b", UserGroup::DedicatedAdmins, "alice")
        .await
        .unwrap();
    assert_eq!(user.id, "alice");
    client
        .delete_user("1a2b", UserGroup::ClusterAdmins, "bob")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_catalog_filters() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/clusters_mgmt/v1/cloud_providers/aws/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "us-east-1", "enabled": true},
                {"id": "ap-east-1", "enabled": false}
            ],
            "total": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clusters_mgmt/v1/versions"))
        .and(query_param("search", "enabled = 'true'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "openshift-v4.5.2", "enabled": true}],
            "total": 1
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &dir).await;
    let regions = client.get_regions().await.unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].id, "us-east-1");

    let versions = client.get_versions().await.unwrap();
    assert_eq!(versions[0].short_id(), "4.5.2");
}

#[tokio::test]
async fn test_identifiers_cannot_escape_their_path_segment() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &dir).await;

    let err = client
        .uninstall_addon("mine", "../../victim")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest { .. }), "{err:?}");
    assert_eq!(err.to_string(), "Invalid identifier '../../victim'");

    assert!(client
        .delete_user("mine", UserGroup::ClusterAdmins, "..")
        .await
        .is_err());
    assert!(client.delete_identity_provider("mine", "a/b").await.is_err());
    assert!(client.delete_machine_pool("mine", "%2e%2e").await.is_err());
    assert!(client.delete_cluster("..").await.is_err());
}
