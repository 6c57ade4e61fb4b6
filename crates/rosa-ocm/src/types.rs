//! Request and response types of the clusters and accounts management APIs
//!
//! Only the fields the CLI reads or writes are modelled. Unknown fields are
//! ignored on decode and `None` fields are left out on encode, so the same
//! types serve as PATCH bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Cluster property holding the ARN of the AWS identity that created it
pub const CREATOR_ARN_PROPERTY: &str = "rosa_creator_arn";

/// Product identifier sent when creating clusters
pub const PRODUCT_ID: &str = "rosa";

/// Prefix of OpenShift version identifiers
pub const VERSION_PREFIX: &str = "openshift-v";

/// Page of a collection
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Reference to another object by identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl ObjectRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: None,
        }
    }
}

// ===== Clusters =====

/// Lifecycle state of a cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterState {
    Error,
    Hibernating,
    Installing,
    Pending,
    PoweringDown,
    Ready,
    Resuming,
    Uninstalling,
    Validating,
    Waiting,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ClusterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterState::Error => "error",
            ClusterState::Hibernating => "hibernating",
            ClusterState::Installing => "installing",
            ClusterState::Pending => "pending",
            ClusterState::PoweringDown => "powering_down",
            ClusterState::Ready => "ready",
            ClusterState::Resuming => "resuming",
            ClusterState::Uninstalling => "uninstalling",
            ClusterState::Validating => "validating",
            ClusterState::Waiting => "waiting",
            ClusterState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterStatus {
    #[serde(default)]
    pub state: ClusterState,
    #[serde(default)]
    pub dns_ready: bool,
    #[serde(default)]
    pub provision_error_code: String,
    #[serde(default)]
    pub provision_error_message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoscaleCompute {
    pub min_replicas: u32,
    pub max_replicas: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterNodes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscale_compute: Option<AutoscaleCompute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_machine_type: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dns {
    #[serde(default)]
    pub base_domain: String,
}

/// Whether an endpoint is reachable from the internet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningMethod {
    #[default]
    External,
    Internal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterApi {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listening: Option<ListeningMethod>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterConsole {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub raw_id: String,
    #[serde(default)]
    pub channel_group: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_cidr: Option<IpNet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_cidr: Option<IpNet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_cidr: Option<IpNet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_prefix: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub state: ClusterState,
    #[serde(default)]
    pub status: ClusterStatus,
    #[serde(default)]
    pub nodes: ClusterNodes,
    #[serde(default)]
    pub dns: Dns,
    #[serde(default)]
    pub api: ClusterApi,
    #[serde(default)]
    pub console: ClusterConsole,
    #[serde(default)]
    pub region: ObjectRef,
    #[serde(default)]
    pub version: VersionRef,
    #[serde(default)]
    pub multi_az: bool,
    #[serde(default)]
    pub network: ClusterNetwork,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiration_timestamp: Option<DateTime<Utc>>,
}

impl Cluster {
    /// Display name, falling back to the name
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// ARN of the AWS identity that created the cluster
    pub fn creator_arn(&self) -> Option<&str> {
        self.properties
            .get(CREATOR_ARN_PROPERTY)
            .map(String::as_str)
    }

    pub fn is_ready(&self) -> bool {
        self.state == ClusterState::Ready
    }

    /// Base URL of the cluster OAuth server
    pub fn oauth_url(&self) -> String {
        format!(
            "https://oauth-openshift.apps.{}.{}",
            self.name, self.dns.base_domain
        )
    }
}

/// Input for creating a cluster
#[derive(Debug, Clone, Default)]
pub struct ClusterSpec {
    pub name: String,
    pub region: String,
    pub multi_az: bool,
    /// Version identifier including the `openshift-v` prefix
    pub version: Option<String>,
    pub expiration: Option<DateTime<Utc>>,
    pub compute_machine_type: Option<String>,
    pub compute_nodes: Option<u32>,
    pub machine_cidr: Option<IpNet>,
    pub service_cidr: Option<IpNet>,
    pub pod_cidr: Option<IpNet>,
    pub host_prefix: Option<u8>,
    pub private: bool,
    pub creator_arn: String,
}

impl ClusterSpec {
    /// Request body for `POST /api/clusters_mgmt/v1/clusters`
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".into(), json!(self.name));
        body.insert("cloud_provider".into(), json!({"id": "aws"}));
        body.insert("product".into(), json!({"id": PRODUCT_ID}));
        body.insert("region".into(), json!({"id": self.region}));
        body.insert("multi_az".into(), json!(self.multi_az));
        body.insert(
            "properties".into(),
            json!({CREATOR_ARN_PROPERTY: self.creator_arn}),
        );

        if let Some(version) = &self.version {
            body.insert("version".into(), json!({"id": version}));
        }
        if let Some(expiration) = &self.expiration {
            body.insert(
                "expiration_timestamp".into(),
                json!(expiration.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }

        let nodes = ClusterNodes {
            compute: self.compute_nodes,
            compute_machine_type: self.compute_machine_type.clone().map(ObjectRef::new),
            ..Default::default()
        };
        if nodes.compute.is_some() || nodes.compute_machine_type.is_some() {
            body.insert("nodes".into(), json!(nodes));
        }

        let network = ClusterNetwork {
            machine_cidr: self.machine_cidr,
            service_cidr: self.service_cidr,
            pod_cidr: self.pod_cidr,
            host_prefix: self.host_prefix,
        };
        if network.machine_cidr.is_some()
            || network.service_cidr.is_some()
            || network.pod_cidr.is_some()
            || network.host_prefix.is_some()
        {
            body.insert("network".into(), json!(network));
        }

        if self.private {
            body.insert("api".into(), json!({"listening": ListeningMethod::Internal}));
        }

        Value::Object(body)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ingress {
    pub id: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub listening: ListeningMethod,
    #[serde(default)]
    pub dns_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradePolicy {
    pub id: String,
    #[serde(default)]
    pub schedule_type: String,
    #[serde(default)]
    pub upgrade_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub next_run: Option<DateTime<Utc>>,
}

/// Installation or uninstallation log of a cluster
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: String,
}

// ===== Identity providers =====

/// Kind of identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdpType {
    #[serde(rename = "GithubIdentityProvider")]
    GitHub,
    #[serde(rename = "GitlabIdentityProvider")]
    GitLab,
    #[serde(rename = "GoogleIdentityProvider")]
    Google,
    #[serde(rename = "HTPasswdIdentityProvider")]
    HTPasswd,
    #[serde(rename = "LDAPIdentityProvider")]
    Ldap,
    #[serde(rename = "OpenIDIdentityProvider")]
    OpenId,
}

impl IdpType {
    /// Name used on the command line and in default provider names
    pub fn as_str(&self) -> &'static str {
        match self {
            IdpType::GitHub => "github",
            IdpType::GitLab => "gitlab",
            IdpType::Google => "google",
            IdpType::HTPasswd => "htpasswd",
            IdpType::Ldap => "ldap",
            IdpType::OpenId => "openid",
        }
    }

    /// Label shown in listings
    pub fn display_name(&self) -> &'static str {
        match self {
            IdpType::GitHub => "GitHub",
            IdpType::GitLab => "GitLab",
            IdpType::Google => "Google",
            IdpType::HTPasswd => "HTPasswd",
            IdpType::Ldap => "LDAP",
            IdpType::OpenId => "OpenID",
        }
    }

    /// Whether users log in through an OAuth redirect
    pub fn uses_oauth_callback(&self) -> bool {
        !matches!(self, IdpType::HTPasswd | IdpType::Ldap)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubIdp {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitlabIdp {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_secret: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleIdp {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hosted_domain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HtpasswdIdp {
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenIdClaims {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_username: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenIdIdp {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_secret: String,
    pub issuer: String,
    #[serde(default)]
    pub claims: OpenIdClaims,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProvider {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IdpType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubIdp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab: Option<GitlabIdp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<GoogleIdp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub htpasswd: Option<HtpasswdIdp>,
    #[serde(default, rename = "open_id", skip_serializing_if = "Option::is_none")]
    pub openid: Option<OpenIdIdp>,
}

impl IdentityProvider {
    pub fn new(name: impl Into<String>, kind: IdpType) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            kind,
            mapping_method: None,
            github: None,
            gitlab: None,
            google: None,
            htpasswd: None,
            openid: None,
        }
    }
}

/// OAuth callback URL to register with the provider's OAuth application
pub fn oauth_callback_url(cluster: &Cluster, idp_name: &str) -> String {
    format!("{}/oauth2callback/{}", cluster.oauth_url(), idp_name)
}

// ===== Users =====

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
}

// ===== Add-ons =====

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddOnParameter {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value_type: String,
    #[serde(default)]
    pub validation: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub default_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddOnParameters {
    #[serde(default)]
    pub items: Vec<AddOnParameter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddOn {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub parameters: Option<AddOnParameters>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddOnInstallation {
    pub id: String,
    #[serde(default)]
    pub addon: ObjectRef,
    #[serde(default)]
    pub state: String,
}

/// Value given to an add-on parameter at install time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOnParam {
    pub id: String,
    pub value: String,
}

// ===== Machine pools =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachinePoolAutoscaling {
    pub min_replicas: u32,
    pub max_replicas: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachinePool {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<MachinePoolAutoscaling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zones: Option<Vec<String>>,
}

// ===== Catalog =====

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    #[serde(default)]
    pub raw_id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub channel_group: String,
}

impl Version {
    /// Version number without the `openshift-v` prefix
    pub fn short_id(&self) -> &str {
        self.id.strip_prefix(VERSION_PREFIX).unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Quantity {
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cpu: Quantity,
    #[serde(default)]
    pub memory: Quantity,
}

impl MachineType {
    /// Memory in GiB
    pub fn memory_gib(&self) -> f64 {
        self.memory.value / (1024.0 * 1024.0 * 1024.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudRegion {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub supports_multi_az: bool,
}

// ===== Accounts =====

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub external_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub organization: Option<Organization>,
}
