use clap::{Subcommand, ValueEnum};
use ipnet::IpNet;
use rosa_ocm::types::IdpType;
use std::time::Duration;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to your Red Hat account
    Login(LoginArgs),

    /// Log out and remove the stored tokens
    Logout,

    /// Show the AWS and OCM accounts in use
    Whoami,

    /// Create a resource
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// Delete a resource
    #[command(alias = "remove")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Edit a resource
    Edit {
        #[command(subcommand)]
        resource: EditResource,
    },

    /// Show details of a resource
    Describe {
        #[command(subcommand)]
        resource: DescribeResource,
    },

    /// List resources
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Install a resource on a cluster
    Install {
        #[command(subcommand)]
        resource: InstallResource,
    },

    /// Remove a resource from a cluster
    Uninstall {
        #[command(subcommand)]
        resource: UninstallResource,
    },

    /// Show installation or uninstallation logs
    Logs {
        #[command(subcommand)]
        resource: LogsResource,
    },
}

#[derive(Subcommand, Debug)]
pub enum CreateResource {
    /// Create cluster
    Cluster(CreateClusterArgs),

    /// Add an identity provider to a cluster
    #[command(alias = "idps")]
    Idp(CreateIdpArgs),

    /// Grant admin rights to users of a cluster
    #[command(alias = "users")]
    User(UserArgs),

    /// Add a machine pool to a cluster
    #[command(aliases = ["machinepools", "machine-pool", "machine-pools"])]
    Machinepool(CreateMachinePoolArgs),
}

#[derive(Subcommand, Debug)]
pub enum DeleteResource {
    /// Delete cluster
    Cluster(ClusterArgs),

    /// Remove an identity provider from a cluster
    #[command(alias = "idps")]
    Idp(DeleteIdpArgs),

    /// Revoke admin rights of users of a cluster
    #[command(alias = "users")]
    User(UserArgs),

    /// Delete a machine pool
    #[command(aliases = ["machinepools", "machine-pool", "machine-pools"])]
    Machinepool(MachinePoolIdArgs),
}

#[derive(Subcommand, Debug)]
pub enum EditResource {
    /// Change the scaling or labels of a machine pool
    #[command(aliases = ["machinepools", "machine-pool", "machine-pools"])]
    Machinepool(EditMachinePoolArgs),
}

#[derive(Subcommand, Debug)]
pub enum DescribeResource {
    /// Show details of a cluster
    Cluster(DescribeClusterArgs),
}

#[derive(Subcommand, Debug)]
pub enum ListResource {
    /// List clusters
    #[command(alias = "cluster")]
    Clusters,

    /// List identity providers of a cluster
    #[command(alias = "idp")]
    Idps(ClusterArgs),

    /// List admin users of a cluster
    #[command(alias = "user")]
    Users(ClusterArgs),

    /// List add-ons and their installation state on a cluster
    #[command(aliases = ["addon", "add-on", "add-ons"])]
    Addons(ClusterArgs),

    /// List machine pools of a cluster
    #[command(aliases = ["machinepool", "machine-pool", "machine-pools"])]
    Machinepools(ClusterArgs),

    /// List available AWS regions
    #[command(alias = "region")]
    Regions(ListRegionsArgs),

    /// List available OpenShift versions
    #[command(alias = "version")]
    Versions,

    /// List available compute instance types
    #[command(aliases = ["instance-type", "machine-types"])]
    InstanceTypes,
}

#[derive(Subcommand, Debug)]
pub enum InstallResource {
    /// Install an add-on on a cluster
    #[command(aliases = ["addons", "add-on", "add-ons"])]
    Addon(AddonArgs),
}

#[derive(Subcommand, Debug)]
pub enum UninstallResource {
    /// Uninstall an add-on from a cluster
    #[command(aliases = ["addons", "add-on", "add-ons"])]
    Addon(AddonArgs),
}

#[derive(Subcommand, Debug)]
pub enum LogsResource {
    /// Show the logs of a cluster
    Cluster(LogsArgs),
}

/// Options for `rosa login`
#[derive(clap::Args, Debug, Default)]
pub struct LoginArgs {
    /// Access or refresh token from https://cloud.redhat.com/openshift/token/rosa
    #[arg(short, long, default_value = "")]
    pub token: String,

    /// OCM environment: production, staging or integration
    #[arg(long, default_value = "")]
    pub env: String,

    /// URL of the OCM API; overrides --env
    #[arg(long, default_value = "")]
    pub url: String,

    /// OpenID token URL
    #[arg(long, default_value = "")]
    pub token_url: String,

    /// OpenID client identifier
    #[arg(long, default_value = "")]
    pub client_id: String,

    /// OpenID client secret, used instead of a token
    #[arg(long, default_value = "")]
    pub client_secret: String,

    /// OpenID scope; may be repeated
    #[arg(long = "scope")]
    pub scopes: Vec<String>,

    /// Skip verification of the server TLS certificate
    #[arg(long)]
    pub insecure: bool,
}

/// Selects the cluster a command works on
#[derive(clap::Args, Debug, Default)]
pub struct ClusterArgs {
    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct DescribeClusterArgs {
    /// Name or ID of the cluster
    #[arg(value_name = "ID|NAME")]
    pub key: Option<String>,

    /// Name or ID of the cluster; takes precedence over the positional argument
    #[arg(short = 'c', long = "cluster")]
    pub cluster: Option<String>,
}

#[derive(clap::Args, Debug, Default)]
pub struct CreateClusterArgs {
    /// Name of the cluster. This will be used when generating a sub-domain for your cluster on openshiftapps.com.
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// AWS region where your worker pool will be located. (overrides the AWS_REGION environment variable)
    #[arg(short, long, default_value = "")]
    pub region: String,

    /// Version of OpenShift that will be used to install the cluster, for example "4.3.10"
    #[arg(long, default_value = "")]
    pub version: String,

    /// Deploy to multiple data centers.
    #[arg(long)]
    pub multi_az: bool,

    /// Specific time when cluster should expire (RFC3339). Only one of expiration-time / expiration may be used.
    #[arg(long, hide = true, default_value = "")]
    pub expiration_time: String,

    /// Expire cluster after a relative duration like 2h, 8h, 72h. Only one of expiration-time / expiration may be used.
    #[arg(long, hide = true, value_parser = humantime::parse_duration)]
    pub expiration: Option<Duration>,

    /// Instance type for the compute nodes. Determines the amount of memory and vCPU allocated to each compute node.
    #[arg(long, default_value = "")]
    pub compute_machine_type: String,

    /// Number of worker nodes to provision per zone. Single zone clusters need at least 4 nodes, while multizone clusters need at least 9 nodes (3 per zone) for resiliency.
    #[arg(long, default_value_t = 0)]
    pub compute_nodes: u32,

    /// Block of IP addresses used by OpenShift while installing the cluster, for example "10.0.0.0/16".
    #[arg(long)]
    pub machine_cidr: Option<IpNet>,

    /// Block of IP addresses for services, for example "172.30.0.0/16".
    #[arg(long)]
    pub service_cidr: Option<IpNet>,

    /// Block of IP addresses from which Pod IP addresses are allocated, for example "10.128.0.0/14".
    #[arg(long)]
    pub pod_cidr: Option<IpNet>,

    /// Subnet prefix length to assign to each individual node. For example, if host prefix is set to "23", then each node is assigned a /23 subnet out of the given CIDR.
    #[arg(long, default_value_t = 0)]
    pub host_prefix: u32,

    /// Restrict master API endpoint and application routes to direct, private connectivity.
    #[arg(long)]
    pub private: bool,

    /// Watch cluster installation logs.
    #[arg(long)]
    pub watch: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct LogsArgs {
    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,

    /// Keep polling and print new log lines until the cluster settles
    #[arg(short, long)]
    pub watch: bool,

    /// Number of lines to get from the end of the log
    #[arg(long)]
    pub tail: Option<u32>,
}

/// Identity provider kinds that can be created from the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdpKind {
    Github,
    Gitlab,
    Google,
    Htpasswd,
    Openid,
}

impl IdpKind {
    pub const ALL: [IdpKind; 5] = [
        IdpKind::Github,
        IdpKind::Gitlab,
        IdpKind::Google,
        IdpKind::Htpasswd,
        IdpKind::Openid,
    ];

    pub fn idp_type(self) -> IdpType {
        match self {
            IdpKind::Github => IdpType::GitHub,
            IdpKind::Gitlab => IdpType::GitLab,
            IdpKind::Google => IdpType::Google,
            IdpKind::Htpasswd => IdpType::HTPasswd,
            IdpKind::Openid => IdpType::OpenId,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.idp_type().as_str() == name)
    }
}

/// How users coming from a provider are mapped to cluster identities
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingMethod {
    Claim,
    Lookup,
    Generate,
    Add,
}

impl MappingMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            MappingMethod::Claim => "claim",
            MappingMethod::Lookup => "lookup",
            MappingMethod::Generate => "generate",
            MappingMethod::Add => "add",
        }
    }
}

#[derive(clap::Args, Debug, Default)]
pub struct CreateIdpArgs {
    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,

    /// Type of identity provider
    #[arg(short = 't', long = "type", value_enum)]
    pub kind: Option<IdpKind>,

    /// Name of the identity provider; defaults to <type>-<n>
    #[arg(long, default_value = "")]
    pub name: String,

    /// How new identities are mapped to users when they log in
    #[arg(long, value_enum)]
    pub mapping_method: Option<MappingMethod>,

    /// Client ID from the registered OAuth application
    #[arg(long, default_value = "")]
    pub client_id: String,

    /// Client secret from the registered OAuth application
    #[arg(long, default_value = "")]
    pub client_secret: String,

    /// GitHub: only users that are members of at least one of these organizations may log in
    #[arg(long, value_delimiter = ',')]
    pub organizations: Vec<String>,

    /// GitHub: only users that are members of at least one of these teams (org/team) may log in
    #[arg(long, value_delimiter = ',')]
    pub teams: Vec<String>,

    /// GitHub Enterprise: hostname of the instance
    #[arg(long, default_value = "")]
    pub hostname: String,

    /// GitLab: URL of the GitLab instance
    #[arg(long, default_value = "")]
    pub host_url: String,

    /// Google: restrict users to this hosted domain
    #[arg(long, default_value = "")]
    pub hosted_domain: String,

    /// HTPasswd: username of the single user
    #[arg(long, default_value = "")]
    pub username: String,

    /// HTPasswd: password of the single user
    #[arg(long, default_value = "")]
    pub password: String,

    /// OpenID: URL the provider asserts as its issuer identifier
    #[arg(long, default_value = "")]
    pub issuer_url: String,

    /// OpenID: claims used as the email address
    #[arg(long, value_delimiter = ',')]
    pub email_claims: Vec<String>,

    /// OpenID: claims used as the display name
    #[arg(long, value_delimiter = ',')]
    pub name_claims: Vec<String>,

    /// OpenID: claims used as the preferred username
    #[arg(long, value_delimiter = ',')]
    pub username_claims: Vec<String>,
}

#[derive(clap::Args, Debug, Default)]
pub struct DeleteIdpArgs {
    /// Name of the identity provider
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct UserArgs {
    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,

    /// Comma-separated list of cluster-admins
    #[arg(long, default_value = "")]
    pub cluster_admins: String,

    /// Comma-separated list of dedicated-admins
    #[arg(long, default_value = "")]
    pub dedicated_admins: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct AddonArgs {
    /// Identifier of the add-on
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,

    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,
}

/// Replica count or autoscaling bounds of a machine pool
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ScalingArgs {
    /// Fixed number of nodes
    #[arg(long)]
    pub replicas: Option<u32>,

    /// Let the cluster scale the pool between --min-replicas and --max-replicas
    #[arg(long)]
    pub enable_autoscaling: bool,

    /// Lower bound of autoscaling
    #[arg(long)]
    pub min_replicas: Option<u32>,

    /// Upper bound of autoscaling
    #[arg(long)]
    pub max_replicas: Option<u32>,
}

#[derive(clap::Args, Debug, Default)]
pub struct CreateMachinePoolArgs {
    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,

    /// Name of the machine pool
    #[arg(long, default_value = "")]
    pub name: String,

    /// Instance type of the nodes
    #[arg(long, default_value = "")]
    pub instance_type: String,

    #[command(flatten)]
    pub scaling: ScalingArgs,

    /// Node labels as key=value pairs separated by commas
    #[arg(long)]
    pub labels: Option<String>,
}

#[derive(clap::Args, Debug, Default)]
pub struct EditMachinePoolArgs {
    /// Identifier of the machine pool
    #[arg(value_name = "ID")]
    pub id: String,

    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,

    #[command(flatten)]
    pub scaling: ScalingArgs,

    /// Node labels as key=value pairs separated by commas; empty removes all labels
    #[arg(long)]
    pub labels: Option<String>,
}

#[derive(clap::Args, Debug, Default)]
pub struct MachinePoolIdArgs {
    /// Identifier of the machine pool
    #[arg(value_name = "ID")]
    pub id: String,

    /// Name or ID of the cluster
    #[arg(short, long)]
    pub cluster: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct ListRegionsArgs {
    /// Only show regions that support multiple availability zones
    #[arg(long)]
    pub multi_az: bool,
}
