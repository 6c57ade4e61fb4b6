//! Steps shared by the handlers: connecting, resolving the AWS creator and
//! loading the cluster a command works on

use crate::aws::{AwsClient, Creator};
use crate::error::{CliError, Result};
use crate::output::progress::with_spinner;
use rosa_ocm::types::Cluster;
use rosa_ocm::{ApiError, ClientBuilder, OcmClient};
use tracing::debug;

/// Hint shown when the stored tokens cannot be used
pub const LOGIN_HINT: &str = "Run 'rosa login' to get a new token";

/// Open the OCM connection from the login file
pub async fn connect() -> Result<OcmClient> {
    connect_with(ClientBuilder::new()).await
}

/// Build a client from a configured builder, reporting failures with the login hint
pub async fn connect_with(builder: ClientBuilder) -> Result<OcmClient> {
    with_spinner("Connecting to OCM", builder.build())
        .await
        .map_err(|e| {
            let message = format!("Failed to create OCM connection: {e}");
            match e {
                ApiError::Auth(_) | ApiError::Config(_) => {
                    CliError::with_suggestion(message, LOGIN_HINT)
                }
                _ => CliError::command(message),
            }
        })
}

/// AWS identity running the command
pub async fn aws_creator() -> Result<Creator> {
    let aws = AwsClient::new(None).await;
    with_spinner("Checking AWS credentials", aws.get_creator()).await
}

/// Everything a cluster scoped command needs
pub struct Session {
    pub ocm: OcmClient,
    pub creator: Creator,
}

impl Session {
    pub async fn new() -> Result<Self> {
        let creator = aws_creator().await?;
        let ocm = connect().await?;
        Ok(Self { ocm, creator })
    }

    /// Look up a cluster owned by the caller by name, ID or external ID
    pub async fn cluster(&self, key: &str) -> Result<Cluster> {
        rosa_common::validate_cluster_key(key)?;

        debug!("Loading cluster '{}'", key);
        with_spinner(
            &format!("Loading cluster '{key}'"),
            self.ocm.get_cluster(key, &self.creator.arn),
        )
        .await
        .map_err(|e| CliError::command(format!("Failed to get cluster '{key}': {e}")))
    }

    /// Same as [`Session::cluster`] but fails unless the cluster is ready
    pub async fn ready_cluster(&self, key: &str) -> Result<Cluster> {
        let cluster = self.cluster(key).await?;
        require_ready(&cluster, key)?;
        Ok(cluster)
    }
}

pub fn require_ready(cluster: &Cluster, key: &str) -> Result<()> {
    if cluster.is_ready() {
        Ok(())
    } else {
        Err(CliError::command(format!("Cluster '{key}' is not yet ready")))
    }
}

/// Split a comma separated flag value, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
