//! Cluster lookup, lifecycle and related sub-resources

use super::{cluster_path, CLUSTERS_MGMT};
use crate::error::{ApiError, Result};
use crate::types::{
    Cluster, ClusterNodes, ClusterSpec, Ingress, ListResponse, LogEntry, UpgradePolicy,
    CREATOR_ARN_PROPERTY,
};
use crate::OcmClient;
use serde_json::json;
use tracing::debug;

/// Upgrade type of policies that upgrade the cluster itself
const CLUSTER_UPGRADE_TYPE: &str = "OSD";

fn creator_filter(creator_arn: &str) -> String {
    format!("properties.{CREATOR_ARN_PROPERTY} = '{creator_arn}'")
}

impl OcmClient {
    async fn count_clusters(&self, search: &str) -> Result<(u32, Option<Cluster>)> {
        let path = format!("{CLUSTERS_MGMT}/clusters");
        let query = [("search", search), ("size", "1")];
        let response: ListResponse<Cluster> = self.get_with_query(&path, &query).await?;
        let total = response.total.max(response.items.len() as u32);
        Ok((total, response.items.into_iter().next()))
    }

    /// Find the cluster with the given id, name or external id created by `creator_arn`
    ///
    /// The key must already be validated with
    /// `rosa_common::validate_cluster_key` since it is embedded in the search
    /// expression.
    pub async fn get_cluster(&self, key: &str, creator_arn: &str) -> Result<Cluster> {
        let search = format!(
            "(id = '{key}' or name = '{key}' or external_id = '{key}') and {}",
            creator_filter(creator_arn)
        );
        debug!("Searching clusters with '{}'", search);

        match self.count_clusters(&search).await? {
            (0, _) | (_, None) => Err(ApiError::NotFound {
                message: format!("There is no cluster with identifier or name '{key}'"),
            }),
            (1, Some(cluster)) => Ok(cluster),
            (total, _) => Err(ApiError::Ambiguous {
                message: format!("There are {total} clusters with identifier or name '{key}'"),
            }),
        }
    }

    /// Like [`get_cluster`](Self::get_cluster) but a missing cluster is `None`
    pub async fn find_cluster(&self, key: &str, creator_arn: &str) -> Result<Option<Cluster>> {
        match self.get_cluster(key, creator_arn).await {
            Ok(cluster) => Ok(Some(cluster)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check if `creator_arn` already owns a cluster with this name
    pub async fn has_cluster_named(&self, name: &str, creator_arn: &str) -> Result<bool> {
        let search = format!("name = '{name}' and {}", creator_filter(creator_arn));
        let (total, _) = self.count_clusters(&search).await?;
        Ok(total > 0)
    }

    /// List the clusters created by `creator_arn`
    pub async fn list_clusters(&self, creator_arn: &str) -> Result<Vec<Cluster>> {
        let path = format!("{CLUSTERS_MGMT}/clusters");
        self.list_all(&path, Some(&creator_filter(creator_arn)))
            .await
    }

    /// Create a cluster
    pub async fn create_cluster(&self, spec: &ClusterSpec) -> Result<Cluster> {
        let path = format!("{CLUSTERS_MGMT}/clusters");
        self.post(&path, &spec.body()).await
    }

    /// Start uninstalling a cluster
    pub async fn delete_cluster(&self, cluster_id: &str) -> Result<()> {
        self.delete(&cluster_path(cluster_id)?).await
    }

    /// Change the compute nodes of the default machine pool
    pub async fn patch_cluster_nodes(
        &self,
        cluster_id: &str,
        nodes: &ClusterNodes,
    ) -> Result<Cluster> {
        self.patch(&cluster_path(cluster_id)?, &json!({ "nodes": nodes }))
            .await
    }

    pub async fn get_ingresses(&self, cluster_id: &str) -> Result<Vec<Ingress>> {
        let path = format!("{}/ingresses", cluster_path(cluster_id)?);
        self.list_all(&path, None).await
    }

    /// Next scheduled cluster upgrade, if any
    pub async fn get_scheduled_upgrade(&self, cluster_id: &str) -> Result<Option<UpgradePolicy>> {
        let path = format!("{}/upgrade_policies", cluster_path(cluster_id)?);
        let policies: Vec<UpgradePolicy> = self.list_all(&path, None).await?;
        Ok(policies
            .into_iter()
            .find(|p| p.upgrade_type == CLUSTER_UPGRADE_TYPE && p.next_run.is_some()))
    }

    /// Installation log; `tail` limits it to the last lines
    pub async fn get_install_logs(&self, cluster_id: &str, tail: Option<u32>) -> Result<LogEntry> {
        self.get_logs(cluster_id, "install", tail).await
    }

    /// Uninstallation log; `tail` limits it to the last lines
    pub async fn get_uninstall_logs(
        &self,
        cluster_id: &str,
        tail: Option<u32>,
    ) -> Result<LogEntry> {
        self.get_logs(cluster_id, "uninstall", tail).await
    }

    async fn get_logs(&self, cluster_id: &str, kind: &str, tail: Option<u32>) -> Result<LogEntry> {
        let path = format!("{}/logs/{kind}", cluster_path(cluster_id)?);
        let query: Vec<(&str, String)> = tail.map(|t| ("tail", t.to_string())).into_iter().collect();
        self.get_with_query(&path, &query).await
    }
}
