//! Additional machine pools
//!
//! The `default` pool is not a machine pool resource; it is the compute
//! section of the cluster and is changed with
//! [`patch_cluster_nodes`](crate::OcmClient::patch_cluster_nodes).

use super::{cluster_path, segment};
use crate::error::Result;
use crate::types::MachinePool;
use crate::OcmClient;

/// Identifier of the pool made of the cluster compute nodes
pub const DEFAULT_MACHINE_POOL: &str = "default";

fn pools_path(cluster_id: &str) -> Result<String> {
    Ok(format!("{}/machine_pools", cluster_path(cluster_id)?))
}

impl OcmClient {
    pub async fn get_machine_pools(&self, cluster_id: &str) -> Result<Vec<MachinePool>> {
        self.list_all(&pools_path(cluster_id)?, None).await
    }

    pub async fn create_machine_pool(
        &self,
        cluster_id: &str,
        pool: &MachinePool,
    ) -> Result<MachinePool> {
        self.post(&pools_path(cluster_id)?, pool).await
    }

    pub async fn update_machine_pool(
        &self,
        cluster_id: &str,
        pool_id: &str,
        patch: &MachinePool,
    ) -> Result<MachinePool> {
        let path = format!("{}/{}", pools_path(cluster_id)?, segment(pool_id)?);
        self.patch(&path, patch).await
    }

    pub async fn delete_machine_pool(&self, cluster_id: &str, pool_id: &str) -> Result<()> {
        let path = format!("{}/{}", pools_path(cluster_id)?, segment(pool_id)?);
        self.delete(&path).await
    }
}
