//! Versions, instance types and regions offered for new clusters

use super::CLUSTERS_MGMT;
use crate::error::Result;
use crate::types::{CloudRegion, MachineType, Version};
use crate::OcmClient;

impl OcmClient {
    /// Enabled OpenShift versions
    pub async fn get_versions(&self) -> Result<Vec<Version>> {
        let path = format!("{CLUSTERS_MGMT}/versions");
        self.list_all(&path, Some("enabled = 'true'")).await
    }

    /// AWS instance types
    pub async fn get_machine_types(&self) -> Result<Vec<MachineType>> {
        let path = format!("{CLUSTERS_MGMT}/machine_types");
        self.list_all(&path, Some("cloud_provider.id = 'aws'"))
            .await
    }

    /// Enabled AWS regions
    pub async fn get_regions(&self) -> Result<Vec<CloudRegion>> {
        let path = format!("{CLUSTERS_MGMT}/cloud_providers/aws/regions");
        let regions: Vec<CloudRegion> = self.list_all(&path, None).await?;
        Ok(regions.into_iter().filter(|r| r.enabled).collect())
    }
}
