//! Cluster identity providers

use super::{cluster_path, segment};
use crate::error::Result;
use crate::types::IdentityProvider;
use crate::OcmClient;

impl OcmClient {
    pub async fn get_identity_providers(&self, cluster_id: &str) -> Result<Vec<IdentityProvider>> {
        let path = format!("{}/identity_providers", cluster_path(cluster_id)?);
        self.list_all(&path, None).await
    }

    pub async fn create_identity_provider(
        &self,
        cluster_id: &str,
        idp: &IdentityProvider,
    ) -> Result<IdentityProvider> {
        let path = format!("{}/identity_providers", cluster_path(cluster_id)?);
        self.post(&path, idp).await
    }

    pub async fn delete_identity_provider(&self, cluster_id: &str, idp_id: &str) -> Result<()> {
        let path = format!(
            "{}/identity_providers/{}",
            cluster_path(cluster_id)?,
            segment(idp_id)?
        );
        self.delete(&path).await
    }
}
