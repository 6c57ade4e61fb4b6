//! Add-on catalog and add-on installations

use super::{cluster_path, segment, CLUSTERS_MGMT};
use crate::error::Result;
use crate::types::{AddOn, AddOnInstallation, AddOnParam, AddOnParameter};
use crate::OcmClient;
use serde_json::json;

impl OcmClient {
    /// Add-ons available to the current organization
    pub async fn get_addons(&self) -> Result<Vec<AddOn>> {
        let path = format!("{CLUSTERS_MGMT}/addons");
        let addons: Vec<AddOn> = self.list_all(&path, None).await?;
        Ok(addons.into_iter().filter(|a| a.enabled).collect())
    }

    pub async fn get_addon(&self, addon_id: &str) -> Result<AddOn> {
        self.get(&format!("{CLUSTERS_MGMT}/addons/{}", segment(addon_id)?))
            .await
    }

    /// Parameters the user must provide when installing the add-on
    pub async fn get_addon_parameters(&self, addon_id: &str) -> Result<Vec<AddOnParameter>> {
        let addon = self.get_addon(addon_id).await?;
        Ok(addon.parameters.map(|p| p.items).unwrap_or_default())
    }

    pub async fn get_addon_installations(&self, cluster_id: &str) -> Result<Vec<AddOnInstallation>> {
        let path = format!("{}/addons", cluster_path(cluster_id)?);
        self.list_all(&path, None).await
    }

    pub async fn install_addon(
        &self,
        cluster_id: &str,
        addon_id: &str,
        params: &[AddOnParam],
    ) -> Result<AddOnInstallation> {
        let path = format!("{}/addons", cluster_path(cluster_id)?);
        let mut body = json!({ "addon": { "id": addon_id } });
        if !params.is_empty() {
            body["parameters"] = json!({ "items": params });
        }
        self.post(&path, &body).await
    }

    pub async fn uninstall_addon(&self, cluster_id: &str, addon_id: &str) -> Result<()> {
        let path = format!("{}/addons/{}", cluster_path(cluster_id)?, segment(addon_id)?);
        self.delete(&path).await
    }
}
