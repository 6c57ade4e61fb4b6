//! Membership of the cluster administrator groups

use super::{cluster_path, segment};
use crate::error::Result;
use crate::types::User;
use crate::OcmClient;
use serde_json::json;
use std::fmt;

/// Groups the CLI can add users to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserGroup {
    ClusterAdmins,
    DedicatedAdmins,
}

impl UserGroup {
    pub const ALL: [UserGroup; 2] = [UserGroup::DedicatedAdmins, UserGroup::ClusterAdmins];

    /// Group identifier in the API
    pub fn id(&self) -> &'static str {
        match self {
            UserGroup::ClusterAdmins => "cluster-admins",
            UserGroup::DedicatedAdmins => "dedicated-admins",
        }
    }

    /// Role granted by the group, as used in messages
    pub fn role(&self) -> &'static str {
        match self {
            UserGroup::ClusterAdmins => "cluster-admin",
            UserGroup::DedicatedAdmins => "dedicated-admin",
        }
    }
}

impl fmt::Display for UserGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

fn users_path(cluster_id: &str, group: UserGroup) -> Result<String> {
    Ok(format!("{}/groups/{}/users", cluster_path(cluster_id)?, group.id()))
}

impl OcmClient {
    pub async fn get_users(&self, cluster_id: &str, group: UserGroup) -> Result<Vec<User>> {
        self.list_all(&users_path(cluster_id, group)?, None).await
    }

    pub async fn add_user(&self, cluster_id: &str, group: UserGroup, username: &str) -> Result<User> {
        self.post(&users_path(cluster_id, group)?, &json!({ "id": username }))
            .await
    }

    pub async fn delete_user(&self, cluster_id: &str, group: UserGroup, username: &str) -> Result<()> {
        let path = format!("{}/{}", users_path(cluster_id, group)?, segment(username)?);
        self.delete(&path).await
    }
}
