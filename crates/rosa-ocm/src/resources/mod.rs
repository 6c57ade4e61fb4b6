//! Operations on OCM resources
//!
//! Each submodule adds the calls for one resource to [`OcmClient`](crate::OcmClient).

pub mod accounts;
pub mod addons;
pub mod catalog;
pub mod clusters;
pub mod identity_providers;
pub mod machine_pools;
pub mod users;

pub use users::UserGroup;

use crate::error::{ApiError, Result};

pub(crate) const CLUSTERS_MGMT: &str = "/api/clusters_mgmt/v1";

/// Check that an identifier can be used as a single path segment
///
/// The URL parser resolves `.` and `..` segments (also when percent
/// encoded) and treats `\` like `/`, so such identifiers would address a
/// different resource.
pub(crate) fn segment(id: &str) -> Result<&str> {
    let forbidden = |c: char| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    };
    if id.is_empty() || id == "." || id == ".." || id.contains(forbidden) {
        return Err(ApiError::BadRequest {
            message: format!("Invalid identifier '{id}'"),
        });
    }
    Ok(id)
}

/// Path of a single cluster
pub(crate) fn cluster_path(cluster_id: &str) -> Result<String> {
    Ok(format!("{CLUSTERS_MGMT}/clusters/{}", segment(cluster_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_accepts_identifiers() {
        for id in [
            "mycluster",
            "1fu3ep0ugf8bssmtdq9g3sm3lbkm8c3p",
            "github-1",
            "dbaas-operator",
            "a.b",
        ] {
            assert_eq!(segment(id).unwrap(), id);
        }
    }

    #[test]
    fn test_segment_rejects_path_tricks() {
        for id in ["", ".", "..", "../../victim", "a/b", "a\\b", "%2e%2e", "a?b", "a#b", "a b"] {
            assert!(segment(id).is_err(), "{id:?} should be rejected");
        }
    }
}
