//! Validation of user supplied identifiers
//!
//! Cluster keys end up inside OCM search expressions, so they are restricted
//! to a character class that cannot terminate or extend the quoted value.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

static CLUSTER_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").unwrap());

static MACHINE_POOL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]([-a-z0-9]*[a-z0-9])?$").unwrap());

/// Validation failures for identifiers and flag values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "Cluster name, identifier or external identifier '{0}' isn't valid: it \
         must contain only letters, digits, dashes and underscores"
    )]
    InvalidClusterKey(String),

    #[error(
        "Machine pool identifier '{0}' isn't valid: it must contain only lowercase \
         letters, digits and dashes, start with a letter and end with a letter or digit"
    )]
    InvalidMachinePoolId(String),

    #[error("Expected key=value format for label '{0}'")]
    InvalidLabel(String),

    #[error("Label key cannot be empty in '{0}'")]
    EmptyLabelKey(String),
}

/// Check that a cluster name, identifier or external identifier only contains
/// letters, digits, dashes and underscores.
pub fn is_valid_cluster_key(key: &str) -> bool {
    CLUSTER_KEY_RE.is_match(key)
}

/// Same as [`is_valid_cluster_key`] but returns the user facing error.
pub fn validate_cluster_key(key: &str) -> Result<(), ValidationError> {
    if is_valid_cluster_key(key) {
        Ok(())
    } else {
        Err(ValidationError::InvalidClusterKey(key.to_string()))
    }
}

/// Validate a machine pool identifier (DNS label style).
pub fn validate_machine_pool_id(id: &str) -> Result<(), ValidationError> {
    if MACHINE_POOL_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(ValidationError::InvalidMachinePoolId(id.to_string()))
    }
}

/// Parse a comma-separated `key=value` list into an ordered map.
///
/// An empty string yields an empty map, which clears labels on edit.
pub fn parse_labels(labels: &str) -> Result<BTreeMap<String, String>, ValidationError> {
    let mut result = BTreeMap::new();
    if labels.trim().is_empty() {
        return Ok(result);
    }

    for item in labels.split(',') {
        let item = item.trim();
        let (key, value) = item
            .split_once('=')
            .ok_or_else(|| ValidationError::InvalidLabel(item.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::EmptyLabelKey(item.to_string()));
        }
        result.insert(key.to_string(), value.trim().to_string());
    }

    Ok(result)
}
