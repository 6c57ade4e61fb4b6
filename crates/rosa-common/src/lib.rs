//! # ROSA Common
//!
//! Pieces shared by the ROSA crates that do not depend on the OCM API:
//! logging initialisation and validation of user supplied identifiers.

pub mod logging;
pub mod validation;

pub use validation::{
    is_valid_cluster_key, parse_labels, validate_cluster_key, validate_machine_pool_id,
    ValidationError,
};
