//! # ROSA CLI
//!
//! Command line tool for Red Hat OpenShift Service on AWS.
//!
//! Every command follows the same path: parse flags, validate them or ask
//! for missing values, resolve the AWS identity and the OCM connection, call
//! the API and print the result.
//!
//! - [`cli`] holds the clap command tree and one handler per command
//! - [`interactive`] asks for missing values and confirmations
//! - [`output`] prints report lines, tables and the cluster description
//! - [`aws`] resolves the caller identity and region

pub mod aws;
pub mod cli;
pub mod error;
pub mod interactive;
pub mod output;

pub use cli::*;
pub use error::*;
