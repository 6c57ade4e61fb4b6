//! # ROSA OCM client
//!
//! Typed access to the OpenShift Cluster Manager (OCM) REST API for the ROSA
//! command line tool.
//!
//! The crate covers three concerns:
//! - the local login file (`~/.ocm.json` or `$OCM_CONFIG`), see [`config`]
//! - access/refresh token handling, see [`auth`]
//! - the resources the CLI works with (clusters, identity providers, users,
//!   add-ons, machine pools, catalog and account), see [`resources`] and
//!   [`types`]
//!
//! ```rust,no_run
//! use rosa_ocm::ClientBuilder;
//!
//! # async fn example() -> rosa_ocm::Result<()> {
//! let client = ClientBuilder::new().build().await?;
//! let versions = client.get_versions().await?;
//! println!("{} versions available on {}", versions.len(), client.url());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod types;

pub use client::{ClientBuilder, OcmClient};
pub use config::Config;
pub use error::{ApiError, ErrorResponse, Result};
