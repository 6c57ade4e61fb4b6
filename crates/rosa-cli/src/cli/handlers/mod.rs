//! Command handlers for the ROSA CLI

pub mod addon;
pub mod catalog;
pub mod cluster;
pub mod common;
pub mod idp;
pub mod login;
pub mod machine_pool;
pub mod user;
