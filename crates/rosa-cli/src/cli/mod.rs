//! Command line interface: argument definitions and handlers

pub mod args;
pub mod commands;
pub mod handlers;

pub use args::{Args, GlobalOptions};
pub use commands::*;
