//! Output formatting utilities
//!
//! Report lines carry a one letter prefix (`I:`, `W:`, `E:`) so scripts can
//! grep them. Errors and warnings go to stderr.

pub mod describe;
pub mod progress;
pub mod table_output;

use crate::error::Result;
use console::style;
use serde::Serialize;

/// Output data as JSON
pub fn json_output<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}

/// Print an informational line
pub fn print_info(message: &str) {
    println!("{} {}", style("I:").cyan().bold(), message);
}

/// Print a warning line
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("W:").yellow().bold(), message);
}

/// Print an error line
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("E:").red().bold(), style(message).red());
}

/// Print a follow-up hint below an error
pub fn print_hint(message: &str) {
    eprintln!("   {}", style(message).dim());
}
