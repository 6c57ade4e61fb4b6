//! Main entry point for the ROSA CLI

use clap::{CommandFactory, Parser};
use clap_complete::env::CompleteEnv;
use color_eyre::eyre::{eyre, Result};
use rosa_cli::cli::Args;
use rosa_cli::output::{print_error, print_hint};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle shell completions first (must be before argument parsing)
    CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse();

    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    let binary_name = env!("CARGO_BIN_NAME").replace('-', "_");
    let default_filter = format!("{binary_name}=error");
    rosa_common::logging::init_cli_logging(&args.verbosity, args.debug, &default_filter)
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    if let Err(err) = args.run().await {
        print_error(&err.to_string());
        if let Some(suggestion) = err.suggestion() {
            print_hint(suggestion);
        }
        std::process::exit(1);
    }

    Ok(())
}
