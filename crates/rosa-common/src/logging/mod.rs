//! Logging initialization for the ROSA binaries
//!
//! The filter is chosen with the following priority:
//! 1. `--debug` - enables debug output for the ROSA crates
//! 2. CLI flags (`-v/-q`)
//! 3. RUST_LOG environment variable
//! 4. Binary-specific defaults

use anyhow::Result;
use clap_verbosity_flag::{LogLevel, Verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events are shown when `--debug` is given.
const DEBUG_TARGETS: &[&str] = &["rosa", "rosa_cli", "rosa_ocm", "rosa_common"];

/// Build the filter directive used when `--debug` is set.
pub fn debug_filter() -> String {
    DEBUG_TARGETS
        .iter()
        .map(|target| format!("{target}=debug"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize logging with the specified verbosity level and default filter.
///
/// # Example
///
/// ```no_run
/// use clap::Parser;
/// use clap_verbosity_flag::{Verbosity, InfoLevel};
/// use rosa_common::logging;
///
/// #[derive(Parser)]
/// struct Args {
///     #[clap(flatten)]
///     verbosity: Verbosity<InfoLevel>,
/// }
///
/// let args = Args::parse();
/// logging::init_logging(&args.verbosity, false, "rosa=info").unwrap();
/// ```
pub fn init_logging<L: LogLevel>(
    verbosity: &Verbosity<L>,
    debug: bool,
    default_filter: &str,
) -> Result<()> {
    let filter = if debug {
        EnvFilter::try_new(debug_filter())?
    } else if let Some(log_level) = verbosity.log_level() {
        EnvFilter::try_new(format!("{}", log_level))?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(debug)
                .compact(),
        )
        .init();

    Ok(())
}

/// Initialize logging for the user-facing CLI
///
/// The CLI prints its own report lines, so tracing output is only enabled
/// when asked for with `--debug`, `-v` or `RUST_LOG`.
///
/// Returns `true` if logging was initialized.
pub fn init_cli_logging<L: LogLevel>(
    verbosity: &Verbosity<L>,
    debug: bool,
    default_filter: &str,
) -> Result<bool> {
    if debug || verbosity.log_level().is_some() || std::env::var("RUST_LOG").is_ok() {
        init_logging(verbosity, debug, default_filter)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_filter_covers_all_crates() {
        let filter = debug_filter();
        assert_eq!(
            filter,
            "rosa=debug,rosa_cli=debug,rosa_ocm=debug,rosa_common=debug"
        );
        assert!(EnvFilter::try_new(filter).is_ok());
    }
}
