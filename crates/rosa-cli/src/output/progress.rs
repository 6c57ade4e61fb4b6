//! Spinners shown while waiting on the API

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate operations
///
/// The spinner is hidden when stderr is not a terminal so piped output stays
/// clean.
pub fn create_spinner(message: &str) -> ProgressBar {
    if !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""])
        .template("{spinner:.cyan} {msg}");
    if let Ok(style) = style {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Remove the spinner from the terminal
pub fn complete_spinner_and_clear(pb: ProgressBar) {
    pb.finish_and_clear();
}

/// Stop the spinner and leave an error line in its place
pub fn complete_spinner_error(pb: ProgressBar, message: &str) {
    pb.abandon_with_message(format!("{} {}", console::style("✗").red(), message));
}

/// Run `fut` while showing a spinner with `message`
pub async fn with_spinner<T, E, F>(message: &str, fut: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let spinner = create_spinner(message);
    let result = fut.await;
    match &result {
        Ok(_) => complete_spinner_and_clear(spinner),
        Err(_) => complete_spinner_error(spinner, message),
    }
    result
}
