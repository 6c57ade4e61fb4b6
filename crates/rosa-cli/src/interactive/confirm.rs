//! Confirmation before destructive or billable actions

use crate::error::{CliError, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};

/// Prompt text for `action`
pub fn prompt(action: &str) -> String {
    format!("Are you sure you want to {action}?")
}

/// Ask the user to confirm `action`; `--yes` answers for them
pub fn confirm(yes: bool, action: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt(action))
        .default(false)
        .interact()
        .map_err(|e| CliError::interactive(format!("Confirmation failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_skips_prompt() {
        assert!(confirm(true, "delete cluster mycluster").unwrap());
    }

    #[test]
    fn test_prompt_text() {
        assert_eq!(
            prompt("delete identity provider github-1 on cluster mycluster"),
            "Are you sure you want to delete identity provider github-1 on cluster mycluster?"
        );
    }
}
