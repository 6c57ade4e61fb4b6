//! Prompts for values missing from the command line
//!
//! Every prompt is described by an [`Input`]. An empty answer selects the
//! default, `?` shows the help text, and required questions without a
//! default refuse an empty answer.

pub mod confirm;

use crate::error::{CliError, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Password, Select};
use ipnet::IpNet;

/// Answer that asks for the help text instead of a value
const HELP_ANSWER: &str = "?";

/// A single question
#[derive(Debug, Clone, Default)]
pub struct Input {
    pub question: String,
    pub help: String,
    pub options: Vec<String>,
    pub default: String,
    pub required: bool,
}

impl Input {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn default_value(mut self, default: impl ToString) -> Self {
        self.default = default.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Outcome of reading one raw answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Value(String),
    Help,
    Missing,
    NotAnOption(String),
}

/// Turn a raw answer into a value following the rules of `input`
pub fn resolve_answer(raw: &str, input: &Input) -> Answer {
    let raw = raw.trim();
    if raw == HELP_ANSWER {
        return Answer::Help;
    }

    let value = if raw.is_empty() {
        input.default.trim()
    } else {
        raw
    };

    if value.is_empty() {
        return if input.required {
            Answer::Missing
        } else {
            Answer::Value(String::new())
        };
    }

    if !input.options.is_empty() && !input.options.iter().any(|o| o == value) {
        return Answer::NotAnOption(value.to_string());
    }

    Answer::Value(value.to_string())
}

/// Parse a whole number answer, empty meaning zero
pub fn parse_int(value: &str) -> std::result::Result<u32, String> {
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|_| format!("'{value}' is not a valid number"))
}

/// Parse a CIDR answer, empty meaning unset
pub fn parse_ipnet(value: &str) -> std::result::Result<Option<IpNet>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("'{value}' is not a valid CIDR"))
}

/// Parse a yes/no answer
pub fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "" | "n" | "no" | "false" => Ok(false),
        "y" | "yes" | "true" => Ok(true),
        _ => Err(format!("'{value}' is not a valid yes/no answer")),
    }
}

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn print_help(input: &Input) {
    if input.help.is_empty() {
        eprintln!("{}", style("No help available for this question").dim());
    } else {
        eprintln!("{}", style(&input.help).dim());
    }
}

fn prompt_failed(e: dialoguer::Error) -> CliError {
    CliError::interactive(format!("Prompt failed: {e}"))
}

/// Ask a free text question and return the resolved answer
pub fn get_input(input: &Input) -> Result<String> {
    let theme = theme();
    loop {
        let mut prompt = dialoguer::Input::<String>::with_theme(&theme)
            .with_prompt(&input.question)
            .allow_empty(true);
        if !input.default.is_empty() {
            prompt = prompt.default(input.default.clone()).show_default(true);
        }
        let raw = prompt.interact_text().map_err(prompt_failed)?;

        match resolve_answer(&raw, input) {
            Answer::Value(value) => return Ok(value),
            Answer::Help => print_help(input),
            Answer::Missing => {
                return Err(CliError::interactive(format!(
                    "A value for '{}' is required",
                    input.question
                )))
            }
            Answer::NotAnOption(value) => {
                return Err(CliError::interactive(format!(
                    "'{value}' is not one of the valid options: {}",
                    input.options.join(", ")
                )))
            }
        }
    }
}

pub fn get_string(input: &Input) -> Result<String> {
    get_input(input)
}

pub fn get_int(input: &Input) -> Result<u32> {
    let value = get_input(input)?;
    parse_int(&value).map_err(CliError::interactive)
}

pub fn get_ipnet(input: &Input) -> Result<Option<IpNet>> {
    let value = get_input(input)?;
    parse_ipnet(&value).map_err(CliError::interactive)
}

pub fn get_bool(input: &Input) -> Result<bool> {
    let default = parse_bool(input.default.trim()).unwrap_or(false);
    Confirm::with_theme(&theme())
        .with_prompt(&input.question)
        .default(default)
        .interact()
        .map_err(prompt_failed)
}

/// Pick one of `input.options`
pub fn get_option(input: &Input) -> Result<String> {
    if input.options.is_empty() {
        return get_input(input);
    }

    let default = input
        .options
        .iter()
        .position(|o| *o == input.default)
        .unwrap_or(0);

    let selection = Select::with_theme(&theme())
        .with_prompt(&input.question)
        .items(&input.options)
        .default(default)
        .interact_opt()
        .map_err(prompt_failed)?;

    match selection {
        Some(index) => Ok(input.options[index].clone()),
        None if input.required => Err(CliError::interactive("Selection cancelled")),
        None => Ok(String::new()),
    }
}

/// Ask for a secret without echoing it
pub fn get_password(input: &Input) -> Result<String> {
    let value = Password::with_theme(&theme())
        .with_prompt(&input.question)
        .allow_empty_password(!input.required)
        .interact()
        .map_err(prompt_failed)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_uses_default() {
        let input = Input::new("Compute nodes").default_value(4);
        assert_eq!(resolve_answer("", &input), Answer::Value("4".into()));
        assert_eq!(resolve_answer("  ", &input), Answer::Value("4".into()));
        assert_eq!(resolve_answer("9", &input), Answer::Value("9".into()));
    }

    #[test]
    fn test_required_without_default() {
        let input = Input::new("Cluster name").required();
        assert_eq!(resolve_answer("", &input), Answer::Missing);
        assert_eq!(resolve_answer("", &Input::new("Pod CIDR")), Answer::Value(String::new()));
    }

    #[test]
    fn test_help_answer() {
        let input = Input::new("Cluster name").default_value("mycluster");
        assert_eq!(resolve_answer("?", &input), Answer::Help);
    }

    #[test]
    fn test_answer_must_be_an_option() {
        let input = Input::new("AWS region")
            .options(vec!["us-east-1".into(), "eu-west-1".into()])
            .default_value("us-east-1");
        assert_eq!(resolve_answer("", &input), Answer::Value("us-east-1".into()));
        assert_eq!(
            resolve_answer("mars-1", &input),
            Answer::NotAnOption("mars-1".into())
        );
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_int(""), Ok(0));
        assert_eq!(parse_int("23"), Ok(23));
        assert!(parse_int("-1").is_err());

        assert_eq!(parse_ipnet(""), Ok(None));
        assert_eq!(
            parse_ipnet("10.0.0.0/16").unwrap().map(|n| n.to_string()),
            Some("10.0.0.0/16".to_string())
        );
        assert!(parse_ipnet("10.0.0.0").is_err());

        assert_eq!(parse_bool("Yes"), Ok(true));
        assert_eq!(parse_bool(""), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }
}
