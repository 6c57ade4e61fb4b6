//! `rosa login`, `rosa logout` and `rosa whoami`

use crate::aws::{get_region, Arn};
use crate::cli::args::GlobalOptions;
use crate::cli::commands::LoginArgs;
use crate::cli::handlers::common::{aws_creator, connect, connect_with};
use crate::error::{CliError, Result};
use crate::interactive::{get_password, Input};
use crate::output::{json_output, print_info};
use rosa_ocm::auth::{classify_token, TokenClaims, TokenKind};
use rosa_ocm::config::{url_for_env, Config};
use rosa_ocm::{ClientBuilder, OcmClient};
use std::path::Path;
use serde_json::{Map, Value};
use tracing::debug;

/// Page where users get their offline token
pub const TOKEN_PAGE_URL: &str = "https://cloud.redhat.com/openshift/token/rosa";

/// API URL for `--url`, `--env` and the URL already stored, in that order
pub fn resolve_url(url: &str, env: &str, current: &str) -> Result<String> {
    if !url.is_empty() {
        return Ok(url.trim_end_matches('/').to_string());
    }
    if !env.is_empty() {
        return url_for_env(env).map(str::to_string).ok_or_else(|| {
            CliError::command(format!(
                "Invalid environment '{env}'. Valid values are 'production', 'staging' and 'integration'"
            ))
        });
    }
    Ok(current.to_string())
}

/// Merge the login flags and the token into the stored configuration
pub fn login_config(args: &LoginArgs, current: Config, token: &str) -> Result<Config> {
    let mut config = current;
    config.url = resolve_url(&args.url, &args.env, &config.url)?;
    if !args.token_url.is_empty() {
        config.token_url = args.token_url.clone();
    }
    if !args.client_id.is_empty() {
        config.client_id = args.client_id.clone();
    }
    if !args.scopes.is_empty() {
        config.scopes = args.scopes.clone();
    }
    config.client_secret = args.client_secret.clone();
    config.insecure = args.insecure;
    config.access_token.clear();
    config.refresh_token.clear();

    if !token.is_empty() {
        match classify_token(token)? {
            TokenKind::Access => config.access_token = token.to_string(),
            TokenKind::Refresh => config.refresh_token = token.to_string(),
        }
    }

    Ok(config)
}

/// Connect with the new configuration and save it to `path` only once that works
pub async fn verify_and_save(mut config: Config, path: &Path) -> Result<OcmClient> {
    let ocm = connect_with(
        ClientBuilder::new()
            .config(config.clone())
            .config_path(path),
    )
    .await?;

    let tokens = ocm.tokens().await;
    config.access_token = tokens.access_token;
    if let Some(refresh_token) = tokens.refresh_token.filter(|t| !t.is_empty()) {
        config.refresh_token = refresh_token;
    }
    config.save_to_path(path).await?;
    debug!("Saved login file to '{}'", path.display());
    Ok(ocm)
}

pub async fn handle_login(args: LoginArgs) -> Result<()> {
    let mut token = args.token.trim().to_string();
    if token.is_empty() && args.client_secret.is_empty() {
        print_info(&format!(
            "To login to your Red Hat account, get an offline access token at {TOKEN_PAGE_URL}"
        ));
        token = get_password(&Input::new("Copy the token and paste it here").required())?;
    }
    if token.is_empty() && args.client_secret.is_empty() {
        return Err(CliError::command(
            "Expected a token or a client secret to log in",
        ));
    }

    let path = Config::location()?;
    let current = Config::load_from_path(&path).await?.unwrap_or_default();
    let config = login_config(&args, current, &token)?;
    let ocm = verify_and_save(config, &path).await?;
    let tokens = ocm.tokens().await;
    let username = match TokenClaims::decode(&tokens.access_token)
        .ok()
        .and_then(|c| c.user_name().map(str::to_string))
    {
        Some(name) => name,
        None => ocm
            .get_current_account()
            .await
            .map(|a| a.username)
            .map_err(|e| CliError::command(format!("Failed to get current account: {e}")))?,
    };

    print_info(&format!("Logged in as '{username}' on '{}'", ocm.url()));
    Ok(())
}

pub async fn handle_logout() -> Result<()> {
    Config::remove().await?;
    Ok(())
}

/// Print labelled values aligned in one column
pub fn format_fields(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.len() + 2).max().unwrap_or(0);
    fields
        .iter()
        .map(|(label, value)| format!("{:<width$}{}\n", format!("{label}:"), value))
        .collect()
}

pub async fn handle_whoami(opts: GlobalOptions) -> Result<()> {
    let creator = aws_creator().await?;
    let region = get_region("").await;
    let arn = Arn::parse(&creator.arn)
        .map_err(|e| CliError::aws(format!("Failed to parse AWS ARN '{}': {e}", creator.arn)))?;

    let ocm = connect().await?;
    let account = ocm
        .get_current_account()
        .await
        .map_err(|e| CliError::command(format!("Failed to get current account: {e}")))?;
    let organization = account.organization.clone().unwrap_or_default();

    let fields = vec![
        ("AWS Account ID", arn.account_id.clone()),
        ("AWS Default Region", region),
        ("AWS ARN", creator.arn.clone()),
        ("OCM API", ocm.url().to_string()),
        ("OCM Account ID", account.id.clone()),
        (
            "OCM Account Name",
            format!("{} {}", account.first_name, account.last_name)
                .trim()
                .to_string(),
        ),
        ("OCM Account Username", account.username.clone()),
        ("OCM Account Email", account.email.clone()),
        ("OCM Organization ID", organization.id),
        ("OCM Organization Name", organization.name),
        ("OCM Organization External ID", organization.external_id),
    ];

    if opts.json {
        let map: Map<String, Value> = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        return json_output(&map);
    }

    print!("{}", format_fields(&fields));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn jwt(typ: &str) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"typ":"{typ}","username":"jdoe"}}"#));
        format!("eyJhbGciOiJub25lIn0.{payload}.sig")
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("https://api.example.com/", "staging", "x").unwrap(),
            "https://api.example.com"
        );
        assert_eq!(
            resolve_url("", "staging", "x").unwrap(),
            "https://api.stage.openshift.com"
        );
        assert_eq!(resolve_url("", "", "https://current").unwrap(), "https://current");
        assert!(resolve_url("", "moon", "x").is_err());
    }

    #[test]
    fn test_refresh_token_is_stored_as_refresh() {
        let token = jwt("Offline");
        let args = LoginArgs {
            env: "staging".into(),
            ..Default::default()
        };
        let current = Config {
            access_token: "stale".into(),
            ..Default::default()
        };

        let config = login_config(&args, current, &token).unwrap();
        assert_eq!(config.refresh_token, token);
        assert!(config.access_token.is_empty());
        assert_eq!(config.url, "https://api.stage.openshift.com");
        assert!(config.is_armed());
    }

    #[test]
    fn test_access_token_is_stored_as_access() {
        let token = jwt("Bearer");
        let config = login_config(&LoginArgs::default(), Config::default(), &token).unwrap();
        assert_eq!(config.access_token, token);
        assert!(config.refresh_token.is_empty());
    }

    #[test]
    fn test_unknown_token_type_is_rejected() {
        let err = login_config(&LoginArgs::default(), Config::default(), &jwt("ID")).unwrap_err();
        assert!(err
            .to_string()
            .contains("Don't know how to handle token type 'ID' in token"));
    }

    #[test]
    fn test_format_fields() {
        let out = format_fields(&[("AWS ARN", "arn".into()), ("OCM API", "url".into())]);
        assert_eq!(out, "AWS ARN: arn\nOCM API: url\n");
    }
}
