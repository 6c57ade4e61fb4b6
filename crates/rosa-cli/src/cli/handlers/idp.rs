//! Identity providers: create, list and delete

use crate::cli::args::GlobalOptions;
use crate::cli::commands::{ClusterArgs, CreateIdpArgs, DeleteIdpArgs, IdpKind};
use crate::cli::handlers::common::Session;
use crate::error::{CliError, Result};
use crate::interactive::{self, confirm::confirm, Input};
use crate::output::table_output::display_identity_providers;
use crate::output::{json_output, print_info, print_warning};
use rosa_ocm::types::{
    oauth_callback_url, Cluster, GithubIdp, GitlabIdp, GoogleIdp, HtpasswdIdp, IdentityProvider,
    OpenIdClaims, OpenIdIdp,
};

const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// First free `<type>-<n>` name, counting from the number of providers
pub fn default_idp_name(kind: IdpKind, existing: &[IdentityProvider]) -> String {
    let prefix = kind.idp_type().as_str();
    let mut n = existing.len() + 1;
    loop {
        let name = format!("{prefix}-{n}");
        if !existing.iter().any(|idp| idp.name == name) {
            return name;
        }
        n += 1;
    }
}

/// Use `value` when set, otherwise ask for it
fn value_or_ask(value: &str, question: &str, help: &str, required: bool) -> Result<String> {
    if !value.is_empty() {
        return Ok(value.to_string());
    }
    let mut input = Input::new(question).help(help);
    if required {
        input = input.required();
    }
    interactive::get_string(&input)
}

fn secret_or_ask(value: &str, question: &str) -> Result<String> {
    if !value.is_empty() {
        return Ok(value.to_string());
    }
    interactive::get_password(&Input::new(question).required())
}

fn list_or_ask(values: &[String], question: &str, help: &str) -> Result<Vec<String>> {
    if !values.is_empty() {
        return Ok(values.to_vec());
    }
    let answer = interactive::get_string(&Input::new(question).help(help))?;
    Ok(crate::cli::handlers::common::split_list(&answer))
}

fn oauth_credentials(args: &CreateIdpArgs) -> Result<(String, String)> {
    let client_id = value_or_ask(
        &args.client_id,
        "Client ID",
        "Client ID from the registered OAuth application",
        true,
    )?;
    let client_secret = secret_or_ask(&args.client_secret, "Client Secret")?;
    Ok((client_id, client_secret))
}

/// Check the type specific values that do not need a prompt
pub fn validate_idp(idp: &IdentityProvider) -> std::result::Result<(), String> {
    if let Some(github) = &idp.github {
        if github.organizations.is_empty() && github.teams.is_empty() {
            return Err(
                "GitHub identity providers must be restricted to organizations or teams".to_string(),
            );
        }
        if !github.organizations.is_empty() && !github.teams.is_empty() {
            return Err("Only one of 'organizations' or 'teams' may be specified".to_string());
        }
        if let Some(team) = github.teams.iter().find(|t| !t.contains('/')) {
            return Err(format!("Expected team '{team}' to be in the format org/team"));
        }
    }
    if let Some(gitlab) = &idp.gitlab {
        if !gitlab.url.starts_with("https://") {
            return Err(format!("Expected GitLab URL '{}' to use https", gitlab.url));
        }
    }
    if let Some(openid) = &idp.openid {
        if !openid.issuer.starts_with("https://") {
            return Err(format!("Expected issuer URL '{}' to use https", openid.issuer));
        }
        let claims = &openid.claims;
        if claims.email.is_empty() && claims.name.is_empty() && claims.preferred_username.is_empty()
        {
            return Err("At least one OpenID claim is required".to_string());
        }
    }
    if let Some(htpasswd) = &idp.htpasswd {
        if htpasswd.username.is_empty() || htpasswd.password.is_empty() {
            return Err("Expected a username and a password".to_string());
        }
    }
    Ok(())
}

fn build_idp(args: &CreateIdpArgs, kind: IdpKind, name: String) -> Result<IdentityProvider> {
    let mut idp = IdentityProvider::new(name, kind.idp_type());
    idp.mapping_method = args.mapping_method.map(|m| m.as_str().to_string());

    match kind {
        IdpKind::Github => {
            let (client_id, client_secret) = oauth_credentials(args)?;
            let organizations = if args.teams.is_empty() {
                list_or_ask(
                    &args.organizations,
                    "GitHub organizations",
                    "Comma-separated list of organizations whose members may log in",
                )?
            } else {
                Vec::new()
            };
            idp.github = Some(GithubIdp {
                client_id,
                client_secret,
                organizations,
                teams: args.teams.clone(),
                hostname: args.hostname.clone(),
            });
        }
        IdpKind::Gitlab => {
            let (client_id, client_secret) = oauth_credentials(args)?;
            let url = if args.host_url.is_empty() {
                DEFAULT_GITLAB_URL.to_string()
            } else {
                args.host_url.clone()
            };
            idp.gitlab = Some(GitlabIdp {
                client_id,
                client_secret,
                url,
            });
        }
        IdpKind::Google => {
            let (client_id, client_secret) = oauth_credentials(args)?;
            idp.google = Some(GoogleIdp {
                client_id,
                client_secret,
                hosted_domain: args.hosted_domain.clone(),
            });
        }
        IdpKind::Htpasswd => {
            let username = value_or_ask(&args.username, "Username", "Username of the user", true)?;
            let password = secret_or_ask(&args.password, "Password")?;
            idp.htpasswd = Some(HtpasswdIdp { username, password });
        }
        IdpKind::Openid => {
            let (client_id, client_secret) = oauth_credentials(args)?;
            let issuer = value_or_ask(
                &args.issuer_url,
                "Issuer URL",
                "URL that the OpenID provider asserts as its issuer identifier; it must use https",
                true,
            )?;
            let preferred_username = if args.email_claims.is_empty() && args.name_claims.is_empty() {
                list_or_ask(
                    &args.username_claims,
                    "Username claims",
                    "Comma-separated list of claims to use as the preferred username",
                )?
            } else {
                args.username_claims.clone()
            };
            idp.openid = Some(OpenIdIdp {
                client_id,
                client_secret,
                issuer,
                claims: OpenIdClaims {
                    email: args.email_claims.clone(),
                    name: args.name_claims.clone(),
                    preferred_username,
                },
            });
        }
    }

    validate_idp(&idp).map_err(CliError::command)?;
    Ok(idp)
}

fn select_kind(args: &CreateIdpArgs) -> Result<IdpKind> {
    if let Some(kind) = args.kind {
        return Ok(kind);
    }
    let options = IdpKind::ALL
        .iter()
        .map(|k| k.idp_type().as_str().to_string())
        .collect();
    let answer = interactive::get_option(
        &Input::new("Type of identity provider")
            .options(options)
            .required(),
    )?;
    IdpKind::from_name(&answer)
        .ok_or_else(|| CliError::command(format!("Expected a valid identity provider type, got '{answer}'")))
}

fn print_oauth_instructions(cluster: &Cluster, kind: IdpKind, name: &str) {
    print_info(&format!(
        "To use {} as an identity provider, you must first register the application. \
         Use '{}' as the OAuth callback URL.",
        kind.idp_type().display_name(),
        oauth_callback_url(cluster, name)
    ));
}

pub async fn handle_create_idp(args: CreateIdpArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster.clone();
    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    let existing = session
        .ocm
        .get_identity_providers(&cluster.id)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to get identity providers for cluster '{key}': {e}"
            ))
        })?;

    let kind = select_kind(&args)?;

    let mut name = args.name.clone();
    if name.is_empty() {
        name = default_idp_name(kind, &existing);
        if opts.interactive {
            name = interactive::get_string(
                &Input::new("Identity provider name")
                    .default_value(&name)
                    .required(),
            )?;
        }
    }
    if existing.iter().any(|idp| idp.name == name) {
        return Err(CliError::command(format!(
            "Identity provider '{name}' already exists on cluster '{key}'"
        )));
    }

    if kind.idp_type().uses_oauth_callback() {
        print_oauth_instructions(&cluster, kind, &name);
    }

    let idp = build_idp(&args, kind, name)?;
    let created = session
        .ocm
        .create_identity_provider(&cluster.id, &idp)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to add identity provider to cluster '{key}': {}",
                e.reason()
            ))
        })?;

    print_info(&format!(
        "Identity Provider '{}' has been created. It will take up to 1 minute for this \
         configuration to be enabled.",
        created.name
    ));
    print_info("To add cluster administrators, see 'rosa create user --help'.");
    if !cluster.console.url.is_empty() {
        print_info(&format!(
            "To login into the console, open {} and click on {}",
            cluster.console.url, created.name
        ));
    }
    Ok(())
}

pub async fn handle_list_idps(args: ClusterArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster;
    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    let idps = session
        .ocm
        .get_identity_providers(&cluster.id)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to get identity providers for cluster '{key}': {e}"
            ))
        })?;

    if opts.json {
        return json_output(&idps);
    }
    if idps.is_empty() {
        print_warning(&format!(
            "There are no identity providers configured for cluster '{key}'"
        ));
        return Ok(());
    }
    display_identity_providers(&cluster, &idps);
    Ok(())
}

pub async fn handle_delete_idp(args: DeleteIdpArgs, opts: GlobalOptions) -> Result<()> {
    let [name] = args.names.as_slice() else {
        return Err(CliError::command(
            "Expected exactly one command line parameter containing the name of the identity provider",
        ));
    };
    let key = args.cluster;

    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    let idps = session
        .ocm
        .get_identity_providers(&cluster.id)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to get identity providers for cluster '{key}': {e}"
            ))
        })?;
    let idp = idps.iter().find(|idp| idp.name == *name).ok_or_else(|| {
        CliError::command(format!(
            "Failed to get identity provider '{name}' for cluster '{key}'"
        ))
    })?;

    if !confirm(
        opts.yes,
        &format!("delete identity provider {name} on cluster {key}"),
    )? {
        return Ok(());
    }

    session
        .ocm
        .delete_identity_provider(&cluster.id, &idp.id)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to delete identity provider '{name}' on cluster '{key}': {}",
                e.reason()
            ))
        })?;

    print_info(&format!(
        "Successfully deleted identity provider '{name}' from cluster '{key}'"
    ));
    Ok(())
}
