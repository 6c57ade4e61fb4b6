//! Cluster admin users: create, list and delete

use crate::cli::args::GlobalOptions;
use crate::cli::commands::{ClusterArgs, UserArgs};
use crate::cli::handlers::common::Session;
use crate::error::{CliError, Result};
use crate::interactive::{self, confirm::confirm, Input};
use crate::output::table_output::display_users;
use crate::output::{json_output, print_error, print_info};
use once_cell::sync::Lazy;
use regex::Regex;
use rosa_ocm::resources::UserGroup;
use std::collections::BTreeMap;

static USER_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^,\s]+(,[^,\s]+)*$").expect("user list pattern is valid"));

/// Split a comma separated list of usernames
pub fn parse_usernames(value: &str) -> std::result::Result<Vec<String>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Vec::new());
    }
    if !USER_LIST_RE.is_match(value) {
        return Err("Expected a commad-separated list of usernames".to_string());
    }
    Ok(value.split(',').map(str::to_string).collect())
}

fn ask_usernames(question: &str) -> Result<Vec<String>> {
    let answer = interactive::get_string(&Input::new(question))?;
    parse_usernames(&answer).map_err(CliError::command)
}

/// Usernames per group from the flags, asking when none were given
fn requested_users(args: &UserArgs, ask: bool) -> Result<Vec<(UserGroup, Vec<String>)>> {
    let mut cluster_admins = parse_usernames(&args.cluster_admins).map_err(CliError::command)?;
    let mut dedicated_admins =
        parse_usernames(&args.dedicated_admins).map_err(CliError::command)?;

    if ask && cluster_admins.is_empty() && dedicated_admins.is_empty() {
        cluster_admins =
            ask_usernames("Comma-separated list of cluster-admins to add to your cluster")?;
        dedicated_admins =
            ask_usernames("Comma-separated list of dedicated-admins to add to your cluster")?;
    }

    if cluster_admins.is_empty() && dedicated_admins.is_empty() {
        return Err(CliError::command(
            "Expected at least one of 'cluster-admins' or 'dedicated-admins'",
        ));
    }

    Ok(vec![
        (UserGroup::ClusterAdmins, cluster_admins),
        (UserGroup::DedicatedAdmins, dedicated_admins),
    ])
}

pub async fn handle_create_user(args: UserArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster.clone();
    let session = Session::new().await?;
    let cluster = session.ready_cluster(&key).await?;

    let ask = opts.interactive || (args.cluster_admins.is_empty() && args.dedicated_admins.is_empty());
    let requested = requested_users(&args, ask)?;

    for (group, users) in requested.iter().filter(|(_, users)| !users.is_empty()) {
        print_info(&format!(
            "Adding {} users to cluster '{key}'",
            group.role()
        ));
        for user in users {
            if let Err(e) = session.ocm.add_user(&cluster.id, *group, user).await {
                print_error(&format!(
                    "Failed to add {} user '{user}' to cluster '{key}': {e}",
                    group.role()
                ));
            }
        }
    }
    Ok(())
}

pub async fn handle_list_users(args: ClusterArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster;
    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    let mut users: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for group in UserGroup::ALL {
        let members = session
            .ocm
            .get_users(&cluster.id, group)
            .await
            .map_err(|e| {
                CliError::command(format!(
                    "Failed to get {group} for cluster '{key}': {e}"
                ))
            })?;
        for member in members {
            users
                .entry(member.id)
                .or_default()
                .push(group.id().to_string());
        }
    }

    if opts.json {
        return json_output(&users);
    }
    if users.is_empty() {
        print_info(&format!("There are no users configured for cluster '{key}'"));
        return Ok(());
    }
    display_users(&users);
    Ok(())
}

pub async fn handle_delete_user(args: UserArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster.clone();
    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    let requested = requested_users(&args, opts.interactive)?;
    for (group, users) in &requested {
        for user in users {
            if !confirm(
                opts.yes,
                &format!("delete {} user {user} on cluster {key}", group.role()),
            )? {
                continue;
            }
            match session.ocm.delete_user(&cluster.id, *group, user).await {
                Ok(()) => print_info(&format!(
                    "Successfully deleted {} user '{user}' from cluster '{key}'",
                    group.role()
                )),
                Err(e) => print_error(&format!(
                    "Failed to delete {} user '{user}' from cluster '{key}': {}",
                    group.role(),
                    e.reason()
                )),
            }
        }
    }
    Ok(())
}
