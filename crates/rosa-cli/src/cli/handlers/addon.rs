//! Add-ons: install, list and uninstall

use crate::cli::args::GlobalOptions;
use crate::cli::commands::{AddonArgs, ClusterArgs};
use crate::cli::handlers::common::Session;
use crate::error::{CliError, Result};
use crate::interactive::{self, confirm::confirm, Input};
use crate::output::table_output::display_addons;
use crate::output::{json_output, print_info};
use regex::Regex;
use rosa_ocm::types::{AddOnParam, AddOnParameter};
use serde::Serialize;

/// The single add-on identifier given on the command line
pub fn addon_id(ids: &[String]) -> Result<&str> {
    let [id] = ids else {
        return Err(CliError::command(
            "Expected exactly one command line parameters containing the identifier of the add-on.",
        ));
    };
    if id.trim().is_empty() {
        return Err(CliError::command("Add-on ID is required."));
    }
    Ok(id)
}

/// Check a value against the parameter's validation expression
pub fn check_parameter_value(
    param: &AddOnParameter,
    value: &str,
) -> std::result::Result<(), String> {
    if param.validation.is_empty() {
        return Ok(());
    }
    let re = Regex::new(&param.validation).map_err(|e| {
        format!(
            "Invalid validation expression for parameter '{}': {e}",
            param.id
        )
    })?;
    if re.is_match(value) {
        Ok(())
    } else {
        Err(format!("Expected {value} to match /{}/", param.validation))
    }
}

/// Ask for one parameter according to its value type
fn ask_parameter(param: &AddOnParameter) -> Result<String> {
    let question = if param.name.is_empty() {
        &param.id
    } else {
        &param.name
    };
    let mut input = Input::new(question)
        .help(&param.description)
        .default_value(&param.default_value);
    if param.required {
        input = input.required();
    }

    let value = match param.value_type.as_str() {
        "boolean" => interactive::get_bool(&input).map(|b| b.to_string()),
        "cidr" => {
            interactive::get_ipnet(&input).map(|n| n.map(|n| n.to_string()).unwrap_or_default())
        }
        "number" => interactive::get_int(&input).map(|n| n.to_string()),
        _ => interactive::get_string(&input),
    };
    value.map_err(|e| CliError::command(format!("Expected a valid value for '{}': {e}", param.id)))
}

/// Ask for every parameter of an add-on and check the answers
///
/// Empty answers to optional parameters are left out of the installation.
pub fn collect_parameters<F>(parameters: &[AddOnParameter], mut ask: F) -> Result<Vec<AddOnParam>>
where
    F: FnMut(&AddOnParameter) -> Result<String>,
{
    let mut values = Vec::new();
    for param in parameters {
        let value = ask(param)?;
        if value.is_empty() && !param.required {
            continue;
        }
        check_parameter_value(param, &value).map_err(CliError::command)?;
        values.push(AddOnParam {
            id: param.id.clone(),
            value,
        });
    }
    Ok(values)
}

pub async fn handle_install_addon(args: AddonArgs, opts: GlobalOptions) -> Result<()> {
    let id = addon_id(&args.ids)?.to_string();
    let key = args.cluster;

    let session = Session::new().await?;
    let cluster = session.ready_cluster(&key).await?;

    if !confirm(
        opts.yes,
        &format!("install add-on '{id}' on cluster '{key}'"),
    )? {
        return Ok(());
    }

    let parameters = session
        .ocm
        .get_addon_parameters(&id)
        .await
        .map_err(|e| CliError::command(format!("Failed to get add-on '{id}' parameters: {e}")))?;

    let values = collect_parameters(&parameters, ask_parameter)?;

    session
        .ocm
        .install_addon(&cluster.id, &id, &values)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to add add-on installation '{id}' for cluster '{key}': {e}"
            ))
        })?;

    print_info(&format!(
        "Add-on '{id}' is now installing. To check the status run 'rosa list addons -c {key}'"
    ));
    Ok(())
}

pub async fn handle_uninstall_addon(args: AddonArgs, opts: GlobalOptions) -> Result<()> {
    let id = addon_id(&args.ids)?.to_string();
    let key = args.cluster;

    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    if !confirm(
        opts.yes,
        &format!("uninstall add-on '{id}' from cluster '{key}'"),
    )? {
        return Ok(());
    }

    session
        .ocm
        .uninstall_addon(&cluster.id, &id)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to remove add-on installation '{id}' from cluster '{key}': {}",
                e.reason()
            ))
        })?;

    print_info(&format!(
        "Add-on '{id}' is now uninstalling. To check the status run 'rosa list addons -c {key}'"
    ));
    Ok(())
}

#[derive(Serialize)]
struct AddOnState<'a> {
    id: &'a str,
    name: &'a str,
    state: &'a str,
}

pub async fn handle_list_addons(args: ClusterArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster;
    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    let addons = session
        .ocm
        .get_addons()
        .await
        .map_err(|e| CliError::command(format!("Failed to fetch add-ons: {e}")))?;
    let installations = session
        .ocm
        .get_addon_installations(&cluster.id)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to get add-on installations for cluster '{key}': {e}"
            ))
        })?;

    if opts.json {
        let states: Vec<_> = addons
            .iter()
            .map(|addon| AddOnState {
                id: &addon.id,
                name: &addon.name,
                state: installations
                    .iter()
                    .find(|i| i.addon.id == addon.id || i.id == addon.id)
                    .map(|i| i.state.as_str())
                    .unwrap_or("not installed"),
            })
            .collect();
        return json_output(&states);
    }

    if addons.is_empty() {
        print_info("There are no add-ons available");
        return Ok(());
    }
    display_addons(&addons, &installations);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(validation: &str) -> AddOnParameter {
        AddOnParameter {
            id: "cidr-range".into(),
            validation: validation.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_addon_id() {
        assert_eq!(addon_id(&["dbaas-operator".to_string()]).unwrap(), "dbaas-operator");

        let err = addon_id(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected exactly one command line parameters containing the identifier of the add-on."
        );
        assert!(addon_id(&["a".to_string(), "b".to_string()]).is_err());
        assert_eq!(
            addon_id(&[" ".to_string()]).unwrap_err().to_string(),
            "Add-on ID is required."
        );
    }

    #[test]
    fn test_every_parameter_is_asked() {
        let parameters = vec![
            AddOnParameter {
                id: "fixed".into(),
                editable: false,
                ..Default::default()
            },
            AddOnParameter {
                id: "optional".into(),
                editable: true,
                ..Default::default()
            },
            AddOnParameter {
                id: "cidr".into(),
                required: true,
                validation: "^10\\.".into(),
                ..Default::default()
            },
        ];

        let mut asked = Vec::new();
        let values = collect_parameters(&parameters, |p| {
            asked.push(p.id.clone());
            Ok(match p.id.as_str() {
                "fixed" => "on".to_string(),
                "cidr" => "10.0.0.0/16".to_string(),
                _ => String::new(),
            })
        })
        .unwrap();

        assert_eq!(asked, vec!["fixed", "optional", "cidr"]);
        assert_eq!(
            values,
            vec![
                AddOnParam {
                    id: "fixed".into(),
                    value: "on".into()
                },
                AddOnParam {
                    id: "cidr".into(),
                    value: "10.0.0.0/16".into()
                },
            ]
        );

        let err = collect_parameters(&parameters[2..], |_| Ok("192.168.0.0/16".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Expected 192.168.0.0/16 to match /^10\\./");
    }

    #[test]
    fn test_parameter_validation() {
        assert!(check_parameter_value(&param(""), "anything").is_ok());
        assert!(check_parameter_value(&param("^[0-9]+$"), "42").is_ok());
        assert_eq!(
            check_parameter_value(&param("^[0-9]+$"), "forty").unwrap_err(),
            "Expected forty to match /^[0-9]+$/"
        );
        assert!(check_parameter_value(&param("("), "x")
            .unwrap_err()
            .starts_with("Invalid validation expression"));
    }
}
