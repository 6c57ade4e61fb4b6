//! Machine pools: create, edit, list and delete

use crate::cli::args::GlobalOptions;
use crate::cli::commands::{
    ClusterArgs, CreateMachinePoolArgs, EditMachinePoolArgs, MachinePoolIdArgs, ScalingArgs,
};
use crate::cli::handlers::cluster::{machine_type_list, validate_machine_type};
use crate::cli::handlers::common::Session;
use crate::error::{CliError, Result};
use crate::interactive::{self, confirm::confirm, Input};
use crate::output::table_output::display_machine_pools;
use crate::output::{json_output, print_info};
use rosa_common::{parse_labels, validate_machine_pool_id};
use rosa_ocm::resources::machine_pools::DEFAULT_MACHINE_POOL;
use rosa_ocm::types::{AutoscaleCompute, Cluster, ClusterNodes, MachinePool, MachinePoolAutoscaling};
use std::collections::BTreeMap;

/// How the nodes of a pool are sized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    Replicas(u32),
    Autoscaling { min: u32, max: u32 },
}

/// Check the scaling flags, `None` when none were given
pub fn resolve_scaling(args: &ScalingArgs) -> std::result::Result<Option<Scaling>, String> {
    let bounds_given = args.min_replicas.is_some() || args.max_replicas.is_some();

    if args.replicas.is_some() && (args.enable_autoscaling || bounds_given) {
        return Err("Replicas can't be set when autoscaling is enabled".to_string());
    }
    if !args.enable_autoscaling && bounds_given {
        return Err(
            "Autoscaling must be enabled in order to set min and max replicas".to_string(),
        );
    }

    if args.enable_autoscaling {
        let (Some(min), Some(max)) = (args.min_replicas, args.max_replicas) else {
            return Err(
                "Both 'min-replicas' and 'max-replicas' are required when autoscaling is enabled"
                    .to_string(),
            );
        };
        if min > max {
            return Err("max-replicas must be greater or equal to min-replicas".to_string());
        }
        return Ok(Some(Scaling::Autoscaling { min, max }));
    }

    Ok(args.replicas.map(Scaling::Replicas))
}

/// Multi-AZ clusters spread their nodes evenly over three zones
pub fn check_multi_az(cluster: &Cluster, scaling: Scaling) -> std::result::Result<(), String> {
    if !cluster.multi_az {
        return Ok(());
    }
    let (low, high) = match scaling {
        Scaling::Replicas(n) => (n, n),
        Scaling::Autoscaling { min, max } => (min, max),
    };
    if low % 3 != 0 || high % 3 != 0 {
        return Err(
            "Multi AZ clusters require that the number of replicas be a multiple of 3".to_string(),
        );
    }
    Ok(())
}

/// Node settings that update the `default` pool of a cluster
pub fn default_pool_patch(
    scaling: Option<Scaling>,
    labels: Option<BTreeMap<String, String>>,
) -> ClusterNodes {
    let mut nodes = ClusterNodes {
        compute_labels: labels,
        ..Default::default()
    };
    match scaling {
        Some(Scaling::Replicas(n)) => nodes.compute = Some(n),
        Some(Scaling::Autoscaling { min, max }) => {
            nodes.autoscale_compute = Some(AutoscaleCompute {
                min_replicas: min,
                max_replicas: max,
            })
        }
        None => {}
    }
    nodes
}

/// Apply scaling and labels to a machine pool body
pub fn pool_body(
    id: &str,
    scaling: Option<Scaling>,
    labels: Option<BTreeMap<String, String>>,
) -> MachinePool {
    let mut pool = MachinePool {
        id: id.to_string(),
        labels,
        ..Default::default()
    };
    match scaling {
        Some(Scaling::Replicas(n)) => pool.replicas = Some(n),
        Some(Scaling::Autoscaling { min, max }) => {
            pool.autoscaling = Some(MachinePoolAutoscaling {
                min_replicas: min,
                max_replicas: max,
            })
        }
        None => {}
    }
    pool
}

fn labels_from(value: Option<&str>) -> Result<Option<BTreeMap<String, String>>> {
    value.map(parse_labels).transpose().map_err(CliError::from)
}

/// Ask for the scaling of a new pool
fn ask_scaling() -> Result<Scaling> {
    let autoscaling = interactive::get_bool(
        &Input::new("Enable autoscaling").help("Let the cluster add and remove nodes on demand"),
    )?;
    if autoscaling {
        let min = interactive::get_int(&Input::new("Min replicas").required())?;
        let max = interactive::get_int(&Input::new("Max replicas").required())?;
        return resolve_scaling(&ScalingArgs {
            enable_autoscaling: true,
            min_replicas: Some(min),
            max_replicas: Some(max),
            ..Default::default()
        })
        .map_err(CliError::command)?
        .ok_or_else(|| CliError::command("Autoscaling bounds are required"));
    }
    let replicas = interactive::get_int(&Input::new("Replicas").required())?;
    Ok(Scaling::Replicas(replicas))
}

pub async fn handle_create_machine_pool(
    args: CreateMachinePoolArgs,
    opts: GlobalOptions,
) -> Result<()> {
    let key = args.cluster.clone();
    let session = Session::new().await?;
    let cluster = session.ready_cluster(&key).await?;

    let mut name = args.name.clone();
    if name.is_empty() && opts.interactive {
        name = interactive::get_string(&Input::new("Machine pool name").required())?;
    }
    if name.is_empty() {
        return Err(CliError::command("Machine pool name is required"));
    }
    validate_machine_pool_id(&name)?;

    let machine_types = machine_type_list(&session.ocm).await?;
    let mut instance_type = args.instance_type.clone();
    if instance_type.is_empty() && opts.interactive {
        instance_type = interactive::get_option(
            &Input::new("Instance type")
                .options(machine_types.clone())
                .required(),
        )?;
    }
    let instance_type = validate_machine_type(&instance_type, &machine_types)
        .map_err(|e| CliError::command(format!("Expected a valid instance type: {e}")))?
        .ok_or_else(|| CliError::command("Instance type is required"))?;

    let scaling = match resolve_scaling(&args.scaling).map_err(CliError::command)? {
        Some(scaling) => scaling,
        None if opts.interactive => ask_scaling()?,
        None => {
            return Err(CliError::command(
                "Expected either 'replicas' or 'enable-autoscaling' with 'min-replicas' and 'max-replicas'",
            ))
        }
    };
    check_multi_az(&cluster, scaling).map_err(CliError::command)?;

    let labels = labels_from(args.labels.as_deref())?;
    let mut pool = pool_body(&name, Some(scaling), labels);
    pool.instance_type = Some(instance_type);

    session
        .ocm
        .create_machine_pool(&cluster.id, &pool)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to add machine pool to cluster '{key}': {}",
                e.reason()
            ))
        })?;

    print_info(&format!(
        "Machine pool '{name}' created successfully on cluster '{key}'"
    ));
    print_info(&format!(
        "To view all machine pools, run 'rosa list machinepools -c {key}'"
    ));
    Ok(())
}

pub async fn handle_edit_machine_pool(args: EditMachinePoolArgs) -> Result<()> {
    let key = args.cluster.clone();
    let id = args.id.clone();
    let session = Session::new().await?;
    let cluster = session.ready_cluster(&key).await?;

    let scaling = resolve_scaling(&args.scaling).map_err(CliError::command)?;
    let labels = labels_from(args.labels.as_deref())?;
    if scaling.is_none() && labels.is_none() {
        return Err(CliError::command(
            "Expected at least one of 'replicas', 'enable-autoscaling' or 'labels'",
        ));
    }
    if let Some(scaling) = scaling {
        check_multi_az(&cluster, scaling).map_err(CliError::command)?;
    }

    if id == DEFAULT_MACHINE_POOL {
        session
            .ocm
            .patch_cluster_nodes(&cluster.id, &default_pool_patch(scaling, labels))
            .await
            .map_err(|e| {
                CliError::command(format!(
                    "Failed to update machine pool '{id}' on cluster '{key}': {}",
                    e.reason()
                ))
            })?;
    } else {
        validate_machine_pool_id(&id)?;
        let pools = session
            .ocm
            .get_machine_pools(&cluster.id)
            .await
            .map_err(|e| CliError::command(format!("Failed to get machine pools: {e}")))?;
        if !pools.iter().any(|p| p.id == id) {
            return Err(CliError::command(format!(
                "Machine pool '{id}' does not exist for cluster '{key}'"
            )));
        }

        session
            .ocm
            .update_machine_pool(&cluster.id, &id, &pool_body(&id, scaling, labels))
            .await
            .map_err(|e| {
                CliError::command(format!(
                    "Failed to update machine pool '{id}' on cluster '{key}': {}",
                    e.reason()
                ))
            })?;
    }

    print_info(&format!("Updated machine pool '{id}' on cluster '{key}'"));
    Ok(())
}

pub async fn handle_delete_machine_pool(args: MachinePoolIdArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster;
    let id = args.id;

    if id == DEFAULT_MACHINE_POOL {
        return Err(CliError::command(format!(
            "Machine pool '{id}' cannot be deleted from cluster '{key}'"
        )));
    }
    validate_machine_pool_id(&id)?;

    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    if !confirm(
        opts.yes,
        &format!("delete machine pool {id} on cluster {key}"),
    )? {
        return Ok(());
    }

    session
        .ocm
        .delete_machine_pool(&cluster.id, &id)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to delete machine pool '{id}' on cluster '{key}': {}",
                e.reason()
            ))
        })?;

    print_info(&format!(
        "Successfully deleted machine pool '{id}' from cluster '{key}'"
    ));
    Ok(())
}

pub async fn handle_list_machine_pools(args: ClusterArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster;
    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    let pools = session
        .ocm
        .get_machine_pools(&cluster.id)
        .await
        .map_err(|e| CliError::command(format!("Failed to get machine pools: {e}")))?;

    if opts.json {
        return json_output(&pools);
    }
    display_machine_pools(&cluster, &pools);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaling(
        replicas: Option<u32>,
        enable: bool,
        min: Option<u32>,
        max: Option<u32>,
    ) -> ScalingArgs {
        ScalingArgs {
            replicas,
            enable_autoscaling: enable,
            min_replicas: min,
            max_replicas: max,
        }
    }

    #[test]
    fn test_resolve_scaling() {
        assert_eq!(resolve_scaling(&scaling(None, false, None, None)), Ok(None));
        assert_eq!(
            resolve_scaling(&scaling(Some(3), false, None, None)),
            Ok(Some(Scaling::Replicas(3)))
        );
        assert_eq!(
            resolve_scaling(&scaling(None, true, Some(2), Some(6))),
            Ok(Some(Scaling::Autoscaling { min: 2, max: 6 }))
        );
    }

    #[test]
    fn test_scaling_conflicts() {
        assert_eq!(
            resolve_scaling(&scaling(Some(3), true, Some(1), Some(2))).unwrap_err(),
            "Replicas can't be set when autoscaling is enabled"
        );
        assert_eq!(
            resolve_scaling(&scaling(None, false, Some(1), None)).unwrap_err(),
            "Autoscaling must be enabled in order to set min and max replicas"
        );
        assert!(resolve_scaling(&scaling(None, true, Some(1), None)).is_err());
        assert_eq!(
            resolve_scaling(&scaling(None, true, Some(5), Some(2))).unwrap_err(),
            "max-replicas must be greater or equal to min-replicas"
        );
    }

    #[test]
    fn test_multi_az_replicas() {
        let single = Cluster::default();
        let multi = Cluster {
            multi_az: true,
            ..Default::default()
        };

        assert!(check_multi_az(&single, Scaling::Replicas(2)).is_ok());
        assert!(check_multi_az(&multi, Scaling::Replicas(6)).is_ok());
        assert!(check_multi_az(&multi, Scaling::Replicas(4)).is_err());
        assert!(check_multi_az(&multi, Scaling::Autoscaling { min: 3, max: 7 }).is_err());
    }

    #[test]
    fn test_default_pool_patch() {
        let nodes = default_pool_patch(Some(Scaling::Replicas(4)), None);
        assert_eq!(nodes.compute, Some(4));
        assert!(nodes.autoscale_compute.is_none());

        let labels = parse_labels("tier=web").unwrap();
        let nodes = default_pool_patch(
            Some(Scaling::Autoscaling { min: 2, max: 5 }),
            Some(labels.clone()),
        );
        assert_eq!(
            nodes.autoscale_compute,
            Some(AutoscaleCompute {
                min_replicas: 2,
                max_replicas: 5
            })
        );
        assert_eq!(nodes.compute_labels, Some(labels));
        assert!(nodes.compute.is_none());
    }

    #[test]
    fn test_pool_body_serialization() {
        let body = pool_body("gpu", Some(Scaling::Replicas(2)), Some(BTreeMap::new()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["id"], "gpu");
        assert_eq!(json["replicas"], 2);
        assert_eq!(json["labels"], serde_json::json!({}));
        assert!(json.get("autoscaling").is_none());
    }
}
