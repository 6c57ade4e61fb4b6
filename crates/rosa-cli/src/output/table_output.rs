//! Table formatting for list commands

use rosa_ocm::resources::machine_pools::DEFAULT_MACHINE_POOL;
use rosa_ocm::types::{
    oauth_callback_url, AddOn, AddOnInstallation, CloudRegion, Cluster, IdentityProvider,
    MachinePool, MachineType, Version,
};
use std::collections::BTreeMap;
use tabled::{settings::Style, Table, Tabled};

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");
}

/// Format labels as `k=v, k2=v2`
pub fn format_labels(labels: Option<&BTreeMap<String, String>>) -> String {
    labels
        .map(|labels| {
            labels
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// Display clusters in table format
pub fn display_clusters(clusters: &[Cluster]) {
    #[derive(Tabled)]
    struct ClusterRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "STATE")]
        state: String,
    }

    let rows = clusters
        .iter()
        .map(|c| ClusterRow {
            id: c.id.clone(),
            name: c.name.clone(),
            state: c.state.to_string(),
        })
        .collect();
    print_table::<ClusterRow>(rows);
}

/// Display identity providers of a cluster
pub fn display_identity_providers(cluster: &Cluster, idps: &[IdentityProvider]) {
    #[derive(Tabled)]
    struct IdpRow {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "TYPE")]
        kind: String,
        #[tabled(rename = "AUTH URL")]
        auth_url: String,
    }

    let rows = idps
        .iter()
        .map(|idp| IdpRow {
            name: idp.name.clone(),
            kind: idp.kind.display_name().to_string(),
            auth_url: if idp.kind.uses_oauth_callback() {
                oauth_callback_url(cluster, &idp.name)
            } else {
                String::new()
            },
        })
        .collect();
    print_table::<IdpRow>(rows);
}

/// Display users with the groups they belong to
pub fn display_users(users: &BTreeMap<String, Vec<String>>) {
    #[derive(Tabled)]
    struct UserRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "GROUPS")]
        groups: String,
    }

    let rows = users
        .iter()
        .map(|(id, groups)| UserRow {
            id: id.clone(),
            groups: groups.join(", "),
        })
        .collect();
    print_table::<UserRow>(rows);
}

/// Display available add-ons with their installation state on a cluster
pub fn display_addons(addons: &[AddOn], installations: &[AddOnInstallation]) {
    #[derive(Tabled)]
    struct AddOnRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "STATE")]
        state: String,
    }

    let rows = addons
        .iter()
        .map(|addon| {
            let state = installations
                .iter()
                .find(|i| i.addon.id == addon.id || i.id == addon.id)
                .map(|i| i.state.clone())
                .unwrap_or_else(|| "not installed".to_string());
            AddOnRow {
                id: addon.id.clone(),
                name: addon.name.clone(),
                state,
            }
        })
        .collect();
    print_table::<AddOnRow>(rows);
}

/// Display the default pool followed by the additional machine pools
pub fn display_machine_pools(cluster: &Cluster, pools: &[MachinePool]) {
    #[derive(Tabled)]
    struct PoolRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "AUTOSCALING")]
        autoscaling: String,
        #[tabled(rename = "REPLICAS")]
        replicas: String,
        #[tabled(rename = "INSTANCE TYPE")]
        instance_type: String,
        #[tabled(rename = "LABELS")]
        labels: String,
    }

    fn scaling(autoscaling: Option<(u32, u32)>, replicas: Option<u32>) -> (String, String) {
        match autoscaling {
            Some((min, max)) => ("Yes".to_string(), format!("{min}-{max}")),
            None => ("No".to_string(), replicas.unwrap_or_default().to_string()),
        }
    }

    let nodes = &cluster.nodes;
    let (autoscaling, replicas) = scaling(
        nodes
            .autoscale_compute
            .map(|a| (a.min_replicas, a.max_replicas)),
        nodes.compute,
    );
    let mut rows = vec![PoolRow {
        id: DEFAULT_MACHINE_POOL.to_string(),
        autoscaling,
        replicas,
        instance_type: nodes
            .compute_machine_type
            .as_ref()
            .map(|t| t.id.clone())
            .unwrap_or_default(),
        labels: format_labels(nodes.compute_labels.as_ref()),
    }];

    rows.extend(pools.iter().map(|pool| {
        let (autoscaling, replicas) = scaling(
            pool.autoscaling.map(|a| (a.min_replicas, a.max_replicas)),
            pool.replicas,
        );
        PoolRow {
            id: pool.id.clone(),
            autoscaling,
            replicas,
            instance_type: pool.instance_type.clone().unwrap_or_default(),
            labels: format_labels(pool.labels.as_ref()),
        }
    }));

    print_table(rows);
}

pub fn display_regions(regions: &[CloudRegion]) {
    #[derive(Tabled)]
    struct RegionRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "MULTI-AZ SUPPORT")]
        multi_az: bool,
    }

    let rows = regions
        .iter()
        .map(|r| RegionRow {
            id: r.id.clone(),
            name: r.display_name.clone(),
            multi_az: r.supports_multi_az,
        })
        .collect();
    print_table::<RegionRow>(rows);
}

pub fn display_versions(versions: &[Version]) {
    #[derive(Tabled)]
    struct VersionRow {
        #[tabled(rename = "VERSION")]
        version: String,
        #[tabled(rename = "DEFAULT")]
        default: String,
    }

    let rows = versions
        .iter()
        .map(|v| VersionRow {
            version: v.short_id().to_string(),
            default: if v.default { "yes" } else { "no" }.to_string(),
        })
        .collect();
    print_table::<VersionRow>(rows);
}

pub fn display_machine_types(machine_types: &[MachineType]) {
    #[derive(Tabled)]
    struct MachineTypeRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "CATEGORY")]
        category: String,
        #[tabled(rename = "CPU CORES")]
        cpu: String,
        #[tabled(rename = "MEMORY")]
        memory: String,
    }

    let rows = machine_types
        .iter()
        .map(|m| MachineTypeRow {
            id: m.id.clone(),
            category: m.category.clone(),
            cpu: format!("{}", m.cpu.value),
            memory: format!("{:.1} GiB", m.memory_gib()),
        })
        .collect();
    print_table::<MachineTypeRow>(rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_labels() {
        let mut labels = BTreeMap::new();
        labels.insert("tier".to_string(), "frontend".to_string());
        labels.insert("env".to_string(), "prod".to_string());
        assert_eq!(format_labels(Some(&labels)), "env=prod, tier=frontend");
        assert_eq!(format_labels(None), "");
    }
}
