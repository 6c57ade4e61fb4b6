//! Text description of a single cluster

use rosa_ocm::config::{PRODUCTION_URL, STAGING_URL};
use rosa_ocm::types::{Cluster, ClusterState, UpgradePolicy};
use std::fmt::Write;

const STAGING_DETAILS_URL: &str = "https://qaprodauth.cloud.redhat.com/openshift/details/";
const PRODUCTION_DETAILS_URL: &str = "https://cloud.redhat.com/openshift/details/";

/// Everything `describe cluster` prints besides the cluster itself
#[derive(Debug, Clone, Copy)]
pub struct ClusterDescription<'a> {
    pub cluster: &'a Cluster,
    pub aws_account: &'a str,
    pub private: bool,
    pub details_page: Option<&'a str>,
    pub scheduled_upgrade: Option<&'a UpgradePolicy>,
}

/// Console page listing cluster details for the given API URL
pub fn details_link(api_url: &str) -> Option<&'static str> {
    match api_url {
        STAGING_URL => Some(STAGING_DETAILS_URL),
        PRODUCTION_URL => Some(PRODUCTION_DETAILS_URL),
        _ => None,
    }
}

/// Extra text shown next to the cluster state
pub fn phase(cluster: &Cluster) -> String {
    match cluster.state {
        ClusterState::Pending => "(Preparing account)".to_string(),
        ClusterState::Installing => {
            let status = &cluster.status;
            if !status.provision_error_message.is_empty() {
                let code = if status.provision_error_code.is_empty() {
                    String::new()
                } else {
                    format!("{} - ", status.provision_error_code)
                };
                format!("({code}Install is taking longer than expected)")
            } else if !status.dns_ready {
                "(DNS setup in progress)".to_string()
            } else {
                String::new()
            }
        }
        _ => String::new(),
    }
}

fn nodes_line(cluster: &Cluster) -> String {
    let nodes = &cluster.nodes;
    let master = nodes.master.unwrap_or_default();
    let infra = nodes.infra.unwrap_or_default();
    match nodes.autoscale_compute {
        Some(autoscale) => format!(
            "Master: {master}, Infra: {infra}, Compute (Autoscaled): {}-{}",
            autoscale.min_replicas, autoscale.max_replicas
        ),
        None => format!(
            "Master: {master}, Infra: {infra}, Compute: {}",
            nodes.compute.unwrap_or_default()
        ),
    }
}

/// Fixed width description block, one field per line
pub fn format_cluster(desc: &ClusterDescription<'_>) -> String {
    let cluster = desc.cluster;
    let created = cluster
        .creation_timestamp
        .map(|t| t.format("%b %e %Y %H:%M:%S %Z").to_string())
        .unwrap_or_default();

    let mut out = String::new();
    let mut field = |label: &str, value: &str| {
        let _ = writeln!(out, "{:<28}{}", format!("{label}:"), value);
    };

    field("Name", cluster.display_name());
    field(
        "DNS",
        &format!("{}.{}", cluster.name, cluster.dns.base_domain),
    );
    field("ID", &cluster.id);
    field("External ID", &cluster.external_id);
    field("AWS Account", desc.aws_account);
    field("API URL", &cluster.api.url);
    field("Console URL", &cluster.console.url);
    field("Nodes", &nodes_line(cluster));
    field("Region", &cluster.region.id);
    field(
        "State",
        format!("{} {}", cluster.state, phase(cluster)).trim_end(),
    );
    field("Channel Group", &cluster.version.channel_group);
    field("Private", if desc.private { "Yes" } else { "No" });
    field("Created", &created);

    if let Some(page) = desc.details_page {
        field("Details Page", &format!("{page}{}", cluster.id));
    }
    if let Some(upgrade) = desc.scheduled_upgrade {
        let next_run = upgrade
            .next_run
            .map(|t| t.format("%Y-%m-%d %H:%M %Z").to_string())
            .unwrap_or_default();
        field(
            "Scheduled upgrade",
            &format!("{} on {}", upgrade.version, next_run),
        );
    }
    if cluster.status.state == ClusterState::Error {
        field("Provisioning Error Code", &cluster.status.provision_error_code);
        field(
            "Provisioning Error Message",
            &cluster.status.provision_error_message,
        );
    }

    out
}
