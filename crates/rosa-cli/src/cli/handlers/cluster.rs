//! Cluster lifecycle: create, describe, list, delete and logs

use crate::aws::{get_region, Arn};
use crate::cli::args::GlobalOptions;
use crate::cli::commands::{ClusterArgs, CreateClusterArgs, DescribeClusterArgs, LogsArgs};
use crate::cli::handlers::common::Session;
use crate::error::{CliError, Result};
use crate::interactive::{self, confirm::confirm, Input};
use crate::output::describe::{details_link, format_cluster, ClusterDescription};
use crate::output::progress::with_spinner;
use crate::output::table_output::display_clusters;
use crate::output::{json_output, print_info};
use chrono::{DateTime, DurationRound, Utc};
use ipnet::IpNet;
use rosa_ocm::types::{ClusterSpec, ClusterState, ListeningMethod, VERSION_PREFIX};
use rosa_ocm::OcmClient;
use std::time::Duration;
use tracing::debug;

/// Delay between two polls of `logs cluster --watch`
const LOG_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Check a version against the enabled versions and add the API prefix
///
/// An empty version selects the default version.
pub fn validate_version(version: &str, versions: &[String]) -> std::result::Result<Option<String>, String> {
    if version.is_empty() {
        return Ok(None);
    }
    if !versions.iter().any(|v| v == version) {
        return Err(format!(
            "A valid version number must be specified\nValid versions: {}",
            versions.join(" ")
        ));
    }
    Ok(Some(format!("{VERSION_PREFIX}{version}")))
}

/// Check a compute machine type against the available types
pub fn validate_machine_type(
    machine_type: &str,
    machine_types: &[String],
) -> std::result::Result<Option<String>, String> {
    if machine_type.is_empty() {
        return Ok(None);
    }
    if !machine_types.iter().any(|m| m == machine_type) {
        return Err(format!(
            "A valid machine type number must be specified\nValid machine types: {}",
            machine_types.join(" ")
        ));
    }
    Ok(Some(machine_type.to_string()))
}

/// Check that a region is set and enabled
pub fn validate_region(region: &str, regions: &[String]) -> std::result::Result<String, String> {
    if region.is_empty() {
        return Err("Expected a valid AWS region".to_string());
    }
    if !regions.iter().any(|r| r == region) {
        return Err(format!(
            "Expected a valid AWS region: region '{region}' is not supported\nValid regions: {}",
            regions.join(" ")
        ));
    }
    Ok(region.to_string())
}

/// Expiration timestamp from `--expiration-time` or `--expiration`
pub fn validate_expiration(
    expiration_time: &str,
    expiration: Option<Duration>,
    now: DateTime<Utc>,
) -> std::result::Result<Option<DateTime<Utc>>, String> {
    if !expiration_time.is_empty() && expiration.is_some() {
        return Err("At most one of 'expiration-time' or 'expiration' may be specified".to_string());
    }

    if !expiration_time.is_empty() {
        let time = DateTime::parse_from_rfc3339(expiration_time)
            .map_err(|e| format!("Failed to parse expiration-time: {e}"))?;
        return Ok(Some(time.with_timezone(&Utc)));
    }

    match expiration {
        Some(duration) => {
            let duration = chrono::Duration::from_std(duration)
                .map_err(|e| format!("Failed to parse expiration: {e}"))?;
            let time = now
                .checked_add_signed(duration)
                .ok_or_else(|| "Failed to parse expiration: duration is too large".to_string())?
                .duration_round(chrono::Duration::seconds(1))
                .map_err(|e| format!("Failed to parse expiration: {e}"))?;
            Ok(Some(time))
        }
        None => Ok(None),
    }
}

/// Host prefix is either unset (0) or a valid IPv4 prefix length
pub fn validate_host_prefix(host_prefix: u32) -> std::result::Result<Option<u8>, String> {
    match host_prefix {
        0 => Ok(None),
        1..=32 => Ok(Some(host_prefix as u8)),
        _ => Err(format!(
            "Expected a valid host prefix value: '{host_prefix}' must be between 1 and 32"
        )),
    }
}

fn ask_cidr(question: &str, help: &str, current: Option<IpNet>) -> Result<Option<IpNet>> {
    let mut input = Input::new(question).help(help);
    if let Some(current) = current {
        input = input.default_value(current);
    }
    interactive::get_ipnet(&input)
        .map_err(|e| CliError::command(format!("Expected a valid CIDR value: {e}")))
}

async fn region_list(ocm: &OcmClient) -> Result<Vec<String>> {
    let regions = ocm
        .get_regions()
        .await
        .map_err(|e| CliError::command(format!("Failed to retrieve AWS regions: {e}")))?;
    Ok(regions.into_iter().map(|r| r.id).collect())
}

async fn version_list(ocm: &OcmClient) -> Result<Vec<String>> {
    let versions = ocm
        .get_versions()
        .await
        .map_err(|e| CliError::command(format!("Failed to retrieve versions: {e}")))?;
    Ok(versions.iter().map(|v| v.short_id().to_string()).collect())
}

pub async fn machine_type_list(ocm: &OcmClient) -> Result<Vec<String>> {
    let machine_types = ocm
        .get_machine_types()
        .await
        .map_err(|e| CliError::command(format!("Failed to retrieve machine types: {e}")))?;
    Ok(machine_types.into_iter().map(|m| m.id).collect())
}

pub async fn handle_create_cluster(args: CreateClusterArgs, opts: GlobalOptions) -> Result<()> {
    let session = Session::new().await?;
    let ocm = &session.ocm;
    let ask = opts.interactive;

    if ask {
        print_info(
            "Interactive mode enabled.\n\
             Any optional fields can be left empty and a default will be selected.",
        );
    }

    // Name
    let mut name = args.name.clone();
    if ask {
        name = interactive::get_string(
            &Input::new("Cluster name")
                .help("Name of the cluster. This will be used when generating a sub-domain for your cluster on openshiftapps.com.")
                .default_value(&name)
                .required(),
        )
        .map_err(|e| CliError::command(format!("Expected a valid cluster name: {e}")))?;
    }
    if !rosa_common::is_valid_cluster_key(&name) {
        return Err(CliError::command("Expected a valid cluster name"));
    }

    // Region
    let mut region = get_region(&args.region).await;
    let regions = region_list(ocm).await?;
    if ask {
        region = interactive::get_option(
            &Input::new("AWS region")
                .help("AWS region where your worker pool will be located.")
                .options(regions.clone())
                .default_value(&region)
                .required(),
        )
        .map_err(|e| CliError::command(format!("Expected a valid AWS region: {e}")))?;
    }
    let region = validate_region(&region, &regions).map_err(CliError::command)?;

    // Version
    let mut version = args.version.clone();
    let versions = version_list(ocm).await?;
    if ask {
        version = interactive::get_option(
            &Input::new("OpenShift version")
                .help("Version of OpenShift that will be used to install the cluster, for example \"4.3.10\"")
                .options(versions.clone())
                .default_value(&version),
        )
        .map_err(|e| CliError::command(format!("Expected a valid OpenShift version: {e}")))?;
    }
    let version = validate_version(&version, &versions)
        .map_err(|e| CliError::command(format!("Expected a valid OpenShift version: {e}")))?;

    // Multi-AZ
    let mut multi_az = args.multi_az;
    if ask {
        multi_az = interactive::get_bool(
            &Input::new("Multiple availability zones")
                .help("Deploy to multiple data centers.")
                .default_value(multi_az),
        )
        .map_err(|e| CliError::command(format!("Expected a valid multi-AZ value: {e}")))?;
    }

    // Compute machine type
    let mut machine_type = args.compute_machine_type.clone();
    let machine_types = machine_type_list(ocm).await?;
    if ask {
        machine_type = interactive::get_option(
            &Input::new("Compute nodes instance type")
                .help("Instance type for the compute nodes.")
                .options(machine_types.clone())
                .default_value(&machine_type),
        )
        .map_err(|e| CliError::command(format!("Expected a valid machine type: {e}")))?;
    }
    let machine_type = validate_machine_type(&machine_type, &machine_types)
        .map_err(|e| CliError::command(format!("Expected a valid machine type: {e}")))?;

    // Compute nodes
    let mut compute_nodes = args.compute_nodes;
    if ask {
        let mut input = Input::new("Compute nodes").help(
            "Number of worker nodes to provision per zone. Single zone clusters need at least 4 nodes, \
             while multizone clusters need at least 9 nodes (3 per zone) for resiliency.",
        );
        if compute_nodes > 0 {
            input = input.default_value(compute_nodes);
        }
        compute_nodes = interactive::get_int(&input).map_err(|e| {
            CliError::command(format!("Expected a valid number of compute nodes: {e}"))
        })?;
    }

    let expiration = validate_expiration(&args.expiration_time, args.expiration, Utc::now())
        .map_err(CliError::command)?;

    // Networking
    let (mut machine_cidr, mut service_cidr, mut pod_cidr) =
        (args.machine_cidr, args.service_cidr, args.pod_cidr);
    let mut host_prefix = args.host_prefix;
    if ask {
        machine_cidr = ask_cidr(
            "Machine CIDR",
            "Block of IP addresses used by OpenShift while installing the cluster, for example \"10.0.0.0/16\".",
            machine_cidr,
        )?;
        service_cidr = ask_cidr(
            "Service CIDR",
            "Block of IP addresses for services, for example \"172.30.0.0/16\".",
            service_cidr,
        )?;
        pod_cidr = ask_cidr(
            "Pod CIDR",
            "Block of IP addresses from which Pod IP addresses are allocated, for example \"10.128.0.0/14\".",
            pod_cidr,
        )?;

        let mut input = Input::new("Host prefix")
            .help("Subnet prefix length to assign to each individual node.");
        if host_prefix > 0 {
            input = input.default_value(host_prefix);
        }
        host_prefix = interactive::get_int(&input)
            .map_err(|e| CliError::command(format!("Expected a valid host prefix value: {e}")))?;
    }
    let host_prefix = validate_host_prefix(host_prefix).map_err(CliError::command)?;

    // Privacy
    let mut private = args.private;
    if ask {
        private = interactive::get_bool(
            &Input::new("Private cluster")
                .help("Restrict master API endpoint and application routes to direct, private connectivity.")
                .default_value(private),
        )
        .map_err(|e| CliError::command(format!("Expected a valid private value: {e}")))?;
    }

    let exists = ocm
        .has_cluster_named(&name, &session.creator.arn)
        .await
        .map_err(|e| CliError::command(format!("Failed to check for existing clusters: {e}")))?;
    if exists {
        return Err(CliError::command(format!(
            "A cluster named '{name}' already exists"
        )));
    }

    let spec = ClusterSpec {
        name,
        region,
        multi_az,
        version,
        expiration,
        compute_machine_type: machine_type,
        compute_nodes: (compute_nodes > 0).then_some(compute_nodes),
        machine_cidr,
        service_cidr,
        pod_cidr,
        host_prefix,
        private,
        creator_arn: session.creator.arn.clone(),
    };
    debug!("Creating cluster '{}' in region '{}'", spec.name, spec.region);

    let cluster = with_spinner("Creating cluster", ocm.create_cluster(&spec))
        .await
        .map_err(|e| CliError::command(format!("Failed to create cluster: {e}")))?;

    print_info(&format!("Cluster '{}' has been created.", cluster.name));
    print_info(
        "Once the cluster is installed you will need to add an Identity Provider \
         before you can login into the cluster. See 'rosa create idp --help' \
         for more information.",
    );

    if args.watch {
        return watch_logs(&session, &cluster.name, None).await;
    }

    print_info(&format!(
        "To determine when your cluster is Ready, run 'rosa describe cluster -c {}'.",
        cluster.name
    ));
    print_info(&format!(
        "To watch your cluster installation logs, run 'rosa logs cluster -c {} --watch'.",
        cluster.name
    ));
    Ok(())
}

/// Cluster key from `--cluster`, else from the positional argument
pub fn describe_key(args: &DescribeClusterArgs) -> Result<String> {
    match args.cluster.as_ref().or(args.key.as_ref()) {
        Some(key) if !key.is_empty() => Ok(key.clone()),
        _ => Err(CliError::command(
            "Expected exactly one command line argument or flag containing the name or identifier of the cluster",
        )),
    }
}

pub async fn handle_describe_cluster(args: DescribeClusterArgs, opts: GlobalOptions) -> Result<()> {
    let key = describe_key(&args)?;
    rosa_common::validate_cluster_key(&key)?;

    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    if opts.json {
        return json_output(&cluster);
    }

    let creator = cluster
        .creator_arn()
        .and_then(|arn| Arn::parse(arn).ok())
        .ok_or_else(|| {
            CliError::command(format!("Failed to parse creator ARN for cluster '{key}'"))
        })?;

    let ingresses = session
        .ocm
        .get_ingresses(&cluster.id)
        .await
        .map_err(|e| CliError::command(format!("Failed to get ingresses for cluster '{key}': {e}")))?;
    let private = ingresses
        .iter()
        .any(|i| i.default && i.listening == ListeningMethod::Internal);

    let upgrade = session
        .ocm
        .get_scheduled_upgrade(&cluster.id)
        .await
        .map_err(|e| {
            CliError::command(format!(
                "Failed to get scheduled upgrades for cluster '{key}': {e}"
            ))
        })?;

    let description = ClusterDescription {
        cluster: &cluster,
        aws_account: &creator.account_id,
        private,
        details_page: details_link(session.ocm.url()),
        scheduled_upgrade: upgrade.as_ref(),
    };
    println!("{}", format_cluster(&description));
    Ok(())
}

pub async fn handle_list_clusters(opts: GlobalOptions) -> Result<()> {
    let session = Session::new().await?;
    let clusters = with_spinner(
        "Fetching clusters",
        session.ocm.list_clusters(&session.creator.arn),
    )
    .await
    .map_err(|e| CliError::command(format!("Failed to get clusters: {e}")))?;

    if opts.json {
        return json_output(&clusters);
    }
    if clusters.is_empty() {
        print_info("No clusters available");
        return Ok(());
    }
    display_clusters(&clusters);
    Ok(())
}

pub async fn handle_delete_cluster(args: ClusterArgs, opts: GlobalOptions) -> Result<()> {
    let key = args.cluster;
    let session = Session::new().await?;
    let cluster = session.cluster(&key).await?;

    if !confirm(opts.yes, &format!("delete cluster {key}"))? {
        return Ok(());
    }

    debug!("Deleting cluster '{}'", cluster.id);
    session
        .ocm
        .delete_cluster(&cluster.id)
        .await
        .map_err(|e| CliError::command(format!("Failed to delete cluster '{key}': {e}")))?;

    print_info(&format!("Cluster '{key}' will start uninstalling now"));
    print_info(&format!(
        "To watch your cluster uninstallation logs, run 'rosa logs cluster -c {key} --watch'"
    ));
    Ok(())
}

/// Part of `current` not printed yet
///
/// `printed` is either a previous full log or, after `--tail`, its last
/// lines; both end where the new content starts. When `printed` cannot be
/// found in `current` everything is new.
pub fn new_log_content<'a>(printed: &str, current: &'a str) -> &'a str {
    if printed.is_empty() {
        return current;
    }
    match current.find(printed) {
        Some(start) => &current[start + printed.len()..],
        None => current,
    }
}

/// States after which the log does not change anymore
fn is_settled(state: ClusterState) -> bool {
    matches!(state, ClusterState::Ready | ClusterState::Error)
}

async fn fetch_logs(
    ocm: &OcmClient,
    cluster_id: &str,
    state: ClusterState,
    tail: Option<u32>,
) -> rosa_ocm::Result<String> {
    let entry = if state == ClusterState::Uninstalling {
        ocm.get_uninstall_logs(cluster_id, tail).await?
    } else {
        ocm.get_install_logs(cluster_id, tail).await?
    };
    Ok(entry.content)
}

async fn watch_logs(session: &Session, key: &str, tail: Option<u32>) -> Result<()> {
    let mut printed = String::new();
    let mut tail = tail;

    loop {
        let cluster = match session.ocm.find_cluster(key, &session.creator.arn).await {
            Ok(Some(cluster)) => cluster,
            Ok(None) => {
                print_info(&format!("Cluster '{key}' has been removed"));
                return Ok(());
            }
            Err(e) => {
                return Err(CliError::command(format!(
                    "Failed to get cluster '{key}': {e}"
                )))
            }
        };

        match fetch_logs(&session.ocm, &cluster.id, cluster.state, tail).await {
            Ok(content) => {
                print!("{}", new_log_content(&printed, &content));
                printed = content;
                tail = None;
            }
            Err(e) if e.is_not_found() => debug!("Logs for cluster '{}' not available yet", key),
            Err(e) => {
                return Err(CliError::command(format!(
                    "Failed to get logs for cluster '{key}': {e}"
                )))
            }
        }

        if is_settled(cluster.state) {
            print_info(&format!("Cluster '{key}' is now {}", cluster.state));
            return Ok(());
        }

        tokio::time::sleep(LOG_POLL_INTERVAL).await;
    }
}

pub async fn handle_logs(args: LogsArgs) -> Result<()> {
    let key = args.cluster;
    let session = Session::new().await?;

    if args.watch {
        rosa_common::validate_cluster_key(&key)?;
        return watch_logs(&session, &key, args.tail).await;
    }

    let cluster = session.cluster(&key).await?;
    let content = fetch_logs(&session.ocm, &cluster.id, cluster.state, args.tail)
        .await
        .map_err(|e| CliError::command(format!("Failed to get logs for cluster '{key}': {e}")))?;

    if content.is_empty() {
        print_info(&format!("Logs for cluster '{key}' are not available yet"));
    } else {
        print!("{content}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_version() {
        let versions = list(&["4.4.5", "4.5.1"]);
        assert_eq!(validate_version("", &versions), Ok(None));
        assert_eq!(
            validate_version("4.5.1", &versions),
            Ok(Some("openshift-v4.5.1".to_string()))
        );
        assert_eq!(
            validate_version("4.1.0", &versions).unwrap_err(),
            "A valid version number must be specified\nValid versions: 4.4.5 4.5.1"
        );
    }

    #[test]
    fn test_validate_machine_type() {
        let types = list(&["m5.xlarge", "r5.2xlarge"]);
        assert_eq!(validate_machine_type("", &types), Ok(None));
        assert_eq!(
            validate_machine_type("m5.xlarge", &types),
            Ok(Some("m5.xlarge".to_string()))
        );
        assert_eq!(
            validate_machine_type("t2.micro", &types).unwrap_err(),
            "A valid machine type number must be specified\nValid machine types: m5.xlarge r5.2xlarge"
        );
    }

    #[test]
    fn test_validate_region() {
        let regions = list(&["us-east-1", "eu-west-1"]);
        assert_eq!(validate_region("eu-west-1", &regions), Ok("eu-west-1".into()));
        assert_eq!(
            validate_region("", &regions).unwrap_err(),
            "Expected a valid AWS region"
        );
        assert!(validate_region("mars-1", &regions).is_err());
    }

    #[test]
    fn test_expiration_flags_are_exclusive() {
        let now = Utc::now();
        let err = validate_expiration(
            "2030-01-01T00:00:00Z",
            Some(Duration::from_secs(3600)),
            now,
        )
        .unwrap_err();
        assert_eq!(
            err,
            "At most one of 'expiration-time' or 'expiration' may be specified"
        );
        assert_eq!(validate_expiration("", None, now), Ok(None));
    }

    #[test]
    fn test_expiration_time_formats() {
        let now = Utc::now();
        let expected = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            validate_expiration("2030-01-02T03:04:05Z", None, now),
            Ok(Some(expected))
        );
        let nanos = validate_expiration("2030-01-02T03:04:05.123456789+00:00", None, now)
            .unwrap()
            .unwrap();
        assert_eq!(nanos.timestamp(), expected.timestamp());
        assert!(validate_expiration("tomorrow", None, now)
            .unwrap_err()
            .starts_with("Failed to parse expiration-time:"));
    }

    #[test]
    fn test_expiration_duration_is_rounded_to_the_second() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::milliseconds(400);
        let expiration = validate_expiration("", Some(Duration::from_secs(2 * 3600)), now)
            .unwrap()
            .unwrap();
        assert_eq!(expiration, Utc.with_ymd_and_hms(2030, 1, 1, 2, 0, 0).unwrap());
    }

    #[test]
    fn test_validate_host_prefix() {
        assert_eq!(validate_host_prefix(0), Ok(None));
        assert_eq!(validate_host_prefix(23), Ok(Some(23)));
        assert!(validate_host_prefix(33).is_err());
    }

    #[test]
    fn test_describe_key() {
        let positional = DescribeClusterArgs {
            key: Some("mycluster".into()),
            cluster: None,
        };
        assert_eq!(describe_key(&positional).unwrap(), "mycluster");

        let flag = DescribeClusterArgs {
            key: None,
            cluster: Some("abc".into()),
        };
        assert_eq!(describe_key(&flag).unwrap(), "abc");

        let both = DescribeClusterArgs {
            key: Some("mycluster".into()),
            cluster: Some("abc".into()),
        };
        assert_eq!(describe_key(&both).unwrap(), "abc");

        assert!(describe_key(&DescribeClusterArgs::default()).is_err());
    }

    #[test]
    fn test_new_log_content() {
        assert_eq!(new_log_content("", "a\nb\n"), "a\nb\n");
        assert_eq!(new_log_content("a\n", "a\nb\n"), "b\n");
        assert_eq!(new_log_content("a\nb\n", "a\nb\n"), "");
        assert_eq!(new_log_content("x\n", "a\n"), "a\n");
    }

    #[test]
    fn test_new_log_content_after_tail() {
        // first poll asked for the last two lines only
        let tailed = "l3\nl4\n";
        assert_eq!(new_log_content(tailed, "l1\nl2\nl3\nl4\n"), "");
        assert_eq!(new_log_content(tailed, "l1\nl2\nl3\nl4\nl5\n"), "l5\n");
    }

    #[test]
    fn test_huge_expiration_is_rejected() {
        let now = Utc::now();
        let huge = humantime::parse_duration("200000000y").unwrap();
        assert_eq!(
            validate_expiration("", Some(huge), now).unwrap_err(),
            "Failed to parse expiration: duration is too large"
        );
    }
}
