use clap::Parser;
use rosa_cli::cli::commands::IdpKind;
use rosa_cli::cli::{
    Args, Commands, CreateResource, DeleteResource, DescribeResource, EditResource,
    InstallResource, ListResource, LogsResource,
};
use std::time::Duration;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("rosa").chain(args.iter().copied()))
        .unwrap_or_else(|e| panic!("failed to parse {args:?}: {e}"))
}

#[test]
fn test_global_flags_after_subcommand() {
    let args = parse(&["delete", "cluster", "-c", "mycluster", "--yes", "--json"]);
    let opts = args.global_options();
    assert!(opts.yes);
    assert!(opts.json);
    assert!(!opts.interactive);

    match args.command {
        Commands::Delete {
            resource: DeleteResource::Cluster(cluster),
        } => assert_eq!(cluster.cluster, "mycluster"),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_resource_aliases() {
    assert!(matches!(
        parse(&["list", "machine-pools", "-c", "c1"]).command,
        Commands::List {
            resource: ListResource::Machinepools(_)
        }
    ));
    assert!(matches!(
        parse(&["list", "cluster"]).command,
        Commands::List {
            resource: ListResource::Clusters
        }
    ));
    assert!(matches!(
        parse(&["remove", "idp", "github-1", "-c", "c1"]).command,
        Commands::Delete {
            resource: DeleteResource::Idp(_)
        }
    ));
    assert!(matches!(
        parse(&["edit", "machinepools", "default", "-c", "c1", "--replicas", "3"]).command,
        Commands::Edit {
            resource: EditResource::Machinepool(_)
        }
    ));
}

#[test]
fn test_create_cluster_flags() {
    let args = parse(&[
        "create",
        "cluster",
        "--name",
        "mycluster",
        "--region",
        "us-east-1",
        "--machine-cidr",
        "10.0.0.0/16",
        "--host-prefix",
        "23",
        "--expiration",
        "2h",
        "--multi-az",
    ]);

    let Commands::Create {
        resource: CreateResource::Cluster(create),
    } = args.command
    else {
        panic!("expected create cluster");
    };
    assert_eq!(create.name, "mycluster");
    assert_eq!(create.region, "us-east-1");
    assert_eq!(
        create.machine_cidr.map(|n| n.to_string()).as_deref(),
        Some("10.0.0.0/16")
    );
    assert_eq!(create.host_prefix, 23);
    assert_eq!(create.expiration, Some(Duration::from_secs(2 * 3600)));
    assert!(create.multi_az);
    assert!(create.service_cidr.is_none());
}

#[test]
fn test_invalid_cidr_is_rejected() {
    let result = Args::try_parse_from([
        "rosa",
        "create",
        "cluster",
        "--name",
        "c1",
        "--pod-cidr",
        "not-a-cidr",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_describe_cluster_accepts_key_and_flag() {
    let args = parse(&["describe", "cluster", "mycluster"]);
    let Commands::Describe {
        resource: DescribeResource::Cluster(describe),
    } = args.command
    else {
        panic!("expected describe cluster");
    };
    assert_eq!(describe.key.as_deref(), Some("mycluster"));

    let args = parse(&["describe", "cluster", "a", "--cluster", "b"]);
    let Commands::Describe {
        resource: DescribeResource::Cluster(describe),
    } = args.command
    else {
        panic!("expected describe cluster");
    };
    assert_eq!(describe.key.as_deref(), Some("a"));
    assert_eq!(describe.cluster.as_deref(), Some("b"));
}

#[test]
fn test_create_idp_lists() {
    let args = parse(&[
        "create",
        "idp",
        "-c",
        "c1",
        "--type",
        "github",
        "--organizations",
        "org1,org2",
    ]);
    let Commands::Create {
        resource: CreateResource::Idp(idp),
    } = args.command
    else {
        panic!("expected create idp");
    };
    assert_eq!(idp.kind, Some(IdpKind::Github));
    assert_eq!(idp.organizations, vec!["org1", "org2"]);
    assert!(idp.teams.is_empty());
}

#[test]
fn test_install_addon_positional() {
    let args = parse(&["install", "addon", "dbaas-operator", "--cluster", "c1"]);
    let Commands::Install {
        resource: InstallResource::Addon(addon),
    } = args.command
    else {
        panic!("expected install addon");
    };
    assert_eq!(addon.ids, vec!["dbaas-operator"]);
    assert_eq!(addon.cluster, "c1");
}

#[test]
fn test_logs_watch_and_tail() {
    let args = parse(&["logs", "cluster", "-c", "c1", "--watch", "--tail", "50"]);
    let Commands::Logs {
        resource: LogsResource::Cluster(logs),
    } = args.command
    else {
        panic!("expected logs cluster");
    };
    assert!(logs.watch);
    assert_eq!(logs.tail, Some(50));
}

#[test]
fn test_cluster_flag_is_required() {
    assert!(Args::try_parse_from(["rosa", "list", "users"]).is_err());
}
