use crate::cli::commands::{
    Commands, CreateResource, DeleteResource, DescribeResource, EditResource, InstallResource,
    ListResource, LogsResource, UninstallResource,
};
use crate::cli::handlers;
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};

/// ROSA CLI - Red Hat OpenShift Service on AWS
#[derive(Parser, Debug)]
#[command(
    name = "rosa",
    author = "ROSA Team",
    version,
    about = "Command line tool for Red Hat OpenShift Service on AWS",
    long_about = "Command line tool for Red Hat OpenShift Service on AWS.

QUICK START:
  rosa login                              # Log in with an offline token
  rosa whoami                             # Show AWS and OCM identities
  rosa create cluster -i                  # Create a cluster interactively
  rosa logs cluster -c <name> --watch     # Follow the installation

CLUSTER ACCESS:
  rosa create idp -c <name> --type github # Add an identity provider
  rosa create user -c <name> --dedicated-admins <user>

DAY TWO:
  rosa list machinepools -c <name>        # Show compute pools
  rosa install addon <id> -c <name>       # Install an add-on"
)]
pub struct Args {
    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    /// Log debug output of the ROSA crates, including API requests
    #[arg(long, global = true)]
    pub debug: bool,

    /// Ask for values missing from the command line
    #[arg(short, long, global = true)]
    pub interactive: bool,

    /// Automatically answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that every handler may need
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalOptions {
    pub interactive: bool,
    pub yes: bool,
    pub json: bool,
}

impl Args {
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            interactive: self.interactive,
            yes: self.yes,
            json: self.json,
        }
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let opts = self.global_options();

        match self.command {
            // Account
            Commands::Login(args) => handlers::login::handle_login(args).await,
            Commands::Logout => handlers::login::handle_logout().await,
            Commands::Whoami => handlers::login::handle_whoami(opts).await,

            Commands::Create { resource } => match resource {
                CreateResource::Cluster(args) => {
                    handlers::cluster::handle_create_cluster(args, opts).await
                }
                CreateResource::Idp(args) => handlers::idp::handle_create_idp(args, opts).await,
                CreateResource::User(args) => {
                    handlers::user::handle_create_user(args, opts).await
                }
                CreateResource::Machinepool(args) => {
                    handlers::machine_pool::handle_create_machine_pool(args, opts).await
                }
            },

            Commands::Delete { resource } => match resource {
                DeleteResource::Cluster(args) => {
                    handlers::cluster::handle_delete_cluster(args, opts).await
                }
                DeleteResource::Idp(args) => handlers::idp::handle_delete_idp(args, opts).await,
                DeleteResource::User(args) => {
                    handlers::user::handle_delete_user(args, opts).await
                }
                DeleteResource::Machinepool(args) => {
                    handlers::machine_pool::handle_delete_machine_pool(args, opts).await
                }
            },

            Commands::Edit { resource } => match resource {
                EditResource::Machinepool(args) => {
                    handlers::machine_pool::handle_edit_machine_pool(args).await
                }
            },

            Commands::Describe { resource } => match resource {
                DescribeResource::Cluster(args) => {
                    handlers::cluster::handle_describe_cluster(args, opts).await
                }
            },

            Commands::List { resource } => match resource {
                ListResource::Clusters => handlers::cluster::handle_list_clusters(opts).await,
                ListResource::Idps(args) => handlers::idp::handle_list_idps(args, opts).await,
                ListResource::Users(args) => handlers::user::handle_list_users(args, opts).await,
                ListResource::Addons(args) => {
                    handlers::addon::handle_list_addons(args, opts).await
                }
                ListResource::Machinepools(args) => {
                    handlers::machine_pool::handle_list_machine_pools(args, opts).await
                }
                ListResource::Regions(args) => {
                    handlers::catalog::handle_list_regions(args, opts).await
                }
                ListResource::Versions => handlers::catalog::handle_list_versions(opts).await,
                ListResource::InstanceTypes => {
                    handlers::catalog::handle_list_instance_types(opts).await
                }
            },

            Commands::Install { resource } => match resource {
                InstallResource::Addon(args) => {
                    handlers::addon::handle_install_addon(args, opts).await
                }
            },

            Commands::Uninstall { resource } => match resource {
                UninstallResource::Addon(args) => {
                    handlers::addon::handle_uninstall_addon(args, opts).await
                }
            },

            Commands::Logs { resource } => match resource {
                LogsResource::Cluster(args) => handlers::cluster::handle_logs(args).await,
            },
        }
    }
}
