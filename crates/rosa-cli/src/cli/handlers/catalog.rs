//! Read-only catalog listings: regions, versions and instance types

use crate::cli::args::GlobalOptions;
use crate::cli::commands::ListRegionsArgs;
use crate::cli::handlers::common::connect;
use crate::error::{CliError, Result};
use crate::output::json_output;
use crate::output::table_output::{display_machine_types, display_regions, display_versions};
use rosa_ocm::types::CloudRegion;

/// Enabled regions, optionally only those with multi-AZ support
pub fn filter_regions(regions: Vec<CloudRegion>, multi_az: bool) -> Vec<CloudRegion> {
    regions
        .into_iter()
        .filter(|r| r.enabled && (!multi_az || r.supports_multi_az))
        .collect()
}

pub async fn handle_list_regions(args: ListRegionsArgs, opts: GlobalOptions) -> Result<()> {
    let ocm = connect().await?;
    let regions = ocm
        .get_regions()
        .await
        .map_err(|e| CliError::command(format!("Failed to retrieve AWS regions: {e}")))?;
    let regions = filter_regions(regions, args.multi_az);

    if opts.json {
        return json_output(&regions);
    }
    display_regions(&regions);
    Ok(())
}

pub async fn handle_list_versions(opts: GlobalOptions) -> Result<()> {
    let ocm = connect().await?;
    let versions = ocm
        .get_versions()
        .await
        .map_err(|e| CliError::command(format!("Failed to retrieve versions: {e}")))?;

    if opts.json {
        return json_output(&versions);
    }
    display_versions(&versions);
    Ok(())
}

pub async fn handle_list_instance_types(opts: GlobalOptions) -> Result<()> {
    let ocm = connect().await?;
    let machine_types = ocm
        .get_machine_types()
        .await
        .map_err(|e| CliError::command(format!("Failed to retrieve machine types: {e}")))?;

    if opts.json {
        return json_output(&machine_types);
    }
    display_machine_types(&machine_types);
    Ok(())
}
