//! AWS caller identity and region
//!
//! Clusters are owned by the AWS identity that created them: every lookup
//! filters on the creator ARN returned by STS `GetCallerIdentity`.

use crate::error::{CliError, Result};
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::error::DisplayErrorContext;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Environment variable consulted when `--region` is not given
pub const REGION_ENV_VAR: &str = "AWS_REGION";

/// Region used to reach STS when none is configured
const FALLBACK_STS_REGION: &str = "us-east-1";

/// AWS identity running the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub arn: String,
    pub account_id: String,
}

/// STS client for the current AWS credentials
pub struct AwsClient {
    sts: aws_sdk_sts::Client,
}

impl AwsClient {
    /// Build a client from the default credential and region chain
    pub async fn new(region: Option<&str>) -> Self {
        let region_chain = RegionProviderChain::first_try(region.map(|r| Region::new(r.to_string())))
            .or_default_provider()
            .or_else(Region::from_static(FALLBACK_STS_REGION));
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_chain)
            .load()
            .await;

        Self {
            sts: aws_sdk_sts::Client::new(&config),
        }
    }

    /// Identity of the caller
    pub async fn get_creator(&self) -> Result<Creator> {
        debug!("Getting AWS caller identity");
        let output = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| {
                CliError::aws(format!("Failed to get AWS creator: {}", DisplayErrorContext(&e)))
            })?;

        let arn = output
            .arn()
            .ok_or_else(|| CliError::aws("Failed to get AWS creator: missing ARN"))?
            .to_string();
        let account_id = output
            .account()
            .ok_or_else(|| CliError::aws("Failed to get AWS creator: missing account"))?
            .to_string();

        debug!("AWS creator is '{}'", arn);
        Ok(Creator { arn, account_id })
    }
}

/// Resolve the AWS region: flag, then `AWS_REGION`, then the AWS profile
///
/// Returns an empty string when no region is configured anywhere.
pub async fn get_region(flag: &str) -> String {
    if let Some(region) = region_from(flag, std::env::var(REGION_ENV_VAR).ok().as_deref()) {
        return region;
    }

    RegionProviderChain::default_provider()
        .region()
        .await
        .map(|r| r.to_string())
        .unwrap_or_default()
}

fn region_from(flag: &str, env: Option<&str>) -> Option<String> {
    [Some(flag), env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|r| !r.is_empty())
        .map(str::to_string)
}

/// Parts of an Amazon Resource Name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArnError {
    #[error("arn: invalid prefix")]
    InvalidPrefix,
    #[error("arn: not enough sections")]
    NotEnoughSections,
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut sections = s.splitn(6, ':');
        if sections.next() != Some("arn") {
            return Err(ArnError::InvalidPrefix);
        }
        let mut next = || sections.next().ok_or(ArnError::NotEnoughSections);
        Ok(Arn {
            partition: next()?.to_string(),
            service: next()?.to_string(),
            region: next()?.to_string(),
            account_id: next()?.to_string(),
            resource: next()?.to_string(),
        })
    }
}

impl Arn {
    pub fn parse(s: &str) -> std::result::Result<Self, ArnError> {
        s.parse()
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_arn() {
        let arn = Arn::parse("arn:aws:iam::123456789012:user/dev").unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "iam");
        assert_eq!(arn.region, "");
        assert_eq!(arn.account_id, "123456789012");
        assert_eq!(arn.resource, "user/dev");
        assert_eq!(arn.to_string(), "arn:aws:iam::123456789012:user/dev");
    }

    #[test]
    fn test_resource_may_contain_colons() {
        let arn = Arn::parse("arn:aws:sts::123456789012:assumed-role/admin:session").unwrap();
        assert_eq!(arn.resource, "assumed-role/admin:session");
    }

    #[test]
    fn test_invalid_arns() {
        assert_eq!(Arn::parse("").unwrap_err(), ArnError::InvalidPrefix);
        assert_eq!(Arn::parse("urn:aws:iam::1:user/x").unwrap_err(), ArnError::InvalidPrefix);
        assert_eq!(
            Arn::parse("arn:aws:iam").unwrap_err(),
            ArnError::NotEnoughSections
        );
    }

    #[test]
    fn test_region_precedence() {
        assert_eq!(region_from("eu-west-1", Some("us-east-2")).as_deref(), Some("eu-west-1"));
        assert_eq!(region_from("", Some("us-east-2")).as_deref(), Some("us-east-2"));
        assert_eq!(region_from(" ", Some("")), None);
        assert_eq!(region_from("", None), None);
    }
}
