// crates/tfacc-core/src/arn.rs
// ============================================================================
// Module: Resource Names
// Description: Amazon Resource Name parsing, formatting, and partitions.
// Purpose: Build expected ARNs for resource attribute checks.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! ARNs have the form `arn:partition:service:region:account:resource`. Global
//! services (budgets among them) leave the region empty. The resource field
//! may itself contain `:` and is kept intact on parse.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Standard commercial partition.
pub const DEFAULT_PARTITION: &str = "aws";

/// Region prefixes mapped to their partitions, most specific first.
const PARTITION_PREFIXES: &[(&str, &str)] = &[
    ("cn-", "aws-cn"),
    ("us-gov-", "aws-us-gov"),
    ("us-isob-", "aws-iso-b"),
    ("us-iso-", "aws-iso"),
];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// ARN parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    /// Value does not start with `arn:`.
    #[error("arn must start with \"arn:\": {0}")]
    MissingPrefix(String),
    /// Value has fewer than six fields.
    #[error("arn must have six colon-separated fields: {0}")]
    MissingFields(String),
    /// Partition, service, or resource is empty.
    #[error("arn has an empty {field}: {value}")]
    EmptyField {
        /// Empty field name.
        field: &'static str,
        /// Offending ARN text.
        value: String,
    },
}

// ============================================================================
// SECTION: ARN
// ============================================================================

/// Parsed Amazon Resource Name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arn {
    /// Partition (`aws`, `aws-cn`, ...).
    pub partition: String,
    /// Service namespace.
    pub service: String,
    /// Region; empty for global services.
    pub region: String,
    /// Owning account identifier.
    pub account_id: String,
    /// Service-specific resource path.
    pub resource: String,
}

impl Arn {
    /// Builds a region-less ARN for a global service.
    #[must_use]
    pub fn global(
        partition: impl Into<String>,
        service: impl Into<String>,
        account_id: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            partition: partition.into(),
            service: service.into(),
            region: String::new(),
            account_id: account_id.into(),
            resource: resource.into(),
        }
    }

    /// Builds a regional ARN.
    #[must_use]
    pub fn regional(
        partition: impl Into<String>,
        service: impl Into<String>,
        region: impl Into<String>,
        account_id: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            partition: partition.into(),
            service: service.into(),
            region: region.into(),
            account_id: account_id.into(),
            resource: resource.into(),
        }
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

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let rest =
            value.strip_prefix("arn:").ok_or_else(|| ArnError::MissingPrefix(value.to_string()))?;
        let fields: Vec<&str> = rest.splitn(5, ':').collect();
        let [partition, service, region, account_id, resource] = fields.as_slice() else {
            return Err(ArnError::MissingFields(value.to_string()));
        };
        for (field, text) in [("partition", partition), ("service", service), ("resource", resource)] {
            if text.is_empty() {
                return Err(ArnError::EmptyField {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(Self {
            partition: (*partition).to_string(),
            service: (*service).to_string(),
            region: (*region).to_string(),
            account_id: (*account_id).to_string(),
            resource: (*resource).to_string(),
        })
    }
}

// ============================================================================
// SECTION: Partitions
// ============================================================================

/// Returns the partition serving `region`.
#[must_use]
pub fn partition_for_region(region: &str) -> &'static str {
    PARTITION_PREFIXES
        .iter()
        .find(|(prefix, _)| region.starts_with(prefix))
        .map_or(DEFAULT_PARTITION, |(_, partition)| *partition)
}
