// crates/tfacc-harness/src/api.rs
// ============================================================================
// Module: Cloud API Seams
// Description: Client traits and records for the budgets and streaming APIs.
// Purpose: Decouple sweepers and checks from any concrete cloud SDK.
// Dependencies: serde, thiserror, tfacc-core, time
// ============================================================================

//! ## Overview
//! Sweepers and state checks talk to the cloud through the traits in this
//! module. Production deployments adapt an SDK client to them; tests supply
//! in-memory fakes. Records carry only the fields the harness inspects.
//!
//! Invariants:
//! - Missing resources surface as [`ApiError`] with code [`NOT_FOUND_CODE`].
//! - Implementations are `Send + Sync` and may be shared across threads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tfacc_core::KeyValueTags;
use thiserror::Error;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Error code returned when a resource does not exist.
pub const NOT_FOUND_CODE: &str = "NotFoundException";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Structured error returned by a cloud API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    /// Service error code.
    pub code: String,
    /// Service error message.
    pub message: String,
}

impl ApiError {
    /// Creates an API error from a code and message.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(NOT_FOUND_CODE, message)
    }

    /// Returns true when the error reports a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == NOT_FOUND_CODE
    }

    /// Returns true when the code matches and the message contains `fragment`.
    ///
    /// An empty fragment matches any message.
    #[must_use]
    pub fn matches(&self, code: &str, fragment: &str) -> bool {
        self.code == code && self.message.contains(fragment)
    }
}

// ============================================================================
// SECTION: Budget Records
// ============================================================================

/// Monetary or usage amount with its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spend {
    /// Decimal amount as returned by the API.
    pub amount: String,
    /// Unit such as `USD`.
    pub unit: String,
}

/// Budget start and end timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePeriod {
    /// Period start.
    pub start: OffsetDateTime,
    /// Period end.
    pub end: OffsetDateTime,
}

/// Cost categories included in a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools, reason = "Mirrors the API's independent cost-type flags.")]
pub struct CostTypes {
    /// Include credits.
    pub include_credit: bool,
    /// Include other subscription costs.
    pub include_other_subscription: bool,
    /// Include recurring fees.
    pub include_recurring: bool,
    /// Include refunds.
    pub include_refund: bool,
    /// Include subscription costs.
    pub include_subscription: bool,
    /// Include support charges.
    pub include_support: bool,
    /// Include taxes.
    pub include_tax: bool,
    /// Include upfront fees.
    pub include_upfront: bool,
    /// Use blended rates.
    pub use_blended: bool,
}

impl CostTypes {
    /// Returns every flag with its API field name, in API order.
    #[must_use]
    pub const fn flags(&self) -> [(&'static str, bool); 9] {
        [
            ("IncludeCredit", self.include_credit),
            ("IncludeOtherSubscription", self.include_other_subscription),
            ("IncludeRecurring", self.include_recurring),
            ("IncludeRefund", self.include_refund),
            ("IncludeSubscription", self.include_subscription),
            ("IncludeSupport", self.include_support),
            ("IncludeTax", self.include_tax),
            ("IncludeUpfront", self.include_upfront),
            ("UseBlended", self.use_blended),
        ]
    }
}

impl Default for CostTypes {
    fn default() -> Self {
        Self {
            include_credit: true,
            include_other_subscription: true,
            include_recurring: true,
            include_refund: true,
            include_subscription: true,
            include_support: true,
            include_tax: true,
            include_upfront: true,
            use_blended: false,
        }
    }
}

/// Budget as described by the budgets API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRecord {
    /// Budget name, unique within the account.
    pub name: String,
    /// Budget type such as `COST`.
    pub budget_type: String,
    /// Budget limit.
    pub limit: Spend,
    /// Time unit such as `MONTHLY`.
    pub time_unit: String,
    /// Budget period.
    pub time_period: TimePeriod,
    /// Included cost categories.
    pub cost_types: CostTypes,
    /// Cost filters keyed by dimension.
    pub cost_filters: BTreeMap<String, Vec<String>>,
}

/// One page of a budget listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BudgetsPage {
    /// Budgets on this page.
    pub budgets: Vec<BudgetRecord>,
    /// Token for the next page; `None` or empty on the last page.
    pub next_token: Option<String>,
}

// ============================================================================
// SECTION: Cluster Records
// ============================================================================

/// Lifecycle state of a streaming cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterState {
    /// Cluster is being created.
    Creating,
    /// Cluster is serving traffic.
    Active,
    /// Cluster configuration is being updated.
    Updating,
    /// Cluster is being deleted.
    Deleting,
    /// Cluster creation or update failed.
    Failed,
}

impl ClusterState {
    /// Returns the API label for the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Creating => "CREATING",
            Self::Active => "ACTIVE",
            Self::Updating => "UPDATING",
            Self::Deleting => "DELETING",
            Self::Failed => "FAILED",
        }
    }
}

/// Streaming cluster as described by the cluster API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// Cluster ARN; the persisted resource handle.
    pub arn: String,
    /// Cluster name.
    pub name: String,
    /// Lifecycle state.
    pub state: ClusterState,
    /// Broker software version.
    pub kafka_version: String,
    /// Number of broker nodes.
    pub number_of_broker_nodes: u32,
}

// ============================================================================
// SECTION: Client Traits
// ============================================================================

/// Budgets API client.
pub trait BudgetsApi: Send + Sync {
    /// Lists one page of budgets for the account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the call fails.
    fn describe_budgets(
        &self,
        account_id: &str,
        next_token: Option<&str>,
    ) -> Result<BudgetsPage, ApiError>;

    /// Describes a single budget.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the call fails or the budget does not exist.
    fn describe_budget(&self, account_id: &str, name: &str) -> Result<BudgetRecord, ApiError>;

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the call fails or the budget does not exist.
    fn delete_budget(&self, account_id: &str, name: &str) -> Result<(), ApiError>;
}

/// Streaming cluster API client.
pub trait KafkaApi: Send + Sync {
    /// Lists clusters in the region.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the call fails.
    fn list_clusters(&self) -> Result<Vec<ClusterInfo>, ApiError>;

    /// Describes a cluster by ARN.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the call fails or the cluster does not exist.
    fn describe_cluster(&self, arn: &str) -> Result<ClusterInfo, ApiError>;

    /// Starts deleting a cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the call fails.
    fn delete_cluster(&self, arn: &str) -> Result<(), ApiError>;

    /// Lists tags attached to a resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the call fails.
    fn list_tags_for_resource(&self, arn: &str) -> Result<KeyValueTags, ApiError>;
}

/// Per-region client factory handed to sweepers.
pub trait RegionClients: Send + Sync {
    /// Returns the caller's account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the identity cannot be resolved.
    fn account_id(&self, region: &str) -> Result<String, ApiError>;

    /// Returns a budgets client for the region.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the client cannot be built.
    fn budgets(&self, region: &str) -> Result<Arc<dyn BudgetsApi>, ApiError>;

    /// Returns a streaming cluster client for the region.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the client cannot be built.
    fn kafka(&self, region: &str) -> Result<Arc<dyn KafkaApi>, ApiError>;
}
