// crates/tfacc-harness/src/checks.rs
// ============================================================================
// Module: State Checks
// Description: Assertions over captured resource state and live API records.
// Purpose: Verify provisioned budgets and clusters against expectations.
// Dependencies: tfacc-core, thiserror, crate::api
// ============================================================================

//! ## Overview
//! After each apply step the test framework captures a [`StateSnapshot`]:
//! resource addresses mapped to their persisted id and flat attributes. The
//! check functions here assert on that snapshot, decoding resource handles
//! and querying the cloud API where the live object must be compared.
//!
//! Invariants:
//! - Budget resource ids are handles decoded with [`decode_handle`].
//! - Cluster resource ids are cluster ARNs.
//! - Tag checks ignore provider-reserved `aws:` keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use tfacc_core::Arn;
use tfacc_core::BrokerListener;
use tfacc_core::EndpointError;
use tfacc_core::HandleError;
use tfacc_core::KeyValueTags;
use tfacc_core::TimePeriodError;
use tfacc_core::decode_handle;
use tfacc_core::format_time_period;
use tfacc_core::is_sorted_csv;
use tfacc_core::validate_broker_list;
use thiserror::Error;

use crate::api::ApiError;
use crate::api::BudgetRecord;
use crate::api::BudgetsApi;
use crate::api::ClusterInfo;
use crate::api::KafkaApi;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Resource type of budgets.
pub const BUDGET_RESOURCE_TYPE: &str = "aws_budgets_budget";

/// Resource type of streaming clusters.
pub const MSK_CLUSTER_RESOURCE_TYPE: &str = "aws_msk_cluster";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Check failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// Address is absent from the snapshot.
    #[error("not found: {0}")]
    ResourceNotFound(String),
    /// Resource has no persisted id.
    #[error("no id is set for {0}")]
    EmptyId(String),
    /// Attribute is absent from the resource.
    #[error("{resource}: attribute {attribute} not found")]
    MissingAttribute {
        /// Resource address.
        resource: String,
        /// Attribute key.
        attribute: String,
    },
    /// Attribute differs from the expected value.
    #[error("{resource}: attribute {attribute} expected \"{expected}\", got \"{actual}\"")]
    AttributeMismatch {
        /// Resource address.
        resource: String,
        /// Attribute key.
        attribute: String,
        /// Expected value.
        expected: String,
        /// Actual value.
        actual: String,
    },
    /// Comma-joined attribute is not in canonical order.
    #[error("{resource}: attribute {attribute} is not a sorted list: {value}")]
    NotSorted {
        /// Resource address.
        resource: String,
        /// Attribute key.
        attribute: String,
        /// Attribute value.
        value: String,
    },
    /// Broker attribute fails listing validation.
    #[error("{resource}: attribute {attribute} is not a valid broker list: {source}")]
    InvalidBrokerList {
        /// Resource address.
        resource: String,
        /// Attribute key.
        attribute: String,
        /// Validation failure.
        source: EndpointError,
    },
    /// Resource id could not be decoded.
    #[error("failed decoding id: {0}")]
    Handle(#[from] HandleError),
    /// Cloud API call failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    /// Budget period could not be formatted.
    #[error("time period error: {0}")]
    TimePeriod(#[from] TimePeriodError),
    /// Live budget field differs from the expected configuration.
    #[error("budget {field} not set properly: expected {expected}, got {actual}")]
    BudgetMismatch {
        /// Field name.
        field: String,
        /// Expected value.
        expected: String,
        /// Actual value.
        actual: String,
    },
    /// Resource still exists after destroy.
    #[error("{0} was not deleted properly")]
    NotDestroyed(String),
    /// Cluster was replaced when it should have been updated in place.
    #[error("cluster ({0}) recreated")]
    Recreated(String),
    /// Cluster was updated in place when it should have been replaced.
    #[error("cluster ({0}) was not recreated")]
    NotRecreated(String),
    /// Expected tag is absent.
    #[error("missing tag: {key} (found tags {})", found.join(","))]
    MissingTag {
        /// Tag key.
        key: String,
        /// Tag keys present.
        found: Vec<String>,
    },
    /// Tag expected to be absent is present.
    #[error("extra tag: {0}")]
    ExtraTag(String),
    /// Tag has the wrong value.
    #[error("{key}: bad value: {actual}")]
    TagValue {
        /// Tag key.
        key: String,
        /// Actual value.
        actual: String,
    },
    /// Several checks failed.
    #[error("{} checks failed: {}", .0.len(), join_errors(.0))]
    Aggregate(Vec<CheckError>),
}

/// Joins error messages for [`CheckError::Aggregate`].
fn join_errors(errors: &[CheckError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

// ============================================================================
// SECTION: State Snapshot
// ============================================================================

/// Persisted state of one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceState {
    /// Resource type, such as `aws_msk_cluster`.
    pub resource_type: String,
    /// Persisted resource id.
    pub id: String,
    /// Flattened attributes.
    pub attributes: BTreeMap<String, String>,
}

impl ResourceState {
    /// Creates a resource state without attributes.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Resource states keyed by address (`type.name`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateSnapshot {
    /// Resources keyed by address.
    resources: BTreeMap<String, ResourceState>,
}

impl StateSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, address: impl Into<String>, state: ResourceState) {
        self.resources.insert(address.into(), state);
    }

    /// Returns the resource at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::ResourceNotFound`] when absent.
    pub fn resource(&self, address: &str) -> Result<&ResourceState, CheckError> {
        self.resources.get(address).ok_or_else(|| CheckError::ResourceNotFound(address.to_string()))
    }

    /// Returns an attribute of the resource at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] when the resource or attribute is absent.
    pub fn attribute(&self, address: &str, attribute: &str) -> Result<&str, CheckError> {
        self.resource(address)?.attributes.get(attribute).map(String::as_str).ok_or_else(|| {
            CheckError::MissingAttribute {
                resource: address.to_string(),
                attribute: attribute.to_string(),
            }
        })
    }

    /// Iterates over resources of one type.
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a ResourceState> + 'a {
        self.resources.values().filter(move |state| state.resource_type == resource_type)
    }
}

// ============================================================================
// SECTION: Composition
// ============================================================================

/// Combines check results, reporting every failure.
///
/// # Errors
///
/// Returns the single failure, or [`CheckError::Aggregate`] for several.
pub fn aggregate_checks(
    results: impl IntoIterator<Item = Result<(), CheckError>>,
) -> Result<(), CheckError> {
    let mut errors: Vec<CheckError> = results.into_iter().filter_map(Result::err).collect();
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(CheckError::Aggregate(errors)),
    }
}

// ============================================================================
// SECTION: Attribute Checks
// ============================================================================

/// Checks that an attribute equals `expected`.
///
/// # Errors
///
/// Returns [`CheckError`] when the attribute is absent or differs.
pub fn check_attr_equals(
    state: &StateSnapshot,
    address: &str,
    attribute: &str,
    expected: &str,
) -> Result<(), CheckError> {
    let actual = state.attribute(address, attribute)?;
    if actual != expected {
        return Err(CheckError::AttributeMismatch {
            resource: address.to_string(),
            attribute: attribute.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Checks that a comma-joined attribute is already in canonical order.
///
/// # Errors
///
/// Returns [`CheckError::NotSorted`] when the list is out of order.
pub fn check_attr_is_sorted_csv(
    state: &StateSnapshot,
    address: &str,
    attribute: &str,
) -> Result<(), CheckError> {
    let value = state.attribute(address, attribute)?;
    if !is_sorted_csv(value) {
        return Err(CheckError::NotSorted {
            resource: address.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Checks that an attribute is a valid broker listing for `listener`.
///
/// # Errors
///
/// Returns [`CheckError::InvalidBrokerList`] when validation fails.
pub fn check_attr_broker_list(
    state: &StateSnapshot,
    address: &str,
    attribute: &str,
    listener: BrokerListener,
) -> Result<(), CheckError> {
    let value = state.attribute(address, attribute)?;
    validate_broker_list(value, listener.port()).map_err(|source| CheckError::InvalidBrokerList {
        resource: address.to_string(),
        attribute: attribute.to_string(),
        source,
    })
}

/// Checks that an attribute equals the global ARN for `resource`.
///
/// # Errors
///
/// Returns [`CheckError::AttributeMismatch`] when the ARN differs.
pub fn check_attr_global_arn(
    state: &StateSnapshot,
    address: &str,
    attribute: &str,
    partition: &str,
    service: &str,
    account_id: &str,
    resource: &str,
) -> Result<(), CheckError> {
    let expected = Arn::global(partition, service, account_id, resource).to_string();
    check_attr_equals(state, address, attribute, &expected)
}

// ============================================================================
// SECTION: Budget Checks
// ============================================================================

/// Checks that the budget at `address` exists and matches `expected`.
///
/// Compares the limit amount, every cost-type flag, the period at minute
/// precision, and the cost filters. Returns the live record on success.
///
/// # Errors
///
/// Returns [`CheckError`] when the id cannot be decoded, the API call fails,
/// or any compared field differs.
pub fn check_budget_exists(
    state: &StateSnapshot,
    address: &str,
    api: &dyn BudgetsApi,
    expected: &BudgetRecord,
) -> Result<BudgetRecord, CheckError> {
    let resource = state.resource(address)?;
    let id = decode_handle(&resource.id)?;
    let budget = api.describe_budget(id.account_id(), id.resource_name())?;

    if budget.limit.amount != expected.limit.amount {
        return Err(mismatch("limit amount", &expected.limit.amount, &budget.limit.amount));
    }
    for ((field, want), (_, got)) in
        expected.cost_types.flags().into_iter().zip(budget.cost_types.flags())
    {
        if want != got {
            return Err(mismatch(field, &want.to_string(), &got.to_string()));
        }
    }
    let periods = [
        ("TimePeriodStart", expected.time_period.start, budget.time_period.start),
        ("TimePeriodEnd", expected.time_period.end, budget.time_period.end),
    ];
    for (field, want, got) in periods {
        let (want, got) = (format_time_period(want)?, format_time_period(got)?);
        if want != got {
            return Err(mismatch(field, &want, &got));
        }
    }
    if budget.cost_filters != expected.cost_filters {
        return Err(mismatch(
            "cost filters",
            &render_filters(&expected.cost_filters),
            &render_filters(&budget.cost_filters),
        ));
    }
    Ok(budget)
}

/// Checks that every budget in the snapshot is gone.
///
/// # Errors
///
/// Returns [`CheckError::NotDestroyed`] when a budget still describes,
/// [`CheckError::Api`] on other describe failures, or [`CheckError::Handle`]
/// when an id cannot be decoded.
pub fn check_budgets_destroyed(state: &StateSnapshot, api: &dyn BudgetsApi) -> Result<(), CheckError> {
    for resource in state.resources_of_type(BUDGET_RESOURCE_TYPE) {
        let id = decode_handle(&resource.id)?;
        match api.describe_budget(id.account_id(), id.resource_name()) {
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(CheckError::Api(err)),
            Ok(_) => return Err(CheckError::NotDestroyed(resource.id.clone())),
        }
    }
    Ok(())
}

/// Renders cost filters as `key=a|b` pairs.
fn render_filters(filters: &BTreeMap<String, Vec<String>>) -> String {
    filters
        .iter()
        .map(|(key, values)| format!("{key}={}", values.join("|")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Builds a [`CheckError::BudgetMismatch`].
fn mismatch(field: &str, expected: &str, actual: &str) -> CheckError {
    CheckError::BudgetMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

// ============================================================================
// SECTION: Cluster Checks
// ============================================================================

/// Describes the cluster at `address`.
///
/// # Errors
///
/// Returns [`CheckError`] when the resource is absent, has no id, or the
/// describe call fails.
pub fn check_cluster_exists(
    state: &StateSnapshot,
    address: &str,
    api: &dyn KafkaApi,
) -> Result<ClusterInfo, CheckError> {
    let resource = state.resource(address)?;
    if resource.id.is_empty() {
        return Err(CheckError::EmptyId(address.to_string()));
    }
    Ok(api.describe_cluster(&resource.id)?)
}

/// Checks that every cluster in the snapshot is gone.
///
/// # Errors
///
/// Returns [`CheckError::NotDestroyed`] when a cluster still describes, or
/// [`CheckError::Api`] on other describe failures.
pub fn check_clusters_destroyed(state: &StateSnapshot, api: &dyn KafkaApi) -> Result<(), CheckError> {
    for resource in state.resources_of_type(MSK_CLUSTER_RESOURCE_TYPE) {
        match api.describe_cluster(&resource.id) {
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(CheckError::Api(err)),
            Ok(_) => return Err(CheckError::NotDestroyed(resource.id.clone())),
        }
    }
    Ok(())
}

/// Checks that an update kept the same cluster.
///
/// # Errors
///
/// Returns [`CheckError::Recreated`] when the ARNs differ.
pub fn check_cluster_not_recreated(before: &ClusterInfo, after: &ClusterInfo) -> Result<(), CheckError> {
    if before.arn != after.arn {
        return Err(CheckError::Recreated(before.arn.clone()));
    }
    Ok(())
}

/// Checks that an update replaced the cluster.
///
/// # Errors
///
/// Returns [`CheckError::NotRecreated`] when the ARNs match.
pub fn check_cluster_recreated(before: &ClusterInfo, after: &ClusterInfo) -> Result<(), CheckError> {
    if before.arn == after.arn {
        return Err(CheckError::NotRecreated(before.arn.clone()));
    }
    Ok(())
}

/// Loads the tags attached to a cluster.
///
/// # Errors
///
/// Returns [`CheckError::Api`] when the listing fails.
pub fn load_cluster_tags(api: &dyn KafkaApi, cluster: &ClusterInfo) -> Result<KeyValueTags, CheckError> {
    Ok(api.list_tags_for_resource(&cluster.arn)?)
}

/// Checks one tag after dropping provider-reserved keys.
///
/// `Some(value)` requires the tag with that value; `None` requires it absent.
///
/// # Errors
///
/// Returns [`CheckError::MissingTag`], [`CheckError::ExtraTag`], or
/// [`CheckError::TagValue`].
pub fn check_cluster_tag(tags: &KeyValueTags, key: &str, expected: Option<&str>) -> Result<(), CheckError> {
    let tags = tags.ignore_aws();
    match (expected, tags.get(key)) {
        (Some(_), None) => Err(CheckError::MissingTag {
            key: key.to_string(),
            found: tags.iter().map(|(key, _)| key.to_string()).collect(),
        }),
        (None, Some(_)) => Err(CheckError::ExtraTag(key.to_string())),
        (Some(want), Some(got)) if want != got => Err(CheckError::TagValue {
            key: key.to_string(),
            actual: got.to_string(),
        }),
        _ => Ok(()),
    }
}
