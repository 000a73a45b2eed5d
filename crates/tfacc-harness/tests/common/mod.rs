// crates/tfacc-harness/tests/common/mod.rs
// ============================================================================
// Module: Harness Test Fakes
// Description: In-memory cloud clients and audit sink for harness tests.
// Purpose: Drive sweepers and checks without network access.
// Dependencies: tfacc-harness, tfacc-core, time
// ============================================================================

//! ## Overview
//! Fakes hold their state behind mutexes so tests can seed resources, inject
//! errors, and inspect what the harness did afterwards.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test helpers may poison-panic on lock failures."
)]

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use tfacc_core::KeyValueTags;
use tfacc_harness::ApiError;
use tfacc_harness::BudgetRecord;
use tfacc_harness::BudgetsApi;
use tfacc_harness::BudgetsPage;
use tfacc_harness::ClusterInfo;
use tfacc_harness::ClusterState;
use tfacc_harness::CostTypes;
use tfacc_harness::KafkaApi;
use tfacc_harness::RegionClients;
use tfacc_harness::Spend;
use tfacc_harness::SweepAction;
use tfacc_harness::SweepAuditEvent;
use tfacc_harness::SweepAuditSink;
use tfacc_harness::TimePeriod;
use time::macros::datetime;

/// Account id used by every fake.
pub const ACCOUNT_ID: &str = "123456789012";

/// Region used by single-region tests.
pub const REGION: &str = "us-west-2";

// ============================================================================
// SECTION: Records
// ============================================================================

/// Builds a monthly cost budget named `name`.
#[must_use]
pub fn budget(name: &str) -> BudgetRecord {
    BudgetRecord {
        name: name.to_string(),
        budget_type: "COST".to_string(),
        limit: Spend {
            amount: "100.0".to_string(),
            unit: "USD".to_string(),
        },
        time_unit: "MONTHLY".to_string(),
        time_period: TimePeriod {
            start: datetime!(2017-01-01 00:00 UTC),
            end: datetime!(2087-06-15 00:00 UTC),
        },
        cost_types: CostTypes::default(),
        cost_filters: BTreeMap::new(),
    }
}

/// Builds the ARN of a cluster named `name`.
#[must_use]
pub fn cluster_arn(name: &str) -> String {
    format!("arn:aws:kafka:{REGION}:{ACCOUNT_ID}:cluster/{name}/0001")
}

/// Builds an active three-broker cluster named `name`.
#[must_use]
pub fn cluster(name: &str) -> ClusterInfo {
    ClusterInfo {
        arn: cluster_arn(name),
        name: name.to_string(),
        state: ClusterState::Active,
        kafka_version: "2.2.1".to_string(),
        number_of_broker_nodes: 3,
    }
}

// ============================================================================
// SECTION: Budgets
// ============================================================================

/// In-memory budgets API.
#[derive(Default)]
pub struct FakeBudgets {
    /// Budgets in name order; page tokens name the first budget of a page.
    pub budgets: Mutex<Vec<BudgetRecord>>,
    /// Budgets per listing page; zero means one page.
    pub page_size: usize,
    /// Error returned by every listing call.
    pub list_error: Mutex<Option<ApiError>>,
    /// Errors returned when deleting specific budgets.
    pub delete_errors: Mutex<BTreeMap<String, ApiError>>,
    /// Number of listing calls made.
    pub list_calls: Mutex<usize>,
    /// End paging with an empty token instead of no token.
    pub blank_final_token: bool,
}

impl FakeBudgets {
    /// Creates a fake holding `budgets`.
    #[must_use]
    pub fn with_budgets(budgets: Vec<BudgetRecord>, page_size: usize) -> Self {
        Self {
            budgets: Mutex::new(budgets),
            page_size,
            ..Self::default()
        }
    }

    /// Returns the names of remaining budgets.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.budgets.lock().unwrap().iter().map(|budget| budget.name.clone()).collect()
    }
}

impl BudgetsApi for FakeBudgets {
    fn describe_budgets(
        &self,
        _account_id: &str,
        next_token: Option<&str>,
    ) -> Result<BudgetsPage, ApiError> {
        *self.list_calls.lock().unwrap() += 1;
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }
        let budgets = self.budgets.lock().unwrap().clone();
        let start = next_token.map_or(0, |token| {
            budgets.iter().position(|budget| budget.name.as_str() >= token).unwrap_or(budgets.len())
        });
        let size = if self.page_size == 0 { budgets.len() } else { self.page_size };
        let end = (start + size).min(budgets.len());
        let next_token = match budgets.get(end) {
            Some(next) => Some(next.name.clone()),
            None if self.blank_final_token => Some(String::new()),
            None => None,
        };
        Ok(BudgetsPage {
            budgets: budgets[start..end].to_vec(),
            next_token,
        })
    }

    fn describe_budget(&self, _account_id: &str, name: &str) -> Result<BudgetRecord, ApiError> {
        self.budgets
            .lock()
            .unwrap()
            .iter()
            .find(|budget| budget.name == name)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("budget {name} not found")))
    }

    fn delete_budget(&self, _account_id: &str, name: &str) -> Result<(), ApiError> {
        if let Some(err) = self.delete_errors.lock().unwrap().get(name) {
            return Err(err.clone());
        }
        let mut budgets = self.budgets.lock().unwrap();
        let before = budgets.len();
        budgets.retain(|budget| budget.name != name);
        if budgets.len() == before {
            return Err(ApiError::not_found(format!("budget {name} not found")));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Clusters
// ============================================================================

/// In-memory streaming cluster API.
///
/// Deleted clusters stay visible in `DELETING` for `deletion_polls` describe
/// calls before disappearing.
#[derive(Default)]
pub struct FakeKafka {
    /// Clusters keyed by ARN.
    pub clusters: Mutex<BTreeMap<String, ClusterInfo>>,
    /// Tags keyed by ARN.
    pub tags: Mutex<BTreeMap<String, KeyValueTags>>,
    /// Error returned by every listing call.
    pub list_error: Mutex<Option<ApiError>>,
    /// Errors returned when deleting specific clusters.
    pub delete_errors: Mutex<BTreeMap<String, ApiError>>,
    /// Describe calls a deleting cluster survives.
    pub deletion_polls: u32,
    /// Remaining describe calls per deleting cluster.
    pub pending: Mutex<BTreeMap<String, u32>>,
    /// States reported by the next describe calls, ahead of the stored state.
    pub scripted_states: Mutex<BTreeMap<String, VecDeque<ClusterState>>>,
}

impl FakeKafka {
    /// Creates a fake holding `clusters`.
    #[must_use]
    pub fn with_clusters(clusters: Vec<ClusterInfo>, deletion_polls: u32) -> Self {
        Self {
            clusters: Mutex::new(
                clusters.into_iter().map(|cluster| (cluster.arn.clone(), cluster)).collect(),
            ),
            deletion_polls,
            ..Self::default()
        }
    }

    /// Returns the ARNs of remaining clusters.
    #[must_use]
    pub fn arns(&self) -> Vec<String> {
        self.clusters.lock().unwrap().keys().cloned().collect()
    }
}

impl KafkaApi for FakeKafka {
    fn list_clusters(&self) -> Result<Vec<ClusterInfo>, ApiError> {
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.clusters.lock().unwrap().values().cloned().collect())
    }

    fn describe_cluster(&self, arn: &str) -> Result<ClusterInfo, ApiError> {
        let mut clusters = self.clusters.lock().unwrap();
        let scripted =
            self.scripted_states.lock().unwrap().get_mut(arn).and_then(VecDeque::pop_front);
        if let (Some(state), Some(cluster)) = (scripted, clusters.get(arn)) {
            return Ok(ClusterInfo {
                state,
                ..cluster.clone()
            });
        }
        let mut pending = self.pending.lock().unwrap();
        if let Some(remaining) = pending.get_mut(arn) {
            if *remaining == 0 {
                pending.remove(arn);
                clusters.remove(arn);
            } else {
                *remaining -= 1;
            }
        }
        clusters
            .get(arn)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("cluster {arn} not found")))
    }

    fn delete_cluster(&self, arn: &str) -> Result<(), ApiError> {
        if let Some(err) = self.delete_errors.lock().unwrap().get(arn) {
            return Err(err.clone());
        }
        let mut clusters = self.clusters.lock().unwrap();
        let Some(cluster) = clusters.get_mut(arn) else {
            return Err(ApiError::not_found(format!("cluster {arn} not found")));
        };
        cluster.state = ClusterState::Deleting;
        self.pending.lock().unwrap().insert(arn.to_string(), self.deletion_polls);
        Ok(())
    }

    fn list_tags_for_resource(&self, arn: &str) -> Result<KeyValueTags, ApiError> {
        Ok(self.tags.lock().unwrap().get(arn).cloned().unwrap_or_default())
    }
}

// ============================================================================
// SECTION: Region Clients
// ============================================================================

/// Client factory handing out shared fakes for every region.
pub struct FakeClients {
    /// Budgets fake.
    pub budgets: Arc<FakeBudgets>,
    /// Cluster fake.
    pub kafka: Arc<FakeKafka>,
    /// Account id reported for every region.
    pub account_id: String,
}

impl FakeClients {
    /// Creates a factory over the given fakes.
    #[must_use]
    pub fn new(budgets: FakeBudgets, kafka: FakeKafka) -> Self {
        Self {
            budgets: Arc::new(budgets),
            kafka: Arc::new(kafka),
            account_id: ACCOUNT_ID.to_string(),
        }
    }

    /// Replaces the reported account id.
    #[must_use]
    pub fn with_account_id(mut self, account_id: &str) -> Self {
        self.account_id = account_id.to_string();
        self
    }
}

impl RegionClients for FakeClients {
    fn account_id(&self, _region: &str) -> Result<String, ApiError> {
        Ok(self.account_id.clone())
    }

    fn budgets(&self, _region: &str) -> Result<Arc<dyn BudgetsApi>, ApiError> {
        let api: Arc<dyn BudgetsApi> = self.budgets.clone();
        Ok(api)
    }

    fn kafka(&self, _region: &str) -> Result<Arc<dyn KafkaApi>, ApiError> {
        let api: Arc<dyn KafkaApi> = self.kafka.clone();
        Ok(api)
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink capturing events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events.
    pub events: Mutex<Vec<SweepAuditEvent>>,
}

impl MemoryAuditSink {
    /// Returns recorded actions in order.
    #[must_use]
    pub fn actions(&self) -> Vec<SweepAction> {
        self.events.lock().unwrap().iter().map(|event| event.action).collect()
    }
}

impl SweepAuditSink for MemoryAuditSink {
    fn record(&self, event: &SweepAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
