// crates/tfacc-harness/tests/checks.rs
// ============================================================================
// Module: State Check Tests
// Description: Budget and cluster checks against live fake records.
// ============================================================================
//! ## Overview
//! Exercises the checks that decode resource handles and query the API.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use common::ACCOUNT_ID;
use common::FakeBudgets;
use common::FakeKafka;
use common::budget;
use common::cluster;
use common::cluster_arn;
use tfacc_core::HandleError;
use tfacc_core::KeyValueTags;
use tfacc_core::encode_handle;
use tfacc_harness::CheckError;
use tfacc_harness::KafkaApi;
use tfacc_harness::ResourceState;
use tfacc_harness::StateSnapshot;
use tfacc_harness::checks::BUDGET_RESOURCE_TYPE;
use tfacc_harness::checks::MSK_CLUSTER_RESOURCE_TYPE;
use tfacc_harness::checks::check_budget_exists;
use tfacc_harness::checks::check_budgets_destroyed;
use tfacc_harness::checks::check_cluster_exists;
use tfacc_harness::checks::check_cluster_not_recreated;
use tfacc_harness::checks::check_cluster_recreated;
use tfacc_harness::checks::check_cluster_tag;
use tfacc_harness::checks::check_clusters_destroyed;
use tfacc_harness::checks::load_cluster_tags;
use time::macros::datetime;

fn budget_state(name: &str) -> StateSnapshot {
    let mut state = StateSnapshot::new();
    state.insert(
        "aws_budgets_budget.foo",
        ResourceState::new(BUDGET_RESOURCE_TYPE, encode_handle(ACCOUNT_ID, name).unwrap()),
    );
    state
}

fn cluster_state(name: &str) -> StateSnapshot {
    let mut state = StateSnapshot::new();
    state.insert("aws_msk_cluster.example", ResourceState::new(MSK_CLUSTER_RESOURCE_TYPE, cluster_arn(name)));
    state
}

// ============================================================================
// SECTION: Budgets
// ============================================================================

#[test]
fn budget_exists_matches_live_record() {
    let api = FakeBudgets::with_budgets(vec![budget("tf-acc-test-1")], 0);
    let state = budget_state("tf-acc-test-1");

    let live = check_budget_exists(&state, "aws_budgets_budget.foo", &api, &budget("tf-acc-test-1")).unwrap();

    assert_eq!(live.name, "tf-acc-test-1");
}

#[test]
fn budget_period_is_compared_at_minute_precision() {
    let mut live = budget("b");
    live.time_period.start = datetime!(2017-01-01 00:00:42 UTC);
    let api = FakeBudgets::with_budgets(vec![live], 0);

    check_budget_exists(&budget_state("b"), "aws_budgets_budget.foo", &api, &budget("b")).unwrap();
}

#[test]
fn budget_limit_mismatch_names_the_field() {
    let mut live = budget("b");
    live.limit.amount = "200.0".to_string();
    let api = FakeBudgets::with_budgets(vec![live], 0);

    let err = check_budget_exists(&budget_state("b"), "aws_budgets_budget.foo", &api, &budget("b")).unwrap_err();

    assert_eq!(
        err,
        CheckError::BudgetMismatch {
            field: "limit amount".to_string(),
            expected: "100.0".to_string(),
            actual: "200.0".to_string(),
        }
    );
}

#[test]
fn budget_cost_type_and_filter_mismatches_are_reported() {
    let mut live = budget("b");
    live.cost_types.use_blended = true;
    let api = FakeBudgets::with_budgets(vec![live], 0);
    let err = check_budget_exists(&budget_state("b"), "aws_budgets_budget.foo", &api, &budget("b")).unwrap_err();
    assert!(matches!(err, CheckError::BudgetMismatch { ref field, .. } if field == "UseBlended"));

    let mut live = budget("b");
    live.cost_filters.insert("AZ".to_string(), vec!["us-east-1".to_string()]);
    let api = FakeBudgets::with_budgets(vec![live], 0);
    let err = check_budget_exists(&budget_state("b"), "aws_budgets_budget.foo", &api, &budget("b")).unwrap_err();
    assert!(matches!(err, CheckError::BudgetMismatch { ref actual, .. } if actual == "AZ=us-east-1"));
}

#[test]
fn budget_check_rejects_malformed_handle() {
    let api = FakeBudgets::default();
    let mut state = StateSnapshot::new();
    state.insert("aws_budgets_budget.foo", ResourceState::new(BUDGET_RESOURCE_TYPE, "no-separator"));

    let err = check_budget_exists(&state, "aws_budgets_budget.foo", &api, &budget("b")).unwrap_err();

    assert_eq!(
        err,
        CheckError::Handle(HandleError::MalformedHandle {
            handle: "no-separator".to_string(),
        })
    );
}

#[test]
fn budgets_destroyed_passes_only_when_gone() {
    let state = budget_state("b");
    check_budgets_destroyed(&state, &FakeBudgets::default()).unwrap();

    let api = FakeBudgets::with_budgets(vec![budget("b")], 0);
    let err = check_budgets_destroyed(&state, &api).unwrap_err();
    assert_eq!(err, CheckError::NotDestroyed(format!("{ACCOUNT_ID}:b")));
}

// ============================================================================
// SECTION: Clusters
// ============================================================================

#[test]
fn cluster_exists_describes_the_persisted_arn() {
    let api = FakeKafka::with_clusters(vec![cluster("c")], 0);

    let info = check_cluster_exists(&cluster_state("c"), "aws_msk_cluster.example", &api).unwrap();

    assert_eq!(info.arn, cluster_arn("c"));
    assert_eq!(info.number_of_broker_nodes, 3);
}

#[test]
fn cluster_exists_rejects_empty_id() {
    let mut state = StateSnapshot::new();
    state.insert("aws_msk_cluster.example", ResourceState::new(MSK_CLUSTER_RESOURCE_TYPE, ""));

    let err = check_cluster_exists(&state, "aws_msk_cluster.example", &FakeKafka::default()).unwrap_err();

    assert_eq!(err, CheckError::EmptyId("aws_msk_cluster.example".to_string()));
}

#[test]
fn clusters_destroyed_detects_survivors() {
    let state = cluster_state("c");
    check_clusters_destroyed(&state, &FakeKafka::default()).unwrap();

    let api = FakeKafka::with_clusters(vec![cluster("c")], 0);
    assert_eq!(check_clusters_destroyed(&state, &api), Err(CheckError::NotDestroyed(cluster_arn("c"))));
}

#[test]
fn recreation_checks_compare_arns() {
    let before = cluster("c");
    let mut replaced = cluster("c");
    replaced.arn = format!("{}-new", before.arn);

    check_cluster_not_recreated(&before, &before).unwrap();
    check_cluster_recreated(&before, &replaced).unwrap();
    assert_eq!(check_cluster_not_recreated(&before, &replaced), Err(CheckError::Recreated(before.arn.clone())));
    assert_eq!(check_cluster_recreated(&before, &before), Err(CheckError::NotRecreated(before.arn.clone())));
}

#[test]
fn cluster_tags_are_loaded_and_checked() {
    let api = FakeKafka::with_clusters(vec![cluster("c")], 0);
    let tags: KeyValueTags = [("foo", "bar"), ("aws:reserved", "x")].into_iter().collect();
    api.tags.lock().unwrap().insert(cluster_arn("c"), tags);
    let info = api.describe_cluster(&cluster_arn("c")).unwrap();

    let tags = load_cluster_tags(&api, &info).unwrap();

    assert_eq!(tags.len(), 2);
    check_cluster_tag(&tags, "foo", Some("bar")).unwrap();
    check_cluster_tag(&tags, "aws:reserved", None).unwrap();
}
