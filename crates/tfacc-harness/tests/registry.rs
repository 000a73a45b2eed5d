// crates/tfacc-harness/tests/registry.rs
// ============================================================================
// Module: Sweeper Registry Tests
// Description: Planning order, filters, and multi-region runs.
// ============================================================================
//! ## Overview
//! Exercises dependency ordering and failure isolation in the registry with
//! small recording sweepers.

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

use std::sync::Arc;
use std::sync::Mutex;

use common::FakeBudgets;
use common::FakeClients;
use common::FakeKafka;
use common::MemoryAuditSink;
use common::budget;
use common::cluster;
use tfacc_harness::ApiError;
use tfacc_harness::NoopSweepAuditSink;
use tfacc_harness::SweepContext;
use tfacc_harness::SweepError;
use tfacc_harness::SweepReport;
use tfacc_harness::SweepSettings;
use tfacc_harness::Sweeper;
use tfacc_harness::SweeperRegistry;

/// Sweeper that records each region it runs in.
struct Recording {
    name: &'static str,
    dependencies: Vec<&'static str>,
    log: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl Recording {
    fn new(name: &'static str, dependencies: &[&'static str], log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            dependencies: dependencies.to_vec(),
            log: Arc::clone(log),
            fail: false,
        }
    }
}

impl Sweeper for Recording {
    fn name(&self) -> &str {
        self.name
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.iter().map(ToString::to_string).collect()
    }

    fn sweep(&self, ctx: &SweepContext<'_>) -> Result<SweepReport, SweepError> {
        self.log.lock().unwrap().push(format!("{}@{}", self.name, ctx.region));
        if self.fail {
            return Err(SweepError::Client(ApiError::new("Boom", self.name)));
        }
        Ok(SweepReport::default())
    }
}

fn registry(log: &Arc<Mutex<Vec<String>>>) -> SweeperRegistry {
    let mut registry = SweeperRegistry::new();
    registry.register(Recording::new("aws_msk_configuration", &["aws_msk_cluster"], log)).unwrap();
    registry.register(Recording::new("aws_msk_cluster", &[], log)).unwrap();
    registry.register(Recording::new("aws_budgets_budget", &[], log)).unwrap();
    registry
}

#[test]
fn plan_places_dependencies_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = registry(&log);

    let order = registry.plan(None).unwrap();

    assert_eq!(order, vec!["aws_budgets_budget", "aws_msk_cluster", "aws_msk_configuration"]);
}

#[test]
fn plan_filter_is_case_insensitive_and_pulls_dependencies() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = registry(&log);

    let order = registry.plan(Some(&["MSK_CONFIG".to_string()])).unwrap();

    assert_eq!(order, vec!["aws_msk_cluster", "aws_msk_configuration"]);
}

#[test]
fn plan_rejects_filter_without_matches() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let registry = registry(&log);

    let err = registry.plan(Some(&["dynamodb".to_string()])).unwrap_err();

    assert_eq!(err, SweepError::NoMatchingSweepers("dynamodb".to_string()));
}

#[test]
fn plan_rejects_unknown_dependency() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = SweeperRegistry::new();
    registry.register(Recording::new("a", &["missing"], &log)).unwrap();

    let err = registry.plan(None).unwrap_err();

    assert_eq!(
        err,
        SweepError::UnknownDependency {
            sweeper: "a".to_string(),
            dependency: "missing".to_string(),
        }
    );
}

#[test]
fn plan_rejects_dependency_cycles() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = SweeperRegistry::new();
    registry.register(Recording::new("a", &["b"], &log)).unwrap();
    registry.register(Recording::new("b", &["a"], &log)).unwrap();

    assert!(matches!(registry.plan(None), Err(SweepError::DependencyCycle(_))));
}

#[test]
fn register_rejects_duplicate_names() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = registry(&log);

    let err = registry.register(Recording::new("aws_msk_cluster", &[], &log)).unwrap_err();

    assert_eq!(err, SweepError::DuplicateSweeper("aws_msk_cluster".to_string()));
}

#[test]
fn run_sweeps_each_region_and_continues_after_failures() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = SweeperRegistry::new();
    let mut failing = Recording::new("a", &[], &log);
    failing.fail = true;
    registry.register(failing).unwrap();
    registry.register(Recording::new("b", &["a"], &log)).unwrap();
    let clients = FakeClients::new(FakeBudgets::default(), FakeKafka::default());
    let regions = vec!["us-west-2".to_string(), "us-east-1".to_string()];

    let report = registry
        .run(&regions, None, &clients, &SweepSettings::default(), &NoopSweepAuditSink)
        .unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["a@us-west-2", "b@us-west-2", "a@us-east-1", "b@us-east-1"]
    );
    assert!(report.has_failures());
    assert_eq!(report.failures().count(), 2);
    assert_eq!(report.outcomes.len(), 4);
}

#[test]
fn builtin_sweepers_clean_budgets_and_clusters() {
    let registry = SweeperRegistry::with_builtin_sweepers().unwrap();
    let clients = FakeClients::new(
        FakeBudgets::with_budgets(vec![budget("tf-acc-test-1")], 0),
        FakeKafka::with_clusters(vec![cluster("tf-acc-test-2")], 0),
    );
    let audit = MemoryAuditSink::default();
    let settings = SweepSettings {
        poll_interval: std::time::Duration::ZERO,
        ..SweepSettings::default()
    };

    let report = registry.run(&["us-west-2".to_string()], None, &clients, &settings, &audit).unwrap();

    assert!(!report.has_failures());
    assert!(clients.budgets.names().is_empty());
    assert!(clients.kafka.arns().is_empty());
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["aws_budgets_budget", "aws_msk_cluster"]);
}
