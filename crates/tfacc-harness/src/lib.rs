// crates/tfacc-harness/src/lib.rs
// ============================================================================
// Module: tfacc Harness Library
// Description: Sweepers, state checks, and cloud API seams for acceptance runs.
// Purpose: Clean up leaked test resources and verify provisioned state.
// Dependencies: tfacc-core, serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! The harness holds the stateful half of the acceptance-test toolkit. Cloud
//! access goes through the traits in [`api`]; sweepers implementing
//! [`Sweeper`] are collected on an explicit [`SweeperRegistry`] and run per
//! region; [`checks`] asserts on captured resource state. Sweep activity is
//! reported as JSON lines through a [`SweepAuditSink`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod audit;
pub mod checks;
pub mod registry;
pub mod skip;
pub mod sweep;
pub mod sweepers;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ApiError;
pub use api::BudgetRecord;
pub use api::BudgetsApi;
pub use api::BudgetsPage;
pub use api::ClusterInfo;
pub use api::ClusterState;
pub use api::CostTypes;
pub use api::KafkaApi;
pub use api::NOT_FOUND_CODE;
pub use api::RegionClients;
pub use api::Spend;
pub use api::TimePeriod;
pub use audit::FileSweepAuditSink;
pub use audit::NoopSweepAuditSink;
pub use audit::StderrSweepAuditSink;
pub use audit::SweepAction;
pub use audit::SweepAuditEvent;
pub use audit::SweepAuditSink;
pub use checks::CheckError;
pub use checks::ResourceState;
pub use checks::StateSnapshot;
pub use registry::SweepOutcome;
pub use registry::SweepRunReport;
pub use registry::SweeperRegistry;
pub use skip::PreCheckOutcome;
pub use skip::SkipPolicy;
pub use skip::SkipRule;
pub use sweep::SweepContext;
pub use sweep::SweepError;
pub use sweep::SweepReport;
pub use sweep::SweepSettings;
pub use sweep::Sweeper;
