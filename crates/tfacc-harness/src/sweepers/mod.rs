// crates/tfacc-harness/src/sweepers/mod.rs
// ============================================================================
// Module: Built-in Sweepers
// Description: Sweepers for budgets and streaming clusters.
// Purpose: Delete resources leaked by interrupted acceptance runs.
// Dependencies: crate::{api, sweep}
// ============================================================================

//! ## Overview
//! Built-in sweepers, named after the resource types they delete.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod budgets;
pub mod msk;
pub mod waiter;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use budgets::BUDGETS_SWEEPER;
pub use budgets::BudgetsSweeper;
pub use msk::MSK_CLUSTER_SWEEPER;
pub use msk::MskClusterSweeper;
pub use waiter::wait_for_cluster_deletion;
