// crates/tfacc-core/src/naming.rs
// ============================================================================
// Module: Test Resource Naming
// Description: Random, prefixed names for provisioned test resources.
// Purpose: Keep concurrently provisioned resources from colliding.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Provisioned resources are named `<prefix>-<random integer>`, the prefix
//! marking them as test resources for operators and sweepers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::Rng;

// ============================================================================
// SECTION: Naming
// ============================================================================

/// Default prefix for provisioned test resources.
pub const RESOURCE_PREFIX: &str = "tf-acc-test";

/// Returns `"{prefix}-{n}"` for a random non-negative `n`.
#[must_use]
pub fn random_with_prefix(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..=i32::MAX.unsigned_abs());
    format!("{prefix}-{suffix}")
}
