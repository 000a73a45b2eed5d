// crates/tfacc-config/src/lib.rs
// ============================================================================
// Module: tfacc Config Library
// Description: Configuration model and validation for sweep runs.
// Purpose: Single source of truth for tfacc.toml semantics.
// Dependencies: tfacc-harness, serde, toml
// ============================================================================

//! ## Overview
//! `tfacc-config` loads `tfacc.toml`, validates it fail-closed, and converts
//! it into harness [`tfacc_harness::SweepSettings`] and audit sinks.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
