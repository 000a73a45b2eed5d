// crates/tfacc-core/tests/proptest_codec.rs
// ============================================================================
// Module: Codec Property-Based Tests
// Description: Round-trip and idempotence laws for the core codecs.
// Purpose: Ensure the codecs hold their laws on arbitrary input.
// ============================================================================

//! Handle codec and endpoint normalizer property-based tests.
//!
//! ## Purpose
//! These tests check the round-trip and idempotence laws over random inputs.
//!
//! ## What is covered
//! - Handles round trip for names with and without embedded separators.
//! - Sorting is idempotent and always yields a sorted list.
//! - Sorting preserves the token multiset.
//!
//! ## What is intentionally out of scope
//! - Specific malformed handles (covered by `handle_codec.rs`).

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
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use tfacc_core::decode_handle;
use tfacc_core::encode_handle;
use tfacc_core::is_sorted_csv;
use tfacc_core::sort_endpoints;

proptest! {
    #[test]
    fn handle_round_trips(account in "[0-9]{1,12}", name in "[^:]{1,40}") {
        let handle = encode_handle(&account, &name).unwrap();
        let id = decode_handle(&handle).unwrap();
        prop_assert_eq!(id.account_id(), account.as_str());
        prop_assert_eq!(id.resource_name(), name.as_str());
    }

    #[test]
    fn handle_round_trips_embedded_separator(
        account in "[0-9a-z]{1,12}",
        head in "[^:]{0,20}",
        tail in "[^:]{0,20}",
    ) {
        let name = format!("{head}:{tail}");
        let handle = encode_handle(&account, &name).unwrap();
        let id = decode_handle(&handle).unwrap();
        prop_assert_eq!(id.account_id(), account.as_str());
        prop_assert_eq!(id.resource_name(), name.as_str());
    }

    #[test]
    fn decode_never_panics(handle in ".{0,64}") {
        let _ = decode_handle(&handle);
    }

    #[test]
    fn sort_is_idempotent(raw in "[a-z0-9.:,]{0,80}") {
        let once = sort_endpoints(&raw);
        prop_assert_eq!(sort_endpoints(&once), once.clone());
        prop_assert!(is_sorted_csv(&once));
    }

    #[test]
    fn sort_preserves_tokens(tokens in prop::collection::vec("[a-z0-9.]{0,12}:[0-9]{1,5}", 0..12)) {
        let raw = tokens.join(",");
        let sorted = sort_endpoints(&raw);
        let mut expected: Vec<&str> = raw.split(',').collect();
        expected.sort_unstable();
        let actual: Vec<&str> = sorted.split(',').collect();
        prop_assert_eq!(actual, expected);
    }
}
