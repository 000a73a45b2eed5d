// crates/tfacc-core/src/lib.rs
// ============================================================================
// Module: tfacc Core Library
// Description: Pure helpers shared by acceptance-test harnesses.
// Purpose: Expose the handle codec, endpoint normalizer, and naming helpers.
// Dependencies: crate::{arn, endpoints, handle, naming, tags, time_period}
// ============================================================================

//! ## Overview
//! tfacc core holds the deterministic pieces of the acceptance-test toolkit:
//! resource handle encoding, endpoint list normalization and validation, ARN
//! construction, tag filtering, and the budget time-period format. Every
//! function is pure and performs no I/O, so callers may invoke them
//! concurrently without synchronization.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod arn;
pub mod endpoints;
pub mod handle;
pub mod naming;
pub mod tags;
pub mod time_period;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use arn::Arn;
pub use arn::ArnError;
pub use arn::partition_for_region;
pub use endpoints::BrokerListener;
pub use endpoints::EndpointError;
pub use endpoints::EndpointList;
pub use endpoints::is_sorted_csv;
pub use endpoints::sort_endpoints;
pub use endpoints::validate_broker_list;
pub use handle::CompositeIdentifier;
pub use handle::HANDLE_SEPARATOR;
pub use handle::HandleError;
pub use handle::decode_handle;
pub use handle::encode_handle;
pub use naming::RESOURCE_PREFIX;
pub use naming::random_with_prefix;
pub use tags::KeyValueTags;
pub use time_period::TimePeriodError;
pub use time_period::format_time_period;
pub use time_period::parse_time_period;
pub use time_period::same_period_minute;
