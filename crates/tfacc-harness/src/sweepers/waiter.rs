// crates/tfacc-harness/src/sweepers/waiter.rs
// ============================================================================
// Module: Cluster Deletion Waiter
// Description: Polls a cluster until the API reports it gone.
// Purpose: Block a sweep until an asynchronous deletion completes.
// Dependencies: crate::{api, sweep}
// ============================================================================

//! ## Overview
//! Cluster deletion is asynchronous: the cluster stays visible, usually in
//! the `DELETING` state, until it disappears. The describe call may lag the
//! delete and still report `ACTIVE` or `UPDATING` for a while, so any state
//! but `FAILED` means "keep polling". The waiter stops on not-found, on any
//! other describe error, on `FAILED`, or when the timeout elapses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;
use std::time::Instant;

use crate::api::ClusterState;
use crate::api::KafkaApi;
use crate::sweep::SweepError;

// ============================================================================
// SECTION: Waiter
// ============================================================================

/// Waits until `arn` is no longer described by the API.
///
/// # Errors
///
/// Returns [`SweepError::Client`] on describe failures other than not-found,
/// [`SweepError::UnexpectedState`] when the cluster reports `FAILED`, and
/// [`SweepError::WaitTimeout`] when `timeout` elapses first.
pub fn wait_for_cluster_deletion(
    api: &dyn KafkaApi,
    arn: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), SweepError> {
    let started = Instant::now();
    loop {
        match api.describe_cluster(arn) {
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(SweepError::Client(err)),
            Ok(cluster) if cluster.state == ClusterState::Failed => {
                return Err(SweepError::UnexpectedState {
                    resource: arn.to_string(),
                    state: cluster.state.as_str().to_string(),
                });
            }
            Ok(_) => {}
        }
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Err(SweepError::WaitTimeout {
                resource: arn.to_string(),
                timeout,
            });
        }
        thread::sleep(poll_interval.min(timeout - elapsed));
    }
}
