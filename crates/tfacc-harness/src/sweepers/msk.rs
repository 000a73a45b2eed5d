// crates/tfacc-harness/src/sweepers/msk.rs
// ============================================================================
// Module: Streaming Cluster Sweeper
// Description: Deletes every streaming cluster in the region.
// Purpose: Remove clusters leaked by interrupted acceptance runs.
// Dependencies: crate::{api, audit, sweep, sweepers::waiter}
// ============================================================================

//! ## Overview
//! Lists clusters, starts deleting each, and waits for the deletion to
//! finish. Delete and wait failures are logged as warnings and the sweep
//! moves on to the next cluster.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::audit::SweepAction;
use crate::sweep::SweepContext;
use crate::sweep::SweepError;
use crate::sweep::SweepReport;
use crate::sweep::Sweeper;
use crate::sweepers::waiter::wait_for_cluster_deletion;

// ============================================================================
// SECTION: Sweeper
// ============================================================================

/// Sweeper name for streaming clusters.
pub const MSK_CLUSTER_SWEEPER: &str = "aws_msk_cluster";

/// Deletes all streaming clusters in the region.
pub struct MskClusterSweeper;

impl Sweeper for MskClusterSweeper {
    fn name(&self) -> &str {
        MSK_CLUSTER_SWEEPER
    }

    fn sweep(&self, ctx: &SweepContext<'_>) -> Result<SweepReport, SweepError> {
        let api = ctx.clients.kafka(ctx.region)?;
        let mut report = SweepReport::default();

        let clusters = match api.list_clusters() {
            Ok(clusters) => clusters,
            Err(err) if ctx.settings.skip.is_skippable(&err) => {
                let message = format!("skipping cluster sweep for {}: {err}", ctx.region);
                ctx.record(MSK_CLUSTER_SWEEPER, None, SweepAction::Skipped, Some(message.clone()));
                report.skipped = Some(message);
                return Ok(report);
            }
            Err(err) => {
                ctx.record(MSK_CLUSTER_SWEEPER, None, SweepAction::ListFailed, Some(err.to_string()));
                return Err(SweepError::Client(err));
            }
        };

        for cluster in clusters {
            ctx.record(MSK_CLUSTER_SWEEPER, Some(&cluster.name), SweepAction::Deleting, None);
            if let Err(err) = api.delete_cluster(&cluster.arn) {
                let message = format!("failed to delete cluster {}: {err}", cluster.name);
                ctx.record(
                    MSK_CLUSTER_SWEEPER,
                    Some(&cluster.name),
                    SweepAction::DeleteFailed,
                    Some(message.clone()),
                );
                report.warnings.push(message);
                continue;
            }
            match wait_for_cluster_deletion(
                api.as_ref(),
                &cluster.arn,
                ctx.settings.delete_timeout,
                ctx.settings.poll_interval,
            ) {
                Ok(()) => {
                    ctx.record(MSK_CLUSTER_SWEEPER, Some(&cluster.name), SweepAction::Deleted, None);
                    report.deleted.push(cluster.arn);
                }
                Err(err) => {
                    let message =
                        format!("failed to wait for deletion of cluster {}: {err}", cluster.name);
                    ctx.record(
                        MSK_CLUSTER_SWEEPER,
                        Some(&cluster.name),
                        SweepAction::WaitFailed,
                        Some(message.clone()),
                    );
                    report.warnings.push(message);
                }
            }
        }

        Ok(report)
    }
}
