// crates/tfacc-harness/src/sweep.rs
// ============================================================================
// Module: Sweeper Interface
// Description: Sweeper trait, per-run context, settings, and results.
// Purpose: Define how leaked test resources are discovered and deleted.
// Dependencies: thiserror, crate::{api, audit, skip}
// ============================================================================

//! ## Overview
//! A sweeper deletes leaked test resources of one type in one region. The
//! runner hands it a [`SweepContext`] carrying the region, a client factory,
//! run settings, and the audit sink. Sweepers return a [`SweepReport`] for
//! partial progress and reserve [`SweepError`] for sweeps that could not run
//! or stopped on a non-skippable listing failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::api::ApiError;
use crate::api::RegionClients;
use crate::audit::SweepAction;
use crate::audit::SweepAuditEvent;
use crate::audit::SweepAuditEventParams;
use crate::audit::SweepAuditSink;
use crate::skip::SkipPolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default time allowed for a cluster deletion to finish.
pub const DEFAULT_DELETE_TIMEOUT: Duration = Duration::from_secs(120 * 60);

/// Default delay between deletion status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Sweep and sweep-planning failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweepError {
    /// A cloud API call failed.
    #[error("client error: {0}")]
    Client(#[from] ApiError),
    /// One or more resource operations failed.
    #[error("{} sweep error(s): {}", failures.len(), failures.join("; "))]
    Aggregate {
        /// Failure messages in occurrence order.
        failures: Vec<String>,
    },
    /// A deletion did not finish in time.
    #[error("timed out after {}s waiting for deletion of {resource}", timeout.as_secs())]
    WaitTimeout {
        /// Resource being deleted.
        resource: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// A resource reached a failed state while being deleted.
    #[error("unexpected state {state} while waiting for deletion of {resource}")]
    UnexpectedState {
        /// Resource being deleted.
        resource: String,
        /// Observed state label.
        state: String,
    },
    /// Sweeper name registered twice.
    #[error("sweeper already registered: {0}")]
    DuplicateSweeper(String),
    /// Sweeper depends on an unregistered sweeper.
    #[error("sweeper {sweeper} depends on unknown sweeper {dependency}")]
    UnknownDependency {
        /// Dependent sweeper.
        sweeper: String,
        /// Missing dependency.
        dependency: String,
    },
    /// Sweeper dependencies form a cycle.
    #[error("sweeper dependency cycle through {0}")]
    DependencyCycle(String),
    /// Filter matched no registered sweeper.
    #[error("no sweepers match filter: {0}")]
    NoMatchingSweepers(String),
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Tunables applied to every sweeper in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSettings {
    /// Time allowed for asynchronous deletions.
    pub delete_timeout: Duration,
    /// Delay between deletion status polls.
    pub poll_interval: Duration,
    /// Errors that end a sweep as skipped.
    pub skip: SkipPolicy,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            delete_timeout: DEFAULT_DELETE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            skip: SkipPolicy::default(),
        }
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Per-sweeper, per-region execution context.
pub struct SweepContext<'a> {
    /// Region being swept.
    pub region: &'a str,
    /// Client factory.
    pub clients: &'a dyn RegionClients,
    /// Run settings.
    pub settings: &'a SweepSettings,
    /// Audit sink.
    pub audit: &'a dyn SweepAuditSink,
}

impl SweepContext<'_> {
    /// Records an audit event for the sweeper in this region.
    pub fn record(
        &self,
        sweeper: &str,
        resource: Option<&str>,
        action: SweepAction,
        message: Option<String>,
    ) {
        let event = SweepAuditEvent::new(SweepAuditEventParams {
            sweeper: sweeper.to_string(),
            region: self.region.to_string(),
            resource: resource.map(str::to_string),
            action,
            message,
        });
        self.audit.record(&event);
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Progress made by one sweeper in one region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Identifiers of deleted resources.
    pub deleted: Vec<String>,
    /// Non-fatal problems that were logged and passed over.
    pub warnings: Vec<String>,
    /// Resource failures that fail the sweep.
    pub failures: Vec<String>,
    /// Reason the sweep ended early on a skippable error.
    pub skipped: Option<String>,
}

impl SweepReport {
    /// Returns true when any resource failure was recorded.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Deletes leaked test resources of one type.
pub trait Sweeper: Send + Sync {
    /// Unique sweeper name, conventionally the resource type.
    fn name(&self) -> &str;

    /// Sweepers that must run before this one in each region.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Sweeps the context's region.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when the sweep cannot run or stops on a
    /// non-skippable listing failure.
    fn sweep(&self, ctx: &SweepContext<'_>) -> Result<SweepReport, SweepError>;
}
