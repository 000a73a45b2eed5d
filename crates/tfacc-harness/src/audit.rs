// crates/tfacc-harness/src/audit.rs
// ============================================================================
// Module: Sweep Audit Logging
// Description: Structured audit events for sweeper activity.
// Purpose: Emit JSON-line records of every resource a sweep touches.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Sweepers report each listing, deletion, and wait through a
//! [`SweepAuditSink`]. Events are flat JSON objects written one per line so
//! operators can grep or ship them without a logging framework.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// What happened to a swept resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAction {
    /// Delete call is about to be issued.
    Deleting,
    /// Resource was deleted.
    Deleted,
    /// Resource was already gone when deleted.
    AlreadyGone,
    /// Delete call failed.
    DeleteFailed,
    /// Waiting for deletion failed or timed out.
    WaitFailed,
    /// Listing failed with a skippable error; sweep ended early.
    Skipped,
    /// Listing failed.
    ListFailed,
}

impl SweepAction {
    /// Returns the severity label used in log records.
    #[must_use]
    pub const fn level(self) -> &'static str {
        match self {
            Self::Deleting | Self::Deleted | Self::AlreadyGone => "info",
            Self::Skipped => "warn",
            Self::DeleteFailed | Self::WaitFailed | Self::ListFailed => "error",
        }
    }
}

/// Sweep audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SweepAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Severity label.
    pub level: &'static str,
    /// Sweeper name.
    pub sweeper: String,
    /// Region being swept.
    pub region: String,
    /// Resource name or handle when the event concerns one resource.
    pub resource: Option<String>,
    /// Action taken.
    pub action: SweepAction,
    /// Error or detail message.
    pub message: Option<String>,
}

/// Inputs required to construct a sweep audit event.
pub struct SweepAuditEventParams {
    /// Sweeper name.
    pub sweeper: String,
    /// Region being swept.
    pub region: String,
    /// Resource name or handle.
    pub resource: Option<String>,
    /// Action taken.
    pub action: SweepAction,
    /// Error or detail message.
    pub message: Option<String>,
}

impl SweepAuditEvent {
    /// Creates a new sweep audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: SweepAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "sweep_resource",
            timestamp_ms,
            level: params.action.level(),
            sweeper: params.sweeper,
            region: params.region,
            resource: params.resource,
            action: params.action,
            message: params.message,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for sweep events.
pub trait SweepAuditSink: Send + Sync {
    /// Record a sweep event.
    fn record(&self, event: &SweepAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrSweepAuditSink;

impl SweepAuditSink for StderrSweepAuditSink {
    fn record(&self, event: &SweepAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileSweepAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileSweepAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl SweepAuditSink for FileSweepAuditSink {
    fn record(&self, event: &SweepAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopSweepAuditSink;

impl SweepAuditSink for NoopSweepAuditSink {
    fn record(&self, _event: &SweepAuditEvent) {}
}
