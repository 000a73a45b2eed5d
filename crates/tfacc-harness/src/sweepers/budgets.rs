// crates/tfacc-harness/src/sweepers/budgets.rs
// ============================================================================
// Module: Budget Sweeper
// Description: Deletes every budget in the caller's account.
// Purpose: Remove budgets leaked by interrupted acceptance runs.
// Dependencies: tfacc-core, crate::{api, audit, sweep}
// ============================================================================

//! ## Overview
//! Pages through the account's budgets and deletes each one. Budgets that
//! vanish between listing and deletion are ignored. Delete failures are
//! collected and the sweep continues; a skippable listing error ends the
//! sweep early with whatever was collected so far. Events are labeled with
//! the budget's handle; a budget whose handle cannot be encoded is labeled
//! by name and the reason is kept as a warning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tfacc_core::encode_handle;

use crate::audit::SweepAction;
use crate::sweep::SweepContext;
use crate::sweep::SweepError;
use crate::sweep::SweepReport;
use crate::sweep::Sweeper;

// ============================================================================
// SECTION: Sweeper
// ============================================================================

/// Sweeper name for budgets.
pub const BUDGETS_SWEEPER: &str = "aws_budgets_budget";

/// Deletes all budgets in the account.
pub struct BudgetsSweeper;

impl Sweeper for BudgetsSweeper {
    fn name(&self) -> &str {
        BUDGETS_SWEEPER
    }

    fn sweep(&self, ctx: &SweepContext<'_>) -> Result<SweepReport, SweepError> {
        let account_id = ctx.clients.account_id(ctx.region)?;
        let api = ctx.clients.budgets(ctx.region)?;
        let mut report = SweepReport::default();
        let mut next_token: Option<String> = None;

        loop {
            let page = match api.describe_budgets(&account_id, next_token.as_deref()) {
                Ok(page) => page,
                Err(err) if ctx.settings.skip.is_skippable(&err) => {
                    let message = format!("skipping budgets sweep for {}: {err}", ctx.region);
                    ctx.record(BUDGETS_SWEEPER, None, SweepAction::Skipped, Some(message.clone()));
                    report.skipped = Some(message);
                    return Ok(report);
                }
                Err(err) => {
                    let message = format!("error retrieving budgets: {err}");
                    ctx.record(BUDGETS_SWEEPER, None, SweepAction::ListFailed, Some(message.clone()));
                    let mut failures = report.failures;
                    failures.push(message);
                    return Err(SweepError::Aggregate {
                        failures,
                    });
                }
            };

            for budget in &page.budgets {
                let (handle, label_note) = match encode_handle(&account_id, &budget.name) {
                    Ok(handle) => (handle, None),
                    Err(err) => {
                        let note = format!("budget {} labeled by name: {err}", budget.name);
                        report.warnings.push(note.clone());
                        (budget.name.clone(), Some(note))
                    }
                };
                ctx.record(BUDGETS_SWEEPER, Some(&handle), SweepAction::Deleting, label_note);
                match api.delete_budget(&account_id, &budget.name) {
                    Ok(()) => {
                        ctx.record(BUDGETS_SWEEPER, Some(&handle), SweepAction::Deleted, None);
                        report.deleted.push(handle);
                    }
                    Err(err) if err.is_not_found() => {
                        ctx.record(BUDGETS_SWEEPER, Some(&handle), SweepAction::AlreadyGone, None);
                    }
                    Err(err) => {
                        let message = format!("error deleting budget ({}): {err}", budget.name);
                        ctx.record(
                            BUDGETS_SWEEPER,
                            Some(&handle),
                            SweepAction::DeleteFailed,
                            Some(message.clone()),
                        );
                        report.failures.push(message);
                    }
                }
            }

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(report)
    }
}
