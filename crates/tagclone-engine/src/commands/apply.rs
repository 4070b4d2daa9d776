//! Submitting a plan to the hub
//!
//! Batches go out strictly in sequence. A fault on one call is recorded
//! against that operation and the rest continue; a request that cannot be
//! delivered, or whose response does not line up with it, aborts the run.

#![allow(clippy::result_large_err)]

use serde::Serialize;

use tagclone_core::batch::{plan_batches, Batch, BatchSize, Dispatch};
use tagclone_core::errors::{RemoteFault, Result, SyncError};
use tagclone_core::hub::{CallFlags, CallResult, HubSession};
use tagclone_core::model::TagId;
use tagclone_core::operation::Operation;
use tagclone_core::ClonePlan;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedOperation {
    pub operation: Operation,
    pub fault: RemoteFault,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Requests sent for content operations
    pub round_trips: usize,
    pub applied: usize,
    pub failed: Vec<FailedOperation>,
    pub config_updated: bool,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply `plan` to the destination, packages then builds then groups, and
/// copy the configuration last
pub fn apply_plan(
    session: &mut dyn HubSession,
    dest_id: TagId,
    plan: &ClonePlan,
    size: BatchSize,
    flags: CallFlags,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    for batch in plan_batches(plan, size) {
        let results = deliver(session, dest_id, &batch, flags).map_err(|e| {
            tracing::warn!(
                class = batch.class.as_str(),
                batch_len = batch.len(),
                round_trips = report.round_trips,
                applied = report.applied,
                failed = report.failed.len(),
                "batch undelivered, aborting"
            );
            let message = format!(
                "{} (after {} request(s): {} applied, {} failed)",
                e.message(),
                report.round_trips,
                report.applied,
                report.failed.len()
            );
            e.with_message(message)
        })?;
        report.round_trips += 1;

        tracing::debug!(
            class = batch.class.as_str(),
            batch_len = batch.len(),
            "batch delivered"
        );

        for (operation, result) in batch.operations.iter().zip(results) {
            match result {
                Ok(()) => report.applied += 1,
                Err(fault) => {
                    tracing::warn!(
                        %operation,
                        code = fault.code,
                        message = %fault.message,
                        "call rejected"
                    );
                    report.failed.push(FailedOperation {
                        operation: operation.clone(),
                        fault,
                    });
                }
            }
        }
    }

    if let Some(config) = &plan.config {
        session.edit_tag(dest_id, config)?;
        report.config_updated = true;
    }

    Ok(report)
}

/// Send one batch and check that the response lines up with it
fn deliver(
    session: &mut dyn HubSession,
    dest_id: TagId,
    batch: &Batch<'_>,
    flags: CallFlags,
) -> Result<Vec<CallResult>> {
    let results: Vec<CallResult> = match batch.dispatch {
        Dispatch::Multicall => session.multicall(dest_id, batch.operations, flags)?,
        Dispatch::Single => batch
            .operations
            .iter()
            .map(|op| session.call(dest_id, op, flags))
            .collect::<Result<_>>()?,
    };
    if results.len() != batch.len() {
        return Err(SyncError::Transport {
            len: batch.len(),
            reason: format!("hub answered with {} result(s)", results.len()),
        }
        .into());
    }
    Ok(results)
}
