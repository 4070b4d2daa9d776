//! Clone-tag orchestration.
//!
//! ## Stages (in order):
//! 1. Validate arguments (no RPC): distinct tags, batch size, class selection
//! 2. Permission check (`admin` or `tag`)
//! 3. Resolve the pinned event, if any
//! 4. Fetch the source tag and check its lock
//! 5. Fetch the destination and check its lock, or create it when
//!    configuration is copied
//! 6. Reconcile the selected classes
//! 7. Render the report (verbose only)
//! 8. Apply in batches, or stop here on dry run
//!
//! Lock checks are skipped when forced. Nothing is written before the end
//! of stage 5, and stage 5 only writes when the destination is missing and
//! this is not a dry run.

#![allow(clippy::result_large_err)]

use serde::Serialize;

use crate::commands::apply::{apply_plan, ApplyReport};
use crate::commands::fetch::{fetch_snapshot, resolve_tag, FetchScope};
use tagclone_core::batch::BatchSize;
use tagclone_core::errors::{Result, SyncError};
use tagclone_core::hub::{AsOf, CallFlags, EventInfo, HubSession};
use tagclone_core::model::{Snapshot, TagInfo, TagRef};
use tagclone_core::render::render_plan;
use tagclone_core::{compute_plan, ClassSelection, ClonePlan, DiffOptions};
use tagclone_core::{log_op_end, log_op_error, log_op_start};
use tagclone_core_types::{RequestContext, RequestId};

/// Everything a clone-tag run needs to know
#[derive(Debug, Clone, PartialEq)]
pub struct CloneOptions {
    pub src: TagRef,
    pub dst: TagRef,
    pub selection: ClassSelection,
    pub latest_only: bool,
    pub inherit_builds: bool,
    /// Suppress destination-only direct entries
    pub delete: bool,
    pub as_of: Option<AsOf>,
    pub verbose: bool,
    pub dry_run: bool,
    pub flags: CallFlags,
    /// Raw batch size as given; validated before any RPC
    pub batch: i64,
}

impl CloneOptions {
    /// All classes, delete on, default batch size
    pub fn new(src: impl Into<TagRef>, dst: impl Into<TagRef>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            selection: ClassSelection::all(),
            latest_only: false,
            inherit_builds: false,
            delete: true,
            as_of: None,
            verbose: false,
            dry_run: false,
            flags: CallFlags::default(),
            batch: BatchSize::default().get() as i64,
        }
    }

    fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            delete: self.delete,
            latest_only: self.latest_only,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationState {
    Existing,
    Created,
    /// Missing; a dry run planned against an empty tag instead
    WouldCreate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloneOutcome {
    pub request_id: RequestId,
    /// The pinned event the source was read at
    pub event: Option<EventInfo>,
    pub src: TagInfo,
    pub dst: TagInfo,
    pub destination: DestinationState,
    pub plan: ClonePlan,
    /// Rendered plan, when verbose
    pub report: Option<String>,
    /// `None` on dry run
    pub applied: Option<ApplyReport>,
    pub dry_run: bool,
}

impl CloneOutcome {
    pub fn fault_count(&self) -> usize {
        self.applied.as_ref().map_or(0, |report| report.failed.len())
    }
}

/// Run clone-tag with a fresh request context
pub fn clone_tag(session: &mut dyn HubSession, options: &CloneOptions) -> Result<CloneOutcome> {
    clone_tag_with_context(session, options, &RequestContext::new())
}

pub fn clone_tag_with_context(
    session: &mut dyn HubSession,
    options: &CloneOptions,
    ctx: &RequestContext,
) -> Result<CloneOutcome> {
    log_op_start!(
        "clone_tag",
        request_id = %ctx.request_id,
        src_tag = %options.src,
        dst_tag = %options.dst,
        dry_run = options.dry_run
    );
    let start = std::time::Instant::now();

    let outcome = run(session, options, &ctx.request_id).map_err(|e| {
        let mut e = e.with_request_id(ctx.request_id.clone());
        if let Some(trace_id) = &ctx.trace_id {
            e = e.with_trace_id(trace_id.clone());
        }
        log_op_error!(
            "clone_tag",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %ctx.request_id
        );
        e
    })?;

    log_op_end!(
        "clone_tag",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %ctx.request_id,
        op_count = outcome.plan.operation_count(),
        fault_count = outcome.fault_count()
    );

    Ok(outcome)
}

fn run(
    session: &mut dyn HubSession,
    options: &CloneOptions,
    request_id: &RequestId,
) -> Result<CloneOutcome> {
    // 1. Arguments
    if options.src == options.dst {
        return Err(SyncError::SameTag {
            tag: options.src.to_string(),
        }
        .into());
    }
    let batch = BatchSize::new(options.batch)?;
    if options.selection.builds && !options.selection.packages {
        return Err(SyncError::BuildsWithoutPackages.into());
    }

    // 2. Permission
    if !(session.has_perm("admin")? || session.has_perm("tag")?) {
        return Err(SyncError::PermissionDenied.into());
    }

    // 3. Pinned event
    let event = options
        .as_of
        .as_ref()
        .map(|as_of| session.resolve_event(as_of))
        .transpose()?;
    if let Some(event) = &event {
        tracing::debug!(event = event.id, time = %event.timestr(), "pinned source event");
    }
    let event_id = event.as_ref().map(|e| e.id);

    // 4. Source
    let src = resolve_tag(&*session, &options.src, event_id)?;
    check_lock(&src, options.flags)?;

    // 5. Destination
    let (dst, destination) = match session.get_tag(&options.dst, None)? {
        Some(dst) => {
            check_lock(&dst, options.flags)?;
            (dst, DestinationState::Existing)
        }
        None => {
            let TagRef::Name(name) = &options.dst else {
                return Err(SyncError::TagNotFound {
                    tag: options.dst.to_string(),
                }
                .into());
            };
            if !options.selection.config {
                return Err(SyncError::DestinationMissing { tag: name.clone() }.into());
            }
            if options.dry_run {
                (
                    TagInfo::planned(name.clone(), src.config.clone()),
                    DestinationState::WouldCreate,
                )
            } else {
                let created = session.create_tag(name, &src.config)?;
                tracing::debug!(tag = %created.name, tag_id = created.id, "created destination");
                (
                    resolve_tag(&*session, &TagRef::Id(created.id), None)?,
                    DestinationState::Created,
                )
            }
        }
    };
    if destination != DestinationState::WouldCreate && src.id == dst.id {
        return Err(SyncError::SameTag { tag: src.name }.into());
    }

    // 6. Reconcile
    let src_snapshot = fetch_snapshot(
        &*session,
        &src,
        event_id,
        &FetchScope::source(&options.selection, options.inherit_builds, options.latest_only),
    )?;
    let dst_snapshot = match destination {
        DestinationState::WouldCreate => Snapshot::empty(dst.clone()),
        _ => fetch_snapshot(
            &*session,
            &dst,
            None,
            &FetchScope::destination(&options.selection),
        )?,
    };
    let plan = compute_plan(
        &src_snapshot,
        &dst_snapshot,
        &options.selection,
        &options.diff_options(),
    );
    tracing::debug!(
        packages = plan.packages.len(),
        builds = plan.builds.len(),
        groups = plan.groups.len(),
        config = plan.config.is_some(),
        "computed plan"
    );

    // 7. Report
    let report = options.verbose.then(|| render_plan(&plan));

    // 8. Apply
    let applied = if options.dry_run {
        None
    } else {
        Some(apply_plan(session, dst.id, &plan, batch, options.flags)?)
    };

    Ok(CloneOutcome {
        request_id: request_id.clone(),
        event,
        src,
        dst,
        destination,
        plan,
        report,
        applied,
        dry_run: options.dry_run,
    })
}

fn check_lock(tag: &TagInfo, flags: CallFlags) -> Result<()> {
    if tag.is_locked() && !flags.force {
        return Err(SyncError::TagLocked {
            tag: tag.name.clone(),
        }
        .into());
    }
    Ok(())
}
