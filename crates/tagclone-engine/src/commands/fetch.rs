//! Snapshot fetching
//!
//! Lists only the classes in scope and stamps ownership once, relative to
//! the fetched tag.

#![allow(clippy::result_large_err)]

use tagclone_core::errors::{Result, SyncError};
use tagclone_core::hub::HubSession;
use tagclone_core::model::{EventId, Snapshot, TagInfo, TagRef};
use tagclone_core::ClassSelection;

/// Which listings a fetch performs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchScope {
    pub packages: bool,
    pub builds: bool,
    pub groups: bool,
    /// Walk inheritance when listing builds
    pub inherit_builds: bool,
    /// Only the latest build per package
    pub latest_only: bool,
}

impl FetchScope {
    /// Scope for the source side of a clone
    pub fn source(selection: &ClassSelection, inherit_builds: bool, latest_only: bool) -> Self {
        Self {
            packages: selection.packages,
            builds: selection.builds,
            groups: selection.groups,
            inherit_builds,
            latest_only,
        }
    }

    /// Scope for the destination side: only builds tagged directly into it
    /// can be untagged, so build inheritance is never walked
    pub fn destination(selection: &ClassSelection) -> Self {
        Self::source(selection, false, false)
    }
}

/// Look a tag up, failing with `NotFound` when it does not resolve
pub fn resolve_tag(
    session: &dyn HubSession,
    tag: &TagRef,
    event: Option<EventId>,
) -> Result<TagInfo> {
    session.get_tag(tag, event)?.ok_or_else(|| {
        SyncError::TagNotFound {
            tag: tag.to_string(),
        }
        .into()
    })
}

/// Fetch the classes in `scope` for `tag` as of `event`
pub fn fetch_snapshot(
    session: &dyn HubSession,
    tag: &TagInfo,
    event: Option<EventId>,
    scope: &FetchScope,
) -> Result<Snapshot> {
    let mut snapshot = Snapshot::empty(tag.clone()).at_event(event);

    if scope.packages {
        snapshot = snapshot.with_packages(session.list_packages(tag.id, true, event)?);
    }
    if scope.builds {
        snapshot = snapshot.with_builds(session.list_builds(
            tag.id,
            scope.inherit_builds,
            scope.latest_only,
            event,
        )?);
    }
    if scope.groups {
        snapshot = snapshot.with_groups(session.list_groups(tag.id, event)?);
    }

    tracing::debug!(
        tag = %tag.name,
        tag_id = tag.id,
        event = ?event,
        packages = snapshot.packages.len(),
        builds = snapshot.builds.len(),
        groups = snapshot.groups.len(),
        "fetched snapshot"
    );
    Ok(snapshot)
}
