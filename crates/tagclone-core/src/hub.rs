//! Typed interface to the hub that stores tags
//!
//! The engine only talks to a hub through `HubSession`; transport and
//! authentication live behind the implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind, RemoteFault, Result};
use crate::model::{
    BuildEntry, EventId, GroupEntry, PackageEntry, TagConfig, TagId, TagInfo, TagRef,
};
use crate::operation::Operation;

/// Point in hub history to read the source tag at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AsOf {
    Event(EventId),
    /// Seconds since the Unix epoch; the last event at or before it
    Timestamp(f64),
    /// The event a repo was generated at
    Repo(i64),
}

impl std::fmt::Display for AsOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsOf::Event(id) => write!(f, "event {}", id),
            AsOf::Timestamp(ts) => write!(f, "timestamp {}", ts),
            AsOf::Repo(id) => write!(f, "repo {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    pub id: EventId,
    /// Seconds since the Unix epoch
    pub ts: f64,
}

impl EventInfo {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        let secs = self.ts.floor();
        let nanos = ((self.ts - secs) * 1e9) as u32;
        DateTime::from_timestamp(secs as i64, nanos)
    }

    /// e.g. `Tue Oct 15 09:30:00 2024`
    pub fn timestr(&self) -> String {
        self.time()
            .map(|t| t.format("%a %b %e %H:%M:%S %Y").to_string())
            .unwrap_or_else(|| format!("{}", self.ts))
    }
}

/// Pass-through flags for mutating calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFlags {
    /// Override tag locks and blocked-package checks
    pub force: bool,
    /// Ask the hub to send tag/untag notifications
    pub notify: bool,
}

/// Outcome of one call inside a delivered request
pub type CallResult = std::result::Result<(), RemoteFault>;

/// Session against a hub
///
/// Read methods return `Err` only for failures of the session itself;
/// "not found" is reported as `Ok(None)` by `get_tag`. `multicall` returns
/// `Err` when the request could not be delivered; individual rejections come
/// back as `Err(RemoteFault)` entries in the result vector, one per
/// operation, in request order.
pub trait HubSession {
    /// Whether the session's user holds `perm`
    fn has_perm(&self, perm: &str) -> Result<bool>;

    /// # Errors
    ///
    /// `NotFound` when no event matches the selector.
    fn resolve_event(&self, as_of: &AsOf) -> Result<EventInfo>;

    fn get_tag(&self, tag: &TagRef, event: Option<EventId>) -> Result<Option<TagInfo>>;

    fn create_tag(&mut self, name: &str, config: &TagConfig) -> Result<TagInfo>;

    fn edit_tag(&mut self, tag_id: TagId, config: &TagConfig) -> Result<()>;

    /// Package listings; with `inherited` the whole inheritance chain is
    /// walked and the nearest record per package wins
    fn list_packages(
        &self,
        tag_id: TagId,
        inherited: bool,
        event: Option<EventId>,
    ) -> Result<Vec<PackageEntry>>;

    /// Tagged builds, newest tagging first
    fn list_builds(
        &self,
        tag_id: TagId,
        inherited: bool,
        latest_only: bool,
        event: Option<EventId>,
    ) -> Result<Vec<BuildEntry>>;

    /// Groups seen through inheritance, with members
    fn list_groups(&self, tag_id: TagId, event: Option<EventId>) -> Result<Vec<GroupEntry>>;

    fn multicall(
        &mut self,
        tag_id: TagId,
        ops: &[Operation],
        flags: CallFlags,
    ) -> Result<Vec<CallResult>>;

    /// A single operation in its own request
    fn call(&mut self, tag_id: TagId, op: &Operation, flags: CallFlags) -> Result<CallResult> {
        let mut results = self.multicall(tag_id, std::slice::from_ref(op), flags)?;
        match results.pop() {
            Some(result) if results.is_empty() => Ok(result),
            _ => Err(ExError::new(ExErrorKind::Transport)
                .with_op("call")
                .with_message(format!("expected exactly one result for {}", op))),
        }
    }
}
