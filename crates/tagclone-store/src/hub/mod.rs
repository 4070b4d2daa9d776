//! `HubSession` over a local SQLite database
//!
//! Every accepted call opens its own event, so the history of a tag can be
//! read back at any point. A rejected call leaves no trace: each call runs
//! inside a savepoint that is rolled back on fault.

#![allow(clippy::result_large_err)]

pub mod mutations;
pub mod queries;
pub mod records;

use std::path::Path;

use rusqlite::{params, Connection};

use crate::errors::{fault, from_rusqlite, Result};
use tagclone_core::errors::{ExError, ExErrorKind, RemoteFault, SyncError};
use tagclone_core::hub::{AsOf, CallFlags, CallResult, EventInfo, HubSession};
use tagclone_core::model::{
    BuildEntry, EventId, GroupEntry, PackageEntry, TagConfig, TagId, TagInfo, TagRef,
};
use tagclone_core::operation::Operation;

/// A build tag or untag notification queued by a `notify` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub nvr: String,
    pub action: String,
    pub event: EventId,
}

pub struct SqliteHub {
    conn: Connection,
    user: String,
}

impl SqliteHub {
    /// Wrap a migrated connection, acting as `user`
    pub fn new(conn: Connection, user: impl Into<String>) -> Self {
        Self {
            conn,
            user: user.into(),
        }
    }

    /// Open (creating and migrating if needed) the hub database at `path`
    pub fn open<P: AsRef<Path>>(path: P, user: impl Into<String>) -> Result<Self> {
        Ok(Self::new(crate::db::open_hub(path)?, user))
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Record a repo generated from the tag's current state
    pub fn new_repo(&mut self, tag_id: TagId) -> Result<i64> {
        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        let event = records::new_event(&tx)?;
        let repo = records::insert_repo(&tx, tag_id, event)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(repo)
    }

    pub fn notifications(&self, tag_id: TagId) -> Result<Vec<Notification>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT nvr, action, event FROM tag_notifications WHERE tag_id = ?1 ORDER BY id",
            )
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params![tag_id], |row| {
                Ok(Notification {
                    nvr: row.get(0)?,
                    action: row.get(1)?,
                    event: row.get(2)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    /// Whether the user may write to a tag guarded by a permission
    fn may_write(&self, tag: &TagInfo) -> Result<bool> {
        match &tag.config.perm {
            None => Ok(true),
            Some(perm) => Ok(queries::has_perm(&self.conn, &self.user, "admin")?
                || queries::has_perm(&self.conn, &self.user, perm)?),
        }
    }
}

impl HubSession for SqliteHub {
    fn has_perm(&self, perm: &str) -> tagclone_core::Result<bool> {
        queries::has_perm(&self.conn, &self.user, perm)
    }

    fn resolve_event(&self, as_of: &AsOf) -> tagclone_core::Result<EventInfo> {
        queries::resolve_event(&self.conn, as_of)
    }

    fn get_tag(
        &self,
        tag: &TagRef,
        event: Option<EventId>,
    ) -> tagclone_core::Result<Option<TagInfo>> {
        queries::get_tag(&self.conn, tag, event)
    }

    fn create_tag(&mut self, name: &str, config: &TagConfig) -> tagclone_core::Result<TagInfo> {
        if queries::get_tag(&self.conn, &TagRef::from(name), None)?.is_some() {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("create_tag")
                .with_tag(name)
                .with_message(format!("A tag with the name {} already exists", name)));
        }

        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        let event = records::new_event(&tx)?;
        let id = records::insert_tag(&tx, name, config, event)?;
        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(tag = name, tag_id = id, event, "created tag");
        Ok(TagInfo {
            id,
            name: name.to_string(),
            config: config.clone(),
        })
    }

    fn edit_tag(&mut self, tag_id: TagId, config: &TagConfig) -> tagclone_core::Result<()> {
        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        if !records::update_tag_config(&tx, tag_id, config)? {
            return Err(SyncError::TagNotFound {
                tag: TagRef::Id(tag_id).to_string(),
            }
            .into());
        }
        records::new_event(&tx)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(())
    }

    fn list_packages(
        &self,
        tag_id: TagId,
        inherited: bool,
        event: Option<EventId>,
    ) -> tagclone_core::Result<Vec<PackageEntry>> {
        queries::list_packages(&self.conn, tag_id, inherited, event)
    }

    fn list_builds(
        &self,
        tag_id: TagId,
        inherited: bool,
        latest_only: bool,
        event: Option<EventId>,
    ) -> tagclone_core::Result<Vec<BuildEntry>> {
        queries::list_builds(&self.conn, tag_id, inherited, latest_only, event)
    }

    fn list_groups(
        &self,
        tag_id: TagId,
        event: Option<EventId>,
    ) -> tagclone_core::Result<Vec<GroupEntry>> {
        queries::list_groups(&self.conn, tag_id, event)
    }

    fn multicall(
        &mut self,
        tag_id: TagId,
        ops: &[Operation],
        flags: CallFlags,
    ) -> tagclone_core::Result<Vec<CallResult>> {
        let tag = queries::get_tag(&self.conn, &TagRef::Id(tag_id), None)?.ok_or_else(|| {
            ExError::from(SyncError::TagNotFound {
                tag: TagRef::Id(tag_id).to_string(),
            })
        })?;
        let allowed = self.may_write(&tag)?;

        let mut results = Vec::with_capacity(ops.len());
        for op in ops {
            if !allowed {
                results.push(Err(fault(
                    RemoteFault::GENERIC,
                    format!("user {} may not modify tag {}", self.user, tag.name),
                )));
                continue;
            }

            let sp = self.conn.savepoint().map_err(from_rusqlite)?;
            let event = records::new_event(&sp)?;
            let result = mutations::apply(&sp, &tag, op, flags, event)?;
            if result.is_ok() {
                sp.commit().map_err(from_rusqlite)?;
            }
            if let Err(rejected) = &result {
                tracing::debug!(tag = %tag.name, %op, code = rejected.code, "call rejected");
            }
            results.push(result);
        }
        Ok(results)
    }
}
