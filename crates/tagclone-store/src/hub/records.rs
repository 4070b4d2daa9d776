//! Row-level writes shared by the hub and the seed importer
//!
//! Every write is stamped with an event. Revoking sets `revoke_event` on the
//! currently active row; history is never deleted.

#![allow(clippy::result_large_err)]

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{from_rusqlite, Result};
use tagclone_core::model::{BuildState, EventId, Nvr, TagConfig, TagId};

/// Open a new event, never earlier than the previous one
pub fn new_event(conn: &Connection) -> Result<EventId> {
    let now = chrono::Utc::now();
    let ts = now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6;
    let last: Option<f64> = conn
        .query_row("SELECT MAX(time) FROM events", [], |row| row.get(0))
        .map_err(from_rusqlite)?;
    let ts = last.map_or(ts, |last| ts.max(last));

    conn.execute("INSERT INTO events (time) VALUES (?1)", [ts])
        .map_err(from_rusqlite)?;
    Ok(conn.last_insert_rowid())
}

pub fn ensure_user(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT OR IGNORE INTO users (name) VALUES (?1)", [name])
        .map_err(from_rusqlite)?;
    conn.query_row("SELECT id FROM users WHERE name = ?1", [name], |row| {
        row.get(0)
    })
    .map_err(from_rusqlite)
}

pub fn grant_perm(conn: &Connection, user_id: i64, perm: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO user_perms (user_id, perm) VALUES (?1, ?2)",
        params![user_id, perm],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

pub fn insert_tag(
    conn: &Connection,
    name: &str,
    config: &TagConfig,
    event: EventId,
) -> Result<TagId> {
    conn.execute(
        "INSERT INTO tags
             (name, create_event, arches, locked, perm, maven_support, maven_include_all)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            name,
            event,
            config.arches,
            config.locked,
            config.perm,
            config.maven_support,
            config.maven_include_all
        ],
    )
    .map_err(from_rusqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Returns false when no such tag exists
pub fn update_tag_config(conn: &Connection, tag_id: TagId, config: &TagConfig) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE tags SET arches = ?2, locked = ?3, perm = ?4, maven_support = ?5,
                 maven_include_all = ?6
             WHERE id = ?1",
            params![
                tag_id,
                config.arches,
                config.locked,
                config.perm,
                config.maven_support,
                config.maven_include_all
            ],
        )
        .map_err(from_rusqlite)?;
    Ok(changed > 0)
}

pub fn insert_inheritance(
    conn: &Connection,
    tag_id: TagId,
    parent_id: TagId,
    priority: i64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO tag_inheritance (tag_id, parent_id, priority) VALUES (?1, ?2, ?3)",
        params![tag_id, parent_id, priority],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

pub fn insert_build(conn: &Connection, nvr: &Nvr, state: BuildState, owner: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO builds (package, version, release, state, owner) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![nvr.name, nvr.version, nvr.release, state.as_str(), owner],
    )
    .map_err(from_rusqlite)?;
    Ok(conn.last_insert_rowid())
}

/// A package row stored on the tag itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectPackage {
    pub owner: String,
    pub blocked: bool,
    pub extra_arches: Option<String>,
}

pub fn direct_package(
    conn: &Connection,
    tag_id: TagId,
    package: &str,
) -> Result<Option<DirectPackage>> {
    conn.query_row(
        "SELECT owner, blocked, extra_arches FROM tag_packages
         WHERE tag_id = ?1 AND package = ?2 AND revoke_event IS NULL",
        params![tag_id, package],
        |row| {
            Ok(DirectPackage {
                owner: row.get(0)?,
                blocked: row.get(1)?,
                extra_arches: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(from_rusqlite)
}

pub fn insert_package(
    conn: &Connection,
    tag_id: TagId,
    package: &str,
    record: &DirectPackage,
    event: EventId,
) -> Result<()> {
    conn.execute(
        "INSERT INTO tag_packages (tag_id, package, owner, blocked, extra_arches, create_event)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tag_id,
            package,
            record.owner,
            record.blocked,
            record.extra_arches,
            event
        ],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

pub fn revoke_package(
    conn: &Connection,
    tag_id: TagId,
    package: &str,
    event: EventId,
) -> Result<usize> {
    conn.execute(
        "UPDATE tag_packages SET revoke_event = ?3
         WHERE tag_id = ?1 AND package = ?2 AND revoke_event IS NULL",
        params![tag_id, package, event],
    )
    .map_err(from_rusqlite)
}

pub fn is_tagged(conn: &Connection, tag_id: TagId, build_id: i64) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM tag_listing WHERE tag_id = ?1 AND build_id = ?2 AND revoke_event IS NULL",
        params![tag_id, build_id],
        |_| Ok(true),
    )
    .optional()
    .map(|found| found.unwrap_or(false))
    .map_err(from_rusqlite)
}

pub fn tag_build(conn: &Connection, tag_id: TagId, build_id: i64, event: EventId) -> Result<()> {
    conn.execute(
        "INSERT INTO tag_listing (tag_id, build_id, create_event) VALUES (?1, ?2, ?3)",
        params![tag_id, build_id, event],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

pub fn untag_build(
    conn: &Connection,
    tag_id: TagId,
    build_id: i64,
    event: EventId,
) -> Result<usize> {
    conn.execute(
        "UPDATE tag_listing SET revoke_event = ?3
         WHERE tag_id = ?1 AND build_id = ?2 AND revoke_event IS NULL",
        params![tag_id, build_id, event],
    )
    .map_err(from_rusqlite)
}

pub fn insert_group(
    conn: &Connection,
    tag_id: TagId,
    group: &str,
    blocked: bool,
    event: EventId,
) -> Result<()> {
    conn.execute(
        "INSERT INTO group_config (tag_id, group_name, blocked, create_event)
         VALUES (?1, ?2, ?3, ?4)",
        params![tag_id, group, blocked, event],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

pub fn revoke_group(
    conn: &Connection,
    tag_id: TagId,
    group: &str,
    event: EventId,
) -> Result<usize> {
    conn.execute(
        "UPDATE group_config SET revoke_event = ?3
         WHERE tag_id = ?1 AND group_name = ?2 AND revoke_event IS NULL",
        params![tag_id, group, event],
    )
    .map_err(from_rusqlite)
}

pub fn insert_group_package(
    conn: &Connection,
    tag_id: TagId,
    group: &str,
    package: &str,
    blocked: bool,
    event: EventId,
) -> Result<()> {
    conn.execute(
        "INSERT INTO group_package_listing (tag_id, group_name, package, blocked, create_event)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![tag_id, group, package, blocked, event],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

/// Revoke one member row, or every member row of the group when `package`
/// is `None`
pub fn revoke_group_packages(
    conn: &Connection,
    tag_id: TagId,
    group: &str,
    package: Option<&str>,
    event: EventId,
) -> Result<usize> {
    conn.execute(
        "UPDATE group_package_listing SET revoke_event = ?4
         WHERE tag_id = ?1 AND group_name = ?2 AND (?3 IS NULL OR package = ?3)
           AND revoke_event IS NULL",
        params![tag_id, group, package, event],
    )
    .map_err(from_rusqlite)
}

pub fn insert_repo(conn: &Connection, tag_id: TagId, event: EventId) -> Result<i64> {
    conn.execute(
        "INSERT INTO repos (tag_id, create_event) VALUES (?1, ?2)",
        params![tag_id, event],
    )
    .map_err(from_rusqlite)?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_notification(
    conn: &Connection,
    tag_id: TagId,
    nvr: &str,
    action: &str,
    event: EventId,
) -> Result<()> {
    conn.execute(
        "INSERT INTO tag_notifications (tag_id, nvr, action, event) VALUES (?1, ?2, ?3, ?4)",
        params![tag_id, nvr, action, event],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}
