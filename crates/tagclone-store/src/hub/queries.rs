//! Read side of the local hub
//!
//! Listings are read as of an event; `None` means the current state.
//! Inheritance is walked depth-first by priority and the first record seen
//! for a key wins.

#![allow(clippy::result_large_err)]

use std::collections::{BTreeMap, HashMap, HashSet};

use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::{from_rusqlite, Result};
use tagclone_core::errors::SyncError;
use tagclone_core::hub::{AsOf, EventInfo};
use tagclone_core::model::{
    latest_per_package, BuildEntry, BuildState, EventId, GroupEntry, GroupMember, Nvr,
    PackageEntry, TagConfig, TagId, TagInfo, TagRef,
};

fn event_bound(event: Option<EventId>) -> EventId {
    event.unwrap_or(EventId::MAX)
}

fn row_to_tag(row: &Row<'_>) -> rusqlite::Result<TagInfo> {
    Ok(TagInfo {
        id: row.get(0)?,
        name: row.get(1)?,
        config: TagConfig {
            arches: row.get(2)?,
            locked: row.get(3)?,
            perm: row.get(4)?,
            maven_support: row.get(5)?,
            maven_include_all: row.get(6)?,
        },
    })
}

/// A tag that existed at `event`
pub fn get_tag(conn: &Connection, tag: &TagRef, event: Option<EventId>) -> Result<Option<TagInfo>> {
    let (clause, key) = match tag {
        TagRef::Id(id) => ("id = ?1", Value::Integer(*id)),
        TagRef::Name(name) => ("name = ?1", Value::Text(name.clone())),
    };
    let sql = format!(
        "SELECT id, name, arches, locked, perm, maven_support, maven_include_all
         FROM tags WHERE {} AND create_event <= ?2",
        clause
    );
    conn.query_row(&sql, params![key, event_bound(event)], row_to_tag)
        .optional()
        .map_err(from_rusqlite)
}

/// The tag followed by its ancestors, nearest first
pub fn inheritance_chain(conn: &Connection, tag_id: TagId) -> Result<Vec<(TagId, String)>> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    walk_parents(conn, tag_id, &mut seen, &mut chain)?;
    Ok(chain)
}

fn walk_parents(
    conn: &Connection,
    tag_id: TagId,
    seen: &mut HashSet<TagId>,
    chain: &mut Vec<(TagId, String)>,
) -> Result<()> {
    if !seen.insert(tag_id) {
        return Ok(());
    }
    chain.push((tag_id, tag_name(conn, tag_id)?));

    let mut stmt = conn
        .prepare(
            "SELECT parent_id FROM tag_inheritance WHERE tag_id = ?1
             ORDER BY priority, parent_id",
        )
        .map_err(from_rusqlite)?;
    let parents = stmt
        .query_map([tag_id], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<TagId>, _>>()
        .map_err(from_rusqlite)?;

    for parent in parents {
        walk_parents(conn, parent, seen, chain)?;
    }
    Ok(())
}

fn tag_name(conn: &Connection, tag_id: TagId) -> Result<String> {
    conn.query_row("SELECT name FROM tags WHERE id = ?1", [tag_id], |row| {
        row.get::<_, String>(0)
    })
    .optional()
    .map_err(from_rusqlite)?
    .ok_or_else(|| {
        SyncError::TagNotFound {
            tag: format!("#{}", tag_id),
        }
        .into()
    })
}

fn chain_for(conn: &Connection, tag_id: TagId, inherited: bool) -> Result<Vec<(TagId, String)>> {
    if inherited {
        inheritance_chain(conn, tag_id)
    } else {
        Ok(vec![(tag_id, tag_name(conn, tag_id)?)])
    }
}

/// Package listings sorted by name
pub fn list_packages(
    conn: &Connection,
    tag_id: TagId,
    inherited: bool,
    event: Option<EventId>,
) -> Result<Vec<PackageEntry>> {
    let bound = event_bound(event);
    let mut stmt = conn
        .prepare(
            "SELECT package, owner, blocked, extra_arches FROM tag_packages
             WHERE tag_id = ?1 AND create_event <= ?2
               AND (revoke_event IS NULL OR revoke_event > ?2)",
        )
        .map_err(from_rusqlite)?;

    let mut packages: BTreeMap<String, PackageEntry> = BTreeMap::new();
    for (id, name) in chain_for(conn, tag_id, inherited)? {
        let rows = stmt
            .query_map(params![id, bound], |row| {
                let mut entry = PackageEntry::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    id,
                    name.as_str(),
                )
                .blocked(row.get(2)?);
                entry.extra_arches = row.get(3)?;
                Ok(entry)
            })
            .map_err(from_rusqlite)?;
        for row in rows {
            let entry = row.map_err(from_rusqlite)?;
            packages.entry(entry.name.clone()).or_insert(entry);
        }
    }
    Ok(packages.into_values().collect())
}

type BuildRow = (String, String, String, String, String);

/// Tagged builds, newest tagging first
///
/// Builds whose package is not listed, or is blocked, in the tag's effective
/// package list are hidden.
pub fn list_builds(
    conn: &Connection,
    tag_id: TagId,
    inherited: bool,
    latest_only: bool,
    event: Option<EventId>,
) -> Result<Vec<BuildEntry>> {
    let listed: HashMap<String, bool> = list_packages(conn, tag_id, true, event)?
        .into_iter()
        .map(|p| (p.name, p.blocked))
        .collect();

    let bound = event_bound(event);
    let mut stmt = conn
        .prepare(
            "SELECT b.package, b.version, b.release, b.state, b.owner
             FROM tag_listing l JOIN builds b ON b.id = l.build_id
             WHERE l.tag_id = ?1 AND l.create_event <= ?2
               AND (l.revoke_event IS NULL OR l.revoke_event > ?2)
             ORDER BY l.create_event DESC, l.rowid DESC",
        )
        .map_err(from_rusqlite)?;

    let mut seen = HashSet::new();
    let mut builds = Vec::new();
    for (id, name) in chain_for(conn, tag_id, inherited)? {
        let rows = stmt
            .query_map(params![id, bound], |row| -> rusqlite::Result<BuildRow> {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })
            .map_err(from_rusqlite)?;
        for row in rows {
            let (package, version, release, state, owner) = row.map_err(from_rusqlite)?;
            if listed.get(&package) != Some(&false) {
                continue;
            }
            let nvr = Nvr::new(package, version, release);
            if !seen.insert(nvr.to_string()) {
                continue;
            }
            let state: BuildState = state.parse()?;
            builds.push(BuildEntry::new(&nvr, state, owner, id, name.as_str()));
        }
    }

    if latest_only {
        return Ok(latest_per_package(&builds));
    }
    Ok(builds)
}

/// Groups seen through inheritance, sorted by name
///
/// Blocked groups are returned without members.
pub fn list_groups(
    conn: &Connection,
    tag_id: TagId,
    event: Option<EventId>,
) -> Result<Vec<GroupEntry>> {
    let chain = inheritance_chain(conn, tag_id)?;
    let bound = event_bound(event);

    let mut groups: BTreeMap<String, GroupEntry> = BTreeMap::new();
    let mut stmt = conn
        .prepare(
            "SELECT group_name, blocked FROM group_config
             WHERE tag_id = ?1 AND create_event <= ?2
               AND (revoke_event IS NULL OR revoke_event > ?2)",
        )
        .map_err(from_rusqlite)?;
    for (id, _) in &chain {
        let rows = stmt
            .query_map(params![id, bound], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
            })
            .map_err(from_rusqlite)?;
        for row in rows {
            let (name, blocked) = row.map_err(from_rusqlite)?;
            groups
                .entry(name.clone())
                .or_insert_with(|| GroupEntry::new(name, *id).blocked(blocked));
        }
    }

    let mut stmt = conn
        .prepare(
            "SELECT group_name, package, blocked FROM group_package_listing
             WHERE tag_id = ?1 AND create_event <= ?2
               AND (revoke_event IS NULL OR revoke_event > ?2)",
        )
        .map_err(from_rusqlite)?;
    for (id, _) in &chain {
        let rows = stmt
            .query_map(params![id, bound], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, bool>(2)?,
                ))
            })
            .map_err(from_rusqlite)?;
        for row in rows {
            let (group_name, package, blocked) = row.map_err(from_rusqlite)?;
            let Some(group) = groups.get_mut(&group_name) else {
                continue;
            };
            if group.blocked {
                continue;
            }
            group
                .members
                .entry(package)
                .or_insert_with(|| GroupMember::new(*id).blocked(blocked));
        }
    }

    Ok(groups.into_values().collect())
}

pub fn has_perm(conn: &Connection, user: &str, perm: &str) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM user_perms p JOIN users u ON u.id = p.user_id
         WHERE u.name = ?1 AND p.perm = ?2",
        params![user, perm],
        |_| Ok(true),
    )
    .optional()
    .map(|found| found.unwrap_or(false))
    .map_err(from_rusqlite)
}

pub fn resolve_event(conn: &Connection, as_of: &AsOf) -> Result<EventInfo> {
    let row_to_event = |row: &Row<'_>| -> rusqlite::Result<EventInfo> {
        Ok(EventInfo {
            id: row.get(0)?,
            ts: row.get(1)?,
        })
    };
    let found = match as_of {
        AsOf::Event(id) => conn.query_row(
            "SELECT id, time FROM events WHERE id = ?1",
            [id],
            row_to_event,
        ),
        AsOf::Timestamp(ts) => conn.query_row(
            "SELECT id, time FROM events WHERE time <= ?1 ORDER BY time DESC, id DESC LIMIT 1",
            [ts],
            row_to_event,
        ),
        AsOf::Repo(repo) => conn.query_row(
            "SELECT e.id, e.time FROM repos r JOIN events e ON e.id = r.create_event
             WHERE r.id = ?1",
            [repo],
            row_to_event,
        ),
    }
    .optional()
    .map_err(from_rusqlite)?;

    found.ok_or_else(|| {
        SyncError::EventNotFound {
            selector: as_of.to_string(),
        }
        .into()
    })
}

/// Id of a build by NVR
pub fn find_build(conn: &Connection, nvr: &Nvr) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM builds WHERE package = ?1 AND version = ?2 AND release = ?3",
        params![nvr.name, nvr.version, nvr.release],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}
