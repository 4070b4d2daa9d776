//! Write side of the local hub: one `Operation` against one tag
//!
//! `Ok(Err(fault))` is a rejected call; the caller rolls its savepoint back.
//! `Err` is a storage failure and aborts the whole request.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;

use super::queries;
use super::records::{self, DirectPackage};
use crate::errors::{fault, Result};
use tagclone_core::errors::RemoteFault;
use tagclone_core::hub::{CallFlags, CallResult};
use tagclone_core::model::{EventId, Nvr, TagInfo};
use tagclone_core::operation::Operation;

pub fn apply(
    conn: &Connection,
    tag: &TagInfo,
    op: &Operation,
    flags: CallFlags,
    event: EventId,
) -> Result<CallResult> {
    if tag.is_locked() && !flags.force {
        return Ok(Err(fault(
            RemoteFault::LOCKED,
            format!("tag {} is locked", tag.name),
        )));
    }

    match op {
        Operation::AddPackage {
            package,
            owner,
            blocked,
            extra_arches,
        } => {
            let record = DirectPackage {
                owner: owner.clone(),
                blocked: *blocked,
                extra_arches: extra_arches.clone(),
            };
            add_package(conn, tag, package, &record, flags, event)
        }
        Operation::BlockPackage { package } => block_package(conn, tag, package, event),
        Operation::TagBuild { nvr } => tag_build(conn, tag, nvr, flags, event),
        Operation::UntagBuild { nvr } => untag_build(conn, tag, nvr, flags, event),
        Operation::AddGroup { group } => {
            records::revoke_group(conn, tag.id, group, event)?;
            records::insert_group(conn, tag.id, group, false, event)?;
            Ok(Ok(()))
        }
        Operation::RemoveGroup { group } => {
            if records::revoke_group(conn, tag.id, group, event)? == 0 {
                return Ok(Err(fault(
                    RemoteFault::NOT_FOUND,
                    format!("group {} is not listed directly on tag {}", group, tag.name),
                )));
            }
            records::revoke_group_packages(conn, tag.id, group, None, event)?;
            Ok(Ok(()))
        }
        Operation::BlockGroup { group } => {
            if !group_visible(conn, tag, group)? {
                return Ok(Err(fault(
                    RemoteFault::NOT_FOUND,
                    format!("group {} not present in tag {}", group, tag.name),
                )));
            }
            records::revoke_group(conn, tag.id, group, event)?;
            records::insert_group(conn, tag.id, group, true, event)?;
            Ok(Ok(()))
        }
        Operation::AddGroupPackage { group, package } => {
            set_group_package(conn, tag, group, package, false, event)
        }
        Operation::RemoveGroupPackage { group, package } => {
            if records::revoke_group_packages(conn, tag.id, group, Some(package), event)? == 0 {
                return Ok(Err(fault(
                    RemoteFault::NOT_FOUND,
                    format!(
                        "package {} is not listed directly in group {} on tag {}",
                        package, group, tag.name
                    ),
                )));
            }
            Ok(Ok(()))
        }
        Operation::BlockGroupPackage { group, package } => {
            set_group_package(conn, tag, group, package, true, event)
        }
    }
}

fn add_package(
    conn: &Connection,
    tag: &TagInfo,
    package: &str,
    record: &DirectPackage,
    flags: CallFlags,
    event: EventId,
) -> Result<CallResult> {
    if !flags.force && records::direct_package(conn, tag.id, package)?.is_none() {
        let inherited = queries::list_packages(conn, tag.id, true, None)?
            .into_iter()
            .find(|p| p.name == package);
        if inherited.is_some_and(|p| p.blocked) && !record.blocked {
            return Ok(Err(fault(
                RemoteFault::GENERIC,
                format!("package {} is blocked in the inheritance of {}", package, tag.name),
            )));
        }
    }
    records::revoke_package(conn, tag.id, package, event)?;
    records::insert_package(conn, tag.id, package, record, event)?;
    Ok(Ok(()))
}

fn block_package(
    conn: &Connection,
    tag: &TagInfo,
    package: &str,
    event: EventId,
) -> Result<CallResult> {
    let Some(visible) = queries::list_packages(conn, tag.id, true, None)?
        .into_iter()
        .find(|p| p.name == package)
    else {
        return Ok(Err(fault(
            RemoteFault::NOT_FOUND,
            format!("package {} not present in tag {}", package, tag.name),
        )));
    };
    let record = DirectPackage {
        owner: visible.owner,
        blocked: true,
        extra_arches: visible.extra_arches,
    };
    records::revoke_package(conn, tag.id, package, event)?;
    records::insert_package(conn, tag.id, package, &record, event)?;
    Ok(Ok(()))
}

fn lookup_build(
    conn: &Connection,
    nvr: &str,
) -> Result<std::result::Result<(Nvr, i64), RemoteFault>> {
    let Ok(parsed) = Nvr::parse(nvr) else {
        return Ok(Err(fault(RemoteFault::GENERIC, format!("invalid build {}", nvr))));
    };
    Ok(match queries::find_build(conn, &parsed)? {
        Some(id) => Ok((parsed, id)),
        None => Err(fault(RemoteFault::NOT_FOUND, format!("no such build: {}", nvr))),
    })
}

fn tag_build(
    conn: &Connection,
    tag: &TagInfo,
    nvr: &str,
    flags: CallFlags,
    event: EventId,
) -> Result<CallResult> {
    let (parsed, build_id) = match lookup_build(conn, nvr)? {
        Ok(found) => found,
        Err(rejected) => return Ok(Err(rejected)),
    };

    if !flags.force {
        let listed = queries::list_packages(conn, tag.id, true, None)?
            .into_iter()
            .find(|p| p.name == parsed.name);
        match listed {
            Some(p) if !p.blocked => {}
            Some(_) => {
                return Ok(Err(fault(
                    RemoteFault::GENERIC,
                    format!("package {} is blocked in tag {}", parsed.name, tag.name),
                )))
            }
            None => {
                return Ok(Err(fault(
                    RemoteFault::GENERIC,
                    format!("package {} not in list for tag {}", parsed.name, tag.name),
                )))
            }
        }
    }

    if records::is_tagged(conn, tag.id, build_id)? {
        return Ok(Err(fault(
            RemoteFault::CONFLICT,
            format!("build {} already tagged ({})", nvr, tag.name),
        )));
    }

    records::tag_build(conn, tag.id, build_id, event)?;
    if flags.notify {
        records::insert_notification(conn, tag.id, nvr, "tag", event)?;
    }
    Ok(Ok(()))
}

fn untag_build(
    conn: &Connection,
    tag: &TagInfo,
    nvr: &str,
    flags: CallFlags,
    event: EventId,
) -> Result<CallResult> {
    let (_, build_id) = match lookup_build(conn, nvr)? {
        Ok(found) => found,
        Err(rejected) => return Ok(Err(rejected)),
    };
    if records::untag_build(conn, tag.id, build_id, event)? == 0 {
        return Ok(Err(fault(
            RemoteFault::NOT_FOUND,
            format!("build {} not in tag {}", nvr, tag.name),
        )));
    }
    if flags.notify {
        records::insert_notification(conn, tag.id, nvr, "untag", event)?;
    }
    Ok(Ok(()))
}

fn group_visible(conn: &Connection, tag: &TagInfo, group: &str) -> Result<bool> {
    Ok(queries::list_groups(conn, tag.id, None)?
        .iter()
        .any(|g| g.name == group))
}

fn set_group_package(
    conn: &Connection,
    tag: &TagInfo,
    group: &str,
    package: &str,
    blocked: bool,
    event: EventId,
) -> Result<CallResult> {
    let active = queries::list_groups(conn, tag.id, None)?
        .iter()
        .any(|g| g.name == group && !g.blocked);
    if !active {
        return Ok(Err(fault(
            RemoteFault::NOT_FOUND,
            format!("group {} not present in tag {}", group, tag.name),
        )));
    }
    records::revoke_group_packages(conn, tag.id, group, Some(package), event)?;
    records::insert_group_package(conn, tag.id, group, package, blocked, event)?;
    Ok(Ok(()))
}
