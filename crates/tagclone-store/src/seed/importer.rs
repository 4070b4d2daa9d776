//! Seed importer
//!
//! Writes a validated seed into a hub database. Everything lands in one
//! transaction under a single event.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::path::Path;

use crate::errors::{from_rusqlite, seed_validation, Result};
use crate::hub::{queries, records};
use crate::seed::format_v0::SeedV0;
use crate::seed::{compute_seed_digest, parse_seed_file_with_db, parse_seed_str_with_db};
use rusqlite::Connection;
use serde::Serialize;
use tagclone_core::model::{BuildState, EventId, Nvr, TagConfig, TagId, TagRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub digest: String,
    pub event: EventId,
    pub users: usize,
    pub builds: usize,
    pub tags: usize,
}

/// Import a seed file into the database
///
/// Parents and tagged builds may refer to content imported by an earlier
/// seed. Returns the seed digest and the event the content was stamped with.
pub fn import_seed(path: &Path, conn: &mut Connection) -> Result<ImportSummary> {
    let seed = parse_seed_file_with_db(path, Some(&*conn))?;
    import_parsed(&seed, conn)
}

pub fn import_seed_str(content: &str, conn: &mut Connection) -> Result<ImportSummary> {
    let seed = parse_seed_str_with_db(content, Some(&*conn))?;
    import_parsed(&seed, conn)
}

fn import_parsed(seed: &SeedV0, conn: &mut Connection) -> Result<ImportSummary> {
    let digest = compute_seed_digest(seed);
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let event = records::new_event(&tx)?;

    for user in &seed.users {
        let user_id = records::ensure_user(&tx, &user.name)?;
        for perm in &user.perms {
            records::grant_perm(&tx, user_id, perm)?;
        }
    }

    for build in &seed.builds {
        let nvr = Nvr::new(&build.package, &build.version, &build.release);
        if queries::find_build(&tx, &nvr)?.is_some() {
            return Err(seed_validation(&format!("Build {} already exists", nvr)));
        }
        let state: BuildState = build.state.parse()?;
        records::insert_build(&tx, &nvr, state, &build.owner)?;
    }

    // Tags first so parents can be declared after their children
    let mut tag_ids: HashMap<&str, TagId> = HashMap::new();
    for tag in &seed.tags {
        if queries::get_tag(&tx, &TagRef::from(tag.name.as_str()), None)?.is_some() {
            return Err(seed_validation(&format!("Tag {} already exists", tag.name)));
        }
        let config = TagConfig {
            arches: tag.arches.clone(),
            locked: tag.locked,
            perm: tag.perm.clone(),
            maven_support: tag.maven_support,
            maven_include_all: tag.maven_include_all,
        };
        let id = records::insert_tag(&tx, &tag.name, &config, event)?;
        tag_ids.insert(tag.name.as_str(), id);
    }

    for tag in &seed.tags {
        let tag_id = tag_ids[tag.name.as_str()];

        for parent in &tag.parents {
            let parent_id = match tag_ids.get(parent.name.as_str()) {
                Some(id) => *id,
                None => queries::get_tag(&tx, &TagRef::from(parent.name.as_str()), None)?
                    .map(|t| t.id)
                    .ok_or_else(|| {
                        seed_validation(&format!("Unknown parent tag {}", parent.name))
                    })?,
            };
            records::insert_inheritance(&tx, tag_id, parent_id, parent.priority)?;
        }

        for package in &tag.packages {
            let record = records::DirectPackage {
                owner: package.owner.clone(),
                blocked: package.blocked,
                extra_arches: package.extra_arches.clone(),
            };
            records::insert_package(&tx, tag_id, &package.name, &record, event)?;
        }

        for nvr in &tag.builds {
            let parsed = Nvr::parse(nvr)?;
            let build_id = queries::find_build(&tx, &parsed)?
                .ok_or_else(|| seed_validation(&format!("Unknown build {}", nvr)))?;
            records::tag_build(&tx, tag_id, build_id, event)?;
        }

        for group in &tag.groups {
            records::insert_group(&tx, tag_id, &group.name, group.blocked, event)?;
            for member in &group.packages {
                records::insert_group_package(
                    &tx,
                    tag_id,
                    &group.name,
                    &member.name,
                    member.blocked,
                    event,
                )?;
            }
        }
    }

    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(
        digest = %digest,
        event,
        tags = seed.tags.len(),
        builds = seed.builds.len(),
        "imported seed"
    );

    Ok(ImportSummary {
        digest,
        event,
        users: seed.users.len(),
        builds: seed.builds.len(),
        tags: seed.tags.len(),
    })
}
