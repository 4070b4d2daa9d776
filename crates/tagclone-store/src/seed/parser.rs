//! Seed parser with validation
//!
//! Parses YAML and validates the schema version, name uniqueness and
//! references between tags and builds

#![allow(clippy::result_large_err)]

use crate::errors::{seed_validation, Result};
use crate::seed::format_v0::SeedV0;
use rusqlite::Connection;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tagclone_core::model::{BuildState, Nvr};

pub fn parse_seed_file(path: &Path) -> Result<SeedV0> {
    parse_seed_file_with_db(path, None)
}

/// Parse a seed file; with a connection, parents and builds may also refer
/// to content imported earlier
pub fn parse_seed_file_with_db(path: &Path, conn: Option<&Connection>) -> Result<SeedV0> {
    let content = fs::read_to_string(path)
        .map_err(|e| seed_validation(&format!("Failed to read seed file: {}", e)))?;

    parse_seed_str_with_db(&content, conn)
}

pub fn parse_seed_str(content: &str) -> Result<SeedV0> {
    parse_seed_str_with_db(content, None)
}

pub fn parse_seed_str_with_db(content: &str, conn: Option<&Connection>) -> Result<SeedV0> {
    let seed: SeedV0 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_seed(&seed, conn)?;

    Ok(seed)
}

fn validate_seed(seed: &SeedV0, conn: Option<&Connection>) -> Result<()> {
    if seed.schema_version != 0 {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            seed.schema_version
        )));
    }

    let mut users = HashSet::new();
    for user in &seed.users {
        if !users.insert(user.name.as_str()) {
            return Err(seed_validation(&format!("Duplicate user {}", user.name)));
        }
    }

    let mut nvrs = HashSet::new();
    for build in &seed.builds {
        build.state.parse::<BuildState>()?;
        let parts = Nvr::new(&build.package, &build.version, &build.release);
        let nvr = parts.to_string();
        if Nvr::parse(&nvr)? != parts {
            return Err(seed_validation(&format!(
                "Build {}: version and release must not contain '-'",
                nvr
            )));
        }
        if !nvrs.insert(nvr.clone()) {
            return Err(seed_validation(&format!("Duplicate build {}", nvr)));
        }
    }

    let mut tag_names = HashSet::new();
    for tag in &seed.tags {
        if !tag_names.insert(tag.name.as_str()) {
            return Err(seed_validation(&format!("Duplicate tag {}", tag.name)));
        }
    }

    for tag in &seed.tags {
        for parent in &tag.parents {
            if parent.name == tag.name {
                return Err(seed_validation(&format!(
                    "Tag {} cannot inherit from itself",
                    tag.name
                )));
            }
            if !tag_names.contains(parent.name.as_str())
                && !exists_in_db(conn, "SELECT 1 FROM tags WHERE name = ?1", &parent.name)
            {
                return Err(seed_validation(&format!(
                    "Tag {} references non-existent parent {}",
                    tag.name, parent.name
                )));
            }
        }

        let mut packages = HashSet::new();
        for package in &tag.packages {
            if !packages.insert(package.name.as_str()) {
                return Err(seed_validation(&format!(
                    "Duplicate package {} in tag {}",
                    package.name, tag.name
                )));
            }
        }

        for nvr in &tag.builds {
            Nvr::parse(nvr)?;
            if !nvrs.contains(nvr) && !build_in_db(conn, nvr) {
                return Err(seed_validation(&format!(
                    "Tag {} references non-existent build {}",
                    tag.name, nvr
                )));
            }
        }

        let mut groups = HashSet::new();
        for group in &tag.groups {
            if !groups.insert(group.name.as_str()) {
                return Err(seed_validation(&format!(
                    "Duplicate group {} in tag {}",
                    group.name, tag.name
                )));
            }
            let mut members = HashSet::new();
            for member in &group.packages {
                if !members.insert(member.name.as_str()) {
                    return Err(seed_validation(&format!(
                        "Duplicate package {} in group {} of tag {}",
                        member.name, group.name, tag.name
                    )));
                }
            }
        }
    }

    Ok(())
}

fn exists_in_db(conn: Option<&Connection>, sql: &str, key: &str) -> bool {
    conn.map(|conn| conn.query_row(sql, [key], |_| Ok(true)).unwrap_or(false))
        .unwrap_or(false)
}

fn build_in_db(conn: Option<&Connection>, nvr: &str) -> bool {
    let Some(conn) = conn else {
        return false;
    };
    let Ok(parsed) = Nvr::parse(nvr) else {
        return false;
    };
    conn.query_row(
        "SELECT 1 FROM builds WHERE package = ?1 AND version = ?2 AND release = ?3",
        rusqlite::params![parsed.name, parsed.version, parsed.release],
        |_| Ok(true),
    )
    .unwrap_or(false)
}
