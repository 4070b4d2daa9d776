//! Per-class reconciliation.
//!
//! Each `diff_*` function compares the two initial snapshots for one entity
//! class; none of them look at the output of another, so classes can be
//! applied in any order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::diff::model::{ClassSelection, ClonePlan, DiffOptions};
use crate::model::{compare_builds, latest_per_package, BuildEntry, GroupEntry, Snapshot};
use crate::model::{TagConfig, TagInfo};
use crate::operation::Operation;
use crate::ownership::Ownership;

/// Compute the full plan for the selected classes.
///
/// The configuration change is only considered when `selection.config` is
/// set; unselected classes yield empty operation lists.
pub fn compute_plan(
    src: &Snapshot,
    dest: &Snapshot,
    selection: &ClassSelection,
    opts: &DiffOptions,
) -> ClonePlan {
    ClonePlan {
        packages: if selection.packages {
            diff_packages(src, dest, opts)
        } else {
            Vec::new()
        },
        builds: if selection.builds {
            diff_builds(src, dest, opts)
        } else {
            Vec::new()
        },
        groups: if selection.groups {
            diff_groups(src, dest, opts)
        } else {
            Vec::new()
        },
        config: if selection.config {
            diff_config(&src.tag, &dest.tag)
        } else {
            None
        },
    }
}

/// Package listings, keyed by name.
///
/// Entries present on both sides are left alone even when their owner or
/// blocked flag differ.
pub fn diff_packages(src: &Snapshot, dest: &Snapshot, opts: &DiffOptions) -> Vec<Operation> {
    let mut ops = Vec::new();

    if opts.delete {
        ops.extend(
            dest.packages
                .values()
                .filter(|entry| !entry.blocked && !src.packages.contains_key(&entry.name))
                .map(|entry| Operation::BlockPackage {
                    package: entry.name.clone(),
                }),
        );
    }

    ops.extend(
        src.packages
            .values()
            .filter(|entry| !dest.packages.contains_key(&entry.name))
            .map(|entry| Operation::AddPackage {
                package: entry.name.clone(),
                owner: entry.owner.clone(),
                blocked: entry.blocked,
                extra_arches: entry.extra_arches.clone(),
            }),
    );

    ops
}

/// Build membership, keyed by NVR. Untags come first.
///
/// Only complete source builds are candidates. Only builds tagged directly
/// into the destination are ever untagged.
pub fn diff_builds(src: &Snapshot, dest: &Snapshot, opts: &DiffOptions) -> Vec<Operation> {
    let complete = src.builds.values().filter(|b| b.is_complete());
    let wanted: Vec<BuildEntry> = if opts.latest_only {
        latest_per_package(complete)
    } else {
        complete.cloned().collect()
    };
    let wanted_nvrs: BTreeSet<&str> = wanted.iter().map(|b| b.nvr.as_str()).collect();

    let mut untag: Vec<&BuildEntry> = if opts.delete {
        dest.builds
            .values()
            .filter(|b| b.ownership.is_direct() && !wanted_nvrs.contains(b.nvr.as_str()))
            .collect()
    } else {
        Vec::new()
    };
    let mut tag: Vec<&BuildEntry> = wanted
        .iter()
        .filter(|b| !dest.builds.contains_key(&b.nvr))
        .collect();

    untag.sort_by(|a, b| build_order(a, b));
    tag.sort_by(|a, b| build_order(a, b));

    untag
        .into_iter()
        .map(|b| Operation::UntagBuild { nvr: b.nvr.clone() })
        .chain(tag.into_iter().map(|b| Operation::TagBuild { nvr: b.nvr.clone() }))
        .collect()
}

/// Package name, then version-release ascending, then NVR text
fn build_order(a: &BuildEntry, b: &BuildEntry) -> Ordering {
    a.package_name
        .cmp(&b.package_name)
        .then_with(|| compare_builds(a, b))
        .then_with(|| a.nvr.cmp(&b.nvr))
}

/// Groups and their members, keyed by name.
///
/// Blocked entries count as absent on the source side and as already
/// suppressed on the destination side. Output order: group suppressions,
/// then member changes of groups both sides share, then new groups each
/// followed by their members.
pub fn diff_groups(src: &Snapshot, dest: &Snapshot, opts: &DiffOptions) -> Vec<Operation> {
    let src_active = |name: &str| src.groups.get(name).filter(|g| !g.blocked);
    let dest_active = |name: &str| dest.groups.get(name).filter(|g| !g.blocked);

    let mut suppress = Vec::new();
    for group in dest.groups.values().filter(|g| !g.blocked) {
        if src_active(&group.name).is_some() {
            continue;
        }
        match group.ownership {
            Ownership::Inherited => suppress.push(Operation::BlockGroup {
                group: group.name.clone(),
            }),
            Ownership::Direct if opts.delete => suppress.push(Operation::RemoveGroup {
                group: group.name.clone(),
            }),
            Ownership::Direct => {}
        }
    }

    let mut shared = Vec::new();
    let mut created = Vec::new();
    for group in src.groups.values().filter(|g| !g.blocked) {
        match dest_active(&group.name) {
            Some(existing) => shared.extend(diff_members(group, existing, opts)),
            None => {
                created.push(Operation::AddGroup {
                    group: group.name.clone(),
                });
                created.extend(group.active_members().map(|(name, _)| {
                    Operation::AddGroupPackage {
                        group: group.name.clone(),
                        package: name.clone(),
                    }
                }));
            }
        }
    }

    suppress.into_iter().chain(shared).chain(created).collect()
}

/// Member reconciliation inside a group both sides see.
///
/// Classification uses the member's own source tag, not the group's.
fn diff_members(src: &GroupEntry, dest: &GroupEntry, opts: &DiffOptions) -> Vec<Operation> {
    let src_has = |name: &str| src.members.get(name).is_some_and(|m| !m.blocked);
    let dest_has = |name: &str| dest.members.get(name).is_some_and(|m| !m.blocked);

    let mut ops = Vec::new();
    for (name, member) in dest.active_members() {
        if src_has(name) {
            continue;
        }
        match member.ownership {
            Ownership::Inherited => ops.push(Operation::BlockGroupPackage {
                group: dest.name.clone(),
                package: name.clone(),
            }),
            Ownership::Direct if opts.delete => ops.push(Operation::RemoveGroupPackage {
                group: dest.name.clone(),
                package: name.clone(),
            }),
            Ownership::Direct => {}
        }
    }
    for (name, _) in src.active_members() {
        if !dest_has(name) {
            ops.push(Operation::AddGroupPackage {
                group: src.name.clone(),
                package: name.clone(),
            });
        }
    }
    ops
}

/// The source configuration, when it differs from the destination's
pub fn diff_config(src: &TagInfo, dest: &TagInfo) -> Option<TagConfig> {
    (src.config != dest.config).then(|| src.config.clone())
}
