//! Property tests: idempotence, ownership and delete suppression
mod common;

use std::collections::BTreeMap;

use common::*;
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use tagclone_core::model::{BuildState, Snapshot, TagId};
use tagclone_core::{compute_plan, Action, ClassSelection, DiffOptions, Operation, Ownership};

const BUILD_PACKAGES: [&str; 3] = ["foo", "bar", "baz"];

fn arb_owner() -> impl Strategy<Value = TagId> {
    prop_oneof![Just(DEST_ID), Just(PARENT_ID)]
}

fn arb_source() -> impl Strategy<Value = Snapshot> {
    (
        btree_map("[a-f]", any::<bool>(), 0..6),
        vec((0usize..3, 1u32..4, any::<bool>()), 0..6),
        btree_map(
            "g[1-3]",
            (any::<bool>(), btree_map("[a-f]", any::<bool>(), 0..4)),
            0..3,
        ),
    )
        .prop_map(|(packages, builds, groups)| {
            snapshot(SRC_ID)
                .with_packages(
                    packages
                        .into_iter()
                        .map(|(name, blocked)| pkg(&name, "alice", SRC_ID).blocked(blocked)),
                )
                .with_builds(builds.into_iter().map(|(p, version, complete)| {
                    let state = if complete {
                        BuildState::Complete
                    } else {
                        BuildState::Failed
                    };
                    build(
                        &format!("{}-{}-1", BUILD_PACKAGES[p], version),
                        state,
                        SRC_ID,
                    )
                }))
                .with_groups(groups.into_iter().map(|(name, (blocked, members))| {
                    let mut g = group(&name, SRC_ID, &[]).blocked(blocked);
                    for (member, member_blocked) in members {
                        g = g.with_member(
                            member,
                            tagclone_core::model::GroupMember::new(SRC_ID).blocked(member_blocked),
                        );
                    }
                    g
                }))
        })
}

type DestGroups = BTreeMap<String, (bool, TagId, BTreeMap<String, (bool, TagId)>)>;

fn arb_dest() -> impl Strategy<Value = Snapshot> {
    (
        btree_map("[a-f]", (any::<bool>(), arb_owner()), 0..6),
        vec((0usize..3, 1u32..4, arb_owner()), 0..6),
        btree_map(
            "g[1-3]",
            (
                any::<bool>(),
                arb_owner(),
                btree_map("[a-f]", (any::<bool>(), arb_owner()), 0..4),
            ),
            0..3,
        ),
    )
        .prop_map(|(packages, builds, groups): (_, _, DestGroups)| {
            snapshot(DEST_ID)
                .with_packages(
                    packages
                        .into_iter()
                        .map(|(name, (blocked, owner))| pkg(&name, "bob", owner).blocked(blocked)),
                )
                .with_builds(builds.into_iter().map(|(p, version, owner)| {
                    build(
                        &format!("{}-{}-1", BUILD_PACKAGES[p], version),
                        BuildState::Complete,
                        owner,
                    )
                }))
                .with_groups(groups.into_iter().map(|(name, (blocked, owner, members))| {
                    let mut g = group(&name, owner, &[]).blocked(blocked);
                    // the hub lists no members for a blocked group
                    if !blocked {
                        for (member, (member_blocked, member_owner)) in members {
                            g = g.with_member(
                                member,
                                tagclone_core::model::GroupMember::new(member_owner)
                                    .blocked(member_blocked),
                            );
                        }
                    }
                    g
                }))
        })
}

fn selection() -> ClassSelection {
    ClassSelection {
        config: false,
        ..ClassSelection::all()
    }
}

/// Ownership of the destination record an operation targets, if any
fn target_ownership(dest: &Snapshot, op: &Operation) -> Option<Ownership> {
    match op {
        Operation::BlockPackage { package } => dest.packages.get(package).map(|e| e.ownership),
        Operation::UntagBuild { nvr } => dest.builds.get(nvr).map(|e| e.ownership),
        Operation::RemoveGroup { group } | Operation::BlockGroup { group } => {
            dest.groups.get(group).map(|e| e.ownership)
        }
        Operation::RemoveGroupPackage { group, package }
        | Operation::BlockGroupPackage { group, package } => dest
            .groups
            .get(group)
            .and_then(|g| g.members.get(package))
            .map(|m| m.ownership),
        _ => None,
    }
}

proptest! {
    #[test]
    fn prop_second_pass_is_empty(
        src in arb_source(),
        dest in arb_dest(),
        delete in any::<bool>(),
        latest_only in any::<bool>(),
    ) {
        let opts = DiffOptions { delete, latest_only };
        let plan = compute_plan(&src, &dest, &selection(), &opts);
        let ops: Vec<Operation> = plan.operations().cloned().collect();

        let applied = apply_ops(&dest, &src, &ops);
        let again = compute_plan(&src, &applied, &selection(), &opts);

        prop_assert!(again.is_empty(), "second pass: {:?}", again);
    }

    #[test]
    fn prop_removals_only_target_direct_records(
        src in arb_source(),
        dest in arb_dest(),
        delete in any::<bool>(),
    ) {
        let opts = DiffOptions { delete, latest_only: false };
        let plan = compute_plan(&src, &dest, &selection(), &opts);

        for op in plan.operations().filter(|op| op.action() == Action::Remove) {
            prop_assert_eq!(target_ownership(&dest, op), Some(Ownership::Direct), "{}", op);
        }
    }

    #[test]
    fn prop_no_delete_only_blocks_inherited_groups(
        src in arb_source(),
        dest in arb_dest(),
    ) {
        let opts = DiffOptions { delete: false, latest_only: false };
        let plan = compute_plan(&src, &dest, &selection(), &opts);

        for op in plan.operations() {
            prop_assert_ne!(op.action(), Action::Remove, "removal with delete disabled: {}", op);
            if op.action() == Action::Block {
                prop_assert!(
                    matches!(
                        op,
                        Operation::BlockGroup { .. } | Operation::BlockGroupPackage { .. }
                    ),
                    "unexpected block: {}", op
                );
                prop_assert_eq!(target_ownership(&dest, op), Some(Ownership::Inherited));
            }
        }
    }

    #[test]
    fn prop_additions_do_not_depend_on_delete(
        src in arb_source(),
        dest in arb_dest(),
    ) {
        let adds = |delete: bool| -> Vec<Operation> {
            let opts = DiffOptions { delete, latest_only: false };
            compute_plan(&src, &dest, &selection(), &opts)
                .operations()
                .filter(|op| op.action() == Action::Add)
                .cloned()
                .collect()
        };
        prop_assert_eq!(adds(true), adds(false));
    }
}
