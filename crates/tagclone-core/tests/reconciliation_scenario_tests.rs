//! Reconciliation scenarios for the diff engine
mod common;

use common::*;
use tagclone_core::model::BuildState;
use tagclone_core::{compute_plan, Action, ClassSelection, DiffOptions, Operation};
use tagclone_core::diff::{diff_builds, diff_groups, diff_packages};

fn no_delete() -> DiffOptions {
    DiffOptions {
        delete: false,
        latest_only: false,
    }
}

// ---------------------------------------------------------------------------
// Packages
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_a_new_package_copied_with_source_attributes() {
    // GIVEN a source listing p1 owned by u1 and an empty destination
    let src = snapshot(SRC_ID).with_packages(vec![pkg("p1", "u1", SRC_ID)]);
    let dest = snapshot(DEST_ID);

    // WHEN diffing packages
    let ops = diff_packages(&src, &dest, &DiffOptions::default());

    // THEN exactly one AddPackage carries the source attributes
    assert_eq!(
        ops,
        vec![Operation::AddPackage {
            package: "p1".into(),
            owner: "u1".into(),
            blocked: false,
            extra_arches: None,
        }]
    );
}

#[test]
fn test_scenario_b_destination_only_package_blocked_only_with_delete() {
    // GIVEN a source {p1} and a destination owning {p1, p2}
    let src = snapshot(SRC_ID).with_packages(vec![pkg("p1", "u1", SRC_ID)]);
    let dest = snapshot(DEST_ID)
        .with_packages(vec![pkg("p1", "u1", DEST_ID), pkg("p2", "u2", DEST_ID)]);

    // WHEN delete is enabled THEN p2 is blocked
    assert_eq!(
        diff_packages(&src, &dest, &DiffOptions::default()),
        vec![Operation::BlockPackage {
            package: "p2".into()
        }]
    );

    // WHEN delete is disabled THEN nothing happens
    assert!(diff_packages(&src, &dest, &no_delete()).is_empty());
}

#[test]
fn test_package_attribute_drift_is_left_alone() {
    // GIVEN the same package with a different owner and blocked flag
    let src = snapshot(SRC_ID).with_packages(vec![pkg("bash", "alice", SRC_ID)]);
    let dest = snapshot(DEST_ID)
        .with_packages(vec![pkg("bash", "mallory", DEST_ID).blocked(true)]);

    // THEN no operation is emitted
    assert!(diff_packages(&src, &dest, &DiffOptions::default()).is_empty());
}

#[test]
fn test_inherited_destination_package_is_blocked_not_removed() {
    let src = snapshot(SRC_ID);
    let dest = snapshot(DEST_ID).with_packages(vec![pkg("legacy", "u", PARENT_ID)]);

    let ops = diff_packages(&src, &dest, &DiffOptions::default());

    assert_eq!(
        ops,
        vec![Operation::BlockPackage {
            package: "legacy".into()
        }]
    );
}

#[test]
fn test_blocked_source_package_is_added_blocked() {
    let src = snapshot(SRC_ID).with_packages(vec![pkg("kernel-rt", "u", SRC_ID)
        .blocked(true)
        .with_extra_arches("x86_64")]);

    let ops = diff_packages(&src, &snapshot(DEST_ID), &DiffOptions::default());

    assert_eq!(
        ops,
        vec![Operation::AddPackage {
            package: "kernel-rt".into(),
            owner: "u".into(),
            blocked: true,
            extra_arches: Some("x86_64".into()),
        }]
    );
}

// ---------------------------------------------------------------------------
// Builds
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_d_tag_build_then_rediff_is_empty() {
    // GIVEN source builds {pkg-1.0-1 COMPLETE} and no destination builds
    let src = snapshot(SRC_ID).with_builds(vec![build("pkg-1.0-1", BuildState::Complete, SRC_ID)]);
    let dest = snapshot(DEST_ID);

    // WHEN diffing
    let ops = diff_builds(&src, &dest, &DiffOptions::default());

    // THEN the build is tagged
    assert_eq!(
        ops,
        vec![Operation::TagBuild {
            nvr: "pkg-1.0-1".into()
        }]
    );

    // AND applying then rediffing yields nothing
    let applied = apply_ops(&dest, &src, &ops);
    assert!(diff_builds(&src, &applied, &DiffOptions::default()).is_empty());
}

#[test]
fn test_untags_precede_tags() {
    let src = snapshot(SRC_ID).with_builds(vec![
        build("a-2-1", BuildState::Complete, SRC_ID),
        build("z-2-1", BuildState::Complete, SRC_ID),
    ]);
    let dest = snapshot(DEST_ID).with_builds(vec![
        build("a-1-1", BuildState::Complete, DEST_ID),
        build("z-1-1", BuildState::Complete, DEST_ID),
    ]);

    let ops = diff_builds(&src, &dest, &DiffOptions::default());
    let actions: Vec<Action> = ops.iter().map(Operation::action).collect();

    assert_eq!(
        actions,
        vec![Action::Remove, Action::Remove, Action::Add, Action::Add]
    );
}

#[test]
fn test_no_untag_without_delete() {
    let dest = snapshot(DEST_ID).with_builds(vec![build("a-1-1", BuildState::Complete, DEST_ID)]);
    assert!(diff_builds(&snapshot(SRC_ID), &dest, &no_delete()).is_empty());
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_c_inherited_group_blocked_regardless_of_delete() {
    // GIVEN destination 2 inherits group g from tag 7 and the source lacks g
    let src = snapshot(SRC_ID);
    let dest = snapshot(DEST_ID).with_groups(vec![group("g", PARENT_ID, &[])]);

    for opts in [DiffOptions::default(), no_delete()] {
        // WHEN diffing groups
        let ops = diff_groups(&src, &dest, &opts);

        // THEN the group is blocked, never removed
        assert_eq!(ops, vec![Operation::BlockGroup { group: "g".into() }]);
    }
}

#[test]
fn test_direct_group_removed_only_with_delete() {
    let src = snapshot(SRC_ID);
    let dest = snapshot(DEST_ID).with_groups(vec![group("mine", DEST_ID, &[("bash", DEST_ID)])]);

    assert_eq!(
        diff_groups(&src, &dest, &DiffOptions::default()),
        vec![Operation::RemoveGroup {
            group: "mine".into()
        }]
    );
    assert!(diff_groups(&src, &dest, &no_delete()).is_empty());
}

#[test]
fn test_new_group_gets_only_unblocked_members() {
    let mut source_group = group("build", SRC_ID, &[("bash", SRC_ID), ("make", SRC_ID)]);
    if let Some(m) = source_group.members.get_mut("make") {
        m.blocked = true;
    }
    let src = snapshot(SRC_ID).with_groups(vec![source_group]);

    let ops = diff_groups(&src, &snapshot(DEST_ID), &DiffOptions::default());

    assert_eq!(
        ops,
        vec![
            Operation::AddGroup {
                group: "build".into()
            },
            Operation::AddGroupPackage {
                group: "build".into(),
                package: "bash".into()
            },
        ]
    );
}

#[test]
fn test_shared_group_inherited_member_blocked_without_delete() {
    // GIVEN a shared group whose extra member comes from the ancestor
    let src = snapshot(SRC_ID).with_groups(vec![group("build", SRC_ID, &[("bash", SRC_ID)])]);
    let dest = snapshot(DEST_ID).with_groups(vec![group(
        "build",
        PARENT_ID,
        &[("bash", PARENT_ID), ("sed", PARENT_ID)],
    )]);

    // WHEN delete is disabled
    let ops = diff_groups(&src, &dest, &no_delete());

    // THEN the inherited member is still blocked
    assert_eq!(
        ops,
        vec![Operation::BlockGroupPackage {
            group: "build".into(),
            package: "sed".into()
        }]
    );
}

#[test]
fn test_group_order_suppressions_then_shared_then_new() {
    let src = snapshot(SRC_ID).with_groups(vec![
        group("alpha", SRC_ID, &[("x", SRC_ID)]),
        group("shared", SRC_ID, &[("new-member", SRC_ID)]),
    ]);
    let dest = snapshot(DEST_ID).with_groups(vec![
        group("shared", DEST_ID, &[("old-member", DEST_ID)]),
        group("zeta", PARENT_ID, &[]),
    ]);

    let ops = diff_groups(&src, &dest, &DiffOptions::default());

    assert_eq!(
        ops,
        vec![
            Operation::BlockGroup {
                group: "zeta".into()
            },
            Operation::RemoveGroupPackage {
                group: "shared".into(),
                package: "old-member".into()
            },
            Operation::AddGroupPackage {
                group: "shared".into(),
                package: "new-member".into()
            },
            Operation::AddGroup {
                group: "alpha".into()
            },
            Operation::AddGroupPackage {
                group: "alpha".into(),
                package: "x".into()
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Whole plan
// ---------------------------------------------------------------------------

#[test]
fn test_full_plan_round_trip_is_empty() {
    let src = snapshot(SRC_ID)
        .with_packages(vec![pkg("bash", "alice", SRC_ID), pkg("make", "bob", SRC_ID)])
        .with_builds(vec![
            build("bash-5.2-1", BuildState::Complete, SRC_ID),
            build("make-4.4-2", BuildState::Complete, SRC_ID),
        ])
        .with_groups(vec![group("build", SRC_ID, &[("bash", SRC_ID), ("make", SRC_ID)])]);
    let dest = snapshot(DEST_ID)
        .with_packages(vec![pkg("perl", "carol", DEST_ID), pkg("bash", "alice", PARENT_ID)])
        .with_builds(vec![build("perl-5.38-1", BuildState::Complete, DEST_ID)])
        .with_groups(vec![
            group("build", PARENT_ID, &[("perl", PARENT_ID)]),
            group("srpm-build", DEST_ID, &[]),
        ]);
    let selection = ClassSelection::all();
    let opts = DiffOptions::default();

    let plan = compute_plan(&src, &dest, &selection, &opts);
    assert!(!plan.is_empty());
    assert_eq!(plan.config, None);

    let all: Vec<Operation> = plan.operations().cloned().collect();
    let applied = apply_ops(&dest, &src, &all);
    let again = compute_plan(&src, &applied, &selection, &opts);

    assert!(again.is_empty(), "second pass not empty: {:?}", again);
}
