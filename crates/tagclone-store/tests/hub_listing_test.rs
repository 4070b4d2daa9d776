// Read side of the SQLite hub: inheritance, visibility and history

mod common;

use common::{basic_hub, tag_id};
use tagclone_core::hub::{AsOf, CallFlags};
use tagclone_core::model::TagRef;
use tagclone_core::operation::Operation;
use tagclone_core::{ExErrorKind, HubSession};

#[test]
fn test_inherited_package_list_prefers_nearest_record() {
    // Given: f40 inherits from base and blocks gcc locally
    let hub = basic_hub("alice");
    let f40 = tag_id(&hub, "f40");
    let base = tag_id(&hub, "base");

    // When: The inherited package list is read
    let packages = hub.list_packages(f40, true, None).unwrap();

    // Then: Local records shadow the parent's, sorted by name
    let view: Vec<(&str, i64, bool)> = packages
        .iter()
        .map(|p| (p.name.as_str(), p.source_tag_id, p.blocked))
        .collect();
    assert_eq!(
        view,
        vec![
            ("bash", base, false),
            ("gcc", f40, true),
            ("make", base, false),
            ("vim", f40, false),
        ]
    );
    assert_eq!(packages[0].source_tag_name, "base");
}

#[test]
fn test_direct_package_list_ignores_parents() {
    let hub = basic_hub("alice");
    let f40 = tag_id(&hub, "f40");
    let names: Vec<String> = hub
        .list_packages(f40, false, None)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["gcc", "vim"]);
}

#[test]
fn test_builds_hide_blocked_packages_and_order_newest_first() {
    // Given: f40 tags gcc, which it also blocks
    let hub = basic_hub("alice");
    let f40 = tag_id(&hub, "f40");

    // When: The inherited build list is read
    let nvrs: Vec<String> = hub
        .list_builds(f40, true, false, None)
        .unwrap()
        .into_iter()
        .map(|b| b.nvr)
        .collect();

    // Then: gcc is hidden; own taggings precede inherited ones
    assert_eq!(
        nvrs,
        vec!["vim-9.0-1", "bash-5.2-1", "make-4.3-1", "bash-5.1-1"]
    );
}

#[test]
fn test_latest_only_keeps_highest_build_per_package() {
    let hub = basic_hub("alice");
    let f40 = tag_id(&hub, "f40");
    let nvrs: Vec<String> = hub
        .list_builds(f40, true, true, None)
        .unwrap()
        .into_iter()
        .map(|b| b.nvr)
        .collect();
    assert_eq!(nvrs, vec!["bash-5.2-1", "make-4.3-1", "vim-9.0-1"]);
}

#[test]
fn test_groups_merge_members_across_inheritance() {
    // Given: base and f40 both list the build group
    let hub = basic_hub("alice");
    let f40 = tag_id(&hub, "f40");
    let base = tag_id(&hub, "base");

    // When: f40's groups are read
    let groups = hub.list_groups(f40, None).unwrap();

    // Then: The group record is f40's and members come from both tags
    assert_eq!(groups.len(), 1);
    let build = &groups[0];
    assert_eq!(build.source_tag_id, f40);
    assert_eq!(build.members["bash"].source_tag_id, base);
    assert_eq!(build.members["gcc"].source_tag_id, f40);
    assert!(build.members["make"].blocked);
    assert_eq!(build.members["make"].source_tag_id, f40);
}

#[test]
fn test_listing_as_of_an_earlier_event() {
    // Given: A build untagged after the seed was imported
    let mut hub = basic_hub("alice");
    let f40 = tag_id(&hub, "f40");
    let before = hub.resolve_event(&AsOf::Event(1)).unwrap();
    hub.call(
        f40,
        &Operation::UntagBuild {
            nvr: "bash-5.2-1".into(),
        },
        CallFlags::default(),
    )
    .unwrap()
    .unwrap();

    // When: The listing is read now and at the import event
    let now: Vec<String> = hub
        .list_builds(f40, false, false, None)
        .unwrap()
        .into_iter()
        .map(|b| b.nvr)
        .collect();
    let then: Vec<String> = hub
        .list_builds(f40, false, false, Some(before.id))
        .unwrap()
        .into_iter()
        .map(|b| b.nvr)
        .collect();

    // Then: Only the historical view still has it
    assert!(!now.contains(&"bash-5.2-1".to_string()));
    assert!(then.contains(&"bash-5.2-1".to_string()));
}

#[test]
fn test_tag_created_later_is_absent_at_earlier_event() {
    let mut hub = basic_hub("alice");
    hub.create_tag("late", &Default::default()).unwrap();
    assert!(hub.get_tag(&TagRef::from("late"), Some(1)).unwrap().is_none());
    assert!(hub.get_tag(&TagRef::from("late"), None).unwrap().is_some());
}

#[test]
fn test_resolve_event_selectors() {
    // Given: A hub with one import event and a repo generated afterwards
    let mut hub = basic_hub("alice");
    let base = tag_id(&hub, "base");
    let repo = hub.new_repo(base).unwrap();

    // When / Then: Each selector resolves or reports NotFound
    assert_eq!(hub.resolve_event(&AsOf::Event(1)).unwrap().id, 1);
    assert_eq!(hub.resolve_event(&AsOf::Repo(repo)).unwrap().id, 2);
    assert_eq!(hub.resolve_event(&AsOf::Timestamp(f64::MAX)).unwrap().id, 2);

    let err = hub.resolve_event(&AsOf::Event(999)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    let err = hub.resolve_event(&AsOf::Timestamp(0.0)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert!(hub.resolve_event(&AsOf::Repo(repo + 1)).is_err());
}

#[test]
fn test_permissions_are_per_user() {
    let alice = basic_hub("alice");
    let bob = basic_hub("bob");
    assert!(alice.has_perm("admin").unwrap());
    assert!(!bob.has_perm("admin").unwrap());
    assert!(!bob.has_perm("tag").unwrap());
    assert!(basic_hub("carol").has_perm("tag").unwrap());
}
