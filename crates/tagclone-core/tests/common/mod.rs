use tagclone_core::model::{
    BuildEntry, BuildState, GroupEntry, GroupMember, Nvr, PackageEntry, Snapshot, TagConfig,
    TagId, TagInfo,
};
use tagclone_core::ownership::{Classified, Ownership};
use tagclone_core::Operation;

#[allow(dead_code)]
pub const SRC_ID: TagId = 1;
#[allow(dead_code)]
pub const DEST_ID: TagId = 2;
/// Ancestor of the destination
#[allow(dead_code)]
pub const PARENT_ID: TagId = 7;

#[allow(dead_code)]
pub fn tag(id: TagId) -> TagInfo {
    TagInfo {
        id,
        name: format!("tag-{}", id),
        config: TagConfig::default(),
    }
}

#[allow(dead_code)]
pub fn snapshot(id: TagId) -> Snapshot {
    Snapshot::empty(tag(id))
}

#[allow(dead_code)]
pub fn pkg(name: &str, owner: &str, source: TagId) -> PackageEntry {
    PackageEntry::new(name, owner, source, format!("tag-{}", source))
}

#[allow(dead_code)]
pub fn build(nvr: &str, state: BuildState, source: TagId) -> BuildEntry {
    let nvr = Nvr::parse(nvr).unwrap();
    BuildEntry::new(&nvr, state, "builder", source, format!("tag-{}", source))
}

/// Group stored on `source` whose members are stored on the given tags
#[allow(dead_code)]
pub fn group(name: &str, source: TagId, members: &[(&str, TagId)]) -> GroupEntry {
    members
        .iter()
        .fold(GroupEntry::new(name, source), |g, (member, member_source)| {
            g.with_member(*member, GroupMember::new(*member_source))
        })
}

/// Apply `ops` to `dest` the way a hub would, returning the new view
///
/// Panics when asked to remove a record the destination does not own, or to
/// touch an entry that is not there, so misuse surfaces as a test failure.
#[allow(dead_code)]
pub fn apply_ops(dest: &Snapshot, src: &Snapshot, ops: &[Operation]) -> Snapshot {
    let id = dest.tag_id();
    let name = dest.tag.name.clone();
    let mut next = dest.clone();

    for op in ops {
        match op {
            Operation::AddPackage {
                package,
                owner,
                blocked,
                extra_arches,
            } => {
                let mut entry =
                    PackageEntry::new(package.as_str(), owner.as_str(), id, name.as_str())
                        .blocked(*blocked);
                entry.extra_arches = extra_arches.clone();
                entry.stamp(id);
                next.packages.insert(package.clone(), entry);
            }
            Operation::BlockPackage { package } => {
                let entry = next.packages.get_mut(package).expect("block of unseen package");
                entry.blocked = true;
                entry.source_tag_id = id;
                entry.stamp(id);
            }
            Operation::TagBuild { nvr } => {
                let mut entry = src.builds[nvr].clone();
                entry.source_tag_id = id;
                entry.source_tag_name = name.clone();
                entry.stamp(id);
                next.builds.insert(nvr.clone(), entry);
            }
            Operation::UntagBuild { nvr } => {
                let entry = next.builds.remove(nvr).expect("untag of unseen build");
                assert_eq!(entry.ownership, Ownership::Direct, "untag of inherited {}", nvr);
            }
            Operation::AddGroup { group } => {
                let mut entry = GroupEntry::new(group.as_str(), id);
                entry.stamp(id);
                next.groups.insert(group.clone(), entry);
            }
            Operation::RemoveGroup { group } => {
                let entry = next.groups.remove(group).expect("remove of unseen group");
                assert_eq!(entry.ownership, Ownership::Direct, "remove of inherited {}", group);
            }
            Operation::BlockGroup { group } => {
                let mut entry = GroupEntry::new(group.as_str(), id).blocked(true);
                entry.stamp(id);
                next.groups.insert(group.clone(), entry);
            }
            Operation::AddGroupPackage { group, package } => {
                let entry = next.groups.get_mut(group).expect("member add to unseen group");
                assert!(!entry.blocked);
                let mut member = GroupMember::new(id);
                member.stamp(id);
                entry.members.insert(package.clone(), member);
            }
            Operation::RemoveGroupPackage { group, package } => {
                let entry = next.groups.get_mut(group).expect("member remove in unseen group");
                let member = entry.members.remove(package).expect("remove of unseen member");
                assert_eq!(member.ownership, Ownership::Direct);
            }
            Operation::BlockGroupPackage { group, package } => {
                let entry = next.groups.get_mut(group).expect("member block in unseen group");
                let mut member = GroupMember::new(id).blocked(true);
                member.stamp(id);
                entry.members.insert(package.clone(), member);
            }
        }
    }
    next
}
