use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{BuildEntry, EventId, GroupEntry, PackageEntry, TagId, TagInfo};
use crate::ownership::Classified;

/// Read-only view of one tag at one point in time
///
/// Classes that were not fetched stay empty. Every entry's ownership is
/// stamped relative to `tag.id` on insertion; when the hub returns the same
/// key twice the first occurrence wins, matching inheritance precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tag: TagInfo,
    pub event: Option<EventId>,
    pub packages: BTreeMap<String, PackageEntry>,
    /// Keyed by NVR
    pub builds: BTreeMap<String, BuildEntry>,
    pub groups: BTreeMap<String, GroupEntry>,
}

impl Snapshot {
    pub fn empty(tag: TagInfo) -> Self {
        Self {
            tag,
            event: None,
            packages: BTreeMap::new(),
            builds: BTreeMap::new(),
            groups: BTreeMap::new(),
        }
    }

    pub fn at_event(mut self, event: Option<EventId>) -> Self {
        self.event = event;
        self
    }

    pub fn tag_id(&self) -> TagId {
        self.tag.id
    }

    pub fn with_packages(mut self, packages: impl IntoIterator<Item = PackageEntry>) -> Self {
        let id = self.tag.id;
        for entry in packages {
            insert_stamped(&mut self.packages, entry.name.clone(), entry, id);
        }
        self
    }

    pub fn with_builds(mut self, builds: impl IntoIterator<Item = BuildEntry>) -> Self {
        let id = self.tag.id;
        for entry in builds {
            insert_stamped(&mut self.builds, entry.nvr.clone(), entry, id);
        }
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = GroupEntry>) -> Self {
        let id = self.tag.id;
        for entry in groups {
            insert_stamped(&mut self.groups, entry.name.clone(), entry, id);
        }
        self
    }
}

fn insert_stamped<T: Classified>(
    map: &mut BTreeMap<String, T>,
    key: String,
    mut entry: T,
    tag_id: TagId,
) {
    if let std::collections::btree_map::Entry::Vacant(slot) = map.entry(key) {
        entry.stamp(tag_id);
        slot.insert(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GroupMember, TagConfig};
    use crate::ownership::Ownership;

    fn tag(id: TagId) -> TagInfo {
        TagInfo {
            id,
            name: format!("tag-{}", id),
            config: TagConfig::default(),
        }
    }

    #[test]
    fn test_packages_are_stamped_against_snapshot_tag() {
        let snap = Snapshot::empty(tag(2)).with_packages(vec![
            PackageEntry::new("bash", "alice", 2, "tag-2"),
            PackageEntry::new("zsh", "bob", 7, "tag-7"),
        ]);
        assert_eq!(snap.packages["bash"].ownership, Ownership::Direct);
        assert_eq!(snap.packages["zsh"].ownership, Ownership::Inherited);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let snap = Snapshot::empty(tag(2)).with_packages(vec![
            PackageEntry::new("bash", "alice", 2, "tag-2"),
            PackageEntry::new("bash", "mallory", 7, "tag-7").blocked(true),
        ]);
        assert_eq!(snap.packages["bash"].owner, "alice");
        assert!(!snap.packages["bash"].blocked);
    }

    #[test]
    fn test_group_members_stamped_independently() {
        let group = GroupEntry::new("build", 2)
            .with_member("bash", GroupMember::new(2))
            .with_member("make", GroupMember::new(7));
        let snap = Snapshot::empty(tag(2)).with_groups(vec![group]);
        let g = &snap.groups["build"];
        assert_eq!(g.ownership, Ownership::Direct);
        assert_eq!(g.members["bash"].ownership, Ownership::Direct);
        assert_eq!(g.members["make"].ownership, Ownership::Inherited);
    }
}
