use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tag::TagId;
use crate::ownership::{classify, Classified, Ownership};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub blocked: bool,
    pub source_tag_id: TagId,
    #[serde(default)]
    pub ownership: Ownership,
}

impl GroupMember {
    pub fn new(source_tag_id: TagId) -> Self {
        Self {
            blocked: false,
            source_tag_id,
            ownership: Ownership::default(),
        }
    }

    pub fn blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }
}

impl Classified for GroupMember {
    fn source_tag_id(&self) -> TagId {
        self.source_tag_id
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }

    fn stamp(&mut self, dest_tag_id: TagId) {
        self.ownership = classify(self.source_tag_id, dest_tag_id);
    }
}

/// A comps-style package group and its member packages
///
/// Members of a blocked group are not listed by the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub name: String,
    pub blocked: bool,
    pub source_tag_id: TagId,
    #[serde(default)]
    pub ownership: Ownership,
    pub members: BTreeMap<String, GroupMember>,
}

impl GroupEntry {
    pub fn new(name: impl Into<String>, source_tag_id: TagId) -> Self {
        Self {
            name: name.into(),
            blocked: false,
            source_tag_id,
            ownership: Ownership::default(),
            members: BTreeMap::new(),
        }
    }

    pub fn blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    pub fn with_member(mut self, name: impl Into<String>, member: GroupMember) -> Self {
        self.members.insert(name.into(), member);
        self
    }

    /// Names of members that are not blocked, in name order
    pub fn active_members(&self) -> impl Iterator<Item = (&String, &GroupMember)> {
        self.members.iter().filter(|(_, m)| !m.blocked)
    }
}

impl Classified for GroupEntry {
    fn source_tag_id(&self) -> TagId {
        self.source_tag_id
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Stamps the group and each of its members independently
    fn stamp(&mut self, dest_tag_id: TagId) {
        self.ownership = classify(self.source_tag_id, dest_tag_id);
        for member in self.members.values_mut() {
            member.stamp(dest_tag_id);
        }
    }
}
