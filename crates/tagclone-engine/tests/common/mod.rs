// Shared helpers for engine tests: an in-memory hub that records traffic
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use tagclone_core::hub::{AsOf, CallFlags, CallResult, EventInfo, HubSession};
use tagclone_core::model::{
    BuildEntry, BuildState, EventId, GroupEntry, GroupMember, Nvr, PackageEntry, TagConfig,
    TagId, TagInfo, TagRef,
};
use tagclone_core::operation::Operation;
use tagclone_core::{ExError, ExErrorKind, RemoteFault, Result};

pub const SRC: TagId = 1;
pub const DST: TagId = 2;
pub const PARENT: TagId = 7;

/// Hub double: listings are returned as stored, every read is logged and
/// every write is recorded instead of applied
#[derive(Default)]
pub struct FakeHub {
    pub perms: Vec<String>,
    pub tags: Vec<TagInfo>,
    pub packages: HashMap<TagId, Vec<PackageEntry>>,
    pub builds: HashMap<TagId, Vec<BuildEntry>>,
    pub groups: HashMap<TagId, Vec<GroupEntry>>,
    pub events: Vec<EventInfo>,

    /// Calls rejected with the given fault, keyed by `Operation` display
    pub faults: HashMap<String, RemoteFault>,
    /// Drop the last result of every multicall
    pub short_responses: bool,
    /// Fail every multicall as undeliverable
    pub undeliverable: bool,
    /// Fail every multicall once this many have been delivered
    pub undeliverable_after: Option<usize>,

    pub reads: RefCell<Vec<String>>,
    pub multicalls: Vec<(TagId, Vec<Operation>, CallFlags)>,
    pub created: Vec<TagInfo>,
    pub edits: Vec<(TagId, TagConfig)>,
}

impl FakeHub {
    /// A hub with a `tag`-permission user and the two tags `src` and `dst`
    pub fn new() -> Self {
        let mut hub = Self {
            perms: vec!["tag".to_string()],
            ..Self::default()
        };
        hub.tags.push(tag_info(SRC, "src"));
        hub.tags.push(tag_info(DST, "dst"));
        hub
    }

    pub fn without_dst(mut self) -> Self {
        self.tags.retain(|t| t.id != DST);
        self
    }

    pub fn with_packages(mut self, tag: TagId, packages: Vec<PackageEntry>) -> Self {
        self.packages.insert(tag, packages);
        self
    }

    pub fn with_builds(mut self, tag: TagId, builds: Vec<BuildEntry>) -> Self {
        self.builds.insert(tag, builds);
        self
    }

    pub fn with_groups(mut self, tag: TagId, groups: Vec<GroupEntry>) -> Self {
        self.groups.insert(tag, groups);
        self
    }

    pub fn tag_mut(&mut self, id: TagId) -> &mut TagInfo {
        self.tags
            .iter_mut()
            .find(|t| t.id == id)
            .expect("unknown tag")
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.borrow().clone()
    }

    pub fn sent_operations(&self) -> Vec<Operation> {
        self.multicalls
            .iter()
            .flat_map(|(_, ops, _)| ops.iter().cloned())
            .collect()
    }

    fn log(&self, entry: String) {
        self.reads.borrow_mut().push(entry);
    }
}

pub fn tag_info(id: TagId, name: &str) -> TagInfo {
    TagInfo {
        id,
        name: name.to_string(),
        config: TagConfig::default(),
    }
}

pub fn pkg(name: &str, source: TagId) -> PackageEntry {
    PackageEntry::new(name, "owner", source, format!("tag-{}", source))
}

pub fn build(nvr: &str, source: TagId) -> BuildEntry {
    let parsed = Nvr::parse(nvr).unwrap();
    BuildEntry::new(&parsed, BuildState::Complete, "builder", source, format!("tag-{}", source))
}

pub fn group(name: &str, source: TagId, members: &[(&str, TagId)]) -> GroupEntry {
    members
        .iter()
        .fold(GroupEntry::new(name, source), |g, (member, member_source)| {
            g.with_member(*member, GroupMember::new(*member_source))
        })
}

impl HubSession for FakeHub {
    fn has_perm(&self, perm: &str) -> Result<bool> {
        self.log(format!("has_perm({})", perm));
        Ok(self.perms.iter().any(|p| p == perm))
    }

    fn resolve_event(&self, as_of: &AsOf) -> Result<EventInfo> {
        self.log(format!("resolve_event({})", as_of));
        let found = match as_of {
            AsOf::Event(id) => self.events.iter().find(|e| e.id == *id),
            AsOf::Timestamp(ts) => self.events.iter().rev().find(|e| e.ts <= *ts),
            AsOf::Repo(_) => None,
        };
        found.copied().ok_or_else(|| {
            ExError::new(ExErrorKind::NotFound).with_message(format!("no event for {}", as_of))
        })
    }

    fn get_tag(&self, tag: &TagRef, event: Option<EventId>) -> Result<Option<TagInfo>> {
        self.log(format!("get_tag({}, {:?})", tag, event));
        Ok(self
            .tags
            .iter()
            .find(|t| match tag {
                TagRef::Id(id) => t.id == *id,
                TagRef::Name(name) => &t.name == name,
            })
            .cloned())
    }

    fn create_tag(&mut self, name: &str, config: &TagConfig) -> Result<TagInfo> {
        let id = self.tags.iter().map(|t| t.id).max().unwrap_or(0) + 100;
        let tag = TagInfo {
            id,
            name: name.to_string(),
            config: config.clone(),
        };
        self.tags.push(tag.clone());
        self.created.push(tag.clone());
        Ok(tag)
    }

    fn edit_tag(&mut self, tag_id: TagId, config: &TagConfig) -> Result<()> {
        self.edits.push((tag_id, config.clone()));
        Ok(())
    }

    fn list_packages(
        &self,
        tag_id: TagId,
        inherited: bool,
        event: Option<EventId>,
    ) -> Result<Vec<PackageEntry>> {
        self.log(format!("list_packages({}, {}, {:?})", tag_id, inherited, event));
        Ok(self.packages.get(&tag_id).cloned().unwrap_or_default())
    }

    fn list_builds(
        &self,
        tag_id: TagId,
        inherited: bool,
        latest_only: bool,
        event: Option<EventId>,
    ) -> Result<Vec<BuildEntry>> {
        self.log(format!(
            "list_builds({}, {}, {}, {:?})",
            tag_id, inherited, latest_only, event
        ));
        Ok(self.builds.get(&tag_id).cloned().unwrap_or_default())
    }

    fn list_groups(&self, tag_id: TagId, event: Option<EventId>) -> Result<Vec<GroupEntry>> {
        self.log(format!("list_groups({}, {:?})", tag_id, event));
        Ok(self.groups.get(&tag_id).cloned().unwrap_or_default())
    }

    fn multicall(
        &mut self,
        tag_id: TagId,
        ops: &[Operation],
        flags: CallFlags,
    ) -> Result<Vec<CallResult>> {
        let cut_off = self
            .undeliverable_after
            .is_some_and(|n| self.multicalls.len() >= n);
        if self.undeliverable || cut_off {
            return Err(ExError::new(ExErrorKind::Transport).with_message("connection reset"));
        }
        self.multicalls.push((tag_id, ops.to_vec(), flags));
        let mut results: Vec<CallResult> = ops
            .iter()
            .map(|op| match self.faults.get(&op.to_string()) {
                Some(fault) => Err(fault.clone()),
                None => Ok(()),
            })
            .collect();
        if self.short_responses {
            results.pop();
        }
        Ok(results)
    }
}
