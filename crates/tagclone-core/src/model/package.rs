use serde::{Deserialize, Serialize};

use super::tag::TagId;
use crate::ownership::{Classified, Ownership};

/// A package listing visible in a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    pub owner: String,
    pub blocked: bool,
    pub extra_arches: Option<String>,
    /// Tag the listing is physically stored on
    pub source_tag_id: TagId,
    pub source_tag_name: String,
    #[serde(default)]
    pub ownership: Ownership,
}

impl PackageEntry {
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        source_tag_id: TagId,
        source_tag_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            blocked: false,
            extra_arches: None,
            source_tag_id,
            source_tag_name: source_tag_name.into(),
            ownership: Ownership::default(),
        }
    }

    pub fn blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    pub fn with_extra_arches(mut self, arches: impl Into<String>) -> Self {
        self.extra_arches = Some(arches.into());
        self
    }
}

impl Classified for PackageEntry {
    fn source_tag_id(&self) -> TagId {
        self.source_tag_id
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }

    fn stamp(&mut self, dest_tag_id: TagId) {
        self.ownership = crate::ownership::classify(self.source_tag_id, dest_tag_id);
    }
}
