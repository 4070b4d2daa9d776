//! Direct vs inherited classification
//!
//! A record is *direct* when it is physically stored on the tag being
//! examined; only direct records may be removed in place. Anything else is
//! visible through inheritance and can only be suppressed with a block
//! record on the examined tag.

use serde::{Deserialize, Serialize};

use crate::model::TagId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    Direct,
    /// Unclassified entries default here so they are never removable
    #[default]
    Inherited,
}

impl Ownership {
    pub fn is_direct(self) -> bool {
        self == Ownership::Direct
    }
}

/// Classify a record stored on `source_tag_id` as seen from `dest_tag_id`
pub fn classify(source_tag_id: TagId, dest_tag_id: TagId) -> Ownership {
    if source_tag_id == dest_tag_id {
        Ownership::Direct
    } else {
        Ownership::Inherited
    }
}

/// An entry that records which tag physically stores it
pub trait Classified {
    fn source_tag_id(&self) -> TagId;

    /// Ownership as last stamped
    fn ownership(&self) -> Ownership;

    /// Recompute ownership relative to `dest_tag_id`
    fn stamp(&mut self, dest_tag_id: TagId);
}
