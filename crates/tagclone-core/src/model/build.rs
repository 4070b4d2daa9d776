use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::evr::Nvr;
use super::tag::TagId;
use crate::errors::{ExError, ExErrorKind};
use crate::ownership::{Classified, Ownership};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildState {
    Building,
    Complete,
    Deleted,
    Failed,
    Canceled,
}

impl BuildState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildState::Building => "BUILDING",
            BuildState::Complete => "COMPLETE",
            BuildState::Deleted => "DELETED",
            BuildState::Failed => "FAILED",
            BuildState::Canceled => "CANCELED",
        }
    }
}

impl FromStr for BuildState {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUILDING" => Ok(BuildState::Building),
            "COMPLETE" => Ok(BuildState::Complete),
            "DELETED" => Ok(BuildState::Deleted),
            "FAILED" => Ok(BuildState::Failed),
            "CANCELED" => Ok(BuildState::Canceled),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_build_state")
                .with_message(format!("unknown build state '{}'", other))),
        }
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A build tagged into (or inherited by) a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEntry {
    pub nvr: String,
    pub package_name: String,
    pub version: String,
    pub release: String,
    pub state: BuildState,
    pub owner: String,
    pub source_tag_id: TagId,
    pub source_tag_name: String,
    #[serde(default)]
    pub ownership: Ownership,
}

impl BuildEntry {
    pub fn new(
        nvr: &Nvr,
        state: BuildState,
        owner: impl Into<String>,
        source_tag_id: TagId,
        source_tag_name: impl Into<String>,
    ) -> Self {
        Self {
            nvr: nvr.to_string(),
            package_name: nvr.name.clone(),
            version: nvr.version.clone(),
            release: nvr.release.clone(),
            state,
            owner: owner.into(),
            source_tag_id,
            source_tag_name: source_tag_name.into(),
            ownership: Ownership::default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == BuildState::Complete
    }
}

impl Classified for BuildEntry {
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
