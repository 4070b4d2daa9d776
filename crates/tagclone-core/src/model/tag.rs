use serde::{Deserialize, Serialize};

/// Numeric tag identifier assigned by the hub
pub type TagId = i64;

/// Hub event identifier; every mutation is stamped with one
pub type EventId = i64;

/// Scalar configuration of a tag, copied when a destination is created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    /// Space separated arch list
    pub arches: Option<String>,
    pub locked: bool,
    /// Permission required to modify the tag
    pub perm: Option<String>,
    pub maven_support: bool,
    pub maven_include_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub id: TagId,
    pub name: String,
    #[serde(flatten)]
    pub config: TagConfig,
}

impl TagInfo {
    /// Placeholder for a destination that will be created on apply
    ///
    /// Id 0 is never assigned by the hub, so nothing fetched classifies as
    /// direct against it.
    pub fn planned(name: impl Into<String>, config: TagConfig) -> Self {
        Self {
            id: 0,
            name: name.into(),
            config,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.config.locked
    }
}

/// How a caller names a tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagRef {
    Id(TagId),
    Name(String),
}

impl From<&str> for TagRef {
    fn from(name: &str) -> Self {
        TagRef::Name(name.to_string())
    }
}

impl From<String> for TagRef {
    fn from(name: String) -> Self {
        TagRef::Name(name)
    }
}

impl From<TagId> for TagRef {
    fn from(id: TagId) -> Self {
        TagRef::Id(id)
    }
}

impl std::fmt::Display for TagRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagRef::Id(id) => write!(f, "#{}", id),
            TagRef::Name(name) => f.write_str(name),
        }
    }
}
