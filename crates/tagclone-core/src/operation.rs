//! Mutating operations against a destination tag
//!
//! `Operation` is the full inventory of writes the reconciliation engine can
//! emit. The destination tag id travels alongside each batch, not inside the
//! operation.

use serde::{Deserialize, Serialize};

/// One mutating hub call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// List a package on the tag with the given attributes
    AddPackage {
        package: String,
        owner: String,
        blocked: bool,
        extra_arches: Option<String>,
    },

    /// Record a local block for a package (direct or inherited)
    BlockPackage { package: String },

    AddGroup { group: String },

    /// Delete the tag's own group record
    RemoveGroup { group: String },

    BlockGroup { group: String },

    AddGroupPackage { group: String, package: String },

    /// Delete the tag's own member record
    RemoveGroupPackage { group: String, package: String },

    BlockGroupPackage { group: String, package: String },

    TagBuild { nvr: String },

    /// Remove a build tagged directly into the tag
    UntagBuild { nvr: String },
}

/// Entity class an operation belongs to; also the batching phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    Packages,
    Builds,
    Groups,
}

impl EntityClass {
    /// Phase order used when applying a plan
    pub const ALL: [EntityClass; 3] = [
        EntityClass::Packages,
        EntityClass::Builds,
        EntityClass::Groups,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityClass::Packages => "packages",
            EntityClass::Builds => "builds",
            EntityClass::Groups => "groups",
        }
    }
}

/// Kind of change, as shown in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Add,
    Block,
    Remove,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Add => "new",
            Action::Block => "blk",
            Action::Remove => "del",
        }
    }

    /// Inverse of `label`; `add` is accepted as an alias of `new`
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "new" | "add" => Some(Action::Add),
            "blk" => Some(Action::Block),
            "del" => Some(Action::Remove),
            _ => None,
        }
    }
}

impl Operation {
    pub fn class(&self) -> EntityClass {
        match self {
            Operation::AddPackage { .. } | Operation::BlockPackage { .. } => EntityClass::Packages,
            Operation::TagBuild { .. } | Operation::UntagBuild { .. } => EntityClass::Builds,
            Operation::AddGroup { .. }
            | Operation::RemoveGroup { .. }
            | Operation::BlockGroup { .. }
            | Operation::AddGroupPackage { .. }
            | Operation::RemoveGroupPackage { .. }
            | Operation::BlockGroupPackage { .. } => EntityClass::Groups,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Operation::AddPackage { .. }
            | Operation::AddGroup { .. }
            | Operation::AddGroupPackage { .. }
            | Operation::TagBuild { .. } => Action::Add,
            Operation::BlockPackage { .. }
            | Operation::BlockGroup { .. }
            | Operation::BlockGroupPackage { .. } => Action::Block,
            Operation::RemoveGroup { .. }
            | Operation::RemoveGroupPackage { .. }
            | Operation::UntagBuild { .. } => Action::Remove,
        }
    }

    /// Hub method this operation is issued as
    pub fn method(&self) -> &'static str {
        match self {
            Operation::AddPackage { .. } => "packageListAdd",
            Operation::BlockPackage { .. } => "packageListBlock",
            Operation::AddGroup { .. } => "groupListAdd",
            Operation::RemoveGroup { .. } => "groupListRemove",
            Operation::BlockGroup { .. } => "groupListBlock",
            Operation::AddGroupPackage { .. } => "groupPackageListAdd",
            Operation::RemoveGroupPackage { .. } => "groupPackageListRemove",
            Operation::BlockGroupPackage { .. } => "groupPackageListBlock",
            Operation::TagBuild { .. } => "tagBuildBypass",
            Operation::UntagBuild { .. } => "untagBuildBypass",
        }
    }

    /// Human-readable target, e.g. `bash` or `build/bash`
    pub fn subject(&self) -> String {
        match self {
            Operation::AddPackage { package, .. } | Operation::BlockPackage { package } => {
                package.clone()
            }
            Operation::AddGroup { group }
            | Operation::RemoveGroup { group }
            | Operation::BlockGroup { group } => group.clone(),
            Operation::AddGroupPackage { group, package }
            | Operation::RemoveGroupPackage { group, package }
            | Operation::BlockGroupPackage { group, package } => format!("{}/{}", group, package),
            Operation::TagBuild { nvr } | Operation::UntagBuild { nvr } => nvr.clone(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.method(), self.subject())
    }
}
