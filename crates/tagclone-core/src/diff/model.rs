//! Plan types produced by the diff engine.

use serde::{Deserialize, Serialize};

use crate::model::TagConfig;
use crate::operation::{EntityClass, Operation};

/// Which parts of a tag a run touches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSelection {
    /// Copy scalar tag configuration (and allow creating the destination)
    pub config: bool,
    pub packages: bool,
    pub builds: bool,
    pub groups: bool,
}

impl ClassSelection {
    pub fn all() -> Self {
        Self {
            config: true,
            packages: true,
            builds: true,
            groups: true,
        }
    }

    pub fn includes(&self, class: EntityClass) -> bool {
        match class {
            EntityClass::Packages => self.packages,
            EntityClass::Builds => self.builds,
            EntityClass::Groups => self.groups,
        }
    }
}

/// Knobs that change what the diff emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Suppress destination-only direct entries; inherited groups and
    /// members are blocked regardless
    pub delete: bool,
    /// Reduce source builds to the highest version-release per package
    pub latest_only: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            delete: true,
            latest_only: false,
        }
    }
}

/// Everything a run intends to change on the destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonePlan {
    pub packages: Vec<Operation>,
    pub builds: Vec<Operation>,
    pub groups: Vec<Operation>,
    /// New scalar configuration, when it differs from the destination's
    pub config: Option<TagConfig>,
}

impl ClonePlan {
    pub fn class(&self, class: EntityClass) -> &[Operation] {
        match class {
            EntityClass::Packages => &self.packages,
            EntityClass::Builds => &self.builds,
            EntityClass::Groups => &self.groups,
        }
    }

    /// All operations in phase order
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.packages
            .iter()
            .chain(self.builds.iter())
            .chain(self.groups.iter())
    }

    pub fn operation_count(&self) -> usize {
        self.packages.len() + self.builds.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operation_count() == 0 && self.config.is_none()
    }
}
