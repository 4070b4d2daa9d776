//! Seed format v0
//!
//! YAML description of hub content: users with permissions, builds, and tags
//! with their inheritance, package lists, tagged builds and groups.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedV0 {
    /// Must be 0 for this format
    pub schema_version: u32,

    #[serde(default)]
    pub users: Vec<SeedUser>,

    #[serde(default)]
    pub builds: Vec<SeedBuild>,

    #[serde(default)]
    pub tags: Vec<SeedTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub name: String,
    #[serde(default)]
    pub perms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedBuild {
    pub package: String,
    pub version: String,
    pub release: String,
    #[serde(default = "default_state")]
    pub state: String,
    pub owner: String,
}

fn default_state() -> String {
    "COMPLETE".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedTag {
    pub name: String,
    #[serde(default)]
    pub arches: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub perm: Option<String>,
    #[serde(default)]
    pub maven_support: bool,
    #[serde(default)]
    pub maven_include_all: bool,

    #[serde(default)]
    pub parents: Vec<SeedParent>,

    #[serde(default)]
    pub packages: Vec<SeedPackage>,

    /// NVRs, tagged in list order
    #[serde(default)]
    pub builds: Vec<String>,

    #[serde(default)]
    pub groups: Vec<SeedGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedParent {
    pub name: String,
    #[serde(default)]
    pub priority: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPackage {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub extra_arches: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedGroup {
    pub name: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub packages: Vec<SeedGroupPackage>,
}

/// Group member; a bare string is shorthand for an unblocked member
#[derive(Debug, Clone, Serialize)]
pub struct SeedGroupPackage {
    pub name: String,
    pub blocked: bool,
}

impl<'de> Deserialize<'de> for SeedGroupPackage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct MemberVisitor;

        impl<'de> Visitor<'de> for MemberVisitor {
            type Value = SeedGroupPackage;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a package name or a map with 'name' and 'blocked'")
            }

            fn visit_str<E>(self, value: &str) -> Result<SeedGroupPackage, E>
            where
                E: de::Error,
            {
                Ok(SeedGroupPackage {
                    name: value.to_string(),
                    blocked: false,
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<SeedGroupPackage, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                let mut name = None;
                let mut blocked = false;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "blocked" => blocked = map.next_value()?,
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                let name = name.ok_or_else(|| de::Error::missing_field("name"))?;
                Ok(SeedGroupPackage { name, blocked })
            }
        }

        deserializer.deserialize_any(MemberVisitor)
    }
}
