//! NVR parsing and rpm version ordering

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::build::BuildEntry;
use crate::errors::{ExError, ExErrorKind, Result};

/// `name-version-release`, split on the last two dashes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nvr {
    pub name: String,
    pub version: String,
    pub release: String,
}

impl Nvr {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            release: release.into(),
        }
    }

    /// # Errors
    ///
    /// `InvalidInput` if any of the three parts is missing or empty.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.rsplitn(3, '-');
        let release = parts.next().unwrap_or_default();
        let version = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        if name.is_empty() || version.is_empty() || release.is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_nvr")
                .with_message(format!("invalid NVR '{}'", text)));
        }
        Ok(Self::new(name, version, release))
    }
}

impl std::fmt::Display for Nvr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.name, self.version, self.release)
    }
}

/// Compare two version (or release) strings the way rpm does
///
/// Strings are split into alternating digit and letter segments; anything
/// else separates segments. Digit segments compare numerically and beat
/// letter segments. `~` sorts before everything, including the end of the
/// string.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (mut one, mut two) = (a.as_bytes(), b.as_bytes());

    loop {
        one = skip_separators(one);
        two = skip_separators(two);

        match (one.first() == Some(&b'~'), two.first() == Some(&b'~')) {
            (true, true) => {
                one = &one[1..];
                two = &two[1..];
                continue;
            }
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        if one.is_empty() || two.is_empty() {
            break;
        }

        let numeric = one[0].is_ascii_digit();
        let seg_one = segment(one, numeric);
        let seg_two = segment(two, numeric);

        // segment types differ
        if seg_two.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ord = if numeric {
            let x = trim_zeros(seg_one);
            let y = trim_zeros(seg_two);
            x.len().cmp(&y.len()).then_with(|| x.cmp(y))
        } else {
            seg_one.cmp(seg_two)
        };
        if ord != Ordering::Equal {
            return ord;
        }

        one = &one[seg_one.len()..];
        two = &two[seg_two.len()..];
    }

    match (one.is_empty(), two.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, _) => Ordering::Greater,
    }
}

fn skip_separators(s: &[u8]) -> &[u8] {
    let n = s
        .iter()
        .take_while(|c| !c.is_ascii_alphanumeric() && **c != b'~')
        .count();
    &s[n..]
}

fn segment(s: &[u8], numeric: bool) -> &[u8] {
    let n = s
        .iter()
        .take_while(|c| {
            if numeric {
                c.is_ascii_digit()
            } else {
                c.is_ascii_alphabetic()
            }
        })
        .count();
    &s[..n]
}

fn trim_zeros(s: &[u8]) -> &[u8] {
    let n = s.iter().take_while(|c| **c == b'0').count();
    &s[n..]
}

/// Order builds by version, then release
pub fn compare_builds(a: &BuildEntry, b: &BuildEntry) -> Ordering {
    rpmvercmp(&a.version, &b.version).then_with(|| rpmvercmp(&a.release, &b.release))
}

/// Keep the highest version-release build of each package
///
/// Ties (identical version-release under different NVR text) go to the
/// lexically greater NVR so the choice is stable.
pub fn latest_per_package<'a>(builds: impl IntoIterator<Item = &'a BuildEntry>) -> Vec<BuildEntry> {
    let mut best: BTreeMap<&str, &BuildEntry> = BTreeMap::new();
    for build in builds {
        let newer = match best.get(build.package_name.as_str()) {
            Some(current) => {
                compare_builds(build, current).then_with(|| build.nvr.cmp(&current.nvr))
                    == Ordering::Greater
            }
            None => true,
        };
        if newer {
            best.insert(build.package_name.as_str(), build);
        }
    }
    best.into_values().cloned().collect()
}
