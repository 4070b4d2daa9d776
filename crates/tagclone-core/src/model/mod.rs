//! Point-in-time view of a tag and the entries it sees
//!
//! Entries are plain data as returned by the hub; `Snapshot` stamps their
//! `Ownership` relative to the tag it was fetched for.

pub mod build;
pub mod evr;
pub mod group;
pub mod package;
pub mod snapshot;
pub mod tag;

pub use build::{BuildEntry, BuildState};
pub use evr::{compare_builds, latest_per_package, rpmvercmp, Nvr};
pub use group::{GroupEntry, GroupMember};
pub use package::PackageEntry;
pub use snapshot::Snapshot;
pub use tag::{EventId, TagConfig, TagId, TagInfo, TagRef};
