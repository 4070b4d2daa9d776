//! Seed digest canonicalization
//!
//! Two seeds describing the same content in a different order share a digest.

use crate::seed::format_v0::SeedV0;
use sha2::{Digest, Sha256};

/// Hex SHA256 over the seed with every list sorted by name
pub fn compute_seed_digest(seed: &SeedV0) -> String {
    let mut canonical = seed.clone();
    canonical.users.sort_by(|a, b| a.name.cmp(&b.name));
    for user in &mut canonical.users {
        user.perms.sort();
    }
    canonical.builds.sort_by(|a, b| {
        (&a.package, &a.version, &a.release).cmp(&(&b.package, &b.version, &b.release))
    });
    canonical.tags.sort_by(|a, b| a.name.cmp(&b.name));
    for tag in &mut canonical.tags {
        tag.parents.sort_by(|a, b| a.name.cmp(&b.name));
        tag.packages.sort_by(|a, b| a.name.cmp(&b.name));
        tag.groups.sort_by(|a, b| a.name.cmp(&b.name));
        for group in &mut tag.groups {
            group.packages.sort_by(|a, b| a.name.cmp(&b.name));
        }
        // Tagging order is content: it decides which build is newest
    }

    // Serializing plain structs of strings and bools cannot fail
    let json = serde_json::to_string(&canonical).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}
