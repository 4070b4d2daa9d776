// Shared fixtures for store integration tests
#![allow(dead_code)]

use std::path::PathBuf;

use tagclone_core::model::{TagId, TagRef};
use tagclone_core::HubSession;
use tagclone_store::db::open_hub_in_memory;
use tagclone_store::seed::import_seed;
use tagclone_store::SqliteHub;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// In-memory hub loaded with `hub_basic.yaml`, acting as `user`
pub fn basic_hub(user: &str) -> SqliteHub {
    let mut conn = open_hub_in_memory().unwrap();
    import_seed(&fixtures_dir().join("hub_basic.yaml"), &mut conn).unwrap();
    SqliteHub::new(conn, user)
}

pub fn tag_id(hub: &SqliteHub, name: &str) -> TagId {
    hub.get_tag(&TagRef::from(name), None)
        .unwrap()
        .unwrap_or_else(|| panic!("tag {} missing", name))
        .id
}

pub fn event_count(hub: &SqliteHub) -> i64 {
    hub.connection()
        .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
        .unwrap()
}
