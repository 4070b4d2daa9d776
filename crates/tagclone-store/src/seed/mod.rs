//! Seed import
//!
//! Provides:
//! - Seed format v0 schema
//! - YAML parser with validation
//! - Digest canonicalization
//! - Importer that writes a seed into a hub database in one event

pub mod digest;
pub mod format_v0;
pub mod importer;
pub mod parser;

pub use digest::compute_seed_digest;
pub use format_v0::SeedV0;
pub use importer::{import_seed, import_seed_str, ImportSummary};
pub use parser::{
    parse_seed_file, parse_seed_file_with_db, parse_seed_str, parse_seed_str_with_db,
};
