//! tagclone store - a local hub backed by SQLite
//!
//! Provides:
//! - SQLite schema with a migrations framework
//! - Seed format v0 parser and importer for populating a hub
//! - `SqliteHub`, an event-versioned implementation of `HubSession`

pub mod db;
pub mod errors;
pub mod hub;
pub mod migrations;
pub mod seed;

pub use errors::Result;
pub use hub::SqliteHub;
