//! tagclone core - tag reconciliation kernel
//!
//! This crate holds everything about cloning a tag that does not need a hub:
//! - Snapshot data model with direct/inherited ownership
//! - Diff engine producing ordered `Operation`s per entity class
//! - Batching of a plan into remote round trips
//! - Text rendering of a plan
//! - The `HubSession` trait implemented by hub backends
//! - Error and logging facilities shared by the other crates

pub mod batch;
pub mod diff;
pub mod errors;
pub mod hub;
pub mod logging_facility;
pub mod model;
pub mod operation;
pub mod ownership;
pub mod render;

pub use batch::{plan_batches, Batch, BatchSize, Dispatch};
pub use diff::{compute_plan, ClassSelection, ClonePlan, DiffOptions};
pub use errors::{ExError, ExErrorKind, RemoteFault, Result, SyncError};
pub use hub::{AsOf, CallFlags, CallResult, EventInfo, HubSession};
pub use model::{Snapshot, TagConfig, TagId, TagInfo, TagRef};
pub use operation::{Action, EntityClass, Operation};
pub use ownership::{classify, Ownership};
