//! tagclone engine - orchestration layer
//!
//! Drives a clone-tag run against any `HubSession`: fetch both snapshots,
//! compute the plan, render it, and submit it in batches.

pub mod commands;

pub use commands::apply::{apply_plan, ApplyReport, FailedOperation};
pub use commands::clone_tag::{
    clone_tag, clone_tag_with_context, CloneOptions, CloneOutcome, DestinationState,
};
pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::fetch::{fetch_snapshot, resolve_tag, FetchScope};
