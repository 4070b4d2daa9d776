//! Command orchestration layer.
//!
//! Operation boundaries log through `log_op_start!` / `log_op_end!` /
//! `log_op_error!`; stages below use `tracing::debug!` only.

pub mod apply;
pub mod clone_tag;
pub mod engine_command;
pub mod fetch;
