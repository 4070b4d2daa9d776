//! Structured logging facility for tagclone
//!
//! - One initialization point, `init(profile)`
//! - Boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) that stamp
//!   the canonical `component`/`op`/`event` fields
//! - An in-memory capture layer for asserting on log output in tests
//!
//! # Usage
//!
//! ```rust
//! use tagclone_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
