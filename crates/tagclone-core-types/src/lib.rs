//! Types shared by the tagclone error and logging facilities
//!
//! - **Correlation**: `RequestId`, `TraceId`, `RequestContext` tie every log
//!   line and error of one clone run together
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
