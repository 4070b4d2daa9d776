//! Migration framework
//!
//! Embedded SQL migrations applied in order, each recorded with a checksum.
//! Re-running is a no-op; an applied migration whose SQL changed is refused.

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
