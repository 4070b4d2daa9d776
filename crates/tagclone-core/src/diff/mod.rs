//! Tag reconciliation diff engine.
//!
//! Compares a source snapshot against a destination snapshot and produces the
//! ordered operations that make the destination see what the source sees.
//!
//! ## Entry point
//!
//! ```ignore
//! use tagclone_core::diff::{compute_plan, ClassSelection, DiffOptions};
//!
//! let plan = compute_plan(&src, &dest, &ClassSelection::all(), &DiffOptions::default());
//! ```
//!
//! ## Guarantees
//!
//! - **Ownership**: nothing stored on another tag is ever removed; inherited
//!   entries only get block records.
//! - **Idempotence**: applying a plan and diffing again yields an empty plan.
//! - **Determinism**: operations are sorted, so identical snapshots give
//!   identical plans.
//! - **Removals first**: within builds and within each group, suppressions
//!   precede additions.

pub mod engine;
pub mod model;

pub use engine::{compute_plan, diff_builds, diff_config, diff_groups, diff_packages};
pub use model::{ClassSelection, ClonePlan, DiffOptions};
