//! Splitting a plan into remote round trips
//!
//! Phases follow `EntityClass::ALL`. Inside a phase operations keep their
//! plan order and are cut into chunks of at most `BatchSize` calls; each
//! chunk travels as one multicall. A size of zero sends every operation as
//! its own call.

use crate::diff::ClonePlan;
use crate::errors::SyncError;
use crate::operation::{EntityClass, Operation};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Validated batch size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    /// # Errors
    ///
    /// `SyncError::NegativeBatchSize` for any value below zero.
    pub fn new(raw: i64) -> Result<Self, SyncError> {
        usize::try_from(raw)
            .map(Self)
            .map_err(|_| SyncError::NegativeBatchSize { size: raw })
    }

    pub fn per_call() -> Self {
        Self(0)
    }

    pub fn get(&self) -> usize {
        self.0
    }

    pub fn is_per_call(&self) -> bool {
        self.0 == 0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(DEFAULT_BATCH_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// All operations in one multicall request
    Multicall,
    /// Exactly one operation as a plain call
    Single,
}

/// One round trip's worth of operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<'a> {
    pub class: EntityClass,
    pub dispatch: Dispatch,
    pub operations: &'a [Operation],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Cut `plan` into round trips, phase by phase
///
/// A phase with `M` operations yields `ceil(M / size)` multicalls, or `M`
/// single calls when `size` is zero. Empty phases yield nothing.
pub fn plan_batches(plan: &ClonePlan, size: BatchSize) -> Vec<Batch<'_>> {
    let (chunk, dispatch) = if size.is_per_call() {
        (1, Dispatch::Single)
    } else {
        (size.get(), Dispatch::Multicall)
    };

    EntityClass::ALL
        .iter()
        .flat_map(|&class| {
            plan.class(class).chunks(chunk).map(move |operations| Batch {
                class,
                dispatch,
                operations,
            })
        })
        .collect()
}
