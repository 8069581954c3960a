use core::fmt;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Which half of a node identity failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentityField {
    /// The worker (process/node) identifier.
    Worker,
    /// The datacenter (cluster/site) identifier.
    Datacenter,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Worker => f.write_str("workerId"),
            Self::Datacenter => f.write_str("datacenterId"),
        }
    }
}

/// All error variants that `flakeid` can emit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A worker or datacenter identifier was outside `0..=31`.
    ///
    /// Raised once, at construction. The generator is never created.
    #[error("{field} must be between 0 and 31 (got {value})")]
    InvalidIdentity {
        /// The field that failed validation.
        field: IdentityField,
        /// The rejected value.
        value: i64,
    },

    /// The clock reported a time earlier than the last generated ID.
    ///
    /// The generator state is left untouched; callers may wait `millis` and
    /// try again.
    #[error("clock moved backwards, refusing to generate id for {millis} milliseconds")]
    ClockMovedBackwards {
        /// Size of the backward jump in milliseconds.
        millis: u64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is never produced.
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// A string could not be parsed as a decimal `u64` identifier.
    #[error("invalid snowflake id {input:?}")]
    InvalidId {
        /// The rejected input.
        input: String,
    },
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};

#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
