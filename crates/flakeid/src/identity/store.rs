use core::fmt;

use crate::mutex::{Mutex, lock_unpoisoned};

/// The keys an [`IdentityStore`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    /// Persisted under `workerId`.
    WorkerId,
    /// Persisted under `datacenterId`.
    DatacenterId,
}

impl IdentityKey {
    /// The key name used by persistent stores.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WorkerId => "workerId",
            Self::DatacenterId => "datacenterId",
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A small key-value capability for keeping a node identity across runs.
///
/// Stores hold raw integers; validation happens when the identity is built,
/// so a corrupt store surfaces as
/// [`Error::InvalidIdentity`](crate::Error::InvalidIdentity).
///
/// Implementations are best effort. A store that cannot be read reports the
/// key as missing, and a failed write is dropped. No atomicity is assumed
/// across the two keys.
pub trait IdentityStore {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: IdentityKey) -> Option<i64>;

    /// Stores `value` under `key`.
    fn set(&self, key: IdentityKey, value: i64);
}

impl<S: IdentityStore + ?Sized> IdentityStore for &S {
    fn get(&self, key: IdentityKey) -> Option<i64> {
        (**self).get(key)
    }

    fn set(&self, key: IdentityKey, value: i64) {
        (**self).set(key, value);
    }
}

/// The absent store: nothing is remembered, every lookup misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStore;

impl IdentityStore for NoStore {
    fn get(&self, _key: IdentityKey) -> Option<i64> {
        None
    }

    fn set(&self, _key: IdentityKey, _value: i64) {}
}

/// A process-local store, useful in tests and for sharing one identity
/// between several generators.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<[Option<i64>; 2]>,
}

impl MemoryStore {
    const fn slot(key: IdentityKey) -> usize {
        match key {
            IdentityKey::WorkerId => 0,
            IdentityKey::DatacenterId => 1,
        }
    }
}

impl IdentityStore for MemoryStore {
    fn get(&self, key: IdentityKey) -> Option<i64> {
        lock_unpoisoned(&self.slots)[Self::slot(key)]
    }

    fn set(&self, key: IdentityKey, value: i64) {
        lock_unpoisoned(&self.slots)[Self::slot(key)] = Some(value);
    }
}
