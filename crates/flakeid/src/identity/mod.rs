//! Node identity: the worker/datacenter pair stamped into every ID.
//!
//! How a node learns its identity is up to the caller. It can be passed in
//! explicitly, drawn at random, or read back from an [`IdentityStore`] so
//! that the same host keeps the same identity across runs.

#[cfg(feature = "file-store")]
mod file;
mod store;

#[cfg(feature = "file-store")]
pub use file::*;
pub use store::*;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::{
    RandSource,
    error::{Error, IdentityField, Result},
};

/// A validated `(worker_id, datacenter_id)` pair, both in `0..=31`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeIdentity {
    worker_id: u8,
    datacenter_id: u8,
}

impl NodeIdentity {
    /// Largest worker ID that fits the 5-bit field.
    pub const MAX_WORKER_ID: i64 = 31;

    /// Largest datacenter ID that fits the 5-bit field.
    pub const MAX_DATACENTER_ID: i64 = 31;

    /// Validates both identifiers.
    ///
    /// The worker ID is checked first, then the datacenter ID, each
    /// independently, so the error names the field at fault.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if either value is outside `0..=31`.
    ///
    /// # Example
    /// ```
    /// use flakeid::{Error, IdentityField, NodeIdentity};
    ///
    /// let identity = NodeIdentity::new(5, 10).unwrap();
    /// assert_eq!(identity.worker_id(), 5);
    ///
    /// assert_eq!(
    ///     NodeIdentity::new(5, 32),
    ///     Err(Error::InvalidIdentity { field: IdentityField::Datacenter, value: 32 })
    /// );
    /// ```
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self> {
        let worker_id = Self::check(IdentityField::Worker, worker_id, Self::MAX_WORKER_ID)?;
        let datacenter_id = Self::check(
            IdentityField::Datacenter,
            datacenter_id,
            Self::MAX_DATACENTER_ID,
        )?;
        Ok(Self {
            worker_id,
            datacenter_id,
        })
    }

    fn check(field: IdentityField, value: i64, max: i64) -> Result<u8> {
        if (0..=max).contains(&value) {
            // `max` is 31, so the cast cannot truncate
            Ok(value as u8)
        } else {
            Err(Error::InvalidIdentity { field, value })
        }
    }

    /// Picks both identifiers uniformly in `0..=31`.
    pub fn random(rng: &impl RandSource) -> Self {
        Self {
            worker_id: random_field(rng) as u8,
            datacenter_id: random_field(rng) as u8,
        }
    }

    /// Reads the identity back from `store`, filling in whatever is missing.
    ///
    /// Each key is handled on its own: a stored value is reused, a missing
    /// one is drawn from `rng` and written back so later calls see it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if the store holds an out-of-range
    /// value.
    pub fn resolve(store: &impl IdentityStore, rng: &impl RandSource) -> Result<Self> {
        let worker_id = resolve_key(store, rng, IdentityKey::WorkerId);
        let datacenter_id = resolve_key(store, rng, IdentityKey::DatacenterId);
        Self::new(worker_id, datacenter_id)
    }

    /// The worker identifier.
    pub const fn worker_id(&self) -> u8 {
        self.worker_id
    }

    /// The datacenter identifier.
    pub const fn datacenter_id(&self) -> u8 {
        self.datacenter_id
    }
}

fn random_field(rng: &impl RandSource) -> i64 {
    // 32 divides 2^64, so masking keeps the draw uniform
    (rng.rand() & 31) as i64
}

fn resolve_key(store: &impl IdentityStore, rng: &impl RandSource, key: IdentityKey) -> i64 {
    match store.get(key) {
        Some(value) => value,
        None => {
            let value = random_field(rng);
            #[cfg(feature = "tracing")]
            debug!(%key, value, "assigning random node identity");
            store.set(key, value);
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct CountingRand {
        next: Cell<u64>,
    }

    impl RandSource for CountingRand {
        fn rand(&self) -> u64 {
            let value = self.next.get();
            self.next.set(value + 1);
            value
        }
    }

    #[test]
    fn accepts_every_valid_pair() {
        let mut count = 0;
        for worker_id in 0..=31 {
            for datacenter_id in 0..=31 {
                let identity = NodeIdentity::new(worker_id, datacenter_id).unwrap();
                assert_eq!(i64::from(identity.worker_id()), worker_id);
                assert_eq!(i64::from(identity.datacenter_id()), datacenter_id);
                count += 1;
            }
        }
        assert_eq!(count, 1024);
    }

    #[test]
    fn rejects_out_of_range_values_per_field() {
        for bad in [-1, 32, i64::MIN, i64::MAX] {
            assert_eq!(
                NodeIdentity::new(bad, 0),
                Err(Error::InvalidIdentity {
                    field: IdentityField::Worker,
                    value: bad,
                })
            );
            assert_eq!(
                NodeIdentity::new(0, bad),
                Err(Error::InvalidIdentity {
                    field: IdentityField::Datacenter,
                    value: bad,
                })
            );
        }
    }

    #[test]
    fn worker_is_checked_before_datacenter() {
        assert_eq!(
            NodeIdentity::new(-1, 32),
            Err(Error::InvalidIdentity {
                field: IdentityField::Worker,
                value: -1,
            })
        );
    }

    #[test]
    fn random_identity_stays_in_range() {
        let rng = CountingRand {
            next: Cell::new(u64::MAX - 100),
        };
        for _ in 0..40 {
            let identity = NodeIdentity::random(&rng);
            assert!(identity.worker_id() <= 31);
            assert!(identity.datacenter_id() <= 31);
        }
    }

    #[test]
    fn resolve_fills_missing_keys_and_persists_them() {
        let store = MemoryStore::default();
        store.set(IdentityKey::DatacenterId, 7);
        let rng = CountingRand {
            next: Cell::new(35),
        };

        let identity = NodeIdentity::resolve(&store, &rng).unwrap();
        assert_eq!(identity.worker_id(), 3);
        assert_eq!(identity.datacenter_id(), 7);
        assert_eq!(store.get(IdentityKey::WorkerId), Some(3));

        // A second resolve reuses the stored pair instead of drawing again
        let again = NodeIdentity::resolve(&store, &rng).unwrap();
        assert_eq!(again, identity);
        assert_eq!(rng.next.get(), 36);
    }

    #[test]
    fn resolve_rejects_corrupt_stored_values() {
        let store = MemoryStore::default();
        store.set(IdentityKey::WorkerId, 99);
        store.set(IdentityKey::DatacenterId, 1);
        let rng = CountingRand { next: Cell::new(0) };

        assert_eq!(
            NodeIdentity::resolve(&store, &rng),
            Err(Error::InvalidIdentity {
                field: IdentityField::Worker,
                value: 99,
            })
        );
    }

    #[test]
    fn resolve_without_store_draws_fresh_values() {
        let rng = CountingRand { next: Cell::new(4) };
        let first = NodeIdentity::resolve(&NoStore, &rng).unwrap();
        let second = NodeIdentity::resolve(&NoStore, &rng).unwrap();
        assert_eq!((first.worker_id(), first.datacenter_id()), (4, 5));
        assert_eq!((second.worker_id(), second.datacenter_id()), (6, 7));
    }
}
