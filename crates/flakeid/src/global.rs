//! Process-wide convenience generation.
//!
//! [`generate_default_id`] hands out IDs from a single generator shared by
//! the whole process. The generator is created on first use with a random
//! identity and lives until the process exits.
//!
//! # Example
//! ```rust
//! let id = flakeid::generate_default_id().unwrap();
//! assert!(id.parse::<u64>().is_ok());
//! ```

use std::sync::OnceLock;

#[cfg(feature = "tracing")]
use tracing::info;

use crate::{
    IdentityStore, LockSnowflakeGenerator, NoStore, NodeIdentity, RandSource, SystemClock,
    ThreadRandom, error::Result, id::SnowflakeId,
};

/// The deliberate process-wide singleton behind [`generate_default_id`].
///
/// Set at most once, on the first successful initialisation, and never torn
/// down. A failed initialisation leaves it empty so the next call retries.
static DEFAULT_GENERATOR: OnceLock<LockSnowflakeGenerator<SystemClock>> = OnceLock::new();

/// Creates a thread-safe generator with a randomly chosen identity.
///
/// Both identifiers are drawn uniformly from `0..=31` with the thread-local
/// RNG. Nothing is persisted: every call may pick a different identity.
///
/// # Errors
///
/// Never fails in practice; the signature carries the construction error of
/// [`NodeIdentity::new`].
pub fn random_generator() -> Result<LockSnowflakeGenerator<SystemClock>> {
    random_generator_with(&NoStore, &ThreadRandom)
}

/// Creates a thread-safe generator whose identity comes from `store`, with
/// any missing half drawn from `rng` and written back.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentity`](crate::Error::InvalidIdentity) if the
/// store holds an out-of-range value.
///
/// # Example
/// ```
/// use flakeid::{MemoryStore, ThreadRandom, random_generator_with};
///
/// let store = MemoryStore::default();
/// let first = random_generator_with(&store, &ThreadRandom).unwrap();
/// let second = random_generator_with(&store, &ThreadRandom).unwrap();
/// assert_eq!(first.identity(), second.identity());
/// ```
pub fn random_generator_with(
    store: &impl IdentityStore,
    rng: &impl RandSource,
) -> Result<LockSnowflakeGenerator<SystemClock>> {
    let identity = NodeIdentity::resolve(store, rng)?;
    Ok(LockSnowflakeGenerator::with_time(identity, SystemClock))
}

/// Returns the process-wide generator, creating it on first use.
///
/// # Errors
///
/// Propagates the construction error of [`random_generator`].
pub fn default_generator() -> Result<&'static LockSnowflakeGenerator<SystemClock>> {
    if let Some(generator) = DEFAULT_GENERATOR.get() {
        return Ok(generator);
    }

    // Racing initialisers may both build a generator; only one is kept and
    // the loser never issued an ID.
    let candidate = random_generator()?;
    Ok(DEFAULT_GENERATOR.get_or_init(|| {
        #[cfg(feature = "tracing")]
        info!(
            worker_id = candidate.identity().worker_id(),
            datacenter_id = candidate.identity().datacenter_id(),
            "initialised default snowflake generator"
        );
        candidate
    }))
}

/// Generates an ID from the process-wide generator as a decimal string.
///
/// # Errors
///
/// Propagates errors from [`default_generator`] and
/// [`LockSnowflakeGenerator::next_id`] unmodified, e.g.
/// [`Error::ClockMovedBackwards`](crate::Error::ClockMovedBackwards).
pub fn generate_default_id() -> Result<String> {
    default_id().map(|id| id.to_string())
}

/// Generates an ID from the process-wide generator.
///
/// # Errors
///
/// Same as [`generate_default_id`].
pub fn default_id() -> Result<SnowflakeId> {
    default_generator()?.next_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::collections::HashSet;

    #[test]
    fn default_ids_are_unique_and_share_one_identity() {
        let ids: Vec<SnowflakeId> = (0..10_000)
            .map(|_| generate_default_id().unwrap().parse().unwrap())
            .collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let identity = default_generator().unwrap().identity();
        for id in &ids {
            assert_eq!(id.worker_id(), u64::from(identity.worker_id()));
            assert_eq!(id.datacenter_id(), u64::from(identity.datacenter_id()));
        }
    }

    #[test]
    fn default_generator_is_a_singleton() {
        let a = default_generator().unwrap();
        let b = default_generator().unwrap();
        assert!(core::ptr::eq(a, b));
    }

    #[test]
    fn racing_initialisers_settle_on_one_generator() {
        let threads = num_cpus::get().clamp(2, 8);
        let barrier = std::sync::Barrier::new(threads);

        let generators: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        let generator = default_generator().unwrap();
                        core::ptr::from_ref(generator) as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = generators[0];
        assert!(generators.iter().all(|&g| g == first));
        assert_eq!(first, core::ptr::from_ref(default_generator().unwrap()) as usize);
    }

    #[test]
    fn random_generator_persists_through_store() {
        let store = MemoryStore::default();
        let generator = random_generator_with(&store, &ThreadRandom).unwrap();
        let identity = generator.identity();

        assert_eq!(
            store.get(crate::IdentityKey::WorkerId),
            Some(i64::from(identity.worker_id()))
        );
        assert_eq!(
            store.get(crate::IdentityKey::DatacenterId),
            Some(i64::from(identity.datacenter_id()))
        );
    }

    #[test]
    fn random_generator_produces_valid_ids() {
        let generator = random_generator().unwrap();
        let id = generator.next_id().unwrap();
        assert_eq!(id.worker_id(), u64::from(generator.identity().worker_id()));
        assert!(id.sequence() <= SnowflakeId::max_sequence());
    }
}
