use crate::RandSource;
use rand::{Rng, rng};

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is cryptographically secure (ChaCha-based) and automatically
/// reseeded periodically.
///
/// ⚠️ NOTE: The underlying `ThreadRng` is not `Send` or `Sync`. This type does
/// not store it; it reaches the thread-local generator on each call, so it
/// may be freely shared across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
