use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    generator::{GeneratorState, Poll, SnowflakeGenerator},
    id::SnowflakeId,
    identity::NodeIdentity,
    mutex::{Mutex, MutexGuard},
    time::{SystemClock, TimeSource},
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// This generator wraps its state in an [`Arc<Mutex<_>>`], allowing safe
/// shared use across threads. Clones share the same state.
///
/// The clock is read *inside* the lock, so the comparison against the last
/// timestamp, the state update and the composition of the ID happen as one
/// step. IDs handed out across all threads are therefore unique and, in lock
/// order, strictly increasing.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
pub struct LockSnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    pub(crate) identity: NodeIdentity,
    pub(crate) state: Arc<Mutex<GeneratorState>>,
    pub(crate) time: T,
}

impl<T> Clone for LockSnowflakeGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            identity: self.identity,
            state: Arc::clone(&self.state),
            time: self.time.clone(),
        }
    }
}

impl LockSnowflakeGenerator<SystemClock> {
    /// Creates a thread-safe generator on the system clock after validating
    /// both identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `worker_id` or `datacenter_id`
    /// is outside `0..=31`.
    ///
    /// # Example
    /// ```
    /// use flakeid::LockSnowflakeGenerator;
    ///
    /// let generator = LockSnowflakeGenerator::new(5, 10).unwrap();
    ///
    /// std::thread::scope(|s| {
    ///     for _ in 0..4 {
    ///         s.spawn(|| generator.next_id().unwrap());
    ///     }
    /// });
    /// ```
    ///
    /// [`Error::InvalidIdentity`]: crate::Error::InvalidIdentity
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self> {
        let identity = NodeIdentity::new(worker_id, datacenter_id)?;
        Ok(Self::with_time(identity, SystemClock))
    }
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `identity` that reads time from `time`.
    pub fn with_time(identity: NodeIdentity, time: T) -> Self {
        Self::from_state(identity, GeneratorState::default(), time)
    }

    /// Creates a generator from an explicit state.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::with_time`].
    pub fn from_state(identity: NodeIdentity, state: GeneratorState, time: T) -> Self {
        Self {
            identity,
            state: Arc::new(Mutex::new(state)),
            time,
        }
    }

    /// The identity stamped into every ID.
    pub fn identity(&self) -> NodeIdentity {
        self.identity
    }

    fn lock(&self) -> Result<MutexGuard<'_, GeneratorState>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    /// Generates the next ID.
    ///
    /// When 4096 IDs have already been issued in the current millisecond this
    /// spins, holding the lock, until the clock moves on.
    ///
    /// # Errors
    /// - [`Error::ClockMovedBackwards`] if the clock reads earlier than the
    ///   last issued ID. The state is left untouched.
    /// - [`Error::LockPoisoned`] if the underlying lock has been poisoned.
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.lock()?;
        state.next(&self.time, self.identity)
    }

    /// Attempts to generate the next ID without blocking on an exhausted
    /// sequence.
    ///
    /// # Errors
    /// - [`Error::ClockMovedBackwards`] if the clock reads earlier than the
    ///   last issued ID.
    /// - [`Error::LockPoisoned`] if the underlying lock has been poisoned.
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<Poll> {
        let mut state = self.lock()?;
        state.poll(self.time.current_millis(), self.identity)
    }

    /// Returns a copy of the current state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the underlying lock has been
    /// poisoned.
    ///
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    pub fn snapshot(&self) -> Result<GeneratorState> {
        Ok(*self.lock()?)
    }
}

impl<T> SnowflakeGenerator<T> for LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn with_time(identity: NodeIdentity, time: T) -> Self {
        Self::with_time(identity, time)
    }

    fn identity(&self) -> NodeIdentity {
        self.identity()
    }

    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }

    fn poll_id(&self) -> Result<Poll> {
        self.poll_id()
    }

    fn snapshot(&self) -> Result<GeneratorState> {
        self.snapshot()
    }
}
