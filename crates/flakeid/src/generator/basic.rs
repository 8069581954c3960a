use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    generator::{GeneratorState, Poll, SnowflakeGenerator},
    id::SnowflakeId,
    identity::NodeIdentity,
    time::{SystemClock, TimeSource},
};

/// A non-concurrent Snowflake ID generator suitable for single-threaded
/// environments.
///
/// This generator is lightweight and fast, but **not thread-safe**.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ No locking on the hot path
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct BasicSnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    identity: NodeIdentity,
    state: Cell<GeneratorState>,
    time: T,
}

impl BasicSnowflakeGenerator<SystemClock> {
    /// Creates a generator on the system clock after validating both
    /// identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `worker_id` or `datacenter_id`
    /// is outside `0..=31`.
    ///
    /// # Example
    /// ```
    /// use flakeid::BasicSnowflakeGenerator;
    ///
    /// let generator = BasicSnowflakeGenerator::new(5, 10).unwrap();
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.worker_id(), 5);
    /// assert_eq!(id.datacenter_id(), 10);
    /// ```
    ///
    /// [`Error::InvalidIdentity`]: crate::Error::InvalidIdentity
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self> {
        let identity = NodeIdentity::new(worker_id, datacenter_id)?;
        Ok(Self::with_time(identity, SystemClock))
    }
}

impl<T> BasicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `identity` that reads time from `time`.
    pub fn with_time(identity: NodeIdentity, time: T) -> Self {
        Self::from_state(identity, GeneratorState::default(), time)
    }

    /// Creates a generator from an explicit state.
    ///
    /// This constructor is primarily useful for advanced use cases such as
    /// restoring state from persistent storage or controlling the starting
    /// point of the generator manually.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::with_time`].
    pub fn from_state(identity: NodeIdentity, state: GeneratorState, time: T) -> Self {
        Self {
            identity,
            state: Cell::new(state),
            time,
        }
    }

    /// The identity stamped into every ID.
    pub fn identity(&self) -> NodeIdentity {
        self.identity
    }

    /// Generates the next ID.
    ///
    /// When 4096 IDs have already been issued in the current millisecond this
    /// spins until the clock moves on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackwards`] if the clock reads earlier than
    /// the last issued ID. The state is left untouched.
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.state.get();
        let id = state.next(&self.time, self.identity)?;
        self.state.set(state);
        Ok(id)
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// # Example
    /// ```
    /// use flakeid::{BasicSnowflakeGenerator, Poll};
    ///
    /// let generator = BasicSnowflakeGenerator::new(0, 0).unwrap();
    ///
    /// let id = loop {
    ///     match generator.poll_id().unwrap() {
    ///         Poll::Ready { id } => break id,
    ///         Poll::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackwards`] if the clock reads earlier than
    /// the last issued ID.
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<Poll> {
        let mut state = self.state.get();
        let status = state.poll(self.time.current_millis(), self.identity)?;
        self.state.set(state);
        Ok(status)
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> GeneratorState {
        self.state.get()
    }
}

impl<T> SnowflakeGenerator<T> for BasicSnowflakeGenerator<T>
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
        Ok(self.snapshot())
    }
}
