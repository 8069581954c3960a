use crate::{
    error::Result,
    generator::{GeneratorState, Poll},
    id::SnowflakeId,
    identity::NodeIdentity,
    time::TimeSource,
};

/// A minimal interface for generating Snowflake IDs.
pub trait SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `identity` that reads time from `time`.
    fn with_time(identity: NodeIdentity, time: T) -> Self;

    /// The identity stamped into every ID.
    fn identity(&self) -> NodeIdentity;

    /// Generates the next ID, busy-waiting if the current millisecond's
    /// sequence is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] if the clock reads earlier than the
    ///   last issued ID. The generator state is unchanged.
    /// - [`Error::LockPoisoned`] for a lock-based generator whose lock was
    ///   poisoned.
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    fn next_id(&self) -> Result<SnowflakeId>;

    /// Attempts to generate the next ID without blocking.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::next_id`].
    fn poll_id(&self) -> Result<Poll>;

    /// Returns a copy of the generator's current state.
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and it
    /// is poisoned.
    fn snapshot(&self) -> Result<GeneratorState>;

    /// [`SnowflakeGenerator::next_id`] rendered as a decimal string.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::next_id`].
    fn next_id_string(&self) -> Result<String> {
        self.next_id().map(|id| id.to_string())
    }

    /// Generates the next ID, calling `backoff` with the suggested wait in
    /// milliseconds each time the sequence is exhausted.
    ///
    /// Unlike [`SnowflakeGenerator::next_id`], every retry re-checks the
    /// clock, so a clock that moves backwards while waiting is reported.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::next_id`].
    fn next_id_with(&self, mut backoff: impl FnMut(u64)) -> Result<SnowflakeId> {
        loop {
            match self.poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => backoff(yield_for),
            }
        }
    }
}
