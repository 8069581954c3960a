use crate::SnowflakeId;

/// The outcome of a single non-blocking generation attempt.
///
/// - [`Poll::Ready`] carries a freshly generated ID.
/// - [`Poll::Pending`] means all 4096 sequence values of the current
///   millisecond are spent. Nothing was mutated; try again once the clock
///   has advanced.
///
/// A clock that moved backwards is not a `Pending` state: it is reported as
/// [`Error::ClockMovedBackwards`](crate::Error::ClockMovedBackwards).
///
/// # Example
///
/// ```
/// use flakeid::{BasicSnowflakeGenerator, NodeIdentity, Poll, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let identity = NodeIdentity::new(0, 1).unwrap();
/// let generator = BasicSnowflakeGenerator::with_time(identity, FixedTime);
/// match generator.poll_id().unwrap() {
///     Poll::Ready { id } => println!("ID: {id}"),
///     Poll::Pending { yield_for } => println!("Back off for {yield_for} ms"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated Snowflake ID.
        id: SnowflakeId,
    },
    /// The sequence is exhausted for the current millisecond.
    Pending {
        /// Milliseconds to wait before the next attempt can succeed.
        yield_for: u64,
    },
}
