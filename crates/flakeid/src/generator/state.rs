#[cfg(feature = "tracing")]
use tracing::warn;

use crate::{
    error::{Error, Result},
    generator::Poll,
    id::SnowflakeId,
    identity::NodeIdentity,
    time::TimeSource,
};

/// The mutable half of a generator: when it last issued an ID and which
/// sequence value that ID used.
///
/// A fresh state has no `last_timestamp` (the generator is *ready*); after
/// the first successful ID it is *active* and stays so for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GeneratorState {
    last_timestamp: Option<u64>,
    sequence: u64,
}

impl GeneratorState {
    /// Restores a state, e.g. one captured with
    /// [`SnowflakeGenerator::snapshot`](crate::SnowflakeGenerator::snapshot).
    ///
    /// `sequence` is masked to 12 bits.
    pub const fn from_parts(last_timestamp: Option<u64>, sequence: u64) -> Self {
        Self {
            last_timestamp,
            sequence: sequence & SnowflakeId::SEQUENCE_MASK,
        }
    }

    /// Milliseconds of the last issued ID, or `None` before the first one.
    pub const fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// Sequence value of the last issued ID.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// One non-blocking step of the state machine at time `now`.
    ///
    /// The state is only written on `Ready`. `Pending` and errors leave it
    /// exactly as it was.
    pub(crate) fn poll(&mut self, now: u64, identity: NodeIdentity) -> Result<Poll> {
        match self.last_timestamp {
            Some(last) if now < last => Err(Self::cold_clock_behind(now, last)),
            Some(last) if now == last => {
                if self.sequence < SnowflakeId::max_sequence() {
                    self.sequence += 1;
                    Ok(Poll::Ready {
                        id: self.compose(identity),
                    })
                } else {
                    Ok(Poll::Pending { yield_for: 1 })
                }
            }
            _ => Ok(Poll::Ready {
                id: self.rollover_to(now, identity),
            }),
        }
    }

    /// Generates the next ID, spinning on `time` if the current millisecond's
    /// sequence is exhausted.
    ///
    /// While spinning, readings at or before the last timestamp (including a
    /// clock that dips backwards) are ignored until one strictly exceeds it.
    pub(crate) fn next<T>(&mut self, time: &T, identity: NodeIdentity) -> Result<SnowflakeId>
    where
        T: TimeSource + ?Sized,
    {
        match self.poll(time.current_millis(), identity)? {
            Poll::Ready { id } => Ok(id),
            Poll::Pending { .. } => {
                let now = self.wait_past_last(time);
                Ok(self.rollover_to(now, identity))
            }
        }
    }

    fn wait_past_last<T>(&self, time: &T) -> u64
    where
        T: TimeSource + ?Sized,
    {
        let last = self.last_timestamp.unwrap_or_default();
        let mut now = time.current_millis();
        while now <= last {
            core::hint::spin_loop();
            now = time.current_millis();
        }
        now
    }

    fn rollover_to(&mut self, now: u64, identity: NodeIdentity) -> SnowflakeId {
        self.last_timestamp = Some(now);
        self.sequence = 0;
        self.compose(identity)
    }

    fn compose(&self, identity: NodeIdentity) -> SnowflakeId {
        SnowflakeId::from_components(
            self.last_timestamp.unwrap_or_default(),
            u64::from(identity.datacenter_id()),
            u64::from(identity.worker_id()),
            self.sequence,
        )
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        let millis = last - now;
        #[cfg(feature = "tracing")]
        warn!(millis, "clock moved backwards, refusing to generate id");
        Error::ClockMovedBackwards { millis }
    }
}
