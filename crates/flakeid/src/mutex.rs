#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{Mutex, MutexGuard};

/// Acquires `mutex`, recovering the guard if a previous holder panicked.
///
/// Only for data that every write leaves consistent.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    #[cfg(feature = "parking-lot")]
    {
        mutex.lock()
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
