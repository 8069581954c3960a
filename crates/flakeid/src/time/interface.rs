/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The unit is **milliseconds** since the Unix epoch. Implementations are not
/// required to be monotonic: generators detect a clock that moves backwards
/// and refuse to issue IDs until it catches up.
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
