/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. It is only consulted when picking a node identity,
/// never on the ID generation path.
///
/// # Example
/// ```
/// use flakeid::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource {
    /// Returns a uniformly distributed random integer.
    fn rand(&self) -> u64;
}
