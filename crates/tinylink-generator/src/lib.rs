pub mod random;

pub use random::{GeneratorError, RandomGenerator};

/// Trait for generating candidate aliases.
///
/// Implementations are pure generators that don't interact with storage and
/// make no uniqueness guarantee: the caller detects collisions and asks for
/// another candidate.
///
/// Implementations must be safe to call from many tasks at once.
pub trait Generator: Send + Sync + 'static {
    /// Generates a string of exactly `length` characters.
    fn generate(&self, length: usize) -> String;
}
