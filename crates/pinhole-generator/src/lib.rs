pub mod alphabet;
pub mod error;
pub mod random;

pub use alphabet::Alphabet;
pub use error::GeneratorError;
pub use random::RandomGenerator;

use pinhole_core::Uri;

/// Trait for generating candidate identifiers.
///
/// Implementations are pure generators that don't interact with storage,
/// so they do not guarantee uniqueness. Resolving collisions is up to the
/// store that consumes the candidates.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate identifier.
    fn generate(&self) -> Uri;
}
