use crate::alphabet::Alphabet;
use crate::error::GeneratorError;
use crate::Generator;
use pinhole_core::Uri;
use rand::Rng;

/// Default identifier length.
pub const DEFAULT_LENGTH: usize = 8;

/// Generates fixed-length identifiers uniformly at random.
///
/// Each call draws from the thread-local RNG, so one instance can be shared
/// across tasks without a lock.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
    alphabet: Alphabet,
}

impl RandomGenerator {
    /// Creates an alphanumeric generator producing codes of `length` symbols.
    pub fn new(length: usize) -> Result<Self, GeneratorError> {
        Self::with_alphabet(length, Alphabet::default())
    }

    pub fn with_alphabet(length: usize, alphabet: Alphabet) -> Result<Self, GeneratorError> {
        if length == 0 {
            return Err(GeneratorError::ZeroLength);
        }
        Ok(Self { length, alphabet })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            alphabet: Alphabet::default(),
        }
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> Uri {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| self.alphabet.symbol(rng.random_range(0..self.alphabet.len())))
            .collect();
        Uri::from_code(code)
    }
}
