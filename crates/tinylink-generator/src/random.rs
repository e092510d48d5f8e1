use crate::Generator;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tinylink_core::AliasFormat;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,
}

#[derive(Debug)]
enum Source {
    /// `rand::rng()`: a per-thread CSPRNG seeded once from the OS.
    Thread,
    /// One explicitly seeded generator shared by every caller.
    Seeded(Mutex<StdRng>),
}

/// Draws every character independently and uniformly from an alphabet.
///
/// The alphabet is an ordered sequence and characters are picked by index,
/// so a character listed twice is twice as likely to be drawn.
#[derive(Debug)]
pub struct RandomGenerator {
    alphabet: Vec<char>,
    source: Source,
}

impl RandomGenerator {
    /// Creates a generator backed by the thread-local random source.
    pub fn new(alphabet: &str) -> Result<Self, GeneratorError> {
        Ok(Self {
            alphabet: Self::collect(alphabet)?,
            source: Source::Thread,
        })
    }

    /// Creates a generator whose output sequence is fully determined by `seed`.
    ///
    /// Concurrent callers share the seeded state behind a lock, so the
    /// sequence is only reproducible when calls are made in a fixed order.
    pub fn seeded(alphabet: &str, seed: u64) -> Result<Self, GeneratorError> {
        Ok(Self {
            alphabet: Self::collect(alphabet)?,
            source: Source::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        })
    }

    /// Creates a thread-local generator over the alphabet of `format`.
    pub fn from_format(format: &AliasFormat) -> Self {
        Self {
            alphabet: format.alphabet().to_vec(),
            source: Source::Thread,
        }
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    fn collect(alphabet: &str) -> Result<Vec<char>, GeneratorError> {
        let alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(GeneratorError::EmptyAlphabet);
        }
        Ok(alphabet)
    }

    fn draw<R: Rng>(&self, rng: &mut R, length: usize) -> String {
        (0..length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self, length: usize) -> String {
        match &self.source {
            Source::Thread => self.draw(&mut rand::rng(), length),
            Source::Seeded(rng) => self.draw(&mut *rng.lock(), length),
        }
    }
}
