//! Short identifier generation.
//!
//! [`IdentifierAllocator`] only produces candidates. Uniqueness is decided by
//! the durable store's insert-if-absent, and the bounded retry loop around it
//! lives in [`crate::application::services::LinkService`].

use rand::Rng;

/// URL-safe alphabet of 64 symbols.
pub const DEFAULT_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Default identifier length.
pub const DEFAULT_LENGTH: usize = 6;

/// Default number of allocation attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Longest identifier accepted on the resolve path.
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Rejected allocator settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocatorError {
    #[error("Alphabet must not be empty")]
    EmptyAlphabet,

    #[error("Alphabet contains a character that is not URL-safe: {0:?}")]
    UnsafeCharacter(char),

    #[error("Alphabet contains a duplicate character: {0:?}")]
    DuplicateCharacter(char),

    #[error("Identifier length must be between 1 and 64, got {0}")]
    InvalidLength(usize),

    #[error("Max attempts must be at least 1")]
    NoAttempts,
}

/// Generates fixed-length random identifiers.
///
/// Symbols are drawn with the thread-local CSPRNG, so identifiers cannot be
/// enumerated or predicted from earlier ones.
#[derive(Debug, Clone)]
pub struct IdentifierAllocator {
    alphabet: Vec<char>,
    length: usize,
    max_attempts: usize,
}

impl IdentifierAllocator {
    /// Creates an allocator over [`DEFAULT_ALPHABET`].
    ///
    /// # Errors
    ///
    /// Returns [`AllocatorError`] if `length` or `max_attempts` is out of range.
    pub fn new(length: usize, max_attempts: usize) -> Result<Self, AllocatorError> {
        Self::with_alphabet(DEFAULT_ALPHABET, length, max_attempts)
    }

    /// Creates an allocator over a custom alphabet.
    ///
    /// Small alphabets make collisions likely, which is how tests exercise
    /// the retry path.
    ///
    /// # Errors
    ///
    /// Returns [`AllocatorError`] if the alphabet is empty, has duplicates or
    /// non URL-safe characters, or if `length`/`max_attempts` is out of range.
    pub fn with_alphabet(
        alphabet: &str,
        length: usize,
        max_attempts: usize,
    ) -> Result<Self, AllocatorError> {
        if alphabet.is_empty() {
            return Err(AllocatorError::EmptyAlphabet);
        }

        let mut symbols: Vec<char> = Vec::with_capacity(alphabet.len());
        for c in alphabet.chars() {
            if !is_url_safe(c) {
                return Err(AllocatorError::UnsafeCharacter(c));
            }
            if symbols.contains(&c) {
                return Err(AllocatorError::DuplicateCharacter(c));
            }
            symbols.push(c);
        }

        if length == 0 || length > MAX_IDENTIFIER_LENGTH {
            return Err(AllocatorError::InvalidLength(length));
        }

        if max_attempts == 0 {
            return Err(AllocatorError::NoAttempts);
        }

        Ok(Self {
            alphabet: symbols,
            length,
            max_attempts,
        })
    }

    /// Produces a new candidate identifier.
    pub fn allocate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    /// Number of candidates tried before allocation fails.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Cheap shape check applied before any cache or store lookup.
///
/// Accepts anything any allocator configuration could have produced, so
/// identifiers minted before a length change keep resolving.
pub fn is_well_formed(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier.len() <= MAX_IDENTIFIER_LENGTH
        && identifier.chars().all(is_url_safe)
}

fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
