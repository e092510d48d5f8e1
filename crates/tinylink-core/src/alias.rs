use crate::error::{AliasError, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;

/// Alphabet used when none is configured: ASCII letters, digits and `_`.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Characters that would change the meaning of a URL path: separators
/// (`\` counts as one for http(s)) and the percent-escape introducer.
const RESERVED_IN_PATH: [char; 3] = ['/', '\\', '%'];

/// The short identifier of a stored link.
///
/// An `Alias` carries no format guarantee on its own; use
/// [`AliasFormat::parse`] to obtain one from untrusted input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alias(String);

impl Alias {
    /// Creates an `Alias` without validation.
    ///
    /// Use this only for values produced by trusted internal sources, such as
    /// a generator drawing from the configured alphabet or a row read back
    /// from a store.
    pub fn new_unchecked(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    /// Returns the alias as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The shape every alias must have: a fixed length over a fixed alphabet.
///
/// The alphabet is kept twice: as an ordered sequence, which generators draw
/// from by index (duplicates are allowed and simply weight the draw), and as
/// a membership set for constant-time validation.
#[derive(Debug, Clone)]
pub struct AliasFormat {
    alphabet: Vec<char>,
    members: HashSet<char>,
    length: usize,
}

impl AliasFormat {
    pub fn new(alphabet: &str, length: usize) -> Result<Self, ConfigError> {
        if length == 0 {
            return Err(ConfigError::InvalidLinkLength(length));
        }

        let alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(ConfigError::InvalidAlphabet(
                "alphabet must contain at least one character".to_string(),
            ));
        }

        if let Some(ch) = alphabet
            .iter()
            .find(|c| c.is_whitespace() || RESERVED_IN_PATH.contains(*c))
        {
            return Err(ConfigError::InvalidAlphabet(format!(
                "{ch:?} cannot appear in an alias"
            )));
        }

        // "." and ".." are dot segments and vanish from a URL path.
        if length <= 2 && alphabet.contains(&'.') {
            return Err(ConfigError::InvalidAlphabet(format!(
                "'.' needs aliases of at least 3 characters, got {length}"
            )));
        }

        let members = alphabet.iter().copied().collect();

        Ok(Self {
            alphabet,
            members,
            length,
        })
    }

    /// The ordered alphabet.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// The alias length, in characters.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn contains(&self, ch: char) -> bool {
        self.members.contains(&ch)
    }

    /// Checks that `alias` has the configured length and only uses
    /// characters from the alphabet.
    pub fn validate(&self, alias: &str) -> Result<(), AliasError> {
        let actual = alias.chars().count();
        if actual != self.length {
            return Err(AliasError::Length {
                alias: alias.to_string(),
                expected: self.length,
                actual,
            });
        }

        if let Some(ch) = alias.chars().find(|c| !self.contains(*c)) {
            return Err(AliasError::Character {
                alias: alias.to_string(),
                ch,
            });
        }

        Ok(())
    }

    /// Validates `alias` and wraps it.
    pub fn parse(&self, alias: &str) -> Result<Alias, AliasError> {
        self.validate(alias)?;
        Ok(Alias::new_unchecked(alias))
    }
}
