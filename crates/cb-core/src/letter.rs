use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A collectible letter from the A-Z alphabet.
///
/// Letters are written as one-character strings in case data. Lower-case
/// input is normalised to upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Letter(char);

impl Letter {
    /// Create a letter, returning `None` for anything outside A-Z.
    pub fn new(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(Self(upper))
        } else {
            None
        }
    }

    /// The letter as a `char`.
    pub fn as_char(self) -> char {
        self.0
    }
}

/// A string that is not a single A-Z letter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid letter: \"{0}\"")]
pub struct InvalidLetter(pub String);

impl FromStr for Letter {
    type Err = InvalidLetter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::new(c).ok_or_else(|| InvalidLetter(s.to_string())),
            _ => Err(InvalidLetter(s.to_string())),
        }
    }
}

impl TryFrom<String> for Letter {
    type Error = InvalidLetter;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Letter> for String {
    fn from(letter: Letter) -> Self {
        letter.0.to_string()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
