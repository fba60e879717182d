use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::letter::Letter;

/// The value of a named flag in the player's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// A boolean fact.
    Bool(bool),
    /// A textual fact, e.g. which action fired for a recorded choice.
    Text(String),
}

impl FlagValue {
    /// Strict truth: only `Bool(true)` counts.
    pub fn is_true(&self) -> bool {
        matches!(self, FlagValue::Bool(true))
    }

    /// Loose truth: `Bool(true)` or any non-empty text.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Text(s) => !s.is_empty(),
        }
    }

    /// The text payload, if this is a textual flag.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlagValue::Text(s) => Some(s),
            FlagValue::Bool(_) => None,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        FlagValue::Bool(b)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        FlagValue::Text(s.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> Self {
        FlagValue::Text(s)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Unconditional state changes: an optional letter grant plus flags.
///
/// In case data this is a flat object; `circlesLetter` grants a letter and
/// every other key is a flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Updates {
    /// Letter granted by these updates.
    #[serde(
        rename = "circlesLetter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub circles_letter: Option<Letter>,
    /// Flags merged into the player's state.
    #[serde(flatten)]
    pub flags: BTreeMap<String, FlagValue>,
}

impl Updates {
    /// Create empty updates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a letter.
    pub fn with_letter(mut self, letter: Letter) -> Self {
        self.circles_letter = Some(letter);
        self
    }

    /// Set a flag.
    pub fn with_flag(mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.flags.insert(name.into(), value.into());
        self
    }

    /// True if these updates change nothing.
    pub fn is_empty(&self) -> bool {
        self.circles_letter.is_none() && self.flags.is_empty()
    }
}
