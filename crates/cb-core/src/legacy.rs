//! The older `conditionalText` format.
//!
//! Still accepted for locations that predate rules. It is only consulted
//! when a location has no `conditions`.

use serde::Deserialize;

use crate::action::Action;
use crate::flag::Updates;
use crate::letter::Letter;

/// One legacy conditional text entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalText {
    /// Letter the entry requires.
    #[serde(default)]
    pub requires_letter: Option<Letter>,
    /// Flag that unlocks the entry even without the letter.
    #[serde(default)]
    pub requires_flag: Option<String>,
    /// Text shown when the entry is met.
    #[serde(default)]
    pub text: Option<String>,
    /// Prompt shown when met without text, or when not met without `prompt_if_false`.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Prompt shown when the entry is not met.
    #[serde(default)]
    pub prompt_if_false: Option<String>,
    /// State changes applied when met.
    #[serde(default, alias = "updatesGameState")]
    pub updates: Option<Updates>,
    /// Lock the current location when met.
    #[serde(default)]
    pub location_lock: bool,
    /// Actions exposed when met.
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_old_update_key() {
        let entry: ConditionalText = serde_json::from_str(
            r#"{"requiresLetter": "B", "text": "Ah.", "updatesGameState": {"sawLedger": true}, "locationLock": true}"#,
        )
        .unwrap();
        assert_eq!(entry.requires_letter, Letter::new('B'));
        assert!(entry.location_lock);
        assert!(entry.updates.unwrap().flags.contains_key("sawLedger"));
    }
}
