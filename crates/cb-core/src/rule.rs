//! Rules: a check plus what happens when it passes or fails.
//!
//! In case data a rule is written as
//! `{"check": "...", "letter": "...", "onSuccess": {...}, "promptIfFalse": ...}`.
//! Success branches may carry follow-up rules of the same shape, so rules
//! form a small recursive tree.

use std::fmt;

use serde::Deserialize;

use crate::action::Action;
use crate::flag::Updates;
use crate::letter::Letter;

/// What a rule tests against the player's state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Check {
    /// No check given: always passes.
    #[default]
    Always,
    /// Passes when the player owns the letter.
    RequiresLetter(Letter),
    /// Passes when the flag is exactly `true`.
    RequiresFlag(String),
    /// A check kind the engine does not understand. Never passes.
    Unknown(String),
}

impl Check {
    /// Interpret the `check` and `letter` fields of a rule.
    ///
    /// The letter may also be written inline, as `requiresLetter:C`.
    pub fn parse(check: Option<&str>, letter: Option<Letter>) -> Self {
        match check.map(str::trim) {
            None | Some("") => Check::Always,
            Some("requiresLetter") => match letter {
                Some(l) => Check::RequiresLetter(l),
                None => Check::Unknown("requiresLetter (no letter given)".to_string()),
            },
            Some(other) => {
                if let Some(code) = other.strip_prefix("requiresLetter:") {
                    return match code.parse::<Letter>() {
                        Ok(l) => Check::RequiresLetter(l),
                        Err(_) => Check::Unknown(other.to_string()),
                    };
                }
                match other.strip_prefix("flag:") {
                    Some(name) if !name.is_empty() => Check::RequiresFlag(name.to_string()),
                    _ => Check::Unknown(other.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Always => write!(f, "always"),
            Check::RequiresLetter(l) => write!(f, "requiresLetter {l}"),
            Check::RequiresFlag(name) => write!(f, "flag:{name}"),
            Check::Unknown(raw) => write!(f, "unknown check \"{raw}\""),
        }
    }
}

/// A prompt block with a stable logical id.
///
/// When `hide_if_flag` names a flag that is truthy once the location has
/// been composed, the block is dropped from the output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptBlock {
    /// Logical id of the prompt.
    pub id: String,
    /// Prompt text.
    pub text: String,
    /// Flag that suppresses this prompt.
    #[serde(default)]
    pub hide_if_flag: Option<String>,
}

/// Text shown when a rule's check fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    /// Plain prompt text.
    Plain(String),
    /// A prompt with an id and an optional suppression flag.
    Tagged(PromptBlock),
}

impl Prompt {
    /// The prompt text.
    pub fn text(&self) -> &str {
        match self {
            Prompt::Plain(text) => text,
            Prompt::Tagged(block) => &block.text,
        }
    }

    /// The logical id, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Prompt::Plain(_) => None,
            Prompt::Tagged(block) => Some(&block.id),
        }
    }

    /// The suppression flag, if any.
    pub fn hide_if_flag(&self) -> Option<&str> {
        match self {
            Prompt::Plain(_) => None,
            Prompt::Tagged(block) => block.hide_if_flag.as_deref(),
        }
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Plain(text.to_string())
    }
}

/// What a passing rule does.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    /// Narrative text to show.
    #[serde(default)]
    pub text: Option<String>,
    /// State changes to apply.
    #[serde(default)]
    pub updates: Option<Updates>,
    /// Actions to expose.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Rules evaluated after this effect is applied.
    #[serde(default, rename = "followUpConditions")]
    pub follow_ups: Vec<Rule>,
}

impl Effect {
    /// An effect that shows text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Apply updates.
    pub fn with_updates(mut self, updates: Updates) -> Self {
        self.updates = Some(updates);
        self
    }

    /// Expose an action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add a follow-up rule.
    pub fn with_follow_up(mut self, rule: Rule) -> Self {
        self.follow_ups.push(rule);
        self
    }
}

/// A check with a success and a failure branch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawRule")]
pub struct Rule {
    /// The check to evaluate.
    pub check: Check,
    /// Applied when the check passes.
    pub on_success: Option<Effect>,
    /// Shown when the check fails.
    pub on_failure: Option<Prompt>,
}

impl Rule {
    /// Create a rule with no branches.
    pub fn new(check: Check) -> Self {
        Self {
            check,
            on_success: None,
            on_failure: None,
        }
    }

    /// A rule that requires a letter.
    pub fn requires_letter(letter: Letter) -> Self {
        Self::new(Check::RequiresLetter(letter))
    }

    /// A rule that requires a flag to be `true`.
    pub fn requires_flag(name: impl Into<String>) -> Self {
        Self::new(Check::RequiresFlag(name.into()))
    }

    /// Set the success branch.
    pub fn on_success(mut self, effect: Effect) -> Self {
        self.on_success = Some(effect);
        self
    }

    /// Set the failure prompt.
    pub fn on_failure(mut self, prompt: impl Into<Prompt>) -> Self {
        self.on_failure = Some(prompt.into());
        self
    }

    /// This rule and every nested follow-up rule, depth first.
    pub fn walk(&self) -> Vec<&Rule> {
        let mut out = vec![self];
        if let Some(effect) = &self.on_success {
            for follow_up in &effect.follow_ups {
                out.extend(follow_up.walk());
            }
        }
        out
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    #[serde(default)]
    check: Option<String>,
    #[serde(default)]
    letter: Option<Letter>,
    #[serde(default)]
    on_success: Option<Effect>,
    #[serde(default)]
    prompt_if_false: Option<Prompt>,
}

impl From<RawRule> for Rule {
    fn from(raw: RawRule) -> Self {
        Self {
            check: Check::parse(raw.check.as_deref(), raw.letter),
            on_success: raw.on_success,
            on_failure: raw.prompt_if_false,
        }
    }
}
