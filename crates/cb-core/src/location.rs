//! Locations and the sequences they own.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::action::Action;
use crate::flag::Updates;
use crate::legacy::ConditionalText;
use crate::letter::Letter;
use crate::rule::{PromptBlock, Rule};

/// A named multi-step block local to one location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    /// Text appended when the sequence runs.
    #[serde(default)]
    pub text: Option<String>,
    /// State changes applied when the sequence runs.
    #[serde(default)]
    pub updates: Option<Updates>,
    /// Actions replacing the current ones.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// `Some(false)` keeps the interaction open when there are no actions.
    #[serde(default)]
    pub ends_interaction: Option<bool>,
}

impl Sequence {
    /// A sequence that shows text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Expose an action after the sequence.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Apply updates.
    pub fn with_updates(mut self, updates: Updates) -> Self {
        self.updates = Some(updates);
        self
    }
}

/// Static data for one address.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Narrative shown on every visit.
    #[serde(default, alias = "baseText")]
    pub text: String,
    /// Letter granted on entry.
    #[serde(default)]
    pub circles_letter: Option<Letter>,
    /// Unconditional state changes applied on every visit.
    #[serde(default)]
    pub updates: Option<Updates>,
    /// Prompt blocks shown after the base text.
    #[serde(default)]
    pub prompts: Vec<PromptBlock>,
    /// Flat actions.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Rules evaluated in order on every visit.
    #[serde(default)]
    pub conditions: Vec<Rule>,
    /// Legacy entries, used only when `conditions` is empty.
    #[serde(default)]
    pub conditional_text: Vec<ConditionalText>,
    /// Rules used only when there are neither conditions, legacy entries nor flat actions.
    #[serde(default)]
    pub follow_up_conditions: Vec<Rule>,
    /// Sequences triggered by action consequences.
    #[serde(default)]
    pub sequences: BTreeMap<String, Sequence>,
}

impl Location {
    /// Create a location with base text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Grant a letter on entry.
    pub fn with_letter(mut self, letter: Letter) -> Self {
        self.circles_letter = Some(letter);
        self
    }

    /// Apply updates on every visit.
    pub fn with_updates(mut self, updates: Updates) -> Self {
        self.updates = Some(updates);
        self
    }

    /// Add a prompt block.
    pub fn with_prompt(mut self, prompt: PromptBlock) -> Self {
        self.prompts.push(prompt);
        self
    }

    /// Add a flat action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add a rule.
    pub fn with_condition(mut self, rule: Rule) -> Self {
        self.conditions.push(rule);
        self
    }

    /// Add a legacy conditional text entry.
    pub fn with_conditional_text(mut self, entry: ConditionalText) -> Self {
        self.conditional_text.push(entry);
        self
    }

    /// Add a top-level follow-up rule.
    pub fn with_follow_up(mut self, rule: Rule) -> Self {
        self.follow_up_conditions.push(rule);
        self
    }

    /// Add a sequence.
    pub fn with_sequence(mut self, id: impl Into<String>, sequence: Sequence) -> Self {
        self.sequences.insert(id.into(), sequence);
        self
    }

    /// A dead end: nothing to do beyond reading the base text.
    pub fn is_dead_end(&self) -> bool {
        self.actions.is_empty()
            && self.conditions.is_empty()
            && self.conditional_text.is_empty()
            && self.follow_up_conditions.is_empty()
    }

    /// Every rule at this location, including nested follow-ups.
    pub fn all_rules(&self) -> Vec<&Rule> {
        self.conditions
            .iter()
            .chain(&self.follow_up_conditions)
            .flat_map(Rule::walk)
            .collect()
    }

    /// Every action declared anywhere at this location.
    pub fn all_actions(&self) -> Vec<&Action> {
        let mut actions: Vec<&Action> = self.actions.iter().collect();
        for rule in self.all_rules() {
            if let Some(effect) = &rule.on_success {
                actions.extend(&effect.actions);
            }
        }
        for entry in &self.conditional_text {
            actions.extend(&entry.actions);
        }
        for sequence in self.sequences.values() {
            actions.extend(&sequence.actions);
        }
        actions
    }

    /// Names of every flag this location can set.
    pub fn declared_flags(&self) -> BTreeSet<&str> {
        let mut updates: Vec<&Updates> = self.updates.iter().collect();
        for rule in self.all_rules() {
            updates.extend(rule.on_success.as_ref().and_then(|e| e.updates.as_ref()));
        }
        updates.extend(self.conditional_text.iter().filter_map(|e| e.updates.as_ref()));
        updates.extend(self.sequences.values().filter_map(|s| s.updates.as_ref()));

        let mut flags: BTreeSet<&str> = updates
            .into_iter()
            .flat_map(|u| u.flags.keys().map(String::as_str))
            .collect();
        for action in self.all_actions() {
            let own = action.consequences.iter();
            let from_choices = action.choices.iter().filter_map(|c| c.consequences.as_ref());
            for consequences in own.chain(from_choices) {
                flags.extend(consequences.sets_flag.keys().map(String::as_str));
                flags.extend(consequences.records_choice.as_deref());
            }
        }
        flags
    }

    /// Every letter this location can grant.
    pub fn granted_letters(&self) -> Vec<Letter> {
        let mut letters: Vec<Letter> = self.circles_letter.into_iter().collect();
        let mut push_updates = |updates: &Option<Updates>| {
            if let Some(letter) = updates.as_ref().and_then(|u| u.circles_letter) {
                letters.push(letter);
            }
        };
        push_updates(&self.updates);
        for rule in self.all_rules() {
            if let Some(effect) = &rule.on_success {
                push_updates(&effect.updates);
            }
        }
        for entry in &self.conditional_text {
            push_updates(&entry.updates);
        }
        for sequence in self.sequences.values() {
            push_updates(&sequence.updates);
        }
        letters
    }
}
