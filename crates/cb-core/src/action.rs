//! Player-triggerable actions and what they do.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::flag::FlagValue;

/// What happens when an action or choice fires.
///
/// Several keys may be set at once. The engine applies them in a fixed
/// order: `sets_flag`, `locks_location`, `records_choice`, `adds_text`,
/// `triggers_sequence` (which returns immediately), `ends_interaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consequences {
    /// Flags to merge into the player's state.
    #[serde(default)]
    pub sets_flag: BTreeMap<String, FlagValue>,
    /// Lock the current location against revisits.
    #[serde(default)]
    pub locks_location: bool,
    /// Flag under which to record which action fired.
    #[serde(default)]
    pub records_choice: Option<String>,
    /// Text appended to the current display.
    #[serde(default)]
    pub adds_text: Option<String>,
    /// Sequence (local to the current location) to run.
    #[serde(default)]
    pub triggers_sequence: Option<String>,
    /// Close the interaction at this location.
    #[serde(default)]
    pub ends_interaction: bool,
}

impl Consequences {
    /// Create empty consequences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag.
    pub fn with_flag(mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.sets_flag.insert(name.into(), value.into());
        self
    }

    /// Lock the current location.
    pub fn with_lock(mut self) -> Self {
        self.locks_location = true;
        self
    }

    /// Record the firing action under the given flag.
    pub fn with_recorded_choice(mut self, flag: impl Into<String>) -> Self {
        self.records_choice = Some(flag.into());
        self
    }

    /// Append text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.adds_text = Some(text.into());
        self
    }

    /// Trigger a sequence.
    pub fn with_sequence(mut self, sequence_id: impl Into<String>) -> Self {
        self.triggers_sequence = Some(sequence_id.into());
        self
    }

    /// End the interaction.
    pub fn with_end(mut self) -> Self {
        self.ends_interaction = true;
        self
    }

    /// True if firing these consequences does nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One option inside an action's choice group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Dispatch key.
    #[serde(default)]
    pub id: String,
    /// Button label.
    #[serde(default)]
    pub text: String,
    /// Hide the choice while this flag is truthy.
    #[serde(default)]
    pub hide_if_flag: Option<String>,
    /// Disable the choice while this flag is truthy.
    #[serde(default)]
    pub disable_if_flag: Option<String>,
    /// Explanation shown on a disabled choice.
    #[serde(default)]
    pub disabled_text: Option<String>,
    /// The choice's own consequences.
    #[serde(default)]
    pub consequences: Option<Consequences>,
}

impl Choice {
    /// Create a choice.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the choice's consequences.
    pub fn with_consequences(mut self, consequences: Consequences) -> Self {
        self.consequences = Some(consequences);
        self
    }

    /// Disable the choice while the flag is truthy.
    pub fn disabled_by(mut self, flag: impl Into<String>, reason: impl Into<String>) -> Self {
        self.disable_if_flag = Some(flag.into());
        self.disabled_text = Some(reason.into());
        self
    }

    /// Consequences of firing this choice, falling back to the parent's.
    pub fn effective_consequences(&self, parent: &Action) -> Consequences {
        self.consequences
            .as_ref()
            .or(parent.consequences.as_ref())
            .cloned()
            .unwrap_or_default()
    }
}

/// Something the player can do at a location.
///
/// An action either fires directly or, when it has `choices`, acts as a
/// prompt heading a group of choices that each fire on their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Dispatch key.
    #[serde(default)]
    pub id: String,
    /// Button label, or the group prompt when there are choices.
    #[serde(default)]
    pub text: String,
    /// Choices presented under this action's prompt.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Hide the action while this flag is truthy.
    #[serde(default)]
    pub hide_if_flag: Option<String>,
    /// Hide the group prompt (but keep the choices) while this flag is truthy.
    #[serde(default)]
    pub hide_prompt_if_flag: Option<String>,
    /// Disable the action while this flag is truthy.
    #[serde(default)]
    pub disable_if_flag: Option<String>,
    /// Explanation shown on a disabled action.
    #[serde(default)]
    pub disabled_text: Option<String>,
    /// What firing the action does.
    #[serde(default)]
    pub consequences: Option<Consequences>,
}

impl Action {
    /// Create an action.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the action's consequences.
    pub fn with_consequences(mut self, consequences: Consequences) -> Self {
        self.consequences = Some(consequences);
        self
    }

    /// Add a choice to the group.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Hide the action while the flag is truthy.
    pub fn hidden_by(mut self, flag: impl Into<String>) -> Self {
        self.hide_if_flag = Some(flag.into());
        self
    }

    /// Disable the action while the flag is truthy.
    pub fn disabled_by(mut self, flag: impl Into<String>, reason: impl Into<String>) -> Self {
        self.disable_if_flag = Some(flag.into());
        self.disabled_text = Some(reason.into());
        self
    }

    /// True if the action presents a choice group.
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// True if the action can be rendered at all.
    pub fn is_renderable(&self) -> bool {
        !self.id.is_empty() && !self.text.is_empty()
    }

    /// Every consequence set reachable from this action, with the id that fires it.
    pub fn dispatch_entries(&self) -> Vec<(&str, Consequences)> {
        if self.has_choices() {
            self.choices
                .iter()
                .map(|c| (c.id.as_str(), c.effective_consequences(self)))
                .collect()
        } else {
            vec![(
                self.id.as_str(),
                self.consequences.clone().unwrap_or_default(),
            )]
        }
    }
}
