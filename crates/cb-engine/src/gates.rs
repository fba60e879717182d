//! Visibility and disable rules for actions.
//!
//! Gating turns data actions into [`ActionView`]s and remembers which
//! consequences each visible id fires.

use std::collections::BTreeMap;

use cb_core::{Action, Consequences};

use crate::markup::strip_citations;
use crate::policy;
use crate::present::{ActionSection, ActionView, ChoiceView};
use crate::state::GameState;

/// Id of the affordance that leaves a finished interaction.
pub const LEAVE_ACTION_ID: &str = "leave";

const DEFAULT_DISABLED_TEXT: &str = "Unavailable.";
/// Reason shown on a hint that was already taken.
pub const HINT_TAKEN_TEXT: &str = "Hint already taken.";
const LOCKED_TEXT: &str = "This location is locked.";
const CHOICE_MADE_TEXT: &str = "You already made a choice here.";

/// The actions on offer plus their dispatch table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSet {
    views: Vec<ActionView>,
    dispatch: BTreeMap<String, Consequences>,
    leave: bool,
}

impl ActionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only the leave affordance.
    pub fn leave(label: &str) -> Self {
        Self {
            views: vec![ActionView {
                id: LEAVE_ACTION_ID.to_string(),
                label: label.to_string(),
                disabled: false,
                disabled_reason: None,
                section: ActionSection::Exit,
                prompt_hidden: false,
                choices: Vec::new(),
            }],
            dispatch: BTreeMap::new(),
            leave: true,
        }
    }

    /// Gate one action and add it if visible.
    pub fn expose(&mut self, action: &Action, section: ActionSection, state: &GameState) {
        if !action.is_renderable() {
            log::debug!("skipping action without id or text");
            return;
        }
        if flag_set(action.hide_if_flag.as_deref(), state) {
            return;
        }
        let view = if action.has_choices() {
            self.expose_group(action, section, state)
        } else {
            let reason = action_disabled_reason(action, state);
            self.dispatch.insert(
                action.id.clone(),
                action.consequences.clone().unwrap_or_default(),
            );
            ActionView {
                id: action.id.clone(),
                label: strip_citations(&action.text),
                disabled: reason.is_some(),
                disabled_reason: reason,
                section,
                prompt_hidden: false,
                choices: Vec::new(),
            }
        };
        self.views.push(view);
    }

    fn expose_group(
        &mut self,
        action: &Action,
        section: ActionSection,
        state: &GameState,
    ) -> ActionView {
        let group_closed = action
            .dispatch_entries()
            .iter()
            .any(|(_, c)| c.records_choice.is_some())
            && policy::choice_recorded_here(state);
        let mut choices = Vec::new();
        for choice in &action.choices {
            if choice.id.is_empty() || choice.text.is_empty() {
                continue;
            }
            if flag_set(choice.hide_if_flag.as_deref(), state) {
                continue;
            }
            let reason = if group_closed {
                Some(CHOICE_MADE_TEXT.to_string())
            } else if flag_set(choice.disable_if_flag.as_deref(), state) {
                Some(disabled_text(choice.disabled_text.as_deref()))
            } else {
                None
            };
            self.dispatch
                .insert(choice.id.clone(), choice.effective_consequences(action));
            choices.push(ChoiceView {
                id: choice.id.clone(),
                label: strip_citations(&choice.text),
                disabled: reason.is_some(),
                disabled_reason: reason,
            });
        }
        ActionView {
            id: action.id.clone(),
            label: strip_citations(&action.text),
            disabled: false,
            disabled_reason: None,
            section,
            prompt_hidden: flag_set(action.hide_prompt_if_flag.as_deref(), state),
            choices,
        }
    }

    /// Gate and add several actions.
    pub fn expose_all(&mut self, actions: &[Action], section: ActionSection, state: &GameState) {
        for action in actions {
            self.expose(action, section, state);
        }
    }

    /// Build a set from actions in one section.
    pub fn from_actions(actions: &[Action], section: ActionSection, state: &GameState) -> Self {
        let mut set = Self::new();
        set.expose_all(actions, section, state);
        set
    }

    /// The visible actions.
    pub fn views(&self) -> &[ActionView] {
        &self.views
    }

    /// True if nothing is on offer.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Whether the leave affordance is on offer.
    pub fn offers_leave(&self) -> bool {
        self.leave
    }

    /// The consequences an id fires, with the reason it is disabled if it is.
    pub fn lookup(&self, id: &str) -> Option<(&Consequences, Option<&str>)> {
        let consequences = self.dispatch.get(id)?;
        let reason = self.views.iter().find_map(|view| {
            if view.choices.is_empty() {
                (view.id == id).then_some(view.disabled_reason.as_deref())
            } else {
                view.choices
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.disabled_reason.as_deref())
            }
        });
        Some((consequences, reason.flatten()))
    }
}

fn flag_set(flag: Option<&str>, state: &GameState) -> bool {
    flag.is_some_and(|name| state.flag_is_truthy(name))
}

fn disabled_text(text: Option<&str>) -> String {
    text.unwrap_or(DEFAULT_DISABLED_TEXT).to_string()
}

fn action_disabled_reason(action: &Action, state: &GameState) -> Option<String> {
    let consequences = action.consequences.as_ref();
    let locks = consequences.is_some_and(|c| c.locks_location);
    let records = consequences.is_some_and(|c| c.records_choice.is_some());
    let here_locked = state.current().is_some_and(|a| state.is_locked(a.as_str()));

    if locks && here_locked {
        return Some(LOCKED_TEXT.to_string());
    }
    if records && policy::choice_recorded_here(state) {
        return Some(CHOICE_MADE_TEXT.to_string());
    }
    if flag_set(action.disable_if_flag.as_deref(), state) {
        return Some(disabled_text(action.disabled_text.as_deref()));
    }
    if policy::hint_letter(&action.id).is_some_and(|letter| policy::hint_taken(letter, state)) {
        return Some(HINT_TAKEN_TEXT.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::{Address, Choice};

    fn burn_group() -> Action {
        Action::new("choose_burn", "Which uniform do you burn?")
            .with_consequences(Consequences::new().with_recorded_choice("burnedUniform"))
            .with_choice(Choice::new("burn_footman", "The footman's"))
            .with_choice(Choice::new("burn_butler", "The butler's"))
    }

    #[test]
    fn hidden_actions_are_not_dispatchable() {
        let mut state = GameState::new();
        state.set_flag("doorOpen", true);
        let actions = vec![
            Action::new("open_door", "Open the door").hidden_by("doorOpen"),
            Action::new("knock", "Knock"),
        ];
        let set = ActionSet::from_actions(&actions, ActionSection::Location, &state);
        assert_eq!(set.views().len(), 1);
        assert!(set.lookup("open_door").is_none());
        assert!(set.lookup("knock").is_some());
    }

    #[test]
    fn unrenderable_actions_are_skipped() {
        let state = GameState::new();
        let set = ActionSet::from_actions(
            &[Action::new("", "No id"), Action::new("no_text", "")],
            ActionSection::Location,
            &state,
        );
        assert!(set.is_empty());
    }

    #[test]
    fn disabled_actions_keep_their_reason() {
        let mut state = GameState::new();
        state.set_flag("paidCabman", true);
        let mut tip = Action::new("tip", "Tip him");
        tip.disable_if_flag = Some("paidCabman".into());
        let actions = vec![
            Action::new("pay", "Pay the cabman").disabled_by("paidCabman", "Already paid."),
            tip,
        ];
        let set = ActionSet::from_actions(&actions, ActionSection::Location, &state);
        assert_eq!(set.lookup("pay").unwrap().1, Some("Already paid."));
        assert_eq!(set.lookup("tip").unwrap().1, Some("Unavailable."));
    }

    #[test]
    fn taken_hints_are_disabled() {
        let mut state = GameState::new();
        state.set_flag("hint_F_taken", true);
        let set = ActionSet::from_actions(
            &[Action::new("hint_F", "Ask Holmes about F")],
            ActionSection::Location,
            &state,
        );
        assert_eq!(set.views()[0].disabled_reason.as_deref(), Some("Hint already taken."));
    }

    #[test]
    fn lock_actions_disable_once_locked() {
        let mut state = GameState::new();
        state.set_current(Some(Address::new("68 WC")));
        let seal = Action::new("seal", "Seal the room")
            .with_consequences(Consequences::new().with_lock());
        let open =
            ActionSet::from_actions(std::slice::from_ref(&seal), ActionSection::Location, &state);
        assert!(!open.views()[0].disabled);
        state.lock(Address::new("68 WC"));
        let closed = ActionSet::from_actions(&[seal], ActionSection::Location, &state);
        assert_eq!(
            closed.views()[0].disabled_reason.as_deref(),
            Some("This location is locked.")
        );
    }

    #[test]
    fn choice_groups_close_after_a_recorded_choice() {
        let mut state = GameState::new();
        state.set_current(Some(Address::new("68 WC")));
        let set = ActionSet::from_actions(&[burn_group()], ActionSection::Location, &state);
        let view = &set.views()[0];
        assert!(view.is_group());
        assert_eq!(view.choices.len(), 2);
        assert!(view.choices.iter().all(|c| !c.disabled));
        let (consequences, _) = set.lookup("burn_butler").unwrap();
        assert_eq!(consequences.records_choice.as_deref(), Some("burnedUniform"));

        state.set_flag("choice_recorded:68 WC", true);
        let set = ActionSet::from_actions(&[burn_group()], ActionSection::Location, &state);
        assert!(set.views()[0].choices.iter().all(|c| c.disabled));
        assert_eq!(
            set.lookup("burn_footman").unwrap().1,
            Some("You already made a choice here.")
        );
    }

    #[test]
    fn group_prompt_can_be_hidden() {
        let mut state = GameState::new();
        state.set_flag("burnedUniform", "burn_footman");
        let mut group = burn_group();
        group.hide_prompt_if_flag = Some("burnedUniform".into());
        let set = ActionSet::from_actions(&[group], ActionSection::Location, &state);
        assert!(set.views()[0].prompt_hidden);
        assert_eq!(set.views()[0].choices.len(), 2);
    }

    #[test]
    fn leave_set() {
        let set = ActionSet::leave("Leave");
        assert!(set.offers_leave());
        assert_eq!(set.views()[0].id, LEAVE_ACTION_ID);
        assert_eq!(set.views()[0].section, ActionSection::Exit);
    }
}
