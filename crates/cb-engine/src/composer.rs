//! The Narrative Composer.
//!
//! Composing a location is a single pass over its data that both builds
//! the display and applies the location's state changes. The pass order
//! matters: a letter granted on entry is already owned when the
//! location's conditions are checked.

use cb_core::{Action, Address, ConditionalText, Letter, Location, Rule, Updates};

use crate::config::EngineConfig;
use crate::evaluator::{evaluate_rule, legacy_condition_met};
use crate::gates::ActionSet;
use crate::markup::{render_prompt, render_text};
use crate::present::{ActionSection, ContentBlock, Notification};
use crate::state::GameState;

/// A composed location.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Content blocks in display order.
    pub blocks: Vec<ContentBlock>,
    /// Actions on offer and their dispatch table.
    pub actions: ActionSet,
    /// Notices raised while composing.
    pub notifications: Vec<Notification>,
}

/// Notice for a newly circled letter.
pub fn letter_notice(letter: Letter) -> Notification {
    Notification::success(format!("Found Letter {letter}!"))
}

/// Notice for a newly locked location.
pub fn lock_notice(address: &Address) -> Notification {
    Notification::info(format!("{address} is now locked."))
}

struct Pending {
    block: ContentBlock,
    hide_if_flag: Option<String>,
}

struct Composer<'a> {
    address: &'a Address,
    config: &'a EngineConfig,
    state: &'a mut GameState,
    blocks: Vec<Pending>,
    notifications: Vec<Notification>,
    collected: Vec<Action>,
}

/// Compose a location, applying its state changes to `state`.
pub fn compose(
    address: &Address,
    location: &Location,
    state: &mut GameState,
    config: &EngineConfig,
) -> Composition {
    let mut composer = Composer {
        address,
        config,
        state,
        blocks: Vec::new(),
        notifications: Vec::new(),
        collected: Vec::new(),
    };

    composer.push(ContentBlock::heading(address.as_str()), None);
    if let Some(letter) = location.circles_letter {
        composer.grant(letter);
    }
    composer.push_text(&location.text, false);
    for prompt in &location.prompts {
        composer.push_prompt(&prompt.text, Some(&prompt.id), prompt.hide_if_flag.as_deref(), true);
    }
    if let Some(updates) = &location.updates {
        composer.apply(updates);
    }

    let mut actions =
        ActionSet::from_actions(&location.actions, ActionSection::Location, composer.state);

    if !location.conditions.is_empty() {
        composer.run_rules(&location.conditions, 0);
    } else if !location.conditional_text.is_empty() {
        log::warn!("{address} uses deprecated conditionalText");
        composer.run_legacy(&location.conditional_text);
    } else if !location.follow_up_conditions.is_empty() && location.actions.is_empty() {
        composer.run_rules(&location.follow_up_conditions, 0);
    }

    actions.expose_all(&composer.collected, ActionSection::Conditional, composer.state);
    let blocks = composer.finish();

    Composition {
        blocks,
        actions,
        notifications: composer.notifications,
    }
}

impl Composer<'_> {
    fn push(&mut self, block: ContentBlock, hide_if_flag: Option<&str>) {
        self.blocks.push(Pending {
            block,
            hide_if_flag: hide_if_flag.map(str::to_string),
        });
    }

    fn separate(&mut self, before_prompt: bool) {
        let needed = match self.blocks.last().map(|p| &p.block) {
            None | Some(ContentBlock::Heading { .. }) | Some(ContentBlock::Separator) => false,
            Some(ContentBlock::Prompt { .. }) => !before_prompt,
            Some(_) => true,
        };
        if needed {
            self.push(ContentBlock::Separator, None);
        }
    }

    fn push_text(&mut self, raw: &str, separated: bool) {
        let blocks = render_text(raw, &self.config.substitutions);
        if blocks.is_empty() {
            return;
        }
        if separated {
            self.separate(false);
        }
        for block in blocks {
            self.push(block, None);
        }
    }

    fn push_prompt(
        &mut self,
        raw: &str,
        id: Option<&str>,
        hide_if_flag: Option<&str>,
        separated: bool,
    ) {
        let blocks = render_prompt(raw, id, &self.config.substitutions);
        if blocks.is_empty() {
            return;
        }
        if separated {
            self.separate(true);
        }
        for block in blocks {
            self.push(block, hide_if_flag);
        }
    }

    fn grant(&mut self, letter: Letter) {
        if self.state.grant_letter(letter) {
            log::info!("letter {letter} circled at {}", self.address);
            self.notifications.push(letter_notice(letter));
        }
    }

    fn apply(&mut self, updates: &Updates) {
        if let Some(letter) = self.state.apply_updates(updates) {
            log::info!("letter {letter} circled at {}", self.address);
            self.notifications.push(letter_notice(letter));
        }
    }

    fn lock_here(&mut self) {
        if self.state.lock(self.address.clone()) {
            log::info!("{} locked", self.address);
            self.notifications.push(lock_notice(self.address));
        }
    }

    fn run_rules(&mut self, rules: &[Rule], depth: usize) {
        let top = depth == 0;
        for rule in rules {
            if evaluate_rule(rule, self.state) {
                let Some(effect) = &rule.on_success else {
                    continue;
                };
                if let Some(text) = &effect.text {
                    self.push_text(text, top);
                }
                if let Some(updates) = &effect.updates {
                    self.apply(updates);
                }
                self.run_rules(&effect.follow_ups, depth + 1);
                self.collected.extend(effect.actions.iter().cloned());
            } else if let Some(prompt) = &rule.on_failure {
                self.push_prompt(prompt.text(), prompt.id(), prompt.hide_if_flag(), top);
            }
        }
    }

    fn run_legacy(&mut self, entries: &[ConditionalText]) {
        for entry in entries {
            if legacy_condition_met(entry, self.state) {
                match (&entry.text, &entry.prompt) {
                    (Some(text), _) => self.push_text(text, true),
                    (None, Some(prompt)) => self.push_prompt(prompt, None, None, true),
                    (None, None) => {}
                }
                if let Some(updates) = &entry.updates {
                    self.apply(updates);
                }
                if entry.location_lock {
                    self.lock_here();
                }
                self.collected.extend(entry.actions.iter().cloned());
            } else if let Some(prompt) = entry.prompt_if_false.as_ref().or(entry.prompt.as_ref()) {
                self.push_prompt(prompt, None, None, true);
            }
        }
    }

    /// Drop suppressed prompts and tidy the separators they leave behind.
    fn finish(&mut self) -> Vec<ContentBlock> {
        let mut out: Vec<ContentBlock> = Vec::with_capacity(self.blocks.len());
        for pending in self.blocks.drain(..) {
            let hidden = pending
                .hide_if_flag
                .as_deref()
                .is_some_and(|flag| self.state.flag_is_truthy(flag));
            if hidden {
                continue;
            }
            if pending.block.is_separator() {
                let redundant = matches!(
                    out.last(),
                    None | Some(ContentBlock::Heading { .. }) | Some(ContentBlock::Separator)
                );
                if redundant {
                    continue;
                }
            }
            out.push(pending.block);
        }
        if out.last().is_some_and(ContentBlock::is_separator) {
            out.pop();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::{Consequences, Effect, PromptBlock};

    fn letter(c: char) -> Letter {
        Letter::new(c).unwrap()
    }

    fn compose_fresh(location: &Location) -> (Composition, GameState) {
        let mut state = GameState::new();
        let address = Address::new("22 NW");
        let composition = compose(&address, location, &mut state, &EngineConfig::empty());
        (composition, state)
    }

    fn texts(blocks: &[ContentBlock]) -> Vec<&str> {
        blocks.iter().filter_map(ContentBlock::text).collect()
    }

    #[test]
    fn heading_then_text() {
        let (composition, _) = compose_fresh(&Location::new("A narrow shop."));
        assert_eq!(
            composition.blocks,
            vec![
                ContentBlock::heading("22 NW"),
                ContentBlock::paragraph("A narrow shop."),
            ]
        );
        assert!(composition.actions.is_empty());
    }

    #[test]
    fn entry_letter_is_visible_to_conditions() {
        let location = Location::new("Mrs. Hudson greets you.")
            .with_letter(letter('C'))
            .with_condition(
                Rule::requires_letter(letter('C'))
                    .on_success(Effect::text("She recognises the card.")),
            );
        let (composition, state) = compose_fresh(&location);
        assert!(state.has_letter(letter('C')));
        assert!(texts(&composition.blocks).contains(&"She recognises the card."));
        assert_eq!(composition.notifications, vec![letter_notice(letter('C'))]);
    }

    #[test]
    fn failed_rules_emit_prompts() {
        let location = Location::new("The ledger is closed.")
            .with_condition(Rule::requires_flag("hasKey").on_failure("Perhaps a key would help."));
        let (composition, _) = compose_fresh(&location);
        assert_eq!(
            composition.blocks.last(),
            Some(&ContentBlock::prompt("Perhaps a key would help."))
        );
        assert!(composition.blocks.contains(&ContentBlock::Separator));
    }

    #[test]
    fn nested_follow_ups_apply_updates_and_actions() {
        let inner = Rule::requires_flag("seenLetter").on_success(
            Effect::text("The seal is broken.")
                .with_updates(Updates::new().with_flag("sealNoticed", true))
                .with_action(Action::new("ask_seal", "Ask about the seal")),
        );
        let outer = Rule::new(cb_core::Check::Always).on_success(
            Effect::text("A letter lies on the desk.")
                .with_updates(Updates::new().with_flag("seenLetter", true))
                .with_follow_up(inner),
        );
        let (composition, state) = compose_fresh(&Location::new("Study.").with_condition(outer));
        assert!(state.flag_is_true("sealNoticed"));
        assert!(composition.actions.lookup("ask_seal").is_some());
        assert_eq!(
            composition.actions.views()[0].section,
            ActionSection::Conditional
        );
        let text = texts(&composition.blocks);
        assert!(text.contains(&"The seal is broken."));
    }

    #[test]
    fn conditions_take_precedence() {
        let location = Location::new("Hall.")
            .with_condition(
                Rule::new(cb_core::Check::Always).on_success(Effect::text("From rules.")),
            )
            .with_conditional_text(ConditionalText {
                text: Some("From legacy.".into()),
                ..ConditionalText::default()
            });
        let (composition, _) = compose_fresh(&location);
        let text = texts(&composition.blocks);
        assert!(text.contains(&"From rules."));
        assert!(!text.contains(&"From legacy."));
    }

    #[test]
    fn legacy_entries_lock_and_fall_back_to_prompts() {
        let location = Location::new("Cellar.")
            .with_conditional_text(ConditionalText {
                requires_letter: Some(letter('B')),
                text: Some("You find the bottles.".into()),
                prompt_if_false: Some("It is too dark.".into()),
                ..ConditionalText::default()
            })
            .with_conditional_text(ConditionalText {
                text: Some("The door swings shut behind you.".into()),
                location_lock: true,
                ..ConditionalText::default()
            });
        let (composition, state) = compose_fresh(&location);
        let text = texts(&composition.blocks);
        assert!(text.contains(&"It is too dark."));
        assert!(!text.contains(&"You find the bottles."));
        assert!(state.is_locked("22 NW"));
        assert!(composition.notifications.contains(&lock_notice(&Address::new("22 NW"))));
    }

    #[test]
    fn follow_ups_only_without_actions() {
        let follow_up = Rule::new(cb_core::Check::Always).on_success(Effect::text("Later."));
        let bare = Location::new("Yard.").with_follow_up(follow_up);
        let (composition, _) = compose_fresh(&bare);
        assert!(texts(&composition.blocks).contains(&"Later."));

        let with_actions = bare.with_action(Action::new("look", "Look around"));
        let (composition, _) = compose_fresh(&with_actions);
        assert!(!texts(&composition.blocks).contains(&"Later."));
    }

    #[test]
    fn prompts_are_suppressed_by_flags_set_later() {
        let location = Location::new("Office.")
            .with_prompt(PromptBlock {
                id: "ask_clerk".into(),
                text: "Perhaps ask the clerk.".into(),
                hide_if_flag: Some("clerkAsked".into()),
            })
            .with_updates(Updates::new().with_flag("clerkAsked", true));
        let (composition, _) = compose_fresh(&location);
        assert_eq!(
            composition.blocks,
            vec![
                ContentBlock::heading("22 NW"),
                ContentBlock::paragraph("Office."),
            ]
        );
    }

    #[test]
    fn flat_actions_are_gated_before_conditions() {
        let location = Location::new("Pawnshop.")
            .with_action(Action::new("pawn", "Pawn the watch").hidden_by("watchPawned"))
            .with_condition(
                Rule::new(cb_core::Check::Always).on_success(
                    Effect::text("The broker eyes you.")
                        .with_updates(Updates::new().with_flag("watchPawned", true)),
                ),
            );
        let (composition, _) = compose_fresh(&location);
        assert!(composition.actions.lookup("pawn").is_some());
    }

    #[test]
    fn repeat_compose_grants_nothing_new() {
        let location = Location::new("Baker Street.").with_letter(letter('H'));
        let mut state = GameState::new();
        let address = Address::new("221 NW");
        let config = EngineConfig::empty();
        compose(&address, &location, &mut state, &config);
        let again = compose(&address, &location, &mut state, &config);
        assert!(again.notifications.is_empty());
        assert_eq!(state.letters().count(), 1);
    }

    #[test]
    fn choice_consequences_reach_dispatch() {
        let location = Location::new("Hearth.").with_action(
            Action::new("burn", "Burn it")
                .with_consequences(Consequences::new().with_text("It curls into ash.")),
        );
        let (composition, _) = compose_fresh(&location);
        let (consequences, reason) = composition.actions.lookup("burn").unwrap();
        assert_eq!(consequences.adds_text.as_deref(), Some("It curls into ash."));
        assert!(reason.is_none());
    }
}
