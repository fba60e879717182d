//! The Sequence Runner.

use cb_core::{Address, Location};

use crate::composer::letter_notice;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::gates::ActionSet;
use crate::markup::render_text;
use crate::present::{ActionSection, ContentBlock, Notification};
use crate::state::GameState;

/// Output of a sequence, appended to the current display.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOutput {
    /// Blocks to append, starting with a separator.
    pub blocks: Vec<ContentBlock>,
    /// Actions that replace the current ones.
    pub actions: ActionSet,
    /// Notices raised by the sequence.
    pub notifications: Vec<Notification>,
}

/// Run a named sequence of the location.
pub fn run_sequence(
    address: &Address,
    location: &Location,
    sequence_id: &str,
    state: &mut GameState,
    config: &EngineConfig,
) -> EngineResult<SequenceOutput> {
    let sequence = location
        .sequences
        .get(sequence_id)
        .ok_or_else(|| EngineError::SequenceNotFound {
            address: address.clone(),
            sequence: sequence_id.to_string(),
        })?;
    log::debug!("running sequence {sequence_id} at {address}");

    let mut blocks = Vec::new();
    if let Some(text) = &sequence.text {
        let rendered = render_text(text, &config.substitutions);
        if !rendered.is_empty() {
            blocks.push(ContentBlock::Separator);
            blocks.extend(rendered);
        }
    }

    let mut notifications = Vec::new();
    if let Some(letter) = sequence.updates.as_ref().and_then(|u| state.apply_updates(u)) {
        log::info!("letter {letter} circled by sequence {sequence_id}");
        notifications.push(letter_notice(letter));
    }

    let actions = if sequence.actions.is_empty() && sequence.ends_interaction != Some(false) {
        ActionSet::leave(&config.leave_label)
    } else {
        ActionSet::from_actions(&sequence.actions, ActionSection::Sequence, state)
    };

    Ok(SequenceOutput {
        blocks,
        actions,
        notifications,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::{Action, Letter, Sequence, Updates};

    fn run(location: &Location, id: &str, state: &mut GameState) -> EngineResult<SequenceOutput> {
        run_sequence(&Address::new("68 WC"), location, id, state, &EngineConfig::default())
    }

    #[test]
    fn text_updates_and_actions() {
        let location = Location::new("Laundry.").with_sequence(
            "search",
            Sequence::text("Under the tub: a scorched uniform.")
                .with_updates(
                    Updates::new()
                        .with_letter(Letter::new('R').unwrap())
                        .with_flag("foundUniform", true),
                )
                .with_action(Action::new("burn", "Burn it")),
        );
        let mut state = GameState::new();
        let output = run(&location, "search", &mut state).unwrap();
        assert_eq!(output.blocks[0], ContentBlock::Separator);
        assert_eq!(output.blocks[1], ContentBlock::paragraph("Under the tub: a scorched uniform."));
        assert!(state.flag_is_true("foundUniform"));
        assert_eq!(output.notifications.len(), 1);
        assert_eq!(output.actions.views()[0].section, ActionSection::Sequence);
    }

    #[test]
    fn no_actions_means_leave() {
        let location =
            Location::new("Laundry.").with_sequence("done", Sequence::text("That is all."));
        let output = run(&location, "done", &mut GameState::new()).unwrap();
        assert!(output.actions.offers_leave());
    }

    #[test]
    fn open_ended_sequences_expose_nothing() {
        let mut sequence = Sequence::text("You wait.");
        sequence.ends_interaction = Some(false);
        let location = Location::new("Laundry.").with_sequence("wait", sequence);
        let output = run(&location, "wait", &mut GameState::new()).unwrap();
        assert!(output.actions.is_empty());
        assert!(!output.actions.offers_leave());
    }

    #[test]
    fn unknown_sequence() {
        let location = Location::new("Laundry.");
        let mut state = GameState::new();
        let err = run(&location, "missing", &mut state).unwrap_err();
        assert!(matches!(
            err,
            EngineError::SequenceNotFound { ref sequence, .. } if sequence == "missing"
        ));
        assert_eq!(state, GameState::new());
    }
}
