//! The Action Resolver.
//!
//! Consequences run through a fixed pipeline of stages. Each stage reads
//! one key of [`Consequences`] and may stop the pipeline.

use cb_core::{Consequences, Location};

use crate::composer::lock_notice;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, Rejection};
use crate::markup::render_text;
use crate::policy::choice_guard_flag;
use crate::present::{ContentBlock, Notification};
use crate::sequence::{SequenceOutput, run_sequence};
use crate::state::GameState;

/// One step of consequence handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Merge `setsFlag` into the flags.
    SetsFlag,
    /// Lock the current location.
    LocksLocation,
    /// Record which action fired.
    RecordsChoice,
    /// Append text.
    AddsText,
    /// Run a sequence and stop.
    TriggersSequence,
    /// Mark the interaction as over.
    EndsInteraction,
}

/// The order in which stages run.
pub const PIPELINE: [Stage; 6] = [
    Stage::SetsFlag,
    Stage::LocksLocation,
    Stage::RecordsChoice,
    Stage::AddsText,
    Stage::TriggersSequence,
    Stage::EndsInteraction,
];

/// Whether the pipeline goes on after a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next stage.
    Continue,
    /// Stop here.
    Stop,
}

/// What resolving an action produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Whether any stage changed the state.
    pub state_changed: bool,
    /// Whether the interaction ended.
    pub ends_interaction: bool,
    /// Whether text was appended.
    pub added_text: bool,
    /// The sequence that fired, if any.
    pub sequence_id: Option<String>,
    /// The sequence's output.
    pub sequence: Option<SequenceOutput>,
    /// Blocks to append.
    pub blocks: Vec<ContentBlock>,
    /// Notices raised.
    pub notifications: Vec<Notification>,
}

/// Everything a stage may read.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Id of the action that fired.
    pub action_id: &'a str,
    /// Its consequences.
    pub consequences: &'a Consequences,
    /// The current location's data, if the player is at one.
    pub location: Option<&'a Location>,
    /// Engine configuration.
    pub config: &'a EngineConfig,
}

/// Run the consequences of an action through [`PIPELINE`].
pub fn resolve(ctx: &ResolveContext<'_>, state: &mut GameState) -> EngineResult<Resolution> {
    let mut resolution = Resolution::default();
    for stage in PIPELINE {
        if stage.apply(ctx, state, &mut resolution)? == Flow::Stop {
            break;
        }
    }
    Ok(resolution)
}

impl Stage {
    /// Run this stage.
    pub fn apply(
        self,
        ctx: &ResolveContext<'_>,
        state: &mut GameState,
        resolution: &mut Resolution,
    ) -> EngineResult<Flow> {
        match self {
            Stage::SetsFlag => Ok(sets_flag(ctx, state, resolution)),
            Stage::LocksLocation => locks_location(ctx, state, resolution),
            Stage::RecordsChoice => records_choice(ctx, state, resolution),
            Stage::AddsText => Ok(adds_text(ctx, resolution)),
            Stage::TriggersSequence => triggers_sequence(ctx, state, resolution),
            Stage::EndsInteraction => {
                resolution.ends_interaction = ctx.consequences.ends_interaction;
                Ok(Flow::Continue)
            }
        }
    }
}

fn sets_flag(ctx: &ResolveContext<'_>, state: &mut GameState, resolution: &mut Resolution) -> Flow {
    for (name, value) in &ctx.consequences.sets_flag {
        log::debug!("{} sets {name} = {value}", ctx.action_id);
        state.set_flag(name.clone(), value.clone());
        resolution.state_changed = true;
    }
    Flow::Continue
}

fn locks_location(
    ctx: &ResolveContext<'_>,
    state: &mut GameState,
    resolution: &mut Resolution,
) -> EngineResult<Flow> {
    if !ctx.consequences.locks_location {
        return Ok(Flow::Continue);
    }
    let address = state.current().cloned().ok_or(EngineError::NoCurrentLocation)?;
    if state.lock(address.clone()) {
        log::info!("{address} locked by {}", ctx.action_id);
        resolution.notifications.push(lock_notice(&address));
        resolution.state_changed = true;
    }
    Ok(Flow::Continue)
}

fn records_choice(
    ctx: &ResolveContext<'_>,
    state: &mut GameState,
    resolution: &mut Resolution,
) -> EngineResult<Flow> {
    let Some(flag) = &ctx.consequences.records_choice else {
        return Ok(Flow::Continue);
    };
    let guard = choice_guard_flag(state.current());
    if state.flag_is_truthy(&guard) {
        return Err(Rejection::ChoiceAlreadyMade.into());
    }
    log::info!("choice {flag} = {}", ctx.action_id);
    state.set_flag(flag.clone(), ctx.action_id);
    state.set_flag(guard, true);
    resolution.state_changed = true;
    Ok(Flow::Continue)
}

fn adds_text(ctx: &ResolveContext<'_>, resolution: &mut Resolution) -> Flow {
    if let Some(text) = &ctx.consequences.adds_text {
        let blocks = render_text(text, &ctx.config.substitutions);
        if !blocks.is_empty() {
            resolution.blocks.push(ContentBlock::Separator);
            resolution.blocks.extend(blocks);
            resolution.added_text = true;
        }
    }
    Flow::Continue
}

fn triggers_sequence(
    ctx: &ResolveContext<'_>,
    state: &mut GameState,
    resolution: &mut Resolution,
) -> EngineResult<Flow> {
    let Some(sequence_id) = &ctx.consequences.triggers_sequence else {
        return Ok(Flow::Continue);
    };
    let address = state.current().cloned().ok_or(EngineError::NoCurrentLocation)?;
    let location = ctx.location.ok_or(EngineError::NoCurrentLocation)?;
    let output = run_sequence(&address, location, sequence_id, state, ctx.config)?;
    resolution.sequence_id = Some(sequence_id.clone());
    resolution.sequence = Some(output);
    Ok(Flow::Stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::{Address, Sequence};

    struct Fixture {
        location: Location,
        config: EngineConfig,
        state: GameState,
    }

    impl Fixture {
        fn new() -> Self {
            let mut state = GameState::new();
            state.set_current(Some(Address::new("68 WC")));
            Self {
                location: Location::new("Laundry.")
                    .with_sequence("search", Sequence::text("A scorched uniform.")),
                config: EngineConfig::default(),
                state,
            }
        }

        fn resolve(&mut self, id: &str, consequences: &Consequences) -> EngineResult<Resolution> {
            let ctx = ResolveContext {
                action_id: id,
                consequences,
                location: Some(&self.location),
                config: &self.config,
            };
            resolve(&ctx, &mut self.state)
        }
    }

    #[test]
    fn pipeline_order_is_fixed() {
        assert_eq!(PIPELINE[0], Stage::SetsFlag);
        assert_eq!(PIPELINE[4], Stage::TriggersSequence);
        assert_eq!(PIPELINE[5], Stage::EndsInteraction);
    }

    #[test]
    fn flags_mark_state_changed() {
        let mut fx = Fixture::new();
        let resolution = fx
            .resolve("ask", &Consequences::new().with_flag("askedCook", true))
            .unwrap();
        assert!(resolution.state_changed);
        assert!(fx.state.flag_is_true("askedCook"));
    }

    #[test]
    fn lock_is_idempotent() {
        let mut fx = Fixture::new();
        let lock = Consequences::new().with_lock();
        let first = fx.resolve("seal", &lock).unwrap();
        assert!(first.state_changed);
        assert_eq!(first.notifications[0].message, "68 WC is now locked.");
        let second = fx.resolve("seal", &lock).unwrap();
        assert!(!second.state_changed);
        assert!(second.notifications.is_empty());
        assert!(fx.state.is_locked("68 WC"));
    }

    #[test]
    fn lock_without_location() {
        let mut fx = Fixture::new();
        fx.state.set_current(None);
        let err = fx.resolve("seal", &Consequences::new().with_lock()).unwrap_err();
        assert!(matches!(err, EngineError::NoCurrentLocation));
    }

    #[test]
    fn choices_are_recorded_once() {
        let mut fx = Fixture::new();
        let burn = Consequences::new().with_recorded_choice("burnedUniform");
        fx.resolve("burn_footman", &burn).unwrap();
        assert_eq!(
            fx.state.flag("burnedUniform").and_then(|v| v.as_text()),
            Some("burn_footman")
        );
        assert!(fx.state.flag_is_true("choice_recorded:68 WC"));
        let err = fx.resolve("burn_butler", &burn).unwrap_err();
        assert!(matches!(err, EngineError::Rejected(Rejection::ChoiceAlreadyMade)));
        assert_eq!(
            fx.state.flag("burnedUniform").and_then(|v| v.as_text()),
            Some("burn_footman")
        );
    }

    #[test]
    fn text_is_not_a_state_change() {
        let mut fx = Fixture::new();
        let resolution = fx
            .resolve("look", &Consequences::new().with_text("Soot everywhere."))
            .unwrap();
        assert!(!resolution.state_changed);
        assert!(resolution.added_text);
        assert_eq!(
            resolution.blocks,
            vec![ContentBlock::Separator, ContentBlock::paragraph("Soot everywhere.")]
        );
    }

    #[test]
    fn sequences_stop_the_pipeline() {
        let mut fx = Fixture::new();
        let resolution = fx
            .resolve("search", &Consequences::new().with_sequence("search").with_end())
            .unwrap();
        assert_eq!(resolution.sequence_id.as_deref(), Some("search"));
        assert!(resolution.sequence.is_some());
        assert!(!resolution.ends_interaction);
    }

    #[test]
    fn missing_sequence_is_an_error() {
        let mut fx = Fixture::new();
        let err = fx
            .resolve("search", &Consequences::new().with_sequence("nowhere"))
            .unwrap_err();
        assert!(matches!(err, EngineError::SequenceNotFound { .. }));
    }

    #[test]
    fn end_interaction_is_reported() {
        let mut fx = Fixture::new();
        let resolution = fx.resolve("go", &Consequences::new().with_end()).unwrap();
        assert!(resolution.ends_interaction);
        assert!(!resolution.added_text);
    }

    #[test]
    fn blank_text_counts_as_no_text() {
        let mut fx = Fixture::new();
        let resolution = fx
            .resolve("go", &Consequences::new().with_text("  [cite: 3]").with_end())
            .unwrap();
        assert!(resolution.blocks.is_empty());
        assert!(!resolution.added_text);
        assert!(resolution.ends_interaction);
    }
}
