//! Casebook engine: state, rules and narrative composition.
//!
//! A [`Session`] owns a loaded [`cb_core::Casebook`], the player's
//! [`GameState`] and what is currently on screen. Visiting an address
//! composes the location's narrative while applying its state changes;
//! firing an action runs its consequences through a fixed pipeline.
//!
//! Nothing here does I/O. Results come back as [`RenderResult`]s for a
//! front end to draw.

/// Narrative composition of locations.
pub mod composer;
/// Engine configuration.
pub mod config;
/// Address directory grouped by district.
pub mod directory;
/// Engine errors and player-facing rejections.
pub mod error;
/// Condition evaluation.
pub mod evaluator;
/// Action visibility and disable rules.
pub mod gates;
/// Text cleanup and placeholder substitution.
pub mod markup;
/// Lead, hint, lock and choice rules.
pub mod policy;
/// Renderer-facing output types.
pub mod present;
/// Consequence pipeline.
pub mod resolver;
/// Named sequences.
pub mod sequence;
/// Play sessions.
pub mod session;
/// The State Store.
pub mod state;

pub use composer::{Composition, compose};
pub use config::{EngineConfig, Substitution};
pub use directory::{DirectoryEntry, DistrictGroup};
pub use error::{EngineError, EngineResult, Rejection};
pub use evaluator::{evaluate, evaluate_rule, legacy_condition_met};
pub use gates::{ActionSet, LEAVE_ACTION_ID};
pub use policy::LeadOutcome;
pub use present::{
    ActionSection, ActionView, ChoiceView, ContentBlock, Notification, RenderMode, RenderResult,
    Severity,
};
pub use resolver::{PIPELINE, Resolution, ResolveContext, Stage, resolve};
pub use sequence::{SequenceOutput, run_sequence};
pub use session::{CaseSummaryView, Session};
pub use state::GameState;
