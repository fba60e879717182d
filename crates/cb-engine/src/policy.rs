//! Lead, hint, lock and choice rules.

use cb_core::{Address, Letter};

use crate::config::EngineConfig;
use crate::error::Rejection;
use crate::state::GameState;

const HINT_PREFIX: &str = "hint_";
const HINT_TAKEN_SUFFIX: &str = "_taken";
const CHOICE_GUARD_PREFIX: &str = "choice_recorded:";

/// What a visit did to the lead counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadOutcome {
    /// First visit to an ordinary address.
    Counted,
    /// First visit to a free lead.
    Free,
    /// The address was visited before.
    Repeat,
}

/// Record a visit and count the lead it costs.
pub fn record_visit(
    address: &Address,
    state: &mut GameState,
    config: &EngineConfig,
) -> LeadOutcome {
    if !state.mark_visited(address.clone()) {
        return LeadOutcome::Repeat;
    }
    if config.is_free_lead(address.as_str()) {
        log::info!("{address} is a free lead");
        return LeadOutcome::Free;
    }
    let leads = state.add_lead();
    log::debug!("lead {leads}: {address}");
    LeadOutcome::Counted
}

/// The letter a `hint_<LETTER>` action asks about.
pub fn hint_letter(action_id: &str) -> Option<Letter> {
    let rest = action_id.strip_prefix(HINT_PREFIX)?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Letter::new(c),
        _ => None,
    }
}

/// The flag guarding a hint against being taken twice.
pub fn hint_taken_flag(letter: Letter) -> String {
    format!("{HINT_PREFIX}{letter}{HINT_TAKEN_SUFFIX}")
}

/// Whether the hint for the letter was taken.
pub fn hint_taken(letter: Letter, state: &GameState) -> bool {
    state.flag_is_truthy(&hint_taken_flag(letter))
}

/// Take a hint. Returns the hint text.
///
/// Costs one lead and sets the guard flag.
pub fn take_hint(
    letter: Letter,
    state: &mut GameState,
    config: &EngineConfig,
) -> Result<String, Rejection> {
    if hint_taken(letter, state) {
        return Err(Rejection::HintAlreadyTaken(letter));
    }
    if !state.has_letter(letter) {
        return Err(Rejection::HintLetterMissing(letter));
    }
    let text = config
        .hint(letter)
        .ok_or(Rejection::HintUnavailable(letter))?
        .to_string();
    state.set_flag(hint_taken_flag(letter), true);
    state.add_lead();
    log::info!("hint {letter} taken, leads now {}", state.leads());
    Ok(text)
}

/// The flag marking that a choice was recorded at an address.
pub fn choice_guard_flag(address: Option<&Address>) -> String {
    match address {
        Some(address) => format!("{CHOICE_GUARD_PREFIX}{address}"),
        None => CHOICE_GUARD_PREFIX.to_string(),
    }
}

/// Whether a choice was already recorded at the player's location.
pub fn choice_recorded_here(state: &GameState) -> bool {
    state.flag_is_truthy(&choice_guard_flag(state.current()))
}

/// Whether the engine itself owns a flag name.
pub fn is_reserved_flag(name: &str) -> bool {
    name.starts_with(CHOICE_GUARD_PREFIX)
        || name
            .strip_prefix(HINT_PREFIX)
            .and_then(|rest| rest.strip_suffix(HINT_TAKEN_SUFFIX))
            .is_some_and(|letter| hint_letter(&format!("{HINT_PREFIX}{letter}")).is_some())
}
