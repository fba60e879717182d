//! The Condition Evaluator.

use cb_core::{Check, ConditionalText, Rule};

use crate::state::GameState;

/// Evaluate a check against the current state.
///
/// Unknown check kinds are logged and treated as unmet.
pub fn evaluate(check: &Check, state: &GameState) -> bool {
    match check {
        Check::Always => true,
        Check::RequiresLetter(letter) => state.has_letter(*letter),
        Check::RequiresFlag(name) => state.flag_is_true(name),
        Check::Unknown(raw) => {
            log::warn!("unknown condition check \"{raw}\", treating as unmet");
            false
        }
    }
}

/// Evaluate a rule's check.
pub fn evaluate_rule(rule: &Rule, state: &GameState) -> bool {
    evaluate(&rule.check, state)
}

/// Whether a legacy conditional text entry applies.
///
/// Met when no letter is required, the required letter is circled, or the
/// required flag is truthy.
pub fn legacy_condition_met(entry: &ConditionalText, state: &GameState) -> bool {
    match entry.requires_letter {
        None => true,
        Some(letter) if state.has_letter(letter) => true,
        Some(_) => entry
            .requires_flag
            .as_deref()
            .is_some_and(|flag| state.flag_is_truthy(flag)),
    }
}
