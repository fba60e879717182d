//! Consistency checks over loaded case data.
//!
//! Loading only guarantees that the JSON has the right shape. These checks
//! catch authoring mistakes the engine would otherwise tolerate silently at
//! runtime: rules it cannot evaluate, sequences that do not exist, actions
//! it will skip.

use std::collections::HashSet;

use crate::address::Address;
use crate::casebook::Casebook;
use crate::letter::Letter;
use crate::location::Location;
use crate::rule::Check;

/// A warning or error found during validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// The address (or `case file`) where the issue was found.
    pub location: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.location, self.message)
    }
}

/// Validate a casebook.
///
/// `alphabet` is the set of letters the case uses; an empty slice skips the
/// letter check.
pub fn validate_casebook(book: &Casebook, alphabet: &[Letter]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if book.is_empty() {
        issues.push(ValidationIssue::error("case", "no locations defined"));
    }
    if book.case().intro.trim().is_empty() {
        issues.push(ValidationIssue::warning("case file", "introduction is empty"));
    }

    for (address, location) in book.locations() {
        validate_location(address, location, alphabet, &mut issues);
    }

    issues
}

fn validate_location(
    address: &Address,
    location: &Location,
    alphabet: &[Letter],
    issues: &mut Vec<ValidationIssue>,
) {
    let at = address.as_str();

    if !address.is_well_formed() {
        issues.push(ValidationIssue::warning(
            at,
            "address does not follow \"<number> <DISTRICT>\"; it will not be grouped by district",
        ));
    }

    if location.text.trim().is_empty() {
        issues.push(ValidationIssue::warning(at, "location has no text"));
    }

    if !location.conditions.is_empty() && !location.conditional_text.is_empty() {
        issues.push(ValidationIssue::warning(
            at,
            "conditionalText is ignored because conditions are present",
        ));
    }

    for rule in location.all_rules() {
        if let Check::Unknown(raw) = &rule.check {
            issues.push(ValidationIssue::warning(
                at,
                format!("unknown condition check \"{raw}\" will never pass"),
            ));
        }
    }

    if !alphabet.is_empty() {
        for letter in location.granted_letters() {
            if !alphabet.contains(&letter) {
                issues.push(ValidationIssue::warning(
                    at,
                    format!("letter {letter} is not part of the case alphabet"),
                ));
            }
        }
    }

    let mut seen_ids = HashSet::new();
    for action in location.all_actions() {
        if !action.is_renderable() {
            issues.push(ValidationIssue::warning(
                at,
                "action without id or text will be skipped",
            ));
            continue;
        }

        for (id, consequences) in action.dispatch_entries() {
            if !seen_ids.insert(id.to_string()) {
                issues.push(ValidationIssue::warning(
                    at,
                    format!("action id \"{id}\" is declared more than once"),
                ));
            }
            let Some(sequence) = &consequences.triggers_sequence else {
                continue;
            };
            if !location.sequences.contains_key(sequence) {
                issues.push(ValidationIssue::error(
                    at,
                    format!("action \"{id}\" triggers unknown sequence \"{sequence}\""),
                ));
            }
        }

        for choice in &action.choices {
            if choice.id.is_empty() || choice.text.is_empty() {
                issues.push(ValidationIssue::warning(
                    at,
                    format!("choice in \"{}\" without id or text will be skipped", action.id),
                ));
            }
        }
    }
}
