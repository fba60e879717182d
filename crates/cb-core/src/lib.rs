//! Case data model for Casebook.
//!
//! This crate defines the static, declarative data a detective case is made
//! of: addressed locations with their narrative text, rules, actions and
//! sequences, plus the case file that frames the investigation. Nothing in
//! here changes at runtime; the engine in `cb-engine` reads it and keeps all
//! player progress separately.

/// Actions, choices, and their consequences.
pub mod action;
/// Location addresses and district grouping.
pub mod address;
/// Case file: introduction, outro, and canonical solution summary.
pub mod case;
/// The loaded case: every location plus the case file.
pub mod casebook;
/// Error types used throughout the crate.
pub mod error;
/// Flag values and state updates.
pub mod flag;
/// Legacy conditional text entries.
pub mod legacy;
/// Collectible letters.
pub mod letter;
/// Locations and sequences.
pub mod location;
/// Rules: checks with success and failure branches.
pub mod rule;
/// Consistency checks over loaded case data.
pub mod validate;

pub use action::{Action, Choice, Consequences};
pub use address::Address;
pub use case::{CanonicalLead, CaseFile, CaseSummary};
pub use casebook::Casebook;
pub use error::{LoadError, LoadResult};
pub use flag::{FlagValue, Updates};
pub use legacy::ConditionalText;
pub use letter::Letter;
pub use location::{Location, Sequence};
pub use rule::{Check, Effect, Prompt, PromptBlock, Rule};
pub use validate::{ValidationIssue, validate_casebook};
