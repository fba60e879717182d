//! Error types for the engine.

use cb_core::{Address, Letter, LoadError};
use thiserror::Error;

use crate::present::Notification;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// A request the engine refuses on purpose. State is left untouched.
///
/// The display text is meant for the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The location was locked earlier in the session.
    #[error("You cannot return to {0}.")]
    LocationLocked(Address),

    /// A choice was already recorded at this location.
    #[error("You already made a choice here.")]
    ChoiceAlreadyMade,

    /// The hint requires a letter the player does not own.
    #[error("You need letter {0} circled to get this hint.")]
    HintLetterMissing(Letter),

    /// The hint was already taken.
    #[error("You have already taken Hint {0}.")]
    HintAlreadyTaken(Letter),

    /// No hint text is configured for the letter.
    #[error("There is no hint for letter {0}.")]
    HintUnavailable(Letter),

    /// The action is shown but disabled.
    #[error("{reason}")]
    ActionDisabled {
        /// The action or choice id.
        id: String,
        /// Why it is disabled.
        reason: String,
    },
}

/// Errors that can occur while playing a case.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No location data exists for the address.
    #[error("location not found: {0}")]
    NotFound(Address),

    /// A consequence referenced a sequence the location does not define.
    #[error("sequence \"{sequence}\" not found at {address}")]
    SequenceNotFound {
        /// The location that was searched.
        address: Address,
        /// The missing sequence id.
        sequence: String,
    },

    /// The operation needs a current location but the player is not at one.
    #[error("not at a location")]
    NoCurrentLocation,

    /// The action id is not among the actions currently on offer.
    #[error("action not available: {0}")]
    ActionUnavailable(String),

    /// The engine refused the request.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// Engine configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),
}

impl EngineError {
    /// True for refusals meant to be shown to the player as-is.
    pub fn is_rejection(&self) -> bool {
        matches!(self, EngineError::Rejected(_))
    }

    /// The error as a notification for a renderer.
    pub fn notification(&self) -> Notification {
        Notification::error(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_are_player_facing() {
        let letter = Letter::new('F').unwrap();
        assert_eq!(
            Rejection::HintLetterMissing(letter).to_string(),
            "You need letter F circled to get this hint."
        );
        let err = EngineError::from(Rejection::LocationLocked(Address::new("68 WC")));
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "You cannot return to 68 WC.");
    }

    #[test]
    fn data_errors_are_not_rejections() {
        let err = EngineError::NotFound(Address::new("99 ZZ"));
        assert!(!err.is_rejection());
        assert_eq!(err.notification().message, "location not found: 99 ZZ");
    }
}
