//! Rejected-action errors and snapshot errors.
//!
//! Every failure a player can provoke is an `ActionError`. None of them are
//! fatal: the action is dropped, state is unchanged, and the reason goes back
//! to the acting client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::PlayerId;

/// Which phase an action belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Turn-based drafting from the marketplace.
    Market,
    /// Simultaneous dice, build and activation phase.
    Work,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Market => f.write_str("market"),
            Phase::Work => f.write_str("work"),
        }
    }
}

/// Resource named in an insufficiency error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shortfall {
    Energy,
    Metal,
    Dice,
    Cards,
}

impl std::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Shortfall::Energy => "energy",
            Shortfall::Metal => "metal",
            Shortfall::Dice => "dice",
            Shortfall::Cards => "cards",
        };
        f.write_str(name)
    }
}

/// A rejected player action.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionError {
    #[error("action requires the {expected} phase")]
    WrongPhase { expected: Phase },

    #[error("not {attempted}'s turn (current: {current})")]
    NotYourTurn { current: PlayerId, attempted: PlayerId },

    #[error("already done this round: {action}")]
    AlreadyActed { action: String },

    #[error("not held: {what}")]
    NotOwned { what: String },

    #[error("not enough {resource}: need {needed}, have {available}")]
    InsufficientResources {
        resource: Shortfall,
        needed: u32,
        available: u32,
    },

    #[error("invalid selection: {reason}")]
    InvalidSelection { reason: String },

    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("player already registered: {0}")]
    DuplicatePlayer(PlayerId),

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("marketplace slot is empty: {0}")]
    EmptySlot(String),

    #[error("rule violation: {0}")]
    RuleViolation(String),

    #[error("no cards left in deck or discard")]
    DeckExhausted,

    #[error("the match is over")]
    GameOver,
}

/// Result type for player actions.
pub type ActionResult<T> = Result<T, ActionError>;

impl ActionError {
    pub fn wrong_phase(expected: Phase) -> Self {
        Self::WrongPhase { expected }
    }

    pub fn already(action: impl Into<String>) -> Self {
        Self::AlreadyActed {
            action: action.into(),
        }
    }

    pub fn not_owned(what: impl Into<String>) -> Self {
        Self::NotOwned { what: what.into() }
    }

    pub fn selection(reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            reason: reason.into(),
        }
    }

    pub fn rule(rule: impl Into<String>) -> Self {
        Self::RuleViolation(rule.into())
    }

    /// Fail unless `available >= needed`.
    pub fn require(resource: Shortfall, needed: u32, available: u32) -> ActionResult<()> {
        if available >= needed {
            Ok(())
        } else {
            Err(Self::InsufficientResources {
                resource,
                needed,
                available,
            })
        }
    }
}

/// Failure while saving or loading a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(ActionError::require(Shortfall::Energy, 2, 2).is_ok());
        assert_eq!(
            ActionError::require(Shortfall::Metal, 3, 1),
            Err(ActionError::InsufficientResources {
                resource: Shortfall::Metal,
                needed: 3,
                available: 1,
            })
        );
    }

    #[test]
    fn test_messages() {
        let err = ActionError::NotYourTurn {
            current: PlayerId::new("a"),
            attempted: PlayerId::new("b"),
        };
        assert_eq!(err.to_string(), "not b's turn (current: a)");
        assert_eq!(
            ActionError::wrong_phase(Phase::Work).to_string(),
            "action requires the work phase"
        );
    }

    #[test]
    fn test_error_serializes_for_clients() {
        let err = ActionError::selection("dice values are not equal");
        let json = serde_json::to_string(&err).unwrap();
        let back: ActionError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
