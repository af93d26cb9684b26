//! Player actions, history records and action outcomes.
//!
//! Every call the session layer can make on a match is one `Action`
//! variant. `GameState::apply` validates and performs it; accepted actions
//! are appended to the history as `ActionRecord`s so a match can be
//! replayed from its seed.
//!
//! ```
//! use blueprint_engine::core::{Action, MarketHalf, Phase, Resource};
//!
//! let refresh = Action::Refresh { half: MarketHalf::Blueprints, resource: Resource::Energy };
//! assert_eq!(refresh.name(), "refresh");
//! assert_eq!(refresh.phase(), Some(Phase::Market));
//! ```

use serde::{Deserialize, Serialize};

use super::error::Phase;
use super::player::PlayerId;
use crate::cards::{CardId, Tool};
use crate::effects::Selections;
use crate::player::{Floor, FloorYield};
use crate::scoring::Standing;

/// Which half of the marketplace a refresh replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketHalf {
    Blueprints,
    Contractors,
}

/// A spendable resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Energy,
    Metal,
}

/// One player-initiated call on the match.
///
/// Externally tagged so history stays loadable from binary snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // === Roster ===
    Join,
    Leave,

    // === Market phase ===
    /// Take a blueprint from the marketplace into hand.
    Pickup { card: CardId },

    /// Hire the contractor in a tool slot, discarding a matching hand card.
    Hire {
        tool: Tool,
        discard: CardId,
        target: Option<PlayerId>,
    },

    /// Pay to replace one half of the marketplace.
    Refresh { half: MarketHalf, resource: Resource },

    // === Work phase ===
    Roll,

    /// Set the values of every unrolled die (needs an Engineer).
    Choose { values: Vec<u8> },

    /// Gain one die of a chosen value (needs a Tinkerer).
    GainDie { value: u8 },

    Place { die: usize, floor: Floor },

    /// Build a hand card, discarding a second card with the same tool.
    Build { card: CardId, discard: CardId },

    Activate {
        card: CardId,
        selections: Selections,
        replicate: Option<CardId>,
    },

    EndTurn {
        discard: Vec<CardId>,
        energy: u32,
        metal: u32,
    },

    // === Debug ===
    /// Force the phase transition.
    ChangePhase,
}

impl Action {
    /// Short name for logs and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Join => "join",
            Action::Leave => "leave",
            Action::Pickup { .. } => "pickup",
            Action::Hire { .. } => "hire",
            Action::Refresh { .. } => "refresh",
            Action::Roll => "roll",
            Action::Choose { .. } => "choose",
            Action::GainDie { .. } => "gain_die",
            Action::Place { .. } => "place",
            Action::Build { .. } => "build",
            Action::Activate { .. } => "activate",
            Action::EndTurn { .. } => "end_turn",
            Action::ChangePhase => "change_phase",
        }
    }

    /// Phase the action is valid in, if it is phase-bound.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Action::Pickup { .. } | Action::Hire { .. } | Action::Refresh { .. } => {
                Some(Phase::Market)
            }
            Action::Roll
            | Action::Choose { .. }
            | Action::GainDie { .. }
            | Action::Place { .. }
            | Action::Build { .. }
            | Action::Activate { .. }
            | Action::EndTurn { .. } => Some(Phase::Work),
            Action::Join | Action::Leave | Action::ChangePhase => None,
        }
    }
}

/// An accepted action in match history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Position in history, starting at 0.
    pub sequence: u64,

    /// Round the action was taken in, starting at 1.
    pub round: u32,

    /// Acting player; `None` for forced phase changes.
    pub player: Option<PlayerId>,

    pub action: Action,
}

impl ActionRecord {
    #[must_use]
    pub fn new(sequence: u64, round: u32, player: Option<PlayerId>, action: Action) -> Self {
        Self {
            sequence,
            round,
            player,
            action,
        }
    }
}

/// What an accepted action produced.
///
/// Actions that close a phase report the transition instead of their own
/// result; the new state is visible through `GameState::public_state`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionOutcome {
    Accepted,
    Rolled { dice: Vec<u8> },
    Drew { cards: Vec<CardId> },
    Produced { output: FloorYield, drawn: Vec<CardId> },
    Built { card: CardId, prestige: u32 },
    Activated { drawn: Vec<CardId> },
    PhaseChanged { phase: Phase },
    MatchOver { standings: Vec<Standing> },
}
