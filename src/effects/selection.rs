//! Client-supplied selections for an activation.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{ActionError, ActionResult};
use crate::player::Player;

/// Reward picked on cards that offer a choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardChoice {
    Card,
    Metal,
    Energy,
}

/// Everything a client names when activating a card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    /// Indices into the player's dice pool.
    pub dice: Vec<usize>,
    /// Hand cards to discard.
    pub cards: Vec<CardId>,
    /// Energy share for split rewards.
    pub energy: Option<u32>,
    pub reward: Option<RewardChoice>,
}

impl Selections {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dice(mut self, dice: &[usize]) -> Self {
        self.dice = dice.to_vec();
        self
    }

    #[must_use]
    pub fn with_cards(mut self, cards: &[CardId]) -> Self {
        self.cards = cards.to_vec();
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy: u32) -> Self {
        self.energy = Some(energy);
        self
    }

    #[must_use]
    pub fn with_reward(mut self, reward: RewardChoice) -> Self {
        self.reward = Some(reward);
        self
    }
}

/// Check that exactly `n` distinct cards are named and all are in hand.
pub fn check_hand_cards(player: &Player, cards: &[CardId], n: usize) -> ActionResult<()> {
    if cards.len() != n {
        return Err(ActionError::selection(format!(
            "expected {} cards, got {}",
            n,
            cards.len()
        )));
    }
    for (i, id) in cards.iter().enumerate() {
        if cards[..i].contains(id) {
            return Err(ActionError::selection(format!("{} selected twice", id)));
        }
        if !player.hand.contains_key(id) {
            return Err(ActionError::not_owned(id.to_string()));
        }
    }
    Ok(())
}
