//! Broadcast-safe projection of a match.

use serde::{Deserialize, Serialize};

use crate::core::{Phase, PlayerId};
use crate::deck::Marketplace;
use crate::player::Player;
use crate::scoring::Standing;

use super::GameState;

/// One seat as observers see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub player: Player,
}

/// Everything observers may see. Deck order is never included, only sizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    pub phase: Phase,
    pub round: u32,
    pub current_player: Option<PlayerId>,
    pub final_round: bool,
    pub marketplace: Marketplace,
    pub players: Vec<PlayerView>,
    pub deck_size: usize,
    pub discard_size: usize,
    pub contractor_deck_size: usize,
    pub contractor_discard_size: usize,
    pub standings: Option<Vec<Standing>>,
}

impl GameState {
    #[must_use]
    pub fn public_state(&self) -> PublicState {
        PublicState {
            phase: self.phase,
            round: self.round,
            current_player: self.current_player.clone(),
            final_round: self.final_round,
            marketplace: self.marketplace.clone(),
            players: self
                .players
                .iter()
                .map(|(id, player)| PlayerView {
                    id: id.clone(),
                    player: player.clone(),
                })
                .collect(),
            deck_size: self.blueprints.draw_pile_len(),
            discard_size: self.blueprints.discard_len(),
            contractor_deck_size: self.contractors.draw_pile_len(),
            contractor_discard_size: self.contractors.discard_len(),
            standings: self.standings.clone(),
        }
    }
}
