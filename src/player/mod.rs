//! Per-player mutable record.
//!
//! A `Player` owns a hand, a compound, a dice pool, resources, the
//! headquarters board and the once-per-round `WorkDone` flags. Only the
//! game state machine mutates players; everything outside sees `&Player`.

pub mod headquarters;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::{BlueprintCard, CardId};
use crate::scoring::calculate_prestige;

pub use headquarters::{Floor, FloorYield, Headquarters};

/// Once-per-round progress flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDone {
    /// Took a blueprint or hired a contractor this market phase.
    pub has_drawn_card: bool,
    /// Paid to refresh the marketplace this round.
    pub has_refreshed_cards: bool,
    /// Ended the work phase.
    pub has_finished_work: bool,
}

/// One participant's state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Hand, keyed by card id.
    pub hand: BTreeMap<CardId, BlueprintCard>,
    /// Built blueprints in build order.
    pub compound: Vec<BlueprintCard>,
    /// Rolled dice not yet used.
    pub dice: Vec<u8>,
    /// Dice still to roll this round.
    pub num_dice: u32,
    /// May choose dice values instead of rolling (Engineer).
    pub selectable_dice: bool,
    /// May gain one die of a chosen value (Tinkerer).
    pub bonus_die: bool,
    pub energy: u32,
    pub metal: u32,
    pub prestige: u32,
    pub goods: u32,
    pub headquarters: Headquarters,
    pub work_done: WorkDone,
}

impl Player {
    /// Create a player with `starting_dice` unrolled dice.
    #[must_use]
    pub fn new(starting_dice: u32) -> Self {
        Self {
            hand: BTreeMap::new(),
            compound: Vec::new(),
            dice: Vec::new(),
            num_dice: starting_dice,
            selectable_dice: false,
            bonus_die: false,
            energy: 0,
            metal: 0,
            prestige: 0,
            goods: 0,
            headquarters: Headquarters::default(),
            work_done: WorkDone::default(),
        }
    }

    /// Clear all per-round state.
    pub fn reset_round(&mut self, starting_dice: u32) {
        self.dice.clear();
        self.headquarters.clear();
        self.num_dice = starting_dice;
        self.selectable_dice = false;
        self.bonus_die = false;
        self.reset_activations();
        self.work_done = WorkDone::default();
    }

    /// Make every compound card activatable again.
    pub fn reset_activations(&mut self) {
        for card in &mut self.compound {
            card.already_activated = false;
        }
    }

    /// Count of monuments already built.
    #[must_use]
    pub fn monuments_in_compound(&self) -> u32 {
        self.compound.iter().filter(|c| c.is_monument()).count() as u32
    }

    /// Mark the first not-yet-activated compound card with this name.
    ///
    /// Returns whether one was found. This is how passive compound
    /// abilities fire at most once per copy per round.
    pub fn mark_card_name_activated(&mut self, name: &str) -> bool {
        match self
            .compound
            .iter_mut()
            .find(|c| c.name == name && !c.already_activated)
        {
            Some(card) => {
                card.already_activated = true;
                true
            }
            None => false,
        }
    }

    /// Whether a same-named card is already built.
    #[must_use]
    pub fn has_built(&self, name: &str) -> bool {
        self.compound.iter().any(|c| c.name == name)
    }

    #[must_use]
    pub fn compound_card(&self, id: CardId) -> Option<&BlueprintCard> {
        self.compound.iter().find(|c| c.id == id)
    }

    pub fn compound_card_mut(&mut self, id: CardId) -> Option<&mut BlueprintCard> {
        self.compound.iter_mut().find(|c| c.id == id)
    }

    /// Add a built card and refresh prestige.
    pub fn add_to_compound(&mut self, card: BlueprintCard) {
        self.compound.push(card);
        self.recompute_prestige();
    }

    pub fn recompute_prestige(&mut self) {
        self.prestige = calculate_prestige(&self.compound);
    }

    /// Energy plus metal.
    #[must_use]
    pub fn total_resources(&self) -> u32 {
        self.energy + self.metal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;

    fn card(id: u32, name: &str) -> BlueprintCard {
        let registry = CardRegistry::standard();
        BlueprintCard::new(CardId::new(id), registry.blueprint(name).unwrap())
    }

    #[test]
    fn test_reset_round() {
        let mut player = Player::new(4);
        player.dice = vec![1, 2];
        player.num_dice = 0;
        player.selectable_dice = true;
        player.bonus_die = true;
        player.headquarters.place(Floor::Mine, 5);
        let mut built = card(1, "Biolab");
        built.already_activated = true;
        player.compound.push(built);
        player.work_done.has_finished_work = true;

        player.reset_round(4);

        assert!(player.dice.is_empty());
        assert_eq!(player.num_dice, 4);
        assert!(!player.selectable_dice);
        assert!(!player.bonus_die);
        assert!(player.headquarters.is_empty());
        assert!(!player.compound[0].already_activated);
        assert_eq!(player.work_done, WorkDone::default());
    }

    #[test]
    fn test_monuments_in_compound() {
        let mut player = Player::new(4);
        player.compound.push(card(1, "Obelisk"));
        player.compound.push(card(2, "Beacon"));
        player.compound.push(card(3, "Biolab"));
        assert_eq!(player.monuments_in_compound(), 2);
    }

    #[test]
    fn test_mark_card_name_activated_once_per_copy() {
        let mut player = Player::new(4);
        player.compound.push(card(1, "Scrap Yard"));
        player.compound.push(card(2, "Scrap Yard"));

        assert!(player.mark_card_name_activated("Scrap Yard"));
        assert!(player.mark_card_name_activated("Scrap Yard"));
        assert!(!player.mark_card_name_activated("Scrap Yard"));
        assert!(!player.mark_card_name_activated("Solar Array"));
    }

    #[test]
    fn test_add_to_compound_updates_prestige() {
        let mut player = Player::new(4);
        player.add_to_compound(card(1, "Megalith"));
        player.add_to_compound(card(2, "Beacon"));
        assert_eq!(player.prestige, 5);
    }
}
