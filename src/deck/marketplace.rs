//! The shared marketplace.
//!
//! Holds up to N face-up blueprints and one contractor slot per tool.
//! Refilling draws from the matching `Deck`; a slot stays empty when both
//! piles are exhausted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pile::{remove_by_id, Deck};
use crate::cards::{BlueprintCard, CardId, ContractorCard, Tool};
use crate::core::GameRng;

/// Face-up blueprints and contractor slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marketplace {
    pub blueprints: Vec<BlueprintCard>,
    pub contractors: BTreeMap<Tool, Option<ContractorCard>>,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self {
            blueprints: Vec::new(),
            contractors: Tool::ALL.iter().map(|&t| (t, None)).collect(),
        }
    }
}

impl Marketplace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Top blueprints up to `size` and fill every empty contractor slot.
    pub fn refill(
        &mut self,
        size: usize,
        blueprints: &mut Deck<BlueprintCard>,
        contractors: &mut Deck<ContractorCard>,
        rng: &mut GameRng,
    ) {
        self.refill_blueprints(size, blueprints, rng);
        self.refill_contractors(contractors, rng);
    }

    pub fn refill_blueprints(
        &mut self,
        size: usize,
        deck: &mut Deck<BlueprintCard>,
        rng: &mut GameRng,
    ) {
        while self.blueprints.len() < size {
            match deck.draw_next(rng) {
                Some(card) => self.blueprints.push(card),
                None => {
                    log::debug!("no blueprints left to fill the marketplace");
                    break;
                }
            }
        }
    }

    pub fn refill_contractors(&mut self, deck: &mut Deck<ContractorCard>, rng: &mut GameRng) {
        for slot in self.contractors.values_mut() {
            if slot.is_none() {
                *slot = deck.draw_next(rng);
            }
        }
    }

    /// Look at a face-up blueprint.
    #[must_use]
    pub fn blueprint(&self, id: CardId) -> Option<&BlueprintCard> {
        self.blueprints.iter().find(|c| c.id == id)
    }

    /// Take a face-up blueprint.
    pub fn take_blueprint(&mut self, id: CardId) -> Option<BlueprintCard> {
        remove_by_id(&mut self.blueprints, id)
    }

    /// Look at the contractor in a tool slot.
    #[must_use]
    pub fn contractor(&self, tool: Tool) -> Option<&ContractorCard> {
        self.contractors.get(&tool).and_then(Option::as_ref)
    }

    /// Take the contractor out of a tool slot.
    pub fn take_contractor(&mut self, tool: Tool) -> Option<ContractorCard> {
        self.contractors.get_mut(&tool).and_then(Option::take)
    }

    /// Empty the blueprint row.
    pub fn clear_blueprints(&mut self) -> Vec<BlueprintCard> {
        std::mem::take(&mut self.blueprints)
    }

    /// Empty every contractor slot.
    pub fn clear_contractors(&mut self) -> Vec<ContractorCard> {
        self.contractors.values_mut().filter_map(Option::take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;
    use crate::deck::build_deck;

    fn decks(rng: &mut GameRng) -> (Deck<BlueprintCard>, Deck<ContractorCard>) {
        let registry = CardRegistry::standard();
        let blueprints = build_deck(registry.blueprints(), |d| d.copies, BlueprintCard::new, rng);
        let contractors =
            build_deck(registry.contractors(), |d| d.copies, ContractorCard::new, rng);
        (Deck::new(blueprints), Deck::new(contractors))
    }

    #[test]
    fn test_refill_fills_every_slot() {
        let mut rng = GameRng::new(5);
        let (mut bp, mut ct) = decks(&mut rng);
        let mut market = Marketplace::new();

        market.refill(4, &mut bp, &mut ct, &mut rng);

        assert_eq!(market.blueprints.len(), 4);
        for tool in Tool::ALL {
            assert!(market.contractor(tool).is_some());
        }
    }

    #[test]
    fn test_take_and_refill_one() {
        let mut rng = GameRng::new(5);
        let (mut bp, mut ct) = decks(&mut rng);
        let mut market = Marketplace::new();
        market.refill(4, &mut bp, &mut ct, &mut rng);

        let id = market.blueprints[1].id;
        assert!(market.take_blueprint(id).is_some());
        assert!(market.blueprint(id).is_none());
        assert_eq!(market.blueprints.len(), 3);

        assert!(market.take_contractor(Tool::Gear).is_some());
        assert!(market.take_contractor(Tool::Gear).is_none());

        market.refill(4, &mut bp, &mut ct, &mut rng);
        assert_eq!(market.blueprints.len(), 4);
        assert!(market.contractor(Tool::Gear).is_some());
    }

    #[test]
    fn test_refill_stops_when_exhausted() {
        let mut rng = GameRng::new(5);
        let mut bp: Deck<BlueprintCard> = Deck::new(Vec::new());
        let mut market = Marketplace::new();
        market.refill_blueprints(4, &mut bp, &mut rng);
        assert!(market.blueprints.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut rng = GameRng::new(5);
        let (mut bp, mut ct) = decks(&mut rng);
        let mut market = Marketplace::new();
        market.refill(4, &mut bp, &mut ct, &mut rng);

        assert_eq!(market.clear_blueprints().len(), 4);
        assert_eq!(market.clear_contractors().len(), 4);
        assert!(market.contractor(Tool::Hammer).is_none());
    }
}
