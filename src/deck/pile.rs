//! Draw pile + discard pile with reshuffle-on-empty.
//!
//! A `Deck` owns every card of one kind that is not currently in a hand,
//! compound or the marketplace. Drawing pops from the end of the draw pile;
//! when the draw pile runs dry the discard pile is shuffled back in. That is
//! the only way cards recycle, so nothing is ever lost.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::GameRng;

/// Expand definitions into `copies` instances each, with sequential ids, then shuffle.
///
/// ```
/// use blueprint_engine::cards::{BlueprintCard, CardRegistry};
/// use blueprint_engine::core::GameRng;
/// use blueprint_engine::deck::build_deck;
///
/// let registry = CardRegistry::standard();
/// let mut rng = GameRng::new(1);
/// let deck = build_deck(registry.blueprints(), |d| d.copies, BlueprintCard::new, &mut rng);
/// assert_eq!(deck.len() as u32, registry.blueprint_copies());
/// ```
pub fn build_deck<D, C>(
    definitions: &[D],
    copies: impl Fn(&D) -> u32,
    make: impl Fn(CardId, &D) -> C,
    rng: &mut GameRng,
) -> Vec<C> {
    let mut next_id = 0u32;
    let mut cards = Vec::new();

    for def in definitions {
        for _ in 0..copies(def) {
            cards.push(make(CardId::new(next_id), def));
            next_id += 1;
        }
    }

    rng.shuffle(&mut cards);
    cards
}

/// Remove a card from a collection by id (linear scan).
pub fn remove_by_id<C: Card>(collection: &mut Vec<C>, id: CardId) -> Option<C> {
    let position = collection.iter().position(|c| c.id() == id)?;
    Some(collection.remove(position))
}

/// A draw pile and its discard pile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck<C> {
    /// Top of the pile is the end of the vec.
    draw_pile: Vec<C>,
    discard: Vec<C>,
}

impl<C: Card> Deck<C> {
    /// Wrap an already shuffled pile.
    #[must_use]
    pub fn new(draw_pile: Vec<C>) -> Self {
        Self {
            draw_pile,
            discard: Vec::new(),
        }
    }

    /// Draw the next card, reshuffling the discard pile in if the draw pile is empty.
    ///
    /// Returns `None` only when both piles are empty.
    pub fn draw_next(&mut self, rng: &mut GameRng) -> Option<C> {
        if let Some(card) = self.draw_pile.pop() {
            return Some(card);
        }
        if self.discard.is_empty() {
            return None;
        }

        log::debug!("reshuffling {} discarded cards into the deck", self.discard.len());
        self.draw_pile.append(&mut self.discard);
        rng.shuffle(&mut self.draw_pile);
        self.draw_pile.pop()
    }

    /// Put a card on the discard pile.
    pub fn discard(&mut self, card: C) {
        self.discard.push(card);
    }

    /// Put several cards on the discard pile.
    pub fn discard_all(&mut self, cards: impl IntoIterator<Item = C>) {
        self.discard.extend(cards);
    }

    /// Cards that can still be drawn (draw pile + discard).
    #[must_use]
    pub fn available(&self) -> usize {
        self.draw_pile.len() + self.discard.len()
    }

    #[must_use]
    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Read-only view of the discard pile (public information).
    #[must_use]
    pub fn discard_pile(&self) -> &[C] {
        &self.discard
    }

    /// Every card id held in either pile.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.draw_pile.iter().chain(self.discard.iter()).map(Card::id)
    }
}
