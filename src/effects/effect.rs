//! Staged effect operations.
//!
//! A card handler never touches a player directly. It returns an
//! `EffectBatch`: an ordered list of atomic `Effect`s that the
//! `EffectResolver` commits once every check has passed.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;

/// An atomic change to the acting player.
///
/// ## Costs
/// - `SpendEnergy`, `SpendMetal`: debit resources
/// - `ConsumeDice`: remove dice from the pool by index
/// - `DiscardFromHand`: move hand cards to the blueprint discard
///
/// ## Outputs
/// - `GainEnergy`, `GainMetal`, `GainGoods`
/// - `DrawCards`: draw from the blueprint deck into hand
/// - `GainDice`: add unrolled dice for this round
///
/// ## In-place
/// - `SetDie`: change a die's face without consuming it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    ConsumeDice(SmallVec<[usize; 4]>),
    SetDie { index: usize, value: u8 },
    DiscardFromHand(Vec<CardId>),
    SpendEnergy(u32),
    SpendMetal(u32),
    GainEnergy(u32),
    GainMetal(u32),
    GainGoods(u32),
    DrawCards(u32),
    GainDice(u32),
}

impl Effect {
    /// Consume the dice at these indices.
    pub fn consume(indices: &[usize]) -> Self {
        Self::ConsumeDice(indices.iter().copied().collect())
    }

    /// Discard these hand cards.
    pub fn discard(cards: &[CardId]) -> Self {
        Self::DiscardFromHand(cards.to_vec())
    }
}

/// Resources and cards a rule produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gains {
    pub goods: u32,
    pub energy: u32,
    pub metal: u32,
    pub cards: u32,
}

impl Gains {
    #[must_use]
    pub const fn goods(goods: u32) -> Self {
        Self { goods, energy: 0, metal: 0, cards: 0 }
    }

    #[must_use]
    pub const fn energy(energy: u32) -> Self {
        Self { goods: 0, energy, metal: 0, cards: 0 }
    }

    #[must_use]
    pub const fn metal(metal: u32) -> Self {
        Self { goods: 0, energy: 0, metal, cards: 0 }
    }

    #[must_use]
    pub const fn cards(cards: u32) -> Self {
        Self { goods: 0, energy: 0, metal: 0, cards }
    }

    #[must_use]
    pub fn and_goods(mut self, goods: u32) -> Self {
        self.goods += goods;
        self
    }

    #[must_use]
    pub fn and_energy(mut self, energy: u32) -> Self {
        self.energy += energy;
        self
    }

    #[must_use]
    pub fn and_metal(mut self, metal: u32) -> Self {
        self.metal += metal;
        self
    }

    #[must_use]
    pub fn and_cards(mut self, cards: u32) -> Self {
        self.cards += cards;
        self
    }
}

/// Resources a rule charges on top of its dice and cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cost {
    pub energy: u32,
    pub metal: u32,
}

impl Cost {
    pub const FREE: Cost = Cost { energy: 0, metal: 0 };
}

/// An ordered set of effects validated together and committed together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectBatch {
    effects: Vec<Effect>,
}

impl EffectBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, skipping zero-amount resource changes.
    pub fn push(&mut self, effect: Effect) {
        let empty = matches!(
            effect,
            Effect::SpendEnergy(0)
                | Effect::SpendMetal(0)
                | Effect::GainEnergy(0)
                | Effect::GainMetal(0)
                | Effect::GainGoods(0)
                | Effect::DrawCards(0)
                | Effect::GainDice(0)
        );
        if !empty {
            self.effects.push(effect);
        }
    }

    /// Builder form of `push`.
    #[must_use]
    pub fn with(mut self, effect: Effect) -> Self {
        self.push(effect);
        self
    }

    pub fn pay(&mut self, cost: Cost) {
        self.push(Effect::SpendEnergy(cost.energy));
        self.push(Effect::SpendMetal(cost.metal));
    }

    pub fn gain(&mut self, gains: Gains) {
        self.push(Effect::GainGoods(gains.goods));
        self.push(Effect::GainEnergy(gains.energy));
        self.push(Effect::GainMetal(gains.metal));
        self.push(Effect::DrawCards(gains.cards));
    }

    /// Append another batch after this one.
    pub fn extend(&mut self, other: EffectBatch) {
        self.effects.extend(other.effects);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Energy debited by the whole batch.
    #[must_use]
    pub fn energy_spent(&self) -> u32 {
        self.sum(|e| match e {
            Effect::SpendEnergy(n) => *n,
            _ => 0,
        })
    }

    /// Metal debited by the whole batch.
    #[must_use]
    pub fn metal_spent(&self) -> u32 {
        self.sum(|e| match e {
            Effect::SpendMetal(n) => *n,
            _ => 0,
        })
    }

    /// Cards the batch draws.
    #[must_use]
    pub fn cards_drawn(&self) -> u32 {
        self.sum(|e| match e {
            Effect::DrawCards(n) => *n,
            _ => 0,
        })
    }

    /// Hand cards the batch discards.
    #[must_use]
    pub fn cards_discarded(&self) -> u32 {
        self.sum(|e| match e {
            Effect::DiscardFromHand(ids) => ids.len() as u32,
            _ => 0,
        })
    }

    /// Goods the batch grants.
    #[must_use]
    pub fn goods_gained(&self) -> u32 {
        self.sum(|e| match e {
            Effect::GainGoods(n) => *n,
            _ => 0,
        })
    }

    fn sum(&self, f: impl Fn(&Effect) -> u32) -> u32 {
        self.effects.iter().map(f).sum()
    }
}

impl IntoIterator for EffectBatch {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.into_iter()
    }
}
