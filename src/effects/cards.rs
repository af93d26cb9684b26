//! Rule handlers for activatable blueprints.
//!
//! Most cards share a shape (one die of a listed value, N equal dice, a
//! run, a sum, a discard) and differ only in numbers, so the handlers
//! here are parametrized and `EffectRegistry::standard` binds them to
//! card names.

use crate::core::{ActionError, ActionResult};

use super::dice::{check_dice_equal, check_dice_series, check_dice_sum, check_die_value};
use super::effect::{Cost, Gains};
use super::handler::{CardEffect, EffectView};
use super::selection::check_hand_cards;
use super::{Effect, EffectBatch, RewardChoice, Selections};

/// Every die face.
pub const ANY_VALUE: &[u8] = &[1, 2, 3, 4, 5, 6];

/// Maps the dice used (their total) to what the card yields.
pub type Yields = fn(u32) -> Gains;

fn no_cards(selections: &Selections) -> ActionResult<()> {
    if selections.cards.is_empty() {
        Ok(())
    } else {
        Err(ActionError::selection("this card takes no card selection"))
    }
}

fn no_dice(selections: &Selections) -> ActionResult<()> {
    if selections.dice.is_empty() {
        Ok(())
    } else {
        Err(ActionError::selection("this card takes no dice"))
    }
}

/// Use one die showing one of `accepts`.
pub struct DieValue {
    pub accepts: &'static [u8],
    pub cost: Cost,
    pub yields: Yields,
}

impl DieValue {
    /// A free rule on one die.
    #[must_use]
    pub fn new(accepts: &'static [u8], yields: Yields) -> Self {
        Self {
            accepts,
            cost: Cost::FREE,
            yields,
        }
    }
}

impl CardEffect for DieValue {
    fn validate(
        &self,
        view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_cards(selections)?;
        let value = check_die_value(&view.player.dice, &selections.dice, self.accepts)?;
        let mut batch = EffectBatch::new();
        batch.pay(self.cost);
        batch.push(Effect::consume(&selections.dice));
        batch.gain((self.yields)(u32::from(value)));
        Ok(batch)
    }
}

/// Use `count` dice showing the same value.
pub struct EqualDice {
    pub count: usize,
    pub yields: Yields,
}

impl CardEffect for EqualDice {
    fn validate(
        &self,
        view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_cards(selections)?;
        let value = check_dice_equal(&view.player.dice, &selections.dice, self.count)?;
        let total = u32::from(value) * self.count as u32;
        let mut batch = EffectBatch::new();
        batch.push(Effect::consume(&selections.dice));
        batch.gain((self.yields)(total));
        Ok(batch)
    }
}

/// Use `count` dice forming a run.
pub struct Series {
    pub count: usize,
    pub yields: Yields,
}

impl CardEffect for Series {
    fn validate(
        &self,
        view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_cards(selections)?;
        let values = check_dice_series(&view.player.dice, &selections.dice, self.count)?;
        let total = values.iter().map(|&v| u32::from(v)).sum();
        let mut batch = EffectBatch::new();
        batch.push(Effect::consume(&selections.dice));
        batch.gain((self.yields)(total));
        Ok(batch)
    }
}

/// Use `count` dice totalling at least `threshold`.
pub struct SumAtLeast {
    pub count: usize,
    pub threshold: u32,
    pub yields: Yields,
}

impl CardEffect for SumAtLeast {
    fn validate(
        &self,
        view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_cards(selections)?;
        let total =
            check_dice_sum(&view.player.dice, &selections.dice, self.count, self.threshold)?;
        let mut batch = EffectBatch::new();
        batch.push(Effect::consume(&selections.dice));
        batch.gain((self.yields)(total));
        Ok(batch)
    }
}

/// Discard `count` hand cards.
pub struct Discard {
    pub count: usize,
    pub gains: Gains,
}

impl CardEffect for Discard {
    fn validate(
        &self,
        view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_dice(selections)?;
        check_hand_cards(view.player, &selections.cards, self.count)?;
        let mut batch = EffectBatch::new();
        batch.push(Effect::discard(&selections.cards));
        batch.gain(self.gains);
        Ok(batch)
    }
}

/// Change one die's face in place.
pub struct AdjustDie {
    pub adjust: fn(u8) -> u8,
}

impl AdjustDie {
    pub const FLIP: AdjustDie = AdjustDie { adjust: |v| 7 - v };
    pub const RAISE: AdjustDie = AdjustDie { adjust: |v| (v + 1).min(6) };
    pub const LOWER: AdjustDie = AdjustDie { adjust: |v| v.saturating_sub(1).max(1) };
}

impl CardEffect for AdjustDie {
    fn validate(
        &self,
        view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_cards(selections)?;
        let value = check_die_value(&view.player.dice, &selections.dice, ANY_VALUE)?;
        let adjusted = (self.adjust)(value);
        if adjusted == value {
            return Err(ActionError::selection(format!("a {} cannot be changed", value)));
        }
        Ok(EffectBatch::new().with(Effect::SetDie {
            index: selections.dice[0],
            value: adjusted,
        }))
    }
}

/// Pay energy for an extra die this round (Robot).
pub struct PayForDie {
    pub energy: u32,
}

impl CardEffect for PayForDie {
    fn validate(
        &self,
        _view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_dice(selections)?;
        no_cards(selections)?;
        Ok(EffectBatch::new()
            .with(Effect::SpendEnergy(self.energy))
            .with(Effect::GainDice(1)))
    }
}

/// Discard one card for a card, 1 metal or 2 energy.
pub struct RecyclingPlant;

impl CardEffect for RecyclingPlant {
    fn validate(
        &self,
        view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_dice(selections)?;
        check_hand_cards(view.player, &selections.cards, 1)?;
        let gains = match selections.reward {
            Some(RewardChoice::Card) => Gains::cards(1),
            Some(RewardChoice::Metal) => Gains::metal(1),
            Some(RewardChoice::Energy) => Gains::energy(2),
            None => return Err(ActionError::selection("a reward must be chosen")),
        };
        let mut batch = EffectBatch::new();
        batch.push(Effect::discard(&selections.cards));
        batch.gain(gains);
        Ok(batch)
    }
}

/// Discard one card for resources up to its build cost.
///
/// The total gained is the discarded card's metal plus energy cost,
/// capped by `black_market_cap`. `Selections::energy` picks the energy
/// share and the remainder is metal.
pub struct BlackMarket;

impl CardEffect for BlackMarket {
    fn validate(
        &self,
        view: &EffectView<'_>,
        selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        no_dice(selections)?;
        check_hand_cards(view.player, &selections.cards, 1)?;
        let card = view
            .player
            .hand
            .get(&selections.cards[0])
            .ok_or_else(|| ActionError::not_owned(selections.cards[0].to_string()))?;

        let total = card.total_cost().min(view.config.black_market_cap);
        let energy = selections.energy.unwrap_or(0);
        if energy > total {
            return Err(ActionError::selection(format!(
                "at most {} resources may be gained",
                total
            )));
        }

        let mut batch = EffectBatch::new();
        batch.push(Effect::discard(&selections.cards));
        batch.gain(Gains::energy(energy).and_metal(total - energy));
        Ok(batch)
    }
}

/// The Replicator's own cost. The registry composes it with the
/// replicated card's rule.
pub struct Replicator;

impl Replicator {
    /// Energy the Replicator charges before the target rule runs.
    #[must_use]
    pub fn energy_cost(view: &EffectView<'_>) -> u32 {
        1 + view.config.replicator_extra_energy
    }
}

impl CardEffect for Replicator {
    fn validate(
        &self,
        view: &EffectView<'_>,
        _selections: &Selections,
    ) -> ActionResult<EffectBatch> {
        Ok(EffectBatch::new().with(Effect::SpendEnergy(Self::energy_cost(view))))
    }
}
