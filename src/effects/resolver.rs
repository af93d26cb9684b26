//! Committing a validated batch to a player.
//!
//! The resolver is the only place an activation mutates state. It assumes
//! the batch was produced by `CardEffect::plan` (or an equivalent check) and
//! never fails; amounts that would underflow saturate at zero.

use smallvec::SmallVec;

use crate::cards::{BlueprintCard, CardId};
use crate::core::GameRng;
use crate::deck::Deck;
use crate::player::Player;

use super::dice::remove_indices;
use super::{Effect, EffectBatch};

/// Passive compound card that draws when goods are first gained in a round.
pub const FULFILLMENT_CENTER: &str = "Fulfillment Center";

/// Mutable state a batch resolves against.
pub struct EffectContext<'a> {
    pub player: &'a mut Player,
    pub deck: &'a mut Deck<BlueprintCard>,
    pub rng: &'a mut GameRng,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        player: &'a mut Player,
        deck: &'a mut Deck<BlueprintCard>,
        rng: &'a mut GameRng,
    ) -> Self {
        Self { player, deck, rng }
    }
}

/// What a resolved batch did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectReport {
    /// Ids of cards drawn into hand, in draw order.
    pub drawn: Vec<CardId>,
    /// Whether a Fulfillment Center fired.
    pub fulfillment: bool,
}

/// Commits effect batches.
pub struct EffectResolver;

impl EffectResolver {
    /// Apply every effect in `batch`.
    ///
    /// Costs and gains apply in batch order, dice are removed after all
    /// in-place changes, and draws happen last so discarded cards may be
    /// reshuffled into an empty deck.
    pub fn resolve(ctx: &mut EffectContext<'_>, batch: &EffectBatch) -> EffectReport {
        let mut report = EffectReport::default();
        let mut consumed: SmallVec<[usize; 8]> = SmallVec::new();
        let mut draws = 0u32;

        for effect in batch.iter() {
            match effect {
                Effect::ConsumeDice(indices) => consumed.extend(indices.iter().copied()),
                Effect::SetDie { index, value } => {
                    if let Some(die) = ctx.player.dice.get_mut(*index) {
                        *die = *value;
                    }
                }
                Effect::DiscardFromHand(ids) => {
                    for id in ids {
                        if let Some(card) = ctx.player.hand.remove(id) {
                            ctx.deck.discard(card);
                        }
                    }
                }
                Effect::SpendEnergy(n) => ctx.player.energy = ctx.player.energy.saturating_sub(*n),
                Effect::SpendMetal(n) => ctx.player.metal = ctx.player.metal.saturating_sub(*n),
                Effect::GainEnergy(n) => ctx.player.energy += n,
                Effect::GainMetal(n) => ctx.player.metal += n,
                Effect::GainGoods(n) => ctx.player.goods += n,
                Effect::DrawCards(n) => draws += n,
                Effect::GainDice(n) => ctx.player.num_dice += n,
            }
        }

        remove_indices(&mut ctx.player.dice, &consumed);

        if batch.goods_gained() > 0
            && ctx.deck.available() > draws as usize
            && ctx.player.mark_card_name_activated(FULFILLMENT_CENTER)
        {
            log::debug!("{} draws a card", FULFILLMENT_CENTER);
            report.fulfillment = true;
            draws += 1;
        }

        for _ in 0..draws {
            match ctx.deck.draw_next(ctx.rng) {
                Some(card) => {
                    report.drawn.push(card.id);
                    ctx.player.hand.insert(card.id, card);
                }
                None => {
                    log::warn!("deck exhausted after {} of {} draws", report.drawn.len(), draws);
                    break;
                }
            }
        }

        report
    }
}
