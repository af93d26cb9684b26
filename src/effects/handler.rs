//! The `CardEffect` trait.
//!
//! A handler is split in two: `validate` checks the selections against a
//! read-only view and stages a batch; `apply` plans and commits it. Nothing
//! is mutated unless every check has passed.

use crate::core::{ActionError, ActionResult, RulesConfig, Shortfall};
use crate::player::Player;

use super::resolver::{EffectContext, EffectReport, EffectResolver};
use super::{EffectBatch, Selections};

/// Read-only state a handler validates against.
pub struct EffectView<'a> {
    pub player: &'a Player,
    /// Cards left in the blueprint deck and discard together.
    pub cards_available: usize,
    pub config: &'a RulesConfig,
}

impl<'a> EffectView<'a> {
    pub fn new(player: &'a Player, cards_available: usize, config: &'a RulesConfig) -> Self {
        Self {
            player,
            cards_available,
            config,
        }
    }
}

/// One activatable card rule.
pub trait CardEffect: Send + Sync {
    /// Check dice shape and card selections, returning the staged effects.
    fn validate(&self, view: &EffectView<'_>, selections: &Selections) -> ActionResult<EffectBatch>;

    /// `validate` plus the resource and draw checks every rule shares.
    fn plan(&self, view: &EffectView<'_>, selections: &Selections) -> ActionResult<EffectBatch> {
        let batch = self.validate(view, selections)?;
        check_affordable(view, &batch)?;
        Ok(batch)
    }

    /// Plan and commit in one step.
    fn apply(
        &self,
        ctx: &mut EffectContext<'_>,
        config: &RulesConfig,
        selections: &Selections,
    ) -> ActionResult<EffectReport> {
        let batch = {
            let view = EffectView::new(ctx.player, ctx.deck.available(), config);
            self.plan(&view, selections)?
        };
        Ok(EffectResolver::resolve(ctx, &batch))
    }
}

/// Check that a batch's spends and draws are covered.
///
/// Discarded cards count toward the draw supply since they hit the
/// discard pile before any draw.
pub fn check_affordable(view: &EffectView<'_>, batch: &EffectBatch) -> ActionResult<()> {
    ActionError::require(Shortfall::Energy, batch.energy_spent(), view.player.energy)?;
    ActionError::require(Shortfall::Metal, batch.metal_spent(), view.player.metal)?;
    let supply = view.cards_available as u32 + batch.cards_discarded();
    if batch.cards_drawn() > supply {
        return Err(ActionError::DeckExhausted);
    }
    Ok(())
}
