//! Card name to rule handler.

use rustc_hash::FxHashMap;

use crate::cards::BlueprintCard;
use crate::core::{ActionError, ActionResult};

use super::cards::{
    AdjustDie, BlackMarket, Discard, DieValue, EqualDice, PayForDie, RecyclingPlant, Replicator,
    Series, SumAtLeast, ANY_VALUE,
};
use super::effect::{Cost, Gains};
use super::handler::{check_affordable, CardEffect, EffectView};
use super::{EffectBatch, Selections};

/// Name of the card that borrows a marketplace blueprint's rule.
pub const REPLICATOR: &str = "Replicator";

/// Registry of activation handlers keyed by blueprint name.
///
/// New cards are added with `register`; the game dispatches through
/// `plan` and never matches on names itself.
#[derive(Default)]
pub struct EffectRegistry {
    handlers: FxHashMap<String, Box<dyn CardEffect>>,
}

impl EffectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any existing one for this name.
    pub fn register(&mut self, name: impl Into<String>, handler: impl CardEffect + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn CardEffect> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Stage the effects of activating `name`.
    ///
    /// A Replicator needs `replicate`, the marketplace blueprint whose rule
    /// it borrows; its own energy cost is staged ahead of that rule and the
    /// combined batch is checked for affordability once.
    pub fn plan(
        &self,
        name: &str,
        view: &EffectView<'_>,
        selections: &Selections,
        replicate: Option<&BlueprintCard>,
    ) -> ActionResult<EffectBatch> {
        let handler = self
            .get(name)
            .ok_or_else(|| ActionError::rule(format!("{} cannot be activated", name)))?;

        if name != REPLICATOR {
            return handler.plan(view, selections);
        }

        let target =
            replicate.ok_or_else(|| ActionError::selection("nothing chosen to replicate"))?;
        if !target.activatable || target.name == REPLICATOR {
            return Err(ActionError::rule(format!("{} cannot be replicated", target.name)));
        }
        let inner = self
            .get(&target.name)
            .ok_or_else(|| ActionError::rule(format!("{} cannot be replicated", target.name)))?;

        let mut batch = handler.validate(view, selections)?;
        batch.extend(inner.validate(view, selections)?);
        check_affordable(view, &batch)?;
        Ok(batch)
    }

    /// Handlers for the printed card set.
    #[must_use]
    #[rustfmt::skip]
    pub fn standard() -> Self {
        let mut registry = Self::new();

        let die = DieValue::new;

        registry.register("Aluminum Factory", die(&[1, 2], |_| Gains::metal(2)));
        registry.register("Battery Factory", die(&[5, 6], |_| Gains::goods(1).and_energy(1)));
        registry.register("Foundry", die(&[6], |_| Gains::metal(3)));
        registry.register("Laboratory", die(&[1], |_| Gains::cards(2)));
        registry.register("Power Plant", die(ANY_VALUE, Gains::energy));
        registry.register("Temp Agency", die(ANY_VALUE, |_| Gains::cards(1)));
        registry.register("Warehouse", die(&[2, 3], |_| Gains::goods(1).and_metal(1)));
        registry.register(
            "Refinery",
            DieValue {
                accepts: ANY_VALUE,
                cost: Cost { energy: 2, metal: 1 },
                yields: |_| Gains::goods(2),
            },
        );

        registry.register(
            "Biolab",
            EqualDice { count: 2, yields: |_| Gains::goods(1).and_cards(1) },
        );
        registry.register("Golem", EqualDice { count: 3, yields: |_| Gains::goods(3) });
        registry.register("Nuclear Plant", EqualDice { count: 2, yields: Gains::energy });

        registry.register(
            "Manufactory",
            Series { count: 2, yields: |_| Gains::goods(1).and_metal(1) },
        );
        registry.register("Assembly Line", Series { count: 3, yields: |_| Gains::goods(2) });
        registry.register("Mega Factory", Series { count: 4, yields: |_| Gains::goods(4) });

        registry.register(
            "Concrete Plant",
            SumAtLeast { count: 2, threshold: 8, yields: |_| Gains::metal(2) },
        );
        registry.register(
            "Harvester",
            SumAtLeast { count: 2, threshold: 9, yields: |_| Gains::goods(2) },
        );
        registry.register(
            "Motherlode",
            SumAtLeast { count: 3, threshold: 15, yields: |_| Gains::metal(3).and_goods(1) },
        );

        registry.register(
            "Incinerator",
            Discard { count: 2, gains: Gains::goods(1).and_energy(2) },
        );
        registry.register("Trash Compactor", Discard { count: 3, gains: Gains::goods(2) });

        registry.register("Dojo", AdjustDie::FLIP);
        registry.register("Fitness Center", AdjustDie::RAISE);
        registry.register("Gymnasium", AdjustDie::LOWER);

        registry.register("Robot", PayForDie { energy: 2 });
        registry.register("Recycling Plant", RecyclingPlant);
        registry.register("Black Market", BlackMarket);
        registry.register(REPLICATOR, Replicator);

        registry
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("EffectRegistry").field("handlers", &names).finish()
    }
}
