//! Card instances - runtime card copies.
//!
//! Each physical card in a match is an instance with a stable `CardId`.
//! Instances carry a copy of their definition's printed data so they can
//! travel between deck, marketplace, hands and compounds on their own.

use serde::{Deserialize, Serialize};

use super::definition::{
    BlueprintDefinition, CardCategory, CardId, ContractorDefinition, ContractorKind, Prestige, Tool,
};

/// Anything that can sit in a deck.
pub trait Card {
    /// The card's match-wide id.
    fn id(&self) -> CardId;
    /// The card's printed name.
    fn name(&self) -> &str;
}

/// A blueprint card in play.
///
/// `already_activated` only matters while the card sits in a compound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintCard {
    pub id: CardId,
    pub name: String,
    pub tool: Tool,
    pub category: CardCategory,
    pub prestige: Prestige,
    pub cost_metal: u32,
    pub cost_energy: u32,
    pub activatable: bool,
    pub recipe: String,
    pub copies: u32,
    pub already_activated: bool,
}

impl BlueprintCard {
    /// Create an instance of a definition.
    #[must_use]
    pub fn new(id: CardId, def: &BlueprintDefinition) -> Self {
        Self {
            id,
            name: def.name.clone(),
            tool: def.tool,
            category: def.category,
            prestige: def.prestige,
            cost_metal: def.cost_metal,
            cost_energy: def.cost_energy,
            activatable: def.activatable,
            recipe: def.recipe.clone(),
            copies: def.copies,
            already_activated: false,
        }
    }

    /// Combined metal and energy build cost.
    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.cost_metal + self.cost_energy
    }

    #[must_use]
    pub fn is_monument(&self) -> bool {
        self.category == CardCategory::Monument
    }
}

impl Card for BlueprintCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A contractor card in play. Used once, then discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractorCard {
    pub id: CardId,
    pub name: String,
    pub kind: ContractorKind,
    pub cost_energy: u32,
    pub short_recipe: String,
    pub long_recipe: String,
    pub copies: u32,
}

impl ContractorCard {
    /// Create an instance of a definition.
    #[must_use]
    pub fn new(id: CardId, def: &ContractorDefinition) -> Self {
        Self {
            id,
            name: def.name.clone(),
            kind: def.kind,
            cost_energy: def.cost_energy,
            short_recipe: def.short_recipe.clone(),
            long_recipe: def.long_recipe.clone(),
            copies: def.copies,
        }
    }
}

impl Card for ContractorCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
