//! Card definitions - static card data.
//!
//! A definition describes one kind of card ("Biolab", "Surveyor") and how
//! many copies of it go into the deck. Runtime copies with their own ids
//! are `BlueprintCard` / `ContractorCard` in `instance`.

use serde::{Deserialize, Serialize};

/// Unique identifier for one physical card in a match.
///
/// Blueprint and contractor decks number their cards independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Tool symbol printed on a blueprint; also keys the contractor slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Hammer,
    Wrench,
    Gear,
    Shovel,
}

impl Tool {
    /// Every tool, in marketplace slot order.
    pub const ALL: [Tool; 4] = [Tool::Hammer, Tool::Wrench, Tool::Gear, Tool::Shovel];
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tool::Hammer => "hammer",
            Tool::Wrench => "wrench",
            Tool::Gear => "gear",
            Tool::Shovel => "shovel",
        };
        f.write_str(name)
    }
}

/// Blueprint category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    Production,
    Utility,
    Training,
    Monument,
    Special,
}

/// Prestige printed on a blueprint.
///
/// Serialized as a number, or `null` for the variable (Beacon) value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Prestige {
    /// A fixed prestige value.
    Fixed(u32),
    /// Worth a share of the escalating Beacon bonus.
    Variable,
}

impl From<Option<u32>> for Prestige {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(v) => Prestige::Fixed(v),
            None => Prestige::Variable,
        }
    }
}

impl From<Prestige> for Option<u32> {
    fn from(value: Prestige) -> Self {
        match value {
            Prestige::Fixed(v) => Some(v),
            Prestige::Variable => None,
        }
    }
}

/// Static blueprint definition (one row of the card table).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintDefinition {
    pub name: String,
    pub tool: Tool,
    pub category: CardCategory,
    pub prestige: Prestige,
    #[serde(default)]
    pub cost_metal: u32,
    #[serde(default)]
    pub cost_energy: u32,
    #[serde(default)]
    pub activatable: bool,
    #[serde(default)]
    pub recipe: String,
    pub copies: u32,
}

impl BlueprintDefinition {
    /// Create a definition with no cost, no recipe and one copy (builder pattern).
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        tool: Tool,
        category: CardCategory,
        prestige: Prestige,
    ) -> Self {
        Self {
            name: name.into(),
            tool,
            category,
            prestige,
            cost_metal: 0,
            cost_energy: 0,
            activatable: false,
            recipe: String::new(),
            copies: 1,
        }
    }

    #[must_use]
    pub fn cost(mut self, metal: u32, energy: u32) -> Self {
        self.cost_metal = metal;
        self.cost_energy = energy;
        self
    }

    #[must_use]
    pub fn activatable(mut self, recipe: impl Into<String>) -> Self {
        self.activatable = true;
        self.recipe = recipe.into();
        self
    }

    #[must_use]
    pub fn recipe(mut self, recipe: impl Into<String>) -> Self {
        self.recipe = recipe.into();
        self
    }

    #[must_use]
    pub fn copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }
}

/// The fixed effect a contractor applies when hired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractorKind {
    /// Draw two blueprints.
    Surveyor,
    /// Gain three energy.
    Electrician,
    /// Gain two metal.
    Prospector,
    /// Gain two metal; target gains one metal.
    Diplomat,
    /// You and target each gain two energy.
    Patron,
    /// Build a random blueprint for free.
    Architect,
    /// Two extra dice for the next roll.
    Foreman,
    /// Choose dice values instead of rolling.
    Engineer,
    /// Gain one die of a chosen value.
    Tinkerer,
}

impl ContractorKind {
    /// Whether hiring needs a second player as target.
    #[must_use]
    pub fn requires_target(self) -> bool {
        matches!(self, ContractorKind::Diplomat | ContractorKind::Patron)
    }
}

/// Static contractor definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractorDefinition {
    pub name: String,
    pub kind: ContractorKind,
    #[serde(default)]
    pub cost_energy: u32,
    #[serde(default)]
    pub short_recipe: String,
    #[serde(default)]
    pub long_recipe: String,
    pub copies: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_prestige_serializes_as_nullable_number() {
        assert_eq!(serde_json::to_string(&Prestige::Fixed(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Prestige::Variable).unwrap(), "null");
        let p: Prestige = serde_json::from_str("null").unwrap();
        assert_eq!(p, Prestige::Variable);
    }

    #[test]
    fn test_definition_builder() {
        let def = BlueprintDefinition::new(
            "Foundry",
            Tool::Gear,
            CardCategory::Production,
            Prestige::Fixed(1),
        )
        .cost(2, 2)
            .activatable("Use a 6: gain 3 metal")
            .copies(2);

        assert_eq!(def.cost_metal, 2);
        assert_eq!(def.cost_energy, 2);
        assert!(def.activatable);
        assert_eq!(def.copies, 2);
    }

    #[test]
    fn test_definition_from_json_row() {
        let json = r#"{"name":"Beacon","tool":"shovel","category":"monument","prestige":null,"cost_metal":2,"cost_energy":2,"copies":4}"#;
        let def: BlueprintDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.tool, Tool::Shovel);
        assert_eq!(def.prestige, Prestige::Variable);
        assert!(!def.activatable);
    }

    #[test]
    fn test_target_requirements() {
        assert!(ContractorKind::Diplomat.requires_target());
        assert!(ContractorKind::Patron.requires_target());
        assert!(!ContractorKind::Surveyor.requires_target());
    }
}
