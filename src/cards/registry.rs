//! Card registry: every definition used to build a match's decks.
//!
//! `CardRegistry::standard()` is the printed card set. A registry can also
//! be loaded from a JSON document of definition rows, which is how external
//! card tables are fed in.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{
    BlueprintDefinition, CardCategory, ContractorDefinition, ContractorKind, Prestige, Tool,
};

/// Registry of blueprint and contractor definitions.
///
/// ## Example
///
/// ```
/// use blueprint_engine::cards::CardRegistry;
///
/// let registry = CardRegistry::standard();
/// let foundry = registry.blueprint("Foundry").unwrap();
/// assert!(foundry.activatable);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "RegistryRows", into = "RegistryRows")]
pub struct CardRegistry {
    blueprints: Vec<BlueprintDefinition>,
    contractors: Vec<ContractorDefinition>,
    by_name: FxHashMap<String, usize>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct RegistryRows {
    #[serde(default)]
    blueprints: Vec<BlueprintDefinition>,
    #[serde(default)]
    contractors: Vec<ContractorDefinition>,
}

impl From<RegistryRows> for CardRegistry {
    fn from(rows: RegistryRows) -> Self {
        let mut registry = CardRegistry::new();
        for def in rows.blueprints {
            registry.register_blueprint(def);
        }
        for def in rows.contractors {
            registry.register_contractor(def);
        }
        registry
    }
}

impl From<CardRegistry> for RegistryRows {
    fn from(registry: CardRegistry) -> Self {
        Self {
            blueprints: registry.blueprints,
            contractors: registry.contractors,
        }
    }
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load definitions from a JSON document with `blueprints` and `contractors` arrays.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Register a blueprint definition.
    ///
    /// A later definition with the same name replaces the earlier one.
    pub fn register_blueprint(&mut self, def: BlueprintDefinition) {
        if let Some(&i) = self.by_name.get(&def.name) {
            self.blueprints[i] = def;
        } else {
            self.by_name.insert(def.name.clone(), self.blueprints.len());
            self.blueprints.push(def);
        }
    }

    /// Register a contractor definition.
    pub fn register_contractor(&mut self, def: ContractorDefinition) {
        self.contractors.push(def);
    }

    /// Look up a blueprint definition by name.
    #[must_use]
    pub fn blueprint(&self, name: &str) -> Option<&BlueprintDefinition> {
        self.by_name.get(name).map(|&i| &self.blueprints[i])
    }

    /// All blueprint definitions in registration order.
    #[must_use]
    pub fn blueprints(&self) -> &[BlueprintDefinition] {
        &self.blueprints
    }

    /// All contractor definitions in registration order.
    #[must_use]
    pub fn contractors(&self) -> &[ContractorDefinition] {
        &self.contractors
    }

    /// Total blueprint copies across all definitions.
    #[must_use]
    pub fn blueprint_copies(&self) -> u32 {
        self.blueprints.iter().map(|d| d.copies).sum()
    }

    /// The printed card set.
    #[must_use]
    pub fn standard() -> Self {
        use CardCategory::{Monument, Production, Special, Training, Utility};
        use Prestige::{Fixed, Variable};
        use Tool::{Gear, Hammer, Shovel, Wrench};

        let bp = BlueprintDefinition::new;
        let mut registry = Self::new();

        #[rustfmt::skip]
        let blueprints = [
            bp("Aluminum Factory", Shovel, Production, Fixed(1)).cost(1, 2)
                .activatable("Use a 1 or 2: gain 2 metal").copies(2),
            bp("Assembly Line", Gear, Production, Fixed(1)).cost(2, 1)
                .activatable("Use 3 dice in a series: gain 2 goods").copies(2),
            bp("Battery Factory", Wrench, Production, Fixed(1)).cost(1, 1)
                .activatable("Use a 5 or 6: gain 1 goods and 1 energy").copies(2),
            bp("Beacon", Shovel, Monument, Variable).cost(2, 2)
                .recipe("1/2/3/4 Beacons are worth 2/5/9/14 prestige").copies(4),
            bp("Biolab", Gear, Production, Fixed(1)).cost(1, 2)
                .activatable("Use 2 equal dice: gain 1 goods and draw 1 card").copies(2),
            bp("Black Market", Gear, Utility, Fixed(1)).cost(1, 1)
                .activatable("Discard 1 card: gain energy and metal up to its build cost (max 4)").copies(2),
            bp("Concrete Plant", Shovel, Production, Fixed(1)).cost(2, 1)
                .activatable("Use 2 dice summing to 8 or more: gain 2 metal").copies(2),
            bp("Dojo", Gear, Training, Fixed(0)).cost(1, 1)
                .activatable("Flip a die to its opposite face").copies(2),
            bp("Fitness Center", Wrench, Training, Fixed(0)).cost(0, 2)
                .activatable("Add 1 to a die").copies(3),
            bp("Foundry", Gear, Production, Fixed(1)).cost(2, 2)
                .activatable("Use a 6: gain 3 metal").copies(2),
            bp("Fulfillment Center", Hammer, Utility, Fixed(1)).cost(2, 1)
                .recipe("The first time you gain goods each round, draw 1 card").copies(2),
            bp("Golem", Hammer, Special, Fixed(1)).cost(3, 1)
                .activatable("Use 3 equal dice: gain 3 goods").copies(2),
            bp("Gymnasium", Shovel, Training, Fixed(0)).cost(0, 2)
                .activatable("Subtract 1 from a die").copies(3),
            bp("Harvester", Hammer, Production, Fixed(1)).cost(1, 2)
                .activatable("Use 2 dice summing to 9 or more: gain 2 goods").copies(2),
            bp("Incinerator", Shovel, Utility, Fixed(1)).cost(1, 1)
                .activatable("Discard 2 cards: gain 1 goods and 2 energy").copies(2),
            bp("Laboratory", Wrench, Production, Fixed(1)).cost(1, 1)
                .activatable("Use a 1: draw 2 cards").copies(2),
            bp("Manufactory", Wrench, Production, Fixed(1)).cost(2, 1)
                .activatable("Use 2 dice in a series: gain 1 goods and 1 metal").copies(2),
            bp("Mega Factory", Gear, Production, Fixed(1)).cost(3, 3)
                .activatable("Use 4 dice in a series: gain 4 goods").copies(2),
            bp("Megalith", Wrench, Monument, Fixed(3)).cost(4, 2)
                .recipe("Costs 1 less metal for each monument in your compound").copies(3),
            bp("Motherlode", Shovel, Production, Fixed(1)).cost(2, 1)
                .activatable("Use 3 dice summing to 15 or more: gain 3 metal and 1 goods").copies(2),
            bp("Nuclear Plant", Wrench, Production, Fixed(1)).cost(2, 2)
                .activatable("Use 2 equal dice: gain energy equal to their sum").copies(2),
            bp("Obelisk", Hammer, Monument, Fixed(2)).cost(2, 1)
                .recipe("Build any number of these").copies(5),
            bp("Power Plant", Gear, Production, Fixed(1)).cost(1, 1)
                .activatable("Use any die: gain energy equal to its value").copies(2),
            bp("Recycling Plant", Gear, Utility, Fixed(1)).cost(1, 1)
                .activatable("Discard 1 card: draw 1 card, gain 1 metal or gain 2 energy").copies(3),
            bp("Refinery", Wrench, Production, Fixed(1)).cost(1, 2)
                .activatable("Pay 2 energy and 1 metal, use any die: gain 2 goods").copies(2),
            bp("Replicator", Shovel, Special, Fixed(1)).cost(2, 2)
                .activatable("Pay 1 energy plus 1 more: use a marketplace blueprint's ability").copies(2),
            bp("Robot", Hammer, Training, Fixed(0)).cost(1, 0)
                .activatable("Pay 2 energy: gain 1 die to roll").copies(3),
            bp("Scrap Yard", Wrench, Utility, Fixed(0)).cost(1, 1)
                .recipe("After you build, gain 1 metal").copies(2),
            bp("Solar Array", Gear, Utility, Fixed(0)).cost(1, 1)
                .recipe("After you build, gain 2 energy").copies(2),
            bp("Temp Agency", Hammer, Utility, Fixed(0)).cost(1, 1)
                .activatable("Use any die: draw 1 card").copies(2),
            bp("Trash Compactor", Shovel, Utility, Fixed(1)).cost(1, 1)
                .activatable("Discard 3 cards: gain 2 goods").copies(2),
            bp("Warehouse", Hammer, Utility, Fixed(1)).cost(2, 1)
                .activatable("Use a 2 or 3: gain 1 goods and 1 metal").copies(2),
        ];
        for def in blueprints {
            registry.register_blueprint(def);
        }

        let contractor = |name: &str, kind, cost_energy, short: &str, long: &str, copies| {
            ContractorDefinition {
                name: name.to_string(),
                kind,
                cost_energy,
                short_recipe: short.to_string(),
                long_recipe: long.to_string(),
                copies,
            }
        };
        #[rustfmt::skip]
        let contractors = [
            contractor("Surveyor", ContractorKind::Surveyor, 1, "Draw 2",
                "Draw 2 blueprints from the deck", 3),
            contractor("Electrician", ContractorKind::Electrician, 0, "+3 energy",
                "Gain 3 energy", 3),
            contractor("Prospector", ContractorKind::Prospector, 1, "+2 metal",
                "Gain 2 metal", 3),
            contractor("Diplomat", ContractorKind::Diplomat, 1, "+2 metal, other +1 metal",
                "Gain 2 metal; another player of your choice gains 1 metal", 2),
            contractor("Patron", ContractorKind::Patron, 0, "+2 energy each",
                "You and another player of your choice each gain 2 energy", 2),
            contractor("Architect", ContractorKind::Architect, 3, "Free build",
                "Build the top blueprint of the deck for free, skipping ones you already own", 2),
            contractor("Foreman", ContractorKind::Foreman, 2, "+2 dice",
                "Roll 2 extra dice this round", 2),
            contractor("Engineer", ContractorKind::Engineer, 2, "Choose dice",
                "Choose your dice values this round instead of rolling", 2),
            contractor("Tinkerer", ContractorKind::Tinkerer, 1, "+1 die of your choice",
                "Gain one die showing any value you choose", 2),
        ];
        for def in contractors {
            registry.register_contractor(def);
        }

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set() {
        let registry = CardRegistry::standard();
        assert_eq!(registry.blueprints().len(), 32);
        assert_eq!(registry.contractors().len(), 9);

        let beacon = registry.blueprint("Beacon").unwrap();
        assert_eq!(beacon.prestige, Prestige::Variable);
        assert_eq!(beacon.copies, 4);

        assert!(registry.blueprint("Scrap Yard").map(|d| !d.activatable).unwrap());
        assert!(registry.blueprint("Nope").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = CardRegistry::new();
        let obelisk = BlueprintDefinition::new(
            "Obelisk",
            Tool::Hammer,
            CardCategory::Monument,
            Prestige::Fixed(2),
        );
        registry.register_blueprint(obelisk.clone().copies(5));
        registry.register_blueprint(obelisk.copies(1));
        assert_eq!(registry.blueprints().len(), 1);
        assert_eq!(registry.blueprint_copies(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let registry = CardRegistry::standard();
        let json = serde_json::to_string(&registry).unwrap();
        let restored = CardRegistry::from_json(&json).unwrap();

        assert_eq!(restored.blueprints(), registry.blueprints());
        assert_eq!(restored.contractors(), registry.contractors());
        assert!(restored.blueprint("Golem").is_some());
    }

    #[test]
    fn test_json_rows() {
        let json = r#"{
            "blueprints": [
                {"name": "Obelisk", "tool": "hammer", "category": "monument", "prestige": 2, "copies": 3}
            ]
        }"#;
        let registry = CardRegistry::from_json(json).unwrap();
        assert_eq!(registry.blueprint_copies(), 3);
        assert!(registry.contractors().is_empty());
    }
}
