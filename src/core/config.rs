//! Rule constants for a match.
//!
//! Every tunable number the state machine consults lives in `RulesConfig`.
//! The defaults are the printed rules; a JSON file may override any subset
//! of fields, and missing fields keep their default.
//!
//! ```
//! use blueprint_engine::core::RulesConfig;
//!
//! let config = RulesConfig::from_json(r#"{ "goods_to_end": 8 }"#).unwrap();
//! assert_eq!(config.goods_to_end, 8);
//! assert_eq!(config.starting_dice, 4);
//! ```

use serde::{Deserialize, Serialize};

/// Numeric rule constants and allow-lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Unrolled dice each player starts a round with.
    pub starting_dice: u32,

    /// Dice a single headquarters floor can hold.
    pub floor_capacity: usize,

    /// Blueprint slots in the marketplace.
    pub marketplace_blueprints: usize,

    /// Hand size a player must be at or below to end the work phase.
    pub max_hand_at_end: usize,

    /// Combined energy + metal a player must be at or below to end the work phase.
    pub max_resources_at_end: u32,

    /// Cumulative goods that latch the final round.
    pub goods_to_end: u32,

    /// Compound size that latches the final round.
    pub compound_to_end: usize,

    /// Resource paid to refresh one half of the marketplace.
    pub refresh_cost: u32,

    /// Energy paid on top of the Replicator's own cost.
    pub replicator_extra_energy: u32,

    /// Draw attempts an Architect makes before giving up.
    pub architect_attempts: usize,

    /// Most resources a Black Market activation can yield.
    pub black_market_cap: u32,

    /// Card names that may appear more than once in a compound.
    pub build_multiple: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_dice: 4,
            floor_capacity: 3,
            marketplace_blueprints: 4,
            max_hand_at_end: 10,
            max_resources_at_end: 12,
            goods_to_end: 12,
            compound_to_end: 10,
            refresh_cost: 1,
            replicator_extra_energy: 1,
            architect_attempts: 10,
            black_market_cap: 4,
            build_multiple: vec!["Beacon".to_string(), "Obelisk".to_string()],
        }
    }
}

impl RulesConfig {
    /// Parse a configuration from JSON, defaulting any missing field.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Check whether a card name may be built more than once.
    #[must_use]
    pub fn allows_multiple(&self, name: &str) -> bool {
        self.build_multiple.iter().any(|n| n == name)
    }
}
