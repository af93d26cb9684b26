//! # blueprint-engine
//!
//! Authoritative rules engine for a worker-placement dice game: players
//! draft blueprints from a marketplace, hire contractors, roll dice onto
//! headquarters floors, build a compound and activate its cards until an
//! end trigger ranks them.
//!
//! ## Design Principles
//!
//! 1. **One Mutator**: `GameState` owns decks, marketplace and players.
//!    Every change goes through one public action method.
//!
//! 2. **Validate, Then Commit**: Actions stage their effects in an
//!    `EffectBatch` and only resolve it once every check has passed. A
//!    rejected action leaves the state untouched.
//!
//! 3. **Deterministic**: All shuffles and rolls come from a seeded
//!    `GameRng`, so a seed plus an action history replays a match exactly.
//!
//! ## Modules
//!
//! - `core`: Player ids, actions, errors, RNG, rule constants
//! - `cards`: Blueprint and contractor definitions, instances, registry
//! - `deck`: Draw/discard piles and the marketplace
//! - `player`: Per-player state and the headquarters board
//! - `effects`: Card activation rules and the effect resolver
//! - `game`: The match state machine
//! - `scoring`: Prestige and final ranking

pub mod cards;
pub mod core;
pub mod deck;
pub mod effects;
pub mod game;
pub mod player;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActionOutcome, ActionRecord, ActionResult, GameRng, GameRngState,
    MarketHalf, Phase, PlayerId, PlayerRegistry, Resource, RulesConfig, Shortfall, SnapshotError,
};

pub use crate::cards::{
    BlueprintCard, BlueprintDefinition, CardCategory, CardId, CardRegistry, ContractorCard,
    ContractorDefinition, ContractorKind, Prestige, Tool,
};

pub use crate::deck::{Deck, Marketplace};

pub use crate::player::{Floor, FloorYield, Headquarters, Player};

pub use crate::effects::{
    CardEffect, Effect, EffectBatch, EffectRegistry, EffectResolver, EffectView, RewardChoice,
    Selections,
};

pub use crate::game::{GameBuilder, GameState, PlayerView, PublicState};

pub use crate::scoring::{rank_players, Score, Standing};
