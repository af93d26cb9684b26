//! Core engine types: players, actions, errors, RNG, configuration.
//!
//! Nothing in here knows about individual cards; the rules live in
//! `effects` and `game`.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use action::{Action, ActionOutcome, ActionRecord, MarketHalf, Resource};
pub use config::RulesConfig;
pub use error::{ActionError, ActionResult, Phase, Shortfall, SnapshotError};
pub use player::{PlayerId, PlayerRegistry};
pub use rng::{GameRng, GameRngState, DIE_FACES};
