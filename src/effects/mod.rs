//! Card-activation engine.
//!
//! - `Effect` / `EffectBatch`: staged atomic changes to a player
//! - `CardEffect`: a card rule, split into `validate` and `apply`
//! - `EffectRegistry`: blueprint name to rule handler
//! - `EffectResolver`: commits a planned batch
//!
//! ## Atomicity
//!
//! Handlers read through an `EffectView` and return a batch; only the
//! resolver writes. A rejected activation therefore leaves dice, hand,
//! resources and decks exactly as they were.

pub mod cards;
pub mod dice;
mod effect;
mod handler;
mod registry;
mod resolver;
mod selection;

pub use effect::{Cost, Effect, EffectBatch, Gains};
pub use handler::{check_affordable, CardEffect, EffectView};
pub use registry::{EffectRegistry, REPLICATOR};
pub use resolver::{EffectContext, EffectReport, EffectResolver, FULFILLMENT_CENTER};
pub use selection::{check_hand_cards, RewardChoice, Selections};
