//! Deck service: building, drawing, recycling, and the marketplace.
//!
//! ## Key Types
//!
//! - `Deck<C>`: Draw pile + discard pile, reshuffles on exhaustion
//! - `Marketplace`: Face-up blueprints and per-tool contractor slots
//! - `build_deck` / `remove_by_id`: Deck construction and extraction

pub mod marketplace;
pub mod pile;

pub use marketplace::Marketplace;
pub use pile::{build_deck, remove_by_id, Deck};
