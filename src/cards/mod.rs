//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Match-wide identifier for one physical card
//! - `BlueprintDefinition` / `ContractorDefinition`: Printed card data
//! - `BlueprintCard` / `ContractorCard`: Runtime copies with ids
//! - `CardRegistry`: The definitions a match's decks are built from

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{
    BlueprintDefinition, CardCategory, CardId, ContractorDefinition, ContractorKind, Prestige, Tool,
};
pub use instance::{BlueprintCard, Card, ContractorCard};
pub use registry::CardRegistry;
