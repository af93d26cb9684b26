//! Headquarters: three floors that turn placed dice into resources.
//!
//! | Floor | Accepts | Yields |
//! |-------|---------|--------|
//! | research | 1-6 | draw `1 + bonus` cards |
//! | generate | 1-3 | `value + bonus` energy |
//! | mine | 4-6 | `1 + bonus` metal |
//!
//! The match bonus is +1 whenever the placed value already sits on the floor.

use serde::{Deserialize, Serialize};

use crate::core::{ActionError, ActionResult};

/// A headquarters floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Floor {
    Research,
    Generate,
    Mine,
}

impl Floor {
    pub const ALL: [Floor; 3] = [Floor::Research, Floor::Generate, Floor::Mine];

    /// Whether a die of this value may be placed here.
    #[must_use]
    pub fn accepts(self, value: u8) -> bool {
        match self {
            Floor::Research => (1..=6).contains(&value),
            Floor::Generate => (1..=3).contains(&value),
            Floor::Mine => (4..=6).contains(&value),
        }
    }

    /// What placing `value` with the given match bonus produces.
    #[must_use]
    pub fn output(self, value: u8, bonus: u32) -> FloorYield {
        match self {
            Floor::Research => FloorYield {
                cards: 1 + bonus,
                ..FloorYield::default()
            },
            Floor::Generate => FloorYield {
                energy: u32::from(value) + bonus,
                ..FloorYield::default()
            },
            Floor::Mine => FloorYield {
                metal: 1 + bonus,
                ..FloorYield::default()
            },
        }
    }
}

impl std::fmt::Display for Floor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Floor::Research => "research",
            Floor::Generate => "generate",
            Floor::Mine => "mine",
        };
        f.write_str(name)
    }
}

/// Resources produced by one placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorYield {
    pub cards: u32,
    pub energy: u32,
    pub metal: u32,
}

/// Dice placed on each floor this round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headquarters {
    pub research: Vec<u8>,
    pub generate: Vec<u8>,
    pub mine: Vec<u8>,
}

impl Headquarters {
    #[must_use]
    pub fn floor(&self, floor: Floor) -> &[u8] {
        match floor {
            Floor::Research => &self.research,
            Floor::Generate => &self.generate,
            Floor::Mine => &self.mine,
        }
    }

    fn floor_mut(&mut self, floor: Floor) -> &mut Vec<u8> {
        match floor {
            Floor::Research => &mut self.research,
            Floor::Generate => &mut self.generate,
            Floor::Mine => &mut self.mine,
        }
    }

    /// Validate a placement and return what it would yield.
    pub fn check_placement(
        &self,
        floor: Floor,
        value: u8,
        capacity: usize,
    ) -> ActionResult<FloorYield> {
        if !floor.accepts(value) {
            return Err(ActionError::rule(format!("a {} cannot be placed on {}", value, floor)));
        }
        let placed = self.floor(floor);
        if placed.len() >= capacity {
            return Err(ActionError::rule(format!("{} floor is full", floor)));
        }
        let bonus = u32::from(placed.contains(&value));
        Ok(floor.output(value, bonus))
    }

    /// Record a die on a floor. Callers validate with `check_placement` first.
    pub fn place(&mut self, floor: Floor, value: u8) {
        self.floor_mut(floor).push(value);
    }

    pub fn clear(&mut self) {
        self.research.clear();
        self.generate.clear();
        self.mine.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Floor::ALL.iter().all(|&f| self.floor(f).is_empty())
    }
}
