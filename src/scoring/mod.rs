//! Prestige and final ranking.
//!
//! Both functions are pure: they read a compound or a roster and never
//! mutate anything.

use serde::{Deserialize, Serialize};

use crate::cards::{BlueprintCard, Prestige};
use crate::core::{PlayerId, PlayerRegistry};
use crate::player::Player;

/// Prestige for owning `beacons` variable-prestige cards: 0, 2, 5, 9, 14, ...
///
/// The n-th Beacon is worth n + 1 more than none, so the total is n(n+3)/2.
#[must_use]
pub fn beacon_bonus(beacons: u32) -> u32 {
    beacons * (beacons + 3) / 2
}

/// Total prestige of a compound, computed from scratch.
#[must_use]
pub fn calculate_prestige(compound: &[BlueprintCard]) -> u32 {
    let mut fixed = 0;
    let mut beacons = 0;
    for card in compound {
        match card.prestige {
            Prestige::Fixed(p) => fixed += p,
            Prestige::Variable => beacons += 1,
        }
    }
    fixed + beacon_bonus(beacons)
}

/// Lexicographic end-of-game score. Field order is comparison order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Score {
    pub points: u32,
    pub metal: u32,
    pub energy: u32,
    pub hand_size: u32,
}

impl Score {
    #[must_use]
    pub fn of(player: &Player) -> Self {
        Self {
            points: player.goods + player.prestige,
            metal: player.metal,
            energy: player.energy,
            hand_size: player.hand.len() as u32,
        }
    }
}

/// One row of the final ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based; tied players share a rank and the next rank skips ahead.
    pub rank: u32,
    pub player: PlayerId,
    pub score: Score,
}

/// Rank every player, best first. Ties keep turn order.
#[must_use]
pub fn rank_players(players: &PlayerRegistry<Player>) -> Vec<Standing> {
    let mut scored: Vec<(PlayerId, Score)> = players
        .iter()
        .map(|(id, p)| (id.clone(), Score::of(p)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut standings: Vec<Standing> = Vec::with_capacity(scored.len());
    for (position, (player, score)) in scored.into_iter().enumerate() {
        let rank = match standings.last() {
            Some(prev) if prev.score == score => prev.rank,
            _ => position as u32 + 1,
        };
        standings.push(Standing { rank, player, score });
    }
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardRegistry};

    fn card(id: u32, name: &str) -> BlueprintCard {
        let registry = CardRegistry::standard();
        BlueprintCard::new(CardId::new(id), registry.blueprint(name).unwrap())
    }

    #[test]
    fn test_beacon_steps() {
        let steps: Vec<u32> = (0..=4).map(beacon_bonus).collect();
        assert_eq!(steps, vec![0, 2, 5, 9, 14]);
    }

    #[test]
    fn test_calculate_prestige() {
        let compound = vec![
            card(0, "Beacon"),
            card(1, "Megalith"),
            card(2, "Beacon"),
            card(3, "Obelisk"),
            card(4, "Dojo"),
        ];
        assert_eq!(calculate_prestige(&compound), 3 + 2 + 5);
        assert_eq!(calculate_prestige(&[]), 0);
    }

    #[test]
    fn test_rank_players_ties_share_rank() {
        let mut players = PlayerRegistry::new();
        let mut a = Player::new(4);
        a.goods = 5;
        let mut b = Player::new(4);
        b.goods = 9;
        let mut c = Player::new(4);
        c.goods = 5;
        let mut d = Player::new(4);
        d.goods = 1;
        players.insert(PlayerId::new("a"), a);
        players.insert(PlayerId::new("b"), b);
        players.insert(PlayerId::new("c"), c);
        players.insert(PlayerId::new("d"), d);

        let standings = rank_players(&players);
        let ranks: Vec<(&str, u32)> = standings
            .iter()
            .map(|s| (s.player.as_str(), s.rank))
            .collect();
        assert_eq!(ranks, vec![("b", 1), ("a", 2), ("c", 2), ("d", 4)]);
    }

    #[test]
    fn test_tiebreakers_in_order() {
        let mut players = PlayerRegistry::new();
        let mut a = Player::new(4);
        a.goods = 3;
        a.energy = 9;
        let mut b = Player::new(4);
        b.prestige = 3;
        b.metal = 1;
        players.insert(PlayerId::new("a"), a);
        players.insert(PlayerId::new("b"), b);

        let standings = rank_players(&players);
        assert_eq!(standings[0].player, PlayerId::new("b"));
        assert_eq!(standings[1].rank, 2);
    }
}
