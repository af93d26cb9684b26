//! Phase transitions and end-of-match detection.

use crate::core::{ActionOutcome, Phase};
use crate::scoring::rank_players;

use super::GameState;

impl GameState {
    /// Flip to the other phase with full bookkeeping.
    pub(super) fn force_transition(&mut self) -> ActionOutcome {
        match self.phase {
            Phase::Market => self.enter_work(),
            Phase::Work => self.end_round(),
        }
    }

    fn enter_work(&mut self) -> ActionOutcome {
        for (_, player) in self.players.iter_mut() {
            player.reset_activations();
        }
        self.phase = Phase::Work;
        log::info!("round {}: work phase", self.round);
        ActionOutcome::PhaseChanged { phase: Phase::Work }
    }

    /// Close the work phase: latch or finish, then reset for the next market.
    fn end_round(&mut self) -> ActionOutcome {
        let already_final = self.final_round;

        if !already_final {
            let (goods, built) = (self.config.goods_to_end, self.config.compound_to_end);
            let triggered = self
                .players
                .iter()
                .find(|(_, p)| p.goods >= goods || p.compound.len() >= built);
            if let Some((id, player)) = triggered {
                log::info!(
                    "{} triggered the final round ({} goods, {} built)",
                    id,
                    player.goods,
                    player.compound.len()
                );
                self.final_round = true;
            }
        }

        if already_final {
            let standings = rank_players(&self.players);
            log::info!(
                "match over after round {}: winner {}",
                self.round,
                standings.first().map_or("nobody", |s| s.player.as_str())
            );
            self.standings = Some(standings.clone());
            return ActionOutcome::MatchOver { standings };
        }

        let starting_dice = self.config.starting_dice;
        for (_, player) in self.players.iter_mut() {
            player.reset_round(starting_dice);
        }
        self.current_player = match &self.current_player {
            Some(current) if self.players.contains(current) => {
                self.players.next_after(current).cloned()
            }
            _ => self.players.first_id().cloned(),
        };
        self.phase = Phase::Market;
        self.round += 1;
        log::info!("round {}: market phase", self.round);
        ActionOutcome::PhaseChanged { phase: Phase::Market }
    }
}
