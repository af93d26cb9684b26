//! Seating and unseating players.

use crate::core::{ActionError, ActionOutcome, ActionResult, Phase, PlayerId};
use crate::player::Player;

use super::GameState;

impl GameState {
    pub(super) fn join(&mut self, id: &PlayerId) -> ActionResult<ActionOutcome> {
        if self.players.contains(id) {
            return Err(ActionError::DuplicatePlayer(id.clone()));
        }
        self.players.insert(id.clone(), Player::new(self.config.starting_dice));
        if self.current_player.is_none() {
            self.current_player = Some(id.clone());
        }
        log::info!("{} joined ({} seated)", id, self.players.len());
        Ok(ActionOutcome::Accepted)
    }

    /// Unseat a player mid-match.
    ///
    /// Their hand and compound go to the blueprint discard. If they held
    /// the turn token it passes on, and if they were the last player the
    /// current phase was waiting for, the phase closes.
    pub(super) fn leave(&mut self, id: &PlayerId) -> ActionResult<ActionOutcome> {
        if !self.players.contains(id) {
            return Err(ActionError::UnknownPlayer(id.clone()));
        }

        if self.current_player.as_ref() == Some(id) {
            self.current_player = self.next_to_draw_after(id).filter(|next| next != id);
        }

        let player = self.player_mut(id)?;
        let hand = std::mem::take(&mut player.hand);
        let compound = std::mem::take(&mut player.compound);
        self.blueprints.discard_all(hand.into_values());
        self.blueprints.discard_all(compound);
        self.players.remove(id);
        log::info!("{} left ({} seated)", id, self.players.len());

        if self.players.is_empty() || self.is_over() {
            if self.players.is_empty() {
                self.current_player = None;
            }
            return Ok(ActionOutcome::Accepted);
        }
        if self.current_player.is_none() {
            self.current_player = self.players.first_id().cloned();
        }

        let waiting_on_nobody = match self.phase {
            Phase::Market => self.players.values().all(|p| p.work_done.has_drawn_card),
            Phase::Work => self.players.values().all(|p| p.work_done.has_finished_work),
        };
        if waiting_on_nobody {
            return Ok(self.force_transition());
        }
        Ok(ActionOutcome::Accepted)
    }
}
