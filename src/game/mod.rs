//! The match state machine.
//!
//! `GameState` owns the decks, the marketplace, every player, the phase
//! flag, the turn token and the final-round latch. It is the only mutator
//! of any of them: the session layer calls one method per player action
//! and gets back an `ActionResult<ActionOutcome>`.
//!
//! ## Flow
//!
//! - **Market** (turn-based): the token holder may refresh once, then picks
//!   up a blueprint or hires a contractor. When everyone has drawn, Work
//!   begins.
//! - **Work** (simultaneous): roll, place, build, activate, then end turn.
//!   When everyone has ended, end triggers are checked and Market begins
//!   again, or the match ends if the final round was already latched.
//!
//! ## Example
//!
//! ```
//! use blueprint_engine::core::{Phase, PlayerId};
//! use blueprint_engine::game::GameBuilder;
//!
//! let mut game = GameBuilder::new().seed(7).build();
//! let ada = PlayerId::new("ada");
//! game.add_player(ada.clone()).unwrap();
//!
//! let card = game.marketplace().blueprints[0].id;
//! game.pickup_from_marketplace(&ada, card).unwrap();
//! assert_eq!(game.phase(), Phase::Work);
//! ```

mod market;
mod phase;
mod roster;
mod snapshot;
mod view;
mod work;

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{BlueprintCard, CardId, CardRegistry, ContractorCard, Tool};
use crate::core::{
    Action, ActionError, ActionOutcome, ActionRecord, ActionResult, GameRng, MarketHalf, Phase,
    PlayerId, PlayerRegistry, Resource, RulesConfig,
};
use crate::deck::{build_deck, Deck, Marketplace};
use crate::effects::{EffectRegistry, Selections};
use crate::player::{Floor, Player};
use crate::scoring::Standing;

pub use view::{PlayerView, PublicState};

fn standard_effects() -> Arc<EffectRegistry> {
    Arc::new(EffectRegistry::standard())
}

/// Builder for a new match.
pub struct GameBuilder {
    seed: u64,
    config: RulesConfig,
    cards: CardRegistry,
    effects: EffectRegistry,
    players: Vec<PlayerId>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            seed: 0,
            config: RulesConfig::default(),
            cards: CardRegistry::standard(),
            effects: EffectRegistry::standard(),
            players: Vec::new(),
        }
    }
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed for every shuffle and die roll in the match.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    /// Card definitions the decks are built from.
    #[must_use]
    pub fn cards(mut self, cards: CardRegistry) -> Self {
        self.cards = cards;
        self
    }

    /// Activation handlers. Snapshots reload with the standard set.
    #[must_use]
    pub fn effects(mut self, effects: EffectRegistry) -> Self {
        self.effects = effects;
        self
    }

    /// Seat a player; order of calls is turn order.
    #[must_use]
    pub fn player(mut self, id: impl Into<PlayerId>) -> Self {
        self.players.push(id.into());
        self
    }

    /// Shuffle the decks, fill the marketplace and seat the players.
    ///
    /// Duplicate player ids are seated once.
    #[must_use]
    pub fn build(self) -> GameState {
        let master = GameRng::new(self.seed);
        let mut shuffle_rng = master.for_context("shuffle");
        let dice_rng = master.for_context("dice");

        let rng = &mut shuffle_rng;
        let blueprints = build_deck(self.cards.blueprints(), |d| d.copies, BlueprintCard::new, rng);
        let contractors =
            build_deck(self.cards.contractors(), |d| d.copies, ContractorCard::new, rng);

        let mut game = GameState {
            config: self.config,
            blueprints: Deck::new(blueprints),
            contractors: Deck::new(contractors),
            marketplace: Marketplace::new(),
            players: PlayerRegistry::new(),
            phase: Phase::Market,
            current_player: None,
            final_round: false,
            round: 1,
            standings: None,
            shuffle_rng,
            dice_rng,
            history: Vector::new(),
            effects: Arc::new(self.effects),
        };
        game.refill_marketplace();

        for id in self.players {
            if let Err(err) = game.add_player(id) {
                log::warn!("skipping seat: {}", err);
            }
        }

        log::info!(
            "match created: seed {}, {} blueprints, {} contractors",
            self.seed,
            game.blueprints.available() + game.marketplace.blueprints.len(),
            game.contractors.available() + game.marketplace.contractors.values().flatten().count()
        );
        game
    }
}

/// Authoritative state of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    config: RulesConfig,
    blueprints: Deck<BlueprintCard>,
    contractors: Deck<ContractorCard>,
    marketplace: Marketplace,
    players: PlayerRegistry<Player>,
    phase: Phase,
    /// Turn token; meaningful during the market phase.
    current_player: Option<PlayerId>,
    final_round: bool,
    round: u32,
    /// Set once the match is over.
    standings: Option<Vec<Standing>>,
    shuffle_rng: GameRng,
    dice_rng: GameRng,
    history: Vector<ActionRecord>,
    #[serde(skip, default = "standard_effects")]
    effects: Arc<EffectRegistry>,
}

impl GameState {
    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.current_player.as_ref()
    }

    #[must_use]
    pub fn is_final_round(&self) -> bool {
        self.final_round
    }

    /// Rounds started so far, counting the current one.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.standings.is_some()
    }

    /// Final ranking, once the match is over.
    #[must_use]
    pub fn standings(&self) -> Option<&[Standing]> {
        self.standings.as_deref()
    }

    #[must_use]
    pub fn marketplace(&self) -> &Marketplace {
        &self.marketplace
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    #[must_use]
    pub fn players(&self) -> &PlayerRegistry<Player> {
        &self.players
    }

    #[must_use]
    pub fn blueprint_deck(&self) -> &Deck<BlueprintCard> {
        &self.blueprints
    }

    #[must_use]
    pub fn contractor_deck(&self) -> &Deck<ContractorCard> {
        &self.contractors
    }

    /// Every accepted action, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    // === Public actions ===

    pub fn add_player(&mut self, id: PlayerId) -> ActionResult<ActionOutcome> {
        self.apply(&id, Action::Join)
    }

    pub fn remove_player(&mut self, id: &PlayerId) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::Leave)
    }

    pub fn pickup_from_marketplace(
        &mut self,
        id: &PlayerId,
        card: CardId,
    ) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::Pickup { card })
    }

    pub fn hire_contractor(
        &mut self,
        id: &PlayerId,
        tool: Tool,
        discard: CardId,
        target: Option<PlayerId>,
    ) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::Hire { tool, discard, target })
    }

    pub fn refresh_marketplace(
        &mut self,
        id: &PlayerId,
        half: MarketHalf,
        resource: Resource,
    ) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::Refresh { half, resource })
    }

    pub fn build_card(
        &mut self,
        id: &PlayerId,
        card: CardId,
        discard: CardId,
    ) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::Build { card, discard })
    }

    pub fn roll_dice(&mut self, id: &PlayerId) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::Roll)
    }

    pub fn choose_dice(&mut self, id: &PlayerId, values: Vec<u8>) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::Choose { values })
    }

    pub fn gain_dice_value(&mut self, id: &PlayerId, value: u8) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::GainDie { value })
    }

    pub fn place_die_in_headquarters(
        &mut self,
        id: &PlayerId,
        die: usize,
        floor: Floor,
    ) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::Place { die, floor })
    }

    pub fn activate_card(
        &mut self,
        id: &PlayerId,
        card: CardId,
        selections: Selections,
        replicate: Option<CardId>,
    ) -> ActionResult<ActionOutcome> {
        self.apply(
            id,
            Action::Activate {
                card,
                selections,
                replicate,
            },
        )
    }

    pub fn end_turn(
        &mut self,
        id: &PlayerId,
        discard: Vec<CardId>,
        energy: u32,
        metal: u32,
    ) -> ActionResult<ActionOutcome> {
        self.apply(id, Action::EndTurn { discard, energy, metal })
    }

    /// Force the phase transition, running the same bookkeeping as a
    /// natural one.
    pub fn change_phase(&mut self) -> ActionResult<ActionOutcome> {
        self.guard(&Action::ChangePhase)?;
        let round = self.round;
        let outcome = self.force_transition();
        self.record(round, None, Action::ChangePhase);
        Ok(outcome)
    }

    /// Validate and perform one action for `id`.
    ///
    /// Accepted actions are appended to the history. Rejected actions
    /// leave the state untouched.
    pub fn apply(&mut self, id: &PlayerId, action: Action) -> ActionResult<ActionOutcome> {
        if action == Action::ChangePhase {
            return self.change_phase();
        }
        let round = self.round;
        let result = self.guard(&action).and_then(|()| self.dispatch(id, &action));
        match &result {
            Ok(outcome) => {
                log::debug!("{} {}: {:?}", id, action.name(), outcome);
                self.record(round, Some(id.clone()), action);
            }
            Err(err) => log::warn!("{} {} rejected: {}", id, action.name(), err),
        }
        result
    }

    /// Re-apply recorded actions in order, stopping at the first rejection.
    pub fn replay<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a ActionRecord>,
    ) -> ActionResult<()> {
        for record in records {
            match &record.player {
                Some(id) => self.apply(id, record.action.clone())?,
                None => self.change_phase()?,
            };
        }
        Ok(())
    }

    fn dispatch(&mut self, id: &PlayerId, action: &Action) -> ActionResult<ActionOutcome> {
        match action {
            Action::Join => self.join(id),
            Action::Leave => self.leave(id),
            Action::Pickup { card } => self.pickup(id, *card),
            Action::Hire {
                tool,
                discard,
                target,
            } => self.hire(id, *tool, *discard, target.as_ref()),
            Action::Refresh { half, resource } => self.refresh(id, *half, *resource),
            Action::Roll => self.roll(id),
            Action::Choose { values } => self.choose(id, values),
            Action::GainDie { value } => self.gain_die(id, *value),
            Action::Place { die, floor } => self.place(id, *die, *floor),
            Action::Build { card, discard } => self.build(id, *card, *discard),
            Action::Activate {
                card,
                selections,
                replicate,
            } => self.activate(id, *card, selections, *replicate),
            Action::EndTurn {
                discard,
                energy,
                metal,
            } => self.finish_work(id, discard, *energy, *metal),
            Action::ChangePhase => Ok(self.force_transition()),
        }
    }

    /// Checks shared by every action: the match is live and the phase fits.
    fn guard(&self, action: &Action) -> ActionResult<()> {
        if self.is_over() && *action != Action::Leave {
            return Err(ActionError::GameOver);
        }
        match action.phase() {
            Some(phase) if phase != self.phase => Err(ActionError::wrong_phase(phase)),
            _ => Ok(()),
        }
    }

    fn record(&mut self, round: u32, player: Option<PlayerId>, action: Action) {
        let sequence = self.history.len() as u64;
        self.history.push_back(ActionRecord::new(sequence, round, player, action));
    }

    // === Shared lookups ===

    fn player_ref(&self, id: &PlayerId) -> ActionResult<&Player> {
        self.players.get(id).ok_or_else(|| ActionError::UnknownPlayer(id.clone()))
    }

    fn player_mut(&mut self, id: &PlayerId) -> ActionResult<&mut Player> {
        self.players
            .get_mut(id)
            .ok_or_else(|| ActionError::UnknownPlayer(id.clone()))
    }

    fn refill_marketplace(&mut self) {
        self.marketplace.refill(
            self.config.marketplace_blueprints,
            &mut self.blueprints,
            &mut self.contractors,
            &mut self.shuffle_rng,
        );
    }

    /// Every blueprint id in the match, wherever it is.
    ///
    /// Used to check that no card is ever duplicated or lost.
    #[must_use]
    pub fn all_blueprint_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self.blueprints.ids().collect();
        ids.extend(self.marketplace.blueprints.iter().map(|c| c.id));
        for player in self.players.values() {
            ids.extend(player.hand.keys().copied());
            ids.extend(player.compound.iter().map(|c| c.id));
        }
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_player_game() -> (GameState, PlayerId, PlayerId) {
        let a = PlayerId::new("a");
        let b = PlayerId::new("b");
        let game = GameBuilder::new().seed(11).player("a").player("b").build();
        (game, a, b)
    }

    #[test]
    fn test_builder_seats_players_in_order() {
        let (game, a, b) = two_player_game();
        let order: Vec<&PlayerId> = game.players().ids().collect();
        assert_eq!(order, vec![&a, &b]);
        assert_eq!(game.current_player(), Some(&a));
        assert_eq!(game.phase(), Phase::Market);
        assert_eq!(game.marketplace().blueprints.len(), 4);
    }

    #[test]
    fn test_no_card_lost_at_start() {
        let (game, _, _) = two_player_game();
        let ids = game.all_blueprint_ids();
        let copies = CardRegistry::standard().blueprint_copies();
        let expected: Vec<CardId> = (0..copies).map(CardId::new).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_history_records_only_accepted_actions() {
        let (mut game, a, b) = two_player_game();
        assert!(game.roll_dice(&a).is_err());
        assert!(game.pickup_from_marketplace(&b, CardId::new(0)).is_err());

        let card = game.marketplace().blueprints[0].id;
        game.pickup_from_marketplace(&a, card).unwrap();

        let last = game.history().back().unwrap();
        assert_eq!(last.player, Some(a));
        assert_eq!(last.action, Action::Pickup { card });
        // two joins plus the pickup
        assert_eq!(game.history().len(), 3);
    }

    #[test]
    fn test_same_seed_same_market() {
        let (g1, _, _) = two_player_game();
        let (g2, _, _) = two_player_game();
        assert_eq!(g1.marketplace(), g2.marketplace());
    }
}
