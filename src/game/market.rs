//! Market-phase actions: pickups, contractor hires and refreshes.

use crate::cards::{CardId, ContractorCard, ContractorKind, Tool};
use crate::core::{
    ActionError, ActionOutcome, ActionResult, MarketHalf, Phase, PlayerId, Resource, Shortfall,
};
use crate::effects::{
    check_affordable, Effect, EffectBatch, EffectContext, EffectResolver, EffectView,
};
use crate::player::Player;

use super::GameState;

impl GameState {
    /// Market-phase, token-holder, not-yet-drawn checks.
    fn check_market_turn(&self, id: &PlayerId) -> ActionResult<&Player> {
        if self.phase != Phase::Market {
            return Err(ActionError::wrong_phase(Phase::Market));
        }
        let player = self.player_ref(id)?;
        match &self.current_player {
            Some(current) if current == id => {}
            Some(current) => {
                return Err(ActionError::NotYourTurn {
                    current: current.clone(),
                    attempted: id.clone(),
                })
            }
            None => return Err(ActionError::rule("no player holds the turn")),
        }
        if player.work_done.has_drawn_card {
            return Err(ActionError::already("drew a card this market phase"));
        }
        Ok(player)
    }

    /// First player after `id`, in turn order, who has yet to draw.
    ///
    /// Falls back to the plain next seat when everyone has drawn.
    pub(super) fn next_to_draw_after(&self, id: &PlayerId) -> Option<PlayerId> {
        let start = self.players.position(id)?;
        let seats: Vec<(&PlayerId, &Player)> = self.players.iter().collect();
        let n = seats.len();
        (1..n)
            .map(|step| seats[(start + step) % n])
            .find(|(_, p)| !p.work_done.has_drawn_card)
            .map(|(next, _)| next.clone())
            .or_else(|| self.players.next_after(id).cloned())
    }

    /// Mark the turn done, refill the marketplace and pass the token.
    fn finish_market_turn(&mut self, id: &PlayerId) -> ActionResult<Option<ActionOutcome>> {
        self.player_mut(id)?.work_done.has_drawn_card = true;
        self.refill_marketplace();
        self.current_player = self.next_to_draw_after(id);

        if self.players.values().all(|p| p.work_done.has_drawn_card) {
            return Ok(Some(self.force_transition()));
        }
        Ok(None)
    }

    pub(super) fn pickup(&mut self, id: &PlayerId, card: CardId) -> ActionResult<ActionOutcome> {
        self.check_market_turn(id)?;
        let taken = self
            .marketplace
            .take_blueprint(card)
            .ok_or_else(|| ActionError::UnknownCard(card.to_string()))?;
        log::debug!("{} picks up {} ({})", id, taken.name, card);
        self.player_mut(id)?.hand.insert(card, taken);

        let transition = self.finish_market_turn(id)?;
        Ok(transition.unwrap_or(ActionOutcome::Drew { cards: vec![card] }))
    }

    pub(super) fn hire(
        &mut self,
        id: &PlayerId,
        tool: Tool,
        discard: CardId,
        target: Option<&PlayerId>,
    ) -> ActionResult<ActionOutcome> {
        let player = self.check_market_turn(id)?;
        let contractor = self
            .marketplace
            .contractor(tool)
            .ok_or_else(|| ActionError::EmptySlot(tool.to_string()))?;
        let spent = player
            .hand
            .get(&discard)
            .ok_or_else(|| ActionError::not_owned(discard.to_string()))?;
        if spent.tool != tool {
            return Err(ActionError::rule(format!(
                "{} has a {}, the {} slot needs a {}",
                spent.name, spent.tool, contractor.name, tool
            )));
        }

        let target = if contractor.kind.requires_target() {
            let target = target.ok_or_else(|| {
                ActionError::selection(format!("{} needs a target", contractor.name))
            })?;
            if target == id {
                return Err(ActionError::selection("cannot target yourself"));
            }
            if !self.players.contains(target) {
                return Err(ActionError::UnknownPlayer(target.clone()));
            }
            Some(target)
        } else {
            None
        };

        let (own, theirs) = contractor_batches(contractor, discard);
        let view = EffectView::new(player, self.blueprints.available(), &self.config);
        check_affordable(&view, &own)?;

        let contractor = self
            .marketplace
            .take_contractor(tool)
            .ok_or_else(|| ActionError::EmptySlot(tool.to_string()))?;
        log::debug!("{} hires {} from the {} slot", id, contractor.name, tool);

        let drawn = self.resolve_for(id, &own)?;
        if let Some(target) = target {
            self.resolve_for(target, &theirs)?;
        }
        match contractor.kind {
            ContractorKind::Engineer => self.player_mut(id)?.selectable_dice = true,
            ContractorKind::Tinkerer => self.player_mut(id)?.bonus_die = true,
            ContractorKind::Architect => self.architect_build(id)?,
            _ => {}
        }
        self.contractors.discard(contractor);

        let transition = self.finish_market_turn(id)?;
        Ok(transition.unwrap_or(ActionOutcome::Drew { cards: drawn }))
    }

    /// Draw until a card the player may build turns up, then build it free.
    ///
    /// Skipped cards go to the discard. Gives up after
    /// `architect_attempts` draws or when the deck runs dry.
    fn architect_build(&mut self, id: &PlayerId) -> ActionResult<()> {
        for _ in 0..self.config.architect_attempts {
            let Some(card) = self.blueprints.draw_next(&mut self.shuffle_rng) else {
                log::debug!("architect found no cards");
                return Ok(());
            };
            let player = self.player_ref(id)?;
            if player.has_built(&card.name) && !self.config.allows_multiple(&card.name) {
                self.blueprints.discard(card);
                continue;
            }
            log::debug!("architect builds {} for {}", card.name, id);
            self.player_mut(id)?.add_to_compound(card);
            return Ok(());
        }
        log::debug!("architect gave up after {} draws", self.config.architect_attempts);
        Ok(())
    }

    pub(super) fn refresh(
        &mut self,
        id: &PlayerId,
        half: MarketHalf,
        resource: Resource,
    ) -> ActionResult<ActionOutcome> {
        let player = self.check_market_turn(id)?;
        if player.work_done.has_refreshed_cards {
            return Err(ActionError::already("refreshed the marketplace this round"));
        }
        let cost = self.config.refresh_cost;
        match resource {
            Resource::Energy => ActionError::require(Shortfall::Energy, cost, player.energy)?,
            Resource::Metal => ActionError::require(Shortfall::Metal, cost, player.metal)?,
        }

        let player = self.player_mut(id)?;
        match resource {
            Resource::Energy => player.energy -= cost,
            Resource::Metal => player.metal -= cost,
        }
        player.work_done.has_refreshed_cards = true;

        match half {
            MarketHalf::Blueprints => {
                let old = self.marketplace.clear_blueprints();
                self.blueprints.discard_all(old);
            }
            MarketHalf::Contractors => {
                let old = self.marketplace.clear_contractors();
                self.contractors.discard_all(old);
            }
        }
        self.refill_marketplace();
        log::debug!("{} refreshed the {:?} for {} {:?}", id, half, cost, resource);
        Ok(ActionOutcome::Accepted)
    }

    /// Commit a batch against one player and the blueprint deck.
    pub(super) fn resolve_for(
        &mut self,
        id: &PlayerId,
        batch: &EffectBatch,
    ) -> ActionResult<Vec<CardId>> {
        let player = self
            .players
            .get_mut(id)
            .ok_or_else(|| ActionError::UnknownPlayer(id.clone()))?;
        let mut ctx = EffectContext::new(player, &mut self.blueprints, &mut self.shuffle_rng);
        Ok(EffectResolver::resolve(&mut ctx, batch).drawn)
    }
}

/// Effects of hiring a contractor: the hirer's batch and the target's.
fn contractor_batches(contractor: &ContractorCard, discard: CardId) -> (EffectBatch, EffectBatch) {
    let mut own = EffectBatch::new()
        .with(Effect::SpendEnergy(contractor.cost_energy))
        .with(Effect::discard(&[discard]));
    let mut theirs = EffectBatch::new();

    match contractor.kind {
        ContractorKind::Surveyor => own.push(Effect::DrawCards(2)),
        ContractorKind::Electrician => own.push(Effect::GainEnergy(3)),
        ContractorKind::Prospector => own.push(Effect::GainMetal(2)),
        ContractorKind::Diplomat => {
            own.push(Effect::GainMetal(2));
            theirs.push(Effect::GainMetal(1));
        }
        ContractorKind::Patron => {
            own.push(Effect::GainEnergy(2));
            theirs.push(Effect::GainEnergy(2));
        }
        ContractorKind::Foreman => own.push(Effect::GainDice(2)),
        ContractorKind::Architect | ContractorKind::Engineer | ContractorKind::Tinkerer => {}
    }
    (own, theirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BlueprintCard, CardRegistry};
    use crate::game::GameBuilder;

    fn hand_card(game: &GameState, id: &PlayerId) -> BlueprintCard {
        game.player(id).unwrap().hand.values().next().unwrap().clone()
    }

    #[test]
    fn test_turn_token_advances() {
        let mut game = GameBuilder::new().seed(3).player("a").player("b").player("c").build();
        let a = PlayerId::new("a");
        let b = PlayerId::new("b");

        let card = game.marketplace().blueprints[0].id;
        assert!(matches!(
            game.pickup_from_marketplace(&b, card),
            Err(ActionError::NotYourTurn { .. })
        ));
        game.pickup_from_marketplace(&a, card).unwrap();
        assert_eq!(game.current_player(), Some(&b));
        assert_eq!(game.marketplace().blueprints.len(), 4);
        assert!(game.player(&a).unwrap().hand.contains_key(&card));
    }

    #[test]
    fn test_pickup_unknown_card() {
        let mut game = GameBuilder::new().player("a").build();
        let a = PlayerId::new("a");
        assert!(matches!(
            game.pickup_from_marketplace(&a, CardId::new(9999)),
            Err(ActionError::UnknownCard(_))
        ));
        assert!(game.player(&a).unwrap().hand.is_empty());
    }

    #[test]
    fn test_market_closes_when_everyone_drew() {
        let mut game = GameBuilder::new().player("a").player("b").build();
        let a = PlayerId::new("a");
        let b = PlayerId::new("b");
        let card = game.marketplace().blueprints[0].id;
        game.pickup_from_marketplace(&a, card).unwrap();
        let card = game.marketplace().blueprints[0].id;
        let outcome = game.pickup_from_marketplace(&b, card).unwrap();
        assert_eq!(outcome, ActionOutcome::PhaseChanged { phase: Phase::Work });
        assert_eq!(game.phase(), Phase::Work);
    }

    #[test]
    fn test_refresh_once_per_round() {
        let mut game = GameBuilder::new().player("a").player("b").build();
        let a = PlayerId::new("a");

        assert!(matches!(
            game.refresh_marketplace(&a, MarketHalf::Blueprints, Resource::Energy),
            Err(ActionError::InsufficientResources { .. })
        ));

        game.players.get_mut(&a).unwrap().energy = 3;
        let before: Vec<CardId> = game.marketplace().blueprints.iter().map(|c| c.id).collect();
        game.refresh_marketplace(&a, MarketHalf::Blueprints, Resource::Energy).unwrap();
        let after: Vec<CardId> = game.marketplace().blueprints.iter().map(|c| c.id).collect();

        assert_eq!(game.player(&a).unwrap().energy, 2);
        assert_eq!(after.len(), 4);
        assert_ne!(before, after);
        assert!(matches!(
            game.refresh_marketplace(&a, MarketHalf::Contractors, Resource::Energy),
            Err(ActionError::AlreadyActed { .. })
        ));
        assert_eq!(game.current_player(), Some(&a));
    }

    #[test]
    fn test_hire_requires_matching_tool() {
        let mut game = GameBuilder::new().seed(21).player("a").player("b").build();
        let a = PlayerId::new("a");
        let b = PlayerId::new("b");

        // a draws a card in round one, then round two hires with it
        let card = game.marketplace().blueprints[0].id;
        game.pickup_from_marketplace(&a, card).unwrap();
        let card = game.marketplace().blueprints[0].id;
        game.pickup_from_marketplace(&b, card).unwrap();
        game.change_phase().unwrap();
        game.current_player = Some(a.clone());

        let held = hand_card(&game, &a);
        let wrong_tool = Tool::ALL.into_iter().find(|&t| t != held.tool).unwrap();
        let before = game.player(&a).unwrap().clone();

        assert!(matches!(
            game.hire_contractor(&a, wrong_tool, held.id, Some(b.clone())),
            Err(ActionError::RuleViolation(_))
        ));
        assert_eq!(game.player(&a).unwrap(), &before);
    }

    /// Two seats, every contractor slot holding `kind`, and only the named
    /// blueprints in the deck.
    fn hiring_game(
        kind: ContractorKind,
        blueprints: &[(&str, u32)],
    ) -> (GameState, PlayerId, PlayerId) {
        let standard = CardRegistry::standard();
        let mut cards = CardRegistry::new();
        for &(name, copies) in blueprints {
            cards.register_blueprint(standard.blueprint(name).unwrap().clone().copies(copies));
        }
        let mut hired = standard.contractors().iter().find(|d| d.kind == kind).unwrap().clone();
        hired.copies = 6;
        cards.register_contractor(hired);

        let game = GameBuilder::new().seed(4).cards(cards).player("a").player("b").build();
        (game, PlayerId::new("a"), PlayerId::new("b"))
    }

    fn deal(game: &mut GameState, id: &PlayerId) -> BlueprintCard {
        let card = game.blueprints.draw_next(&mut game.shuffle_rng).unwrap();
        game.players.get_mut(id).unwrap().hand.insert(card.id, card.clone());
        card
    }

    fn prebuild(game: &mut GameState, id: &PlayerId) {
        let card = game.blueprints.draw_next(&mut game.shuffle_rng).unwrap();
        game.players.get_mut(id).unwrap().add_to_compound(card);
    }

    /// Hire from the slot matching a dealt card, with 5 energy to spend.
    fn hire_with(
        game: &mut GameState,
        id: &PlayerId,
        target: Option<PlayerId>,
    ) -> (BlueprintCard, ActionResult<ActionOutcome>) {
        let held = deal(game, id);
        game.players.get_mut(id).unwrap().energy = 5;
        let outcome = game.hire_contractor(id, held.tool, held.id, target);
        (held, outcome)
    }

    #[test]
    fn test_hire_passes_turn_and_discards_contractor() {
        let (mut game, a, b) = hiring_game(ContractorKind::Electrician, &[("Dojo", 8)]);
        let (held, outcome) = hire_with(&mut game, &a, None);
        assert_eq!(outcome, Ok(ActionOutcome::Drew { cards: Vec::new() }));

        let player = game.player(&a).unwrap();
        assert!(!player.hand.contains_key(&held.id));
        assert!(player.work_done.has_drawn_card);
        assert_eq!(player.energy, 8);
        assert_eq!(game.current_player(), Some(&b));
        assert_eq!(game.contractor_deck().discard_pile().len(), 1);
        assert!(game.marketplace().contractor(held.tool).is_some());
        assert_eq!(game.blueprint_deck().discard_pile().last().map(|c| c.id), Some(held.id));
    }

    #[test]
    fn test_hire_surveyor_draws_two() {
        let (mut game, a, _) = hiring_game(ContractorKind::Surveyor, &[("Dojo", 8)]);
        let (_, outcome) = hire_with(&mut game, &a, None);

        let drawn = match outcome.unwrap() {
            ActionOutcome::Drew { cards } => cards,
            other => panic!("expected a draw, got {:?}", other),
        };
        assert_eq!(drawn.len(), 2);
        let player = game.player(&a).unwrap();
        assert_eq!(player.hand.len(), 2);
        assert_eq!(player.energy, 4);
    }

    #[test]
    fn test_hire_surveyor_with_no_cards_left() {
        // four face up and one dealt leaves only the discarded card to draw
        let (mut game, a, _) = hiring_game(ContractorKind::Surveyor, &[("Dojo", 5)]);
        let held = deal(&mut game, &a);
        game.players.get_mut(&a).unwrap().energy = 5;
        let before = game.player(&a).unwrap().clone();

        assert_eq!(
            game.hire_contractor(&a, held.tool, held.id, None),
            Err(ActionError::DeckExhausted)
        );
        assert_eq!(game.player(&a).unwrap(), &before);
        assert!(game.marketplace().contractor(held.tool).is_some());
        assert_eq!(game.current_player(), Some(&a));
    }

    #[test]
    fn test_hire_resource_contractors() {
        let (mut game, a, _) = hiring_game(ContractorKind::Prospector, &[("Dojo", 8)]);
        hire_with(&mut game, &a, None).1.unwrap();
        let player = game.player(&a).unwrap();
        assert_eq!((player.energy, player.metal), (4, 2));
    }

    #[test]
    fn test_hire_diplomat_pays_target() {
        let (mut game, a, b) = hiring_game(ContractorKind::Diplomat, &[("Dojo", 8)]);
        hire_with(&mut game, &a, Some(b.clone())).1.unwrap();

        assert_eq!(game.player(&a).unwrap().metal, 2);
        assert_eq!(game.player(&a).unwrap().energy, 4);
        assert_eq!(game.player(&b).unwrap().metal, 1);
    }

    #[test]
    fn test_hire_patron_pays_target() {
        let (mut game, a, b) = hiring_game(ContractorKind::Patron, &[("Dojo", 8)]);
        hire_with(&mut game, &a, Some(b.clone())).1.unwrap();

        assert_eq!(game.player(&a).unwrap().energy, 7);
        assert_eq!(game.player(&b).unwrap().energy, 2);
    }

    #[test]
    fn test_hire_targeted_contractor_needs_other_player() {
        for kind in [ContractorKind::Diplomat, ContractorKind::Patron] {
            let (mut game, a, _) = hiring_game(kind, &[("Dojo", 8)]);
            let held = deal(&mut game, &a);
            game.players.get_mut(&a).unwrap().energy = 5;
            let before = game.player(&a).unwrap().clone();

            assert!(matches!(
                game.hire_contractor(&a, held.tool, held.id, None),
                Err(ActionError::InvalidSelection { .. })
            ));
            assert!(matches!(
                game.hire_contractor(&a, held.tool, held.id, Some(a.clone())),
                Err(ActionError::InvalidSelection { .. })
            ));
            assert_eq!(
                game.hire_contractor(&a, held.tool, held.id, Some(PlayerId::new("ghost"))),
                Err(ActionError::UnknownPlayer(PlayerId::new("ghost")))
            );
            assert_eq!(game.player(&a).unwrap(), &before);
        }
    }

    #[test]
    fn test_hire_foreman_dice_reach_work() {
        let (mut game, a, b) = hiring_game(ContractorKind::Foreman, &[("Dojo", 8)]);
        hire_with(&mut game, &a, None).1.unwrap();
        assert_eq!(game.player(&a).unwrap().num_dice, 6);

        let card = game.marketplace().blueprints[0].id;
        game.pickup_from_marketplace(&b, card).unwrap();
        assert_eq!(game.phase(), Phase::Work);

        match game.roll_dice(&a).unwrap() {
            ActionOutcome::Rolled { dice } => assert_eq!(dice.len(), 6),
            other => panic!("expected a roll, got {:?}", other),
        }
    }

    #[test]
    fn test_hire_engineer_and_tinkerer_flags() {
        let (mut game, a, _) = hiring_game(ContractorKind::Engineer, &[("Dojo", 8)]);
        hire_with(&mut game, &a, None).1.unwrap();
        assert!(game.player(&a).unwrap().selectable_dice);

        let (mut game, a, _) = hiring_game(ContractorKind::Tinkerer, &[("Dojo", 8)]);
        hire_with(&mut game, &a, None).1.unwrap();
        assert!(game.player(&a).unwrap().bonus_die);
    }

    #[test]
    fn test_hire_architect_builds_free() {
        let (mut game, a, _) = hiring_game(ContractorKind::Architect, &[("Obelisk", 8)]);
        prebuild(&mut game, &a);
        hire_with(&mut game, &a, None).1.unwrap();

        let player = game.player(&a).unwrap();
        assert_eq!(player.compound.len(), 2);
        assert!(player.compound.iter().all(|c| c.name == "Obelisk"));
        assert_eq!(player.prestige, 4);
        assert_eq!((player.energy, player.metal), (2, 0));
    }

    #[test]
    fn test_hire_architect_skips_built_names_and_gives_up() {
        let (mut game, a, _) = hiring_game(ContractorKind::Architect, &[("Dojo", 6)]);
        prebuild(&mut game, &a);
        let (held, outcome) = hire_with(&mut game, &a, None);
        outcome.unwrap();

        let player = game.player(&a).unwrap();
        assert_eq!(player.compound.len(), 1);
        assert!(player.hand.is_empty());
        assert_eq!(player.energy, 2);
        // skipped draws land back on the discard, nothing is lost
        let deck = game.blueprint_deck();
        assert_eq!(deck.available() + game.marketplace().blueprints.len(), 5);
        assert_eq!(deck.available(), 1);
        assert!(deck.ids().any(|id| id == held.id));
    }
}
