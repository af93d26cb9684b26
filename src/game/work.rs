//! Work-phase actions. Every player acts independently until they end
//! their turn.

use crate::cards::CardId;
use crate::core::{ActionError, ActionOutcome, ActionResult, Phase, PlayerId, Shortfall, DIE_FACES};
use crate::effects::{
    check_affordable, check_hand_cards, Effect, EffectBatch, EffectView, Selections, REPLICATOR,
};
use crate::player::{Floor, Player};

use super::GameState;

const MEGALITH: &str = "Megalith";
const SCRAP_YARD: &str = "Scrap Yard";
const SOLAR_ARRAY: &str = "Solar Array";

fn check_face(value: u8) -> ActionResult<()> {
    if (1..=DIE_FACES).contains(&value) {
        Ok(())
    } else {
        Err(ActionError::selection(format!("{} is not a die face", value)))
    }
}

impl GameState {
    fn check_work_turn(&self, id: &PlayerId) -> ActionResult<&Player> {
        if self.phase != Phase::Work {
            return Err(ActionError::wrong_phase(Phase::Work));
        }
        let player = self.player_ref(id)?;
        if player.work_done.has_finished_work {
            return Err(ActionError::already("ended the work phase"));
        }
        Ok(player)
    }

    pub(super) fn roll(&mut self, id: &PlayerId) -> ActionResult<ActionOutcome> {
        let player = self.check_work_turn(id)?;
        ActionError::require(Shortfall::Dice, 1, player.num_dice)?;

        let count = player.num_dice;
        let rolled: Vec<u8> = (0..count).map(|_| self.dice_rng.roll_die()).collect();
        let player = self.player_mut(id)?;
        player.dice.extend_from_slice(&rolled);
        player.num_dice = 0;
        log::debug!("{} rolled {:?}", id, rolled);
        Ok(ActionOutcome::Rolled { dice: rolled })
    }

    /// Take dice at chosen values instead of rolling (Engineer).
    pub(super) fn choose(&mut self, id: &PlayerId, values: &[u8]) -> ActionResult<ActionOutcome> {
        let player = self.check_work_turn(id)?;
        if !player.selectable_dice {
            return Err(ActionError::rule("dice values cannot be chosen this round"));
        }
        ActionError::require(Shortfall::Dice, 1, player.num_dice)?;
        if values.len() != player.num_dice as usize {
            return Err(ActionError::selection(format!(
                "expected {} values, got {}",
                player.num_dice,
                values.len()
            )));
        }
        for &value in values {
            check_face(value)?;
        }

        let player = self.player_mut(id)?;
        player.dice.extend_from_slice(values);
        player.num_dice = 0;
        player.selectable_dice = false;
        Ok(ActionOutcome::Rolled { dice: values.to_vec() })
    }

    /// Add one die of a chosen value (Tinkerer).
    pub(super) fn gain_die(&mut self, id: &PlayerId, value: u8) -> ActionResult<ActionOutcome> {
        let player = self.check_work_turn(id)?;
        if !player.bonus_die {
            return Err(ActionError::rule("no bonus die to gain"));
        }
        check_face(value)?;

        let player = self.player_mut(id)?;
        player.dice.push(value);
        player.bonus_die = false;
        Ok(ActionOutcome::Rolled { dice: vec![value] })
    }

    pub(super) fn place(
        &mut self,
        id: &PlayerId,
        die: usize,
        floor: Floor,
    ) -> ActionResult<ActionOutcome> {
        let player = self.check_work_turn(id)?;
        let value = *player
            .dice
            .get(die)
            .ok_or_else(|| ActionError::not_owned(format!("die {}", die)))?;
        let output = player
            .headquarters
            .check_placement(floor, value, self.config.floor_capacity)?;

        let batch = EffectBatch::new()
            .with(Effect::consume(&[die]))
            .with(Effect::GainEnergy(output.energy))
            .with(Effect::GainMetal(output.metal))
            .with(Effect::DrawCards(output.cards));
        let view = EffectView::new(player, self.blueprints.available(), &self.config);
        check_affordable(&view, &batch)?;

        let drawn = self.resolve_for(id, &batch)?;
        self.player_mut(id)?.headquarters.place(floor, value);
        log::debug!("{} placed a {} on {}: {:?}", id, value, floor, output);
        Ok(ActionOutcome::Produced { output, drawn })
    }

    /// Move `card` from hand to compound, discarding `discard` to pay the tool.
    pub(super) fn build(
        &mut self,
        id: &PlayerId,
        card: CardId,
        discard: CardId,
    ) -> ActionResult<ActionOutcome> {
        let player = self.check_work_turn(id)?;
        if card == discard {
            return Err(ActionError::selection("a card cannot pay for itself"));
        }
        let built = player
            .hand
            .get(&card)
            .ok_or_else(|| ActionError::not_owned(card.to_string()))?;
        let spent = player
            .hand
            .get(&discard)
            .ok_or_else(|| ActionError::not_owned(discard.to_string()))?;
        if built.tool != spent.tool {
            return Err(ActionError::rule(format!(
                "{} needs a {}, {} has a {}",
                built.name, built.tool, spent.name, spent.tool
            )));
        }
        if player.has_built(&built.name) && !self.config.allows_multiple(&built.name) {
            return Err(ActionError::rule(format!("{} is already built", built.name)));
        }

        let metal = if built.name == MEGALITH {
            built.cost_metal.saturating_sub(player.monuments_in_compound())
        } else {
            built.cost_metal
        };
        let batch = EffectBatch::new()
            .with(Effect::SpendMetal(metal))
            .with(Effect::SpendEnergy(built.cost_energy))
            .with(Effect::discard(&[discard]));
        let view = EffectView::new(player, self.blueprints.available(), &self.config);
        check_affordable(&view, &batch)?;

        self.resolve_for(id, &batch)?;
        let player = self.player_mut(id)?;
        let built = player
            .hand
            .remove(&card)
            .ok_or_else(|| ActionError::not_owned(card.to_string()))?;

        // passives fire from cards already standing, never the new one
        if player.mark_card_name_activated(SCRAP_YARD) {
            player.metal += 1;
        }
        if player.mark_card_name_activated(SOLAR_ARRAY) {
            player.energy += 2;
        }
        log::debug!(
            "{} built {} for {} metal, {} energy",
            id,
            built.name,
            metal,
            built.cost_energy
        );
        player.add_to_compound(built);
        Ok(ActionOutcome::Built {
            card,
            prestige: player.prestige,
        })
    }

    /// Use a compound card's ability once this round.
    ///
    /// `replicate` names the marketplace blueprint a Replicator borrows.
    pub(super) fn activate(
        &mut self,
        id: &PlayerId,
        card: CardId,
        selections: &Selections,
        replicate: Option<CardId>,
    ) -> ActionResult<ActionOutcome> {
        let player = self.check_work_turn(id)?;
        let source = player
            .compound_card(card)
            .ok_or_else(|| ActionError::not_owned(card.to_string()))?;
        if !source.activatable {
            return Err(ActionError::rule(format!("{} has no ability to activate", source.name)));
        }
        if source.already_activated {
            return Err(ActionError::already(format!("activated {} this round", source.name)));
        }

        let target = match replicate {
            Some(target) if source.name != REPLICATOR => {
                return Err(ActionError::selection(format!(
                    "{} cannot replicate {}",
                    source.name, target
                )))
            }
            Some(target) => Some(
                self.marketplace
                    .blueprint(target)
                    .ok_or_else(|| ActionError::UnknownCard(target.to_string()))?,
            ),
            None => None,
        };

        let view = EffectView::new(player, self.blueprints.available(), &self.config);
        let batch = self.effects.plan(&source.name, &view, selections, target)?;
        log::debug!(
            "{} activates {}{}",
            id,
            source.name,
            target.map(|t| format!(" as {}", t.name)).unwrap_or_default()
        );

        let drawn = self.resolve_for(id, &batch)?;
        if let Some(source) = self.player_mut(id)?.compound_card_mut(card) {
            source.already_activated = true;
        }
        Ok(ActionOutcome::Activated { drawn })
    }

    /// End the work phase for one player, discarding down to the limits.
    pub(super) fn finish_work(
        &mut self,
        id: &PlayerId,
        discard: &[CardId],
        energy: u32,
        metal: u32,
    ) -> ActionResult<ActionOutcome> {
        let player = self.check_work_turn(id)?;
        check_hand_cards(player, discard, discard.len())?;
        ActionError::require(Shortfall::Energy, energy, player.energy)?;
        ActionError::require(Shortfall::Metal, metal, player.metal)?;

        let hand_left = player.hand.len() - discard.len();
        if hand_left > self.config.max_hand_at_end {
            return Err(ActionError::rule(format!(
                "hand of {} is over the limit of {}",
                hand_left, self.config.max_hand_at_end
            )));
        }
        let resources_left = player.total_resources() - energy - metal;
        if resources_left > self.config.max_resources_at_end {
            return Err(ActionError::rule(format!(
                "{} energy and metal is over the limit of {}",
                resources_left, self.config.max_resources_at_end
            )));
        }

        let batch = EffectBatch::new()
            .with(Effect::discard(discard))
            .with(Effect::SpendEnergy(energy))
            .with(Effect::SpendMetal(metal));
        self.resolve_for(id, &batch)?;
        self.player_mut(id)?.work_done.has_finished_work = true;
        log::debug!("{} finished work", id);

        if self.players.values().all(|p| p.work_done.has_finished_work) {
            return Ok(self.force_transition());
        }
        Ok(ActionOutcome::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BlueprintCard, CardRegistry};
    use crate::game::GameBuilder;

    fn card(id: u32, name: &str) -> BlueprintCard {
        let registry = CardRegistry::standard();
        BlueprintCard::new(CardId::new(id), registry.blueprint(name).unwrap())
    }

    /// One player, already in the work phase, with an empty hand.
    fn working_game() -> (GameState, PlayerId) {
        let mut game = GameBuilder::new().seed(5).player("a").build();
        game.change_phase().unwrap();
        (game, PlayerId::new("a"))
    }

    fn give(game: &mut GameState, id: &PlayerId, cards: &[BlueprintCard]) {
        let player = game.players.get_mut(id).unwrap();
        for c in cards {
            player.hand.insert(c.id, c.clone());
        }
    }

    #[test]
    fn test_roll_uses_every_die_once() {
        let (mut game, a) = working_game();
        match game.roll_dice(&a).unwrap() {
            ActionOutcome::Rolled { dice } => {
                assert_eq!(dice.len(), 4);
                assert!(dice.iter().all(|&d| (1..=6).contains(&d)));
            }
            other => panic!("expected roll, got {:?}", other),
        }
        assert_eq!(game.player(&a).unwrap().num_dice, 0);
        assert!(matches!(
            game.roll_dice(&a),
            Err(ActionError::InsufficientResources {
                resource: Shortfall::Dice,
                ..
            })
        ));
    }

    #[test]
    fn test_roll_outside_work_phase() {
        let mut game = GameBuilder::new().player("a").player("b").build();
        assert_eq!(
            game.roll_dice(&PlayerId::new("a")),
            Err(ActionError::wrong_phase(Phase::Work))
        );
    }

    #[test]
    fn test_choose_needs_engineer() {
        let (mut game, a) = working_game();
        assert!(matches!(
            game.choose_dice(&a, vec![6, 6, 6, 6]),
            Err(ActionError::RuleViolation(_))
        ));

        game.players.get_mut(&a).unwrap().selectable_dice = true;
        assert!(matches!(
            game.choose_dice(&a, vec![6, 6, 6]),
            Err(ActionError::InvalidSelection { .. })
        ));
        assert!(matches!(
            game.choose_dice(&a, vec![6, 6, 6, 7]),
            Err(ActionError::InvalidSelection { .. })
        ));
        game.choose_dice(&a, vec![6, 6, 5, 1]).unwrap();

        let player = game.player(&a).unwrap();
        assert_eq!(player.dice, vec![6, 6, 5, 1]);
        assert!(!player.selectable_dice);
        assert_eq!(player.num_dice, 0);
    }

    #[test]
    fn test_gain_die_once() {
        let (mut game, a) = working_game();
        game.players.get_mut(&a).unwrap().bonus_die = true;
        game.gain_dice_value(&a, 3).unwrap();
        assert_eq!(game.player(&a).unwrap().dice, vec![3]);
        assert!(game.gain_dice_value(&a, 3).is_err());
    }

    #[test]
    fn test_place_with_match_bonus() {
        let (mut game, a) = working_game();
        game.players.get_mut(&a).unwrap().dice = vec![2, 2, 2];

        assert!(matches!(
            game.place_die_in_headquarters(&a, 0, Floor::Mine),
            Err(ActionError::RuleViolation(_))
        ));
        game.place_die_in_headquarters(&a, 0, Floor::Generate).unwrap();
        assert_eq!(game.player(&a).unwrap().energy, 2);

        let outcome = game.place_die_in_headquarters(&a, 0, Floor::Generate).unwrap();
        assert!(matches!(outcome, ActionOutcome::Produced { output, .. } if output.energy == 3));

        let player = game.player(&a).unwrap();
        assert_eq!(player.energy, 5);
        assert_eq!(player.dice, vec![2]);
        assert_eq!(player.headquarters.floor(Floor::Generate), &[2, 2]);
    }

    #[test]
    fn test_place_research_draws() {
        let (mut game, a) = working_game();
        game.players.get_mut(&a).unwrap().dice = vec![5];
        let outcome = game.place_die_in_headquarters(&a, 0, Floor::Research).unwrap();
        match outcome {
            ActionOutcome::Produced { drawn, .. } => assert_eq!(drawn.len(), 1),
            other => panic!("expected production, got {:?}", other),
        }
        assert_eq!(game.player(&a).unwrap().hand.len(), 1);
    }

    #[test]
    fn test_place_bad_index() {
        let (mut game, a) = working_game();
        assert!(matches!(
            game.place_die_in_headquarters(&a, 0, Floor::Research),
            Err(ActionError::NotOwned { .. })
        ));
    }

    #[test]
    fn test_build_without_metal_changes_nothing() {
        let (mut game, a) = working_game();
        give(&mut game, &a, &[card(900, "Foundry"), card(901, "Biolab")]);
        game.players.get_mut(&a).unwrap().energy = 5;
        let before = game.player(&a).unwrap().clone();

        assert!(matches!(
            game.build_card(&a, CardId::new(900), CardId::new(901)),
            Err(ActionError::InsufficientResources {
                resource: Shortfall::Metal,
                ..
            })
        ));
        assert_eq!(game.player(&a).unwrap(), &before);
    }

    #[test]
    fn test_build_megalith_discount_and_scrap_yard() {
        let (mut game, a) = working_game();
        {
            let player = game.players.get_mut(&a).unwrap();
            player.compound = vec![
                card(800, "Obelisk"),
                card(801, "Obelisk"),
                card(802, "Scrap Yard"),
            ];
            player.metal = 2;
            player.energy = 2;
        }
        give(&mut game, &a, &[card(900, MEGALITH), card(901, "Fitness Center")]);

        let outcome = game.build_card(&a, CardId::new(900), CardId::new(901)).unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Built {
                card: CardId::new(900),
                prestige: 7
            }
        );

        let player = game.player(&a).unwrap();
        assert_eq!(player.metal, 1);
        assert_eq!(player.energy, 0);
        assert!(player.hand.is_empty());
        assert_eq!(player.compound.len(), 4);
        assert!(player.compound[2].already_activated);
        assert!(game
            .blueprint_deck()
            .discard_pile()
            .iter()
            .any(|c| c.id == CardId::new(901)));
    }

    #[test]
    fn test_build_rejects_duplicates_and_tool_mismatch() {
        let (mut game, a) = working_game();
        {
            let player = game.players.get_mut(&a).unwrap();
            player.compound = vec![card(800, "Biolab")];
            player.metal = 10;
            player.energy = 10;
        }
        give(
            &mut game,
            &a,
            &[card(900, "Biolab"), card(901, "Dojo"), card(902, "Robot")],
        );

        assert!(matches!(
            game.build_card(&a, CardId::new(900), CardId::new(901)),
            Err(ActionError::RuleViolation(_))
        ));
        assert!(matches!(
            game.build_card(&a, CardId::new(901), CardId::new(902)),
            Err(ActionError::RuleViolation(_))
        ));
        assert!(matches!(
            game.build_card(&a, CardId::new(901), CardId::new(901)),
            Err(ActionError::InvalidSelection { .. })
        ));
        game.build_card(&a, CardId::new(901), CardId::new(900)).unwrap();
        assert_eq!(game.player(&a).unwrap().compound.len(), 2);
    }

    #[test]
    fn test_build_allows_multiple_obelisks() {
        let (mut game, a) = working_game();
        {
            let player = game.players.get_mut(&a).unwrap();
            player.compound = vec![card(800, "Obelisk")];
            player.metal = 2;
            player.energy = 1;
        }
        give(&mut game, &a, &[card(900, "Obelisk"), card(901, "Robot")]);
        game.build_card(&a, CardId::new(900), CardId::new(901)).unwrap();
        assert_eq!(game.player(&a).unwrap().prestige, 4);
    }

    #[test]
    fn test_activate_once_per_round() {
        let (mut game, a) = working_game();
        {
            let player = game.players.get_mut(&a).unwrap();
            player.compound = vec![card(800, "Power Plant"), card(801, "Beacon")];
            player.dice = vec![5, 1];
        }
        let selections = Selections::new().with_dice(&[0]);

        game.activate_card(&a, CardId::new(800), selections.clone(), None).unwrap();
        let player = game.player(&a).unwrap();
        assert_eq!(player.energy, 5);
        assert_eq!(player.dice, vec![1]);
        assert!(player.compound[0].already_activated);

        assert!(matches!(
            game.activate_card(&a, CardId::new(800), selections, None),
            Err(ActionError::AlreadyActed { .. })
        ));
        assert!(matches!(
            game.activate_card(&a, CardId::new(801), Selections::new(), None),
            Err(ActionError::RuleViolation(_))
        ));
        assert!(matches!(
            game.activate_card(&a, CardId::new(999), Selections::new(), None),
            Err(ActionError::NotOwned { .. })
        ));
    }

    #[test]
    fn test_activate_failure_keeps_card_ready() {
        let (mut game, a) = working_game();
        {
            let player = game.players.get_mut(&a).unwrap();
            player.compound = vec![card(800, "Biolab")];
            player.dice = vec![3, 4];
        }
        let before = game.player(&a).unwrap().clone();
        assert!(game
            .activate_card(&a, CardId::new(800), Selections::new().with_dice(&[0, 1]), None)
            .is_err());
        assert_eq!(game.player(&a).unwrap(), &before);
    }

    #[test]
    fn test_replicate_marketplace_card() {
        let (mut game, a) = working_game();
        let target = game
            .marketplace()
            .blueprints
            .iter()
            .find(|c| c.activatable && c.name != REPLICATOR)
            .map(|c| c.id);
        {
            let player = game.players.get_mut(&a).unwrap();
            player.compound = vec![card(800, REPLICATOR), card(801, "Power Plant")];
            player.energy = 1;
        }

        assert!(matches!(
            game.activate_card(&a, CardId::new(801), Selections::new(), Some(CardId::new(0))),
            Err(ActionError::InvalidSelection { .. })
        ));
        assert!(matches!(
            game.activate_card(&a, CardId::new(800), Selections::new(), Some(CardId::new(9999))),
            Err(ActionError::UnknownCard(_))
        ));
        if let Some(target) = target {
            // one energy cannot cover the replicator's two
            let outcome = game.activate_card(&a, CardId::new(800), Selections::new(), Some(target));
            assert!(outcome.is_err());
            assert!(!game.player(&a).unwrap().compound[0].already_activated);
        }
    }

    #[test]
    fn test_end_turn_enforces_limits() {
        let (mut game, a) = working_game();
        let cards: Vec<BlueprintCard> = (0..11).map(|i| card(900 + i, "Obelisk")).collect();
        give(&mut game, &a, &cards);
        game.players.get_mut(&a).unwrap().energy = 13;

        assert!(matches!(
            game.end_turn(&a, vec![], 1, 0),
            Err(ActionError::RuleViolation(_))
        ));
        assert!(matches!(
            game.end_turn(&a, vec![CardId::new(900)], 0, 0),
            Err(ActionError::RuleViolation(_))
        ));
        assert!(matches!(
            game.end_turn(&a, vec![CardId::new(900)], 0, 1),
            Err(ActionError::InsufficientResources {
                resource: Shortfall::Metal,
                ..
            })
        ));

        let outcome = game.end_turn(&a, vec![CardId::new(900)], 1, 0).unwrap();
        assert_eq!(outcome, ActionOutcome::PhaseChanged { phase: Phase::Market });
        let player = game.player(&a).unwrap();
        assert_eq!(player.hand.len(), 10);
        assert_eq!(player.energy, 12);
        assert_eq!(game.round(), 2);
    }

    #[test]
    fn test_finished_player_waits() {
        let mut game = GameBuilder::new().player("a").player("b").build();
        game.change_phase().unwrap();
        let a = PlayerId::new("a");

        assert_eq!(game.end_turn(&a, vec![], 0, 0).unwrap(), ActionOutcome::Accepted);
        assert_eq!(game.phase(), Phase::Work);
        assert!(matches!(game.roll_dice(&a), Err(ActionError::AlreadyActed { .. })));
    }
}
