use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use blueprint_engine::{
    ActionOutcome, CardId, Floor, GameBuilder, GameState, Phase, PlayerId, RewardChoice, Selections,
    Tool,
};

/// Play seeded matches between random bots.
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(about = "Simulate blueprint matches with random bots")]
struct Args {
    /// Seed for the first match; later matches use seed + n
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of seated bots
    #[arg(short, long, default_value_t = 3)]
    players: usize,

    /// Number of matches to play
    #[arg(short = 'n', long, default_value_t = 1)]
    games: u64,

    /// Give up on a match after this many rounds
    #[arg(long, default_value_t = 60)]
    max_rounds: u32,

    /// Print every round's public state as JSON
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("Blueprint simulation");
    println!("  - Players: {}", args.players);
    println!("  - Matches: {}", args.games);

    let mut wins = vec![0u32; args.players];
    let mut rounds = 0u64;
    let mut finished = 0u64;

    for n in 0..args.games {
        let seed = args.seed.wrapping_add(n);
        match play_match(seed, &args) {
            Some((winner, played)) => {
                wins[winner] += 1;
                rounds += u64::from(played);
                finished += 1;
                println!(
                    "match {} (seed {}): bot{} wins after {} rounds",
                    n + 1,
                    seed,
                    winner,
                    played
                );
            }
            None => println!(
                "match {} (seed {}): no result within {} rounds",
                n + 1,
                seed,
                args.max_rounds
            ),
        }
    }

    println!("\nResults:");
    for (seat, count) in wins.iter().enumerate() {
        println!("  bot{}: {} wins", seat, count);
    }
    if finished > 0 {
        println!("Average rounds: {:.1}", rounds as f64 / finished as f64);
    }
}

/// Play one match; returns the winner's seat and the rounds played.
fn play_match(seed: u64, args: &Args) -> Option<(usize, u32)> {
    let ids: Vec<PlayerId> = (0..args.players)
        .map(|i| PlayerId::new(format!("bot{}", i)))
        .collect();
    let mut builder = GameBuilder::new().seed(seed);
    for id in &ids {
        builder = builder.player(id.clone());
    }
    let mut game = builder.build();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    while !game.is_over() && game.round() <= args.max_rounds {
        match game.phase() {
            Phase::Market => market_turn(&mut game, &ids, &mut rng),
            Phase::Work => {
                for id in &ids {
                    work_turn(&mut game, id, &mut rng);
                }
                // a bot that could not end its turn would stall the match
                if game.phase() == Phase::Work && !game.is_over() {
                    let _ = game.change_phase();
                }
                if args.verbose {
                    if let Ok(json) = serde_json::to_string(&game.public_state()) {
                        println!("{}", json);
                    }
                }
            }
        }
    }

    let standings = game.standings()?;
    let winner = &standings.first()?.player;
    let seat = ids.iter().position(|id| id == winner)?;
    Some((seat, game.round()))
}

fn market_turn(game: &mut GameState, ids: &[PlayerId], rng: &mut ChaCha8Rng) {
    let Some(id) = game.current_player().cloned() else {
        let _ = game.change_phase();
        return;
    };

    if let Some((tool, discard)) = hireable(game, &id) {
        if rng.gen_bool(0.4) {
            let target = ids.iter().find(|other| **other != id).cloned();
            if game.hire_contractor(&id, tool, discard, target).is_ok() {
                return;
            }
        }
    }

    let offered: Vec<CardId> = game.marketplace().blueprints.iter().map(|c| c.id).collect();
    match offered.choose(rng) {
        Some(&card) if game.pickup_from_marketplace(&id, card).is_ok() => {}
        _ => {
            let _ = game.change_phase();
        }
    }
}

/// A contractor slot the player can pay for with a matching hand card.
fn hireable(game: &GameState, id: &PlayerId) -> Option<(Tool, CardId)> {
    let player = game.player(id)?;
    Tool::ALL.into_iter().find_map(|tool| {
        let contractor = game.marketplace().contractor(tool)?;
        if contractor.cost_energy > player.energy {
            return None;
        }
        player.hand.values().find(|c| c.tool == tool).map(|c| (tool, c.id))
    })
}

fn work_turn(game: &mut GameState, id: &PlayerId, rng: &mut ChaCha8Rng) {
    let Some(player) = game.player(id) else { return };
    if player.selectable_dice {
        let values = (0..player.num_dice).map(|_| rng.gen_range(1..=6)).collect();
        let _ = game.choose_dice(id, values);
    }
    let _ = game.roll_dice(id);
    let _ = game.gain_dice_value(id, rng.gen_range(1..=6));

    place_dice(game, id, rng);
    build_everything(game, id);
    activate_everything(game, id);
    end_turn(game, id);
}

fn place_dice(game: &mut GameState, id: &PlayerId, rng: &mut ChaCha8Rng) {
    loop {
        let Some(player) = game.player(id) else { return };
        let dice = player.dice.len();
        if dice == 0 || rng.gen_bool(0.3) {
            return;
        }
        let die = rng.gen_range(0..dice);
        let mut floors = Floor::ALL;
        floors.shuffle(rng);
        let placed = floors
            .into_iter()
            .any(|floor| game.place_die_in_headquarters(id, die, floor).is_ok());
        if !placed {
            return;
        }
    }
}

fn build_everything(game: &mut GameState, id: &PlayerId) {
    loop {
        let Some(player) = game.player(id) else { return };
        let hand: Vec<(CardId, Tool)> = player.hand.values().map(|c| (c.id, c.tool)).collect();
        let built = hand.iter().any(|&(card, tool)| {
            hand.iter()
                .filter(|&&(other, t)| other != card && t == tool)
                .any(|&(other, _)| game.build_card(id, card, other).is_ok())
        });
        if !built {
            return;
        }
    }
}

fn activate_everything(game: &mut GameState, id: &PlayerId) {
    let Some(player) = game.player(id) else { return };
    let ready: Vec<CardId> = player
        .compound
        .iter()
        .filter(|c| c.activatable && !c.already_activated)
        .map(|c| c.id)
        .collect();

    for card in ready {
        for selections in candidate_selections(game, id) {
            let outcome = game.activate_card(id, card, selections, None);
            if let Ok(ActionOutcome::Activated { .. }) = outcome {
                break;
            }
        }
    }
}

/// Dice runs and hand prefixes worth trying for any activation.
fn candidate_selections(game: &GameState, id: &PlayerId) -> Vec<Selections> {
    let Some(player) = game.player(id) else { return Vec::new() };
    let dice = player.dice.len();
    let hand: Vec<CardId> = player.hand.keys().copied().collect();
    let mut out = Vec::new();

    for len in 1..=dice.min(4) {
        for start in 0..=dice - len {
            let indices: Vec<usize> = (start..start + len).collect();
            out.push(Selections::new().with_dice(&indices));
        }
    }
    for len in 1..=hand.len().min(3) {
        let cards = &hand[..len];
        out.push(Selections::new().with_cards(cards).with_reward(RewardChoice::Energy));
        out.push(Selections::new().with_cards(cards).with_energy(0));
    }
    out
}

fn end_turn(game: &mut GameState, id: &PlayerId) {
    let Some(player) = game.player(id) else { return };
    let config = game.config();

    let extra_cards = player.hand.len().saturating_sub(config.max_hand_at_end);
    let discard: Vec<CardId> = player.hand.keys().copied().take(extra_cards).collect();

    let mut excess = player.total_resources().saturating_sub(config.max_resources_at_end);
    let energy = excess.min(player.energy);
    excess -= energy;
    let metal = excess.min(player.metal);

    let _ = game.end_turn(id, discard, energy, metal);
}
