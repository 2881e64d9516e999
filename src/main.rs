//! Demo driver: plays two random-policy actors against each other
//! through the engine's public pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use tussle_rs::core::CardId;
use tussle_rs::game::{enumerate_legal_actions, execute, Candidate, GameState, VerbosityLevel};
use tussle_rs::loader::{sets, GameInitializer};

#[derive(Parser, Debug)]
#[command(name = "tussle")]
#[command(about = "Run a demo game between two random actors")]
struct Args {
    /// RNG seed for deck shuffling and actor decisions
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop after this many turns if nobody has won
    #[arg(long, default_value_t = 60)]
    max_turns: u32,

    /// Print detail log entries as well as events
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let set = sets::starter_set().context("starter set failed to load")?;
    let init = GameInitializer::new(&set);
    let mut game = init
        .init_game(
            "Alice".to_string(),
            sets::DEMO_DECK,
            "Bob".to_string(),
            sets::DEMO_DECK,
            Some(args.seed),
        )
        .context("game setup failed")?;

    let mut rng = ChaCha12Rng::seed_from_u64(args.seed.wrapping_add(1));
    while !game.is_finished() && game.turn.turn_number <= args.max_turns {
        let actor = game.turn.active_player;
        let candidates = enumerate_legal_actions(&game, actor)?;
        let candidate = candidates
            .choose(&mut rng)
            .cloned()
            .unwrap_or(Candidate::EndTurn);
        let targets = pick_targets(&candidate, &mut rng);
        execute(&mut game, &candidate, &targets)
            .with_context(|| format!("executing {candidate:?}"))?;
    }

    report(&game, args.verbose);
    Ok(())
}

/// Random choice within the candidate's own target spec.
fn pick_targets(candidate: &Candidate, rng: &mut ChaCha12Rng) -> Vec<CardId> {
    let spec = match candidate {
        Candidate::PlayCard { targeting, .. } | Candidate::Activate { targeting, .. } => {
            match targeting {
                Some(spec) => spec,
                None => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };
    let count = rng.gen_range(spec.min..=spec.max.min(spec.legal.len()));
    spec.legal.choose_multiple(rng, count).copied().collect()
}

fn report(game: &GameState, verbose: bool) {
    let level = if verbose {
        VerbosityLevel::Verbose
    } else {
        VerbosityLevel::Normal
    };
    for message in game.log.messages_at(level) {
        println!("{message}");
    }
    match game.winner {
        Some(winner) => {
            let name = game
                .players
                .iter()
                .find(|p| p.id == winner)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            println!("Winner: {name} ({winner})");
        }
        None => println!("No winner after {} turns", game.turn.turn_number - 1),
    }
}
