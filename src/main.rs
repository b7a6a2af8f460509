//! Bingo Extras CLI - development entry point
//!
//! Generates a board, replays a short session against it and prints the
//! resulting descriptions, flat strings and randomizer presets.

use bingo_extras::challenge::{ChallengeKind, ChallengeRandomizer};
use bingo_extras::config::Settings;
use bingo_extras::game::{EntityId, GameEvent, TickSignal};
use bingo_extras::BingoExtras;

fn main() {
    println!("Bingo Extras - extra bingo challenge types");
    println!("==========================================");
    println!();

    let settings = Settings::default();
    let mut bingo = BingoExtras::new(settings);
    let mut rng = rand::thread_rng();
    bingo.new_board(&mut rng);

    println!("Generated board ({} challenges):", bingo.board.len());
    for (index, challenge) in bingo.board.challenges().iter().enumerate() {
        println!("  {index:>2}. {}", challenge.description());
    }
    println!();

    let events = [
        GameEvent::WorldLoaded {
            world_name: "SU".to_string(),
            world_present: true,
        },
        GameEvent::PoleMimicClimbed {
            mimic: EntityId::new(12, 3),
            region: "SU".to_string(),
            by_player: true,
        },
        GameEvent::LizardSpeared {
            stuck: true,
            chunk_index: 0,
            hit_in_mouth: true,
            region: "HI".to_string(),
        },
        GameEvent::WorldLoaded {
            world_name: "HI".to_string(),
            world_present: true,
        },
    ];

    println!("Replaying session:");
    for event in &events {
        for (index, delta) in bingo.handle_event(event) {
            println!("  {:?} -> #{index} {delta:?}", event.kind());
        }
    }
    for (index, delta) in bingo.tick(TickSignal::cycle_closing()) {
        println!("  cycle end -> #{index} {delta:?}");
    }
    println!();

    println!("Board state:");
    for challenge in bingo.board.challenges() {
        println!("  {}", challenge.phrase().to_string().replace('\n', " / "));
        println!("    {}", challenge.to_flat());
    }
    println!();

    println!("Randomizer presets:");
    for kind in ChallengeKind::ALL {
        let preset = ChallengeRandomizer::preset(kind, &bingo.settings);
        println!("{}", preset.serialize("  "));
    }

    match bingo.save() {
        Ok(json) => println!("Snapshot: {} bytes", json.len()),
        Err(e) => eprintln!("Failed to save board: {e}"),
    }
}
