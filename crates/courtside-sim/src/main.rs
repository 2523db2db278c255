mod bot;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use courtside_core::events::RallyEvent;
use courtside_core::game_trait::{RallyGame, TickInputs};
use courtside_core::player::Side;
use courtside_tennis::TennisRally;
use courtside_tennis::config::TennisConfig;

/// Hard stop so a stuck rally cannot spin forever.
const MAX_TICKS: u64 = 60 * 60 * 30;

struct Args {
    seed: u64,
    points: u32,
    json: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        seed: 0,
        points: 12,
        json: false,
    };
    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--seed=") {
            args.seed = v.parse().unwrap_or(args.seed);
        } else if let Some(v) = arg.strip_prefix("--points=") {
            args.points = v.parse().unwrap_or(args.points);
        } else if arg == "--json" {
            args.json = true;
        } else {
            tracing::warn!("Ignoring unknown argument {arg}");
        }
    }
    args
}

fn log_event(event: &RallyEvent, tick: u64) {
    match event {
        RallyEvent::PointScored { winner, reason } => {
            tracing::info!(tick, %winner, ?reason, "Point scored");
        },
        RallyEvent::GameWon { winner } => tracing::info!(tick, %winner, "Game won"),
        RallyEvent::MatchWon { winner } => tracing::info!(tick, %winner, "Match won"),
        other => tracing::debug!(tick, event = ?other, "Rally event"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args();
    let mut game = TennisRally::with_seed(TennisConfig::load(), args.seed);
    let mut bot_rng = StdRng::seed_from_u64(args.seed.wrapping_add(1));

    tracing::info!(
        "Courtside sim: seed {}, up to {} points at {} Hz",
        args.seed,
        args.points,
        game.tick_rate()
    );

    let mut points = 0;
    let mut tick = 0;
    while points < args.points && !game.is_match_complete() && tick < MAX_TICKS {
        let inputs = TickInputs {
            p1: bot::generate_bot_intent(&game, Side::P1, &mut bot_rng),
            p2: bot::generate_bot_intent(&game, Side::P2, &mut bot_rng),
        };
        tick += 1;
        for event in game.update(&inputs) {
            if event.point_winner().is_some() {
                points += 1;
            }
            log_event(&event, tick);
        }
    }

    let snapshot = game.snapshot();
    tracing::info!(
        points,
        ticks = tick,
        score = %snapshot.score,
        p1_games = snapshot.games[0],
        p2_games = snapshot.games[1],
        "Session finished"
    );

    if args.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("Failed to encode snapshot: {e}"),
        }
    }
}
