use rand::Rng;

use courtside_core::intent::{AimHint, Depth, Lateral, PlayerIntent, ShotStyle};
use courtside_core::player::Side;
use courtside_tennis::TennisRally;
use courtside_tennis::physics::ServeStage;

/// Lateral ball offset the bot tolerates before walking.
const REACH_X: f32 = 30.0;

/// Lateral offset beyond which the bot sprints.
const SPRINT_X: f32 = 60.0;

/// Swing when the ball is this many ticks of travel away along y.
const SWING_LEAD_TICKS: f32 = 4.0;

/// Chance a swing carries an explicit aim hint instead of a random zone.
const AIM_CHANCE: f64 = 0.5;

/// Generate an intent for `side` from the current rally state.
///
/// The bot lines its racket up with incoming balls, tosses as soon as it
/// holds a ready serve, and swings when the ball is about to reach it.
pub fn generate_bot_intent<R: Rng + ?Sized>(
    game: &TennisRally,
    side: Side,
    rng: &mut R,
) -> PlayerIntent {
    let ball = game.ball();
    if game.between_points() || !ball.is_live() {
        return PlayerIntent::default();
    }
    let cfg = &game.config().player;
    let racket_top = cfg.racket_lift + cfg.racket_height + ball.radius;
    let serving = side == game.server();

    match ball.serve_stage {
        ServeStage::Ready if serving => PlayerIntent::swing(),
        ServeStage::Falling if serving && ball.z <= racket_top => swing_with_aim(rng),
        ServeStage::Served => track_ball(game, side, racket_top, rng),
        _ => PlayerIntent::default(),
    }
}

fn track_ball<R: Rng + ?Sized>(
    game: &TennisRally,
    side: Side,
    racket_top: f32,
    rng: &mut R,
) -> PlayerIntent {
    let ball = game.ball();
    let me = game.player(side);
    let cfg = &game.config().player;
    let dy = ball.y - me.y;
    let approaching = dy * ball.vy < 0.0;
    if ball.last_hitter == Some(side) || !approaching {
        return PlayerIntent::default();
    }

    let off = ball.x - me.x;
    let mut intent = PlayerIntent::default();
    if off.abs() > REACH_X {
        intent.move_x = off.signum();
        intent.sprint = off.abs() > SPRINT_X;
    } else if off != 0.0 && off.signum() != me.facing.sign() {
        // Turn the racket side toward the ball.
        intent.move_x = off.signum();
        intent.slow = true;
    }

    let reach = cfg.racket_offset + cfg.racket_width / 2.0;
    let close = dy.abs() <= ball.vy.abs() * SWING_LEAD_TICKS + ball.radius;
    if close && off.abs() <= reach && ball.z <= racket_top {
        let swing = swing_with_aim(rng);
        intent.swing = true;
        intent.style = swing.style;
        intent.aim = swing.aim;
    }
    intent
}

fn swing_with_aim<R: Rng + ?Sized>(rng: &mut R) -> PlayerIntent {
    let style = match rng.random_range(0..3) {
        0 => ShotStyle::Flat,
        1 => ShotStyle::Topspin,
        _ => ShotStyle::Slice,
    };
    let mut intent = PlayerIntent::swing().with_style(style);
    if rng.random_bool(AIM_CHANCE) {
        let lateral = match rng.random_range(0..3) {
            0 => Lateral::Left,
            1 => Lateral::Center,
            _ => Lateral::Right,
        };
        let depth = match rng.random_range(0..3) {
            0 => Depth::Deep,
            1 => Depth::Neutral,
            _ => Depth::Short,
        };
        intent.aim = Some(AimHint { lateral, depth });
    }
    intent
}
