use rand::Rng;
use serde::{Deserialize, Serialize};

use courtside_core::events::{PointReason, RallyEvent};
use courtside_core::intent::{AimHint, Depth, Lateral, PlayerIntent, ShotStyle};
use courtside_core::player::Side;

use crate::config::{PlayerConfig, ShotConfig};
use crate::court::{CourtGeometry, Vec3, sample_range};
use crate::physics::BallState;

/// Which way a player's racket side points along x.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box centred on `(cx, cy)` on the ground plane, spanning `z0..z0+h`.
    pub fn centered(cx: f32, cy: f32, w: f32, d: f32, z0: f32, h: f32) -> Self {
        Self {
            min: Vec3::new(cx - w / 2.0, cy - d / 2.0, z0),
            max: Vec3::new(cx + w / 2.0, cy + d / 2.0, z0 + h),
        }
    }

    /// Whether a sphere at `c` with radius `r` touches the box.
    pub fn overlaps_sphere(&self, c: Vec3, r: f32) -> bool {
        let dx = c.x - c.x.clamp(self.min.x, self.max.x);
        let dy = c.y - c.y.clamp(self.min.y, self.max.y);
        let dz = c.z - c.z.clamp(self.min.z, self.max.z);
        dx * dx + dy * dy + dz * dz <= r * r
    }
}

/// Result of testing the ball against one player's boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    Racket,
    Body,
}

/// A player's body and racket boxes for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitGeometry {
    pub side: Side,
    pub body: Aabb,
    pub racket: Aabb,
    racket_live: bool,
}

impl HitGeometry {
    /// Boxes for a player anchored at `(x, y)` on the ground.
    pub fn from_anchor(
        side: Side,
        x: f32,
        y: f32,
        facing: Facing,
        cfg: &PlayerConfig,
        racket_live: bool,
    ) -> Self {
        let body = Aabb::centered(x, y, cfg.body_width, cfg.body_depth, 0.0, cfg.body_height);
        let racket = Aabb::centered(
            x + facing.sign() * cfg.racket_offset,
            y,
            cfg.racket_width,
            cfg.racket_depth,
            cfg.racket_lift,
            cfg.racket_height,
        );
        Self {
            side,
            body,
            racket,
            racket_live,
        }
    }

    /// Whether the racket is inside its swing window.
    pub fn racket_live(&self) -> bool {
        self.racket_live
    }

    /// Racket first; the body is only tested when the racket misses.
    pub fn resolve_contact(&self, ball: &BallState) -> Contact {
        let pos = ball.position();
        if self.racket_live && self.racket.overlaps_sphere(pos, ball.radius) {
            return Contact::Racket;
        }
        if self.body.overlaps_sphere(pos, ball.radius) {
            return Contact::Body;
        }
        Contact::None
    }
}

/// Zone name for a directional aim hint.
pub fn aim_zone(hint: AimHint) -> &'static str {
    match (hint.depth, hint.lateral) {
        (Depth::Deep, Lateral::Left) => "deep_back_left",
        (Depth::Deep, Lateral::Center) => "center_back",
        (Depth::Deep, Lateral::Right) => "deep_back_right",
        (Depth::Neutral, Lateral::Left) => "back_left",
        (Depth::Neutral, Lateral::Center) => "center_back",
        (Depth::Neutral, Lateral::Right) => "back_right",
        (Depth::Short, Lateral::Left) => "front_left",
        (Depth::Short, Lateral::Center) => "center_front",
        (Depth::Short, Lateral::Right) => "front_right",
    }
}

/// The hinted zone, or a random one when there is no hint.
pub fn pick_zone<R: Rng + ?Sized>(
    hint: Option<AimHint>,
    court: &CourtGeometry,
    rng: &mut R,
) -> &'static str {
    if let Some(hint) = hint {
        return aim_zone(hint);
    }
    let names: Vec<&'static str> = court.zone_names().collect();
    if names.is_empty() {
        return "center_back";
    }
    names[rng.random_range(0..names.len())]
}

/// Random point inside zone `name` on `target_half`. Unknown names aim at
/// the centre of that half.
pub fn target_in_zone<R: Rng + ?Sized>(
    court: &CourtGeometry,
    target_half: Side,
    name: &str,
    cfg: &ShotConfig,
    rng: &mut R,
) -> (f32, f32) {
    match court.zone(target_half, name) {
        Some(zone) => court.sample_in_zone(&zone, rng, cfg.zone_sample_min, cfg.zone_sample_max),
        None => {
            tracing::warn!(zone = name, "Unknown aim zone, aiming at centre");
            court.center_of_half(target_half)
        },
    }
}

/// Horizontal speed for a shot, with weak shots boosted.
fn shot_speed<R: Rng + ?Sized>(cfg: &ShotConfig, rng: &mut R) -> f32 {
    let speed = sample_range(rng, cfg.speed_min, cfg.speed_max);
    if speed < cfg.boost_below {
        speed * cfg.low_speed_boost
    } else {
        speed
    }
}

fn style_spin(style: ShotStyle, cfg: &ShotConfig) -> f32 {
    match style {
        ShotStyle::Flat => 0.0,
        ShotStyle::Topspin => cfg.topspin,
        ShotStyle::Slice => cfg.slice,
    }
}

/// Aim and spin a player committed to when they started a swing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwingIntent {
    pub style: ShotStyle,
    pub aim: Option<AimHint>,
}

impl From<&PlayerIntent> for SwingIntent {
    fn from(intent: &PlayerIntent) -> Self {
        Self {
            style: intent.style,
            aim: intent.aim,
        }
    }
}

/// Send the ball back at the opponent's half after a racket contact.
///
/// Returns `true` if the contact struck a tossed serve.
pub fn resolve_racket_hit<R: Rng + ?Sized>(
    ball: &mut BallState,
    side: Side,
    swing: SwingIntent,
    court: &CourtGeometry,
    cfg: &ShotConfig,
    rng: &mut R,
    events: &mut Vec<RallyEvent>,
) -> bool {
    let zone = pick_zone(swing.aim, court, rng);
    let target = target_in_zone(court, side.opponent(), zone, cfg, rng);
    let speed = shot_speed(cfg, rng);
    let lift = sample_range(rng, cfg.lift_min, cfg.lift_max);

    let served = ball.strike_toward(side, target, speed, lift);
    ball.apply_shot_spin(style_spin(swing.style, cfg));
    tracing::debug!(%side, zone, served, speed, "Racket hit");
    events.push(RallyEvent::RacketHit { side });
    served
}

/// Dead deflection off `struck`'s body; the opponent takes the point.
pub fn resolve_body_hit(
    ball: &mut BallState,
    struck: Side,
    cfg: &ShotConfig,
    events: &mut Vec<RallyEvent>,
) {
    ball.deflect_off_body(cfg.body_deflection);
    events.push(RallyEvent::BodyHit { side: struck });
    ball.decide_point(struck.opponent(), PointReason::BodyHit, events);
}

/// Put a fresh ball in play from `feeder`'s half without a serve.
pub fn launch_rally<R: Rng + ?Sized>(
    ball: &mut BallState,
    feeder: Side,
    court: &CourtGeometry,
    cfg: &ShotConfig,
    rng: &mut R,
) {
    let (x, y) = court.center_of_half(feeder);
    ball.park(x, y);
    ball.z = ball.radius;
    let zone = pick_zone(None, court, rng);
    let target = target_in_zone(court, feeder.opponent(), zone, cfg, rng);
    let speed = shot_speed(cfg, rng);
    let lift = sample_range(rng, cfg.lift_min, cfg.lift_max);
    ball.launch_toward(target, speed, lift);
    tracing::debug!(%feeder, zone, "Rally launched");
}
