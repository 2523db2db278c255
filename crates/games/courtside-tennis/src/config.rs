use std::fmt;

use serde::{Deserialize, Serialize};

/// Court dimensions in world units. The court spans `[0, width] x [0, height]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtConfig {
    pub width: f32,
    pub height: f32,
    /// Net line. P1 owns `y > net_y`, P2 owns `y < net_y`.
    pub net_y: f32,
    /// Inward tolerance for in/out calls, so the painted line counts as out.
    pub line_margin: f32,
    /// How far outside the court players may run.
    pub runoff: f32,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 400.0,
            net_y: 200.0,
            line_margin: 2.0,
            runoff: 60.0,
        }
    }
}

/// Net geometry and contact response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Physical height used for the "ball passed over" test.
    pub height: f32,
    /// Height of the tape band at the top of the net.
    pub tape_height: f32,
    /// Slab thickness along y.
    pub thickness: f32,
    /// Minimum time between two net contacts.
    pub cooldown_ms: f32,
    /// Velocity multiplier on a tape graze (0..1, never negative).
    pub tape_friction: f32,
    /// Positional nudge along the direction of travel after a tape graze.
    pub tape_nudge: f32,
    /// Vertical velocity multiplier on a body strike.
    pub body_vertical_damping: f32,
    /// Gap left between ball and net after a body strike push-out.
    pub body_clearance: f32,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            height: 12.0,
            tape_height: 3.0,
            thickness: 2.0,
            cooldown_ms: 100.0,
            tape_friction: 0.6,
            tape_nudge: 2.0,
            body_vertical_damping: 0.2,
            body_clearance: 5.0,
        }
    }
}

/// Ball flight constants. Velocities are world units per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub toss_gravity: f32,
    pub flight_gravity: f32,
    pub restitution: f32,
    /// Vertical speed below which a bounce is flattened to zero.
    pub rest_threshold: f32,
    pub spin_gravity_scale: f32,
    pub spin_drift_scale: f32,
    pub spin_decay: f32,
    pub spin_epsilon: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub toss_impulse: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 7.0,
            toss_gravity: 0.6,
            flight_gravity: 0.5,
            restitution: 0.7,
            rest_threshold: 0.8,
            spin_gravity_scale: 0.12,
            spin_drift_scale: 0.06,
            spin_decay: 0.96,
            spin_epsilon: 1e-3,
            min_speed: 0.25,
            max_speed: 16.0,
            toss_impulse: 10.0,
        }
    }
}

/// Shot targeting ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    pub speed_min: f32,
    pub speed_max: f32,
    /// Speeds below this get multiplied by `low_speed_boost`.
    pub boost_below: f32,
    pub low_speed_boost: f32,
    pub lift_min: f32,
    pub lift_max: f32,
    /// Fractional offsets inside a zone, keeping aim off the zone edges.
    pub zone_sample_min: f32,
    pub zone_sample_max: f32,
    pub topspin: f32,
    pub slice: f32,
    /// Velocity multiplier when the ball strikes a body.
    pub body_deflection: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            speed_min: 8.0,
            speed_max: 11.0,
            boost_below: 9.0,
            low_speed_boost: 1.15,
            lift_min: 6.0,
            lift_max: 8.0,
            zone_sample_min: 0.2,
            zone_sample_max: 0.8,
            topspin: 0.9,
            slice: -0.7,
            body_deflection: -0.25,
        }
    }
}

/// Player movement and hit boxes.
///
/// Box sizes are roughly 55%/80% of a 48x64 sprite footprint for the body
/// and a narrow strip beside it for the racket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub sprint_factor: f32,
    pub slow_factor: f32,
    pub body_width: f32,
    pub body_depth: f32,
    pub body_height: f32,
    pub racket_width: f32,
    pub racket_depth: f32,
    pub racket_height: f32,
    /// Lateral offset of the racket centre toward the facing direction.
    pub racket_offset: f32,
    /// Height of the racket box floor above the ground.
    pub racket_lift: f32,
    pub swing_window_ms: f32,
    /// Distance of the starting position from the baseline.
    pub baseline_inset: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 8.0,
            sprint_factor: 1.5,
            slow_factor: 0.5,
            body_width: 26.0,
            body_depth: 20.0,
            body_height: 51.0,
            racket_width: 20.0,
            racket_depth: 28.0,
            racket_height: 60.0,
            racket_offset: 22.0,
            racket_lift: 12.0,
            swing_window_ms: 250.0,
            baseline_inset: 10.0,
        }
    }
}

/// What happens when a serve drops without a racket contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Every fault awards the point to the receiver.
    #[default]
    PointToReceiver,
    /// The first fault grants a second serve; a double fault awards the receiver.
    SecondServe,
}

/// Point, game, and match flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub fault_policy: FaultPolicy,
    pub games_to_win: u32,
    /// How long a dead ball stays on court before the next serve is set up.
    pub rally_reset_delay_ms: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            fault_policy: FaultPolicy::PointToReceiver,
            games_to_win: 3,
            rally_reset_delay_ms: 1200.0,
        }
    }
}

/// Top-level tennis configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TennisConfig {
    pub tick_rate_hz: f32,
    pub court: CourtConfig,
    pub net: NetConfig,
    pub ball: BallConfig,
    pub shot: ShotConfig,
    pub player: PlayerConfig,
    pub rules: RulesConfig,
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f32 },
    NonFinite { field: &'static str, value: f32 },
    OutOfRange { field: &'static str, value: f32, min: f32, max: f32 },
    EmptyRange { field: &'static str, min: f32, max: f32 },
    NetTapeTooTall { tape_height: f32, height: f32 },
    NetOutsideCourt { net_y: f32, height: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            },
            Self::NonFinite { field, value } => {
                write!(f, "{field} must be a finite number, got {value}")
            },
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} = {value} is outside [{min}, {max}]"),
            Self::EmptyRange { field, min, max } => {
                write!(f, "{field} range is empty: min {min} > max {max}")
            },
            Self::NetTapeTooTall {
                tape_height,
                height,
            } => write!(
                f,
                "net tape height {tape_height} must be below net height {height}"
            ),
            Self::NetOutsideCourt { net_y, height } => {
                write!(f, "net_y {net_y} must lie strictly inside (0, {height})")
            },
        }
    }
}

impl std::error::Error for ConfigError {}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, min)?;
    finite(field, max)?;
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange { field, min, max })
    }
}

const CONFIG_ENV: &str = "COURTSIDE_TENNIS_CONFIG";
const CONFIG_PATH: &str = "config/tennis.toml";

impl TennisConfig {
    /// Load config from the file named by `COURTSIDE_TENNIS_CONFIG`, then
    /// `config/tennis.toml`, then defaults. A file that is missing,
    /// unparseable, or fails validation is skipped.
    pub fn load() -> Self {
        let env_path = std::env::var(CONFIG_ENV).ok();
        Self::load_from(env_path.as_deref(), CONFIG_PATH)
    }

    fn load_from(env_path: Option<&str>, repo_path: &str) -> Self {
        if let Some(path) = env_path {
            match std::fs::read_to_string(path) {
                Ok(content) => match Self::from_toml(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Failed to load {path}: {e}, trying {repo_path}"),
                },
                Err(e) => {
                    tracing::warn!("Cannot read {CONFIG_ENV}={path}: {e}, trying {repo_path}");
                },
            }
        }
        match std::fs::read_to_string(repo_path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to load {repo_path}: {e}, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let config = toml::from_str::<Self>(content).map_err(|e| e.to_string())?;
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    /// Check every invariant the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_rate_hz", self.tick_rate_hz)?;

        let c = &self.court;
        positive("court.width", c.width)?;
        positive("court.height", c.height)?;
        if !(c.net_y > 0.0 && c.net_y < c.height) {
            return Err(ConfigError::NetOutsideCourt {
                net_y: c.net_y,
                height: c.height,
            });
        }
        within("court.line_margin", c.line_margin, 0.0, c.width.min(c.height) / 2.0)?;
        finite("court.runoff", c.runoff)?;

        let n = &self.net;
        positive("net.height", n.height)?;
        positive("net.tape_height", n.tape_height)?;
        if n.tape_height >= n.height {
            return Err(ConfigError::NetTapeTooTall {
                tape_height: n.tape_height,
                height: n.height,
            });
        }
        positive("net.thickness", n.thickness)?;
        within("net.tape_friction", n.tape_friction, 0.0, 1.0)?;
        within("net.body_vertical_damping", n.body_vertical_damping, 0.0, 0.5)?;
        finite("net.cooldown_ms", n.cooldown_ms)?;
        finite("net.tape_nudge", n.tape_nudge)?;
        finite("net.body_clearance", n.body_clearance)?;

        let b = &self.ball;
        positive("ball.radius", b.radius)?;
        positive("ball.toss_gravity", b.toss_gravity)?;
        positive("ball.flight_gravity", b.flight_gravity)?;
        within("ball.restitution", b.restitution, 0.0, 0.999)?;
        positive("ball.rest_threshold", b.rest_threshold)?;
        within("ball.spin_decay", b.spin_decay, 0.0, 1.0)?;
        finite("ball.spin_gravity_scale", b.spin_gravity_scale)?;
        finite("ball.spin_drift_scale", b.spin_drift_scale)?;
        finite("ball.spin_epsilon", b.spin_epsilon)?;
        ordered("ball.speed", b.min_speed, b.max_speed)?;
        positive("ball.toss_impulse", b.toss_impulse)?;

        let s = &self.shot;
        ordered("shot.speed", s.speed_min, s.speed_max)?;
        ordered("shot.lift", s.lift_min, s.lift_max)?;
        ordered("shot.zone_sample", s.zone_sample_min, s.zone_sample_max)?;
        within("shot.zone_sample_min", s.zone_sample_min, 0.0, 1.0)?;
        within("shot.zone_sample_max", s.zone_sample_max, 0.0, 1.0)?;
        within("shot.body_deflection", s.body_deflection, -1.0, 0.0)?;
        finite("shot.boost_below", s.boost_below)?;
        positive("shot.low_speed_boost", s.low_speed_boost)?;
        finite("shot.topspin", s.topspin)?;
        finite("shot.slice", s.slice)?;

        let p = &self.player;
        positive("player.walk_speed", p.walk_speed)?;
        positive("player.swing_window_ms", p.swing_window_ms)?;
        for (field, value) in [
            ("player.sprint_factor", p.sprint_factor),
            ("player.slow_factor", p.slow_factor),
            ("player.body_width", p.body_width),
            ("player.body_depth", p.body_depth),
            ("player.body_height", p.body_height),
            ("player.racket_width", p.racket_width),
            ("player.racket_depth", p.racket_depth),
            ("player.racket_height", p.racket_height),
            ("player.racket_offset", p.racket_offset),
            ("player.racket_lift", p.racket_lift),
            ("player.baseline_inset", p.baseline_inset),
        ] {
            finite(field, value)?;
        }

        finite("rules.rally_reset_delay_ms", self.rules.rally_reset_delay_ms)?;

        if self.rules.games_to_win == 0 {
            return Err(ConfigError::NonPositive {
                field: "rules.games_to_win",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for TennisConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            court: CourtConfig::default(),
            net: NetConfig::default(),
            ball: BallConfig::default(),
            shot: ShotConfig::default(),
            player: PlayerConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}
