use serde::{Deserialize, Serialize};

use courtside_core::intent::PlayerIntent;
use courtside_core::player::Side;
use courtside_core::time::{Tick, TickClock};

use crate::config::{CourtConfig, PlayerConfig};
use crate::court::CourtGeometry;
use crate::hit::{Facing, HitGeometry, SwingIntent};

/// A player's ground anchor and swing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    /// Tick the current swing began, if any.
    pub swing_started: Option<Tick>,
    /// Whether the current swing already struck the ball.
    pub swing_used: bool,
    pub swing: SwingIntent,
}

impl PlayerState {
    /// Player standing `baseline_inset` in front of their baseline.
    pub fn new(side: Side, court: &CourtGeometry, cfg: &PlayerConfig) -> Self {
        let (x, y) = court.baseline_spot(side, cfg.baseline_inset);
        Self {
            side,
            x,
            y,
            facing: Facing::Right,
            swing_started: None,
            swing_used: false,
            swing: SwingIntent::default(),
        }
    }

    /// Move along the intent direction, staying on this player's half.
    pub fn apply_movement(
        &mut self,
        intent: &PlayerIntent,
        court: &CourtGeometry,
        court_cfg: &CourtConfig,
        cfg: &PlayerConfig,
    ) {
        let (dx, dy) = intent.direction();
        let mut speed = cfg.walk_speed;
        if intent.sprint {
            speed *= cfg.sprint_factor;
        } else if intent.slow {
            speed *= cfg.slow_factor;
        }
        self.x += dx * speed;
        self.y += dy * speed;

        if dx > 0.0 {
            self.facing = Facing::Right;
        } else if dx < 0.0 {
            self.facing = Facing::Left;
        }

        let runoff = court_cfg.runoff.max(0.0);
        self.x = self.x.clamp(-runoff, court.width + runoff);
        self.y = match self.side {
            Side::P1 => self.y.clamp(court.net_y + 1.0, court.height + runoff),
            Side::P2 => self.y.clamp(-runoff, court.net_y - 1.0),
        };
    }

    /// Open a swing window, committing to the intent's aim and style.
    /// Ignored while a swing is already live.
    pub fn start_swing(&mut self, intent: &PlayerIntent, clock: &TickClock, cfg: &PlayerConfig) {
        if self.racket_live(clock, cfg) {
            return;
        }
        self.swing_started = Some(clock.now());
        self.swing_used = false;
        self.swing = intent.into();
    }

    pub fn racket_live(&self, clock: &TickClock, cfg: &PlayerConfig) -> bool {
        match self.swing_started {
            Some(started) => !self.swing_used && !clock.elapsed(started, cfg.swing_window_ms),
            None => false,
        }
    }

    /// The current swing has struck; it cannot strike again.
    pub fn consume_swing(&mut self) {
        self.swing_used = true;
    }

    pub fn hit_geometry(&self, clock: &TickClock, cfg: &PlayerConfig) -> HitGeometry {
        HitGeometry::from_anchor(
            self.side,
            self.x,
            self.y,
            self.facing,
            cfg,
            self.racket_live(clock, cfg),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TennisConfig;
    use courtside_core::intent::ShotStyle;

    fn setup() -> (TennisConfig, CourtGeometry) {
        let config = TennisConfig::default();
        let court = CourtGeometry::from_config(&config.court);
        (config, court)
    }

    #[test]
    fn players_start_on_own_baseline() {
        let (config, court) = setup();
        let p1 = PlayerState::new(Side::P1, &court, &config.player);
        let p2 = PlayerState::new(Side::P2, &court, &config.player);
        assert_eq!(court.half_of(p1.y), Side::P1);
        assert_eq!(court.half_of(p2.y), Side::P2);
    }

    #[test]
    fn sprint_and_slow_scale_speed() {
        let (config, court) = setup();
        let start = PlayerState::new(Side::P1, &court, &config.player);

        let mut walk = start.clone();
        walk.apply_movement(&PlayerIntent::moving(1.0, 0.0), &court, &config.court, &config.player);
        let mut sprint = start.clone();
        let mut intent = PlayerIntent::moving(1.0, 0.0);
        intent.sprint = true;
        sprint.apply_movement(&intent, &court, &config.court, &config.player);
        let mut slow = start.clone();
        let mut intent = PlayerIntent::moving(1.0, 0.0);
        intent.slow = true;
        slow.apply_movement(&intent, &court, &config.court, &config.player);

        let step = |p: &PlayerState| p.x - start.x;
        assert!((step(&walk) - 8.0).abs() < 1e-4);
        assert!((step(&sprint) - 12.0).abs() < 1e-4);
        assert!((step(&slow) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn facing_follows_horizontal_movement() {
        let (config, court) = setup();
        let mut p = PlayerState::new(Side::P2, &court, &config.player);
        p.apply_movement(&PlayerIntent::moving(-1.0, 0.0), &court, &config.court, &config.player);
        assert_eq!(p.facing, Facing::Left);
        p.apply_movement(&PlayerIntent::moving(0.0, 1.0), &court, &config.court, &config.player);
        assert_eq!(p.facing, Facing::Left, "vertical moves keep facing");
    }

    #[test]
    fn cannot_cross_the_net() {
        let (config, court) = setup();
        let mut p1 = PlayerState::new(Side::P1, &court, &config.player);
        let mut p2 = PlayerState::new(Side::P2, &court, &config.player);
        for _ in 0..200 {
            let (up, down) = (PlayerIntent::moving(0.0, -1.0), PlayerIntent::moving(0.0, 1.0));
            p1.apply_movement(&up, &court, &config.court, &config.player);
            p2.apply_movement(&down, &court, &config.court, &config.player);
        }
        assert!(p1.y > court.net_y);
        assert!(p2.y < court.net_y);
    }

    #[test]
    fn runoff_limits_sideways_travel() {
        let (config, court) = setup();
        let mut p = PlayerState::new(Side::P1, &court, &config.player);
        let right = PlayerIntent::moving(1.0, 0.0);
        for _ in 0..200 {
            p.apply_movement(&right, &court, &config.court, &config.player);
        }
        assert_eq!(p.x, court.width + config.court.runoff);
    }

    #[test]
    fn swing_window_expires_and_strikes_once() {
        let (config, court) = setup();
        let mut clock = TickClock::new(60.0);
        let mut p = PlayerState::new(Side::P1, &court, &config.player);
        assert!(!p.racket_live(&clock, &config.player));

        let aimed = PlayerIntent::swing().with_style(ShotStyle::Slice);
        p.start_swing(&aimed, &clock, &config.player);
        assert_eq!(p.swing.style, ShotStyle::Slice);
        assert!(p.hit_geometry(&clock, &config.player).racket_live());
        p.consume_swing();
        assert!(!p.racket_live(&clock, &config.player));

        p.start_swing(&PlayerIntent::swing(), &clock, &config.player);
        assert_eq!(p.swing.style, ShotStyle::Flat);
        assert!(p.racket_live(&clock, &config.player));
        // 250 ms at 60 Hz is 15 ticks.
        for _ in 0..15 {
            clock.advance();
        }
        assert!(!p.racket_live(&clock, &config.player));
    }
}
