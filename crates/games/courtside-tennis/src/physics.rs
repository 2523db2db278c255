use serde::{Deserialize, Serialize};

use courtside_core::events::{NetContact, PointReason, RallyEvent};
use courtside_core::player::Side;
use courtside_core::time::{Tick, TickClock};

use crate::config::{BallConfig, NetConfig};
use crate::court::{CourtGeometry, Vec3};
use crate::net::NetModel;

/// Minimum aim distance; a zero-length aim vector uses this instead.
pub const AIM_EPSILON: f32 = 1e-5;

/// Where the serve sequence is for the current ball.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServeStage {
    /// Parked at the server, waiting for a toss.
    #[default]
    Ready,
    /// Rising after the toss impulse.
    Toss,
    /// Descending toward the server's racket.
    Falling,
    /// In live flight.
    Served,
    /// Dropped without a racket contact. Terminal for this ball.
    Fault,
}

/// Everything a ball tick reads besides the ball itself.
pub struct PhysicsContext<'a> {
    pub court: &'a CourtGeometry,
    /// `None` when net geometry is unavailable; net tests are skipped.
    pub net: Option<&'a NetModel>,
    pub ball: &'a BallConfig,
    pub net_response: &'a NetConfig,
    pub clock: &'a TickClock,
}

/// State of the single ball in play.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BallState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    /// Positive is topspin, negative slice.
    pub spin: f32,
    pub radius: f32,
    /// In-bounds ground contacts since the last player strike.
    pub bounce_count: u32,
    pub out_of_bounds: bool,
    pub serve_stage: ServeStage,
    pub last_hitter: Option<Side>,
    /// Who tossed this ball, if it was served.
    pub server: Option<Side>,
    /// Tick of the last net contact, for the contact cooldown.
    pub last_net_hit: Option<Tick>,
    /// Set once this ball has decided a point; it no longer moves.
    pub point_decided: bool,
}

/// Read-only view of the ball for renderers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
    pub serve_stage: ServeStage,
}

impl BallState {
    pub fn new(radius: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            spin: 0.0,
            radius,
            bounce_count: 0,
            out_of_bounds: false,
            serve_stage: ServeStage::Ready,
            last_hitter: None,
            server: None,
            last_net_hit: None,
            point_decided: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Total speed (all three axes).
    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy + self.vz * self.vz).sqrt()
    }

    /// Whether the ball can still be struck or decide a point.
    pub fn is_live(&self) -> bool {
        !self.point_decided && !self.out_of_bounds && self.serve_stage != ServeStage::Fault
    }

    /// Whether the ball is in the air from a toss and waiting to be struck.
    pub fn awaiting_serve(&self) -> bool {
        matches!(self.serve_stage, ServeStage::Toss | ServeStage::Falling)
    }

    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            x: self.x,
            y: self.y,
            z: self.z,
            radius: self.radius,
            serve_stage: self.serve_stage,
        }
    }

    /// Park the ball on the ground at `(x, y)`, ready for a toss.
    pub fn park(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.z = 0.0;
        self.vx = 0.0;
        self.vy = 0.0;
        self.vz = 0.0;
        self.serve_stage = ServeStage::Ready;
    }

    /// Throw the ball straight up from `(x, y)`.
    pub fn start_toss(&mut self, server: Side, x: f32, y: f32, impulse: f32) {
        self.park(x, y);
        self.vz = impulse;
        self.serve_stage = ServeStage::Toss;
        self.server = Some(server);
        self.out_of_bounds = false;
    }

    /// Set the spin imparted by a shot.
    pub fn apply_shot_spin(&mut self, spin: f32) {
        self.spin = spin;
    }

    /// Send the ball toward `target` at horizontal `speed` with vertical
    /// `lift`, without recording a hitter.
    pub fn launch_toward(&mut self, target: (f32, f32), speed: f32, lift: f32) {
        let dx = target.0 - self.x;
        let dy = target.1 - self.y;
        let mut dist = (dx * dx + dy * dy).sqrt();
        if dist == 0.0 || !dist.is_finite() {
            dist = AIM_EPSILON;
        }
        self.vx = dx / dist * speed;
        self.vy = dy / dist * speed;
        self.vz = lift;
        self.serve_stage = ServeStage::Served;
        self.bounce_count = 0;
    }

    /// A player strike. Returns `true` if this struck a tossed serve.
    pub fn strike_toward(&mut self, side: Side, target: (f32, f32), speed: f32, lift: f32) -> bool {
        let was_serve = self.awaiting_serve();
        self.launch_toward(target, speed, lift);
        self.last_hitter = Some(side);
        was_serve
    }

    /// Dead deflection off a body: horizontal velocity scaled by a small
    /// negative factor.
    pub fn deflect_off_body(&mut self, factor: f32) {
        self.vx *= factor;
        self.vy *= factor;
        self.spin = 0.0;
    }

    /// Advance the ball by one tick, pushing any events raised.
    pub fn tick(&mut self, ctx: &PhysicsContext<'_>, events: &mut Vec<RallyEvent>) {
        if self.point_decided {
            return;
        }
        match self.serve_stage {
            ServeStage::Ready | ServeStage::Fault => {},
            ServeStage::Toss | ServeStage::Falling => self.tick_toss(ctx.ball, events),
            ServeStage::Served => self.tick_flight(ctx, events),
        }
    }

    fn tick_toss(&mut self, config: &BallConfig, events: &mut Vec<RallyEvent>) {
        self.z += self.vz;
        self.vz -= config.toss_gravity;

        if self.vz <= 0.0 && self.serve_stage == ServeStage::Toss {
            self.serve_stage = ServeStage::Falling;
        }

        if self.z <= 0.0 {
            self.z = 0.0;
            self.vx = 0.0;
            self.vy = 0.0;
            self.vz = 0.0;
            self.serve_stage = ServeStage::Fault;
            tracing::debug!(server = ?self.server, "Serve dropped without contact");
            events.push(RallyEvent::Out {
                x: self.x,
                y: self.y,
            });
            if let Some(server) = self.server {
                events.push(RallyEvent::Fault { server });
            }
        }
    }

    fn tick_flight(&mut self, ctx: &PhysicsContext<'_>, events: &mut Vec<RallyEvent>) {
        let cfg = ctx.ball;
        let prev = self.position();

        // Gravity before position so a bounce never returns faster than it
        // launched.
        self.vz -= cfg.flight_gravity;
        self.x += self.vx;
        self.y += self.vy;
        self.z += self.vz;

        if self.z <= 0.0 {
            // A ball that reaches the ground this tick may still have met
            // the net on the way down.
            if let Some(net) = ctx.net
                && net
                    .crossing_point(prev, self.position())
                    .is_some_and(|p| p.z > 0.0)
            {
                self.net_interaction(prev, net, ctx, events);
            }
            if self.ground_contact(ctx.court, cfg, events) {
                return;
            }
        }

        self.apply_spin(cfg);

        if self.z > 0.0
            && let Some(net) = ctx.net
        {
            self.net_interaction(prev, net, ctx, events);
        }

        self.clamp_speed(cfg);
    }

    /// Bounce off the ground. Returns `true` if the contact ended the point.
    fn ground_contact(
        &mut self,
        court: &CourtGeometry,
        cfg: &BallConfig,
        events: &mut Vec<RallyEvent>,
    ) -> bool {
        self.z = 0.0;
        self.vz = -self.vz * cfg.restitution;
        if self.vz.abs() < cfg.rest_threshold {
            self.vz = 0.0;
        }

        if !court.contains(self.x, self.y) {
            self.out_of_bounds = true;
            events.push(RallyEvent::Out {
                x: self.x,
                y: self.y,
            });
            self.decide_point(Side::opponent_of(self.last_hitter), PointReason::Out, events);
            return true;
        }

        self.bounce_count += 1;
        events.push(RallyEvent::BounceCourt {
            x: self.x,
            y: self.y,
        });
        if self.bounce_count >= 2 {
            self.out_of_bounds = true;
            self.decide_point(
                Side::opponent_of(self.last_hitter),
                PointReason::DoubleBounce,
                events,
            );
            return true;
        }
        false
    }

    fn apply_spin(&mut self, cfg: &BallConfig) {
        if self.spin.abs() <= cfg.spin_epsilon {
            self.spin = 0.0;
            return;
        }
        // Topspin pulls the ball down, slice holds it up.
        self.vz -= self.spin * cfg.spin_gravity_scale;
        self.vx += self.spin * cfg.spin_drift_scale * sign(self.vx);
        self.spin *= cfg.spin_decay;
    }

    fn net_interaction(
        &mut self,
        prev: Vec3,
        net: &NetModel,
        ctx: &PhysicsContext<'_>,
        events: &mut Vec<RallyEvent>,
    ) {
        let response = ctx.net_response;
        if let Some(last) = self.last_net_hit
            && !ctx.clock.elapsed(last, response.cooldown_ms)
        {
            return;
        }

        let contact_at = net
            .crossing_point(prev, self.position())
            .unwrap_or_else(|| self.position());
        let contact = net.test_hit(contact_at, self.radius);
        match contact {
            NetContact::None => return,
            NetContact::Tape => {
                let f = response.tape_friction;
                self.vx *= f;
                self.vy *= f;
                self.vz *= f;
                let dir = sign(self.vy);
                if dir == 0.0 {
                    self.z += response.tape_nudge;
                } else {
                    self.y += dir * response.tape_nudge;
                }
            },
            NetContact::Body => {
                // Push back out on the side the ball came from.
                let mut from = -sign(self.vy);
                if from == 0.0 {
                    from = sign(prev.y - net.world_y);
                }
                if from == 0.0 {
                    from = 1.0;
                }
                self.vx = 0.0;
                self.vy = 0.0;
                self.vz *= response.body_vertical_damping;
                self.spin = 0.0;
                self.y = net.world_y
                    + from * (self.radius + net.half_thickness + response.body_clearance);
            },
        }

        self.last_net_hit = Some(ctx.clock.now());
        tracing::debug!(?contact, x = self.x, z = self.z, "Net contact");
        events.push(RallyEvent::NetContact { contact });
    }

    fn clamp_speed(&mut self, cfg: &BallConfig) {
        self.vx = clamp_component(self.vx, cfg.min_speed, cfg.max_speed);
        self.vy = clamp_component(self.vy, cfg.min_speed, cfg.max_speed);
    }

    /// Mark this ball as having decided a point for `winner`.
    pub fn decide_point(
        &mut self,
        winner: Side,
        reason: PointReason,
        events: &mut Vec<RallyEvent>,
    ) {
        self.point_decided = true;
        events.push(RallyEvent::PointScored { winner, reason });
    }
}

/// Sign of `v`, with zero mapping to zero.
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Clamp `|v|` into `[min, max]`, keeping its sign. Zero stays zero.
fn clamp_component(v: f32, min: f32, max: f32) -> f32 {
    if v == 0.0 {
        return 0.0;
    }
    sign(v) * v.abs().clamp(min, max.max(min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TennisConfig;

    struct Rig {
        config: TennisConfig,
        court: CourtGeometry,
        net: NetModel,
        clock: TickClock,
    }

    impl Rig {
        fn new() -> Self {
            let config = TennisConfig::default();
            let court = CourtGeometry::from_config(&config.court);
            let net = NetModel::from_config(&court, &config.net).unwrap();
            Self {
                config,
                court,
                net,
                clock: TickClock::new(60.0),
            }
        }

        fn tick(&mut self, ball: &mut BallState, events: &mut Vec<RallyEvent>) {
            self.clock.advance();
            let ctx = PhysicsContext {
                court: &self.court,
                net: Some(&self.net),
                ball: &self.config.ball,
                net_response: &self.config.net,
                clock: &self.clock,
            };
            ball.tick(&ctx, events);
        }
    }

    fn served_ball(x: f32, y: f32, z: f32) -> BallState {
        let mut ball = BallState::new(7.0);
        ball.x = x;
        ball.y = y;
        ball.z = z;
        ball.serve_stage = ServeStage::Served;
        ball
    }

    fn points(events: &[RallyEvent]) -> Vec<(Side, PointReason)> {
        events
            .iter()
            .filter_map(|e| match e {
                RallyEvent::PointScored { winner, reason } => Some((*winner, *reason)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn toss_rises_then_falls_then_faults() {
        let mut rig = Rig::new();
        let mut ball = BallState::new(7.0);
        ball.start_toss(Side::P1, 0.0, 0.0, 10.0);
        let mut events = Vec::new();

        let mut saw_falling = false;
        let mut fault_tick = None;
        for tick in 1..=60 {
            rig.tick(&mut ball, &mut events);
            if ball.serve_stage == ServeStage::Falling {
                saw_falling = true;
            }
            if ball.serve_stage == ServeStage::Fault {
                fault_tick = Some(tick);
                break;
            }
        }

        assert!(saw_falling);
        let tick = fault_tick.expect("toss should fault");
        // 10 / 0.6 ≈ 16.7 ticks up, about as many down.
        assert!((30..=36).contains(&tick), "fault at tick {tick}");
        assert_eq!(ball.z, 0.0);
        let outs = events
            .iter()
            .filter(|e| matches!(e, RallyEvent::Out { .. }))
            .count();
        assert_eq!(outs, 1);
        assert!(events.contains(&RallyEvent::Fault { server: Side::P1 }));
    }

    #[test]
    fn fault_freezes_ball_and_fires_once() {
        let mut rig = Rig::new();
        let mut ball = BallState::new(7.0);
        ball.start_toss(Side::P2, 50.0, 20.0, 10.0);
        let mut events = Vec::new();
        for _ in 0..200 {
            rig.tick(&mut ball, &mut events);
        }
        assert_eq!(ball.serve_stage, ServeStage::Fault);
        assert_eq!((ball.x, ball.y, ball.z), (50.0, 20.0, 0.0));
        let faults = events
            .iter()
            .filter(|e| matches!(e, RallyEvent::Fault { .. }))
            .count();
        assert_eq!(faults, 1);
        assert!(!ball.is_live());
    }

    #[test]
    fn ready_ball_does_not_move() {
        let mut rig = Rig::new();
        let mut ball = BallState::new(7.0);
        ball.park(30.0, 390.0);
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);
        assert_eq!(ball.position(), Vec3::new(30.0, 390.0, 0.0));
        assert!(events.is_empty());
    }

    #[test]
    fn first_in_bounds_bounce_counts() {
        let mut rig = Rig::new();
        let mut ball = served_ball(120.0, 100.0, 0.2);
        ball.vz = -3.0;
        ball.last_hitter = Some(Side::P1);
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);

        assert_eq!(ball.bounce_count, 1);
        assert!(ball.vz > 0.0, "bounce should reflect vz");
        assert!(matches!(events[0], RallyEvent::BounceCourt { .. }));
        assert!(points(&events).is_empty());
    }

    #[test]
    fn double_bounce_awards_non_hitter() {
        let mut rig = Rig::new();
        let mut ball = served_ball(120.0, 100.0, 0.2);
        ball.vz = -3.0;
        ball.bounce_count = 1;
        ball.last_hitter = Some(Side::P1);
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);

        assert!(ball.out_of_bounds);
        assert_eq!(points(&events), vec![(Side::P2, PointReason::DoubleBounce)]);

        // Dead ball stays put.
        let frozen = ball.position();
        rig.tick(&mut ball, &mut events);
        assert_eq!(ball.position(), frozen);
        assert_eq!(points(&events).len(), 1);
    }

    #[test]
    fn first_bounce_out_awards_opponent_of_hitter() {
        let mut rig = Rig::new();
        let mut ball = served_ball(-30.0, 100.0, 0.2);
        ball.vz = -3.0;
        ball.last_hitter = Some(Side::P2);
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);

        assert!(ball.out_of_bounds);
        assert_eq!(ball.bounce_count, 0);
        assert!(matches!(events[0], RallyEvent::Out { .. }));
        assert_eq!(points(&events), vec![(Side::P1, PointReason::Out)]);
    }

    #[test]
    fn out_with_no_hitter_defaults_to_p2() {
        let mut rig = Rig::new();
        let mut ball = served_ball(120.0, -40.0, 0.2);
        ball.vz = -3.0;
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);
        assert_eq!(points(&events), vec![(Side::P2, PointReason::Out)]);
    }

    #[test]
    fn small_bounce_flattens_to_rest() {
        let mut rig = Rig::new();
        let mut ball = served_ball(120.0, 100.0, 0.1);
        ball.vz = -0.5;
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);
        assert_eq!(ball.vz, 0.0);
    }

    #[test]
    fn topspin_adds_descent_and_decays() {
        let mut rig = Rig::new();
        let mut flat = served_ball(120.0, 100.0, 80.0);
        flat.vx = 2.0;
        flat.vy = -4.0;
        let mut spun = flat.clone();
        spun.apply_shot_spin(0.9);
        let mut events = Vec::new();
        rig.tick(&mut flat, &mut events);
        rig.tick(&mut spun, &mut events);

        assert!(spun.vz < flat.vz, "topspin should accelerate descent");
        assert!(spun.vx > flat.vx, "drift follows direction of travel");
        assert!((spun.spin - 0.9 * 0.96).abs() < 1e-6);
    }

    #[test]
    fn slice_holds_ball_up() {
        let mut rig = Rig::new();
        let mut flat = served_ball(120.0, 100.0, 80.0);
        flat.vy = -4.0;
        let mut sliced = flat.clone();
        sliced.apply_shot_spin(-0.7);
        let mut events = Vec::new();
        rig.tick(&mut flat, &mut events);
        rig.tick(&mut sliced, &mut events);
        assert!(sliced.vz > flat.vz);
    }

    #[test]
    fn tape_graze_damps_without_reversing() {
        let mut rig = Rig::new();
        let mut ball = served_ball(120.0, 205.0, 11.0);
        ball.vx = 1.0;
        ball.vy = -6.0;
        ball.vz = 0.5;
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);

        assert!(events.contains(&RallyEvent::NetContact {
            contact: NetContact::Tape
        }));
        assert!(ball.vy < 0.0, "tape must not reverse travel");
        assert!(ball.vx > 0.0);
        assert!(ball.vy.abs() < 6.0);
    }

    #[test]
    fn body_strike_stops_ball_on_approach_side() {
        let mut rig = Rig::new();
        let mut ball = served_ball(120.0, 212.0, 4.0);
        ball.vx = 2.0;
        ball.vy = -9.0;
        ball.vz = 0.5;
        let before = ball.speed();
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);

        assert!(events.contains(&RallyEvent::NetContact {
            contact: NetContact::Body
        }));
        assert!(ball.speed() <= before * 0.5);
        assert!(ball.y > rig.net.world_y + ball.radius, "pushed back toward P1");
    }

    #[test]
    fn fast_ball_cannot_tunnel_through_net() {
        let mut rig = Rig::new();
        // Crosses from 210 to 194 in one tick, low enough to hit the mesh.
        let mut ball = served_ball(120.0, 210.0, 3.0);
        ball.vy = -16.0;
        ball.vz = 0.5;
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);
        assert!(events.contains(&RallyEvent::NetContact {
            contact: NetContact::Body
        }));
    }

    #[test]
    fn low_ball_landing_past_net_hits_mesh_first() {
        let mut rig = Rig::new();
        // Crosses the net plane low and reaches the ground in the same tick.
        let mut ball = served_ball(120.0, 206.0, 1.5);
        ball.vy = -12.0;
        ball.vz = -1.0;
        ball.last_hitter = Some(Side::P1);
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);

        assert_eq!(
            events[0],
            RallyEvent::NetContact {
                contact: NetContact::Body
            }
        );
        assert!(ball.y > rig.net.world_y, "ball stays on the hitter's side");
        assert_eq!(ball.z, 0.0);
        assert_eq!(ball.bounce_count, 1);
        assert_eq!(rig.court.half_of(ball.y), Side::P1);
    }

    #[test]
    fn net_contact_has_cooldown() {
        let mut rig = Rig::new();
        let mut ball = served_ball(120.0, 204.0, 11.0);
        ball.vy = -0.5;
        ball.vz = 0.55;
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);
        rig.tick(&mut ball, &mut events);
        let contacts = events
            .iter()
            .filter(|e| matches!(e, RallyEvent::NetContact { .. }))
            .count();
        assert_eq!(contacts, 1);
    }

    #[test]
    fn missing_net_skips_test() {
        let rig = Rig::new();
        let mut ball = served_ball(120.0, 212.0, 4.0);
        ball.vy = -9.0;
        ball.vz = 0.5;
        let ctx = PhysicsContext {
            court: &rig.court,
            net: None,
            ball: &rig.config.ball,
            net_response: &rig.config.net,
            clock: &rig.clock,
        };
        let mut events = Vec::new();
        ball.tick(&ctx, &mut events);
        assert!(events.is_empty());
        assert_eq!(ball.vy, -9.0);
    }

    #[test]
    fn speed_is_clamped_but_zero_is_exempt() {
        let mut rig = Rig::new();
        let mut ball = served_ball(120.0, 100.0, 80.0);
        ball.vx = 0.0;
        ball.vy = -40.0;
        let mut events = Vec::new();
        rig.tick(&mut ball, &mut events);
        assert_eq!(ball.vx, 0.0);
        assert_eq!(ball.vy, -rig.config.ball.max_speed);

        ball.vx = 0.01;
        rig.tick(&mut ball, &mut events);
        assert_eq!(ball.vx, rig.config.ball.min_speed);
    }

    #[test]
    fn zero_distance_aim_does_not_blow_up() {
        let mut ball = served_ball(50.0, 50.0, 10.0);
        ball.strike_toward(Side::P1, (50.0, 50.0), 10.0, 6.0);
        assert!(ball.vx.is_finite() && ball.vy.is_finite());
        assert_eq!(ball.vz, 6.0);
    }

    #[test]
    fn strike_resets_bounces_and_records_hitter() {
        let mut ball = served_ball(50.0, 50.0, 10.0);
        ball.bounce_count = 1;
        ball.serve_stage = ServeStage::Falling;
        let was_serve = ball.strike_toward(Side::P2, (100.0, 300.0), 10.0, 6.0);
        assert!(was_serve);
        assert_eq!(ball.serve_stage, ServeStage::Served);
        assert_eq!(ball.bounce_count, 0);
        assert_eq!(ball.last_hitter, Some(Side::P2));
        let horizontal = (ball.vx * ball.vx + ball.vy * ball.vy).sqrt();
        assert!((horizontal - 10.0).abs() < 1e-4);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bounces_decay_and_come_to_rest(
                vz0 in 0.5f32..40.0,
                restitution in 0.05f32..0.9,
            ) {
                let mut rig = Rig::new();
                rig.config.ball.restitution = restitution;
                let mut ball = served_ball(120.0, 100.0, 0.0);
                ball.vz = vz0;
                // Keep the ball bouncing on the spot with no bounce limit.
                let mut last_peak = f32::INFINITY;
                let mut events = Vec::new();
                for _ in 0..10_000 {
                    ball.bounce_count = 0;
                    rig.tick(&mut ball, &mut events);
                    if ball.z == 0.0 && ball.vz >= 0.0 {
                        prop_assert!(ball.vz <= last_peak, "vz grew: {} > {}", ball.vz, last_peak);
                        last_peak = ball.vz;
                        if ball.vz == 0.0 {
                            break;
                        }
                    }
                }
                prop_assert_eq!(ball.vz, 0.0, "ball never came to rest");
            }

            #[test]
            fn tape_never_reverses_and_body_halves_speed(
                vx in -10.0f32..10.0,
                vy in 2.0f32..14.0,
                z_body in 1.0f32..8.5,
                z_tape in 9.6f32..12.0,
            ) {
                let mut rig = Rig::new();
                let mut events = Vec::new();

                let mut tape = served_ball(120.0, 200.0 - 4.0, z_tape);
                tape.vx = vx;
                tape.vy = vy;
                tape.vz = 0.0;
                rig.tick(&mut tape, &mut events);
                prop_assert!(tape.vy >= 0.0);
                prop_assert!(vx == 0.0 || tape.vx.signum() == vx.signum() || tape.vx == 0.0);

                let mut body = served_ball(120.0, 200.0 - 4.0, z_body);
                body.vx = vx;
                body.vy = vy;
                body.vz = 0.0;
                let before = body.speed();
                rig.tick(&mut body, &mut events);
                prop_assert!(body.speed() <= before * 0.5);
            }
        }
    }
}
