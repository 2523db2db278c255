pub mod config;
pub mod court;
pub mod hit;
pub mod net;
pub mod physics;
pub mod player;
pub mod scoring;
pub mod serve;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use courtside_core::events::{PointReason, RallyEvent};
use courtside_core::game_trait::{GameMetadata, RallyGame, TickInputs};
use courtside_core::intent::PlayerIntent;
use courtside_core::player::Side;
use courtside_core::time::{Tick, TickClock};

use config::TennisConfig;
use court::CourtGeometry;
use hit::{Contact, HitGeometry};
use net::NetModel;
use physics::{BallSnapshot, BallState, PhysicsContext, ServeStage};
use player::PlayerState;
use scoring::{MatchScore, ScoreState};
use serve::{FaultOutcome, ServeController};

/// Serializable match state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TennisState {
    pub ball: BallState,
    pub score: ScoreState,
    pub match_score: MatchScore,
    /// Indexed by `Side::index()`.
    pub players: [PlayerState; 2],
    pub serve: ServeController,
    pub clock: TickClock,
    /// Tick the current ball went dead, while waiting to set up the next one.
    pub rally_ended_at: Option<Tick>,
    pub match_complete: bool,
    pub rally_number: u32,
}

/// Everything a renderer or debug overlay needs for one frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RallySnapshot {
    pub tick: Tick,
    pub ball: BallSnapshot,
    pub hit_boxes: [HitGeometry; 2],
    pub score: String,
    pub games: [u32; 2],
    pub server: Side,
    pub match_complete: bool,
}

/// Two-player tennis rally, implementing `RallyGame`.
///
/// Owns the single ball in play and drives one fixed tick per `update`:
/// player input, ball physics, racket/body collisions, then fault and
/// score transitions.
pub struct TennisRally {
    config: TennisConfig,
    court: CourtGeometry,
    net: Option<NetModel>,
    rng: StdRng,
    state: TennisState,
    paused: bool,
}

impl TennisRally {
    /// Rally with config from `TennisConfig::load()` and an OS-seeded RNG.
    pub fn new() -> Self {
        Self::with_config(TennisConfig::load())
    }

    pub fn with_config(config: TennisConfig) -> Self {
        Self::build(config, StdRng::from_os_rng())
    }

    /// Reproducible rally: same config, seed and inputs give the same match.
    pub fn with_seed(config: TennisConfig, seed: u64) -> Self {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: TennisConfig, rng: StdRng) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid tennis config, using defaults");
                TennisConfig::default()
            },
        };
        let court = CourtGeometry::from_config(&config.court);
        let net = match NetModel::from_config(&court, &config.net) {
            Ok(net) => Some(net),
            Err(e) => {
                tracing::warn!(error = %e, "Net unavailable, net tests disabled");
                None
            },
        };

        let players = [
            PlayerState::new(Side::P1, &court, &config.player),
            PlayerState::new(Side::P2, &court, &config.player),
        ];
        let serve = ServeController::new(Side::P1);
        let ball = serve.prepare(&players[Side::P1.index()], &config);
        let state = TennisState {
            ball,
            score: ScoreState::new(),
            match_score: MatchScore::new(config.rules.games_to_win),
            players,
            serve,
            clock: TickClock::new(config.tick_rate_hz),
            rally_ended_at: None,
            match_complete: false,
            rally_number: 1,
        };

        Self {
            config,
            court,
            net,
            rng,
            state,
            paused: false,
        }
    }

    pub fn config(&self) -> &TennisConfig {
        &self.config
    }

    pub fn state(&self) -> &TennisState {
        &self.state
    }

    pub fn ball(&self) -> &BallState {
        &self.state.ball
    }

    pub fn score(&self) -> &ScoreState {
        &self.state.score
    }

    pub fn match_score(&self) -> &MatchScore {
        &self.state.match_score
    }

    pub fn player(&self, side: Side) -> &PlayerState {
        &self.state.players[side.index()]
    }

    pub fn server(&self) -> Side {
        self.state.serve.server
    }

    pub fn court(&self) -> &CourtGeometry {
        &self.court
    }

    pub fn net(&self) -> Option<&NetModel> {
        self.net.as_ref()
    }

    /// Whether the ball is dead and the next serve is being set up.
    pub fn between_points(&self) -> bool {
        self.state.rally_ended_at.is_some()
    }

    pub fn hit_geometry(&self, side: Side) -> HitGeometry {
        self.player(side)
            .hit_geometry(&self.state.clock, &self.config.player)
    }

    pub fn snapshot(&self) -> RallySnapshot {
        RallySnapshot {
            tick: self.state.clock.now(),
            ball: self.state.ball.snapshot(),
            hit_boxes: [self.hit_geometry(Side::P1), self.hit_geometry(Side::P2)],
            score: self.state.score.display(),
            games: self.state.match_score.games,
            server: self.state.serve.server,
            match_complete: self.state.match_complete,
        }
    }

    /// Apply one player's intent: movement, then either the toss (server
    /// holding a ready ball) or a swing.
    pub fn apply_intent(&mut self, side: Side, intent: &PlayerIntent) {
        let clock = self.state.clock;
        let player = &mut self.state.players[side.index()];
        player.apply_movement(intent, &self.court, &self.config.court, &self.config.player);

        if !intent.swing {
            return;
        }
        let tossing = side == self.state.serve.server
            && self.state.ball.serve_stage == ServeStage::Ready
            && self.state.rally_ended_at.is_none();
        if tossing {
            self.state.serve.toss(&mut self.state.ball, &self.config);
        } else {
            player.start_swing(intent, &clock, &self.config.player);
        }
    }

    /// Put a fresh ball in play from `feeder`'s half, skipping the serve.
    pub fn feed(&mut self, feeder: Side) {
        let mut ball = BallState::new(self.config.ball.radius);
        hit::launch_rally(&mut ball, feeder, &self.court, &self.config.shot, &mut self.rng);
        self.state.ball = ball;
        self.state.rally_ended_at = None;
    }

    fn step_ball(&mut self, events: &mut Vec<RallyEvent>) {
        let ctx = PhysicsContext {
            court: &self.court,
            net: self.net.as_ref(),
            ball: &self.config.ball,
            net_response: &self.config.net,
            clock: &self.state.clock,
        };
        self.state.ball.tick(&ctx, events);
    }

    /// Test each player's boxes against the ball. At most one contact per tick.
    fn resolve_contacts(&mut self, events: &mut Vec<RallyEvent>) {
        let clock = self.state.clock;
        for side in Side::BOTH {
            let ball = &self.state.ball;
            if !ball.is_live() {
                return;
            }
            let stage = ball.serve_stage;
            let own_shot = ball.last_hitter == Some(side);
            let racket_ok = match stage {
                ServeStage::Falling => side == self.state.serve.server,
                ServeStage::Served => !own_shot,
                _ => false,
            };
            let body_ok = stage == ServeStage::Served && !own_shot;

            let player = &mut self.state.players[side.index()];
            let geometry = player.hit_geometry(&clock, &self.config.player);
            match geometry.resolve_contact(&self.state.ball) {
                Contact::Racket if racket_ok => {
                    player.consume_swing();
                    let served = hit::resolve_racket_hit(
                        &mut self.state.ball,
                        side,
                        player.swing,
                        &self.court,
                        &self.config.shot,
                        &mut self.rng,
                        events,
                    );
                    if served {
                        tracing::debug!(server = %side, "Serve struck");
                    }
                    return;
                },
                Contact::Body if body_ok => {
                    hit::resolve_body_hit(&mut self.state.ball, side, &self.config.shot, events);
                    return;
                },
                _ => {},
            }
        }
    }

    /// Turn the tick's raw ball events into fault and score transitions.
    fn settle(&mut self, raised: Vec<RallyEvent>) -> Vec<RallyEvent> {
        let mut events = Vec::with_capacity(raised.len());
        for event in raised {
            let follow = match &event {
                RallyEvent::Fault { .. } => self.fault_outcome(),
                RallyEvent::PointScored { winner, .. } => Some(*winner),
                _ => None,
            };
            let is_point = matches!(event, RallyEvent::PointScored { .. });
            events.push(event);
            if let Some(winner) = follow {
                if !is_point {
                    // Fault converted into a point for the receiver.
                    let reason = if self.state.serve.faults >= 2 {
                        PointReason::DoubleFault
                    } else {
                        PointReason::Fault
                    };
                    events.push(RallyEvent::PointScored { winner, reason });
                }
                self.award_point(winner, &mut events);
            }
        }
        events
    }

    /// Record a fault. Returns the receiver if the fault costs the point.
    fn fault_outcome(&mut self) -> Option<Side> {
        let serve = &mut self.state.serve;
        match serve.record_fault(self.config.rules.fault_policy) {
            FaultOutcome::SecondServe => {
                tracing::debug!(server = %serve.server, "Fault, second serve");
                None
            },
            FaultOutcome::PointToReceiver { double_fault } => {
                tracing::debug!(server = %serve.server, double_fault, "Fault");
                Some(serve.receiver())
            },
        }
    }

    fn award_point(&mut self, winner: Side, events: &mut Vec<RallyEvent>) {
        let state = &mut self.state;
        state.score.point_for(winner);
        state.serve.point_finished();
        tracing::info!(%winner, score = %state.score.display(), "Point");

        let Some(game_winner) = state.score.game_winner() else {
            return;
        };
        events.push(RallyEvent::GameWon {
            winner: game_winner,
        });
        let match_winner = state.match_score.record_game(game_winner);
        tracing::info!(
            winner = %game_winner,
            p1 = state.match_score.games_of(Side::P1),
            p2 = state.match_score.games_of(Side::P2),
            "Game"
        );
        state.score.reset();
        let next_server = state.serve.server.opponent();
        state.serve.set_server(next_server);

        if let Some(winner) = match_winner {
            tracing::info!(%winner, "Match");
            events.push(RallyEvent::MatchWon { winner });
            state.match_complete = true;
        }
    }

    /// Once the dead ball has lingered long enough, set up the next serve.
    fn maybe_reset_rally(&mut self) {
        let Some(ended) = self.state.rally_ended_at else {
            return;
        };
        if self.state.match_complete
            || !self
                .state
                .clock
                .elapsed(ended, self.config.rules.rally_reset_delay_ms)
        {
            return;
        }
        let state = &mut self.state;
        state.players = [
            PlayerState::new(Side::P1, &self.court, &self.config.player),
            PlayerState::new(Side::P2, &self.court, &self.config.player),
        ];
        state.ball = state
            .serve
            .prepare(&state.players[state.serve.server.index()], &self.config);
        state.rally_ended_at = None;
        state.rally_number += 1;
        tracing::debug!(
            rally = state.rally_number,
            server = %state.serve.server,
            faults = state.serve.faults,
            "Rally reset"
        );
    }
}

impl Default for TennisRally {
    fn default() -> Self {
        Self::new()
    }
}

impl RallyGame for TennisRally {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Tennis".to_string(),
            description: "Serve, rally, and win the point. \
                          First to the games target takes the match."
                .to_string(),
            players: 2,
        }
    }

    fn update(&mut self, inputs: &TickInputs) -> Vec<RallyEvent> {
        if self.paused || self.state.match_complete {
            return Vec::new();
        }
        self.state.clock.advance();

        for side in Side::BOTH {
            self.apply_intent(side, inputs.get(side));
        }
        let server = self.state.serve.server;
        self.state.serve.follow_server(
            &mut self.state.ball,
            &self.state.players[server.index()],
            &self.config,
        );

        let mut raised = Vec::new();
        self.step_ball(&mut raised);
        self.resolve_contacts(&mut raised);
        let events = self.settle(raised);

        if self.state.rally_ended_at.is_none() && !self.state.ball.is_live() {
            self.state.rally_ended_at = Some(self.state.clock.now());
        }
        self.maybe_reset_rally();
        events
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }

    courtside_core::rally_game_boilerplate!(state_type: TennisState);
}
