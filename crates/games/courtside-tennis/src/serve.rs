use serde::{Deserialize, Serialize};

use courtside_core::player::Side;

use crate::config::{FaultPolicy, TennisConfig};
use crate::physics::{BallState, ServeStage};
use crate::player::PlayerState;

/// What a serve fault leads to under the active policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOutcome {
    /// Same server serves again.
    SecondServe,
    /// The receiver takes the point.
    PointToReceiver { double_fault: bool },
}

/// Who serves, and how many faults they have this point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeController {
    pub server: Side,
    pub faults: u8,
}

impl ServeController {
    pub fn new(server: Side) -> Self {
        Self { server, faults: 0 }
    }

    pub fn receiver(&self) -> Side {
        self.server.opponent()
    }

    /// Where the toss starts: beside the server, over their racket.
    pub fn toss_origin(server: &PlayerState, config: &TennisConfig) -> (f32, f32) {
        (
            server.x + server.facing.sign() * config.player.racket_offset,
            server.y,
        )
    }

    /// Fresh ball parked at the server, ready for a toss.
    pub fn prepare(&self, server: &PlayerState, config: &TennisConfig) -> BallState {
        let mut ball = BallState::new(config.ball.radius);
        let (x, y) = Self::toss_origin(server, config);
        ball.park(x, y);
        ball.server = Some(self.server);
        ball
    }

    /// Keep a parked ball with the server as they move.
    pub fn follow_server(&self, ball: &mut BallState, server: &PlayerState, config: &TennisConfig) {
        if ball.serve_stage != ServeStage::Ready {
            return;
        }
        let (x, y) = Self::toss_origin(server, config);
        ball.x = x;
        ball.y = y;
    }

    /// Toss a parked ball. Returns `false` if the ball was not ready.
    pub fn toss(&self, ball: &mut BallState, config: &TennisConfig) -> bool {
        if ball.serve_stage != ServeStage::Ready {
            return false;
        }
        ball.start_toss(self.server, ball.x, ball.y, config.ball.toss_impulse);
        tracing::debug!(server = %self.server, "Toss");
        true
    }

    pub fn record_fault(&mut self, policy: FaultPolicy) -> FaultOutcome {
        self.faults += 1;
        match policy {
            FaultPolicy::PointToReceiver => FaultOutcome::PointToReceiver {
                double_fault: false,
            },
            FaultPolicy::SecondServe if self.faults < 2 => FaultOutcome::SecondServe,
            FaultPolicy::SecondServe => FaultOutcome::PointToReceiver { double_fault: true },
        }
    }

    /// A point is over; the next point starts on a first serve.
    pub fn point_finished(&mut self) {
        self.faults = 0;
    }

    pub fn set_server(&mut self, server: Side) {
        self.server = server;
        self.faults = 0;
    }
}
