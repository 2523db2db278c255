use serde::{Deserialize, Serialize};

use crate::player::Side;

/// Result of testing the ball against the net.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetContact {
    #[default]
    None,
    /// Ball grazed the top tape and carries on with friction.
    Tape,
    /// Ball struck the mesh and is stopped.
    Body,
}

/// Why a point was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointReason {
    /// Second in-bounds bounce since the last strike.
    DoubleBounce,
    /// Ground contact outside the court.
    Out,
    /// Ball struck a player's body.
    BodyHit,
    /// Serve fault under the active fault policy.
    Fault,
    /// Second serve also faulted.
    DoubleFault,
}

/// Discrete events emitted by the simulation for audio/VFX/UI consumers.
///
/// The simulation never calls into collaborators directly: it returns
/// these from each tick and consumers drain them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RallyEvent {
    /// In-bounds ground contact.
    BounceCourt { x: f32, y: f32 },
    /// Ball touched the net (tape or body).
    NetContact { contact: NetContact },
    /// A racket struck the ball.
    RacketHit { side: Side },
    /// The ball struck a player's body.
    BodyHit { side: Side },
    /// Ball went out (out-of-bounds contact, or a serve that dropped).
    Out { x: f32, y: f32 },
    /// Serve dropped to the ground without a racket contact.
    Fault { server: Side },
    /// A point was decided.
    PointScored { winner: Side, reason: PointReason },
    /// A game was decided.
    GameWon { winner: Side },
    /// The match was decided.
    MatchWon { winner: Side },
}

impl RallyEvent {
    /// Winner of the point if this event decides one.
    pub fn point_winner(&self) -> Option<Side> {
        match self {
            Self::PointScored { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_winner_only_for_point_events() {
        let scored = RallyEvent::PointScored {
            winner: Side::P1,
            reason: PointReason::Out,
        };
        assert_eq!(scored.point_winner(), Some(Side::P1));
        assert_eq!(RallyEvent::Out { x: 0.0, y: 0.0 }.point_winner(), None);
    }

    #[test]
    fn events_roundtrip_msgpack() {
        let ev = RallyEvent::NetContact {
            contact: NetContact::Tape,
        };
        let data = rmp_serde::to_vec(&ev).unwrap();
        let back: RallyEvent = rmp_serde::from_slice(&data).unwrap();
        assert_eq!(ev, back);
    }
}
