use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two players on court.
///
/// P1 plays the near half (`y > net_y`), P2 the far half (`y < net_y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    /// Both sides, in scoreboard order.
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    /// The player across the net.
    pub fn opponent(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }

    /// Index into two-element per-side arrays.
    pub fn index(self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }

    /// Point winner when a rally ends with `last_hitter` on record.
    ///
    /// With no hitter recorded the point defaults to P2.
    pub fn opponent_of(last_hitter: Option<Side>) -> Self {
        match last_hitter {
            Some(side) => side.opponent(),
            None => Self::P2,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P1 => write!(f, "P1"),
            Self::P2 => write!(f, "P2"),
        }
    }
}
