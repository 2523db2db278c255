use serde::{Deserialize, Serialize};

use crate::events::RallyEvent;
use crate::intent::PlayerIntent;
use crate::player::Side;

/// Core trait that every Courtside game implements.
///
/// The host loop reads inputs once per tick, calls `update`, and hands the
/// returned events to audio/VFX/UI consumers. Rendering reads snapshots.
pub trait RallyGame: Send + Sync {
    /// Game metadata for the selection screen.
    fn metadata(&self) -> GameMetadata;

    /// Advance the simulation by one fixed tick. Returns the events raised
    /// during the tick, in the order they happened.
    fn update(&mut self, inputs: &TickInputs) -> Vec<RallyEvent>;

    /// Serialize the full simulation state (MessagePack).
    fn serialize_state(&self) -> Vec<u8>;

    /// Restore state previously produced by `serialize_state`.
    fn apply_state(&mut self, state: &[u8]);

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Freeze the simulation; `update` becomes a no-op.
    fn pause(&mut self);

    /// Resume after a pause.
    fn resume(&mut self);

    /// Whether the match is decided.
    fn is_match_complete(&self) -> bool;
}

/// Game metadata for the selection screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub players: u8,
}

/// Intents from both players for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInputs {
    pub p1: PlayerIntent,
    pub p2: PlayerIntent,
}

impl TickInputs {
    /// Inputs where only `side` acts.
    pub fn only(side: Side, intent: PlayerIntent) -> Self {
        let mut inputs = Self::default();
        *inputs.get_mut(side) = intent;
        inputs
    }

    pub fn get(&self, side: Side) -> &PlayerIntent {
        match side {
            Side::P1 => &self.p1,
            Side::P2 => &self.p2,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut PlayerIntent {
        match side {
            Side::P1 => &mut self.p1,
            Side::P2 => &mut self.p2,
        }
    }
}

/// Generates the `RallyGame` methods that are identical across games:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_match_complete`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool` fields,
/// and `$StateType` to have a `match_complete: bool` field.
#[macro_export]
macro_rules! rally_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).unwrap_or_default()
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Dropped malformed state snapshot"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_match_complete(&self) -> bool {
            self.state.match_complete
        }
    };
}
