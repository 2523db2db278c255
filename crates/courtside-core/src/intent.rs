use serde::{Deserialize, Serialize};

/// Shot style selected by the auxiliary control input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotStyle {
    #[default]
    Flat,
    Topspin,
    Slice,
}

/// Lateral component of a directional aim hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lateral {
    Left,
    #[default]
    Center,
    Right,
}

/// Depth component of a directional aim hint (up/forward modifiers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    Deep,
    #[default]
    Neutral,
    Short,
}

/// Directional zone hint attached to a swing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AimHint {
    pub lateral: Lateral,
    pub depth: Depth,
}

/// Per-tick intent for one player, human or AI.
///
/// Read once at the start of a tick and treated as immutable for the
/// rest of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerIntent {
    /// Movement direction on the court plane. Normalized by the consumer.
    pub move_x: f32,
    pub move_y: f32,
    pub sprint: bool,
    pub slow: bool,
    /// Discrete swing trigger. For a server holding a ready ball this is
    /// the toss command.
    pub swing: bool,
    pub style: ShotStyle,
    pub aim: Option<AimHint>,
}

impl PlayerIntent {
    /// A swing with no movement.
    pub fn swing() -> Self {
        Self {
            swing: true,
            ..Default::default()
        }
    }

    /// Movement only.
    pub fn moving(move_x: f32, move_y: f32) -> Self {
        Self {
            move_x,
            move_y,
            ..Default::default()
        }
    }

    /// Builder: attach an aim hint.
    pub fn aimed(mut self, lateral: Lateral, depth: Depth) -> Self {
        self.aim = Some(AimHint { lateral, depth });
        self
    }

    /// Builder: select a shot style.
    pub fn with_style(mut self, style: ShotStyle) -> Self {
        self.style = style;
        self
    }

    /// Normalized movement direction, or zero when there is no input.
    pub fn direction(&self) -> (f32, f32) {
        let len = (self.move_x * self.move_x + self.move_y * self.move_y).sqrt();
        if len < 1e-6 || !len.is_finite() {
            return (0.0, 0.0);
        }
        (self.move_x / len, self.move_y / len)
    }
}
