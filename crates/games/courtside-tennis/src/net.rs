use serde::{Deserialize, Serialize};

use courtside_core::events::NetContact;

use crate::config::{ConfigError, NetConfig};
use crate::court::{CourtGeometry, Vec3};

/// The net as a thin vertical slab at `world_y` spanning the court width,
/// with a tape band along its top edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetModel {
    pub world_y: f32,
    pub height: f32,
    pub tape_height: f32,
    pub half_thickness: f32,
    pub x_min: f32,
    pub x_max: f32,
}

impl NetModel {
    pub fn new(
        world_y: f32,
        height: f32,
        tape_height: f32,
        thickness: f32,
        x_min: f32,
        x_max: f32,
    ) -> Result<Self, ConfigError> {
        if !(tape_height > 0.0 && tape_height < height) {
            return Err(ConfigError::NetTapeTooTall {
                tape_height,
                height,
            });
        }
        Ok(Self {
            world_y,
            height,
            tape_height,
            half_thickness: thickness.max(0.0) / 2.0,
            x_min,
            x_max,
        })
    }

    pub fn from_config(court: &CourtGeometry, config: &NetConfig) -> Result<Self, ConfigError> {
        Self::new(
            court.net_y,
            config.height,
            config.tape_height,
            config.thickness,
            0.0,
            court.width,
        )
    }

    /// Lower edge of the tape band.
    pub fn tape_floor(&self) -> f32 {
        self.height - self.tape_height
    }

    /// Classify a ball at `pos` with `radius` against the net.
    ///
    /// The ball touches the slab when its centre is within `radius` of the
    /// slab on the court plane and its bottom is not above the net top.
    /// A centre at or above the tape floor grazes the tape; anything lower
    /// hits the mesh.
    pub fn test_hit(&self, pos: Vec3, radius: f32) -> NetContact {
        let within_y = (pos.y - self.world_y).abs() <= radius + self.half_thickness;
        let within_x = pos.x >= self.x_min - radius && pos.x <= self.x_max + radius;
        if !within_y || !within_x || pos.z - radius > self.height {
            return NetContact::None;
        }
        if pos.z >= self.tape_floor() {
            NetContact::Tape
        } else {
            NetContact::Body
        }
    }

    /// Point where the segment `from -> to` crosses the net plane, if it
    /// crosses strictly during the step.
    pub fn crossing_point(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        let a = from.y - self.world_y;
        let b = to.y - self.world_y;
        if a == 0.0 || b == 0.0 || a.signum() == b.signum() {
            return None;
        }
        let t = a / (a - b);
        Some(Vec3::new(
            from.x + (to.x - from.x) * t,
            self.world_y,
            from.z + (to.z - from.z) * t,
        ))
    }
}
